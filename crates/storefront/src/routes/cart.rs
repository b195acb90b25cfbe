//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart itself lives in the session; handlers load it, apply one
//! operation and persist it back, then return the fragment the page swaps
//! in plus an `HX-Trigger: cart-updated` header so the badge refreshes.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    http::StatusCode,
    response::{AppendHeaders, IntoResponse, Response},
};
use huerta_core::{AddOutcome, AddSource, Cart, CartLineItem, ProductId, format_grams};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::filters;
use crate::models::session::{load_cart, save_cart};

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: String,
    pub title: String,
    pub quantity: i64,
    pub quantity_text: String,
    pub unit_price_text: String,
    pub subtotal_text: String,
    pub is_fractional: bool,
    pub unit: String,
    /// Quantity delta applied by the +/- buttons (grams for weighed lines).
    pub step: i64,
}

impl From<&CartLineItem> for CartItemView {
    fn from(line: &CartLineItem) -> Self {
        let (unit_label, step) = if line.is_weighed() {
            ("kg", 100)
        } else {
            (line.unit.as_str(), 1)
        };
        Self {
            id: line.id.to_string(),
            title: line.title.clone(),
            quantity: line.quantity,
            quantity_text: line.quantity_text(),
            unit_price_text: format!("${:.2}/{unit_label}", line.unit_price),
            subtotal_text: format!("${:.2}", line.subtotal()),
            is_fractional: line.is_fractional,
            unit: line.unit.clone(),
            step,
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: usize,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: "$0.00".to_string(),
            item_count: 0,
        }
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            total: format!("${}", cart.summary().total_text()),
            item_count: cart.len(),
        }
    }
}

/// A one-line user notice, rendered inline or as an HTMX fragment.
#[derive(Clone)]
pub struct NoticeView {
    pub message: String,
    pub is_error: bool,
}

impl NoticeView {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: false,
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: true,
        }
    }
}

/// Add to cart form data (catalog card). Field names match the catalog
/// markup, which carries the legacy names.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub id: String,
    pub titulo: String,
    pub precio: Decimal,
    pub cantidad: Option<i64>,
    #[serde(rename = "esFraccionado", default)]
    pub es_fraccionado: bool,
    pub unidad: Option<String>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub id: String,
    pub delta: i64,
    #[serde(rename = "esFraccionado", default)]
    pub es_fraccionado: bool,
    pub unidad: String,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub id: String,
    #[serde(rename = "esFraccionado", default)]
    pub es_fraccionado: bool,
    pub unidad: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub notice: Option<NoticeView>,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
    pub notice: Option<NoticeView>,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: usize,
}

/// Standalone notice fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/notice.html")]
pub struct NoticeTemplate {
    pub notice: NoticeView,
}

/// Word the confirmation notice for an add.
fn add_notice_text(title: &str, unit: &str, weighed: bool, outcome: AddOutcome) -> String {
    if !outcome.new_line {
        return format!("✓ {title}: cantidad actualizada en el carrito");
    }
    if weighed {
        format!("✓ {title}: {} agregado al carrito", format_grams(outcome.added))
    } else if outcome.added == 1 {
        format!("✓ {title}: 1 {unit} agregado al carrito")
    } else {
        format!("✓ {title}: {} {unit} agregados al carrito", outcome.added)
    }
}

/// Fragment returned when persisting the cart fails.
fn save_failed() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        NoticeTemplate {
            notice: NoticeView::error("No se pudo guardar el carrito. Intente nuevamente."),
        },
    )
        .into_response()
}

/// Display cart page.
#[instrument(skip(session))]
pub async fn show(session: Session) -> impl IntoResponse {
    let cart = load_cart(&session).await;
    CartShowTemplate {
        cart: CartView::from(&cart),
        notice: None,
    }
}

/// Get cart items fragment (HTMX).
#[instrument(skip(session))]
pub async fn items(session: Session) -> impl IntoResponse {
    let cart = load_cart(&session).await;
    CartItemsTemplate {
        cart: CartView::from(&cart),
        notice: None,
    }
}

/// Get cart count badge (HTMX).
///
/// The badge counts distinct lines, not the summed quantity: a weighed
/// line holding 1500 g still counts as one.
#[instrument(skip(session))]
pub async fn count(session: Session) -> impl IntoResponse {
    let cart = load_cart(&session).await;
    CartCountTemplate { count: cart.len() }
}

/// Add item to cart from a catalog card (HTMX).
///
/// Merges into an existing line when the product is already in the cart
/// under the same unit mode. Weighed products always add one kilogram
/// here; gram amounts are only chosen in the detail view. Returns a
/// notice fragment plus an HTMX trigger to update the cart badge.
#[instrument(skip(session))]
pub async fn add(session: Session, Form(form): Form<AddToCartForm>) -> Response {
    if form.cantidad.is_some_and(|quantity| quantity <= 0) {
        return (
            StatusCode::BAD_REQUEST,
            NoticeTemplate {
                notice: NoticeView::error("Ingrese una cantidad válida."),
            },
        )
            .into_response();
    }

    let item = CartLineItem {
        id: ProductId::from(form.id),
        title: form.titulo,
        unit_price: form.precio,
        quantity: form.cantidad.unwrap_or(1),
        is_fractional: form.es_fraccionado,
        unit: form.unidad.unwrap_or_else(|| "unidad".to_string()),
    };
    let title = item.title.clone();
    let unit = item.unit.clone();
    let weighed = item.is_weighed();

    let mut cart = load_cart(&session).await;
    let outcome = cart.add_item(item, AddSource::CatalogCard);

    if let Err(e) = save_cart(&session, &cart).await {
        tracing::error!("Failed to persist cart after add: {e}");
        return save_failed();
    }

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        NoticeTemplate {
            notice: NoticeView::success(add_notice_text(&title, &unit, weighed, outcome)),
        },
    )
        .into_response()
}

/// Update cart item quantity by a delta (HTMX).
///
/// Clamps at the line's minimum (50 g weighed, 1 otherwise) and never
/// removes the line; removal is an explicit, separate action.
#[instrument(skip(session))]
pub async fn update(session: Session, Form(form): Form<UpdateCartForm>) -> Response {
    let mut cart = load_cart(&session).await;
    let changed = cart.change_quantity(
        &ProductId::from(form.id),
        form.delta,
        form.es_fraccionado,
        &form.unidad,
    );

    if changed {
        if let Err(e) = save_cart(&session, &cart).await {
            tracing::error!("Failed to persist cart after update: {e}");
            return save_failed();
        }
    }

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::from(&cart),
            notice: None,
        },
    )
        .into_response()
}

/// Remove item from cart (HTMX).
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<RemoveFromCartForm>) -> Response {
    let mut cart = load_cart(&session).await;
    let removed = cart.remove_item(&ProductId::from(form.id), form.es_fraccionado, &form.unidad);

    if removed.is_some() {
        if let Err(e) = save_cart(&session, &cart).await {
            tracing::error!("Failed to persist cart after remove: {e}");
            return save_failed();
        }
    }

    let notice = removed.map(|line| NoticeView::success(format!("{} eliminado del carrito", line.title)));
    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::from(&cart),
            notice,
        },
    )
        .into_response()
}

/// Empty the cart (HTMX).
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Response {
    let mut cart = load_cart(&session).await;
    cart.clear();

    if let Err(e) = save_cart(&session, &cart).await {
        tracing::error!("Failed to persist cart after clear: {e}");
        return save_failed();
    }

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::empty(),
            notice: Some(NoticeView::success("Carrito vaciado")),
        },
    )
        .into_response()
}
