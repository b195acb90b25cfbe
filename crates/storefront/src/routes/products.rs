//! Product detail route handlers.
//!
//! The catalog service renders the listing pages; the storefront only
//! serves the quick-view fragment (HTMX) and the add-from-detail action,
//! both backed by the catalog API client.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{AppendHeaders, IntoResponse, Response},
};
use huerta_core::{AddSource, CartLineItem, ProductId};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::catalog::{CatalogError, ProductDetail};
use crate::models::session::{load_cart, save_cart};
use crate::routes::cart::{NoticeTemplate, NoticeView};
use crate::state::AppState;

/// Product display data for the quick-view fragment.
#[derive(Clone)]
pub struct ProductView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price_text: String,
    /// "por kg", "por unidad", "por paquete".
    pub per_unit_text: String,
    /// Short badge next to the price ("KILO" for weighed products).
    pub badge: String,
    pub images: Vec<String>,
    pub weighed: bool,
    /// Suffix shown inside the quantity input ("g", "unid", ...).
    pub unit_suffix: String,
    pub min: i64,
    pub max: i64,
    pub step: i64,
    pub default_quantity: i64,
    pub presets: Vec<PresetView>,
}

/// One preset quantity button.
#[derive(Clone)]
pub struct PresetView {
    pub value: i64,
    pub label: String,
}

fn preset_label(value: i64, weighed: bool) -> String {
    if !weighed {
        return value.to_string();
    }
    if value >= 1000 {
        format!("{}kg", value / 1000)
    } else {
        format!("{value}g")
    }
}

fn unit_suffix(product: &ProductDetail) -> String {
    if product.is_weighed() {
        return "g".to_string();
    }
    match product.unit.as_str() {
        "unidad" => "unid".to_string(),
        "kg" => "kg".to_string(),
        _ => {
            let lower = product.unit_display.to_lowercase();
            if lower.chars().count() > 6 {
                let short: String = lower.chars().take(5).collect();
                format!("{short}.")
            } else {
                lower
            }
        }
    }
}

impl From<&ProductDetail> for ProductView {
    fn from(product: &ProductDetail) -> Self {
        let weighed = product.is_weighed();
        let bounds = product.quantity_bounds();
        let description = if product.description.trim().is_empty() {
            "Este producto no tiene descripción.".to_string()
        } else {
            product.description.clone()
        };
        Self {
            id: product.id.to_string(),
            title: product.title.clone(),
            description,
            price_text: format!("${:.2}", product.final_price),
            per_unit_text: if weighed {
                "por kg".to_string()
            } else {
                format!("por {}", product.unit_display.to_lowercase())
            },
            badge: if weighed {
                "KILO".to_string()
            } else {
                product.unit_display.clone()
            },
            images: product.display_images(),
            weighed,
            unit_suffix: unit_suffix(product),
            min: bounds.min,
            max: bounds.max,
            step: bounds.step,
            default_quantity: bounds.default,
            presets: product
                .quantity_presets()
                .iter()
                .map(|&value| PresetView {
                    value,
                    label: preset_label(value, weighed),
                })
                .collect(),
        }
    }
}

/// Add-from-detail form data: just the chosen quantity. Everything else
/// comes from the catalog, so a stale or tampered form cannot change the
/// stored price.
#[derive(Debug, Deserialize)]
pub struct DetailAddForm {
    pub cantidad: i64,
}

/// Product quick-view fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/quick_view.html")]
pub struct QuickViewTemplate {
    pub product: ProductView,
}

fn catalog_error_response(id: &ProductId, error: &CatalogError) -> Response {
    match error {
        CatalogError::NotFound => (
            StatusCode::NOT_FOUND,
            NoticeTemplate {
                notice: NoticeView::error("Producto no encontrado."),
            },
        )
            .into_response(),
        e => {
            tracing::error!("Failed to fetch product {id}: {e}");
            (
                StatusCode::BAD_GATEWAY,
                NoticeTemplate {
                    notice: NoticeView::error("Error al cargar el producto. Intente nuevamente."),
                },
            )
                .into_response()
        }
    }
}

/// Display product quick-view fragment (HTMX).
#[instrument(skip(state))]
pub async fn quick_view(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let id = ProductId::from(id);
    match state.catalog().get_product(&id).await {
        Ok(product) => QuickViewTemplate {
            product: ProductView::from(&product),
        }
        .into_response(),
        Err(e) => catalog_error_response(&id, &e),
    }
}

/// Add item to cart from the detail view (HTMX).
///
/// The quantity is the customer's choice, snapped into the product's
/// bounds; there is no kilogram override here. The stored unit price is
/// the catalog's current per-unit price, re-fetched server-side.
#[instrument(skip(state, session))]
pub async fn add_from_detail(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Form(form): Form<DetailAddForm>,
) -> Response {
    if form.cantidad <= 0 {
        return (
            StatusCode::BAD_REQUEST,
            NoticeTemplate {
                notice: NoticeView::error("Ingrese una cantidad válida."),
            },
        )
            .into_response();
    }

    let id = ProductId::from(id);
    let product = match state.catalog().get_product(&id).await {
        Ok(product) => product,
        Err(e) => return catalog_error_response(&id, &e),
    };

    let quantity = product.clamp_quantity(form.cantidad);
    let quantity_price = product.price_for_quantity(quantity);
    let item = CartLineItem {
        id: product.id.clone(),
        title: product.title.clone(),
        unit_price: product.final_price,
        quantity,
        is_fractional: product.fractional,
        unit: product.unit.clone(),
    };
    let quantity_display = item.quantity_text();

    let mut cart = load_cart(&session).await;
    cart.add_item(item, AddSource::DetailModal);

    if let Err(e) = save_cart(&session, &cart).await {
        tracing::error!("Failed to persist cart after detail add: {e}");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            NoticeTemplate {
                notice: NoticeView::error("No se pudo guardar el carrito. Intente nuevamente."),
            },
        )
            .into_response();
    }

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        NoticeTemplate {
            notice: NoticeView::success(format!(
                "¡Agregado! {} ({quantity_display}) - ${quantity_price:.2}",
                product.title
            )),
        },
    )
        .into_response()
}
