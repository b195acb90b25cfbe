//! Checkout route handlers.
//!
//! There is no payment step: checkout validates the delivery details,
//! formats the cart into a WhatsApp order message and hands the customer
//! a `wa.me` link. The form posts over HTMX and swaps the checkout panel,
//! so validation errors re-render the form in place and a successful
//! submission replaces it with the confirmation.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Response},
};
use chrono::Local;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::AppError;
use crate::filters;
use crate::models::session::{load_cart, save_cart};
use crate::routes::cart::{CartView, NoticeView};
use crate::services::whatsapp::{
    CustomerInfo, PaymentMethod, build_order_message, normalize_number, order_link,
};
use crate::state::AppState;

/// Checkout form data.
#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    pub nombre: String,
    pub telefono: String,
    pub direccion: String,
    #[serde(default)]
    pub observaciones: Option<String>,
    #[serde(rename = "metodoPago", default)]
    pub metodo_pago: PaymentMethod,
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutShowTemplate {
    pub cart: CartView,
    pub notice: Option<NoticeView>,
}

/// Checkout panel fragment template (form + order summary, for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "checkout/panel.html")]
pub struct CheckoutPanelTemplate {
    pub cart: CartView,
    pub notice: Option<NoticeView>,
}

/// Order confirmation fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "checkout/confirmation.html")]
pub struct ConfirmationTemplate {
    pub customer_name: String,
    pub total: String,
    pub whatsapp_link: String,
    pub whatsapp_number: String,
}

/// Display checkout page.
#[instrument(skip(session))]
pub async fn show(session: Session) -> impl IntoResponse {
    let cart = load_cart(&session).await;
    CheckoutShowTemplate {
        cart: CartView::from(&cart),
        notice: None,
    }
}

/// Submit the order (HTMX).
///
/// On validation failure the checkout panel is re-rendered with the error
/// notice. On success the cart is cleared and the confirmation fragment
/// carrying the WhatsApp link replaces the panel.
#[instrument(skip(state, session, form))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CheckoutForm>,
) -> Result<Response, AppError> {
    let mut cart = load_cart(&session).await;

    let validated = if cart.is_empty() {
        Err(crate::services::whatsapp::CheckoutError::EmptyCart)
    } else {
        CustomerInfo::validate(
            &form.nombre,
            &form.telefono,
            &form.direccion,
            form.observaciones.as_deref(),
            form.metodo_pago,
        )
    };

    let customer = match validated {
        Ok(customer) => customer,
        Err(e) => {
            return Ok(CheckoutPanelTemplate {
                cart: CartView::from(&cart),
                notice: Some(NoticeView::error(e.to_string())),
            }
            .into_response());
        }
    };

    let summary = cart.summary();
    let message = build_order_message(&customer, &summary, Local::now());
    let number = &state.config().whatsapp.number;
    let link = order_link(number, &message)
        .map_err(|e| AppError::Internal(format!("invalid WhatsApp link: {e}")))?;

    // The order is now in WhatsApp's hands; the session cart has done its job.
    cart.clear();
    if let Err(e) = save_cart(&session, &cart).await {
        tracing::error!("Failed to clear cart after checkout: {e}");
    }

    Ok(ConfirmationTemplate {
        customer_name: customer.name,
        total: format!("${}", summary.total_text()),
        whatsapp_link: link.to_string(),
        whatsapp_number: normalize_number(number),
    }
    .into_response())
}
