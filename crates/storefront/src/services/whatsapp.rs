//! WhatsApp checkout messenger.
//!
//! There is no server-side order API: checkout formats the cart into a
//! plain-text order message and hands it to WhatsApp through a `wa.me`
//! deep link. The shop staff confirms availability and final pricing over
//! chat, which is why the message carries the "prices are approximate"
//! note.

use chrono::{DateTime, Local};
use huerta_core::OrderSummary;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// Minimum accepted phone number length.
pub const MIN_PHONE_LENGTH: usize = 8;

/// Payment methods offered at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Efectivo,
    Transferencia,
}

impl PaymentMethod {
    /// Label used in the order message.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Efectivo => "Efectivo",
            Self::Transferencia => "Transferencia Bancaria",
        }
    }
}

/// Checkout validation failures. Messages are shown to the customer as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("Tu carrito está vacío. Agrega productos antes de enviar el pedido.")]
    EmptyCart,
    #[error("Por favor completa todos los campos obligatorios")]
    MissingFields,
    #[error("Por favor ingresa un número de teléfono válido")]
    InvalidPhone,
}

/// Validated customer details for one order.
#[derive(Debug, Clone)]
pub struct CustomerInfo {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub notes: Option<String>,
    pub payment: PaymentMethod,
}

impl CustomerInfo {
    /// Validate raw form input. Fields are trimmed; name, phone and address
    /// are required, and the phone must have at least [`MIN_PHONE_LENGTH`]
    /// characters.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::MissingFields` or `CheckoutError::InvalidPhone`.
    pub fn validate(
        name: &str,
        phone: &str,
        address: &str,
        notes: Option<&str>,
        payment: PaymentMethod,
    ) -> Result<Self, CheckoutError> {
        let name = name.trim();
        let phone = phone.trim();
        let address = address.trim();

        if name.is_empty() || phone.is_empty() || address.is_empty() {
            return Err(CheckoutError::MissingFields);
        }
        if phone.len() < MIN_PHONE_LENGTH {
            return Err(CheckoutError::InvalidPhone);
        }

        let notes = notes
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(ToString::to_string);

        Ok(Self {
            name: name.to_string(),
            phone: phone.to_string(),
            address: address.to_string(),
            notes,
            payment,
        })
    }
}

/// Build the plain-text order message sent over WhatsApp.
#[must_use]
pub fn build_order_message(
    customer: &CustomerInfo,
    summary: &OrderSummary,
    at: DateTime<Local>,
) -> String {
    let date = at.format("%d/%m/%Y");
    let time = at.format("%I:%M %p");

    let mut message = String::from("Hola! Quiero hacer un pedido.\n\n");
    message.push_str(&format!("*PEDIDO* - {date} a las {time}\n\n"));
    message.push_str(&format!("*Cliente:* {}\n", customer.name));
    message.push_str(&format!("*Telefono:* {}\n", customer.phone));
    message.push_str(&format!("*Direccion:* {}\n", customer.address));

    if let Some(notes) = &customer.notes {
        message.push_str(&format!("*Observaciones:* {notes}\n"));
    }

    message.push_str("\n*PRODUCTOS:*\n");
    message.push_str(&summary.body_text());
    message.push('\n');
    message.push_str(&format!("*TOTAL:* ${}\n", summary.total_text()));
    message.push_str(&format!("*Pago:* {}\n\n", customer.payment.label()));
    message.push_str(
        "*Nota:* Los precios son aproximados segun las cantidades disponibles. \
         Nos pondremos en contacto al numero proporcionado para confirmar \
         disponibilidad y precio final. Muchas gracias por elegirnos!",
    );

    message
}

/// Normalize a destination number to its `+`-prefixed form.
#[must_use]
pub fn normalize_number(number: &str) -> String {
    if number.starts_with('+') {
        number.to_string()
    } else {
        format!("+{number}")
    }
}

/// Build the `wa.me` deep link carrying the order message.
///
/// # Errors
///
/// Returns `url::ParseError` if the configured number produces an invalid
/// URL; configuration validation makes this unreachable in practice.
pub fn order_link(number: &str, message: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(&format!("https://wa.me/{}", normalize_number(number)))?;
    url.query_pairs_mut().append_pair("text", message);
    Ok(url)
}
