//! Integration tests for WhatsApp order message and deep-link building.
//!
//! These run the same path the checkout handler does: validate the
//! customer form, summarize the cart, format the message, and build the
//! `wa.me` link.

use chrono::{Local, TimeZone};
use huerta_core::{AddSource, Cart, CartLineItem, ProductId};
use huerta_storefront::services::whatsapp::{
    CheckoutError, CustomerInfo, PaymentMethod, build_order_message, order_link,
};
use rust_decimal::Decimal;

fn sample_cart() -> Cart {
    let mut cart = Cart::default();
    cart.add_item(
        CartLineItem {
            id: ProductId::from(1),
            title: "Tomates".to_string(),
            unit_price: Decimal::from(96),
            quantity: 1500,
            is_fractional: true,
            unit: "kg".to_string(),
        },
        AddSource::DetailModal,
    );
    cart.add_item(
        CartLineItem {
            id: ProductId::from(2),
            title: "Canasta verde".to_string(),
            unit_price: Decimal::from(500),
            quantity: 1,
            is_fractional: false,
            unit: "unidad".to_string(),
        },
        AddSource::CatalogCard,
    );
    cart
}

fn customer() -> CustomerInfo {
    CustomerInfo::validate(
        " Ana Pérez ",
        "099123456",
        "Av. Rivera 1234, apto 5",
        Some("Dejar con el portero"),
        PaymentMethod::Transferencia,
    )
    .expect("valid customer")
}

// =============================================================================
// Message Content
// =============================================================================

#[test]
fn test_order_message_carries_every_section() {
    let at = Local.with_ymd_and_hms(2025, 3, 7, 18, 30, 0).single().expect("valid date");
    let message = build_order_message(&customer(), &sample_cart().summary(), at);

    assert!(message.starts_with("Hola! Quiero hacer un pedido.\n\n"));
    assert!(message.contains("*PEDIDO* - 07/03/2025 a las 06:30 PM\n"));

    // Validation trimmed the name.
    assert!(message.contains("*Cliente:* Ana Pérez\n"));
    assert!(message.contains("*Telefono:* 099123456\n"));
    assert!(message.contains("*Direccion:* Av. Rivera 1234, apto 5\n"));
    assert!(message.contains("*Observaciones:* Dejar con el portero\n"));

    assert!(message.contains("*PRODUCTOS:*\n"));
    assert!(message.contains("1. Tomates - 1.50 kg - $144.00\n"));
    assert!(message.contains("2. Canasta verde - 1 unidad - $500.00\n"));
    assert!(message.contains("*TOTAL:* $644.00\n"));
    assert!(message.contains("*Pago:* Transferencia Bancaria\n"));
    assert!(message.contains("precios son aproximados"));
}

#[test]
fn test_order_link_round_trips_the_message() {
    let at = Local.with_ymd_and_hms(2025, 3, 7, 18, 30, 0).single().expect("valid date");
    let message = build_order_message(&customer(), &sample_cart().summary(), at);

    let link = order_link("59892313925", &message).expect("valid link");
    assert_eq!(link.host_str(), Some("wa.me"));
    assert_eq!(link.path(), "/+59892313925");

    // The text parameter decodes back to the exact message.
    let (_, decoded) = link
        .query_pairs()
        .find(|(key, _)| key == "text")
        .expect("text parameter present");
    assert_eq!(decoded, message);
}

// =============================================================================
// Validation Gate
// =============================================================================

#[test]
fn test_checkout_rejects_incomplete_forms() {
    let missing = CustomerInfo::validate("", "099123456", "Rivera 1234", None, PaymentMethod::Efectivo);
    assert_eq!(missing.unwrap_err(), CheckoutError::MissingFields);

    let short_phone =
        CustomerInfo::validate("Ana", "1234567", "Rivera 1234", None, PaymentMethod::Efectivo);
    assert_eq!(short_phone.unwrap_err(), CheckoutError::InvalidPhone);
}

#[test]
fn test_empty_cart_summary_still_formats() {
    let at = Local.with_ymd_and_hms(2025, 3, 7, 18, 30, 0).single().expect("valid date");
    let message = build_order_message(&customer(), &Cart::default().summary(), at);

    // The handler blocks empty carts before this point; the formatter
    // still produces a well-formed message.
    assert!(message.contains("No hay productos en el carrito"));
    assert!(message.contains("*TOTAL:* $0.00\n"));
}
