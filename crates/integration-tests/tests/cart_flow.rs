//! Integration tests for the cart, end to end through the core API.
//!
//! These cover the whole life of a cart: loading legacy persisted data,
//! adding from both entry points, adjusting quantities, and producing the
//! order summary that checkout sends over WhatsApp.

use huerta_core::{AddSource, Cart, CartLineItem, ProductId};
use rust_decimal::Decimal;

fn weighed(id: i64, title: &str, price: i64, grams: i64) -> CartLineItem {
    CartLineItem {
        id: ProductId::from(id),
        title: title.to_string(),
        unit_price: Decimal::from(price),
        quantity: grams,
        is_fractional: true,
        unit: "kg".to_string(),
    }
}

fn discrete(id: i64, title: &str, price: i64, count: i64) -> CartLineItem {
    CartLineItem {
        id: ProductId::from(id),
        title: title.to_string(),
        unit_price: Decimal::from(price),
        quantity: count,
        is_fractional: false,
        unit: "unidad".to_string(),
    }
}

// =============================================================================
// Full Shopping Flow
// =============================================================================

#[test]
fn test_full_shopping_flow() {
    let mut cart = Cart::default();

    // Catalog card: weighed products always land as one kilogram.
    cart.add_item(weighed(1, "Tomates", 96, 500), AddSource::CatalogCard);
    assert_eq!(cart.items()[0].quantity, 1000);

    // Detail view: customer picks 750 g of another product.
    cart.add_item(weighed(2, "Zanahorias", 60, 750), AddSource::DetailModal);

    // A discrete product, twice: the second add merges.
    cart.add_item(discrete(3, "Canasta verde", 500, 1), AddSource::CatalogCard);
    cart.add_item(discrete(3, "Canasta verde", 500, 1), AddSource::CatalogCard);

    assert_eq!(cart.len(), 3);

    // Nudge the tomatoes down by 100 g twice.
    let tomatoes = ProductId::from(1);
    assert!(cart.change_quantity(&tomatoes, -100, true, "kg"));
    assert!(cart.change_quantity(&tomatoes, -100, true, "kg"));
    assert_eq!(cart.items()[0].quantity, 800);

    // Summary totals: 0.8kg*96 + 0.75kg*60 + 2*500 = 76.80 + 45.00 + 1000.00
    let summary = cart.summary();
    assert_eq!(summary.total_text(), "1121.80");
    assert_eq!(summary.lines.len(), 3);
    assert_eq!(summary.lines[0], "1. Tomates - 800 g - $76.80");
    assert_eq!(summary.lines[2], "3. Canasta verde - 2 unidad - $1000.00");

    // Remove the basket and check the cart shrinks.
    let removed = cart
        .remove_item(&ProductId::from(3), false, "unidad")
        .map(|line| line.title);
    assert_eq!(removed.as_deref(), Some("Canasta verde"));
    assert_eq!(cart.len(), 2);
}

#[test]
fn test_same_product_by_weight_and_by_unit_are_independent_lines() {
    let mut cart = Cart::default();
    cart.add_item(weighed(5, "Manzanas", 80, 1000), AddSource::DetailModal);
    cart.add_item(discrete(5, "Manzanas", 80, 3), AddSource::CatalogCard);

    assert_eq!(cart.len(), 2);

    // Operating on one mode leaves the other untouched.
    cart.change_quantity(&ProductId::from(5), -1, false, "unidad");
    assert_eq!(cart.items()[0].quantity, 1000);
    assert_eq!(cart.items()[1].quantity, 2);

    cart.remove_item(&ProductId::from(5), true, "kg");
    assert_eq!(cart.len(), 1);
    assert!(!cart.items()[0].is_weighed());
}

// =============================================================================
// Persistence Round Trips
// =============================================================================

#[test]
fn test_persisted_cart_survives_reload() {
    let mut cart = Cart::default();
    cart.add_item(weighed(1, "Tomates", 96, 1500), AddSource::DetailModal);
    cart.add_item(discrete(2, "Paquete de acelga", 35, 2), AddSource::CatalogCard);

    let raw = cart.to_json();
    let reloaded = Cart::from_json(&raw).expect("persisted cart parses");

    assert_eq!(reloaded.len(), 2);
    assert_eq!(reloaded.items()[0].quantity, 1500);
    assert_eq!(reloaded.summary().total_text(), cart.summary().total_text());
}

#[test]
fn test_legacy_frontend_cart_payload_loads() {
    // Layout written by the previous frontend: numeric ids and prices,
    // Spanish field names.
    let raw = r#"[
        {"id": 7, "titulo": "Manzanas", "precio": 80.5, "cantidad": 2, "esFraccionado": false, "unidad": "unidad"},
        {"id": "3", "titulo": "Tomates", "precio": 96, "cantidad": 750, "esFraccionado": true, "unidad": "kg"}
    ]"#;

    let cart = Cart::from_json(raw).expect("legacy cart parses");
    assert_eq!(cart.len(), 2);

    // String and numeric ids compare equal.
    assert_eq!(cart.items()[1].id, ProductId::from(3));
    assert!(cart.items()[1].is_weighed());

    // 2 * 80.50 + 0.75 * 96 = 161.00 + 72.00
    assert_eq!(cart.summary().total_text(), "233.00");
}

#[test]
fn test_malformed_payloads_are_rejected_not_partially_loaded() {
    assert!(Cart::from_json("").is_none());
    assert!(Cart::from_json("{\"id\": 1}").is_none());
    assert!(Cart::from_json("[{\"id\": 1}]").is_none());
    assert!(Cart::from_json("[]").is_some());
}

// =============================================================================
// Clamping Invariants
// =============================================================================

#[test]
fn test_quantities_never_fall_below_their_floor() {
    let mut cart = Cart::default();
    cart.add_item(weighed(1, "Papas", 40, 100), AddSource::DetailModal);
    cart.add_item(discrete(2, "Huevos", 200, 1), AddSource::CatalogCard);

    for _ in 0..10 {
        cart.change_quantity(&ProductId::from(1), -500, true, "kg");
        cart.change_quantity(&ProductId::from(2), -3, false, "unidad");
    }

    // Clamped, never removed.
    assert_eq!(cart.len(), 2);
    assert_eq!(cart.items()[0].quantity, 50);
    assert_eq!(cart.items()[1].quantity, 1);
}
