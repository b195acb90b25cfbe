//! Cart line items and the merge/clamp rules that govern them.
//!
//! The cart is a flat list of [`CartLineItem`] values. Line identity is the
//! triple `(id, is_fractional, unit)`, so the same product can legitimately
//! sit in the cart twice under different unit modes (once by weight, once
//! as whole units). Weighed products track their quantity in grams.
//!
//! Serialization uses the legacy persisted field names (`titulo`, `precio`,
//! `cantidad`, `esFraccionado`, `unidad`) so carts written by earlier
//! frontends keep loading.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// Minimum quantity for a weighed (fractional kg) line, in grams.
pub const MIN_GRAMS: i64 = 50;

/// Minimum quantity for a discrete line.
pub const MIN_UNITS: i64 = 1;

/// Quantity added when a weighed product comes from a catalog card.
///
/// Catalog-card "add" always means one full kilogram for weighed goods;
/// only the detail modal lets the customer pick a gram amount.
pub const CATALOG_CARD_GRAMS: i64 = 1000;

/// Summary line shown for an empty cart.
pub const EMPTY_CART_TEXT: &str = "No hay productos en el carrito";

/// One entry in the cart: a product/unit-mode combination and its quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLineItem {
    /// Catalog product key.
    pub id: ProductId,
    /// Display name, copied at add-time (never re-fetched).
    #[serde(rename = "titulo")]
    pub title: String,
    /// Price per unit, or per kilogram when the line is weighed.
    #[serde(rename = "precio")]
    pub unit_price: Decimal,
    /// Discrete count, or grams when the line is weighed.
    #[serde(rename = "cantidad")]
    pub quantity: i64,
    /// True when the product is sold by weight.
    #[serde(rename = "esFraccionado")]
    pub is_fractional: bool,
    /// Unit label ("unidad", "kg", "paquete").
    #[serde(rename = "unidad")]
    pub unit: String,
}

impl CartLineItem {
    /// Whether this line is priced per kilogram with grams as quantity.
    #[must_use]
    pub fn is_weighed(&self) -> bool {
        self.is_fractional && self.unit == "kg"
    }

    /// The floor this line's quantity clamps to.
    #[must_use]
    pub fn minimum_quantity(&self) -> i64 {
        if self.is_weighed() { MIN_GRAMS } else { MIN_UNITS }
    }

    /// Line subtotal: `price * kg` for weighed lines, `price * count`
    /// otherwise.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        if self.is_weighed() {
            self.unit_price * Decimal::from(self.quantity) / Decimal::from(1000)
        } else {
            self.unit_price * Decimal::from(self.quantity)
        }
    }

    /// Human-readable quantity ("1.50 kg", "750 g", "3 unidad").
    #[must_use]
    pub fn quantity_text(&self) -> String {
        if self.is_weighed() {
            format_grams(self.quantity)
        } else {
            format!("{} {}", self.quantity, self.unit)
        }
    }

    fn matches(&self, id: &ProductId, is_fractional: bool, unit: &str) -> bool {
        self.id == *id && self.is_fractional == is_fractional && self.unit == unit
    }
}

/// Format a gram quantity for display.
///
/// At or above 1000 g the amount renders in kilograms with two decimals;
/// below that, in whole grams.
#[must_use]
pub fn format_grams(grams: i64) -> String {
    if grams >= 1000 {
        let kg = Decimal::from(grams) / Decimal::from(1000);
        format!("{kg:.2} kg")
    } else {
        format!("{grams} g")
    }
}

/// Where an add-to-cart request came from.
///
/// Catalog-card adds of weighed products are overridden to exactly one
/// kilogram; detail-modal adds keep the customer-chosen gram amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddSource {
    CatalogCard,
    DetailModal,
}

/// Result of an add operation, used to word the confirmation notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddOutcome {
    /// The quantity actually added (after any catalog-card override).
    pub added: i64,
    /// True when a new line was appended rather than merged.
    pub new_line: bool,
}

/// Human-readable cart summary for the cart view and the order message.
#[derive(Debug, Clone)]
pub struct OrderSummary {
    /// One numbered line per item: `1. Manzanas - 1.50 kg - $45.00`.
    pub lines: Vec<String>,
    /// Grand total.
    pub total: Decimal,
}

impl OrderSummary {
    /// Total formatted to two decimal places.
    #[must_use]
    pub fn total_text(&self) -> String {
        format!("{:.2}", self.total)
    }

    /// Newline-joined body, or the designated empty message.
    #[must_use]
    pub fn body_text(&self) -> String {
        if self.lines.is_empty() {
            EMPTY_CART_TEXT.to_string()
        } else {
            self.lines.join("\n")
        }
    }
}

/// The cart: a flat, ordered list of line items.
///
/// Serializes transparently as a JSON array, matching the persisted layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    /// Parse a persisted cart. Returns `None` on malformed data so the
    /// caller can self-heal to an empty cart.
    #[must_use]
    pub fn from_json(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }

    /// Serialize for persistence.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.items).unwrap_or_else(|_| "[]".to_string())
    }

    /// The line items, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Number of distinct lines (this is what the badge shows).
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add a line, merging into an existing `(id, is_fractional, unit)`
    /// match when present.
    ///
    /// Weighed products added from a catalog card always add exactly
    /// [`CATALOG_CARD_GRAMS`], whatever quantity the caller supplied.
    /// The quantity floors at the line's minimum, so no add can produce
    /// a zero or negative line.
    pub fn add_item(&mut self, mut item: CartLineItem, source: AddSource) -> AddOutcome {
        if source == AddSource::CatalogCard && item.is_weighed() {
            item.quantity = CATALOG_CARD_GRAMS;
        }
        let minimum = item.minimum_quantity();
        if item.quantity < minimum {
            item.quantity = minimum;
        }
        let added = item.quantity;

        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|line| line.matches(&item.id, item.is_fractional, &item.unit))
        {
            existing.quantity = existing.quantity.saturating_add(added);
            AddOutcome {
                added,
                new_line: false,
            }
        } else {
            self.items.push(item);
            AddOutcome {
                added,
                new_line: true,
            }
        }
    }

    /// Add `delta` to the matching line's quantity, clamping at the line's
    /// minimum. Never removes the line. Returns false when no line matches.
    pub fn change_quantity(
        &mut self,
        id: &ProductId,
        delta: i64,
        is_fractional: bool,
        unit: &str,
    ) -> bool {
        let Some(item) = self
            .items
            .iter_mut()
            .find(|line| line.matches(id, is_fractional, unit))
        else {
            return false;
        };

        item.quantity = item.quantity.saturating_add(delta);
        let minimum = item.minimum_quantity();
        if item.quantity < minimum {
            item.quantity = minimum;
        }
        true
    }

    /// Remove the matching line, returning it so the caller can name the
    /// product in the removal notice.
    pub fn remove_item(
        &mut self,
        id: &ProductId,
        is_fractional: bool,
        unit: &str,
    ) -> Option<CartLineItem> {
        let index = self
            .items
            .iter()
            .position(|line| line.matches(id, is_fractional, unit))?;
        Some(self.items.remove(index))
    }

    /// Empty the cart unconditionally.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Build the numbered summary and grand total.
    #[must_use]
    pub fn summary(&self) -> OrderSummary {
        let mut total = Decimal::ZERO;
        let lines = self
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let subtotal = item.subtotal();
                total += subtotal;
                format!(
                    "{}. {} - {} - ${subtotal:.2}",
                    index + 1,
                    item.title,
                    item.quantity_text()
                )
            })
            .collect();
        OrderSummary { lines, total }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

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

    #[test]
    fn test_add_same_line_merges_quantities() {
        let mut cart = Cart::default();
        cart.add_item(discrete(1, "Manzanas", 80, 2), AddSource::CatalogCard);
        let outcome = cart.add_item(discrete(1, "Manzanas", 80, 3), AddSource::CatalogCard);

        assert!(!outcome.new_line);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].quantity, 5);
    }

    #[test]
    fn test_same_product_in_two_unit_modes_stays_two_lines() {
        let mut cart = Cart::default();
        cart.add_item(weighed(1, "Manzanas", 80, 500), AddSource::DetailModal);
        let outcome = cart.add_item(discrete(1, "Manzanas", 80, 5), AddSource::CatalogCard);

        assert!(outcome.new_line);
        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn test_catalog_card_add_of_weighed_product_is_always_one_kilogram() {
        let mut cart = Cart::default();
        let outcome = cart.add_item(weighed(2, "Zanahorias", 60, 250), AddSource::CatalogCard);

        assert_eq!(outcome.added, 1000);
        assert_eq!(cart.items()[0].quantity, 1000);

        // Merging path gets the override too.
        cart.add_item(weighed(2, "Zanahorias", 60, 7), AddSource::CatalogCard);
        assert_eq!(cart.items()[0].quantity, 2000);
    }

    #[test]
    fn test_detail_modal_add_keeps_chosen_grams() {
        let mut cart = Cart::default();
        let outcome = cart.add_item(weighed(2, "Zanahorias", 60, 750), AddSource::DetailModal);

        assert_eq!(outcome.added, 750);
        assert_eq!(cart.items()[0].quantity, 750);
    }

    #[test]
    fn test_decrement_weighed_line_clamps_at_fifty_grams() {
        let mut cart = Cart::default();
        cart.add_item(weighed(3, "Papas", 40, 100), AddSource::DetailModal);

        let id = ProductId::from(3);
        cart.change_quantity(&id, -100, true, "kg");
        assert_eq!(cart.items()[0].quantity, MIN_GRAMS);

        // A further decrement stays clamped; the line is never removed.
        cart.change_quantity(&id, -100, true, "kg");
        assert_eq!(cart.items()[0].quantity, MIN_GRAMS);
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_decrement_discrete_line_clamps_at_one() {
        let mut cart = Cart::default();
        cart.add_item(discrete(4, "Canasta", 500, 2), AddSource::CatalogCard);

        let id = ProductId::from(4);
        cart.change_quantity(&id, -1, false, "unidad");
        cart.change_quantity(&id, -1, false, "unidad");
        assert_eq!(cart.items()[0].quantity, MIN_UNITS);
    }

    #[test]
    fn test_add_with_nonpositive_quantity_floors_at_the_minimum() {
        let mut cart = Cart::default();
        let outcome = cart.add_item(discrete(1, "Manzanas", 80, 0), AddSource::CatalogCard);
        assert_eq!(outcome.added, MIN_UNITS);
        assert_eq!(cart.items()[0].quantity, MIN_UNITS);

        // The merge path cannot drive an existing line to zero or below.
        cart.add_item(discrete(1, "Manzanas", 80, -5), AddSource::CatalogCard);
        assert_eq!(cart.items()[0].quantity, 2);

        let outcome = cart.add_item(weighed(2, "Tomates", 96, -100), AddSource::DetailModal);
        assert_eq!(outcome.added, MIN_GRAMS);
        assert_eq!(cart.items()[1].quantity, MIN_GRAMS);
    }

    #[test]
    fn test_extreme_deltas_saturate_instead_of_overflowing() {
        let mut cart = Cart::default();
        cart.add_item(discrete(8, "Huevos", 200, 2), AddSource::CatalogCard);

        let id = ProductId::from(8);
        cart.change_quantity(&id, i64::MAX, false, "unidad");
        assert_eq!(cart.items()[0].quantity, i64::MAX);

        cart.add_item(discrete(8, "Huevos", 200, i64::MAX), AddSource::CatalogCard);
        assert_eq!(cart.items()[0].quantity, i64::MAX);

        cart.change_quantity(&id, i64::MIN, false, "unidad");
        assert_eq!(cart.items()[0].quantity, MIN_UNITS);
    }

    #[test]
    fn test_change_quantity_is_noop_for_missing_line() {
        let mut cart = Cart::default();
        assert!(!cart.change_quantity(&ProductId::from(9), 1, false, "unidad"));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_returns_the_removed_line() {
        let mut cart = Cart::default();
        cart.add_item(discrete(5, "Combo familiar", 900, 1), AddSource::CatalogCard);

        let removed = cart.remove_item(&ProductId::from(5), false, "unidad");
        assert_eq!(removed.unwrap().title, "Combo familiar");
        assert!(cart.is_empty());

        assert!(cart.remove_item(&ProductId::from(5), false, "unidad").is_none());
    }

    #[test]
    fn test_summary_weighed_line() {
        let mut cart = Cart::default();
        cart.add_item(weighed(6, "Boniatos", 10, 1500), AddSource::DetailModal);

        let summary = cart.summary();
        assert_eq!(summary.total_text(), "15.00");
        assert!(summary.lines[0].contains("1.50 kg"));
        assert!(summary.lines[0].contains("$15.00"));
    }

    #[test]
    fn test_summary_empty_cart() {
        let summary = Cart::default().summary();
        assert_eq!(summary.total_text(), "0.00");
        assert_eq!(summary.body_text(), EMPTY_CART_TEXT);
    }

    #[test]
    fn test_summary_mixes_weighed_and_discrete_lines() {
        let mut cart = Cart::default();
        cart.add_item(weighed(6, "Boniatos", 10, 500), AddSource::DetailModal);
        cart.add_item(discrete(7, "Paquete de acelga", 35, 2), AddSource::CatalogCard);

        let summary = cart.summary();
        assert_eq!(summary.lines.len(), 2);
        assert!(summary.lines[0].starts_with("1. Boniatos - 500 g"));
        assert!(summary.lines[1].starts_with("2. Paquete de acelga - 2 unidad"));
        assert_eq!(summary.total_text(), "75.00");
    }

    #[test]
    fn test_format_grams_boundaries() {
        assert_eq!(format_grams(999), "999 g");
        assert_eq!(format_grams(1000), "1.00 kg");
        assert_eq!(format_grams(1500), "1.50 kg");
        assert_eq!(format_grams(50), "50 g");
    }

    #[test]
    fn test_malformed_json_yields_none() {
        assert!(Cart::from_json("not json").is_none());
        assert!(Cart::from_json("{\"id\": 1}").is_none());
        assert!(Cart::from_json("[]").is_some());
    }

    #[test]
    fn test_legacy_persisted_layout_round_trips() {
        let raw = r#"[{"id":7,"titulo":"Manzanas","precio":"80","cantidad":1500,"esFraccionado":true,"unidad":"kg"}]"#;
        let cart = Cart::from_json(raw).unwrap();
        assert_eq!(cart.len(), 1);
        assert!(cart.items()[0].is_weighed());

        let rewritten = Cart::from_json(&cart.to_json()).unwrap();
        assert_eq!(rewritten.items()[0].quantity, 1500);
    }

    #[test]
    fn test_legacy_numeric_price_and_string_id_still_load() {
        let raw = r#"[{"id":"7","titulo":"Manzanas","precio":80.5,"cantidad":2,"esFraccionado":false,"unidad":"unidad"}]"#;
        let cart = Cart::from_json(raw).unwrap();
        assert_eq!(cart.items()[0].id, ProductId::from(7));
        assert_eq!(cart.items()[0].subtotal(), Decimal::new(161, 0));
    }
}
