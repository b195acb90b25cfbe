//! Catalog API response types.
//!
//! The catalog service is the source of truth for products; the storefront
//! only consumes its JSON. Wire field names are the catalog's (Spanish).

use huerta_core::ProductId;
use rust_decimal::Decimal;
use serde::Deserialize;

/// One product as served by `GET /api/producto/{id}/`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductDetail {
    pub id: ProductId,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descripcion", default)]
    pub description: String,
    /// List price, before any active discount.
    #[serde(rename = "precio")]
    pub price: Decimal,
    /// Price after discount; this is what the customer pays.
    #[serde(rename = "precio_final")]
    pub final_price: Decimal,
    /// Unit code: "unidad", "kg", "paquete".
    #[serde(rename = "unidad")]
    pub unit: String,
    #[serde(rename = "unidad_display")]
    pub unit_display: String,
    /// Primary image URL; empty when the product has none.
    #[serde(rename = "imagen", default)]
    pub image: String,
    /// Gallery image URLs. Older catalog versions omit this field.
    #[serde(rename = "imagenes", default)]
    pub images: Vec<String>,
    #[serde(rename = "fraccionado", default)]
    pub fractional: bool,
}

/// Quantity selector configuration for the detail view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityBounds {
    pub min: i64,
    pub max: i64,
    pub step: i64,
    pub default: i64,
}

/// Gram bounds for weighed products: 50 g to 5 kg in 50 g steps.
pub const WEIGHED_BOUNDS: QuantityBounds = QuantityBounds {
    min: 50,
    max: 5000,
    step: 50,
    default: 500,
};

/// Count bounds for discrete products.
pub const DISCRETE_BOUNDS: QuantityBounds = QuantityBounds {
    min: 1,
    max: 100,
    step: 1,
    default: 1,
};

/// Preset gram amounts offered in the detail view for weighed products.
pub const WEIGHED_PRESETS: &[i64] = &[250, 500, 1000, 2000, 4000];

/// Preset counts offered for discrete products.
pub const DISCRETE_PRESETS: &[i64] = &[1, 2, 3, 5, 10];

impl ProductDetail {
    /// Whether the product is sold by weight: priced per kg with the
    /// quantity tracked in grams.
    #[must_use]
    pub fn is_weighed(&self) -> bool {
        self.fractional && self.unit == "kg"
    }

    /// Quantity input bounds for the detail view.
    #[must_use]
    pub fn quantity_bounds(&self) -> QuantityBounds {
        if self.is_weighed() {
            WEIGHED_BOUNDS
        } else {
            DISCRETE_BOUNDS
        }
    }

    /// Preset quantities for the detail view.
    #[must_use]
    pub fn quantity_presets(&self) -> &'static [i64] {
        if self.is_weighed() {
            WEIGHED_PRESETS
        } else {
            DISCRETE_PRESETS
        }
    }

    /// Snap a requested quantity into bounds, rounding to the step.
    #[must_use]
    pub fn clamp_quantity(&self, requested: i64) -> i64 {
        let bounds = self.quantity_bounds();
        let stepped = if bounds.step > 1 {
            // Round to the nearest step multiple (ties round up).
            ((requested + bounds.step / 2) / bounds.step) * bounds.step
        } else {
            requested
        };
        stepped.clamp(bounds.min, bounds.max)
    }

    /// Price for a chosen quantity, as shown in the confirmation notice.
    #[must_use]
    pub fn price_for_quantity(&self, quantity: i64) -> Decimal {
        if self.is_weighed() {
            self.final_price * Decimal::from(quantity) / Decimal::from(1000)
        } else {
            self.final_price * Decimal::from(quantity)
        }
    }

    /// Gallery images, falling back to the primary image.
    #[must_use]
    pub fn display_images(&self) -> Vec<String> {
        if !self.images.is_empty() {
            self.images.clone()
        } else if !self.image.is_empty() {
            vec![self.image.clone()]
        } else {
            Vec::new()
        }
    }
}
