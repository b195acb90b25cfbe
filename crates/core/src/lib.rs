//! Huerta Core - Shared domain library.
//!
//! This crate provides the types shared across La Huerta components:
//! - `storefront` - Public-facing storefront site
//! - `integration-tests` - Cross-crate behavioral tests
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP,
//! no sessions. The cart subsystem in [`cart`] is the single source of
//! truth for line-item semantics; the storefront crate only decides where
//! the serialized cart lives and how it is rendered.
//!
//! # Modules
//!
//! - [`types`] - Product identifiers and shared newtypes
//! - [`cart`] - Cart line items, merge/clamp rules, and order summaries

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::*;
pub use types::*;
