//! Integration tests for La Huerta.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p huerta-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_flow` - Cart operations end to end, including legacy persisted data
//! - `checkout_messages` - WhatsApp order message and deep-link building
//!
//! The tests exercise the library crates directly; they need neither a
//! running catalog service nor a `PostgreSQL` instance.

#![cfg_attr(not(test), forbid(unsafe_code))]
