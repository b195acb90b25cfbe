//! External service integrations.

pub mod whatsapp;
