//! Inbound side of the Cloud API
//!
//! ## Modules
//!
//! - [`whatsapp`] - Envelope types, field extraction and the callback handlers
//! - [`routes`] - Mounting of the callback handlers on an ntex app

pub mod routes;
pub mod whatsapp;
