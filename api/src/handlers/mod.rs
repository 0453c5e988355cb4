//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.

pub mod form;
pub mod process;

pub use form::upload_form;
pub use process::process_images;
