//! HTML rendering
//!
//! Server-rendered pages for browser clients.

pub mod form;

pub use form::render_upload_form;
