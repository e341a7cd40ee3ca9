//! HTTP request handlers.
//!
//! - [`animals`]: animal selection
//! - [`uploads`]: multipart file upload to the upload directory
//! - [`static_assets`]: the page and its embedded assets

pub mod animals;
pub mod static_assets;
pub mod uploads;
