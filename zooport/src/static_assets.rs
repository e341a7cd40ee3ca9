//! Embedded static assets: the page, its script, and the animal pictures.

use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "static/"]
pub struct Assets;
