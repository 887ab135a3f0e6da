//! The image certification check as seen by a chart verification run.

pub mod check;
pub mod manifest;
pub mod render;

pub use check::{certify_images, certify_images_with, CheckError};
pub use manifest::extract_images;
pub use render::{ManifestRenderer, PreRenderedManifests, RenderError};
