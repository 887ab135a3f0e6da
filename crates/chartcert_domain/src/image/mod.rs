pub mod r#ref;

pub use r#ref::{ParsedReference, DEFAULT_VERSION};
