//! Image reference parsing and catalog certification for rendered charts.

pub mod cancel;
pub mod catalog;
pub mod certification;
pub mod image;

pub use cancel::{CancelHandle, Cancellation};
pub use catalog::{CatalogError, CatalogErrorKind, CatalogRepository, CatalogSource, CatalogTag};
pub use certification::{
    discover_candidates, CertificationMatcher, CertificationOutcome, CheckResult, DiscoveryReport, Verdict,
    VerdictError, IMAGE_NOT_CERTIFIED, NO_IMAGES_TO_CERTIFY,
};
pub use image::ParsedReference;
