use crate::catalog::CatalogError;
use serde::{Deserialize, Serialize};

/// Prefix of every diagnostic line for an image that failed certification.
pub const IMAGE_NOT_CERTIFIED: &str = "Image is not certified";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Certified,
    NotCertified,
    /// The catalog could not be consulted, so no verdict was reached.
    Indeterminate,
}

/// Result of certifying one image reference. Built once, never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificationOutcome {
    pub reference: String,
    pub verdict: Verdict,
    pub matched_registry: Option<String>,
    /// Tags the heuristic thinks may correspond to the requested version.
    pub candidates: Vec<String>,
    pub error_detail: Option<String>,
}

impl CertificationOutcome {
    pub fn certified(reference: &str, registry: &str) -> Self {
        Self {
            reference: reference.to_string(),
            verdict: Verdict::Certified,
            matched_registry: Some(registry.to_string()),
            candidates: Vec::new(),
            error_detail: None,
        }
    }

    pub fn not_certified(reference: &str, reason: &str, candidates: Vec<String>) -> Self {
        Self {
            reference: reference.to_string(),
            verdict: Verdict::NotCertified,
            matched_registry: None,
            candidates,
            error_detail: Some(format!("{} : {} : {}", IMAGE_NOT_CERTIFIED, reference, reason)),
        }
    }

    pub fn indeterminate(reference: &str, error: &CatalogError) -> Self {
        Self {
            reference: reference.to_string(),
            verdict: Verdict::Indeterminate,
            matched_registry: None,
            candidates: Vec::new(),
            error_detail: Some(error.to_string()),
        }
    }

    pub fn found(&self) -> bool {
        self.verdict == Verdict::Certified
    }
}
