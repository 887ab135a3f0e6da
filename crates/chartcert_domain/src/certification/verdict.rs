use super::matcher::CertificationMatcher;
use super::outcome::{CertificationOutcome, Verdict};
use crate::catalog::CatalogSource;
use chartcert_common::diagnostic::Diagnosable;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Reason reported for a chart that declares no images.
pub const NO_IMAGES_TO_CERTIFY: &str = "No images to certify";

/// Pass/fail result of the image certification check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub ok: bool,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerdictError {
    #[error("Could not determine certification of {reference}: {detail}")]
    Indeterminate { reference: String, detail: String },
}

impl Diagnosable for VerdictError {
    fn code(&self) -> String {
        "CERTIFICATION_INDETERMINATE".to_string()
    }

    fn suggestion(&self) -> Option<String> {
        Some("The catalog could not be consulted. Check connectivity and run the check again.".to_string())
    }
}

/// Certifies every distinct reference, in order of first appearance.
///
/// Stops at the first reference whose verdict is indeterminate, since the
/// check as a whole can no longer produce a result.
pub async fn certify_references<C, I, S>(
    matcher: &CertificationMatcher<'_, C>,
    references: I,
) -> Result<CheckResult, VerdictError>
where
    C: CatalogSource + ?Sized,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut distinct: Vec<String> = Vec::new();
    for reference in references {
        let reference = reference.as_ref();
        if !distinct.iter().any(|seen| seen == reference) {
            distinct.push(reference.to_string());
        }
    }
    info!(images = distinct.len(), "Certifying chart images");

    let mut outcomes = Vec::with_capacity(distinct.len());
    for reference in &distinct {
        let outcome = matcher.certify(reference).await;
        let indeterminate = outcome.verdict == Verdict::Indeterminate;
        outcomes.push(outcome);
        if indeterminate {
            break;
        }
    }

    fold_outcomes(&outcomes)
}

/// Collapses per-image outcomes into one check result.
pub fn fold_outcomes(outcomes: &[CertificationOutcome]) -> Result<CheckResult, VerdictError> {
    if let Some(outcome) = outcomes.iter().find(|o| o.verdict == Verdict::Indeterminate) {
        return Err(VerdictError::Indeterminate {
            reference: outcome.reference.clone(),
            detail: outcome.error_detail.clone().unwrap_or_default(),
        });
    }

    if outcomes.is_empty() {
        return Ok(CheckResult {
            ok: true,
            reasons: vec![NO_IMAGES_TO_CERTIFY.to_string()],
        });
    }

    let reasons: Vec<String> = outcomes
        .iter()
        .filter(|o| !o.found())
        .map(|o| {
            o.error_detail
                .clone()
                .unwrap_or_else(|| format!("{} : {}", super::outcome::IMAGE_NOT_CERTIFIED, o.reference))
        })
        .collect();

    Ok(CheckResult {
        ok: reasons.is_empty(),
        reasons,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogError;
    use crate::certification::fake::FakeCatalog;

    #[tokio::test]
    async fn test_chart_without_images_passes() {
        let catalog = FakeCatalog::default();
        let matcher = CertificationMatcher::new(&catalog);

        let result = certify_references(&matcher, Vec::<String>::new()).await.unwrap();

        assert!(result.ok);
        assert_eq!(result.reasons, vec![NO_IMAGES_TO_CERTIFY.to_string()]);
    }

    #[tokio::test]
    async fn test_one_uncertified_image_yields_one_reason() {
        let catalog = FakeCatalog::default()
            .with_repository("nginx", &["docker.io"])
            .with_tags("nginx", "docker.io", &["1.16.0", "latest"]);
        let matcher = CertificationMatcher::new(&catalog);

        let result = certify_references(&matcher, ["nginx:1.16.0", "busybox"]).await.unwrap();

        assert!(!result.ok);
        assert_eq!(result.reasons.len(), 1);
        assert!(result.reasons[0].contains("busybox"));
        assert!(result.reasons[0].contains("repository not found"));
    }

    #[tokio::test]
    async fn test_all_certified_passes_with_no_reasons() {
        let catalog = FakeCatalog::default()
            .with_repository("nginx", &["docker.io"])
            .with_tags("nginx", "docker.io", &["1.16.0"]);
        let matcher = CertificationMatcher::new(&catalog);

        let result = certify_references(&matcher, ["nginx:1.16.0"]).await.unwrap();

        assert!(result.ok);
        assert!(result.reasons.is_empty());
    }

    #[tokio::test]
    async fn test_duplicates_certified_once_in_first_seen_order() {
        let catalog = FakeCatalog::default();
        let matcher = CertificationMatcher::new(&catalog);

        let result = certify_references(&matcher, ["zeta", "alpha", "zeta", "alpha:latest"])
            .await
            .unwrap();

        assert_eq!(result.reasons.len(), 3);
        assert!(result.reasons[0].contains(": zeta :"));
        assert!(result.reasons[1].contains(": alpha :"));
        assert!(result.reasons[2].contains(": alpha:latest :"));
    }

    #[tokio::test]
    async fn test_indeterminate_outcome_is_an_error() {
        let catalog = FakeCatalog::default()
            .with_repository("nginx", &["docker.io"])
            .failing_tags(CatalogError::BadStatus {
                status: 503,
                url: "http://catalog".to_string(),
            });
        let matcher = CertificationMatcher::new(&catalog);

        let err = certify_references(&matcher, ["nginx:1.16.0", "busybox"])
            .await
            .unwrap_err();

        let VerdictError::Indeterminate { reference, detail } = err;
        assert_eq!(reference, "nginx:1.16.0");
        assert!(detail.contains("503"));
        assert_eq!(catalog.registry_lookups(), 1);
    }
}
