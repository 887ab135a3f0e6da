use super::heuristic::is_candidate_tag;
use crate::catalog::{CatalogError, CatalogSource};
use serde::Serialize;
use tracing::{info, warn};

/// Summary of a bulk scan over every repository of a registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiscoveryReport {
    pub registry: String,
    pub repositories_scanned: usize,
    pub tags_scanned: usize,
    pub candidates: Vec<String>,
}

/// Walks every repository of `registry` and collects tags worth a manual
/// review: tags that carry a digest and tags the heuristic flags.
///
/// Failing to list one repository's tags is logged and skipped; only a failure
/// to list the repositories themselves is returned.
pub async fn discover_candidates<C: CatalogSource + ?Sized>(
    catalog: &C,
    registry: &str,
    page_size: usize,
) -> Result<DiscoveryReport, CatalogError> {
    let repositories = catalog.list_all_repositories(registry, page_size).await?;
    info!(registry, repositories = repositories.len(), "Scanning registry for candidate tags");

    let mut report = DiscoveryReport {
        registry: registry.to_string(),
        ..Default::default()
    };

    for repository in &repositories {
        report.repositories_scanned += 1;

        let tags = match catalog.list_tags(repository, registry).await {
            Ok(tags) => tags,
            Err(e) => {
                warn!(registry, repository = %repository, error = %e, "Skipping repository");
                continue;
            }
        };
        report.tags_scanned += tags.len();

        for tag in &tags {
            if let Some(digest) = tag.digest.as_deref().filter(|d| !d.is_empty()) {
                report.candidates.push(format!(
                    "registry : {}, repository : {}, tag : {}, digest : {}",
                    registry, repository, tag.name, digest
                ));
            }
        }
        for tag in tags.iter().filter(|tag| is_candidate_tag(&tag.name)) {
            report.candidates.push(format!(
                "registry : {}, repository : {}, tag : {}",
                registry, repository, tag.name
            ));
        }
    }

    for candidate in &report.candidates {
        info!(candidate = %candidate, "Candidate");
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogTag;
    use crate::certification::fake::FakeCatalog;

    #[tokio::test]
    async fn test_collects_digest_and_heuristic_candidates() {
        let catalog = FakeCatalog::default()
            .with_catalog_tags(
                "team/api",
                "quay.io",
                vec![
                    CatalogTag::new("1.0").with_digest("sha256:aaa"),
                    CatalogTag::new("a1b2c3d4e5f6g7"),
                ],
            )
            .with_tags("team/web", "quay.io", &["2.0", "2.1"])
            .with_tags("other", "docker.io", &["sha256abcdef"]);

        let report = discover_candidates(&catalog, "quay.io", 500).await.unwrap();

        assert_eq!(report.repositories_scanned, 2);
        assert_eq!(report.tags_scanned, 4);
        assert_eq!(
            report.candidates,
            vec![
                "registry : quay.io, repository : team/api, tag : 1.0, digest : sha256:aaa".to_string(),
                "registry : quay.io, repository : team/api, tag : a1b2c3d4e5f6g7".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_repository_listing_failure_is_returned() {
        let catalog = FakeCatalog::default()
            .failing_registries(CatalogError::Timeout("http://catalog".to_string()));

        let err = discover_candidates(&catalog, "quay.io", 500).await.unwrap_err();

        assert!(!err.is_not_found());
    }

    #[tokio::test]
    async fn test_tag_failures_are_skipped() {
        let catalog = FakeCatalog::default()
            .with_tags("team/api", "quay.io", &["1.0"])
            .failing_tags(CatalogError::Transport("reset".to_string()));

        let report = discover_candidates(&catalog, "quay.io", 500).await.unwrap();

        assert_eq!(report.repositories_scanned, 1);
        assert_eq!(report.tags_scanned, 0);
        assert!(report.candidates.is_empty());
    }
}
