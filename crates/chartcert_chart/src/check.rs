use crate::manifest::extract_images;
use crate::render::{ManifestRenderer, PreRenderedManifests, RenderError};
use chartcert_common::diagnostic::Diagnosable;
use chartcert_domain::certification::certify_references;
use chartcert_domain::{Cancellation, CatalogSource, CertificationMatcher, CheckResult, VerdictError};
use chartcert_infra_catalog::{CatalogClient, CatalogConfig, ClientError};
use std::path::Path;
use thiserror::Error;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

/// Why the check could not produce a result. A chart whose images are not
/// certified is not an error; it is a failed [`CheckResult`].
#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    ChartUnreadable(#[from] RenderError),
    #[error(transparent)]
    Indeterminate(#[from] VerdictError),
    #[error(transparent)]
    Catalog(#[from] ClientError),
}

impl Diagnosable for CheckError {
    fn code(&self) -> String {
        match self {
            Self::ChartUnreadable(e) => e.code(),
            Self::Indeterminate(e) => e.code(),
            Self::Catalog(e) => e.code(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            Self::ChartUnreadable(e) => e.suggestion(),
            Self::Indeterminate(e) => e.suggestion(),
            Self::Catalog(e) => e.suggestion(),
        }
    }
}

/// Checks that every image a chart deploys is present in the catalog.
pub async fn certify_images(chart: &Path, config: &CatalogConfig) -> Result<CheckResult, CheckError> {
    let catalog = CatalogClient::new(config.clone())?;
    certify_images_with(chart, &PreRenderedManifests, &catalog, Cancellation::never()).await
}

pub async fn certify_images_with<R, C>(
    chart: &Path,
    renderer: &R,
    catalog: &C,
    cancellation: Cancellation,
) -> Result<CheckResult, CheckError>
where
    R: ManifestRenderer + ?Sized,
    C: CatalogSource + ?Sized,
{
    let span = info_span!(
        "certify_images",
        run_id = %Uuid::new_v4(),
        chart = %chart.display(),
    );

    async move {
        let rendered = renderer.render(chart).await?;
        let images = extract_images(&rendered);

        let matcher = CertificationMatcher::new(catalog).with_cancellation(cancellation);
        let result = certify_references(&matcher, &images).await?;

        let failures = if result.ok { 0 } else { result.reasons.len() };
        info!(ok = result.ok, images = images.len(), failures, "Image certification finished");
        Ok(result)
    }
    .instrument(span)
    .await
}
