use async_trait::async_trait;
use chartcert_common::diagnostic::Diagnosable;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::debug;
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Chart location {path} could not be read: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("No rendered manifests found under {0}")]
    NoManifests(PathBuf),
}

impl Diagnosable for RenderError {
    fn code(&self) -> String {
        match self {
            Self::Unreadable { .. } => "CHART_UNREADABLE",
            Self::NoManifests(_) => "CHART_NO_MANIFESTS",
        }
        .to_string()
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            Self::Unreadable { .. } => Some("Check that the chart path exists and is readable.".to_string()),
            Self::NoManifests(_) => Some("Point at a rendered manifest file or a directory of *.yaml manifests.".to_string()),
        }
    }
}

/// Produces the rendered manifest text of a chart.
#[async_trait]
pub trait ManifestRenderer: Send + Sync {
    async fn render(&self, chart: &Path) -> Result<String, RenderError>;
}

/// Reads manifests that were rendered ahead of time.
///
/// A file is returned as is. A directory yields every `*.yaml` / `*.yml` file
/// below it, in path order, joined as one multi-document stream.
#[derive(Debug, Default, Clone, Copy)]
pub struct PreRenderedManifests;

#[async_trait]
impl ManifestRenderer for PreRenderedManifests {
    async fn render(&self, chart: &Path) -> Result<String, RenderError> {
        let metadata = fs::metadata(chart).await.map_err(|e| unreadable(chart, e))?;
        if metadata.is_file() {
            return fs::read_to_string(chart).await.map_err(|e| unreadable(chart, e));
        }

        let root = chart.to_path_buf();
        let files = tokio::task::spawn_blocking(move || manifest_files(&root))
            .await
            .map_err(|e| unreadable(chart, std::io::Error::new(std::io::ErrorKind::Other, e)))??;
        if files.is_empty() {
            return Err(RenderError::NoManifests(chart.to_path_buf()));
        }

        let mut rendered = String::new();
        for file in &files {
            debug!(manifest = %file.display(), "Reading rendered manifest");
            let text = fs::read_to_string(file).await.map_err(|e| unreadable(file, e))?;
            rendered.push_str("---\n");
            rendered.push_str(&text);
            if !text.ends_with('\n') {
                rendered.push('\n');
            }
        }
        Ok(rendered)
    }
}

fn manifest_files(root: &Path) -> Result<Vec<PathBuf>, RenderError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            RenderError::Unreadable { path, source: e.into() }
        })?;
        let is_manifest = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| ext == "yaml" || ext == "yml");
        if entry.file_type().is_file() && is_manifest {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn unreadable(path: &Path, source: std::io::Error) -> RenderError {
    RenderError::Unreadable {
        path: path.to_path_buf(),
        source,
    }
}
