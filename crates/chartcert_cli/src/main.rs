use chartcert_chart::{certify_images_with, PreRenderedManifests};
use chartcert_common::{diagnostic, telemetry};
use chartcert_domain::{discover_candidates, Cancellation};
use chartcert_infra_catalog::{CatalogClient, CatalogConfig, ClientError};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info};

/// Certify the container images a chart deploys against the image catalog.
#[derive(Debug, Parser)]
#[command(name = "chartcert", version)]
struct Cli {
    /// Catalog repositories endpoint (overrides CHARTCERT_CATALOG_URL).
    #[arg(long, global = true)]
    catalog_url: Option<String>,

    /// Per-request timeout in seconds (overrides CHARTCERT_CATALOG_TIMEOUT_SECS).
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check every image in a rendered chart (a manifest file or a directory of them).
    Certify { chart: PathBuf },
    /// List tags in a registry that look like digests or opaque build ids.
    Discover {
        registry: String,
        #[arg(long)]
        page_size: Option<usize>,
    },
}

impl Cli {
    fn catalog_config(&self, base: CatalogConfig) -> Result<CatalogConfig, ClientError> {
        let mut config = base;
        if let Some(url) = &self.catalog_url {
            config.base_url = url.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    telemetry::init_tracing("chartcert")?;
    let cli = Cli::parse();

    let config = CatalogConfig::from_env()
        .and_then(|env| cli.catalog_config(env))
        .map_err(|e| report(diagnostic::Error::new(e)))?;
    info!(catalog = %config.base_url, "Catalog configured");
    let catalog = CatalogClient::new(config.clone()).map_err(|e| report(diagnostic::Error::new(e)))?;

    match cli.command {
        Command::Certify { chart } => {
            let (handle, cancellation) = Cancellation::pair();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("Interrupt received, cancelling");
                    handle.cancel();
                }
            });

            let result = certify_images_with(&chart, &PreRenderedManifests, &catalog, cancellation)
                .await
                .map_err(|e| report(diagnostic::Error::new(e)))?;
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(if result.ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Command::Discover { registry, page_size } => {
            let page_size = page_size.unwrap_or(config.page_size);
            let report_body = discover_candidates(&catalog, &registry, page_size)
                .await
                .map_err(|e| report(diagnostic::Error::new(e)))?;
            println!("{}", serde_json::to_string_pretty(&report_body)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn report(err: diagnostic::Error) -> anyhow::Error {
    match err.suggestion() {
        Some(suggestion) => error!(code = err.code(), %suggestion, "{}", err),
        None => error!(code = err.code(), "{}", err),
    }
    err.into()
}
