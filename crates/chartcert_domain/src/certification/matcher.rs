use super::heuristic::is_candidate_tag;
use super::outcome::CertificationOutcome;
use crate::cancel::Cancellation;
use crate::catalog::{CatalogError, CatalogSource, CatalogTag};
use crate::image::ParsedReference;
use tracing::{debug, info, warn};

/// Where a single reference is in its certification.
#[derive(Debug)]
enum MatchState {
    Resolving,
    Scanning {
        registries: Vec<String>,
        next: usize,
        seen: Vec<SeenTag>,
    },
    Done(CertificationOutcome),
}

/// A tag that did not match, kept for diagnostics.
#[derive(Debug)]
struct SeenTag {
    registry: String,
    name: String,
}

/// Certifies image references against a catalog, one reference at a time.
///
/// Registries are scanned in the order they were discovered and the first
/// exact tag match wins.
pub struct CertificationMatcher<'a, C: CatalogSource + ?Sized> {
    catalog: &'a C,
    cancellation: Cancellation,
}

impl<'a, C: CatalogSource + ?Sized> CertificationMatcher<'a, C> {
    pub fn new(catalog: &'a C) -> Self {
        Self {
            catalog,
            cancellation: Cancellation::never(),
        }
    }

    pub fn with_cancellation(mut self, cancellation: Cancellation) -> Self {
        self.cancellation = cancellation;
        self
    }

    pub async fn certify(&self, reference: &str) -> CertificationOutcome {
        let parsed = ParsedReference::parse(reference);
        debug!(
            reference,
            repository = %parsed.repository,
            version = %parsed.version,
            registries = ?parsed.registries,
            "Parsed image reference"
        );

        let mut state = MatchState::Resolving;
        loop {
            state = match state {
                MatchState::Done(outcome) => return outcome,
                pending => tokio::select! {
                    biased;
                    _ = self.cancellation.cancelled() => {
                        warn!(reference, "Certification cancelled");
                        MatchState::Done(CertificationOutcome::indeterminate(reference, &CatalogError::Cancelled))
                    }
                    next = self.step(reference, &parsed, pending) => next,
                },
            };
        }
    }

    async fn step(&self, reference: &str, parsed: &ParsedReference, state: MatchState) -> MatchState {
        match state {
            MatchState::Resolving => self.resolve(reference, parsed).await,
            MatchState::Scanning { registries, next, seen } => {
                self.scan(reference, parsed, registries, next, seen).await
            }
            done @ MatchState::Done(_) => done,
        }
    }

    async fn resolve(&self, reference: &str, parsed: &ParsedReference) -> MatchState {
        if !parsed.has_repository_name() {
            return repository_not_found(reference, parsed);
        }
        if !parsed.registries.is_empty() {
            return MatchState::Scanning {
                registries: parsed.registries.clone(),
                next: 0,
                seen: Vec::new(),
            };
        }

        match self.catalog.list_registries_for_repository(&parsed.repository).await {
            Ok(registries) if !registries.is_empty() => {
                let mut unique: Vec<String> = Vec::with_capacity(registries.len());
                for registry in registries {
                    if !unique.contains(&registry) {
                        unique.push(registry);
                    }
                }
                debug!(reference, registries = ?unique, "Resolved candidate registries");
                MatchState::Scanning {
                    registries: unique,
                    next: 0,
                    seen: Vec::new(),
                }
            }
            Ok(_) => repository_not_found(reference, parsed),
            Err(e) if e.is_not_found() => repository_not_found(reference, parsed),
            Err(e) => {
                warn!(reference, error = %e, "Catalog unavailable while resolving registries");
                MatchState::Done(CertificationOutcome::indeterminate(reference, &e))
            }
        }
    }

    async fn scan(
        &self,
        reference: &str,
        parsed: &ParsedReference,
        registries: Vec<String>,
        next: usize,
        mut seen: Vec<SeenTag>,
    ) -> MatchState {
        let Some(registry) = registries.get(next) else {
            return MatchState::Done(no_version_match(reference, parsed, &registries, &seen));
        };

        match self.catalog.list_tags(&parsed.repository, registry).await {
            Ok(tags) => {
                if tags.iter().any(|tag| matches_version(tag, parsed)) {
                    info!(reference, registry = %registry, "Image certified");
                    return MatchState::Done(CertificationOutcome::certified(reference, registry));
                }
                seen.extend(tags.into_iter().map(|tag| SeenTag {
                    registry: registry.clone(),
                    name: tag.name,
                }));
            }
            Err(e) if e.is_not_found() => {
                debug!(reference, registry = %registry, "Repository not listed in registry");
            }
            Err(e) => {
                warn!(reference, registry = %registry, error = %e, "Catalog unavailable while listing tags");
                return MatchState::Done(CertificationOutcome::indeterminate(reference, &e));
            }
        }

        MatchState::Scanning {
            registries,
            next: next + 1,
            seen,
        }
    }
}

fn matches_version(tag: &CatalogTag, parsed: &ParsedReference) -> bool {
    tag.name == parsed.version
        || (parsed.is_digest() && tag.digest.as_deref() == Some(parsed.version.as_str()))
}

fn repository_not_found(reference: &str, parsed: &ParsedReference) -> MatchState {
    info!(reference, repository = %parsed.repository, "Repository not found in catalog");
    let reason = format!("repository not found: {}", parsed.repository);
    MatchState::Done(CertificationOutcome::not_certified(reference, &reason, Vec::new()))
}

fn no_version_match(
    reference: &str,
    parsed: &ParsedReference,
    registries: &[String],
    seen: &[SeenTag],
) -> CertificationOutcome {
    let candidates: Vec<String> = seen
        .iter()
        .filter(|tag| is_candidate_tag(&tag.name))
        .map(|tag| format!("{}/{}:{}", tag.registry, parsed.repository, tag.name))
        .collect();
    for candidate in &candidates {
        info!(reference, candidate = %candidate, "Possible match for manual review");
    }

    let found = if seen.is_empty() {
        format!("none (searched: {})", registries.join(", "))
    } else {
        seen.iter().map(|tag| tag.name.as_str()).collect::<Vec<_>>().join(", ")
    };
    let mut reason = format!("Version {} not found. Found : {}", parsed.version, found);
    if !candidates.is_empty() {
        reason.push_str(&format!(" : Candidates : {}", candidates.join(", ")));
    }

    CertificationOutcome::not_certified(reference, &reason, candidates)
}
