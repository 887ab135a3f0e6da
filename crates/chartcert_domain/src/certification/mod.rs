pub mod discovery;
pub mod heuristic;
pub mod matcher;
pub mod outcome;
pub mod verdict;

pub use discovery::{discover_candidates, DiscoveryReport};
pub use heuristic::is_candidate_tag;
pub use matcher::CertificationMatcher;
pub use outcome::{CertificationOutcome, Verdict, IMAGE_NOT_CERTIFIED};
pub use verdict::{certify_references, fold_outcomes, CheckResult, VerdictError, NO_IMAGES_TO_CERTIFY};

#[cfg(test)]
mod fake;
