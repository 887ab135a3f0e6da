use serde::{Deserialize, Serialize};
use std::fmt;

/// Version assumed when a reference carries no tag.
pub const DEFAULT_VERSION: &str = "latest";

/// An image reference split into the parts the catalog is queried by.
///
/// Parsing never fails. Input that does not look like a well-formed reference
/// is interpreted as literally as possible, so a bare word becomes a
/// repository at `latest`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedReference {
    /// Registry hosts to try, in order. Empty when the reference names none
    /// and the catalog has to be asked which registries carry the repository.
    pub registries: Vec<String>,
    pub repository: String,
    pub version: String,
}

impl ParsedReference {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let (name, digest) = match raw.split_once('@') {
            Some((name, digest)) => (name, Some(digest).filter(|d| !d.is_empty())),
            None => (raw, None),
        };

        let (path, tag) = split_tag(name);
        let version = tag.or(digest).unwrap_or(DEFAULT_VERSION);

        let (registries, repository) = match path.split_once('/') {
            Some((head, rest)) if !rest.is_empty() && (rest.contains('/') || is_registry_host(head)) => {
                (vec![head.to_string()], rest.to_string())
            }
            _ => (Vec::new(), path.to_string()),
        };
        // A reference with no name before its tag keeps the raw text as its
        // repository so the repository is never empty.
        let repository = if repository.is_empty() { raw.to_string() } else { repository };

        Self {
            registries,
            repository,
            version: version.to_string(),
        }
    }

    /// Whether the repository can name a catalog entry at all. Repository
    /// paths start with a lowercase letter or digit.
    pub fn has_repository_name(&self) -> bool {
        self.repository
            .chars()
            .next()
            .map_or(false, |c| c.is_ascii_alphanumeric())
    }

    /// Whether the version is a content digest rather than a tag.
    pub fn is_digest(&self) -> bool {
        self.version.starts_with("sha256:")
    }

    /// The registry named by the reference itself, if any.
    pub fn registry(&self) -> Option<&str> {
        self.registries.first().map(String::as_str)
    }
}

impl From<&str> for ParsedReference {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl fmt::Display for ParsedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(registry) = self.registry() {
            write!(f, "{}/", registry)?;
        }
        write!(f, "{}:{}", self.repository, self.version)
    }
}

// The tag separator is the last ':' after the last '/', so a registry port is never
// mistaken for a tag.
fn split_tag(name: &str) -> (&str, Option<&str>) {
    let slash = name.rfind('/');
    match name.rfind(':') {
        Some(colon) if slash.map_or(true, |s| colon > s) => {
            let tag = &name[colon + 1..];
            (&name[..colon], Some(tag).filter(|t| !t.is_empty()))
        }
        _ => (name, None),
    }
}

fn is_registry_host(segment: &str) -> bool {
    segment.contains('.') || segment.contains(':') || segment == "localhost"
}
