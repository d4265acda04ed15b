//! Source references for `pip install git+<url>@<revision>`.

use std::fmt;

/// A package source pinned to a revision of a git repository.
///
/// The revision is an opaque token: it is interpolated as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRef {
    pub repository_url: String,
    pub revision: String,
}

impl SourceRef {
    pub fn new(repository_url: impl Into<String>, revision: impl Into<String>) -> Self {
        Self {
            repository_url: repository_url.into(),
            revision: revision.into(),
        }
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "git+{}@{}", self.repository_url, self.revision)
    }
}
