//! Revision Argument Resolution
//!
//! Turns the positional arguments of a session into the revision(s) it should
//! install. Both the benchmark workflow (one revision) and the regression
//! workflow (a before/after pair) go through [`RevisionResolver::resolve`], so
//! the count validation lives in exactly one place.
//!
//! # Accepted shapes
//!
//! ```text
//! args            expected=1            expected=2
//! []              error                 error
//! [a]             (a, "")               (default_before, a)
//! [a, b]          error                 (a, b)
//! [a, b, c, ..]   error                 error
//! ```
//!
//! The `[a]` / `expected=2` row is the shorthand for "compare my revision
//! against the baseline": the lone argument is the *after* revision and the
//! *before* revision falls back to the configured baseline branch.

use crate::error::SessionError;

/// Baseline the *before* revision defaults to.
pub const DEFAULT_BEFORE_REVISION: &str = "main";

/// Environment variable carrying the optional before revision.
pub const BEFORE_REVISION_VAR: &str = "BEFORE_REVISION";

/// Environment variable carrying the required after revision.
pub const AFTER_REVISION_VAR: &str = "AFTER_REVISION";

/// Resolved revisions. `second` is empty unless two revisions were expected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionPair {
    pub first: String,
    pub second: String,
}

impl RevisionPair {
    /// Before/after view of a pair resolved with arity 2.
    pub fn before_after(&self) -> (&str, &str) {
        (&self.first, &self.second)
    }
}

/// Resolves positional arguments into revisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionResolver {
    default_before: String,
}

impl Default for RevisionResolver {
    fn default() -> Self {
        Self::new(DEFAULT_BEFORE_REVISION)
    }
}

impl RevisionResolver {
    pub fn new(default_before: impl Into<String>) -> Self {
        Self {
            default_before: default_before.into(),
        }
    }

    pub fn default_before(&self) -> &str {
        &self.default_before
    }

    /// Resolve `args` against the `expected` number of revisions.
    ///
    /// Only `expected` values of 1 and 2 can succeed. The count is checked
    /// first; within an accepted shape an empty string counts as a missing
    /// revision.
    pub fn resolve(&self, args: &[String], expected: usize) -> Result<RevisionPair, SessionError> {
        if args.is_empty() {
            return Err(not_provided());
        }

        let pair = match (args, expected) {
            ([only], 1) => Ok(RevisionPair {
                first: only.clone(),
                second: String::new(),
            }),
            ([after], 2) => {
                if self.default_before.is_empty() {
                    return Err(SessionError::InvalidArgumentCount(
                        "Revision not provided (no default before revision configured)"
                            .to_string(),
                    ));
                }
                Ok(RevisionPair {
                    first: self.default_before.clone(),
                    second: after.clone(),
                })
            }
            ([before, after], 2) => Ok(RevisionPair {
                first: before.clone(),
                second: after.clone(),
            }),
            _ => Err(SessionError::InvalidArgumentCount(format!(
                "Incorrect number of revisions provided ({}), expected {}",
                args.len(),
                expected
            ))),
        }?;

        if pair.first.is_empty() || (expected == 2 && pair.second.is_empty()) {
            return Err(not_provided());
        }
        Ok(pair)
    }

    /// Resolve a before/after pair from `BEFORE_REVISION` / `AFTER_REVISION`.
    ///
    /// `lookup` stands in for `std::env::var`. A missing `BEFORE_REVISION`
    /// falls back to the baseline; a missing `AFTER_REVISION` is an error.
    pub fn resolve_from_env<F>(&self, lookup: F) -> Result<RevisionPair, SessionError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let after = lookup(AFTER_REVISION_VAR)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                SessionError::InvalidArgumentCount(format!(
                    "{AFTER_REVISION_VAR} not provided, set it to the revision to compare"
                ))
            })?;

        let args = match lookup(BEFORE_REVISION_VAR).filter(|v| !v.is_empty()) {
            Some(before) => vec![before, after],
            None => vec![after],
        };
        self.resolve(&args, 2)
    }
}

/// Production lookup for [`RevisionResolver::resolve_from_env`].
pub fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn not_provided() -> SessionError {
    SessionError::InvalidArgumentCount("Revision not provided".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashMap;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn message(err: SessionError) -> String {
        assert!(err.is_argument_error(), "unexpected error kind: {err:?}");
        err.to_string()
    }

    #[test]
    fn test_single_revision() {
        let pair = RevisionResolver::default()
            .resolve(&args(&["v1.2.0"]), 1)
            .unwrap();
        assert_eq!(pair.first, "v1.2.0");
        assert_eq!(pair.second, "");
    }

    #[test]
    fn test_single_argument_defaults_before_to_main() {
        let pair = RevisionResolver::default()
            .resolve(&args(&["v1.2.0"]), 2)
            .unwrap();
        assert_eq!(pair.before_after(), ("main", "v1.2.0"));
    }

    #[test]
    fn test_default_before_is_configurable() {
        let pair = RevisionResolver::new("develop")
            .resolve(&args(&["feature"]), 2)
            .unwrap();
        assert_eq!(pair.before_after(), ("develop", "feature"));
    }

    #[test]
    fn test_explicit_pair() {
        let pair = RevisionResolver::default()
            .resolve(&args(&["v1.0.0", "v1.1.0"]), 2)
            .unwrap();
        assert_eq!(pair.before_after(), ("v1.0.0", "v1.1.0"));
    }

    #[test]
    fn test_empty_args_not_provided() {
        let resolver = RevisionResolver::default();
        for expected in [1, 2] {
            let msg = message(resolver.resolve(&[], expected).unwrap_err());
            assert!(msg.contains("not provided"), "{msg}");
        }
    }

    #[test]
    fn test_too_many_revisions_reports_counts() {
        let msg = message(
            RevisionResolver::default()
                .resolve(&args(&["a", "b", "c"]), 2)
                .unwrap_err(),
        );
        assert!(msg.contains("(3)"), "{msg}");
        assert!(msg.contains("expected 2"), "{msg}");
    }

    #[test]
    fn test_pair_rejected_for_single_arity() {
        let msg = message(
            RevisionResolver::default()
                .resolve(&args(&["a", "b"]), 1)
                .unwrap_err(),
        );
        assert_eq!(msg, "Incorrect number of revisions provided (2), expected 1");
    }

    #[test]
    fn test_unsupported_arity() {
        let resolver = RevisionResolver::default();
        assert!(resolver.resolve(&args(&["a"]), 0).is_err());
        assert!(resolver.resolve(&args(&["a"]), 3).is_err());
        assert!(resolver.resolve(&args(&["a", "b"]), 3).is_err());
    }

    #[test]
    fn test_empty_string_is_missing_revision() {
        let resolver = RevisionResolver::default();
        assert!(resolver.resolve(&args(&[""]), 1).is_err());
        assert!(resolver.resolve(&args(&[""]), 2).is_err());
        assert!(resolver.resolve(&args(&["a", ""]), 2).is_err());
    }

    #[test]
    fn test_empty_element_in_oversized_list_reports_counts() {
        let msg = message(
            RevisionResolver::default()
                .resolve(&args(&["a", "b", ""]), 2)
                .unwrap_err(),
        );
        assert_eq!(msg, "Incorrect number of revisions provided (3), expected 2");

        let msg = message(
            RevisionResolver::default()
                .resolve(&args(&["", "b"]), 1)
                .unwrap_err(),
        );
        assert_eq!(msg, "Incorrect number of revisions provided (2), expected 1");
    }

    #[test]
    fn test_empty_default_before_rejected() {
        let err = RevisionResolver::new("")
            .resolve(&args(&["v2"]), 2)
            .unwrap_err();
        assert!(err.is_argument_error());
    }

    #[test]
    fn test_env_both_revisions() {
        let env: HashMap<&str, &str> = [("BEFORE_REVISION", "v1"), ("AFTER_REVISION", "v2")]
            .into_iter()
            .collect();
        let pair = RevisionResolver::default()
            .resolve_from_env(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(pair.before_after(), ("v1", "v2"));
    }

    #[test]
    fn test_env_before_defaults_to_baseline() {
        let pair = RevisionResolver::default()
            .resolve_from_env(|k| (k == "AFTER_REVISION").then(|| "v2".to_string()))
            .unwrap();
        assert_eq!(pair.before_after(), ("main", "v2"));
    }

    #[test]
    fn test_env_missing_after_revision() {
        let msg = message(
            RevisionResolver::default()
                .resolve_from_env(|k| (k == "BEFORE_REVISION").then(|| "v1".to_string()))
                .unwrap_err(),
        );
        assert!(msg.contains("AFTER_REVISION"), "{msg}");
    }

    #[test]
    fn test_env_empty_after_revision() {
        let err = RevisionResolver::default()
            .resolve_from_env(|_| Some(String::new()))
            .unwrap_err();
        assert!(err.is_argument_error());
    }

    fn revision() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9._/-]{1,24}"
    }

    proptest! {
        #[test]
        fn prop_single_revision_passthrough(a in revision()) {
            let pair = RevisionResolver::default().resolve(&[a.clone()], 1).unwrap();
            prop_assert_eq!(pair.first, a);
            prop_assert!(pair.second.is_empty());
        }

        #[test]
        fn prop_single_revision_is_after(a in revision()) {
            let pair = RevisionResolver::default().resolve(&[a.clone()], 2).unwrap();
            prop_assert_eq!(pair.first, DEFAULT_BEFORE_REVISION);
            prop_assert_eq!(pair.second, a);
        }

        #[test]
        fn prop_pair_passthrough(a in revision(), b in revision()) {
            let pair = RevisionResolver::default().resolve(&[a.clone(), b.clone()], 2).unwrap();
            prop_assert_eq!(pair.first, a);
            prop_assert_eq!(pair.second, b);
        }

        #[test]
        fn prop_pair_rejected_for_single(a in revision(), b in revision()) {
            let err = RevisionResolver::default().resolve(&[a, b], 1).unwrap_err();
            prop_assert!(err.is_argument_error());
        }

        #[test]
        fn prop_three_or_more_rejected(
            list in proptest::collection::vec(revision(), 3..8),
            expected in 1usize..=2,
        ) {
            let err = RevisionResolver::default().resolve(&list, expected).unwrap_err();
            let msg = err.to_string();
            let received = format!("({})", list.len());
            let wanted = format!("expected {}", expected);
            prop_assert!(msg.contains(&received));
            prop_assert!(msg.contains(&wanted));
        }

        #[test]
        fn prop_resolve_is_deterministic(
            list in proptest::collection::vec(revision(), 0..4),
            expected in 0usize..4,
        ) {
            let resolver = RevisionResolver::default();
            let first = resolver.resolve(&list, expected).map_err(|e| e.to_string());
            let second = resolver.resolve(&list, expected).map_err(|e| e.to_string());
            prop_assert_eq!(first, second);
        }
    }
}
