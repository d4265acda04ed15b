//! Array backends the glass test suite is parametrized over.

use std::fmt;
use std::str::FromStr;

use crate::error::SessionError;

/// Environment variable telling the test suite which backend to run.
pub const ARRAY_BACKEND_VAR: &str = "GLASS_ARRAY_BACKEND";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrayBackend {
    ArrayApiStrict,
    Numpy,
    JaxNumpy,
}

impl ArrayBackend {
    pub const ALL: [ArrayBackend; 3] = [
        ArrayBackend::ArrayApiStrict,
        ArrayBackend::Numpy,
        ArrayBackend::JaxNumpy,
    ];

    /// Python module the backend is imported from.
    pub fn module_name(self) -> &'static str {
        match self {
            ArrayBackend::ArrayApiStrict => "array_api_strict",
            ArrayBackend::Numpy => "numpy",
            ArrayBackend::JaxNumpy => "jax.numpy",
        }
    }
}

impl fmt::Display for ArrayBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.module_name())
    }
}

impl FromStr for ArrayBackend {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArrayBackend::ALL
            .into_iter()
            .find(|b| b.module_name() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = ArrayBackend::ALL.iter().map(|b| b.module_name()).collect();
                SessionError::Config(format!(
                    "unknown array backend '{}', expected one of: {}",
                    s,
                    known.join(", ")
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_module_names() {
        for backend in ArrayBackend::ALL {
            assert_eq!(backend.module_name().parse::<ArrayBackend>().unwrap(), backend);
        }
    }

    #[test]
    fn test_unknown_backend() {
        let err = "cupy".parse::<ArrayBackend>().unwrap_err();
        assert!(err.to_string().contains("cupy"));
        assert!(err.to_string().contains("jax.numpy"));
    }
}
