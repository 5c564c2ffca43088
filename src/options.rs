//! Parser configuration.
//!
//! Options can be built in code or loaded from YAML:
//!
//! ```rust
//! use abc::ParseOptions;
//!
//! let options = ParseOptions::from_yaml("unit-denominator: 16\nstrict-headers: true")?;
//! assert_eq!(options.unit_denominator, 16);
//! assert!(options.strict_headers);
//! # Ok::<(), abc::AbcError>(())
//! ```

use crate::ast::DEFAULT_UNIT_DENOMINATOR;
use crate::error::AbcError;
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct ParseOptions {
    /// Initial reference subdivision; an `L:1/N` header overrides it.
    pub unit_denominator: u16,
    /// Fail on malformed `L:`/`M:` values instead of ignoring them.
    pub strict_headers: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            unit_denominator: DEFAULT_UNIT_DENOMINATOR,
            strict_headers: false,
        }
    }
}

impl ParseOptions {
    pub fn from_yaml(content: &str) -> Result<Self, AbcError> {
        let options: ParseOptions =
            serde_yaml::from_str(content).map_err(|e| AbcError::Config(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), AbcError> {
        if self.unit_denominator == 0 {
            return Err(AbcError::Config(
                "unit-denominator must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ParseOptions::default();
        assert_eq!(options.unit_denominator, 8);
        assert!(!options.strict_headers);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let options = ParseOptions::from_yaml("strict-headers: true").unwrap();
        assert_eq!(options.unit_denominator, 8);
        assert!(options.strict_headers);
    }

    #[test]
    fn test_zero_denominator_rejected() {
        let err = ParseOptions::from_yaml("unit-denominator: 0").unwrap_err();
        assert!(matches!(err, AbcError::Config(_)));
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(ParseOptions::from_yaml("unit-length: 8").is_err());
    }
}
