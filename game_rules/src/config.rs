//! Session configuration, loaded from TOML.
//!
//! ```toml
//! initiative_die = 20
//! skip_incapacitated = true
//! skip_defeated_npcs = true
//! loop_exploration = true
//! ```
//!
//! Every key is optional; missing keys take the defaults below.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::RulesError;
use crate::mechanics::DEFAULT_INITIATIVE_DIE;

/// Tunables for turn sequencing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Die rolled for initiative.
    pub initiative_die: u32,

    /// Skip PCs at 0 HP or below when routing combat turns.
    pub skip_incapacitated: bool,

    /// Skip NPC slots whose profile is at 0 HP when routing combat turns.
    pub skip_defeated_npcs: bool,

    /// After the last exploration entry, wrap to the first instead of
    /// reporting the exchange as complete.
    pub loop_exploration: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            initiative_die: DEFAULT_INITIATIVE_DIE,
            skip_incapacitated: true,
            skip_defeated_npcs: true,
            loop_exploration: true,
        }
    }
}

impl SessionConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(raw: &str) -> Result<Self, RulesError> {
        let config: SessionConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RulesError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| RulesError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<(), RulesError> {
        if self.initiative_die < 2 {
            return Err(RulesError::InvalidConfig(format!(
                "initiative_die must be at least 2, got {}",
                self.initiative_die
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.initiative_die, 20);
        assert!(config.skip_incapacitated);
        assert!(config.skip_defeated_npcs);
        assert!(config.loop_exploration);
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        assert_eq!(SessionConfig::from_toml_str("").unwrap(), SessionConfig::default());
    }

    #[test]
    fn test_partial_document() {
        let config = SessionConfig::from_toml_str("loop_exploration = false\ninitiative_die = 12").unwrap();
        assert!(!config.loop_exploration);
        assert_eq!(config.initiative_die, 12);
        assert!(config.skip_incapacitated);
    }

    #[test]
    fn test_invalid_die_rejected() {
        assert!(matches!(
            SessionConfig::from_toml_str("initiative_die = 1"),
            Err(RulesError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(
            SessionConfig::from_toml_str("initiative_die = \"twenty\""),
            Err(RulesError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = SessionConfig::from_file("/nonexistent/session.toml").unwrap_err();
        assert!(matches!(err, RulesError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/session.toml"));
    }
}
