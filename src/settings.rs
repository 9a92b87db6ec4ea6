//! Settings read through the `config` crate.
//!
//! Sources, later ones winning: built-in defaults, an optional
//! `selectattrfirst.toml` (or any file passed to [`Settings::load_from`]),
//! then `SELECTATTRFIRST__SECTION__KEY` environment variables.

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::error::Result;
use crate::resolve::MissingAttribute;
use crate::sequence::ScalarPolicy;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub log: LogSettings,
    pub sequence: SequenceSettings,
    pub resolver: ResolverSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Used when `RUST_LOG` is not set.
    pub level: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self { level: "info".into() }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SequenceSettings {
    pub scalars: ScalarPolicy,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ResolverSettings {
    pub missing: MissingAttribute,
}

impl Settings {
    pub const DEFAULT_FILE: &'static str = "selectattrfirst";
    pub const ENV_PREFIX: &'static str = "SELECTATTRFIRST";

    pub fn load() -> Result<Self> {
        Self::load_from(Self::DEFAULT_FILE)
    }
    pub fn load_from(path: &str) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix(Self::ENV_PREFIX).separator("__"))
            .build()?;
        Ok(config.try_deserialize()?)
    }
    /// Settings from a TOML document alone, without file or environment.
    pub fn from_toml(source: &str) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()?;
        Ok(config.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let settings = Settings::from_toml("").unwrap();
        assert_eq!(settings.log.level, "info");
        assert_eq!(settings.sequence.scalars, ScalarPolicy::Singleton);
        assert_eq!(settings.resolver.missing, MissingAttribute::Null);
    }

    #[test]
    fn sections_override_defaults() {
        let settings = Settings::from_toml(
            "[log]\nlevel = \"debug\"\n[sequence]\nscalars = \"reject\"\n[resolver]\nmissing = \"error\"\n",
        )
        .unwrap();
        assert_eq!(settings.log.level, "debug");
        assert_eq!(settings.sequence.scalars, ScalarPolicy::Reject);
        assert_eq!(settings.resolver.missing, MissingAttribute::Error);
    }

    #[test]
    fn unknown_policy_is_a_config_error() {
        let err = Settings::from_toml("[sequence]\nscalars = \"sometimes\"\n").unwrap_err();
        assert!(format!("{err}").starts_with("Config error"));
    }
}
