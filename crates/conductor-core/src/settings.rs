//! Settings: policy document + logging options.
//!
//! Sources, later ones win:
//! 1. `ConductorSettings::default()` (the production policy)
//! 2. an optional file (TOML / JSON / YAML, chosen by extension)
//! 3. environment variables `CONDUCTOR_<SECTION>__<KEY>`,
//!    e.g. `CONDUCTOR_POLICY__COST__MAX_USD=40`
//!
//! Keys are snake_case. The sources lowercase every key, so a camelCase key
//! such as `maxUsd` arrives as `maxusd` and is rejected as unknown instead of
//! being dropped. The policy is validated before it is handed out.

use std::path::Path;

use ::config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::domain::{PolicyDocument, PolicyError};

pub const ENV_PREFIX: &str = "CONDUCTOR";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConductorSettings {
    #[serde(default)]
    pub policy: PolicyDocument,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingSettings {
    /// `EnvFilter` directive, e.g. `info` or `conductor_core=debug`.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Plain,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Plain,
    Json,
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to load settings: {0}")]
    Source(#[from] ::config::ConfigError),

    #[error("invalid policy in settings: {0}")]
    Policy(#[from] PolicyError),
}

impl ConductorSettings {
    /// Defaults, then `path` (if any), then the process environment
    /// (`CONDUCTOR_POLICY__COST__MAX_USD=40`).
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        let mut builder = Self::defaults_builder()?;
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        builder = builder.add_source(Self::environment());
        Self::finish(builder)
    }

    /// Defaults overlaid with an in-memory document (no environment).
    pub fn from_document(text: &str, format: FileFormat) -> Result<Self, SettingsError> {
        let builder = Self::defaults_builder()?.add_source(File::from_str(text, format));
        Self::finish(builder)
    }

    fn defaults_builder()
    -> Result<::config::ConfigBuilder<::config::builder::DefaultState>, SettingsError> {
        Ok(Config::builder().add_source(Config::try_from(&ConductorSettings::default())?))
    }

    fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    fn finish(
        builder: ::config::ConfigBuilder<::config::builder::DefaultState>,
    ) -> Result<Self, SettingsError> {
        let settings: ConductorSettings = builder.build()?.try_deserialize()?;
        settings.policy.validate()?;
        tracing::debug!(
            max_level = %settings.policy.risk.max_level,
            max_usd = settings.policy.cost.max_usd,
            "settings loaded"
        );
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RiskLevel;

    #[test]
    fn defaults_apply_without_sources() {
        let settings = ConductorSettings::from_document("", FileFormat::Toml).unwrap();
        assert_eq!(settings, ConductorSettings::default());
        assert_eq!(settings.policy, PolicyDocument::default());
        assert_eq!(settings.logging.format, LogFormat::Plain);
    }

    #[test]
    fn toml_overrides_single_keys() {
        let toml = r#"
            [policy.risk]
            max_level = "high"

            [policy.cost]
            max_usd = 40.5

            [logging]
            format = "json"
        "#;
        let settings = ConductorSettings::from_document(toml, FileFormat::Toml).unwrap();

        assert_eq!(settings.policy.risk.max_level, RiskLevel::High);
        assert_eq!(settings.policy.cost.max_usd, 40.5);
        assert!(settings.policy.cost.hard_fail);
        assert_eq!(settings.policy.deployment.strategy, "canary");
        assert_eq!(settings.logging.format, LogFormat::Json);
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn integer_cost_is_accepted() {
        let toml = r#"
            [policy.cost]
            max_usd = 30
        "#;
        let settings = ConductorSettings::from_document(toml, FileFormat::Toml).unwrap();
        assert_eq!(settings.policy.cost.max_usd, 30.0);
    }

    #[test]
    fn json_document_is_accepted() {
        let json = r#"{ "policy": { "deployment": { "strategy": "blue_green", "canary_percent": 0 } } }"#;
        let settings = ConductorSettings::from_document(json, FileFormat::Json).unwrap();
        assert_eq!(settings.policy.deployment.strategy, "blue_green");
        assert_eq!(settings.policy.deployment.canary_percent, 0);
    }

    #[test]
    fn invalid_policy_is_rejected_at_load() {
        let toml = r#"
            [policy.cost]
            max_usd = -1
        "#;
        let err = ConductorSettings::from_document(toml, FileFormat::Toml).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Policy(PolicyError::InvalidMaxCost(_))
        ));
    }

    #[test]
    fn malformed_document_is_a_source_error() {
        let err = ConductorSettings::from_document("[policy", FileFormat::Toml).unwrap_err();
        assert!(matches!(err, SettingsError::Source(_)));
    }

    #[test]
    fn camel_case_keys_fail_instead_of_falling_back() {
        let toml = r#"
            [policy.cost]
            maxUsd = 40

            [policy.risk]
            maxLevel = "high"
        "#;
        let err = ConductorSettings::from_document(toml, FileFormat::Toml).unwrap_err();
        assert!(matches!(err, SettingsError::Source(_)), "{err}");

        let json = r#"{ "policy": { "cost": { "maxUsd": 40 } } }"#;
        let err = ConductorSettings::from_document(json, FileFormat::Json).unwrap_err();
        assert!(err.to_string().contains("maxusd"), "{err}");
    }

    #[test]
    fn unknown_section_is_rejected() {
        let toml = r#"
            [limits]
            max_usd = 40
        "#;
        assert!(ConductorSettings::from_document(toml, FileFormat::Toml).is_err());
    }

    mod load {
        use std::io::Write;

        use serial_test::serial;

        use super::*;

        const COST_VAR: &str = "CONDUCTOR_POLICY__COST__MAX_USD";
        const RISK_VAR: &str = "CONDUCTOR_POLICY__RISK__MAX_LEVEL";
        const FORMAT_VAR: &str = "CONDUCTOR_LOGGING__FORMAT";

        fn clear_env() {
            unsafe {
                std::env::remove_var(COST_VAR);
                std::env::remove_var(RISK_VAR);
                std::env::remove_var(FORMAT_VAR);
            }
        }

        fn settings_file(contents: &str) -> tempfile::NamedTempFile {
            let mut file = tempfile::Builder::new()
                .prefix("conductor-settings")
                .suffix(".toml")
                .tempfile()
                .unwrap();
            file.write_all(contents.as_bytes()).unwrap();
            file.flush().unwrap();
            file
        }

        #[test]
        #[serial]
        fn without_sources_yields_defaults() {
            clear_env();
            let settings = ConductorSettings::load(None).unwrap();
            assert_eq!(settings, ConductorSettings::default());
        }

        #[test]
        #[serial]
        fn environment_overrides_defaults() {
            clear_env();
            unsafe {
                std::env::set_var(COST_VAR, "40");
                std::env::set_var(RISK_VAR, "high");
                std::env::set_var(FORMAT_VAR, "json");
            }

            let result = ConductorSettings::load(None);
            clear_env();

            let settings = result.unwrap();
            assert_eq!(settings.policy.cost.max_usd, 40.0);
            assert_eq!(settings.policy.risk.max_level, RiskLevel::High);
            assert_eq!(settings.logging.format, LogFormat::Json);
        }

        #[test]
        #[serial]
        fn file_overrides_defaults() {
            clear_env();
            let file = settings_file(
                r#"
                [policy.risk]
                max_level = "low"

                [policy.cost]
                max_usd = 12.5

                [policy.rollback]
                latency_ms = 400
                "#,
            );

            let settings = ConductorSettings::load(Some(file.path())).unwrap();
            assert_eq!(settings.policy.risk.max_level, RiskLevel::Low);
            assert_eq!(settings.policy.cost.max_usd, 12.5);
            assert_eq!(settings.policy.rollback.latency_ms, 400);
            assert_eq!(settings.policy.deployment.strategy, "canary");
        }

        #[test]
        #[serial]
        fn environment_wins_over_file() {
            clear_env();
            let file = settings_file(
                r#"
                [policy.cost]
                max_usd = 12.5
                "#,
            );
            unsafe {
                std::env::set_var(COST_VAR, "40");
            }

            let result = ConductorSettings::load(Some(file.path()));
            clear_env();

            assert_eq!(result.unwrap().policy.cost.max_usd, 40.0);
        }

        #[test]
        #[serial]
        fn camel_case_file_is_an_error() {
            clear_env();
            let file = settings_file(
                r#"
                [policy.cost]
                maxUsd = 10
                "#,
            );

            let err = ConductorSettings::load(Some(file.path())).unwrap_err();
            assert!(matches!(err, SettingsError::Source(_)), "{err}");
        }

        #[test]
        #[serial]
        fn invalid_environment_policy_is_rejected() {
            clear_env();
            unsafe {
                std::env::set_var(COST_VAR, "-3");
            }

            let result = ConductorSettings::load(None);
            clear_env();

            assert!(matches!(
                result,
                Err(SettingsError::Policy(PolicyError::InvalidMaxCost(_)))
            ));
        }

        #[test]
        #[serial]
        fn missing_file_is_a_source_error() {
            clear_env();
            let err = ConductorSettings::load(Some(Path::new("/nonexistent/conductor.toml")))
                .unwrap_err();
            assert!(matches!(err, SettingsError::Source(_)));
        }
    }
}
