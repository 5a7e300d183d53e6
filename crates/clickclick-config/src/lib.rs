//! Shared configuration for the Ajax dispatch layer.
//!
//! Values are layered by `ortho_config`: field defaults, then a TOML file
//! (discovered, or named by `--config-path` / `CLICKCLICK_CONFIG_PATH`), then
//! `CLICKCLICK_*` environment variables, then command-line flags. The merged
//! result is validated once so that misconfiguration surfaces before the first
//! request is served.
//!
//! ```toml
//! log_filter = "clickclick_core=debug"
//! log_format = "compact"
//! ajax_marker_parameter = "xhr"
//! action_link_parameter = "actionLink"
//! ```

mod ajax;
mod defaults;
mod logging;

use std::ffi::OsString;
use std::sync::Arc;

use camino::Utf8Path;
use ortho_config::{OrthoConfig, OrthoError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use ajax::AjaxSettings;
pub use defaults::{
    DEFAULT_ACTION_BUTTON_PARAMETER, DEFAULT_ACTION_LINK_PARAMETER, DEFAULT_AJAX_HEADER,
    DEFAULT_AJAX_HEADER_VALUE, DEFAULT_AJAX_MARKER_PARAMETER, DEFAULT_CHARSET,
    DEFAULT_LOG_FILTER, default_action_button_parameter, default_action_link_parameter,
    default_ajax_header_name, default_ajax_header_value, default_ajax_marker_parameter,
    default_charset, default_log_filter, default_log_filter_string, default_log_format,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Program name handed to the loader when no command line is supplied.
pub const PROGRAM_NAME: &str = "clickclick";

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "CLICKCLICK_CONFIG_PATH";

/// Environment variable overriding [`Config::log_filter`].
pub const LOG_FILTER_ENV: &str = "CLICKCLICK_LOG_FILTER";

/// Environment variable overriding [`Config::log_format`].
pub const LOG_FORMAT_ENV: &str = "CLICKCLICK_LOG_FORMAT";

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration layer could not be read, parsed or merged.
    #[error("failed to load configuration: {source}")]
    Load {
        #[source]
        source: Arc<OrthoError>,
    },
    /// A required setting is blank.
    #[error("configuration setting '{setting}' must not be blank")]
    BlankSetting { setting: &'static str },
    /// Both action-trigger parameters share a name, so links and buttons
    /// cannot be told apart.
    #[error("action link and action button parameters must differ (both are '{name}')")]
    DuplicateActionParameter { name: String },
}

impl From<Arc<OrthoError>> for ConfigError {
    fn from(source: Arc<OrthoError>) -> Self {
        Self::Load { source }
    }
}

/// Resolved configuration consumed by the dispatcher and telemetry.
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig, PartialEq, Eq)]
#[ortho_config(prefix = "CLICKCLICK")]
pub struct Config {
    /// `tracing` filter expression.
    #[serde(default = "default_log_filter_string")]
    pub log_filter: String,
    /// Output format for the log subscriber.
    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,
    /// Request header inspected for the Ajax marker value.
    #[serde(default = "default_ajax_header_name")]
    pub ajax_header_name: String,
    /// Header value identifying an Ajax request.
    #[serde(default = "default_ajax_header_value")]
    pub ajax_header_value: String,
    /// Request parameter that flags a request as Ajax.
    #[serde(default = "default_ajax_marker_parameter")]
    pub ajax_marker_parameter: String,
    /// Parameter whose value names the activated link component.
    #[serde(default = "default_action_link_parameter")]
    pub action_link_parameter: String,
    /// Parameter whose value names the activated button component.
    #[serde(default = "default_action_button_parameter")]
    pub action_button_parameter: String,
    /// Character encoding declared on responses.
    #[serde(default = "default_charset")]
    pub charset: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            ajax_header_name: default_ajax_header_name(),
            ajax_header_value: default_ajax_header_value(),
            ajax_marker_parameter: default_ajax_marker_parameter(),
            action_link_parameter: default_action_link_parameter(),
            action_button_parameter: default_action_button_parameter(),
            charset: default_charset(),
        }
    }
}

impl Config {
    /// Loads defaults, configuration files and the process environment
    /// without parsing the host's command line.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] when a layer cannot be merged, or the
    /// first validation failure.
    pub fn resolve() -> Result<Self, ConfigError> {
        Self::resolve_from_args([OsString::from(PROGRAM_NAME)])
    }

    /// Loads every layer, treating `args` as the command line (program name
    /// first), then validates the result.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] when a layer cannot be merged, or the
    /// first validation failure.
    pub fn resolve_from_args<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let config = <Self as OrthoConfig>::load_from_iter(args)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads every layer using `path` as the configuration file.
    ///
    /// # Errors
    ///
    /// As for [`resolve_from_args`](Self::resolve_from_args).
    pub fn load_from_path(path: &Utf8Path) -> Result<Self, ConfigError> {
        Self::resolve_from_args([
            OsString::from(PROGRAM_NAME),
            OsString::from("--config-path"),
            OsString::from(path.as_str()),
        ])
    }

    /// Rejects settings that would make request classification ambiguous.
    ///
    /// # Errors
    ///
    /// Returns the first failing check.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("ajax_header_name", &self.ajax_header_name),
            ("ajax_marker_parameter", &self.ajax_marker_parameter),
            ("action_link_parameter", &self.action_link_parameter),
            ("action_button_parameter", &self.action_button_parameter),
            ("charset", &self.charset),
        ];
        if let Some((setting, _)) = required
            .into_iter()
            .find(|(_, value)| value.trim().is_empty())
        {
            return Err(ConfigError::BlankSetting { setting });
        }
        if self.action_link_parameter == self.action_button_parameter {
            return Err(ConfigError::DuplicateActionParameter {
                name: self.action_link_parameter.clone(),
            });
        }
        Ok(())
    }

    /// Returns the configured log filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Returns the configured log output format.
    #[must_use]
    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Collects the Ajax detection and targeting settings.
    #[must_use]
    pub fn ajax(&self) -> AjaxSettings {
        AjaxSettings {
            header_name: self.ajax_header_name.clone(),
            header_value: self.ajax_header_value.clone(),
            marker_parameter: self.ajax_marker_parameter.clone(),
            action_link_parameter: self.action_link_parameter.clone(),
            action_button_parameter: self.action_button_parameter.clone(),
            charset: self.charset.clone(),
        }
    }
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "tests use expect to surface validation failures"
)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        Config::default().validate().expect("defaults are valid");
    }

    #[test]
    fn ajax_settings_mirror_flat_fields() {
        let config = Config {
            ajax_marker_parameter: "xhr".to_owned(),
            charset: "ISO-8859-1".to_owned(),
            ..Config::default()
        };
        let settings = config.ajax();
        assert_eq!(settings.marker_parameter, "xhr");
        assert_eq!(settings.charset, "ISO-8859-1");
        assert_eq!(settings.header_name, DEFAULT_AJAX_HEADER);
    }

    #[test]
    fn default_ajax_settings_match_default_config() {
        assert_eq!(Config::default().ajax(), AjaxSettings::default());
    }
}
