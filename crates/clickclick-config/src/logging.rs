use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Output format of the dispatch and registry logs, selected by `log_format`
/// or `CLICKCLICK_LOG_FORMAT`.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// One JSON object per event with request span fields flattened in.
    #[default]
    Json,
    /// Single-line text for local development.
    Compact,
}

/// Raised when `log_format` names an unknown format.
pub type LogFormatParseError = strum::ParseError;

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "tests use expect to surface parse failures"
)]
mod tests {
    use std::str::FromStr;

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("json", LogFormat::Json)]
    #[case("JSON", LogFormat::Json)]
    #[case("compact", LogFormat::Compact)]
    #[case("Compact", LogFormat::Compact)]
    fn parses_case_insensitively(#[case] input: &str, #[case] expected: LogFormat) {
        assert_eq!(LogFormat::from_str(input).expect("format parses"), expected);
    }

    #[test]
    fn rejects_unknown_format() {
        assert!(LogFormat::from_str("yaml").is_err());
    }

    #[test]
    fn displays_snake_case() {
        assert_eq!(LogFormat::Compact.to_string(), "compact");
    }
}
