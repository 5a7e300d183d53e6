//! Default values shared by [`Config`](crate::Config) and
//! [`AjaxSettings`](crate::AjaxSettings).

use crate::logging::LogFormat;

/// Default log filter expression.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Request header whose value marks a request as Ajax.
pub const DEFAULT_AJAX_HEADER: &str = "X-Requested-With";

/// Value of [`DEFAULT_AJAX_HEADER`] sent by browser Ajax libraries.
pub const DEFAULT_AJAX_HEADER_VALUE: &str = "XMLHttpRequest";

/// Request parameter that marks a request as Ajax when headers are unavailable.
pub const DEFAULT_AJAX_MARKER_PARAMETER: &str = "ajax";

/// Parameter carrying the name of the activated action link.
pub const DEFAULT_ACTION_LINK_PARAMETER: &str = "actionLink";

/// Parameter carrying the name of the activated action button.
pub const DEFAULT_ACTION_BUTTON_PARAMETER: &str = "actionButton";

/// Character encoding declared on responses.
pub const DEFAULT_CHARSET: &str = "UTF-8";

#[must_use]
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value for serde defaults.
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

#[must_use]
pub fn default_log_format() -> LogFormat {
    LogFormat::Json
}

#[must_use]
pub fn default_ajax_header_name() -> String {
    DEFAULT_AJAX_HEADER.to_owned()
}

#[must_use]
pub fn default_ajax_header_value() -> String {
    DEFAULT_AJAX_HEADER_VALUE.to_owned()
}

#[must_use]
pub fn default_ajax_marker_parameter() -> String {
    DEFAULT_AJAX_MARKER_PARAMETER.to_owned()
}

#[must_use]
pub fn default_action_link_parameter() -> String {
    DEFAULT_ACTION_LINK_PARAMETER.to_owned()
}

#[must_use]
pub fn default_action_button_parameter() -> String {
    DEFAULT_ACTION_BUTTON_PARAMETER.to_owned()
}

#[must_use]
pub fn default_charset() -> String {
    DEFAULT_CHARSET.to_owned()
}
