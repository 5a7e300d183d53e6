//! Settings that describe how Ajax requests are recognised and targeted.

use crate::defaults::{
    default_action_button_parameter, default_action_link_parameter, default_ajax_header_name,
    default_ajax_header_value, default_ajax_marker_parameter, default_charset,
};

/// Transport-level Ajax detection and action-trigger parameter names.
///
/// A request is treated as Ajax when it carries [`header_name`] with the value
/// [`header_value`] (compared case-insensitively), or when the
/// [`marker_parameter`] is present. The two action-trigger parameters let
/// link- and button-style components be targeted by name when their id is not
/// known at request-parsing time.
///
/// Built from [`Config::ajax`](crate::Config::ajax) or constructed directly.
///
/// [`header_name`]: AjaxSettings::header_name
/// [`header_value`]: AjaxSettings::header_value
/// [`marker_parameter`]: AjaxSettings::marker_parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AjaxSettings {
    /// Request header inspected for the Ajax marker value.
    pub header_name: String,
    /// Header value identifying an Ajax request.
    pub header_value: String,
    /// Request parameter that flags a request as Ajax.
    pub marker_parameter: String,
    /// Parameter whose value names the activated link component.
    pub action_link_parameter: String,
    /// Parameter whose value names the activated button component.
    pub action_button_parameter: String,
    /// Character encoding declared on partial responses.
    pub charset: String,
}

impl AjaxSettings {
    /// Returns both action-trigger parameter names in lookup order.
    #[must_use]
    pub fn action_trigger_parameters(&self) -> [&str; 2] {
        [
            self.action_link_parameter.as_str(),
            self.action_button_parameter.as_str(),
        ]
    }
}

impl Default for AjaxSettings {
    fn default() -> Self {
        Self {
            header_name: default_ajax_header_name(),
            header_value: default_ajax_header_value(),
            marker_parameter: default_ajax_marker_parameter(),
            action_link_parameter: default_action_link_parameter(),
            action_button_parameter: default_action_button_parameter(),
            charset: default_charset(),
        }
    }
}
