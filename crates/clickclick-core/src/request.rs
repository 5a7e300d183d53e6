//! Request model consumed by the dispatcher.

use std::collections::HashMap;

use clickclick_config::AjaxSettings;
use strum::{Display, EnumString};

/// HTTP request method relevant to page hooks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Method {
    #[default]
    Get,
    Post,
}

/// The parts of an incoming request the Ajax layer inspects.
///
/// Parameters keep their arrival order; lookups return the first value for a
/// name. Header names are matched case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AjaxRequest {
    method: Method,
    parameters: Vec<(String, String)>,
    headers: HashMap<String, String>,
    forward: bool,
}

impl AjaxRequest {
    #[must_use]
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Parses an `application/x-www-form-urlencoded` query string.
    ///
    /// A leading `?` is ignored.
    #[must_use]
    pub fn from_query(method: Method, query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let parameters = url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();
        Self {
            method,
            parameters,
            ..Self::default()
        }
    }

    /// Adds a request parameter.
    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.push((name.into(), value.into()));
        self
    }

    /// Adds a request header, replacing any previous value.
    #[must_use]
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    /// Marks the request as an internal forward from another page.
    #[must_use]
    pub fn forwarded(mut self) -> Self {
        self.forward = true;
        self
    }

    #[must_use]
    pub fn method(&self) -> Method {
        self.method
    }

    /// Returns the first value of the named parameter.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub fn has_parameter(&self, name: &str) -> bool {
        self.parameter(name).is_some()
    }

    /// Iterates all parameters in arrival order.
    pub fn parameters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.parameters
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    #[must_use]
    pub fn is_forward(&self) -> bool {
        self.forward
    }

    /// Returns `true` when the transport marks the request as Ajax, either
    /// through the configured header or the marker parameter.
    #[must_use]
    pub fn is_ajax_request(&self, settings: &AjaxSettings) -> bool {
        let header_match = self
            .header(&settings.header_name)
            .is_some_and(|value| value.eq_ignore_ascii_case(&settings.header_value));
        header_match || self.has_parameter(&settings.marker_parameter)
    }
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "tests use expect to surface unexpected failures"
)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn settings() -> AjaxSettings {
        AjaxSettings::default()
    }

    #[rstest]
    fn query_parsing_decodes_values() {
        let request = AjaxRequest::from_query(Method::Get, "?link_id=1&msg=hello+there&x=%3Cb%3E");
        assert_eq!(request.parameter("link_id"), Some("1"));
        assert_eq!(request.parameter("msg"), Some("hello there"));
        assert_eq!(request.parameter("x"), Some("<b>"));
        assert_eq!(request.parameter("missing"), None);
    }

    #[rstest]
    fn first_parameter_value_wins() {
        let request = AjaxRequest::from_query(Method::Post, "a=1&a=2");
        assert_eq!(request.parameter("a"), Some("1"));
        assert_eq!(request.parameters().count(), 2);
    }

    #[rstest]
    #[case::header(AjaxRequest::new(Method::Get).with_header("x-requested-with", "xmlhttprequest"), true)]
    #[case::marker(AjaxRequest::new(Method::Get).with_parameter("ajax", ""), true)]
    #[case::other_header(AjaxRequest::new(Method::Get).with_header("X-Requested-With", "fetch"), false)]
    #[case::plain(AjaxRequest::new(Method::Get), false)]
    fn ajax_detection(settings: AjaxSettings, #[case] request: AjaxRequest, #[case] expected: bool) {
        assert_eq!(request.is_ajax_request(&settings), expected);
    }

    #[rstest]
    #[case("post", Method::Post)]
    #[case("GET", Method::Get)]
    fn methods_parse_case_insensitively(#[case] text: &str, #[case] expected: Method) {
        assert_eq!(text.parse::<Method>().expect("method parses"), expected);
    }
}
