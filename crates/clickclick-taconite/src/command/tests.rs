//! Unit tests for command validation and rendering.

use rstest::rstest;

use super::*;
use crate::component::MarkupComponent;
use crate::resource::InlineScript;

#[rstest]
#[case("replaceContent", Verb::ReplaceContent)]
#[case("addHeader", Verb::AddHeader)]
#[case(" eval ", Verb::Eval)]
#[case("highlight", Verb::Custom("highlight".to_owned()))]
fn verbs_parse_from_wire_names(#[case] text: &str, #[case] expected: Verb) {
    assert_eq!(text.parse::<Verb>().expect("verb parses"), expected);
}

#[test]
fn blank_verb_is_rejected() {
    assert_eq!("  ".parse::<Verb>(), Err(CommandError::BlankVerb));
    let error = Command::builder(Verb::Custom(String::new()))
        .target("#a")
        .build()
        .expect_err("blank custom verb");
    assert_eq!(error, CommandError::BlankVerb);
}

#[test]
fn replace_renders_selector_and_content() {
    let command = Command::builder(Verb::Replace)
        .target("#foo")
        .content("bar")
        .build()
        .expect("command builds");
    assert_eq!(command.to_markup(), "<replace select=\"#foo\">bar\n</replace>");
}

#[test]
fn contentless_command_self_closes() {
    let command = Command::builder(Verb::Hide)
        .target("#panel")
        .build()
        .expect("command builds");
    assert_eq!(command.to_markup(), r##"<hide select="#panel"/>"##);
}

#[test]
fn attributes_render_in_fixed_order() {
    let command = Command::builder(Verb::Attr)
        .argument("disabled")
        .attribute("class", "busy")
        .argument("true")
        .target("#save")
        .build()
        .expect("command builds");
    assert_eq!(
        command.to_markup(),
        r##"<attr select="#save" name="class" value="busy" arg1="disabled" arg2="true"/>"##
    );
}

#[rstest]
#[case::append(Verb::Append)]
#[case::remove(Verb::Remove)]
#[case::attr(Verb::Attr)]
#[case::custom(Verb::Custom("flash".to_owned()))]
fn selector_is_required(#[case] verb: Verb) {
    let expected = CommandError::missing_selector(verb.as_str());
    let error = Command::builder(verb)
        .content("x")
        .build()
        .expect_err("selector missing");
    assert_eq!(error, expected);
}

#[test]
fn component_content_supplies_selector() {
    let component = MarkupComponent::new("<b id=\"counter\">5</b>")
        .with_id("counter")
        .into_ref();
    let command = Command::builder(Verb::Replace)
        .content(&component)
        .build()
        .expect("selector derived");
    assert_eq!(command.selector(), Some("#counter"));
}

#[test]
fn anonymous_component_content_is_an_error() {
    let component = MarkupComponent::new("<b>5</b>").into_ref();
    let error = Command::builder(Verb::Replace)
        .content(component)
        .build()
        .expect_err("no identity");
    assert!(matches!(error, CommandError::UnresolvableSelector { .. }));
}

#[test]
fn eval_wraps_script_in_cdata() {
    let command = Command::builder(Verb::Eval)
        .content("alert('x');")
        .build()
        .expect("eval builds");
    assert_eq!(command.selector(), None);
    assert_eq!(
        command.to_markup(),
        "<eval><![CDATA[ alert('x');\n ]]></eval>"
    );
}

#[rstest]
#[case::missing(Vec::new(), 0)]
#[case::two(vec!["a();", "b();"], 2)]
fn eval_requires_exactly_one_script(#[case] scripts: Vec<&str>, #[case] found: usize) {
    let builder = scripts
        .into_iter()
        .fold(Command::builder(Verb::Eval), |builder, script| {
            builder.content(script)
        });
    assert_eq!(
        builder.build().expect_err("eval invalid"),
        CommandError::EvalContent { found }
    );
}

#[test]
fn eval_rejects_resource_content() {
    let error = Command::builder(Verb::Eval)
        .content(HeadResource::from(InlineScript::new("a();")))
        .build()
        .expect_err("resource is not a script");
    assert_eq!(error, CommandError::EvalContent { found: 1 });
}

#[test]
fn blank_text_content_is_rejected() {
    let error = Command::builder(Verb::Eval)
        .content("   ")
        .build()
        .expect_err("blank script");
    assert_eq!(error, CommandError::blank_content("eval"));
}

#[test]
fn attr_requires_name_or_arguments() {
    let error = Command::builder(Verb::Attr)
        .target("#a")
        .build()
        .expect_err("attr without attributes");
    assert!(matches!(error, CommandError::MissingAttribute { .. }));
}

#[test]
fn character_data_flag_wraps_any_verb() {
    let command = Command::builder(Verb::Append)
        .target("#log")
        .content("<li>a & b</li>")
        .character_data(true)
        .build()
        .expect("command builds");
    assert_eq!(
        command.to_markup(),
        "<append select=\"#log\"><![CDATA[ <li>a & b</li>\n ]]></append>"
    );
}

#[test]
fn every_content_item_is_followed_by_a_newline() {
    let component = MarkupComponent::new("<i>c</i>").with_id("c").into_ref();
    let command = Command::builder(Verb::Append)
        .target("#list")
        .content("a")
        .content(component)
        .content(HeadResource::script_import("/x.js"))
        .build()
        .expect("command builds");
    assert_eq!(
        command.to_markup(),
        concat!(
            "<append select=\"#list\">a\n",
            "<i>c</i>\n",
            "<script type=\"text/javascript\" src=\"/x.js\"></script>\n",
            "</append>"
        )
    );
}
