use crate::config::GeneratorConfig;
use crate::error::ExtractError;
use crate::html::HtmlDocument;
use crate::rules::{self, Page};
use crate::value::prune;
use regex::{Captures, Regex};
use schemagen_xpath1::{ExtensionValue, FunctionRegistry, XPathError};
use std::sync::LazyLock;

/// Prefix bound to [`NAMESPACE_URI`] in rule expressions.
pub const NAMESPACE_PREFIX: &str = "sg";
pub const NAMESPACE_URI: &str = "urn:SchemaGenerator";

static BODY_END_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</body\s*>").expect("BUG: invalid BODY_END_RE regex literal"));

/// Whether `class` is one of the whitespace-separated tokens of
/// `class_list`, ignoring case. A missing list contains nothing.
pub fn css_class_contains(class_list: Option<&str>, class: &str) -> bool {
    let class = class.to_lowercase();
    class_list
        .unwrap_or_default()
        .split_whitespace()
        .any(|token| token.to_lowercase() == class)
}

/// The functions every rule expression may call: `sg:css-class-contains`.
pub fn extension_functions() -> FunctionRegistry {
    let mut functions = FunctionRegistry::new();
    functions.register_namespace(NAMESPACE_PREFIX, NAMESPACE_URI);
    functions.register_extension(NAMESPACE_URI, "css-class-contains", |args| match args {
        [class_list, Some(class)] => Ok(ExtensionValue::Boolean(css_class_contains(
            class_list.as_deref(),
            class,
        ))),
        [_, None] => Ok(ExtensionValue::Boolean(false)),
        _ => Err(XPathError::function(
            "css-class-contains",
            format!("expects 2 arguments, got {}", args.len()),
        )),
    });
    functions
}

/// Builds the schema.org description of one page at a time.
#[derive(Debug, Clone)]
pub struct SchemaGenerator {
    config: GeneratorConfig,
}

impl SchemaGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Extracts the JSON-LD tree for `html`.
    ///
    /// Missing data is left out of the result. A rule query that fails aborts
    /// the call; no partial tree is returned.
    pub fn as_value(&self, html: &str) -> Result<serde_json::Value, ExtractError> {
        extract(&HtmlDocument::parse(html), &self.config, extension_functions())
    }

    /// [`as_value`](Self::as_value) as compact JSON. Non-ASCII text and `/`
    /// are written as is.
    pub fn as_string(&self, html: &str) -> Result<String, ExtractError> {
        Ok(serde_json::to_string(&self.as_value(html)?)?)
    }
}

/// Runs every page rule over `document` with `functions` available to the
/// rule expressions.
pub fn extract(
    document: &HtmlDocument,
    config: &GeneratorConfig,
    functions: FunctionRegistry,
) -> Result<serde_json::Value, ExtractError> {
    let page = Page::new(document, config, functions);
    log::debug!("Extracting schema for '{}'", config.page_url);
    let tree = prune(rules::web_page(&page));
    page.check()?;
    Ok(tree.into_json())
}

/// Adds `payload` as an `application/ld+json` script before every `</body>`.
/// `</` in the payload is escaped so it cannot close the script early.
pub fn inject_json_ld(html: &str, payload: &str) -> String {
    let script = format!(
        "<script type='application/ld+json'>{}</script>",
        payload.replace("</", r"<\/")
    );
    BODY_END_RE
        .replace_all(html, |caps: &Captures| format!("{}{}", script, &caps[0]))
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_tokens_match_whole_words_only() {
        assert!(css_class_contains(Some("a b c"), "b"));
        assert!(css_class_contains(Some("\tnews__item\n"), "news__item"));
        assert!(css_class_contains(Some("Header__Logo"), "header__logo"));
        assert!(!css_class_contains(Some("news__items"), "news__item"));
        assert!(!css_class_contains(Some("xnews__item"), "news__item"));
        assert!(!css_class_contains(None, "a"));
    }

    #[test]
    fn extension_rejects_wrong_arity() {
        let functions = extension_functions();
        let doc = HtmlDocument::parse("<p class='x'></p>");
        let config = GeneratorConfig::default();
        let page = Page::new(&doc, &config, functions);
        assert!(page.node(crate::query::Scope::Document, "//p[sg:css-class-contains(@class)]").is_none());
        assert!(page.check().is_err());
    }

    #[test]
    fn injection_precedes_every_body_end() {
        let html = "<html><body><p>a</p></BODY><body></body ></html>";
        let out = inject_json_ld(html, r#"{"name":"</script>"}"#);
        assert_eq!(
            out,
            "<html><body><p>a</p><script type='application/ld+json'>{\"name\":\"<\\/script>\"}</script></BODY>\
             <body><script type='application/ld+json'>{\"name\":\"<\\/script>\"}</script></body ></html>"
        );
    }

    #[test]
    fn injection_without_body_is_a_no_op() {
        assert_eq!(inject_json_ld("<p>fragment</p>", "{}"), "<p>fragment</p>");
    }

    #[test]
    fn payload_dollars_are_literal() {
        let out = inject_json_ld("</body>", r#"{"price":"$0"}"#);
        assert!(out.contains(r#"{"price":"$0"}"#));
    }

    #[test]
    fn compact_output_keeps_unicode_and_slashes() {
        let generator = SchemaGenerator::new(GeneratorConfig::new("/", "https://shop.example", "Лавка"));
        let json = generator.as_string("<title>Книги</title>").unwrap();
        assert!(json.starts_with(r#"{"@context":"https://schema.org/","@type":"WebPage","name":"Книги""#));
    }
}
