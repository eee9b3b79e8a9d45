//! Attribute extraction from scraped HTML pages

use crate::{Error, Result};
use scraper::{Html, Selector};

/// Extract `attribute` from the first node matching `selector` in `html`
///
/// `step` names the caller in the error raised when the node or the
/// attribute is absent.
pub fn scrape_attribute(html: &str, step: &str, selector: &str, attribute: &str) -> Result<String> {
    let parsed = Selector::parse(selector)
        .map_err(|e| Error::config(format!("invalid selector `{}`: {}", selector, e)))?;

    let document = Html::parse_document(html);
    document
        .select(&parsed)
        .next()
        .and_then(|node| node.value().attr(attribute))
        .map(str::to_owned)
        .ok_or_else(|| Error::scrape(step, selector, attribute))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <form id="login"><input name="token" value="abc123"><input name="other"></form>
        </body></html>
    "#;

    #[test]
    fn test_extracts_attribute() {
        let value = scrape_attribute(PAGE, "fixture", "#login > input[name=token]", "value").unwrap();
        assert_eq!(value, "abc123");
    }

    #[test]
    fn test_missing_node_names_step_and_selector() {
        let err = scrape_attribute(PAGE, "fixture step", "#signup > input", "value").unwrap_err();
        match err {
            Error::Scrape {
                step,
                selector,
                attribute,
            } => {
                assert_eq!(step, "fixture step");
                assert_eq!(selector, "#signup > input");
                assert_eq!(attribute, "value");
            }
            other => panic!("expected scrape error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_attribute_is_error() {
        let err = scrape_attribute(PAGE, "fixture", "#login > input[name=other]", "value").unwrap_err();
        assert!(matches!(err, Error::Scrape { .. }));
    }

    #[test]
    fn test_invalid_selector_is_config_error() {
        let err = scrape_attribute(PAGE, "fixture", "#login >> ][", "value").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
