//! Fragment factories built from `[fragments]` templates.
//!
//! A template containing `{value}` receives the directive value with one
//! enclosing delimiter pair removed and HTML special characters escaped.
//! Any other template is emitted as is.

use std::collections::BTreeMap;

use blatex_markup::{DirectiveSyntax, FragmentFactory, FragmentRegistry, escape_html};

/// Placeholder replaced by the directive value.
const VALUE_PLACEHOLDER: &str = "{value}";

/// Build a registry with one factory per configured template.
pub(crate) fn registry(
    templates: &BTreeMap<String, String>,
    syntax: &DirectiveSyntax,
) -> FragmentRegistry<String> {
    let mut registry = FragmentRegistry::new();
    for (key, template) in templates {
        registry.insert(key, factory(template.clone(), syntax.clone()));
    }
    registry
}

fn factory(template: String, syntax: DirectiveSyntax) -> FragmentFactory<String> {
    if template.contains(VALUE_PLACEHOLDER) {
        FragmentFactory::with_arg(move |value| {
            let value = escape_html(syntax.strip_delimiters(value));
            template.replace(VALUE_PLACEHOLDER, &value)
        })
    } else {
        FragmentFactory::no_arg(move || template.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn templates() -> BTreeMap<String, String> {
        BTreeMap::from([
            ("math".to_owned(), "<m>{value}</m>".to_owned()),
            ("hr".to_owned(), "<hr/>".to_owned()),
        ])
    }

    #[test]
    fn test_registry_has_all_keys() {
        let registry = registry(&templates(), &DirectiveSyntax::default());
        assert_eq!(registry.len(), 2);
        assert!(registry.contains("MATH"));
        assert!(registry.contains("hr"));
    }

    #[test]
    fn test_value_template_strips_and_escapes() {
        let registry = registry(&templates(), &DirectiveSyntax::default());
        let math = registry.get("math").unwrap();
        assert_eq!(math.invoke("@(a < b)"), "<m>a &lt; b</m>");
        assert_eq!(math.invoke("x"), "<m>x</m>");
        assert_eq!(math.invoke(""), "<m></m>");
    }

    #[test]
    fn test_plain_template_is_no_arg() {
        let registry = registry(&templates(), &DirectiveSyntax::default());
        let hr = registry.get("hr").unwrap();
        assert!(matches!(hr, FragmentFactory::NoArg(_)));
        assert_eq!(hr.invoke("(ignored)"), "<hr/>");
    }

    #[test]
    fn test_placeholder_repeated() {
        let templates = BTreeMap::from([("t".to_owned(), "{value}|{value}".to_owned())]);
        let registry = registry(&templates, &DirectiveSyntax::default());
        assert_eq!(registry.get("t").unwrap().invoke("'x'"), "x|x");
    }
}
