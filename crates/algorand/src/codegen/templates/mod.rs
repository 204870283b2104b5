//! Template system for Go client generation
//!
//! Contains Handlebars templates for the generated files of one client package.

use appclient_common::{Error, Result};
use handlebars::{handlebars_helper, Handlebars};

/// Template names paired with their sources
const TEMPLATES: [(&str, &str); 5] = [
    ("appspec", include_str!("appspec.hbs")),
    ("types", include_str!("types.hbs")),
    ("client", include_str!("client.hbs")),
    ("composer", include_str!("composer.hbs")),
    ("factory", include_str!("factory.hbs")),
];

handlebars_helper!(comment: |text: str| {
    text.lines()
        .map(|line| format!("// {}", line).trim_end().to_string())
        .collect::<Vec<_>>()
        .join("\n")
});
handlebars_helper!(join: |items: array, sep: str| {
    items
        .iter()
        .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
        .collect::<Vec<_>>()
        .join(sep)
});
handlebars_helper!(lower: |text: str| text.to_lowercase());
handlebars_helper!(upper: |text: str| text.to_uppercase());

/// Template manager for Go client generation
pub struct AlgorandTemplateManager {
    handlebars: Handlebars<'static>,
}

impl AlgorandTemplateManager {
    /// Create a new template manager and register all templates
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();
        // Generated code is Go, not HTML
        handlebars.register_escape_fn(handlebars::no_escape);

        handlebars.register_helper("comment", Box::new(comment));
        handlebars.register_helper("join", Box::new(join));
        handlebars.register_helper("lower", Box::new(lower));
        handlebars.register_helper("upper", Box::new(upper));

        Self::register_templates(&mut handlebars)?;

        Ok(Self { handlebars })
    }

    /// Register all built-in templates
    fn register_templates(handlebars: &mut Handlebars) -> Result<()> {
        for (name, source) in TEMPLATES {
            handlebars
                .register_template_string(name, source)
                .map_err(|e| {
                    Error::template(format!("Failed to register {} template: {}", name, e))
                })?;
        }
        Ok(())
    }

    /// Render a template with the given data
    pub fn render(&self, template_name: &str, data: &serde_json::Value) -> Result<String> {
        self.handlebars
            .render(template_name, data)
            .map_err(|e| {
                Error::template(format!("Failed to render template {}: {}", template_name, e))
            })
    }

    /// Get list of available templates
    pub fn available_templates(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlebars.get_templates().keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_all_templates_registered() {
        let manager = AlgorandTemplateManager::new().unwrap();
        assert_eq!(
            manager.available_templates(),
            vec!["appspec", "client", "composer", "factory", "types"]
        );
    }

    #[test]
    fn test_helpers_and_no_escaping() {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars.register_helper("comment", Box::new(comment));
        handlebars.register_helper("join", Box::new(join));
        handlebars.register_helper("upper", Box::new(upper));

        let out = handlebars
            .render_template("{{comment text}}|{{join items \", \"}}|{{upper t}}|{{ty}}", &json!({
                "text": "first\n\nsecond",
                "items": ["a", "b"],
                "t": "noop",
                "ty": "*big.Int",
            }))
            .unwrap();
        assert_eq!(out, "// first\n//\n// second|a, b|NOOP|*big.Int");
    }

    #[test]
    fn test_unknown_template_is_template_error() {
        let manager = AlgorandTemplateManager::new().unwrap();
        let err = manager.render("missing", &json!({})).unwrap_err();
        assert!(matches!(err, Error::Template(_)));
    }
}
