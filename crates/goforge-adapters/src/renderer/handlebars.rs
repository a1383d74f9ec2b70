//! Handlebars-backed template renderer.
//!
//! Output is Go source and config text, so HTML escaping is off. Strict mode
//! is off as well: a missing key renders empty and is falsy in `{{#if}}`,
//! which is what templates rely on for `includes.<lib>` lookups.

use handlebars::{Handlebars, handlebars_helper, no_escape};
use tracing::instrument;

use goforge_core::{
    application::{ApplicationError, ports::TemplateRenderer},
    domain::RenderContext,
    error::GenResult,
};

handlebars_helper!(pascal: |s: str| to_pascal(s));
handlebars_helper!(upper: |s: str| s.to_uppercase());

/// Renders template text per call; nothing is cached between calls.
pub struct HandlebarsRenderer {
    registry: Handlebars<'static>,
}

impl HandlebarsRenderer {
    pub fn new() -> Self {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(no_escape);
        registry.set_strict_mode(false);
        registry.register_helper("pascal", Box::new(pascal));
        registry.register_helper("upper", Box::new(upper));
        Self { registry }
    }
}

impl Default for HandlebarsRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer for HandlebarsRenderer {
    #[instrument(skip(self, source, context))]
    fn render(&self, template: &str, source: &str, context: &RenderContext) -> GenResult<String> {
        self.registry
            .render_template(source, context)
            .map_err(|e| {
                ApplicationError::RenderingFailed {
                    template: template.into(),
                    reason: e.to_string(),
                }
                .into()
            })
    }
}

/// `go-redis` and `rate_limit` become `GoRedis` and `RateLimit`.
fn to_pascal(s: &str) -> String {
    s.split(|c: char| c == '-' || c == '_' || c == '.')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use goforge_core::{
        domain::{CommonContext, GenerateRequest, Includes, Manifest},
        error::ErrorKind,
    };

    fn common(libs: &[&str]) -> CommonContext {
        let manifest = Manifest::from_json(
            r#"{"version":"1.0.0","frameworks":{},"libs":{"redis":{},"kafka":{}}}"#,
        )
        .unwrap();
        let request = GenerateRequest::new("demo-api", "example.com/demo-api", "gin")
            .with_libs(libs.iter().copied());
        CommonContext::new(&request, Includes::derive(&manifest, &request.libs))
    }

    fn render(source: &str, context: &RenderContext) -> GenResult<String> {
        HandlebarsRenderer::new().render("templates/test.tmpl", source, context)
    }

    #[test]
    fn substitutes_common_fields() {
        let ctx = RenderContext::project(&common(&[]));
        let out = render("module {{module_name}} // {{project_name}} on {{framework}}", &ctx).unwrap();
        assert_eq!(out, "module example.com/demo-api // demo-api on gin");
    }

    #[test]
    fn does_not_html_escape() {
        let ctx = RenderContext::project(&common(&[]));
        let out = render(r#"x := "{{module_name}}" && a < b"#, &ctx).unwrap();
        assert_eq!(out, r#"x := "example.com/demo-api" && a < b"#);
    }

    #[test]
    fn includes_drive_conditionals() {
        let source = "{{#if includes.redis}}redis{{/if}}{{#if includes.kafka}}kafka{{/if}}";

        let out = render(source, &RenderContext::project(&common(&["redis"]))).unwrap();
        assert_eq!(out, "redis");
        let out = render(source, &RenderContext::project(&common(&[]))).unwrap();
        assert_eq!(out, "");
    }

    #[test]
    fn unknown_include_key_is_false() {
        let out = render(
            "{{#if includes.mongo}}yes{{else}}no{{/if}}",
            &RenderContext::project(&common(&[])),
        )
        .unwrap();
        assert_eq!(out, "no");
    }

    #[test]
    fn helpers_format_keys() {
        let ctx = RenderContext::helper(&common(&["redis"]), "redis");
        let out = render("func New{{pascal key}}() // {{upper key}}", &ctx).unwrap();
        assert_eq!(out, "func NewRedis() // REDIS");
        assert_eq!(to_pascal("go-redis_v9"), "GoRedisV9");
    }

    #[test]
    fn renders_are_independent() {
        let renderer = HandlebarsRenderer::new();
        let a = RenderContext::project(&common(&["redis"]));
        let b = RenderContext::project(&common(&[]));
        let source = "{{#if includes.redis}}on{{else}}off{{/if}}";

        assert_eq!(renderer.render("t", source, &a).unwrap(), "on");
        assert_eq!(renderer.render("t", source, &b).unwrap(), "off");
    }

    #[test]
    fn parse_error_is_template_error() {
        let err = render("{{#if includes.redis}}unclosed", &RenderContext::project(&common(&[])))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Template);
        assert!(err.to_string().contains("templates/test.tmpl"));
    }
}
