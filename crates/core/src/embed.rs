//! Embed surfaces: the copy-paste snippets handed to waitlist owners and the
//! self-contained HTML page served at `/embed/{slug}`.

use askama::Template;

use crate::customization::{WidgetConfig, DEFAULT_BUTTON_COLOR, DEFAULT_BUTTON_TEXT};

pub const DEFAULT_EMBED_WIDTH: &str = "500";
pub const DEFAULT_EMBED_HEIGHT: &str = "400";

/// Global the embed page assigns the resolved configuration to. The widget
/// script reads it instead of fetching.
pub const PRELOADED_CONFIG_GLOBAL: &str = "__WAITLIST_CONFIG__";

/// Owner-chosen options for a generated embed snippet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedOptions {
    /// Pixels, or a CSS length such as `100%`.
    pub width: String,
    pub height: String,
    pub button_text: String,
    pub color: String,
}

impl Default for EmbedOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_EMBED_WIDTH.to_string(),
            height: DEFAULT_EMBED_HEIGHT.to_string(),
            button_text: DEFAULT_BUTTON_TEXT.to_string(),
            color: DEFAULT_BUTTON_COLOR.to_string(),
        }
    }
}

/// Generated embed code for one waitlist.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedCode {
    pub embed_url: String,
    pub iframe: String,
    pub script: String,
}

impl EmbedCode {
    pub fn generate(base_url: &str, slug: &str, options: &EmbedOptions) -> askama::Result<Self> {
        let embed_url = embed_url(base_url, slug, options);
        Ok(Self {
            iframe: iframe_snippet(&embed_url, options)?,
            script: script_snippet(&embed_url, slug, options)?,
            embed_url,
        })
    }
}

#[derive(Template)]
#[template(path = "embed/iframe.html")]
struct IframeSnippet<'a> {
    embed_url: &'a str,
    width: &'a str,
    height: &'a str,
}

/// A placeholder `div` plus an inline script that injects the iframe.
#[derive(Template)]
#[template(path = "embed/script.html")]
struct ScriptSnippet<'a> {
    embed_url: &'a str,
    slug: &'a str,
    width: &'a str,
    height: &'a str,
}

#[derive(Template)]
#[template(path = "embed/page.html")]
struct EmbedPage<'a> {
    config: &'a WidgetConfig,
    config_global: &'a str,
    script_src: &'a str,
}

#[derive(Template)]
#[template(path = "embed/not_found.html")]
struct NotFoundPage<'a> {
    slug: &'a str,
}

/// `{base}/embed/{slug}`, with `buttonText` and `color` appended only when
/// they differ from the defaults.
pub fn embed_url(base_url: &str, slug: &str, options: &EmbedOptions) -> String {
    let mut params = Vec::new();
    if options.button_text != DEFAULT_BUTTON_TEXT {
        params.push(format!("buttonText={}", urlencoding::encode(&options.button_text)));
    }
    if options.color != DEFAULT_BUTTON_COLOR {
        params.push(format!("color={}", urlencoding::encode(&options.color)));
    }

    let base = base_url.trim_end_matches('/');
    if params.is_empty() {
        format!("{base}/embed/{slug}")
    } else {
        format!("{base}/embed/{slug}?{}", params.join("&"))
    }
}

pub fn iframe_snippet(embed_url: &str, options: &EmbedOptions) -> askama::Result<String> {
    IframeSnippet {
        embed_url,
        width: &options.width,
        height: &options.height,
    }
    .render()
}

pub fn script_snippet(embed_url: &str, slug: &str, options: &EmbedOptions) -> askama::Result<String> {
    ScriptSnippet {
        embed_url,
        slug,
        width: &options.width,
        height: &options.height,
    }
    .render()
}

/// Self-contained HTML page for the iframe embed.
///
/// The resolved configuration is inlined so the widget renders without a
/// second round trip; `script_src` is the widget script URL.
pub fn render_embed_page(config: &WidgetConfig, script_src: &str) -> askama::Result<String> {
    EmbedPage {
        config,
        config_global: PRELOADED_CONFIG_GLOBAL,
        script_src,
    }
    .render()
}

/// Page served by `/embed/{slug}` when no waitlist has that slug.
pub fn render_not_found_page(slug: &str) -> askama::Result<String> {
    NotFoundPage { slug }.render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customization::{PartialCustomization, WidgetWaitlist};

    const BASE: &str = "https://waitlist.example.com";

    #[test]
    fn default_options_produce_bare_url() {
        let url = embed_url(BASE, "acme", &EmbedOptions::default());
        assert_eq!(url, "https://waitlist.example.com/embed/acme");
    }

    #[test]
    fn non_default_options_are_encoded() {
        let options = EmbedOptions {
            button_text: "Count me in".into(),
            color: "#10b981".into(),
            ..Default::default()
        };
        let url = embed_url(&format!("{BASE}/"), "acme", &options);
        assert_eq!(
            url,
            "https://waitlist.example.com/embed/acme?buttonText=Count%20me%20in&color=%2310b981"
        );
    }

    #[test]
    fn iframe_snippet_uses_dimensions() {
        let options = EmbedOptions {
            width: "100%".into(),
            ..Default::default()
        };
        let code = EmbedCode::generate(BASE, "acme", &options).unwrap();
        assert!(code.iframe.starts_with(r#"<iframe src="https://waitlist.example.com/embed/acme""#));
        assert!(code.iframe.contains(r#"width="100%" height="400""#));
    }

    #[test]
    fn script_snippet_targets_slug_placeholder() {
        let code = EmbedCode::generate(BASE, "acme", &EmbedOptions::default()).unwrap();
        assert!(code.script.starts_with(r#"<div id="waitlist-embed-acme"></div>"#));
        assert!(code.script.contains(r#"iframe.src = "https://waitlist.example.com/embed/acme";"#));
        assert!(code.script.contains("getElementById('waitlist-embed-acme')"));
    }

    #[test]
    fn embed_page_inlines_escaped_config() {
        let config = WidgetConfig::resolve(
            WidgetWaitlist {
                id: 1,
                name: "<Acme & Co>".into(),
                slug: "acme".into(),
                signup_count: 0,
            },
            &PartialCustomization {
                description_text: Some("</script><script>alert(1)</script>".into()),
                ..Default::default()
            },
        );
        let html = render_embed_page(&config, "/api/v1/widget/script").unwrap();

        assert!(html.contains("<title>&lt;Acme &amp; Co&gt;</title>"));
        assert!(html.contains(r#"<div data-waitlist-slug="acme"></div>"#));
        assert!(html.contains(r#"<script src="/api/v1/widget/script" defer></script>"#));
        assert!(html.contains("window.__WAITLIST_CONFIG__ = {"));
        assert!(!html.contains("</script><script>alert"));
        assert!(html.contains(r#""descriptionText":"\u003c/script\u003e"#));
    }

    #[test]
    fn iframe_attributes_are_escaped() {
        let options = EmbedOptions {
            width: r#"1" onload="alert(1)"#.into(),
            ..Default::default()
        };
        let iframe = iframe_snippet("https://waitlist.example.com/embed/acme?a=1&b=2", &options).unwrap();
        assert!(iframe.contains("?a=1&amp;b=2"));
        assert!(!iframe.contains(r#"" onload=""#));
    }

    #[test]
    fn script_snippet_keeps_values_inside_js_strings() {
        let options = EmbedOptions {
            height: "400'; alert(1); '</script>".into(),
            ..Default::default()
        };
        let script = script_snippet("https://waitlist.example.com/embed/acme", "acme", &options).unwrap();
        assert!(!script.contains("'; alert(1); '"));
        assert_eq!(script.matches("</script>").count(), 1);
    }

    #[test]
    fn not_found_page_escapes_slug() {
        let html = render_not_found_page("<b>nope</b>").unwrap();
        assert!(html.contains("not found"));
        assert!(html.contains("&lt;b&gt;nope&lt;/b&gt;"));
        assert!(!html.contains("<b>"));
    }
}
