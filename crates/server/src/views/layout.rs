use model::NavigationEvent;

use crate::api::{PATH_END_SESSION, PATH_NAVIGATE};

pub const PLACEHOLDER_GLYPH: &str = "🏛️";

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; max-width: 960px; margin: 0 auto; padding: 2rem 1rem; color: #1f2933; }
.main-header { display: flex; align-items: center; gap: 1rem; margin-bottom: 2rem; }
.logo-container { width: 80px; height: 80px; font-size: 3rem; }
.logo-container img { width: 80px; height: 80px; object-fit: contain; }
.portrait { font-size: 4rem; }
.columns { display: grid; grid-template-columns: repeat(auto-fit, minmax(240px, 1fr)); gap: 1rem; }
.metric-card, .section-card { background-color: #f8f9fa; border-radius: 0.5rem; border: 1px solid #e0e0e0; }
.metric-card { padding: 1rem; }
.section-card { padding: 1.5rem; margin-bottom: 1rem; }
.metric-label { font-size: 0.75rem; color: #666; text-transform: uppercase; margin: 0; }
.metric-value { font-size: 1.5rem; font-weight: bold; margin: 0.25rem 0; }
.warning { background-color: #fff8e1; border: 1px solid #f0c36d; padding: 1rem; border-radius: 0.5rem; }
.error { background-color: #fdecea; border: 1px solid #f5a9a3; padding: 1rem; border-radius: 0.5rem; }
.role { background-color: #e8f1fb; padding: 0.5rem 1rem; border-radius: 0.5rem; font-weight: bold; }
.advice-text li { margin-bottom: 0.3rem; }
form.inline { display: inline; }
button { padding: 0.5rem 1rem; border-radius: 0.5rem; border: 1px solid #ccc; background: #fff; cursor: pointer; }
button.primary { background: #ff4b4b; border-color: #ff4b4b; color: #fff; }
button:disabled { opacity: 0.6; cursor: default; }
label { display: block; margin-bottom: 0.75rem; }
label input { display: block; width: 100%; padding: 0.4rem; margin-top: 0.25rem; box-sizing: border-box; }
footer { margin-top: 2rem; color: #666; font-size: 0.85rem; }
"#;

/// Page content before it is wrapped into a complete document.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPage {
    pub title: &'static str,
    pub body: String,
    /// Browser reloads the page after this many seconds.
    pub refresh_seconds: Option<u32>,
}

impl RenderedPage {
    pub fn new(title: &'static str, body: String) -> Self {
        Self {
            title,
            body,
            refresh_seconds: None,
        }
    }

    pub fn into_html(self) -> String {
        let refresh = self
            .refresh_seconds
            .map(|seconds| format!("<meta http-equiv=\"refresh\" content=\"{seconds}\">\n"))
            .unwrap_or_default();

        format!(
            "<!DOCTYPE html>\n\
            <html lang=\"en\">\n\
            <head>\n\
            <meta charset=\"utf-8\">\n\
            <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
            {refresh}\
            <title>{title}</title>\n\
            <style>{STYLE}</style>\n\
            </head>\n\
            <body>\n\
            {body}\n\
            {footer}\n\
            </body>\n\
            </html>\n",
            title = escape_html(self.title),
            body = self.body,
            footer = footer(),
        )
    }
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Button which posts a navigation event.
pub fn nav_button(event: NavigationEvent, label: &str, primary: bool) -> String {
    format!(
        "<form class=\"inline\" method=\"post\" action=\"{PATH_NAVIGATE}\">\
        <input type=\"hidden\" name=\"event\" value=\"{event}\">\
        <button type=\"submit\"{class}>{label}</button>\
        </form>",
        event = event.form_value(),
        class = if primary { " class=\"primary\"" } else { "" },
        label = escape_html(label),
    )
}

/// Image from the assets route or the placeholder glyph.
pub fn image_or_placeholder(asset: Option<&str>, alt: &str, width: u32) -> String {
    match asset {
        Some(name) => format!(
            "<img src=\"/assets/{name}\" alt=\"{alt}\" width=\"{width}\">",
            name = escape_html(name),
            alt = escape_html(alt),
        ),
        None => format!("<span role=\"img\" aria-label=\"{}\">{PLACEHOLDER_GLYPH}</span>", escape_html(alt)),
    }
}

fn footer() -> String {
    format!(
        "<footer>\
        <p>© 2026 Astra Heritage Holdings LLC. Astra Heritage™ is a registered trademark.</p>\
        <form class=\"inline\" method=\"post\" action=\"{PATH_END_SESSION}\">\
        <button type=\"submit\">Clear my data</button>\
        </form>\
        </footer>"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_special_characters_are_escaped() {
        assert_eq!(
            escape_html("<script>alert('x') & \"y\"</script>"),
            "&lt;script&gt;alert(&#39;x&#39;) &amp; &quot;y&quot;&lt;/script&gt;"
        );
        assert_eq!(escape_html("8, 15"), "8, 15");
    }

    #[test]
    fn refresh_is_added_only_when_requested() {
        let page = RenderedPage::new("Title", "<p>body</p>".to_string());
        assert!(!page.clone().into_html().contains("http-equiv=\"refresh\""));

        let page = RenderedPage {
            refresh_seconds: Some(2),
            ..page
        };
        let html = page.into_html();
        assert!(html.contains("<meta http-equiv=\"refresh\" content=\"2\">"));
        assert!(html.contains("<p>body</p>"));
    }

    #[test]
    fn nav_button_posts_event() {
        let html = nav_button(NavigationEvent::OpenAbout, "About Us", false);
        assert!(html.contains("action=\"/navigate\""));
        assert!(html.contains("name=\"event\" value=\"open_about\""));
        assert!(html.contains(">About Us</button>"));
    }

    #[test]
    fn missing_image_uses_placeholder() {
        assert!(image_or_placeholder(None, "Logo", 80).contains(PLACEHOLDER_GLYPH));
        assert!(image_or_placeholder(Some("logo.png"), "Logo", 80).contains("src=\"/assets/logo.png\""));
    }
}
