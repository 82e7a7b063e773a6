//! HTML rendering with TinyTemplate.
//!
//! Every page is a body template rendered into the shared layout. Values are
//! HTML-escaped by the default formatter; `linebreaksbr` escapes and turns
//! newlines into `<br>`.

use std::cell::OnceCell;

use serde::Serialize;
use serde_json::Value;
use tinytemplate::TinyTemplate;

use narrative_core::domain::Viewer;

pub type RenderError = tinytemplate::error::Error;

pub const HOME: &str = "home";
pub const POST_LIST: &str = "post_list";
pub const POST_DETAIL: &str = "post_detail";
pub const POST_EDIT: &str = "post_edit";
pub const GALLERY: &str = "gallery";
pub const LOGIN: &str = "login";
pub const ERROR: &str = "error";

const LAYOUT: &str = "layout";

const SOURCES: [(&str, &str); 8] = [
    (LAYOUT, include_str!("../templates/layout.html")),
    (HOME, include_str!("../templates/home.html")),
    (POST_LIST, include_str!("../templates/post_list.html")),
    (POST_DETAIL, include_str!("../templates/post_detail.html")),
    (POST_EDIT, include_str!("../templates/post_edit.html")),
    (GALLERY, include_str!("../templates/gallery.html")),
    (LOGIN, include_str!("../templates/login.html")),
    (ERROR, include_str!("../templates/error.html")),
];

#[derive(Serialize)]
struct LayoutContext<'a> {
    title: &'a str,
    logged_in: bool,
    username: &'a str,
    content: &'a str,
}

thread_local! {
    /// TinyTemplate is not `Sync`; each worker thread compiles the set once.
    static ENGINE: OnceCell<TinyTemplate<'static>> = const { OnceCell::new() };
}

fn engine() -> Result<TinyTemplate<'static>, RenderError> {
    let mut tt = TinyTemplate::new();
    for (name, source) in SOURCES {
        tt.add_template(name, source)?;
    }
    tt.add_formatter("linebreaksbr", linebreaksbr);
    Ok(tt)
}

/// Render `template` with `context` and wrap it in the site layout.
pub fn render_page<C: Serialize>(
    template: &str,
    title: &str,
    viewer: &Viewer,
    context: &C,
) -> Result<String, RenderError> {
    ENGINE.with(|cell| {
        let tt = match cell.get() {
            Some(tt) => tt,
            None => {
                let built = engine()?;
                cell.get_or_init(|| built)
            }
        };
        let content = tt.render(template, context)?;

        tt.render(
            LAYOUT,
            &LayoutContext {
                title,
                logged_in: viewer.is_authenticated(),
                username: viewer.username().unwrap_or_default(),
                content: &content,
            },
        )
    })
}

fn linebreaksbr(value: &Value, output: &mut String) -> tinytemplate::error::Result<()> {
    match value {
        Value::String(text) => {
            let text = text.replace("\r\n", "\n");
            for (i, line) in text.split('\n').enumerate() {
                if i > 0 {
                    output.push_str("<br>");
                }
                tinytemplate::escape(line, output);
            }
            Ok(())
        }
        other => tinytemplate::format(other, output),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_all_templates_compile() {
        assert!(engine().is_ok());
    }

    #[test]
    fn test_layout_reflects_login_state() {
        let anonymous = render_page(HOME, "Home", &Viewer::Anonymous, &json!({})).unwrap();
        assert!(anonymous.contains("/accounts/login/"));
        assert!(!anonymous.contains("/blog/post/new/"));

        let member = Viewer::authenticated(uuid::Uuid::new_v4(), "test user");
        let logged_in = render_page(HOME, "Home", &member, &json!({})).unwrap();
        assert!(logged_in.contains("/blog/post/new/"));
        assert!(logged_in.contains("Log out test user"));
    }

    #[test]
    fn test_engine_is_reused_across_renders() {
        let first = render_page(HOME, "Home", &Viewer::Anonymous, &json!({})).unwrap();
        assert!(ENGINE.with(|cell| cell.get().is_some()));

        let second = render_page(HOME, "Home", &Viewer::Anonymous, &json!({})).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_text_is_escaped_with_line_breaks() {
        let mut out = String::new();
        linebreaksbr(&json!("<b>one</b>\r\ntwo"), &mut out).unwrap();
        assert_eq!(out, "&lt;b&gt;one&lt;/b&gt;<br>two");
    }
}
