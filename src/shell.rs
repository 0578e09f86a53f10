//! The root HTML shell rendered for conventional (non-protocol) page loads.
//!
//! Any template engine can sit behind [`RootTemplate`]. It receives the page
//! payload already HTML-escaped, ready to drop into a `data-page` attribute,
//! plus the root data configured once on the engine.
//!
//! [`HtmlShell`] covers the common case without a template engine:
//!
//! ```rust
//! use inertia::{HtmlShell, RootTemplate};
//! use serde_json::{Map, Value};
//!
//! let shell = HtmlShell::new("<title>{{ title }}</title><body>@inertia</body>");
//! let mut data = Map::new();
//! data.insert("title".into(), Value::from("Events"));
//!
//! let html = shell.render("{&quot;component&quot;:&quot;Events&quot;}", &data).unwrap();
//! assert!(html.contains(r#"<div id="app" data-page="{&quot;component&quot;"#));
//! assert!(html.contains("<title>Events</title>"));
//! ```

use serde_json::{Map, Value};

use crate::error::BoxError;
use crate::page::escape_html;

/// Produces the full HTML document around an escaped page payload.
pub trait RootTemplate: Send + Sync + 'static {
    fn render(&self, page: &str, data: &Map<String, Value>) -> Result<String, BoxError>;
}

impl<F> RootTemplate for F
where
    F: Fn(&str, &Map<String, Value>) -> Result<String, BoxError> + Send + Sync + 'static,
{
    fn render(&self, page: &str, data: &Map<String, Value>) -> Result<String, BoxError> {
        self(page, data)
    }
}

/// Placeholder-substitution shell.
///
/// `@inertia` becomes the application mount point carrying the page, and
/// `{{ key }}` becomes the escaped root data value under `key`. Placeholders
/// with no data are left as written. The template is scanned once, so
/// neither the data values nor the page payload are searched for placeholders.
pub struct HtmlShell {
    template: String,
}

impl HtmlShell {
    pub fn new(template: impl Into<String>) -> Self {
        Self { template: template.into() }
    }
}

impl RootTemplate for HtmlShell {
    fn render(&self, page: &str, data: &Map<String, Value>) -> Result<String, BoxError> {
        let mut html = String::with_capacity(self.template.len() + page.len());
        let mut rest = self.template.as_str();

        // One pass over the template; substituted text is never scanned again.
        while let Some(at) = rest.find(['@', '{']) {
            html.push_str(&rest[..at]);
            rest = &rest[at..];

            if let Some(tail) = rest.strip_prefix("@inertia") {
                html.push_str(r#"<div id="app" data-page=""#);
                html.push_str(page);
                html.push_str(r#""></div>"#);
                rest = tail;
                continue;
            }

            match placeholder(rest).and_then(|(key, tail)| Some((data.get(key)?, tail))) {
                Some((Value::String(s), tail)) => {
                    html.push_str(&escape_html(s));
                    rest = tail;
                }
                Some((other, tail)) => {
                    html.push_str(&escape_html(&other.to_string()));
                    rest = tail;
                }
                None => {
                    html.push_str(&rest[..1]);
                    rest = &rest[1..];
                }
            }
        }
        html.push_str(rest);
        Ok(html)
    }
}

/// Splits a leading `{{ key }}` off `text` into the trimmed key and what follows.
fn placeholder(text: &str) -> Option<(&str, &str)> {
    let inner = text.strip_prefix("{{")?;
    let end = inner.find("}}")?;
    Some((inner[..end].trim(), &inner[end + 2..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_mount_point_and_data() {
        let shell = HtmlShell::new("<h1>{{ title }}</h1><p>{{ count }}</p>@inertia{{ missing }}");
        let mut data = Map::new();
        data.insert("title".to_owned(), Value::from("<Events>"));
        data.insert("count".to_owned(), Value::from(3));

        let html = shell.render("PAGE", &data).unwrap();

        assert_eq!(
            html,
            r#"<h1>&lt;Events&gt;</h1><p>3</p><div id="app" data-page="PAGE"></div>{{ missing }}"#
        );
    }

    #[test]
    fn substituted_values_are_not_rescanned() {
        let shell = HtmlShell::new("<title>{{ a }}</title><p>{{ b }}</p><body>@inertia</body>");
        let mut data = Map::new();
        data.insert("a".to_owned(), Value::from("{{ b }} @inertia"));
        data.insert("b".to_owned(), Value::from("SECRET"));

        let html = shell.render("PAGE", &data).unwrap();

        assert_eq!(
            html,
            r#"<title>{{ b }} @inertia</title><p>SECRET</p><body><div id="app" data-page="PAGE"></div></body>"#
        );
        assert_eq!(html.matches("data-page").count(), 1);
    }

    #[test]
    fn page_payload_is_inserted_verbatim() {
        let shell = HtmlShell::new("{{ title }}@inertia");
        let mut data = Map::new();
        data.insert("title".to_owned(), Value::from("T"));

        let html = shell.render("{{ title }}@inertia", &data).unwrap();

        assert_eq!(html, r#"T<div id="app" data-page="{{ title }}@inertia"></div>"#);
    }

    #[test]
    fn closures_are_templates() {
        let template = |page: &str, _data: &Map<String, Value>| -> Result<String, BoxError> {
            Ok(format!("<main>{page}</main>"))
        };

        assert_eq!(RootTemplate::render(&template, "x", &Map::new()).unwrap(), "<main>x</main>");
    }
}
