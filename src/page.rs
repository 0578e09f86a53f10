//! The page envelope sent to the client.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;

/// `{component, props, url, version}`, field-exact on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub component: String,
    pub props: Map<String, Value>,
    pub url: String,
    pub version: String,
}

impl Page {
    /// Serializes the envelope. Any failure aborts the render.
    pub fn to_json(&self) -> Result<Vec<u8>, Error> {
        Ok(serde_json::to_vec(self)?)
    }

    /// [`to_json`](Page::to_json) as text, for embedding in the root shell.
    pub fn to_json_string(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Escapes text for embedding in HTML element content or a quoted attribute.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + raw.len() / 8);
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn serializes_exact_field_names() {
        let page = Page {
            component: "Events/Index".to_owned(),
            props: json!({"foo": "bar"}).as_object().cloned().unwrap(),
            url: "/events?page=2".to_owned(),
            version: "v1".to_owned(),
        };

        let bytes = page.to_json().unwrap();
        let wire: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(
            wire,
            json!({
                "component": "Events/Index",
                "props": {"foo": "bar"},
                "url": "/events?page=2",
                "version": "v1",
            })
        );
    }

    #[test]
    fn string_form_matches_wire_bytes() {
        let page = Page {
            component: "Events/Show".to_owned(),
            props: json!({"title": "<b>\u{e9}t\u{e9}</b>"}).as_object().cloned().unwrap(),
            url: "/events/1".to_owned(),
            version: String::new(),
        };

        assert_eq!(page.to_json_string().unwrap().into_bytes(), page.to_json().unwrap());
    }

    #[test]
    fn escape_covers_markup_and_quotes() {
        assert_eq!(
            escape_html(r#"{"a":"<b> & 'c'"}"#),
            "{&quot;a&quot;:&quot;&lt;b&gt; &amp; &#39;c&#39;&quot;}"
        );
        assert_eq!(escape_html("plain"), "plain");
    }
}
