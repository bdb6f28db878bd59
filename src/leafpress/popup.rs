//! Popup bindings for markers and shapes.
//!
//! A popup message can come from a `message` attribute or from the enclosed
//! shortcode content. Before it lands inside a generated script it goes
//! through three fixed passes: newlines become `<br>`, quotes and backslashes
//! are slash-escaped, then the whole thing is HTML-entity escaped. The
//! browser side undoes this via `WPLeafletMapPlugin.unescape`, which decodes
//! entities and strips the added slashes. The passes are deliberately kept in
//! this order; themes depend on the `&lt;br&gt;` tokens surviving into the
//! page source.

use crate::style::parse_bool;
use shortscan::Attrs;

/// Build the `bindPopup` statement for a shape variable, or `None` when
/// neither a `message` attribute nor content is present. `visible` opens the
/// popup immediately.
pub fn popup_statement(attrs: &Attrs, content: Option<&str>, shape: &str) -> Option<String> {
    let message = attrs
        .get("message")
        .filter(|message| !message.is_empty())
        .or_else(|| content.filter(|content| !content.is_empty()))?;

    let escaped = html_escape(&add_slashes(&normalize_breaks(message)));

    let visible = attrs
        .get("visible")
        .and_then(parse_bool)
        .unwrap_or(false);
    let open = if visible { ".openPopup()" } else { "" };

    Some(format!(
        "{}.bindPopup(window.WPLeafletMapPlugin.unescape('{}')){};",
        shape, escaped, open
    ))
}

/// All three newline conventions become `<br>`. Windows pairs first, so a
/// `\r\n` yields one break, not two.
fn normalize_breaks(input: &str) -> String {
    input
        .replace("\r\n", "<br>")
        .replace('\n', "<br>")
        .replace('\r', "<br>")
}

fn add_slashes(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\0' => out.push_str("\\0"),
            _ => out.push(ch),
        }
    }
    out
}

fn html_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_attribute_binds_a_popup() {
        let attrs = Attrs::from_pairs([("message", "hello")]);
        let statement = popup_statement(&attrs, None, "marker").unwrap();
        assert_eq!(
            statement,
            "marker.bindPopup(window.WPLeafletMapPlugin.unescape('hello'));"
        );
    }

    #[test]
    fn content_is_the_fallback_message() {
        let attrs = Attrs::new();
        let statement = popup_statement(&attrs, Some("from content"), "circle").unwrap();
        assert!(statement.starts_with("circle.bindPopup("));
        assert!(statement.contains("from content"));
    }

    #[test]
    fn message_attribute_wins_over_content() {
        let attrs = Attrs::from_pairs([("message", "attr")]);
        let statement = popup_statement(&attrs, Some("content"), "marker").unwrap();
        assert!(statement.contains("attr"));
        assert!(!statement.contains("content"));
    }

    #[test]
    fn empty_message_falls_through_to_content() {
        let attrs = Attrs::from_pairs([("message", "")]);
        let statement = popup_statement(&attrs, Some("content"), "marker").unwrap();
        assert!(statement.contains("content"));
    }

    #[test]
    fn no_message_no_statement() {
        assert_eq!(popup_statement(&Attrs::new(), None, "marker"), None);
        assert_eq!(popup_statement(&Attrs::new(), Some(""), "marker"), None);
        let attrs = Attrs::from_pairs([("message", "")]);
        assert_eq!(popup_statement(&attrs, None, "marker"), None);
    }

    #[test]
    fn newlines_become_entity_escaped_breaks() {
        let attrs = Attrs::from_pairs([("message", "line one\r\nline two\nline three")]);
        let statement = popup_statement(&attrs, None, "marker").unwrap();
        assert_eq!(statement.matches("&lt;br&gt;").count(), 2);
        assert!(!statement.contains('\r'));
        assert!(!statement.contains('\n'));
        assert!(!statement.contains("<br>"));
    }

    #[test]
    fn quotes_are_slashed_then_entity_escaped() {
        let attrs = Attrs::from_pairs([("message", "it's here")]);
        let statement = popup_statement(&attrs, None, "marker").unwrap();
        // Both passes must be visible in the output, in this order.
        assert!(statement.contains("it\\&#039;s here"));
    }

    #[test]
    fn markup_in_messages_is_entity_escaped() {
        let attrs = Attrs::from_pairs([("message", "<b>bold</b> & more")]);
        let statement = popup_statement(&attrs, None, "marker").unwrap();
        assert!(statement.contains("&lt;b&gt;bold&lt;/b&gt; &amp; more"));
    }

    #[test]
    fn visible_opens_the_popup() {
        let attrs = Attrs::from_pairs([("message", "hi"), ("visible", "true")]);
        let statement = popup_statement(&attrs, None, "marker").unwrap();
        assert!(statement.ends_with(".openPopup();"));
    }

    #[test]
    fn visible_false_and_junk_stay_closed() {
        for value in ["false", "0", "", "maybe"] {
            let attrs = Attrs::from_pairs([("message", "hi"), ("visible", value)]);
            let statement = popup_statement(&attrs, None, "marker").unwrap();
            assert!(!statement.contains("openPopup"), "visible={:?}", value);
        }
    }

    #[test]
    fn backslashes_double_before_escaping() {
        let attrs = Attrs::from_pairs([("message", r"C:\maps")]);
        let statement = popup_statement(&attrs, None, "marker").unwrap();
        assert!(statement.contains(r"C:\\maps"));
    }
}
