//! # Shortscan - Bracketed Shortcode Scanning
//!
//! A small scanner for `[shortcode]` syntax in post content, independent of any
//! particular CMS. It finds registered tags, parses their attributes, and hands
//! everything else back as plain text.
//!
//! ## The Problem
//!
//! Content systems let authors drop `[tag attr="value"]` markers into prose, but
//! the surrounding text is full of innocent brackets: citations `[1]`, TODO
//! markers, code samples. A scanner has to:
//! - Touch only the tags a host actually registered
//! - Parse quoted values, bare flags, and `!negated` flags
//! - Support enclosed content (`[tag]...[/tag]`) and self-closing forms
//! - Let authors write a literal shortcode via doubled brackets (`[[tag]]`)
//!
//! ## The Solution
//!
//! [`scan`] walks the text once and produces a flat event stream. Anything that
//! is not a registered shortcode comes back as [`Event::Text`] unchanged, so
//! reassembling the document is lossless by construction.
//!
//! ## Quick Example
//!
//! ```rust
//! use shortscan::{scan, Event};
//!
//! let text = "before [greet name=\"Ada\" loud]hi[/greet] after";
//! let events = scan(text, |tag| tag == "greet");
//!
//! assert!(matches!(events[0], Event::Text("before ")));
//! if let Event::Tag(tag) = &events[1] {
//!     assert_eq!(tag.name, "greet");
//!     assert_eq!(tag.attrs.get("name"), Some("Ada"));
//!     assert_eq!(tag.attrs.get("loud"), Some("1"));
//!     assert_eq!(tag.content, Some("hi"));
//! }
//! assert!(matches!(events[2], Event::Text(" after")));
//! ```
//!
//! ## Attribute Conventions
//!
//! Attributes accept three value forms: `key=value` (unquoted, up to the next
//! whitespace), `key="value"` and `key='value'`. Two flag forms cover the
//! common boolean cases without inventing a syntax hosts do not expect:
//!
//! - `flag` becomes `flag="1"`
//! - `!flag` becomes `flag="0"`
//!
//! Attribute names are kept exactly as written; lookups via [`Attrs::get`]
//! are case-sensitive, with [`Attrs::get_ci`] for hosts that fold case.
//!
//! ## What It Deliberately Does Not Do
//!
//! No nesting of a tag inside itself, no `]` inside attribute values, and no
//! entity decoding. These match the behavior content authors already know from
//! the bracket-shortcode dialect this implements.

use memchr::memchr;

/// Parsed attributes of one shortcode occurrence.
///
/// Later attributes with the same name replace earlier ones, so
/// `[tag a=1 a=2]` resolves to `a="2"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attrs {
    pairs: Vec<(String, String)>,
}

impl Attrs {
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Build attrs directly, mainly useful in tests and host glue code.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut attrs = Self::new();
        for (name, value) in pairs {
            attrs.insert(name, value);
        }
        attrs
    }

    pub fn insert(&mut self, name: &str, value: &str) {
        for pair in &mut self.pairs {
            if pair.0 == name {
                pair.1 = value.to_string();
                return;
            }
        }
        self.pairs.push((name.to_string(), value.to_string()));
    }

    /// Exact, case-sensitive lookup.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// ASCII case-insensitive lookup, for hosts whose attribute names are
    /// conventionally lowercased. The first matching pair wins.
    pub fn get_ci(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Attributes in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

/// One matched shortcode occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag<'t> {
    /// Registered tag name, as found in the text.
    pub name: &'t str,
    pub attrs: Attrs,
    /// Enclosed content for `[tag]...[/tag]` forms; `None` otherwise.
    pub content: Option<&'t str>,
    /// The full matched text, opening bracket through final closing bracket.
    pub raw: &'t str,
}

/// Scanner output. Concatenating the `Text` and `Escaped` payloads with each
/// tag's `raw` reproduces the input exactly (escaped events drop the doubled
/// brackets, which is their purpose).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event<'t> {
    /// Plain text between shortcodes.
    Text(&'t str),
    /// A `[[tag]]` literal: the payload is the tag text with single brackets.
    Escaped(&'t str),
    /// A registered shortcode.
    Tag(Tag<'t>),
}

/// Scan `text` for shortcodes whose tag name satisfies `is_registered`.
///
/// Unregistered bracket sequences are left inside `Text` events untouched.
pub fn scan<'t, F>(text: &'t str, is_registered: F) -> Vec<Event<'t>>
where
    F: Fn(&str) -> bool,
{
    let bytes = text.as_bytes();
    let mut events = Vec::new();
    let mut segment_start = 0;
    let mut search = 0;

    while let Some(rel) = memchr(b'[', &bytes[search..]) {
        let open = search + rel;

        // Doubled bracket: [[tag ...]] renders the tag as literal text.
        if bytes.get(open + 1) == Some(&b'[') {
            if let Some(parsed) = parse_tag_at(text, open + 1, &is_registered) {
                if bytes.get(parsed.end) == Some(&b']') {
                    if segment_start < open {
                        events.push(Event::Text(&text[segment_start..open]));
                    }
                    events.push(Event::Escaped(&text[open + 1..parsed.end]));
                    segment_start = parsed.end + 1;
                    search = segment_start;
                    continue;
                }
            }
            // An unparseable [[ still leaves the inner [ as a candidate.
            search = open + 1;
            continue;
        }

        match parse_tag_at(text, open, &is_registered) {
            Some(parsed) => {
                if segment_start < open {
                    events.push(Event::Text(&text[segment_start..open]));
                }
                segment_start = parsed.end;
                search = parsed.end;
                events.push(Event::Tag(Tag {
                    name: parsed.name,
                    attrs: parsed.attrs,
                    content: parsed.content,
                    raw: &text[open..parsed.end],
                }));
            }
            None => {
                search = open + 1;
            }
        }
    }

    if segment_start < text.len() {
        events.push(Event::Text(&text[segment_start..]));
    }

    events
}

struct ParsedTag<'t> {
    name: &'t str,
    attrs: Attrs,
    content: Option<&'t str>,
    /// Byte offset just past the last consumed character.
    end: usize,
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

fn parse_tag_at<'t, F>(text: &'t str, open: usize, is_registered: &F) -> Option<ParsedTag<'t>>
where
    F: Fn(&str) -> bool,
{
    let bytes = text.as_bytes();
    if bytes.get(open) != Some(&b'[') {
        return None;
    }

    let name_start = open + 1;
    let mut name_end = name_start;
    while name_end < bytes.len() && is_name_byte(bytes[name_end]) {
        name_end += 1;
    }
    if name_end == name_start {
        return None;
    }

    let name = &text[name_start..name_end];
    if !is_registered(name) {
        return None;
    }

    // The name must be delimited, otherwise [leaflet-mapx] would match
    // a registered leaflet-map.
    match bytes.get(name_end) {
        Some(b) if b.is_ascii_whitespace() || *b == b']' || *b == b'/' => {}
        Some(_) => return None,
        None => return None,
    }

    let close = name_end + memchr(b']', &bytes[name_end..])?;
    let mut attr_text = &text[name_end..close];
    let self_closing = attr_text.ends_with('/');
    if self_closing {
        attr_text = &attr_text[..attr_text.len() - 1];
    }
    let attrs = parse_attrs(attr_text);

    if !self_closing {
        let closer = format!("[/{}]", name);
        if let Some(rel) = text[close + 1..].find(&closer) {
            let content_end = close + 1 + rel;
            return Some(ParsedTag {
                name,
                attrs,
                content: Some(&text[close + 1..content_end]),
                end: content_end + closer.len(),
            });
        }
    }

    Some(ParsedTag {
        name,
        attrs,
        content: None,
        end: close + 1,
    })
}

/// Parse the attribute region of a shortcode.
///
/// Exposed separately because hosts sometimes carry attribute strings around
/// on their own (widgets, block transforms).
pub fn parse_attrs(text: &str) -> Attrs {
    let bytes = text.as_bytes();
    let mut attrs = Attrs::new();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i].is_ascii_whitespace() {
            i += 1;
            continue;
        }

        if bytes[i] == b'!' {
            let start = i + 1;
            let mut end = start;
            while end < bytes.len() && is_name_byte(bytes[end]) {
                end += 1;
            }
            if end > start {
                attrs.insert(&text[start..end], "0");
            }
            i = end.max(i + 1);
            continue;
        }

        let name_start = i;
        let mut name_end = i;
        while name_end < bytes.len() && is_name_byte(bytes[name_end]) {
            name_end += 1;
        }
        if name_end == name_start {
            // Stray punctuation; skip it.
            i += 1;
            continue;
        }
        let name = &text[name_start..name_end];

        if bytes.get(name_end) == Some(&b'=') {
            let value_start = name_end + 1;
            match bytes.get(value_start) {
                Some(&q) if q == b'"' || q == b'\'' => {
                    match memchr(q, &bytes[value_start + 1..]) {
                        Some(rel) => {
                            let value_end = value_start + 1 + rel;
                            attrs.insert(name, &text[value_start + 1..value_end]);
                            i = value_end + 1;
                        }
                        None => {
                            // Unterminated quote swallows the rest.
                            attrs.insert(name, &text[value_start + 1..]);
                            i = bytes.len();
                        }
                    }
                }
                _ => {
                    let mut value_end = value_start;
                    while value_end < bytes.len() && !bytes[value_end].is_ascii_whitespace() {
                        value_end += 1;
                    }
                    attrs.insert(name, &text[value_start..value_end]);
                    i = value_end;
                }
            }
        } else {
            attrs.insert(name, "1");
            i = name_end;
        }
    }

    attrs
}
