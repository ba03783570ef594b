// src/core/html.rs
//! Tolerant tag scanning for storefront pages.
//!
//! No DOM is built. [`tags`] walks the document tag by tag (skipping
//! comments and the bodies of `<script>`/`<style>`), and the helpers on
//! [`Tag`] read attributes and element text. Tag and attribute names are
//! matched case-insensitively; attribute values are returned entity-decoded.

use super::sanitize::{normalize_entities, normalize_ws};

const VOID: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track", "wbr",
];

/// One tag as it appears in the document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tag<'a> {
    /// Lowercased tag name, without the `/` of closing tags.
    pub name: String,
    pub closing: bool,
    /// Byte offset of `<`.
    pub start: usize,
    /// Byte offset just past `>`.
    pub end: usize,
    /// Text between the tag name and `>`.
    attrs: &'a str,
}

impl<'a> Tag<'a> {
    pub fn is_void(&self) -> bool {
        VOID.contains(&self.name.as_str()) || self.attrs.trim_end().ends_with('/')
    }

    /// Value of attribute `name`, entity-decoded. Bare attributes yield `""`.
    pub fn attr(&self, name: &str) -> Option<String> {
        let mut rest = self.attrs;
        loop {
            rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == '/');
            if rest.is_empty() { return None; }

            let key_end = rest
                .find(|c: char| c.is_whitespace() || c == '=' || c == '/')
                .unwrap_or(rest.len());
            let key = &rest[..key_end];
            rest = rest[key_end..].trim_start();

            let value = if let Some(after_eq) = rest.strip_prefix('=') {
                let after_eq = after_eq.trim_start();
                let (val, tail) = match after_eq.chars().next() {
                    Some(q @ ('"' | '\'')) => {
                        let body = &after_eq[1..];
                        let close = body.find(q).unwrap_or(body.len());
                        (&body[..close], body.get(close + 1..).unwrap_or(""))
                    }
                    _ => {
                        let stop = after_eq.find(char::is_whitespace).unwrap_or(after_eq.len());
                        (&after_eq[..stop], &after_eq[stop..])
                    }
                };
                rest = tail;
                val
            } else {
                ""
            };

            if key.eq_ignore_ascii_case(name) {
                return Some(normalize_entities(value));
            }
        }
    }

    /// True if the `class` attribute lists every class in `wanted`
    /// (whitespace separated, any order).
    pub fn has_classes(&self, wanted: &str) -> bool {
        match self.attr("class") {
            Some(classes) => {
                let have: Vec<&str> = classes.split_whitespace().collect();
                wanted.split_whitespace().all(|w| have.contains(&w))
            }
            None => false,
        }
    }
}

/// Iterator over the tags of `doc`, in document order.
pub fn tags(doc: &str) -> Tags<'_> {
    Tags { doc, pos: 0 }
}

pub struct Tags<'a> {
    doc: &'a str,
    pos: usize,
}

impl<'a> Iterator for Tags<'a> {
    type Item = Tag<'a>;

    fn next(&mut self) -> Option<Tag<'a>> {
        loop {
            let doc = self.doc;
            let lt = doc.get(self.pos..)?.find('<')? + self.pos;

            if doc[lt..].starts_with("<!--") {
                self.pos = doc[lt..].find("-->").map_or(doc.len(), |e| lt + e + 3);
                continue;
            }

            let gt = match doc[lt..].find('>') {
                Some(e) => lt + e,
                None => { self.pos = doc.len(); return None; }
            };
            let inner = &doc[lt + 1..gt];
            let (closing, body) = match inner.strip_prefix('/') {
                Some(b) => (true, b),
                None => (false, inner),
            };

            let name_end = body
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == ':'))
                .unwrap_or(body.len());
            if name_end == 0 {
                // `<!doctype`, `<?xml`, or a stray '<' in text
                self.pos = lt + 1;
                continue;
            }
            let name = body[..name_end].to_ascii_lowercase();
            self.pos = gt + 1;

            // Raw-text elements: jump over their bodies
            if !closing && (name == "script" || name == "style") {
                let close = format!("</{name}");
                self.pos = to_lower(&doc[self.pos..])
                    .find(&close)
                    .map_or(doc.len(), |e| self.pos + e);
            }

            return Some(Tag { name, closing, start: lt, end: gt + 1, attrs: &body[name_end..] });
        }
    }
}

/// First opening tag satisfying `pred`.
pub fn find_tag<'a>(doc: &'a str, pred: impl Fn(&Tag<'a>) -> bool) -> Option<Tag<'a>> {
    tags(doc).find(|t| !t.closing && pred(t))
}

/// First opening tag whose `attr` equals `value` exactly.
pub fn find_by_attr<'a>(doc: &'a str, attr: &str, value: &str) -> Option<Tag<'a>> {
    find_tag(doc, |t| t.attr(attr).as_deref() == Some(value))
}

/// Visible text of the element opened by `tag`: inner markup stripped,
/// entities decoded, whitespace collapsed. Void elements have no text.
pub fn element_text(doc: &str, tag: &Tag<'_>) -> String {
    if tag.is_void() { return s!(); }

    let mut depth = 0usize;
    let mut close_at = doc.len();
    for t in tags(&doc[tag.end..]) {
        if t.name != tag.name { continue; }
        if t.closing {
            if depth == 0 { close_at = tag.end + t.start; break; }
            depth -= 1;
        } else if !t.is_void() {
            depth += 1;
        }
    }
    strip_tags(normalize_entities(&doc[tag.end..close_at]))
}

pub fn to_lower(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii() {
                c.to_ascii_lowercase()
            } else {
                c
            }
        })
        .collect()
}

pub fn strip_tags<S: AsRef<str>>(s: S) -> String {
    let s = s.as_ref();

    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;

    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    normalize_ws(&out)
}
