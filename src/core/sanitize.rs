// src/core/sanitize.rs

/// Decode the handful of entities storefront pages actually use.
/// `&amp;` goes last so `&amp;lt;` stays `&lt;`.
pub fn normalize_entities(s: &str) -> String {
    if !s.contains('&') { return s!(s); }
    s.replace("&nbsp;", " ")
        .replace("&#160;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Scraped category label as stored: entities decoded, whitespace collapsed, lowercase.
pub fn category_label(raw: &str) -> String {
    normalize_ws(&normalize_entities(raw)).to_lowercase()
}

/// Make a label usable as a single path component.
/// Separators and NULs become `_`; `.`/`..`/empty become `_`.
pub fn path_segment(name: &str) -> String {
    let out: String = name
        .chars()
        .map(|c| if c == '/' || c == '\\' || c == '\0' { '_' } else { c })
        .collect();
    match out.trim() {
        "" | "." | ".." => s!("_"),
        _ => out,
    }
}
