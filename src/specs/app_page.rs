// src/specs/app_page.rs
//! App details page (`/details?id=<app_id>`).
//!
//! - Icon: first element whose class list has every class of `ICON_CLASS`; its `src`.
//! - Category: text of the first element with `itemprop="genre"`, as a
//!   lowercased label (`"Art &amp; Design"` → `"art & design"`).

use crate::config::consts::{CATEGORY_ITEMPROP, ICON_CLASS};
use crate::core::html::{element_text, find_by_attr, find_tag};
use crate::core::sanitize::category_label;
use crate::errors::{Error, Result};

pub const ICON_NOT_FOUND: &str = "Icon class not found in html.";
pub const CATEGORY_NOT_FOUND: &str = "Category itemprop not found in html.";

pub fn icon_url(doc: &str) -> Result<String> {
    find_tag(doc, |t| t.has_classes(ICON_CLASS))
        .and_then(|t| t.attr("src"))
        .filter(|src| !src.is_empty())
        .ok_or_else(|| Error::Scraping(s!(ICON_NOT_FOUND)))
}

pub fn category(doc: &str) -> Result<String> {
    let tag = find_by_attr(doc, "itemprop", CATEGORY_ITEMPROP)
        .ok_or_else(|| Error::Scraping(s!(CATEGORY_NOT_FOUND)))?;
    Ok(category_label(&element_text(doc, &tag)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><head><script>window.x = "<img class='T75of sHb2Xb' src='bogus'>";</script></head>
        <body>
          <img src="https://img/other.png" class="T75of">
          <img src="https://img/icon.png?w=64&amp;h=64" class="T75of sHb2Xb" alt="Icon image">
          <a href="/store/apps/category/TOOLS" itemprop="genre">Tools</a>
        </body></html>"#;

    #[test]
    fn finds_icon_src() {
        assert_eq!(icon_url(PAGE).unwrap(), "https://img/icon.png?w=64&h=64");
    }

    #[test]
    fn finds_lowercased_category() {
        assert_eq!(category(PAGE).unwrap(), "tools");
    }

    #[test]
    fn missing_selectors_are_scraping_errors() {
        let doc = "<p>Simple paragraph.</p>";
        assert_eq!(icon_url(doc).unwrap_err().to_string(), ICON_NOT_FOUND);
        assert_eq!(category(doc).unwrap_err().to_string(), CATEGORY_NOT_FOUND);
    }
}
