//! Self-contained preview of a split page.
//!
//! The rewritten page references `style.css` / `script.js` by relative path,
//! which a viewer opening a single file cannot resolve. [`inline_assets`]
//! puts the extracted CSS and JS back into the elements that reference them.
//! Elements are matched on their `href` / `src` attribute value, so the file
//! names appearing elsewhere in the page are left untouched.

use scraper::node::Text;
use scraper::{ElementRef, Html, Node};

use super::extractor::{DOCTYPE, has_html5_doctype};
use super::{html_element, page_elements};
use super::serialize::outer_html;
use crate::config::SplitOptions;

/// Replace the stylesheet link and deferred script produced by
/// [`extract`](super::extract) with inline `<style>` and `<script>`
/// elements carrying `css` and `js`.
pub fn inline_assets(html: &str, css: &str, js: &str, options: &SplitOptions) -> String {
    let mut doc = Html::parse_document(html);
    let css_href = options.css_path();
    let js_src = options.js_path();

    // An empty artifact was never referenced by the split, so a matching
    // element is a genuine external reference.
    let mut links = Vec::new();
    let mut scripts = Vec::new();
    for element in page_elements(&doc) {
        match element.value().name() {
            "link"
                if !css.is_empty()
                    && is_stylesheet(&element)
                    && element.attr("href") == Some(css_href.as_str()) =>
            {
                links.push(element.id())
            }
            "script" if !js.is_empty() && element.attr("src") == Some(js_src.as_str()) => {
                scripts.push(element.id())
            }
            _ => {}
        }
    }

    for (ids, tag, body) in [(links, "style", css), (scripts, "script", js)] {
        for id in ids {
            let Some(mut old) = doc.tree.get_mut(id) else {
                continue;
            };
            let mut inline = old.insert_before(html_element(tag, &[]));
            inline.append(Node::Text(Text { text: body.into() }));
            old.detach();
        }
    }

    let mut out = doc
        .tree
        .root()
        .children()
        .find_map(ElementRef::wrap)
        .map(outer_html)
        .unwrap_or_default();
    if has_html5_doctype(html) {
        out.insert_str(0, DOCTYPE);
    }
    out
}

fn is_stylesheet(element: &ElementRef<'_>) -> bool {
    element
        .attr("rel")
        .is_some_and(|rel| rel.split_ascii_whitespace().any(|r| r.eq_ignore_ascii_case("stylesheet")))
}
