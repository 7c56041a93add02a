use ego_tree::NodeId;
use scraper::{ElementRef, Html};
use tracing::debug;

use super::dedent::dedent;
use super::serialize::outer_html;
use super::{find_child_element, html_element, page_elements};
use crate::bundle::ArtifactKind;
use crate::config::SplitOptions;

/// Separator placed between consecutive `<style>` blocks.
pub const CSS_SEPARATOR: &str = "\n\n/* --- Next Style Block --- */\n\n";
/// Separator placed between consecutive `<script>` blocks.
pub const JS_SEPARATOR: &str = "\n\n// --- Next Script Block ---\n\n";

pub(crate) const DOCTYPE: &str = "<!DOCTYPE html>\n";

const BOM: char = '\u{FEFF}';

/// The three artifacts of a split page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Rewritten page referencing the external stylesheet and script.
    pub html: String,
    pub css: String,
    pub js: String,
    /// `<style>` elements removed.
    pub style_blocks: usize,
    /// Non-blank inline `<script>` elements extracted.
    pub script_blocks: usize,
}

impl Extraction {
    pub fn artifact(&self, kind: ArtifactKind) -> &str {
        match kind {
            ArtifactKind::Html => &self.html,
            ArtifactKind::Css => &self.css,
            ArtifactKind::Js => &self.js,
        }
    }
}

/// Move inline `<style>` and `<script>` content out of `html_text`.
///
/// Every `<style>` element and every `<script>` without a `src` attribute is
/// removed. Their dedented contents, in document order, become the CSS and
/// JS artifacts. When an artifact is non-empty the page gets a reference to
/// it: a stylesheet `<link>` at the end of `<head>`, a deferred `<script>`
/// at the end of `<body>`. Missing `<head>`/`<body>` elements are created.
///
/// Parsing recovers from malformed markup, so this never fails.
pub fn extract(html_text: &str, options: &SplitOptions) -> Extraction {
    let html_text = html_text.strip_prefix(BOM).unwrap_or(html_text);
    let mut doc = Html::parse_document(html_text);
    let (root, head, body) = ensure_skeleton(&mut doc);

    // Collect first, mutate after.
    let mut styles = Vec::new();
    let mut scripts = Vec::new();
    for element in page_elements(&doc) {
        match element.value().name() {
            "style" => styles.push((element.id(), element.text().collect::<String>())),
            "script" if element.attr("src").is_none() => {
                scripts.push((element.id(), element.text().collect::<String>()))
            }
            _ => {}
        }
    }

    let css = styles
        .iter()
        .map(|(_, text)| dedent(text))
        .filter(|block| !block.is_empty())
        .collect::<Vec<_>>()
        .join(CSS_SEPARATOR)
        .trim()
        .to_string();

    let script_bodies: Vec<String> = scripts
        .iter()
        .filter(|(_, text)| !text.trim().is_empty())
        .map(|(_, text)| dedent(text))
        .collect();
    let script_blocks = script_bodies.len();
    let js = script_bodies.join(JS_SEPARATOR).trim().to_string();

    for id in styles.iter().chain(scripts.iter()).map(|(id, _)| *id) {
        if let Some(mut node) = doc.tree.get_mut(id) {
            node.detach();
        }
    }

    if !css.is_empty() {
        let href = options.css_path();
        let link = html_element("link", &[("rel", "stylesheet"), ("href", href.as_str())]);
        append_to(&mut doc, head, link);
    }
    if !js.is_empty() {
        let src = options.js_path();
        let script = html_element("script", &[("src", src.as_str()), ("defer", "")]);
        append_to(&mut doc, body, script);
    }

    let mut html = doc
        .tree
        .get(root)
        .and_then(ElementRef::wrap)
        .map(outer_html)
        .unwrap_or_default();
    if has_html5_doctype(html_text) {
        html.insert_str(0, DOCTYPE);
    }

    debug!(
        style_blocks = styles.len(),
        script_blocks,
        css_bytes = css.len(),
        js_bytes = js.len(),
        "extracted inline blocks"
    );

    Extraction {
        html,
        css,
        js,
        style_blocks: styles.len(),
        script_blocks,
    }
}

/// Locate (or create) the document element, `<head>` and `<body>`.
fn ensure_skeleton(doc: &mut Html) -> (NodeId, NodeId, NodeId) {
    let existing_root = doc
        .tree
        .root()
        .children()
        .find(|child| child.value().is_element())
        .map(|child| child.id());
    let root = match existing_root {
        Some(id) => id,
        None => doc.tree.root_mut().append(html_element("html", &[])).id(),
    };

    let head = find_child_element(doc, root, "head")
        .unwrap_or_else(|| insert_child(doc, root, "head", true));
    let body = find_child_element(doc, root, "body")
        .unwrap_or_else(|| insert_child(doc, root, "body", false));

    (root, head, body)
}

fn insert_child(doc: &mut Html, parent: NodeId, name: &str, first: bool) -> NodeId {
    let node = html_element(name, &[]);
    match doc.tree.get_mut(parent) {
        Some(mut parent) if first => parent.prepend(node).id(),
        Some(mut parent) => parent.append(node).id(),
        None => doc.tree.orphan(node).id(),
    }
}

fn append_to(doc: &mut Html, parent: NodeId, node: scraper::Node) {
    if let Some(mut parent) = doc.tree.get_mut(parent) {
        parent.append(node);
    }
}

/// Whether the source opens with an HTML5 doctype, ignoring case, leading
/// whitespace and a byte order mark.
pub(crate) fn has_html5_doctype(source: &str) -> bool {
    const PREFIX: &str = "<!doctype html";
    source
        .trim_start_matches(|c: char| c.is_whitespace() || c == BOM)
        .get(..PREFIX.len())
        .is_some_and(|start| start.eq_ignore_ascii_case(PREFIX))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(html: &str) -> Extraction {
        extract(html, &SplitOptions::default())
    }

    #[test]
    fn reference_scenario_with_folders() {
        let out = split(
            "<html><head><style>body{color:red;}</style></head><body><script>console.log(1)</script></body></html>",
        );

        assert_eq!(out.css, "body{color:red;}");
        assert_eq!(out.js, "console.log(1)");
        assert_eq!(out.style_blocks, 1);
        assert_eq!(out.script_blocks, 1);
        assert_eq!(
            out.html,
            r#"<html><head><link rel="stylesheet" href="styles/style.css"></head><body><script src="scripts/script.js" defer></script></body></html>"#
        );
    }

    #[test]
    fn flat_references_without_folders() {
        let opts = SplitOptions {
            use_folders: false,
            ..Default::default()
        };
        let out = extract(
            "<html><head><style>p{}</style></head><body><script>f()</script></body></html>",
            &opts,
        );
        assert!(out.html.contains(r#"<link rel="stylesheet" href="style.css">"#));
        assert!(out.html.contains(r#"<script src="script.js" defer></script>"#));
    }

    #[test]
    fn joins_blocks_in_document_order() {
        let out = split(
            "<html><head><style>\n  a { }\n</style></head><body><p>x</p><style>b { }</style>\
             <script>one()</script><script>two()</script></body></html>",
        );
        assert_eq!(out.css, format!("a {{ }}{CSS_SEPARATOR}b {{ }}"));
        assert_eq!(out.js, format!("one(){JS_SEPARATOR}two()"));
        assert_eq!(out.style_blocks, 2);
        assert_eq!(out.script_blocks, 2);
        assert!(!out.html.contains("<style"));
        assert!(out.html.contains("<p>x</p>"));
    }

    #[test]
    fn external_scripts_are_left_alone() {
        let out = split(
            r#"<html><head><script src="vendor.js"></script></head><body><script>
                init();
            </script></body></html>"#,
        );
        assert_eq!(out.js, "init();");
        assert!(out.html.contains(r#"<script src="vendor.js"></script>"#));
        assert!(out.html.contains(r#"<script src="scripts/script.js" defer></script>"#));
    }

    #[test]
    fn blank_scripts_are_removed_but_not_counted() {
        let out = split("<html><head></head><body><script>   \n </script><p>a</p></body></html>");
        assert_eq!(out.js, "");
        assert_eq!(out.script_blocks, 0);
        assert_eq!(out.html, "<html><head></head><body><p>a</p></body></html>");
    }

    #[test]
    fn empty_styles_add_no_link() {
        let out = split("<html><head><style></style><style>  </style></head><body></body></html>");
        assert_eq!(out.css, "");
        assert_eq!(out.style_blocks, 2);
        assert!(!out.html.contains("<link"));
        assert!(!out.html.contains("<style"));
    }

    #[test]
    fn page_without_inline_blocks() {
        let out = split("<html><head><title>T</title></head><body><p>hi</p></body></html>");
        assert_eq!(out.css, "");
        assert_eq!(out.js, "");
        assert_eq!(out.style_blocks, 0);
        assert_eq!(out.script_blocks, 0);
        assert_eq!(
            out.html,
            "<html><head><title>T</title></head><body><p>hi</p></body></html>"
        );
    }

    #[test]
    fn doctype_is_restored() {
        let out = split("  \n<!doctype HTML>\n<html><head></head><body></body></html>");
        assert!(out.html.starts_with("<!DOCTYPE html>\n<html>"));

        let out = split("<html><head></head><body></body></html>");
        assert!(out.html.starts_with("<html>"));
    }

    #[test]
    fn doctype_survives_byte_order_mark() {
        let out = split(
            "\u{FEFF}<!DOCTYPE html><html><head><style>a{}</style></head><body></body></html>",
        );
        assert_eq!(
            out.html,
            "<!DOCTYPE html>\n<html><head><link rel=\"stylesheet\" href=\"styles/style.css\"></head><body></body></html>"
        );
        assert_eq!(out.css, "a{}");
    }

    #[test]
    fn template_contents_stay_in_place() {
        let out = split(
            "<html><head></head><body><template><style>x{}</style><script>t()</script></template></body></html>",
        );
        assert_eq!(out.css, "");
        assert_eq!(out.js, "");
        assert_eq!(out.style_blocks, 0);
        assert_eq!(out.script_blocks, 0);
        assert_eq!(
            out.html,
            "<html><head></head><body><template><style>x{}</style><script>t()</script></template></body></html>"
        );
    }

    #[test]
    fn fragment_gains_head_and_body() {
        let out = split("<style>h1{}</style><h1>Title</h1><script>go()</script>");
        assert_eq!(
            out.html,
            r#"<html><head><link rel="stylesheet" href="styles/style.css"></head><body><h1>Title</h1><script src="scripts/script.js" defer></script></body></html>"#
        );
    }

    #[test]
    fn detects_doctype_prefix() {
        assert!(has_html5_doctype("<!DOCTYPE html>"));
        assert!(has_html5_doctype("\t <!DocType Html PUBLIC>"));
        assert!(!has_html5_doctype("<html>"));
        assert!(!has_html5_doctype("<!-- <!DOCTYPE html> -->"));
        assert!(!has_html5_doctype("ü"));
        assert!(has_html5_doctype("\u{FEFF}<!DOCTYPE html>"));
        assert!(has_html5_doctype("\u{FEFF}\n  <!doctype html>"));
    }
}
