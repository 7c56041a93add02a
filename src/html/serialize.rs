//! HTML serialization for rewritten documents.
//!
//! [`MarkupWriter`] implements html5ever's [`Serializer`] so scraper's tree
//! traversal can drive it. It follows the HTML fragment serialization rules
//! (raw text in `script`/`style`, no end tags for void elements) and writes
//! attributes with an empty value in their minimised form, so an injected
//! `defer` stays `defer` instead of `defer=""`.

use std::io;

use html5ever::serialize::{AttrRef, Serialize, Serializer, TraversalScope};
use html5ever::{LocalName, QualName, local_name, namespace_url, ns};
use scraper::ElementRef;

/// Outer HTML of `element`.
pub fn outer_html(element: ElementRef<'_>) -> String {
    let mut writer = MarkupWriter::default();
    // MarkupWriter never returns an error.
    let _ = element.serialize(&mut writer, TraversalScope::IncludeNode);
    writer.finish()
}

#[derive(Default)]
struct ElemInfo {
    html_name: Option<LocalName>,
    ignore_children: bool,
}

/// Serializer that accumulates markup into a `String`.
#[derive(Default)]
pub struct MarkupWriter {
    out: String,
    stack: Vec<ElemInfo>,
}

impl MarkupWriter {
    pub fn finish(self) -> String {
        self.out
    }

    fn parent(&self) -> Option<&ElemInfo> {
        self.stack.last()
    }

    fn write_escaped(&mut self, text: &str, attr_mode: bool) {
        for c in text.chars() {
            match c {
                '&' => self.out.push_str("&amp;"),
                '\u{00A0}' => self.out.push_str("&nbsp;"),
                '"' if attr_mode => self.out.push_str("&quot;"),
                '<' if !attr_mode => self.out.push_str("&lt;"),
                '>' if !attr_mode => self.out.push_str("&gt;"),
                c => self.out.push(c),
            }
        }
    }

    fn write_attr_name(&mut self, name: &QualName) {
        match name.ns {
            ns!(xml) => self.out.push_str("xml:"),
            ns!(xmlns) if name.local != local_name!("xmlns") => self.out.push_str("xmlns:"),
            ns!(xlink) => self.out.push_str("xlink:"),
            _ => (),
        }
        self.out.push_str(&name.local);
    }
}

fn is_void(name: &QualName) -> bool {
    name.ns == ns!(html)
        && matches!(
            name.local,
            local_name!("area")
                | local_name!("base")
                | local_name!("basefont")
                | local_name!("bgsound")
                | local_name!("br")
                | local_name!("col")
                | local_name!("embed")
                | local_name!("frame")
                | local_name!("hr")
                | local_name!("img")
                | local_name!("input")
                | local_name!("keygen")
                | local_name!("link")
                | local_name!("meta")
                | local_name!("param")
                | local_name!("source")
                | local_name!("track")
                | local_name!("wbr")
        )
}

impl Serializer for MarkupWriter {
    fn start_elem<'a, AttrIter>(&mut self, name: QualName, attrs: AttrIter) -> io::Result<()>
    where
        AttrIter: Iterator<Item = AttrRef<'a>>,
    {
        let html_name = match name.ns {
            ns!(html) => Some(name.local.clone()),
            _ => None,
        };

        if self.parent().is_some_and(|p| p.ignore_children) {
            self.stack.push(ElemInfo {
                html_name,
                ignore_children: true,
            });
            return Ok(());
        }

        self.out.push('<');
        self.out.push_str(&name.local);
        for (attr_name, value) in attrs {
            self.out.push(' ');
            self.write_attr_name(attr_name);
            if !value.is_empty() {
                self.out.push_str("=\"");
                self.write_escaped(value, true);
                self.out.push('"');
            }
        }
        self.out.push('>');

        self.stack.push(ElemInfo {
            html_name,
            ignore_children: is_void(&name),
        });
        Ok(())
    }

    fn end_elem(&mut self, name: QualName) -> io::Result<()> {
        let info = self.stack.pop().unwrap_or_default();
        if info.ignore_children {
            return Ok(());
        }

        self.out.push_str("</");
        self.out.push_str(&name.local);
        self.out.push('>');
        Ok(())
    }

    fn write_text(&mut self, text: &str) -> io::Result<()> {
        let raw = match self.parent().and_then(|p| p.html_name.as_ref()) {
            Some(name) => matches!(
                *name,
                local_name!("style")
                    | local_name!("script")
                    | local_name!("xmp")
                    | local_name!("iframe")
                    | local_name!("noembed")
                    | local_name!("noframes")
                    | local_name!("plaintext")
                    | local_name!("noscript")
            ),
            None => false,
        };

        if raw {
            self.out.push_str(text);
        } else {
            self.write_escaped(text, false);
        }
        Ok(())
    }

    fn write_comment(&mut self, text: &str) -> io::Result<()> {
        self.out.push_str("<!--");
        self.out.push_str(text);
        self.out.push_str("-->");
        Ok(())
    }

    fn write_doctype(&mut self, name: &str) -> io::Result<()> {
        self.out.push_str("<!DOCTYPE ");
        self.out.push_str(name);
        self.out.push('>');
        Ok(())
    }

    fn write_processing_instruction(&mut self, target: &str, data: &str) -> io::Result<()> {
        self.out.push_str("<?");
        self.out.push_str(target);
        self.out.push(' ');
        self.out.push_str(data);
        self.out.push('>');
        Ok(())
    }
}
