//! SVG document generation
//!
//! Collects elements in memory and produces the finished document in one
//! piece, so a page is never persisted half-written.

use super::elements::mm;

pub struct SvgDocument {
    width: f64,
    height: f64,
    elements: Vec<String>,
}

impl SvgDocument {
    /// New document sized in millimetres
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            elements: Vec::new(),
        }
    }

    pub fn push(&mut self, element: String) {
        self.elements.push(element);
    }

    pub fn extend(&mut self, elements: impl IntoIterator<Item = String>) {
        self.elements.extend(elements);
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn finish(self) -> String {
        let mut out = String::new();
        out.push_str(r#"<?xml version="1.0" encoding="utf-8" ?>"#);
        out.push('\n');
        out.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.1" width="{}" height="{}">"#,
            mm(self.width),
            mm(self.height)
        ));
        out.push('\n');
        for element in &self.elements {
            out.push_str("  ");
            out.push_str(element);
            out.push('\n');
        }
        out.push_str("</svg>\n");
        out
    }
}
