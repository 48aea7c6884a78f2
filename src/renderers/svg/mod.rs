//! SVG rendering output
//!
//! Turns one page of the display list into a printable SVG document.

pub mod document;
pub mod elements;

pub use document::SvgDocument;

use super::display_list::{DrawInstruction, LabelRole, NoteFill, Page};
use super::Renderer;

/// SVG document generator
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgRenderer;

impl SvgRenderer {
    fn label_fill(role: LabelRole) -> &'static str {
        match role {
            LabelRole::PitchName => "red",
            LabelRole::StaveTitle => "blue",
        }
    }

    fn note_fill(fill: NoteFill) -> &'static str {
        match fill {
            NoteFill::Exact => "black",
            NoteFill::Snapped => "red",
        }
    }
}

impl Renderer for SvgRenderer {
    fn extension(&self) -> &'static str {
        "svg"
    }

    fn render_page(&self, page: &Page) -> String {
        let mut doc = SvgDocument::new(page.width, page.height);

        for stave in &page.staves {
            for instruction in &stave.instructions {
                match instruction {
                    DrawInstruction::Cross { x, y, size } => {
                        doc.extend(elements::cross(*x, *y, *size));
                    }
                    DrawInstruction::TrackLine { x1, x2, y, .. } => {
                        doc.push(elements::line(*x1, *y, *x2, *y));
                    }
                    DrawInstruction::Label {
                        text, x, y, size, role,
                    } => {
                        doc.push(elements::text(text, *x, *y, *size, Self::label_fill(*role)));
                    }
                    DrawInstruction::NoteDot {
                        x, y, radius, fill, ..
                    } => {
                        doc.push(elements::circle(*x, *y, *radius, Self::note_fill(*fill)));
                    }
                }
            }
        }

        doc.finish()
    }
}
