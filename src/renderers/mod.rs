//! Renderers module for punchbox
//!
//! The layout engine produces a renderer-agnostic display list; renderers
//! turn one page of it into a document, and `write_pages` persists one file
//! per page.

pub mod display_list;
pub mod layout_engine;
pub mod svg;

use std::io;
use std::path::{Path, PathBuf};

pub use display_list::{DisplayList, DrawInstruction, LabelRole, NoteFill, Page, Stave, StaveGeometry};
pub use layout_engine::{LayoutError, StaveLayoutEngine};
pub use svg::SvgRenderer;

/// Converts one page of the display list into a complete document
pub trait Renderer {
    /// File extension of the produced documents, without the dot
    fn extension(&self) -> &'static str;

    fn render_page(&self, page: &Page) -> String;
}

/// Output path of a page: `{prefix}{index}.{extension}`
pub fn page_path(prefix: &str, index: usize, extension: &str) -> PathBuf {
    PathBuf::from(format!("{}{}.{}", prefix, index, extension))
}

/// Render and write every page, returning the written paths in page order
///
/// Each page is rendered fully in memory, written to a temporary sibling and
/// renamed into place, so a page file is either complete or absent.
pub fn write_pages(renderer: &dyn Renderer, pages: &[Page], prefix: &str) -> io::Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(pages.len());
    for page in pages {
        let path = page_path(prefix, page.index, renderer.extension());
        log::info!("Writing page {}..", page.index);
        let document = renderer.render_page(page);
        write_atomically(&path, document.as_bytes())?;
        written.push(path);
    }
    Ok(written)
}

fn write_atomically(path: &Path, contents: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    std::fs::write(&tmp, contents)?;
    std::fs::rename(&tmp, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct PlainRenderer;

    impl Renderer for PlainRenderer {
        fn extension(&self) -> &'static str {
            "txt"
        }

        fn render_page(&self, page: &Page) -> String {
            format!("page {} with {} staves", page.index, page.staves.len())
        }
    }

    fn empty_page(index: usize) -> Page {
        Page {
            index,
            width: 100.0,
            height: 100.0,
            staves: Vec::new(),
        }
    }

    #[test]
    fn test_page_path() {
        assert_eq!(page_path("out/song", 3, "svg"), PathBuf::from("out/song3.svg"));
    }

    #[test]
    fn test_write_pages_creates_one_file_per_page() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("nested").join("sheet");
        let prefix = prefix.to_str().unwrap();

        let written = write_pages(&PlainRenderer, &[empty_page(0), empty_page(1)], prefix).unwrap();

        assert_eq!(written.len(), 2);
        assert!(written[1].ends_with("sheet1.txt"));
        assert_eq!(std::fs::read_to_string(&written[0]).unwrap(), "page 0 with 0 staves");
        // No temporary files left behind
        let leftovers = std::fs::read_dir(dir.path().join("nested"))
            .unwrap()
            .filter(|e| e.as_ref().unwrap().path().extension().is_some_and(|x| x == "tmp"))
            .count();
        assert_eq!(leftovers, 0);
    }
}
