use std::path::Path;

use mupdf::{Document, TextPageFlags};

use citeweave_core::{BackendError, DocumentBackend};

/// MuPDF-based implementation of [`DocumentBackend`].
///
/// The mupdf dependency is AGPL-3.0 and lives only in this crate, so
/// plain-text ingestion does not pull it in.
///
/// Header and footer bands are kept by default. Running heads such as
/// journal names or page numbers can be dropped by setting an exclusion
/// ratio, the fraction of page height measured from the top or bottom edge.
#[derive(Debug, Clone, Copy, Default)]
pub struct MupdfBackend {
    header_exclusion_ratio: Option<f32>,
    footer_exclusion_ratio: Option<f32>,
}

impl MupdfBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the header exclusion ratio. Pass `0.0` to disable.
    pub fn with_header_exclusion(mut self, ratio: f32) -> Self {
        self.header_exclusion_ratio = (ratio > 0.0).then_some(ratio.min(1.0));
        self
    }

    /// Set the footer exclusion ratio. Pass `0.0` to disable.
    pub fn with_footer_exclusion(mut self, ratio: f32) -> Self {
        self.footer_exclusion_ratio = (ratio > 0.0).then_some(ratio.min(1.0));
        self
    }
}

impl DocumentBackend for MupdfBackend {
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>, BackendError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| BackendError::OpenError("invalid path encoding".into()))?;

        let document =
            Document::open(path_str).map_err(|e| BackendError::OpenError(e.to_string()))?;

        let mut pages = Vec::new();
        for page_result in document
            .pages()
            .map_err(|e| BackendError::ExtractionError(e.to_string()))?
        {
            let page = page_result.map_err(|e| BackendError::ExtractionError(e.to_string()))?;
            let text_page = page
                .to_text_page(TextPageFlags::empty())
                .map_err(|e| BackendError::ExtractionError(e.to_string()))?;

            let bounds = page
                .bounds()
                .map_err(|e| BackendError::ExtractionError(e.to_string()))?;
            let height = bounds.y1 - bounds.y0;
            let header_limit = self.header_exclusion_ratio.map(|r| bounds.y0 + height * r);
            let footer_limit = self.footer_exclusion_ratio.map(|r| bounds.y1 - height * r);

            let mut text = String::new();
            for block in text_page.blocks() {
                let block_bounds = block.bounds();
                if header_limit.is_some_and(|limit| block_bounds.y1 <= limit) {
                    continue;
                }
                if footer_limit.is_some_and(|limit| block_bounds.y0 >= limit) {
                    continue;
                }
                for line in block.lines() {
                    text.extend(line.chars().map(|c| c.char().unwrap_or('\u{FFFD}')));
                    text.push('\n');
                }
            }
            pages.push(text);
        }

        tracing::debug!(path = %path.display(), pages = pages.len(), "decoded PDF");
        Ok(pages)
    }
}
