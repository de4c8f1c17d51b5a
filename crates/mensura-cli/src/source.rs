//! Reading notices from disk into ordered page texts.

use std::fs;
use std::path::Path;

use anyhow::Context;
use lopdf::Document;
use tracing::{debug, warn};

use mensura_core::text::PAGE_BREAK;
use mensura_core::RawDocument;

/// File extensions accepted by `process` and `batch`.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["txt", "pdf"];

/// Lowercased extension of a path, empty when there is none.
pub fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

pub fn is_supported(path: &Path) -> bool {
    SUPPORTED_EXTENSIONS.contains(&extension(path).as_str())
}

/// Read a `.txt` (pages separated by form feeds) or `.pdf` notice.
pub fn read_document(path: &Path) -> anyhow::Result<RawDocument> {
    let document = match extension(path).as_str() {
        "txt" => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            RawDocument::from_text(&text)
        }
        "pdf" => {
            let data = fs::read(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            read_pdf(&data)?
        }
        other => anyhow::bail!("Unsupported file format: {}", other),
    };

    debug!(
        "Read {} page(s) from {}",
        document.page_count(),
        path.display()
    );
    Ok(document)
}

/// Extract per-page text from a PDF. When the text layer cannot be read page
/// by page, the whole document is extracted at once and split at form feeds.
pub fn read_pdf(data: &[u8]) -> anyhow::Result<RawDocument> {
    let mut doc = Document::load_mem(data).context("Failed to parse PDF")?;

    let decrypted = if doc.is_encrypted() {
        if doc.decrypt("").is_err() {
            anyhow::bail!("PDF is encrypted with a password");
        }
        debug!("Decrypted PDF with empty password");

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .context("Failed to save decrypted PDF")?;
        Some(buffer)
    } else {
        None
    };

    let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
    if page_numbers.is_empty() {
        anyhow::bail!("PDF has no pages");
    }

    let mut pages = Vec::with_capacity(page_numbers.len());
    let mut failed = false;
    for number in &page_numbers {
        match doc.extract_text(&[*number]) {
            Ok(text) => pages.push(text),
            Err(e) => {
                warn!("Failed to extract text from page {}: {}", number, e);
                failed = true;
                break;
            }
        }
    }

    if failed || pages.iter().all(|p| p.trim().is_empty()) {
        debug!("Falling back to whole-document text extraction");
        let bytes = decrypted.as_deref().unwrap_or(data);
        let text = pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| anyhow::anyhow!("Failed to extract PDF text: {}", e))?;
        pages = text.split(PAGE_BREAK).map(str::to_string).collect();
    }

    let document = RawDocument::from_pages(pages);
    if document.is_empty() {
        anyhow::bail!("No text could be extracted from the PDF");
    }

    Ok(document)
}
