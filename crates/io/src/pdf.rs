//! PDF text extraction via `pdftotext` (poppler-utils).

use std::path::Path;
use std::process::Command;

/// Extract per-page text from a PDF, in page order.
///
/// Shells out to `pdftotext -layout <file> -` and splits the output on
/// form feeds (one per page boundary). The whole document is paged
/// before the caller sees any text.
pub fn extract_pages(path: &Path) -> Result<Vec<String>, String> {
    which::which("pdftotext").map_err(|_| {
        "pdftotext not installed (poppler-utils). \
         Install with: apt install poppler-utils / brew install poppler"
            .to_string()
    })?;

    let file_str = path
        .to_str()
        .ok_or_else(|| format!("invalid file path: {}", path.display()))?;

    let output = Command::new("pdftotext")
        .args(["-layout", file_str, "-"])
        .output()
        .map_err(|e| format!("failed to run pdftotext: {e}"))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!(
            "pdftotext failed (exit {}): {}",
            output.status.code().unwrap_or(-1),
            stderr.trim(),
        ));
    }

    let text = String::from_utf8_lossy(&output.stdout).to_string();

    if text.trim().is_empty() {
        return Err("PDF appears scanned/image-only — text extraction failed".to_string());
    }

    Ok(split_pages(&text))
}

/// Split `pdftotext` output into pages. The tool terminates every page
/// with a form feed, so the final chunk is usually empty and dropped;
/// interior blank pages are preserved to keep page numbering intact.
pub fn split_pages(text: &str) -> Vec<String> {
    let mut pages: Vec<String> = text.split('\u{c}').map(str::to_string).collect();
    while pages.last().is_some_and(|p| p.trim().is_empty()) {
        pages.pop();
    }
    pages
}
