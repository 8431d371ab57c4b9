//! Marker-delimited text replacement.
//!
//! A region is the text between a literal start marker and the first end
//! marker after it. Splicing replaces only that text; everything else in
//! the document is kept byte for byte.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpliceError {
    #[error("Marker not found: '{marker}'")]
    MarkerNotFound { marker: String },
}

fn not_found(marker: &str) -> SpliceError {
    SpliceError::MarkerNotFound {
        marker: marker.trim().to_string(),
    }
}

/// Byte range of the content between `start` and `end`, searching from `from`.
fn region(doc: &str, start: &str, end: &str, from: usize) -> Result<(usize, usize), SpliceError> {
    let tail = doc.get(from..).ok_or_else(|| not_found(start))?;
    let open = from + tail.find(start).ok_or_else(|| not_found(start))? + start.len();
    let close = open + doc[open..].find(end).ok_or_else(|| not_found(end))?;
    Ok((open, close))
}

/// Replace the content between the first `start` marker at or after `from`
/// and the first `end` marker following it.
pub fn splice(
    doc: &str,
    start: &str,
    end: &str,
    content: &str,
    from: usize,
) -> Result<String, SpliceError> {
    let (open, close) = region(doc, start, end, from)?;
    Ok(replace_range(doc, open, close, content))
}

fn replace_range(doc: &str, open: usize, close: usize, content: &str) -> String {
    let mut out = String::with_capacity(doc.len() - (close - open) + content.len());
    out.push_str(&doc[..open]);
    out.push_str(content);
    out.push_str(&doc[close..]);
    out
}

/// Like [`splice`], but the markers are looked up inside the first element
/// that opens with `open_prefix` and closes with `close_tag`.
pub fn splice_within_element(
    doc: &str,
    open_prefix: &str,
    close_tag: &str,
    start: &str,
    end: &str,
    content: &str,
) -> Result<String, SpliceError> {
    let element = doc.find(open_prefix).ok_or_else(|| not_found(open_prefix))?;
    let element_end =
        element + doc[element..].find(close_tag).ok_or_else(|| not_found(close_tag))?;

    let (open, close) = region(doc, start, end, element)?;
    if close > element_end {
        return Err(not_found(start));
    }
    Ok(replace_range(doc, open, close, content))
}
