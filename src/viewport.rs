//! Viewport windowing: scan only the lines on screen.

use crate::extract::TextWindow;
use crate::utils::offsets::OffsetEncoding;

/// Byte index where 0-based line `line` starts, or `None` past the last line.
fn line_start(document: &str, line: usize) -> Option<usize> {
    if line == 0 {
        return Some(0);
    }
    document
        .match_indices('\n')
        .nth(line - 1)
        .map(|(idx, _)| idx + 1)
}

/// Window over the inclusive line range `first_line..=last_line`.
///
/// The range is clamped to the document; a `first_line` beyond the end gives
/// an empty window positioned at the end of the document. The window includes
/// the newline that ends `last_line`.
pub fn visible_lines(document: &str, first_line: usize, last_line: usize, encoding: OffsetEncoding) -> TextWindow<'_> {
    let start = line_start(document, first_line).unwrap_or(document.len());
    let end = last_line
        .checked_add(1)
        .and_then(|next| line_start(document, next))
        .unwrap_or(document.len())
        .max(start);

    let offset = encoding.len_of(&document[..start]);
    log::debug!("[jumplink-viewport] lines {first_line}..={last_line} -> bytes {start}..{end}, offset {offset}");
    TextWindow::new(&document[start..end], offset).with_encoding(encoding)
}
