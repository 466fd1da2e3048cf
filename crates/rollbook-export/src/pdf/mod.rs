//! Minimal streaming PDF 1.4 output.
//!
//! [`PdfWriter`] hands back each part of the file as soon as it is final:
//! the header and font objects from [`PdfWriter::begin`], one content stream
//! plus page object per [`PdfWriter::page`], and the page tree, catalog,
//! cross-reference table and trailer from [`PdfWriter::finish`]. Byte offsets
//! are tracked as chunks are produced, so nothing before the trailer needs to
//! be revisited.
//!
//! Text uses the standard Helvetica faces with WinAnsi encoding. Characters
//! outside Latin-1 are printed as `?`.

mod font;
mod page;
mod writer;

pub use font::{Font, text_width};
pub use page::{Align, MARGIN, PAGE_HEIGHT, PAGE_WIDTH, Page, TextStyle};
pub use writer::PdfWriter;

/// Maps a character to its single-byte WinAnsi code.
pub(crate) fn encode_char(c: char) -> u8 {
    match c {
        '\t' | '\n' | '\r' => b' ',
        ' '..='~' => c as u8,
        '\u{a0}'..='\u{ff}' => c as u32 as u8,
        _ => b'?',
    }
}

/// Encodes text as a PDF literal string, parentheses included.
pub(crate) fn literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('(');
    for c in text.chars() {
        match encode_char(c) {
            b @ (b'(' | b')' | b'\\') => {
                out.push('\\');
                out.push(b as char);
            }
            b if b >= 0x80 => out.push_str(&format!("\\{:03o}", b)),
            b => out.push(b as char),
        }
    }
    out.push(')');
    out
}
