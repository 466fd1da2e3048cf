use std::fmt::Write;

use super::font::{Font, text_width};
use super::literal;

/// US Letter, in points.
pub const PAGE_WIDTH: f32 = 612.0;
pub const PAGE_HEIGHT: f32 = 792.0;
pub const MARGIN: f32 = 50.0;

const LINE_SPACING: f32 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy)]
pub struct TextStyle {
    pub font: Font,
    pub size: f32,
    pub align: Align,
    pub underline: bool,
}

impl TextStyle {
    pub const fn new(size: f32) -> Self {
        Self {
            font: Font::Regular,
            size,
            align: Align::Left,
            underline: false,
        }
    }

    pub const fn bold(mut self) -> Self {
        self.font = Font::Bold;
        self
    }

    pub const fn centered(mut self) -> Self {
        self.align = Align::Center;
        self
    }

    pub const fn underlined(mut self) -> Self {
        self.underline = true;
        self
    }

    pub fn line_height(&self) -> f32 {
        self.size * LINE_SPACING
    }
}

/// One page of flowing text. Lines are laid out top to bottom from the
/// margin; callers check [`Page::fits`] before starting a block that must not
/// split.
#[derive(Debug)]
pub struct Page {
    content: String,
    cursor: f32,
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl Page {
    pub fn new() -> Self {
        Self {
            content: String::new(),
            cursor: PAGE_HEIGHT - MARGIN,
        }
    }

    pub fn content_width() -> f32 {
        PAGE_WIDTH - 2.0 * MARGIN
    }

    pub fn is_blank(&self) -> bool {
        self.content.is_empty()
    }

    /// Vertical space left above the bottom margin.
    pub fn remaining(&self) -> f32 {
        self.cursor - MARGIN
    }

    pub fn fits(&self, height: f32) -> bool {
        height <= self.remaining()
    }

    /// Height `text` would take once wrapped.
    pub fn measure(text: &str, style: TextStyle) -> f32 {
        wrap(text, style.font, style.size, Self::content_width()).len() as f32
            * style.line_height()
    }

    /// Writes `text`, wrapping at the content width, and advances the cursor.
    pub fn text(&mut self, text: &str, style: TextStyle) {
        for line in wrap(text, style.font, style.size, Self::content_width()) {
            self.line(&line, style);
        }
    }

    pub fn gap(&mut self, points: f32) {
        self.cursor -= points;
    }

    fn line(&mut self, line: &str, style: TextStyle) {
        let width = text_width(line, style.font, style.size);
        let x = match style.align {
            Align::Left => MARGIN,
            Align::Center => MARGIN + (Self::content_width() - width).max(0.0) / 2.0,
        };
        let baseline = self.cursor - style.size;

        let _ = writeln!(
            self.content,
            "BT /{} {:.1} Tf {:.2} {:.2} Td {} Tj ET",
            style.font.resource(),
            style.size,
            x,
            baseline,
            literal(line)
        );
        if style.underline {
            let y = baseline - style.size * 0.15;
            let _ = writeln!(
                self.content,
                "{:.2} w {:.2} {:.2} m {:.2} {:.2} l S",
                (style.size / 18.0).max(0.5),
                x,
                y,
                x + width,
                y
            );
        }
        self.cursor -= style.line_height();
    }

    pub(crate) fn content(&self) -> &[u8] {
        self.content.as_bytes()
    }
}

/// Greedy word wrap. Words longer than a full line are split by character.
pub(crate) fn wrap(text: &str, font: Font, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if text_width(&candidate, font, size) <= max_width {
            current = candidate;
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if text_width(word, font, size) <= max_width {
            current = word.to_string();
            continue;
        }
        for c in word.chars() {
            current.push(c);
            if text_width(&current, font, size) > max_width && current.chars().count() > 1 {
                current.pop();
                lines.push(std::mem::take(&mut current));
                current.push(c);
            }
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}
