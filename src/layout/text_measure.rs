//! Text Measurement
//!
//! The layout engine never shapes text itself. It asks a `TextMeasure` for
//! the extents of a string, optionally wrapped at a maximum width.
//!
//! `MonospaceMeasure` is the built-in implementation: every terminal cell is
//! one fixed advance wide, cell widths come from `unicode-width`, and
//! wrapping never splits a grapheme cluster (`unicode-segmentation`).
//!
//! Wrapping is word-break. A word longer than the whole line falls back to
//! breaking between graphemes.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::style::Style;

/// Font metrics handed to the measurer, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontMetrics {
    pub font_size: i32,
    pub line_height: i32,
}

impl FontMetrics {
    pub fn of(style: &Style) -> Self {
        Self {
            font_size: style.font_size.max(0),
            line_height: style.effective_line_height(),
        }
    }
}

/// Measured text block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextExtent {
    /// Widest line.
    pub width: i32,
    /// Line count times line height.
    pub height: i32,
    /// Width of each laid-out line.
    pub lines: Vec<i32>,
}

impl TextExtent {
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

/// Text measurement query.
///
/// `max_width` of `None` means "do not wrap"; explicit newlines still break.
pub trait TextMeasure {
    fn measure(&self, content: &str, max_width: Option<i32>, metrics: FontMetrics) -> TextExtent;
}

// =============================================================================
// Monospace
// =============================================================================

/// Fixed-advance measurer.
///
/// One cell is `max(1, font_size * advance_percent / 100)` pixels wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonospaceMeasure {
    pub advance_percent: i32,
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        Self { advance_percent: 60 }
    }
}

impl MonospaceMeasure {
    pub fn new(advance_percent: i32) -> Self {
        Self { advance_percent }
    }

    /// Pixel width of one cell at `font_size`.
    #[inline]
    pub fn advance(&self, font_size: i32) -> i32 {
        (font_size * self.advance_percent / 100).max(1)
    }

    fn wrap_paragraph(
        &self,
        paragraph: &str,
        max_width: Option<i32>,
        advance: i32,
        out: &mut Vec<i32>,
    ) {
        let Some(max) = max_width else {
            out.push(cells(paragraph) * advance);
            return;
        };

        let mut line = 0;
        let mut pending_space = 0;

        for token in paragraph.split_word_bounds() {
            let w = cells(token) * advance;

            if token.chars().all(char::is_whitespace) {
                // Leading whitespace on a wrapped line is dropped.
                if line > 0 {
                    pending_space += w;
                }
                continue;
            }

            if line > 0 && line + pending_space + w > max {
                out.push(line);
                line = 0;
                pending_space = 0;
            }

            if w > max {
                // Word wider than the line: break between graphemes.
                line += pending_space;
                for g in token.graphemes(true) {
                    let gw = cells(g) * advance;
                    if line > 0 && line + gw > max {
                        out.push(line);
                        line = 0;
                    }
                    line += gw;
                }
            } else {
                line += pending_space + w;
            }
            pending_space = 0;
        }

        out.push(line);
    }
}

impl TextMeasure for MonospaceMeasure {
    fn measure(&self, content: &str, max_width: Option<i32>, metrics: FontMetrics) -> TextExtent {
        if content.is_empty() {
            return TextExtent::default();
        }

        let advance = self.advance(metrics.font_size);
        let max_width = max_width.map(|w| w.max(0));

        let mut lines = Vec::new();
        for paragraph in content.split('\n') {
            self.wrap_paragraph(paragraph, max_width, advance, &mut lines);
        }

        TextExtent {
            width: lines.iter().copied().max().unwrap_or(0),
            height: lines.len() as i32 * metrics.line_height,
            lines,
        }
    }
}

/// Terminal cell width of a string.
#[inline]
fn cells(s: &str) -> i32 {
    UnicodeWidthStr::width(s) as i32
}
