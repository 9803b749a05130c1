use ratatui::layout::{Constraint, Direction, Layout, Margin, Rect};
use unicode_width::UnicodeWidthChar;

use crate::generator::TextMeasure;
use crate::variant::{CaptureMode, Variant};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

/// Rows of the target box the text has to fit in
pub const TEXT_BOX_ROWS: u16 = 3;

/// Where each part of the game sits on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenLayout {
    pub header: Rect,
    pub status: Rect,
    pub text_box: Rect,
    /// inside the border, where the target text is drawn
    pub text_inner: Rect,
    pub input: Rect,
    pub keys: Rect,
    pub footer: Rect,
}

impl ScreenLayout {
    pub fn new(area: Rect, variant: Variant) -> Self {
        let (input_rows, key_rows) = match variant.capture_mode() {
            CaptureMode::Field => (3, 3),
            CaptureMode::Area => (5, 3),
            CaptureMode::Selection => (0, 0),
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(3),                 // title + progress
                Constraint::Length(1),                 // status line
                Constraint::Length(1),                 // padding
                Constraint::Length(TEXT_BOX_ROWS + 2), // target box
                Constraint::Length(input_rows),        // input field / paste area
                Constraint::Length(key_rows),          // key caps
                Constraint::Min(0),
                Constraint::Length(1), // legend
            ])
            .split(area);

        let text_box = chunks[3];
        Self {
            header: chunks[0],
            status: chunks[1],
            text_box,
            text_inner: text_box.inner(Margin::new(1, 1)),
            input: chunks[4],
            keys: chunks[5],
            footer: chunks[7],
        }
    }

    /// Measure for target text drawn into this layout's box
    pub fn measure(&self) -> WrapMeasure {
        WrapMeasure::new(self.text_inner.width, self.text_inner.height)
    }

    /// Translate an absolute cell into box-relative coordinates
    pub fn box_cell(&self, col: u16, row: u16) -> Option<(u16, u16)> {
        let inner = self.text_inner;
        let inside = col >= inner.x
            && col < inner.x + inner.width
            && row >= inner.y
            && row < inner.y + inner.height;
        inside.then(|| (col - inner.x, row - inner.y))
    }
}

/// Centered area of the win modal
pub fn modal_area(area: Rect) -> Rect {
    let width = area.width.min(60);
    let height = area.height.min(12);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// One visual row of wrapped text, as a char range into the source string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrappedLine {
    pub start: usize,
    /// exclusive
    pub end: usize,
    pub text: String,
}

/// Greedy word wrap at `width` columns.
///
/// Words are split on single spaces; the space that causes a break is not
/// rendered but stays part of the source range between lines. Words wider
/// than the box are hard-broken.
pub fn wrap(text: &str, width: u16) -> Vec<WrappedLine> {
    let width = width.max(1) as usize;
    let chars: Vec<char> = text.chars().collect();
    let mut lines = Vec::new();

    let mut line_start = 0;
    let mut line_width = 0;
    let mut idx = 0;

    while idx < chars.len() {
        // find the next word [idx, word_end)
        let mut word_end = idx;
        while word_end < chars.len() && chars[word_end] != ' ' {
            word_end += 1;
        }
        let word_width: usize = chars[idx..word_end]
            .iter()
            .map(|c| c.width().unwrap_or(0))
            .sum();

        let sep = if line_width > 0 { 1 } else { 0 };
        if line_width > 0 && line_width + sep + word_width > width {
            // break before this word, dropping the separating space
            lines.push(make_line(&chars, line_start, idx - 1));
            line_start = idx;
            line_width = 0;
        }

        if word_width > width {
            // hard-break an oversized word
            let mut col = line_width;
            let mut pos = idx;
            while pos < word_end {
                let w = chars[pos].width().unwrap_or(0);
                if col + w > width && col > 0 {
                    lines.push(make_line(&chars, line_start, pos));
                    line_start = pos;
                    col = 0;
                }
                col += w;
                pos += 1;
            }
            line_width = col;
        } else {
            line_width += if line_width > 0 { 1 } else { 0 } + word_width;
        }

        idx = word_end;
        if idx < chars.len() {
            // skip the separator
            idx += 1;
            if idx == chars.len() {
                line_width += 1;
            }
        }
    }

    if line_start < chars.len() || lines.is_empty() {
        lines.push(make_line(&chars, line_start, chars.len()));
    }

    lines
}

fn make_line(chars: &[char], start: usize, end: usize) -> WrappedLine {
    WrappedLine {
        start,
        end,
        text: chars[start..end].iter().collect(),
    }
}

/// Map a cell inside the text box to a char index of the wrapped text.
///
/// Columns past the end of a row land on the row's end, rows past the last
/// line land on the end of the text.
pub fn hit_test(lines: &[WrappedLine], col: u16, row: u16) -> usize {
    let Some(line) = lines.get(row as usize) else {
        return lines.last().map(|l| l.end).unwrap_or(0);
    };

    let mut x = 0usize;
    for (offset, c) in line.text.chars().enumerate() {
        let w = c.width().unwrap_or(0);
        if (col as usize) < x + w.max(1) {
            return line.start + offset;
        }
        x += w;
    }
    line.end
}

/// Measures text by wrapping it into a box of fixed width and height
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrapMeasure {
    pub width: u16,
    pub height: u16,
    pub tolerance: u16,
}

impl WrapMeasure {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            tolerance: 0,
        }
    }

    pub fn with_tolerance(mut self, rows: u16) -> Self {
        self.tolerance = rows;
        self
    }
}

impl TextMeasure for WrapMeasure {
    fn content_height(&self, text: &str) -> u16 {
        wrap(text, self.width).len().min(u16::MAX as usize) as u16
    }

    fn visible_height(&self) -> u16 {
        self.height
    }

    fn tolerance(&self) -> u16 {
        self.tolerance
    }
}
