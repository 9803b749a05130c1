use std::ops::Range;

use crate::layout::{hit_test, wrap, ScreenLayout};

/// One end of a mouse selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// char index into the target text
    Inside(usize),
    /// somewhere outside the text box
    Outside,
}

/// A live selection between an anchor (mouse down) and a focus (drag / up)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub anchor: Endpoint,
    pub focus: Endpoint,
    anchor_cell: (u16, u16),
    focus_cell: (u16, u16),
}

impl Selection {
    /// Start a selection at an absolute screen cell
    pub fn begin(layout: &ScreenLayout, target: &str, col: u16, row: u16) -> Self {
        let point = locate(layout, target, col, row);
        Self {
            anchor: point,
            focus: point,
            anchor_cell: (col, row),
            focus_cell: (col, row),
        }
    }

    /// Select every cell on the screen, which always reaches past the box
    pub fn whole_screen() -> Self {
        Self {
            anchor: Endpoint::Outside,
            focus: Endpoint::Outside,
            anchor_cell: (0, 0),
            focus_cell: (u16::MAX, u16::MAX),
        }
    }

    pub fn extend(&mut self, layout: &ScreenLayout, target: &str, col: u16, row: u16) {
        self.focus = locate(layout, target, col, row);
        self.focus_cell = (col, row);
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor_cell == self.focus_cell
    }

    /// Selected char range of the target, if the selection lies in the box
    pub fn range(&self, target_len: usize) -> Option<Range<usize>> {
        if self.is_collapsed() {
            return None;
        }
        match (self.anchor, self.focus) {
            (Endpoint::Inside(a), Endpoint::Inside(f)) => {
                let lo = a.min(f).min(target_len);
                let hi = (a.max(f) + 1).min(target_len);
                (lo < hi).then_some(lo..hi)
            }
            _ => None,
        }
    }

    /// Selected text, or an empty string when the selection is collapsed or
    /// strays outside the text box.
    pub fn text(&self, target: &str) -> String {
        let chars: Vec<char> = target.chars().collect();
        match self.range(chars.len()) {
            Some(r) => chars[r].iter().collect::<String>().trim().to_string(),
            None => String::new(),
        }
    }
}

fn locate(layout: &ScreenLayout, target: &str, col: u16, row: u16) -> Endpoint {
    match layout.box_cell(col, row) {
        Some((x, y)) => {
            let lines = wrap(target, layout.text_inner.width);
            Endpoint::Inside(hit_test(&lines, x, y))
        }
        None => Endpoint::Outside,
    }
}
