use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Which of the three trainers is being played
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Variant {
    /// copy with ⌘C, paste with ⌘V into a single-line field
    #[default]
    Mac,
    /// copy with Ctrl+C, paste with Ctrl+V into a paste area
    Windows,
    /// select the text inside the box with the mouse
    #[value(name = "select")]
    #[serde(rename = "select")]
    #[strum(serialize = "select")]
    Selection,
}

/// Whether the answer is reproduced by pasting or by selecting
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CaptureMode {
    /// single-line editable field
    Field,
    /// multi-line area, Enter inserts a newline
    Area,
    Selection,
}

impl Variant {
    pub fn capture_mode(&self) -> CaptureMode {
        match self {
            Variant::Mac => CaptureMode::Field,
            Variant::Windows => CaptureMode::Area,
            Variant::Selection => CaptureMode::Selection,
        }
    }

    pub fn is_paste(&self) -> bool {
        !matches!(self, Variant::Selection)
    }

    pub fn prompt(&self) -> &'static str {
        match self {
            Variant::Mac | Variant::Windows => "Copy and paste the text:",
            Variant::Selection => "Select all the text inside the box:",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Variant::Mac => "Copy & Paste on Mac",
            Variant::Windows => "Copy & Paste on Windows",
            Variant::Selection => "Select the Text",
        }
    }

    /// Headline and subline of the win modal
    pub fn victory(&self) -> (&'static str, &'static str) {
        match self {
            Variant::Mac => ("MAC PRO!", "Copy & Paste levelled up"),
            Variant::Windows => ("COPY & PASTE", "Skill levelled up"),
            Variant::Selection => ("VERIFIED!", "Selection skill levelled up"),
        }
    }

    /// Label of the modifier key cap shown in the key strip
    pub fn modifier_label(&self) -> &'static str {
        match self {
            Variant::Mac => "⌘",
            Variant::Windows | Variant::Selection => "Ctrl",
        }
    }
}
