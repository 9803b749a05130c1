use anyhow::{Context, Result};
use arboard::Clipboard;

/// Access to a clipboard the game can copy the target into and paste from
pub trait ClipboardAccess: std::fmt::Debug {
    fn set_text(&mut self, text: &str) -> Result<()>;
    fn get_text(&mut self) -> Result<String>;
}

/// The system clipboard. A handle is opened per operation so a missing
/// clipboard (headless session, no display server) only fails that action.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl ClipboardAccess for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        let mut clipboard = Clipboard::new().context("Failed to access system clipboard")?;
        clipboard
            .set_text(text)
            .context("Failed to copy text to clipboard")?;
        Ok(())
    }

    fn get_text(&mut self) -> Result<String> {
        let mut clipboard = Clipboard::new().context("Failed to access system clipboard")?;
        clipboard
            .get_text()
            .context("Failed to read text from clipboard")
    }
}

/// In-process clipboard for tests and terminals without a system clipboard
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    contents: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl ClipboardAccess for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.contents = Some(text.to_string());
        Ok(())
    }

    fn get_text(&mut self) -> Result<String> {
        self.contents.clone().context("clipboard is empty")
    }
}
