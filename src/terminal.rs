use anyhow::{Context, Result};
use crossterm::{
    cursor::Show,
    event::{
        DisableBracketedPaste, DisableFocusChange, DisableMouseCapture, EnableBracketedPaste,
        EnableFocusChange, EnableMouseCapture, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use log::{info, warn};
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Terminal modes switched on so far, so they can be switched off again
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TerminalModes {
    pub raw: bool,
    pub alternate_screen: bool,
    pub bracketed_paste: bool,
    pub focus_change: bool,
    pub keyboard_enhanced: bool,
    pub mouse_capture: bool,
}

impl TerminalModes {
    pub const NONE: Self = Self {
        raw: false,
        alternate_screen: false,
        bracketed_paste: false,
        focus_change: false,
        keyboard_enhanced: false,
        mouse_capture: false,
    };
}

/// Shared with the panic hook, which has no access to the guard
static ACTIVE: Mutex<TerminalModes> = Mutex::new(TerminalModes::NONE);

fn active() -> MutexGuard<'static, TerminalModes> {
    ACTIVE.lock().unwrap_or_else(PoisonError::into_inner)
}

fn mark(f: impl FnOnce(&mut TerminalModes)) {
    f(&mut active());
}

/// Hand over the recorded modes and forget them, so a second restore is a no-op
fn take_active() -> TerminalModes {
    std::mem::take(&mut *active())
}

/// Owns the terminal setup; dropping it puts the terminal back
#[derive(Debug)]
pub struct TerminalGuard {
    keyboard_enhanced: bool,
}

impl TerminalGuard {
    /// Raw mode, alternate screen, bracketed paste, focus reports, keyboard
    /// enhancement where supported, and mouse capture when asked for.
    /// Anything already switched on is undone if a later step fails.
    pub fn enter(mouse_capture: bool) -> Result<Self> {
        let mut guard = Self {
            keyboard_enhanced: false,
        };
        let mut stdout = io::stdout();

        enable_raw_mode().context("enabling raw mode")?;
        mark(|m| m.raw = true);
        execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
        mark(|m| m.alternate_screen = true);
        execute!(stdout, EnableBracketedPaste).context("enabling bracketed paste")?;
        mark(|m| m.bracketed_paste = true);

        // focus reports only clear stuck key caps
        match execute!(stdout, EnableFocusChange) {
            Ok(()) => mark(|m| m.focus_change = true),
            Err(e) => warn!("focus reporting unavailable: {e}"),
        }

        if matches!(supports_keyboard_enhancement(), Ok(true)) {
            execute!(
                stdout,
                PushKeyboardEnhancementFlags(
                    KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                        | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                        | KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES
                        | KeyboardEnhancementFlags::REPORT_ALTERNATE_KEYS
                )
            )
            .context("enabling keyboard enhancement")?;
            mark(|m| m.keyboard_enhanced = true);
            guard.keyboard_enhanced = true;
        }

        if mouse_capture {
            execute!(stdout, EnableMouseCapture).context("enabling mouse capture")?;
            mark(|m| m.mouse_capture = true);
        }

        info!(
            "keyboard enhancement: {}, mouse capture: {mouse_capture}",
            guard.keyboard_enhanced
        );
        Ok(guard)
    }

    /// The terminal reports key releases and shifted characters
    pub fn keyboard_enhanced(&self) -> bool {
        self.keyboard_enhanced
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore();
    }
}

/// Undo every recorded mode. Safe to call more than once.
pub fn restore() {
    let modes = take_active();
    restore_modes(&mut io::stdout(), modes);
    if modes.raw {
        if let Err(e) = disable_raw_mode() {
            warn!("disabling raw mode: {e}");
        }
    }
}

/// Write the escape sequences that switch `modes` off, newest first.
/// Errors are logged and the remaining steps still run.
fn restore_modes<W: Write>(out: &mut W, modes: TerminalModes) {
    let step = |name: &str, res: io::Result<()>| {
        if let Err(e) = res {
            warn!("restoring terminal ({name}): {e}");
        }
    };

    if modes.mouse_capture {
        step("mouse capture", execute!(out, DisableMouseCapture));
    }
    if modes.keyboard_enhanced {
        step("keyboard flags", execute!(out, PopKeyboardEnhancementFlags));
    }
    if modes.focus_change {
        step("focus change", execute!(out, DisableFocusChange));
    }
    if modes.bracketed_paste {
        step("bracketed paste", execute!(out, DisableBracketedPaste));
    }
    if modes.alternate_screen {
        step("alternate screen", execute!(out, LeaveAlternateScreen, Show));
    }
}

/// Restore the terminal before the default hook prints the panic
pub fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore();
        default_hook(info);
    }));
}
