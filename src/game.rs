use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use log::{debug, info, warn};
use rand::{rngs::StdRng, SeedableRng};
use ratatui::layout::{Position, Rect};
use std::time::{Duration, Instant};

use crate::{
    celebration::Celebration,
    clipboard::ClipboardAccess,
    config::Config,
    generator::{generate_target, GenParams},
    keys::{self, KeyIndicators, LastAction},
    layout::{modal_area, ScreenLayout},
    runtime::DrillEvent,
    selection::Selection,
    session::{Advance, Phase, Session},
    timers::{Deferred, Timers},
    validate::{self, Outcome},
    variant::{CaptureMode, Variant},
};

/// Pause between a correct paste and the next target
pub const NEXT_ROUND_DELAY: Duration = Duration::from_millis(450);
/// Pause before a wrong paste is wiped for another try
pub const CLEAR_INPUT_DELAY: Duration = Duration::from_millis(350);

pub const CORRECT_MESSAGE: &str = "CORRECT ✅";
pub const INCORRECT_MESSAGE: &str = "INCORRECT ❌";
const CLIPBOARD_MESSAGE: &str = "Clipboard unavailable";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Neutral,
    Ok,
    Bad,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub visible: bool,
    pub text: String,
    pub kind: StatusKind,
}

impl StatusLine {
    fn hidden() -> Self {
        Self {
            visible: false,
            text: String::new(),
            kind: StatusKind::Neutral,
        }
    }

    fn prompt(variant: Variant) -> Self {
        Self {
            visible: true,
            text: variant.prompt().to_string(),
            kind: StatusKind::Neutral,
        }
    }
}

/// Timing knobs, usually taken from `Config`
#[derive(Debug, Clone, Copy)]
pub struct Settings {
    pub status_duration: Duration,
    pub key_release_delay: Duration,
    pub fit_tolerance_rows: u16,
    /// the terminal reports key releases, so caps need no decay timer
    pub key_release_events: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for Settings {
    fn from(cfg: &Config) -> Self {
        Self {
            status_duration: cfg.status_duration(),
            key_release_delay: cfg.key_release_delay(),
            fit_tolerance_rows: cfg.fit_tolerance_rows,
            key_release_events: false,
        }
    }
}

/// What the event loop should do after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// One trainer: session state plus everything drawn around it
#[derive(Debug)]
pub struct Game {
    pub variant: Variant,
    pub session: Session,
    /// contents of the input field / paste area
    pub input: String,
    /// tint of the target box after the last check
    pub verdict: Option<Outcome>,
    pub status: StatusLine,
    pub modal_open: bool,
    pub keys: KeyIndicators,
    pub last_action: LastAction,
    pub selection: Option<Selection>,
    pub celebration: Celebration,
    selecting: bool,
    viewport: Rect,
    layout: ScreenLayout,
    settings: Settings,
    timers: Timers,
    clipboard: Box<dyn ClipboardAccess>,
    rng: StdRng,
}

impl Game {
    pub fn new(
        variant: Variant,
        settings: Settings,
        clipboard: Box<dyn ClipboardAccess>,
        seed: Option<u64>,
    ) -> Self {
        let viewport = Rect::new(0, 0, 80, 24);
        Self {
            variant,
            session: Session::default(),
            input: String::new(),
            verdict: None,
            status: StatusLine::hidden(),
            modal_open: false,
            keys: KeyIndicators::default(),
            last_action: LastAction::default(),
            selection: None,
            celebration: Celebration::new(),
            selecting: false,
            viewport,
            layout: ScreenLayout::new(viewport, variant),
            settings,
            timers: Timers::new(),
            clipboard,
            rng: seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64),
        }
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    pub fn layout(&self) -> &ScreenLayout {
        &self.layout
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Follow the terminal size. Target text already on screen is kept even
    /// if it no longer fits; the next round is generated for the new box.
    pub fn set_viewport(&mut self, area: Rect) {
        if area == self.viewport {
            return;
        }
        self.viewport = area;
        self.layout = ScreenLayout::new(area, self.variant);
        self.clear_selection();
    }

    pub fn is_pending(&self, action: Deferred) -> bool {
        self.timers.is_pending(action)
    }

    fn generate(&mut self) -> String {
        let round = self.session.round;
        let params = GenParams::for_round(self.variant, round);
        let measure = self
            .layout
            .measure()
            .with_tolerance(self.settings.fit_tolerance_rows);

        let text = generate_target(&params, &measure, &mut self.rng);
        debug!("round {round} target: {text}");
        text
    }

    pub fn start(&mut self) {
        if self.session.started {
            return;
        }
        let text = self.generate();
        self.session.start(text);
        self.status = StatusLine::prompt(self.variant);
        self.input.clear();
        self.verdict = None;
        self.last_action = LastAction::default();
        self.clear_selection();
        info!("{} session started", self.variant);
    }

    pub fn reset(&mut self) {
        self.session.reset();
        self.input.clear();
        self.verdict = None;
        self.status = StatusLine::hidden();
        self.modal_open = false;
        self.keys.clear();
        self.last_action = LastAction::default();
        self.clear_selection();
        self.celebration.stop();
        self.timers.cancel_all();
        debug!("{} session reset", self.variant);
    }

    pub fn restart(&mut self) {
        self.reset();
        self.start();
    }

    /// Closing the win modal ends the session
    pub fn dismiss_modal(&mut self) {
        if self.modal_open {
            self.reset();
        }
    }

    fn clear_selection(&mut self) {
        self.selection = None;
        self.selecting = false;
    }

    fn next_target(&mut self) {
        let text = self.generate();
        self.session.set_target(text);
        self.clear_selection();
    }

    fn new_round(&mut self) {
        self.input.clear();
        self.verdict = None;
        self.last_action = LastAction::default();
        self.next_target();
    }

    fn show_status(&mut self, text: &str, kind: StatusKind, now: Instant) {
        self.status = StatusLine {
            visible: true,
            text: text.to_string(),
            kind,
        };
        self.timers
            .replace(now, self.settings.status_duration, Deferred::RevertStatus);
    }

    fn open_modal(&mut self, now: Instant) {
        self.modal_open = true;
        let (headline, _) = self.variant.victory();
        let area = modal_area(self.viewport);
        self.celebration
            .start(headline, area.width, area.height, now, &mut self.rng);
        info!("{} session complete", self.variant);
    }

    fn score(&mut self, outcome: Outcome, now: Instant) {
        let paste = self.variant.is_paste();
        match outcome {
            Outcome::Correct => {
                let advance = self.session.record_success();
                self.verdict = Some(Outcome::Correct);
                self.show_status(CORRECT_MESSAGE, StatusKind::Ok, now);
                if !paste {
                    self.clear_selection();
                }
                match advance {
                    Advance::Completed => self.open_modal(now),
                    Advance::NextRound if paste => {
                        self.timers.schedule(now, NEXT_ROUND_DELAY, Deferred::NewRound)
                    }
                    // the tint stays on the new text until the next check
                    Advance::NextRound => self.next_target(),
                    Advance::Ignored => {}
                }
                debug!("round {} correct", self.session.round);
            }
            Outcome::Incorrect => {
                self.verdict = Some(Outcome::Incorrect);
                self.show_status(INCORRECT_MESSAGE, StatusKind::Bad, now);
                if paste {
                    self.timers
                        .replace(now, CLEAR_INPUT_DELAY, Deferred::ClearInput);
                }
            }
        }
    }

    fn accepts_input(&self) -> bool {
        self.variant.is_paste() && self.phase() == Phase::Running
    }

    /// Validate the field after every change
    fn check_answer(&mut self, now: Instant) {
        if self.phase() != Phase::Running || self.timers.is_pending(Deferred::NewRound) {
            return;
        }
        if let Some(outcome) = validate::check(&self.session.target_text, &self.input) {
            self.score(outcome, now);
        }
    }

    pub fn type_char(&mut self, c: char, now: Instant) {
        if !self.accepts_input() {
            return;
        }
        self.input.push(c);
        self.check_answer(now);
    }

    pub fn backspace(&mut self, now: Instant) {
        if !self.accepts_input() {
            return;
        }
        if self.input.pop().is_some() {
            self.check_answer(now);
        }
    }

    /// Enter only breaks lines in the paste area
    pub fn newline(&mut self, now: Instant) {
        if self.variant.capture_mode() == CaptureMode::Area {
            self.type_char('\n', now);
        }
    }

    pub fn paste(&mut self, text: &str, now: Instant) {
        if !self.accepts_input() {
            return;
        }
        match self.variant.capture_mode() {
            CaptureMode::Field => self.input.push_str(&text.replace(['\r', '\n'], " ")),
            _ => self.input.push_str(&text.replace("\r\n", "\n")),
        }
        self.last_action.pasted = true;
        self.check_answer(now);
    }

    pub fn copy_target(&mut self, now: Instant) {
        if !self.accepts_input() {
            return;
        }
        match self.clipboard.set_text(&self.session.target_text) {
            Ok(()) => self.last_action.copied = true,
            Err(e) => {
                warn!("copy failed: {e:#}");
                self.show_status(CLIPBOARD_MESSAGE, StatusKind::Bad, now);
            }
        }
    }

    pub fn paste_from_clipboard(&mut self, now: Instant) {
        if !self.accepts_input() {
            return;
        }
        match self.clipboard.get_text() {
            Ok(text) => self.paste(&text, now),
            Err(e) => {
                warn!("paste failed: {e:#}");
                self.show_status(CLIPBOARD_MESSAGE, StatusKind::Bad, now);
            }
        }
    }

    fn tracks_selection(&self) -> bool {
        self.variant == Variant::Selection && self.phase() == Phase::Running
    }

    pub fn mouse_down(&mut self, col: u16, row: u16) {
        if !self.tracks_selection() {
            return;
        }
        self.selection = Some(Selection::begin(
            &self.layout,
            &self.session.target_text,
            col,
            row,
        ));
        self.selecting = true;
    }

    pub fn mouse_drag(&mut self, col: u16, row: u16) {
        if !self.selecting {
            return;
        }
        if let Some(sel) = self.selection.as_mut() {
            sel.extend(&self.layout, &self.session.target_text, col, row);
        }
    }

    pub fn mouse_up(&mut self, col: u16, row: u16, now: Instant) {
        if !self.selecting {
            return;
        }
        self.mouse_drag(col, row);
        self.selecting = false;
        self.check_selection(now);
    }

    pub fn select_all(&mut self, now: Instant) {
        if !self.tracks_selection() {
            return;
        }
        self.selection = Some(Selection::whole_screen());
        self.selecting = false;
        self.check_selection(now);
    }

    /// Validate the live selection; an empty or out-of-box one clears the tint
    fn check_selection(&mut self, now: Instant) {
        if self.phase() != Phase::Running {
            return;
        }
        let selected = self
            .selection
            .map(|s| s.text(&self.session.target_text))
            .unwrap_or_default();

        match validate::check(&self.session.target_text, &selected) {
            Some(outcome) => self.score(outcome, now),
            None => self.verdict = None,
        }
    }

    /// Fire due deferred actions and advance the animation
    pub fn tick(&mut self, now: Instant) {
        for action in self.timers.take_due(now) {
            match action {
                Deferred::NewRound => {
                    if self.phase() == Phase::Running {
                        self.new_round();
                    }
                }
                Deferred::ClearInput => self.input.clear(),
                Deferred::RevertStatus => {
                    if self.status.visible {
                        self.status = StatusLine::prompt(self.variant);
                    }
                }
                Deferred::ReleaseKeys => self.keys.clear(),
            }
        }
        self.celebration.update(now);
    }

    pub fn handle_event(&mut self, event: DrillEvent, now: Instant) -> Control {
        let control = match event {
            DrillEvent::Key(key) => self.handle_key(key, now),
            DrillEvent::Paste(text) => {
                self.paste(&text, now);
                Control::Continue
            }
            DrillEvent::Mouse(mouse) => {
                self.handle_mouse(mouse, now);
                Control::Continue
            }
            DrillEvent::FocusLost => {
                self.keys.clear();
                Control::Continue
            }
            DrillEvent::Resize | DrillEvent::Tick => Control::Continue,
        };
        // a steady stream of input must not hold back due timers
        self.tick(now);
        control
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Control {
        if key.kind == KeyEventKind::Release {
            if let Some(cap) = keys::cap_for_code(self.variant, key.code) {
                self.keys.release(cap);
            }
            return Control::Continue;
        }

        let caps = keys::caps_for(self.variant, &key);
        for cap in &caps {
            self.keys.press(*cap);
        }
        if !caps.is_empty() && !self.settings.key_release_events {
            self.timers
                .replace(now, self.settings.key_release_delay, Deferred::ReleaseKeys);
        }
        if self.variant == Variant::Mac && key.modifiers.contains(KeyModifiers::SUPER) {
            self.last_action.used_cmd = true;
        }
        if matches!(key.code, KeyCode::Modifier(_)) {
            return Control::Continue;
        }

        let shortcut = keys::is_shortcut(&key);
        match key.code {
            KeyCode::Esc => return Control::Quit,
            KeyCode::Char('q') if shortcut => return Control::Quit,
            KeyCode::Char('r') if shortcut => {
                self.reset();
                return Control::Continue;
            }
            _ => {}
        }

        if self.modal_open {
            match key.code {
                KeyCode::Enter | KeyCode::Char('r') => self.restart(),
                KeyCode::Char('x') | KeyCode::Backspace => self.dismiss_modal(),
                _ => {}
            }
            return Control::Continue;
        }

        match self.phase() {
            Phase::Idle => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                    self.start();
                }
            }
            Phase::Running => self.running_key(key, shortcut, now),
            Phase::Complete => {}
        }
        Control::Continue
    }

    fn running_key(&mut self, key: KeyEvent, shortcut: bool, now: Instant) {
        if shortcut {
            if let KeyCode::Char(c) = key.code {
                match c.to_ascii_lowercase() {
                    'c' => self.copy_target(now),
                    'v' => self.paste_from_clipboard(now),
                    'a' => self.select_all(now),
                    _ => {}
                }
            }
            return;
        }

        if let Some(c) = keys::typed_char(&key) {
            self.type_char(c, now);
            return;
        }
        match key.code {
            KeyCode::Backspace => self.backspace(now),
            KeyCode::Enter => self.newline(now),
            _ => {}
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent, now: Instant) {
        let (col, row) = (mouse.column, mouse.row);
        if self.modal_open {
            // a click on the backdrop closes the modal
            let outside = !modal_area(self.viewport).contains(Position::new(col, row));
            if outside && matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
                self.dismiss_modal();
            }
            return;
        }

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.mouse_down(col, row),
            MouseEventKind::Drag(MouseButton::Left) => self.mouse_drag(col, row),
            MouseEventKind::Up(MouseButton::Left) => self.mouse_up(col, row, now),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use crate::session::TOTAL_ROUNDS;
    use assert_matches::assert_matches;

    fn game(variant: Variant) -> Game {
        Game::new(
            variant,
            Settings::default(),
            Box::new(MemoryClipboard::new()),
            Some(11),
        )
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    /// Paste the current target and let the next-round delay pass
    fn solve_paste_round(g: &mut Game, now: &mut Instant) {
        let target = g.session.target_text.clone();
        g.paste(&target, *now);
        *now += NEXT_ROUND_DELAY;
        g.tick(*now);
    }

    #[test]
    fn test_new_game_is_idle() {
        let g = game(Variant::Mac);
        assert_eq!(g.phase(), Phase::Idle);
        assert!(!g.status.visible);
        assert!(g.session.target_text.is_empty());
    }

    #[test]
    fn test_start_presents_fitting_target() {
        let mut g = game(Variant::Mac);
        g.handle_key(key(KeyCode::Enter), Instant::now());

        assert_eq!(g.phase(), Phase::Running);
        assert!(!g.session.target_text.is_empty());
        assert_eq!(g.status.text, "Copy and paste the text:");
        assert_eq!(g.status.kind, StatusKind::Neutral);

        let lines = crate::layout::wrap(&g.session.target_text, g.layout().text_inner.width);
        assert!(lines.len() as u16 <= g.layout().text_inner.height);
    }

    #[test]
    fn test_input_ignored_while_idle() {
        let mut g = game(Variant::Windows);
        let now = Instant::now();
        g.paste("anything", now);
        g.type_char('x', now);
        assert!(g.input.is_empty());
        assert_eq!(g.session.round, 0);
    }

    #[test]
    fn test_correct_paste_advances_after_delay() {
        let mut g = game(Variant::Mac);
        let now = Instant::now();
        g.start();
        let first = g.session.target_text.clone();

        g.paste(&format!("  {}  ", first.replace(' ', "   ")), now);
        assert_eq!(g.session.round, 1);
        assert_eq!(g.session.level(), 1);
        assert_eq!(g.verdict, Some(Outcome::Correct));
        assert_eq!(g.status.text, CORRECT_MESSAGE);
        assert!(g.last_action.pasted);
        assert!(g.is_pending(Deferred::NewRound));

        // still showing the solved text until the delay passes
        g.tick(now + Duration::from_millis(100));
        assert_eq!(g.session.target_text, first);

        g.tick(now + NEXT_ROUND_DELAY);
        assert!(g.input.is_empty());
        assert_eq!(g.verdict, None);
        assert_eq!(g.last_action, LastAction::default());
        assert!(!g.session.target_text.is_empty());
    }

    #[test]
    fn test_no_double_count_during_transition() {
        let mut g = game(Variant::Windows);
        let now = Instant::now();
        g.start();
        let target = g.session.target_text.clone();
        g.paste(&target, now);
        g.type_char(' ', now);
        g.backspace(now);
        assert_eq!(g.session.round, 1);
    }

    #[test]
    fn test_wrong_paste_clears_input_later() {
        let mut g = game(Variant::Windows);
        let now = Instant::now();
        g.start();

        g.paste("definitely not it", now);
        assert_eq!(g.verdict, Some(Outcome::Incorrect));
        assert_eq!(g.status.kind, StatusKind::Bad);
        assert_eq!(g.session.round, 0);
        assert_eq!(g.input, "definitely not it");

        g.tick(now + CLEAR_INPUT_DELAY);
        assert!(g.input.is_empty());

        g.tick(now + Duration::from_millis(2500));
        assert_eq!(g.status.text, Variant::Windows.prompt());
        assert_eq!(g.status.kind, StatusKind::Neutral);
    }

    #[test]
    fn test_status_message_replaces_pending_revert() {
        let mut g = game(Variant::Mac);
        let now = Instant::now();
        g.start();
        g.paste("nope", now);
        g.tick(now + Duration::from_millis(2000));
        g.paste("nope again", now + Duration::from_millis(2000));

        g.tick(now + Duration::from_millis(2600));
        assert_eq!(g.status.text, INCORRECT_MESSAGE);
        g.tick(now + Duration::from_millis(4500));
        assert_eq!(g.status.text, Variant::Mac.prompt());
    }

    #[test]
    fn test_full_session_completes_once() {
        let mut g = game(Variant::Mac);
        let mut now = Instant::now();
        g.start();

        for _ in 0..TOTAL_ROUNDS {
            assert!(!g.modal_open);
            solve_paste_round(&mut g, &mut now);
        }

        assert_eq!(g.phase(), Phase::Complete);
        assert!(g.modal_open);
        assert!(g.celebration.is_active());
        assert_eq!(g.session.round, TOTAL_ROUNDS);
        assert_eq!(g.session.level(), 4);

        // further input does nothing once complete
        let target = g.session.target_text.clone();
        g.paste(&target, now);
        assert_eq!(g.session.round, TOTAL_ROUNDS);
    }

    #[test]
    fn test_modal_restart_and_dismiss() {
        let mut g = game(Variant::Windows);
        let mut now = Instant::now();
        g.start();
        for _ in 0..TOTAL_ROUNDS {
            solve_paste_round(&mut g, &mut now);
        }
        assert!(g.modal_open);

        g.handle_key(key(KeyCode::Enter), now);
        assert!(!g.modal_open);
        assert_eq!(g.phase(), Phase::Running);
        assert_eq!(g.session.round, 0);

        for _ in 0..TOTAL_ROUNDS {
            solve_paste_round(&mut g, &mut now);
        }
        g.handle_key(key(KeyCode::Char('x')), now);
        assert!(!g.modal_open);
        assert_eq!(g.phase(), Phase::Idle);
    }

    #[test]
    fn test_reset_cancels_everything() {
        let mut g = game(Variant::Mac);
        let now = Instant::now();
        g.start();
        g.paste("wrong", now);
        g.handle_key(ctrl('r'), now);

        assert_eq!(g.phase(), Phase::Idle);
        assert_eq!(g.session.round, 0);
        assert!(g.session.target_text.is_empty());
        assert!(g.input.is_empty());
        assert!(!g.status.visible);
        assert!(!g.keys.any_pressed());
        assert!(!g.is_pending(Deferred::ClearInput));
        assert!(!g.is_pending(Deferred::RevertStatus));

        g.tick(now + Duration::from_secs(5));
        assert!(!g.status.visible);
    }

    #[test]
    fn test_copy_then_paste_through_clipboard() {
        let mut g = game(Variant::Windows);
        let now = Instant::now();
        g.start();

        g.handle_key(ctrl('c'), now);
        assert!(g.last_action.copied);
        assert!(g.keys.is_pressed(keys::KeyCap::C));

        g.handle_key(ctrl('v'), now);
        assert_eq!(g.session.round, 1);
        assert_eq!(g.verdict, Some(Outcome::Correct));
    }

    #[test]
    fn test_paste_from_empty_clipboard_reports() {
        let mut g = game(Variant::Mac);
        let now = Instant::now();
        g.start();
        g.handle_key(ctrl('v'), now);
        assert_eq!(g.status.kind, StatusKind::Bad);
        assert!(g.input.is_empty());
    }

    #[test]
    fn test_mac_tracks_cmd() {
        let mut g = game(Variant::Mac);
        let now = Instant::now();
        g.start();
        g.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::SUPER), now);
        assert!(g.last_action.used_cmd);
        assert!(g.last_action.copied);
        assert!(g.keys.is_pressed(keys::KeyCap::Modifier));
    }

    #[test]
    fn test_key_caps_decay_without_release_events() {
        let mut g = game(Variant::Windows);
        let now = Instant::now();
        g.handle_key(ctrl('v'), now);
        assert!(g.keys.is_pressed(keys::KeyCap::V));
        g.tick(now + Duration::from_millis(300));
        assert!(!g.keys.any_pressed());
    }

    #[test]
    fn test_key_release_event_releases_cap() {
        let mut g = game(Variant::Windows);
        let now = Instant::now();
        let mut press = ctrl('v');
        g.handle_key(press, now);
        press.kind = KeyEventKind::Release;
        g.handle_key(press, now);
        assert!(!g.keys.is_pressed(keys::KeyCap::V));
        assert!(g.keys.is_pressed(keys::KeyCap::Modifier));

        g.handle_event(DrillEvent::FocusLost, now);
        assert!(!g.keys.any_pressed());
    }

    #[test]
    fn test_shifted_keys_type_shifted_chars() {
        let mut g = game(Variant::Mac);
        let now = Instant::now();
        g.start();
        g.handle_key(KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT), now);
        g.handle_key(KeyEvent::new(KeyCode::Char('%'), KeyModifiers::SHIFT), now);
        g.handle_key(KeyEvent::new(KeyCode::Char('b'), KeyModifiers::SHIFT), now);
        assert_eq!(g.input, "A%B");
    }

    #[test]
    fn test_resize_keeps_text_and_fits_next_round() {
        let mut g = game(Variant::Windows);
        let mut now = Instant::now();
        g.start();
        let before = g.session.target_text.clone();

        g.set_viewport(Rect::new(0, 0, 40, 24));
        assert_eq!(g.session.target_text, before);

        solve_paste_round(&mut g, &mut now);
        assert_ne!(g.session.target_text, before);
        let inner = g.layout().text_inner;
        let lines = crate::layout::wrap(&g.session.target_text, inner.width);
        assert!(lines.len() as u16 <= inner.height);
    }

    #[test]
    fn test_mac_field_is_single_line() {
        let mut g = game(Variant::Mac);
        let now = Instant::now();
        g.start();
        g.handle_key(key(KeyCode::Enter), now);
        assert!(g.input.is_empty());
        g.paste("ab\ncd", now);
        assert_eq!(g.input, "ab cd");
    }

    #[test]
    fn test_windows_area_keeps_newlines() {
        let mut g = game(Variant::Windows);
        let now = Instant::now();
        g.start();
        g.paste("ab\r\ncd", now);
        assert_eq!(g.input, "ab\ncd");
    }

    #[test]
    fn test_esc_quits() {
        let mut g = game(Variant::Selection);
        assert_matches!(
            g.handle_key(key(KeyCode::Esc), Instant::now()),
            Control::Quit
        );
    }

    /// Drag from the first character to the last one and release
    fn drag_over_target(g: &mut Game, now: Instant) {
        let inner = g.layout().text_inner;
        let lines = crate::layout::wrap(&g.session.target_text, inner.width);
        let last_row = lines.len() as u16 - 1;
        let last_col = lines[last_row as usize].text.chars().count() as u16 - 1;

        g.mouse_down(inner.x, inner.y);
        g.mouse_drag(inner.x + 3, inner.y);
        g.mouse_up(inner.x + last_col, inner.y + last_row, now);
    }

    #[test]
    fn test_selection_correct_gives_new_text_immediately() {
        let mut g = game(Variant::Selection);
        let now = Instant::now();
        g.start();
        assert_eq!(g.status.text, "Select all the text inside the box:");
        let first = g.session.target_text.clone();

        drag_over_target(&mut g, now);
        assert_eq!(g.session.round, 1);
        assert_eq!(g.verdict, Some(Outcome::Correct));
        assert!(g.selection.is_none());
        assert_ne!(g.session.target_text, first);
        assert!(!g.is_pending(Deferred::NewRound));
    }

    #[test]
    fn test_selection_tint_carries_until_next_check() {
        let mut g = game(Variant::Selection);
        let now = Instant::now();
        g.start();
        drag_over_target(&mut g, now);
        assert_eq!(g.verdict, Some(Outcome::Correct));

        let inner = g.layout().text_inner;
        g.mouse_down(inner.x, inner.y);
        assert_eq!(g.verdict, Some(Outcome::Correct));
        g.mouse_up(inner.x + 1, inner.y, now);
        assert_eq!(g.verdict, Some(Outcome::Incorrect));

        g.mouse_down(0, 0);
        g.mouse_up(0, 0, now);
        assert_eq!(g.verdict, None);
    }

    #[test]
    fn test_selection_partial_is_incorrect() {
        let mut g = game(Variant::Selection);
        let now = Instant::now();
        g.start();
        let inner = g.layout().text_inner;
        g.mouse_down(inner.x, inner.y);
        g.mouse_up(inner.x + 2, inner.y, now);
        assert_eq!(g.verdict, Some(Outcome::Incorrect));
        assert_eq!(g.session.round, 0);
    }

    #[test]
    fn test_selection_outside_box_clears_verdict() {
        let mut g = game(Variant::Selection);
        let now = Instant::now();
        g.start();
        let inner = g.layout().text_inner;
        g.mouse_down(inner.x, inner.y);
        g.mouse_up(inner.x + 2, inner.y, now);
        assert_eq!(g.verdict, Some(Outcome::Incorrect));

        g.mouse_down(0, 0);
        g.mouse_up(inner.x + inner.width - 1, inner.y + inner.height - 1, now);
        assert_eq!(g.verdict, None);
        assert_eq!(g.session.round, 0);
    }

    #[test]
    fn test_select_all_spans_screen_and_is_rejected() {
        let mut g = game(Variant::Selection);
        let now = Instant::now();
        g.start();
        g.handle_key(ctrl('a'), now);
        assert_eq!(g.verdict, None);
        assert_eq!(g.session.round, 0);
    }

    #[test]
    fn test_selection_variant_ignores_paste() {
        let mut g = game(Variant::Selection);
        let now = Instant::now();
        g.start();
        let target = g.session.target_text.clone();
        g.paste(&target, now);
        assert!(g.input.is_empty());
        assert_eq!(g.session.round, 0);
    }

    #[test]
    fn test_selection_session_completes() {
        let mut g = game(Variant::Selection);
        let now = Instant::now();
        g.start();
        for _ in 0..TOTAL_ROUNDS {
            drag_over_target(&mut g, now);
        }
        assert!(g.modal_open);
        assert_eq!(g.session.round, TOTAL_ROUNDS);

        // clicking the backdrop closes the modal and ends the session
        g.handle_mouse(
            MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column: 0,
                row: 0,
                modifiers: KeyModifiers::NONE,
            },
            now,
        );
        assert_eq!(g.phase(), Phase::Idle);
    }

    #[test]
    fn test_fallback_in_tiny_box() {
        let mut g = game(Variant::Mac);
        g.set_viewport(Rect::new(0, 0, 14, 24));
        g.start();
        let lens: Vec<usize> = g.session.target_text.split(' ').map(str::len).collect();
        assert_eq!(lens, crate::generator::FALLBACK_TOKEN_LENS.to_vec());
    }
}
