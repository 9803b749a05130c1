use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use super::{
    modal::render_modal, render_footer, render_header, render_input, render_keys,
    render_status, render_target,
};
use crate::{game::Game, session::Phase};

/// A UI screen boundary, picked from the game state on every frame
pub trait Screen {
    fn render(&self, game: &Game, area: Rect, buf: &mut Buffer);
}

/// Before the first round: title and how to begin
pub struct IdleScreen;

impl Screen for IdleScreen {
    fn render(&self, game: &Game, _area: Rect, buf: &mut Buffer) {
        let layout = game.layout();
        render_header(game, layout.header, buf);

        let hint = Line::from(vec![
            Span::raw("press "),
            Span::styled(
                "enter",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" to start"),
        ]);
        Paragraph::new(vec![Line::from(""), hint])
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(layout.text_box, buf);

        render_footer(game, layout.footer, buf);
    }
}

/// A round in progress
pub struct RunningScreen;

impl Screen for RunningScreen {
    fn render(&self, game: &Game, _area: Rect, buf: &mut Buffer) {
        let layout = game.layout();
        render_header(game, layout.header, buf);
        render_status(game, layout.status, buf);
        render_target(game, buf);
        render_input(game, buf);
        render_keys(game, buf);
        render_footer(game, layout.footer, buf);
    }
}

/// The last round drawn underneath the win modal
pub struct CompleteScreen;

impl Screen for CompleteScreen {
    fn render(&self, game: &Game, area: Rect, buf: &mut Buffer) {
        RunningScreen.render(game, area, buf);
        render_modal(game, area, buf);
    }
}

pub fn current_screen(game: &Game) -> Box<dyn Screen> {
    if game.modal_open {
        return Box::new(CompleteScreen);
    }
    match game.phase() {
        Phase::Idle => Box::new(IdleScreen),
        Phase::Running | Phase::Complete => Box::new(RunningScreen),
    }
}
