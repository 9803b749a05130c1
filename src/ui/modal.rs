use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};

use crate::{game::Game, layout::modal_area};

const PALETTE: [Color; 6] = [
    Color::Yellow,
    Color::Green,
    Color::Cyan,
    Color::Magenta,
    Color::LightRed,
    Color::LightBlue,
];

/// Win overlay: the headline (spelled out by the celebration while it runs),
/// the subline, and what to press next
pub fn render_modal(game: &Game, area: Rect, buf: &mut Buffer) {
    let modal = modal_area(area);
    if modal.width < 4 || modal.height < 4 {
        return;
    }
    let (headline, subline) = game.variant.victory();

    Clear.render(modal, buf);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Green));
    let inner = block.inner(modal);
    block.render(modal, buf);

    // the celebration lays its letters out relative to the whole modal
    let mid = modal.y + modal.height / 2;
    let headline_row = Rect::new(inner.x, mid.saturating_sub(1).max(inner.y), inner.width, 1);

    if game.celebration.is_active() {
        for p in &game.celebration.particles {
            if p.x < 0.0 || p.y < 0.0 {
                continue;
            }
            let pos = Position::new(
                modal.x.saturating_add(p.x.round() as u16),
                modal.y.saturating_add(p.y.round() as u16),
            );
            if !inner.contains(pos) {
                continue;
            }
            if let Some(cell) = buf.cell_mut(pos) {
                cell.set_char(p.symbol).set_style(
                    Style::default()
                        .fg(PALETTE[p.color_index % PALETTE.len()])
                        .add_modifier(Modifier::BOLD),
                );
            }
        }
    } else {
        Paragraph::new(Span::styled(
            headline,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .render(headline_row, buf);
    }

    let below = |offset: u16| {
        let y = headline_row.y + offset;
        (y < inner.bottom()).then(|| Rect::new(inner.x, y, inner.width, 1))
    };

    if let Some(row) = below(2) {
        Paragraph::new(subline)
            .alignment(Alignment::Center)
            .render(row, buf);
    }

    let hints = Line::from(vec![
        Span::styled("(enter)", Style::default().fg(Color::Yellow)),
        Span::raw(" restart / "),
        Span::styled("(x)", Style::default().fg(Color::Yellow)),
        Span::raw(" close"),
    ]);
    let hint_row = Rect::new(inner.x, inner.bottom().saturating_sub(1), inner.width, 1);
    Paragraph::new(hints)
        .alignment(Alignment::Center)
        .render(hint_row, buf);
}
