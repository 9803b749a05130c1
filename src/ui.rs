pub mod modal;
pub mod screen;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, LineGauge, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    game::{Game, StatusKind},
    keys::KeyCap,
    layout::wrap,
    session::{Phase, TOTAL_ROUNDS},
    validate::Outcome,
    variant::{CaptureMode, Variant},
};

impl Widget for &Game {
    fn render(self, area: Rect, buf: &mut Buffer) {
        screen::current_screen(self).render(self, area, buf);
    }
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

pub(crate) fn render_header(game: &Game, area: Rect, buf: &mut Buffer) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    Paragraph::new(Span::styled(game.variant.title(), bold().fg(Color::Cyan)))
        .alignment(Alignment::Center)
        .render(rows[0], buf);

    let session = &game.session;
    Paragraph::new(Line::from(vec![
        Span::styled("progress ", dim()),
        Span::styled(format!("{}/{}", session.round, TOTAL_ROUNDS), bold()),
        Span::styled("   level ", dim()),
        Span::styled(session.level().to_string(), bold()),
    ]))
    .alignment(Alignment::Center)
    .render(rows[1], buf);

    LineGauge::default()
        .filled_style(Style::default().fg(Color::Green))
        .unfilled_style(dim())
        .ratio(session.progress())
        .label("")
        .render(rows[2], buf);
}

pub(crate) fn render_status(game: &Game, area: Rect, buf: &mut Buffer) {
    if !game.status.visible {
        return;
    }
    let style = match game.status.kind {
        StatusKind::Neutral => bold(),
        StatusKind::Ok => bold().fg(Color::Green),
        StatusKind::Bad => bold().fg(Color::Red),
    };
    Paragraph::new(Span::styled(game.status.text.as_str(), style))
        .alignment(Alignment::Center)
        .render(area, buf);
}

pub(crate) fn render_target(game: &Game, buf: &mut Buffer) {
    let layout = game.layout();
    let border = match game.verdict {
        Some(Outcome::Correct) => Style::default().fg(Color::Green),
        Some(Outcome::Incorrect) => Style::default().fg(Color::Red),
        None => dim(),
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(" text ")
        .render(layout.text_box, buf);

    let target = &game.session.target_text;
    let selected = game
        .selection
        .and_then(|s| s.range(target.chars().count()));
    let plain = bold();
    let highlighted = bold().add_modifier(Modifier::REVERSED);

    let lines: Vec<Line> = wrap(target, layout.text_inner.width)
        .into_iter()
        .map(|line| match &selected {
            Some(range) => {
                // split the row into runs of selected / unselected chars
                let mut spans: Vec<Span> = Vec::new();
                let mut run = String::new();
                let mut run_selected = false;
                for (offset, c) in line.text.chars().enumerate() {
                    let is_selected = range.contains(&(line.start + offset));
                    if is_selected != run_selected && !run.is_empty() {
                        let style = if run_selected { highlighted } else { plain };
                        spans.push(Span::styled(std::mem::take(&mut run), style));
                    }
                    run_selected = is_selected;
                    run.push(c);
                }
                if !run.is_empty() {
                    let style = if run_selected { highlighted } else { plain };
                    spans.push(Span::styled(run, style));
                }
                Line::from(spans)
            }
            None => Line::from(Span::styled(line.text, plain)),
        })
        .collect();

    Paragraph::new(lines).render(layout.text_inner, buf);
}

pub(crate) fn render_input(game: &Game, buf: &mut Buffer) {
    let area = game.layout().input;
    let title = match game.variant.capture_mode() {
        CaptureMode::Field => " paste here ",
        CaptureMode::Area => " paste area ",
        CaptureMode::Selection => return,
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(dim())
        .title(title);
    let inner = block.inner(area);
    block.render(area, buf);

    let caret = Span::styled("▏", Style::default().fg(Color::Yellow));
    let width = inner.width.saturating_sub(1) as usize;

    // show the tail of what was entered
    let mut rows: Vec<Line> = game
        .input
        .split('\n')
        .map(|row| Line::from(tail(row, width).to_string()))
        .collect();
    let keep = inner.height.max(1) as usize;
    if rows.len() > keep {
        rows.drain(..rows.len() - keep);
    }
    if let Some(last) = rows.last_mut() {
        last.spans.push(caret);
    }

    Paragraph::new(rows).render(inner, buf);
}

/// Longest suffix of `s` no wider than `width` columns
fn tail(s: &str, width: usize) -> &str {
    if s.width() <= width {
        return s;
    }
    let mut start = s.len();
    let mut used = 0;
    for (idx, c) in s.char_indices().rev() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        start = idx;
    }
    &s[start..]
}

pub(crate) fn render_keys(game: &Game, buf: &mut Buffer) {
    let area = game.layout().keys;
    if area.height == 0 {
        return;
    }
    let caps = [
        (KeyCap::Modifier, game.variant.modifier_label()),
        (KeyCap::C, "C"),
        (KeyCap::V, "V"),
    ];

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(8),
            Constraint::Length(1),
            Constraint::Length(5),
            Constraint::Length(1),
            Constraint::Length(5),
            Constraint::Fill(1),
        ])
        .split(area);

    for (i, (cap, label)) in caps.iter().enumerate() {
        let pressed = game.keys.is_pressed(*cap);
        let style = if pressed {
            bold().fg(Color::Black).bg(Color::Green)
        } else {
            dim()
        };
        Paragraph::new(Span::styled(*label, style))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).border_style(style))
            .render(cols[1 + i * 2], buf);
    }
}

pub(crate) fn render_footer(game: &Game, area: Rect, buf: &mut Buffer) {
    let legend = match (game.phase(), game.variant) {
        (Phase::Idle, _) => "(enter) start / (esc)ape".to_string(),
        (_, Variant::Selection) => "drag over the text / (ctrl+r) reset / (esc)ape".to_string(),
        (_, variant) => {
            let m = if variant == Variant::Mac { "⌘" } else { "ctrl" };
            format!("({m}+c) copy / ({m}+v) paste / (ctrl+r) reset / (esc)ape")
        }
    };

    let mut spans = vec![Span::styled(
        legend,
        Style::default().add_modifier(Modifier::ITALIC),
    )];

    if game.variant == Variant::Mac && game.phase() == Phase::Running {
        let a = game.last_action;
        let mark = |on: bool| if on { "✓" } else { "·" };
        spans.push(Span::styled(
            format!(
                "   copied {} pasted {} ⌘ {}",
                mark(a.copied),
                mark(a.pasted),
                mark(a.used_cmd)
            ),
            dim(),
        ));
    }

    Paragraph::new(Line::from(spans)).render(area, buf);
}
