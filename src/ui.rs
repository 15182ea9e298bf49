use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use keyrace::{settings::Mode, stats::Stats};

use crate::{App, AppState};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.state {
            AppState::Ready => render_ready(self, area, buf),
            AppState::Loading => render_notice("fetching text…", area, buf),
            AppState::Typing => render_typing(self, area, buf),
            AppState::Results => render_results(self, area, buf),
        }
    }
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim_bold() -> Style {
    bold().add_modifier(Modifier::DIM)
}

fn hint_style() -> Style {
    Style::default()
        .fg(Color::Gray)
        .add_modifier(Modifier::ITALIC)
}

fn centered_rows(area: Rect, rows: u16) -> Vec<Rect> {
    let pad = area.height.saturating_sub(rows) / 2;
    Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(pad),
            Constraint::Length(rows),
            Constraint::Min(0),
        ])
        .split(area)
        .to_vec()
}

fn render_notice(message: &str, area: Rect, buf: &mut Buffer) {
    let chunks = centered_rows(area, 1);
    Paragraph::new(Span::styled(message.to_string(), dim_bold()))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);
}

fn settings_summary(app: &App) -> String {
    let settings = &app.settings;
    match settings.mode {
        Mode::Time => format!(
            "time · {}s",
            settings.time_limit.unwrap_or_default().as_secs()
        ),
        Mode::Words => match settings.word_count {
            Some(count) => format!("words · {}", count.as_count()),
            None => "words".to_string(),
        },
        Mode::Custom => "custom".to_string(),
    }
}

fn render_ready(app: &App, area: Rect, buf: &mut Buffer) {
    let chunks = centered_rows(area, 3);
    let lines = vec![
        Line::from(Span::styled("keyrace", bold().fg(Color::Cyan))),
        Line::from(Span::styled(settings_summary(app), dim_bold())),
        Line::from(Span::styled("(enter) start / (esc) quit", hint_style())),
    ];
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(chunks[1], buf);
}

fn stats_line(stats: &Stats) -> String {
    format!(
        "{} wpm   {} cpm   {}% acc   {} err   {} streak",
        stats.wpm, stats.cpm, stats.accuracy, stats.errors, stats.streak
    )
}

fn render_typing(app: &App, area: Rect, buf: &mut Buffer) {
    let session = app.tracker.session();
    let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
    let prompt_width = session.text().width();

    let prompt_occupied_lines = if prompt_width <= max_chars_per_line as usize {
        1
    } else {
        ((prompt_width as f64 / max_chars_per_line as f64).ceil() + 1.0) as u16
    };

    let pad = area.height.saturating_sub(prompt_occupied_lines + 4) / 2;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(pad),
            Constraint::Length(2),
            Constraint::Length(prompt_occupied_lines),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

    let clock = if app.settings.mode == Mode::Time {
        format!("{}", app.tracker.remaining_seconds())
    } else {
        format!("{}s", app.tracker.elapsed().as_secs())
    };
    Paragraph::new(Span::styled(clock, dim_bold()))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    let mut spans = vec![Span::styled(session.typed(), bold().fg(Color::Green))];
    if let Some(expected) = session.expected_char() {
        spans.push(Span::styled(
            expected.to_string(),
            dim_bold().add_modifier(Modifier::UNDERLINED),
        ));
    }
    spans.push(Span::styled(session.upcoming(), dim_bold()));

    Paragraph::new(Line::from(spans))
        .alignment(if prompt_occupied_lines == 1 {
            // short prompts look best centered
            Alignment::Center
        } else {
            Alignment::Left
        })
        .wrap(Wrap { trim: true })
        .render(chunks[2], buf);

    Paragraph::new(Span::styled(
        stats_line(app.tracker.stats()),
        Style::default().fg(Color::Magenta),
    ))
    .alignment(Alignment::Center)
    .render(chunks[4], buf);
}

fn render_results(app: &App, area: Rect, buf: &mut Buffer) {
    let stats = app.tracker.stats();
    let session = app.tracker.session();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

    Paragraph::new(Span::styled(
        format!("{} wpm", stats.wpm),
        bold().fg(Color::Magenta),
    ))
    .alignment(Alignment::Center)
    .render(chunks[1], buf);

    Paragraph::new(Span::styled(
        format!(
            "{} raw   {} cpm   {}% acc   {} err   {} streak",
            stats.raw_wpm, stats.cpm, stats.accuracy, stats.errors, stats.streak
        ),
        bold(),
    ))
    .alignment(Alignment::Center)
    .render(chunks[2], buf);

    Paragraph::new(Span::styled(
        format!(
            "{}/{} chars in {}s · {}",
            session.cursor(),
            session.len(),
            app.tracker.elapsed().as_secs(),
            settings_summary(app)
        ),
        dim_bold(),
    ))
    .alignment(Alignment::Center)
    .render(chunks[3], buf);

    Paragraph::new(Span::styled(
        "(enter) new session / (esc) quit",
        hint_style(),
    ))
    .alignment(Alignment::Center)
    .render(chunks[5], buf);
}
