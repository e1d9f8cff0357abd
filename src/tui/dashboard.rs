use super::layout;
use super::state::App;
use super::theme;
use crate::maintenance::Operation;
use chrono::Utc;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const WEBSITE: &str = "https://cuerdos.github.io";

pub fn render_dashboard(f: &mut Frame, app: &App) {
    let chunks = layout::main_layout(f.area());

    layout::render_header(
        f,
        &app.tr("System Management"),
        Style::default().fg(theme::ACCENT),
        chunks[0],
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::BORDER));
    let inner = block.inner(chunks[1]);
    f.render_widget(block, chunks[1]);

    let mut lines: Vec<Line> = Vec::new();
    for (i, op) in Operation::ALL.iter().enumerate() {
        lines.push(menu_line(app, i, *op));
        lines.push(Line::from(""));
    }

    let content_height = lines.len() as u16;
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(content_height),
            Constraint::Min(0),
        ])
        .split(inner);
    f.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        vertical[1],
    );

    let footer = format!(
        "{} | {}",
        status_bar_text(app),
        app.tr("↑↓ select · Enter run · 1-7 shortcut · L language · A about · q quit")
    );
    layout::render_footer(f, &footer, chunks[2]);

    if app.show_about {
        layout::render_popup(f, &app.tr("About"), &about_text(app), 60, 12);
    }
    if let Some(notice) = &app.notice {
        layout::render_popup(f, &notice.title, &notice.body, 50, 5);
    }
}

/// Menu row: "  N  Label", highlighted when selected.
fn menu_line(app: &App, index: usize, op: Operation) -> Line<'static> {
    let selected = index == app.selected;
    let label_style = if selected {
        Style::default()
            .bg(theme::SEL_BG)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let marker = if selected { "▶" } else { " " };
    let mut spans = vec![
        Span::styled(
            format!("{} {}  ", marker, index + 1),
            Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("{:<28}", app.tr(op.label())), label_style),
    ];
    if op.is_elevated() {
        spans.push(Span::styled(
            format!(" [{}]", app.config.elevation.program()),
            Style::default().fg(theme::DIM),
        ));
    }
    Line::from(spans)
}

/// "User: alice | UTC: 2025-01-01 12:00:00 | v0.1.0"
fn status_bar_text(app: &App) -> String {
    let user = std::env::var("USER").unwrap_or_else(|_| "unknown".to_string());
    format!(
        "{}: {} | UTC: {} | v{}",
        app.tr("User"),
        user,
        Utc::now().format("%Y-%m-%d %H:%M:%S"),
        env!("CARGO_PKG_VERSION")
    )
}

fn about_text(app: &App) -> String {
    format!(
        "CuerdToken v{}\n\n{}\n\n{}: {}\n\n{}: {}",
        env!("CARGO_PKG_VERSION"),
        app.tr("A simple system management tool for Linux systems."),
        app.tr("Project Website"),
        WEBSITE,
        app.tr("Language"),
        app.translations.language().native_name(),
    )
}
