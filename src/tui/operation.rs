use super::layout;
use super::state::App;
use super::theme;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

/// Keys while an operation runs or its result is shown.
/// Returns true when the key was consumed.
pub fn handle_operation_key(key: KeyEvent, app: &mut App, term_height: u16) -> bool {
    let visible = layout::visible_content_height(term_height);
    match key.code {
        KeyCode::Up => {
            app.scroll_up(1);
            true
        }
        KeyCode::Down => {
            app.scroll_down(1, visible);
            true
        }
        KeyCode::PageUp => {
            app.scroll_up(10);
            true
        }
        KeyCode::PageDown => {
            app.scroll_down(10, visible);
            true
        }
        _ => false,
    }
}

pub fn render_running(f: &mut Frame, app: &App) {
    let Some(run) = &app.run else {
        return;
    };
    let chunks = layout::main_layout(f.area());

    layout::render_header(
        f,
        &app.tr(run.operation.label()),
        Style::default().fg(theme::ACCENT),
        chunks[0],
    );

    let body = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(1), Constraint::Min(0)])
        .split(chunks[1]);

    render_gauge(f, app, run.fraction, body[0]);

    let status = if run.cancelling {
        app.tr("Cancelling...")
    } else {
        app.tr(&run.message)
    };
    let status_line = Paragraph::new(Line::from(vec![Span::styled(
        format!(" {}", status),
        Style::default().add_modifier(Modifier::BOLD),
    )]));
    f.render_widget(status_line, body[1]);

    layout::render_scrollable_content(f, &app.tr("Output"), &run.lines, run.scroll, body[2]);

    layout::render_footer(f, &app.tr("Esc cancel · ↑↓ scroll"), chunks[2]);
}

fn render_gauge(f: &mut Frame, app: &App, fraction: f64, area: Rect) {
    let ratio = fraction.clamp(0.0, 1.0);
    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(format!(" {} ", app.tr("Progress")))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme::BORDER)),
        )
        .gauge_style(Style::default().fg(theme::ACCENT))
        .ratio(ratio)
        .label(format!("{:.0}%", ratio * 100.0));
    f.render_widget(gauge, area);
}
