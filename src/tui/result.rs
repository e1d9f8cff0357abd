use super::layout;
use super::state::App;
use super::theme;
use crate::i18n::Translator;
use crate::maintenance::{CommandResult, Details};
use ratatui::{style::Style, Frame};

/// Label key for a [`Details::counts`] entry.
fn count_label(key: &str) -> &str {
    match key {
        "upgraded" => "Packages updated",
        "newly_installed" => "Newly installed",
        "to_remove" => "To remove",
        "updated" | "flatpak_updated" => "Flatpak apps updated",
        "removed" => "Packages removed",
        other => other,
    }
}

/// Dialog title and body for a finished operation.
pub fn present_result(result: &CommandResult, tr: &dyn Translator) -> (String, String) {
    if !result.success {
        return (tr.translate("Operation Failed"), tr.translate(&result.message));
    }

    let title = tr.translate("Operation Successful");
    if let Details::Status { status } = &result.details {
        return (title, status.clone());
    }

    let mut body = tr.translate(&result.message);
    let counts = result.details.counts();
    if !counts.is_empty() {
        let lines: Vec<String> = counts
            .into_iter()
            .map(|(key, value)| format!("{}: {}", tr.translate(count_label(key)), value))
            .collect();
        body.push_str("\n\n");
        body.push_str(&lines.join("\n"));
    }
    (title, body)
}

/// Number of body lines for `app`'s current result, used to clamp scrolling.
pub fn body_line_count(app: &App) -> usize {
    app.result
        .as_ref()
        .map(|r| present_result(&r.result, &app.translations).1.lines().count())
        .unwrap_or(0)
}

pub fn render_result(f: &mut Frame, app: &App) {
    let Some(state) = &app.result else {
        return;
    };
    let chunks = layout::main_layout(f.area());
    let (title, body) = present_result(&state.result, &app.translations);

    let color = if state.result.success {
        theme::SUCCESS
    } else {
        theme::FAILURE
    };
    let header = format!("{} · {}", app.tr(state.operation.label()), title);
    layout::render_header(f, &header, Style::default().fg(color), chunks[0]);

    let lines: Vec<String> = body.lines().map(|s| s.to_string()).collect();
    layout::render_scrollable_content(f, &title, &lines, state.scroll, chunks[1]);

    layout::render_footer(f, &app.tr("Enter/Esc back · ↑↓ scroll"), chunks[2]);
}
