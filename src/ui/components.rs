//! Shared UI components (status bar, alert modal, toast).

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::{AppState, DialogInput, Notice, SubmitPhase, Theme};

/// Render the bottom status bar with mode and counts.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = if app.alert.is_some() {
        "ALERT"
    } else {
        match &app.dialog {
            Some(d) if d.submit == SubmitPhase::Sending => "SENDING",
            Some(d) if d.input == DialogInput::EditSearch => "SEARCH",
            Some(_) => "DIALOG",
            None => "NORMAL",
        }
    };
    let counts = match &app.dialog {
        Some(d) => format!(
            "  visible:{}  checked:{}  groups:{}",
            d.rows.len(),
            d.checked_count(),
            d.groups.len()
        ),
        None => String::new(),
    };
    let msg = format!("mode: {mode}{counts}  backend: {}", app.server_url);
    let p = Paragraph::new(msg).style(
        Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    );
    f.render_widget(p, area);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Blocking alert modal; dismissed with Esc or Enter. Used by the moderator
/// gate before the invite dialog would open.
pub fn render_alert_modal(f: &mut Frame, area: Rect, theme: &Theme, message: &str) {
    let width = 46u16.min(area.width.saturating_sub(4)).max(30);
    let rect = centered_rect(width, 6, area);
    let p = Paragraph::new(format!("{message}\n\nPress Esc to dismiss."))
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(theme.text))
        .block(
            Block::default()
                .title("Notice")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.error)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

/// Bottom-right toast for submit success; expiry is handled by the loop tick.
pub fn render_notification(f: &mut Frame, area: Rect, theme: &Theme, notice: &Notice) {
    let width = (notice.message.len() as u16 + 6).min(area.width);
    let rect = Rect {
        x: area.x + area.width.saturating_sub(width + 1),
        y: area.y + area.height.saturating_sub(4),
        width,
        height: 3,
    };
    let p = Paragraph::new(format!("✔ {}", notice.message))
        .style(
            Style::default()
                .fg(theme.success)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.success)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
