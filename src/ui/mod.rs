pub mod components;
pub mod dialog;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::AppState;
use crate::config::ParticipantRole;

pub fn render(f: &mut Frame, app: &mut AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(f.area());

    let role = match app.role {
        ParticipantRole::Moderator => "moderator",
        ParticipantRole::Participant => "participant",
    };
    let header = Paragraph::new(format!(
        "room: {}  role: {}  — i: invite people; q: quit",
        app.room_url, role
    ))
    .block(
        Block::default()
            .title("invite-tui")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    )
    .style(
        Style::default()
            .fg(app.theme.header_fg)
            .bg(app.theme.header_bg),
    );
    f.render_widget(header, root[0]);

    let body = Paragraph::new(vec![
        Line::raw(""),
        Line::from(Span::styled(
            "  Press i to invite people to this call.",
            Style::default().fg(app.theme.text),
        )),
        Line::raw(""),
        Line::from(Span::styled(
            format!("  backend: {}", app.server_url),
            Style::default()
                .fg(app.theme.muted)
                .add_modifier(Modifier::ITALIC),
        )),
    ]);
    f.render_widget(body, root[1]);

    components::render_status_bar(f, root[2], app);

    if app.dialog.is_some() {
        dialog::render_invite_dialog(f, f.area(), app);
    }
    if let Some(message) = app.alert.clone() {
        components::render_alert_modal(f, f.area(), &app.theme, &message);
    }
    if let Some(notice) = app.notification.clone() {
        components::render_notification(f, f.area(), &app.theme, &notice);
    }
}
