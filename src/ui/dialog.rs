//! Rendering of the invite dialog.
//!
//! Structural regions match the workflow: header (dialog title + close hint),
//! content (group selector, search box, user list with select-all), footer
//! (send button + transient error). The list region is rebuilt by the state
//! layer on every filter change; here it is only painted.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::app::{AppState, DialogInput, DialogPhase, InviteDialog, SubmitPhase, Theme};

const SPINNER_FRAMES: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];

pub fn render_invite_dialog(f: &mut Frame, area: Rect, app: &mut AppState) {
    let Some(dialog) = &app.dialog else {
        return;
    };
    let theme = app.theme;

    let width = area.width.saturating_sub(10).clamp(44, 64);
    let height = area.height.saturating_sub(4).clamp(12, 24);
    let rect = crate::ui::components::centered_rect(width, height, area);

    let block = Block::default()
        .title("Invite People")
        .title_bottom(Line::from(" Esc: close ").right_aligned())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border));
    let inner = block.inner(rect);
    f.render_widget(Clear, rect);
    f.render_widget(block, rect);

    match &dialog.phase {
        DialogPhase::Loading => render_loading(f, inner, &theme),
        DialogPhase::LoadFailed(message) => render_load_error(f, inner, &theme, message),
        DialogPhase::Ready => render_content(f, inner, &theme, dialog),
    }
}

fn render_loading(f: &mut Frame, area: Rect, theme: &Theme) {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let frame = SPINNER_FRAMES[(millis / 120) as usize % SPINNER_FRAMES.len()];
    let rect = crate::ui::components::centered_rect(area.width, 2, area);
    let p = Paragraph::new(format!("{frame} Loading users and groups..."))
        .style(Style::default().fg(theme.muted))
        .centered();
    f.render_widget(p, rect);
}

fn render_load_error(f: &mut Frame, area: Rect, theme: &Theme, message: &str) {
    let rect = crate::ui::components::centered_rect(area.width.saturating_sub(4), 3, area);
    let p = Paragraph::new(message.to_string())
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(theme.error))
        .centered();
    f.render_widget(p, rect);
}

fn render_content(f: &mut Frame, area: Rect, theme: &Theme, dialog: &InviteDialog) {
    let regions = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(1), // group selector
                Constraint::Length(1), // search box
                Constraint::Length(1), // list header
                Constraint::Min(3),    // user list
                Constraint::Length(2), // footer
            ]
            .as_ref(),
        )
        .split(area);

    render_group_selector(f, regions[0], theme, dialog);
    render_search_box(f, regions[1], theme, dialog);
    render_list_header(f, regions[2], theme, dialog);
    render_user_list(f, regions[3], theme, dialog);
    render_footer(f, regions[4], theme, dialog);
}

fn render_group_selector(f: &mut Frame, area: Rect, theme: &Theme, dialog: &InviteDialog) {
    let line = Line::from(vec![
        Span::styled(
            "Filter by Group: ",
            Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("◂ {} ▸", dialog.filter.group.label()),
            Style::default().fg(theme.highlight_fg),
        ),
        Span::styled(
            format!("  ({} groups, ←/→ to change)", dialog.groups.len()),
            Style::default().fg(theme.muted),
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn render_search_box(f: &mut Frame, area: Rect, theme: &Theme, dialog: &InviteDialog) {
    let editing = dialog.input == DialogInput::EditSearch;
    let term = if dialog.filter.search.is_empty() && !editing {
        Span::styled("Search users... (/)", Style::default().fg(theme.muted))
    } else {
        Span::styled(dialog.filter.search.clone(), Style::default().fg(theme.text))
    };
    let mut spans = vec![
        Span::styled(
            "Search: ",
            Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
        ),
        term,
    ];
    if editing {
        spans.push(Span::styled("█", Style::default().fg(theme.highlight_fg)));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_list_header(f: &mut Frame, area: Rect, theme: &Theme, dialog: &InviteDialog) {
    let checked = dialog.checked_count();
    let line = Line::from(vec![
        Span::styled(
            "Select Users to Invite",
            Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {checked}/{} checked  [a] select all", dialog.rows.len()),
            Style::default().fg(theme.muted),
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn render_user_list(f: &mut Frame, area: Rect, theme: &Theme, dialog: &InviteDialog) {
    if dialog.rows.is_empty() {
        let p = Paragraph::new("No users found. Try another search or group.")
            .style(
                Style::default()
                    .fg(theme.muted)
                    .add_modifier(Modifier::ITALIC),
            )
            .centered();
        f.render_widget(p, area);
        return;
    }

    let rows_per_page = (area.height as usize).max(1);
    let start = (dialog.cursor / rows_per_page) * rows_per_page;
    let end = (start + rows_per_page).min(dialog.rows.len());
    let slice = &dialog.rows[start..end];

    let mut lines: Vec<Line> = Vec::with_capacity(slice.len());
    for (i, row) in slice.iter().enumerate() {
        let absolute_index = start + i;
        let marker = if absolute_index == dialog.cursor {
            "▶ "
        } else {
            "  "
        };
        let checkbox = if row.checked { "[x] " } else { "[ ] " };
        let style = if absolute_index == dialog.cursor {
            Style::default()
                .fg(theme.highlight_fg)
                .bg(theme.highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text)
        };
        lines.push(Line::from(Span::styled(
            format!("{marker}{checkbox}{}", row.user.label()),
            style,
        )));
    }
    f.render_widget(Paragraph::new(lines), area);
}

fn render_footer(f: &mut Frame, area: Rect, theme: &Theme, dialog: &InviteDialog) {
    let regions = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)].as_ref())
        .split(area);

    if let Some(notice) = &dialog.footer_error {
        let p = Paragraph::new(notice.message.clone())
            .style(Style::default().fg(theme.error))
            .centered();
        f.render_widget(p, regions[0]);
    }

    let (label, style) = match dialog.submit {
        SubmitPhase::Sending => (
            "Sending...",
            Style::default().fg(theme.muted).add_modifier(Modifier::DIM),
        ),
        SubmitPhase::Idle if dialog.can_send() => (
            "[ Send Invites ]  (Enter)",
            Style::default()
                .fg(theme.success)
                .add_modifier(Modifier::BOLD),
        ),
        SubmitPhase::Idle => (
            "[ Send Invites ]",
            Style::default().fg(theme.muted).add_modifier(Modifier::DIM),
        ),
    };
    let p = Paragraph::new(label).style(style).right_aligned();
    f.render_widget(p, regions[1]);
}
