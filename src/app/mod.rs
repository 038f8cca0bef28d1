//! Application state types and entry glue.
//!
//! Models the host screen, the single invite dialog instance, and the
//! transient notices the UI shows. The event loop lives in [`update`] and is
//! re-exported as `run`.

pub mod update;

use ratatui::style::Color;
use std::time::{Duration, Instant};

use crate::api::{Directory, InviteGroup, InviteRequest, InviteUser};
use crate::config::{Config, ParticipantRole};
use crate::error::InviteError;
use crate::filter::{FilterState, GroupChoice, visible_users};

/// How long success notifications and footer errors stay on screen.
pub const NOTICE_TTL: Duration = Duration::from_secs(5);

/// A transient message with an expiry deadline, ticked by the event loop.
#[derive(Clone, Debug)]
pub struct Notice {
    pub message: String,
    pub expires_at: Instant,
}

impl Notice {
    pub fn timed(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            expires_at: Instant::now() + NOTICE_TTL,
        }
    }

    pub fn expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Lifecycle of the dialog content area.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DialogPhase {
    /// Directory fetch in flight; spinner shown.
    Loading,
    /// Fetch failed; the message replaces the content. No retry, the user
    /// must close and reopen the dialog.
    LoadFailed(String),
    Ready,
}

/// Submit action state machine: Idle -> Sending -> Idle (failure) | closed
/// dialog (success). There is no cancel.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SubmitPhase {
    Idle,
    Sending,
}

/// Key routing inside the dialog.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DialogInput {
    Browse,
    EditSearch,
}

/// One visible list entry. Checkbox state lives here and nowhere else, so
/// rebuilding the rows discards the selection.
#[derive(Clone, Debug)]
pub struct UserRow {
    pub user: InviteUser,
    pub checked: bool,
}

/// The invite dialog. At most one instance exists at a time; the cached
/// directory snapshot is dropped with it.
pub struct InviteDialog {
    /// Identifies this open instance so results from background requests can
    /// be matched against the dialog they were started for.
    pub epoch: u64,
    pub phase: DialogPhase,
    pub users_all: Vec<InviteUser>,
    pub groups: Vec<InviteGroup>,
    pub filter: FilterState,
    pub rows: Vec<UserRow>,
    pub cursor: usize,
    pub input: DialogInput,
    pub submit: SubmitPhase,
    pub footer_error: Option<Notice>,
}

impl InviteDialog {
    pub fn loading(epoch: u64) -> Self {
        Self {
            epoch,
            phase: DialogPhase::Loading,
            users_all: Vec::new(),
            groups: Vec::new(),
            filter: FilterState::default(),
            rows: Vec::new(),
            cursor: 0,
            input: DialogInput::Browse,
            submit: SubmitPhase::Idle,
            footer_error: None,
        }
    }

    /// Install the fetched directory and build the initial (unfiltered) list.
    pub fn populate(&mut self, directory: Directory) {
        self.users_all = directory.users;
        self.groups = directory.groups;
        self.phase = DialogPhase::Ready;
        self.rebuild_rows();
    }

    pub fn fail_load(&mut self, message: String) {
        self.phase = DialogPhase::LoadFailed(message);
    }

    /// Recompute the visible rows from the current filter state.
    ///
    /// All checkboxes come back unchecked: selection is intentionally not
    /// carried across filter changes (preserved from the original workflow,
    /// see DESIGN.md).
    pub fn rebuild_rows(&mut self) {
        self.rows = visible_users(&self.filter, &self.users_all, &self.groups)
            .into_iter()
            .map(|user| UserRow {
                user,
                checked: false,
            })
            .collect();
        self.cursor = 0;
    }

    /// Step the group selector through All Users plus each fetched group.
    /// Changing the group always clears the search term.
    pub fn cycle_group(&mut self, step: i64) {
        if !matches!(self.phase, DialogPhase::Ready) {
            return;
        }
        let total = self.groups.len() as i64 + 1;
        let current = match &self.filter.group {
            GroupChoice::All => 0,
            GroupChoice::Group(name) => self
                .groups
                .iter()
                .position(|g| g.groupname == *name)
                .map(|i| i as i64 + 1)
                .unwrap_or(0),
        };
        let next = (current + step).rem_euclid(total);
        self.filter.group = if next == 0 {
            GroupChoice::All
        } else {
            GroupChoice::Group(self.groups[next as usize - 1].groupname.clone())
        };
        self.filter.search.clear();
        self.rebuild_rows();
    }

    pub fn push_search_char(&mut self, c: char) {
        self.filter.search.push(c);
        self.rebuild_rows();
    }

    pub fn pop_search_char(&mut self) {
        if self.filter.search.pop().is_some() {
            self.rebuild_rows();
        }
    }

    pub fn clear_search(&mut self) {
        if !self.filter.search.is_empty() {
            self.filter.search.clear();
            self.rebuild_rows();
        }
    }

    pub fn move_cursor_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    pub fn move_cursor_down(&mut self) {
        if self.cursor + 1 < self.rows.len() {
            self.cursor += 1;
        }
    }

    pub fn toggle_current(&mut self) {
        if let Some(row) = self.rows.get_mut(self.cursor) {
            row.checked = !row.checked;
        }
    }

    /// Select-all over exactly the currently visible set: checks every row,
    /// or unchecks every row when all are already checked.
    pub fn toggle_select_all(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let all_checked = self.rows.iter().all(|r| r.checked);
        for row in &mut self.rows {
            row.checked = !all_checked;
        }
    }

    pub fn any_checked(&self) -> bool {
        self.rows.iter().any(|r| r.checked)
    }

    /// Number of checked rows, for display; does not allocate.
    pub fn checked_count(&self) -> usize {
        self.rows.iter().filter(|r| r.checked).count()
    }

    /// Send is enabled iff the directory is loaded, nothing is in flight,
    /// and at least one visible row is checked.
    pub fn can_send(&self) -> bool {
        self.phase == DialogPhase::Ready
            && self.submit == SubmitPhase::Idle
            && self.any_checked()
    }

    pub fn checked_usernames(&self) -> Vec<String> {
        self.rows
            .iter()
            .filter(|r| r.checked)
            .map(|r| r.user.username.clone())
            .collect()
    }

    /// Snapshot the current selection into a request body. The group is
    /// included only when the selector is not "All Users".
    pub fn build_request(&self, window_href: &str, hostname: &str) -> InviteRequest {
        let selected_groups = match &self.filter.group {
            GroupChoice::All => Vec::new(),
            GroupChoice::Group(name) => vec![name.clone()],
        };
        InviteRequest {
            selected_groups,
            selected_usernames: self.checked_usernames(),
            window_href: window_href.to_string(),
            hostname: hostname.to_string(),
        }
    }
}

/// Results delivered from background request threads to the event loop.
#[derive(Debug)]
pub enum AppEvent {
    FetchDone {
        epoch: u64,
        result: crate::error::Result<Directory>,
    },
    SubmitDone {
        epoch: u64,
        result: crate::error::Result<()>,
    },
}

pub struct AppState {
    pub role: ParticipantRole,
    pub server_url: String,
    pub room_url: String,
    pub hostname: String,
    pub theme: Theme,
    pub dialog: Option<InviteDialog>,
    /// Blocking alert modal (moderator gate); dismissed with Esc/Enter.
    pub alert: Option<String>,
    /// Bottom-right success toast.
    pub notification: Option<Notice>,
    next_epoch: u64,
}

impl AppState {
    pub fn new(config: &Config, theme: Theme) -> Self {
        Self {
            role: config.role,
            server_url: config.server_url.clone(),
            room_url: config.room_url.clone(),
            hostname: config.hostname(),
            theme,
            dialog: None,
            alert: None,
            notification: None,
            next_epoch: 0,
        }
    }

    /// Invite button activation: emit the analytics event, then gate on the
    /// injected role. Non-moderators get a blocking alert and no dialog;
    /// otherwise a fresh dialog opens and its epoch is returned so the
    /// caller can start the directory fetch.
    pub fn activate_invite(&mut self) -> Option<u64> {
        // Stand-in for the client's analytics sink; fires once per
        // activation regardless of the gate outcome.
        tracing::info!(target: "analytics", "toolbar invite activated");

        if !self.role.is_moderator() {
            self.alert = Some(InviteError::PermissionDenied.to_string());
            return None;
        }
        Some(self.open_dialog())
    }

    /// Open a fresh dialog in loading state, replacing any existing one, and
    /// return its epoch.
    pub fn open_dialog(&mut self) -> u64 {
        self.next_epoch += 1;
        self.dialog = Some(InviteDialog::loading(self.next_epoch));
        self.next_epoch
    }

    pub fn close_dialog(&mut self) {
        self.dialog = None;
    }

    /// Expire transient notices.
    pub fn tick(&mut self, now: Instant) {
        if self
            .notification
            .as_ref()
            .is_some_and(|n| n.expired(now))
        {
            self.notification = None;
        }
        if let Some(dialog) = &mut self.dialog
            && dialog.footer_error.as_ref().is_some_and(|n| n.expired(now))
        {
            dialog.footer_error = None;
        }
    }
}

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub success: Color,
    pub error: Color,
}

impl Theme {
    /// Dark default theme.
    #[allow(dead_code)]
    pub fn dark() -> Self {
        Self {
            text: Color::Gray,
            muted: Color::DarkGray,
            title: Color::Cyan,
            border: Color::Gray,
            header_bg: Color::Black,
            header_fg: Color::Cyan,
            status_bg: Color::DarkGray,
            status_fg: Color::Black,
            highlight_fg: Color::Yellow,
            highlight_bg: Color::Reset,
            success: Color::Green,
            error: Color::Red,
        }
    }

    /// Catppuccin Mocha theme defaults.
    pub fn mocha() -> Self {
        // Palette reference: https://github.com/catppuccin/catppuccin
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),
            muted: Color::Rgb(0x7f, 0x84, 0x9c),
            title: Color::Rgb(0xcb, 0xa6, 0xf7),
            border: Color::Rgb(0x58, 0x5b, 0x70),
            header_bg: Color::Rgb(0x31, 0x32, 0x44),
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf),
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a),
            success: Color::Rgb(0xa6, 0xe3, 0xa1),
            error: Color::Rgb(0xf3, 0x8b, 0xa8),
        }
    }

    /// Load theme from a simple key=value file. Unknown or missing keys fall
    /// back to `mocha`.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut theme = Self::mocha();

        for raw_line in contents.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let key = parts.next().map(|s| s.trim()).unwrap_or("");
            let val = parts.next().map(|s| s.trim()).unwrap_or("");
            if key.is_empty() || val.is_empty() {
                continue;
            }
            if let Some(color) = Self::parse_color(val) {
                match key {
                    "text" => theme.text = color,
                    "muted" => theme.muted = color,
                    "title" => theme.title = color,
                    "border" => theme.border = color,
                    "header_bg" => theme.header_bg = color,
                    "header_fg" => theme.header_fg = color,
                    "status_bg" => theme.status_bg = color,
                    "status_fg" => theme.status_fg = color,
                    "highlight_fg" => theme.highlight_fg = color,
                    "highlight_bg" => theme.highlight_bg = color,
                    "success" => theme.success = color,
                    "error" => theme.error = color,
                    _ => {}
                }
            }
        }

        Some(theme)
    }

    /// Parse a color from hex ("#RRGGBB" or "RRGGBB") or the special name
    /// "reset".
    fn parse_color(s: &str) -> Option<Color> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "reset" {
            return Some(Color::Reset);
        }
        let hex = lower.strip_prefix('#').unwrap_or(&lower);
        if hex.len() == 6
            && let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            )
        {
            return Some(Color::Rgb(r, g, b));
        }
        None
    }

    /// Persist the theme to a config file in key=value format.
    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;

        fn color_to_str(c: Color) -> String {
            match c {
                Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
                Color::Reset => "reset".to_string(),
                other => format!("{:?}", other).to_lowercase(),
            }
        }

        let mut buf = String::new();
        buf.push_str("# invite-tui theme configuration\n");
        buf.push_str("# Colors: hex as #RRGGBB or RRGGBB, or 'reset'\n\n");

        for (key, value) in [
            ("text", self.text),
            ("muted", self.muted),
            ("title", self.title),
            ("border", self.border),
            ("header_bg", self.header_bg),
            ("header_fg", self.header_fg),
            ("status_bg", self.status_bg),
            ("status_fg", self.status_fg),
            ("highlight_fg", self.highlight_fg),
            ("highlight_bg", self.highlight_bg),
            ("success", self.success),
            ("error", self.error),
        ] {
            let _ = writeln!(&mut buf, "{} = {}", key, color_to_str(value));
        }

        std::fs::write(path, buf)
    }

    /// Ensure a config file exists; if missing, write one with the defaults
    /// and return them. If present, load from it; on parse errors, return
    /// `mocha`.
    pub fn load_or_init(path: &str) -> Self {
        let p = std::path::Path::new(path);
        if p.exists() {
            return Self::from_file(path).unwrap_or_else(Self::mocha);
        }
        let theme = Self::mocha();
        let _ = theme.write_file(path);
        theme
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
