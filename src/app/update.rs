//! Event loop and key handling.
//!
//! Single cooperative loop: draw, poll input for 100ms, drain results from
//! background request threads, expire transient notices. Network work never
//! blocks the loop; the fetch join and the invite POST each run on their own
//! thread and report back over an mpsc channel.

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::sync::Arc;
use std::sync::mpsc::{Sender, channel};
use std::thread;
use std::time::{Duration, Instant};

use crate::api::ApiClient;
use crate::app::{AppEvent, AppState, DialogInput, DialogPhase, Notice, SubmitPhase, Theme};
use crate::config::Config;
use crate::ui;

pub fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    config: &Config,
) -> Result<()> {
    let client = Arc::new(ApiClient::new(
        &config.server_url,
        config.session_cookie.clone(),
        config.insecure,
    )?);
    let theme = Theme::load_or_init(&config.theme);
    let mut app = AppState::new(config, theme);
    let (tx, rx) = channel();

    loop {
        while let Ok(app_event) = rx.try_recv() {
            apply_event(&mut app, app_event);
        }
        app.tick(Instant::now());

        terminal.draw(|f| {
            ui::render(f, &mut app);
        })?;

        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            if app.alert.is_some() {
                if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                    app.alert = None;
                }
            } else if app.dialog.is_some() {
                handle_dialog_key(&mut app, key.code, &client, &tx);
            } else {
                match key.code {
                    KeyCode::Char('q') => break,
                    KeyCode::Char('i') | KeyCode::Enter => {
                        if let Some(epoch) = app.activate_invite() {
                            spawn_directory_fetch(&client, &tx, epoch);
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    Ok(())
}

/// Start the background directory fetch for the dialog with this epoch.
fn spawn_directory_fetch(client: &Arc<ApiClient>, tx: &Sender<AppEvent>, epoch: u64) {
    let client = Arc::clone(client);
    let tx = tx.clone();
    thread::spawn(move || {
        let result = client.fetch_directory();
        let _ = tx.send(AppEvent::FetchDone { epoch, result });
    });
}

fn handle_dialog_key(
    app: &mut AppState,
    code: KeyCode,
    client: &Arc<ApiClient>,
    tx: &Sender<AppEvent>,
) {
    let Some(dialog) = app.dialog.as_mut() else {
        return;
    };
    match dialog.input {
        DialogInput::Browse => match code {
            KeyCode::Esc => app.close_dialog(),
            KeyCode::Char('/') => {
                if dialog.phase == DialogPhase::Ready {
                    dialog.input = DialogInput::EditSearch;
                }
            }
            KeyCode::Left | KeyCode::Char('h') => dialog.cycle_group(-1),
            KeyCode::Right | KeyCode::Char('l') => dialog.cycle_group(1),
            KeyCode::Up | KeyCode::Char('k') => dialog.move_cursor_up(),
            KeyCode::Down | KeyCode::Char('j') => dialog.move_cursor_down(),
            KeyCode::Char(' ') => dialog.toggle_current(),
            KeyCode::Char('a') => dialog.toggle_select_all(),
            KeyCode::Enter => submit_invites(app, client, tx),
            _ => {}
        },
        DialogInput::EditSearch => match code {
            KeyCode::Enter => dialog.input = DialogInput::Browse,
            KeyCode::Esc => {
                dialog.clear_search();
                dialog.input = DialogInput::Browse;
            }
            KeyCode::Backspace => dialog.pop_search_char(),
            KeyCode::Char(c) => dialog.push_search_char(c),
            _ => {}
        },
    }
}

fn submit_invites(app: &mut AppState, client: &Arc<ApiClient>, tx: &Sender<AppEvent>) {
    let Some(dialog) = app.dialog.as_mut() else {
        return;
    };
    if !dialog.can_send() {
        return;
    }
    let request = dialog.build_request(&app.room_url, &app.hostname);
    tracing::info!(
        groups = ?request.selected_groups,
        users = request.selected_usernames.len(),
        "sending invites"
    );
    dialog.submit = SubmitPhase::Sending;
    let epoch = dialog.epoch;
    let client = Arc::clone(client);
    let tx = tx.clone();
    thread::spawn(move || {
        let result = client.send_invites(&request);
        let _ = tx.send(AppEvent::SubmitDone { epoch, result });
    });
}

/// Apply a background request result to the state.
///
/// Results are matched against the dialog's epoch so a response cannot land
/// in a dialog other than the one it was started for. A successful submit
/// still shows the toast when the dialog was closed mid-flight.
pub fn apply_event(app: &mut AppState, app_event: AppEvent) {
    match app_event {
        AppEvent::FetchDone { epoch, result } => {
            let Some(dialog) = app.dialog.as_mut().filter(|d| d.epoch == epoch) else {
                tracing::debug!(epoch, "dropping directory result for a closed dialog");
                return;
            };
            match result {
                Ok(directory) => {
                    tracing::info!(
                        users = directory.users.len(),
                        groups = directory.groups.len(),
                        "directory loaded"
                    );
                    dialog.populate(directory);
                }
                Err(err) => {
                    tracing::warn!(
                        detail = err.detail().unwrap_or_default(),
                        "directory fetch failed"
                    );
                    dialog.fail_load(err.to_string());
                }
            }
        }
        AppEvent::SubmitDone { epoch, result } => match result {
            Ok(()) => {
                app.notification = Some(Notice::timed("Invitations sent successfully!"));
                if app.dialog.as_ref().is_some_and(|d| d.epoch == epoch) {
                    app.close_dialog();
                }
            }
            Err(err) => {
                tracing::warn!(
                    detail = err.detail().unwrap_or_default(),
                    "invite submission failed"
                );
                if let Some(dialog) = app.dialog.as_mut().filter(|d| d.epoch == epoch) {
                    dialog.submit = SubmitPhase::Idle;
                    dialog.footer_error = Some(Notice::timed(err.to_string()));
                }
            }
        },
    }
}
