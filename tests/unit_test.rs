// Unit tests for invite-tui.
// These tests drive the dialog workflow through the public API, without a
// terminal and without a backend.

use invite_tui::api::{Directory, InviteGroup, InviteUser};
use invite_tui::app::update::apply_event;
use invite_tui::app::{AppEvent, AppState, DialogPhase, SubmitPhase, Theme};
use invite_tui::config::Config;
use invite_tui::error::InviteError;
use invite_tui::filter::GroupChoice;

use clap::Parser;

fn user(username: &str, displayname: Option<&str>) -> InviteUser {
    InviteUser {
        username: username.to_string(),
        displayname: displayname.map(|s| s.to_string()),
    }
}

fn group(name: &str, members: &[&str]) -> InviteGroup {
    InviteGroup {
        groupname: name.to_string(),
        members: members.iter().map(|m| user(m, None)).collect(),
    }
}

fn directory() -> Directory {
    Directory {
        groups: vec![group("eng", &["alice", "bob"]), group("empty", &[])],
        users: vec![
            user("alice", Some("Alice A")),
            user("bob", Some("Bobby")),
            user("carol", None),
        ],
    }
}

fn moderator_app() -> AppState {
    let config = Config::parse_from([
        "invite-tui",
        "--server-url",
        "https://backend.example.com:9003",
        "--room-url",
        "https://meet.example.com/standup",
        "--role",
        "moderator",
    ]);
    AppState::new(&config, Theme::dark())
}

/// Open a dialog and install the canned directory, as the fetch thread would.
fn app_with_ready_dialog() -> AppState {
    let mut app = moderator_app();
    let epoch = app.open_dialog();
    apply_event(
        &mut app,
        AppEvent::FetchDone {
            epoch,
            result: Ok(directory()),
        },
    );
    app
}

mod moderator_gate {
    use super::*;

    fn participant_app() -> AppState {
        let config = Config::parse_from([
            "invite-tui",
            "--server-url",
            "https://backend.example.com:9003",
            "--room-url",
            "https://meet.example.com/standup",
        ]);
        AppState::new(&config, Theme::dark())
    }

    #[test]
    fn non_moderator_gets_blocking_alert_and_no_dialog() {
        let mut app = participant_app();
        assert!(app.activate_invite().is_none());
        assert_eq!(
            app.alert.as_deref(),
            Some("Only Moderators can send invites.")
        );
        assert!(app.dialog.is_none());
    }

    #[test]
    fn moderator_opens_dialog_in_loading_state() {
        let mut app = moderator_app();
        let epoch = app.activate_invite().expect("gate must pass");
        assert!(app.alert.is_none());
        let dialog = app.dialog.as_ref().unwrap();
        assert_eq!(dialog.epoch, epoch);
        assert_eq!(dialog.phase, DialogPhase::Loading);
    }

    #[test]
    fn repeated_activation_replaces_the_dialog() {
        let mut app = moderator_app();
        let first = app.activate_invite().unwrap();
        let second = app.activate_invite().unwrap();
        assert_ne!(first, second);
        assert_eq!(app.dialog.as_ref().unwrap().epoch, second);
    }
}

mod dialog_workflow {
    use super::*;

    #[test]
    fn populate_shows_all_users_unchecked() {
        let app = app_with_ready_dialog();
        let dialog = app.dialog.as_ref().unwrap();
        assert_eq!(dialog.phase, DialogPhase::Ready);
        let names: Vec<&str> = dialog.rows.iter().map(|r| r.user.username.as_str()).collect();
        assert_eq!(names, vec!["alice", "bob", "carol"]);
        assert!(dialog.rows.iter().all(|r| !r.checked));
        assert!(!dialog.can_send());
    }

    #[test]
    fn group_cycle_clears_search_and_selection() {
        let mut app = app_with_ready_dialog();
        let dialog = app.dialog.as_mut().unwrap();
        dialog.push_search_char('a');
        dialog.toggle_current();
        assert!(dialog.any_checked());

        dialog.cycle_group(1);
        assert_eq!(dialog.filter.group, GroupChoice::Group("eng".into()));
        assert!(dialog.filter.search.is_empty());
        assert!(!dialog.any_checked(), "selection must not survive a filter change");
        let names: Vec<&str> = dialog.rows.iter().map(|r| r.user.username.as_str()).collect();
        assert_eq!(names, vec!["alice", "bob"]);
    }

    #[test]
    fn group_cycle_wraps_back_to_all_users() {
        let mut app = app_with_ready_dialog();
        let dialog = app.dialog.as_mut().unwrap();
        dialog.cycle_group(1);
        dialog.cycle_group(1);
        dialog.cycle_group(1);
        assert_eq!(dialog.filter.group, GroupChoice::All);
        assert_eq!(dialog.rows.len(), 3);
    }

    #[test]
    fn empty_group_yields_empty_rows_not_all_users() {
        let mut app = app_with_ready_dialog();
        let dialog = app.dialog.as_mut().unwrap();
        dialog.cycle_group(2); // All -> eng -> empty
        assert_eq!(dialog.filter.group, GroupChoice::Group("empty".into()));
        assert!(dialog.rows.is_empty());
        assert!(!dialog.can_send());
    }

    #[test]
    fn search_edit_rebuilds_rows_and_drops_selection() {
        let mut app = app_with_ready_dialog();
        let dialog = app.dialog.as_mut().unwrap();
        dialog.toggle_current();
        assert!(dialog.any_checked());

        dialog.push_search_char('b');
        let names: Vec<&str> = dialog.rows.iter().map(|r| r.user.username.as_str()).collect();
        assert_eq!(names, vec!["bob"]);
        assert!(!dialog.any_checked());

        dialog.pop_search_char();
        assert_eq!(dialog.rows.len(), 3);
    }

    #[test]
    fn select_all_covers_exactly_the_visible_set() {
        let mut app = app_with_ready_dialog();
        let dialog = app.dialog.as_mut().unwrap();
        dialog.cycle_group(1); // eng: alice, bob
        dialog.toggle_select_all();
        assert_eq!(dialog.checked_usernames(), vec!["alice", "bob"]);
        assert_eq!(dialog.checked_count(), 2);

        // second toggle unchecks everything
        dialog.toggle_select_all();
        assert!(!dialog.any_checked());
        assert_eq!(dialog.checked_count(), 0);
    }

    #[test]
    fn send_enabled_iff_any_visible_checkbox_checked() {
        let mut app = app_with_ready_dialog();
        let dialog = app.dialog.as_mut().unwrap();
        assert!(!dialog.can_send());
        dialog.toggle_current();
        assert!(dialog.can_send());
        dialog.toggle_current();
        assert!(!dialog.can_send());
    }

    #[test]
    fn request_omits_group_for_all_users_sentinel() {
        let mut app = app_with_ready_dialog();
        let dialog = app.dialog.as_mut().unwrap();
        dialog.toggle_current(); // alice
        let request = dialog.build_request("https://meet.example.com/standup", "meet.example.com");
        assert!(request.selected_groups.is_empty());
        assert_eq!(request.selected_usernames, vec!["alice"]);
        assert_eq!(request.window_href, "https://meet.example.com/standup");
        assert_eq!(request.hostname, "meet.example.com");
    }

    #[test]
    fn request_carries_single_selected_group() {
        let mut app = app_with_ready_dialog();
        let dialog = app.dialog.as_mut().unwrap();
        dialog.cycle_group(1); // eng
        dialog.toggle_select_all();
        let request = dialog.build_request("https://meet.example.com/standup", "meet.example.com");
        assert_eq!(request.selected_groups, vec!["eng"]);
        assert_eq!(request.selected_usernames, vec!["alice", "bob"]);
    }
}

mod dialog_lifecycle {
    use super::*;

    #[test]
    fn opening_replaces_any_prior_instance() {
        let mut app = moderator_app();
        let first = app.open_dialog();
        let second = app.open_dialog();
        assert_ne!(first, second);
        assert_eq!(app.dialog.as_ref().unwrap().epoch, second);
    }

    #[test]
    fn fetch_failure_replaces_loading_and_caches_nothing() {
        let mut app = moderator_app();
        let epoch = app.open_dialog();
        apply_event(
            &mut app,
            AppEvent::FetchDone {
                epoch,
                result: Err(InviteError::fetch("groups: status 500")),
            },
        );
        let dialog = app.dialog.as_ref().unwrap();
        assert_eq!(
            dialog.phase,
            DialogPhase::LoadFailed(
                "Failed to load users and groups. Please try again later.".into()
            )
        );
        assert!(dialog.users_all.is_empty());
        assert!(dialog.groups.is_empty());
        assert!(!dialog.can_send());
    }

    #[test]
    fn stale_fetch_result_is_dropped() {
        let mut app = moderator_app();
        let stale = app.open_dialog();
        let current = app.open_dialog();
        apply_event(
            &mut app,
            AppEvent::FetchDone {
                epoch: stale,
                result: Ok(directory()),
            },
        );
        let dialog = app.dialog.as_ref().unwrap();
        assert_eq!(dialog.epoch, current);
        assert_eq!(dialog.phase, DialogPhase::Loading);
    }

    #[test]
    fn fetch_result_after_close_is_dropped() {
        let mut app = moderator_app();
        let epoch = app.open_dialog();
        app.close_dialog();
        apply_event(
            &mut app,
            AppEvent::FetchDone {
                epoch,
                result: Ok(directory()),
            },
        );
        assert!(app.dialog.is_none());
    }
}

mod submit_workflow {
    use super::*;

    #[test]
    fn success_closes_dialog_and_shows_toast() {
        let mut app = app_with_ready_dialog();
        let epoch = {
            let dialog = app.dialog.as_mut().unwrap();
            dialog.toggle_current();
            dialog.submit = SubmitPhase::Sending;
            dialog.epoch
        };
        apply_event(&mut app, AppEvent::SubmitDone { epoch, result: Ok(()) });
        assert!(app.dialog.is_none());
        assert_eq!(
            app.notification.as_ref().unwrap().message,
            "Invitations sent successfully!"
        );
    }

    #[test]
    fn failure_keeps_dialog_selection_and_reenables_send() {
        let mut app = app_with_ready_dialog();
        let epoch = {
            let dialog = app.dialog.as_mut().unwrap();
            dialog.toggle_current();
            dialog.submit = SubmitPhase::Sending;
            assert!(!dialog.can_send());
            dialog.epoch
        };
        apply_event(
            &mut app,
            AppEvent::SubmitDone {
                epoch,
                result: Err(InviteError::submit("status 500")),
            },
        );
        let dialog = app.dialog.as_ref().unwrap();
        assert_eq!(dialog.submit, SubmitPhase::Idle);
        assert_eq!(dialog.checked_usernames(), vec!["alice"]);
        assert!(dialog.can_send());
        assert_eq!(
            dialog.footer_error.as_ref().unwrap().message,
            "Failed to send invites. Please try again."
        );
        assert!(app.notification.is_none());
    }

    #[test]
    fn success_after_close_still_shows_toast() {
        let mut app = app_with_ready_dialog();
        let epoch = app.dialog.as_ref().unwrap().epoch;
        app.close_dialog();
        apply_event(&mut app, AppEvent::SubmitDone { epoch, result: Ok(()) });
        assert!(app.dialog.is_none());
        assert!(app.notification.is_some());
    }
}

mod notices {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn notification_expires_on_tick() {
        let mut app = moderator_app();
        let epoch = app.open_dialog();
        app.close_dialog();
        apply_event(&mut app, AppEvent::SubmitDone { epoch, result: Ok(()) });
        assert!(app.notification.is_some());

        app.tick(Instant::now());
        assert!(app.notification.is_some(), "fresh notice must survive a tick");

        app.tick(Instant::now() + Duration::from_secs(6));
        assert!(app.notification.is_none());
    }

    #[test]
    fn footer_error_expires_on_tick() {
        let mut app = app_with_ready_dialog();
        let epoch = {
            let dialog = app.dialog.as_mut().unwrap();
            dialog.toggle_current();
            dialog.epoch
        };
        apply_event(
            &mut app,
            AppEvent::SubmitDone {
                epoch,
                result: Err(InviteError::submit("status 502")),
            },
        );
        assert!(app.dialog.as_ref().unwrap().footer_error.is_some());

        app.tick(Instant::now() + Duration::from_secs(6));
        assert!(app.dialog.as_ref().unwrap().footer_error.is_none());
    }
}
