//! Group and search filtering over the fetched directory.
//!
//! Kept free of any UI state so the workflow is testable without a terminal:
//! the dialog recomputes the visible set from scratch on every control
//! change, which is acceptable at the expected list sizes.

use crate::api::{InviteGroup, InviteUser};

/// The group selector: all users, or one named group.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum GroupChoice {
    #[default]
    All,
    Group(String),
}

impl GroupChoice {
    pub fn label(&self) -> &str {
        match self {
            Self::All => "All Users",
            Self::Group(name) => name,
        }
    }
}

/// Current state of the two filter controls.
#[derive(Clone, Debug, Default)]
pub struct FilterState {
    pub group: GroupChoice,
    pub search: String,
}

/// Compute the visible user set for the current filter state.
///
/// The base set is the full user list for [`GroupChoice::All`], otherwise the
/// selected group's member list. A missing or empty group yields an empty
/// base set, never the full list. A non-empty search term then restricts to
/// users whose display name or username contains it case-insensitively.
/// Order within the base set is preserved.
pub fn visible_users(
    filter: &FilterState,
    users: &[InviteUser],
    groups: &[InviteGroup],
) -> Vec<InviteUser> {
    let base: Vec<InviteUser> = match &filter.group {
        GroupChoice::All => users.to_vec(),
        GroupChoice::Group(name) => groups
            .iter()
            .find(|g| g.groupname == *name)
            .map(|g| g.members.clone())
            .unwrap_or_default(),
    };

    if filter.search.is_empty() {
        return base;
    }
    let term = filter.search.to_lowercase();
    base.into_iter()
        .filter(|u| {
            u.display().to_lowercase().contains(&term)
                || u.username.to_lowercase().contains(&term)
        })
        .collect()
}
