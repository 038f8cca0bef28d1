//! HTTP client for the conferencing backend.
//!
//! Three endpoints, wire shapes fixed by the backend:
//! - `GET /groups` returns a JSON array of groups with their member lists
//! - `GET /invite` returns `{ "users_list": [user, ...] }`
//! - `POST /invite` accepts the invite request body and answers with JSON or
//!   plain text; only the status code is inspected
//!
//! All requests are credentialed via a cookie jar (plus an optional session
//! cookie from configuration). Non-2xx is total failure of a call. No
//! timeouts and no retries, by design of the workflow.

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::COOKIE;
use serde::{Deserialize, Serialize};
use std::thread;

use crate::error::{InviteError, Result};

/// A user as returned by the backend directory.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct InviteUser {
    pub username: String,
    #[serde(default)]
    pub displayname: Option<String>,
}

impl InviteUser {
    /// Display name, falling back to the username when absent or empty.
    pub fn display(&self) -> &str {
        self.displayname
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.username)
    }

    /// List label, e.g. `Alice A (alice)`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.display(), self.username)
    }
}

/// A named group with its membership list.
#[derive(Clone, Debug, Deserialize)]
pub struct InviteGroup {
    pub groupname: String,
    #[serde(default)]
    pub members: Vec<InviteUser>,
}

#[derive(Debug, Deserialize)]
struct UsersEnvelope {
    #[serde(default)]
    users_list: Vec<InviteUser>,
}

/// Body of `POST /invite`. Field names are part of the wire contract.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InviteRequest {
    pub selected_groups: Vec<String>,
    pub selected_usernames: Vec<String>,
    pub window_href: String,
    pub hostname: String,
}

/// Aggregate result of the two directory reads.
#[derive(Clone, Debug, Default)]
pub struct Directory {
    pub groups: Vec<InviteGroup>,
    pub users: Vec<InviteUser>,
}

pub struct ApiClient {
    http: Client,
    base_url: String,
    session_cookie: Option<String>,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        session_cookie: Option<String>,
        accept_invalid_certs: bool,
    ) -> Result<Self> {
        let http = Client::builder()
            .cookie_store(true)
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()
            .map_err(|e| InviteError::Config(format!("http client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session_cookie,
        })
    }

    fn credentialed(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.session_cookie {
            Some(cookie) => builder.header(COOKIE, cookie.clone()),
            None => builder,
        }
    }

    /// Issue the two directory reads concurrently and wait for both.
    ///
    /// Either failure aborts the aggregate: the successful half is discarded
    /// and one combined [`InviteError::FetchFailed`] is returned.
    pub fn fetch_directory(&self) -> Result<Directory> {
        let (groups, users) = thread::scope(|s| {
            let groups = s.spawn(|| self.fetch_groups());
            let users = s.spawn(|| self.fetch_users());
            (join_read(groups), join_read(users))
        });
        match (groups, users) {
            (Ok(groups), Ok(users)) => Ok(Directory { groups, users }),
            (groups, users) => {
                let mut detail = Vec::new();
                if let Err(e) = groups {
                    detail.push(format!("groups: {}", e.detail().unwrap_or("unknown")));
                }
                if let Err(e) = users {
                    detail.push(format!("users: {}", e.detail().unwrap_or("unknown")));
                }
                Err(InviteError::fetch(detail.join("; ")))
            }
        }
    }

    fn fetch_groups(&self) -> Result<Vec<InviteGroup>> {
        let url = format!("{}/groups", self.base_url);
        let resp = self
            .credentialed(self.http.get(&url))
            .send()
            .map_err(|e| InviteError::fetch(format!("GET {url}: {e}")))?;
        if !resp.status().is_success() {
            return Err(InviteError::fetch(format!(
                "GET {url}: status {}",
                resp.status()
            )));
        }
        resp.json()
            .map_err(|e| InviteError::fetch(format!("GET {url}: invalid body: {e}")))
    }

    fn fetch_users(&self) -> Result<Vec<InviteUser>> {
        let url = format!("{}/invite", self.base_url);
        let resp = self
            .credentialed(self.http.get(&url))
            .send()
            .map_err(|e| InviteError::fetch(format!("GET {url}: {e}")))?;
        if !resp.status().is_success() {
            return Err(InviteError::fetch(format!(
                "GET {url}: status {}",
                resp.status()
            )));
        }
        let envelope: UsersEnvelope = resp
            .json()
            .map_err(|e| InviteError::fetch(format!("GET {url}: invalid body: {e}")))?;
        Ok(envelope.users_list)
    }

    /// Submit the invite selection. The response body may be JSON or plain
    /// text; it is read for the log and otherwise ignored.
    pub fn send_invites(&self, request: &InviteRequest) -> Result<()> {
        let url = format!("{}/invite", self.base_url);
        let resp = self
            .credentialed(self.http.post(&url))
            .json(request)
            .send()
            .map_err(|e| InviteError::submit(format!("POST {url}: {e}")))?;
        let status = resp.status();
        let body = resp.text().unwrap_or_default();
        if status.is_success() {
            tracing::debug!(%status, body, "invite request accepted");
            Ok(())
        } else {
            Err(InviteError::submit(format!(
                "POST {url}: status {status}: {body}"
            )))
        }
    }
}

fn join_read<T>(handle: thread::ScopedJoinHandle<'_, Result<T>>) -> Result<T> {
    handle
        .join()
        .unwrap_or_else(|_| Err(InviteError::fetch("directory read worker panicked")))
}
