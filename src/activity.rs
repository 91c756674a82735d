use chrono::{DateTime, Local};
use std::collections::HashMap;

use crate::db::{log_timestamp, Database};
use crate::error::Result;

/// Login times of the users currently signed in to this process.
///
/// Created by the host at startup and handed to `login`/`logout`; an entry
/// lives from a successful login until the matching logout.
#[derive(Debug, Default)]
pub struct SessionStore {
    active: HashMap<String, DateTime<Local>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self, username: &str) -> bool {
        self.active.contains_key(username)
    }

    pub fn login_time(&self, username: &str) -> Option<DateTime<Local>> {
        self.active.get(username).copied()
    }

    pub fn login(&mut self, db: &Database, username: &str) -> Result<()> {
        self.login_at(db, username, Local::now())
    }

    pub fn login_at(&mut self, db: &Database, username: &str, at: DateTime<Local>) -> Result<()> {
        self.active.insert(username.to_string(), at);
        tracing::info!(username, "User logged in");
        db.log_activity_at(
            &format!("User ({}) logged in at {}", username, log_timestamp(at)),
            at,
        )
    }

    /// Closes the session and returns its length in whole minutes, or
    /// `None` when no login was recorded for `username`.
    pub fn logout(&mut self, db: &Database, username: &str) -> Result<Option<i64>> {
        self.logout_at(db, username, Local::now())
    }

    pub fn logout_at(
        &mut self,
        db: &Database,
        username: &str,
        at: DateTime<Local>,
    ) -> Result<Option<i64>> {
        let Some(login) = self.active.remove(username) else {
            tracing::warn!(username, "Logout without a recorded login");
            db.log_activity_at(
                &format!(
                    "Logout attempted for user '{}' but no login time was found.",
                    username
                ),
                at,
            )?;
            return Ok(None);
        };

        let minutes = (at - login).num_minutes();
        db.append_session(&format!(
            "User: {} | Login: {} | Logout: {} | Session Duration: {} minute(s)",
            username,
            log_timestamp(login),
            log_timestamp(at),
            minutes
        ))?;
        db.log_activity_at(
            &format!(
                "User '{}' logged out at {} (Session: {} min)",
                username,
                log_timestamp(at),
                minutes
            ),
            at,
        )?;

        tracing::info!(username, minutes, "User logged out");
        Ok(Some(minutes))
    }
}
