use crate::activity::SessionStore;
use crate::codec::check_field;
use crate::db::Database;
use crate::error::{Result, StoreError};
use crate::models::{CreateUser, User};

/// Exact, case-sensitive match on both username and password.
pub fn validate_login<'a>(users: &'a [User], username: &str, password: &str) -> Option<&'a User> {
    users
        .iter()
        .find(|u| u.username == username && u.password == password)
}

pub fn get_users(db: &Database) -> Vec<User> {
    db.load_users()
}

/// Checks credentials against the users file. Successful logins open a
/// session; failures are written to the login activity log.
pub fn authenticate(
    db: &Database,
    sessions: &mut SessionStore,
    username: &str,
    password: &str,
) -> Result<Option<User>> {
    let users = db.load_users();
    match validate_login(&users, username, password) {
        Some(user) => {
            sessions.login(db, &user.username)?;
            Ok(Some(user.clone()))
        }
        None => {
            tracing::info!(username, "Failed login attempt");
            db.log_activity(&format!("Failed login attempt with username: {}", username))?;
            Ok(None)
        }
    }
}

pub fn create_user(db: &Database, acting: &User, user: CreateUser) -> Result<User> {
    if !acting.is_admin() {
        return Err(StoreError::AdminOnly("add users"));
    }
    check_field("Username", &user.username)?;
    check_field("Password", &user.password)?;

    let mut users = db.load_users();
    if users.iter().any(|u| u.username == user.username) {
        return Err(StoreError::DuplicateUsername(user.username));
    }

    let created = User::new(user.role, user.username, user.password);
    users.push(created.clone());
    db.save_users(&users)?;

    tracing::info!(username = %created.username, role = %created.role, "User added");
    Ok(created)
}

pub fn reset_password(db: &Database, acting: &User, username: &str, password: &str) -> Result<()> {
    if !acting.is_admin() {
        return Err(StoreError::AdminOnly("reset passwords"));
    }
    check_field("Password", password)?;

    let mut users = db.load_users();
    let user = users
        .iter_mut()
        .find(|u| u.username == username)
        .ok_or_else(|| StoreError::UserNotFound(username.to_string()))?;
    user.password = password.to_string();
    db.save_users(&users)?;

    tracing::info!(username, "Password reset");
    Ok(())
}

pub fn delete_user(db: &Database, acting: &User, username: &str) -> Result<()> {
    if !acting.is_admin() {
        return Err(StoreError::AdminOnly("delete users"));
    }
    if acting.username == username {
        return Err(StoreError::CannotDeleteSelf);
    }

    let mut users = db.load_users();
    let before = users.len();
    users.retain(|u| u.username != username);
    if users.len() == before {
        return Err(StoreError::UserNotFound(username.to_string()));
    }
    db.save_users(&users)?;

    tracing::info!(username, "User deleted");
    Ok(())
}
