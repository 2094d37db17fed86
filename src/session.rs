//! Demo session handling
//!
//! The original client never had a real backend: login succeeds only for
//! the demo credentials, register accepts any complete form, and the
//! "token" is a fixed string. Everything lives in LocalStorage under the
//! same keys the original client used (`token` / `user`).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Demo account credentials
pub const DEMO_EMAIL: &str = "demo@example.com";
pub const DEMO_PASSWORD: &str = "password";
/// The stand-in JWT stored on successful auth
pub const DEMO_TOKEN: &str = "demo-jwt-token";

/// The signed-in player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
}

/// Why an auth attempt was rejected
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid credentials - try {DEMO_EMAIL} / {DEMO_PASSWORD}")]
    InvalidCredentials,
    #[error("please fill in all fields")]
    MissingField,
    #[error("that doesn't look like an email address")]
    InvalidEmail,
}

/// Validate a login attempt against the demo account
pub fn login(email: &str, password: &str) -> Result<User, AuthError> {
    if email.is_empty() || password.is_empty() {
        return Err(AuthError::MissingField);
    }
    if email == DEMO_EMAIL && password == DEMO_PASSWORD {
        Ok(User {
            id: "1".to_string(),
            username: "DemoUser".to_string(),
            email: email.to_string(),
        })
    } else {
        Err(AuthError::InvalidCredentials)
    }
}

/// Validate a registration form. Any complete form is accepted.
pub fn register(username: &str, email: &str, password: &str) -> Result<User, AuthError> {
    if username.is_empty() || email.is_empty() || password.is_empty() {
        return Err(AuthError::MissingField);
    }
    if !email.contains('@') {
        return Err(AuthError::InvalidEmail);
    }
    Ok(User {
        id: "2".to_string(),
        username: username.to_string(),
        email: email.to_string(),
    })
}

/// LocalStorage keys, matching the original client
#[allow(dead_code)]
const TOKEN_KEY: &str = "token";
#[allow(dead_code)]
const USER_KEY: &str = "user";

/// Store the session (WASM only)
#[cfg(target_arch = "wasm32")]
pub fn set_auth(user: &User) {
    let storage = web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten();

    if let Some(storage) = storage {
        let _ = storage.set_item(TOKEN_KEY, DEMO_TOKEN);
        if let Ok(json) = serde_json::to_string(user) {
            let _ = storage.set_item(USER_KEY, &json);
        }
        log::info!("Session stored for {}", user.username);
    }
}

/// The signed-in user, if any (WASM only)
#[cfg(target_arch = "wasm32")]
pub fn current_user() -> Option<User> {
    let storage = web_sys::window()?.local_storage().ok()??;
    let json = storage.get_item(USER_KEY).ok()??;
    serde_json::from_str(&json).ok()
}

/// True if a token is present (WASM only)
#[cfg(target_arch = "wasm32")]
pub fn is_authenticated() -> bool {
    web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()
        .and_then(|s| s.get_item(TOKEN_KEY).ok())
        .flatten()
        .is_some()
}

/// Drop the session (WASM only)
#[cfg(target_arch = "wasm32")]
pub fn clear_auth() {
    if let Some(storage) = web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()
    {
        let _ = storage.remove_item(TOKEN_KEY);
        let _ = storage.remove_item(USER_KEY);
        log::info!("Session cleared");
    }
}

/// Native stubs
#[cfg(not(target_arch = "wasm32"))]
pub fn set_auth(_user: &User) {}

#[cfg(not(target_arch = "wasm32"))]
pub fn current_user() -> Option<User> {
    None
}

#[cfg(not(target_arch = "wasm32"))]
pub fn is_authenticated() -> bool {
    false
}

#[cfg(not(target_arch = "wasm32"))]
pub fn clear_auth() {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_login_succeeds() {
        let user = login(DEMO_EMAIL, DEMO_PASSWORD).expect("demo login");
        assert_eq!(user.username, "DemoUser");
        assert_eq!(user.email, DEMO_EMAIL);
    }

    #[test]
    fn test_wrong_password_rejected() {
        assert_eq!(
            login(DEMO_EMAIL, "hunter2"),
            Err(AuthError::InvalidCredentials)
        );
    }

    #[test]
    fn test_empty_login_is_missing_field() {
        assert_eq!(login("", ""), Err(AuthError::MissingField));
    }

    #[test]
    fn test_register_requires_all_fields() {
        assert_eq!(
            register("Stella", "", "secret"),
            Err(AuthError::MissingField)
        );
        assert_eq!(
            register("Stella", "not-an-email", "secret"),
            Err(AuthError::InvalidEmail)
        );
        let user = register("Stella", "stella@example.com", "secret").expect("register");
        assert_eq!(user.username, "Stella");
    }
}
