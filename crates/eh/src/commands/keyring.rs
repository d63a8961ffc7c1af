//! Session storage in the OS credential manager.
//!
//! Used instead of the session file when `token_storage = "keyring"`. The whole
//! [`Session`] is stored as JSON under one entry.

use eventhive_api::session::Session;
use keyring::Entry;

use super::{CommandError, Result};

/// Service name for keyring entries.
const SERVICE: &str = "eventhive-cli";

/// Username for the session entry.
const USERNAME: &str = "session";

/// Suggested way out when the keyring cannot be used.
const ALTERNATIVE: &str = "Alternative: run 'eh config set token_storage session' to keep the session in a file, \
                           or pass an admin token with EVENTHIVE_TOKEN";

/// Appends a platform-specific hint to keyring errors that need one.
fn platform_hint(error: &keyring::Error) -> String {
    let hint = match error {
        keyring::Error::NoStorageAccess(_) => platform_access_hint(),
        keyring::Error::PlatformFailure(_) => platform_failure_hint(),
        _ => return error.to_string(),
    };

    format!("{}\n\nHint: {}\n{}", error, hint, ALTERNATIVE)
}

#[cfg(target_os = "linux")]
fn platform_access_hint() -> &'static str {
    "eh uses the Secret Service API (libsecret). Make sure a provider such as \
     gnome-keyring or kwallet is installed and unlocked, and that a D-Bus session is available."
}

#[cfg(target_os = "macos")]
fn platform_access_hint() -> &'static str {
    "eh uses the macOS Keychain. Unlock your login keychain and allow 'eh' to access it when prompted."
}

#[cfg(target_os = "windows")]
fn platform_access_hint() -> &'static str {
    "eh uses Windows Credential Manager. Check that the Credential Manager service is running."
}

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
fn platform_access_hint() -> &'static str {
    "Your platform's credential storage is not accessible."
}

#[cfg(target_os = "linux")]
fn platform_failure_hint() -> &'static str {
    "The Secret Service API failed. In containers or SSH sessions try \
     'eval $(dbus-launch --sh-syntax)' and 'gnome-keyring-daemon --start --components=secrets'."
}

#[cfg(not(target_os = "linux"))]
fn platform_failure_hint() -> &'static str {
    "The platform credential store reported an error."
}

fn entry() -> Result<Entry> {
    Entry::new(SERVICE, USERNAME)
        .map_err(|e| CommandError::Config(format!("Keyring error: {}", platform_hint(&e))))
}

/// Stores the session in the OS keyring.
pub fn store_session(session: &Session) -> Result<()> {
    let payload = serde_json::to_string(session)?;
    entry()?.set_password(&payload).map_err(|e| {
        CommandError::Config(format!("Failed to store session: {}", platform_hint(&e)))
    })
}

/// Reads the session from the OS keyring.
///
/// Returns `Ok(None)` when nothing is stored.
pub fn get_session() -> Result<Option<Session>> {
    match entry()?.get_password() {
        Ok(payload) => Ok(Some(serde_json::from_str(&payload)?)),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(keyring::Error::Ambiguous(_)) => Ok(None),
        Err(e) => Err(CommandError::Config(format!(
            "Failed to read session: {}",
            platform_hint(&e)
        ))),
    }
}

/// Removes the session from the OS keyring. Succeeds if nothing was stored.
pub fn delete_session() -> Result<()> {
    match entry()?.delete_credential() {
        Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(CommandError::Config(format!(
            "Failed to delete session: {}",
            platform_hint(&e)
        ))),
    }
}
