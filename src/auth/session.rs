//! Session lifecycle management.
//!
//! `SessionManager` is the single authority for "is the user logged in, and
//! as whom". It keeps the bearer token and role in memory, writes them
//! through to a [`SecureStore`], restores them on startup, and drops the
//! session when the token's expiry claim has passed or cannot be decoded
//! (fail closed). It is constructed once at app startup and handed to the
//! UI layer; there is no ambient global.

use std::fmt;

use anyhow::Result;
use chrono::Utc;
use tracing::{debug, info, warn};

use super::store::{SecureStore, ROLE_KEY, TOKEN_KEY};
use super::token;

/// Route the UI shows when no session exists
const LOGIN_ROUTE: &str = "/";

/// Remaining token lifetime below which renewal should be considered
const RENEWAL_WARNING_SECS: i64 = 60 * 60;

/// Account role issued by the backend at login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Student,
    Teacher,
}

impl Role {
    /// Wire/storage form of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Teacher => "teacher",
        }
    }

    /// Parse the stored/wire form. Anything unrecognized is rejected so
    /// callers fail closed instead of guessing.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "student" => Some(Role::Student),
            "teacher" => Some(Role::Teacher),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Navigation seam used to return to the login screen on logout.
/// Implemented by the UI shell; the core never renders routes itself.
pub trait Navigator: Send {
    fn replace_route(&self, path: &str);
}

pub struct SessionManager {
    store: Box<dyn SecureStore>,
    navigator: Box<dyn Navigator>,
    token: Option<String>,
    role: Option<Role>,
}

impl SessionManager {
    /// Create an unauthenticated session manager. Call [`restore`](Self::restore)
    /// once at startup to pick up persisted credentials.
    pub fn new(store: Box<dyn SecureStore>, navigator: Box<dyn Navigator>) -> Self {
        Self {
            store,
            navigator,
            token: None,
            role: None,
        }
    }

    /// Bearer token of the current session, if authenticated.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Role of the current session, if authenticated.
    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn is_authenticated(&self) -> bool {
        // Invariant: token and role are set and cleared together.
        self.token.is_some()
    }

    /// Adopt a freshly issued token and persist it.
    ///
    /// Memory is updated first, so callers observe the new session even when
    /// persistence fails; a persistence error is still returned so the UI can
    /// retry or warn about the divergence.
    pub fn login(&mut self, token: String, role: Role) -> Result<()> {
        info!(%role, "logging in");
        self.token = Some(token.clone());
        self.role = Some(role);

        // Attempt both writes even if the first fails.
        let token_write = self.store.set(TOKEN_KEY, &token);
        let role_write = self.store.set(ROLE_KEY, role.as_str());
        if let Err(e) = &token_write {
            warn!("failed to persist token: {e:#}");
        }
        if let Err(e) = &role_write {
            warn!("failed to persist role: {e:#}");
        }
        token_write.and(role_write)
    }

    /// Clear the session, delete persisted credentials, and return the UI to
    /// the login route. Safe to call when already logged out.
    pub fn logout(&mut self) -> Result<()> {
        info!("clearing session");
        self.token = None;
        self.role = None;

        // Attempt both deletes even if the first fails.
        let token_delete = self.store.delete(TOKEN_KEY);
        let role_delete = self.store.delete(ROLE_KEY);
        if let Err(e) = &token_delete {
            warn!("failed to delete persisted token: {e:#}");
        }
        if let Err(e) = &role_delete {
            warn!("failed to delete persisted role: {e:#}");
        }

        self.navigator.replace_route(LOGIN_ROUTE);
        token_delete.and(role_delete)
    }

    /// Restore a persisted session at startup.
    ///
    /// Missing credentials leave the session unauthenticated without error.
    /// An expired or undecodable token, or an unrecognized role, clears the
    /// persisted state exactly like [`logout`](Self::logout).
    pub fn restore(&mut self) -> Result<()> {
        let token = self.store.get(TOKEN_KEY)?;
        let role = self.store.get(ROLE_KEY)?;
        let (Some(token), Some(role)) = (token, role) else {
            debug!("no persisted session");
            return Ok(());
        };

        let Some(role) = Role::parse(&role) else {
            warn!("unrecognized persisted role, clearing session");
            return self.logout();
        };

        match token::decode_expiry(&token) {
            Ok(exp) if exp < Utc::now().timestamp() => {
                info!("persisted token expired, clearing session");
                self.logout()
            }
            Ok(_) => {
                self.token = Some(token);
                self.role = Some(role);
                info!(%role, "session restored");
                Ok(())
            }
            Err(e) => {
                warn!("persisted token undecodable ({e}), clearing session");
                self.logout()
            }
        }
    }

    /// Periodic expiry check driven by [`ExpiryWatcher`](super::ExpiryWatcher).
    ///
    /// Checks the persisted token rather than the in-memory copy, matching
    /// what a fresh restore would see. No persisted token means nothing to
    /// expire.
    pub fn check_expiry(&mut self) -> Result<()> {
        let Some(token) = self.store.get(TOKEN_KEY)? else {
            return Ok(());
        };

        match token::decode_expiry(&token) {
            Ok(exp) => {
                let remaining = exp - Utc::now().timestamp();
                if remaining <= 0 {
                    info!("token expired, logging out");
                    self.logout()
                } else {
                    if remaining < RENEWAL_WARNING_SECS {
                        // Renewal hook goes here once the backend offers one.
                        warn!(remaining_secs = remaining, "token expires within the hour");
                    }
                    Ok(())
                }
            }
            Err(e) => {
                warn!("persisted token undecodable ({e}), logging out");
                self.logout()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use anyhow::anyhow;

    use super::*;
    use crate::auth::store::MemoryStore;
    use crate::auth::token::tests::make_token;

    /// Navigator that records every route change for assertions.
    #[derive(Clone, Default)]
    struct RecordingNavigator {
        routes: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingNavigator {
        fn routes(&self) -> Vec<String> {
            self.routes.lock().unwrap().clone()
        }
    }

    impl Navigator for RecordingNavigator {
        fn replace_route(&self, path: &str) {
            self.routes.lock().unwrap().push(path.to_string());
        }
    }

    /// Store whose writes always fail, for exercising the error channel.
    struct FailingStore;

    impl SecureStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(anyhow!("keychain unavailable"))
        }

        fn delete(&self, _key: &str) -> Result<()> {
            Err(anyhow!("keychain unavailable"))
        }
    }

    fn manager(store: MemoryStore) -> (SessionManager, RecordingNavigator) {
        let navigator = RecordingNavigator::default();
        let session = SessionManager::new(Box::new(store), Box::new(navigator.clone()));
        (session, navigator)
    }

    fn future_exp() -> i64 {
        Utc::now().timestamp() + 3 * 60 * 60
    }

    #[test]
    fn test_login_sets_memory_and_store() {
        let store = MemoryStore::new();
        let (mut session, _nav) = manager(store.clone());

        session.login(make_token(future_exp()), Role::Student).unwrap();

        assert!(session.is_authenticated());
        assert_eq!(session.role(), Some(Role::Student));
        assert_eq!(store.get(TOKEN_KEY).unwrap().as_deref(), session.token());
        assert_eq!(store.get(ROLE_KEY).unwrap().as_deref(), Some("student"));
    }

    #[test]
    fn test_logout_is_idempotent() {
        let store = MemoryStore::new();
        let (mut session, nav) = manager(store.clone());

        session.logout().unwrap();
        session.logout().unwrap();

        assert!(!session.is_authenticated());
        assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
        // Each call still redirects to the login route.
        assert_eq!(nav.routes(), vec!["/", "/"]);
    }

    #[test]
    fn test_login_restore_round_trip() {
        let store = MemoryStore::new();
        let token = make_token(future_exp());

        let (mut first, _nav) = manager(store.clone());
        first.login(token.clone(), Role::Teacher).unwrap();

        // Fresh manager over the same store simulates a process restart.
        let (mut second, nav) = manager(store);
        second.restore().unwrap();

        assert_eq!(second.token(), Some(token.as_str()));
        assert_eq!(second.role(), Some(Role::Teacher));
        assert!(nav.routes().is_empty());
    }

    #[test]
    fn test_restore_with_no_persisted_session_is_a_no_op() {
        let (mut session, nav) = manager(MemoryStore::new());
        session.restore().unwrap();
        assert!(!session.is_authenticated());
        assert!(nav.routes().is_empty());
    }

    #[test]
    fn test_restore_clears_expired_token() {
        let store = MemoryStore::new();
        store.set(TOKEN_KEY, &make_token(Utc::now().timestamp() - 10)).unwrap();
        store.set(ROLE_KEY, "student").unwrap();

        let (mut session, nav) = manager(store.clone());
        session.restore().unwrap();

        assert!(!session.is_authenticated());
        assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
        assert_eq!(store.get(ROLE_KEY).unwrap(), None);
        assert_eq!(nav.routes(), vec!["/"]);
    }

    #[test]
    fn test_restore_clears_undecodable_token() {
        let store = MemoryStore::new();
        store.set(TOKEN_KEY, "not-a-jwt").unwrap();
        store.set(ROLE_KEY, "teacher").unwrap();

        let (mut session, _nav) = manager(store.clone());
        session.restore().unwrap();

        assert!(!session.is_authenticated());
        assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_restore_rejects_unknown_role() {
        let store = MemoryStore::new();
        store.set(TOKEN_KEY, &make_token(future_exp())).unwrap();
        store.set(ROLE_KEY, "administrator").unwrap();

        let (mut session, _nav) = manager(store.clone());
        session.restore().unwrap();

        assert!(!session.is_authenticated());
        assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_check_expiry_logs_out_expired_session() {
        let store = MemoryStore::new();
        let (mut session, nav) = manager(store.clone());
        session.login(make_token(Utc::now().timestamp() - 1), Role::Student).unwrap();

        session.check_expiry().unwrap();

        assert!(!session.is_authenticated());
        assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
        assert_eq!(nav.routes(), vec!["/"]);
    }

    #[test]
    fn test_check_expiry_logs_out_on_undecodable_token() {
        let store = MemoryStore::new();
        store.set(TOKEN_KEY, "garbage").unwrap();

        let (mut session, _nav) = manager(store.clone());
        session.check_expiry().unwrap();

        assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_check_expiry_keeps_valid_session() {
        let store = MemoryStore::new();
        let (mut session, nav) = manager(store.clone());
        session.login(make_token(future_exp()), Role::Teacher).unwrap();

        session.check_expiry().unwrap();

        assert!(session.is_authenticated());
        assert!(nav.routes().is_empty());
    }

    #[test]
    fn test_check_expiry_reads_persisted_token_not_memory() {
        let store = MemoryStore::new();
        let (mut session, _nav) = manager(store.clone());
        session.login(make_token(Utc::now().timestamp() - 1), Role::Student).unwrap();

        // With the persisted token gone there is nothing to check, even
        // though the in-memory copy is expired.
        store.delete(TOKEN_KEY).unwrap();
        session.check_expiry().unwrap();

        assert!(session.is_authenticated());
    }

    #[test]
    fn test_login_surfaces_persistence_failure_but_updates_memory() {
        let navigator = RecordingNavigator::default();
        let mut session =
            SessionManager::new(Box::new(FailingStore), Box::new(navigator.clone()));

        let result = session.login(make_token(future_exp()), Role::Student);

        assert!(result.is_err());
        // Memory still reflects the login so the UI stays usable.
        assert!(session.is_authenticated());
    }
}
