//! Authentication module for managing the user session.
//!
//! This module provides:
//! - `SessionManager`: token/role lifecycle with expiry-based logout
//! - `SecureStore`: keychain-backed credential storage seam
//! - `ExpiryWatcher`: recurring background expiry check
//!
//! Credentials persist across restarts; an expired or undecodable token is
//! cleared and the UI is sent back to the login route.

pub mod session;
pub mod store;
pub mod token;
pub mod watcher;

pub use session::{Navigator, Role, SessionManager};
pub use store::{KeyringStore, MemoryStore, SecureStore};
pub use token::TokenError;
pub use watcher::ExpiryWatcher;
