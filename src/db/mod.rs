//! Database layer (Firestore, with an in-process store for tests and local runs).

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryStore;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const SUBSCRIPTIONS: &str = "subscriptions";
    /// Password hashes, keyed by user ID
    pub const CREDENTIALS: &str = "credentials";
    /// One document per registered email, created before the account
    pub const EMAILS: &str = "emails";
    pub const ACCESS_LOGS: &str = "site_access_logs";
}
