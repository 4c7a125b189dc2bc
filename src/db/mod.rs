//! Database layer (Firestore).

pub mod firestore;

pub use firestore::{FirestoreDb, QuoteSelection};

/// Collection names as constants.
pub mod collections {
    /// Quotes keyed by date (YYYY-MM-DD)
    pub const QUOTES: &str = "quotes";
    /// Users keyed by UUID
    pub const USERS: &str = "users";
    /// Email uniqueness index (keyed by lowercased email)
    pub const USER_EMAILS: &str = "user_emails";
}
