//! The `persistence` module holds the credential store.
//!
//! Users are kept in an embedded `sled` database. The broadcast hub never
//! touches it; it backs the `register` and `login` commands only.

pub mod user_store;

pub use user_store::{CredentialError, UserRecord, UserStore};

#[cfg(test)]
mod tests;
