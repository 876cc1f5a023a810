use std::path::Path;

use super::{CredentialError, UserStore};
use tempfile::tempdir;

// bcrypt's minimum cost keeps the suite fast
const TEST_COST: u32 = 4;

fn open_store(path: &Path) -> UserStore {
    UserStore::open(path).unwrap().with_hash_cost(TEST_COST)
}

#[test]
fn test_register_then_login() {
    let tmp = tempdir().unwrap();
    let store = open_store(tmp.path());

    let created = store.register("alice", "s3cret").unwrap();
    assert_eq!(created.username, "alice");
    assert_ne!(created.password_hash, "s3cret");
    assert_eq!(store.len(), 1);

    let logged_in = store.login("alice", "s3cret").unwrap();
    assert_eq!(logged_in, created);
}

#[test]
fn test_duplicate_username_conflicts() {
    let tmp = tempdir().unwrap();
    let store = open_store(tmp.path());

    let first = store.register("alice", "one").unwrap();
    let err = store.register("alice", "two").unwrap_err();
    assert!(matches!(err, CredentialError::Conflict(ref name) if name == "alice"));

    // the original record is untouched
    assert_eq!(store.login("alice", "one").unwrap(), first);
    assert_eq!(store.len(), 1);
}

#[test]
fn test_unknown_user_is_not_found() {
    let tmp = tempdir().unwrap();
    let store = open_store(tmp.path());

    let err = store.login("ghost", "whatever").unwrap_err();
    assert!(matches!(err, CredentialError::NotFound(_)));
}

#[test]
fn test_wrong_password_is_rejected() {
    let tmp = tempdir().unwrap();
    let store = open_store(tmp.path());
    store.register("bob", "right").unwrap();

    let err = store.login("bob", "wrong").unwrap_err();
    assert!(matches!(err, CredentialError::InvalidPassword));
}

#[test]
fn test_same_password_gets_distinct_hashes() {
    let tmp = tempdir().unwrap();
    let store = open_store(tmp.path());

    let a = store.register("a", "shared").unwrap();
    let b = store.register("b", "shared").unwrap();
    assert_ne!(a.password_hash, b.password_hash);
    assert_ne!(a.id, b.id);

    // each hash carries its own salt and still verifies the shared password
    assert!(bcrypt::verify("shared", &a.password_hash).unwrap());
    assert!(bcrypt::verify("shared", &b.password_hash).unwrap());
}

#[test]
fn test_stored_hash_is_bcrypt_with_configured_cost() {
    let tmp = tempdir().unwrap();
    let store = open_store(tmp.path());

    let record = store.register("erin", "pw").unwrap();
    let parts: bcrypt::HashParts = record.password_hash.parse().unwrap();
    assert_eq!(parts.get_cost(), TEST_COST);
    assert!(!bcrypt::verify("other", &record.password_hash).unwrap());
}

#[test]
fn test_empty_credentials_are_rejected() {
    let tmp = tempdir().unwrap();
    let store = open_store(tmp.path());

    assert!(matches!(
        store.register("  ", "pw").unwrap_err(),
        CredentialError::Validation(_)
    ));
    assert!(matches!(
        store.register("carol", "").unwrap_err(),
        CredentialError::Validation(_)
    ));
    assert!(store.is_empty());
}

#[test]
fn test_users_survive_reopen() {
    let tmp = tempdir().unwrap();
    {
        let store = open_store(tmp.path());
        store.register("dave", "pw").unwrap();
    }

    let reopened = open_store(tmp.path());
    assert_eq!(reopened.login("dave", "pw").unwrap().username, "dave");
}
