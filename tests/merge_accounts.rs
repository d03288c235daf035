use probe_table::{CredentialTable, MergeError, ProbeTable};

fn with_accounts(accounts: &[(&str, &str)]) -> CredentialTable {
    let mut t = ProbeTable::new(11, 0.7).expect("valid config");
    for (k, v) in accounts {
        assert!(t.insert(k.to_string(), v.to_string()));
    }
    t
}

#[test]
fn merge_two_accounts_into_new_one() {
    let mut t = with_accounts(&[("a", "pw1"), ("b", "pw2")]);
    assert!(t.merge_accounts("a", "pw1", "b", "pw2", "c".to_string(), "pw3".to_string()));
    assert!(!t.login("a", "pw1"));
    assert!(!t.login("b", "pw2"));
    assert!(t.login("c", "pw3"));
    assert_eq!(t.len(), 1);
}

#[test]
fn merge_into_existing_third_account_fails_without_mutation() {
    let mut t = with_accounts(&[("a", "pw1"), ("b", "pw2"), ("c", "other")]);
    assert!(!t.merge_accounts("a", "pw1", "b", "pw2", "c".to_string(), "pw3".to_string()));
    assert!(t.login("a", "pw1"));
    assert!(t.login("b", "pw2"));
    assert!(t.login("c", "other"));
    assert!(!t.login("c", "pw3"));
    assert_eq!(t.len(), 3);
    assert_eq!(t.tombstones(), 0);
}

#[test]
fn merge_requires_both_accounts() {
    let mut t = with_accounts(&[("a", "pw1")]);
    assert_eq!(
        t.try_merge_accounts("a", "pw1", "b", "pw2", "c".to_string(), "pw3".to_string()),
        Err(MergeError::MissingAccount)
    );
    assert!(t.login("a", "pw1"));
    assert!(!t.contains_key("c"));
}

#[test]
fn merge_succeeds_on_existence_alone() {
    let mut t = with_accounts(&[("a", "pw1"), ("b", "pw2")]);
    assert!(t.merge_accounts("a", "typo", "b", "pw2", "c".to_string(), "pw3".to_string()));
    assert!(t.login("c", "pw3"));
    assert!(!t.contains_key("a"));
    assert!(!t.contains_key("b"));
    assert_eq!(t.len(), 1);
}

#[test]
fn merge_same_account_twice() {
    let mut t = with_accounts(&[("a", "pw1")]);
    assert!(t.merge_accounts("a", "pw1", "a", "pw1", "c".to_string(), "pw3".to_string()));
    assert!(!t.contains_key("a"));
    assert!(t.login("c", "pw3"));
    assert_eq!(t.len(), 1);
}

#[test]
fn merge_may_reuse_an_old_key() {
    let mut t = with_accounts(&[("alice", "pw1"), ("bob", "pw2")]);
    assert!(t.merge_accounts(
        "alice",
        "pw1",
        "bob",
        "pw2",
        "alice".to_string(),
        "joint".to_string()
    ));
    assert!(t.login("alice", "joint"));
    assert!(!t.contains_key("bob"));
    assert_eq!(t.len(), 1);
}

#[test]
fn merged_key_is_a_normal_entry() {
    let mut t = with_accounts(&[("a", "pw1"), ("b", "pw2")]);
    assert!(t.merge_accounts("a", "pw1", "b", "pw2", "c".to_string(), "pw3".to_string()));
    assert!(!t.insert("c".to_string(), "again".to_string()));
    assert!(t.insert("a".to_string(), "fresh".to_string()));
    assert!(t.delete("c"));
    assert!(t.login("a", "fresh"));
}
