use rusqlite::Connection;
use socialnet_core::db::migrations::latest_version;
use socialnet_core::db::open_db_in_memory;
use socialnet_core::{
    add_user, delete_user, init_user_collection, search_user, update_user, RepoError,
    SqliteUserRepository, User, UserRepository,
};

#[test]
fn add_then_search_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let users = init_user_collection(&conn).unwrap();

    assert!(add_user("dave03", "Dave", "Jones", "dave03@uw.edu", &users));

    let loaded = search_user("dave03", &users).unwrap();
    assert_eq!(loaded, User::new("dave03", "Dave", "Jones", "dave03@uw.edu"));
}

#[test]
fn adding_existing_id_fails_and_keeps_original() {
    let conn = open_db_in_memory().unwrap();
    let users = init_user_collection(&conn).unwrap();

    assert!(users.add_user("dave03", "Dave", "Jones", "dave03@uw.edu"));
    assert!(!users.add_user("dave03", "David", "Smith", "david@uw.edu"));

    let loaded = users.search_user("dave03").unwrap();
    assert_eq!(loaded.user_name, "Dave");
    assert_eq!(loaded.email, "dave03@uw.edu");
    assert_eq!(users.count().unwrap(), 1);
}

#[test]
fn modify_overwrites_only_mutable_fields() {
    let conn = open_db_in_memory().unwrap();
    let users = init_user_collection(&conn).unwrap();
    users.add_user("dave03", "Dave", "Jones", "dave03@uw.edu");

    assert!(update_user("dave03", "dj@uw.edu", "Davey", "Jones", &users));

    let loaded = users.search_user("dave03").unwrap();
    assert_eq!(loaded.user_id, "dave03");
    assert_eq!(loaded.email, "dj@uw.edu");
    assert_eq!(loaded.user_name, "Davey");
    assert_eq!(loaded.user_last_name, "Jones");
    assert_eq!(loaded.status_count, 0);
}

#[test]
fn modify_missing_user_fails() {
    let conn = open_db_in_memory().unwrap();
    let users = init_user_collection(&conn).unwrap();

    assert!(!users.modify_user("ghost", "ghost@uw.edu", "No", "Body"));
    assert!(users.search_user("ghost").is_none());
}

#[test]
fn delete_removes_user_and_missing_delete_is_a_noop() {
    let conn = open_db_in_memory().unwrap();
    let users = init_user_collection(&conn).unwrap();
    users.add_user("dave03", "Dave", "Jones", "dave03@uw.edu");
    users.add_user("evmiles97", "Eve", "Miles", "eve.miles@uw.edu");

    assert!(delete_user("dave03", &users));
    assert!(users.search_user("dave03").is_none());

    assert!(!delete_user("dave03", &users));
    assert!(!delete_user("nobody", &users));
    assert_eq!(users.count().unwrap(), 1);
}

#[test]
fn invalid_fields_are_rejected_before_reaching_the_store() {
    let conn = open_db_in_memory().unwrap();
    let users = init_user_collection(&conn).unwrap();

    assert!(!users.add_user("", "Dave", "Jones", "dave03@uw.edu"));
    assert!(!users.add_user("dave 03", "Dave", "Jones", "dave03@uw.edu"));
    assert!(!users.add_user("dave03", "Dave", "Jones", "not-an-email"));
    assert_eq!(users.count().unwrap(), 0);
}

#[test]
fn repository_reports_duplicate_key_distinctly() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();
    let user = User::new("dave03", "Dave", "Jones", "dave03@uw.edu");

    repo.insert(&user).unwrap();
    let err = repo.insert(&user).unwrap_err();
    assert!(matches!(err, RepoError::DuplicateKey(key) if key == "dave03"));

    let err = repo.delete_one("ghost").unwrap_err();
    assert!(matches!(err, RepoError::NotFound(key) if key == "ghost"));
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteUserRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_users_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteUserRepository::try_new(&conn),
        Err(RepoError::MissingRequiredTable("users"))
    ));
}
