use socialnet_core::db::open_db_in_memory;
use socialnet_core::{
    init_status_collection, init_user_collection, load_status_updates, load_status_updates_with,
    load_users, load_users_with, LoadError, LoadOptions, OwnerPolicy, SqliteStatusRepository,
    StatusCollection,
};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_csv(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn duplicate_row_is_skipped_and_load_continues() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        &dir,
        "accounts.csv",
        "USER_ID,NAME,LASTNAME,EMAIL\n\
         u1,Jane,Doe,j@x.com\n\
         u1,Dup,User,d@x.com\n\
         u2,Sam,Roe,s@x.com\n",
    );
    let conn = open_db_in_memory().unwrap();
    let users = init_user_collection(&conn).unwrap();

    assert!(!load_users(&path, &users));

    assert_eq!(users.count().unwrap(), 2);
    assert_eq!(users.search_user("u1").unwrap().user_name, "Jane");
    assert_eq!(users.search_user("u2").unwrap().user_name, "Sam");
}

#[test]
fn duplicate_against_existing_record_keeps_rows_on_both_sides() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        &dir,
        "accounts.csv",
        "USER_ID,NAME,LASTNAME,EMAIL\n\
         u1,Ann,One,a1@x.com\n\
         u2,Bob,Two,b2@x.com\n\
         u3,Cat,Three,c3@x.com\n\
         u4,Dan,Four,d4@x.com\n\
         u5,Eve,Five,e5@x.com\n",
    );
    let conn = open_db_in_memory().unwrap();
    let users = init_user_collection(&conn).unwrap();
    users.add_user("u3", "Existing", "User", "existing@x.com");

    let report = load_users_with(&path, &users, &LoadOptions::default());

    assert_eq!(report.rows_read, 5);
    assert_eq!(report.inserted, 4);
    assert_eq!(report.duplicates, 1);
    assert!(report.aborted.is_none());
    assert!(!report.is_success());
    assert_eq!(users.search_user("u3").unwrap().user_name, "Existing");
    for id in ["u1", "u2", "u4", "u5"] {
        assert!(users.search_user(id).is_some(), "{id} should be loaded");
    }
}

#[test]
fn clean_file_loads_every_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        &dir,
        "accounts.csv",
        "anything at all, even,not,a,header\n\
         evmiles97,Eve,Miles,eve.miles@uw.edu\n\
         dave03,Dave,Jones,dave03@uw.edu\n",
    );
    let conn = open_db_in_memory().unwrap();
    let users = init_user_collection(&conn).unwrap();

    assert!(load_users(&path, &users));

    let eve = users.search_user("evmiles97").unwrap();
    assert_eq!(eve.user_last_name, "Miles");
    assert_eq!(eve.email, "eve.miles@uw.edu");
    assert_eq!(users.search_user("dave03").unwrap().user_name, "Dave");
}

#[test]
fn missing_file_fails_without_inserting() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_db_in_memory().unwrap();
    let users = init_user_collection(&conn).unwrap();

    let report = load_users_with(
        dir.path().join("missing.csv"),
        &users,
        &LoadOptions::default(),
    );

    assert!(matches!(report.aborted, Some(LoadError::FileNotFound(_))));
    assert_eq!(report.rows_read, 0);
    assert_eq!(users.count().unwrap(), 0);
}

#[test]
fn malformed_row_aborts_by_default_keeping_earlier_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        &dir,
        "accounts.csv",
        "USER_ID,NAME,LASTNAME,EMAIL\n\
         u1,Ann,One,a1@x.com\n\
         u2,Bob\n\
         u3,Cat,Three,c3@x.com\n",
    );
    let conn = open_db_in_memory().unwrap();
    let users = init_user_collection(&conn).unwrap();

    let report = load_users_with(&path, &users, &LoadOptions::default());

    assert!(matches!(
        report.aborted,
        Some(LoadError::MalformedRow { line: 3, .. })
    ));
    assert_eq!(report.inserted, 1);
    assert!(users.search_user("u1").is_some());
    assert!(users.search_user("u3").is_none());
}

#[test]
fn malformed_rows_can_be_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        &dir,
        "accounts.csv",
        "USER_ID,NAME,LASTNAME,EMAIL\n\
         u1,Ann,One,a1@x.com\n\
         u2,,Two,b2@x.com\n\
         u3,Cat,Three,c3@x.com\n",
    );
    let conn = open_db_in_memory().unwrap();
    let users = init_user_collection(&conn).unwrap();

    let report = load_users_with(&path, &users, &LoadOptions::skip_malformed());

    assert!(report.aborted.is_none());
    assert_eq!(report.malformed, 1);
    assert_eq!(report.inserted, 2);
    assert!(!report.is_success());
    assert!(users.search_user("u2").is_none());
    assert!(users.search_user("u3").is_some());
}

#[test]
fn status_load_links_owners_and_handles_quoted_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        &dir,
        "status_updates.csv",
        "STATUS_ID,USER_ID,STATUS_TEXT\n\
         evmiles97_00001,evmiles97,\"Code is finally compiling, yay\"\n\
         evmiles97_00002,evmiles97,It rained all day\n\
         evmiles97_00001,evmiles97,duplicate\n\
         dave03_00001,dave03,Sunny today\n",
    );
    let conn = open_db_in_memory().unwrap();
    let users = init_user_collection(&conn).unwrap();
    let statuses = init_status_collection(&conn).unwrap();
    users.add_user("evmiles97", "Eve", "Miles", "eve.miles@uw.edu");

    assert!(!load_status_updates(&path, &statuses, &users));

    assert_eq!(statuses.count().unwrap(), 3);
    assert_eq!(
        statuses.search_status("evmiles97_00001").unwrap().status_text,
        "Code is finally compiling, yay"
    );
    assert_eq!(users.search_user("evmiles97").unwrap().status_count, 2);
    assert_eq!(statuses.search_status("dave03_00001").unwrap().user_id, "dave03");
}

#[test]
fn status_load_with_owner_check_skips_orphans() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        &dir,
        "status_updates.csv",
        "STATUS_ID,USER_ID,STATUS_TEXT\n\
         st_1,evmiles97,hello\n\
         st_2,ghost,boo\n\
         st_3,evmiles97,bye\n",
    );
    let conn = open_db_in_memory().unwrap();
    let users = init_user_collection(&conn).unwrap();
    let statuses = StatusCollection::with_owner_policy(
        SqliteStatusRepository::try_new(&conn).unwrap(),
        OwnerPolicy::RequireExisting,
    );
    users.add_user("evmiles97", "Eve", "Miles", "eve.miles@uw.edu");

    let report =
        load_status_updates_with(&path, &statuses, &users, &LoadOptions::skip_malformed());

    assert_eq!(report.inserted, 2);
    assert_eq!(report.malformed, 1);
    assert!(statuses.search_status("st_2").is_none());
    assert!(statuses.search_status("st_3").is_some());
}

#[test]
fn header_only_file_is_a_successful_empty_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(&dir, "accounts.csv", "USER_ID,NAME,LASTNAME,EMAIL\n");
    let conn = open_db_in_memory().unwrap();
    let users = init_user_collection(&conn).unwrap();

    assert!(load_users(&path, &users));
    assert_eq!(users.count().unwrap(), 0);
}

#[test]
fn blank_first_line_is_taken_as_the_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        &dir,
        "accounts.csv",
        "\n\
         u1,Ann,One,a1@x.com\n\
         u2,Bob,Two,b2@x.com\n",
    );
    let conn = open_db_in_memory().unwrap();
    let users = init_user_collection(&conn).unwrap();

    assert!(load_users(&path, &users));
    assert_eq!(users.count().unwrap(), 2);
    assert!(users.search_user("u1").is_some());
}

#[test]
fn header_with_unbalanced_quote_does_not_swallow_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        &dir,
        "accounts.csv",
        "\"USER_ID,NAME,LASTNAME,EMAIL\n\
         u1,Ann,One,a1@x.com\n\
         u2,Bob,Two,b2@x.com\n",
    );
    let conn = open_db_in_memory().unwrap();
    let users = init_user_collection(&conn).unwrap();

    assert!(load_users(&path, &users));
    assert_eq!(users.search_user("u1").unwrap().user_name, "Ann");
    assert_eq!(users.search_user("u2").unwrap().user_name, "Bob");
}

#[test]
fn non_utf8_row_aborts_load_keeping_earlier_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("accounts.csv");
    fs::write(
        &path,
        b"USER_ID,NAME,LASTNAME,EMAIL\n\
          u1,Ann,One,a1@x.com\n\
          u2,B\xff\xfeb,Two,b2@x.com\n\
          u3,Cat,Three,c3@x.com\n",
    )
    .unwrap();
    let conn = open_db_in_memory().unwrap();
    let users = init_user_collection(&conn).unwrap();

    // Unreadable bytes abort even when malformed rows are skipped.
    let report = load_users_with(&path, &users, &LoadOptions::skip_malformed());

    assert!(matches!(report.aborted, Some(LoadError::Csv(_))));
    assert_eq!(report.rows_read, 1);
    assert_eq!(report.inserted, 1);
    assert!(users.search_user("u1").is_some());
    assert!(users.search_user("u3").is_none());
}

#[test]
fn missing_status_file_fails_without_inserting() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_db_in_memory().unwrap();
    let users = init_user_collection(&conn).unwrap();
    let statuses = init_status_collection(&conn).unwrap();

    let report = load_status_updates_with(
        dir.path().join("missing.csv"),
        &statuses,
        &users,
        &LoadOptions::default(),
    );

    assert!(matches!(report.aborted, Some(LoadError::FileNotFound(_))));
    assert_eq!(report.rows_read, 0);
    assert!(!load_status_updates(dir.path().join("missing.csv"), &statuses, &users));
    assert_eq!(statuses.count().unwrap(), 0);
}
