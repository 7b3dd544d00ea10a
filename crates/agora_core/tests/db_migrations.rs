use agora_core::db::migrations::latest_version;
use agora_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_schema_and_seed() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    for table in [
        "members",
        "roles",
        "member_roles",
        "categories",
        "category_permissions",
        "topics",
        "posts",
        "badges",
        "activities",
        "languages",
        "resource_keys",
        "resource_values",
        "settings",
    ] {
        assert_table_exists(&conn, table);
    }

    let roles: Vec<String> = conn
        .prepare("SELECT name FROM roles ORDER BY name;")
        .unwrap()
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(roles, vec!["Admin", "Guest", "Standard Members"]);

    let starting_role: String = conn
        .query_row(
            "SELECT new_member_starting_role FROM settings WHERE id = 1;",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(starting_role, "Standard Members");
}

#[test]
fn seeded_english_strings_title_the_feeds() {
    let conn = open_db_in_memory().unwrap();

    let title: String = conn
        .query_row(
            "SELECT v.value
             FROM resource_values v
             INNER JOIN resource_keys k ON k.uuid = v.resource_key_uuid
             INNER JOIN languages l ON l.uuid = v.language_uuid
             WHERE l.culture = 'en-GB' AND k.name = 'Rss.LatestActivity.Title';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(title, "Latest Activity");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agora.sqlite3");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    let settings_rows: i64 = conn_second
        .query_row("SELECT COUNT(*) FROM settings;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(settings_rows, 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn badge_activity_without_badge_is_rejected_by_schema() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO members (uuid, user_name, user_name_key, slug, email, password_salt, is_approved, create_date)
         VALUES ('m1', 'ada', 'ada', 'ada', 'ada@example.com', 'salt', 1, 0);",
        [],
    )
    .unwrap();

    let result = conn.execute(
        "INSERT INTO activities (uuid, kind, member_uuid, badge_uuid, timestamp)
         VALUES ('a1', 'badge_awarded', 'm1', NULL, 0);",
        [],
    );
    assert!(result.is_err());
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
