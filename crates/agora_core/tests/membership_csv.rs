use agora_core::api::admin::{export_users, import_users};
use agora_core::db::open_db_in_memory;
use agora_core::repo::member_repo::{MemberRepository, SqliteMemberRepository};
use agora_core::{CsvReportEnvelope, Upload};
use rusqlite::Connection;

fn upload(text: &str) -> Upload {
    Upload::new("users.csv", text.as_bytes().to_vec())
}

fn messages(encoded: &str) -> Vec<String> {
    serde_json::from_str(encoded).unwrap()
}

fn member_count(conn: &Connection) -> u64 {
    SqliteMemberRepository::new(conn).count_members().unwrap()
}

#[test]
fn valid_rows_are_imported_and_malformed_row_is_reported() {
    let mut conn = open_db_in_memory().unwrap();
    let file = upload(
        "ada,ada@example.com,2024-03-01T10:20:30Z,36,London,,,\n\
         grace,grace@example.com\n\
         onlyname\n\
         linus,linus@example.com,2023-12-24 08:00:00,,Helsinki\n",
    );

    let envelope = import_users(&mut conn, Some(&file));

    assert!(envelope.has_errors);
    assert!(!envelope.has_warnings);
    assert_eq!(
        messages(&envelope.errors),
        vec!["Line 3: insufficient values supplied."]
    );
    assert_eq!(member_count(&conn), 3);

    let repo = SqliteMemberRepository::new(&conn);
    let ada = repo.find_by_user_name("ADA").unwrap().unwrap();
    assert!(ada.is_approved);
    assert_eq!(ada.slug, "ada");
    assert_eq!(ada.age, Some(36));
    assert_eq!(ada.location.as_deref(), Some("London"));
    assert_eq!(ada.website, None);

    let roles = repo.member_roles(ada.id).unwrap();
    assert_eq!(roles.len(), 1);
    assert_eq!(roles[0].name, "Standard Members");
}

#[test]
fn duplicate_users_are_reported_per_source() {
    let mut conn = open_db_in_memory().unwrap();
    import_users(&mut conn, Some(&upload("ada,ada@example.com\n")));

    let envelope = import_users(
        &mut conn,
        Some(&upload(
            "Ada,other@example.com\n\
             grace,grace@example.com\n\
             GRACE,grace2@example.com\n",
        )),
    );

    assert_eq!(
        messages(&envelope.errors),
        vec![
            "Line 1: user already exists in forum.",
            "Line 3: user already exists in import file.",
        ]
    );
    assert_eq!(member_count(&conn), 2);
}

#[test]
fn accented_user_names_clash_regardless_of_case() {
    let mut conn = open_db_in_memory().unwrap();
    import_users(&mut conn, Some(&upload("Émile,e@example.com\n")));

    let against_forum = import_users(&mut conn, Some(&upload("émile,f@example.com\n")));
    assert_eq!(
        messages(&against_forum.errors),
        vec!["Line 1: user already exists in forum."]
    );

    let within_file = import_users(
        &mut conn,
        Some(&upload("Zoë,z@example.com\nZOË,z2@example.com\n")),
    );
    assert_eq!(
        messages(&within_file.errors),
        vec!["Line 2: user already exists in import file."]
    );
    assert_eq!(member_count(&conn), 2);

    let emile = SqliteMemberRepository::new(&conn)
        .find_by_user_name("ÉMILE")
        .unwrap()
        .unwrap();
    assert_eq!(emile.user_name, "Émile");
}

#[test]
fn missing_values_and_bad_items_name_the_line() {
    let mut conn = open_db_in_memory().unwrap();

    let envelope = import_users(
        &mut conn,
        Some(&upload(
            ",nobody@example.com\n\
             noemail,\n\
             baddate,b@example.com,yesterday\n\
             badage,c@example.com,,old\n",
        )),
    );

    assert_eq!(
        messages(&envelope.errors),
        vec![
            "Line 1: no username supplied.",
            "Line 2: no email supplied.",
            "Line 3: unable to parse create date 'yesterday'.",
            "Line 4: unable to parse age 'old'.",
        ]
    );
    assert_eq!(member_count(&conn), 0);
}

#[test]
fn empty_or_absent_upload_yields_single_bad_format_error() {
    let mut conn = open_db_in_memory().unwrap();

    for envelope in [
        import_users(&mut conn, None),
        import_users(&mut conn, Some(&upload(""))),
    ] {
        assert_eq!(
            envelope,
            CsvReportEnvelope {
                has_errors: true,
                has_warnings: false,
                warnings: "[]".to_string(),
                errors: "[\"File does not contain any users.\"]".to_string(),
            }
        );
    }
    assert_eq!(member_count(&conn), 0);
}

#[test]
fn upload_of_only_a_line_break_finds_no_users() {
    let mut conn = open_db_in_memory().unwrap();

    let envelope = import_users(&mut conn, Some(&upload("\n")));

    assert_eq!(
        messages(&envelope.errors),
        vec!["Line 1: insufficient values supplied."]
    );
}

#[test]
fn missing_starting_role_is_reported_as_general_error() {
    let mut conn = open_db_in_memory().unwrap();
    conn.execute(
        "UPDATE settings SET new_member_starting_role = 'Moderators' WHERE id = 1;",
        [],
    )
    .unwrap();

    let envelope = import_users(
        &mut conn,
        Some(&upload("ada,ada@example.com\ngrace,grace@example.com\n")),
    );

    let errors = messages(&envelope.errors);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("Unable to import users: "));
    assert!(errors[0].contains("Moderators"));
    assert_eq!(member_count(&conn), 0);
}

#[test]
fn storage_failure_mid_file_rolls_back_earlier_rows() {
    let mut conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TRIGGER freeze_grace BEFORE INSERT ON members
         WHEN NEW.user_name = 'grace'
         BEGIN
             SELECT RAISE(ABORT, 'members are frozen');
         END;",
    )
    .unwrap();

    let envelope = import_users(
        &mut conn,
        Some(&upload("ada,ada@example.com\ngrace,grace@example.com\n")),
    );

    let errors = messages(&envelope.errors);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("Unable to import users: "));
    assert!(errors[0].contains("members are frozen"));
    assert_eq!(member_count(&conn), 0);
}

#[test]
fn export_lists_members_oldest_first() {
    let mut conn = open_db_in_memory().unwrap();
    import_users(
        &mut conn,
        Some(&upload(
            "grace,grace@example.com,2024-01-02T00:00:00Z,,,,,\n\
             ada,ada@example.com,2024-01-01T00:00:00Z,36,London,https://ada.dev,,Countess\n",
        )),
    );

    let file = export_users(&mut conn).unwrap();

    assert_eq!(file.file_download_name.as_deref(), Some("MVCForumUsers.csv"));
    assert_eq!(
        file.body,
        "ada,ada@example.com,2024-01-01T00:00:00Z,36,London,https://ada.dev,,Countess\n\
         grace,grace@example.com,2024-01-02T00:00:00Z,,,,,\n"
    );
}

#[test]
fn utf8_bom_and_crlf_uploads_are_accepted() {
    let mut conn = open_db_in_memory().unwrap();
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice("zoë,zoe@example.com\r\nlinus,linus@example.com\r\n".as_bytes());

    let envelope = import_users(&mut conn, Some(&Upload::new("users.csv", bytes)));

    assert!(!envelope.has_errors);
    let zoe = SqliteMemberRepository::new(&conn)
        .find_by_user_name("zoë")
        .unwrap()
        .unwrap();
    assert_eq!(zoe.slug, "zo");
    assert_eq!(member_count(&conn), 2);
}
