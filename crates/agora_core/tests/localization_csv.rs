use agora_core::api::admin::{export_language, import_language, languages};
use agora_core::db::open_db_in_memory;
use agora_core::repo::localization_repo::{LocalizationRepository, SqliteLocalizationRepository};
use agora_core::Upload;
use rusqlite::Connection;

fn upload(text: &str) -> Upload {
    Upload::new("language.csv", text.as_bytes().to_vec())
}

fn messages(encoded: &str) -> Vec<String> {
    serde_json::from_str(encoded).unwrap()
}

fn value_of(conn: &Connection, culture: &str, key: &str) -> Option<String> {
    let repo = SqliteLocalizationRepository::new(conn);
    let language = repo.get_language_by_culture(culture).unwrap()?;
    repo.resource_value(language.id, key).unwrap()
}

#[test]
fn import_creates_language_and_keys_on_demand() {
    let mut conn = open_db_in_memory().unwrap();

    let envelope = import_language(
        &mut conn,
        "fr-FR",
        Some(&upload(
            "Rss.LatestActivity.Title,Activité récente\n\
             Forum.Greeting,Bonjour, et bienvenue\n",
        )),
    );

    assert!(!envelope.has_errors);
    assert!(envelope.has_warnings);
    assert_eq!(
        messages(&envelope.warnings),
        vec![
            "A new key named 'Forum.Greeting' has been created, and will require a value in all languages."
        ]
    );
    assert_eq!(
        value_of(&conn, "fr-FR", "Rss.LatestActivity.Title").as_deref(),
        Some("Activité récente")
    );
    assert_eq!(
        value_of(&conn, "fr-FR", "Forum.Greeting").as_deref(),
        Some("Bonjour, et bienvenue")
    );
    assert_eq!(value_of(&conn, "en-GB", "Forum.Greeting"), None);

    let french = SqliteLocalizationRepository::new(&conn)
        .get_language_by_culture("fr-fr")
        .unwrap()
        .unwrap();
    assert_eq!(french.culture, "fr-FR");
    assert_eq!(french.name, "French (France)");
}

#[test]
fn unknown_culture_stops_before_any_line() {
    let mut conn = open_db_in_memory().unwrap();

    let envelope = import_language(&mut conn, "xx-YY", Some(&upload("Key,Value\n")));

    assert_eq!(
        messages(&envelope.errors),
        vec!["The language culture 'xx-YY' does not exist."]
    );
    let keys: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM resource_keys WHERE name = 'Key';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(keys, 0);
}

#[test]
fn lines_without_comma_are_reported_and_empty_keys_skipped() {
    let mut conn = open_db_in_memory().unwrap();

    let envelope = import_language(
        &mut conn,
        "en-GB",
        Some(&upload(
            "Activity.Badge,medal\n\
             no comma here\n\
             ,orphan value\n",
        )),
    );

    assert_eq!(
        messages(&envelope.errors),
        vec!["Line 2: a key and a value are required."]
    );
    assert!(!envelope.has_warnings);
    assert_eq!(
        value_of(&conn, "en-GB", "Activity.Badge").as_deref(),
        Some("medal")
    );
}

#[test]
fn empty_language_upload_is_bad_data_format() {
    let mut conn = open_db_in_memory().unwrap();

    let envelope = import_language(&mut conn, "en-GB", None);

    assert_eq!(
        messages(&envelope.errors),
        vec!["File does not contain a language."]
    );
    assert!(!envelope.has_warnings);
}

#[test]
fn export_writes_key_value_lines_sorted_by_key() {
    let mut conn = open_db_in_memory().unwrap();
    import_language(
        &mut conn,
        "de-DE",
        Some(&upload("Zeta,letzte\nAlpha,erste, mit Komma\n")),
    );

    let file = export_language(&mut conn, "de-DE").unwrap();

    assert_eq!(file.file_download_name.as_deref(), Some("de-DE.csv"));
    assert_eq!(file.body, "Alpha,erste, mit Komma\nZeta,letzte\n");
}

#[test]
fn export_file_is_named_after_the_requested_culture() {
    let mut conn = open_db_in_memory().unwrap();

    let file = export_language(&mut conn, "en-gb").unwrap();

    assert_eq!(file.file_download_name.as_deref(), Some("en-gb.csv"));
    assert!(!file.body.is_empty());
}

#[test]
fn export_of_missing_language_returns_placeholder_body() {
    let mut conn = open_db_in_memory().unwrap();

    let file = export_language(&mut conn, "ja-JP").unwrap();

    assert_eq!(file.file_download_name, None);
    assert_eq!(file.body, "No such language");
}

#[test]
fn languages_view_lists_stored_and_catalogue_cultures() {
    let mut conn = open_db_in_memory().unwrap();
    import_language(&mut conn, "ar-SA", Some(&upload("Activity.Badge,شارة\n")));

    let view = languages(&mut conn).unwrap();

    let stored: Vec<&str> = view
        .export_languages
        .iter()
        .map(|language| language.culture.as_str())
        .collect();
    assert!(stored.contains(&"en-GB"));
    assert!(stored.contains(&"ar-SA"));
    let arabic = view
        .export_languages
        .iter()
        .find(|language| language.culture == "ar-SA")
        .unwrap();
    assert!(arabic.right_to_left);

    assert!(view.import_languages.len() > view.export_languages.len());
    assert!(view
        .import_languages
        .iter()
        .any(|culture| culture.culture == "ru-RU"));
}
