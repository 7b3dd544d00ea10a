use agora_core::db::{open_db_in_memory, DbError, DbResult};
use agora_core::service::import_service::run_import;
use agora_core::{CsvErrorWarningType, CsvReport, ImportKind, UnitOfWork, Upload};
use rusqlite::Connection;
use std::cell::Cell;
use std::rc::Rc;

#[derive(Default)]
struct Settled {
    commits: Cell<u32>,
    rollbacks: Cell<u32>,
}

struct RecordingUnitOfWork {
    conn: Connection,
    settled: Rc<Settled>,
    fail_commit: bool,
}

impl RecordingUnitOfWork {
    fn new(settled: &Rc<Settled>) -> Self {
        Self {
            conn: open_db_in_memory().unwrap(),
            settled: Rc::clone(settled),
            fail_commit: false,
        }
    }
}

impl UnitOfWork for RecordingUnitOfWork {
    fn conn(&self) -> &Connection {
        &self.conn
    }

    fn commit(self) -> DbResult<()> {
        self.settled.commits.set(self.settled.commits.get() + 1);
        if self.fail_commit {
            return Err(DbError::Sqlite(rusqlite::Error::ExecuteReturnedResults));
        }
        Ok(())
    }

    fn rollback(self) -> DbResult<()> {
        self.settled.rollbacks.set(self.settled.rollbacks.get() + 1);
        Ok(())
    }
}

fn upload(text: &str) -> Upload {
    Upload::new("import.csv", text.as_bytes().to_vec())
}

#[test]
fn successful_parse_commits_once() {
    let settled = Rc::new(Settled::default());
    let seen = Cell::new(0usize);

    let report = run_import(
        RecordingUnitOfWork::new(&settled),
        ImportKind::Users,
        Some(&upload("a,b\nc,d\n")),
        |_, lines| -> Result<CsvReport, String> {
            seen.set(lines.len());
            Ok(CsvReport::new())
        },
    );

    assert!(!report.has_errors());
    assert_eq!(seen.get(), 2);
    assert_eq!(settled.commits.get(), 1);
    assert_eq!(settled.rollbacks.get(), 0);
}

#[test]
fn parser_failure_rolls_back_and_discards_partial_report() {
    let settled = Rc::new(Settled::default());

    let report = run_import(
        RecordingUnitOfWork::new(&settled),
        ImportKind::Language,
        Some(&upload("key,value\n")),
        |_, _| -> Result<CsvReport, String> { Err("disk full".to_string()) },
    );

    assert_eq!(report.errors().len(), 1);
    assert_eq!(report.errors()[0].kind, CsvErrorWarningType::GeneralError);
    assert_eq!(
        report.errors()[0].message,
        "Unable to import language: disk full"
    );
    assert!(!report.has_warnings());
    assert_eq!(settled.commits.get(), 0);
    assert_eq!(settled.rollbacks.get(), 1);
}

#[test]
fn empty_upload_rolls_back_without_parsing() {
    let settled = Rc::new(Settled::default());
    let parsed = Cell::new(false);

    let report = run_import(
        RecordingUnitOfWork::new(&settled),
        ImportKind::Users,
        Some(&Upload::new("empty.csv", Vec::new())),
        |_, _| -> Result<CsvReport, String> {
            parsed.set(true);
            Ok(CsvReport::new())
        },
    );

    assert!(!parsed.get());
    assert_eq!(report.errors()[0].kind, CsvErrorWarningType::BadDataFormat);
    assert_eq!(
        report.errors()[0].message,
        "File does not contain any users."
    );
    assert_eq!(settled.commits.get(), 0);
    assert_eq!(settled.rollbacks.get(), 1);
}

#[test]
fn commit_failure_keeps_row_findings_and_appends_general_error() {
    let settled = Rc::new(Settled::default());
    let mut uow = RecordingUnitOfWork::new(&settled);
    uow.fail_commit = true;

    let report = run_import(
        uow,
        ImportKind::Users,
        Some(&upload("onlyname\n")),
        |_, _| -> Result<CsvReport, String> {
            Ok(CsvReport::with_error(
                CsvErrorWarningType::MissingKeyOrValue,
                "Line 1: insufficient values supplied.",
            ))
        },
    );

    let messages: Vec<&str> = report
        .errors()
        .iter()
        .map(|entry| entry.message.as_str())
        .collect();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0], "Line 1: insufficient values supplied.");
    assert!(messages[1].starts_with("Unable to import users: "));
    assert_eq!(settled.commits.get(), 1);
    assert_eq!(settled.rollbacks.get(), 0);
}
