//! Command-line front end for the forum admin and syndication actions.
//!
//! # Responsibility
//! - Map subcommands onto `agora_core::api` actions.
//! - Read uploads from disk and write responses to stdout or `--out`.
//!
//! Failures print one line to stderr and exit non-zero. Import commands
//! always print their JSON envelope and exit zero.

use agora_core::api::{admin, home, CsvFileResult, XmlResult};
use agora_core::constants::GUEST_ROLE_NAME;
use agora_core::csv_text::{decode_upload, merge_language_lines, split_lines};
use agora_core::{default_log_level, init_logging, open_db, Upload};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Agora forum administration tool
#[derive(Parser, Debug)]
#[command(name = "agora", version, about, long_about = None)]
struct Args {
    /// SQLite database file
    #[arg(long, env = "AGORA_DB", default_value = "agora.sqlite3")]
    db: PathBuf,

    /// Directory for rotated log files; logging is off when unset
    #[arg(long, env = "AGORA_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, env = "AGORA_LOG_LEVEL")]
    log_level: Option<String>,

    /// Write the response body here instead of stdout
    #[arg(long, global = true)]
    out: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export every member as CSV
    ExportUsers,
    /// Import members from a CSV file
    ImportUsers { file: Option<PathBuf> },
    /// Export one language as key,value CSV
    ExportLanguage { culture: String },
    /// Import key,value lines into one language
    ImportLanguage {
        culture: String,
        file: Option<PathBuf>,
    },
    /// Languages available for export and import
    Languages,
    /// One page of the activity stream
    Activity {
        #[arg(long)]
        page: Option<u32>,
    },
    /// RSS of the latest topics visible to a role
    LatestRss {
        #[arg(long, default_value = GUEST_ROLE_NAME)]
        role: String,
    },
    /// RSS of the latest activity
    ActivityRss,
    /// Sitemap XML
    Sitemap {
        kind: SitemapKind,
        #[arg(long, default_value = GUEST_ROLE_NAME)]
        role: String,
    },
    /// Rewrite a language file with the keys of another, keeping known values
    MergeLanguage {
        #[arg(long)]
        source: PathBuf,
        #[arg(long)]
        target: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SitemapKind {
    Topics,
    Members,
    Categories,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Some(log_dir) = args.log_dir.as_deref() {
        let level = args.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("agora: {err}");
            return ExitCode::FAILURE;
        }
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("agora: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), String> {
    if let Command::MergeLanguage { source, target } = &args.command {
        return merge_language(source, target);
    }

    let mut conn = open_db(&args.db).map_err(|err| err.to_string())?;
    let out = args.out.as_deref();

    match &args.command {
        Command::ExportUsers => write_csv(out, admin::export_users(&mut conn)),
        Command::ImportUsers { file } => {
            let upload = read_upload(file.as_deref())?;
            write_json(out, &admin::import_users(&mut conn, upload.as_ref()))
        }
        Command::ExportLanguage { culture } => {
            write_csv(out, admin::export_language(&mut conn, culture))
        }
        Command::ImportLanguage { culture, file } => {
            let upload = read_upload(file.as_deref())?;
            write_json(
                out,
                &admin::import_language(&mut conn, culture, upload.as_ref()),
            )
        }
        Command::Languages => {
            let view = admin::languages(&mut conn).map_err(|err| err.to_string())?;
            write_json(out, &view)
        }
        Command::Activity { page } => {
            let view = home::activity(&mut conn, *page).map_err(|err| err.to_string())?;
            write_json(out, &view)
        }
        Command::LatestRss { role } => write_xml(out, home::latest_rss(&mut conn, role)),
        Command::ActivityRss => write_xml(out, home::activity_rss(&mut conn)),
        Command::Sitemap { kind, role } => {
            let result = match kind {
                SitemapKind::Topics => home::google_sitemap(&mut conn, role),
                SitemapKind::Members => home::google_member_sitemap(&mut conn),
                SitemapKind::Categories => home::google_category_sitemap(&mut conn, role),
            };
            write_xml(out, result)
        }
        Command::MergeLanguage { .. } => Ok(()),
    }
}

/// A missing path means no file was uploaded.
fn read_upload(path: Option<&Path>) -> Result<Option<Upload>, String> {
    let Some(path) = path else {
        return Ok(None);
    };
    let bytes = fs::read(path).map_err(|err| format!("cannot read `{}`: {err}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(Some(Upload::new(file_name, bytes)))
}

fn merge_language(source: &Path, target: &Path) -> Result<(), String> {
    let read_lines = |path: &Path| {
        fs::read(path)
            .map(|bytes| split_lines(&decode_upload(&bytes)))
            .map_err(|err| format!("cannot read `{}`: {err}", path.display()))
    };
    let merged = merge_language_lines(&read_lines(source)?, &read_lines(target)?);

    let mut body = merged.join("\n");
    body.push('\n');
    fs::write(target, body).map_err(|err| format!("cannot write `{}`: {err}", target.display()))?;
    info!(
        "event=language_merge module=cli status=ok lines={}",
        merged.len()
    );
    Ok(())
}

fn write_csv(
    out: Option<&Path>,
    result: agora_core::ApiResult<CsvFileResult>,
) -> Result<(), String> {
    let file = result.map_err(|err| err.to_string())?;
    match (&file.file_download_name, out) {
        (Some(name), None) => eprintln!("agora: download name {name}"),
        (None, _) => eprintln!("agora: no download available"),
        _ => {}
    }
    write_body(out, &file.body)
}

fn write_xml(out: Option<&Path>, result: agora_core::ApiResult<XmlResult>) -> Result<(), String> {
    let xml = result.map_err(|err| err.to_string())?;
    write_body(out, &xml.body)
}

fn write_json<T: Serialize>(out: Option<&Path>, value: &T) -> Result<(), String> {
    let mut body = serde_json::to_string_pretty(value).map_err(|err| err.to_string())?;
    body.push('\n');
    write_body(out, &body)
}

fn write_body(out: Option<&Path>, body: &str) -> Result<(), String> {
    match out {
        Some(path) => {
            fs::write(path, body).map_err(|err| format!("cannot write `{}`: {err}", path.display()))
        }
        None => std::io::stdout()
            .write_all(body.as_bytes())
            .map_err(|err| err.to_string()),
    }
}
