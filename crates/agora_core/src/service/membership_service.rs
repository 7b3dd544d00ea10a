//! Membership use-case service.
//!
//! # Responsibility
//! - Export every member as CSV text.
//! - Parse uploaded member lines into new approved members and report
//!   row-level problems.
//! - Allocate unique URL slugs for new members.
//!
//! # Invariants
//! - Export column order is `user_name,email,create_date,age,location,
//!   website,facebook,signature`, one `\n`-terminated line per member.
//! - A rejected row never writes anything; accepted rows are written
//!   through the caller's connection and live or die with its unit of work.
//! - User names are compared case-insensitively both against storage and
//!   within one file.

use crate::csv_text::split_fields;
use crate::model::csv_report::{CsvErrorWarningType, CsvReport};
use crate::model::member::{user_name_key, Member, Role};
use crate::model::now_epoch_ms;
use crate::repo::member_repo::MemberRepository;
use crate::repo::RepoResult;
use crate::service::{slugify, unique_slug};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use std::collections::HashSet;

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];

/// Optional profile columns following the required ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberProfile {
    pub age: Option<i32>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub facebook: Option<String>,
    pub signature: Option<String>,
}

/// Membership service facade over a member repository.
pub struct MembershipService<R: MemberRepository> {
    repo: R,
}

impl<R: MemberRepository> MembershipService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn get_all(&self) -> RepoResult<Vec<Member>> {
        self.repo.list_members()
    }

    /// Serializes every member, oldest first.
    pub fn to_csv(&self) -> RepoResult<String> {
        let mut body = String::new();
        for member in self.repo.list_members()? {
            body.push_str(&member_csv_line(&member));
            body.push('\n');
        }
        Ok(body)
    }

    /// Imports member lines, assigning `starting_role` to every new member.
    ///
    /// Row problems go to the returned report; storage failures abort with
    /// an error so the caller can roll back.
    pub fn from_csv(&self, lines: &[String], starting_role: &Role) -> RepoResult<CsvReport> {
        let mut report = CsvReport::new();
        if lines.is_empty() {
            report.add_error(CsvErrorWarningType::BadDataFormat, "No users found.");
            return Ok(report);
        }

        let mut seen_in_file = HashSet::new();
        for (index, line) in lines.iter().enumerate() {
            let line_number = index + 1;
            let values = split_fields(line);
            if values.len() < 2 {
                report.add_error(
                    CsvErrorWarningType::MissingKeyOrValue,
                    format!("Line {line_number}: insufficient values supplied."),
                );
                continue;
            }

            let user_name = values[0].trim();
            if user_name.is_empty() {
                report.add_error(
                    CsvErrorWarningType::MissingKeyOrValue,
                    format!("Line {line_number}: no username supplied."),
                );
                continue;
            }
            let email = values[1].trim();
            if email.is_empty() {
                report.add_error(
                    CsvErrorWarningType::MissingKeyOrValue,
                    format!("Line {line_number}: no email supplied."),
                );
                continue;
            }

            let name_key = user_name_key(user_name);
            if seen_in_file.contains(&name_key) {
                report.add_error(
                    CsvErrorWarningType::AlreadyExists,
                    format!("Line {line_number}: user already exists in import file."),
                );
                continue;
            }
            if self.repo.find_by_user_name(user_name)?.is_some() {
                report.add_error(
                    CsvErrorWarningType::AlreadyExists,
                    format!("Line {line_number}: user already exists in forum."),
                );
                continue;
            }

            let create_date = match optional_column(&values, 2) {
                None => now_epoch_ms(),
                Some(raw) => match parse_create_date(raw) {
                    Some(parsed) => parsed,
                    None => {
                        report.add_error(
                            CsvErrorWarningType::ItemBad,
                            format!("Line {line_number}: unable to parse create date '{raw}'."),
                        );
                        continue;
                    }
                },
            };
            let age = match optional_column(&values, 3) {
                None => None,
                Some(raw) => match raw.parse::<i32>() {
                    Ok(age) if age >= 0 => Some(age),
                    _ => {
                        report.add_error(
                            CsvErrorWarningType::ItemBad,
                            format!("Line {line_number}: unable to parse age '{raw}'."),
                        );
                        continue;
                    }
                },
            };

            let profile = MemberProfile {
                age,
                location: optional_column(&values, 4).map(str::to_string),
                website: optional_column(&values, 5).map(str::to_string),
                facebook: optional_column(&values, 6).map(str::to_string),
                signature: optional_column(&values, 7).map(str::to_string),
            };
            self.create_member(user_name, email, create_date, profile, starting_role)?;
            seen_in_file.insert(name_key);
        }

        Ok(report)
    }

    /// Creates one approved member with a fresh slug and `role`.
    pub fn create_member(
        &self,
        user_name: &str,
        email: &str,
        create_date: i64,
        profile: MemberProfile,
        role: &Role,
    ) -> RepoResult<Member> {
        let mut member = Member::new(user_name.trim(), email.trim(), create_date);
        member.is_approved = true;
        member.slug = unique_slug(&slugify(user_name, "member"), |candidate| {
            self.repo.slug_exists(candidate)
        })?;
        member.age = profile.age;
        member.location = profile.location;
        member.website = profile.website;
        member.facebook = profile.facebook;
        member.signature = profile.signature;

        self.repo.create_member(&member, &[role.id])?;
        Ok(member)
    }
}

/// Parses an import create date into epoch milliseconds (UTC).
pub fn parse_create_date(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.timestamp_millis());
    }
    for format in DATE_TIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed.and_utc().timestamp_millis());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(raw, format) {
            return parsed
                .and_hms_opt(0, 0, 0)
                .map(|value| value.and_utc().timestamp_millis());
        }
    }
    None
}

/// Formats epoch milliseconds as `YYYY-MM-DDTHH:MM:SSZ`.
pub fn format_export_date(epoch_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(epoch_ms)
        .map(|value| value.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default()
}

fn member_csv_line(member: &Member) -> String {
    [
        member.user_name.clone(),
        member.email.clone(),
        format_export_date(member.create_date),
        member.age.map(|age| age.to_string()).unwrap_or_default(),
        member.location.clone().unwrap_or_default(),
        member.website.clone().unwrap_or_default(),
        member.facebook.clone().unwrap_or_default(),
        member.signature.clone().unwrap_or_default(),
    ]
    .join(",")
}

fn optional_column<'a>(values: &[&'a str], index: usize) -> Option<&'a str> {
    values
        .get(index)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}
