//! Member repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist members together with their role assignments.
//! - Provide lookups used by CSV import duplicate checks and slug allocation.
//!
//! # Invariants
//! - `user_name` lookups are case-insensitive through `user_name_key`.
//! - Member listing order is `create_date ASC, user_name ASC`.

use crate::model::member::{user_name_key, Member, MemberId, Role, RoleId};
use crate::repo::{bool_to_int, parse_flag, parse_uuid, row_exists, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const MEMBER_SELECT_SQL: &str = "SELECT
    uuid,
    user_name,
    slug,
    email,
    password_salt,
    is_approved,
    create_date,
    age,
    location,
    website,
    facebook,
    signature,
    avatar
FROM members";

/// Repository interface for member persistence.
pub trait MemberRepository {
    /// Inserts a member and assigns `role_ids`.
    fn create_member(&self, member: &Member, role_ids: &[RoleId]) -> RepoResult<MemberId>;
    fn get_member(&self, id: MemberId) -> RepoResult<Option<Member>>;
    fn find_by_user_name(&self, user_name: &str) -> RepoResult<Option<Member>>;
    fn slug_exists(&self, slug: &str) -> RepoResult<bool>;
    fn list_members(&self) -> RepoResult<Vec<Member>>;
    fn count_members(&self) -> RepoResult<u64>;
    fn member_roles(&self, id: MemberId) -> RepoResult<Vec<Role>>;
}

/// SQLite-backed member repository.
pub struct SqliteMemberRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMemberRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl MemberRepository for SqliteMemberRepository<'_> {
    fn create_member(&self, member: &Member, role_ids: &[RoleId]) -> RepoResult<MemberId> {
        validate_member(member)?;

        self.conn.execute(
            "INSERT INTO members (
                uuid,
                user_name,
                user_name_key,
                slug,
                email,
                password_salt,
                is_approved,
                create_date,
                age,
                location,
                website,
                facebook,
                signature,
                avatar
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14);",
            params![
                member.id.to_string(),
                member.user_name.as_str(),
                user_name_key(&member.user_name),
                member.slug.as_str(),
                member.email.as_str(),
                member.password_salt.as_str(),
                bool_to_int(member.is_approved),
                member.create_date,
                member.age,
                member.location.as_deref(),
                member.website.as_deref(),
                member.facebook.as_deref(),
                member.signature.as_deref(),
                member.avatar.as_deref(),
            ],
        )?;

        for role_id in role_ids {
            self.conn.execute(
                "INSERT OR IGNORE INTO member_roles (member_uuid, role_uuid) VALUES (?1, ?2);",
                params![member.id.to_string(), role_id.to_string()],
            )?;
        }

        Ok(member.id)
    }

    fn get_member(&self, id: MemberId) -> RepoResult<Option<Member>> {
        load_member(self.conn, id)
    }

    fn find_by_user_name(&self, user_name: &str) -> RepoResult<Option<Member>> {
        self.conn
            .query_row(
                &format!("{MEMBER_SELECT_SQL} WHERE user_name_key = ?1;"),
                [user_name_key(user_name)],
                |row| Ok(parse_member_row(row)),
            )
            .optional()?
            .transpose()
    }

    fn slug_exists(&self, slug: &str) -> RepoResult<bool> {
        row_exists(
            self.conn,
            "SELECT EXISTS(SELECT 1 FROM members WHERE slug = ?1);",
            slug,
        )
    }

    fn list_members(&self) -> RepoResult<Vec<Member>> {
        let mut stmt = self.conn.prepare(&format!(
            "{MEMBER_SELECT_SQL} ORDER BY create_date ASC, user_name COLLATE NOCASE ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut members = Vec::new();
        while let Some(row) = rows.next()? {
            members.push(parse_member_row(row)?);
        }
        Ok(members)
    }

    fn count_members(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM members;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative member count {count}")))
    }

    fn member_roles(&self, id: MemberId) -> RepoResult<Vec<Role>> {
        let mut stmt = self.conn.prepare(
            "SELECT r.uuid, r.name
             FROM member_roles mr
             INNER JOIN roles r ON r.uuid = mr.role_uuid
             WHERE mr.member_uuid = ?1
             ORDER BY r.name COLLATE NOCASE ASC;",
        )?;
        let mut rows = stmt.query([id.to_string()])?;
        let mut roles = Vec::new();
        while let Some(row) = rows.next()? {
            let uuid_text: String = row.get(0)?;
            roles.push(Role {
                id: parse_uuid(&uuid_text, "roles.uuid")?,
                name: row.get(1)?,
            });
        }
        Ok(roles)
    }
}

/// Loads one member by id on any connection view.
pub(crate) fn load_member(conn: &Connection, id: MemberId) -> RepoResult<Option<Member>> {
    conn.query_row(
        &format!("{MEMBER_SELECT_SQL} WHERE uuid = ?1;"),
        [id.to_string()],
        |row| Ok(parse_member_row(row)),
    )
    .optional()?
    .transpose()
}

fn validate_member(member: &Member) -> RepoResult<()> {
    if member.user_name.trim().is_empty() {
        return Err(RepoError::Validation("member user name is blank".to_string()));
    }
    if member.email.trim().is_empty() {
        return Err(RepoError::Validation("member email is blank".to_string()));
    }
    if member.slug.trim().is_empty() {
        return Err(RepoError::Validation("member slug is blank".to_string()));
    }
    Ok(())
}

fn parse_member_row(row: &Row<'_>) -> RepoResult<Member> {
    let uuid_text: String = row.get("uuid")?;
    Ok(Member {
        id: parse_uuid(&uuid_text, "members.uuid")?,
        user_name: row.get("user_name")?,
        slug: row.get("slug")?,
        email: row.get("email")?,
        password_salt: row.get("password_salt")?,
        is_approved: parse_flag(row.get("is_approved")?, "members.is_approved")?,
        create_date: row.get("create_date")?,
        age: row.get("age")?,
        location: row.get("location")?,
        website: row.get("website")?,
        facebook: row.get("facebook")?,
        signature: row.get("signature")?,
        avatar: row.get("avatar")?,
    })
}
