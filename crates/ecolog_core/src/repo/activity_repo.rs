//! Activity repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable create/delete/list APIs over durable `activities` storage.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths call `Activity::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - `list_activities` orders newest first; equal timestamps break by
//!   insertion order (most recent insert first).

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::activity::{Activity, ActivityId, ActivityValidationError, Category};
use rusqlite::{params, Connection, Row};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const ACTIVITY_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    category,
    carbon_kg,
    created_at
FROM activities";

const ACTIVITIES_TABLE: &str = "activities";
const REQUIRED_COLUMNS: &[&str] = &["uuid", "name", "category", "carbon_kg", "created_at"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for activity persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ActivityValidationError),
    Db(DbError),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted activity data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} is not bootstrapped (expected {expected_version}); open it via db::open_db"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ActivityValidationError> for RepoError {
    fn from(value: ActivityValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for activity storage operations.
pub trait ActivityRepository {
    /// Persists a validated record; durable once this returns `Ok`.
    fn create_activity(&self, activity: &Activity) -> RepoResult<ActivityId>;
    /// Removes one record by ID; returns whether a row was removed.
    fn delete_activity(&self, id: ActivityId) -> RepoResult<bool>;
    /// Removes every record; returns the number of rows removed.
    fn delete_all_activities(&self) -> RepoResult<usize>;
    /// Returns all records, newest first.
    fn list_activities(&self) -> RepoResult<Vec<Activity>>;
}

/// SQLite-backed activity repository.
pub struct SqliteActivityRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteActivityRepository<'conn> {
    /// Wraps a bootstrapped connection after verifying the schema it carries.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were never applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema
    ///   does not match what this repository expects.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        verify_schema(conn)?;
        Ok(Self { conn })
    }
}

impl ActivityRepository for SqliteActivityRepository<'_> {
    fn create_activity(&self, activity: &Activity) -> RepoResult<ActivityId> {
        activity.validate()?;

        self.conn.execute(
            "INSERT INTO activities (
                uuid,
                name,
                category,
                carbon_kg,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                activity.uuid.to_string(),
                activity.name.as_str(),
                category_to_db(activity.category),
                activity.carbon_kg,
                activity.created_at_ms,
            ],
        )?;

        Ok(activity.uuid)
    }

    fn delete_activity(&self, id: ActivityId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM activities WHERE uuid = ?1;", [id.to_string()])?;

        Ok(changed > 0)
    }

    fn delete_all_activities(&self) -> RepoResult<usize> {
        let changed = self.conn.execute("DELETE FROM activities;", [])?;
        Ok(changed)
    }

    fn list_activities(&self) -> RepoResult<Vec<Activity>> {
        // rowid carries insertion order for equal timestamps.
        let mut stmt = self.conn.prepare(&format!(
            "{ACTIVITY_SELECT_SQL} ORDER BY created_at DESC, rowid DESC;"
        ))?;

        let mut rows = stmt.query([])?;
        let mut activities = Vec::new();

        while let Some(row) = rows.next()? {
            activities.push(parse_activity_row(row)?);
        }

        Ok(activities)
    }
}

fn verify_schema(conn: &Connection) -> RepoResult<()> {
    let actual_version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    if actual_version == 0 {
        return Err(RepoError::UninitializedConnection {
            expected_version: latest_version(),
            actual_version,
        });
    }

    let table_exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [ACTIVITIES_TABLE],
        |row| row.get(0),
    )?;
    if table_exists == 0 {
        return Err(RepoError::MissingRequiredTable(ACTIVITIES_TABLE));
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let present: HashSet<String> = stmt
        .query_map([ACTIVITIES_TABLE], |row| row.get(0))?
        .collect::<Result<_, _>>()?;
    for &column in REQUIRED_COLUMNS {
        if !present.contains(column) {
            return Err(RepoError::MissingRequiredColumn {
                table: ACTIVITIES_TABLE,
                column,
            });
        }
    }

    Ok(())
}

fn parse_activity_row(row: &Row<'_>) -> RepoResult<Activity> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in activities.uuid"))
    })?;

    let category_text: String = row.get("category")?;
    let category = parse_category(&category_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid category `{category_text}` in activities.category"
        ))
    })?;

    let activity = Activity {
        uuid,
        name: row.get("name")?,
        category,
        carbon_kg: row.get("carbon_kg")?,
        created_at_ms: row.get("created_at")?,
    };
    activity.validate()?;
    Ok(activity)
}

fn category_to_db(category: Category) -> &'static str {
    match category {
        Category::Transport => "transport",
        Category::Food => "food",
        Category::Home => "home",
        Category::Energy => "energy",
    }
}

fn parse_category(value: &str) -> Option<Category> {
    match value {
        "transport" => Some(Category::Transport),
        "food" => Some(Category::Food),
        "home" => Some(Category::Home),
        "energy" => Some(Category::Energy),
        _ => None,
    }
}
