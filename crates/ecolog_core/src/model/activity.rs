//! Activity domain model.
//!
//! # Responsibility
//! - Define the canonical logged eco-activity record.
//! - Enforce field-level validation shared by every write path.
//!
//! # Invariants
//! - `uuid` is stable and never reused for another activity.
//! - `name` is non-empty after trimming.
//! - `carbon_kg` is finite and strictly positive.
//! - `created_at_ms` is assigned once at creation and never changes.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable identifier for a logged activity.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type ActivityId = Uuid;

/// Fixed set of activity categories.
///
/// The variant order is canonical: chart buckets, legends and category
/// pickers all follow it, and `Ord` derives from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Travel and commuting.
    Transport,
    /// Meals and groceries.
    Food,
    /// Household consumption.
    Home,
    /// Electricity and heating.
    Energy,
}

impl Category {
    /// All categories in canonical order.
    pub const ALL: [Category; 4] = [
        Category::Transport,
        Category::Food,
        Category::Home,
        Category::Energy,
    ];
}

/// Validation error for activity field constraints.
#[derive(Debug, Clone, PartialEq)]
pub enum ActivityValidationError {
    /// The nil UUID is reserved and never a valid identity.
    NilUuid,
    /// `name` is empty or whitespace-only.
    EmptyName,
    /// `carbon_kg` is NaN or infinite.
    NonFiniteImpact(f64),
    /// `carbon_kg` is zero or negative.
    NonPositiveImpact(f64),
}

impl Display for ActivityValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilUuid => write!(f, "activity uuid must not be nil"),
            Self::EmptyName => write!(f, "activity name must not be empty"),
            Self::NonFiniteImpact(value) => {
                write!(f, "carbon impact must be finite, got {value}")
            }
            Self::NonPositiveImpact(value) => {
                write!(f, "carbon impact must be positive, got {value}")
            }
        }
    }
}

impl Error for ActivityValidationError {}

/// Canonical record for one logged eco-activity.
///
/// Records are immutable once persisted: there is no update operation, only
/// creation and removal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Stable global ID used for identity and removal.
    pub uuid: ActivityId,
    /// User-provided display name.
    pub name: String,
    /// One of the four fixed categories.
    pub category: Category,
    /// Estimated impact in kilograms CO2-equivalent.
    pub carbon_kg: f64,
    /// Creation time in Unix epoch milliseconds, assigned by `new`.
    pub created_at_ms: i64,
}

impl Activity {
    /// Creates a new activity with a generated stable ID and the current
    /// wall-clock creation time.
    ///
    /// # Errors
    /// - `EmptyName` when `name` is empty after trimming.
    /// - `NonFiniteImpact` / `NonPositiveImpact` for invalid impact values.
    pub fn new(
        name: impl Into<String>,
        category: Category,
        carbon_kg: f64,
    ) -> Result<Self, ActivityValidationError> {
        Self::with_parts(Uuid::new_v4(), name, category, carbon_kg, now_epoch_ms())
    }

    /// Creates an activity from explicit parts.
    ///
    /// Used by the persistence read path and by tests that need fixed
    /// identities or timestamps. Runs the same validation as `new`.
    pub fn with_parts(
        uuid: ActivityId,
        name: impl Into<String>,
        category: Category,
        carbon_kg: f64,
        created_at_ms: i64,
    ) -> Result<Self, ActivityValidationError> {
        let activity = Self {
            uuid,
            name: name.into(),
            category,
            carbon_kg,
            created_at_ms,
        };
        activity.validate()?;
        Ok(activity)
    }

    /// Checks all field-level invariants.
    ///
    /// Write paths must call this before persisting; read paths call it when
    /// reconstructing rows so corrupt storage is rejected instead of masked.
    pub fn validate(&self) -> Result<(), ActivityValidationError> {
        if self.uuid.is_nil() {
            return Err(ActivityValidationError::NilUuid);
        }
        if self.name.trim().is_empty() {
            return Err(ActivityValidationError::EmptyName);
        }
        if !self.carbon_kg.is_finite() {
            return Err(ActivityValidationError::NonFiniteImpact(self.carbon_kg));
        }
        if self.carbon_kg <= 0.0 {
            return Err(ActivityValidationError::NonPositiveImpact(self.carbon_kg));
        }
        Ok(())
    }
}

/// Current wall-clock time in Unix epoch milliseconds.
///
/// A clock before the Unix epoch collapses to 0; the store only relies on
/// values being non-decreasing under its single-writer model.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as i64)
}
