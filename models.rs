use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Note text of the observation written when a new hike is saved with a photo.
pub const COVER_PHOTO_NOTE: &str = "Cover Photo";
/// Note text of the observation written when an edited hike gets a new photo.
pub const PHOTO_UPDATED_NOTE: &str = "Photo Updated";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized difficulty `{0}`")]
pub struct UnknownDifficulty(pub String);

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownDifficulty(s.to_string()))
    }
}

impl ToSql for Difficulty {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

/// Unrecognised text reads as the default rather than failing the whole row.
impl FromSql for Difficulty {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Null => Ok(Difficulty::default()),
            other => Ok(other.as_str()?.parse::<Difficulty>().unwrap_or_else(|err: UnknownDifficulty| {
                log::warn!("{err}; reading as {}", Difficulty::default());
                Difficulty::default()
            })),
        }
    }
}

/// Persisted text for the parking flag.
pub fn parking_to_text(parking: bool) -> &'static str {
    if parking {
        "Yes"
    } else {
        "No"
    }
}

/// Anything other than an exact `"Yes"` reads back as no parking.
pub fn parking_from_text(text: Option<&str>) -> bool {
    text == Some("Yes")
}

/// The seven editable fields of a hike, used for both insert and full replace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HikeFields {
    pub name: String,
    pub location: String,
    /// `DD/MM/YYYY`
    pub date: String,
    pub parking: bool,
    /// Kilometers, as entered.
    pub length: String,
    pub difficulty: Difficulty,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hike {
    pub id: i64,
    #[serde(flatten)]
    pub fields: HikeFields,
}

impl Hike {
    /// Case-insensitive substring match on name or location.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.fields.name.to_lowercase().contains(&query)
            || self.fields.location.to_lowercase().contains(&query)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewObservation {
    pub hike_id: i64,
    pub observation: String,
    pub time: String,
    pub image_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub id: i64,
    pub hike_id: i64,
    pub observation: String,
    pub time: String,
    pub image_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HikeDetail {
    pub hike: Hike,
    pub observations: Vec<Observation>,
}

/// Result of a write addressed to a single hike id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WriteOutcome {
    Applied,
    /// No row had the id. Callers treat this as success.
    NotFound,
}

impl WriteOutcome {
    pub(crate) fn from_rows(rows: usize) -> Self {
        if rows == 0 {
            WriteOutcome::NotFound
        } else {
            WriteOutcome::Applied
        }
    }
}
