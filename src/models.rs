use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Gym,
    #[serde(alias = "gita")]
    Scripture,
    Both,
}

impl ActivityType {
    pub fn includes_gym(self) -> bool {
        matches!(self, ActivityType::Gym | ActivityType::Both)
    }

    pub fn includes_scripture(self) -> bool {
        matches!(self, ActivityType::Scripture | ActivityType::Both)
    }
}

/// One recorded activity. Entries are never edited once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: String,
    pub date: NaiveDate,
    pub activity_type: ActivityType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gym_type: Option<String>,
    #[serde(
        default,
        alias = "slokaNumber",
        deserialize_with = "verse_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub verse_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Payload for `ActivityStore::add_activity`; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewActivity {
    pub date: NaiveDate,
    pub activity_type: ActivityType,
    pub gym_type: Option<String>,
    pub verse_ref: Option<String>,
    pub notes: Option<String>,
}

impl NewActivity {
    pub fn into_entry(self, id: String) -> LogEntry {
        LogEntry {
            id,
            date: self.date,
            activity_type: self.activity_type,
            gym_type: self.gym_type,
            verse_ref: self.verse_ref,
            notes: self.notes,
        }
    }
}

// Older payloads stored the reference as a JSON number.
fn verse_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddActivityRequest {
    pub date: Option<NaiveDate>,
    pub activity_type: ActivityType,
    pub gym_type: Option<String>,
    #[serde(alias = "slokaNumber")]
    pub verse_ref: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    pub month: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Summary {
    pub total: usize,
    pub gym: usize,
    pub scripture: usize,
    pub both: usize,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ActivityMix {
    pub gym_only: usize,
    pub scripture_only: usize,
    pub both: usize,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ScriptureProgress {
    pub latest: Option<String>,
    pub chapter: u32,
    pub verse: u32,
    pub chapters_total: u32,
    pub percent: f64,
    pub sessions: usize,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse<'a> {
    pub date: String,
    pub streak: u32,
    pub streak_message: &'static str,
    pub summary: Summary,
    pub mix: ActivityMix,
    pub progress: ScriptureProgress,
    pub recent: Vec<&'a LogEntry>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct MonthlyPoint {
    pub month: String,
    pub label: String,
    pub gym: usize,
    pub scripture: usize,
    pub both: usize,
    pub total: usize,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct GymTypePoint {
    pub name: String,
    pub value: usize,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub summary: Summary,
    pub monthly: Vec<MonthlyPoint>,
    pub gym_types: Vec<GymTypePoint>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: String,
    pub has_gym: bool,
    pub has_scripture: bool,
    pub is_today: bool,
}

#[derive(Debug, Serialize)]
pub struct CalendarMonth {
    pub month: String,
    pub label: String,
    pub leading_blanks: u32,
    pub days: Vec<CalendarDay>,
}
