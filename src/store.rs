//! The activity log and every derivation over it.
//!
//! Derivations recompute from the full collection on each call; nothing is
//! cached.

use crate::clock::Clock;
use crate::models::{ActivityType, LogEntry, NewActivity};
use crate::storage::{load_entries, persist_entries, LogStorage, StorageError};
use crate::verse::VerseRef;
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashSet};
use tracing::{error, info};

/// Bucket for gym entries without a type label.
pub const OTHER_GYM_TYPE: &str = "Other";

pub struct ActivityStore {
    entries: Vec<LogEntry>,
    storage: Box<dyn LogStorage>,
    clock: Box<dyn Clock>,
    last_id: i64,
}

impl ActivityStore {
    /// Loads the collection once from `storage`. An absent or unparsable
    /// payload starts an empty log.
    pub fn open(storage: impl LogStorage + 'static, clock: impl Clock + 'static) -> Self {
        let entries = load_entries(&storage);
        let last_id = entries
            .iter()
            .filter_map(|entry| entry.id.parse::<i64>().ok())
            .max()
            .unwrap_or(i64::MIN);

        Self {
            entries,
            storage: Box::new(storage),
            clock: Box::new(clock),
            last_id,
        }
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Appends the activity under a fresh id and rewrites the whole
    /// collection. The store does not validate the payload.
    ///
    /// On a write failure the entry stays in memory and the error is
    /// returned.
    pub fn add_activity(&mut self, activity: NewActivity) -> Result<LogEntry, StorageError> {
        let id = self.next_id();
        let entry = activity.into_entry(id);
        self.entries.push(entry.clone());

        if let Err(err) = persist_entries(self.storage.as_ref(), &self.entries) {
            error!(id = %entry.id, "failed to persist activity log: {err}");
            return Err(err);
        }

        info!(id = %entry.id, date = %entry.date, kind = ?entry.activity_type, "activity logged");
        Ok(entry)
    }

    // Millisecond timestamp, bumped past anything already issued.
    fn next_id(&mut self) -> String {
        let now = self.clock.timestamp_millis();
        let id = if now > self.last_id { now } else { self.last_id.saturating_add(1) };
        self.last_id = id;
        id.to_string()
    }

    pub fn streak(&self) -> u32 {
        self.streak_on(self.clock.today())
    }

    /// Consecutive days with at least one entry, counting back from
    /// `today`, or from yesterday when today has nothing logged yet.
    pub fn streak_on(&self, today: NaiveDate) -> u32 {
        let days: HashSet<NaiveDate> = self.entries.iter().map(|entry| entry.date).collect();

        let mut cursor = if days.contains(&today) {
            today
        } else {
            match today.pred_opt() {
                Some(yesterday) if days.contains(&yesterday) => yesterday,
                _ => return 0,
            }
        };

        let mut streak = 0;
        while days.contains(&cursor) {
            streak += 1;
            match cursor.pred_opt() {
                Some(previous) => cursor = previous,
                None => break,
            }
        }
        streak
    }

    pub fn gym_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.activity_type.includes_gym()).count()
    }

    pub fn scripture_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.activity_type.includes_scripture())
            .count()
    }

    pub fn both_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.activity_type == ActivityType::Both)
            .count()
    }

    /// The `n` most recent entries by date. Entries sharing a date keep
    /// their insertion order, but callers should not rely on that.
    pub fn recent_activities(&self, n: usize) -> Vec<&LogEntry> {
        let mut sorted: Vec<&LogEntry> = self.entries.iter().collect();
        sorted.sort_by(|a, b| b.date.cmp(&a.date));
        sorted.truncate(n);
        sorted
    }

    /// Text of the greatest verse reference among scripture entries.
    /// References that fail to parse are skipped. When several entries tie
    /// for the maximum, the one inserted last wins.
    pub fn latest_verse_ref(&self) -> Option<&str> {
        self.entries
            .iter()
            .filter(|entry| entry.activity_type.includes_scripture())
            .filter_map(|entry| {
                let raw = entry.verse_ref.as_deref()?;
                let parsed: VerseRef = raw.parse().ok()?;
                Some((parsed, raw))
            })
            .max_by_key(|(parsed, _)| *parsed)
            .map(|(_, raw)| raw)
    }

    /// Gym entries grouped by label; unlabeled ones count as "Other".
    pub fn gym_type_distribution(&self) -> BTreeMap<String, usize> {
        let mut distribution = BTreeMap::new();
        for entry in self.entries.iter().filter(|entry| entry.activity_type.includes_gym()) {
            let label = match entry.gym_type.as_deref() {
                Some(label) if !label.is_empty() => label,
                _ => OTHER_GYM_TYPE,
            };
            *distribution.entry(label.to_string()).or_insert(0) += 1;
        }
        distribution
    }
}
