use crate::models::{
    ActivityMix, ActivityType, CalendarDay, CalendarMonth, DashboardResponse, GymTypePoint,
    LogEntry, MonthlyPoint, ScriptureProgress, StatsResponse, Summary,
};
use crate::store::ActivityStore;
use crate::verse::VerseRef;
use chrono::{Datelike, NaiveDate};
use std::collections::{BTreeMap, HashMap};

pub const RECENT_LIMIT: usize = 5;
pub const SCRIPTURE_CHAPTERS: u32 = 18;

pub fn build_dashboard(store: &ActivityStore) -> DashboardResponse<'_> {
    let streak = store.streak();
    DashboardResponse {
        date: store.today().to_string(),
        streak,
        streak_message: streak_message(streak),
        summary: summary(store),
        mix: activity_mix(store),
        progress: scripture_progress(store),
        recent: store.recent_activities(RECENT_LIMIT),
    }
}

pub fn build_stats(store: &ActivityStore) -> StatsResponse {
    StatsResponse {
        summary: summary(store),
        monthly: monthly_breakdown(store.entries()),
        gym_types: gym_type_points(store),
    }
}

pub fn summary(store: &ActivityStore) -> Summary {
    Summary {
        total: store.len(),
        gym: store.gym_count(),
        scripture: store.scripture_count(),
        both: store.both_count(),
    }
}

pub fn activity_mix(store: &ActivityStore) -> ActivityMix {
    let both = store.both_count();
    ActivityMix {
        gym_only: store.gym_count() - both,
        scripture_only: store.scripture_count() - both,
        both,
    }
}

pub fn streak_message(streak: u32) -> &'static str {
    match streak {
        0 => "Start your streak today!",
        1 => "Great start! Keep the momentum.",
        2..=6 => "Building consistency! Keep going.",
        7..=29 => "Impressive discipline! You're on fire!",
        _ => "Amazing dedication! You're unstoppable!",
    }
}

/// Reading progress through the book, treating the verse as hundredths of
/// a chapter.
pub fn scripture_progress(store: &ActivityStore) -> ScriptureProgress {
    let latest = store.latest_verse_ref();
    let position = latest
        .and_then(|raw| raw.parse::<VerseRef>().ok())
        .unwrap_or(VerseRef::new(0, 0));

    let fraction = (f64::from(position.chapter) + f64::from(position.verse) / 100.0)
        / f64::from(SCRIPTURE_CHAPTERS);

    ScriptureProgress {
        latest: latest.map(str::to_string),
        chapter: position.chapter,
        verse: position.verse,
        chapters_total: SCRIPTURE_CHAPTERS,
        percent: (fraction * 100.0).min(100.0),
        sessions: store.scripture_count(),
    }
}

/// Per-month counts by exact activity type, oldest month first.
pub fn monthly_breakdown(entries: &[LogEntry]) -> Vec<MonthlyPoint> {
    let mut months: BTreeMap<(i32, u32), MonthlyPoint> = BTreeMap::new();

    for entry in entries {
        let first = month_start(entry.date);
        let point = months
            .entry((first.year(), first.month()))
            .or_insert_with(|| MonthlyPoint {
                month: month_key(first),
                label: first.format("%b %Y").to_string(),
                gym: 0,
                scripture: 0,
                both: 0,
                total: 0,
            });

        match entry.activity_type {
            ActivityType::Gym => point.gym += 1,
            ActivityType::Scripture => point.scripture += 1,
            ActivityType::Both => point.both += 1,
        }
        point.total += 1;
    }

    months.into_values().collect()
}

pub fn gym_type_points(store: &ActivityStore) -> Vec<GymTypePoint> {
    store
        .gym_type_distribution()
        .into_iter()
        .map(|(name, value)| GymTypePoint { name, value })
        .collect()
}

/// Calendar grid for one month. Returns `None` for an invalid year/month.
pub fn build_calendar(store: &ActivityStore, year: i32, month: u32) -> Option<CalendarMonth> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let today = store.today();

    let mut marks: HashMap<NaiveDate, (bool, bool)> = HashMap::new();
    for entry in store.entries() {
        if month_start(entry.date) != first {
            continue;
        }
        let mark = marks.entry(entry.date).or_default();
        mark.0 |= entry.activity_type.includes_gym();
        mark.1 |= entry.activity_type.includes_scripture();
    }

    let days = first
        .iter_days()
        .take_while(|date| date.month() == month)
        .map(|date| {
            let (has_gym, has_scripture) = marks.get(&date).copied().unwrap_or_default();
            CalendarDay {
                date: date.to_string(),
                has_gym,
                has_scripture,
                is_today: date == today,
            }
        })
        .collect();

    Some(CalendarMonth {
        month: month_key(first),
        label: first.format("%B %Y").to_string(),
        leading_blanks: first.weekday().num_days_from_sunday(),
        days,
    })
}

/// Parses `YYYY-MM`.
pub fn parse_month(raw: &str) -> Option<(i32, u32)> {
    let (year, month) = raw.trim().split_once('-')?;
    let year = year.parse().ok()?;
    let month = month.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1).map(|_| (year, month))
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::models::NewActivity;
    use crate::storage::MemoryStorage;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn store_on(today: NaiveDate) -> ActivityStore {
        ActivityStore::open(MemoryStorage::default(), FixedClock::on(today))
    }

    fn log(store: &mut ActivityStore, date: NaiveDate, activity_type: ActivityType, verse: Option<&str>) {
        store
            .add_activity(NewActivity {
                date,
                activity_type,
                gym_type: activity_type.includes_gym().then(|| "Cardio".to_string()),
                verse_ref: verse.map(str::to_string),
                notes: None,
            })
            .unwrap();
    }

    #[test]
    fn streak_messages_by_tier() {
        assert_eq!(streak_message(0), "Start your streak today!");
        assert_eq!(streak_message(1), "Great start! Keep the momentum.");
        assert_eq!(streak_message(6), "Building consistency! Keep going.");
        assert_eq!(streak_message(7), "Impressive discipline! You're on fire!");
        assert_eq!(streak_message(30), "Amazing dedication! You're unstoppable!");
    }

    #[test]
    fn mix_splits_out_both() {
        let mut store = store_on(day(2024, 2, 1));
        log(&mut store, day(2024, 2, 1), ActivityType::Gym, None);
        log(&mut store, day(2024, 2, 1), ActivityType::Both, Some("1.1"));
        log(&mut store, day(2024, 1, 31), ActivityType::Scripture, Some("1.2"));
        log(&mut store, day(2024, 1, 30), ActivityType::Scripture, Some("1.3"));

        assert_eq!(
            activity_mix(&store),
            ActivityMix {
                gym_only: 1,
                scripture_only: 2,
                both: 1
            }
        );
        assert_eq!(
            summary(&store),
            Summary {
                total: 4,
                gym: 2,
                scripture: 3,
                both: 1
            }
        );
    }

    #[test]
    fn progress_without_reading_is_zero() {
        let store = store_on(day(2024, 2, 1));
        let progress = scripture_progress(&store);
        assert_eq!(progress.latest, None);
        assert_eq!(progress.percent, 0.0);
        assert_eq!(progress.chapters_total, 18);
    }

    #[test]
    fn progress_tracks_latest_verse() {
        let mut store = store_on(day(2024, 2, 1));
        log(&mut store, day(2024, 2, 1), ActivityType::Scripture, Some("9"));
        log(&mut store, day(2024, 2, 1), ActivityType::Scripture, Some("2.50"));

        let progress = scripture_progress(&store);
        assert_eq!(progress.latest.as_deref(), Some("9"));
        assert_eq!((progress.chapter, progress.verse), (9, 0));
        assert!((progress.percent - 50.0).abs() < 1e-9);
        assert_eq!(progress.sessions, 2);

        log(&mut store, day(2024, 2, 1), ActivityType::Scripture, Some("18.78"));
        assert_eq!(scripture_progress(&store).percent, 100.0);
    }

    #[test]
    fn monthly_breakdown_is_chronological() {
        let mut store = store_on(day(2024, 2, 1));
        log(&mut store, day(2024, 2, 1), ActivityType::Gym, None);
        log(&mut store, day(2023, 12, 31), ActivityType::Both, Some("1.1"));
        log(&mut store, day(2024, 2, 14), ActivityType::Scripture, Some("1.2"));
        log(&mut store, day(2024, 2, 15), ActivityType::Both, Some("1.3"));

        let monthly = monthly_breakdown(store.entries());
        assert_eq!(
            monthly,
            vec![
                MonthlyPoint {
                    month: "2023-12".to_string(),
                    label: "Dec 2023".to_string(),
                    gym: 0,
                    scripture: 0,
                    both: 1,
                    total: 1,
                },
                MonthlyPoint {
                    month: "2024-02".to_string(),
                    label: "Feb 2024".to_string(),
                    gym: 1,
                    scripture: 1,
                    both: 1,
                    total: 3,
                },
            ]
        );
    }

    #[test]
    fn calendar_marks_days_in_month() {
        let mut store = store_on(day(2024, 2, 10));
        log(&mut store, day(2024, 2, 10), ActivityType::Gym, None);
        log(&mut store, day(2024, 2, 10), ActivityType::Scripture, Some("1.1"));
        log(&mut store, day(2024, 2, 12), ActivityType::Scripture, Some("1.2"));
        log(&mut store, day(2024, 3, 1), ActivityType::Both, Some("1.3"));

        let calendar = build_calendar(&store, 2024, 2).unwrap();
        assert_eq!(calendar.month, "2024-02");
        assert_eq!(calendar.label, "February 2024");
        // 2024-02-01 is a Thursday.
        assert_eq!(calendar.leading_blanks, 4);
        assert_eq!(calendar.days.len(), 29);

        let tenth = &calendar.days[9];
        assert!(tenth.has_gym && tenth.has_scripture && tenth.is_today);
        let twelfth = &calendar.days[11];
        assert!(!twelfth.has_gym && twelfth.has_scripture && !twelfth.is_today);
        assert!(calendar.days.iter().filter(|day| day.has_gym || day.has_scripture).count() == 2);
    }

    #[test]
    fn calendar_rejects_bad_month() {
        let store = store_on(day(2024, 2, 10));
        assert!(build_calendar(&store, 2024, 13).is_none());
    }

    #[test]
    fn parses_month_keys() {
        assert_eq!(parse_month("2024-02"), Some((2024, 2)));
        assert_eq!(parse_month("2024-2"), Some((2024, 2)));
        assert_eq!(parse_month("2024-13"), None);
        assert_eq!(parse_month("February"), None);
    }

    #[test]
    fn dashboard_collects_views() {
        let mut store = store_on(day(2024, 2, 10));
        for offset in 0..7 {
            log(&mut store, day(2024, 2, 10 - offset), ActivityType::Both, Some("2.1"));
        }

        let dashboard = build_dashboard(&store);
        assert_eq!(dashboard.date, "2024-02-10");
        assert_eq!(dashboard.streak, 7);
        assert_eq!(dashboard.streak_message, "Impressive discipline! You're on fire!");
        assert_eq!(dashboard.recent.len(), RECENT_LIMIT);
        assert_eq!(dashboard.recent[0].date, day(2024, 2, 10));
        assert_eq!(dashboard.summary.both, 7);
    }

    #[test]
    fn stats_lists_gym_types_by_name() {
        let mut store = store_on(day(2024, 2, 10));
        store
            .add_activity(NewActivity {
                date: day(2024, 2, 10),
                activity_type: ActivityType::Gym,
                gym_type: Some("Yoga".to_string()),
                verse_ref: None,
                notes: None,
            })
            .unwrap();
        log(&mut store, day(2024, 2, 9), ActivityType::Gym, None);

        let stats = build_stats(&store);
        let names: Vec<_> = stats.gym_types.iter().map(|point| point.name.as_str()).collect();
        assert_eq!(names, vec!["Cardio", "Yoga"]);
        assert_eq!(stats.summary.total, 2);
    }
}
