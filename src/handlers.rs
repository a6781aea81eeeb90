use crate::errors::AppError;
use crate::models::{
    AddActivityRequest, CalendarMonth, CalendarQuery, LogEntry, NewActivity, RecentQuery,
    StatsResponse,
};
use crate::state::AppState;
use crate::stats::{build_calendar, build_dashboard, build_stats, parse_month, RECENT_LIMIT};
use crate::verse::VerseRef;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Datelike, NaiveDate};

pub async fn get_dashboard(State(state): State<AppState>) -> Response {
    let store = state.store.lock().await;
    Json(build_dashboard(&store)).into_response()
}

pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, AppError> {
    let store = state.store.lock().await;
    Ok(Json(build_stats(&store)))
}

pub async fn get_calendar(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<CalendarMonth>, AppError> {
    let store = state.store.lock().await;
    let (year, month) = match query.month.as_deref() {
        Some(raw) => parse_month(raw).ok_or_else(|| AppError::bad_request("month must be YYYY-MM"))?,
        None => {
            let today = store.today();
            (today.year(), today.month())
        }
    };

    build_calendar(&store, year, month)
        .map(Json)
        .ok_or_else(|| AppError::bad_request("month must be YYYY-MM"))
}

pub async fn get_recent(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> Response {
    let store = state.store.lock().await;
    let limit = query.limit.unwrap_or(RECENT_LIMIT);
    Json(store.recent_activities(limit)).into_response()
}

pub async fn add_activity(
    State(state): State<AppState>,
    Json(payload): Json<AddActivityRequest>,
) -> Result<(StatusCode, Json<LogEntry>), AppError> {
    let mut store = state.store.lock().await;
    let activity = validate_activity(payload, store.today())?;
    let entry = store.add_activity(activity)?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// Form rules: the store accepts whatever it is given, so submissions are
/// checked here. Fields that do not apply to the activity type are dropped.
pub fn validate_activity(
    request: AddActivityRequest,
    today: NaiveDate,
) -> Result<NewActivity, AppError> {
    let kind = request.activity_type;

    let gym_type = if kind.includes_gym() {
        match non_empty(request.gym_type) {
            Some(gym_type) => Some(gym_type),
            None => return Err(AppError::bad_request("Please select a gym type")),
        }
    } else {
        None
    };

    let verse_ref = if kind.includes_scripture() {
        let Some(raw) = non_empty(request.verse_ref) else {
            return Err(AppError::bad_request("Please enter a verse reference"));
        };
        if raw.parse::<VerseRef>().is_err() {
            return Err(AppError::bad_request(
                "Please enter a valid verse reference (e.g., 7 or 7.14)",
            ));
        }
        Some(raw)
    } else {
        None
    };

    Ok(NewActivity {
        date: request.date.unwrap_or(today),
        activity_type: kind,
        gym_type,
        verse_ref,
        notes: non_empty(request.notes),
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ActivityType;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()
    }

    fn request(activity_type: ActivityType) -> AddActivityRequest {
        AddActivityRequest {
            date: None,
            activity_type,
            gym_type: None,
            verse_ref: None,
            notes: None,
        }
    }

    #[test]
    fn gym_requires_gym_type() {
        let err = validate_activity(request(ActivityType::Gym), today()).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Please select a gym type");

        let blank = AddActivityRequest {
            gym_type: Some("   ".to_string()),
            ..request(ActivityType::Both)
        };
        assert!(validate_activity(blank, today()).is_err());
    }

    #[test]
    fn scripture_requires_well_formed_verse() {
        let err = validate_activity(request(ActivityType::Scripture), today()).unwrap_err();
        assert_eq!(err.message, "Please enter a verse reference");

        let bad = AddActivityRequest {
            verse_ref: Some("7.x".to_string()),
            ..request(ActivityType::Scripture)
        };
        let err = validate_activity(bad, today()).unwrap_err();
        assert_eq!(err.message, "Please enter a valid verse reference (e.g., 7 or 7.14)");
    }

    #[test]
    fn drops_fields_that_do_not_apply() {
        let mixed = AddActivityRequest {
            gym_type: Some("Yoga".to_string()),
            verse_ref: Some("2.3".to_string()),
            notes: Some("".to_string()),
            ..request(ActivityType::Gym)
        };
        let activity = validate_activity(mixed, today()).unwrap();
        assert_eq!(activity.date, today());
        assert_eq!(activity.gym_type.as_deref(), Some("Yoga"));
        assert_eq!(activity.verse_ref, None);
        assert_eq!(activity.notes, None);
    }

    #[test]
    fn keeps_both_fields_and_explicit_date() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let both = AddActivityRequest {
            date: Some(date),
            gym_type: Some("Cardio".to_string()),
            verse_ref: Some("1.1".to_string()),
            notes: Some("morning".to_string()),
            ..request(ActivityType::Both)
        };
        let activity = validate_activity(both, today()).unwrap();
        assert_eq!(activity.date, date);
        assert_eq!(activity.gym_type.as_deref(), Some("Cardio"));
        assert_eq!(activity.verse_ref.as_deref(), Some("1.1"));
        assert_eq!(activity.notes.as_deref(), Some("morning"));
    }
}
