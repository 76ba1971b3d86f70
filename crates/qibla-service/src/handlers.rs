//! Request handlers for the prayer times and Qibla routes.
//!
//! Every handler validates the `{lat}/{lng}` path segments before doing any
//! work, so a rejected request never reaches the prayer times provider.

use std::time::Instant;

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde::Serialize;
use tracing::{error, info, warn};

use qibla_lib::{Coordinate, Error as LibError, PrayerSchedule, QiblaResult};
use qibla_service_shared::{
    AppState, CoordinateParams, ProblemDetails, Validate, extract_or_generate_request_id,
    from_lib_error, record_qibla_calculated, record_schedules_served, record_upstream_duration,
    record_upstream_failure, record_validation_failure,
};

/// Body of the weekly route: seven schedules in ascending date order.
#[derive(Debug, Serialize)]
pub struct WeeklySchedule {
    pub week: Vec<PrayerSchedule>,
}

/// HTTP response - either success or RFC 9457 error.
#[derive(Debug)]
pub enum ApiResponse<T> {
    Success(T),
    Error(ProblemDetails),
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiResponse::Success(data) => (StatusCode::OK, Json(data)).into_response(),
            ApiResponse::Error(problem) => problem.into_response(),
        }
    }
}

/// Handle `GET /api/prayer-times/{lat}/{lng}`.
pub async fn prayer_times(
    State(state): State<AppState>,
    Path(params): Path<CoordinateParams>,
    headers: HeaderMap,
) -> ApiResponse<PrayerSchedule> {
    let request_id = extract_or_generate_request_id(&headers);
    let request_id = request_id.as_str();

    let location = match validate_location(&params, request_id, "prayer_times") {
        Ok(location) => location,
        Err(problem) => return ApiResponse::Error(problem),
    };

    let start = Instant::now();
    let result = qibla_lib::fetch_schedule(state.provider(), &location, qibla_lib::today()).await;
    record_upstream_duration("daily", start.elapsed());

    match result {
        Ok(schedule) => {
            record_schedules_served("daily", 1);
            info!(
                request_id,
                latitude = location.latitude(),
                longitude = location.longitude(),
                date = %schedule.date,
                "prayer schedule served"
            );
            ApiResponse::Success(schedule)
        }
        Err(e) => ApiResponse::Error(upstream_problem(&e, &location, request_id, "daily")),
    }
}

/// Handle `GET /api/prayer-times/{lat}/{lng}/weekly`.
///
/// Any failing day fails the whole request with that day's error.
pub async fn weekly_prayer_times(
    State(state): State<AppState>,
    Path(params): Path<CoordinateParams>,
    headers: HeaderMap,
) -> ApiResponse<WeeklySchedule> {
    let request_id = extract_or_generate_request_id(&headers);
    let request_id = request_id.as_str();

    let location = match validate_location(&params, request_id, "weekly") {
        Ok(location) => location,
        Err(problem) => return ApiResponse::Error(problem),
    };

    let start = Instant::now();
    let result = qibla_lib::fetch_weekly(state.provider(), &location, qibla_lib::today()).await;
    record_upstream_duration("weekly", start.elapsed());

    match result {
        Ok(week) => {
            record_schedules_served("weekly", week.len());
            info!(
                request_id,
                latitude = location.latitude(),
                longitude = location.longitude(),
                days = week.len(),
                "weekly prayer schedule served"
            );
            ApiResponse::Success(WeeklySchedule { week })
        }
        Err(e) => ApiResponse::Error(upstream_problem(&e, &location, request_id, "weekly")),
    }
}

/// Handle `GET /api/qibla/{lat}/{lng}`.
pub async fn qibla(
    Path(params): Path<CoordinateParams>,
    headers: HeaderMap,
) -> ApiResponse<QiblaResult> {
    let request_id = extract_or_generate_request_id(&headers);
    let request_id = request_id.as_str();

    let location = match validate_location(&params, request_id, "qibla") {
        Ok(location) => location,
        Err(problem) => return ApiResponse::Error(problem),
    };

    let result = QiblaResult::for_location(location);
    record_qibla_calculated();

    info!(
        request_id,
        latitude = location.latitude(),
        longitude = location.longitude(),
        qibla_direction = result.qibla_direction,
        distance_km = result.distance_km,
        "qibla direction calculated"
    );

    ApiResponse::Success(result)
}

fn validate_location(
    params: &CoordinateParams,
    request_id: &str,
    endpoint: &'static str,
) -> Result<Coordinate, ProblemDetails> {
    params.validate(request_id).map_err(|problem| {
        record_validation_failure(endpoint, problem.status);
        warn!(
            request_id,
            endpoint,
            lat = %params.lat,
            lng = %params.lng,
            status = problem.status,
            "coordinates rejected"
        );
        *problem
    })
}

/// Log the full library error and map it to the caller-facing problem.
fn upstream_problem(
    error: &LibError,
    location: &Coordinate,
    request_id: &str,
    range: &'static str,
) -> ProblemDetails {
    record_upstream_failure(error.reason());
    error!(
        request_id,
        range,
        latitude = location.latitude(),
        longitude = location.longitude(),
        reason = error.reason(),
        retryable = error.is_retryable(),
        error = %error,
        "prayer times lookup failed"
    );
    from_lib_error(error, request_id)
}
