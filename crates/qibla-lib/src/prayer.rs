//! Prayer schedule lookups through a [`TimingsProvider`].

use chrono::{Local, NaiveDate};
use tracing::debug;

use crate::error::{Error, Result};
use crate::geodesy::Coordinate;
use crate::provider::{TimingsData, TimingsProvider};
use crate::schedule::{format_time, PrayerSchedule, PrayerTimes};

/// Number of consecutive days returned by [`fetch_weekly`].
pub const DAYS_PER_WEEK: usize = 7;

/// Today's date on the server's local calendar.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Fetch and normalize the schedule for a single date.
pub async fn fetch_schedule(
    provider: &dyn TimingsProvider,
    location: &Coordinate,
    date: NaiveDate,
) -> Result<PrayerSchedule> {
    let data = provider.fetch_timings(location, date).await?;
    format_schedule(&data, location)
}

/// Fetch seven consecutive schedules starting at `start`, in date order.
///
/// Days are requested one after another. The first failing day aborts the
/// whole batch and its error is returned; no partial week is produced.
pub async fn fetch_weekly(
    provider: &dyn TimingsProvider,
    location: &Coordinate,
    start: NaiveDate,
) -> Result<Vec<PrayerSchedule>> {
    let mut week = Vec::with_capacity(DAYS_PER_WEEK);
    for date in start.iter_days().take(DAYS_PER_WEEK) {
        let schedule = fetch_schedule(provider, location, date).await.map_err(|e| {
            debug!(%date, error = %e, "weekly schedule aborted");
            e
        })?;
        week.push(schedule);
    }
    Ok(week)
}

/// Reshape a provider document into a [`PrayerSchedule`].
pub fn format_schedule(data: &TimingsData, location: &Coordinate) -> Result<PrayerSchedule> {
    let time = |key: &str| -> Result<String> {
        let raw = data
            .timings
            .get(key)
            .ok_or_else(|| Error::malformed(format!("timings missing '{}'", key)))?;
        format_time(raw)
    };

    let times = PrayerTimes {
        fajr: time("Fajr")?,
        sunrise: time("Sunrise")?,
        dhuhr: time("Dhuhr")?,
        asr: time("Asr")?,
        maghrib: time("Maghrib")?,
        isha: time("Isha")?,
    };

    let date = data
        .date
        .as_ref()
        .and_then(|d| d.gregorian.as_ref())
        .and_then(|g| g.date.clone())
        .ok_or_else(|| Error::malformed("missing gregorian date"))?;

    let meta = data
        .meta
        .as_ref()
        .ok_or_else(|| Error::malformed("missing meta section"))?;
    let method = meta
        .method
        .as_ref()
        .and_then(|m| m.name.clone())
        .ok_or_else(|| Error::malformed("missing calculation method name"))?;
    let timezone = meta
        .timezone
        .clone()
        .ok_or_else(|| Error::malformed("missing timezone"))?;

    Ok(PrayerSchedule {
        date,
        location: *location,
        times,
        method,
        timezone,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{sample_timings, FailureMode, FakeProvider, PROVIDER_DATE_FORMAT};

    fn new_york() -> Coordinate {
        Coordinate::new(40.7128, -74.0060).unwrap()
    }

    fn start_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 12, 28).unwrap()
    }

    #[test]
    fn format_schedule_extracts_all_fields() {
        let data = sample_timings(start_date());
        let schedule = format_schedule(&data, &new_york()).unwrap();

        assert_eq!(schedule.date, "28-12-2026");
        assert_eq!(schedule.times.fajr, "05:12");
        assert_eq!(schedule.times.sunrise, "06:41");
        assert_eq!(schedule.times.dhuhr, "11:58");
        assert_eq!(schedule.times.asr, "14:27");
        assert_eq!(schedule.times.maghrib, "16:36");
        assert_eq!(schedule.times.isha, "18:04");
        assert_eq!(schedule.method, "Islamic Society of North America (ISNA)");
        assert_eq!(schedule.timezone, "America/New_York");
        assert_eq!(schedule.location, new_york());
    }

    #[test]
    fn format_schedule_rejects_missing_timing() {
        let mut data = sample_timings(start_date());
        data.timings.remove("Asr");
        match format_schedule(&data, &new_york()) {
            Err(Error::MalformedResponse { message }) => assert!(message.contains("Asr")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn format_schedule_rejects_missing_meta() {
        let mut data = sample_timings(start_date());
        data.meta = None;
        assert!(matches!(
            format_schedule(&data, &new_york()),
            Err(Error::MalformedResponse { .. })
        ));
    }

    #[test]
    fn format_schedule_rejects_missing_date() {
        let mut data = sample_timings(start_date());
        data.date = None;
        assert!(matches!(
            format_schedule(&data, &new_york()),
            Err(Error::MalformedResponse { .. })
        ));
    }

    #[tokio::test]
    async fn fetch_schedule_requests_the_given_date() {
        let provider = FakeProvider::succeeding();
        let schedule = fetch_schedule(&provider, &new_york(), start_date())
            .await
            .unwrap();

        assert_eq!(schedule.date, "28-12-2026");
        assert_eq!(provider.requested_dates(), vec![start_date()]);
    }

    #[tokio::test]
    async fn fetch_weekly_returns_seven_ascending_days() {
        let provider = FakeProvider::succeeding();
        let week = fetch_weekly(&provider, &new_york(), start_date())
            .await
            .unwrap();

        assert_eq!(week.len(), DAYS_PER_WEEK);
        let dates: Vec<NaiveDate> = week
            .iter()
            .map(|s| NaiveDate::parse_from_str(&s.date, PROVIDER_DATE_FORMAT).unwrap())
            .collect();
        for pair in dates.windows(2) {
            assert!(pair[0] < pair[1], "dates not ascending: {:?}", dates);
        }
        // spans the year boundary
        assert_eq!(dates[0], start_date());
        assert_eq!(dates[6], NaiveDate::from_ymd_opt(2027, 1, 3).unwrap());
        assert_eq!(provider.calls(), DAYS_PER_WEEK);
    }

    #[tokio::test]
    async fn fetch_weekly_fails_whole_batch_on_single_day_failure() {
        let failing_day = start_date() + chrono::Days::new(3);
        let provider = FakeProvider::failing_on(failing_day, FailureMode::Timeout);

        let result = fetch_weekly(&provider, &new_york(), start_date()).await;

        assert!(matches!(result, Err(Error::UpstreamTimeout { .. })));
        // stops at the failing day
        assert_eq!(provider.calls(), 4);
    }

    #[tokio::test]
    async fn fetch_schedule_propagates_provider_error_kind() {
        for (mode, expected) in [
            (FailureMode::Timeout, "upstream_timeout"),
            (FailureMode::Unavailable, "upstream_unavailable"),
            (FailureMode::Declined, "upstream_declined"),
            (FailureMode::Malformed, "malformed_response"),
        ] {
            let provider = FakeProvider::failing(mode);
            let err = fetch_schedule(&provider, &new_york(), start_date())
                .await
                .unwrap_err();
            assert_eq!(err.reason(), expected);
        }
    }

    #[tokio::test]
    async fn every_time_matches_hh_mm() {
        let provider = FakeProvider::succeeding();
        let week = fetch_weekly(&provider, &new_york(), start_date())
            .await
            .unwrap();
        for schedule in &week {
            for (name, value) in schedule.times.iter() {
                let (hh, mm) = value.split_once(':').unwrap();
                assert_eq!(hh.len(), 2, "{} = {}", name, value);
                assert_eq!(mm.len(), 2, "{} = {}", name, value);
                assert!(hh.parse::<u32>().unwrap() <= 23);
                assert!(mm.parse::<u32>().unwrap() <= 59);
            }
        }
    }
}
