use chrono::{DateTime, Datelike, Duration, TimeZone, Timelike, Utc};
use std::str::FromStr;
use tracing::warn;

use crate::types::Schedule;

/// Compute the next UTC execution time for `schedule` starting *after* `from`.
///
/// Returns `None` when the schedule is exhausted (e.g. a `Once` job whose
/// time has already passed) or when the schedule type is not yet supported
/// (e.g. `Cron`).
pub fn compute_next_run(schedule: &Schedule, from: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match schedule {
        Schedule::Once { at } => {
            // Fire only if the instant is still in the future.
            if *at > from {
                Some(*at)
            } else {
                None
            }
        }

        Schedule::Interval { every_secs } => Some(from + Duration::seconds(*every_secs as i64)),

        Schedule::Daily { hour, minute } => {
            // Build today's candidate at HH:MM:00 UTC.
            let candidate = Utc
                .with_ymd_and_hms(
                    from.year(),
                    from.month(),
                    from.day(),
                    *hour as u32,
                    *minute as u32,
                    0,
                )
                .single()?;
            if candidate > from {
                Some(candidate)
            } else {
                // Today's window has passed — advance to tomorrow.
                Some(candidate + Duration::days(1))
            }
        }

        Schedule::Weekly { day, hour, minute } => {
            // `day` follows ISO weekday numbering: 0=Monday … 6=Sunday,
            // which matches chrono's `num_days_from_monday`.
            let today_dow = from.weekday().num_days_from_monday() as i64;
            let target_dow = (*day as i64).clamp(0, 6);
            let mut days_ahead = target_dow - today_dow;

            // Normalise: negative means the target day already passed this week.
            let candidate_day = if days_ahead < 0 {
                from + Duration::days(7 + days_ahead)
            } else {
                from + Duration::days(days_ahead)
            };

            let candidate = Utc
                .with_ymd_and_hms(
                    candidate_day.year(),
                    candidate_day.month(),
                    candidate_day.day(),
                    *hour as u32,
                    *minute as u32,
                    0,
                )
                .single()?;

            if candidate > from {
                Some(candidate)
            } else {
                // The time on the target weekday has already passed — push 7 days.
                days_ahead = if days_ahead <= 0 { 7 } else { 7 - days_ahead };
                Some(candidate + Duration::days(days_ahead))
            }
        }

        Schedule::Cron { expression } => match cron::Schedule::from_str(expression) {
            Ok(parsed) => parsed.after(&from).next(),
            Err(e) => {
                warn!(expression, error = %e, "invalid cron expression; next_run will not be set");
                None
            }
        },
    }
}

/// Convert a local-time hour to its UTC equivalent per §4.9:
/// `(local_hour - tz_offset_hours) mod 24`.
pub fn local_hour_to_utc(local_hour: u32, tz_offset_hours: i32) -> u32 {
    (((local_hour as i32 - tz_offset_hours) % 24 + 24) % 24) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn riyadh_morning_hour_converts_to_utc() {
        // 07:00 local at UTC+3 is 04:00 UTC.
        assert_eq!(local_hour_to_utc(7, 3), 4);
    }

    #[test]
    fn hour_conversion_wraps_around_midnight() {
        // 01:00 local at UTC+3 is 22:00 the previous UTC day.
        assert_eq!(local_hour_to_utc(1, 3), 22);
    }

    #[test]
    fn cron_schedule_computes_next_run() {
        // Seven-field cron crate format: sec min hour dom month dow year.
        let schedule = Schedule::Cron {
            expression: "0 0 7 * * * *".to_string(),
        };
        let from = Utc.with_ymd_and_hms(2026, 2, 11, 8, 0, 0).unwrap();
        let next = compute_next_run(&schedule, from).unwrap();
        assert_eq!(next.hour(), 7);
        assert!(next > from);
    }

    #[test]
    fn daily_schedule_advances_to_tomorrow_once_time_has_passed() {
        let schedule = Schedule::Daily { hour: 7, minute: 0 };
        let from = Utc.with_ymd_and_hms(2026, 2, 11, 8, 0, 0).unwrap();
        let next = compute_next_run(&schedule, from).unwrap();
        assert_eq!(next.day(), 12);
        assert_eq!(next.hour(), 7);
    }
}
