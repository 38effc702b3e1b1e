use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use crate::domain::models::appointment::Appointment;
use crate::domain::models::business::DayHours;
use crate::domain::ports::AppointmentRepository;
use crate::error::AppError;

// Candidate starts always step on the half-hour grid; the service duration
// only decides how late a candidate may start and how much room it blocks.
pub const SLOT_STEP_MIN: i64 = 30;

#[derive(Debug, Serialize, Clone)]
pub struct Slot {
    pub time: String,
    pub datetime: DateTime<Utc>,
}

// Half-open intervals: touching boundaries do not overlap.
pub fn overlaps(a_start: DateTime<Utc>, a_end: DateTime<Utc>, b_start: DateTime<Utc>, b_end: DateTime<Utc>) -> bool {
    a_start < b_end && b_start < a_end
}

// Business-local wall clock to UTC. Nonexistent local times (DST gap) map to
// None; ambiguous ones take the earlier offset.
pub fn local_to_utc(tz: Tz, date: NaiveDate, time: NaiveTime) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

pub fn generate_slots(
    day: &DayHours,
    tz: Tz,
    date: NaiveDate,
    duration_min: i64,
    existing: &[Appointment],
) -> Vec<Slot> {
    if !day.enabled || duration_min <= 0 {
        return Vec::new();
    }

    let mut slots = Vec::new();

    if let (Ok(open), Ok(close)) = (
        NaiveTime::parse_from_str(&day.start, "%H:%M"),
        NaiveTime::parse_from_str(&day.end, "%H:%M"),
    ) {
        let open_min = (open.hour() * 60 + open.minute()) as i64;
        let close_min = (close.hour() * 60 + close.minute()) as i64;

        let mut cursor = open_min;
        while cursor + duration_min <= close_min {
            let hour = (cursor / 60) as u32;
            let minute = (cursor % 60) as u32;

            if let Some(local) = NaiveTime::from_hms_opt(hour, minute, 0)
                && let Some(slot_start) = local_to_utc(tz, date, local) {
                let slot_end = slot_start + Duration::minutes(duration_min);

                let taken = existing.iter().any(|a| {
                    a.status == "scheduled" && overlaps(slot_start, slot_end, a.start_time, a.end_time)
                });

                if !taken {
                    slots.push(Slot {
                        time: format!("{:02}:{:02}", hour, minute),
                        datetime: slot_start,
                    });
                }
            }
            cursor += SLOT_STEP_MIN;
        }
    }

    slots
}

pub async fn check_conflict(
    repo: &dyn AppointmentRepository,
    staff_id: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    exclude_id: Option<&str>,
) -> Result<bool, AppError> {
    let count = repo.count_overlapping(staff_id, start, end, exclude_id).await?;
    Ok(count > 0)
}
