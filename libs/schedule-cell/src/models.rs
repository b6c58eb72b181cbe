use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use shared_models::PortalError;
use shared_utils::time::parse_time_of_day;

// ==============================================================================
// CANONICAL RECORDS
// ==============================================================================

/// A doctor's announced availability block for one calendar date.
///
/// Read-only on the client. The booked-time set is backend-owned truth: it
/// goes stale the moment a concurrent booking succeeds elsewhere, and the
/// client learns about that only through a failed submission followed by a
/// re-fetch. The consistency contract is "eventually consistent on
/// user-triggered re-fetch"; local copies are never patched.
#[derive(Debug, Clone)]
pub struct DoctorSchedule {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub doctor_name: String,
    pub department: Option<String>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub booked_times: BTreeSet<NaiveTime>,
    pub is_available: bool,
}

impl DoctorSchedule {
    /// Bookable slot starts for this window.
    pub fn open_slots(&self) -> Vec<NaiveTime> {
        crate::services::slots::compute_slots(self.start_time, self.end_time, &self.booked_times)
    }

    pub fn has_open_slot(&self) -> bool {
        crate::services::slots::has_available_slots(self)
    }
}

/// Canonical doctor record. The backend emits the display name either flat
/// (`doctorName`) or split/nested; normalization happens once, at the wire
/// boundary, and the rest of the system consumes only this shape.
#[derive(Debug, Clone)]
pub struct Doctor {
    pub id: Uuid,
    pub name: String,
    pub department: Option<String>,
    pub is_available: bool,
}

// ==============================================================================
// LISTING FILTERS
// ==============================================================================

/// User-facing filters over a fetched schedule listing. Applied in memory as
/// a simple predicate conjunction.
#[derive(Debug, Clone, Default)]
pub struct ScheduleFilter {
    pub text: Option<String>,
    pub date: Option<NaiveDate>,
    pub department: Option<String>,
}

impl ScheduleFilter {
    pub fn matches(&self, schedule: &DoctorSchedule) -> bool {
        if let Some(date) = self.date {
            if schedule.date != date {
                return false;
            }
        }

        if let Some(department) = &self.department {
            match &schedule.department {
                Some(have) if have.eq_ignore_ascii_case(department) => {}
                _ => return false,
            }
        }

        if let Some(text) = &self.text {
            let needle = text.to_lowercase();
            let in_name = schedule.doctor_name.to_lowercase().contains(&needle);
            let in_department = schedule
                .department
                .as_ref()
                .map(|d| d.to_lowercase().contains(&needle))
                .unwrap_or(false);
            if !in_name && !in_department {
                return false;
            }
        }

        true
    }
}

// ==============================================================================
// WIRE SHAPES
// ==============================================================================

// The backend speaks camelCase JSON, with snake_case stragglers on older
// endpoints and a doctor name that may arrive flat or nested. These records
// absorb every observed shape; the canonical types above are what the rest
// of the client sees.

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleRecord {
    id: Uuid,
    #[serde(alias = "doctor_id")]
    doctor_id: Uuid,
    #[serde(default, alias = "doctor_name")]
    doctor_name: Option<String>,
    #[serde(default)]
    doctor: Option<DoctorRef>,
    #[serde(default)]
    department: Option<String>,
    date: NaiveDate,
    #[serde(alias = "start_time")]
    start_time: String,
    #[serde(alias = "end_time")]
    end_time: String,
    #[serde(default, alias = "booked_times")]
    booked_times: Vec<String>,
    #[serde(default = "default_available", alias = "is_available")]
    is_available: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DoctorRef {
    #[serde(default, alias = "first_name")]
    first_name: Option<String>,
    #[serde(default, alias = "last_name")]
    last_name: Option<String>,
    #[serde(default)]
    department: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DoctorRecord {
    id: Uuid,
    #[serde(default, alias = "doctor_name", alias = "name")]
    doctor_name: Option<String>,
    #[serde(default, alias = "first_name")]
    first_name: Option<String>,
    #[serde(default, alias = "last_name")]
    last_name: Option<String>,
    #[serde(default)]
    department: Option<String>,
    #[serde(default = "default_available", alias = "is_available")]
    is_available: bool,
}

fn default_available() -> bool {
    true
}

fn normalized_name(
    flat: Option<String>,
    first: Option<String>,
    last: Option<String>,
) -> Option<String> {
    if let Some(name) = flat {
        let trimmed = name.trim();
        if !trimmed.is_empty() {
            return Some(trimmed.to_string());
        }
    }

    let joined = [first, last]
        .into_iter()
        .flatten()
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}

impl TryFrom<ScheduleRecord> for DoctorSchedule {
    type Error = PortalError;

    fn try_from(record: ScheduleRecord) -> Result<Self, Self::Error> {
        let start_time = parse_time_of_day(&record.start_time)?;
        let end_time = parse_time_of_day(&record.end_time)?;
        let booked_times = record
            .booked_times
            .iter()
            .map(|raw| parse_time_of_day(raw))
            .collect::<Result<BTreeSet<_>, _>>()?;

        let (nested_first, nested_last, nested_department) = match record.doctor {
            Some(doctor) => (doctor.first_name, doctor.last_name, doctor.department),
            None => (None, None, None),
        };

        let doctor_name = normalized_name(record.doctor_name, nested_first, nested_last)
            .unwrap_or_else(|| "Unknown".to_string());

        Ok(Self {
            id: record.id,
            doctor_id: record.doctor_id,
            doctor_name,
            department: record.department.or(nested_department),
            date: record.date,
            start_time,
            end_time,
            booked_times,
            is_available: record.is_available,
        })
    }
}

impl<'de> Deserialize<'de> for DoctorSchedule {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let record = ScheduleRecord::deserialize(deserializer)?;
        DoctorSchedule::try_from(record).map_err(serde::de::Error::custom)
    }
}

impl From<DoctorRecord> for Doctor {
    fn from(record: DoctorRecord) -> Self {
        let name = normalized_name(record.doctor_name, record.first_name, record.last_name)
            .unwrap_or_else(|| "Unknown".to_string());

        Self {
            id: record.id,
            name,
            department: record.department,
            is_available: record.is_available,
        }
    }
}

impl<'de> Deserialize<'de> for Doctor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let record = DoctorRecord::deserialize(deserializer)?;
        Ok(record.into())
    }
}
