// libs/booking-cell/src/models.rs
use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use schedule_cell::models::DoctorSchedule;

// ==============================================================================
// APPOINTMENT MODELS
// ==============================================================================

/// An appointment record as echoed back by the backend. The backend owns the
/// full lifecycle; the client only ever creates records in `pending` status
/// and reads the rest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    #[serde(alias = "patient_id")]
    pub patient_id: Uuid,
    #[serde(alias = "doctor_id")]
    pub doctor_id: Uuid,
    #[serde(alias = "schedule_id")]
    pub schedule_id: Uuid,
    #[serde(alias = "appointment_date")]
    pub appointment_date: NaiveDate,
    #[serde(alias = "appointment_time", with = "shared_utils::time::serde_hhmm")]
    pub appointment_time: NaiveTime,
    pub reason: String,
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::Confirmed => write!(f, "confirmed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
            AppointmentStatus::Completed => write!(f, "completed"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub schedule_id: Uuid,
    pub appointment_date: NaiveDate,
    #[serde(with = "shared_utils::time::serde_hhmm")]
    pub appointment_time: NaiveTime,
    pub reason: String,
    pub status: AppointmentStatus,
}

// ==============================================================================
// BOOKING WORKFLOW STATE
// ==============================================================================

/// Transient client-side state for an in-progress, not-yet-submitted
/// appointment request. Exists only between opening the booking dialog and
/// submit or cancel; it is never persisted and never sent anywhere except as
/// the payload of a successful submit.
#[derive(Debug, Clone)]
pub struct BookingDraft {
    pub schedule_id: Uuid,
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub chosen_slot: Option<NaiveTime>,
    pub reason: String,
}

impl BookingDraft {
    pub fn for_schedule(schedule: &DoctorSchedule) -> Self {
        Self {
            schedule_id: schedule.id,
            doctor_id: schedule.doctor_id,
            date: schedule.date,
            chosen_slot: None,
            reason: String::new(),
        }
    }
}

/// The booking dialog's state machine. There is exactly one draft at a time;
/// selecting a different schedule or returning to browsing discards it.
#[derive(Debug, Clone)]
pub enum BookingState {
    /// The schedule listing is on screen; nothing is selected.
    Browsing,
    /// A schedule window is open in the booking dialog with its computed
    /// slot list.
    SlotSelection {
        schedule: DoctorSchedule,
        slots: Vec<NaiveTime>,
        draft: BookingDraft,
    },
    /// The create request is in flight.
    Submitting {
        schedule: DoctorSchedule,
        slots: Vec<NaiveTime>,
        draft: BookingDraft,
    },
}
