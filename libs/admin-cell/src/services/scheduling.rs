use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use tracing::{debug, info};
use uuid::Uuid;

use booking_cell::models::{Appointment, AppointmentStatus, CreateAppointmentRequest};
use booking_cell::services::appointments::create_appointment;
use schedule_cell::models::{Doctor, DoctorSchedule};
use schedule_cell::services::schedules::ScheduleService;
use schedule_cell::services::slots::compute_slots;
use shared_gateway::PortalClient;
use shared_models::PortalError;
use shared_utils::time::format_time_of_day;

use crate::models::{DoctorSlotOptions, SlotOptions};

/// Scheduling helper for admins booking on a patient's behalf. Same slot
/// algorithm as the patient flow; the difference is the pre-filter — only
/// future windows the backend flags available are ever offered.
pub struct AdminScheduler {
    client: Arc<PortalClient>,
    schedules: ScheduleService,
}

impl AdminScheduler {
    pub fn new(client: Arc<PortalClient>) -> Self {
        Self {
            schedules: ScheduleService::new(Arc::clone(&client)),
            client,
        }
    }

    pub async fn list_doctors(&self) -> Result<Vec<Doctor>, PortalError> {
        self.schedules.list_doctors().await
    }

    pub async fn find_schedule(&self, schedule_id: Uuid) -> Result<DoctorSchedule, PortalError> {
        self.schedules.get_schedule(schedule_id).await
    }

    /// The windows offered for one doctor, each paired with its computed
    /// slots. Past dates, windows flagged unavailable and fully-booked
    /// windows are dropped before anything is shown.
    pub async fn slot_options(
        &self,
        doctor_id: Uuid,
        today: NaiveDate,
    ) -> Result<DoctorSlotOptions, PortalError> {
        debug!("Fetching slot options for doctor {}", doctor_id);

        let (doctor, schedules) = futures::future::try_join(
            self.schedules.get_doctor(doctor_id),
            self.schedules.list_doctor_schedules(doctor_id),
        )
        .await?;

        let options = bookable_windows(schedules, today);
        debug!(
            "{} bookable windows for doctor {}",
            options.len(),
            doctor_id
        );

        Ok(DoctorSlotOptions { doctor, options })
    }

    /// Create a pending appointment for the given patient. The chosen slot
    /// is validated against a freshly computed grid before the request goes
    /// out; the backend still has the final word on conflicts.
    pub async fn book_for_patient(
        &self,
        patient_id: Uuid,
        schedule: &DoctorSchedule,
        slot: NaiveTime,
        reason: &str,
    ) -> Result<Appointment, PortalError> {
        let slots = compute_slots(
            schedule.start_time,
            schedule.end_time,
            &schedule.booked_times,
        );
        if !slots.contains(&slot) {
            return Err(PortalError::ValidationError(format!(
                "{} is not an open slot for this schedule",
                format_time_of_day(slot)
            )));
        }

        let request = CreateAppointmentRequest {
            patient_id,
            doctor_id: schedule.doctor_id,
            schedule_id: schedule.id,
            appointment_date: schedule.date,
            appointment_time: slot,
            reason: reason.to_string(),
            status: AppointmentStatus::Pending,
        };

        let appointment = create_appointment(&self.client, &request).await?;
        info!(
            "Admin booked appointment {} for patient {}",
            appointment.id, patient_id
        );

        Ok(appointment)
    }
}

/// Pure pre-filter for the admin offering: future dates only, availability
/// flag honored, and windows with no open slot dropped.
pub fn bookable_windows(schedules: Vec<DoctorSchedule>, today: NaiveDate) -> Vec<SlotOptions> {
    schedules
        .into_iter()
        .filter(|schedule| schedule.is_available && schedule.date >= today)
        .filter_map(|schedule| {
            let slots = compute_slots(
                schedule.start_time,
                schedule.end_time,
                &schedule.booked_times,
            );
            if slots.is_empty() {
                None
            } else {
                Some(SlotOptions { schedule, slots })
            }
        })
        .collect()
}
