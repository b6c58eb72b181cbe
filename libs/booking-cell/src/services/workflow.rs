use std::mem;
use std::sync::Arc;

use chrono::NaiveTime;
use tracing::{debug, info, warn};
use uuid::Uuid;

use schedule_cell::models::{DoctorSchedule, ScheduleFilter};
use schedule_cell::services::schedules::ScheduleService;
use schedule_cell::services::slots::compute_slots;
use shared_gateway::PortalClient;
use shared_models::PortalError;
use shared_utils::time::format_time_of_day;

use crate::models::{
    Appointment, AppointmentStatus, BookingDraft, BookingState, CreateAppointmentRequest,
};
use crate::services::appointments::create_appointment;

/// Patient-facing booking controller: browse open schedules, open one in the
/// booking dialog, pick a slot, submit.
///
/// The controller is single-threaded and cooperative; it suspends only at
/// the gateway's await points. Within one attempt, fetch, compute and submit
/// are strictly sequential — the state machine makes submitting before slots
/// have been computed from the currently selected schedule unrepresentable.
/// Cancelling discards the draft, and a response that arrives for a
/// discarded draft has nothing to land on.
pub struct BookingWorkflow {
    client: Arc<PortalClient>,
    schedules: ScheduleService,
    state: BookingState,
}

impl BookingWorkflow {
    pub fn new(client: Arc<PortalClient>) -> Self {
        Self {
            schedules: ScheduleService::new(Arc::clone(&client)),
            client,
            state: BookingState::Browsing,
        }
    }

    pub fn state(&self) -> &BookingState {
        &self.state
    }

    pub fn draft(&self) -> Option<&BookingDraft> {
        match &self.state {
            BookingState::SlotSelection { draft, .. }
            | BookingState::Submitting { draft, .. } => Some(draft),
            BookingState::Browsing => None,
        }
    }

    /// Return to the schedule listing. Always re-fetches: booked-time sets
    /// are backend-owned truth and the local copy is never patched. Any
    /// in-progress draft is discarded.
    pub async fn browse(
        &mut self,
        filter: &ScheduleFilter,
    ) -> Result<Vec<DoctorSchedule>, PortalError> {
        self.state = BookingState::Browsing;
        self.schedules.browse(filter).await
    }

    /// Open the booking dialog for one schedule window and compute its
    /// bookable slots. Any previously computed slot list or chosen slot is
    /// discarded — there is no stale cross-selection state.
    pub fn select_schedule(&mut self, schedule: DoctorSchedule) -> Vec<NaiveTime> {
        let slots = compute_slots(
            schedule.start_time,
            schedule.end_time,
            &schedule.booked_times,
        );
        debug!(
            "{} bookable slots computed for schedule {}",
            slots.len(),
            schedule.id
        );

        let draft = BookingDraft::for_schedule(&schedule);
        self.state = BookingState::SlotSelection {
            schedule,
            slots: slots.clone(),
            draft,
        };

        slots
    }

    /// Fetch one schedule window by id and open it in the booking dialog.
    pub async fn open_schedule(
        &mut self,
        schedule_id: Uuid,
    ) -> Result<Vec<NaiveTime>, PortalError> {
        let schedule = self.schedules.get_schedule(schedule_id).await?;
        Ok(self.select_schedule(schedule))
    }

    /// Pick a slot from the computed list. Anything off the list is a local
    /// validation error; nothing is sent to the backend.
    pub fn choose_slot(&mut self, slot: NaiveTime) -> Result<(), PortalError> {
        match &mut self.state {
            BookingState::SlotSelection { slots, draft, .. } => {
                if !slots.contains(&slot) {
                    return Err(PortalError::ValidationError(format!(
                        "{} is not an open slot for this schedule",
                        format_time_of_day(slot)
                    )));
                }
                draft.chosen_slot = Some(slot);
                Ok(())
            }
            _ => Err(PortalError::ValidationError(
                "no schedule selected".to_string(),
            )),
        }
    }

    pub fn set_reason(&mut self, reason: impl Into<String>) -> Result<(), PortalError> {
        match &mut self.state {
            BookingState::SlotSelection { draft, .. } => {
                draft.reason = reason.into();
                Ok(())
            }
            _ => Err(PortalError::ValidationError(
                "no schedule selected".to_string(),
            )),
        }
    }

    /// Submit the draft as a pending appointment.
    ///
    /// On success the workflow returns to browsing and the caller should
    /// re-fetch the listing. On any failure the dialog stays open with the
    /// chosen slot and reason intact so the user can retry after a re-fetch.
    pub async fn submit(&mut self) -> Result<Appointment, PortalError> {
        // Identity is resolved before anything else; an unresolved patient
        // never produces a network call.
        let patient_id = self.client.session().resolve_patient()?;

        let (schedule, slots, draft) = match mem::replace(&mut self.state, BookingState::Browsing)
        {
            BookingState::SlotSelection {
                schedule,
                slots,
                draft,
            } => (schedule, slots, draft),
            other => {
                self.state = other;
                return Err(PortalError::ValidationError(
                    "no booking in progress".to_string(),
                ));
            }
        };

        let Some(chosen_slot) = draft.chosen_slot else {
            self.state = BookingState::SlotSelection {
                schedule,
                slots,
                draft,
            };
            return Err(PortalError::ValidationError(
                "pick a time slot before confirming".to_string(),
            ));
        };

        let request = CreateAppointmentRequest {
            patient_id,
            doctor_id: draft.doctor_id,
            schedule_id: draft.schedule_id,
            appointment_date: draft.date,
            appointment_time: chosen_slot,
            reason: draft.reason.clone(),
            status: AppointmentStatus::Pending,
        };

        self.state = BookingState::Submitting {
            schedule,
            slots,
            draft,
        };
        info!(
            "Submitting appointment request for schedule {}",
            request.schedule_id
        );

        match create_appointment(&self.client, &request).await {
            Ok(appointment) => {
                self.state = BookingState::Browsing;
                Ok(appointment)
            }
            Err(err) => {
                // A lost race for the slot is indistinguishable from any
                // other submission failure: reopen the dialog with the
                // draft intact, chosen slot and reason both retained.
                warn!("Appointment submission failed: {}", err);
                if let BookingState::Submitting {
                    schedule,
                    slots,
                    draft,
                } = mem::replace(&mut self.state, BookingState::Browsing)
                {
                    self.state = BookingState::SlotSelection {
                        schedule,
                        slots,
                        draft,
                    };
                }
                Err(err)
            }
        }
    }

    /// Close the booking dialog without submitting. No network call is made
    /// and the draft is gone.
    pub fn cancel(&mut self) {
        if !matches!(self.state, BookingState::Browsing) {
            debug!("Booking draft discarded");
        }
        self.state = BookingState::Browsing;
    }
}
