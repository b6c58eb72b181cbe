use std::sync::Arc;

use chrono::NaiveDate;
use reqwest::Method;
use tracing::debug;
use uuid::Uuid;

use shared_gateway::PortalClient;
use shared_models::PortalError;

use crate::models::{Doctor, DoctorSchedule, ScheduleFilter};
use crate::services::slots::has_available_slots;

/// Typed fetch operations over the scheduling endpoints. Wire payloads are
/// normalized into canonical records during deserialization, so everything
/// returned from here is already in canonical shape.
pub struct ScheduleService {
    client: Arc<PortalClient>,
}

impl ScheduleService {
    pub fn new(client: Arc<PortalClient>) -> Self {
        Self { client }
    }

    /// All published schedule windows.
    pub async fn list_schedules(&self) -> Result<Vec<DoctorSchedule>, PortalError> {
        debug!("Fetching schedule windows");
        self.client.request(Method::GET, "/api/schedules", None).await
    }

    /// Schedule windows for one calendar date.
    pub async fn list_schedules_on(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<DoctorSchedule>, PortalError> {
        debug!("Fetching schedule windows for {}", date);

        let path = format!(
            "/api/schedules?date={}",
            urlencoding::encode(&date.to_string())
        );
        self.client.request(Method::GET, &path, None).await
    }

    /// All of one doctor's schedule windows.
    pub async fn list_doctor_schedules(
        &self,
        doctor_id: Uuid,
    ) -> Result<Vec<DoctorSchedule>, PortalError> {
        debug!("Fetching schedule windows for doctor {}", doctor_id);

        let path = format!("/api/schedules/doctor/{}", doctor_id);
        self.client.request(Method::GET, &path, None).await
    }

    pub async fn get_schedule(&self, schedule_id: Uuid) -> Result<DoctorSchedule, PortalError> {
        let path = format!("/api/schedules/{}", schedule_id);
        self.client.request(Method::GET, &path, None).await
    }

    pub async fn list_doctors(&self) -> Result<Vec<Doctor>, PortalError> {
        debug!("Fetching doctor directory");
        self.client.request(Method::GET, "/api/doctors", None).await
    }

    pub async fn get_doctor(&self, doctor_id: Uuid) -> Result<Doctor, PortalError> {
        let path = format!("/api/doctors/{}", doctor_id);
        self.client.request(Method::GET, &path, None).await
    }

    /// Schedules offered for patient browsing: fully-booked windows are
    /// hidden before they are ever shown, then the user's filter conjunction
    /// applies on top.
    pub async fn browse(
        &self,
        filter: &ScheduleFilter,
    ) -> Result<Vec<DoctorSchedule>, PortalError> {
        let mut schedules = match filter.date {
            Some(date) => self.list_schedules_on(date).await?,
            None => self.list_schedules().await?,
        };

        schedules.retain(|schedule| has_available_slots(schedule) && filter.matches(schedule));

        debug!("{} schedules open for booking after filtering", schedules.len());
        Ok(schedules)
    }
}
