use reqwest::Method;
use tracing::{debug, info};

use shared_gateway::PortalClient;
use shared_models::PortalError;

use crate::models::{Appointment, CreateAppointmentRequest};

/// Issue the create-appointment request. Both the patient booking workflow
/// and the admin scheduling helper submit through this one path.
pub async fn create_appointment(
    client: &PortalClient,
    request: &CreateAppointmentRequest,
) -> Result<Appointment, PortalError> {
    debug!(
        "Creating appointment for schedule {} at {}",
        request.schedule_id, request.appointment_time
    );

    let body = serde_json::to_value(request)
        .map_err(|e| PortalError::ValidationError(e.to_string()))?;

    let appointment: Appointment = client
        .request(Method::POST, "/api/appointments", Some(body))
        .await?;

    info!(
        "Appointment {} created with status {}",
        appointment.id, appointment.status
    );

    Ok(appointment)
}
