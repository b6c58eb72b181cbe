use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::PortalConfig;
use shared_models::{AuthSession, UserRole};

pub struct TestConfig {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:4000".to_string(),
            request_timeout_secs: 5,
        }
    }
}

impl TestConfig {
    pub fn for_server(uri: &str) -> Self {
        Self {
            api_base_url: uri.to_string(),
            ..Self::default()
        }
    }

    pub fn to_portal_config(&self) -> PortalConfig {
        PortalConfig {
            api_base_url: self.api_base_url.clone(),
            request_timeout_secs: self.request_timeout_secs,
        }
    }
}

pub struct TestSession {
    pub token: String,
    pub user_id: Option<Uuid>,
    pub role: UserRole,
}

impl TestSession {
    pub fn patient() -> Self {
        Self {
            token: "test-bearer-token".to_string(),
            user_id: Some(Uuid::new_v4()),
            role: UserRole::Patient,
        }
    }

    /// A session whose patient identity cannot be resolved.
    pub fn anonymous() -> Self {
        Self {
            token: "test-bearer-token".to_string(),
            user_id: None,
            role: UserRole::Patient,
        }
    }

    pub fn admin() -> Self {
        Self {
            token: "test-bearer-token".to_string(),
            user_id: Some(Uuid::new_v4()),
            role: UserRole::Admin,
        }
    }

    pub fn to_session(&self) -> AuthSession {
        AuthSession::new(self.token.clone(), self.user_id, self.role)
    }
}

/// Canned backend payloads in the shapes the portal API actually emits,
/// including the inconsistent doctor-name variants.
pub struct MockPortalResponses;

impl MockPortalResponses {
    pub fn schedule(
        id: Uuid,
        doctor_id: Uuid,
        date: &str,
        start_time: &str,
        end_time: &str,
        booked_times: &[&str],
    ) -> Value {
        json!({
            "id": id,
            "doctorId": doctor_id,
            "doctorName": "Asha Raman",
            "department": "Cardiology",
            "date": date,
            "startTime": start_time,
            "endTime": end_time,
            "bookedTimes": booked_times,
            "isAvailable": true
        })
    }

    /// Same record, but with the name nested under `doctor` the way older
    /// backend endpoints return it.
    pub fn schedule_with_nested_doctor(
        id: Uuid,
        doctor_id: Uuid,
        date: &str,
        start_time: &str,
        end_time: &str,
        booked_times: &[&str],
    ) -> Value {
        json!({
            "id": id,
            "doctorId": doctor_id,
            "doctor": {
                "firstName": "Asha",
                "lastName": "Raman",
                "department": "Cardiology"
            },
            "date": date,
            "startTime": start_time,
            "endTime": end_time,
            "bookedTimes": booked_times,
            "isAvailable": true
        })
    }

    pub fn doctor(id: Uuid, name: &str, department: &str) -> Value {
        json!({
            "id": id,
            "doctorName": name,
            "department": department,
            "isAvailable": true
        })
    }

    pub fn doctor_with_split_name(id: Uuid, first_name: &str, last_name: &str) -> Value {
        json!({
            "id": id,
            "firstName": first_name,
            "lastName": last_name,
            "department": "General Medicine",
            "isAvailable": true
        })
    }

    pub fn appointment(
        id: Uuid,
        patient_id: Uuid,
        doctor_id: Uuid,
        schedule_id: Uuid,
        date: &str,
        time: &str,
        reason: &str,
    ) -> Value {
        json!({
            "id": id,
            "patientId": patient_id,
            "doctorId": doctor_id,
            "scheduleId": schedule_id,
            "appointmentDate": date,
            "appointmentTime": time,
            "reason": reason,
            "status": "pending"
        })
    }
}
