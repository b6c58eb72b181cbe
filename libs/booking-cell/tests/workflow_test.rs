use std::collections::BTreeSet;
use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::NaiveTime;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use booking_cell::models::{AppointmentStatus, BookingState};
use booking_cell::services::workflow::BookingWorkflow;
use schedule_cell::models::DoctorSchedule;
use shared_gateway::PortalClient;
use shared_models::PortalError;
use shared_utils::test_utils::{MockPortalResponses, TestConfig, TestSession};

fn t(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

fn sample_schedule(booked: &[NaiveTime]) -> DoctorSchedule {
    DoctorSchedule {
        id: Uuid::new_v4(),
        doctor_id: Uuid::new_v4(),
        doctor_name: "Asha Raman".to_string(),
        department: Some("Cardiology".to_string()),
        date: "2031-05-14".parse().unwrap(),
        start_time: t(9, 0),
        end_time: t(10, 0),
        booked_times: booked.iter().copied().collect::<BTreeSet<_>>(),
        is_available: true,
    }
}

fn workflow_for(server: &MockServer, session: &TestSession) -> BookingWorkflow {
    let config = TestConfig::for_server(&server.uri()).to_portal_config();
    let client =
        PortalClient::new(&config, session.to_session()).expect("client should build");
    BookingWorkflow::new(Arc::new(client))
}

#[tokio::test]
async fn successful_submit_posts_the_draft_and_returns_to_browsing() {
    let mock_server = MockServer::start().await;
    let session = TestSession::patient();
    let patient_id = session.user_id.unwrap();
    let schedule = sample_schedule(&[t(9, 0)]);

    Mock::given(method("POST"))
        .and(path("/api/appointments"))
        .and(body_partial_json(json!({
            "patientId": patient_id,
            "doctorId": schedule.doctor_id,
            "scheduleId": schedule.id,
            "appointmentDate": "2031-05-14",
            "appointmentTime": "09:30",
            "reason": "persistent chest pain",
            "status": "pending"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(
            MockPortalResponses::appointment(
                Uuid::new_v4(),
                patient_id,
                schedule.doctor_id,
                schedule.id,
                "2031-05-14",
                "09:30",
                "persistent chest pain",
            ),
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut workflow = workflow_for(&mock_server, &session);

    let slots = workflow.select_schedule(schedule);
    assert_eq!(slots, vec![t(9, 30)]);

    workflow.choose_slot(t(9, 30)).unwrap();
    workflow.set_reason("persistent chest pain").unwrap();

    let appointment = workflow.submit().await.unwrap();
    assert_eq!(appointment.patient_id, patient_id);
    assert_eq!(appointment.status, AppointmentStatus::Pending);
    assert_eq!(appointment.appointment_time, t(9, 30));

    assert_matches!(workflow.state(), BookingState::Browsing);
    assert!(workflow.draft().is_none());
}

#[tokio::test]
async fn unresolved_identity_fails_before_any_network_call() {
    let mock_server = MockServer::start().await;
    let session = TestSession::anonymous();

    let mut workflow = workflow_for(&mock_server, &session);
    workflow.select_schedule(sample_schedule(&[]));
    workflow.choose_slot(t(9, 0)).unwrap();
    workflow.set_reason("follow-up").unwrap();

    let err = workflow.submit().await.unwrap_err();
    assert_matches!(err, PortalError::IdentityUnresolved);

    // The guard runs before the request is even built.
    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests.is_empty());

    // The dialog stays open so signing in and retrying loses nothing.
    assert_matches!(workflow.state(), BookingState::SlotSelection { .. });
}

#[tokio::test]
async fn failed_submit_reopens_the_dialog_with_the_draft_intact() {
    let mock_server = MockServer::start().await;
    let session = TestSession::patient();

    // A lost booking race and a plain server error look identical here.
    Mock::given(method("POST"))
        .and(path("/api/appointments"))
        .respond_with(ResponseTemplate::new(500).set_body_string("slot already taken"))
        .mount(&mock_server)
        .await;

    let mut workflow = workflow_for(&mock_server, &session);
    workflow.select_schedule(sample_schedule(&[]));
    workflow.choose_slot(t(9, 30)).unwrap();
    workflow.set_reason("annual check-up").unwrap();

    let err = workflow.submit().await.unwrap_err();
    assert_matches!(err, PortalError::Backend { status: 500, .. });

    let draft = workflow.draft().expect("draft should be retained");
    assert_eq!(draft.chosen_slot, Some(t(9, 30)));
    assert_eq!(draft.reason, "annual check-up");
    assert_matches!(workflow.state(), BookingState::SlotSelection { .. });
}

#[tokio::test]
async fn cancel_discards_the_draft_without_touching_the_network() {
    let mock_server = MockServer::start().await;
    let session = TestSession::patient();

    let mut workflow = workflow_for(&mock_server, &session);
    workflow.select_schedule(sample_schedule(&[]));
    workflow.choose_slot(t(9, 0)).unwrap();
    workflow.set_reason("never mind").unwrap();

    workflow.cancel();

    assert_matches!(workflow.state(), BookingState::Browsing);
    assert!(workflow.draft().is_none());

    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn selecting_another_schedule_discards_the_previous_draft() {
    let mock_server = MockServer::start().await;
    let session = TestSession::patient();

    let mut workflow = workflow_for(&mock_server, &session);
    workflow.select_schedule(sample_schedule(&[]));
    workflow.choose_slot(t(9, 30)).unwrap();

    let second = sample_schedule(&[t(9, 0)]);
    let second_id = second.id;
    workflow.select_schedule(second);

    let draft = workflow.draft().unwrap();
    assert_eq!(draft.schedule_id, second_id);
    assert_eq!(draft.chosen_slot, None);
    assert_eq!(draft.reason, "");
}

#[tokio::test]
async fn slots_outside_the_computed_list_are_rejected_locally() {
    let mock_server = MockServer::start().await;
    let session = TestSession::patient();

    let mut workflow = workflow_for(&mock_server, &session);
    workflow.select_schedule(sample_schedule(&[t(9, 0)]));

    // Booked tick and off-grid tick both fail without a network call.
    assert_matches!(
        workflow.choose_slot(t(9, 0)),
        Err(PortalError::ValidationError(_))
    );
    assert_matches!(
        workflow.choose_slot(t(9, 45)),
        Err(PortalError::ValidationError(_))
    );

    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn submit_requires_a_chosen_slot() {
    let mock_server = MockServer::start().await;
    let session = TestSession::patient();

    let mut workflow = workflow_for(&mock_server, &session);
    workflow.select_schedule(sample_schedule(&[]));

    let err = workflow.submit().await.unwrap_err();
    assert_matches!(err, PortalError::ValidationError(_));
    assert_matches!(workflow.state(), BookingState::SlotSelection { .. });
}

#[tokio::test]
async fn open_schedule_fetches_and_computes_in_one_step() {
    let mock_server = MockServer::start().await;
    let session = TestSession::patient();
    let schedule_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path(format!("/api/schedules/{}", schedule_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockPortalResponses::schedule(
                schedule_id,
                Uuid::new_v4(),
                "2031-05-14",
                "09:00",
                "10:00",
                &["09:00"],
            ),
        ))
        .mount(&mock_server)
        .await;

    let mut workflow = workflow_for(&mock_server, &session);
    let slots = workflow.open_schedule(schedule_id).await.unwrap();

    assert_eq!(slots, vec![t(9, 30)]);
    assert_matches!(workflow.state(), BookingState::SlotSelection { .. });
}
