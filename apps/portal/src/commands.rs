use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use admin_cell::services::scheduling::AdminScheduler;
use booking_cell::services::workflow::BookingWorkflow;
use schedule_cell::models::{DoctorSchedule, ScheduleFilter};
use shared_config::PortalConfig;
use shared_gateway::PortalClient;
use shared_models::{AuthSession, UserRole};
use shared_utils::time::{format_time_of_day, parse_time_of_day};

const USAGE: &str = "\
usage: portal <command>

  schedules [YYYY-MM-DD] [text]     browse schedule windows open for booking
  slots <schedule-id>               show bookable times for one window
  book <schedule-id> <HH:MM> <reason...>
                                    book an appointment as the signed-in patient
  admin-slots <doctor-id>           future bookable windows for a doctor
  admin-book <doctor-id> <schedule-id> <HH:MM> <patient-id> <reason...>
                                    book on a patient's behalf

environment: PORTAL_API_URL, PORTAL_BEARER_TOKEN, PORTAL_USER_ID, PORTAL_USER_ROLE
";

pub async fn run(args: Vec<String>) -> Result<()> {
    let Some(command) = args.first() else {
        print!("{USAGE}");
        return Ok(());
    };

    let client = Arc::new(build_client()?);

    match command.as_str() {
        "schedules" => schedules(client, &args[1..]).await,
        "slots" => slots(client, &args[1..]).await,
        "book" => book(client, &args[1..]).await,
        "admin-slots" => admin_slots(client, &args[1..]).await,
        "admin-book" => admin_book(client, &args[1..]).await,
        other => bail!("unknown command {other:?}\n\n{USAGE}"),
    }
}

fn build_client() -> Result<PortalClient> {
    let config = PortalConfig::from_env();
    if !config.is_configured() {
        bail!("PORTAL_API_URL is not set");
    }

    let token =
        std::env::var("PORTAL_BEARER_TOKEN").context("PORTAL_BEARER_TOKEN is not set")?;
    let user_id = std::env::var("PORTAL_USER_ID")
        .ok()
        .map(|raw| Uuid::parse_str(&raw))
        .transpose()
        .context("PORTAL_USER_ID is not a valid UUID")?;
    let role = std::env::var("PORTAL_USER_ROLE")
        .unwrap_or_else(|_| "patient".to_string())
        .parse::<UserRole>()?;

    let session = AuthSession::new(token, user_id, role);
    Ok(PortalClient::new(&config, session)?)
}

async fn schedules(client: Arc<PortalClient>, args: &[String]) -> Result<()> {
    let mut filter = ScheduleFilter::default();
    let mut text_words = args;

    if let Some(first) = args.first() {
        if let Ok(date) = first.parse::<NaiveDate>() {
            filter.date = Some(date);
            text_words = &args[1..];
        }
    }
    if !text_words.is_empty() {
        filter.text = Some(text_words.join(" "));
    }

    let mut workflow = BookingWorkflow::new(client);
    let listing = workflow.browse(&filter).await?;

    if listing.is_empty() {
        println!("No schedules open for booking.");
        return Ok(());
    }

    for schedule in &listing {
        print_schedule_line(schedule);
    }
    Ok(())
}

async fn slots(client: Arc<PortalClient>, args: &[String]) -> Result<()> {
    let [schedule_id] = args else {
        bail!("usage: portal slots <schedule-id>");
    };
    let schedule_id = parse_uuid(schedule_id, "schedule id")?;

    let mut workflow = BookingWorkflow::new(client);
    let open = workflow.open_schedule(schedule_id).await?;

    if open.is_empty() {
        println!("This schedule is fully booked.");
        return Ok(());
    }

    for slot in open {
        println!("{}", format_time_of_day(slot));
    }
    Ok(())
}

async fn book(client: Arc<PortalClient>, args: &[String]) -> Result<()> {
    let [schedule_id, slot, reason @ ..] = args else {
        bail!("usage: portal book <schedule-id> <HH:MM> <reason...>");
    };
    if reason.is_empty() {
        bail!("a reason for the visit is required");
    }

    let schedule_id = parse_uuid(schedule_id, "schedule id")?;
    let slot = parse_time_of_day(slot)?;

    let mut workflow = BookingWorkflow::new(client);
    workflow.open_schedule(schedule_id).await?;
    workflow.choose_slot(slot)?;
    workflow.set_reason(reason.join(" "))?;

    let appointment = workflow.submit().await?;
    println!(
        "Booked: appointment {} on {} at {} ({})",
        appointment.id,
        appointment.appointment_date,
        format_time_of_day(appointment.appointment_time),
        appointment.status
    );
    Ok(())
}

async fn admin_slots(client: Arc<PortalClient>, args: &[String]) -> Result<()> {
    let [doctor_id] = args else {
        bail!("usage: portal admin-slots <doctor-id>");
    };
    let doctor_id = parse_uuid(doctor_id, "doctor id")?;

    let scheduler = AdminScheduler::new(client);
    let today = Utc::now().date_naive();
    let offering = scheduler.slot_options(doctor_id, today).await?;

    if offering.options.is_empty() {
        println!("{} has no bookable windows.", offering.doctor.name);
        return Ok(());
    }

    println!("{}", offering.doctor.name);
    for option in &offering.options {
        print_schedule_line(&option.schedule);
        let times: Vec<String> = option
            .slots
            .iter()
            .map(|slot| format_time_of_day(*slot))
            .collect();
        println!("    {}", times.join("  "));
    }
    Ok(())
}

async fn admin_book(client: Arc<PortalClient>, args: &[String]) -> Result<()> {
    let [doctor_id, schedule_id, slot, patient_id, reason @ ..] = args else {
        bail!("usage: portal admin-book <doctor-id> <schedule-id> <HH:MM> <patient-id> <reason...>");
    };
    if reason.is_empty() {
        bail!("a reason for the visit is required");
    }

    let doctor_id = parse_uuid(doctor_id, "doctor id")?;
    let schedule_id = parse_uuid(schedule_id, "schedule id")?;
    let patient_id = parse_uuid(patient_id, "patient id")?;
    let slot = parse_time_of_day(slot)?;

    let scheduler = AdminScheduler::new(client);
    let schedule = scheduler.find_schedule(schedule_id).await?;
    if schedule.doctor_id != doctor_id {
        bail!("schedule {schedule_id} does not belong to doctor {doctor_id}");
    }

    let appointment = scheduler
        .book_for_patient(patient_id, &schedule, slot, &reason.join(" "))
        .await?;
    println!(
        "Booked: appointment {} for patient {} on {} at {}",
        appointment.id,
        appointment.patient_id,
        appointment.appointment_date,
        format_time_of_day(appointment.appointment_time)
    );
    Ok(())
}

fn print_schedule_line(schedule: &DoctorSchedule) {
    let department = schedule.department.as_deref().unwrap_or("-");
    println!(
        "{}  {}-{}  {} ({})  {} open  [{}]",
        schedule.date,
        format_time_of_day(schedule.start_time),
        format_time_of_day(schedule.end_time),
        schedule.doctor_name,
        department,
        schedule.open_slots().len(),
        schedule.id
    );
}

fn parse_uuid(raw: &str, what: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).with_context(|| format!("{what} is not a valid UUID: {raw}"))
}
