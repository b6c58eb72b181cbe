pub mod models;
pub mod services;

pub use models::{Doctor, DoctorSchedule, ScheduleFilter};
pub use services::schedules::ScheduleService;
pub use services::slots::{compute_slots, has_available_slots, SLOT_STEP_MINUTES};
