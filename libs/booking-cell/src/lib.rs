pub mod models;
pub mod services;

pub use models::{
    Appointment, AppointmentStatus, BookingDraft, BookingState, CreateAppointmentRequest,
};
pub use services::workflow::BookingWorkflow;
