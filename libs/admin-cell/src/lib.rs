pub mod models;
pub mod services;

pub use models::{DoctorSlotOptions, SlotOptions};
pub use services::scheduling::{bookable_windows, AdminScheduler};
