use chrono::NaiveTime;

use schedule_cell::models::{Doctor, DoctorSchedule};

/// One future, bookable schedule window paired with its computed slots.
#[derive(Debug, Clone)]
pub struct SlotOptions {
    pub schedule: DoctorSchedule,
    pub slots: Vec<NaiveTime>,
}

/// Everything an admin needs on screen to book on a patient's behalf:
/// the doctor plus that doctor's offerable windows.
#[derive(Debug, Clone)]
pub struct DoctorSlotOptions {
    pub doctor: Doctor,
    pub options: Vec<SlotOptions>,
}
