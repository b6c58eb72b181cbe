use std::collections::BTreeSet;

use chrono::{Duration, NaiveTime};

use crate::models::DoctorSchedule;

/// Grid step between bookable appointment starts.
pub const SLOT_STEP_MINUTES: i64 = 30;

/// Generate the bookable slot starts for one schedule window.
///
/// Ticks every 30 minutes from `start_time` and keeps each tick that is
/// strictly before `end_time` and not already booked. Booked times are
/// matched exactly; there is no duration-overlap check. When the window is
/// not a multiple of the step, the final slot's implicit 30-minute end
/// overruns `end_time` — the backend owns that rule and the client
/// reproduces it as-is.
///
/// Returns an owned, ordered sequence; empty when `start_time >= end_time`
/// or every tick is booked. The grid never crosses midnight: a tick that
/// would wrap ends generation.
pub fn compute_slots(
    start_time: NaiveTime,
    end_time: NaiveTime,
    booked_times: &BTreeSet<NaiveTime>,
) -> Vec<NaiveTime> {
    let step = Duration::minutes(SLOT_STEP_MINUTES);
    let mut slots = Vec::new();
    let mut tick = start_time;

    while tick < end_time {
        if !booked_times.contains(&tick) {
            slots.push(tick);
        }

        let (next, wrapped) = tick.overflowing_add_signed(step);
        if wrapped != 0 {
            break;
        }
        tick = next;
    }

    slots
}

/// True iff the window still has at least one bookable slot. Listings use
/// this to hide fully-booked schedules before they are ever shown.
pub fn has_available_slots(schedule: &DoctorSchedule) -> bool {
    !compute_slots(
        schedule.start_time,
        schedule.end_time,
        &schedule.booked_times,
    )
    .is_empty()
}
