//! Per-person monthly attendance totals.
//!
//! Totals are a pure function of the day map, the month's calendar and the
//! session's weekend exceptions. They are recomputed at every load, write and
//! toggle; nothing patches them incrementally and no stored copy is trusted.

use serde::Serialize;

use crate::calendar::CalendarDay;
use crate::exceptions::WeekendExceptions;
use crate::record::DayMap;
use crate::status::DayStatus;

/// Aggregated counters for one person-month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AttendanceTotals {
    /// Ratio of present days to countable days, in `[0, 1]`.
    pub asistencia: f64,
    /// Numerator of `asistencia`.
    pub presentes: u32,
    pub ausencia: u32,
    pub tardanza: u32,
    pub justificacion: u32,
    /// Countable days: weekdays plus unlocked weekend days.
    pub laborables: u32,
}

/// Compute the totals for one person-month.
///
/// Days outside `calendar` are ignored, as are statuses on locked weekends.
/// Countable days without a status add to `laborables` only.
pub fn compute_totals(
    days: &DayMap,
    calendar: &[CalendarDay],
    exceptions: &WeekendExceptions,
) -> AttendanceTotals {
    let mut totals = AttendanceTotals::default();

    for day in calendar.iter().filter(|d| exceptions.is_countable(d)) {
        totals.laborables += 1;
        match days.get(&day.iso_date) {
            Some(DayStatus::Present) => totals.presentes += 1,
            Some(DayStatus::Absent) => totals.ausencia += 1,
            Some(DayStatus::Late) => totals.tardanza += 1,
            Some(DayStatus::Justified) => totals.justificacion += 1,
            None => {}
        }
    }

    totals.asistencia = if totals.laborables == 0 {
        0.0
    } else {
        f64::from(totals.presentes) / f64::from(totals.laborables)
    };

    totals
}
