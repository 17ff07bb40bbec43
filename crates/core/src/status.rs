//! Day statuses and the cell cycling state machine.
//!
//! [`DayStatus`] is the only thing that is ever persisted. [`CellValue`] is
//! what a grid cell displays; its `NotApplicable` arm marks a locked weekend
//! and has no persisted counterpart, so it cannot reach the write path.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

use crate::error::CoreError;

/// A persisted attendance state for one person on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    Present,
    Absent,
    Late,
    Justified,
}

/// Order in which a cell click walks through the live states.
pub const STATUS_CYCLE: [DayStatus; 4] = [
    DayStatus::Present,
    DayStatus::Absent,
    DayStatus::Late,
    DayStatus::Justified,
];

impl DayStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DayStatus::Present => "present",
            DayStatus::Absent => "absent",
            DayStatus::Late => "late",
            DayStatus::Justified => "justified",
        }
    }

    /// The status after this one in [`STATUS_CYCLE`], wrapping around.
    pub fn next(self) -> DayStatus {
        match self {
            DayStatus::Present => DayStatus::Absent,
            DayStatus::Absent => DayStatus::Late,
            DayStatus::Late => DayStatus::Justified,
            DayStatus::Justified => DayStatus::Present,
        }
    }
}

impl fmt::Display for DayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        STATUS_CYCLE
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid status '{s}'. Must be one of: present, absent, late, justified"
                ))
            })
    }
}

/// What a grid cell shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellValue {
    /// A stored (or about to be stored) status.
    Status(DayStatus),
    /// Countable day with nothing recorded.
    Unset,
    /// Weekend day without an active exception. Display only.
    NotApplicable,
}

impl CellValue {
    pub fn as_str(self) -> &'static str {
        match self {
            CellValue::Status(status) => status.as_str(),
            CellValue::Unset => "unset",
            CellValue::NotApplicable => "not_applicable",
        }
    }

    /// The status to write for this value, if any.
    pub fn persistable(self) -> Option<DayStatus> {
        match self {
            CellValue::Status(status) => Some(status),
            CellValue::Unset | CellValue::NotApplicable => None,
        }
    }
}

impl From<Option<DayStatus>> for CellValue {
    fn from(value: Option<DayStatus>) -> Self {
        value.map_or(CellValue::Unset, CellValue::Status)
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Compute the value a cell takes when clicked.
///
/// A locked weekend returns [`CellValue::NotApplicable`] whatever is stored;
/// the caller treats that as a no-op. Otherwise the status advances one step
/// around [`STATUS_CYCLE`], starting at `Present` when nothing is recorded.
pub fn next_status(
    current: Option<DayStatus>,
    is_weekend: bool,
    exception_active: bool,
) -> CellValue {
    if is_weekend && !exception_active {
        return CellValue::NotApplicable;
    }
    match current {
        None => CellValue::Status(DayStatus::Present),
        Some(status) => CellValue::Status(status.next()),
    }
}

/// The value a cell displays for a stored status.
pub fn display_value(
    stored: Option<DayStatus>,
    is_weekend: bool,
    exception_active: bool,
) -> CellValue {
    if is_weekend && !exception_active {
        CellValue::NotApplicable
    } else {
        CellValue::from(stored)
    }
}
