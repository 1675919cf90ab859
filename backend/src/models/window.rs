use chrono::{DateTime, Duration, FixedOffset};
use serde::{Deserialize, Serialize};

use super::time::{align_to_slot, whole_minutes, MINUTES_PER_DAY};
use crate::error::{GuideError, GuideResult};

/// Check that `slot_count` slots of `slot_width` minutes form a valid grid.
pub fn validate_grid_shape(slot_count: u32, slot_width: u32) -> GuideResult<()> {
    if slot_count < 1 {
        return Err(GuideError::invalid_argument(format!(
            "slot_count must be at least 1, got {}",
            slot_count
        )));
    }
    if slot_width == 0 || MINUTES_PER_DAY % slot_width != 0 {
        return Err(GuideError::invalid_argument(format!(
            "slot_width must evenly divide {} minutes, got {}",
            MINUTES_PER_DAY, slot_width
        )));
    }
    Ok(())
}

/// The `[start, end)` interval a grid request is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridWindow {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub slot_count: u32,
    pub slot_width: u32,
}

impl GridWindow {
    /// Window of `slot_count` slots of `slot_width` minutes, starting at the
    /// latest slot boundary at or before `now`.
    pub fn starting_at_or_before(
        now: DateTime<FixedOffset>,
        slot_count: u32,
        slot_width: u32,
    ) -> GuideResult<Self> {
        validate_grid_shape(slot_count, slot_width)?;

        let start = align_to_slot(now, slot_width);
        let length = Duration::minutes(i64::from(slot_count) * i64::from(slot_width));
        let end = start.checked_add_signed(length).ok_or_else(|| {
            GuideError::invalid_argument(format!(
                "a window of {} x {} minutes from {} is out of range",
                slot_count, slot_width, start
            ))
        })?;

        Ok(Self {
            start,
            end,
            slot_count,
            slot_width,
        })
    }

    pub fn length_minutes(&self) -> i64 {
        whole_minutes(self.start, self.end)
    }
}
