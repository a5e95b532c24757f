use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

pub const MAX_SEATS: u32 = 5;
pub const MAX_BAGS: u32 = 15;

/// Step-2 counters. Independent fields, each with its own cap; no
/// cross-field constraint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LuggageDetails {
    pub baby_seats: u32,
    pub child_seats: u32,
    pub strollers: u32,
    pub hand_luggages: u32,
    pub backpacks: u32,
    pub suitcases: u32,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LuggagePatch {
    pub baby_seats: Option<u32>,
    pub child_seats: Option<u32>,
    pub strollers: Option<u32>,
    pub hand_luggages: Option<u32>,
    pub backpacks: Option<u32>,
    pub suitcases: Option<u32>,
}

impl LuggageDetails {
    pub fn apply(&mut self, patch: LuggagePatch) -> AppResult<()> {
        set_counter(&mut self.baby_seats, patch.baby_seats, "baby seats", MAX_SEATS)?;
        set_counter(&mut self.child_seats, patch.child_seats, "child seats", MAX_SEATS)?;
        set_counter(&mut self.strollers, patch.strollers, "strollers", MAX_SEATS)?;
        set_counter(
            &mut self.hand_luggages,
            patch.hand_luggages,
            "hand luggage",
            MAX_BAGS,
        )?;
        set_counter(&mut self.backpacks, patch.backpacks, "backpacks", MAX_BAGS)?;
        set_counter(&mut self.suitcases, patch.suitcases, "suitcases", MAX_BAGS)?;
        Ok(())
    }
}

fn set_counter(slot: &mut u32, value: Option<u32>, label: &str, max: u32) -> AppResult<()> {
    if let Some(value) = value {
        if value > max {
            return Err(AppError::BadRequest(format!(
                "At most {} {} allowed",
                max, label
            )));
        }
        *slot = value;
    }
    Ok(())
}
