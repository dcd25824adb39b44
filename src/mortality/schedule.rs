//! Year-by-year survival schedule from a starting age to the end of the table

use serde::Serialize;

use super::year_mortality;
use crate::error::MortalityError;
use crate::inference::maximum_age;
use crate::table::MortalityTable;

/// One row of a survival schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScheduleRow {
    pub age: u32,
    /// Annual mortality rate at this age
    pub mortality: f64,
    /// Probability of surviving from the starting age through this age
    pub survival: f64,
    pub cumulative_death: f64,
}

/// Build the schedule for every age from `age` to the table maximum
pub fn survival_schedule(
    age: u32,
    table: &MortalityTable,
) -> Result<Vec<ScheduleRow>, MortalityError> {
    let max = maximum_age(table);
    let mut survival = 1.0;
    let mut rows = Vec::with_capacity(max.saturating_sub(age) as usize + 1);

    for current in age..=max {
        let mortality = year_mortality(current, table)?;
        survival *= 1.0 - mortality;
        rows.push(ScheduleRow {
            age: current,
            mortality,
            survival,
            cumulative_death: 1.0 - survival,
        });
    }

    Ok(rows)
}
