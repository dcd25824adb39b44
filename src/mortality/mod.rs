//! Mortality calculations over a single table
//!
//! Rate tables (annual probability of death by age) answer point and
//! cumulative mortality questions. Life tables (count alive by age) answer
//! how much of the original cohort a person has outlived.
//!
//! Ages map to 1-based value indices: index 1 is the table's minimum age as
//! reported by [`crate::inference::minimum_age`].

mod schedule;

pub use schedule::{survival_schedule, ScheduleRow};

use crate::error::MortalityError;
use crate::inference::{maximum_age, minimum_age};
use crate::table::MortalityTable;

/// Days used to spread an annual rate evenly
pub const DAYS_PER_YEAR: f64 = 365.0;

/// 1-based value index for an age, given the table's minimum age
fn age_index(age: u32, min_age: u32) -> u32 {
    age - min_age + 1
}

/// Probability of dying within one year at `age`
///
/// Fails with [`MortalityError::AgeOutOfRange`] when the age lies outside the
/// table's modeled ages.
pub fn year_mortality(age: u32, table: &MortalityTable) -> Result<f64, MortalityError> {
    let min = minimum_age(table);
    let max = maximum_age(table);
    if age < min || age > max {
        return Err(MortalityError::AgeOutOfRange { age, min, max });
    }

    let index = age_index(age, min);
    table
        .primary()
        .ok_or(MortalityError::EmptyTable)?
        .value(index)
        .ok_or(MortalityError::MissingValue { index })
}

/// Probability of dying on a single day at `age`
///
/// Annual mortality spread uniformly across the year.
pub fn day_mortality(age: u32, table: &MortalityTable) -> Result<f64, MortalityError> {
    Ok(year_mortality(age, table)? / DAYS_PER_YEAR)
}

/// Probability of dying within `years` years starting at `age`
///
/// Returns exactly 1.0 once `age + years - 1` passes the table's maximum age:
/// the table says nothing beyond its last age, which is modeled as certain
/// death.
///
/// Survival is the product of one-year survival at `age` and at each age from
/// `age + 1` up to but excluding `age + years - 1`, so ranges of zero, one and
/// two years all reduce to the point mortality at `age`.
pub fn range_mortality(
    age: u32,
    table: &MortalityTable,
    years: u32,
) -> Result<f64, MortalityError> {
    let last_age = age as i64 + years as i64 - 1;
    if last_age > maximum_age(table) as i64 {
        return Ok(1.0);
    }

    let mut survival = 1.0 - year_mortality(age, table)?;
    for future_age in (age as i64 + 1)..last_age {
        survival *= 1.0 - year_mortality(future_age as u32, table)?;
    }

    Ok(1.0 - survival)
}

/// Fraction of the original cohort that has died by `age`
///
/// The cohort size is the value at the table's first index. Ages below the
/// table minimum give 0.0; ages above the maximum are clamped to it. The
/// count alive comes from whichever stored index, across all sub-tables, is
/// nearest to the target index (first one wins a tie).
///
/// A table whose maximum age is below its minimum age is out of range for
/// every age at or above the minimum.
pub fn year_outlived(age: u32, life_table: &MortalityTable) -> Result<f64, MortalityError> {
    let pool_size = life_table
        .primary()
        .and_then(|t| t.values.values().next().copied())
        .ok_or(MortalityError::EmptyTable)?;
    if pool_size == 0.0 {
        return Err(MortalityError::EmptyCohort);
    }

    let min = minimum_age(life_table);
    if age < min {
        return Ok(0.0);
    }
    let max = maximum_age(life_table);
    if max < min {
        return Err(MortalityError::AgeOutOfRange { age, min, max });
    }
    let age = age.min(max);
    let target = age_index(age, min) as i64;

    let count_alive = life_table
        .tables
        .iter()
        .flat_map(|sub| sub.values.iter())
        .min_by_key(|&(&index, _)| (index as i64 - target).abs())
        .map(|(_, &alive)| alive)
        .ok_or(MortalityError::EmptyTable)?;

    Ok((pool_size - count_alive) / pool_size)
}
