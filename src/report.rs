//! Mortality estimate for one person, and percentage formatting for display

use std::fmt;

use crate::error::MortalityError;
use crate::mortality::{day_mortality, range_mortality, year_mortality, year_outlived};
use crate::table::MortalityTable;

/// Render a probability as a percentage string
///
/// Fixed notation, never scientific. Percentages of 1 or more keep two
/// decimals; smaller ones keep their leading zeros plus two significant
/// digits. Extra digits are truncated and trailing zeros dropped.
pub fn format_percent(probability: f64) -> String {
    let percent = probability * 100.0;
    if !percent.is_finite() {
        return format!("{}%", percent);
    }

    let text = format!("{:.17}", percent.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), ""));

    let keep = if whole == "0" {
        fraction.chars().take_while(|&c| c == '0').count() + 2
    } else {
        2
    };
    let fraction: String = fraction.chars().take(keep).collect();
    let fraction = fraction.trim_end_matches('0');

    let sign = if percent < 0.0 && (whole != "0" || !fraction.is_empty()) {
        "-"
    } else {
        ""
    };
    if fraction.is_empty() {
        format!("{}{}%", sign, whole)
    } else {
        format!("{}{}.{}%", sign, whole, fraction)
    }
}

/// Estimates for one age; `None` where the table does not cover the age
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    pub age: u32,
    pub day: Option<f64>,
    pub year: Option<f64>,
    pub decade: Option<f64>,
    pub three_decades: Option<f64>,
    pub six_decades: Option<f64>,
    pub century: Option<f64>,
    /// Share of the birth cohort already dead
    pub outlived: Option<f64>,
}

fn covered(result: Result<f64, MortalityError>) -> Option<f64> {
    match result {
        Ok(value) => Some(value),
        Err(MortalityError::AgeOutOfRange { .. }) => None,
        Err(error) => {
            log::warn!("estimate unavailable: {}", error);
            None
        }
    }
}

impl Estimate {
    pub fn compute(age: u32, mortality: &MortalityTable, life: Option<&MortalityTable>) -> Self {
        Self {
            age,
            day: covered(day_mortality(age, mortality)),
            year: covered(year_mortality(age, mortality)),
            decade: covered(range_mortality(age, mortality, 10)),
            three_decades: covered(range_mortality(age, mortality, 30)),
            six_decades: covered(range_mortality(age, mortality, 60)),
            century: covered(range_mortality(age, mortality, 100)),
            outlived: life.and_then(|table| covered(year_outlived(age, table))),
        }
    }
}

impl fmt::Display for Estimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |value: Option<f64>| {
            value
                .map(format_percent)
                .unwrap_or_else(|| "n/a".to_string())
        };

        writeln!(f, "Chance of dying today:              {}", show(self.day))?;
        writeln!(f, "Chance of dying this year:          {}", show(self.year))?;
        writeln!(f, "Chance of dying within 10 years:    {}", show(self.decade))?;
        writeln!(f, "Chance of dying within 30 years:    {}", show(self.three_decades))?;
        writeln!(f, "Chance of dying within 60 years:    {}", show(self.six_decades))?;
        writeln!(f, "Chance of dying within 100 years:   {}", show(self.century))?;
        write!(f, "Share of your birth cohort outlived: {}", show(self.outlived))
    }
}
