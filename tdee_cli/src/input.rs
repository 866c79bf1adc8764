//! Parsers for user-entered values, shared by flags and prompts.

use std::ops::RangeInclusive;
use tdee_core::types::{check_bounds, AGE_RANGE, HEIGHT_RANGE, WEIGHT_RANGE};
use tdee_core::Gender;

pub fn parse_age(s: &str) -> Result<u32, String> {
    let s = s.trim();
    let age: u32 = s
        .parse()
        .map_err(|_| format!("age must be a whole number (got '{}')", s))?;
    check_bounds(
        "age",
        f64::from(age),
        f64::from(*AGE_RANGE.start()),
        f64::from(*AGE_RANGE.end()),
    )
    .map_err(|e| e.to_string())?;
    Ok(age)
}

pub fn parse_height(s: &str) -> Result<f64, String> {
    parse_measure("height", s, &HEIGHT_RANGE)
}

pub fn parse_weight(s: &str) -> Result<f64, String> {
    parse_measure("weight", s, &WEIGHT_RANGE)
}

pub fn parse_gender(s: &str) -> Result<Gender, String> {
    s.parse()
}

fn parse_measure(field: &'static str, s: &str, range: &RangeInclusive<f64>) -> Result<f64, String> {
    let s = s.trim();
    let value: f64 = s
        .parse()
        .map_err(|_| format!("{} must be a number (got '{}')", field, s))?;
    check_bounds(field, value, *range.start(), *range.end()).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_age() {
        assert_eq!(parse_age(" 42 "), Ok(42));
        assert!(parse_age("0").unwrap_err().contains("between 1 and 120"));
        assert!(parse_age("30.5").unwrap_err().contains("whole number"));
    }

    #[test]
    fn test_parse_measures() {
        assert_eq!(parse_height("182.5"), Ok(182.5));
        assert!(parse_height("99").is_err());
        assert_eq!(parse_weight("30"), Ok(30.0));
        assert!(parse_weight("heavy").unwrap_err().contains("must be a number"));
        assert!(parse_weight("NaN").is_err());
    }
}
