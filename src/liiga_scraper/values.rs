//! Numeric cells with `-`/empty "missing" sentinels. Anything else that is
//! not a number is a hard error.

use crate::error::Result;

fn present(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty() && value != "-").then_some(value)
}

pub(crate) fn str_value(value: &str) -> Option<String> {
    present(value).map(str::to_string)
}

pub(crate) fn int_value(value: &str) -> Result<Option<u32>> {
    Ok(present(value).map(str::parse::<u32>).transpose()?)
}

pub(crate) fn signed_value(value: &str) -> Result<Option<i32>> {
    Ok(present(value).map(str::parse::<i32>).transpose()?)
}

/// Percentages use a decimal comma, e.g. `91,5`.
pub(crate) fn pct_value(value: &str) -> Result<Option<f64>> {
    Ok(present(value)
        .map(|v| v.trim_end_matches('%').trim().replace(',', "."))
        .map(|v| v.parse::<f64>())
        .transpose()?)
}

/// Counts that the site groups with spaces, e.g. `4 567`.
pub(crate) fn count_value(value: &str) -> Result<Option<u32>> {
    let digits: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    int_value(&digits)
}

pub(crate) fn required_int(value: &str) -> Result<u32> {
    Ok(value.trim().parse::<u32>()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_sentinels() {
        assert_eq!(int_value("-").unwrap(), None);
        assert_eq!(int_value("  ").unwrap(), None);
        assert_eq!(int_value(" 12 ").unwrap(), Some(12));
        assert_eq!(str_value("-"), None);
        assert_eq!(signed_value("-3").unwrap(), Some(-3));
        assert_eq!(signed_value("+2").unwrap(), Some(2));
    }

    #[test]
    fn test_pct_value_decimal_comma() {
        assert_eq!(pct_value("91,5").unwrap(), Some(91.5));
        assert_eq!(pct_value("").unwrap(), None);
    }

    #[test]
    fn test_malformed_number_is_an_error() {
        assert!(int_value("12x").is_err());
        assert!(pct_value("abc").is_err());
        assert!(required_int("").is_err());
    }

    #[test]
    fn test_count_value_grouped_digits() {
        assert_eq!(count_value("4 567").unwrap(), Some(4567));
        assert_eq!(count_value("4\u{a0}567").unwrap(), Some(4567));
    }
}
