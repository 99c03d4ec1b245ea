//! Validation of user-entered durations

use std::time::Duration;

use crate::error::InputError;

/// Longest countdown the custom prompt accepts: one year
pub const MAX_MINUTES: f64 = 365.0 * 24.0 * 60.0;

/// Parse a number of minutes typed into the custom timer prompt
pub fn parse_minutes(raw: &str) -> Result<Duration, InputError> {
    let trimmed = raw.trim();
    let minutes: f64 = trimmed
        .parse()
        .map_err(|_| InputError::NotANumber(trimmed.to_string()))?;

    if !minutes.is_finite() {
        return Err(InputError::NotFinite);
    }
    if minutes <= 0.0 {
        return Err(InputError::NotPositive(minutes));
    }
    if minutes > MAX_MINUTES {
        return Err(InputError::TooLarge(minutes));
    }

    Duration::try_from_secs_f64(minutes * 60.0).map_err(|_| InputError::NotFinite)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minutes_accepts_fractions() {
        assert_eq!(parse_minutes("5").unwrap(), Duration::from_secs(300));
        assert_eq!(parse_minutes(" 2.5 ").unwrap(), Duration::from_secs(150));
        assert_eq!(parse_minutes("0.5").unwrap(), Duration::from_secs(30));
    }

    #[test]
    fn test_parse_minutes_rejects_garbage() {
        assert_eq!(parse_minutes("five"), Err(InputError::NotANumber("five".to_string())));
        assert_eq!(parse_minutes(""), Err(InputError::NotANumber(String::new())));
        assert_eq!(parse_minutes("inf"), Err(InputError::NotFinite));
        assert_eq!(parse_minutes("NaN"), Err(InputError::NotFinite));
        assert_eq!(parse_minutes("0"), Err(InputError::NotPositive(0.0)));
        assert_eq!(parse_minutes("-3"), Err(InputError::NotPositive(-3.0)));
        assert_eq!(parse_minutes("2e17"), Err(InputError::TooLarge(2e17)));
        assert_eq!(parse_minutes("525601"), Err(InputError::TooLarge(525601.0)));
        assert_eq!(parse_minutes("525600").unwrap(), Duration::from_secs(525_600 * 60));
    }
}
