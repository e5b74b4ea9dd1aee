// giftbot-core/src/services/giveaway/duration.rs

use once_cell::sync::Lazy;
use regex::Regex;

use crate::Error;

pub const MS_PER_SECOND: u64 = 1_000;
pub const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
pub const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;
pub const MS_PER_DAY: u64 = 24 * MS_PER_HOUR;

static DURATION_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+)\s*([dhms])").expect("duration token regex is valid")
});

/// Parses text such as `1d 2h`, `30m`, `2H30M` into milliseconds.
///
/// Tokens may appear in any order and repeated units add up. Text between
/// tokens is ignored, but text with no token at all is `InvalidFormat`.
/// Zero is a valid result; callers that arm timers must reject it.
pub fn parse_duration(text: &str) -> Result<u64, Error> {
    let mut total: u64 = 0;
    let mut matched = false;

    for caps in DURATION_TOKEN.captures_iter(text) {
        matched = true;
        let amount: u64 = caps[1]
            .parse()
            .map_err(|_| Error::InvalidFormat(format!("'{}' is too large", &caps[1])))?;
        let unit_ms = match caps[2].to_ascii_lowercase().as_str() {
            "d" => MS_PER_DAY,
            "h" => MS_PER_HOUR,
            "m" => MS_PER_MINUTE,
            _ => MS_PER_SECOND,
        };
        total = amount
            .checked_mul(unit_ms)
            .and_then(|ms| total.checked_add(ms))
            .ok_or_else(|| Error::InvalidFormat(format!("'{text}' is too long")))?;
    }

    if !matched {
        return Err(Error::InvalidFormat(format!("'{text}' contains no duration")));
    }
    Ok(total)
}

/// Renders milliseconds back into the compact form `parse_duration` accepts,
/// largest unit first. Sub-second remainders are dropped.
pub fn format_duration(ms: u64) -> String {
    let mut rest = ms;
    let mut parts = Vec::new();
    for (unit_ms, suffix) in [
        (MS_PER_DAY, 'd'),
        (MS_PER_HOUR, 'h'),
        (MS_PER_MINUTE, 'm'),
        (MS_PER_SECOND, 's'),
    ] {
        let amount = rest / unit_ms;
        if amount > 0 {
            parts.push(format!("{amount}{suffix}"));
            rest %= unit_ms;
        }
    }
    if parts.is_empty() {
        return "0s".to_string();
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_tokens() {
        assert_eq!(parse_duration("1d").unwrap(), 86_400_000);
        assert_eq!(parse_duration("2h").unwrap(), 7_200_000);
        assert_eq!(parse_duration("15m").unwrap(), 900_000);
        assert_eq!(parse_duration("45s").unwrap(), 45_000);
    }

    #[test]
    fn units_are_case_insensitive() {
        assert_eq!(parse_duration("1D").unwrap(), parse_duration("1d").unwrap());
        assert_eq!(parse_duration("3H 2M").unwrap(), parse_duration("3h 2m").unwrap());
    }

    #[test]
    fn token_order_does_not_matter() {
        assert_eq!(parse_duration("1d 2h").unwrap(), parse_duration("2h 1d").unwrap());
        assert_eq!(
            parse_duration("5s 4m 3h 2d").unwrap(),
            parse_duration("2d 3h 4m 5s").unwrap()
        );
    }

    #[test]
    fn duplicate_units_are_summed() {
        assert_eq!(parse_duration("1d 1d").unwrap(), 2 * parse_duration("1d").unwrap());
        assert_eq!(parse_duration("30m30m").unwrap(), MS_PER_HOUR);
    }

    #[test]
    fn whitespace_between_tokens_is_optional() {
        assert_eq!(parse_duration("1h30m").unwrap(), parse_duration("1h 30m").unwrap());
        assert_eq!(parse_duration("  1 h  ").unwrap(), MS_PER_HOUR);
    }

    #[test]
    fn no_token_is_invalid_format() {
        assert!(matches!(parse_duration(""), Err(Error::InvalidFormat(_))));
        assert!(matches!(parse_duration("xyz"), Err(Error::InvalidFormat(_))));
        assert!(matches!(parse_duration("10"), Err(Error::InvalidFormat(_))));
        assert!(matches!(parse_duration("h"), Err(Error::InvalidFormat(_))));
    }

    #[test]
    fn unmatched_text_between_tokens_is_ignored() {
        assert_eq!(parse_duration("1d and 2h").unwrap(), MS_PER_DAY + 2 * MS_PER_HOUR);
    }

    #[test]
    fn zero_is_a_valid_parse() {
        assert_eq!(parse_duration("0s").unwrap(), 0);
    }

    #[test]
    fn overflow_is_invalid_format() {
        assert!(matches!(
            parse_duration("99999999999999999999d"),
            Err(Error::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_duration("200000000000000d"),
            Err(Error::InvalidFormat(_))
        ));
    }

    #[test]
    fn format_uses_largest_units_first() {
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(MS_PER_DAY + 2 * MS_PER_HOUR), "1d 2h");
        assert_eq!(format_duration(90 * MS_PER_MINUTE), "1h 30m");
        assert_eq!(format_duration(61_500), "1m 1s");
    }

    #[test]
    fn format_output_parses_back() {
        for text in ["1d 2h", "45s", "3d 4h 5m 6s"] {
            let ms = parse_duration(text).unwrap();
            assert_eq!(format_duration(ms), text);
        }
    }
}
