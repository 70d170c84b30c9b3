use crate::error::{ScrapeError, ScrapeResult};

/// Convert a compact time token to display form: "4:00pm" -> "4:00 PM".
///
/// Only the last two characters are treated as the meridiem; nothing else is
/// parsed. Callers that cannot vouch for the token should use [`parse_time`].
pub fn normalize_time(token: &str) -> String {
    let upper = token.trim().to_uppercase();

    // Byte index of the second-to-last char
    let split = match upper.char_indices().rev().nth(1) {
        Some((i, _)) => i,
        None => return upper,
    };

    let (head, meridiem) = upper.split_at(split);
    format!("{} {}", head.trim_end(), meridiem)
}

/// True for a clock time with an AM/PM marker: "4pm", "4:00PM", "10:15 am".
///
/// The part before the marker must be `H`, `HH`, `H:MM` or `HH:MM`, so run-on
/// ranges like "4:00PM-6:00PM" are rejected rather than half-normalized.
pub fn is_time_token(token: &str) -> bool {
    let upper = token.trim().to_uppercase();
    let head = upper
        .strip_suffix("AM")
        .or_else(|| upper.strip_suffix("PM"));

    matches!(head, Some(h) if is_clock(h.trim_end()))
}

fn is_clock(head: &str) -> bool {
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    let (hours, minutes) = match head.split_once(':') {
        Some((hours, minutes)) => (hours, Some(minutes)),
        None => (head, None),
    };

    (1..=2).contains(&hours.len())
        && all_digits(hours)
        && minutes.map_or(true, |m| m.len() == 2 && all_digits(m))
}

/// Guarded normalisation: `None` for anything that doesn't look like a time.
pub fn parse_time(token: &str) -> Option<String> {
    try_normalize_time(token).ok()
}

pub fn try_normalize_time(token: &str) -> ScrapeResult<String> {
    if is_time_token(token) {
        Ok(normalize_time(token))
    } else {
        Err(ScrapeError::UnparseableTime(token.trim().to_string()))
    }
}
