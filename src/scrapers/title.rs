//! Game title grammar.
//!
//! Detail-page titles look like `"Varsity Golf vs. Potomac School"`,
//! `"Girls' Varsity Soccer at Wilson - Landon Invitational"` or
//! `"JV Football at Georgetown Day at Jelleff Field"`. There is no real
//! grammar behind them, so parsing is a fixed precedence of rules:
//!
//! 1. suffix rules, first match wins: an explicit event name after `" - "`,
//!    otherwise a trailing venue after the last `" at "` when the title is
//!    ambiguous;
//! 2. a team pairing split on the first `" vs. "`, else the first `" at "`;
//! 3. optionally, an inline venue split off the opponent (`"B at C"`).

use serde::{Deserialize, Serialize};
use tracing::trace;

const EVENT_NAME_DELIMITER: &str = " - ";
const VS: &str = " vs. ";
const AT: &str = " at ";

/// Tuning knobs for calendar variants that disagree on title shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammarOptions {
    /// Split `"Opponent at Venue"` left over after the team pairing.
    pub split_inline_location: bool,
}

impl Default for GrammarOptions {
    fn default() -> Self {
        Self {
            split_inline_location: true,
        }
    }
}

/// Structured pieces of a game title.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleParts {
    /// Our side of the pairing, e.g. "Varsity Golf".
    pub primary: String,
    pub opponent: Option<String>,
    pub location: Option<String>,
    pub event_name: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
enum Suffix {
    EventName(String),
    Location(String),
}

struct SuffixRule {
    name: &'static str,
    apply: fn(&str) -> Option<(&str, Suffix)>,
}

/// Ordered; at most one applies.
const SUFFIX_RULES: &[SuffixRule] = &[
    SuffixRule {
        name: "event-name",
        apply: split_event_name,
    },
    SuffixRule {
        name: "trailing-location",
        apply: split_trailing_location,
    },
];

/// Home-style pairing first, then away-style.
const PAIRING_DELIMITERS: &[&str] = &[VS, AT];

/// Parse a free-form game title.
pub fn parse_title(title: &str, options: &GrammarOptions) -> TitleParts {
    let mut working = title.trim();
    let mut parts = TitleParts::default();

    let matched = SUFFIX_RULES
        .iter()
        .find_map(|rule| (rule.apply)(working).map(|split| (rule.name, split)));

    if let Some((name, (rest, suffix))) = matched {
        trace!(rule = name, title, "title suffix rule matched");
        match suffix {
            Suffix::EventName(event_name) => parts.event_name = non_empty(&event_name),
            Suffix::Location(location) => parts.location = non_empty(&location),
        }
        working = rest;
    }

    let (primary, opponent) = split_pairing(working);
    parts.primary = primary.trim().to_string();
    parts.opponent = opponent.and_then(non_empty);

    if options.split_inline_location {
        split_inline_location(&mut parts);
    }

    parts
}

fn split_event_name(title: &str) -> Option<(&str, Suffix)> {
    let (left, right) = title.split_once(EVENT_NAME_DELIMITER)?;
    Some((left.trim_end(), Suffix::EventName(right.trim().to_string())))
}

fn split_trailing_location(title: &str) -> Option<(&str, Suffix)> {
    if !has_ambiguous_location(title) {
        return None;
    }

    let idx = title.rfind(AT)?;
    let location = title[idx + AT.len()..].trim().to_string();
    Some((title[..idx].trim_end(), Suffix::Location(location)))
}

/// A trailing `" at "` names a venue when there are two of them, or when
/// the `" at "` comes before the `" vs. "` pairing. A single `" at "` after
/// `" vs. "` belongs to the opponent text.
pub fn has_ambiguous_location(title: &str) -> bool {
    if title.matches(AT).count() > 1 {
        return true;
    }

    match (title.find(AT), title.find(VS)) {
        (Some(at), Some(vs)) => at < vs,
        _ => false,
    }
}

fn split_pairing(title: &str) -> (&str, Option<&str>) {
    PAIRING_DELIMITERS
        .iter()
        .find_map(|delim| title.split_once(delim))
        .map_or((title, None), |(primary, opponent)| (primary, Some(opponent)))
}

fn split_inline_location(parts: &mut TitleParts) {
    if parts.location.is_some() {
        return;
    }

    let Some((opponent, location)) = parts
        .opponent
        .as_deref()
        .and_then(|o| o.rsplit_once(AT))
        .map(|(o, l)| (non_empty(o), non_empty(l)))
    else {
        return;
    };

    if opponent.is_some() && location.is_some() {
        parts.opponent = opponent;
        parts.location = location;
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}
