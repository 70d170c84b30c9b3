use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// One calendar day and its events, in page order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayRecord<E> {
    pub month: String,
    pub day_of_week: Option<String>,
    pub date_number: Option<u32>,
    pub year: Option<i32>,
    pub events: Vec<E>,
}

impl<E> DayRecord<E> {
    pub fn from_header(header: DayHeader) -> Self {
        Self {
            month: header.month,
            day_of_week: header.day_of_week,
            date_number: header.date_number,
            year: header.year,
            events: Vec::new(),
        }
    }

    /// Fill whatever the header couldn't supply from a fully known date
    pub fn fill_missing(&mut self, info: &DayInfo) {
        if self.month.is_empty() {
            self.month = info.month.clone();
        }
        self.day_of_week
            .get_or_insert_with(|| info.day_of_week.clone());
        self.date_number.get_or_insert(info.date_number);
        self.year.get_or_insert(info.year);
    }
}

/// Date fields read from a day's header fragment; any may be missing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayHeader {
    pub month: String,
    pub day_of_week: Option<String>,
    pub date_number: Option<u32>,
    pub year: Option<i32>,
}

impl DayHeader {
    /// The header as a complete date, if nothing is missing
    pub fn to_day_info(&self) -> Option<DayInfo> {
        if self.month.is_empty() {
            return None;
        }

        Some(DayInfo {
            month: self.month.clone(),
            day_of_week: self.day_of_week.clone()?,
            date_number: self.date_number?,
            year: self.year?,
        })
    }
}

/// A fully known date, as attached to every athletic event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayInfo {
    pub month: String,
    pub day_of_week: String,
    pub date_number: u32,
    pub year: i32,
}

/// Non-athletic calendar entry. Only `event_name` is guaranteed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralEvent {
    pub event_name: String,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub event_location: Option<String>,
}

/// A game or meet from the athletics calendar
///
/// `event_location` is a place name (e.g. "Jelleff Field") and `event_address`
/// a mappable address; a home game at an alternate facility has both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AthleticEvent {
    #[serde(rename = "eventID")]
    pub event_id: u32,
    #[serde(rename = "teamID")]
    pub team_id: u32,
    pub team_name: String,
    /// Special name for the event, e.g. "Cross Country Invitational"
    pub event_name: Option<String>,
    pub opponent: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub dismissal_time: Option<String>,
    pub return_time: Option<String>,
    pub is_home: bool,
    pub event_location: Option<String>,
    pub event_address: Option<String>,
    pub day_info: DayInfo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Season {
    Fall,
    Winter,
    Spring,
}

impl FromStr for Season {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fall" => Ok(Season::Fall),
            "winter" => Ok(Season::Winter),
            "spring" => Ok(Season::Spring),
            other => Err(format!("unknown season {:?}", other)),
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Season::Fall => "Fall",
            Season::Winter => "Winter",
            Season::Spring => "Spring",
        };
        f.write_str(name)
    }
}

/// An athletics team as listed on the teams page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    #[serde(rename = "teamID")]
    pub team_id: u32,
    pub team_name: String,
    pub season: Season,
}

/// Read-only lookup of the teams a scrape admits
#[derive(Debug, Clone, Default)]
pub struct TeamRegistry {
    teams: HashMap<u32, Team>,
    always_away: HashSet<u32>,
}

impl TeamRegistry {
    pub fn from_teams(
        teams: impl IntoIterator<Item = Team>,
        always_away: impl IntoIterator<Item = u32>,
    ) -> Self {
        Self {
            teams: teams.into_iter().map(|t| (t.team_id, t)).collect(),
            always_away: always_away.into_iter().collect(),
        }
    }

    pub fn get(&self, team_id: u32) -> Option<&Team> {
        self.teams.get(&team_id)
    }

    pub fn team_name(&self, team_id: u32) -> Option<&str> {
        self.get(team_id).map(|t| t.team_name.as_str())
    }

    /// Teams whose games are listed as away whatever the page says
    pub fn is_always_away(&self, team_id: u32) -> bool {
        self.always_away.contains(&team_id)
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}
