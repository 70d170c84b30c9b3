use crate::models::{AthleticEvent, DayRecord, GeneralEvent};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Cached scrape result with the time it was taken
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEnvelope<T> {
    pub scraped_at: DateTime<Utc>,
    pub data: T,
}

/// Save scraped data to a JSON cache file
pub fn save_to_cache<T: Serialize>(data: &T, cache_file: &Path) -> Result<()> {
    if let Some(dir) = cache_file.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).context("Failed to create cache directory")?;
    }

    let envelope = CacheEnvelope {
        scraped_at: Utc::now(),
        data,
    };
    let json = serde_json::to_string_pretty(&envelope).context("Failed to serialize cache data")?;
    std::fs::write(cache_file, json).context("Failed to write cache file")?;
    Ok(())
}

/// Load scraped data from a JSON cache file
pub fn load_from_cache<T: DeserializeOwned>(cache_file: &Path) -> Result<CacheEnvelope<T>> {
    let json = std::fs::read_to_string(cache_file).context("Failed to read cache file")?;
    let envelope = serde_json::from_str(&json).context("Failed to deserialize cache data")?;
    Ok(envelope)
}

#[derive(Serialize)]
struct GeneralEventRow<'a> {
    calendar: &'a str,
    month: &'a str,
    day_of_week: Option<&'a str>,
    date: Option<u32>,
    year: Option<i32>,
    event_name: &'a str,
    start_time: Option<&'a str>,
    end_time: Option<&'a str>,
    location: Option<&'a str>,
}

#[derive(Serialize)]
struct AthleticEventRow<'a> {
    event_id: u32,
    team_id: u32,
    team: &'a str,
    date: String,
    event_name: Option<&'a str>,
    opponent: Option<&'a str>,
    home: bool,
    start_time: Option<&'a str>,
    end_time: Option<&'a str>,
    dismissal: Option<&'a str>,
    return_time: Option<&'a str>,
    location: Option<&'a str>,
    address: Option<&'a str>,
}

/// One CSV row per event across all named school calendars
pub fn save_school_calendars_to_csv(
    calendars: &BTreeMap<String, Vec<DayRecord<GeneralEvent>>>,
    filename: &Path,
) -> Result<()> {
    let mut writer = csv::Writer::from_path(filename).context("Failed to create CSV file")?;

    for (calendar, days) in calendars {
        for day in days {
            for event in &day.events {
                writer.serialize(GeneralEventRow {
                    calendar,
                    month: &day.month,
                    day_of_week: day.day_of_week.as_deref(),
                    date: day.date_number,
                    year: day.year,
                    event_name: &event.event_name,
                    start_time: event.start_time.as_deref(),
                    end_time: event.end_time.as_deref(),
                    location: event.event_location.as_deref(),
                })?;
            }
        }
    }

    writer.flush()?;
    Ok(())
}

/// One CSV row per athletic event
pub fn save_athletic_events_to_csv(days: &[DayRecord<AthleticEvent>], filename: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(filename).context("Failed to create CSV file")?;

    for event in days.iter().flat_map(|d| &d.events) {
        let info = &event.day_info;
        writer.serialize(AthleticEventRow {
            event_id: event.event_id,
            team_id: event.team_id,
            team: &event.team_name,
            date: format!(
                "{}, {} {}, {}",
                info.day_of_week, info.month, info.date_number, info.year
            ),
            event_name: event.event_name.as_deref(),
            opponent: event.opponent.as_deref(),
            home: event.is_home,
            start_time: event.start_time.as_deref(),
            end_time: event.end_time.as_deref(),
            dismissal: event.dismissal_time.as_deref(),
            return_time: event.return_time.as_deref(),
            location: event.event_location.as_deref(),
            address: event.event_address.as_deref(),
        })?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DayInfo, Team};
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("school_calendar_scraper_{}", std::process::id()))
            .join(name)
    }

    fn sample_day() -> DayRecord<GeneralEvent> {
        DayRecord {
            month: "September".to_string(),
            day_of_week: Some("Wednesday".to_string()),
            date_number: Some(9),
            year: Some(2015),
            events: vec![GeneralEvent {
                event_name: "US Leadership Workshop".to_string(),
                start_time: Some("6:00 PM".to_string()),
                end_time: Some("7:30 PM".to_string()),
                event_location: Some("Theatre,Theatre Lobby".to_string()),
            }],
        }
    }

    #[test]
    fn test_cache_round_trip() {
        let path = temp_path("cache/days.json");
        let days = vec![sample_day()];

        save_to_cache(&days, &path).unwrap();
        let loaded: CacheEnvelope<Vec<DayRecord<GeneralEvent>>> = load_from_cache(&path).unwrap();

        assert_eq!(loaded.data, days);
        assert!(loaded.scraped_at <= Utc::now());
    }

    #[test]
    fn test_load_missing_cache() {
        let result: Result<CacheEnvelope<Vec<Team>>> = load_from_cache(&temp_path("nope.json"));
        assert!(result.is_err());
    }

    #[test]
    fn test_school_csv() {
        let path = temp_path("school.csv");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();

        let mut calendars = BTreeMap::new();
        calendars.insert("Upper School".to_string(), vec![sample_day()]);
        save_school_calendars_to_csv(&calendars, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let mut lines = written.lines();
        assert_eq!(
            lines.next(),
            Some("calendar,month,day_of_week,date,year,event_name,start_time,end_time,location")
        );
        assert_eq!(
            lines.next(),
            Some("Upper School,September,Wednesday,9,2015,US Leadership Workshop,6:00 PM,7:30 PM,\"Theatre,Theatre Lobby\"")
        );
    }

    #[test]
    fn test_athletic_csv() {
        let path = temp_path("athletics.csv");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();

        let event = AthleticEvent {
            event_id: 12543,
            team_id: 12542,
            team_name: "Girls' Varsity Soccer".to_string(),
            event_name: Some("Landon Invitational".to_string()),
            opponent: Some("Wilson".to_string()),
            start_time: Some("4:00 PM".to_string()),
            end_time: None,
            dismissal_time: Some("2:40 PM".to_string()),
            return_time: Some("After practice".to_string()),
            is_home: false,
            event_location: None,
            event_address: Some("3950 Chesapeake St NW, Washington, DC 20016".to_string()),
            day_info: DayInfo {
                month: "September".to_string(),
                day_of_week: "Thursday".to_string(),
                date_number: 10,
                year: 2015,
            },
        };
        let days = vec![DayRecord {
            month: "September".to_string(),
            day_of_week: Some("Thursday".to_string()),
            date_number: Some(10),
            year: Some(2015),
            events: vec![event],
        }];

        save_athletic_events_to_csv(&days, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let mut lines = written.lines();
        assert_eq!(
            lines.next(),
            Some("event_id,team_id,team,date,event_name,opponent,home,start_time,end_time,dismissal,return_time,location,address")
        );
        assert_eq!(
            lines.next(),
            Some("12543,12542,Girls' Varsity Soccer,\"Thursday, September 10, 2015\",Landon Invitational,Wilson,false,4:00 PM,,2:40 PM,After practice,,\"3950 Chesapeake St NW, Washington, DC 20016\"")
        );
        assert_eq!(lines.next(), None);
    }
}
