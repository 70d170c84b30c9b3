use crate::api::fetcher::DEFAULT_USER_AGENT;
use crate::error::FetchError;
use crate::scrapers::title::GrammarOptions;
use anyhow::{Context, Result};
use reqwest::Url;
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://www.maret.org";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where to scrape from and how.
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub base_url: String,
    pub athletics_calendar_url: String,
    pub athletics_teams_url: String,
    /// Calendar name -> calendar page URL
    pub school_calendars: BTreeMap<String, String>,
    pub always_away_team_ids: HashSet<u32>,
    pub grammar: GrammarOptions,
    pub user_agent: String,
    pub request_timeout: Duration,
    pub cache_dir: PathBuf,
}

impl ScraperConfig {
    /// Site defaults rooted at `base_url`
    pub fn with_base_url(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        let athletics = format!("{}/athletics-center/index.aspx", base);

        let school_calendars = [
            ("Lower School", 121),
            ("Middle School", 122),
            ("Upper School", 120),
        ]
        .into_iter()
        .map(|(name, mid)| {
            let url = format!(
                "{}/mobile/index.aspx?v=c&mid={}&t={}",
                base,
                mid,
                name.replace(' ', "%20")
            );
            (name.to_string(), url)
        })
        .collect();

        Self {
            base_url: base.to_string(),
            athletics_calendar_url: athletics.clone(),
            athletics_teams_url: athletics,
            school_calendars,
            always_away_team_ids: HashSet::new(),
            grammar: GrammarOptions::default(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            cache_dir: PathBuf::from("cache"),
        }
    }

    /// Load from the process environment (and `.env`, if present)
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Build from any variable lookup; unset or blank variables keep defaults.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let mut config = match var("SCHOOL_URL_BASE") {
            Some(base) => Self::with_base_url(base.trim()),
            None => Self::default(),
        };

        if let Some(url) = var("ATHLETICS_CALENDAR_URL") {
            config.athletics_calendar_url = url;
        }
        if let Some(url) = var("ATHLETICS_TEAMS_URL") {
            config.athletics_teams_url = url;
        }

        if let Some(ids) = var("ALWAYS_AWAY_TEAM_IDS") {
            config.always_away_team_ids = ids
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(|id| {
                    id.parse::<u32>()
                        .with_context(|| format!("Invalid team id in ALWAYS_AWAY_TEAM_IDS: {}", id))
                })
                .collect::<Result<_>>()?;
        }

        if let Some(flag) = var("SPLIT_INLINE_LOCATION") {
            config.grammar.split_inline_location = parse_flag(&flag)
                .with_context(|| format!("Invalid SPLIT_INLINE_LOCATION: {}", flag))?;
        }

        if let Some(agent) = var("USER_AGENT") {
            config.user_agent = agent;
        }

        if let Some(secs) = var("REQUEST_TIMEOUT_SECS") {
            let secs: u64 = secs
                .trim()
                .parse()
                .with_context(|| format!("Invalid REQUEST_TIMEOUT_SECS: {}", secs))?;
            config.request_timeout = Duration::from_secs(secs);
        }

        if let Some(dir) = var("CACHE_DIR") {
            config.cache_dir = PathBuf::from(dir);
        }

        Ok(config)
    }

    pub fn calendar_options(&self) -> Result<CalendarOptions, FetchError> {
        Ok(CalendarOptions::new(&self.base_url)?.with_grammar(self.grammar))
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }
}

/// What the calendar parsers need beyond the page itself
#[derive(Debug, Clone)]
pub struct CalendarOptions {
    /// Detail links on the listing are relative to this
    pub base_url: Url,
    pub grammar: GrammarOptions,
}

impl CalendarOptions {
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        let base_url =
            Url::parse(base_url).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        Ok(Self {
            base_url,
            grammar: GrammarOptions::default(),
        })
    }

    pub fn with_grammar(mut self, grammar: GrammarOptions) -> Self {
        self.grammar = grammar;
        self
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_map(vars: &[(&str, &str)]) -> Result<ScraperConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ScraperConfig::from_vars(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = ScraperConfig::default();
        assert_eq!(
            config.athletics_calendar_url,
            "http://www.maret.org/athletics-center/index.aspx"
        );
        assert_eq!(
            config.school_calendars["Upper School"],
            "http://www.maret.org/mobile/index.aspx?v=c&mid=120&t=Upper%20School"
        );
        assert_eq!(config.school_calendars.len(), 3);
        assert!(config.grammar.split_inline_location);
    }

    #[test]
    fn test_from_vars_overrides() {
        let config = from_map(&[
            ("SCHOOL_URL_BASE", "https://example.org/"),
            ("ALWAYS_AWAY_TEAM_IDS", "12, 34,"),
            ("SPLIT_INLINE_LOCATION", "off"),
            ("REQUEST_TIMEOUT_SECS", "5"),
            ("CACHE_DIR", " "),
        ])
        .unwrap();

        assert_eq!(config.base_url, "https://example.org");
        assert_eq!(
            config.athletics_teams_url,
            "https://example.org/athletics-center/index.aspx"
        );
        assert_eq!(config.always_away_team_ids, HashSet::from([12, 34]));
        assert!(!config.grammar.split_inline_location);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.cache_dir, PathBuf::from("cache"));
    }

    #[test]
    fn test_from_vars_rejects_bad_values() {
        assert!(from_map(&[("ALWAYS_AWAY_TEAM_IDS", "12,abc")]).is_err());
        assert!(from_map(&[("SPLIT_INLINE_LOCATION", "maybe")]).is_err());
    }

    #[test]
    fn test_calendar_options() {
        let options = ScraperConfig::default().calendar_options().unwrap();
        assert_eq!(options.base_url.as_str(), "http://www.maret.org/");
        assert!(CalendarOptions::new("not a url").is_err());
    }
}
