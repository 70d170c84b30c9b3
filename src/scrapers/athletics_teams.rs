use crate::config::CalendarOptions;
use crate::error::ScrapeResult;
use crate::models::{Season, Team};
use crate::utils::html::{element_text, query_id, resolve_url, selector};
use reqwest::Url;
use scraper::Html;
use tracing::{debug, warn};

/// Scrape the athletics teams list.
///
/// Teams sit in `.teamlist .content-group` blocks whose last class is the
/// season; each team is a link to its schedule carrying `TeamID=<n>`.
/// Returned Fall, then Winter, then Spring, page order within a season.
pub fn parse_athletics_teams(html: &str, options: &CalendarOptions) -> ScrapeResult<Vec<Team>> {
    let document = Html::parse_document(html);
    let group_selector = selector(".teamlist .content-group")?;
    let link_selector = selector("a")?;

    let mut teams = Vec::new();

    for group in document.select(&group_selector) {
        let season_class = group
            .value()
            .attr("class")
            .and_then(|classes| classes.split_whitespace().last())
            .unwrap_or_default();

        let season: Season = match season_class.parse() {
            Ok(season) => season,
            Err(e) => {
                warn!(error = %e, "skipping team group");
                continue;
            }
        };

        for link in group.select(&link_selector) {
            let team_name = element_text(link).trim().to_string();
            let href = link.value().attr("href").unwrap_or_default();
            let Some(team_id) = team_id_from_href(&options.base_url, href) else {
                debug!(team_name = %team_name, "team link has no TeamID");
                continue;
            };

            teams.push(Team {
                team_id,
                team_name,
                season,
            });
        }
    }

    teams.sort_by_key(|t| t.season);
    Ok(teams)
}

/// ".../schedule/index.aspx?TeamID=1228" -> 1228
fn team_id_from_href(base: &Url, href: &str) -> Option<u32> {
    query_id(&resolve_url(base, href)?, "TeamID")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> CalendarOptions {
        CalendarOptions::new("http://www.maret.org").unwrap()
    }

    const TEAMS_HTML: &str = r#"<html><body><div class="teamlist">
        <div class="content-group spring">
            <a href="/athletics-center/list/team/schedule/index.aspx?TeamID=3001">Varsity Baseball</a>
        </div>
        <div class="content-group fall">
            <a href="/athletics-center/list/team/schedule/index.aspx?TeamID=4124">Cross Country</a>
            <a href="/athletics-center/list/team/schedule/index.aspx?TeamID=1228&amp;x=1"> Varsity Football </a>
            <a href="/athletics-center/index.aspx">All Teams</a>
        </div>
        <div class="content-group winter">
            <a href="/athletics-center/list/team/schedule/index.aspx?TeamID=2001">Varsity Wrestling</a>
        </div>
        <div class="content-group summer">
            <a href="/athletics-center/list/team/schedule/index.aspx?TeamID=5001">Camp</a>
        </div>
    </div></body></html>"#;

    #[test]
    fn test_parse_athletics_teams() {
        let teams = parse_athletics_teams(TEAMS_HTML, &options()).unwrap();

        let summary: Vec<_> = teams
            .iter()
            .map(|t| (t.team_id, t.team_name.as_str(), t.season))
            .collect();

        assert_eq!(
            summary,
            vec![
                (4124, "Cross Country", Season::Fall),
                (1228, "Varsity Football", Season::Fall),
                (2001, "Varsity Wrestling", Season::Winter),
                (3001, "Varsity Baseball", Season::Spring),
            ]
        );
    }

    #[test]
    fn test_team_id_from_href() {
        let base = options().base_url;
        assert_eq!(team_id_from_href(&base, "index.aspx?TeamID=1228"), Some(1228));
        assert_eq!(team_id_from_href(&base, "/list/index.aspx?TeamID=12&LinkID=4"), Some(12));
        assert_eq!(team_id_from_href(&base, "index.aspx?LinkID=4&TeamID=77"), Some(77));
        assert_eq!(team_id_from_href(&base, "index.aspx?TeamID="), None);
        assert_eq!(team_id_from_href(&base, "index.aspx?TeamID=12abc"), None);
        assert_eq!(team_id_from_href(&base, "index.aspx"), None);
    }

    #[test]
    fn test_season_json() {
        let teams = parse_athletics_teams(TEAMS_HTML, &options()).unwrap();
        let json = serde_json::to_value(&teams[0]).unwrap();
        assert_eq!(json["teamID"], 4124);
        assert_eq!(json["teamName"], "Cross Country");
        assert_eq!(json["season"], "Fall");
    }
}
