use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use school_calendar_scraper::{
    scrape_athletics_calendar, scrape_athletics_teams, scrape_school_calendars, AthleticEvent,
    DayRecord, HttpFetcher, SchoolCalendars, ScraperConfig, Team,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

const DEFAULT_PORT: u16 = 5000;

struct AppState {
    config: ScraperConfig,
    fetcher: HttpFetcher,
    use_cache: bool,
}

type SharedState = Arc<AppState>;

/// Any scrape failure becomes a bare 500
struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = ?self.0, "scrape failed");
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
}

impl<E: Into<anyhow::Error>> From<E> for AppError {
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

async fn school_calendars(
    State(state): State<SharedState>,
) -> Result<Json<SchoolCalendars>, AppError> {
    let calendars = scrape_school_calendars(&state.config, &state.fetcher, state.use_cache).await?;
    Ok(Json(calendars))
}

async fn athletics_calendar(
    State(state): State<SharedState>,
) -> Result<Json<Vec<DayRecord<AthleticEvent>>>, AppError> {
    let days = scrape_athletics_calendar(&state.config, &state.fetcher, state.use_cache).await?;
    Ok(Json(days))
}

async fn athletics_teams(State(state): State<SharedState>) -> Result<Json<Vec<Team>>, AppError> {
    let teams = scrape_athletics_teams(&state.config, &state.fetcher, state.use_cache).await?;
    Ok(Json(teams))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let config = ScraperConfig::from_env()?;
    let fetcher = HttpFetcher::new(&config.user_agent, config.request_timeout)
        .context("Failed to build HTTP client")?;
    let use_cache = std::env::var("USE_CACHE").unwrap_or_default() == "1";

    let port = match std::env::var("PORT") {
        Ok(port) => port.parse().context("Invalid PORT")?,
        Err(_) => DEFAULT_PORT,
    };

    let state = Arc::new(AppState {
        config,
        fetcher,
        use_cache,
    });

    let app = Router::new()
        .route("/scrapeSchoolCalendars", get(school_calendars))
        .route("/scrapeAthleticsCalendar", get(athletics_calendar))
        .route("/scrapeAthleticsTeams", get(athletics_teams))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    tracing::info!(port, "app is running");

    axum::serve(listener, app).await?;
    Ok(())
}
