//! ARENA — Match Betting Session Engine
//!
//! Entry point. Loads configuration, initialises structured logging,
//! opens a betting session against the configured market feed, and
//! runs the refresh loop with graceful shutdown. On startup a short
//! scripted flow exercises the slip end to end so a fresh checkout
//! shows a full select→stake→place round trip in the logs.

use anyhow::Result;
use rust_decimal::Decimal;
use std::time::Duration;
use tracing::{info, warn};

use arena::config;
use arena::engine::BettingSession;
use arena::feeds::cricket::CricketFeed;
use arena::feeds::sample::SampleFeed;
use arena::feeds::MarketFeed;
use arena::ladder;
use arena::types::{BetSide, MatchMarket, SlipMode};

const BANNER: &str = r#"
    _    ____  _____ _   _    _
   / \  |  _ \| ____| \ | |  / \
  / _ \ | |_) |  _| |  \| | / _ \
 / ___ \|  _ <| |___| |\  |/ ___ \
/_/   \_\_| \_\_____|_| \_/_/   \_\

  Match Betting Grid and Session Engine
  v0.1.0
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    // Load configuration from TOML
    let cfg = config::AppConfig::load("config.toml")?;

    // Initialise structured logging
    init_logging();

    // Print startup banner
    println!("{BANNER}");
    info!(
        session_name = %cfg.session.name,
        starting_balance = %cfg.session.starting_balance,
        currency = %cfg.session.currency,
        refresh_interval_secs = cfg.session.refresh_interval_secs,
        "ARENA starting up"
    );

    // -- Feed selection ---------------------------------------------------

    let feed = build_feed(&cfg);
    info!(feed = feed.name(), "Market feed selected");

    // -- Session -----------------------------------------------------------

    let mut session = BettingSession::new(cfg.session.starting_balance);

    let markets = refresh_grid(feed.as_ref()).await;
    log_grid(&markets);

    if let Err(e) = demo_flow(&mut session, &markets, &cfg) {
        warn!(error = %e, "Scripted slip flow failed");
    }

    // -- Refresh loop ------------------------------------------------------

    let refresh = Duration::from_secs(cfg.session.refresh_interval_secs);
    let mut interval = tokio::time::interval(refresh);
    interval.tick().await; // First tick fires immediately
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    info!(
        interval_secs = cfg.session.refresh_interval_secs,
        "Entering refresh loop. Press Ctrl+C to stop."
    );

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let markets = refresh_grid(feed.as_ref()).await;
                log_grid(&markets);
                info!(
                    balance = format!("${:.2}", session.balance()),
                    unmatched = session.unmatched_bets().len(),
                    matched = session.matched_bets().len(),
                    "Session status"
                );
            }
            _ = &mut shutdown => {
                info!("Shutdown signal received.");
                break;
            }
        }
    }

    info!(
        balance = format!("${:.2}", session.balance()),
        matched = session.matched_bets().len(),
        "ARENA shut down cleanly."
    );

    Ok(())
}

/// Pick the configured live feed, falling back to the sample catalog
/// when the feed is disabled or its API key is not set.
fn build_feed(cfg: &config::AppConfig) -> Box<dyn MarketFeed> {
    if cfg.feeds.cricket.enabled {
        match config::AppConfig::resolve_env(&cfg.feeds.cricket.api_key_env) {
            Ok(api_key) => match CricketFeed::new(api_key, cfg.feeds.cricket.host.clone()) {
                Ok(feed) => return Box::new(feed),
                Err(e) => warn!(error = %e, "Cricket feed unavailable, using sample catalog"),
            },
            Err(e) => warn!(error = %e, "Cricket feed key missing, using sample catalog"),
        }
    }
    Box::new(SampleFeed::new())
}

/// Fetch the current grid. A failing or empty fetch degrades to the
/// sample catalog so the grid is never blank.
async fn refresh_grid(feed: &dyn MarketFeed) -> Vec<MatchMarket> {
    match feed.fetch_markets().await {
        Ok(markets) if !markets.is_empty() => markets,
        Ok(_) => {
            warn!(feed = feed.name(), "Feed returned no markets, using sample catalog");
            SampleFeed::catalog()
        }
        Err(e) => {
            warn!(feed = feed.name(), error = %e, "Feed fetch failed, using sample catalog");
            SampleFeed::catalog()
        }
    }
}

/// Log one line per market with its derived back/lay ladders.
fn log_grid(markets: &[MatchMarket]) {
    info!(count = markets.len(), "Market grid refreshed");
    for market in markets {
        let home = ladder::build(market.home_price);
        let away = ladder::build(market.away_price);
        info!(
            market = %market.id,
            matchup = format!("{} v {}", market.home_team, market.away_team),
            live = market.is_live,
            home_back = %home.best_back(),
            home_lay = %home.best_lay(),
            away_back = %away.best_back(),
            away_lay = %away.best_lay(),
            "{}", market.competition
        );
    }
}

/// Scripted slip round trip: back the home side of the first two
/// markets, stake them with the first quick-stake preset, and place
/// as an accumulator.
fn demo_flow(
    session: &mut BettingSession,
    markets: &[MatchMarket],
    cfg: &config::AppConfig,
) -> Result<()> {
    let quick_stake = cfg
        .session
        .quick_stakes
        .first()
        .copied()
        .unwrap_or(Decimal::ONE);

    let mut selected = 0usize;
    for market in markets.iter().take(2) {
        if let Some(event) = market.outcome_event(BetSide::Home) {
            let id = session.select(event)?;
            session.set_stake(&id, quick_stake);
            selected += 1;
        }
    }

    if selected == 0 {
        warn!("No selectable markets for the scripted flow");
        return Ok(());
    }

    if selected > 1 {
        session.set_mode(SlipMode::Accumulator);
        session.set_total_stake(quick_stake * Decimal::from(selected as u64));
    }

    let totals = session.totals();
    info!(%totals, picks = selected, "Slip built");

    let receipt = session.place_bets()?;
    info!(%receipt, "Scripted flow placed");

    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("arena=info"));

    let json_logging = std::env::var("ARENA_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
