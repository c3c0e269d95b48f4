//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// This is the main entry point for the league live-updates server.
// It loads the configuration, wires the record store, subscription registry and lifecycle
// orchestrator together, optionally plays a simulated round of fixtures, and serves the API.
//--------------------------------------------------------------------------------------------------
// To run the server: cargo run -- --port 8080
// To run a demo round first: cargo run -- --demo --seed 7
// cargo run -- --demo --log-level debug
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use rand::{rngs::StdRng, Rng, SeedableRng};
use structopt::StructOpt;
use tokio::signal;
use tracing::{info, warn, Level};
use uuid::Uuid;

use league_live::{
    Api, AppState, Config,
    domain::models::types::{CardColor, EventKind, League, MatchStatus, Player, Team},
    inbounds::{
        dtos::{MatchEventRequest, MatchSavedRequest},
        handlers::{handle_match_event, handle_match_saved},
    },
    outbounds::{in_memory_store::InMemoryRecordStore, queue_channel::QueueChannel},
};

/// CLI options for the application
#[derive(StructOpt, Debug)]
#[structopt(name = "league-live", about = "Live match updates and league standings")]
struct Opt {
    /// Port to use for the API server, overriding BIND_ADDR
    #[structopt(long, help = "API server port")]
    port: Option<u16>,

    /// Whether to simulate a round of fixtures before serving
    #[structopt(long, help = "Seed a league and simulate a round of fixtures")]
    demo: bool,

    /// Seed for the demo simulation
    #[structopt(long, help = "Random seed for the demo")]
    seed: Option<u64>,

    /// Maximum log level
    #[structopt(long, default_value = "info", help = "Log level (error, warn, info, debug, trace)")]
    log_level: Level,

    /// Exit after the demo instead of serving
    #[structopt(long, help = "Do not start the API server")]
    no_serve: bool,
}

struct Squad {
    team: Team,
    players: Vec<Player>,
}

/// Registers a league with four squads in the store
fn seed_league(store: &InMemoryRecordStore) -> (League, Vec<Squad>) {
    let league = League {
        id: Uuid::new_v4(),
        name: "Coastal Premier".to_string(),
        season: "2026/27".to_string(),
        start_date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap_or(NaiveDate::MIN),
        end_date: NaiveDate::from_ymd_opt(2027, 5, 31).unwrap_or(NaiveDate::MIN),
    };
    store.add_league(league.clone());

    let rosters = [
        ("Harbour Hawks", "HAW", [("Ana", "Ruiz"), ("Joel", "Park"), ("Mia", "Sato")]),
        ("Valley Foxes", "FOX", [("Ines", "Moreau"), ("Tom", "Hale"), ("Ravi", "Iyer")]),
        ("Northside Owls", "OWL", [("Lena", "Berg"), ("Kofi", "Mensah"), ("Eva", "Novak")]),
        ("Riverside Otters", "OTT", [("Sam", "Cole"), ("Noor", "Aziz"), ("Luca", "Bianchi")]),
    ];

    let squads = rosters
        .into_iter()
        .map(|(name, short, names)| {
            let team = Team::new(name, short);
            store.add_team(team.clone());
            store.enroll(league.id, team.id);
            let players = names
                .into_iter()
                .enumerate()
                .map(|(i, (first, last))| {
                    let player = Player::new(first, last, (i + 7) as u16, team.id);
                    store.add_player(player.clone());
                    player
                })
                .collect();
            Squad { team, players }
        })
        .collect();

    (league, squads)
}

/// Plays every pairing of the league once through the inbound handlers
async fn run_demo(state: &Arc<AppState>, seed: Option<u64>) -> anyhow::Result<Uuid> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let (league, squads) = seed_league(&state.store);
    info!("Seeded league {} ({}) with {} teams", league.name, league.id, squads.len());

    let lifecycle = state.lifecycle.as_ref();
    for (i, home) in squads.iter().enumerate() {
        for away in squads.iter().skip(i + 1) {
            let mut request = MatchSavedRequest {
                id: None,
                league_id: league.id,
                home_team_id: home.team.id,
                away_team_id: away.team.id,
                scheduled_at: Utc::now(),
                venue: format!("{} Ground", home.team.short_name),
                status: MatchStatus::Upcoming,
                home_score: None,
                away_score: None,
            };
            let saved = handle_match_saved(request.clone(), &state.store, lifecycle).await?;
            let match_id = saved.snapshot.id;
            request.id = Some(match_id);

            // A spectator that logs what it receives
            let (channel, mut frames) = QueueChannel::new(state.subscriber_buffer);
            let guard = state.registry.attach(match_id, Arc::new(channel));
            let spectator = tokio::spawn(async move {
                while let Some(frame) = frames.recv().await {
                    info!("[spectator] {}", frame);
                }
            });

            request.status = MatchStatus::Live;
            request.home_score = Some(0);
            request.away_score = Some(0);
            handle_match_saved(request.clone(), &state.store, lifecycle).await?;

            for _ in 0..rng.gen_range(1..=5) {
                let home_side = rng.gen_bool(0.5);
                let scorer_team = if home_side { home } else { away };
                let scorer = &scorer_team.players[rng.gen_range(0..scorer_team.players.len())];
                let minute = rng.gen_range(1..=90);

                match rng.gen_range(0..4) {
                    0 | 1 => {
                        let assistant = scorer_team.players.iter().find(|p| p.id != scorer.id);
                        let event = MatchEventRequest {
                            match_id,
                            minute,
                            event_type: EventKind::Goal,
                            player_id: scorer.id,
                            assisting_player_id: assistant.map(|p| p.id),
                            card_color: None,
                            sub_in: None,
                            sub_out: None,
                        };
                        handle_match_event(event, &state.store, lifecycle).await?;
                        if home_side {
                            request.home_score = request.home_score.map(|s| s + 1);
                        } else {
                            request.away_score = request.away_score.map(|s| s + 1);
                        }
                        handle_match_saved(request.clone(), &state.store, lifecycle).await?;
                    }
                    2 => {
                        let card_color = if rng.gen_bool(0.2) { CardColor::Red } else { CardColor::Yellow };
                        let event = MatchEventRequest {
                            match_id,
                            minute,
                            event_type: EventKind::Card,
                            player_id: scorer.id,
                            assisting_player_id: None,
                            card_color: Some(card_color),
                            sub_in: None,
                            sub_out: None,
                        };
                        handle_match_event(event, &state.store, lifecycle).await?;
                    }
                    _ => {
                        let bench = scorer_team.players.iter().find(|p| p.id != scorer.id);
                        if let Some(bench) = bench {
                            let event = MatchEventRequest {
                                match_id,
                                minute,
                                event_type: EventKind::Substitution,
                                player_id: scorer.id,
                                assisting_player_id: None,
                                card_color: None,
                                sub_in: Some(bench.id),
                                sub_out: Some(scorer.id),
                            };
                            handle_match_event(event, &state.store, lifecycle).await?;
                        }
                    }
                }
            }

            request.status = MatchStatus::Finished;
            let finished = handle_match_saved(request, &state.store, lifecycle).await?;
            info!(
                "{} {} {}: standings {:?}",
                home.team.name,
                finished.snapshot.score_line(),
                away.team.name,
                finished.outcome.standings
            );

            drop(guard);
            if tokio::time::timeout(Duration::from_secs(1), spectator).await.is_err() {
                warn!("Spectator for match {} did not finish", match_id);
            }
        }
    }

    info!("Final table of {}:", league.name);
    for row in state.store.standings(league.id) {
        info!(
            "  {:>2}. {:<18} P{} W{} D{} L{} GF{} GA{} Pts{}",
            row.position, row.team_name, row.played, row.wins, row.draws, row.losses,
            row.goals_for, row.goals_against, row.points
        );
    }

    Ok(league.id)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let opt = Opt::from_args();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(opt.log_level)
        .init();

    info!("Starting league live-updates server");

    let mut config = Config::try_from_env().map_err(anyhow::Error::msg)?;
    if let Some(port) = opt.port {
        config.bind_addr.set_port(port);
    }

    let store = Arc::new(InMemoryRecordStore::new());
    let state = Arc::new(AppState::new(store, &config));

    if opt.demo {
        let league_id = run_demo(&state, opt.seed).await.context("demo round failed")?;
        info!("Demo completed for league {}", league_id);
    }

    if opt.no_serve {
        return Ok(());
    }

    let api = Api::new(&config, state);
    info!("API server starting. Press Ctrl+C to stop.");
    api.serve(async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for shutdown signal: {}", e);
        }
        info!("Shutdown signal received, stopping...");
    })
    .await
    .context("API server error")?;

    Ok(())
}
