//! Snake Duel entry point
//!
//! The browser build starts from `platform::web`. Natively this runs a
//! headless round on a simulated clock with autopilot steering the player,
//! which is handy for watching the AI and rules in the log.
//!
//! Usage: `snake-duel [difficulty] [seed]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use snake_duel::highscores::{JsonFileStore, report_outcome};
    use snake_duel::settings::Settings;
    use snake_duel::sim::{Difficulty, GameEvent, Grid, TickResult};
    use snake_duel::Game;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::load_from(std::path::Path::new("snake_duel_settings.json"));
    let mut args = std::env::args().skip(1);
    let difficulty = args
        .next()
        .and_then(|s| Difficulty::parse(&s))
        .unwrap_or(settings.difficulty);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);

    log::info!(
        "Snake Duel (native) starting: {} at {} ms, seed {}",
        difficulty.as_str(),
        difficulty.speed_ms(),
        seed
    );

    let mut game = Game::new(seed, Grid::default());
    game.set_autopilot(true);
    game.start(difficulty.speed_ms(), difficulty);

    // Simulated host frames at the configured frame rate
    let frame_ms = settings.frame_budget_ms().round().max(1.0) as u64;
    let mut now = 0u64;
    let mut steps = 0u64;
    let outcome = loop {
        now += frame_ms;
        let result = game.frame(now);
        for event in game.drain_events() {
            match event {
                GameEvent::FoodEaten { side, points } => {
                    log::debug!("{:?} ate food (+{})", side, points)
                }
                GameEvent::RoundStarted => {}
                other => log::info!("{:?}", other),
            }
        }
        match result {
            TickResult::Ended(outcome) => break Some(outcome),
            TickResult::Stepped => steps += 1,
            _ => {}
        }
        // Ten simulated minutes is plenty for a round
        if now > 600_000 {
            break None;
        }
    };

    let snap = game.snapshot();
    log::info!(
        "Final score: player {} - AI {} after {} steps",
        snap.player_score,
        snap.ai_score,
        steps
    );
    let Some(outcome) = outcome else {
        log::warn!("Round did not finish");
        return;
    };
    log::info!("{}", outcome.message());

    let username = if settings.username.is_empty() {
        "autopilot"
    } else {
        settings.username.as_str()
    };
    let mut store = JsonFileStore::new("snake_duel_scores.json");
    let standing = report_outcome(&mut store, username, &outcome, snap.player_score);
    if let Some(rank) = standing.rank {
        log::info!("Leaderboard rank: #{}", rank);
    }
    for (i, entry) in standing.top.iter().enumerate() {
        println!("{:>2}. {:<16} {}", i + 1, entry.username, entry.score);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::wasm_main
}
