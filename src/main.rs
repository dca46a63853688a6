//! Karuta entry point
//!
//! Native demo: loads a dataset, then lets a simple autopilot play one
//! session with logging collaborators and prints the result screen.
//!
//! Usage: `karuta [dataset.json] [difficulty] [seed]`

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use karuta::audio::{AudioManager, LogEffectSink, LogNarrator};
use karuta::catalog::{self, SAMPLE_DATASET, category_short_name};
use karuta::consts::TIMER_PERIOD_MS;
use karuta::sim::{Difficulty, SessionEvent, SessionPhase, TickInput, format_elapsed};
use karuta::{Driver, Settings};

/// Autopilot frame length
const FRAME_MS: u32 = 250;

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<()> {
    env_logger::init();
    log::info!("Karuta (native) starting...");

    let mut args = std::env::args().skip(1);
    let pool = match args.next().filter(|a| a != "-") {
        Some(path) => {
            let path = PathBuf::from(path);
            catalog::load_pool(&path).with_context(|| format!("loading {}", path.display()))?
        }
        None => catalog::parse_pool(SAMPLE_DATASET).context("parsing built-in dataset")?,
    };

    let mut settings = Settings::load(&PathBuf::from("karuta-settings.json"));
    if let Some(name) = args.next() {
        let Some(difficulty) = Difficulty::from_str(&name) else {
            bail!("unknown difficulty '{name}' (easy to nightmare)");
        };
        settings.difficulty = difficulty;
    }
    let seed = match args.next() {
        Some(s) => s.parse().with_context(|| format!("invalid seed '{s}'"))?,
        None => std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0),
    };

    let audio = AudioManager::new(Some(Box::new(LogEffectSink)));
    let mut driver = Driver::new(Box::new(LogNarrator::default()), audio, &settings);
    driver.start_session(&pool, settings.difficulty, settings.board_geometry(), seed)?;

    run_autopilot(&mut driver, seed);

    let Some(summary) = driver.summary() else {
        bail!("session did not complete");
    };

    let verdict = if summary.cleared() {
        "CLEARED"
    } else {
        "GAME OVER"
    };
    println!();
    println!("=== {verdict} ===");
    println!("Difficulty: {}", summary.difficulty.as_str());
    println!("Score:      {}", summary.final_score);
    println!("Accuracy:   {}%", summary.accuracy_percent);
    println!("Time:       {}", format_elapsed(summary.elapsed_seconds));
    println!("{}", summary.message());
    if !summary.missed.is_empty() {
        println!("\nMissed cards ({}):", summary.missed.len());
        for card in &summary.missed {
            let tags: Vec<&str> = card
                .categories
                .iter()
                .map(|c| category_short_name(c))
                .collect();
            println!("  - {} [{}]", card.display_name(), tags.join(", "));
            println!("    {}", card.clue_text);
            if let Some(url) = &card.reference_url {
                println!("    {url}");
            }
        }
    }

    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser builds embed the library directly; there is no native demo
}

/// Play until the session completes
///
/// The bot "thinks" for a random number of seconds, then picks the right
/// tile most of the time. Slow thinking on a timed difficulty loses the card.
#[cfg(not(target_arch = "wasm32"))]
fn run_autopilot(driver: &mut Driver, seed: u64) {
    let mut rng = Pcg32::seed_from_u64(seed ^ 0x6b61_7275_7461);
    let mut think_ms: Option<u32> = None;

    loop {
        let Some(session) = driver.session() else {
            return;
        };
        match session.phase() {
            SessionPhase::Complete | SessionPhase::Setup => return,
            SessionPhase::AwaitingAnswer if !session.input_locked() => {}
            _ => {
                think_ms = None;
                step(driver, &TickInput::default(), FRAME_MS);
                continue;
            }
        }

        let remaining = think_ms.get_or_insert_with(|| think_time(&mut rng));
        if *remaining > 0 {
            let slice = (*remaining).min(FRAME_MS);
            *remaining -= slice;
            step(driver, &TickInput::default(), slice);
            continue;
        }
        think_ms = None;

        let Some(target) = session_target(driver) else {
            continue;
        };
        let pick = if rng.random_bool(0.8) {
            target
        } else {
            let board = driver
                .session()
                .map(|s| s.board().to_vec())
                .unwrap_or_default();
            let idx = rng.random_range(0..board.len().max(1));
            board.get(idx).map(|t| t.key.clone()).unwrap_or(target)
        };
        step(driver, &TickInput::select(pick), FRAME_MS);
    }
}

/// Advance one frame and show the clue caption when a question opens
#[cfg(not(target_arch = "wasm32"))]
fn step(driver: &mut Driver, input: &TickInput, dt_ms: u32) {
    for event in driver.tick(input, dt_ms) {
        let SessionEvent::QuestionStarted { index } = event else {
            continue;
        };
        if let Some(clue) = driver.clue_caption() {
            println!("Q{}: {}", index + 1, clue);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn think_time(rng: &mut impl Rng) -> u32 {
    rng.random_range(1..=20) * TIMER_PERIOD_MS / 2
}

#[cfg(not(target_arch = "wasm32"))]
fn session_target(driver: &Driver) -> Option<String> {
    driver
        .session()
        .and_then(|s| s.current_candidate())
        .map(|c| c.name.clone())
}
