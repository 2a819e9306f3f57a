//! Pair Drop headless runner
//!
//! Plays a seeded session with a simple autoplayer, driving the simulation
//! through the same fixed-timestep loop a frontend would use, then prints
//! the final board as JSON.
//!
//! Usage: `pair-drop [config.json] [seed]`

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use glam::IVec2;
use pair_drop::consts::*;
use pair_drop::sim::{Cell, GameEvent, GameState, TickInput, tick};
use pair_drop::EngineConfig;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Give up after this much simulated time
const MAX_SESSION: Duration = Duration::from_secs(60 * 60);

/// Simulation plus fixed-timestep accumulator
struct Game {
    state: GameState,
    accumulator: Duration,
    input: TickInput,
}

impl Game {
    fn new(config: EngineConfig, seed: u64) -> Self {
        Self {
            state: GameState::with_config(config, seed),
            accumulator: Duration::ZERO,
            input: TickInput::default(),
        }
    }

    /// Run simulation ticks for one rendered frame
    fn update(&mut self, dt: Duration) {
        let dt = dt.min(Duration::from_millis(100));
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = self.input.clone();
            tick(&mut self.state, &input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.reset = false;
        }

        for event in self.state.drain_events() {
            match event {
                GameEvent::ChainStep {
                    chain,
                    removed,
                    points,
                    ..
                } if chain > 1 => {
                    log::info!("{}-chain! {} cleared (+{})", chain, removed, points);
                }
                GameEvent::LevelUp { level, .. } => log::info!("Reached level {}", level),
                _ => {}
            }
        }
    }
}

/// Picks a landing spot per piece and steers toward it
struct Autoplayer {
    rng: Pcg32,
    target: Option<(i32, bool)>,
    last_locked: u64,
}

impl Autoplayer {
    fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            target: None,
            last_locked: u64::MAX,
        }
    }

    /// Prefer a column whose top cell matches the pivot color, else the lowest one
    fn choose_target(&mut self, state: &GameState) -> (i32, bool) {
        let grid = state.grid();
        let color = state.active().pivot_color;
        let mut best: Option<(usize, usize)> = None;
        for x in 0..grid.width() {
            let column = grid.column(x);
            let top = column.iter().position(|c| !c.is_empty());
            let depth = top.unwrap_or(column.len());
            let matches = top.is_some_and(|y| column[y] == color);
            let score = depth + if matches { grid.height() } else { 0 };
            if best.is_none_or(|(_, s)| score > s) {
                best = Some((x, score));
            }
        }
        let column = match best {
            Some((x, _)) if self.rng.random_bool(0.8) => x,
            _ => self.rng.random_range(0..grid.width()),
        };
        (column as i32, self.rng.random_bool(0.3))
    }

    fn input_for(&mut self, state: &GameState) -> TickInput {
        if !state.is_alive() {
            return TickInput::default();
        }
        if state.pieces_locked() != self.last_locked {
            self.last_locked = state.pieces_locked();
            self.target = Some(self.choose_target(state));
        }
        let Some((column, horizontal)) = self.target else {
            return TickInput::default();
        };

        let piece = state.active();
        let wants_turn = horizontal && piece.offset() == IVec2::NEG_Y;
        let dx = column - piece.pivot.x;
        TickInput {
            left: dx < 0,
            right: dx > 0,
            down: dx == 0 && !wants_turn,
            rotate_cw: wants_turn,
            ..Default::default()
        }
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn main() {
    env_logger::init();
    log::info!("Pair Drop (headless) starting...");

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => EngineConfig::load(&path).unwrap_or_else(|err| {
            log::warn!("Ignoring config {}: {}", path, err);
            EngineConfig::default()
        }),
        None => EngineConfig::default(),
    };
    let seed = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(clock_seed);
    log::info!(
        "Game initialized with seed: {} ({}x{}, {} colors)",
        seed,
        config.columns,
        config.rows,
        config.color_count
    );

    let mut game = Game::new(config, seed);
    let mut player = Autoplayer::new(seed.wrapping_add(1));
    let mut frame_rng = Pcg32::seed_from_u64(seed.wrapping_add(2));
    let mut elapsed = Duration::ZERO;

    while game.state.is_alive() && elapsed < MAX_SESSION {
        // Jittered frame times, as a real display loop would deliver
        let frame = Duration::from_micros(frame_rng.random_range(14_000..20_000));
        game.input = player.input_for(&game.state);
        game.update(frame);
        elapsed += frame;
    }

    let snapshot = game.state.snapshot();
    log::info!(
        "Session over after {:.1}s: score {}, level {}, best chain {}, {} pieces",
        elapsed.as_secs_f64(),
        snapshot.score,
        snapshot.level,
        snapshot.best_chain,
        snapshot.pieces_locked
    );

    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => println!("{json}"),
        Err(err) => log::error!("Failed to serialize snapshot: {}", err),
    }

    let rows: Vec<String> = snapshot
        .grid
        .rows()
        .map(|row| row.iter().map(|&c| cell_char(c)).collect())
        .collect();
    eprintln!("{}", rows.join("\n"));
}

fn cell_char(cell: Cell) -> char {
    match cell {
        Cell::Empty => '.',
        Cell::Red => 'R',
        Cell::Green => 'G',
        Cell::Blue => 'B',
        Cell::Yellow => 'Y',
        Cell::Purple => 'P',
    }
}
