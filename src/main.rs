//! Dino Runner entry point
//!
//! The browser build is driven through `platform::web::DinoRunner`. Natively
//! this runs a seeded autopilot session headless and prints its summary:
//!
//! ```text
//! dino-runner [seed] [tuning.json]
//! ```

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use dino_runner::consts::NOMINAL_TICK_HZ;
    use dino_runner::renderer::CommandRecorder;
    use dino_runner::{FrameDriver, FrameOutcome, GameHost, Settings, Tuning, TuningError};

    const DEFAULT_SEED: u64 = 20_240_501;
    /// Give up on runs the autopilot never loses
    const MAX_FRAMES: u64 = 100_000;

    struct LogHost {
        game_over: Option<u64>,
    }

    impl GameHost for LogHost {
        fn on_score_update(&mut self, score: u64) {
            if score % 1000 == 0 {
                log::info!("Score {}", score);
            }
        }

        fn on_game_over(&mut self, final_score: u64) {
            log::info!("Game over, final score {}", final_score);
            self.game_over = Some(final_score);
        }
    }

    fn load_tuning(path: Option<&str>) -> Result<Tuning, TuningError> {
        let Some(path) = path else {
            return Ok(Tuning::default());
        };
        match std::fs::read_to_string(path) {
            Ok(json) => Tuning::from_json(&json),
            Err(e) => {
                log::warn!("Could not read {}: {}, using default tuning", path, e);
                Ok(Tuning::default())
            }
        }
    }

    pub fn run() {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let seed = match args.first().map(|s| s.parse::<u64>()) {
            Some(Ok(seed)) => seed,
            Some(Err(e)) => {
                log::warn!("Bad seed {:?} ({}), using {}", args[0], e, DEFAULT_SEED);
                DEFAULT_SEED
            }
            None => DEFAULT_SEED,
        };
        let tuning = match load_tuning(args.get(1).map(String::as_str)) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("Invalid tuning: {}", e);
                std::process::exit(1);
            }
        };

        let mut driver = match FrameDriver::new(tuning, Settings::load()) {
            Ok(driver) => driver,
            Err(e) => {
                log::error!("Invalid tuning: {}", e);
                std::process::exit(1);
            }
        };
        let mut surface = CommandRecorder::new();
        let mut host = LogHost { game_over: None };
        let frame_ms = 1000.0 / NOMINAL_TICK_HZ;

        driver.set_autopilot(true);
        driver.start(seed);

        let mut now = 0.0;
        for _ in 0..MAX_FRAMES {
            now += frame_ms;
            surface.clear();
            match driver.frame(Some(&mut surface), now) {
                Ok(FrameOutcome::Continue) => {}
                Ok(FrameOutcome::Halt) => break,
                Err(e) => {
                    log::error!("Frame failed: {}", e);
                    std::process::exit(1);
                }
            }
            driver.flush_notifications(&mut host);
        }

        if driver.is_running() {
            log::info!("Autopilot still going after {} frames, stopping", MAX_FRAMES);
            driver.stop();
        } else if let Some(due) = driver.next_notice_due() {
            driver.poll_notifications(due);
        }
        driver.flush_notifications(&mut host);
        if host.game_over.is_none() {
            log::info!("Session stopped without a game over");
        }

        let summary = driver.last_run().cloned().unwrap_or_else(|| driver.summary());
        log::info!(
            "{} frames rendered, {} draw calls in the last one",
            surface.frames,
            surface.len()
        );
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Could not encode summary: {}", e),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Dino Runner (native, headless) starting...");
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web, this is just to satisfy the compiler
}
