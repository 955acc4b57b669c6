//! Frame driver
//!
//! Owns the session and runs exactly one tick plus one render per frame
//! callback. Outbound notifications (score updates, the delayed game-over
//! notice) are queued here and handed to a [`GameHost`] after the caller has
//! released any borrow on the driver, so host callbacks may safely call back
//! into `start`/`stop`/`request_jump`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::renderer::{self, DrawContext};
use crate::settings::Settings;
use crate::sim::{GameState, SessionPhase, TickInput, jump, tick};
use crate::tuning::{Tuning, TuningError};

/// Frame-level failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DriverError {
    /// No drawing surface attached; nothing was simulated or drawn
    #[error("drawing surface is not attached")]
    SurfaceUnavailable,
}

/// What the scheduler should do after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Request another frame
    Continue,
    /// The session is not running; stop requesting frames
    Halt,
}

/// Something the host should hear about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notification {
    ScoreUpdate(u64),
    GameOver(u64),
}

impl Notification {
    pub fn dispatch(self, host: &mut dyn GameHost) {
        match self {
            Notification::ScoreUpdate(score) => host.on_score_update(score),
            Notification::GameOver(score) => host.on_game_over(score),
        }
    }
}

/// Receiver of outbound notifications
pub trait GameHost {
    /// Once per tick while running
    fn on_score_update(&mut self, _score: u64) {}

    /// Exactly once per ended session, after the post-collision delay
    fn on_game_over(&mut self, final_score: u64);
}

/// End-of-run statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub seed: u64,
    pub final_score: u64,
    pub coins: u32,
    pub ticks: u64,
    pub final_speed: f32,
    pub milestones: u32,
}

impl RunSummary {
    pub fn of(state: &GameState) -> Self {
        Self {
            seed: state.seed,
            final_score: state.score,
            coins: state.coin_count,
            ticks: state.frame_count,
            final_speed: state.speed,
            milestones: state.milestones_reached,
        }
    }
}

/// A game-over notice waiting for its delay to pass
#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingNotice {
    due_ms: f64,
    final_score: u64,
}

/// Drives one session at a time from an external frame scheduler
pub struct FrameDriver {
    state: GameState,
    tuning: Tuning,
    settings: Settings,
    input: TickInput,
    /// Notices survive stop and restart; each fires once
    pending: Vec<PendingNotice>,
    outbox: Vec<Notification>,
    last_run: Option<RunSummary>,
}

impl FrameDriver {
    /// Fails if the tuning table would break the simulation
    pub fn new(tuning: Tuning, settings: Settings) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self {
            state: GameState::new(0, tuning.clone()),
            tuning,
            settings,
            input: TickInput::default(),
            pending: Vec::new(),
            outbox: Vec::new(),
            last_run: None,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Swap display settings. The particle cap applies to the running
    /// session immediately.
    pub fn set_settings(&mut self, settings: Settings) {
        self.state.particle_cap = settings.max_particles();
        log::info!("Settings changed: {:?}", settings);
        self.settings = settings;
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Let the game jump by itself
    pub fn set_autopilot(&mut self, on: bool) {
        self.input.autopilot = on;
    }

    /// Begin a fresh session. No-op (returns false) while one is running.
    pub fn start(&mut self, seed: u64) -> bool {
        if self.state.is_running() {
            log::debug!("Start ignored, session already running");
            return false;
        }
        self.state = GameState::new(seed, self.tuning.clone());
        self.state.particle_cap = self.settings.max_particles();
        self.state.start()
    }

    /// Leave the running session without a game-over
    pub fn stop(&mut self) {
        self.state.halt();
    }

    /// Jump on behalf of the player; takes effect on the next tick
    pub fn request_jump(&mut self) -> bool {
        jump(&mut self.state)
    }

    /// One frame: tick, queue the score update, paint.
    ///
    /// Fails before touching the session when there is no surface. Returns
    /// [`FrameOutcome::Halt`] once the session is no longer running.
    pub fn frame(
        &mut self,
        surface: Option<&mut dyn DrawContext>,
        now_ms: f64,
    ) -> Result<FrameOutcome, DriverError> {
        let surface = surface.ok_or(DriverError::SurfaceUnavailable)?;
        if !self.state.is_running() {
            return Ok(FrameOutcome::Halt);
        }

        tick(&mut self.state, &self.input);
        for event in self.state.events.drain(..) {
            log::trace!("{:?}", event);
        }
        self.outbox.push(Notification::ScoreUpdate(self.state.score));
        renderer::render(surface, &self.state, &self.settings);

        if self.state.phase == SessionPhase::Ended {
            let notice = PendingNotice {
                due_ms: now_ms + self.tuning.game_over_delay_ms,
                final_score: self.state.score,
            };
            log::info!(
                "Game over at score {}, notifying at {:.0} ms",
                notice.final_score,
                notice.due_ms
            );
            self.pending.push(notice);
            self.last_run = Some(RunSummary::of(&self.state));
            return Ok(FrameOutcome::Halt);
        }

        Ok(FrameOutcome::Continue)
    }

    /// Paint the idle preview
    pub fn render_idle(&self, surface: Option<&mut dyn DrawContext>) -> Result<(), DriverError> {
        let surface = surface.ok_or(DriverError::SurfaceUnavailable)?;
        renderer::render_preview(surface);
        Ok(())
    }

    /// Earliest time a pending game-over notice becomes due
    pub fn next_notice_due(&self) -> Option<f64> {
        self.pending
            .iter()
            .map(|n| n.due_ms)
            .min_by(|a, b| a.total_cmp(b))
    }

    /// Move every notice that is due by `now_ms` into the outbox
    pub fn poll_notifications(&mut self, now_ms: f64) {
        let (due, waiting): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|n| n.due_ms <= now_ms);
        self.pending = waiting;
        self.outbox
            .extend(due.into_iter().map(|n| Notification::GameOver(n.final_score)));
    }

    /// Drain queued notifications
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.outbox)
    }

    /// Drain queued notifications straight into `host`
    pub fn flush_notifications(&mut self, host: &mut dyn GameHost) {
        for notification in self.take_notifications() {
            notification.dispatch(host);
        }
    }

    /// Statistics of the current session so far
    pub fn summary(&self) -> RunSummary {
        RunSummary::of(&self.state)
    }

    /// Statistics of the most recent session that ended in a collision
    pub fn last_run(&self) -> Option<&RunSummary> {
        self.last_run.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::CommandRecorder;
    use crate::sim::Hazard;

    const FRAME_MS: f64 = 1000.0 / 60.0;

    #[derive(Default)]
    struct RecordingHost {
        scores: Vec<u64>,
        game_overs: Vec<u64>,
    }

    impl GameHost for RecordingHost {
        fn on_score_update(&mut self, score: u64) {
            self.scores.push(score);
        }

        fn on_game_over(&mut self, final_score: u64) {
            self.game_overs.push(final_score);
        }
    }

    fn driver() -> FrameDriver {
        FrameDriver::new(Tuning::default(), Settings::default()).unwrap()
    }

    /// Run frames until the driver halts; returns the time of the last frame
    fn run_to_halt(driver: &mut FrameDriver, rec: &mut CommandRecorder) -> f64 {
        let mut now = 0.0;
        for _ in 0..10_000 {
            now += FRAME_MS;
            rec.clear();
            if driver.frame(Some(&mut *rec), now).unwrap() == FrameOutcome::Halt {
                return now;
            }
        }
        panic!("session never ended");
    }

    #[test]
    fn test_missing_surface_aborts_before_ticking() {
        let mut driver = driver();
        driver.start(1);
        assert_eq!(
            driver.frame(None, 16.0),
            Err(DriverError::SurfaceUnavailable)
        );
        assert_eq!(driver.state().score, 0);
        assert!(driver.take_notifications().is_empty());
        assert_eq!(driver.render_idle(None), Err(DriverError::SurfaceUnavailable));
    }

    #[test]
    fn test_one_score_update_per_frame() {
        let mut driver = driver();
        let mut rec = CommandRecorder::new();
        let mut host = RecordingHost::default();
        driver.start(2);
        for i in 1..=5 {
            let outcome = driver.frame(Some(&mut rec), i as f64 * FRAME_MS).unwrap();
            assert_eq!(outcome, FrameOutcome::Continue);
        }
        driver.flush_notifications(&mut host);
        assert_eq!(host.scores, vec![1, 2, 3, 4, 5]);
        assert!(host.game_overs.is_empty());
    }

    #[test]
    fn test_start_while_running_is_ignored() {
        let mut driver = driver();
        let mut rec = CommandRecorder::new();
        assert!(driver.start(3));
        driver.frame(Some(&mut rec), FRAME_MS).unwrap();
        assert!(!driver.start(4));
        assert_eq!(driver.state().seed, 3);
        assert_eq!(driver.state().score, 1);
    }

    #[test]
    fn test_game_over_fires_once_after_delay() {
        let mut driver = driver();
        let mut rec = CommandRecorder::new();
        let mut host = RecordingHost::default();
        driver.start(5);
        let ended_at = run_to_halt(&mut driver, &mut rec);

        assert_eq!(driver.state().phase, SessionPhase::Ended);
        assert_eq!(driver.state().score, 153);
        // The terminal frame was still painted
        assert!(rec.texts().contains(&"153"));

        driver.poll_notifications(ended_at + 299.0);
        driver.flush_notifications(&mut host);
        assert!(host.game_overs.is_empty());
        assert_eq!(host.scores.last(), Some(&153));

        driver.poll_notifications(ended_at + 300.0);
        driver.flush_notifications(&mut host);
        assert_eq!(host.game_overs, vec![153]);

        driver.poll_notifications(ended_at + 5000.0);
        driver.flush_notifications(&mut host);
        assert_eq!(host.game_overs, vec![153]);
        assert_eq!(driver.next_notice_due(), None);
    }

    #[test]
    fn test_hazard_end_notifies_once() {
        let mut driver = driver();
        let mut rec = CommandRecorder::new();
        let mut host = RecordingHost::default();
        driver.start(15);
        // Lands inside the grounded player's hazard box after one step
        driver.state.hazards.push(Hazard {
            id: 900,
            x: 77.5,
            y: 130.0,
            frame: 0,
        });

        let now = FRAME_MS;
        assert_eq!(driver.frame(Some(&mut rec), now).unwrap(), FrameOutcome::Halt);
        assert_eq!(driver.state().phase, SessionPhase::Ended);
        assert_eq!(driver.state().score, 1);
        assert_eq!(driver.state().hazards.len(), 1, "hazards stay on screen");
        assert!(rec.texts().contains(&"1"));

        driver.poll_notifications(now + 299.0);
        driver.flush_notifications(&mut host);
        assert_eq!(host.scores, vec![1]);
        assert!(host.game_overs.is_empty());

        driver.poll_notifications(now + 300.0);
        driver.flush_notifications(&mut host);
        assert_eq!(host.game_overs, vec![1]);

        assert_eq!(driver.frame(Some(&mut rec), now + 400.0).unwrap(), FrameOutcome::Halt);
        driver.poll_notifications(now + 5000.0);
        driver.flush_notifications(&mut host);
        assert_eq!(host.game_overs, vec![1]);
        assert_eq!(host.scores, vec![1]);
    }

    #[test]
    fn test_no_ticks_or_drawing_after_end() {
        let mut driver = driver();
        let mut rec = CommandRecorder::new();
        driver.start(6);
        let ended_at = run_to_halt(&mut driver, &mut rec);
        rec.clear();
        driver.take_notifications();

        assert_eq!(
            driver.frame(Some(&mut rec), ended_at + FRAME_MS).unwrap(),
            FrameOutcome::Halt
        );
        assert!(rec.is_empty());
        assert_eq!(driver.state().score, 153);
        assert!(driver.take_notifications().is_empty());
    }

    #[test]
    fn test_stop_never_fires_game_over() {
        let mut driver = driver();
        let mut rec = CommandRecorder::new();
        let mut host = RecordingHost::default();
        driver.start(7);
        for i in 1..=10 {
            driver.frame(Some(&mut rec), i as f64 * FRAME_MS).unwrap();
        }
        driver.stop();
        assert_eq!(driver.state().phase, SessionPhase::Idle);
        assert_eq!(
            driver.frame(Some(&mut rec), 11.0 * FRAME_MS).unwrap(),
            FrameOutcome::Halt
        );
        driver.poll_notifications(1e9);
        driver.flush_notifications(&mut host);
        assert!(host.game_overs.is_empty());
        assert_eq!(host.scores.len(), 10);
    }

    #[test]
    fn test_pending_notice_survives_restart() {
        let mut driver = driver();
        let mut rec = CommandRecorder::new();
        let mut host = RecordingHost::default();
        driver.start(8);
        let ended_at = run_to_halt(&mut driver, &mut rec);
        assert!(driver.start(9));
        driver.stop();

        driver.poll_notifications(ended_at + 300.0);
        driver.flush_notifications(&mut host);
        assert_eq!(host.game_overs, vec![153]);
    }

    #[test]
    fn test_jump_request_only_while_running() {
        let mut driver = driver();
        assert!(!driver.request_jump());
        driver.start(10);
        assert!(driver.request_jump());
        assert!(!driver.request_jump(), "airborne");
    }

    #[test]
    fn test_summary_of_ended_run() {
        let mut driver = driver();
        let mut rec = CommandRecorder::new();
        driver.start(11);
        run_to_halt(&mut driver, &mut rec);
        let summary = driver.last_run().cloned().unwrap();
        assert_eq!(summary.seed, 11);
        assert_eq!(summary.final_score, 153);
        assert_eq!(summary.ticks, 153);
        assert_eq!(summary.milestones, 0);
        assert_eq!(summary.final_speed, 5.0);

        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"final_score\":153"));
    }

    #[test]
    fn test_particle_cap_comes_from_settings() {
        let settings = Settings {
            particles: false,
            ..Settings::default()
        };
        let mut driver = FrameDriver::new(Tuning::default(), settings).unwrap();
        driver.start(12);
        driver.request_jump();
        assert!(driver.state().particles.is_empty());
    }

    #[test]
    fn test_settings_change_mid_session() {
        let mut driver = driver();
        let mut rec = CommandRecorder::new();
        driver.start(14);
        driver.frame(Some(&mut rec), FRAME_MS).unwrap();

        let settings = Settings {
            particles: false,
            ..Settings::default()
        };
        driver.set_settings(settings.clone());
        assert_eq!(driver.settings(), &settings);
        assert_eq!(driver.state().particle_cap, 0);
        assert!(driver.request_jump());
        assert!(driver.state().particles.is_empty());
        assert!(driver.is_running(), "changing settings does not restart");
    }

    #[test]
    fn test_rejects_invalid_tuning() {
        let tuning = Tuning {
            milestone_interval: 0,
            ..Tuning::default()
        };
        let err = FrameDriver::new(tuning, Settings::default()).err().unwrap();
        assert!(matches!(
            err,
            TuningError::OutOfRange {
                field: "milestone_interval",
                ..
            }
        ));
    }

    #[test]
    fn test_autopilot_outlasts_first_cactus() {
        let mut driver = driver();
        let mut rec = CommandRecorder::new();
        driver.set_autopilot(true);
        driver.start(13);
        for i in 1..=400 {
            rec.clear();
            driver.frame(Some(&mut rec), i as f64 * FRAME_MS).unwrap();
        }
        assert!(driver.state().score >= 300);
    }

    #[test]
    fn test_idle_preview() {
        let driver = driver();
        let mut rec = CommandRecorder::new();
        driver.render_idle(Some(&mut rec)).unwrap();
        assert_eq!(rec.texts(), vec!["TAP TO JUMP"]);
    }
}
