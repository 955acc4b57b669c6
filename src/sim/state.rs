//! Game state and core simulation types
//!
//! Everything one session owns lives in [`GameState`]; a restart throws the
//! whole value away and builds a new one.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::consts::*;
use crate::tuning::Tuning;

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Not running; the idle preview is shown
    #[default]
    Idle,
    /// Ticking once per frame
    Running,
    /// A collision ended the run (terminal for this session)
    Ended,
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndCause {
    Obstacle,
    Hazard,
}

/// Things that happened during a tick, for logging and notifications
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped,
    CoinCollected { id: u32 },
    ObstacleSpawned { id: u32, kind: ObstacleKind },
    CoinSpawned { id: u32 },
    HazardSpawned { id: u32 },
    Milestone { score: u64 },
    SpeedUp { speed: f32 },
    SessionEnded { cause: EndCause, final_score: u64 },
}

/// The runner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub x: f32,
    /// Top edge; grows downward like screen space
    pub y: f32,
    pub vy: f32,
    pub width: f32,
    pub height: f32,
    /// Airborne flag
    pub jumping: bool,
    /// Drives the two-frame run cycle
    pub run_frame: u32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            x: PLAYER_X,
            y: PLAYER_GROUND_Y,
            vy: 0.0,
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            jumping: false,
            run_frame: 0,
        }
    }
}

impl Player {
    /// Full sprite box (used for coin pickup)
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }

    /// Reduced box used against ground obstacles
    pub fn obstacle_hitbox(&self) -> Aabb {
        Aabb::new(self.x + 8.0, self.y + 5.0, 28.0, 43.0)
    }

    /// Inset box used against flying hazards
    pub fn hazard_hitbox(&self) -> Aabb {
        Aabb::new(self.x + 10.0, self.y + 5.0, 25.0, 30.0)
    }

    /// Point the death burst originates from
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + 20.0, self.y + 25.0)
    }

    /// Where the jump dust is kicked up
    pub fn feet(&self) -> Vec2 {
        Vec2::new(self.x + 20.0, self.y + self.height)
    }
}

/// Ground obstacle variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Single-stem cactus
    Small,
    /// Double cactus, taller hitbox
    Large,
}

impl ObstacleKind {
    /// Sprite footprint (width, height)
    pub fn size(self) -> (f32, f32) {
        match self {
            ObstacleKind::Small => (20.0, 35.0),
            ObstacleKind::Large => (30.0, 40.0),
        }
    }

    /// Vertical offset of the sprite below [`OBSTACLE_BASE_Y`]
    pub fn sprite_offset_y(self) -> f32 {
        match self {
            ObstacleKind::Small => 35.0,
            ObstacleKind::Large => 40.0,
        }
    }

    /// Hitbox (top, height) in world space
    fn hitbox_span(self) -> (f32, f32) {
        match self {
            ObstacleKind::Small => (135.0, 35.0),
            ObstacleKind::Large => (130.0, 45.0),
        }
    }
}

/// A cactus scrolling toward the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub x: f32,
    pub width: f32,
    pub height: f32,
    pub kind: ObstacleKind,
}

impl Obstacle {
    pub fn new(id: u32, x: f32, kind: ObstacleKind) -> Self {
        let (width, height) = kind.size();
        Self {
            id,
            x,
            width,
            height,
            kind,
        }
    }

    pub fn hitbox(&self) -> Aabb {
        let (top, height) = self.kind.hitbox_span();
        Aabb::new(self.x + 5.0, top, 15.0, height)
    }
}

/// A flying enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hazard {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    /// Wing-flap animation counter
    pub frame: u32,
}

impl Hazard {
    pub fn hitbox(&self) -> Aabb {
        Aabb::new(self.x, self.y, HAZARD_WIDTH, HAZARD_HEIGHT)
    }
}

/// A coin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coin {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    /// Tick the coin was picked up on. Collected coins keep scrolling but
    /// are only drawn on that tick and never collected again.
    pub collected_at: Option<u64>,
    /// Bob animation counter
    pub frame: u32,
}

impl Coin {
    pub fn is_collected(&self) -> bool {
        self.collected_at.is_some()
    }

    /// Whether the coin is painted on the frame after tick `frame`
    pub fn visible_at(&self, frame: u64) -> bool {
        self.collected_at.is_none_or(|tick| tick == frame)
    }

    pub fn hitbox(&self) -> Aabb {
        Aabb::new(self.x, self.y, COIN_SIZE, COIN_SIZE)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + COIN_SIZE / 2.0, self.y + COIN_SIZE / 2.0)
    }
}

/// Visual flavor of a particle (the renderer picks the color)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    /// Kicked up by a jump
    Dust,
    /// Coin sparkle
    Sparkle,
    /// Player shattering on a cactus
    Shard,
}

/// A particle for visual effects (never gameplay-affecting)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining life in ticks
    pub life: i32,
    pub kind: ParticleKind,
}

/// Background cloud (parallax, medium depth)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cloud {
    pub pos: Vec2,
    pub size: f32,
    /// Fraction of world speed
    pub speed: f32,
}

/// Background mountain (parallax, far depth)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mountain {
    pub x: f32,
    pub height: f32,
    pub width: f32,
}

/// A ground tile; some carry a pebble
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundTile {
    pub x: f32,
    pub detail: bool,
}

/// Active milestone banner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneBanner {
    pub score: u64,
    /// Ticks left on screen
    pub timer: u32,
}

/// Complete state of one session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    /// Balance table this session was started with
    pub tuning: Tuning,
    pub phase: SessionPhase,
    pub player: Player,
    /// Entity lists, in insertion (= spawn) order
    pub obstacles: Vec<Obstacle>,
    /// Obstacles the player hit this tick, drawn on the terminal frame only
    pub wrecks: Vec<Obstacle>,
    pub hazards: Vec<Hazard>,
    pub coins: Vec<Coin>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub clouds: Vec<Cloud>,
    pub mountains: Vec<Mountain>,
    pub ground: Vec<GroundTile>,
    /// Current world scroll speed
    pub speed: f32,
    /// Monotonic tick counter driving spawn cadence
    pub frame_count: u64,
    pub score: u64,
    pub coin_count: u32,
    /// Last score value that fired a milestone
    pub last_milestone: u64,
    pub milestones_reached: u32,
    pub banner: Option<MilestoneBanner>,
    /// Upper bound on live particles
    pub particle_cap: usize,
    /// Events raised by the most recent tick (or by a jump since)
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create an idle session with the given seed
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            speed: tuning.initial_speed,
            tuning,
            phase: SessionPhase::Idle,
            player: Player::default(),
            obstacles: Vec::new(),
            wrecks: Vec::new(),
            hazards: Vec::new(),
            coins: Vec::new(),
            particles: Vec::new(),
            clouds: Vec::new(),
            mountains: Vec::new(),
            ground: Vec::with_capacity(GROUND_TILE_COUNT),
            frame_count: 0,
            score: 0,
            coin_count: 0,
            last_milestone: 0,
            milestones_reached: 0,
            banner: None,
            particle_cap: usize::MAX,
            events: Vec::new(),
            next_id: 1,
        };
        state.reset();
        state
    }

    /// Put every collection, counter and the world speed back to initial values
    pub fn reset(&mut self) {
        self.player = Player::default();
        self.obstacles.clear();
        self.wrecks.clear();
        self.hazards.clear();
        self.coins.clear();
        self.particles.clear();
        self.clouds = vec![
            Cloud {
                pos: Vec2::new(50.0, 20.0),
                size: 1.2,
                speed: 0.3,
            },
            Cloud {
                pos: Vec2::new(180.0, 35.0),
                size: 0.8,
                speed: 0.2,
            },
            Cloud {
                pos: Vec2::new(300.0, 15.0),
                size: 1.0,
                speed: 0.25,
            },
        ];
        self.mountains = vec![
            Mountain {
                x: 0.0,
                height: 60.0,
                width: 120.0,
            },
            Mountain {
                x: 150.0,
                height: 80.0,
                width: 150.0,
            },
            Mountain {
                x: 320.0,
                height: 50.0,
                width: 100.0,
            },
        ];
        self.ground.clear();
        for i in 0..GROUND_TILE_COUNT {
            let detail = self.roll(self.tuning.ground_detail_chance);
            self.ground.push(GroundTile {
                x: i as f32 * GROUND_TILE_SPACING,
                detail,
            });
        }
        self.speed = self.tuning.initial_speed;
        self.frame_count = 0;
        self.score = 0;
        self.coin_count = 0;
        self.last_milestone = 0;
        self.milestones_reached = 0;
        self.banner = None;
        self.events.clear();
    }

    /// Idle -> Running. Returns false (and changes nothing) if already running.
    pub fn start(&mut self) -> bool {
        if self.phase == SessionPhase::Running {
            return false;
        }
        self.reset();
        self.phase = SessionPhase::Running;
        log::info!(
            "Session started (seed {}, speed {:.1})",
            self.seed,
            self.speed
        );
        true
    }

    /// Stop ticking without a game-over (external stop signal)
    pub fn halt(&mut self) {
        if self.phase == SessionPhase::Running {
            self.phase = SessionPhase::Idle;
            log::info!("Session stopped at score {}", self.score);
        }
    }

    /// Running -> Ended. Only the first call per session has any effect.
    pub fn end(&mut self, cause: EndCause) -> bool {
        if self.phase != SessionPhase::Running {
            return false;
        }
        self.phase = SessionPhase::Ended;
        // The tick that ended the run still completes, so the reported
        // score is filled in once the tick finishes.
        self.events.push(GameEvent::SessionEnded {
            cause,
            final_score: self.score,
        });
        log::info!(
            "Session ended by {:?} at score {} with {} coins",
            cause,
            self.score,
            self.coin_count
        );
        true
    }

    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Bernoulli roll against the session RNG
    pub fn roll(&mut self, chance: f64) -> bool {
        self.rng.random_bool(chance.clamp(0.0, 1.0))
    }

    /// Uniform sample in [0, 1)
    pub fn unit(&mut self) -> f32 {
        self.rng.random::<f32>()
    }

    /// Uniform sample in [-half, half)
    pub fn spread(&mut self, half: f32) -> f32 {
        (self.unit() - 0.5) * 2.0 * half
    }

    /// Hazard scroll speed
    pub fn hazard_speed(&self) -> f32 {
        self.speed * self.tuning.hazard_speed_factor
    }
}
