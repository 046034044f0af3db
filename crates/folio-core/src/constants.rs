// Timing and sizing constants shared by the core state machines and the web frontend.

// Flame bursts (one per click)
pub const FLAME_TTL_MS: u64 = 800;

// Heart bursts (like feedback)
pub const HEART_TTL_MS: u64 = 900;
pub const HEART_COOLDOWN_MS: u64 = 180; // min gap to the last accepted heart
pub const HEART_BURST_LIMIT: usize = 6; // oldest evicted beyond this

// Peeking mascot
pub const PEEK_TTL_MS: u64 = 2_400;
pub const PEEK_INTERVAL_MS: u64 = 10_000;
pub const PEEK_TOP_MIN_PERCENT: f32 = 15.0;
pub const PEEK_TOP_MAX_PERCENT: f32 = 75.0;

// Typewriter
pub const TYPE_STEP_MS: u64 = 60;
pub const TYPE_PAUSE_MS: u64 = 1_200;
pub const DELETE_STEP_MS: u64 = 40;
pub const CURSOR_BLINK_MS: u64 = 500;

// Tilt
pub const TILT_X_GAIN_DEG: f32 = -14.0; // applied to (py - 0.5)
pub const TILT_Y_GAIN_DEG: f32 = 18.0; // applied to (px - 0.5)
pub const TILT_HOVER_SCALE: f32 = 1.04;

// Like sync
pub const LIKE_POLL_INTERVAL_MS: u64 = 5_000;
pub const LIKED_STORAGE_KEY: &str = "folio.likedLocally";
pub const LIKES_PATH: &str = "/likes";
pub const LIKES_INCREMENT_PATH: &str = "/likes/increment";
