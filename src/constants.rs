// DOM hooks shared between the wiring code and the page markup.

pub const EFFECT_LAYER_ID: &str = "fx-layer"; // created on demand if the page lacks it
pub const LIKE_BUTTON_ID: &str = "like-button";
pub const LIKE_COUNT_ID: &str = "like-count";
pub const LIKE_HEARTS_ID: &str = "like-hearts"; // hearts render here, else in the effect layer
pub const CONFIG_SCRIPT_ID: &str = "folio-config";

pub const TYPEWRITER_ATTR: &str = "data-typewriter";
pub const TYPEWRITER_SELECTOR: &str = "[data-typewriter]";
pub const CURSOR_SELECTOR: &str = "[data-typewriter-cursor]";
pub const TILT_SELECTOR: &str = "[data-tilt]";
pub const NO_FLAME_ATTR: &str = "data-no-flame";
pub const NO_FLAME_SELECTOR: &str = "[data-no-flame]";
pub const LIKED_ATTR: &str = "data-liked";
pub const API_BASE_META_SELECTOR: &str = "meta[name=\"folio-api-base\"]";

// Shown when the typewriter element carries no text of its own
pub const DEFAULT_TAGLINE: &str = "Video editor and graphic designer";

// Effect node classes
pub const FLAME_CLASS: &str = "flame-burst";
pub const HEART_CLASS: &str = "heart-burst";
pub const PEEK_CLASS: &str = "peek-mascot";
