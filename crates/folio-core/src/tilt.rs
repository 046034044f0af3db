use crate::config::FeedbackConfig;
use glam::Vec2;

/// 3D rotation applied to a tracked element, in degrees plus a uniform scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TiltState {
    pub rotate_x: f32,
    pub rotate_y: f32,
    pub scale: f32,
}

impl TiltState {
    pub const IDENTITY: TiltState = TiltState {
        rotate_x: 0.0,
        rotate_y: 0.0,
        scale: 1.0,
    };

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// CSS `transform` value for this state.
    pub fn to_css(&self) -> String {
        format!(
            "perspective(800px) rotateX({:.2}deg) rotateY({:.2}deg) scale({:.3})",
            self.rotate_x, self.rotate_y, self.scale
        )
    }
}

impl Default for TiltState {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Bounding box of the tracked element in client coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElementRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// Pointer position relative to `rect`, clamped to [0, 1]². Degenerate boxes map to the center.
#[inline]
pub fn normalize_in_rect(pointer: Vec2, rect: &ElementRect) -> Vec2 {
    if rect.width > 0.0 && rect.height > 0.0 {
        let px = ((pointer.x - rect.left) / rect.width).clamp(0.0, 1.0);
        let py = ((pointer.y - rect.top) / rect.height).clamp(0.0, 1.0);
        Vec2::new(px, py)
    } else {
        Vec2::splat(0.5)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TiltGains {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
}

impl From<&FeedbackConfig> for TiltGains {
    fn from(cfg: &FeedbackConfig) -> Self {
        Self {
            x: cfg.tilt_x_gain,
            y: cfg.tilt_y_gain,
            scale: cfg.tilt_scale,
        }
    }
}

impl Default for TiltGains {
    fn default() -> Self {
        Self::from(&FeedbackConfig::default())
    }
}

#[inline]
pub fn tilt_for(normalized: Vec2, gains: TiltGains) -> TiltState {
    TiltState {
        rotate_x: (normalized.y - 0.5) * gains.x,
        rotate_y: (normalized.x - 0.5) * gains.y,
        scale: gains.scale,
    }
}

/// Current tilt of one element; updated on move, reset on leave.
#[derive(Clone, Debug, Default)]
pub struct TiltTracker {
    gains: TiltGains,
    state: TiltState,
}

impl TiltTracker {
    pub fn new(gains: TiltGains) -> Self {
        Self {
            gains,
            state: TiltState::IDENTITY,
        }
    }

    pub fn on_pointer_move(&mut self, pointer: Vec2, rect: &ElementRect) -> TiltState {
        self.state = tilt_for(normalize_in_rect(pointer, rect), self.gains);
        self.state
    }

    /// Pointer leave and touch end both land here.
    pub fn on_leave(&mut self) -> TiltState {
        self.state = TiltState::IDENTITY;
        self.state
    }

    pub fn state(&self) -> TiltState {
        self.state
    }
}
