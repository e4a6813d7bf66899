use serde::{Deserialize, Serialize};

/// One of the four attachment faces of a node's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Right,
    Top,
    Left,
    Bottom,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Right, Side::Top, Side::Left, Side::Bottom];

    /// Canonical orientation in degrees on the unit circle.
    pub fn angle(self) -> f32 {
        match self {
            Side::Right => 0.0,
            Side::Top => 90.0,
            Side::Left => 180.0,
            Side::Bottom => 270.0,
        }
    }

    pub fn from_angle(angle: f32) -> Option<Self> {
        Side::ALL.into_iter().find(|side| side.angle() == angle)
    }

    pub fn opposite(self) -> Self {
        match self {
            Side::Right => Side::Left,
            Side::Left => Side::Right,
            Side::Top => Side::Bottom,
            Side::Bottom => Side::Top,
        }
    }

    /// Midpoint of this side of the box `[x, y, x + width, y + height]`.
    pub fn point(self, x: f32, y: f32, width: f32, height: f32) -> (f32, f32) {
        match self {
            Side::Right => right(x, y, width, height),
            Side::Top => top(x, y, width, height),
            Side::Left => left(x, y, width, height),
            Side::Bottom => bottom(x, y, width, height),
        }
    }

    /// Outward unit vector in screen coordinates (y grows downward).
    pub fn direction(self) -> (f32, f32) {
        match self {
            Side::Right => (1.0, 0.0),
            Side::Top => (0.0, -1.0),
            Side::Left => (-1.0, 0.0),
            Side::Bottom => (0.0, 1.0),
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "right" => Some(Side::Right),
            "top" => Some(Side::Top),
            "left" => Some(Side::Left),
            "bottom" => Some(Side::Bottom),
            _ => None,
        }
    }
}

pub fn right(x: f32, y: f32, width: f32, height: f32) -> (f32, f32) {
    (x + width, y + height / 2.0)
}

pub fn left(x: f32, y: f32, _width: f32, height: f32) -> (f32, f32) {
    (x, y + height / 2.0)
}

pub fn top(x: f32, y: f32, width: f32, _height: f32) -> (f32, f32) {
    (x + width / 2.0, y)
}

pub fn bottom(x: f32, y: f32, width: f32, height: f32) -> (f32, f32) {
    (x + width / 2.0, y + height)
}

pub fn center(x: f32, y: f32, width: f32, height: f32) -> (f32, f32) {
    (x + width / 2.0, y + height / 2.0)
}
