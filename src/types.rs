//! Core types for spark-folio.
//!
//! Geometry, element handles and transforms shared by every controller.
//! Coordinates are CSS pixels; `y` grows downward.

use std::fmt;
use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

// =============================================================================
// Vec2
// =============================================================================

/// A 2D vector or point in CSS pixels (or degrees, for tilt rotations).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length.
    #[inline]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Distance to another point.
    #[inline]
    pub fn distance(self, other: Vec2) -> f64 {
        (other - self).length()
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

// =============================================================================
// Insets - root margins
// =============================================================================

/// Per-side offsets applied to a rectangle.
///
/// Positive values grow the rectangle, negative values shrink it, the same
/// way an intersection root margin behaves.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Insets {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Insets {
    pub const ZERO: Self = Self::all(0.0);

    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self { top, right, bottom, left }
    }

    /// Same offset on every side.
    pub const fn all(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    /// Offset on the bottom edge only.
    pub const fn bottom(value: f64) -> Self {
        Self::new(0.0, 0.0, value, 0.0)
    }
}

// =============================================================================
// Rect - bounding boxes
// =============================================================================

/// An axis-aligned box, as returned by a bounding-rect query.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Center point.
    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Check if a point is inside this rect (edges inclusive).
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left
            && point.x <= self.right()
            && point.y >= self.top
            && point.y <= self.bottom()
    }

    /// Same box moved by `(dx, dy)`.
    pub fn translated(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.left + dx, self.top + dy, self.width, self.height)
    }

    /// Grow (or shrink, for negative values) each side by `insets`.
    pub fn expanded(&self, insets: Insets) -> Rect {
        Rect::new(
            self.left - insets.left,
            self.top - insets.top,
            (self.width + insets.left + insets.right).max(0.0),
            (self.height + insets.top + insets.bottom).max(0.0),
        )
    }

    /// Compute intersection of two rects.
    ///
    /// Touching edges count as an (empty) intersection so that zero-height
    /// elements sitting on the root boundary still register.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x1 = self.left.max(other.left);
        let y1 = self.top.max(other.top);
        let x2 = self.right().min(other.right());
        let y2 = self.bottom().min(other.bottom());

        if x2 >= x1 && y2 >= y1 {
            Some(Rect::new(x1, y1, x2 - x1, y2 - y1))
        } else {
            None
        }
    }

    /// Fraction of this rect's area that lies inside `root`, in `[0, 1]`.
    ///
    /// Zero-area rects report 1.0 when they touch the root, 0.0 otherwise.
    pub fn visible_fraction(&self, root: &Rect) -> f64 {
        match self.intersect(root) {
            None => 0.0,
            Some(overlap) => {
                let area = self.area();
                if area <= 0.0 {
                    1.0
                } else {
                    (overlap.area() / area).clamp(0.0, 1.0)
                }
            }
        }
    }
}

// =============================================================================
// ElementHandle
// =============================================================================

/// Opaque handle to one host element.
///
/// Hosts never reuse a handle for a different element, so a stale handle
/// can only ever refer to "gone".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementHandle(usize);

impl ElementHandle {
    pub const fn from_index(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// Transform
// =============================================================================

/// Transform written to an element by a pointer-follow controller.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Transform {
    #[default]
    Identity,
    /// 3D tilt in degrees, with the card lifted toward the viewer.
    Tilt {
        rotate_x: f64,
        rotate_y: f64,
        perspective_px: f64,
        lift_px: f64,
        scale: f64,
    },
    /// 2D translation in pixels.
    Translate { x: f64, y: f64 },
}

impl Transform {
    /// CSS `transform` property value.
    pub fn to_css(&self) -> String {
        match *self {
            Transform::Identity => "none".to_string(),
            Transform::Tilt {
                rotate_x,
                rotate_y,
                perspective_px,
                lift_px,
                scale,
            } => format!(
                "perspective({perspective_px}px) rotateX({rotate_x}deg) rotateY({rotate_y}deg) translateZ({lift_px}px) scale({scale})"
            ),
            Transform::Translate { x, y } => format!("translate({x}px, {y}px) scale(1)"),
        }
    }
}

// =============================================================================
// Listener flags (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Options for event listener registration.
    ///
    /// Combine with bitwise OR: `ListenerFlags::PASSIVE | ListenerFlags::CAPTURE`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ListenerFlags: u8 {
        const NONE = 0;
        /// Listener never blocks the host's scroll/pointer pipeline.
        const PASSIVE = 1 << 0;
        const CAPTURE = 1 << 1;
        /// Listener is removed after its first invocation.
        const ONCE = 1 << 2;
    }
}

// =============================================================================
// Tests
// =============================================================================
