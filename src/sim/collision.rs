//! Collision detection between the player and everything that can end a run
//!
//! All shapes are axis-aligned boxes. The player's box is shrunk by the
//! configured margin first, so grazing a wall or an enemy is forgiven.

use glam::Vec2;

use super::state::{Enemy, Obstacle, Player};

/// Axis-aligned bounding box (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Shrink every side by `margin`, never past the centre
    pub fn shrink(&self, margin: f32) -> Self {
        let half = self.size() / 2.0;
        let m = Vec2::splat(margin.max(0.0)).min(half);
        Self {
            min: self.min + m,
            max: self.max - m,
        }
    }

    /// Strict overlap: boxes that only share an edge do not collide
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// True for boxes with no area (e.g. a wall of height zero)
    pub fn is_empty(&self) -> bool {
        self.max.x <= self.min.x || self.max.y <= self.min.y
    }
}

/// Which edge of the play field was hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    Ceiling,
    Ground,
}

/// Result of a collision check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionResult {
    #[default]
    None,
    HitObstacle(u32),
    HitEnemy(u32),
    HitBoundary(Boundary),
}

impl CollisionResult {
    pub fn is_hit(&self) -> bool {
        !matches!(self, CollisionResult::None)
    }
}

/// Vertical limits of the play field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenBounds {
    pub ceiling: f32,
    /// Top of the ground strip
    pub ground: f32,
}

/// Anything besides the boundaries that can end a run
#[derive(Debug, Clone, Copy)]
pub enum Hazard<'a> {
    Obstacle(&'a Obstacle),
    Enemy(&'a Enemy),
}

impl Hazard<'_> {
    /// Whether the hazard's solid parts overlap `hitbox`
    pub fn overlaps(&self, hitbox: &Aabb) -> bool {
        match self {
            Hazard::Obstacle(o) => [o.top_wall(), o.bottom_wall()]
                .iter()
                .any(|wall| !wall.is_empty() && wall.overlaps(hitbox)),
            Hazard::Enemy(e) => e.bounds().overlaps(hitbox),
        }
    }

    pub fn as_result(&self) -> CollisionResult {
        match self {
            Hazard::Obstacle(o) => CollisionResult::HitObstacle(o.id),
            Hazard::Enemy(e) => CollisionResult::HitEnemy(e.id),
        }
    }
}

/// Check the player against the boundaries, then obstacles, then enemies
///
/// Returns the first hit found.
pub fn check(
    player: &Player,
    obstacles: &[Obstacle],
    enemies: &[Enemy],
    bounds: ScreenBounds,
    margin: f32,
) -> CollisionResult {
    let hitbox = player.hitbox(margin);

    if let Some(boundary) = boundary_hit(&hitbox, bounds) {
        return CollisionResult::HitBoundary(boundary);
    }

    obstacles
        .iter()
        .map(Hazard::Obstacle)
        .chain(enemies.iter().map(Hazard::Enemy))
        .find(|hazard| hazard.overlaps(&hitbox))
        .map(|hazard| hazard.as_result())
        .unwrap_or_default()
}

fn boundary_hit(hitbox: &Aabb, bounds: ScreenBounds) -> Option<Boundary> {
    if hitbox.max.y >= bounds.ground {
        Some(Boundary::Ground)
    } else if hitbox.min.y < bounds.ceiling {
        Some(Boundary::Ceiling)
    } else {
        None
    }
}
