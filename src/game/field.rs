//! Derived pitch geometry.

use serde::Serialize;
use super::{ config::GameConfig, util::Vec2 };

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn contains(&self, p: Vec2) -> bool {
        (self.min.x..=self.max.x).contains(&p.x) && (self.min.y..=self.max.y).contains(&p.y)
    }

    /// The rectangle shrunk by `margin` on every side.
    pub fn inset(&self, margin: f32) -> Self {
        Self {
            min: Vec2::new(self.min.x + margin, self.min.y + margin),
            max: Vec2::new(self.max.x - margin, self.max.y - margin),
        }
    }
}

/// Immutable geometry computed once from a validated [`GameConfig`].
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct Field {
    pub bounds: Rect,
    pub center: Vec2,
    /// vertical span of the goal mouth on both end lines (exclusive)
    pub goal_mouth: (f32, f32),
    pub goal_width: f32,
    pub penalty_boxes: [Rect; 2],
    /// area a player's center may occupy
    pub player_area: Rect,
    /// area the ball's center may occupy while in play
    pub ball_area: Rect,
}

impl Field {
    pub fn new(conf: &GameConfig) -> Self {
        let f = &conf.field;
        let bounds = Rect {
            min: Vec2::new(f.x, f.y),
            max: Vec2::new(f.x + f.width, f.y + f.height),
        };
        let center = Vec2::new(f.x + f.width / 2.0, f.y + f.height / 2.0);
        let half_goal = conf.goal.height / 2.0;
        let half_box = conf.goal.penalty_box_height / 2.0;
        let box_top = center.y - half_box;
        let box_bottom = center.y + half_box;

        Self {
            bounds,
            center,
            goal_mouth: (center.y - half_goal, center.y + half_goal),
            goal_width: conf.goal.width,
            penalty_boxes: [
                Rect {
                    min: Vec2::new(bounds.min.x, box_top),
                    max: Vec2::new(bounds.min.x + conf.goal.penalty_box_width, box_bottom),
                },
                Rect {
                    min: Vec2::new(bounds.max.x - conf.goal.penalty_box_width, box_top),
                    max: Vec2::new(bounds.max.x, box_bottom),
                },
            ],
            player_area: bounds.inset(conf.player.radius),
            ball_area: bounds.inset(conf.ball.radius),
        }
    }

    #[inline(always)]
    pub fn left(&self) -> f32 {
        self.bounds.min.x
    }

    #[inline(always)]
    pub fn right(&self) -> f32 {
        self.bounds.max.x
    }

    #[inline(always)]
    pub fn in_goal_mouth(&self, y: f32) -> bool {
        y > self.goal_mouth.0 && y < self.goal_mouth.1
    }
}
