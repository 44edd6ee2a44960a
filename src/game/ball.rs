use super::{
    config::{ BallConfig, PlayerConfig },
    field::Field,
    state::{ BallState, PlayerState },
    util::Vec2,
};

/// End line the ball left the field through, if it went into a goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalSide {
    Left,
    Right,
}

/// Integrates the ball for one tick and resolves walls, goals and contacts.
///
/// Returns the goal the ball entered; the caller scores and resets. On a
/// goal the ball is left where it crossed the line and player contacts are
/// skipped.
pub fn step_ball(
    ball: &mut BallState,
    players: &[PlayerState],
    conf: &BallConfig,
    player_conf: &PlayerConfig,
    field: &Field,
    speed: f32,
) -> Option<GoalSide> {
    ball.pos += ball.vel * speed;
    ball.vel *= conf.friction;

    let area = field.ball_area;
    if ball.pos.y < area.min.y || ball.pos.y > area.max.y {
        ball.vel.y *= -conf.wall_damping;
        ball.pos.y = ball.pos.y.clamp(area.min.y, area.max.y);
    }

    if ball.pos.x < area.min.x {
        if field.in_goal_mouth(ball.pos.y) {
            return Some(GoalSide::Left);
        }
        ball.vel.x *= -conf.wall_damping;
        ball.pos.x = area.min.x;
    }
    if ball.pos.x > area.max.x {
        if field.in_goal_mouth(ball.pos.y) {
            return Some(GoalSide::Right);
        }
        ball.vel.x *= -conf.wall_damping;
        ball.pos.x = area.max.x;
    }

    resolve_contacts(ball, players, conf, player_conf, field);
    None
}

/// Deflects the ball off every player it overlaps, in roster order; the
/// last contact decides the outcome.
pub fn resolve_contacts(
    ball: &mut BallState,
    players: &[PlayerState],
    conf: &BallConfig,
    player_conf: &PlayerConfig,
    field: &Field,
) {
    let reach = player_conf.radius + conf.radius;
    for p in players {
        if ball.pos.dist_sq(p.pos) >= reach * reach {
            continue;
        }
        let dir = Vec2::from_angle_rad((ball.pos - p.pos).angle_rad());
        let kick = (p.speed() + conf.kick_boost).min(conf.max_speed);
        ball.vel = dir * kick;
        ball.pos = p.pos + dir * reach;
    }
    ball.pos = ball.pos.clamp(field.ball_area.min, field.ball_area.max);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{ config::GameConfig, state::formation };

    struct Fixture {
        conf: GameConfig,
        field: Field,
    }

    impl Fixture {
        fn new() -> Self {
            let conf = GameConfig::default();
            let field = Field::new(&conf);
            Self { conf, field }
        }

        fn step(&self, ball: &mut BallState, players: &[PlayerState]) -> Option<GoalSide> {
            step_ball(ball, players, &self.conf.ball, &self.conf.player, &self.field, 1.0)
        }
    }

    fn ball(x: f32, y: f32, vx: f32, vy: f32) -> BallState {
        BallState { pos: Vec2::new(x, y), vel: Vec2::new(vx, vy) }
    }

    #[test]
    fn free_ball_moves_then_slows() {
        let f = Fixture::new();
        let mut b = ball(400.0, 250.0, 2.0, -1.0);
        assert_eq!(f.step(&mut b, &[]), None);
        assert_eq!(b.pos, Vec2::new(402.0, 249.0));
        assert!((b.vel.x - 1.96).abs() < 1e-6);
        assert!((b.vel.y + 0.98).abs() < 1e-6);
    }

    #[test]
    fn top_wall_reflects_and_damps() {
        let f = Fixture::new();
        let mut b = ball(400.0, 58.0, 0.0, -3.0);
        f.step(&mut b, &[]);
        assert_eq!(b.pos.y, 57.0);
        // -3 * 0.98 * -0.8
        assert!((b.vel.y - 2.352).abs() < 1e-5);
    }

    #[test]
    fn left_goal_mouth_is_a_goal() {
        let f = Fixture::new();
        let mut b = ball(58.0, 250.0, -3.0, 0.0);
        assert_eq!(f.step(&mut b, &[]), Some(GoalSide::Left));
        assert!(b.pos.x < f.field.ball_area.min.x);
    }

    #[test]
    fn right_goal_mouth_is_a_goal() {
        let f = Fixture::new();
        let mut b = ball(742.0, 280.0, 3.0, 0.0);
        assert_eq!(f.step(&mut b, &[]), Some(GoalSide::Right));
    }

    #[test]
    fn wide_of_the_goal_bounces_off_end_line() {
        let f = Fixture::new();
        let mut b = ball(58.0, 120.0, -3.0, 0.0);
        assert_eq!(f.step(&mut b, &[]), None);
        assert_eq!(b.pos.x, 57.0);
        // -3 * 0.98 * -0.8
        assert!((b.vel.x - 2.352).abs() < 1e-5);
    }

    #[test]
    fn stationary_player_kicks_ball_away_at_boost_speed() {
        let f = Fixture::new();
        let players = formation(&f.conf, &f.field);
        let p = &players[3];
        let mut b = ball(p.pos.x + 6.0, p.pos.y + 8.0, 0.0, 0.0);

        assert_eq!(f.step(&mut b, std::slice::from_ref(p)), None);

        assert!((b.vel.norm() - 2.0).abs() < 1e-5);
        assert!((b.vel.x - 1.2).abs() < 1e-5);
        assert!((b.vel.y - 1.6).abs() < 1e-5);
        assert!(b.pos.dist(p.pos) >= 17.0 - 1e-4);
    }

    #[test]
    fn kick_speed_is_capped() {
        let f = Fixture::new();
        let mut p = formation(&f.conf, &f.field)[3].clone();
        p.vel = Vec2::new(2.5, 0.0);
        let mut b = ball(p.pos.x + 10.0, p.pos.y, 0.0, 0.0);

        f.step(&mut b, std::slice::from_ref(&p));

        assert!((b.vel.norm() - 4.0).abs() < 1e-5);
        assert!(b.vel.x > 0.0);
    }

    #[test]
    fn last_overlapping_player_wins() {
        let f = Fixture::new();
        let base = formation(&f.conf, &f.field)[3].clone();
        let mut left = base.clone();
        let mut right = base.clone();
        left.pos = Vec2::new(390.0, 250.0);
        right.pos = Vec2::new(410.0, 250.0);
        let mut b = ball(400.0, 250.0, 0.0, 0.0);

        f.step(&mut b, &[left, right.clone()]);

        assert!(b.vel.x < 0.0);
        assert!((b.pos.dist(right.pos) - 17.0).abs() < 1e-4);
    }

    #[test]
    fn doubled_speed_halves_ticks_for_the_same_distance() {
        let mut f = Fixture::new();
        f.conf.ball.friction = 1.0;
        let start = ball(200.0, 200.0, 1.5, 0.5);

        let mut slow = start.clone();
        for _ in 0..40 {
            step_ball(&mut slow, &[], &f.conf.ball, &f.conf.player, &f.field, 1.0);
        }
        let mut fast = start.clone();
        for _ in 0..20 {
            step_ball(&mut fast, &[], &f.conf.ball, &f.conf.player, &f.field, 2.0);
        }

        assert!(slow.pos.dist(fast.pos) < 1e-3);
        assert!((slow.pos.x - 260.0).abs() < 1e-3);
    }
}
