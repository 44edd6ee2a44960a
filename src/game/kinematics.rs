use super::{ config::PlayerConfig, field::Field, state::PlayerState };

/// Moves a player one tick towards its target.
///
/// Far from the target the velocity is redirected straight at it at full
/// speed; inside `arrive_radius` it only decays. The player always ends up
/// inside the field.
pub fn step_player(player: &mut PlayerState, conf: &PlayerConfig, field: &Field, speed: f32) {
    let to_target = player.target - player.pos;
    let dist = to_target.norm();

    if dist > conf.arrive_radius {
        player.vel = to_target * (conf.max_speed * speed / dist);
    } else {
        player.vel *= conf.braking;
    }

    player.pos += player.vel * speed;
    player.pos = player.pos.clamp(field.player_area.min, field.player_area.max);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::util::Vec2;
    use crate::game::{ config::GameConfig, state::formation };

    fn setup() -> (PlayerConfig, Field, PlayerState) {
        let conf = GameConfig::default();
        let field = Field::new(&conf);
        let player = formation(&conf, &field)[3].clone();
        (conf.player, field, player)
    }

    #[test]
    fn runs_at_max_speed_towards_distant_target() {
        let (conf, field, mut p) = setup();
        p.target = p.pos + Vec2::new(30.0, 40.0);
        let start = p.pos;

        step_player(&mut p, &conf, &field, 1.0);

        assert!((p.vel.x - 1.5).abs() < 1e-5);
        assert!((p.vel.y - 2.0).abs() < 1e-5);
        assert!((p.pos.dist(start) - 2.5).abs() < 1e-5);
    }

    #[test]
    fn speed_multiplier_scales_velocity_and_step() {
        let (conf, field, mut p) = setup();
        p.target = p.pos + Vec2::new(100.0, 0.0);
        let start = p.pos;

        step_player(&mut p, &conf, &field, 2.0);

        assert!((p.vel.x - 5.0).abs() < 1e-5);
        assert!((p.pos.x - start.x - 10.0).abs() < 1e-4);
    }

    #[test]
    fn brakes_near_target() {
        let (conf, field, mut p) = setup();
        p.vel = Vec2::new(2.0, 0.0);
        p.target = p.pos + Vec2::new(3.0, 0.0);
        let start = p.pos;

        step_player(&mut p, &conf, &field, 1.0);

        assert!((p.vel.x - 1.6).abs() < 1e-6);
        assert!((p.pos.x - start.x - 1.6).abs() < 1e-4);
    }

    #[test]
    fn clamps_to_field() {
        let (conf, field, mut p) = setup();
        p.pos = Vec2::new(61.0, 441.0);
        p.target = Vec2::new(-500.0, 900.0);

        step_player(&mut p, &conf, &field, 3.0);

        assert_eq!(p.pos, Vec2::new(60.0, 440.0));
    }
}
