//! Whole-match properties driven through the public control surface.

use proptest::prelude::*;

use pitch_sim::game::{
    load_models, state::formation, GameConfig, MatchEvent, MatchState, Role, Team, TeamPair,
};

fn new_match(seed: u64) -> MatchState {
    MatchState::new(GameConfig::default(), Some(seed)).unwrap()
}

fn assert_in_bounds(m: &MatchState) {
    let field = m.field();
    let state = m.state();
    for p in &state.players {
        assert!(field.player_area.contains(p.pos), "player {} out at {:?}", p.id, p.pos);
    }
    assert!(field.ball_area.contains(state.ball.pos), "ball out at {:?}", state.ball.pos);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Players and ball never leave the field whatever the speed.
    #[test]
    fn prop_everything_stays_on_the_field(
        seed in any::<u64>(),
        speed in 0.1f32..3.0,
        ticks in 1usize..1500,
    ) {
        let mut m = new_match(seed);
        m.set_speed_multiplier(speed);
        for _ in 0..ticks {
            m.tick();
            assert_in_bounds(&m);
        }
    }

    /// Score only moves through goal events, one goal at a time.
    #[test]
    fn prop_score_changes_only_on_goals(seed in any::<u64>(), speed in 1.0f32..3.0) {
        let mut m = new_match(seed);
        m.set_speed_multiplier(speed);
        let mut score = m.score();
        for _ in 0..3000 {
            let events = m.tick();
            let goal = events.iter().find_map(|e| match e {
                MatchEvent::Goal { team, score } => Some((*team, *score)),
                MatchEvent::PositionsReset => None,
            });
            match goal {
                Some((team, reported)) => {
                    let mut expected = score;
                    expected[team] += 1;
                    prop_assert_eq!(reported, expected);
                    prop_assert_eq!(m.score(), expected);
                    prop_assert_eq!(m.state().ball.pos, m.field().center);
                    let kickoff = formation(m.config(), m.field());
                    prop_assert_eq!(&m.state().players, &kickoff);
                    prop_assert!(events.contains(&MatchEvent::PositionsReset));
                }
                None => {
                    prop_assert_eq!(m.score(), score);
                }
            }
            score = m.score();
        }
    }
}

#[test]
fn roster_after_init_and_reset() {
    let mut m = new_match(3);
    for _ in 0..200 {
        m.tick();
    }
    m.reset();

    for team in Team::ALL {
        let players = m.state().team_players(team);
        assert_eq!(players.len(), 5);
        assert!(players.iter().all(|p| p.team == team));
        let count = |role| players.iter().filter(|p| p.role == role).count();
        assert_eq!(count(Role::Goalkeeper), 1);
        assert_eq!(count(Role::Defender), 2);
        assert_eq!(count(Role::Midfielder), 1);
        assert_eq!(count(Role::Forward), 1);
    }
    assert_eq!(m.score(), TeamPair::new(0, 0));
}

#[test]
fn scripted_play_is_deterministic() {
    let mut a = new_match(11);
    let mut b = new_match(11);
    for _ in 0..2000 {
        assert_eq!(a.tick(), b.tick());
        assert_eq!(a.snapshot(), b.snapshot());
    }
}

#[test]
fn seeds_only_matter_after_a_reset() {
    let mut a = new_match(1);
    let mut b = new_match(2);
    for _ in 0..2000 {
        let events = a.tick();
        b.tick();
        if !events.is_empty() {
            break;
        }
        assert_eq!(a.state(), b.state());
    }
}

#[test]
fn paused_ticks_are_no_ops() {
    let mut m = new_match(5);
    for _ in 0..120 {
        m.tick();
    }
    m.pause();
    let before = m.snapshot();
    for _ in 0..120 {
        assert!(m.tick().is_empty());
    }
    assert_eq!(m.snapshot(), before);
}

#[test]
fn loaded_models_drive_the_match() {
    let dir = tempfile::tempdir().unwrap();
    for role in Role::ALL {
        std::fs::write(
            dir.path().join(format!("{}.json", role.name())),
            r#"{"weights":[0.05,-0.02],"bias":0.1}"#,
        )
        .unwrap();
    }
    let models = load_models(dir.path());
    assert_eq!(models.loaded().count(), 4);

    let mut m = new_match(9).with_models(models);
    for _ in 0..1000 {
        m.tick();
        assert_in_bounds(&m);
    }
}
