//! End-to-end scenarios against a real simulator.
//!
//! These drive an actual `pokemon-showdown` binary and so are ignored
//! by default. To run them, point the environment at the binary and
//! the showdown data files:
//!
//! ```text
//! export PATH_POKEMON_SHOWDOWN=/path/to/pokemon-showdown
//! export SHOWDOWN_POKEDEX=/path/to/pokedex.json
//! export SHOWDOWN_MOVES=/path/to/moves.json
//! cargo test -p porygon-sim -- --ignored
//! ```

use porygon_sim::{
    Action, ActionSpec, BattleSpec, Format, Player, Session, SimError, simulate,
};
use porygon_team::{Dex, PokemonSpec};

fn binary() -> String {
    std::env::var("PATH_POKEMON_SHOWDOWN").unwrap_or_else(|_| "pokemon-showdown".to_string())
}

fn dex() -> Dex {
    let pokedex = std::env::var("SHOWDOWN_POKEDEX").expect("SHOWDOWN_POKEDEX not set");
    let moves = std::env::var("SHOWDOWN_MOVES").expect("SHOWDOWN_MOVES not set");
    Dex::load(pokedex, moves).expect("failed to load showdown data files")
}

fn pokemon(name: &str, ability: &str, level: i32, moves: &[&str]) -> PokemonSpec {
    PokemonSpec {
        name: name.to_string(),
        ability: ability.to_string(),
        moves: moves.iter().map(|m| m.to_string()).collect(),
        level,
        ..PokemonSpec::default()
    }
}

fn umbreon() -> PokemonSpec {
    pokemon("Umbreon", "synchronize", 50, &["wish", "toxic", "protect", "bite"])
}

fn ninetales(level: i32) -> PokemonSpec {
    pokemon(
        "Ninetales",
        "flashfire",
        level,
        &["solarbeam", "flamethrower", "willowisp", "sunnyday"],
    )
}

#[tokio::test]
#[ignore = "requires a pokemon-showdown binary and data files"]
async fn test_singles_toxic_stall() {
    let mut spec = BattleSpec::new(
        Format::Gen8AnythingGoes,
        vec![vec![umbreon()], vec![ninetales(50)]],
    );
    spec.seed = 12345678;

    let actions = vec![
        Action::new(Player::P1, vec![ActionSpec::mov(1)]), // toxic
        Action::new(Player::P2, vec![ActionSpec::mov(0)]), // solarbeam (charging)
        Action::new(Player::P1, vec![ActionSpec::mov(2)]), // protect
        Action::new(Player::P2, vec![ActionSpec::mov(0)]), // solarbeam (blocked)
        Action::new(Player::P1, vec![ActionSpec::mov(3)]), // bite
        Action::new(Player::P2, vec![ActionSpec::mov(1)]), // flamethrower
    ];

    let state = simulate(&spec, &actions, &dex()).await.unwrap();

    assert_eq!(state.turn, 4);
    assert!(state.winner.is_none());

    let p1 = &state.side(Player::P1).unwrap().pokemon[0];
    assert_eq!((p1.status.hp_now, p1.status.hp_max), (138, 181));

    let p2 = &state.side(Player::P2).unwrap().pokemon[0];
    assert_eq!((p2.status.hp_now, p2.status.hp_max), (71, 159));
    assert!(p2.status.toxiced);
}

#[tokio::test]
#[ignore = "requires a pokemon-showdown binary and data files"]
async fn test_forced_switch_on_knockout() {
    let mut spec = BattleSpec::new(
        Format::Gen8AnythingGoes,
        vec![
            vec![umbreon()],
            vec![
                pokemon("Pikachu", "voltabsorb", 50, &["tackle"]),
                ninetales(1),
            ],
        ],
    );
    spec.seed = 4910;

    let mut session = Session::start(&binary(), &spec, &dex()).await.unwrap();

    // p2 swaps the L1 Ninetales in; Umbreon bites it out
    let state = session
        .turn(&[
            Action::new(Player::P1, vec![ActionSpec::mov(3)]),
            Action::new(Player::P2, vec![ActionSpec::switch(1)]),
        ])
        .await
        .unwrap();
    assert!(state.side(Player::P2).unwrap().must_switch());

    // only p2 acts on the forced switch
    session
        .turn(&[Action::new(Player::P2, vec![ActionSpec::switch(0)])])
        .await
        .unwrap();

    let state = session
        .turn(&[
            Action::new(Player::P1, vec![ActionSpec::mov(1)]),
            Action::new(Player::P2, vec![ActionSpec::mov(0)]),
        ])
        .await
        .unwrap();

    assert_eq!(state.turn, 3);
    let names: Vec<&str> = state
        .events
        .iter()
        .rev()
        .take(3)
        .map(|e| e.name.as_str())
        .collect();
    assert!(names.contains(&"Tackle"), "last events: {:?}", names);
    assert!(names.contains(&"Toxic"), "last events: {:?}", names);

    session.stop().await;
}

#[tokio::test]
#[ignore = "requires a pokemon-showdown binary and data files"]
async fn test_invalid_action_recovery() {
    let spec = BattleSpec::new(
        Format::Gen8AnythingGoes,
        vec![vec![umbreon()], vec![ninetales(50)]],
    );

    let mut session = Session::start(&binary(), &spec, &dex()).await.unwrap();
    let before = session.state().turn;

    // switching with a one-pokemon team is not a legal choice
    let err = session
        .turn(&[
            Action::new(Player::P1, vec![ActionSpec::switch(1)]),
            Action::new(Player::P2, vec![ActionSpec::mov(0)]),
        ])
        .await
        .unwrap_err();
    assert!(
        matches!(err, SimError::InvalidChoice(_) | SimError::UnavailableChoice(_)),
        "got {:?}",
        err
    );

    // the session is still healthy; a corrected action advances the
    // battle by exactly one turn
    let state = session
        .turn(&[Action::new(Player::P1, vec![ActionSpec::mov(0)])])
        .await
        .unwrap();
    assert_eq!(state.turn, before + 1);

    session.stop().await;
}
