//! Scripted Singles Battle Example
//!
//! Runs a short Umbreon vs Ninetales battle with fixed actions and a
//! fixed seed, then prints the final field.
//!
//! Requires a pokemon-showdown binary (`PATH_POKEMON_SHOWDOWN`, or
//! `pokemon-showdown` on PATH) and the showdown data files:
//!
//! ```text
//! cargo run --example toxic_stall -- pokedex.json moves.json
//! ```

use anyhow::{Context, Result};
use porygon_sim::{Action, ActionSpec, BattleSpec, Format, Player, simulate};
use porygon_team::{Dex, PokemonSpec};

fn umbreon() -> PokemonSpec {
    PokemonSpec {
        name: "Umbreon".to_string(),
        ability: "synchronize".to_string(),
        moves: vec!["wish", "toxic", "protect", "bite"]
            .into_iter()
            .map(String::from)
            .collect(),
        level: 50,
        ..PokemonSpec::default()
    }
}

fn ninetales() -> PokemonSpec {
    PokemonSpec {
        name: "Ninetales".to_string(),
        ability: "flashfire".to_string(),
        moves: vec!["solarbeam", "flamethrower", "willowisp", "sunnyday"]
            .into_iter()
            .map(String::from)
            .collect(),
        level: 50,
        ..PokemonSpec::default()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let pokedex = args.next().context("usage: toxic_stall <pokedex.json> <moves.json>")?;
    let moves = args.next().context("usage: toxic_stall <pokedex.json> <moves.json>")?;
    let dex = Dex::load(&pokedex, &moves)?;

    let mut spec = BattleSpec::new(
        Format::Gen8AnythingGoes,
        vec![vec![umbreon()], vec![ninetales()]],
    );
    spec.seed = 12345678;

    // three turns: toxic / solarbeam, protect / solarbeam, bite / flamethrower
    let actions = vec![
        Action::new(Player::P1, vec![ActionSpec::mov(1)]),
        Action::new(Player::P2, vec![ActionSpec::mov(0)]),
        Action::new(Player::P1, vec![ActionSpec::mov(2)]),
        Action::new(Player::P2, vec![ActionSpec::mov(0)]),
        Action::new(Player::P1, vec![ActionSpec::mov(3)]),
        Action::new(Player::P2, vec![ActionSpec::mov(1)]),
    ];

    let state = simulate(&spec, &actions, &dex).await?;

    println!("turn {}", state.turn);
    for (player, side) in &state.field {
        for pokemon in &side.pokemon {
            println!(
                "{} {} {}/{}{}",
                player,
                pokemon.species,
                pokemon.status.hp_now,
                pokemon.status.hp_max,
                if pokemon.status.toxiced { " tox" } else { "" },
            );
        }
    }

    Ok(())
}
