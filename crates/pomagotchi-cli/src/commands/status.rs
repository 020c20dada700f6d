use pomagotchi_core::{GameGateway, SqliteGateway};

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let gateway = SqliteGateway::open_default()?;
    let state = super::runtime()?.block_on(gateway.get_full_game_state())?;
    // Nothing saved yet: show what a fresh game looks like.
    let state = state.unwrap_or_default();
    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}
