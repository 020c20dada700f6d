use pomagotchi_core::{GameGateway, SqliteGateway};

pub fn run(summary: bool) -> Result<(), Box<dyn std::error::Error>> {
    let gateway = SqliteGateway::open_default()?;
    let progress = super::runtime()?.block_on(gateway.get_game_progress())?;

    if summary {
        println!(
            "{} pomodoros, {} XP, {} studied, streak {} (best {})",
            progress.total_pomodoros_completed,
            progress.total_xp_earned,
            progress.study_time_label(),
            progress.current_streak,
            progress.best_streak,
        );
    } else {
        println!("{}", serde_json::to_string_pretty(&progress)?);
    }
    Ok(())
}
