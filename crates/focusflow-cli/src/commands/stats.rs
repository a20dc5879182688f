use clap::Subcommand;
use focusflow_core::{Database, Stats, StatsStore};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Print stats as JSON
    Show,
    /// Reset stats to zero
    Reset,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let store = StatsStore::new(&db);
    match action {
        StatsAction::Show => {
            let stats = store.load()?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        StatsAction::Reset => {
            store.save(&Stats::default())?;
            println!("stats reset");
        }
    }
    Ok(())
}
