use clap::Subcommand;
use focusflow_core::{Database, HistoryStore};

#[derive(Subcommand)]
pub enum HistoryAction {
    /// Print recent records, most recent first
    List {
        #[arg(long, default_value = "5")]
        limit: usize,
    },
    /// Delete all history
    Clear,
}

pub fn run(action: HistoryAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let store = HistoryStore::new(&db);
    match action {
        HistoryAction::List { limit } => {
            let records = store.recent(limit)?;
            if records.is_empty() {
                println!("no session history yet");
            } else {
                println!("{}", serde_json::to_string_pretty(&records)?);
            }
        }
        HistoryAction::Clear => {
            store.clear()?;
            println!("history cleared");
        }
    }
    Ok(())
}
