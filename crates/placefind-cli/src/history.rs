//! `history` command handlers.

use clap::Subcommand;
use placefind_core::AppConfig;

use crate::app::open_history;
use crate::search::run_search;
use crate::OriginArgs;

/// Sub-commands available under `history`.
#[derive(Debug, Subcommand)]
pub enum HistoryCommands {
    /// Show past searches, oldest first
    List,
    /// Remove one entry by its index in `history list`
    Delete { index: usize },
    /// Submit a past search again from a new position
    Run {
        index: usize,
        #[command(flatten)]
        origin: OriginArgs,
        /// Also resolve a driving route to the first result
        #[arg(long)]
        route: bool,
    },
}

/// # Errors
///
/// Returns an error if a deletion cannot be persisted, the index is out of
/// range for `run`, or the repeated search fails.
pub(crate) async fn run_history(
    config: &AppConfig,
    command: HistoryCommands,
) -> anyhow::Result<()> {
    let history = open_history(config);
    match command {
        HistoryCommands::List => {
            let entries = history.entries();
            if entries.is_empty() {
                println!("no searches recorded yet");
            }
            for (i, entry) in entries.iter().enumerate() {
                println!("{i:>3}  {entry}");
            }
        }
        HistoryCommands::Delete { index } => match history.delete_at(index)? {
            Some(removed) => println!("removed \"{removed}\""),
            None => println!("no history entry at index {index}"),
        },
        HistoryCommands::Run {
            index,
            origin,
            route,
        } => {
            let Some(entry) = history.entries().get(index).cloned() else {
                anyhow::bail!("no history entry at index {index}");
            };
            drop(history);
            println!("searching again for \"{entry}\"");
            run_search(config, &entry, origin.coordinate()?, route).await?;
        }
    }
    Ok(())
}
