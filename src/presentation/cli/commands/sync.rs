use anyhow::Result;
use colored::Colorize;
use std::sync::Arc;

use super::{load_registry, run_sync, RunOptions};
use crate::presentation::ui::display;

/// Handler for the sync command
pub struct SyncCommand {
    /// Global options
    pub options: RunOptions,
}

impl SyncCommand {
    /// Create the command
    pub fn new(options: RunOptions) -> Self {
        Self { options }
    }

    /// Run both passes and print the summary
    pub async fn execute(&self) -> Result<()> {
        let workspace = self.options.workspace()?;
        let Some(registry) = load_registry(&workspace, &self.options).await? else {
            return Ok(());
        };

        println!(
            "{} Synchronizing {} managed repositories...",
            "::".blue().bold(),
            registry.len()
        );

        let result = run_sync(
            &self.options,
            Arc::new(registry),
            Arc::new(workspace),
            self.options.progress(),
        )
        .await;

        print!("{}", display::render_sync_summary(&result));
        if result.is_success() {
            println!("{} Synchronization completed!", "✓".green().bold());
        }
        Ok(())
    }
}
