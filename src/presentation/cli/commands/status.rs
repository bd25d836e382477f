use anyhow::Result;
use colored::Colorize;
use std::sync::Arc;

use super::{load_registry, run_sync, RunOptions};
use crate::application::services::repository_inspector::{InspectOptions, RepositoryInspector};
use crate::application::use_cases::status_check::{StatusCheckConfig, StatusCheckUseCase};
use crate::application::use_cases::sync_repositories::PassResult;
use crate::presentation::cli::OutputFormat;
use crate::presentation::ui::display;

/// Handler for the status command
pub struct StatusCommand {
    /// Global options
    pub options: RunOptions,
    /// Print the summary code legend
    pub legend: bool,
}

impl StatusCommand {
    /// Create the command
    pub fn new(options: RunOptions, legend: bool) -> Self {
        Self { options, legend }
    }

    /// Sync, inspect and render the report
    pub async fn execute(&self) -> Result<()> {
        let workspace = Arc::new(self.options.workspace()?);
        let Some(registry) = load_registry(&workspace, &self.options).await? else {
            return Ok(());
        };
        let registry = Arc::new(registry);
        let progress = self.options.progress();

        // 1. Clone missing and fetch existing; failures do not stop the report
        let sync = run_sync(&self.options, registry.clone(), workspace.clone(), progress.clone()).await;
        for (label, pass) in [("Clone", &sync.clone_pass), ("Fetch", &sync.fetch_pass)] {
            if let PassResult::Aborted(e) = pass {
                eprintln!("{} {} pass aborted: {}", "!".yellow().bold(), label, e);
            }
        }

        // 2. Inspect every directory under the repositories root
        let inspector = RepositoryInspector::new(InspectOptions {
            fetch_remote: !self.options.offline,
        });
        let use_case = StatusCheckUseCase::new(
            StatusCheckConfig::default().with_parallel_jobs(self.options.jobs),
            Arc::new(inspector),
            progress,
        );
        let report = use_case
            .execute(registry, workspace)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to check status: {}", e))?;

        // 3. Render
        match self.options.output {
            OutputFormat::Text => {
                print!("{}", display::render_table(&report));
                println!("{}", display::render_counts(&report));
                if self.legend {
                    print!("{}", display::render_legend());
                }
            }
            OutputFormat::Json => println!("{}", display::render_json(&report)?),
            OutputFormat::Yaml => print!("{}", display::render_yaml(&report)?),
        }
        Ok(())
    }
}
