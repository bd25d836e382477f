use anyhow::Result;

use super::{load_registry, RunOptions};
use crate::presentation::cli::OutputFormat;
use crate::presentation::ui::display;

/// Handler for the list command
pub struct ListCommand {
    /// Global options
    pub options: RunOptions,
}

impl ListCommand {
    /// Create the command
    pub fn new(options: RunOptions) -> Self {
        Self { options }
    }

    /// Print the managed entries
    pub async fn execute(&self) -> Result<()> {
        let workspace = self.options.workspace()?;
        let Some(registry) = load_registry(&workspace, &self.options).await? else {
            return Ok(());
        };

        match self.options.output {
            OutputFormat::Text => print!("{}", display::render_entries(&registry)),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&registry.sorted())?),
            OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&registry.sorted())?),
        }
        Ok(())
    }
}
