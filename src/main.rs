use manage_repos::presentation::cli::CliApp;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logging is initialised by the app once the verbosity flag is known
    let app = CliApp::new();
    app.run().await
}
