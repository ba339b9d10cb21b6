// Entrypoint for the CLI application.
// - Keeps `main` small: load config, build the API client and hand it to
//   the interactive shell.
// - Logs go to stderr (filter with `RUST_LOG`) so stdout stays for the session.

use imgflip_cli::ui::{print_setup_instructions, DialoguerPrompter, InteractiveShell};
use imgflip_cli::{Config, MemeClient};
use tracing::warn;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load()?;

    // Missing credentials are not fatal here: listing works without them
    // and the caption endpoint reports the problem itself.
    if let Err(e) = config.credentials.validate() {
        warn!(error = %e, "continuing without imgflip credentials");
        print_setup_instructions(&mut std::io::stdout())?;
    }

    let client = MemeClient::new(config)?;
    let mut shell = InteractiveShell::new(client, DialoguerPrompter, std::io::stdout())
        .with_spinner(true);
    shell.run()?;
    Ok(())
}
