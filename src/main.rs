use clap::Parser;

use ccswitch::cli::{execute, Cli};
use ccswitch::config::ConfigStore;
use ccswitch::logging::init_tracing;

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let code = match ConfigStore::open_default()
        .map_err(anyhow::Error::from)
        .and_then(|store| execute(cli, &store))
    {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    };

    std::process::exit(code);
}
