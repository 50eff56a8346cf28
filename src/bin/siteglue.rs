use clap::Parser;
use siteglue::{runtime, Cli};

fn main() {
    let cli = Cli::parse();
    if let Err(err) = runtime::run(cli) {
        eprintln!("{}: {err}", env!("CARGO_PKG_NAME"));
        std::process::exit(1);
    }
}
