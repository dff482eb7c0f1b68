use std::{error::Error, io, path::PathBuf};

use calc::{CalcError, Config, Locale, Session, Terminal};
use clap::Parser;
use log::LevelFilter;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// TOML file with a locale and message overrides.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Built-in message set (overrides the config file's locale).
    #[arg(short, long, value_enum)]
    locale: Option<Locale>,

    #[arg(long, default_value = "warn")]
    log_level: LevelFilter,
}

fn start(args: Args) -> Result<(), CalcError> {
    let config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            Config::load(path)?
        }
        None => Config::default(),
    };

    let messages = config.messages(args.locale);
    let mut session = Session::new(Terminal::new()?, io::stdout(), messages);
    session.run()
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.log_level)
        .target(env_logger::Target::Stderr)
        .init();

    start(args)?;
    Ok(())
}
