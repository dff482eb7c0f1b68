use rustyline::error::ReadlineError;
use thiserror::Error;

pub mod arithmetic;
pub mod choice;
pub mod config;
pub mod format;
pub mod session;

pub use config::{Config, Locale, Messages};
pub use session::{LineReader, Script, Session, State, Terminal};

#[derive(Error, Debug)]
pub enum CalcError {
    #[error("{0}")]
    Readline(ReadlineError),
    #[error("{0}")]
    Io(std::io::Error),
    #[error("{0}")]
    Config(config::ConfigError),
}

impl From<ReadlineError> for CalcError {
    fn from(value: ReadlineError) -> Self {
        Self::Readline(value)
    }
}

impl From<std::io::Error> for CalcError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<config::ConfigError> for CalcError {
    fn from(value: config::ConfigError) -> Self {
        Self::Config(value)
    }
}
