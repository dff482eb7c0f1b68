use thiserror::Error;

use crate::arithmetic::Operation;

pub const EXIT_TOKEN: &str = "5";

#[derive(Debug, Clone, PartialEq)]
pub enum Choice {
    Operation(Operation),
    Exit,
    Invalid(String),
}

impl Choice {
    pub fn parse(input: &str) -> Self {
        let input = input.trim();

        match input {
            "1" => Self::Operation(Operation::Add),
            "2" => Self::Operation(Operation::Subtract),
            "3" => Self::Operation(Operation::Multiply),
            "4" => Self::Operation(Operation::Divide),
            EXIT_TOKEN => Self::Exit,
            other => Self::Invalid(other.to_string()),
        }
    }
}

impl Operation {
    pub fn token(&self) -> &'static str {
        match self {
            Self::Add => "1",
            Self::Subtract => "2",
            Self::Multiply => "3",
            Self::Divide => "4",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OperandError {
    #[error("Not a number : {0:?}.")]
    NotANumber(String),
}

pub fn parse_operand(input: &str) -> Result<f64, OperandError> {
    let input = input.trim();
    input
        .parse::<f64>()
        .map_err(|_| OperandError::NotANumber(input.to_string()))
}
