use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticError {
    #[error("Division by zero.")]
    DivisionByZero,
}

pub fn add(a: f64, b: f64) -> f64 {
    a + b
}

pub fn subtract(a: f64, b: f64) -> f64 {
    a - b
}

pub fn multiply(a: f64, b: f64) -> f64 {
    a * b
}

/// `b == 0.0` is an exact comparison, so `-0.0` is rejected as well.
pub fn divide(a: f64, b: f64) -> Result<f64, ArithmeticError> {
    if b == 0.0 {
        Err(ArithmeticError::DivisionByZero)
    } else {
        Ok(a / b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    /// Menu order, which is also the order of the selection tokens.
    pub const ALL: [Operation; 4] = [
        Operation::Add,
        Operation::Subtract,
        Operation::Multiply,
        Operation::Divide,
    ];

    pub fn symbol(&self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '×',
            Self::Divide => '÷',
        }
    }

    pub fn apply(&self, a: f64, b: f64) -> Result<f64, ArithmeticError> {
        match self {
            Self::Add => Ok(add(a, b)),
            Self::Subtract => Ok(subtract(a, b)),
            Self::Multiply => Ok(multiply(a, b)),
            Self::Divide => divide(a, b),
        }
    }
}
