use std::{
    collections::VecDeque,
    io::{ErrorKind, Write},
};

use rustyline::{DefaultEditor, error::ReadlineError};

use crate::{
    CalcError,
    arithmetic::{ArithmeticError, Operation},
    choice::{Choice, EXIT_TOKEN, OperandError, parse_operand},
    config::Messages,
    format::format_result,
};

pub trait LineReader {
    /// Shows `prompt` and blocks for one line. `Ok(None)` means no more
    /// input will arrive.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, CalcError>;
}

pub struct Terminal {
    editor: DefaultEditor,
}

impl Terminal {
    pub fn new() -> Result<Self, CalcError> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }
}

impl LineReader for Terminal {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, CalcError> {
        accept_line(self.editor.readline(prompt))
    }
}

/// A line that is not valid UTF-8 has already been consumed, so it comes
/// back empty and gets rejected like any other unusable input.
fn accept_line(line: Result<String, ReadlineError>) -> Result<Option<String>, CalcError> {
    match line {
        Ok(line) => Ok(Some(line)),
        Err(ReadlineError::Interrupted) => {
            log::debug!("interrupted");
            Ok(None)
        }
        Err(ReadlineError::Eof) => {
            log::debug!("end of input");
            Ok(None)
        }
        Err(ReadlineError::Io(err)) if err.kind() == ErrorKind::InvalidData => {
            log::debug!("discarding unreadable line: {}", err);
            Ok(Some(String::new()))
        }
        Err(err) => Err(err.into()),
    }
}

/// Pre-recorded input. Every prompt shown is kept in `prompts`.
#[derive(Debug, Default)]
pub struct Script {
    lines: VecDeque<String>,
    pub prompts: Vec<String>,
}

impl Script {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }
}

impl LineReader for Script {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, CalcError> {
        self.prompts.push(prompt.to_string());
        Ok(self.lines.pop_front())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    Selection(String),
    Operand(OperandError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum State {
    Menu,
    AwaitChoice,
    AwaitOperands(Operation),
    Invalid(Rejection),
    Compute {
        op: Operation,
        a: f64,
        b: f64,
    },
    Report(String),
    Exit,
}

pub struct Session<R, W> {
    reader: R,
    output: W,
    messages: Messages,
}

impl<R: LineReader, W: Write> Session<R, W> {
    pub fn new(reader: R, output: W, messages: Messages) -> Self {
        Self {
            reader,
            output,
            messages,
        }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.output)
    }

    pub fn banner(&mut self) -> Result<(), CalcError> {
        let m = &self.messages;
        writeln!(self.output, "{}", m.title)?;
        writeln!(self.output, "{}", m.heading)?;
        for op in Operation::ALL {
            let label = match op {
                Operation::Add => &m.add,
                Operation::Subtract => &m.subtract,
                Operation::Multiply => &m.multiply,
                Operation::Divide => &m.divide,
            };
            writeln!(self.output, "{}: {}", op.token(), label)?;
        }
        writeln!(self.output, "{}: {}", EXIT_TOKEN, m.exit)?;
        writeln!(self.output)?;
        Ok(())
    }

    pub fn run(&mut self) -> Result<(), CalcError> {
        log::info!("session started");
        self.banner()?;

        let mut state = State::Menu;
        while state != State::Exit {
            state = self.step(state)?;
        }

        self.output.flush()?;
        log::info!("session finished");
        Ok(())
    }

    pub fn step(&mut self, state: State) -> Result<State, CalcError> {
        log::trace!("step {:?}", state);

        match state {
            State::Menu => {
                self.output.flush()?;
                Ok(State::AwaitChoice)
            }
            State::AwaitChoice => {
                let Some(line) = self.reader.read_line(&self.messages.select_prompt)? else {
                    return self.exit();
                };

                match Choice::parse(&line) {
                    Choice::Operation(op) => {
                        log::debug!("selected {:?}", op);
                        Ok(State::AwaitOperands(op))
                    }
                    Choice::Exit => self.exit(),
                    Choice::Invalid(text) => Ok(State::Invalid(Rejection::Selection(text))),
                }
            }
            State::AwaitOperands(op) => {
                let Some(first) = self.reader.read_line(&self.messages.first_operand_prompt)?
                else {
                    return self.exit();
                };
                let Some(second) = self.reader.read_line(&self.messages.second_operand_prompt)?
                else {
                    return self.exit();
                };

                match (parse_operand(&first), parse_operand(&second)) {
                    (Ok(a), Ok(b)) => Ok(State::Compute { op, a, b }),
                    (Err(err), _) | (_, Err(err)) => Ok(State::Invalid(Rejection::Operand(err))),
                }
            }
            State::Compute { op, a, b } => {
                let result = op.apply(a, b);
                if let Err(ArithmeticError::DivisionByZero) = result {
                    log::debug!("division by zero: {} / {}", a, b);
                }

                Ok(State::Report(format_result(
                    &self.messages.result_label,
                    &self.messages.division_by_zero,
                    op,
                    a,
                    b,
                    result,
                )))
            }
            State::Report(line) => {
                writeln!(self.output, "{}", line)?;
                writeln!(self.output)?;
                Ok(State::Menu)
            }
            State::Invalid(rejection) => {
                log::debug!("rejected input: {:?}", rejection);
                let message = match rejection {
                    Rejection::Selection(_) => &self.messages.invalid_selection,
                    Rejection::Operand(_) => &self.messages.invalid_number,
                };
                writeln!(self.output, "{}", message)?;
                writeln!(self.output)?;
                Ok(State::Menu)
            }
            State::Exit => Ok(State::Exit),
        }
    }

    fn exit(&mut self) -> Result<State, CalcError> {
        writeln!(self.output, "{}", self.messages.goodbye)?;
        Ok(State::Exit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, BufRead};

    /// Reads raw bytes the way a piped stdin does.
    struct Bytes<B> {
        input: B,
    }

    impl<B: BufRead> LineReader for Bytes<B> {
        fn read_line(&mut self, _prompt: &str) -> Result<Option<String>, CalcError> {
            let mut line = String::new();
            let read = match self.input.read_line(&mut line) {
                Ok(0) => Err(ReadlineError::Eof),
                Ok(_) => Ok(line),
                Err(err) => Err(ReadlineError::Io(err)),
            };
            accept_line(read)
        }
    }

    fn session(lines: &[&str]) -> Session<Script, Vec<u8>> {
        Session::new(Script::new(lines.iter().copied()), Vec::new(), Messages::english())
    }

    fn run(lines: &[&str]) -> (Script, String) {
        let mut session = session(lines);
        session.run().unwrap();
        let (script, output) = session.into_inner();
        (script, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_banner() {
        let (_, output) = run(&["5"]);
        assert_eq!(
            output,
            "=== Simple Calculator ===\n\
             Operations:\n\
             1: Add\n\
             2: Subtract\n\
             3: Multiply\n\
             4: Divide\n\
             5: Exit\n\
             \n\
             Exiting calculator.\n"
        );
    }

    #[test]
    fn test_step_add() {
        let mut session = session(&["1", "3", "4"]);
        let state = session.step(State::Menu).unwrap();
        assert_eq!(state, State::AwaitChoice);
        let state = session.step(state).unwrap();
        assert_eq!(state, State::AwaitOperands(Operation::Add));
        let state = session.step(state).unwrap();
        assert_eq!(
            state,
            State::Compute {
                op: Operation::Add,
                a: 3.0,
                b: 4.0
            }
        );
        let state = session.step(state).unwrap();
        assert_eq!(state, State::Report(String::from("Result: 3.0 + 4.0 = 7.0")));
        assert_eq!(session.step(state).unwrap(), State::Menu);
    }

    #[test]
    fn test_operands_in_read_order() {
        let (_, output) = run(&["2", "5", "2", "5"]);
        assert!(output.contains("Result: 5.0 - 2.0 = 3.0\n\n"));
    }

    #[test]
    fn test_divide_by_zero() {
        let (_, output) = run(&["4", "10", "0", "5"]);
        assert!(output.contains("Result: 10.0 ÷ 0.0 = Error: cannot divide by zero\n\n"));
    }

    #[test]
    fn test_invalid_selection_skips_operands() {
        let (script, output) = run(&["9", "5"]);
        assert!(output.contains("Invalid selection. Please try again.\n\n"));
        assert_eq!(
            script.prompts,
            vec!["Select operation (1/2/3/4/5): "; 2]
        );
    }

    #[test]
    fn test_invalid_operand_discards_both() {
        let (script, output) = run(&["3", "abc", "2", "5"]);
        assert!(output.contains("Invalid input. Please enter a number.\n\n"));
        assert!(!output.contains("Result"));
        assert_eq!(script.prompts.len(), 4);
        assert_eq!(script.prompts[3], "Select operation (1/2/3/4/5): ");
    }

    #[test]
    fn test_invalid_second_operand() {
        let mut session = session(&["1", "xyz"]);
        let state = session.step(State::AwaitOperands(Operation::Add));
        assert!(matches!(
            state,
            Ok(State::Invalid(Rejection::Operand(OperandError::NotANumber(_))))
        ));
    }

    #[test]
    fn test_end_of_input_exits() {
        let (_, output) = run(&["1", "3"]);
        assert!(output.ends_with("Exiting calculator.\n"));
        assert!(!output.contains("Result"));
    }

    #[test]
    fn test_repeated_requests_are_identical() {
        let (_, output) = run(&["3", "1.5", "4", "3", "1.5", "4", "5"]);
        let results: Vec<&str> = output.lines().filter(|l| l.starts_with("Result")).collect();
        assert_eq!(results, vec!["Result: 1.5 × 4.0 = 6.0"; 2]);
    }

    #[test]
    fn test_accept_line() {
        assert_eq!(accept_line(Ok(String::from("1"))).unwrap(), Some(String::from("1")));
        assert_eq!(accept_line(Err(ReadlineError::Eof)).unwrap(), None);
        assert_eq!(accept_line(Err(ReadlineError::Interrupted)).unwrap(), None);

        let invalid = io::Error::new(ErrorKind::InvalidData, "stream did not contain valid UTF-8");
        assert_eq!(
            accept_line(Err(ReadlineError::Io(invalid))).unwrap(),
            Some(String::new())
        );

        let broken = io::Error::new(ErrorKind::BrokenPipe, "closed");
        assert!(matches!(
            accept_line(Err(ReadlineError::Io(broken))),
            Err(CalcError::Readline(_))
        ));
    }

    #[test]
    fn test_invalid_utf8_operand_keeps_looping() {
        let input: &[u8] = b"1\n\xff\xfe\n2\n5\n";
        let mut session = Session::new(Bytes { input }, Vec::new(), Messages::english());
        session.run().unwrap();

        let (_, output) = session.into_inner();
        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("Invalid input. Please enter a number.\n\n"));
        assert!(!output.contains("Result"));
        assert!(output.ends_with("Exiting calculator.\n"));
    }

    #[test]
    fn test_invalid_utf8_selection_keeps_looping() {
        let input: &[u8] = b"\xff\n1\n3\n4\n5\n";
        let mut session = Session::new(Bytes { input }, Vec::new(), Messages::english());
        session.run().unwrap();

        let (_, output) = session.into_inner();
        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("Invalid selection. Please try again.\n\n"));
        assert!(output.contains("Result: 3.0 + 4.0 = 7.0\n\n"));
        assert!(output.ends_with("Exiting calculator.\n"));
    }
}
