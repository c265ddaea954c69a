use std::io::{stdin, stdout, Write};

use cli_common::ParseError;
use parser::ast::Statement;
use thiserror::Error;

use crate::OutputFormat;

pub struct Repl {
    format: OutputFormat,
}

#[derive(Debug, Error)]
pub enum ReplError {
    #[error("Failed to open file {path}: {source}")]
    OpenFile {
        path: String,
        source: std::io::Error,
    },
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, PartialEq)]
pub enum Result {
    Exit,
    Help,
    NoInput,
    UnrecognisedInput,
    Ok(CommandResult),
}

#[derive(Debug, PartialEq)]
pub enum CommandResult {
    ParseError(ParseError),
    Ok(Vec<Statement>),
}

impl Repl {
    pub fn new(format: OutputFormat) -> Self {
        Repl { format }
    }

    pub fn run(&self) -> std::result::Result<(), ReplError> {
        loop {
            Repl::print_prompt()?;

            let mut buf = String::new();
            if stdin().read_line(&mut buf)? == 0 {
                println!();
                break;
            }

            match self.handle_repl_command(&buf) {
                Result::Ok(command_result) => self.print_result(&command_result),
                Result::Help => {
                    println!("Enter CREATE TABLE or SELECT statements separated by ';'.");
                    println!("Meta commands: .help .exit");
                }
                Result::UnrecognisedInput => {
                    println!("Error! Command not recognised.");
                }
                Result::Exit => {
                    println!("Goodbye.");
                    break;
                }
                Result::NoInput => continue,
            }
        }

        Ok(())
    }

    pub fn eval_command(&self, input: &str) -> CommandResult {
        match parser::parse(input) {
            Ok(statements) => {
                log::info!("Parsed {} statement(s)", statements.len());
                CommandResult::Ok(statements)
            }
            Err(err) => {
                if !err.is_syntax_error() {
                    log::error!("Parser defect: {err:?}");
                }
                CommandResult::ParseError(err)
            }
        }
    }

    pub fn eval_file(&self, file: &str) -> std::result::Result<CommandResult, ReplError> {
        let content = std::fs::read_to_string(file).map_err(|source| ReplError::OpenFile {
            path: file.to_string(),
            source,
        })?;

        Ok(self.eval_command(&content))
    }

    pub fn print_result(&self, result: &CommandResult) {
        match result {
            CommandResult::ParseError(err) => println!("{}", Repl::format_error(err)),
            CommandResult::Ok(statements) if statements.is_empty() => {
                println!("No statements");
            }
            CommandResult::Ok(statements) => {
                for statement in statements {
                    match self.format {
                        OutputFormat::Debug => println!("{statement:#?}"),
                        OutputFormat::Sql => println!("{statement};"),
                    }
                }
            }
        }
    }

    fn format_error(err: &ParseError) -> String {
        let message = &err.kind;
        let pos = err.position;

        if err.is_syntax_error() {
            format!("Syntax Error: {message} (Position {pos})")
        } else {
            format!("Internal Error: {message} (Position {pos})")
        }
    }

    /// Handle user input via REPL. This will either eval a command or
    /// short-circuit for a meta command.
    fn handle_repl_command(&self, buf: &str) -> Result {
        let fmt_buf = buf.trim();

        if fmt_buf.is_empty() {
            Result::NoInput
        } else if Repl::is_meta_command(fmt_buf) {
            Repl::handle_meta_command(fmt_buf)
        } else {
            Result::Ok(self.eval_command(fmt_buf))
        }
    }

    fn is_meta_command(buf: &str) -> bool {
        buf.starts_with('.')
    }

    fn handle_meta_command(buf: &str) -> Result {
        match buf.to_lowercase().as_ref() {
            ".exit" | ".quit" | ".close" => Result::Exit,
            ".help" | ".h" | "?" | ".?" => Result::Help,
            _ => Result::UnrecognisedInput,
        }
    }

    fn print_prompt() -> std::io::Result<()> {
        print!("> ");
        stdout().flush()
    }
}
