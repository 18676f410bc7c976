#![allow(clippy::module_inception)]

use std::{fmt::Display, rc::Rc};

use crate::{
    compiler::compiler::generate,
    errors::errors::{Error, ErrorTip},
    lexer::lexer::tokenize,
    optimizer::optimizer::optimize,
    parser::parser::parse,
    type_checker::type_checker::analyze,
};

pub mod ast;
pub mod compiler;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod optimizer;
pub mod parser;
pub mod type_checker;

extern crate regex;

/// A location in a source file. Lines and columns are 1-based.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub line: u32,
    pub column: u32,
    pub file: Rc<String>,
}

impl Position {
    pub fn new(line: u32, column: u32, file: Rc<String>) -> Self {
        Position { line, column, file }
    }

    pub fn null() -> Self {
        Position::new(0, 0, Rc::new(String::from("<null>")))
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// Knobs for a single run of the pipeline.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    pub optimize: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions { optimize: true }
    }
}

/// Runs the whole pipeline over one source text and returns the JavaScript.
///
/// Stages run strictly one after another; the first error aborts the run.
#[tracing::instrument(skip(source, options), fields(file = %file))]
pub fn compile(source: &str, file: &str, options: &CompileOptions) -> Result<String, Error> {
    let file = Rc::new(String::from(file));
    let tokens = tokenize(source, Rc::clone(&file))?;
    let program = parse(tokens, file)?;
    let typed = analyze(&program)?;
    let typed = if options.optimize {
        optimize(typed)
    } else {
        typed
    };

    Ok(generate(&typed))
}

pub fn get_line(source: &str, line: u32) -> Option<&str> {
    source.lines().nth(line.checked_sub(1)? as usize)
}

pub fn display_error(error: &Error, source: &str) {
    /*
        Error: TypeError (Expected a number, found string)
        -> main.gg
           |
        20 | x = 'hi' - 'hi'
           | ----^
    */

    let position = error.get_position();
    let line_string = position.line.to_string();
    let padding = line_string.len() + 2;

    if let ErrorTip::None = error.get_tip() {
        eprintln!("Error: {}", error.get_error_name());
    } else {
        eprintln!("Error: {} ({})", error.get_error_name(), error.get_tip());
    }
    eprintln!("-> {}:{}", position.file, position);

    let Some(line_text) = get_line(source, position.line) else {
        return;
    };

    eprintln!("{:>padding$}", "|");

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(line_text);
    eprintln!("{} | {}", line_string, line_text_removed.trim_end());

    let arrows = (position.column as usize).saturating_sub(removed_whitespace).max(1);

    eprintln!("{:>padding$} {:->arrows$}", "|", "^");
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let start = string.chars().take_while(|c| c.is_whitespace()).count();

    (string.chars().skip(start).collect(), start)
}

#[cfg(test)]
mod tests {
    use super::{compile, get_line, remove_starting_whitespace, CompileOptions};

    #[test]
    fn test_get_line() {
        let source = "x = 1\nprint(x)\n\ny = 2";
        assert_eq!(get_line(source, 1), Some("x = 1"));
        assert_eq!(get_line(source, 2), Some("print(x)"));
        assert_eq!(get_line(source, 4), Some("y = 2"));
        assert_eq!(get_line(source, 0), None);
        assert_eq!(get_line(source, 9), None);
    }

    #[test]
    fn test_remove_starting_whitespace() {
        assert_eq!(remove_starting_whitespace("    x = 1"), (String::from("x = 1"), 4));
        assert_eq!(remove_starting_whitespace("x"), (String::from("x"), 0));
    }

    #[test]
    fn test_compile_without_optimizer_keeps_constant_expressions() {
        let options = CompileOptions { optimize: false };
        let output = compile("x = 1 + 2", "test.gg", &options).unwrap();
        assert_eq!(output, "let x_1 = (1 + 2);");

        let output = compile("x = 1 + 2", "test.gg", &CompileOptions::default()).unwrap();
        assert_eq!(output, "let x_1 = 3;");
    }

    #[test]
    fn test_compile_error_carries_location() {
        let error = compile("x = 1\ny = z", "test.gg", &CompileOptions::default()).unwrap_err();
        assert_eq!(error.get_position().line, 2);
        assert_eq!(error.get_position().column, 5);
        assert!(error.to_string().starts_with("2:5: "));
    }
}
