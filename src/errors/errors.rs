use std::fmt::Display;

use thiserror::Error;

use crate::Position;

/// The broad family an error belongs to. Every stage reports through one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Syntax,
    Declaration,
    Resolution,
    Type,
    Structural,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Syntax => write!(f, "SyntaxError"),
            ErrorKind::Declaration => write!(f, "DeclarationError"),
            ErrorKind::Resolution => write!(f, "ResolutionError"),
            ErrorKind::Type => write!(f, "TypeError"),
            ErrorKind::Structural => write!(f, "StructuralError"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{position}: {internal_error}")]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_internal_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_kind(&self) -> ErrorKind {
        self.internal_error.kind()
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::AlreadyDeclared { .. } => "AlreadyDeclared",
            ErrorImpl::NotDeclared { .. } => "NotDeclared",
            ErrorImpl::ExpectedNumber { .. } => "ExpectedNumber",
            ErrorImpl::ExpectedBoolean { .. } => "ExpectedBoolean",
            ErrorImpl::ExpectedInteger { .. } => "ExpectedInteger",
            ErrorImpl::ExpectedNumberOrString { .. } => "ExpectedNumberOrString",
            ErrorImpl::ExpectedArray { .. } => "ExpectedArray",
            ErrorImpl::ExpectedDictionary { .. } => "ExpectedDictionary",
            ErrorImpl::ExpectedArrayOrDictionary { .. } => "ExpectedArrayOrDictionary",
            ErrorImpl::ExpectedFunction { .. } => "ExpectedFunction",
            ErrorImpl::ExpectedValue => "ExpectedValue",
            ErrorImpl::OperandTypeMismatch { .. } => "OperandTypeMismatch",
            ErrorImpl::TypeMatchError { .. } => "TypeMatchError",
            ErrorImpl::ArgumentTypeMatchError { .. } => "ArgumentTypeMatchError",
            ErrorImpl::UnexpectedArguments { .. } => "UnexpectedArguments",
            ErrorImpl::MissingArguments { .. } => "MissingArguments",
            ErrorImpl::ReturnTypeMismatch { .. } => "ReturnTypeMismatch",
            ErrorImpl::MissingReturnValue { .. } => "MissingReturnValue",
            ErrorImpl::NotAssignable { .. } => "NotAssignable",
            ErrorImpl::UnknownMethod { .. } => "UnknownMethod",
            ErrorImpl::MethodAsValue { .. } => "MethodAsValue",
            ErrorImpl::MismatchedBlockName { .. } => "MismatchedBlockName",
            ErrorImpl::ReturnOutsideFunction => "ReturnOutsideFunction",
            ErrorImpl::BreakOutsideLoop => "BreakOutsideLoop",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { token } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`", token))
            }
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NumberParseError { token } => {
                ErrorTip::Suggestion(format!("Invalid number: `{}`", token))
            }
            ErrorImpl::AlreadyDeclared { name } => ErrorTip::Suggestion(format!(
                "`{}` is already visible here, pick another name",
                name
            )),
            ErrorImpl::NotDeclared { name } => ErrorTip::Suggestion(format!(
                "`{}` must be assigned before it is used",
                name
            )),
            ErrorImpl::UnexpectedArguments { expected, received }
            | ErrorImpl::MissingArguments { expected, received } => ErrorTip::Suggestion(format!(
                "Expected {} arguments, received {}",
                expected, received
            )),
            ErrorImpl::MismatchedBlockName { opened, .. } => {
                ErrorTip::Suggestion(format!("Close the block with `end {}`", opened))
            }
            ErrorImpl::UnknownMethod { .. } => ErrorTip::Suggestion(String::from(
                "Arrays have add, insert and delete; dictionaries have set and delete",
            )),
            ErrorImpl::ExpectedValue => ErrorTip::None,
            ErrorImpl::ReturnOutsideFunction | ErrorImpl::BreakOutsideLoop => ErrorTip::None,
            other => ErrorTip::Suggestion(other.to_string()),
        }
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("Unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("Unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("Unexpected token ({message}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("Error parsing number: {token:?}")]
    NumberParseError { token: String },

    #[error("Identifier {name} already declared")]
    AlreadyDeclared { name: String },

    #[error("Identifier {name} not declared")]
    NotDeclared { name: String },

    #[error("Expected a number, found {found}")]
    ExpectedNumber { found: String },
    #[error("Expected a boolean, found {found}")]
    ExpectedBoolean { found: String },
    #[error("Expected an integer, found {found}")]
    ExpectedInteger { found: String },
    #[error("Expected a string or number, found {found}")]
    ExpectedNumberOrString { found: String },
    #[error("Expected an array, found {found}")]
    ExpectedArray { found: String },
    #[error("Expected a dictionary, found {found}")]
    ExpectedDictionary { found: String },
    #[error("Expected an array or a dictionary, found {found}")]
    ExpectedArrayOrDictionary { found: String },
    #[error("Expected a function, found {found}")]
    ExpectedFunction { found: String },
    #[error("Expected a value, found void")]
    ExpectedValue,
    #[error("Operands must have the same type, found {left} and {right}")]
    OperandTypeMismatch { left: String, right: String },
    #[error("Types do not match: expected {expected}, received {received}")]
    TypeMatchError { expected: String, received: String },
    #[error("Argument types do not match: expected {expected}, received {received}")]
    ArgumentTypeMatchError { expected: String, received: String },
    #[error("Unexpected arguments: expected {expected}, received {received}")]
    UnexpectedArguments { expected: usize, received: usize },
    #[error("Missing arguments: expected {expected}, received {received}")]
    MissingArguments { expected: usize, received: usize },
    #[error("Cannot return {received} from a function returning {expected}")]
    ReturnTypeMismatch { expected: String, received: String },
    #[error("Expected a return value of type {expected}")]
    MissingReturnValue { expected: String },
    #[error("Cannot assign to {name}")]
    NotAssignable { name: String },
    #[error("Type {ty} has no method {name}")]
    UnknownMethod { name: String, ty: String },
    #[error("Method {name} can only be called as a statement")]
    MethodAsValue { name: String },

    #[error("Block opened as {opened} but closed as {closed}")]
    MismatchedBlockName { opened: String, closed: String },
    #[error("Return can only appear in a function")]
    ReturnOutsideFunction,
    #[error("Break can only appear in a loop")]
    BreakOutsideLoop,
}

impl ErrorImpl {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ErrorImpl::UnrecognisedToken { .. }
            | ErrorImpl::UnexpectedToken { .. }
            | ErrorImpl::UnexpectedTokenDetailed { .. }
            | ErrorImpl::NumberParseError { .. } => ErrorKind::Syntax,
            ErrorImpl::AlreadyDeclared { .. } => ErrorKind::Declaration,
            ErrorImpl::NotDeclared { .. } => ErrorKind::Resolution,
            ErrorImpl::MismatchedBlockName { .. }
            | ErrorImpl::ReturnOutsideFunction
            | ErrorImpl::BreakOutsideLoop => ErrorKind::Structural,
            _ => ErrorKind::Type,
        }
    }
}
