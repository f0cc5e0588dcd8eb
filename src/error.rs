use thiserror::Error;

/// The reasons a parse can fail.
///
/// Positions are zero-based. Path data is usually a single line, in which
/// case the column is simply the character offset into the string.
#[non_exhaustive]
#[derive(Error, Clone, Debug, PartialEq)]
pub enum ParseError {
    /// A character that is neither a separator, part of a number, nor a
    /// recognized command letter.
    #[error("Line {line} column {column}: unexpected character {found:?}.")]
    Syntax { found: char, line: i32, column: i32 },

    /// A drawing command was issued while no subpath was open.
    #[error("Line {line} column {column}: command {command:?} without a preceding move-to.")]
    MissingMoveTo {
        command: char,
        line: i32,
        column: i32,
    },

    /// A number group with no command to repeat, for example right after a
    /// close (`Z` takes no arguments) or at the very start of the path.
    #[error("Line {line} column {column}: Unallowed implicit command.")]
    UnallowedImplicitCommand { line: i32, column: i32 },

    /// The final argument group of a command was cut short.
    #[error("Line {line} column {column}: missing arguments for command {command:?}.")]
    Arity {
        command: char,
        line: i32,
        column: i32,
    },
}
