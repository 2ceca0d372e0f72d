//! Line commands of the interactive shell.

use crate::types::{IngredientId, IngredientsAction};
use thiserror::Error;

/// Usage text printed by `help`
pub const HELP: &str = "\
commands:
  login                   log in
  add <title> <amount>    store a new ingredient
  rm <id>                 remove an ingredient
  filter [text]           filter by title (empty shows everything)
  dismiss [search]        dismiss the list (or search) error
  list                    show the screen again
  help                    show this text
  quit                    exit";

/// A parsed input line
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Dispatch an action to the store
    Send(IngredientsAction),
    /// Render the current screen
    Show,
    /// Print [`HELP`]
    Help,
    /// Leave the shell
    Quit,
}

/// Input that is not a command
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// First word is not a known command
    #[error("unknown command `{0}` (type `help`)")]
    Unknown(String),

    /// The command is missing arguments or has malformed ones
    #[error("usage: {0}")]
    Usage(&'static str),
}

/// Parse one input line
///
/// Blank lines re-render the screen. For `add`, the last word is the amount
/// and everything before it is the title.
///
/// # Errors
///
/// Returns [`ParseError`] for unknown commands or bad arguments.
pub fn parse(line: &str) -> Result<Command, ParseError> {
    let line = line.trim();
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(word, rest)| (word, rest.trim()));

    match word {
        "" | "list" | "ls" => Ok(Command::Show),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        "login" => Ok(Command::Send(IngredientsAction::Login)),
        "add" => {
            let (title, amount) = rest
                .rsplit_once(char::is_whitespace)
                .ok_or(ParseError::Usage("add <title> <amount>"))?;
            let title = title.trim();
            if title.is_empty() || amount.parse::<f64>().is_err() {
                return Err(ParseError::Usage("add <title> <amount>"));
            }
            Ok(Command::Send(IngredientsAction::AddIngredient {
                title: title.to_string(),
                amount: amount.to_string(),
            }))
        },
        "rm" | "remove" => {
            if rest.is_empty() || rest.contains(char::is_whitespace) {
                return Err(ParseError::Usage("rm <id>"));
            }
            Ok(Command::Send(IngredientsAction::RemoveIngredient {
                id: IngredientId::new(rest),
            }))
        },
        "filter" => Ok(Command::Send(IngredientsAction::FilterChanged {
            text: rest.to_string(),
        })),
        "dismiss" => match rest {
            "" => Ok(Command::Send(IngredientsAction::DismissError)),
            "search" => Ok(Command::Send(IngredientsAction::DismissSearchError)),
            _ => Err(ParseError::Usage("dismiss [search]")),
        },
        other => Err(ParseError::Unknown(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_takes_last_word_as_amount() {
        assert_eq!(
            parse("add  Brown sugar 250 "),
            Ok(Command::Send(IngredientsAction::AddIngredient {
                title: "Brown sugar".to_string(),
                amount: "250".to_string(),
            }))
        );
    }

    #[test]
    fn add_requires_numeric_amount() {
        assert_eq!(parse("add Flour"), Err(ParseError::Usage("add <title> <amount>")));
        assert_eq!(
            parse("add Flour lots"),
            Err(ParseError::Usage("add <title> <amount>"))
        );
    }

    #[test]
    fn filter_without_text_clears() {
        assert_eq!(
            parse("filter"),
            Ok(Command::Send(IngredientsAction::FilterChanged {
                text: String::new()
            }))
        );
        assert_eq!(
            parse("filter Green apple"),
            Ok(Command::Send(IngredientsAction::FilterChanged {
                text: "Green apple".to_string()
            }))
        );
    }

    #[test]
    fn rm_and_dismiss() {
        assert_eq!(
            parse("rm -Nx1"),
            Ok(Command::Send(IngredientsAction::RemoveIngredient {
                id: IngredientId::from("-Nx1")
            }))
        );
        assert_eq!(parse("rm"), Err(ParseError::Usage("rm <id>")));
        assert_eq!(parse("dismiss"), Ok(Command::Send(IngredientsAction::DismissError)));
        assert_eq!(
            parse("dismiss search"),
            Ok(Command::Send(IngredientsAction::DismissSearchError))
        );
    }

    #[test]
    fn shell_commands() {
        assert_eq!(parse(""), Ok(Command::Show));
        assert_eq!(parse("list"), Ok(Command::Show));
        assert_eq!(parse("help"), Ok(Command::Help));
        assert_eq!(parse("quit"), Ok(Command::Quit));
        assert_eq!(parse("LOGIN"), Err(ParseError::Unknown("LOGIN".to_string())));
    }
}
