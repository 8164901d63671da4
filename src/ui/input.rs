//! Line command parsing for the terminal front-end.
//!
//! Each input line maps to one [`Command`]. Most commands translate directly to
//! an [`Event`]; the few that need runtime input (randomness, help text) are
//! returned as their own variants for the binary to complete.

use crate::app::{Event, View};
use crate::domain::Mood;
use crate::ui::viewmodel::ALL_YEARS;
use thiserror::Error;

/// Help text listing every command.
pub const HELP: &str = "\
comandos:
  search <texto>     buscar por título (vacío para limpiar)
  clear              quitar búsqueda, año y mood
  year <YYYY|all>    filtrar por año de estreno
  mood <adrenaline|cry|laugh|scared|none>
  scroll             llegar al final de la lista (carga automática)
  more               cargar más películas
  discover           ver la lista de descubrimiento
  favorites          ver tus favoritos
  open <id>          abrir el detalle de una película
  close              cerrar el detalle
  fav [id]           marcar o desmarcar favorito
  similar <n>        abrir el n-ésimo título similar
  shuffle            película al azar
  reload             recargar la lista
  help               esta ayuda
  quit               salir";

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Feed this event to the state machine.
    Dispatch(Event),
    /// Pick a random movie; the caller supplies the roll.
    Shuffle,
    Help,
    /// Blank line.
    Nothing,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("comando desconocido: {0} (escribe 'help')")]
    Unknown(String),

    #[error("{command}: falta {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },

    #[error("{command}: valor no válido '{value}'")]
    InvalidArgument {
        command: &'static str,
        value: String,
    },
}

/// Parses one input line.
///
/// # Errors
///
/// Returns a [`CommandError`] for unknown commands and missing or malformed
/// arguments.
///
/// # Examples
///
/// ```
/// use cinematch::app::Event;
/// use cinematch::ui::input::{parse_command, Command};
///
/// assert_eq!(
///     parse_command("year 1999").unwrap(),
///     Command::Dispatch(Event::SelectYear(Some("1999".into())))
/// );
/// assert!(parse_command("year soon").is_err());
/// ```
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let (name, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(name, rest)| (name, rest.trim()));

    match name.to_lowercase().as_str() {
        "" => Ok(Command::Nothing),
        "search" | "s" => dispatch(Event::SearchInput(rest.to_string())),
        "clear" => dispatch(Event::ClearFilters),
        "year" | "y" => parse_year(rest).map(|year| Command::Dispatch(Event::SelectYear(year))),
        "mood" | "m" => parse_mood(rest).map(|mood| Command::Dispatch(Event::SelectMood(mood))),
        "scroll" => dispatch(Event::SentinelVisible),
        "more" => dispatch(Event::LoadMore),
        "discover" | "d" => dispatch(Event::SwitchView(View::Discover)),
        "favorites" | "favs" | "f" => dispatch(Event::SwitchView(View::Favorites)),
        "open" | "o" => {
            let movie_id = parse_id("open", rest)?.ok_or(CommandError::MissingArgument {
                command: "open",
                expected: "<id>",
            })?;
            dispatch(Event::OpenMovie { movie_id })
        }
        "close" => dispatch(Event::CloseMovie),
        "fav" => dispatch(Event::ToggleFavorite { movie_id: parse_id("fav", rest)? }),
        "similar" => {
            let position: usize = rest.parse().map_err(|_| invalid_or_missing("similar", rest, "<n>"))?;
            let index = position
                .checked_sub(1)
                .ok_or_else(|| CommandError::InvalidArgument { command: "similar", value: rest.to_string() })?;
            dispatch(Event::OpenSimilar { index })
        }
        "shuffle" => Ok(Command::Shuffle),
        "reload" => dispatch(Event::Reload),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => dispatch(Event::Quit),
        _ => Err(CommandError::Unknown(name.to_string())),
    }
}

#[allow(clippy::unnecessary_wraps)]
fn dispatch(event: Event) -> Result<Command, CommandError> {
    Ok(Command::Dispatch(event))
}

fn invalid_or_missing(command: &'static str, value: &str, expected: &'static str) -> CommandError {
    if value.is_empty() {
        CommandError::MissingArgument { command, expected }
    } else {
        CommandError::InvalidArgument { command, value: value.to_string() }
    }
}

fn parse_year(value: &str) -> Result<Option<String>, CommandError> {
    match value {
        "" => Err(CommandError::MissingArgument { command: "year", expected: "<YYYY|all>" }),
        ALL_YEARS | "todos" => Ok(None),
        year if year.len() == 4 && year.chars().all(|c| c.is_ascii_digit()) => Ok(Some(year.to_string())),
        other => Err(CommandError::InvalidArgument { command: "year", value: other.to_string() }),
    }
}

fn parse_mood(value: &str) -> Result<Option<Mood>, CommandError> {
    match value {
        "" => Err(CommandError::MissingArgument { command: "mood", expected: "<mood|none>" }),
        "none" | "off" => Ok(None),
        other => other
            .parse::<Mood>()
            .map(Some)
            .map_err(|_| CommandError::InvalidArgument { command: "mood", value: other.to_string() }),
    }
}

fn parse_id(command: &'static str, value: &str) -> Result<Option<i64>, CommandError> {
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| CommandError::InvalidArgument { command, value: value.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_keeps_inner_spaces_and_allows_empty() {
        assert_eq!(
            parse_command("search  the dark knight ").unwrap(),
            Command::Dispatch(Event::SearchInput("the dark knight".into()))
        );
        assert_eq!(
            parse_command("search").unwrap(),
            Command::Dispatch(Event::SearchInput(String::new()))
        );
    }

    #[test]
    fn mood_accepts_ids_labels_and_none() {
        assert_eq!(
            parse_command("mood laugh").unwrap(),
            Command::Dispatch(Event::SelectMood(Some(Mood::Laugh)))
        );
        assert_eq!(
            parse_command("mood Miedo").unwrap(),
            Command::Dispatch(Event::SelectMood(Some(Mood::Scared)))
        );
        assert_eq!(parse_command("mood none").unwrap(), Command::Dispatch(Event::SelectMood(None)));
        assert!(matches!(parse_command("mood bored"), Err(CommandError::InvalidArgument { .. })));
    }

    #[test]
    fn year_all_clears() {
        assert_eq!(parse_command("year all").unwrap(), Command::Dispatch(Event::SelectYear(None)));
        assert!(matches!(parse_command("year"), Err(CommandError::MissingArgument { .. })));
        assert!(matches!(parse_command("year 99"), Err(CommandError::InvalidArgument { .. })));
    }

    #[test]
    fn ids_and_positions() {
        assert_eq!(
            parse_command("open 603").unwrap(),
            Command::Dispatch(Event::OpenMovie { movie_id: 603 })
        );
        assert_eq!(
            parse_command("fav").unwrap(),
            Command::Dispatch(Event::ToggleFavorite { movie_id: None })
        );
        assert_eq!(
            parse_command("similar 1").unwrap(),
            Command::Dispatch(Event::OpenSimilar { index: 0 })
        );
        assert!(parse_command("similar 0").is_err());
        assert!(matches!(parse_command("open"), Err(CommandError::MissingArgument { .. })));
    }

    #[test]
    fn misc_commands() {
        assert_eq!(parse_command("   ").unwrap(), Command::Nothing);
        assert_eq!(parse_command("shuffle").unwrap(), Command::Shuffle);
        assert_eq!(parse_command("QUIT").unwrap(), Command::Dispatch(Event::Quit));
        assert_eq!(parse_command("scroll").unwrap(), Command::Dispatch(Event::SentinelVisible));
        assert!(matches!(parse_command("dance"), Err(CommandError::Unknown(_))));
    }
}
