use pixdex::{
    catalog::{GenreId, ItemId, TypeId},
    game::{GuessEvent, normalize::letter_of},
};
use std::{collections::BTreeSet, fmt};

/// Commands available on the lobby screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LobbyCommand {
    /// Start a game with the current filter
    Play,
    /// Show the top players
    Scores,
    /// List content types and genres
    Catalog,
    /// Titles matching the filter, grouped by type, or of one type only
    List(Option<TypeId>),
    /// Details of one title
    Show(ItemId),
    /// Restrict the pool to these content types
    Types(Vec<TypeId>),
    /// Restrict the pool to items with any of these genres
    Genres(Vec<GenreId>),
    /// Drop both filters
    Clear,
    /// Change the player name
    Name(String),
    Help,
    Quit,
}

/// Commands available while a game is running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameCommand {
    Guess(GuessEvent),
    Help,
    Quit,
}

/// Errors that can occur while reading player input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// Title guess with nothing but whitespace.
    EmptyTitle,
    /// Letter already guessed for this title.
    AlreadyGuessed(char),
    /// Single character that is not a guessable letter.
    NotALetter(String),
    /// Filter id that is not a number.
    InvalidId(String),
    /// Show command without an id.
    MissingId,
    /// Name command without a name.
    MissingName,
    /// Unrecognized command.
    UnrecognizedCommand(String),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "Type a title after 'guess' (e.g., 'guess dark')"),
            Self::AlreadyGuessed(letter) => {
                write!(f, "You already tried '{}'. Pick another letter", letter)
            }
            Self::NotALetter(value) => {
                write!(f, "'{}' is not a letter. Guess a single letter A-Z", value)
            }
            Self::InvalidId(value) => write!(
                f,
                "Invalid id '{}'. Use numbers from 'catalog' (e.g., 'types 1 3')",
                value
            ),
            Self::MissingId => write!(f, "Show requires a title id (e.g., 'show 4')"),
            Self::MissingName => write!(f, "Name requires a value (e.g., 'name Ana')"),
            Self::UnrecognizedCommand(cmd) => write!(
                f,
                "Unrecognized command '{}'. Type 'help' to see available commands",
                cmd
            ),
        }
    }
}

impl std::error::Error for InputError {}

/// Parse a lobby command.
///
/// # Examples
///
/// ```
/// use px_client::commands::{LobbyCommand, parse_lobby_command};
///
/// assert_eq!(parse_lobby_command("play"), Ok(LobbyCommand::Play));
/// assert_eq!(parse_lobby_command("types 1 3"), Ok(LobbyCommand::Types(vec![1, 3])));
/// ```
pub fn parse_lobby_command(input: &str) -> Result<LobbyCommand, InputError> {
    let trimmed = input.trim();

    match trimmed {
        "play" | "p" => return Ok(LobbyCommand::Play),
        "scores" | "top" => return Ok(LobbyCommand::Scores),
        "catalog" => return Ok(LobbyCommand::Catalog),
        "clear" => return Ok(LobbyCommand::Clear),
        "help" | "?" => return Ok(LobbyCommand::Help),
        "quit" | "exit" => return Ok(LobbyCommand::Quit),
        _ => {}
    }

    let (head, rest) = split_command(trimmed);
    match head {
        "types" => parse_ids(rest).map(LobbyCommand::Types),
        "genres" => parse_ids(rest).map(LobbyCommand::Genres),
        "list" | "ls" if rest.is_empty() => Ok(LobbyCommand::List(None)),
        "list" | "ls" => parse_id(rest).map(|id| LobbyCommand::List(Some(id))),
        "show" if rest.is_empty() => Err(InputError::MissingId),
        "show" => parse_id(rest).map(LobbyCommand::Show),
        "name" if rest.is_empty() => Err(InputError::MissingName),
        "name" => Ok(LobbyCommand::Name(rest.to_string())),
        _ => Err(InputError::UnrecognizedCommand(trimmed.to_string())),
    }
}

/// Parse a command on the game screen.
///
/// A single character is a letter guess; `guess TITLE` guesses the whole
/// title. Letters in `guessed` are rejected, the way a letter picker
/// disables them.
///
/// # Examples
///
/// ```
/// use px_client::commands::{GameCommand, InputError, parse_game_command};
/// use pixdex::game::GuessEvent;
/// use std::collections::BTreeSet;
///
/// let guessed: BTreeSet<char> = ['A'].into_iter().collect();
/// assert_eq!(
///     parse_game_command("e", &guessed),
///     Ok(GameCommand::Guess(GuessEvent::Letter('E')))
/// );
/// assert_eq!(parse_game_command("a", &guessed), Err(InputError::AlreadyGuessed('A')));
/// assert_eq!(parse_game_command("guess   ", &guessed), Err(InputError::EmptyTitle));
/// ```
pub fn parse_game_command(
    input: &str,
    guessed: &BTreeSet<char>,
) -> Result<GameCommand, InputError> {
    let trimmed = input.trim();

    match trimmed {
        "help" | "?" => return Ok(GameCommand::Help),
        "quit" | "exit" => return Ok(GameCommand::Quit),
        _ => {}
    }

    let mut chars = trimmed.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return parse_letter(c, guessed);
    }

    let (head, rest) = split_command(trimmed);
    match head {
        "guess" | "title" if rest.is_empty() => Err(InputError::EmptyTitle),
        "guess" | "title" => Ok(GameCommand::Guess(GuessEvent::Title(rest.to_string()))),
        _ => Err(InputError::UnrecognizedCommand(trimmed.to_string())),
    }
}

/// Parse a single letter guess
fn parse_letter(c: char, guessed: &BTreeSet<char>) -> Result<GameCommand, InputError> {
    let letter = letter_of(c).ok_or_else(|| InputError::NotALetter(c.to_string()))?;
    if guessed.contains(&letter) {
        return Err(InputError::AlreadyGuessed(letter));
    }
    Ok(GameCommand::Guess(GuessEvent::Letter(letter)))
}

/// Parse whitespace-separated ids: "1 3 4"
fn parse_ids<T: std::str::FromStr>(rest: &str) -> Result<Vec<T>, InputError> {
    rest.split_ascii_whitespace()
        .map(|value| {
            value
                .parse()
                .map_err(|_| InputError::InvalidId(value.to_string()))
        })
        .collect()
}

/// Parse exactly one id
fn parse_id<T: std::str::FromStr>(rest: &str) -> Result<T, InputError> {
    rest.parse()
        .map_err(|_| InputError::InvalidId(rest.to_string()))
}

/// Split "head rest of line" at the first whitespace
fn split_command(input: &str) -> (&str, &str) {
    match input.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (input, ""),
    }
}
