//! Lobby and game screens for the terminal host.

use anyhow::{Context, Result};
use log::{debug, warn};
use pixdex::{
    catalog::{Catalog, CatalogFilter, CatalogResult, Item, ItemId, TypeId},
    game::{
        GameActor, GameConfig, GameSession, GameStatus, GameView, Phase, normalize::capitalize,
    },
    leaderboard::{
        DEFAULT_TOP_PLAYERS, LeaderboardEntry, LeaderboardEvent, LeaderboardManager,
        SubmitOutcome,
    },
};
use std::{fmt, io::Write, sync::Arc};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, Lines},
    sync::broadcast::{self, error::TryRecvError},
};

use crate::commands::{GameCommand, LobbyCommand, parse_game_command, parse_lobby_command};

const LOBBY_HELP: &str = "\
Lobby commands:
  play               Start a game with the current filter
  scores             Show the top players
  catalog            List content types and genres with their ids
  list [TYPE]        Titles matching the filter, by type
  show ID            Details of one title
  types ID...        Only play titles of these types (no ids: all types)
  genres ID...       Only play titles with any of these genres (no ids: all)
  clear              Remove both filters
  name NAME          Change your player name
  quit               Exit
";

const GAME_HELP: &str = "\
Game commands:
  A-Z                Guess a letter
  guess TITLE        Guess the whole title
  quit               Leave the game (score is not saved)
";

/// Why a player name was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    /// Empty or whitespace only.
    Empty,
    /// Someone on the leaderboard already uses it.
    Taken(String),
    /// The leaderboard could not be checked.
    Unavailable(String),
}

impl fmt::Display for NameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Please enter a name"),
            Self::Taken(name) => write!(f, "The name '{}' is already taken", name),
            Self::Unavailable(message) => write!(f, "Could not check the name: {}", message),
        }
    }
}

impl std::error::Error for NameError {}

/// Check a player name the way the lobby's name prompt does: it must not
/// be blank and must not already be on the leaderboard (ignoring case).
pub async fn validate_player_name(
    leaderboard: &LeaderboardManager,
    name: &str,
) -> Result<String, NameError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(NameError::Empty);
    }

    match leaderboard.player_exists(name).await {
        Ok(true) => Err(NameError::Taken(name.to_string())),
        Ok(false) => Ok(name.to_string()),
        Err(e) => Err(NameError::Unavailable(e.client_message())),
    }
}

/// Render the game screen.
pub fn render_game(view: &GameView) -> String {
    let mut out = String::new();

    if let Some(word) = &view.masked_word {
        out.push_str(&format!("\n    {word}\n\n"));
    }
    out.push_str(&format!(
        "Lives: {}  Score: {}/{}",
        view.remaining_lives, view.score, view.win_threshold
    ));
    if !view.guessed_letters.is_empty() {
        let letters: String = view.guessed_letters.iter().collect();
        out.push_str(&format!("  Tried: {letters}"));
    }
    out.push('\n');
    if view.phase == Phase::InProgress {
        let letters: String = view.available_letters.iter().collect();
        out.push_str(&format!("Letters left: {letters}\n"));
    }

    for event in &view.events {
        out.push_str(&format!("  * {event}\n"));
    }
    out
}

/// What the leaderboard did with the final score, for the game-over screen.
pub fn describe_submission(submitted: &SubmitOutcome) -> Option<String> {
    match submitted {
        SubmitOutcome::Created(_) => Some("Your score is on the leaderboard".to_string()),
        SubmitOutcome::Improved { previous, .. } => {
            Some(format!("New best score! (was {previous})"))
        }
        SubmitOutcome::Unchanged(_) => submitted
            .entry()
            .map(|entry| format!("Your best is still {}", entry.score)),
        SubmitOutcome::Ignored => None,
    }
}

/// Render the top of the leaderboard.
pub fn render_scoreboard(entries: &[LeaderboardEntry]) -> String {
    if entries.is_empty() {
        return "No scores yet\n".to_string();
    }

    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| format!("  {}. {:<20} {}\n", i + 1, entry.name, entry.score))
        .collect()
}

/// Render content types and genres with their ids.
pub fn render_catalog(catalog: &Catalog) -> String {
    let mut out = String::from("Types:\n");
    for content_type in catalog.content_types() {
        out.push_str(&format!(
            "  {:>2}  {}\n",
            content_type.id,
            capitalize(&content_type.plural)
        ));
    }
    out.push_str("Genres:\n");
    for genre in catalog.genres() {
        out.push_str(&format!("  {:>2}  {}\n", genre.id, capitalize(&genre.name)));
    }
    out
}

/// Titles per content type. With `only`, list that type alone and ignore
/// the type part of `filter`.
///
/// # Errors
///
/// * `CatalogError::TypeNotFound` - `only` is not a known type
pub fn render_list(
    catalog: &Catalog,
    filter: &CatalogFilter,
    only: Option<TypeId>,
) -> CatalogResult<String> {
    let (types, filter) = match only {
        Some(id) => (
            vec![catalog.content_type_by_id(id)?],
            CatalogFilter::new().with_genres(filter.genres.iter().copied()),
        ),
        None => (catalog.content_types().iter().collect(), filter.clone()),
    };

    let mut out = String::new();
    for content_type in types {
        if !filter.types.is_empty() && !filter.types.contains(&content_type.id) {
            continue;
        }
        let items: Vec<&Item> = catalog
            .items_by_type(content_type.id)
            .into_iter()
            .filter(|item| filter.matches(item))
            .collect();

        out.push_str(&format!(
            "{} ({}):\n",
            capitalize(&content_type.plural),
            items.len()
        ));
        if items.is_empty() {
            out.push_str("  (none)\n");
        }
        for item in items {
            out.push_str(&format!("  {:>3}  {}\n", item.id, item.name));
        }
    }
    Ok(out)
}

/// Detail view of one title.
///
/// # Errors
///
/// * `CatalogError::ItemNotFound` - No title with this id
pub fn render_item(catalog: &Catalog, id: ItemId) -> CatalogResult<String> {
    let item = catalog.item_by_id(id)?;
    let kind = catalog
        .content_type_by_id(item.type_id)
        .map(|t| capitalize(&t.singular))
        .unwrap_or_else(|_| "Unknown type".to_string());
    let genres: Vec<String> = catalog
        .genres_for_item(item)
        .into_iter()
        .map(|g| capitalize(&g.name))
        .collect();

    let mut out = format!("#{} {}\n  {kind}", item.id, item.name);
    if !genres.is_empty() {
        out.push_str(&format!(" | {}", genres.join(", ")));
    }
    out.push('\n');
    if !item.description.is_empty() {
        out.push_str(&format!("  {}\n", item.description));
    }
    if !item.image_url.is_empty() {
        out.push_str(&format!("  {}\n", item.image_url));
    }
    Ok(out)
}

/// One-line summary of the active filter.
pub fn describe_filter(catalog: &Catalog, filter: &CatalogFilter) -> String {
    if filter.is_empty() {
        return "all titles".to_string();
    }

    let types: Vec<String> = filter
        .types
        .iter()
        .filter_map(|id| catalog.content_type_by_id(*id).ok())
        .map(|t| capitalize(&t.plural))
        .collect();
    let genres: Vec<String> = catalog
        .genres_by_ids(&filter.genres)
        .into_iter()
        .map(|g| capitalize(&g.name))
        .collect();

    match (types.is_empty(), genres.is_empty()) {
        (false, false) => format!("{} with {}", types.join(", "), genres.join(" or ")),
        (false, true) => types.join(", "),
        (true, false) => format!("any title with {}", genres.join(" or ")),
        (true, true) => "unknown filter".to_string(),
    }
}

/// Terminal host: lobby, games and the scoreboard
pub struct App {
    catalog: Catalog,
    leaderboard: Arc<LeaderboardManager>,
    config: GameConfig,
    player: String,
    filter: CatalogFilter,
    /// Leaderboard changes since the scoreboard was last shown
    changes: broadcast::Receiver<LeaderboardEvent>,
}

impl App {
    pub fn new(
        catalog: Catalog,
        leaderboard: Arc<LeaderboardManager>,
        config: GameConfig,
        player: String,
    ) -> Self {
        let changes = leaderboard.subscribe();
        Self {
            catalog,
            leaderboard,
            config,
            player,
            filter: CatalogFilter::new(),
            changes,
        }
    }

    pub fn player(&self) -> &str {
        &self.player
    }

    /// Run the lobby until the player quits or input ends.
    pub async fn run<R, W>(&mut self, input: &mut Lines<R>, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        writeln!(out, "Welcome to Pixdex, {}!", self.player)?;
        self.show_scores(out).await?;
        write!(out, "{LOBBY_HELP}")?;

        loop {
            write!(out, "\n[{}] lobby> ", describe_filter(&self.catalog, &self.filter))?;
            out.flush()?;

            let Some(line) = input.next_line().await.context("Failed to read input")? else {
                return Ok(());
            };

            match parse_lobby_command(&line) {
                Ok(LobbyCommand::Play) => {
                    let pool = self.catalog.game_pool(&self.filter);
                    if pool.is_empty() {
                        writeln!(out, "No titles match this filter")?;
                        continue;
                    }
                    if !self.play(pool, input, out).await? {
                        return Ok(());
                    }
                    if self.scoreboard_changed() {
                        self.show_scores(out).await?;
                    }
                }
                Ok(LobbyCommand::Scores) => self.show_scores(out).await?,
                Ok(LobbyCommand::Catalog) => write!(out, "{}", render_catalog(&self.catalog))?,
                Ok(LobbyCommand::List(only)) => {
                    match render_list(&self.catalog, &self.filter, only) {
                        Ok(list) => write!(out, "{list}")?,
                        Err(e) => writeln!(out, "{e}")?,
                    }
                }
                Ok(LobbyCommand::Show(id)) => match render_item(&self.catalog, id) {
                    Ok(detail) => write!(out, "{detail}")?,
                    Err(e) => writeln!(out, "{e}")?,
                },
                Ok(LobbyCommand::Types(ids)) => {
                    self.filter = self.filter.clone().with_types(ids);
                }
                Ok(LobbyCommand::Genres(ids)) => {
                    self.filter = self.filter.clone().with_genres(ids);
                }
                Ok(LobbyCommand::Clear) => self.filter = CatalogFilter::new(),
                Ok(LobbyCommand::Name(name)) => {
                    match validate_player_name(&self.leaderboard, &name).await {
                        Ok(name) => {
                            self.player = name;
                            writeln!(out, "You are now playing as {}", self.player)?;
                        }
                        Err(e) => writeln!(out, "{e}")?,
                    }
                }
                Ok(LobbyCommand::Help) => write!(out, "{LOBBY_HELP}")?,
                Ok(LobbyCommand::Quit) => return Ok(()),
                Err(e) => writeln!(out, "{e}")?,
            }
        }
    }

    /// Play one game. Returns `false` if input ended mid-game.
    async fn play<R, W>(
        &self,
        pool: Vec<Item>,
        input: &mut Lines<R>,
        out: &mut W,
    ) -> Result<bool>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let session = GameSession::new(self.player.clone(), pool);
        let handle = GameActor::spawn(session, self.config.clone(), self.leaderboard.clone());
        let mut updates = handle.subscribe();

        let mut view = handle.view().await.map_err(anyhow::Error::msg)?;
        writeln!(
            out,
            "Guess {} titles to win. You have {} lives.",
            view.win_threshold, view.remaining_lives
        )?;
        write!(out, "{GAME_HELP}")?;

        loop {
            // Guessing is disabled until the next title is on screen
            if view.phase == Phase::Intermission {
                write!(out, "{}", render_game(&view))?;
                view = updates
                    .wait_for(|update| update.phase != Phase::Intermission)
                    .await
                    .context("Game ended unexpectedly")?
                    .clone();
            }

            write!(out, "{}", render_game(&view))?;

            if let Some(outcome) = &view.outcome {
                let headline = match outcome.status {
                    GameStatus::Won => "You win!",
                    GameStatus::Lost => "Game over.",
                };
                writeln!(out, "{headline} Final score: {}", outcome.score)?;
                if let Some(line) = view.submitted.as_ref().and_then(describe_submission) {
                    writeln!(out, "{line}")?;
                }
                if let Some(notice) = &view.notice {
                    writeln!(out, "{notice}")?;
                }
                return Ok(true);
            }

            write!(out, "guess> ")?;
            out.flush()?;

            let Some(line) = input.next_line().await.context("Failed to read input")? else {
                let _ = handle.abandon().await;
                return Ok(false);
            };

            match parse_game_command(&line, &view.guessed_letters) {
                Ok(GameCommand::Guess(event)) => {
                    debug!("{} guesses {:?}", self.player, event);
                    view = handle.guess(event).await.map_err(anyhow::Error::msg)?;
                }
                Ok(GameCommand::Help) => write!(out, "{GAME_HELP}")?,
                Ok(GameCommand::Quit) => {
                    if let Err(e) = handle.abandon().await {
                        warn!("Failed to abandon game: {e}");
                    }
                    writeln!(out, "Game abandoned")?;
                    return Ok(true);
                }
                Err(e) => writeln!(out, "{e}")?,
            }
        }
    }

    /// Drain the change feed; `true` if anything was written since the last
    /// call.
    fn scoreboard_changed(&mut self) -> bool {
        let mut changed = false;
        loop {
            match self.changes.try_recv() {
                Ok(event) => {
                    debug!("Leaderboard change: {event:?}");
                    changed = true;
                }
                Err(TryRecvError::Lagged(_)) => changed = true,
                Err(TryRecvError::Empty | TryRecvError::Closed) => return changed,
            }
        }
    }

    async fn show_scores<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "\nTop {DEFAULT_TOP_PLAYERS}:")?;
        match self.leaderboard.scoreboard().await {
            Ok(entries) => write!(out, "{}", render_scoreboard(&entries))?,
            Err(e) => writeln!(out, "  {}", e.client_message())?,
        }
        Ok(())
    }
}
