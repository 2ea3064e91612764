//! Hangman session state and its reducer.
//!
//! A `GameSession` is a plain value. Every transition consumes the previous
//! session and returns the next one, so the host decides when a new value
//! replaces the old. Randomness for target selection is passed in.

use rand::{Rng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeSet, HashSet, VecDeque},
    fmt,
    sync::Arc,
};
use uuid::Uuid;

use super::{
    constants::{INITIAL_LIVES, win_threshold},
    normalize::{canonical_title, letter_of, target_letters},
    outcome::{GameOutcome, GameStatus},
    render::{MaskedWord, mask},
};
use crate::catalog::{Item, ItemId};

/// Phase of a hangman session
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Phase {
    /// No target selected yet
    Loading,
    /// Target selected, accepting guesses
    InProgress,
    /// Target just solved; waiting for the host to select the next one
    Intermission,
    Won,
    Lost,
}

impl Phase {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Loading => "loading",
            Self::InProgress => "in progress",
            Self::Intermission => "intermission",
            Self::Won => "won",
            Self::Lost => "lost",
        };
        write!(f, "{repr}")
    }
}

/// A player's guess
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum GuessEvent {
    Letter(char),
    Title(String),
}

/// Things that happened during a session, for the host to log or show
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum GameEvent {
    TargetSelected(ItemId),
    LetterHit(char),
    LetterMiss(char),
    TitleMiss,
    Solved { item_id: ItemId, score: u32 },
    PoolExhausted,
    Won { score: u32 },
    Lost { score: u32 },
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::TargetSelected(id) => format!("new title to guess (#{id})"),
            Self::LetterHit(letter) => format!("{letter} is in the title"),
            Self::LetterMiss(letter) => format!("no {letter} in the title"),
            Self::TitleMiss => "wrong title".to_string(),
            Self::Solved { item_id, score } => format!("solved #{item_id}, score {score}"),
            Self::PoolExhausted => "no titles left".to_string(),
            Self::Won { score } => format!("you win with {score}"),
            Self::Lost { score } => format!("you lose with {score}"),
        };
        write!(f, "{repr}")
    }
}

/// One player's play-through, from lobby to won/lost.
#[derive(Clone, Debug)]
pub struct GameSession {
    id: Uuid,
    player: String,
    pool: Arc<[Item]>,
    phase: Phase,
    remaining_lives: u8,
    score: u32,
    guessed_letters: BTreeSet<char>,
    solved_item_ids: BTreeSet<ItemId>,
    /// Index into `pool`
    current: Option<usize>,
    /// Letters of the current target, cached at selection time
    target_letters: BTreeSet<char>,
    events: VecDeque<GameEvent>,
}

impl GameSession {
    /// New session in `Loading`. Duplicate item ids in `pool` are dropped,
    /// first one wins.
    #[must_use]
    pub fn new(player: impl Into<String>, pool: impl IntoIterator<Item = Item>) -> Self {
        let mut seen = HashSet::new();
        let pool: Arc<[Item]> = pool.into_iter().filter(|item| seen.insert(item.id)).collect();

        Self {
            id: Uuid::new_v4(),
            player: player.into(),
            pool,
            phase: Phase::Loading,
            remaining_lives: INITIAL_LIVES,
            score: 0,
            guessed_letters: BTreeSet::new(),
            solved_item_ids: BTreeSet::new(),
            current: None,
            target_letters: BTreeSet::new(),
            events: VecDeque::new(),
        }
    }

    /// Select the first target.
    #[must_use]
    pub fn start<R: Rng + ?Sized>(self, rng: &mut R) -> Self {
        self.next_target(rng)
    }

    /// Pick a target uniformly among unsolved items.
    ///
    /// Only acts in `Loading` or `Intermission`; an empty candidate set wins
    /// the game.
    #[must_use]
    pub fn next_target<R: Rng + ?Sized>(mut self, rng: &mut R) -> Self {
        self.select_target(rng);
        self
    }

    /// In-place form of [`GameSession::next_target`].
    pub fn select_target<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if !matches!(self.phase, Phase::Loading | Phase::Intermission) {
            return;
        }

        let candidates: Vec<usize> = self
            .pool
            .iter()
            .enumerate()
            .filter(|(_, item)| !self.solved_item_ids.contains(&item.id))
            .map(|(i, _)| i)
            .collect();

        match candidates.choose(rng) {
            Some(&index) => {
                let item = &self.pool[index];
                self.target_letters = target_letters(&item.name);
                self.guessed_letters.clear();
                self.current = Some(index);
                self.phase = Phase::InProgress;
                self.events.push_back(GameEvent::TargetSelected(item.id));
            }
            None => {
                self.current = None;
                self.events.push_back(GameEvent::PoolExhausted);
                self.finish(Phase::Won);
            }
        }
    }

    /// Apply one guess. Anything outside `InProgress` is a no-op.
    #[must_use]
    pub fn apply(mut self, event: &GuessEvent) -> Self {
        self.update(event);
        self
    }

    /// In-place form of [`GameSession::apply`].
    pub fn update(&mut self, event: &GuessEvent) {
        if self.phase != Phase::InProgress {
            return;
        }

        match event {
            GuessEvent::Letter(raw) => self.guess_letter(*raw),
            GuessEvent::Title(text) => self.guess_title(text),
        }
    }

    fn guess_letter(&mut self, raw: char) {
        let Some(letter) = letter_of(raw) else {
            return;
        };
        if !self.guessed_letters.insert(letter) {
            return;
        }

        if self.target_letters.contains(&letter) {
            self.events.push_back(GameEvent::LetterHit(letter));
            if self.target_letters.is_subset(&self.guessed_letters) {
                self.solve();
            }
        } else {
            self.events.push_back(GameEvent::LetterMiss(letter));
            self.lose_life();
        }
    }

    fn guess_title(&mut self, text: &str) {
        let matched = self
            .current_item()
            .is_some_and(|item| canonical_title(text) == canonical_title(&item.name));

        if matched {
            self.solve();
        } else {
            self.events.push_back(GameEvent::TitleMiss);
            self.lose_life();
        }
    }

    fn solve(&mut self) {
        let Some(item_id) = self.current_item().map(|item| item.id) else {
            return;
        };

        self.guessed_letters.extend(self.target_letters.iter().copied());
        if self.solved_item_ids.insert(item_id) {
            self.score += 1;
            self.events.push_back(GameEvent::Solved {
                item_id,
                score: self.score,
            });
        }

        if self.solved_item_ids.len() >= self.win_threshold() {
            self.finish(Phase::Won);
        } else {
            self.phase = Phase::Intermission;
        }
    }

    fn lose_life(&mut self) {
        self.remaining_lives = self.remaining_lives.saturating_sub(1);
        if self.remaining_lives == 0 {
            self.finish(Phase::Lost);
        }
    }

    fn finish(&mut self, phase: Phase) {
        self.phase = phase;
        let score = self.score;
        self.events.push_back(match phase {
            Phase::Lost => GameEvent::Lost { score },
            _ => GameEvent::Won { score },
        });
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn player(&self) -> &str {
        &self.player
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    pub fn remaining_lives(&self) -> u8 {
        self.remaining_lives
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn guessed_letters(&self) -> &BTreeSet<char> {
        &self.guessed_letters
    }

    pub fn solved_item_ids(&self) -> &BTreeSet<ItemId> {
        &self.solved_item_ids
    }

    pub fn pool(&self) -> &[Item] {
        &self.pool
    }

    pub fn pool_size(&self) -> usize {
        self.pool.len()
    }

    /// Distinct solves needed to win this session.
    pub fn win_threshold(&self) -> usize {
        win_threshold(self.pool.len())
    }

    pub fn current_item(&self) -> Option<&Item> {
        self.current.map(|i| &self.pool[i])
    }

    /// Whether the letter picker should still offer `c`.
    pub fn is_letter_available(&self, c: char) -> bool {
        letter_of(c).is_some_and(|letter| !self.guessed_letters.contains(&letter))
    }

    /// Current target with unguessed letters hidden.
    pub fn masked_word(&self) -> Option<MaskedWord> {
        self.current_item()
            .map(|item| mask(&item.name, &self.guessed_letters))
    }

    /// Final result, once the session is over.
    pub fn outcome(&self) -> Option<GameOutcome> {
        let status = match self.phase {
            Phase::Won => GameStatus::Won,
            Phase::Lost => GameStatus::Lost,
            _ => return None,
        };
        Some(GameOutcome {
            session_id: self.id,
            status,
            score: self.score,
            player: self.player.clone(),
        })
    }

    pub fn drain_events(&mut self) -> VecDeque<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Reducer form of [`GameSession::apply`].
#[must_use]
pub fn apply_guess(session: GameSession, event: &GuessEvent) -> GameSession {
    session.apply(event)
}
