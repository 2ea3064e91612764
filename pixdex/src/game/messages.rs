//! Game actor message types.

use serde::Serialize;
use std::collections::BTreeSet;
use tokio::sync::oneshot;
use uuid::Uuid;

use super::{
    constants::ALPHABET,
    outcome::{GameOutcome, ReportStatus},
    render::MaskedWord,
    session::{GameEvent, GameSession, GuessEvent, Phase},
};
use crate::leaderboard::SubmitOutcome;

/// Messages that can be sent to a `GameActor`
#[derive(Debug)]
pub enum GameMessage {
    /// Apply a guess and answer with the resulting view
    Guess {
        event: GuessEvent,
        response: oneshot::Sender<GameView>,
    },

    /// Get the current view
    GetView { response: oneshot::Sender<GameView> },

    /// Leave the game; the session is discarded without reporting
    Abandon,
}

/// Everything the host needs to draw the game screen
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GameView {
    pub session_id: Uuid,
    pub player: String,
    pub phase: Phase,
    pub masked_word: Option<MaskedWord>,
    pub image_url: Option<String>,
    pub remaining_lives: u8,
    pub score: u32,
    pub win_threshold: usize,
    pub guessed_letters: BTreeSet<char>,
    /// Letters the picker still offers
    pub available_letters: Vec<char>,
    /// Events produced by the change that led to this view
    pub events: Vec<GameEvent>,
    pub outcome: Option<GameOutcome>,
    /// What the leaderboard did with the final score
    pub submitted: Option<SubmitOutcome>,
    /// Non-fatal notice about the leaderboard write, if it failed
    pub notice: Option<String>,
}

impl GameView {
    /// Build a view of `session`.
    pub fn new(session: &GameSession, events: Vec<GameEvent>, report: Option<&ReportStatus>) -> Self {
        Self {
            session_id: session.id(),
            player: session.player().to_string(),
            phase: session.phase(),
            masked_word: session.masked_word(),
            image_url: session.current_item().map(|item| item.image_url.clone()),
            remaining_lives: session.remaining_lives(),
            score: session.score(),
            win_threshold: session.win_threshold(),
            guessed_letters: session.guessed_letters().clone(),
            available_letters: ALPHABET
                .into_iter()
                .filter(|c| session.is_letter_available(*c))
                .collect(),
            events,
            outcome: session.outcome(),
            submitted: report.and_then(ReportStatus::submitted).cloned(),
            notice: report.and_then(ReportStatus::notice),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }
}
