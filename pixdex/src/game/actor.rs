//! Game actor owning one hangman session.

use log::{debug, info};
use rand::{SeedableRng, rngs::StdRng};
use std::{pin::Pin, sync::Arc};
use tokio::{
    sync::{mpsc, oneshot, watch},
    time::{Sleep, sleep},
};
use uuid::Uuid;

use super::{
    config::GameConfig,
    messages::{GameMessage, GameView},
    outcome::{OutcomeReporter, ReportStatus},
    session::{GameEvent, GameSession, GuessEvent, Phase},
};
use crate::leaderboard::LeaderboardManager;

/// Game actor handle for sending messages
#[derive(Clone)]
pub struct GameHandle {
    sender: mpsc::Sender<GameMessage>,
    updates: watch::Receiver<GameView>,
    session_id: Uuid,
}

impl GameHandle {
    /// Create a new game handle
    pub fn new(
        sender: mpsc::Sender<GameMessage>,
        updates: watch::Receiver<GameView>,
        session_id: Uuid,
    ) -> Self {
        Self {
            sender,
            updates,
            session_id,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Send a message to the game
    pub async fn send(&self, message: GameMessage) -> Result<(), String> {
        self.sender
            .send(message)
            .await
            .map_err(|_| "Game is closed".to_string())
    }

    /// Submit a guess and wait for the resulting view
    pub async fn guess(&self, event: GuessEvent) -> Result<GameView, String> {
        let (response, rx) = oneshot::channel();
        self.send(GameMessage::Guess { event, response }).await?;
        rx.await.map_err(|_| "Game is closed".to_string())
    }

    /// Current view
    pub async fn view(&self) -> Result<GameView, String> {
        let (response, rx) = oneshot::channel();
        self.send(GameMessage::GetView { response }).await?;
        rx.await.map_err(|_| "Game is closed".to_string())
    }

    /// Latest view, replaced after every state change including the end of
    /// an intermission. Readers never lag behind by more than one view.
    pub fn subscribe(&self) -> watch::Receiver<GameView> {
        self.updates.clone()
    }

    pub async fn abandon(&self) -> Result<(), String> {
        self.send(GameMessage::Abandon).await
    }
}

/// Game actor driving a single session
pub struct GameActor {
    /// Session state (reducer input and output)
    session: GameSession,

    config: GameConfig,

    /// Message inbox
    inbox: mpsc::Receiver<GameMessage>,

    rng: StdRng,

    /// Hands the final outcome to the leaderboard once
    reporter: OutcomeReporter,

    /// Result of the leaderboard hand-off, once made
    report: Option<ReportStatus>,

    /// Pending pause before the next title
    intermission: Option<Pin<Box<Sleep>>>,

    /// Events from the last state change
    last_events: Vec<GameEvent>,

    /// Latest view for subscribers
    updates: watch::Sender<GameView>,

    is_closed: bool,
}

impl GameActor {
    /// Create a new game actor
    ///
    /// # Arguments
    ///
    /// * `session` - Session in `Loading`, started when the actor runs
    /// * `config` - Game configuration
    /// * `leaderboard` - Where the final score is submitted
    ///
    /// # Returns
    ///
    /// * `(GameActor, GameHandle)` - Actor and handle for sending messages
    pub fn new(
        session: GameSession,
        config: GameConfig,
        leaderboard: Arc<LeaderboardManager>,
    ) -> (Self, GameHandle) {
        let (sender, inbox) = mpsc::channel(32);
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let (updates, updates_rx) = watch::channel(GameView::new(&session, Vec::new(), None));
        let handle = GameHandle::new(sender, updates_rx, session.id());

        let actor = Self {
            session,
            config,
            inbox,
            rng,
            reporter: OutcomeReporter::new(leaderboard),
            report: None,
            intermission: None,
            last_events: Vec::new(),
            updates,
            is_closed: false,
        };

        (actor, handle)
    }

    /// Spawn the actor on the current runtime and return its handle
    pub fn spawn(
        session: GameSession,
        config: GameConfig,
        leaderboard: Arc<LeaderboardManager>,
    ) -> GameHandle {
        let (actor, handle) = Self::new(session, config, leaderboard);
        tokio::spawn(actor.run());
        handle
    }

    /// Run the game actor event loop
    pub async fn run(mut self) {
        info!(
            "Game {} for {} starting with {} titles",
            self.session.id(),
            self.session.player(),
            self.session.pool_size()
        );

        self.session.select_target(&mut self.rng);
        self.after_transition().await;

        loop {
            tokio::select! {
                message = self.inbox.recv() => {
                    match message {
                        Some(message) => self.handle_message(message).await,
                        // Every handle dropped
                        None => self.is_closed = true,
                    }
                }

                () = wait_for(&mut self.intermission) => {
                    self.intermission = None;
                    self.next_target().await;
                }
            }

            if self.is_closed {
                break;
            }
        }

        info!(
            "Game {} closed in phase {}",
            self.session.id(),
            self.session.phase()
        );
    }

    /// Handle a game message
    async fn handle_message(&mut self, message: GameMessage) {
        match message {
            GameMessage::Guess { event, response } => {
                self.session.update(&event);
                self.after_transition().await;
                let _ = response.send(self.view());
            }

            GameMessage::GetView { response } => {
                let _ = response.send(self.view());
            }

            GameMessage::Abandon => {
                debug!("Game {} abandoned", self.session.id());
                self.intermission = None;
                self.is_closed = true;
            }
        }
    }

    async fn next_target(&mut self) {
        self.session.select_target(&mut self.rng);
        self.after_transition().await;
    }

    /// Log events, schedule the intermission, report a finished game and
    /// notify subscribers.
    async fn after_transition(&mut self) {
        let events: Vec<GameEvent> = self.session.drain_events().into_iter().collect();
        for event in &events {
            debug!("Game {}: {}", self.session.id(), event);
        }
        let changed = !events.is_empty();
        self.last_events = events;
        if !changed {
            return;
        }

        match self.session.phase() {
            Phase::Intermission if self.intermission.is_none() => {
                self.intermission = Some(Box::pin(sleep(self.config.intermission)));
            }
            Phase::Won | Phase::Lost => {
                if let Some(outcome) = self.session.outcome() {
                    let status = self.reporter.report(&outcome).await;
                    if status != ReportStatus::AlreadyReported {
                        self.report = Some(status);
                    }
                }
            }
            _ => {}
        }

        self.updates.send_replace(self.view());
    }

    fn view(&self) -> GameView {
        GameView::new(&self.session, self.last_events.clone(), self.report.as_ref())
    }

}

async fn wait_for(intermission: &mut Option<Pin<Box<Sleep>>>) {
    match intermission {
        Some(pause) => pause.as_mut().await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalog::Item,
        leaderboard::{InMemoryLeaderboard, SubmitOutcome},
    };
    use std::time::Duration;

    fn leaderboard() -> Arc<LeaderboardManager> {
        Arc::new(LeaderboardManager::new(Arc::new(InMemoryLeaderboard::new())))
    }

    fn config() -> GameConfig {
        GameConfig::default()
            .with_intermission(Duration::from_millis(10))
            .with_seed(3)
    }

    fn session(names: &[&str]) -> GameSession {
        let pool = names
            .iter()
            .zip(1..)
            .map(|(name, id)| Item::new(id, *name).with_type(1));
        GameSession::new("Tester", pool)
    }

    #[tokio::test]
    async fn test_starts_in_progress() {
        let handle = GameActor::spawn(session(&["Dark", "Coco"]), config(), leaderboard());

        let view = handle.view().await.unwrap();
        assert_eq!(view.phase, Phase::InProgress);
        assert_eq!(view.remaining_lives, 5);
        assert_eq!(view.win_threshold, 1);
        assert!(view.masked_word.is_some());
        assert_eq!(view.available_letters.len(), 26);
    }

    #[tokio::test]
    async fn test_empty_pool_wins_immediately() {
        let lb = leaderboard();
        let handle = GameActor::spawn(session(&[]), config(), lb.clone());

        let view = handle.view().await.unwrap();
        assert_eq!(view.phase, Phase::Won);
        assert_eq!(view.score, 0);
        assert!(lb.players().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_wrong_title_costs_a_life() {
        let handle = GameActor::spawn(session(&["Dark"]), config(), leaderboard());

        let view = handle
            .guess(GuessEvent::Title("Inception".to_string()))
            .await
            .unwrap();
        assert_eq!(view.remaining_lives, 4);
        assert_eq!(view.events, vec![GameEvent::TitleMiss]);
    }

    #[tokio::test]
    async fn test_intermission_then_next_title() {
        let names = ["Dark", "Naruto", "Inception", "Up"];
        let handle = GameActor::spawn(session(&names), config(), leaderboard());
        let mut updates = handle.subscribe();

        let first = handle.view().await.unwrap();
        let solved = first.masked_word.unwrap().to_string().replace(' ', "");
        let title = names
            .iter()
            .find(|n| n.chars().count() == solved.chars().count())
            .copied()
            .unwrap();

        let view = handle.guess(GuessEvent::Title(title.to_string())).await.unwrap();
        assert_eq!(view.phase, Phase::Intermission);
        assert_eq!(view.score, 1);

        // Guesses during the pause are ignored
        let view = handle.guess(GuessEvent::Letter('Q')).await.unwrap();
        assert_eq!(view.phase, Phase::Intermission);
        assert!(view.guessed_letters.iter().all(|c| *c != 'Q'));

        let next = updates
            .wait_for(|update| update.phase == Phase::InProgress)
            .await
            .unwrap()
            .clone();
        assert_eq!(next.score, 1);
        assert!(next.guessed_letters.is_empty());
    }

    #[tokio::test]
    async fn test_subscriber_survives_many_updates() {
        // Same letters in every title, so A..U solves whichever is drawn
        let names = [
            "ABCDEFGHIJKLMNOPQRSTU",
            "UTSRQPONMLKJIHGFEDCBA",
            "ABCDEFGHIJKLMNOPQRSTU 2",
        ];
        let handle = GameActor::spawn(session(&names), config(), leaderboard());
        let mut updates = handle.subscribe();

        // Misses first, then every letter of the title
        for letter in ['X', 'Y', 'Z'].into_iter().chain('A'..='U') {
            handle.guess(GuessEvent::Letter(letter)).await.unwrap();
        }
        assert_eq!(handle.view().await.unwrap().phase, Phase::Intermission);

        let next = updates
            .wait_for(|update| update.phase == Phase::InProgress)
            .await
            .unwrap()
            .clone();
        assert_eq!(next.score, 1);
        assert_eq!(next.remaining_lives, 2);
        assert!(
            next.events
                .iter()
                .any(|e| matches!(e, GameEvent::TargetSelected(_)))
        );
    }

    #[tokio::test]
    async fn test_finished_game_reported_once() {
        let lb = leaderboard();
        let handle = GameActor::spawn(session(&["Dark"]), config(), lb.clone());

        let view = handle.guess(GuessEvent::Title("dark".to_string())).await.unwrap();
        assert_eq!(view.phase, Phase::Won);
        assert!(view.notice.is_none());
        assert!(matches!(view.submitted, Some(SubmitOutcome::Created(ref e)) if e.score == 1));

        // Further guesses change nothing and report nothing
        handle.guess(GuessEvent::Title("dark".to_string())).await.unwrap();

        let players = lb.players().await.unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].name, "Tester");
        assert_eq!(players[0].score, 1);
    }

    #[tokio::test]
    async fn test_abandon_discards_session() {
        let lb = leaderboard();
        let handle = GameActor::spawn(session(&["Dark", "Coco"]), config(), lb.clone());

        handle.abandon().await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(handle.view().await.is_err());
        assert!(lb.players().await.unwrap().is_empty());
    }
}
