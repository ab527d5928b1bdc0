use std::collections::VecDeque;

use log::{debug, info, warn};

use super::intent::{Credentials, Intent};
use super::snapshot::{Feedback, Screen, Snapshot};
use crate::account::{AccountStore, ErrorKind, Identity};
use crate::game::{EndCause, GameConfig, Round, TickOutcome};
use crate::leaderboard::{rank, LeaderboardEntry};

const LOGIN_PROMPT: &str = "Enter your username and password";

/// Which screen the application is on, with the data that screen owns
#[derive(Debug)]
pub enum SessionState {
    /// `started_at` is set by the first tick
    Intro { started_at: Option<u64> },
    Login { feedback: Feedback },
    Playing { identity: Identity, round: Round },
    GameOver {
        identity: Identity,
        final_score: u32,
        cause: EndCause,
        new_record: bool,
        notice: Option<Feedback>,
    },
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Intro { .. } => "intro",
            SessionState::Login { .. } => "login",
            SessionState::Playing { .. } => "playing",
            SessionState::GameOver { .. } => "game-over",
        }
    }
}

/// A high score the store failed to save
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingScore {
    username: String,
    score: u32,
}

/// The top-level state machine
///
/// Intents are queued with [`Session::submit`] and applied in order by the
/// next [`Session::tick`], which then advances timers and the active round
/// and returns a snapshot for rendering.
pub struct Session<S: AccountStore> {
    config: GameConfig,
    store: S,
    state: SessionState,
    intents: VecDeque<Intent>,
    leaderboard_visible: bool,
    leaderboard: Vec<LeaderboardEntry>,
    pending_scores: Vec<PendingScore>,
    seed: Option<u64>,
    rounds_started: u64,
}

impl<S: AccountStore> Session<S> {
    pub fn new(config: GameConfig, store: S) -> Self {
        Self {
            config,
            store,
            state: SessionState::Intro { started_at: None },
            intents: VecDeque::new(),
            leaderboard_visible: false,
            leaderboard: Vec::new(),
            pending_scores: Vec::new(),
            seed: None,
            rounds_started: 0,
        }
    }

    /// Make food placement reproducible across rounds
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn submit(&mut self, intent: Intent) {
        self.intents.push_back(intent);
    }

    /// Apply queued intents, advance the active screen, and describe it
    pub fn tick(&mut self, now: u64) -> Snapshot {
        while let Some(intent) = self.intents.pop_front() {
            self.handle(intent, now);
        }
        self.advance(now);
        self.snapshot(now)
    }

    /// Apply one intent immediately
    pub fn handle(&mut self, intent: Intent, now: u64) {
        debug!("intent {:?} in {}", intent, self.state.name());

        match &mut self.state {
            SessionState::Intro { .. } => self.enter_login(Feedback::info(LOGIN_PROMPT)),
            SessionState::Login { feedback } => match intent {
                Intent::ToggleLeaderboard => self.toggle_leaderboard(),
                Intent::Cancel => {
                    if self.leaderboard_visible {
                        self.leaderboard_visible = false;
                    } else {
                        *feedback = Feedback::info(LOGIN_PROMPT);
                    }
                }
                // The form is covered while the leaderboard is open
                Intent::Login(_) | Intent::Register(_) if self.leaderboard_visible => {}
                Intent::Login(credentials) => self.login(credentials, now),
                Intent::Register(credentials) => self.register(credentials),
                Intent::Logout => self.logout(),
                _ => {}
            },
            SessionState::Playing { round, .. } => match intent {
                Intent::Move(direction) => {
                    round.change_direction(direction);
                }
                Intent::ToggleLeaderboard => self.toggle_leaderboard(),
                Intent::Cancel => self.leaderboard_visible = false,
                Intent::Logout => self.logout(),
                _ => {}
            },
            SessionState::GameOver { .. } => match intent {
                Intent::Restart => self.restart(now),
                Intent::ToggleLeaderboard => self.toggle_leaderboard(),
                Intent::Cancel => self.leaderboard_visible = false,
                Intent::Logout => self.logout(),
                _ => {}
            },
        }
    }

    fn advance(&mut self, now: u64) {
        match &mut self.state {
            SessionState::Intro { started_at } => {
                let started = *started_at.get_or_insert(now);
                if now.saturating_sub(started) >= self.config.intro_duration_ms {
                    self.enter_login(Feedback::info(LOGIN_PROMPT));
                }
            }
            SessionState::Playing { round, .. } => {
                if let TickOutcome::RoundEnded { final_score, cause } = round.tick(now) {
                    self.finish_round(final_score, cause);
                }
            }
            SessionState::Login { .. } | SessionState::GameOver { .. } => {}
        }
    }

    fn enter_login(&mut self, feedback: Feedback) {
        info!("-> login");
        self.state = SessionState::Login { feedback };
    }

    fn set_login_feedback(&mut self, new_feedback: Feedback) {
        if let SessionState::Login { feedback } = &mut self.state {
            *feedback = new_feedback;
        }
    }

    fn login(&mut self, credentials: Credentials, now: u64) {
        let username = credentials.username.trim();

        // The stored high score must be current before it is read
        self.flush_pending_scores();

        match self.store.login(username, &credentials.password) {
            Ok(mut identity) => {
                if let Some(pending) = self
                    .pending_scores
                    .iter()
                    .find(|pending| pending.username == identity.username)
                {
                    identity.high_score = identity.high_score.max(pending.score);
                }
                info!(
                    "'{}' logged in (high score {})",
                    identity.username, identity.high_score
                );
                self.start_round(identity, now);
            }
            Err(err) => {
                match err.kind() {
                    ErrorKind::Persistence => warn!("login for '{}' failed: {}", username, err),
                    _ => info!("login for '{}' rejected: {}", username, err),
                }
                self.set_login_feedback(Feedback::error(capitalize(&err.to_string())));
            }
        }
    }

    fn register(&mut self, credentials: Credentials) {
        let username = credentials.username.trim();

        match self.store.register(username, &credentials.password) {
            Ok(()) => {
                info!("registered '{}'", username);
                let message = format!("Registered '{}', you can log in now", username);
                self.set_login_feedback(Feedback::success(message));
            }
            Err(err) => {
                match err.kind() {
                    ErrorKind::Persistence => {
                        warn!("registration of '{}' failed: {}", username, err)
                    }
                    _ => info!("registration of '{}' rejected: {}", username, err),
                }
                self.set_login_feedback(Feedback::error(capitalize(&err.to_string())));
            }
        }
    }

    fn start_round(&mut self, identity: Identity, now: u64) {
        self.flush_pending_scores();

        let round = match self.seed {
            Some(seed) => Round::seeded(
                self.config.clone(),
                seed.wrapping_add(self.rounds_started),
                now,
            ),
            None => Round::new(self.config.clone(), now),
        };
        self.rounds_started += 1;
        self.leaderboard_visible = false;

        info!("-> playing as '{}'", identity.username);
        self.state = SessionState::Playing { identity, round };
    }

    fn restart(&mut self, now: u64) {
        let state = std::mem::replace(&mut self.state, SessionState::Intro { started_at: None });
        match state {
            SessionState::GameOver { identity, .. } => self.start_round(identity, now),
            other => self.state = other,
        }
    }

    fn finish_round(&mut self, final_score: u32, cause: EndCause) {
        let state = std::mem::replace(&mut self.state, SessionState::Intro { started_at: None });
        let mut identity = match state {
            SessionState::Playing { identity, .. } => identity,
            other => {
                self.state = other;
                return;
            }
        };

        self.flush_pending_scores();

        let new_record = final_score > identity.high_score;
        let mut notice = None;
        if new_record {
            identity.high_score = final_score;
            if let Err(err) = self.store.update_high_score(&identity.username, final_score) {
                warn!(
                    "high score {} for '{}' not saved, will retry: {}",
                    final_score, identity.username, err
                );
                self.queue_pending_score(&identity.username, final_score);
                notice = Some(Feedback::error(format!(
                    "Could not save your high score ({}), will retry",
                    err
                )));
            }
            self.refresh_leaderboard();
        }

        info!(
            "-> game over for '{}': score {} ({:?})",
            identity.username, final_score, cause
        );
        self.state = SessionState::GameOver {
            identity,
            final_score,
            cause,
            new_record,
            notice,
        };
    }

    fn logout(&mut self) {
        if let Some(identity) = self.identity() {
            info!("'{}' logged out", identity.username);
        }
        self.flush_pending_scores();
        self.leaderboard_visible = false;
        self.enter_login(Feedback::info("Logged out, please log in again"));
    }

    fn queue_pending_score(&mut self, username: &str, score: u32) {
        match self
            .pending_scores
            .iter_mut()
            .find(|pending| pending.username == username)
        {
            Some(pending) => pending.score = pending.score.max(score),
            None => self.pending_scores.push(PendingScore {
                username: username.to_string(),
                score,
            }),
        }
    }

    /// Retry high scores that failed to save earlier
    fn flush_pending_scores(&mut self) {
        if self.pending_scores.is_empty() {
            return;
        }

        let pending = std::mem::take(&mut self.pending_scores);
        for entry in pending {
            match self.store.update_high_score(&entry.username, entry.score) {
                Ok(_) => info!(
                    "saved pending high score {} for '{}'",
                    entry.score, entry.username
                ),
                Err(err) => {
                    warn!(
                        "pending high score {} for '{}' still not saved: {}",
                        entry.score, entry.username, err
                    );
                    self.pending_scores.push(entry);
                }
            }
        }
    }

    fn toggle_leaderboard(&mut self) {
        self.leaderboard_visible = !self.leaderboard_visible;
        if self.leaderboard_visible {
            self.refresh_leaderboard();
        }
    }

    fn refresh_leaderboard(&mut self) {
        match self.store.load_all() {
            Ok(records) => self.leaderboard = rank(&records, self.config.leaderboard_size),
            Err(err) => warn!("leaderboard not refreshed: {}", err),
        }
    }

    pub fn snapshot(&self, now: u64) -> Snapshot {
        let screen = match &self.state {
            SessionState::Intro { started_at } => {
                let elapsed = started_at.map_or(0, |started| now.saturating_sub(started));
                let duration = self.config.intro_duration_ms.max(1);
                Screen::Intro {
                    progress: (elapsed as f32 / duration as f32).min(1.0),
                }
            }
            SessionState::Login { feedback } => Screen::Login {
                feedback: feedback.clone(),
            },
            SessionState::Playing { identity, round } => Screen::Playing {
                username: identity.username.clone(),
                high_score: identity.high_score,
                round: round.snapshot(),
            },
            SessionState::GameOver {
                identity,
                final_score,
                cause,
                new_record,
                notice,
            } => Screen::GameOver {
                username: identity.username.clone(),
                final_score: *final_score,
                high_score: identity.high_score,
                new_record: *new_record,
                board_full: *cause == EndCause::BoardFull,
                notice: notice.clone(),
            },
        };

        let leaderboard = match self.state {
            SessionState::Intro { .. } => None,
            _ if self.leaderboard_visible => Some(self.leaderboard.clone()),
            _ => None,
        };

        Snapshot {
            screen,
            leaderboard,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The logged-in user, if any
    pub fn identity(&self) -> Option<&Identity> {
        match &self.state {
            SessionState::Playing { identity, .. } | SessionState::GameOver { identity, .. } => {
                Some(identity)
            }
            SessionState::Intro { .. } | SessionState::Login { .. } => None,
        }
    }

    /// The active round, for setting up specific boards
    pub fn round_mut(&mut self) -> Option<&mut Round> {
        match &mut self.state {
            SessionState::Playing { round, .. } => Some(round),
            _ => None,
        }
    }

    pub fn leaderboard_visible(&self) -> bool {
        self.leaderboard_visible
    }

    pub fn leaderboard(&self) -> &[LeaderboardEntry] {
        &self.leaderboard
    }

    pub fn has_pending_scores(&self) -> bool {
        !self.pending_scores.is_empty()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
