use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use log::info;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{stderr, Stderr};
use std::time::{Duration, Instant};
use tokio::time::interval;

use super::login_form::LoginForm;
use crate::account::AccountStore;
use crate::game::GameConfig;
use crate::input::{InputContext, InputHandler, KeyAction};
use crate::render::Renderer;
use crate::session::{Screen, Session, Snapshot, Tone};

/// Interactive terminal front-end
///
/// Owns the session and feeds it the wall clock once per frame. Keys on the
/// login screen go through the [`LoginForm`] first; everything else is
/// submitted to the session directly.
pub struct HumanMode<S: AccountStore> {
    session: Session<S>,
    form: LoginForm,
    renderer: Renderer,
    input_handler: InputHandler,
    snapshot: Snapshot,
    started: Instant,
    should_quit: bool,
}

impl<S: AccountStore> HumanMode<S> {
    pub fn new(config: GameConfig, store: S) -> Self {
        let renderer = Renderer::new(config.grid());
        let mut session = Session::new(config, store);
        let snapshot = session.tick(0);

        Self {
            session,
            form: LoginForm::new(),
            renderer,
            input_handler: InputHandler::new(),
            snapshot,
            started: Instant::now(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Frames at ~60 Hz; the session decides when the snake actually moves
        let frame_interval = Duration::from_millis(16);
        let mut frame_timer = interval(frame_interval);

        self.started = Instant::now();

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                // Advance the session and draw
                _ = frame_timer.tick() => {
                    self.update(self.elapsed_ms());
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.snapshot, &self.form);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                info!("quitting");
                break;
            }
        }

        Ok(())
    }

    fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    fn update(&mut self, now: u64) {
        let previous = std::mem::replace(&mut self.snapshot, self.session.tick(now));

        match (&previous.screen, &self.snapshot.screen) {
            // A successful registration empties both fields
            (Screen::Login { feedback: before }, Screen::Login { feedback }) => {
                if feedback.tone == Tone::Success && feedback != before {
                    self.form.clear();
                }
            }
            // Fresh form whenever the login screen is entered
            (_, Screen::Login { .. }) => self.form.clear(),
            _ => {}
        }
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }
            self.handle_key(key);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let context = self.context();

        match self.input_handler.handle_key_event(key, context) {
            KeyAction::Intent(intent) => self.session.submit(intent),
            KeyAction::Edit(edit) => {
                // The leaderboard covers the form
                if self.snapshot.leaderboard.is_some() {
                    return;
                }
                if let Some(intent) = self.form.apply(edit) {
                    self.session.submit(intent);
                }
            }
            KeyAction::Quit => {
                self.should_quit = true;
            }
            KeyAction::None => {}
        }
    }

    fn context(&self) -> InputContext {
        match self.snapshot.screen {
            Screen::Intro { .. } => InputContext::Intro,
            Screen::Login { .. } => InputContext::Login,
            Screen::Playing { .. } | Screen::GameOver { .. } => InputContext::Game,
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::MemoryStore;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn press(mode: &mut HumanMode<MemoryStore>, code: KeyCode) {
        mode.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(mode: &mut HumanMode<MemoryStore>, text: &str) {
        for c in text.chars() {
            press(mode, KeyCode::Char(c));
        }
    }

    fn mode() -> HumanMode<MemoryStore> {
        let mut store = MemoryStore::new();
        store.register("alice", "secret1").unwrap();
        HumanMode::new(GameConfig::small(), store)
    }

    #[test]
    fn test_starts_on_intro() {
        let mode = mode();
        assert_eq!(mode.context(), InputContext::Intro);
    }

    #[test]
    fn test_keyboard_login_flow() {
        let mut mode = mode();

        press(&mut mode, KeyCode::Char('x'));
        mode.update(10);
        assert_eq!(mode.context(), InputContext::Login);

        type_text(&mut mode, "alice");
        press(&mut mode, KeyCode::Enter);
        type_text(&mut mode, "secret1");
        press(&mut mode, KeyCode::Enter);
        mode.update(20);

        assert_eq!(mode.context(), InputContext::Game);
        assert!(matches!(mode.snapshot.screen, Screen::Playing { .. }));

        press(&mut mode, KeyCode::Esc);
        mode.update(30);
        assert_eq!(mode.context(), InputContext::Login);
        assert_eq!(mode.form.username(), "");
    }

    #[test]
    fn test_register_clears_form() {
        let mut mode = mode();
        press(&mut mode, KeyCode::Enter);
        mode.update(10);

        type_text(&mut mode, "carol");
        press(&mut mode, KeyCode::Down);
        type_text(&mut mode, "secret3");
        press(&mut mode, KeyCode::F(2));
        mode.update(20);

        assert_eq!(mode.form.username(), "");
        assert_eq!(mode.form.masked_password(), "");

        // A rejected registration keeps the username for correction
        type_text(&mut mode, "carol");
        press(&mut mode, KeyCode::Down);
        type_text(&mut mode, "secret3");
        press(&mut mode, KeyCode::F(2));
        mode.update(30);
        assert_eq!(mode.form.username(), "carol");
    }

    #[test]
    fn test_form_ignored_under_leaderboard() {
        let mut mode = mode();
        press(&mut mode, KeyCode::Enter);
        mode.update(10);

        press(&mut mode, KeyCode::Tab);
        mode.update(20);
        assert!(mode.snapshot.leaderboard.is_some());

        type_text(&mut mode, "alice");
        assert_eq!(mode.form.username(), "");
    }

    #[test]
    fn test_quit_key() {
        let mut mode = mode();
        press(&mut mode, KeyCode::Enter);
        mode.update(10);
        type_text(&mut mode, "alice");
        press(&mut mode, KeyCode::Enter);
        type_text(&mut mode, "secret1");
        press(&mut mode, KeyCode::Enter);
        mode.update(20);

        press(&mut mode, KeyCode::Char('q'));
        assert!(mode.should_quit);
    }
}
