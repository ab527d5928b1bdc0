use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Gauge, Paragraph},
    Frame,
};

use crate::game::{Grid, Position, RoundSnapshot};
use crate::leaderboard::LeaderboardEntry;
use crate::modes::login_form::{Field, LoginForm};
use crate::session::{Feedback, Screen, Snapshot, Tone};

/// Draws session snapshots. Holds nothing but the board size.
pub struct Renderer {
    grid: Grid,
}

impl Renderer {
    pub fn new(grid: Grid) -> Self {
        Self { grid }
    }

    pub fn render(&self, frame: &mut Frame, snapshot: &Snapshot, form: &LoginForm) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Main area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_header(&snapshot.screen), chunks[0]);

        match &snapshot.screen {
            Screen::Intro { progress } => self.render_intro(frame, chunks[1], *progress),
            Screen::Login { feedback } => self.render_login(frame, chunks[1], feedback, form),
            Screen::Playing { round, .. } => {
                frame.render_widget(self.render_grid(round), chunks[1]);
            }
            Screen::GameOver {
                final_score,
                high_score,
                new_record,
                board_full,
                notice,
                ..
            } => {
                let panel = self.render_game_over(
                    *final_score,
                    *high_score,
                    *new_record,
                    *board_full,
                    notice.as_ref(),
                );
                frame.render_widget(panel, centered(chunks[1], 60, 14));
            }
        }

        frame.render_widget(self.render_controls(&snapshot.screen), chunks[2]);

        if let Some(entries) = &snapshot.leaderboard {
            let area = centered(chunks[1], 44, entries.len().max(1) as u16 + 4);
            frame.render_widget(Clear, area);
            frame.render_widget(self.render_leaderboard(entries), area);
        }
    }

    fn render_header(&self, screen: &Screen) -> Paragraph<'_> {
        let line = match screen {
            Screen::Playing {
                username,
                high_score,
                round,
            } => Line::from(vec![
                Span::styled("Player: ", Style::default().fg(Color::Yellow)),
                Span::styled(username.clone(), Style::default().fg(Color::White)),
                Span::raw("    "),
                Span::styled("Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    round.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("    "),
                Span::styled("Best: ", Style::default().fg(Color::Yellow)),
                Span::styled(high_score.to_string(), Style::default().fg(Color::White)),
                Span::raw("    "),
                Span::styled("Speed: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    format!("{:.1}", round.speed),
                    Style::default().fg(Color::White),
                ),
            ]),
            Screen::GameOver { username, .. } => Line::from(vec![
                Span::styled("Player: ", Style::default().fg(Color::Yellow)),
                Span::styled(username.clone(), Style::default().fg(Color::White)),
            ]),
            Screen::Intro { .. } | Screen::Login { .. } => Line::from(Span::styled(
                "SNAKE LEDGER",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )),
        };

        Paragraph::new(vec![Line::from(""), line]).alignment(Alignment::Center)
    }

    fn render_intro(&self, frame: &mut Frame, area: Rect, progress: f32) {
        let area = centered(area, 50, 7);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Length(3)])
            .split(area);

        let title = Paragraph::new(vec![
            Line::from(Span::styled(
                "~~~~~~~~<:  SNAKE  :>",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press any key to continue",
                Style::default().fg(Color::Gray),
            )),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(title, rows[0]);

        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL))
            .gauge_style(Style::default().fg(Color::Green))
            .ratio(f64::from(progress.clamp(0.0, 1.0)));
        frame.render_widget(gauge, rows[1]);
    }

    fn render_login(&self, frame: &mut Frame, area: Rect, feedback: &Feedback, form: &LoginForm) {
        let area = centered(area, 50, 10);

        let field_style = |field: Field| {
            if form.focus() == field {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            }
        };

        let text = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("Username: ", Style::default().fg(Color::Yellow)),
                Span::styled(format!("{:<30}", form.username()), field_style(Field::Username)),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Password: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    format!("{:<30}", form.masked_password()),
                    field_style(Field::Password),
                ),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                feedback.message.clone(),
                tone_style(feedback.tone),
            )),
        ];

        let panel = Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(" Login "),
        );
        frame.render_widget(panel, area);
    }

    fn render_grid(&self, round: &RoundSnapshot) -> Paragraph<'_> {
        let head = round.body.first().copied();
        let mut lines = Vec::with_capacity(self.grid.height());

        for y in 0..self.grid.height() {
            let mut spans = Vec::with_capacity(self.grid.width());

            for x in 0..self.grid.width() {
                let pos = Position::new(x as i32, y as i32);

                let cell = if Some(pos) == head {
                    // Snake head - distinct color
                    Span::styled(
                        "■ ",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if round.body.contains(&pos) {
                    Span::styled("□ ", Style::default().fg(Color::Green))
                } else if pos == round.food {
                    Span::styled(
                        "O ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(" Snake "),
            )
            .alignment(Alignment::Center)
    }

    fn render_game_over(
        &self,
        final_score: u32,
        high_score: u32,
        new_record: bool,
        board_full: bool,
        notice: Option<&Feedback>,
    ) -> Paragraph<'_> {
        let title = if board_full { "BOARD CLEARED" } else { "GAME OVER" };
        let mut text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                title,
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    final_score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("High Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(high_score.to_string(), Style::default().fg(Color::White)),
            ]),
        ];

        if new_record {
            text.push(Line::from(Span::styled(
                "New record!",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )));
        }
        if let Some(notice) = notice {
            text.push(Line::from(Span::styled(
                notice.message.clone(),
                tone_style(notice.tone),
            )));
        }

        text.push(Line::from(""));
        text.push(Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::Gray)),
            Span::styled(
                "Space",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
            Span::styled(
                "Esc",
                Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to log out", Style::default().fg(Color::Gray)),
        ]));

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_leaderboard(&self, entries: &[LeaderboardEntry]) -> Paragraph<'_> {
        let mut text: Vec<Line> = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                Line::from(vec![
                    Span::styled(format!("{:>2}. ", i + 1), Style::default().fg(Color::Yellow)),
                    Span::styled(format!("{:<24}", entry.username), Style::default().fg(Color::White)),
                    Span::styled(
                        format!("{:>6}", entry.high_score),
                        Style::default().fg(Color::Green),
                    ),
                ])
            })
            .collect();

        if text.is_empty() {
            text.push(Line::from(Span::styled(
                "No players yet",
                Style::default().fg(Color::Gray),
            )));
        }

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::Magenta))
                .title(" Leaderboard "),
        )
    }

    fn render_controls(&self, screen: &Screen) -> Paragraph<'_> {
        let keys: &[(&str, &str)] = match screen {
            Screen::Intro { .. } => &[("any key", "continue")],
            Screen::Login { .. } => &[
                ("Enter", "log in"),
                ("F2", "register"),
                ("F3", "clear"),
                ("↑↓", "field"),
                ("Tab", "leaderboard"),
            ],
            Screen::Playing { .. } => &[
                ("↑↓←→/WASD", "move"),
                ("Tab", "leaderboard"),
                ("Esc", "log out"),
                ("Q", "quit"),
            ],
            Screen::GameOver { .. } => &[
                ("Space", "restart"),
                ("Tab", "leaderboard"),
                ("Esc", "log out"),
                ("Q", "quit"),
            ],
        };

        let mut spans = Vec::new();
        for (i, (key, action)) in keys.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" | "));
            }
            spans.push(Span::styled(*key, Style::default().fg(Color::Cyan)));
            spans.push(Span::raw(format!(" {}", action)));
        }

        Paragraph::new(vec![Line::from(""), Line::from(spans)]).alignment(Alignment::Center)
    }
}

fn tone_style(tone: Tone) -> Style {
    match tone {
        Tone::Info => Style::default().fg(Color::Gray),
        Tone::Success => Style::default().fg(Color::Green),
        Tone::Error => Style::default().fg(Color::Red),
    }
}

/// A `width` x `height` rectangle centered in `area`, clipped to it
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
