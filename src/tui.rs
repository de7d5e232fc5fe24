//! Live mode — type, hear, commit, orbit.
//!
//! A minimal alternate-screen interface: the input line sonifies as you
//! type, Enter turns the line into an orbiting word, Backspace pops. The
//! orbit panel lists committed words and marks the ones currently sounding.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};
use ratatui::Frame;

use crate::melody::{parse, Token};
use crate::orbit::Orbit;
use crate::sched::{ToneScheduler, TYPING_DECAY_SECS, WORD_DECAY_SECS};

/// Base volume for committed words.
const VOLUME_WORD: f64 = 0.6;

/// Base volume for live typing feedback.
const VOLUME_TYPING: f64 = 0.4;

/// Fade applied to a word removed from the orbit.
const REMOVE_FADE_SECS: f64 = 0.4;

/// Live-mode application state.
pub struct LiveApp {
    scheduler: ToneScheduler,
    orbit: Orbit,
    input: String,
    should_quit: bool,
}

impl LiveApp {
    /// App backed by the default lazily-opened audio engine.
    pub fn new() -> Self {
        Self::with_scheduler(ToneScheduler::new())
    }

    /// App over a caller-supplied scheduler (tests use a silent one).
    pub fn with_scheduler(scheduler: ToneScheduler) -> Self {
        Self {
            scheduler,
            orbit: Orbit::new(),
            input: String::new(),
            should_quit: false,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn orbit(&self) -> &Orbit {
        &self.orbit
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Handle one key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('k') => self.clear_orbit(),
                KeyCode::Char('r') => self.scheduler.reset_master_volume(),
                KeyCode::Char('s') => self.scheduler.stop_all_audio(),
                KeyCode::Char('c') => self.should_quit = true,
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char(c) => self.type_char(c),
            KeyCode::Enter => self.commit_input(),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
    }

    fn type_char(&mut self, c: char) {
        self.input.push(c);
        // Preview just the newest token; digits stay silent until they land
        // on a note.
        if let Some(token @ Token::Note { .. }) = parse(&self.input).last() {
            self.scheduler
                .schedule_sequence(&[*token], None, VOLUME_TYPING, TYPING_DECAY_SECS);
        }
    }

    fn commit_input(&mut self) {
        if self.input.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.input);
        let id = self.orbit.commit(&text, Instant::now());
        self.scheduler
            .schedule_sequence(&parse(&text), Some(id), VOLUME_WORD, WORD_DECAY_SECS);
    }

    fn backspace(&mut self) {
        if self.input.pop().is_some() {
            self.scheduler.play_pop();
        } else if let Some(word) = self.orbit.remove_last() {
            self.scheduler.stop_performance(word.id, REMOVE_FADE_SECS);
            self.scheduler.play_pop();
        }
    }

    fn clear_orbit(&mut self) {
        for id in self.orbit.clear() {
            self.scheduler.stop_performance(id, REMOVE_FADE_SECS);
        }
        self.scheduler.play_pop();
    }

    /// Replay any word whose orbit has come around.
    pub fn tick(&mut self, now: Instant) {
        for (id, tokens) in self.orbit.due(now) {
            self.scheduler
                .schedule_sequence(&tokens, Some(id), VOLUME_WORD, WORD_DECAY_SECS);
        }
    }

    fn draw(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // Orbit
                Constraint::Length(3), // Input
                Constraint::Length(1), // Status
            ])
            .split(frame.area());

        let scheduler = &mut self.scheduler;
        let items: Vec<ListItem> = self
            .orbit
            .words()
            .iter()
            .map(|w| {
                let marker = if scheduler.is_performing(w.id) {
                    "●"
                } else {
                    "○"
                };
                ListItem::new(format!(" {marker} {}", w.text))
            })
            .collect();
        frame.render_widget(
            List::new(items).block(Block::default().borders(Borders::ALL).title(" orbit ")),
            chunks[0],
        );

        frame.render_widget(
            Paragraph::new(self.input.as_str())
                .block(Block::default().borders(Borders::ALL).title(" type ")),
            chunks[1],
        );

        let status = format!(
            " {} words · {} notes sounding · enter commits · backspace pops · ^k clears · esc leaves",
            self.orbit.len(),
            self.scheduler.active_note_count(),
        );
        frame.render_widget(
            Paragraph::new(status).style(
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ),
            chunks[2],
        );
    }

    /// Run the live event loop.
    pub fn run(
        &mut self,
        terminal: &mut ratatui::Terminal<impl ratatui::backend::Backend>,
    ) -> io::Result<()> {
        while !self.should_quit {
            terminal
                .draw(|frame| self.draw(frame))
                .map_err(|e| io::Error::other(e.to_string()))?;

            // Short poll keeps typing feedback immediate and replays on time.
            if event::poll(Duration::from_millis(5))? {
                if let CrosstermEvent::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }

            self.tick(Instant::now());
        }

        // Leave gently.
        self.scheduler.fade_out_master(REMOVE_FADE_SECS);
        std::thread::sleep(Duration::from_millis(450));
        Ok(())
    }
}

impl Default for LiveApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Enter the alternate screen, run live mode, restore the terminal.
pub fn run_live() -> io::Result<()> {
    let mut terminal = ratatui::init();
    let mut app = LiveApp::new();
    let result = app.run(&mut terminal);
    ratatui::restore();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sched::PerformanceId;

    fn silent_app() -> LiveApp {
        LiveApp::with_scheduler(ToneScheduler::with_factory(Box::new(|| None)))
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn typing_builds_the_input_line() {
        let mut app = silent_app();
        for c in "hum".chars() {
            app.handle_key(press(KeyCode::Char(c)));
        }
        assert_eq!(app.input(), "hum");
    }

    #[test]
    fn enter_commits_a_word() {
        let mut app = silent_app();
        for c in "hum".chars() {
            app.handle_key(press(KeyCode::Char(c)));
        }
        app.handle_key(press(KeyCode::Enter));
        assert_eq!(app.input(), "");
        assert_eq!(app.orbit().len(), 1);
        assert_eq!(app.orbit().words()[0].text, "hum");
    }

    #[test]
    fn enter_on_empty_input_commits_nothing() {
        let mut app = silent_app();
        app.handle_key(press(KeyCode::Enter));
        assert!(app.orbit().is_empty());
    }

    #[test]
    fn backspace_edits_then_pops_words() {
        let mut app = silent_app();
        app.handle_key(press(KeyCode::Char('a')));
        app.handle_key(press(KeyCode::Enter));
        app.handle_key(press(KeyCode::Char('b')));

        app.handle_key(press(KeyCode::Backspace));
        assert_eq!(app.input(), "");
        assert_eq!(app.orbit().len(), 1);

        app.handle_key(press(KeyCode::Backspace));
        assert!(app.orbit().is_empty());
    }

    #[test]
    fn ctrl_k_clears_the_orbit() {
        let mut app = silent_app();
        for word in ["one", "two"] {
            for c in word.chars() {
                app.handle_key(press(KeyCode::Char(c)));
            }
            app.handle_key(press(KeyCode::Enter));
        }
        assert_eq!(app.orbit().len(), 2);
        app.handle_key(ctrl('k'));
        assert!(app.orbit().is_empty());
    }

    #[test]
    fn escape_and_ctrl_c_quit() {
        let mut app = silent_app();
        app.handle_key(press(KeyCode::Esc));
        assert!(app.should_quit());

        let mut app = silent_app();
        app.handle_key(ctrl('c'));
        assert!(app.should_quit());
    }

    #[test]
    fn committed_ids_are_distinct() {
        let mut app = silent_app();
        for word in ["a", "b"] {
            app.handle_key(press(KeyCode::Char(word.chars().next().unwrap())));
            app.handle_key(press(KeyCode::Enter));
        }
        let ids: Vec<PerformanceId> = app.orbit().words().iter().map(|w| w.id).collect();
        assert_ne!(ids[0], ids[1]);
    }

    #[test]
    fn tick_without_due_words_is_quiet() {
        let mut app = silent_app();
        app.handle_key(press(KeyCode::Char('a')));
        app.handle_key(press(KeyCode::Enter));
        // Immediately after commit nothing is due.
        app.tick(Instant::now());
        assert_eq!(app.orbit().len(), 1);
    }
}
