//! Main TUI application state machine.
//!
//! Handles:
//! - Screen navigation
//! - Input event handling
//! - Synchronous prediction on submit

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::application::{ModelContext, PredictorService};
use crate::config::AppConfig;
use crate::domain::Assessment;

use super::ui::{
    questionnaire::{render_questionnaire, QuestionnaireFormState},
    render_disclaimer,
    result::{render_result, ResultState},
};

/// Current screen/view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Questionnaire,
    Result,
}

/// Main application state
pub struct App {
    /// Current screen
    screen: Screen,

    /// Whether the app should quit
    should_quit: bool,

    /// Predictor over the model loaded at startup
    predictor: PredictorService,

    /// Questionnaire form state
    form_state: QuestionnaireFormState,

    /// Last prediction outcome
    result_state: Option<ResultState>,
}

impl App {
    /// Create the application, loading the model artifacts from the
    /// configured directory.
    ///
    /// # Errors
    /// Returns error if the artifacts cannot be loaded or verified. The
    /// application refuses to start without a model.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let model_dir = config.model_dir.as_path();
        if !model_dir.exists() {
            return Err(anyhow!(
                "Model directory not found at {:?}. Set GENRISK_MODEL_DIR to a directory containing model.json and model_features.json.",
                model_dir
            ));
        }

        let policy = config.integrity_policy()?;
        let context = ModelContext::load(model_dir, &policy)
            .map_err(|e| anyhow!("Failed to load model from {:?}: {}", model_dir, e))?;

        Ok(Self::with_predictor(PredictorService::new(Arc::new(context))))
    }

    /// Create application with an injected predictor (Composition Root pattern).
    #[must_use]
    pub fn with_predictor(predictor: PredictorService) -> Self {
        Self {
            screen: Screen::Questionnaire,
            should_quit: false,
            predictor,
            form_state: QuestionnaireFormState::default(),
            result_state: None,
        }
    }

    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        let verification = self.predictor.context().verification();

        loop {
            terminal.draw(|f| {
                let area = f.area();
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(3)])
                    .split(area);

                match (self.screen, &self.result_state) {
                    (Screen::Result, Some(state)) => render_result(f, chunks[0], state),
                    _ => render_questionnaire(f, chunks[0], &self.form_state, verification),
                }

                render_disclaimer(f, chunks[1]);
            })?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        // Global quit handling
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Questionnaire => self.handle_form_key(key),
            Screen::Result => self.handle_result_key(key),
        }
    }

    fn handle_form_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Up | KeyCode::BackTab => self.form_state.prev_field(),
            KeyCode::Down | KeyCode::Tab => self.form_state.next_field(),
            KeyCode::Left => self.form_state.change(false),
            KeyCode::Right => self.form_state.change(true),
            KeyCode::Char(' ') => self.form_state.toggle(),
            KeyCode::Char('s') | KeyCode::Char('S') => self.form_state.load_sample_data(),
            KeyCode::Char(c) => self.form_state.input_char(c),
            KeyCode::Backspace => self.form_state.delete_char(),
            KeyCode::Enter => self.submit_form(),
            _ => {}
        }
    }

    fn handle_result_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Enter | KeyCode::Esc => {
                self.screen = Screen::Questionnaire;
            }
            KeyCode::Char('n') | KeyCode::Char('N') => {
                self.form_state.reset();
                self.result_state = None;
                self.screen = Screen::Questionnaire;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            _ => {}
        }
    }

    fn submit_form(&mut self) {
        let response = match self.form_state.to_response() {
            Ok(response) => response,
            Err(e) => {
                self.form_state.error_message = Some(e);
                return;
            }
        };

        if let Err(errors) = response.validate() {
            self.form_state.error_message = Some(errors.join(", "));
            return;
        }

        let Some(disorder) = self.form_state.disorder() else {
            self.form_state.error_message = Some("Select a disorder".to_string());
            return;
        };

        self.result_state = Some(match self.predictor.predict(&response) {
            Ok(result) => ResultState::Complete {
                assessment: Assessment::new(disorder, result),
            },
            Err(e) => {
                tracing::error!("Prediction failed: {}", e);
                ResultState::Error {
                    message: e.to_string(),
                }
            }
        });
        self.screen = Screen::Result;
    }
}
