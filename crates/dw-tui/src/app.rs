//! Application state and main UI controller

use crossterm::event::Event;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use dw_core::{DungeonRng, Generation, Generator, SolveError};

use crate::input::{Command, key_to_command};
use crate::stage::{Stage, TileStage, materialize};
use crate::widgets::{MapWidget, PlanWidget, StatusWidget};

/// Application state
pub struct App {
    generator: Generator,

    /// Materialized copy of the last successful generation
    stage: TileStage,

    /// Source of fresh seeds for new dungeons
    rng: DungeonRng,

    /// Seed of the dungeon on screen
    seed: Option<u64>,

    /// Last generation attempt
    outcome: Option<Result<Generation, SolveError>>,

    show_plan: bool,

    should_quit: bool,
}

impl App {
    /// Create the app and generate the first dungeon
    pub fn new(generator: Generator, stage: TileStage, rng: DungeonRng) -> Self {
        let seed = generator.config().seed;
        let mut app = Self {
            generator,
            stage,
            rng,
            seed,
            outcome: None,
            show_plan: false,
            should_quit: false,
        };
        app.regenerate();
        app
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn outcome(&self) -> Option<&Result<Generation, SolveError>> {
        self.outcome.as_ref()
    }

    pub fn stage(&self) -> &TileStage {
        &self.stage
    }

    /// Handle input event - returns a command if one should be executed
    pub fn handle_event(&mut self, event: Event) -> Option<Command> {
        match event {
            Event::Key(key) => key_to_command(key),
            _ => None,
        }
    }

    pub fn execute(&mut self, command: Command) {
        match command {
            Command::NewDungeon => {
                self.seed = Some(self.rng.next_seed());
                self.regenerate();
            }
            Command::Regenerate => self.regenerate(),
            Command::TogglePlan => self.show_plan = !self.show_plan,
            Command::Quit => self.should_quit = true,
        }
    }

    /// Run a fresh search for the current seed
    ///
    /// On failure the previous dungeon is taken down too, so the screen
    /// never shows a layout the status line does not describe.
    pub fn regenerate(&mut self) {
        let outcome = self.generator.generate_with_seed(self.seed);
        match &outcome {
            Ok(generation) => materialize(&mut self.stage, generation),
            Err(_) => self.stage.clear(),
        }
        self.outcome = Some(outcome);
    }

    pub fn render(&self, frame: &mut Frame) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(2)])
            .split(frame.area());

        let generation = self.outcome.as_ref().and_then(|o| o.as_ref().ok());
        let map_area = match generation {
            Some(generation) if self.show_plan => {
                let cols = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Min(10), Constraint::Length(40)])
                    .split(rows[0]);
                frame.render_widget(PlanWidget::new(generation), cols[1]);
                cols[0]
            }
            _ => rows[0],
        };

        frame.render_widget(MapWidget::new(&self.stage, "doorweave"), map_area);
        frame.render_widget(StatusWidget::new(self.outcome(), self.seed), rows[1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use dw_core::{Catalog, GeneratorConfig};

    fn app(config: GeneratorConfig) -> App {
        let generator = Generator::new(Catalog::builtin().unwrap(), config);
        App::new(generator, TileStage::default(), DungeonRng::new(5))
    }

    #[test]
    fn test_starts_with_a_dungeon() {
        let app = app(GeneratorConfig::default());
        assert!(matches!(app.outcome(), Some(Ok(_))));
        assert_eq!(app.stage().room_count(), 5);
        assert_eq!(app.seed(), None);
    }

    #[test]
    fn test_new_dungeon_draws_seed() {
        let mut app = app(GeneratorConfig::default().with_max_iterations(100_000).with_max_rooms(Some(10)));
        let event = Event::Key(KeyEvent::new(KeyCode::Char('g'), KeyModifiers::NONE));
        let command = app.handle_event(event).unwrap();
        app.execute(command);

        let expected = DungeonRng::new(5).next_seed();
        assert_eq!(app.seed(), Some(expected));
        if let Some(Ok(generation)) = app.outcome() {
            assert_eq!(app.stage().room_count(), generation.plan.room_count());
        } else {
            assert_eq!(app.stage().room_count(), 0);
        }
    }

    #[test]
    fn test_failure_clears_stage() {
        let mut app = app(GeneratorConfig::default());
        assert!(app.stage().room_count() > 0);

        // A one-step budget cannot place anything
        app.generator = Generator::new(
            Catalog::builtin().unwrap(),
            GeneratorConfig::default().with_max_iterations(1),
        );
        app.execute(Command::Regenerate);

        assert!(matches!(app.outcome(), Some(Err(SolveError::BudgetExceeded { limit: 1 }))));
        assert_eq!(app.stage().room_count(), 0);
    }

    #[test]
    fn test_quit_and_toggle() {
        let mut app = app(GeneratorConfig::default());
        app.execute(Command::TogglePlan);
        assert!(app.show_plan);
        assert!(!app.should_quit());
        app.execute(Command::Quit);
        assert!(app.should_quit());
    }
}
