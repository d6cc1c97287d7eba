//! Status line widget

use ratatui::prelude::*;
use ratatui::widgets::Widget;

use dw_core::{Generation, LayoutPlan, SolveError};

/// Summary of the last generation plus key help
pub struct StatusWidget<'a> {
    outcome: Option<&'a Result<Generation, SolveError>>,
    seed: Option<u64>,
}

impl<'a> StatusWidget<'a> {
    pub fn new(outcome: Option<&'a Result<Generation, SolveError>>, seed: Option<u64>) -> Self {
        Self { outcome, seed }
    }

    /// First status line
    pub fn summary(&self) -> (String, Color) {
        let seed = match self.seed {
            Some(seed) => format!("seed {seed}"),
            None => "catalog order".to_string(),
        };
        match self.outcome {
            None => (format!("{seed}: not generated"), Color::Gray),
            Some(Ok(generation)) => (
                format!("{seed}: {}", describe(&generation.plan)),
                Color::Green,
            ),
            Some(Err(err @ SolveError::BudgetExceeded { .. })) => {
                (format!("{seed}: {err}, try another seed"), Color::Yellow)
            }
            Some(Err(err)) => (format!("{seed}: {err}"), Color::Red),
        }
    }
}

/// Room count, footprint in grid cells and search effort of a plan
pub fn describe(plan: &LayoutPlan) -> String {
    let (lo, hi) = plan.bounds();
    format!(
        "{} rooms over {}x{} cells, {} iterations",
        plan.room_count(),
        hi.x - lo.x + 1,
        hi.y - lo.y + 1,
        plan.iterations
    )
}

impl Widget for StatusWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (line1, color) = self.summary();
        let line2 = "g: new dungeon  r: regenerate  p: plan  q: quit";

        buf.set_string(area.x, area.y, &line1, Style::default().fg(color));
        if area.height > 1 {
            buf.set_string(area.x, area.y + 1, line2, Style::default().fg(Color::DarkGray));
        }
    }
}
