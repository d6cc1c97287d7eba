//! Plan listing widget

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, Widget};

use dw_core::{Generation, PlanEntry};

/// One line per plan entry, start room first
pub struct PlanWidget<'a> {
    generation: &'a Generation,
}

impl<'a> PlanWidget<'a> {
    pub fn new(generation: &'a Generation) -> Self {
        Self { generation }
    }

    pub fn lines(&self) -> Vec<String> {
        let catalog = &self.generation.catalog;
        let plan = &self.generation.plan;
        let mut lines = vec![format!("{} {}", catalog.start().name, plan.start.pos)];
        for entry in &plan.entries {
            lines.push(match entry {
                PlanEntry::Room(room) => format!("{} {}", catalog[room.blueprint].name, room.pos),
                PlanEntry::Connector(c) => {
                    format!("  {} hallway {} of {}", c.orientation, c.direction, c.door_pos)
                }
            });
        }
        lines
    }
}

impl Widget for PlanWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let items: Vec<ListItem> = self
            .lines()
            .into_iter()
            .map(|line| {
                let style = if line.starts_with(' ') {
                    Style::default().fg(Color::DarkGray)
                } else {
                    Style::default()
                };
                ListItem::new(line).style(style)
            })
            .collect();
        let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Plan"));
        Widget::render(list, area, buf);
    }
}
