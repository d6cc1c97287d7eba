//! Map display widget

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Widget};

use crate::stage::{Tile, TileStage};

/// Widget for rendering the materialized dungeon
///
/// The map is centered in the area; anything that does not fit is cropped
/// evenly from both sides.
pub struct MapWidget<'a> {
    stage: &'a TileStage,
    title: String,
}

impl<'a> MapWidget<'a> {
    pub fn new(stage: &'a TileStage, title: impl Into<String>) -> Self {
        Self {
            stage,
            title: title.into(),
        }
    }

    fn tile_style(tile: Tile) -> Style {
        match tile {
            Tile::Empty => Style::default(),
            Tile::Wall => Style::default().fg(Color::Gray),
            Tile::Floor('@') => Style::default().fg(Color::White).bold(),
            Tile::Floor('$') => Style::default().fg(Color::Yellow),
            Tile::Floor(_) => Style::default().fg(Color::DarkGray),
            Tile::Door => Style::default().fg(Color::Yellow),
            Tile::Hallway(_) => Style::default().fg(Color::Cyan),
        }
    }
}

impl Widget for MapWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default().borders(Borders::ALL).title(self.title);
        let inner = block.inner(area);
        block.render(area, buf);

        let Some(((lx, ly), (hx, hy))) = self.stage.bounds() else {
            return;
        };
        let width = hx - lx + 1;
        let height = hy - ly + 1;
        let view_w = inner.width as i32;
        let view_h = inner.height as i32;

        // Top-left world tile shown, and screen offset of the map
        let skip_x = ((width - view_w) / 2).max(0);
        let skip_y = ((height - view_h) / 2).max(0);
        let pad_x = ((view_w - width) / 2).max(0);
        let pad_y = ((view_h - height) / 2).max(0);

        for row in 0..height.min(view_h) {
            let y = hy - skip_y - row;
            for col in 0..width.min(view_w) {
                let x = lx + skip_x + col;
                let tile = self.stage.tile(x, y);
                if tile == Tile::Empty {
                    continue;
                }
                let pos = Position::new(inner.x + (pad_x + col) as u16, inner.y + (pad_y + row) as u16);
                if let Some(cell) = buf.cell_mut(pos) {
                    cell.set_char(tile.symbol());
                    cell.set_style(Self::tile_style(tile));
                }
            }
        }
    }
}
