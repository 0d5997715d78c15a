// SPDX-License-Identifier: MPL-2.0

use sctk::shm::slot::SlotPool;
use tiny_skia::Color;
use tracing::{error, info};

use super::popup::{Popup, PopupFactory};
use crate::{
    render::{Rect, TextRenderer},
    surface::ShellSurface,
};

/// what the panel's context menu offers
pub(crate) static ENTRIES: [&str; 4] = ["Roy", "Pris", "Leon", "Zhora"];

const TEXT_SIZE: f32 = 12.0;
const PADDING: i32 = 8;
const MARGIN: i32 = 4;
const ENTRY_HEIGHT: i32 = 20;
const MIN_WIDTH: u32 = 80;

/// Index of the entry under `y`, if any.
pub(crate) fn entry_at(y: f64, count: usize) -> Option<usize> {
    if y < MARGIN as f64 {
        return None;
    }
    let index = ((y - MARGIN as f64) / ENTRY_HEIGHT as f64) as usize;
    (index < count).then_some(index)
}

pub(crate) fn menu_height(count: usize) -> u32 {
    (2 * MARGIN + count as i32 * ENTRY_HEIGHT) as u32
}

/// Right-click menu of the panel
#[derive(Debug)]
pub(crate) struct Menu {
    popup: Popup,
    entries: &'static [&'static str],
    hovered: Option<usize>,
    sized: bool,
}

impl Menu {
    pub(crate) fn new(factory: &impl PopupFactory, parent: &ShellSurface, x: i32, y: i32) -> Self {
        let popup = Popup::new(factory, parent, x, y, true);
        Self { popup, entries: &ENTRIES, hovered: None, sized: false }
    }

    pub(crate) fn wl_surface(&self) -> &sctk::reexports::client::protocol::wl_surface::WlSurface {
        self.popup.surface.wl_surface()
    }

    pub(crate) fn surface_mut(&mut self) -> &mut ShellSurface {
        &mut self.popup.surface
    }

    pub(crate) fn motion(&mut self, _x: f64, y: f64) {
        let hovered = entry_at(y, self.entries.len());
        if hovered != self.hovered {
            self.hovered = hovered;
            self.popup.surface.schedule_redraw();
        }
    }

    pub(crate) fn leave(&mut self) {
        if self.hovered.take().is_some() {
            self.popup.surface.schedule_redraw();
        }
    }

    /// A release over an entry picks it; returns whether the menu is done.
    pub(crate) fn button(&mut self, pressed: bool) -> bool {
        if pressed {
            return false;
        }
        match self.hovered {
            Some(index) => {
                info!("Selected index {} from a panel menu.", index);
                true
            },
            None => false,
        }
    }

    pub(crate) fn redraw(&mut self, pool: &mut SlotPool, text: &mut TextRenderer) {
        if !self.sized {
            let widest = self
                .entries
                .iter()
                .map(|entry| text.measure(entry, TEXT_SIZE).ceil() as u32)
                .max()
                .unwrap_or_default();
            let width = (widest + 2 * PADDING as u32).max(MIN_WIDTH);
            self.popup.surface.resize(width, menu_height(self.entries.len()));
            self.sized = true;
        }
        let surface = &mut self.popup.surface;
        if !surface.needs_redraw() {
            return;
        }
        let Some(mut canvas) = surface.canvas() else {
            return;
        };
        let width = surface.width as i32;
        canvas.fill_rect(
            Rect::new(0, 0, width, surface.height as i32),
            Color::from_rgba(0.1, 0.1, 0.1, 0.9).unwrap_or(Color::BLACK),
        );
        for (i, entry) in self.entries.iter().enumerate() {
            let top = MARGIN + i as i32 * ENTRY_HEIGHT;
            if self.hovered == Some(i) {
                canvas.fill_rect(
                    Rect::new(0, top, width, ENTRY_HEIGHT),
                    Color::from_rgba(0.3, 0.3, 0.3, 0.95).unwrap_or(Color::BLACK),
                );
            }
            text.draw(&mut canvas, entry, TEXT_SIZE, PADDING as f64, (top + 15) as f64, Color::WHITE);
        }
        if let Err(err) = surface.present(pool, canvas) {
            error!("menu: {:#}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_stack_below_the_margin() {
        assert_eq!(entry_at(0.0, ENTRIES.len()), None);
        assert_eq!(entry_at(4.0, ENTRIES.len()), Some(0));
        assert_eq!(entry_at(23.9, ENTRIES.len()), Some(0));
        assert_eq!(entry_at(24.0, ENTRIES.len()), Some(1));
        assert_eq!(entry_at(83.0, ENTRIES.len()), Some(3));
        assert_eq!(entry_at(84.0, ENTRIES.len()), None);
        assert_eq!(menu_height(ENTRIES.len()), 88);
    }
}
