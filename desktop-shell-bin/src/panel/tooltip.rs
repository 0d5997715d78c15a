// SPDX-License-Identifier: MPL-2.0

use sctk::shm::slot::SlotPool;
use tiny_skia::Color;
use tracing::error;

use super::popup::{Popup, PopupFactory};
use crate::{
    render::{Rect, TextRenderer},
    surface::ShellSurface,
};

const TEXT_SIZE: f32 = 12.0;
const PADDING: u32 = 6;
const HEIGHT: u32 = 24;
/// placement relative to the pointer
pub(crate) const OFFSET: (i32, i32) = (10, 20);

/// Label shown next to a hovered launcher
#[derive(Debug)]
pub(crate) struct Tooltip {
    popup: Popup,
    text: String,
    sized: bool,
}

impl Tooltip {
    pub(crate) fn new(
        factory: &impl PopupFactory,
        parent: &ShellSurface,
        text: String,
        x: f64,
        y: f64,
    ) -> Self {
        let popup = Popup::new(factory, parent, x as i32 + OFFSET.0, y as i32 + OFFSET.1, false);
        Self { popup, text, sized: false }
    }

    pub(crate) fn surface_mut(&mut self) -> &mut ShellSurface {
        &mut self.popup.surface
    }

    pub(crate) fn redraw(&mut self, pool: &mut SlotPool, text: &mut TextRenderer) {
        if !self.sized {
            let width = text.measure(&self.text, TEXT_SIZE).ceil() as u32 + 2 * PADDING;
            self.popup.surface.resize(width, HEIGHT);
            self.sized = true;
        }
        let surface = &mut self.popup.surface;
        if !surface.needs_redraw() {
            return;
        }
        let Some(mut canvas) = surface.canvas() else {
            return;
        };
        canvas.fill_rect(
            Rect::new(0, 0, surface.width as i32, surface.height as i32),
            Color::from_rgba(0.0, 0.0, 0.0, 0.8).unwrap_or(Color::BLACK),
        );
        text.draw(&mut canvas, &self.text, TEXT_SIZE, PADDING as f64, 16.0, Color::WHITE);
        if let Err(err) = surface.present(pool, canvas) {
            error!("tooltip: {:#}", err);
        }
    }
}
