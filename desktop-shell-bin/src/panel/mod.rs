// SPDX-License-Identifier: MPL-2.0

//! The bar along the top of each output: launchers on the left, a clock
//! on the right, plus the tooltip and context menu it pops up.

mod clock;
mod launcher;
mod menu;
mod popup;
mod tooltip;

pub(crate) use clock::Clock;
pub(crate) use launcher::Launcher;
pub(crate) use popup::PopupFactory;

use desktop_shell_config::Argb;
use sctk::{
    reexports::client::protocol::{wl_output, wl_surface::WlSurface},
    seat::pointer::BTN_RIGHT,
    shm::slot::SlotPool,
};
use tracing::error;

use self::{menu::Menu, tooltip::Tooltip};
use crate::{
    desktop::Painted,
    render::{color, Canvas, Rect, TextRenderer},
    surface::ShellSurface,
};

pub(crate) const PANEL_HEIGHT: u32 = 32;

/// Something placed on the panel that draws itself and reacts to the
/// pointer while it is inside its allocation.
pub(crate) trait PanelWidget {
    fn allocation(&self) -> Rect;

    fn draw(&self, canvas: &mut Canvas, text: &mut TextRenderer);

    fn enter(&mut self, _x: f64, _y: f64) {}

    fn leave(&mut self) {}

    fn motion(&mut self, _x: f64, _y: f64) {}

    fn button(&mut self, _button: u32, _pressed: bool) {}

    /// text for a tooltip while hovered
    fn tooltip(&self) -> Option<&str> {
        None
    }
}

/// Launcher allocations for icons of the given sizes, left to right.
pub(crate) fn launcher_allocations(sizes: impl IntoIterator<Item = (u32, u32)>) -> Vec<Rect> {
    let mut x = 10;
    sizes
        .into_iter()
        .map(|(w, h)| {
            let (w, h) = (w as i32, h as i32);
            let allocation = Rect::new(x, 16 - h / 2, w + 1, h + 1);
            x += w + 10;
            allocation
        })
        .collect()
}

/// Clock slot at the right end; empty until the panel has a width.
pub(crate) fn clock_allocation(panel_width: u32) -> Rect {
    if panel_width == 0 {
        return Rect::default();
    }
    Rect::new(panel_width as i32 - 170 - 8, 16 - 10, 171, 21)
}

/// first allocation containing the point
pub(crate) fn widget_at(
    allocations: impl IntoIterator<Item = Rect>,
    x: f64,
    y: f64,
) -> Option<usize> {
    allocations.into_iter().position(|allocation| allocation.contains(x, y))
}

#[derive(Debug)]
pub(crate) struct Panel {
    // popups are sub-surfaces of `surface` and go first
    menu: Option<Menu>,
    tooltip: Option<Tooltip>,
    pub(crate) surface: ShellSurface,
    color: Argb,
    launchers: Vec<Launcher>,
    clock: Option<Clock>,
    focus: Option<usize>,
    pointer: (f64, f64),
    painted: bool,
}

impl Panel {
    pub(crate) fn new(surface: ShellSurface, color: Argb, mut launchers: Vec<Launcher>) -> Self {
        let allocations = launcher_allocations(launchers.iter().map(Launcher::size));
        for (launcher, allocation) in launchers.iter_mut().zip(allocations) {
            launcher.set_allocation(allocation);
        }
        Self {
            menu: None,
            tooltip: None,
            surface,
            color,
            launchers,
            clock: None,
            focus: None,
            pointer: (0.0, 0.0),
            painted: false,
        }
    }

    pub(crate) fn set_clock(&mut self, mut clock: Clock) {
        clock.set_allocation(clock_allocation(self.surface.width));
        self.clock = Some(clock);
    }

    /// The panel is always [`PANEL_HEIGHT`] tall, only the width is taken.
    pub(crate) fn configure(&mut self, width: i32) {
        let width = width.max(0) as u32;
        self.surface.resize(width, PANEL_HEIGHT);
        if let Some(clock) = self.clock.as_mut() {
            clock.set_allocation(clock_allocation(width));
        }
    }

    /// follow the output, popups included
    pub(crate) fn set_output_state(&mut self, scale: i32, transform: wl_output::Transform) {
        self.surface.set_scale(scale);
        self.surface.set_transform(transform);
        if let Some(menu) = self.menu.as_mut() {
            menu.surface_mut().set_scale(scale);
            menu.surface_mut().set_transform(transform);
        }
        if let Some(tooltip) = self.tooltip.as_mut() {
            tooltip.surface_mut().set_scale(scale);
            tooltip.surface_mut().set_transform(transform);
        }
    }

    fn widgets(&self) -> impl Iterator<Item = &dyn PanelWidget> {
        self.launchers
            .iter()
            .map(|l| l as &dyn PanelWidget)
            .chain(self.clock.iter().map(|c| c as &dyn PanelWidget))
    }

    fn widget_mut(&mut self, index: usize) -> Option<&mut dyn PanelWidget> {
        let launchers = self.launchers.len();
        if index < launchers {
            Some(&mut self.launchers[index] as &mut dyn PanelWidget)
        } else if index == launchers {
            self.clock.as_mut().map(|c| c as &mut dyn PanelWidget)
        } else {
            None
        }
    }

    pub(crate) fn menu_surface(&self) -> Option<&WlSurface> {
        self.menu.as_ref().map(Menu::wl_surface)
    }

    pub(crate) fn popup_surface_mut(&mut self, surface: &WlSurface) -> Option<&mut ShellSurface> {
        if let Some(menu) = self.menu.as_mut().filter(|m| m.wl_surface() == surface) {
            return Some(menu.surface_mut());
        }
        self.tooltip
            .as_mut()
            .map(Tooltip::surface_mut)
            .filter(|tooltip| tooltip.wl_surface() == surface)
    }

    pub(crate) fn pointer_motion(&mut self, x: f64, y: f64, factory: &impl PopupFactory) {
        self.pointer = (x, y);
        let focus = widget_at(self.widgets().map(|w| w.allocation()), x, y);
        if focus == self.focus {
            if let Some(widget) = focus.and_then(|i| self.widget_mut(i)) {
                widget.motion(x, y);
            }
            return;
        }

        if let Some(widget) = self.focus.and_then(|i| self.widget_mut(i)) {
            widget.leave();
        }
        self.tooltip = None;
        self.focus = focus;
        let text = focus.and_then(|i| self.widget_mut(i)).and_then(|widget| {
            widget.enter(x, y);
            widget.tooltip().map(str::to_owned)
        });
        if let Some(text) = text {
            self.tooltip = Some(Tooltip::new(factory, &self.surface, text, x, y));
        }
        self.surface.schedule_redraw();
    }

    pub(crate) fn pointer_leave(&mut self) {
        if let Some(widget) = self.focus.take().and_then(|i| self.widget_mut(i)) {
            widget.leave();
        }
        self.tooltip = None;
        self.surface.schedule_redraw();
    }

    pub(crate) fn pointer_button(&mut self, button: u32, pressed: bool, factory: &impl PopupFactory) {
        if pressed {
            self.close_menu();
        }
        if let Some(widget) = self.focus.and_then(|i| self.widget_mut(i)) {
            widget.button(button, pressed);
            self.surface.schedule_redraw();
        }
        let on_launcher = self.focus.is_some_and(|i| i < self.launchers.len());
        if button == BTN_RIGHT && pressed && !on_launcher {
            self.show_menu(factory);
        }
    }

    fn show_menu(&mut self, factory: &impl PopupFactory) {
        let (x, y) = self.pointer;
        self.tooltip = None;
        self.menu = Some(Menu::new(factory, &self.surface, x as i32 - 10, y as i32 - 10));
        // the sub-surface position lands with the next panel commit
        self.surface.schedule_redraw();
    }

    pub(crate) fn close_menu(&mut self) {
        if self.menu.take().is_some() {
            self.surface.schedule_redraw();
        }
    }

    pub(crate) fn menu_motion(&mut self, x: f64, y: f64) {
        if let Some(menu) = self.menu.as_mut() {
            menu.motion(x, y);
        }
    }

    pub(crate) fn menu_leave(&mut self) {
        if let Some(menu) = self.menu.as_mut() {
            menu.leave();
        }
    }

    pub(crate) fn menu_button(&mut self, pressed: bool) {
        if self.menu.as_mut().is_some_and(|menu| menu.button(pressed)) {
            self.close_menu();
        }
    }

    pub(crate) fn redraw(&mut self, pool: &mut SlotPool, text: &mut TextRenderer) {
        if let Some(menu) = self.menu.as_mut() {
            menu.redraw(pool, text);
        }
        if let Some(tooltip) = self.tooltip.as_mut() {
            tooltip.redraw(pool, text);
        }
        if !self.surface.needs_redraw() {
            return;
        }
        let Some(mut canvas) = self.surface.canvas() else {
            return;
        };
        let allocation = Rect::new(0, 0, self.surface.width as i32, self.surface.height as i32);
        canvas.fill_rect(allocation, color(self.color));
        for widget in self.widgets() {
            widget.draw(&mut canvas, text);
        }
        if let Err(err) = self.surface.present(pool, canvas) {
            error!("panel: {:#}", err);
            return;
        }
        self.painted = true;
    }
}

impl Painted for Panel {
    fn painted(&self) -> bool {
        self.painted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn launchers_line_up_from_the_left() {
        let allocations = launcher_allocations([(20, 20), (32, 24), (16, 16)]);
        assert_eq!(
            allocations,
            [Rect::new(10, 6, 21, 21), Rect::new(40, 4, 33, 25), Rect::new(82, 8, 17, 17)]
        );
        assert!(launcher_allocations([]).is_empty());
    }

    #[test]
    fn clock_hugs_the_right_edge() {
        assert_eq!(clock_allocation(1920), Rect::new(1742, 6, 171, 21));
        assert_eq!(clock_allocation(0), Rect::default());
        assert_eq!(clock_allocation(0).width, 0);
    }

    #[test]
    fn hit_testing_picks_the_widget_under_the_pointer() {
        let mut allocations = launcher_allocations([(20, 20), (20, 20)]);
        allocations.push(clock_allocation(1024));
        assert_eq!(widget_at(allocations.iter().copied(), 10.0, 6.0), Some(0));
        assert_eq!(widget_at(allocations.iter().copied(), 35.0, 16.0), None);
        assert_eq!(widget_at(allocations.iter().copied(), 40.0, 16.0), Some(1));
        assert_eq!(widget_at(allocations.iter().copied(), 900.0, 16.0), Some(2));
        assert_eq!(widget_at(allocations.iter().copied(), 900.0, 30.0), None);
    }
}
