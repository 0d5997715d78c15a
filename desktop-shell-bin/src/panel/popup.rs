// SPDX-License-Identifier: MPL-2.0

use sctk::reexports::client::protocol::{wl_subsurface::WlSubsurface, wl_surface::WlSurface};

use crate::surface::ShellSurface;

/// Source of child surfaces for the panel's menu and tooltips.
pub(crate) trait PopupFactory {
    /// a desynchronized sub-surface of `parent`; without `accepts_input`
    /// the pointer passes through it
    fn create_popup(&self, parent: &WlSurface, accepts_input: bool) -> (WlSubsurface, WlSurface);
}

/// A sub-surface placed relative to the panel
#[derive(Debug)]
pub(crate) struct Popup {
    subsurface: WlSubsurface,
    pub(crate) surface: ShellSurface,
}

impl Popup {
    pub(crate) fn new(
        factory: &impl PopupFactory,
        parent: &ShellSurface,
        x: i32,
        y: i32,
        accepts_input: bool,
    ) -> Self {
        let (subsurface, wl_surface) = factory.create_popup(parent.wl_surface(), accepts_input);
        // applied with the next commit of the panel
        subsurface.set_position(x, y);
        let mut surface = ShellSurface::new(wl_surface);
        surface.set_scale(parent.scale());
        Self { subsurface, surface }
    }
}

impl Drop for Popup {
    fn drop(&mut self) {
        self.subsurface.destroy();
    }
}
