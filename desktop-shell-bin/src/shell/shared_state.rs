// SPDX-License-Identifier: MPL-2.0

use calloop::LoopHandle;
use desktop_shell_protocol::GrabCursor;
use sctk::{
    reexports::client::protocol::wl_pointer::WlPointer,
    seat::pointer::{PointerEvent, PointerEventKind, BTN_LEFT},
};
use tracing::{debug, error};

use super::client::{handlers::pointer::cursor_icon, state::ClientState};
use crate::{
    desktop::{Desktop, SurfaceRole},
    render::TextRenderer,
};

/// Everything the event loop callbacks get to touch
#[allow(missing_debug_implementations)]
pub struct GlobalState {
    // goes first so surfaces are destroyed while the connection is up
    pub(crate) desktop: Desktop,
    pub(crate) client_state: ClientState,
    pub(crate) text: TextRenderer,
    pub(crate) loop_handle: LoopHandle<'static, GlobalState>,
    pub(crate) exit: bool,
}

impl GlobalState {
    pub(crate) fn new(
        client_state: ClientState,
        desktop: Desktop,
        loop_handle: LoopHandle<'static, GlobalState>,
    ) -> Self {
        Self { desktop, client_state, text: TextRenderer::new(), loop_handle, exit: false }
    }

    /// Paint every surface with pending changes and push the requests out.
    pub(crate) fn redraw(&mut self) {
        let GlobalState { desktop, client_state, text, .. } = self;
        desktop.redraw(&mut client_state.pool, &client_state.compositor_state, text);
        if let Err(err) = client_state.connection.flush() {
            error!("Failed to flush the wayland connection: {}", err);
        }
    }

    pub(crate) fn set_grab_cursor(&mut self, cursor: GrabCursor) {
        self.desktop.grab_cursor = cursor;
        let grab_surface = self.desktop.grab_surface().clone();
        for i in 0..self.client_state.seats.len() {
            if self.client_state.seats[i].focus.as_ref() == Some(&grab_surface) {
                self.update_cursor(i);
            }
        }
    }

    /// Show the right cursor for whatever seat `i` is pointing at.
    fn update_cursor(&self, i: usize) {
        let seat = &self.client_state.seats[i];
        let Some(ptr) = seat.ptr.as_ref() else {
            return;
        };
        let cursor = match seat.focus.as_ref() {
            Some(focus) if focus == self.desktop.grab_surface() => self.desktop.grab_cursor,
            _ => GrabCursor::LeftPtr,
        };
        let res = match cursor_icon(cursor) {
            Some(icon) => ptr.set_cursor(&self.client_state.connection, icon),
            None => ptr.hide_cursor(),
        };
        if let Err(err) = res {
            error!("Failed to set the {:?} cursor: {}", cursor, err);
        }
    }

    pub(crate) fn pointer_frame_inner(&mut self, pointer: &WlPointer, events: &[PointerEvent]) {
        let Some(seat_index) = self
            .client_state
            .seats
            .iter()
            .position(|seat| seat.ptr.as_ref().is_some_and(|ptr| ptr.pointer() == pointer))
        else {
            debug!("pointer event for an unknown seat");
            return;
        };

        for event in events {
            let role = self.desktop.role_of(&event.surface);
            let (x, y) = event.position;
            match event.kind {
                PointerEventKind::Enter { .. } => {
                    self.client_state.seats[seat_index].focus = Some(event.surface.clone());
                    self.update_cursor(seat_index);
                    self.pointer_motion(role, x, y);
                },
                PointerEventKind::Leave { .. } => {
                    self.client_state.seats[seat_index].focus = None;
                    self.pointer_leave(role);
                },
                PointerEventKind::Motion { .. } => self.pointer_motion(role, x, y),
                PointerEventKind::Press { button, .. } => self.pointer_button(role, button, true),
                PointerEventKind::Release { button, .. } => {
                    self.pointer_button(role, button, false)
                },
                PointerEventKind::Axis { .. } => {},
            }
        }
    }

    fn pointer_motion(&mut self, role: Option<SurfaceRole>, x: f64, y: f64) {
        match role {
            Some(SurfaceRole::Panel(id)) => {
                if let Some(panel) = self.desktop.panel_mut(id) {
                    panel.pointer_motion(x, y, &self.client_state);
                }
            },
            Some(SurfaceRole::Menu(id)) => {
                if let Some(panel) = self.desktop.panel_mut(id) {
                    panel.menu_motion(x, y);
                }
            },
            Some(SurfaceRole::Lock) => self.desktop.lock_pointer_motion(x, y),
            _ => {},
        }
    }

    fn pointer_leave(&mut self, role: Option<SurfaceRole>) {
        match role {
            Some(SurfaceRole::Panel(id)) => {
                if let Some(panel) = self.desktop.panel_mut(id) {
                    panel.pointer_leave();
                }
            },
            Some(SurfaceRole::Menu(id)) => {
                if let Some(panel) = self.desktop.panel_mut(id) {
                    panel.menu_leave();
                }
            },
            Some(SurfaceRole::Lock) => self.desktop.lock_pointer_leave(),
            _ => {},
        }
    }

    fn pointer_button(&mut self, role: Option<SurfaceRole>, button: u32, pressed: bool) {
        if pressed && !matches!(role, Some(SurfaceRole::Menu(_))) {
            self.desktop.close_menus();
        }
        match role {
            Some(SurfaceRole::Panel(id)) => {
                if let Some(panel) = self.desktop.panel_mut(id) {
                    panel.pointer_button(button, pressed, &self.client_state);
                }
            },
            Some(SurfaceRole::Menu(id)) => {
                if let Some(panel) = self.desktop.panel_mut(id) {
                    panel.menu_button(pressed);
                }
            },
            Some(SurfaceRole::Lock) if button == BTN_LEFT && !pressed => {
                if self.desktop.lock_button_released() {
                    // after this event has been handled
                    self.loop_handle.insert_idle(|state| state.desktop.finish_unlock());
                }
            },
            _ => {},
        }
    }
}
