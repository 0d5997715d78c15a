// SPDX-License-Identifier: MPL-2.0

use desktop_shell_protocol::{desktop_shell, DesktopShell, GrabCursor};
use sctk::reexports::client::{Connection, Dispatch, QueueHandle};
use tracing::debug;

use crate::shell::shared_state::GlobalState;

impl Dispatch<DesktopShell, ()> for GlobalState {
    fn event(
        state: &mut Self,
        _shell: &DesktopShell,
        event: desktop_shell::Event,
        _data: &(),
        _conn: &Connection,
        qh: &QueueHandle<Self>,
    ) {
        match event {
            desktop_shell::Event::Configure { edges, surface, width, height } => {
                debug!(edges, width, height, "configure");
                state.desktop.configure(&surface, width, height);
            },
            desktop_shell::Event::PrepareLockSurface => {
                state.desktop.prepare_lock_surface(&state.client_state.compositor_state, qh);
            },
            desktop_shell::Event::GrabCursor { cursor } => {
                state.set_grab_cursor(GrabCursor::from(cursor));
            },
            _ => {},
        }
    }
}
