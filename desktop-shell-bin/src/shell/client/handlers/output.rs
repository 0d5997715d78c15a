// SPDX-License-Identifier: MPL-2.0

use sctk::{
    output::{OutputHandler, OutputState},
    reexports::client::{protocol::wl_output, Connection, QueueHandle},
};
use tracing::warn;

use crate::shell::shared_state::GlobalState;

impl OutputHandler for GlobalState {
    fn output_state(&mut self) -> &mut OutputState {
        &mut self.client_state.output_state
    }

    fn new_output(
        &mut self,
        _conn: &Connection,
        qh: &QueueHandle<Self>,
        output: wl_output::WlOutput,
    ) {
        let Some(info) = self.output_state().info(&output) else {
            warn!("new output without info {:?}", &output);
            return;
        };
        let GlobalState { desktop, client_state, loop_handle, .. } = self;
        desktop.add_output(output, &info, &client_state.compositor_state, qh, loop_handle);
    }

    fn update_output(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        output: wl_output::WlOutput,
    ) {
        if let Some(info) = self.output_state().info(&output) {
            self.desktop.update_output(&output, &info);
        }
    }

    fn output_destroyed(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        output: wl_output::WlOutput,
    ) {
        self.desktop.remove_output(&output);
    }
}
