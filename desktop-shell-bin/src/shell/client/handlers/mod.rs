// SPDX-License-Identifier: MPL-2.0

use sctk::{
    delegate_compositor, delegate_output, delegate_registry, delegate_shm, delegate_subcompositor,
    output::OutputState,
    registry::{ProvidesRegistryState, RegistryState},
    registry_handlers,
    seat::SeatState,
    shm::{Shm, ShmHandler},
};

use crate::shell::shared_state::GlobalState;

pub(crate) mod compositor;
pub(crate) mod desktop_shell;
/// output hotplug
pub(crate) mod output;
pub(crate) mod pointer;
pub(crate) mod seat;

impl ShmHandler for GlobalState {
    fn shm_state(&mut self) -> &mut Shm {
        &mut self.client_state.shm_state
    }
}

impl ProvidesRegistryState for GlobalState {
    registry_handlers![OutputState, SeatState,];

    fn registry(&mut self) -> &mut RegistryState {
        &mut self.client_state.registry_state
    }
}

delegate_registry!(GlobalState);
delegate_compositor!(GlobalState);
delegate_subcompositor!(GlobalState);
delegate_output!(GlobalState);
delegate_shm!(GlobalState);
