// SPDX-License-Identifier: MPL-2.0

use sctk::{
    delegate_seat,
    reexports::client::{protocol::wl_seat, Connection, QueueHandle},
    seat::{pointer::ThemeSpec, Capability, SeatHandler, SeatState},
};
use tracing::error;

use crate::shell::{client::state::ClientSeat, shared_state::GlobalState};

impl SeatHandler for GlobalState {
    fn seat_state(&mut self) -> &mut SeatState {
        &mut self.client_state.seat_state
    }

    fn new_seat(&mut self, _conn: &Connection, _qh: &QueueHandle<Self>, seat: wl_seat::WlSeat) {
        if !self.client_state.seats.iter().any(|s| s.seat == seat) {
            self.client_state.seats.push(ClientSeat { seat, ptr: None, focus: None });
        }
    }

    fn new_capability(
        &mut self,
        _conn: &Connection,
        qh: &QueueHandle<Self>,
        seat: wl_seat::WlSeat,
        capability: Capability,
    ) {
        if capability != Capability::Pointer {
            return;
        }
        let client_state = &mut self.client_state;
        let Some(i) = client_state.seats.iter().position(|s| s.seat == seat) else {
            return;
        };
        match client_state.seat_state.get_pointer_with_theme(
            qh,
            &seat,
            client_state.shm_state.wl_shm(),
            client_state.compositor_state.create_surface(qh),
            ThemeSpec::System,
        ) {
            Ok(ptr) => {
                client_state.seats[i].ptr.replace(ptr);
            },
            Err(err) => error!("Failed to get a pointer: {}", err),
        }
    }

    fn remove_capability(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        seat: wl_seat::WlSeat,
        capability: Capability,
    ) {
        if capability != Capability::Pointer {
            return;
        }
        if let Some(s) = self.client_state.seats.iter_mut().find(|s| s.seat == seat) {
            s.ptr = None;
            s.focus = None;
        }
    }

    fn remove_seat(&mut self, _conn: &Connection, _qh: &QueueHandle<Self>, seat: wl_seat::WlSeat) {
        self.client_state.seats.retain(|s| s.seat != seat);
    }
}

delegate_seat!(GlobalState);
