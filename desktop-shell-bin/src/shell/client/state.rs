// SPDX-License-Identifier: MPL-2.0

use anyhow::{anyhow, Context};
use calloop::LoopHandle;
use desktop_shell_protocol::{DesktopShell, MAX_VERSION};
use sctk::{
    compositor::{CompositorState, Region},
    output::OutputState,
    reexports::{
        calloop_wayland_source::WaylandSource,
        client::{
            globals::registry_queue_init,
            protocol::{wl_seat::WlSeat, wl_subsurface::WlSubsurface, wl_surface::WlSurface},
            Connection, QueueHandle,
        },
    },
    registry::RegistryState,
    seat::{pointer::ThemedPointer, SeatState},
    shm::{slot::SlotPool, Shm},
    subcompositor::SubcompositorState,
};
use tracing::error;

use crate::{panel::PopupFactory, shell::shared_state::GlobalState};

/// enough for a 1080p background; the pool grows on demand
const INITIAL_POOL_SIZE: usize = 1920 * 1080 * 4;

#[derive(Debug)]
pub(crate) struct ClientSeat {
    pub(crate) seat: WlSeat,
    pub(crate) ptr: Option<ThemedPointer>,
    /// surface the pointer is over
    pub(crate) focus: Option<WlSurface>,
}

/// Connection to the compositor and the globals the shell uses
#[derive(Debug)]
pub(crate) struct ClientState {
    pub(crate) registry_state: RegistryState,
    pub(crate) seat_state: SeatState,
    pub(crate) output_state: OutputState,
    pub(crate) compositor_state: CompositorState,
    pub(crate) subcompositor_state: SubcompositorState,
    pub(crate) shm_state: Shm,
    pub(crate) pool: SlotPool,
    pub(crate) seats: Vec<ClientSeat>,

    pub(crate) connection: Connection,
    pub(crate) queue_handle: QueueHandle<GlobalState>,
}

impl ClientState {
    /// Connect, bind everything and hook the connection into the loop.
    /// Also hands back the `desktop_shell` global.
    pub(crate) fn new(
        loop_handle: LoopHandle<'static, GlobalState>,
    ) -> anyhow::Result<(Self, DesktopShell)> {
        let connection =
            Connection::connect_to_env().context("Failed to connect to the wayland display")?;
        let (globals, event_queue) =
            registry_queue_init(&connection).context("Failed to read the wayland registry")?;
        let qh = event_queue.handle();

        let compositor_state =
            CompositorState::bind(&globals, &qh).context("wl_compositor not available")?;
        let subcompositor_state =
            SubcompositorState::bind(compositor_state.wl_compositor().clone(), &globals, &qh)
                .context("wl_subcompositor not available")?;
        let shm_state = Shm::bind(&globals, &qh).context("wl_shm not available")?;
        let pool = SlotPool::new(INITIAL_POOL_SIZE, &shm_state)
            .context("Failed to create the shm pool")?;
        let shell = globals
            .bind::<DesktopShell, _, _>(&qh, 1..=MAX_VERSION, ())
            .context("compositor does not support desktop_shell")?;

        let client_state = ClientState {
            registry_state: RegistryState::new(&globals),
            seat_state: SeatState::new(&globals, &qh),
            output_state: OutputState::new(&globals, &qh),
            compositor_state,
            subcompositor_state,
            shm_state,
            pool,
            seats: Vec::new(),
            connection: connection.clone(),
            queue_handle: qh,
        };

        WaylandSource::new(connection, event_queue)
            .insert(loop_handle)
            .map_err(|err| anyhow!("Failed to insert the wayland source: {}", err.error))?;

        Ok((client_state, shell))
    }
}

impl PopupFactory for ClientState {
    fn create_popup(&self, parent: &WlSurface, accepts_input: bool) -> (WlSubsurface, WlSurface) {
        let (subsurface, surface) =
            self.subcompositor_state.create_subsurface(parent.clone(), &self.queue_handle);
        subsurface.set_desync();
        if !accepts_input {
            // empty input region
            match Region::new(&self.compositor_state) {
                Ok(region) => surface.set_input_region(Some(region.wl_region())),
                Err(err) => error!("Failed to create an input region: {:?}", err),
            }
        }
        (subsurface, surface)
    }
}
