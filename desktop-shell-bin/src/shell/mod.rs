// SPDX-License-Identifier: MPL-2.0

//! Wayland plumbing: the connection, the globals and the event loop that
//! drives the desktop.

use anyhow::{Context, Result};
use calloop::EventLoop;
use desktop_shell_config::DesktopShellConfig;
use tracing::{error, info};

use crate::{assets::Assets, desktop::Desktop, process};
use client::state::ClientState;
use shared_state::GlobalState;

pub(crate) mod client;
pub(crate) mod shared_state;

/// Run the shell until the compositor goes away or we get told to stop.
pub(crate) fn run(config: DesktopShellConfig) -> Result<()> {
    let mut event_loop: EventLoop<'static, GlobalState> =
        EventLoop::try_new().context("Failed to create the event loop")?;
    let loop_handle = event_loop.handle();

    let (client_state, shell) = ClientState::new(loop_handle.clone())?;
    let grab_surface = client_state.compositor_state.create_surface(&client_state.queue_handle);
    let assets = Assets::load(&config);
    let desktop = Desktop::new(shell, grab_surface, config, assets);
    let mut global_state = GlobalState::new(client_state, desktop, loop_handle.clone());

    process::insert_child_reaper(&loop_handle)?;
    process::insert_shutdown_handler(&loop_handle)?;

    while !global_state.exit {
        event_loop.dispatch(None, &mut global_state).context("Failed to dispatch events")?;
        global_state.redraw();
    }

    info!("tearing down");
    let GlobalState { desktop, client_state, .. } = global_state;
    drop(desktop);
    if let Err(err) = client_state.connection.flush() {
        error!("Failed to flush the wayland connection: {}", err);
    }
    Ok(())
}
