// SPDX-License-Identifier: MPL-2.0

//! Process-wide shell state: the outputs with their background and panel,
//! the grab surface, and the lock dialog.

mod ready;

pub(crate) use ready::{all_painted, Painted, ReadyLatch};

use calloop::LoopHandle;
use desktop_shell_config::DesktopShellConfig;
use desktop_shell_protocol::{DesktopShell, GrabCursor, DESKTOP_READY_SINCE};
use sctk::{
    compositor::CompositorState,
    output::OutputInfo,
    reexports::client::{
        protocol::{wl_output::WlOutput, wl_surface::WlSurface},
        Proxy, QueueHandle,
    },
    shm::slot::SlotPool,
};
use tracing::{error, info};

use crate::{
    assets::Assets,
    background::Background,
    panel::{Clock, Launcher, Panel},
    render::TextRenderer,
    shell::shared_state::GlobalState,
    surface::ShellSurface,
    unlock::{lock_action, LockAction, Unlocker, DIALOG_HEIGHT, DIALOG_WIDTH},
};

/// Stable handle of a tracked output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct OutputId(u64);

#[derive(Debug)]
pub(crate) struct Output {
    pub(crate) id: OutputId,
    pub(crate) wl_output: WlOutput,
    pub(crate) background: Option<Background>,
    pub(crate) panel: Option<Panel>,
}

/// What one of our surfaces is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SurfaceRole {
    Background(OutputId),
    Panel(OutputId),
    Menu(OutputId),
    Lock,
    Grab,
}

#[derive(Debug)]
pub(crate) struct Desktop {
    shell: DesktopShell,
    outputs: Vec<Output>,
    next_id: u64,
    grab_surface: WlSurface,
    pub(crate) grab_cursor: GrabCursor,
    unlocker: Option<Unlocker<ShellSurface>>,
    ready: ReadyLatch,
    config: DesktopShellConfig,
    assets: Assets,
}

impl Desktop {
    pub(crate) fn new(
        shell: DesktopShell,
        grab_surface: WlSurface,
        config: DesktopShellConfig,
        assets: Assets,
    ) -> Self {
        shell.set_grab_surface(&grab_surface);
        Self {
            shell,
            outputs: Vec::new(),
            next_id: 0,
            grab_surface,
            grab_cursor: GrabCursor::default(),
            unlocker: config.shell.locking.then(Unlocker::default),
            ready: ReadyLatch::default(),
            config,
            assets,
        }
    }

    pub(crate) fn grab_surface(&self) -> &WlSurface {
        &self.grab_surface
    }

    /// Put a background and a panel on a newly announced output.
    pub(crate) fn add_output(
        &mut self,
        wl_output: WlOutput,
        info: &OutputInfo,
        compositor: &CompositorState,
        qh: &QueueHandle<GlobalState>,
        loop_handle: &LoopHandle<'static, GlobalState>,
    ) -> OutputId {
        let id = OutputId(self.next_id);
        self.next_id += 1;

        let mut background = Background::new(
            ShellSurface::new(compositor.create_surface(qh)),
            &self.config.background,
            self.assets.background.clone(),
        );
        self.shell.set_background(&wl_output, background.surface.wl_surface());
        background.surface.set_scale(info.scale_factor);
        background.surface.set_transform(info.transform);

        let launchers = self
            .config
            .panel
            .launchers
            .iter()
            .zip(&self.assets.icons)
            .map(|(launcher, icon)| Launcher::new(icon.clone(), launcher))
            .collect();
        let mut panel = Panel::new(
            ShellSurface::new(compositor.create_surface(qh)),
            self.config.panel.color,
            launchers,
        );
        self.shell.set_panel(&wl_output, panel.surface.wl_surface());
        panel.set_output_state(info.scale_factor, info.transform);
        match Clock::new(loop_handle, id) {
            Ok(clock) => panel.set_clock(clock),
            Err(err) => error!("{:#}, the panel goes without a clock", err),
        }

        info!(?id, name = ?info.name, "new output");
        self.outputs.push(Output {
            id,
            wl_output,
            background: Some(background),
            panel: Some(panel),
        });
        id
    }

    pub(crate) fn update_output(&mut self, wl_output: &WlOutput, info: &OutputInfo) {
        let Some(output) = self.outputs.iter_mut().find(|o| &o.wl_output == wl_output) else {
            return;
        };
        if let Some(background) = output.background.as_mut() {
            background.surface.set_scale(info.scale_factor);
            background.surface.set_transform(info.transform);
        }
        if let Some(panel) = output.panel.as_mut() {
            panel.set_output_state(info.scale_factor, info.transform);
        }
    }

    pub(crate) fn remove_output(&mut self, wl_output: &WlOutput) {
        if let Some(i) = self.outputs.iter().position(|o| &o.wl_output == wl_output) {
            let output = self.outputs.remove(i);
            info!(id = ?output.id, "output removed");
        }
    }

    pub(crate) fn panel_mut(&mut self, id: OutputId) -> Option<&mut Panel> {
        self.outputs.iter_mut().find(|o| o.id == id).and_then(|o| o.panel.as_mut())
    }

    pub(crate) fn role_of(&self, surface: &WlSurface) -> Option<SurfaceRole> {
        for output in &self.outputs {
            if output.background.as_ref().is_some_and(|b| b.surface.wl_surface() == surface) {
                return Some(SurfaceRole::Background(output.id));
            }
            if let Some(panel) = output.panel.as_ref() {
                if panel.surface.wl_surface() == surface {
                    return Some(SurfaceRole::Panel(output.id));
                }
                if panel.menu_surface() == Some(surface) {
                    return Some(SurfaceRole::Menu(output.id));
                }
            }
        }
        if self.lock_surface() == Some(surface) {
            return Some(SurfaceRole::Lock);
        }
        (&self.grab_surface == surface).then_some(SurfaceRole::Grab)
    }

    /// Any surface we draw, popups and the lock dialog included.
    pub(crate) fn shell_surface_mut(&mut self, surface: &WlSurface) -> Option<&mut ShellSurface> {
        for output in &mut self.outputs {
            if let Some(background) = output.background.as_mut() {
                if background.surface.wl_surface() == surface {
                    return Some(&mut background.surface);
                }
            }
            if let Some(panel) = output.panel.as_mut() {
                if panel.surface.wl_surface() == surface {
                    return Some(&mut panel.surface);
                }
                if let Some(popup) = panel.popup_surface_mut(surface) {
                    return Some(popup);
                }
            }
        }
        self.unlocker
            .as_mut()
            .and_then(Unlocker::dialog_mut)
            .map(|dialog| &mut dialog.surface)
            .filter(|lock| lock.wl_surface() == surface)
    }

    /// `configure` from the compositor for a background or panel
    pub(crate) fn configure(&mut self, surface: &WlSurface, width: i32, height: i32) {
        for output in &mut self.outputs {
            if let Some(background) =
                output.background.as_mut().filter(|b| b.surface.wl_surface() == surface)
            {
                background.configure(width, height);
                return;
            }
            if let Some(panel) = output.panel.as_mut().filter(|p| p.surface.wl_surface() == surface)
            {
                panel.configure(width);
                return;
            }
        }
        tracing::debug!(surface = ?surface.id(), "configure for an unknown surface");
    }

    pub(crate) fn close_menus(&mut self) {
        for panel in self.outputs.iter_mut().filter_map(|o| o.panel.as_mut()) {
            panel.close_menu();
        }
    }

    fn lock_surface(&self) -> Option<&WlSurface> {
        self.unlocker.as_ref()?.dialog().map(|dialog| dialog.surface.wl_surface())
    }

    /// The compositor wants a lock surface: either unlock on the spot or
    /// put up the dialog.
    pub(crate) fn prepare_lock_surface(
        &mut self,
        compositor: &CompositorState,
        qh: &QueueHandle<GlobalState>,
    ) {
        let action = lock_action(self.config.shell.locking, self.unlocker.is_some());
        let (LockAction::ShowDialog, Some(unlocker)) = (action, self.unlocker.as_mut()) else {
            self.shell.unlock();
            return;
        };
        let shell = &self.shell;
        let created = unlocker.lock(|| {
            let wl_surface = compositor.create_surface(qh);
            shell.set_lock_surface(&wl_surface);
            let mut surface = ShellSurface::new(wl_surface);
            surface.resize(DIALOG_WIDTH, DIALOG_HEIGHT);
            surface
        });
        if created {
            info!("screen locked, showing the unlock dialog");
        }
    }

    pub(crate) fn lock_pointer_motion(&mut self, x: f64, y: f64) {
        if let Some(dialog) = self.unlocker.as_mut().and_then(Unlocker::dialog_mut) {
            if dialog.pointer_at(x, y) {
                dialog.surface.schedule_redraw();
            }
        }
    }

    pub(crate) fn lock_pointer_leave(&mut self) {
        if let Some(dialog) = self.unlocker.as_mut().and_then(Unlocker::dialog_mut) {
            if dialog.pointer_left() {
                dialog.surface.schedule_redraw();
            }
        }
    }

    /// Primary button released on the dialog. True when the caller should
    /// schedule [`Desktop::finish_unlock`].
    pub(crate) fn lock_button_released(&mut self) -> bool {
        let Some(unlocker) = self.unlocker.as_mut() else {
            return false;
        };
        let on_button = unlocker.dialog().is_some_and(|dialog| dialog.button_focused);
        on_button && unlocker.button_released()
    }

    pub(crate) fn finish_unlock(&mut self) {
        if let Some(dialog) = self.unlocker.as_mut().and_then(Unlocker::finish) {
            self.shell.unlock();
            drop(dialog);
            info!("unlocked");
        }
    }

    /// Paint whatever is pending, then see whether the desktop just
    /// became ready.
    pub(crate) fn redraw(
        &mut self,
        pool: &mut SlotPool,
        compositor: &CompositorState,
        text: &mut TextRenderer,
    ) {
        let mut drew = false;
        for output in &mut self.outputs {
            if let Some(background) = output.background.as_mut() {
                if background.surface.needs_redraw() {
                    background.redraw(pool, compositor);
                    drew = true;
                }
            }
            if let Some(panel) = output.panel.as_mut() {
                drew |= panel.surface.needs_redraw();
                panel.redraw(pool, text);
            }
        }

        if let Some(dialog) = self.unlocker.as_mut().and_then(Unlocker::dialog_mut) {
            if dialog.surface.needs_redraw() {
                if let Some(mut canvas) = dialog.surface.canvas() {
                    dialog.draw(&mut canvas, DIALOG_WIDTH, DIALOG_HEIGHT);
                    if let Err(err) = dialog.surface.present(pool, canvas) {
                        error!("unlock dialog: {:#}", err);
                    }
                }
            }
        }

        if drew {
            self.check_ready();
        }
    }

    fn check_ready(&mut self) {
        let painted = all_painted(self.outputs.iter().flat_map(|output| {
            [
                output.background.as_ref().map(|b| b as &dyn Painted),
                output.panel.as_ref().map(|p| p as &dyn Painted),
            ]
        }));
        if self.ready.update(painted) {
            if self.shell.version() >= DESKTOP_READY_SINCE {
                self.shell.desktop_ready();
            }
            info!("desktop ready");
        }
    }
}

impl Drop for Desktop {
    fn drop(&mut self) {
        self.outputs.clear();
        if let Some(unlocker) = self.unlocker.as_mut() {
            unlocker.finish();
        }
        if self.grab_surface.is_alive() {
            self.grab_surface.destroy();
        }
    }
}
