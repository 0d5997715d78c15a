// SPDX-License-Identifier: MPL-2.0

use anyhow::anyhow;
use sctk::{
    reexports::client::{
        protocol::{wl_output, wl_shm, wl_surface::WlSurface},
        Proxy,
    },
    shm::slot::{Buffer, SlotPool},
};

use crate::render::{to_buffer, Canvas};

/// A wl_surface the shell paints into from shm, at the scale and transform
/// of the output it lives on.
#[derive(Debug)]
pub(crate) struct ShellSurface {
    wl_surface: WlSurface,
    pub(crate) width: u32,
    pub(crate) height: u32,
    scale: i32,
    transform: wl_output::Transform,
    dirty: bool,
    buffer: Option<Buffer>,
}

impl ShellSurface {
    pub(crate) fn new(wl_surface: WlSurface) -> Self {
        Self {
            wl_surface,
            width: 0,
            height: 0,
            scale: 1,
            transform: wl_output::Transform::Normal,
            dirty: false,
            buffer: None,
        }
    }

    pub(crate) fn wl_surface(&self) -> &WlSurface {
        &self.wl_surface
    }

    pub(crate) fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.dirty = true;
    }

    pub(crate) fn scale(&self) -> i32 {
        self.scale
    }

    pub(crate) fn set_scale(&mut self, scale: i32) {
        let scale = scale.max(1);
        if scale != self.scale {
            self.scale = scale;
            self.dirty = true;
        }
    }

    pub(crate) fn set_transform(&mut self, transform: wl_output::Transform) {
        if transform != self.transform {
            self.transform = transform;
            self.dirty = true;
        }
    }

    pub(crate) fn schedule_redraw(&mut self) {
        self.dirty = true;
    }

    /// a redraw is pending and there is something to draw into
    pub(crate) fn needs_redraw(&self) -> bool {
        self.dirty && self.width > 0 && self.height > 0
    }

    pub(crate) fn canvas(&self) -> Option<Canvas> {
        Canvas::new(self.width, self.height, self.scale)
    }

    /// Copy a finished frame into shm and commit it.
    pub(crate) fn present(&mut self, pool: &mut SlotPool, canvas: Canvas) -> anyhow::Result<()> {
        self.dirty = false;
        let frame = to_buffer(canvas.pixmap, self.transform)
            .ok_or_else(|| anyhow!("failed to allocate a {:?} frame", self.transform))?;
        let (width, height) = (frame.width() as i32, frame.height() as i32);

        let (buffer, data) = pool
            .create_buffer(width, height, width * 4, wl_shm::Format::Argb8888)
            .map_err(|err| anyhow!("failed to create {}x{} buffer: {:?}", width, height, err))?;
        // premultiplied rgba -> argb8888, little endian
        for (dst, src) in data.chunks_exact_mut(4).zip(frame.data().chunks_exact(4)) {
            dst.copy_from_slice(&[src[2], src[1], src[0], src[3]]);
        }

        self.wl_surface.set_buffer_scale(self.scale);
        self.wl_surface.set_buffer_transform(self.transform);
        buffer
            .attach_to(&self.wl_surface)
            .map_err(|err| anyhow!("failed to attach buffer: {:?}", err))?;
        self.wl_surface.damage_buffer(0, 0, width, height);
        self.wl_surface.commit();
        self.buffer = Some(buffer);
        Ok(())
    }
}

impl Drop for ShellSurface {
    fn drop(&mut self) {
        if self.wl_surface.is_alive() {
            self.wl_surface.destroy();
        }
    }
}
