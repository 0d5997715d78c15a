// SPDX-License-Identifier: MPL-2.0

use std::rc::Rc;

use desktop_shell_config::{Argb, BackgroundConfig, FillMode};
use sctk::{
    compositor::{CompositorState, Region},
    shm::slot::SlotPool,
};
use tiny_skia::{Color, FilterQuality, Paint, Pattern, Pixmap, SpreadMode, Transform};
use tracing::error;

use crate::{
    desktop::Painted,
    render::{color, Canvas, Rect},
    surface::ShellSurface,
};

/// Mapping from allocation coordinates to image coordinates:
/// `image = (sx * x + tx, sy * y + ty)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ImageMatrix {
    pub(crate) sx: f64,
    pub(crate) sy: f64,
    pub(crate) tx: f64,
    pub(crate) ty: f64,
}

impl ImageMatrix {
    pub(crate) const IDENTITY: Self = Self { sx: 1.0, sy: 1.0, tx: 0.0, ty: 0.0 };

    pub(crate) fn new(fill: FillMode, image: (f64, f64), allocation: (f64, f64)) -> Self {
        let (im_w, im_h) = image;
        let (aw, ah) = allocation;
        let (sx, sy) = (im_w / aw, im_h / ah);
        match fill {
            FillMode::Scale => Self { sx, sy, tx: 0.0, ty: 0.0 },
            FillMode::ScaleCrop => {
                let s = sx.min(sy);
                Self { sx: s, sy: s, tx: (im_w - s * aw) * 0.5, ty: (im_h - s * ah) * 0.5 }
            },
            FillMode::Tile => Self::IDENTITY,
        }
    }

    /// the shader transform: image coordinates back to the allocation
    pub(crate) fn to_shader(self) -> Option<Transform> {
        Transform::from_row(
            self.sx as f32,
            0.0,
            0.0,
            self.sy as f32,
            self.tx as f32,
            self.ty as f32,
        )
        .invert()
    }
}

/// Full-screen wallpaper of one output
#[derive(Debug)]
pub(crate) struct Background {
    pub(crate) surface: ShellSurface,
    image: Option<Rc<Pixmap>>,
    fill: FillMode,
    color: Argb,
    painted: bool,
}

impl Background {
    pub(crate) fn new(
        surface: ShellSurface,
        config: &BackgroundConfig,
        image: Option<Rc<Pixmap>>,
    ) -> Self {
        Self { surface, image, fill: config.fill, color: config.color, painted: false }
    }

    pub(crate) fn configure(&mut self, width: i32, height: i32) {
        self.surface.resize(width.max(0) as u32, height.max(0) as u32);
    }

    pub(crate) fn paint(&self, canvas: &mut Canvas) {
        let allocation = Rect::new(0, 0, self.surface.width as i32, self.surface.height as i32);
        canvas.fill_rect(allocation, Color::from_rgba(0.0, 0.0, 0.2, 1.0).unwrap_or(Color::BLACK));

        let shader = self.image.as_ref().and_then(|image| {
            let matrix = ImageMatrix::new(
                self.fill,
                (image.width() as f64, image.height() as f64),
                (allocation.width as f64, allocation.height as f64),
            );
            let spread = match self.fill {
                FillMode::Tile => SpreadMode::Repeat,
                _ => SpreadMode::Pad,
            };
            Some(Pattern::new(
                Pixmap::as_ref(image),
                spread,
                FilterQuality::Bilinear,
                1.0,
                matrix.to_shader()?,
            ))
        });
        match (shader, allocation.to_skia()) {
            (Some(shader), Some(rect)) => {
                let paint = Paint { shader, ..Default::default() };
                let base = canvas.base();
                canvas.pixmap.fill_rect(rect, &paint, base, None);
            },
            _ => canvas.fill_rect(allocation, color(self.color)),
        }
    }

    pub(crate) fn redraw(&mut self, pool: &mut SlotPool, compositor: &CompositorState) {
        let Some(mut canvas) = self.surface.canvas() else {
            return;
        };
        self.paint(&mut canvas);

        match Region::new(compositor) {
            Ok(region) => {
                region.add(0, 0, self.surface.width as i32, self.surface.height as i32);
                self.surface.wl_surface().set_opaque_region(Some(region.wl_region()));
            },
            Err(err) => error!("failed to create opaque region: {:?}", err),
        }
        if let Err(err) = self.surface.present(pool, canvas) {
            error!("background: {:#}", err);
            return;
        }
        self.painted = true;
    }
}

impl Painted for Background {
    fn painted(&self) -> bool {
        self.painted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_stretches_both_axes() {
        let m = ImageMatrix::new(FillMode::Scale, (200.0, 200.0), (100.0, 50.0));
        assert_eq!(m, ImageMatrix { sx: 2.0, sy: 4.0, tx: 0.0, ty: 0.0 });
    }

    #[test]
    fn scale_crop_keeps_aspect_and_centers() {
        let m = ImageMatrix::new(FillMode::ScaleCrop, (200.0, 200.0), (100.0, 50.0));
        assert_eq!(m, ImageMatrix { sx: 2.0, sy: 2.0, tx: 0.0, ty: 50.0 });

        let m = ImageMatrix::new(FillMode::ScaleCrop, (1920.0, 1080.0), (1280.0, 1024.0));
        assert_eq!(m.sx, 1080.0 / 1024.0);
        assert!((m.tx - (1920.0 - m.sx * 1280.0) / 2.0).abs() < 1e-9);
        assert_eq!(m.ty, 0.0);
    }

    #[test]
    fn tile_is_identity() {
        let m = ImageMatrix::new(FillMode::Tile, (64.0, 64.0), (1920.0, 1080.0));
        assert_eq!(m, ImageMatrix::IDENTITY);
        assert_eq!(m.to_shader(), Some(Transform::identity()));
    }

    #[test]
    fn shader_undoes_the_image_mapping() {
        let m = ImageMatrix { sx: 2.0, sy: 2.0, tx: 0.0, ty: 50.0 };
        let shader = m.to_shader().unwrap();
        let mut p = [tiny_skia::Point::from_xy(0.0, 50.0), tiny_skia::Point::from_xy(200.0, 150.0)];
        shader.map_points(&mut p);
        assert_eq!((p[0].x, p[0].y), (0.0, 0.0));
        assert_eq!((p[1].x, p[1].y), (100.0, 50.0));
    }
}
