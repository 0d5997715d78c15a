// SPDX-License-Identifier: MPL-2.0

//! Raster helpers shared by every surface the shell draws: allocations,
//! color conversion, image decoding, text and the output transform applied
//! right before a frame is handed to the compositor.

use std::path::Path;

use anyhow::Context;
use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping, SwashCache, SwashContent};
use desktop_shell_config::Argb;
use sctk::reexports::client::protocol::wl_output;
use tiny_skia::{
    Color, FilterQuality, IntSize, LineCap, Paint, PathBuilder, Pixmap, PixmapPaint, Stroke,
    Transform,
};

/// Widget allocation in surface-local logical pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Rect {
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) width: i32,
    pub(crate) height: i32,
}

impl Rect {
    pub(crate) const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub(crate) fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x as f64
            && y >= self.y as f64
            && x < (self.x + self.width) as f64
            && y < (self.y + self.height) as f64
    }

    pub(crate) fn to_skia(self) -> Option<tiny_skia::Rect> {
        tiny_skia::Rect::from_xywh(
            self.x as f32,
            self.y as f32,
            self.width as f32,
            self.height as f32,
        )
    }
}

/// A circle, used for the unlock button
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct Circle {
    pub(crate) cx: f64,
    pub(crate) cy: f64,
    pub(crate) r: f64,
}

impl Circle {
    pub(crate) fn contains(&self, x: f64, y: f64) -> bool {
        let (dx, dy) = (x - self.cx, y - self.cy);
        dx * dx + dy * dy <= self.r * self.r
    }
}

pub(crate) fn color(argb: Argb) -> Color {
    let [r, g, b, a] = argb.to_rgba8();
    Color::from_rgba8(r, g, b, a)
}

/// Something drawn at logical size and rasterised at `scale`
#[derive(Debug)]
pub(crate) struct Canvas {
    pub(crate) pixmap: Pixmap,
    pub(crate) scale: i32,
}

impl Canvas {
    pub(crate) fn new(width: u32, height: u32, scale: i32) -> Option<Self> {
        let scale = scale.max(1);
        let pixmap = Pixmap::new(width * scale as u32, height * scale as u32)?;
        Some(Self { pixmap, scale })
    }

    /// logical to pixel coordinates
    pub(crate) fn base(&self) -> Transform {
        Transform::from_scale(self.scale as f32, self.scale as f32)
    }

    /// replace everything inside `rect`, alpha included
    pub(crate) fn fill_rect(&mut self, rect: Rect, fill: Color) {
        let Some(rect) = rect.to_skia() else {
            return;
        };
        let mut paint = Paint::default();
        paint.set_color(fill);
        paint.blend_mode = tiny_skia::BlendMode::Source;
        let base = self.base();
        self.pixmap.fill_rect(rect, &paint, base, None);
    }

    pub(crate) fn draw_image(&mut self, image: &Pixmap, x: f64, y: f64) {
        let base = self.base().pre_translate(x as f32, y as f32);
        self.pixmap.draw_pixmap(0, 0, image.as_ref(), &PixmapPaint::default(), base, None);
    }
}

/// Decode a png/jpeg into a premultiplied pixmap.
pub(crate) fn load_image(path: &Path) -> anyhow::Result<Pixmap> {
    let decoded = image::open(path)
        .with_context(|| format!("Failed to load image '{}'", path.display()))?
        .into_rgba8();
    let (width, height) = decoded.dimensions();
    let mut data = decoded.into_raw();
    for px in data.chunks_exact_mut(4) {
        let a = px[3] as u16;
        for c in &mut px[..3] {
            *c = ((*c as u16 * a + 127) / 255) as u8;
        }
    }
    let size = IntSize::from_wh(width, height)
        .with_context(|| format!("'{}' has no pixels", path.display()))?;
    Pixmap::from_vec(data, size)
        .with_context(|| format!("'{}' does not fit a pixmap", path.display()))
}

/// Grey box with a cross, used for launcher icons that fail to load
pub(crate) fn fallback_icon() -> Pixmap {
    let mut icon = Pixmap::new(20, 20).expect("20x20 is a valid pixmap size");
    icon.fill(Color::from_rgba(0.8, 0.8, 0.8, 1.0).unwrap_or(Color::WHITE));

    let mut pb = PathBuilder::new();
    if let Some(frame) = tiny_skia::Rect::from_xywh(0.0, 0.0, 20.0, 20.0) {
        pb.push_rect(frame);
    }
    pb.move_to(4.0, 4.0);
    pb.line_to(16.0, 16.0);
    pb.move_to(4.0, 16.0);
    pb.line_to(16.0, 4.0);
    if let Some(path) = pb.finish() {
        let mut paint = Paint::default();
        paint.set_color(Color::BLACK);
        let stroke = Stroke { width: 2.0, line_cap: LineCap::Round, ..Default::default() };
        icon.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }
    icon
}

/// White at 40% wherever `icon` is opaque, drawn over a hovered launcher.
pub(crate) fn highlight_mask(icon: &Pixmap) -> Pixmap {
    let mut mask = icon.clone();
    for px in mask.data_mut().chunks_exact_mut(4) {
        let a = (px[3] as u32 * 4 + 5) / 10;
        px.copy_from_slice(&[a as u8; 4]);
    }
    mask
}

/// Font state for everything the shell writes on screen
pub(crate) struct TextRenderer {
    font_system: FontSystem,
    swash_cache: SwashCache,
}

impl std::fmt::Debug for TextRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextRenderer").finish_non_exhaustive()
    }
}

impl TextRenderer {
    pub(crate) fn new() -> Self {
        Self { font_system: FontSystem::new(), swash_cache: SwashCache::new() }
    }

    fn layout(&mut self, text: &str, size: f32) -> Buffer {
        let mut buf = Buffer::new(&mut self.font_system, Metrics::new(size, size * 1.2));
        buf.set_size(&mut self.font_system, None, None);
        buf.set_text(
            &mut self.font_system,
            text,
            &Attrs::new().family(Family::SansSerif),
            Shaping::Advanced,
            None,
        );
        buf.shape_until_scroll(&mut self.font_system, false);
        buf
    }

    /// logical width of a single line of `text`
    pub(crate) fn measure(&mut self, text: &str, size: f32) -> f32 {
        self.layout(text, size).layout_runs().map(|run| run.line_w).fold(0.0, f32::max)
    }

    /// Draw one line of sans-serif `text` with its baseline starting at
    /// the logical point (`x`, `baseline`).
    pub(crate) fn draw(
        &mut self,
        canvas: &mut Canvas,
        text: &str,
        size: f32,
        x: f64,
        baseline: f64,
        fill: Color,
    ) {
        let scale = canvas.scale as f32;
        let buf = self.layout(text, size * scale);
        let fill = fill.premultiply().to_color_u8();
        let origin = (x as f32 * scale, baseline as f32 * scale);

        for run in buf.layout_runs() {
            for glyph in run.glyphs {
                let physical = glyph.physical(origin, 1.0);
                let Some(image) =
                    self.swash_cache.get_image_uncached(&mut self.font_system, physical.cache_key)
                else {
                    continue;
                };
                let x0 = physical.x + image.placement.left;
                let y0 = physical.y - image.placement.top;
                let w = image.placement.width;
                match image.content {
                    SwashContent::Mask => {
                        let coverage = image.data.iter().map(|&c| {
                            let c = c as u32;
                            [
                                fill.red() as u32 * c / 255,
                                fill.green() as u32 * c / 255,
                                fill.blue() as u32 * c / 255,
                                fill.alpha() as u32 * c / 255,
                            ]
                        });
                        blend(&mut canvas.pixmap, x0, y0, w, coverage);
                    },
                    SwashContent::Color => {
                        let rgba = image.data.chunks_exact(4).map(|px| {
                            let a = px[3] as u32;
                            [
                                px[0] as u32 * a / 255,
                                px[1] as u32 * a / 255,
                                px[2] as u32 * a / 255,
                                a,
                            ]
                        });
                        blend(&mut canvas.pixmap, x0, y0, w, rgba);
                    },
                    SwashContent::SubpixelMask => {},
                }
            }
        }
    }
}

/// source-over of premultiplied `src` pixels, `width` per row, at (x0, y0)
fn blend(pixmap: &mut Pixmap, x0: i32, y0: i32, width: u32, src: impl Iterator<Item = [u32; 4]>) {
    let (pw, ph) = (pixmap.width() as i32, pixmap.height() as i32);
    let data = pixmap.data_mut();
    for (i, [r, g, b, a]) in src.enumerate() {
        if a == 0 {
            continue;
        }
        let px = x0 + (i as u32 % width.max(1)) as i32;
        let py = y0 + (i as u32 / width.max(1)) as i32;
        if px < 0 || py < 0 || px >= pw || py >= ph {
            continue;
        }
        let o = (py * pw + px) as usize * 4;
        let inv = 255 - a;
        data[o] = (r + data[o] as u32 * inv / 255).min(255) as u8;
        data[o + 1] = (g + data[o + 1] as u32 * inv / 255).min(255) as u8;
        data[o + 2] = (b + data[o + 2] as u32 * inv / 255).min(255) as u8;
        data[o + 3] = (a + data[o + 3] as u32 * inv / 255).min(255) as u8;
    }
}

/// Matrix taking surface pixels to buffer pixels for an output transform,
/// with the buffer size it produces.
pub(crate) fn buffer_transform(
    transform: wl_output::Transform,
    width: u32,
    height: u32,
) -> (Transform, u32, u32) {
    use wl_output::Transform as T;

    let (w, h) = (width as f32, height as f32);
    // (sx, ky, kx, sy): x' = sx*x + kx*y, y' = ky*x + sy*y
    let (sx, ky, kx, sy) = match transform {
        T::_90 => (0.0, 1.0, -1.0, 0.0),
        T::_180 => (-1.0, 0.0, 0.0, -1.0),
        T::_270 => (0.0, -1.0, 1.0, 0.0),
        T::Flipped => (-1.0, 0.0, 0.0, 1.0),
        T::Flipped90 => (0.0, 1.0, 1.0, 0.0),
        T::Flipped180 => (1.0, 0.0, 0.0, -1.0),
        T::Flipped270 => (0.0, -1.0, -1.0, 0.0),
        _ => (1.0, 0.0, 0.0, 1.0),
    };
    let corners = [(0.0, 0.0), (w, 0.0), (0.0, h), (w, h)]
        .map(|(x, y): (f32, f32)| (sx * x + kx * y, ky * x + sy * y));
    let min_x = corners.iter().map(|c| c.0).fold(f32::INFINITY, f32::min);
    let min_y = corners.iter().map(|c| c.1).fold(f32::INFINITY, f32::min);

    let swapped = sx == 0.0;
    let (bw, bh) = if swapped { (height, width) } else { (width, height) };
    (Transform::from_row(sx, ky, kx, sy, -min_x, -min_y), bw, bh)
}

/// Rotate/flip a finished frame into buffer orientation.
pub(crate) fn to_buffer(pixmap: Pixmap, transform: wl_output::Transform) -> Option<Pixmap> {
    if transform == wl_output::Transform::Normal {
        return Some(pixmap);
    }
    let (matrix, bw, bh) = buffer_transform(transform, pixmap.width(), pixmap.height());
    let mut out = Pixmap::new(bw, bh)?;
    let paint = PixmapPaint { quality: FilterQuality::Nearest, ..Default::default() };
    out.draw_pixmap(0, 0, pixmap.as_ref(), &paint, matrix, None);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(t: Transform, x: f32, y: f32) -> (f32, f32) {
        let mut p = [tiny_skia::Point::from_xy(x, y)];
        t.map_points(&mut p);
        (p[0].x, p[0].y)
    }

    #[test]
    fn rect_contains_is_half_open() {
        let r = Rect::new(10, 6, 171, 21);
        assert!(r.contains(10.0, 6.0));
        assert!(r.contains(180.5, 26.9));
        assert!(!r.contains(181.0, 10.0));
        assert!(!r.contains(9.9, 10.0));
    }

    #[test]
    fn circle_hit_test() {
        let c = Circle { cx: 130.0, cy: 115.0, r: 46.0 };
        assert!(c.contains(130.0, 115.0));
        assert!(c.contains(176.0, 115.0));
        assert!(!c.contains(170.0, 155.0));
    }

    #[test]
    fn rotations_keep_the_frame_inside_the_buffer() {
        use wl_output::Transform as T;
        for transform in [
            T::Normal,
            T::_90,
            T::_180,
            T::_270,
            T::Flipped,
            T::Flipped90,
            T::Flipped180,
            T::Flipped270,
        ] {
            let (m, bw, bh) = buffer_transform(transform, 40, 10);
            for (x, y) in [(0.0, 0.0), (40.0, 0.0), (0.0, 10.0), (40.0, 10.0)] {
                let (bx, by) = apply(m, x, y);
                assert!((0.0..=bw as f32).contains(&bx), "{transform:?} x {bx}");
                assert!((0.0..=bh as f32).contains(&by), "{transform:?} y {by}");
            }
        }
    }

    #[test]
    fn quarter_turns_swap_buffer_size() {
        use wl_output::Transform as T;
        assert_eq!(buffer_transform(T::_90, 40, 10).1, 10);
        assert_eq!(buffer_transform(T::Flipped270, 40, 10).2, 40);
        assert_eq!(buffer_transform(T::_180, 40, 10).1, 40);

        let (m, _, _) = buffer_transform(T::_90, 40, 10);
        assert_eq!(apply(m, 0.0, 0.0), (10.0, 0.0));
        let (m, _, _) = buffer_transform(T::Flipped, 40, 10);
        assert_eq!(apply(m, 0.0, 0.0), (40.0, 0.0));
    }

    #[test]
    fn fallback_icon_is_opaque() {
        let icon = fallback_icon();
        assert_eq!((icon.width(), icon.height()), (20, 20));
        assert!(icon.pixels().iter().all(|px| px.alpha() == 255));
    }

    #[test]
    fn highlight_follows_icon_alpha() {
        let mut icon = Pixmap::new(2, 1).unwrap();
        icon.pixels_mut()[0] =
            tiny_skia::PremultipliedColorU8::from_rgba(255, 0, 0, 255).unwrap();
        let mask = highlight_mask(&icon);
        assert_eq!(mask.data()[..4], [102, 102, 102, 102]);
        assert_eq!(mask.data()[4..], [0, 0, 0, 0]);
    }

    #[test]
    fn canvas_is_rasterised_at_scale() {
        let mut canvas = Canvas::new(10, 4, 2).unwrap();
        assert_eq!((canvas.pixmap.width(), canvas.pixmap.height()), (20, 8));
        canvas.fill_rect(Rect::new(0, 0, 10, 4), color(Argb(0xaa000000)));
        assert!(canvas.pixmap.pixels().iter().all(|px| px.alpha() == 0xaa));
    }

    #[test]
    fn empty_label_measures_and_draws_nothing() {
        let mut text = TextRenderer::new();
        assert_eq!(text.measure("", 12.0), 0.0);

        let mut canvas = Canvas::new(40, 20, 1).unwrap();
        text.draw(&mut canvas, "", 14.0, 4.0, 15.0, Color::WHITE);
        assert!(canvas.pixmap.pixels().iter().all(|px| px.alpha() == 0));
    }
}
