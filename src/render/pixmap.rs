// SPDX-License-Identifier: MPL-2.0
//! Offscreen [`Surface`] backed by a tiny-skia pixmap.
//!
//! The pixmap is allocated at `logical size × scale` device pixels and every
//! drawing call goes through a `scale` transform, the way a high-density
//! display scales a canvas. Callers keep working in logical pixels.

use super::layer::{straight_rgba, to_skia};
use super::{StaticLayer, Surface};
use crate::error::{Error, Result};
use iced::{Color, Point, Rectangle, Size};
use std::path::Path;
use tiny_skia::{
    FilterQuality, Paint, PathBuilder, Pixmap, PixmapPaint, Rect, Stroke, Transform,
};

#[derive(Debug, Clone)]
pub struct PixmapSurface {
    pixmap: Pixmap,
    logical: Size,
    scale: f32,
    transform: Transform,
}

impl PixmapSurface {
    /// Allocates a surface of `logical` size at device `scale`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] for a non-positive scale or an empty size.
    pub fn new(logical: Size, scale: f32) -> Result<Self> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(Error::Render(format!("invalid device scale {scale}")));
        }
        let width = (logical.width * scale).ceil() as u32;
        let height = (logical.height * scale).ceil() as u32;
        let pixmap = Pixmap::new(width, height)
            .ok_or_else(|| Error::Render(format!("cannot allocate {width}x{height} surface")))?;
        Ok(Self {
            pixmap,
            logical,
            scale,
            transform: Transform::from_scale(scale, scale),
        })
    }

    #[must_use]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    #[must_use]
    pub fn device_size(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }

    /// Straight RGBA of a device pixel.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let p = self.pixmap.pixel(x, y)?.demultiply();
        Some([p.red(), p.green(), p.blue(), p.alpha()])
    }

    /// Straight RGBA at a logical position.
    #[must_use]
    pub fn pixel_at(&self, position: Point) -> Option<[u8; 4]> {
        if position.x < 0.0 || position.y < 0.0 {
            return None;
        }
        self.pixel(
            (position.x * self.scale).floor() as u32,
            (position.y * self.scale).floor() as u32,
        )
    }

    #[must_use]
    pub fn rgba(&self) -> Vec<u8> {
        straight_rgba(&self.pixmap)
    }

    /// # Errors
    ///
    /// Returns [`Error::Render`] if PNG encoding fails.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        self.pixmap
            .encode_png()
            .map_err(|e| Error::Render(e.to_string()))
    }

    /// # Errors
    ///
    /// Returns [`Error::Render`] if encoding fails, [`Error::Io`] if writing fails.
    pub fn save_png(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.encode_png()?)?;
        Ok(())
    }

    fn paint(color: Color) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color(to_skia(color));
        paint.anti_alias = false;
        paint
    }
}

fn skia_rect(rect: Rectangle) -> Option<Rect> {
    Rect::from_xywh(rect.x, rect.y, rect.width, rect.height)
}

impl Surface for PixmapSurface {
    fn logical_size(&self) -> Size {
        self.logical
    }

    fn reset_transform(&mut self) {
        self.transform = Transform::from_scale(self.scale, self.scale);
    }

    fn clear(&mut self, color: Color) {
        self.pixmap.fill(to_skia(color));
    }

    fn fill_rect(&mut self, rect: Rectangle, color: Color) {
        if let Some(rect) = skia_rect(rect) {
            self.pixmap
                .fill_rect(rect, &Self::paint(color), self.transform, None);
        }
    }

    fn stroke_rect(&mut self, rect: Rectangle, color: Color, width: f32) {
        let Some(path) = skia_rect(rect).map(PathBuilder::from_rect) else {
            return;
        };
        let stroke = Stroke {
            width,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(&path, &Self::paint(color), &stroke, self.transform, None);
    }

    fn blit_layer(&mut self, layer: &StaticLayer, origin: Point) {
        let paint = PixmapPaint {
            quality: FilterQuality::Nearest,
            ..PixmapPaint::default()
        };
        self.pixmap.draw_pixmap(
            0,
            0,
            layer.pixmap().as_ref(),
            &paint,
            self.transform.pre_translate(origin.x, origin.y),
            None,
        );
    }
}
