// SPDX-License-Identifier: MPL-2.0

use std::fmt;

/// A color packed as `0xAARRGGBB`, the way weston.ini spells colors
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Argb(pub u32);

impl Argb {
    pub fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub fn blue(self) -> u8 {
        self.0 as u8
    }

    /// straight (not premultiplied) rgba bytes
    pub fn to_rgba8(self) -> [u8; 4] {
        [self.red(), self.green(), self.blue(), self.alpha()]
    }

    /// straight rgba components in `0.0..=1.0`
    pub fn to_rgba_f32(self) -> [f32; 4] {
        self.to_rgba8().map(|c| c as f32 / 255.0)
    }
}

impl From<u32> for Argb {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for Argb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}
