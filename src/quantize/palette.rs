// SPDX-License-Identifier: MPL-2.0
//! Per-cell color reduction.
//!
//! Every function here maps `(r, g, b)` to `(r, g, b)` and is idempotent:
//! reducing an already reduced color returns it unchanged. Alpha is never
//! touched.

use crate::domain::QuantizationMode;

/// The 16-color low/high intensity palette, in lookup order.
pub const PALETTE_16: [[u8; 3]; 16] = [
    [0, 0, 0],
    [0, 0, 170],
    [0, 170, 0],
    [0, 170, 170],
    [170, 0, 0],
    [170, 0, 170],
    [170, 85, 0],
    [170, 170, 170],
    [85, 85, 85],
    [85, 85, 255],
    [85, 255, 85],
    [85, 255, 255],
    [255, 85, 85],
    [255, 85, 255],
    [255, 255, 85],
    [255, 255, 255],
];

/// Channel sum above which a 1-bit cell becomes white (average > 128).
const MONO_THRESHOLD_SUM: u32 = 128 * 3;

const RED_LEVELS: u32 = 8;
const GREEN_LEVELS: u32 = 8;
const BLUE_LEVELS: u32 = 4;

/// Reduces one color to the given depth.
#[must_use]
pub fn reduce_color(mode: QuantizationMode, rgb: [u8; 3]) -> [u8; 3] {
    match mode {
        QuantizationMode::Bit1 => threshold_mono(rgb),
        QuantizationMode::Bit4 => nearest_palette_color(rgb),
        QuantizationMode::Bit8 => [
            reduce_channel(rgb[0], RED_LEVELS),
            reduce_channel(rgb[1], GREEN_LEVELS),
            reduce_channel(rgb[2], BLUE_LEVELS),
        ],
        QuantizationMode::Bit24 => rgb,
    }
}

fn threshold_mono([r, g, b]: [u8; 3]) -> [u8; 3] {
    let sum = u32::from(r) + u32::from(g) + u32::from(b);
    let value = if sum > MONO_THRESHOLD_SUM { 255 } else { 0 };
    [value; 3]
}

/// Nearest palette entry by squared RGB distance; the first entry wins ties.
fn nearest_palette_color(rgb: [u8; 3]) -> [u8; 3] {
    let mut best = PALETTE_16[0];
    let mut best_distance = u32::MAX;
    for candidate in PALETTE_16 {
        let distance = squared_distance(rgb, candidate);
        if distance < best_distance {
            best = candidate;
            best_distance = distance;
        }
    }
    best
}

fn squared_distance(a: [u8; 3], b: [u8; 3]) -> u32 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let d = i32::from(x) - i32::from(y);
            (d * d) as u32
        })
        .sum()
}

/// Snaps a channel to `levels` evenly spaced values over 0..=255.
fn reduce_channel(value: u8, levels: u32) -> u8 {
    let steps = levels - 1;
    // round(value * steps / 255)
    let level = (u32::from(value) * steps * 2 + 255) / (255 * 2);
    // round(level * 255 / steps)
    let restored = (level * 255 * 2 + steps) / (steps * 2);
    restored.min(255) as u8
}
