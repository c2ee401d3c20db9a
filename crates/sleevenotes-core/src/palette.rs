//! Median-cut palette extraction for cover art.
//!
//! The quantizer recursively splits the pixel population along whichever
//! channel spans the widest range, then averages each leaf bucket into one
//! palette entry. It is a pure function of its input: the sort is stable
//! and channel ties break in the fixed order r > g > b, so repeated runs
//! over the same pixels yield identical palettes.
//!
//! Two behaviors worth knowing about:
//! - the element at the split point is excluded from both halves, so each
//!   split drops one pixel from the population (kept for output parity
//!   with the reference palettes);
//! - an empty bucket contributes no palette entry, so skewed or tiny
//!   inputs produce fewer than `2^max_depth` colors.

use crate::model::Rgb;

/// Default recursion depth; yields at most `2^3 = 8` palette entries.
pub const MAX_SPLIT_DEPTH: u8 = 3;

/// Decode a flat RGBA byte sequence (4 bytes per pixel, row-major) into
/// pixels, dropping the alpha channel.
#[must_use]
pub fn pixels_from_rgba(bytes: &[u8]) -> Vec<Rgb> {
    bytes
        .chunks_exact(4)
        .map(|px| Rgb::new(px[0], px[1], px[2]))
        .collect()
}

/// Quantize a pixel population into a palette of at most `2^max_depth`
/// averaged colors.
#[must_use]
pub fn quantize(pixels: Vec<Rgb>, max_depth: u8) -> Vec<Rgb> {
    let mut palette = Vec::new();
    split_bucket(pixels, 0, max_depth, &mut palette);
    palette
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Channel {
    R,
    G,
    B,
}

impl Channel {
    fn of(self, px: Rgb) -> u8 {
        match self {
            Channel::R => px.r,
            Channel::G => px.g,
            Channel::B => px.b,
        }
    }
}

/// The channel with the largest (max - min) spread across the bucket.
/// Ties resolve r, then g, then b; an all-equal bucket splits on r.
fn widest_channel(bucket: &[Rgb]) -> Channel {
    let mut min = Rgb::new(u8::MAX, u8::MAX, u8::MAX);
    let mut max = Rgb::new(0, 0, 0);

    for px in bucket {
        min.r = min.r.min(px.r);
        min.g = min.g.min(px.g);
        min.b = min.b.min(px.b);
        max.r = max.r.max(px.r);
        max.g = max.g.max(px.g);
        max.b = max.b.max(px.b);
    }

    let range_r = max.r.saturating_sub(min.r);
    let range_g = max.g.saturating_sub(min.g);
    let range_b = max.b.saturating_sub(min.b);

    if range_r > range_g && range_r > range_b {
        Channel::R
    } else if range_g > range_r && range_g > range_b {
        Channel::G
    } else if range_b > range_r && range_b > range_g {
        Channel::B
    } else {
        Channel::R
    }
}

fn split_bucket(mut bucket: Vec<Rgb>, depth: u8, max_depth: u8, palette: &mut Vec<Rgb>) {
    if bucket.is_empty() {
        // Skip rather than average nothing.
        return;
    }

    if depth == max_depth {
        palette.push(average(&bucket));
        return;
    }

    let channel = widest_channel(&bucket);
    // Stable sort keeps equal-valued pixels in input order, which makes
    // the split (and therefore the palette) deterministic.
    bucket.sort_by_key(|px| channel.of(*px));

    let mid = bucket.len() / 2;
    let right = bucket.split_off(mid + 1);
    bucket.truncate(mid); // the midpoint pixel belongs to neither half

    split_bucket(bucket, depth + 1, max_depth, palette);
    split_bucket(right, depth + 1, max_depth, palette);
}

/// Channel-wise arithmetic mean, rounded to the nearest integer.
fn average(bucket: &[Rgb]) -> Rgb {
    let n = bucket.len() as f64;
    let (mut r, mut g, mut b) = (0u64, 0u64, 0u64);
    for px in bucket {
        r += u64::from(px.r);
        g += u64::from(px.g);
        b += u64::from(px.b);
    }
    Rgb::new(
        (r as f64 / n).round() as u8,
        (g as f64 / n).round() as u8,
        (b as f64 / n).round() as u8,
    )
}
