//! Display helpers for pattern windows

use crate::Pattern;

pub const TRAIL_SEPARATOR: &str = " → ";

/// Compact volume in Indian notation: crore, lakh, thousand.
pub fn format_volume(volume: f64) -> String {
    if volume >= 10_000_000.0 {
        format!("{:.1}Cr", volume / 10_000_000.0)
    } else if volume >= 100_000.0 {
        format!("{:.1}L", volume / 100_000.0)
    } else if volume >= 1_000.0 {
        format!("{:.1}K", volume / 1_000.0)
    } else {
        format!("{volume:.0}")
    }
}

#[inline]
pub fn format_price(price: f64) -> String {
    format!("{price:.2}")
}

/// Window volumes joined with arrows, e.g. `1.2K → 1.5K → 2.0K`
pub fn volume_trail(pattern: &Pattern) -> String {
    join(&pattern.volumes, format_volume)
}

/// Window prices joined with arrows, e.g. `50.00 → 51.00`
pub fn price_trail(pattern: &Pattern) -> String {
    join(&pattern.prices, format_price)
}

fn join(values: &[f64], f: fn(f64) -> String) -> String {
    values
        .iter()
        .map(|&v| f(v))
        .collect::<Vec<_>>()
        .join(TRAIL_SEPARATOR)
}
