//! Fixed color patterns and the store that assigns them to strips

use core::fmt;

use heapless::Vec;
use smart_leds::{
    RGB8,
    hsv::{Hsv, hsv2rgb},
};

/// Identity of one physical strip
pub type StripId = u8;

/// Maximum number of strips a controller drives
pub const MAX_STRIPS: usize = 8;

/// All channels off
pub const BLACK: RGB8 = RGB8 { r: 0, g: 0, b: 0 };

/// An immutable sequence of exactly `N` colors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern<const N: usize> {
    colors: [RGB8; N],
}

impl<const N: usize> Pattern<N> {
    pub const fn new(colors: [RGB8; N]) -> Self {
        Self { colors }
    }

    /// Every pixel the same color
    pub const fn fill(color: RGB8) -> Self {
        Self { colors: [color; N] }
    }

    /// A single lit pixel on a background. `position` wraps around the strip.
    pub fn dot(position: usize, color: RGB8, background: RGB8) -> Self {
        let mut colors = [background; N];
        if N > 0 {
            colors[position % N] = color;
        }
        Self { colors }
    }

    /// Linear blend from `from` at the first pixel to `to` at the last one
    pub fn gradient(from: RGB8, to: RGB8) -> Self {
        let mut colors = [from; N];
        let last = N.saturating_sub(1).max(1);
        for (i, color) in colors.iter_mut().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            let t = (i * 255 / last) as u8;
            *color = RGB8::new(
                lerp(from.r, to.r, t),
                lerp(from.g, to.g, t),
                lerp(from.b, to.b, t),
            );
        }
        Self { colors }
    }

    /// One full hue sweep starting at `start_hue`
    pub fn rainbow(start_hue: u8, saturation: u8, value: u8) -> Self {
        let mut colors = [BLACK; N];
        for (i, color) in colors.iter_mut().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            let offset = (i * 256 / N) as u8;
            *color = hsv2rgb(Hsv {
                hue: start_hue.wrapping_add(offset),
                sat: saturation,
                val: value,
            });
        }
        Self { colors }
    }

    pub fn colors(&self) -> &[RGB8; N] {
        &self.colors
    }
}

fn lerp(a: u8, b: u8, t: u8) -> u8 {
    let t = u16::from(t);
    let mixed = (u16::from(a) * (255 - t) + u16::from(b) * t) / 255;
    u8::try_from(mixed).unwrap_or(u8::MAX)
}

/// Error raised while filling a [`PatternStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternError {
    /// A pattern is already assigned to this strip
    DuplicateStrip(StripId),
    /// The store holds [`MAX_STRIPS`] patterns already
    MaxStripsReached,
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternError::DuplicateStrip(id) => write!(f, "strip {} already has a pattern", id),
            PatternError::MaxStripsReached => write!(f, "maximum number of strips reached"),
        }
    }
}

/// Patterns keyed by strip, filled once at startup and read-only afterwards
#[derive(Debug, Default)]
pub struct PatternStore<const N: usize> {
    entries: Vec<(StripId, Pattern<N>), MAX_STRIPS>,
}

impl<const N: usize> PatternStore<N> {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Assign `pattern` to strip `id`
    pub fn insert(&mut self, id: StripId, pattern: Pattern<N>) -> Result<(), PatternError> {
        if self.get(id).is_some() {
            return Err(PatternError::DuplicateStrip(id));
        }
        self.entries
            .push((id, pattern))
            .map_err(|_| PatternError::MaxStripsReached)
    }

    /// Builder form of [`PatternStore::insert`]
    pub fn with(mut self, id: StripId, pattern: Pattern<N>) -> Result<Self, PatternError> {
        self.insert(id, pattern)?;
        Ok(self)
    }

    pub fn get(&self, id: StripId) -> Option<&Pattern<N>> {
        self.entries
            .iter()
            .find(|(entry_id, _)| *entry_id == id)
            .map(|(_, pattern)| pattern)
    }

    /// Strip ids in insertion order
    pub fn ids(&self) -> impl Iterator<Item = StripId> + '_ {
        self.entries.iter().map(|(id, _)| *id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
