//! Device state: the enabled flag and the per-strip color buffers

use core::fmt;

use heapless::Vec;
use smart_leds::RGB8;

use crate::driver::LedDriver;
use crate::pattern::{BLACK, MAX_STRIPS, Pattern, PatternStore, StripId};

/// Error raised while assembling a [`DeviceState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateError {
    /// No pattern is stored for the strip
    UnknownStrip(StripId),
    /// The strip was added twice
    DuplicateStrip(StripId),
    /// [`MAX_STRIPS`] strips are attached already
    MaxStripsReached,
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateError::UnknownStrip(id) => write!(f, "no pattern for strip {}", id),
            StateError::DuplicateStrip(id) => write!(f, "strip {} added twice", id),
            StateError::MaxStripsReached => write!(f, "maximum number of strips reached"),
        }
    }
}

/// One physical strip: its current buffer, assigned pattern and output
pub struct Strip<'p, D, const N: usize> {
    id: StripId,
    buffer: [RGB8; N],
    pattern: &'p Pattern<N>,
    driver: D,
}

impl<'p, D: LedDriver<N>, const N: usize> Strip<'p, D, N> {
    fn new(id: StripId, pattern: &'p Pattern<N>, driver: D) -> Self {
        Self {
            id,
            buffer: [BLACK; N],
            pattern,
            driver,
        }
    }

    pub fn id(&self) -> StripId {
        self.id
    }

    pub fn buffer(&self) -> &[RGB8; N] {
        &self.buffer
    }

    pub fn pattern(&self) -> &'p Pattern<N> {
        self.pattern
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub(crate) fn reset(&mut self) {
        self.buffer = *self.pattern.colors();
    }

    pub(crate) fn clear(&mut self) {
        self.buffer = [BLACK; N];
    }

    /// Circular left shift by one pixel
    pub(crate) fn rotate(&mut self) {
        self.buffer.rotate_left(usize::from(N > 0));
    }

    pub(crate) fn render(&mut self) {
        self.driver.write(&self.buffer);
    }
}

/// The single mutable record of the controller
///
/// While disabled every strip buffer is black; enabling resets each buffer
/// to its pattern.
pub struct DeviceState<'p, D, const N: usize> {
    enabled: bool,
    strips: Vec<Strip<'p, D, N>, MAX_STRIPS>,
}

impl<'p, D: LedDriver<N>, const N: usize> DeviceState<'p, D, N> {
    /// A disabled device with no strips
    pub const fn new() -> Self {
        Self {
            enabled: false,
            strips: Vec::new(),
        }
    }

    /// Attach one strip per `(id, driver)` pair, taking patterns from `store`
    pub fn from_store<I>(store: &'p PatternStore<N>, drivers: I) -> Result<Self, StateError>
    where
        I: IntoIterator<Item = (StripId, D)>,
    {
        let mut state = Self::new();
        for (id, driver) in drivers {
            let pattern = store.get(id).ok_or(StateError::UnknownStrip(id))?;
            state.add_strip(id, pattern, driver)?;
        }
        Ok(state)
    }

    pub fn add_strip(
        &mut self,
        id: StripId,
        pattern: &'p Pattern<N>,
        driver: D,
    ) -> Result<(), StateError> {
        if self.strip(id).is_some() {
            return Err(StateError::DuplicateStrip(id));
        }
        let mut strip = Strip::new(id, pattern, driver);
        if self.enabled {
            strip.reset();
        }
        self.strips
            .push(strip)
            .map_err(|_| StateError::MaxStripsReached)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn strips(&self) -> &[Strip<'p, D, N>] {
        &self.strips
    }

    pub fn strip(&self, id: StripId) -> Option<&Strip<'p, D, N>> {
        self.strips.iter().find(|strip| strip.id == id)
    }

    pub(crate) fn strips_mut(&mut self) -> &mut [Strip<'p, D, N>] {
        &mut self.strips
    }

    /// Enable and copy every pattern into its buffer
    pub(crate) fn enable(&mut self) {
        self.enabled = true;
        self.reset_to_patterns();
    }

    /// Disable and blank every buffer
    pub(crate) fn disable(&mut self) {
        self.enabled = false;
        self.clear();
    }

    pub(crate) fn reset_to_patterns(&mut self) {
        for strip in &mut self.strips {
            strip.reset();
        }
    }

    /// Blank every buffer without touching the enabled flag
    pub(crate) fn clear(&mut self) {
        for strip in &mut self.strips {
            strip.clear();
        }
    }
}

impl<D: LedDriver<N>, const N: usize> Default for DeviceState<'_, D, N> {
    fn default() -> Self {
        Self::new()
    }
}
