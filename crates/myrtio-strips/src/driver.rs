//! LED output port
//!
//! The animation engine only needs to push one frame at a time to a strip;
//! hardware backends (RMT, SPI, a test recorder) implement [`LedDriver`].

use smart_leds::RGB8;

/// Output interface of a single strip of `N` pixels
pub trait LedDriver<const N: usize> {
    /// Write one full frame to the strip
    fn write(&mut self, colors: &[RGB8; N]);
}

impl<D: LedDriver<N> + ?Sized, const N: usize> LedDriver<N> for &mut D {
    fn write(&mut self, colors: &[RGB8; N]) {
        (**self).write(colors);
    }
}
