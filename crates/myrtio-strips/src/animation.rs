//! Animation engine
//!
//! One tick rotates every strip buffer left by one pixel and renders it.
//! All strips advance together, so after `N` ticks each buffer is back to
//! where it started.

use crate::driver::LedDriver;
use crate::state::DeviceState;

/// Advance every strip by one step and render it. No-op while disabled.
pub fn tick<D: LedDriver<N>, const N: usize>(state: &mut DeviceState<'_, D, N>) {
    if !state.is_enabled() {
        return;
    }
    for strip in state.strips_mut() {
        strip.rotate();
        strip.render();
    }
}

/// Write every buffer to its strip as it is
pub fn render_all<D: LedDriver<N>, const N: usize>(state: &mut DeviceState<'_, D, N>) {
    for strip in state.strips_mut() {
        strip.render();
    }
}
