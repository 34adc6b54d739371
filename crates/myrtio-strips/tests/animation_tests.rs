mod common;

use common::{BLACK_FRAME, LEN, RecordingDriver, device, four_patterns, numbered, rotated};
use myrtio_strips::{
    DeviceState, Pattern, PatternStore, RGB8, Switchable,
    animation::{render_all, tick},
};

/// Cyclic law for one strip of `N` pixels
fn assert_cyclic<const N: usize>(pattern: &Pattern<N>) {
    let mut state: DeviceState<'_, RecordingDriver<N>, N> = DeviceState::new();
    state.add_strip(0, pattern, RecordingDriver::new()).unwrap();
    state.switch_on();

    for k in 1..=3 {
        for _ in 0..N {
            tick(&mut state);
        }
        assert_eq!(
            state.strips()[0].buffer(),
            pattern.colors(),
            "{} rotations of length {}",
            k * N,
            N
        );
    }
}

#[test]
fn length_rotations_restore_every_buffer() {
    assert_cyclic(&Pattern::<1>::fill(RGB8::new(1, 2, 3)));
    assert_cyclic(&Pattern::<2>::dot(1, RGB8::new(9, 0, 0), RGB8::default()));
    assert_cyclic(&Pattern::<3>::new([
        RGB8::new(1, 0, 0),
        RGB8::new(2, 0, 0),
        RGB8::new(3, 0, 0),
    ]));
    assert_cyclic(&Pattern::<7>::rainbow(40, 255, 255));
    assert_cyclic(&Pattern::<LEN>::new(numbered()));
    assert_cyclic(&Pattern::<60>::gradient(RGB8::new(255, 0, 0), RGB8::new(0, 0, 255)));
}

#[test]
fn single_pixel_strip_is_a_fixed_point() {
    let pattern = Pattern::<1>::fill(RGB8::new(7, 7, 7));
    let mut state: DeviceState<'_, RecordingDriver<1>, 1> = DeviceState::new();
    state.add_strip(0, &pattern, RecordingDriver::new()).unwrap();
    state.switch_on();

    for _ in 0..5 {
        tick(&mut state);
        assert_eq!(state.strips()[0].buffer(), pattern.colors());
    }
}

#[test]
fn tick_moves_first_pixel_to_the_end() {
    let pattern = Pattern::new(numbered());
    let mut state: DeviceState<'_, RecordingDriver<LEN>, LEN> = DeviceState::new();
    state.add_strip(0, &pattern, RecordingDriver::new()).unwrap();
    state.switch_on();

    tick(&mut state);
    let buffer = state.strips()[0].buffer();
    assert_eq!(buffer[0], RGB8::new(2, 0, 0));
    assert_eq!(buffer[LEN - 1], RGB8::new(1, 0, 0));
    assert_eq!(state.strips()[0].driver().last(), Some(buffer));
}

#[test]
fn all_strips_advance_in_the_same_tick() {
    let store = four_patterns();
    let mut state = device(&store);
    state.switch_on();
    tick(&mut state);

    for strip in state.strips() {
        assert_eq!(*strip.buffer(), rotated(strip.pattern().colors(), 1));
        // one frame for switching on, one for the tick
        assert_eq!(strip.driver().frames.len(), 2);
    }
}

#[test]
fn tick_while_disabled_does_nothing() {
    let store = four_patterns();
    let mut state = device(&store);

    tick(&mut state);
    for strip in state.strips() {
        assert_eq!(strip.buffer(), &BLACK_FRAME);
        assert!(strip.driver().frames.is_empty());
    }
}

#[test]
fn render_all_writes_without_rotating() {
    let store = PatternStore::new()
        .with(5, Pattern::new(numbered()))
        .unwrap();
    let mut state = device(&store);
    state.switch_on();
    render_all(&mut state);

    let strip = state.strip(5).unwrap();
    assert_eq!(strip.driver().frames, [numbered(), numbered()]);
}
