use super::*;

#[test]
fn dash_offset_is_time_over_18_mod_42() {
    for t in [0.0, 17.0, 18.0, 755.0, 756.0, 10_000.0, 123_456.789] {
        let expected = (t / 18.0) % 42.0;
        assert_eq!(dash_offset(t), expected);
        assert!((0.0..42.0).contains(&dash_offset(t)));
    }
    assert!((dash_offset(42.0 * 18.0)).abs() < 1e-9);
}

#[test]
fn wheel_rotation_uses_per_wheel_rates() {
    let t = 5_000.0;
    assert_eq!(wheel_rotation_deg(t, Wheel::Rear), (t / 260.0 * 1.1) % 360.0);
    assert_eq!(wheel_rotation_deg(t, Wheel::Front), (t / 260.0 * 1.25) % 360.0);
    assert_ne!(
        wheel_rotation_deg(t, Wheel::Rear),
        wheel_rotation_deg(t, Wheel::Front)
    );

    let long = 3_600_000.0;
    for wheel in Wheel::ALL {
        let r = wheel_rotation_deg(long, wheel);
        assert!((0.0..360.0).contains(&r), "{wheel:?} rotation {r}");
    }
}

#[test]
fn wheels_sit_either_side_of_the_body() {
    assert_eq!(Wheel::ALL, [Wheel::Rear, Wheel::Front]);
    assert_eq!(Wheel::Rear.offset_x(), -120.0);
    assert_eq!(Wheel::Front.offset_x(), 120.0);
}

#[test]
fn body_offsets_stay_within_amplitude() {
    for i in 0..2_000 {
        let t = i as f64 * 7.3;
        assert!(bounce(t).abs() <= 4.0);
        assert!(drift(t).abs() <= 8.0);
        assert!(lungi_sway(t).abs() <= 10.0);
    }
    assert_eq!(rickshaw_origin(0.0), (960.0 * 0.42, 540.0 * 0.62));
}

#[test]
fn foreground_steps_by_fixed_amount_and_wraps() {
    let mut scroll = 0.0;
    let mut wrapped = false;
    for _ in 0..5_000 {
        let next = step_foreground(scroll);
        assert_eq!(next, (scroll - 0.8) % 960.0);
        assert!(next <= 0.0 && next > -960.0, "scroll {next}");
        wrapped |= next > scroll;
        scroll = next;
    }
    assert!(wrapped);
}

#[test]
fn pebbles_tile_across_the_width() {
    assert_eq!(pebble_x(0, 0.0), -60.0);
    assert_eq!(pebble_x(3, 0.0), 300.0);
    // Wrapping keeps every pebble centre in (-W - 180, W + 60).
    for i in 0..PEBBLES {
        for s in [0.0, -1.6, -480.0, -959.2] {
            let x = pebble_x(i, s);
            assert!(x > -960.0 - 180.0 && x < 960.0 + 60.0, "pebble {i} at {x}");
        }
    }
    assert_eq!(pebble_y(0), 540.0 * 0.83);
}

#[test]
fn fog_center_wraps_offset() {
    assert_eq!(fog_center_x(0.0), -100.0);
    assert_eq!(fog_center_x(1_160.0), -100.0);
    assert_eq!(fog_center_x(500.0), 400.0);
}
