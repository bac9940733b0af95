// Integration tests sweeping the sample functions over volumes, periods and phases

use tickwave::gen::waveform::{
    detuned_period, sawtooth, sine, square, test as test_tone, triangle, Waveform,
    MAX_SINE_VOLUME, MAX_SINE_VOLUME_PERIOD,
};

const VOLUMES: [u16; 8] = [0, 1, 3, 100, 1000, 8000, 20000, 30000];
const PERIODS: [u16; 11] = [2, 3, 5, 7, 10, 64, 100, 101, 441, 1000, 5000];

/// Phases covering two cycles, thinned out for long periods
fn phases(period: u16) -> impl Iterator<Item = u32> {
    let period = u32::from(period);
    (0..2 * period).step_by((period / 200).max(1) as usize)
}

#[test]
fn test_sawtooth_stays_in_range() {
    for volume in VOLUMES {
        let half = i32::from(volume / 2);
        for period in PERIODS {
            for phase in phases(period) {
                let s = i32::from(sawtooth(volume, period, phase));
                assert!(
                    (-half..=half).contains(&s),
                    "sawtooth({volume}, {period}, {phase}) = {s}"
                );
            }
        }
    }
}

#[test]
fn test_triangle_stays_in_range() {
    for volume in VOLUMES {
        let half = i32::from(volume / 2);
        for period in PERIODS {
            // odd periods can overshoot by one ramp step at the peak
            let slack = i32::from(volume) / i32::from(period) + 1;
            for phase in phases(period) {
                let s = i32::from(triangle(volume, period, phase));
                assert!(
                    (-half..=half + slack).contains(&s),
                    "triangle({volume}, {period}, {phase}) = {s}"
                );
            }
        }
    }
}

#[test]
fn test_square_takes_two_levels() {
    for volume in VOLUMES {
        let level = (volume / 4) as i16;
        for period in PERIODS {
            for phase in phases(period) {
                let s = square(volume, period, phase);
                assert!(
                    s == level || s == -level,
                    "square({volume}, {period}, {phase}) = {s}"
                );
            }
        }
    }
}

#[test]
fn test_sine_stays_near_volume() {
    for volume in VOLUMES {
        let limit = i32::from(volume) + 3;
        for period in PERIODS {
            for phase in phases(period) {
                let s = i32::from(sine(volume, period, phase));
                assert!(s.abs() <= limit, "sine({volume}, {period}, {phase}) = {s}");
            }
        }
    }
}

/// Largest volume a tone accepts for a sine at `period`
fn loudest_at(period: u16) -> u16 {
    let by_product = MAX_SINE_VOLUME_PERIOD / u32::from(period);
    MAX_SINE_VOLUME.min(u16::try_from(by_product).unwrap_or(u16::MAX))
}

#[test]
fn test_sine_full_cycle_at_max_volume() {
    let limit = i32::from(MAX_SINE_VOLUME) + 3;
    let longest = (MAX_SINE_VOLUME_PERIOD / u32::from(MAX_SINE_VOLUME)) as u16;
    for period in [2, 3, 4, 5, 7, 100, 101, 1000, longest - 1, longest] {
        assert_eq!(loudest_at(period), MAX_SINE_VOLUME);
        for phase in 0..u32::from(period) {
            let s = i32::from(sine(MAX_SINE_VOLUME, period, phase));
            assert!(s.abs() <= limit, "sine(max, {period}, {phase}) = {s}");
        }
    }
}

#[test]
fn test_sine_full_cycle_at_product_limit() {
    for period in [9156u16, 12000, 20000, 40000, u16::MAX] {
        let volume = loudest_at(period);
        assert!(u32::from(volume) * u32::from(period) <= MAX_SINE_VOLUME_PERIOD);
        let limit = i32::from(volume) + 3;
        let mut peak = 0;
        for phase in 0..u32::from(period) {
            let s = i32::from(sine(volume, period, phase));
            assert!(s.abs() <= limit, "sine({volume}, {period}, {phase}) = {s}");
            peak = peak.max(s.abs());
        }
        assert!(peak >= i32::from(volume), "peak {peak} below {volume}");
    }
}

#[test]
fn test_test_tone_at_product_limit() {
    // the modulator runs at the longer, detuned period
    for period in [5000u16, 20000, 46810] {
        let volume = loudest_at(period.max(detuned_period(period)));
        let limit = i32::from(volume) + 3;
        for phase in 0..u32::from(period) {
            let s = i32::from(test_tone(volume, period, phase));
            assert!(s.abs() <= limit, "test({volume}, {period}, {phase}) = {s}");
        }
    }
}

#[test]
fn test_periodic_in_phase() {
    for waveform in [
        Waveform::Sawtooth,
        Waveform::Triangle,
        Waveform::Square,
        Waveform::Sine,
    ] {
        for volume in VOLUMES {
            for period in PERIODS {
                for phase in phases(period) {
                    assert_eq!(
                        waveform.sample(volume, period, phase),
                        waveform.sample(volume, period, phase + u32::from(period)),
                        "{waveform}({volume}, {period}, {phase})"
                    );
                }
            }
        }
    }
}

#[test]
fn test_periodic_at_phase_counter_wrap() {
    // 2^32 is a multiple of 64, so the wrap lands on a cycle boundary
    let period = 64u16;
    for offset in 0..u32::from(period) {
        let before = u32::MAX - u32::from(period) + 1 + offset;
        assert_eq!(sine(1000, period, before), sine(1000, period, offset));
        assert_eq!(triangle(1000, period, before), triangle(1000, period, offset));
    }
}

#[test]
fn test_test_tone_repeats_over_joint_cycle() {
    // with period divisible by 5 the modulator period is 7/5 of it, so both
    // sines line up again after 7 periods
    for volume in VOLUMES {
        for period in PERIODS.into_iter().filter(|p| p % 5 == 0) {
            let cycle = 7 * u32::from(period);
            // start past `volume` so `phase + wobble` never wraps below 0
            let start = u32::from(volume);
            for phase in (start..start + cycle.min(1400)).step_by(3) {
                let s = test_tone(volume, period, phase);
                assert_eq!(s, test_tone(volume, period, phase + cycle));
                assert!(i32::from(s).abs() <= i32::from(volume) + 3);
            }
        }
    }
}

#[test]
fn test_sine_half_period_symmetry() {
    for volume in VOLUMES {
        for period in PERIODS {
            let half = u32::from(period / 2);
            // an odd period puts the mirror point half a tick early
            let tolerance = if period % 2 == 0 {
                0
            } else {
                7 * i32::from(volume) / i32::from(period) + 2
            };
            for phase in phases(period) {
                let a = i32::from(sine(volume, period, phase));
                let b = i32::from(sine(volume, period, phase + half));
                assert!(
                    (a + b).abs() <= tolerance,
                    "sine({volume}, {period}, {phase}) = {a}, half a period later {b}"
                );
            }
        }
    }
}

#[test]
fn test_sine_peak_close_to_volume() {
    for volume in [1000u16, 8000, 20000, 30000] {
        for period in [100u16, 400, 1000, 5000] {
            let peak = i32::from(sine(volume, period, u32::from(period / 4)));
            let error = (peak - i32::from(volume)).abs();
            assert!(
                error <= i32::from(volume) / 20,
                "peak {peak} too far from {volume} at period {period}"
            );
            assert_eq!(sine(volume, period, 0), 0);
        }
    }
}

#[test]
fn test_triangle_continuous_at_peak() {
    for volume in VOLUMES {
        for period in PERIODS {
            let step = 2 * i32::from(volume) / i32::from(period) + 1;
            let half = u32::from(period / 2);
            for x in half.saturating_sub(1)..=half {
                let jump = i32::from(triangle(volume, period, x + 1))
                    - i32::from(triangle(volume, period, x));
                assert!(
                    jump.abs() <= 2 * step,
                    "triangle({volume}, {period}) jumps {jump} at {x}"
                );
            }
        }
    }
}

#[test]
fn test_reference_values() {
    assert_eq!(square(1000, 100, 10), 250);
    assert_eq!(square(1000, 100, 60), -250);
    assert_eq!(sawtooth(1000, 100, 25), -250);
    assert_eq!(triangle(2000, 200, 50), 0);
    assert_eq!(sine(2000, 100, 1), 125);
    assert_eq!(sine(2000, 100, 4), 492);
}

#[test]
#[should_panic]
fn test_sawtooth_zero_period_panics() {
    sawtooth(1000, 0, 1);
}

#[test]
#[should_panic]
fn test_triangle_zero_period_panics() {
    triangle(1000, 0, 1);
}

#[test]
#[should_panic]
fn test_square_zero_period_panics() {
    square(1000, 0, 1);
}

#[test]
#[should_panic]
fn test_test_tone_zero_period_panics() {
    test_tone(1000, 0, 1);
}
