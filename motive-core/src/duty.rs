//! Duty-cycle calculation
//!
//! Maps a requested logical speed to the duty value put on the wire:
//!
//! 1. Clamp the request to 0-255.
//! 2. Requests below the motor's threshold are written as 0. The threshold
//!    is evaluated here, at write time, never when the speed is recorded.
//! 3. Inverting drivers get `255 - duty` while the direction line is high.
//!
//! An inverting driver's "off" level is logical full power, so a stop on an
//! inverted motor held forward writes 255 and a stop held in reverse
//! writes 0.

/// Speed used when none was ever requested
pub const DEFAULT_SPEED: u8 = 128;

/// Full duty (and the brake hold level)
pub const MAX_DUTY: u8 = 255;

/// Clamp a requested speed into the 8-bit duty range
pub fn clamp_speed(requested: i32) -> u8 {
    requested.clamp(0, MAX_DUTY as i32) as u8
}

/// Apply the threshold to a requested speed
///
/// Returns 0 when the clamped request is below `threshold`.
pub fn effective_duty(requested: i32, threshold: u8) -> u8 {
    let speed = clamp_speed(requested);
    if speed < threshold {
        0
    } else {
        speed
    }
}

/// Compute the wire-level duty for a request
///
/// # Arguments
/// * `requested` - Logical speed, clamped to 0-255
/// * `threshold` - Minimum effective duty
/// * `invert_pwm` - Driver inverts PWM while its direction line is high
/// * `assert_high` - Direction line is currently asserted high
pub fn compute_duty(requested: i32, threshold: u8, invert_pwm: bool, assert_high: bool) -> u8 {
    let effective = effective_duty(requested, threshold);
    if invert_pwm && assert_high {
        MAX_DUTY - effective
    } else {
        effective
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_clamp() {
        assert_eq!(clamp_speed(-20), 0);
        assert_eq!(clamp_speed(0), 0);
        assert_eq!(clamp_speed(128), 128);
        assert_eq!(clamp_speed(300), 255);
    }

    #[test]
    fn test_threshold_suppresses_low_speed() {
        assert_eq!(compute_duty(20, 30, false, true), 0);
        assert_eq!(compute_duty(40, 30, false, true), 40);
        assert_eq!(compute_duty(30, 30, false, true), 30);
    }

    #[test]
    fn test_inverted_forward() {
        assert_eq!(compute_duty(255, 0, true, true), 0);
        assert_eq!(compute_duty(180, 0, true, true), 75);
        // Stop while held forward
        assert_eq!(compute_duty(0, 0, true, true), 255);
    }

    #[test]
    fn test_inverted_reverse_is_not_inverted() {
        assert_eq!(compute_duty(180, 0, true, false), 180);
        assert_eq!(compute_duty(0, 0, true, false), 0);
    }

    #[test]
    fn test_inverted_below_threshold_writes_full() {
        assert_eq!(compute_duty(20, 30, true, true), 255);
    }

    proptest! {
        #[test]
        fn prop_threshold_law(speed in 0u8..=255, threshold in 0u8..=255) {
            let duty = compute_duty(speed as i32, threshold, false, true);
            if speed < threshold {
                prop_assert_eq!(duty, 0);
            } else {
                prop_assert_eq!(duty, speed);
            }
        }

        #[test]
        fn prop_inversion_law(speed in 0u8..=255) {
            prop_assert_eq!(compute_duty(speed as i32, 0, true, true), 255 - speed);
            prop_assert_eq!(compute_duty(speed as i32, 0, true, false), speed);
        }

        #[test]
        fn prop_any_request_is_clamped(requested in any::<i32>(), threshold in 0u8..=255) {
            let duty = compute_duty(requested, threshold, false, false);
            prop_assert_eq!(duty, effective_duty(clamp_speed(requested) as i32, threshold));
        }
    }
}
