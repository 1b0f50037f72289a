//! Body-to-world angle conversion
//!
//! The scan head's angle is measured from the starboard end of the arc, so
//! the bow sits at `range`. Angles below `range` look to starboard (heading
//! plus offset), angles above it look to port (heading minus offset).

/// Normalize any angle in degrees into `[0, 360)`
pub fn wrap360(angle: i32) -> u16 {
    angle.rem_euclid(360) as u16
}

/// Convert a body-relative scan angle into a true bearing
///
/// # Arguments
/// * `body_angle` - Scan head angle, 0 at the starboard bound
/// * `heading` - Vessel heading in degrees (any value, wrapped)
/// * `range` - Half-width of the sweep arc
///
/// # Example
/// ```
/// use sensorboard_core::to_true_bearing;
/// assert_eq!(to_true_bearing(0, 0, 90), 90);
/// assert_eq!(to_true_bearing(180, 0, 90), 270);
/// ```
pub fn to_true_bearing(body_angle: u16, heading: u16, range: u16) -> u16 {
    let body_angle = body_angle as i32;
    let heading = heading as i32;
    let range = range as i32;

    if body_angle < range {
        wrap360(heading + (range - body_angle))
    } else if body_angle > range {
        wrap360(heading - (body_angle - range))
    } else {
        wrap360(heading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap360() {
        assert_eq!(wrap360(0), 0);
        assert_eq!(wrap360(359), 359);
        assert_eq!(wrap360(360), 0);
        assert_eq!(wrap360(-1), 359);
        assert_eq!(wrap360(-360), 0);
        assert_eq!(wrap360(-721), 359);
        assert_eq!(wrap360(1085), 5);
    }

    #[test]
    fn test_wrap360_periodic() {
        for x in -1000..1000 {
            for k in -3..=3 {
                assert_eq!(wrap360(x), wrap360(x + 360 * k), "x={} k={}", x, k);
            }
        }
    }

    #[test]
    fn test_true_bearing_heading_north() {
        assert_eq!(to_true_bearing(0, 0, 90), 90);
        assert_eq!(to_true_bearing(90, 0, 90), 0);
        assert_eq!(to_true_bearing(180, 0, 90), 270);
        assert_eq!(to_true_bearing(45, 0, 90), 45);
        assert_eq!(to_true_bearing(135, 0, 90), 315);
    }

    #[test]
    fn test_true_bearing_wraps_past_north() {
        // Heading 350, starboard bound looks at 80
        assert_eq!(to_true_bearing(0, 350, 90), 80);
        // Heading 10, port bound looks at 280
        assert_eq!(to_true_bearing(180, 10, 90), 280);
        assert_eq!(to_true_bearing(90, 10, 90), 10);
    }

    #[test]
    fn test_true_bearing_unwrapped_heading() {
        // Headings outside [0, 360) are accepted as sent
        assert_eq!(to_true_bearing(90, 370, 90), 10);
        assert_eq!(to_true_bearing(0, 720, 90), 90);
    }

    #[test]
    fn test_true_bearing_narrow_arc() {
        assert_eq!(to_true_bearing(0, 180, 30), 210);
        assert_eq!(to_true_bearing(30, 180, 30), 180);
        assert_eq!(to_true_bearing(60, 180, 30), 150);
    }
}
