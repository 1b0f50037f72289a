//! Scan Controller
//!
//! Sweeps the scan head across `[0, 2·range]` and takes one sample per step.
//!
//! The controller has two effective states, sweeping up (`direction = +1`,
//! starboard to port) and sweeping down (`direction = -1`). Which one is
//! active is decided at the top of every step from the current angle:
//!
//! | Condition | Bounce | OneWay |
//! |-----------|--------|--------|
//! | `angle >= 2·range` | clamp to `2·range`, direction -1 | angle 0, direction +1 |
//! | `angle <= 0` | clamp to 0, direction +1 | clamp to 0, direction +1 |
//!
//! A failed sensor read is stored as the maximum-range sentinel, so a single
//! bad sample never stalls the sweep.

use serde::Serialize;

use crate::config::{ScanConfig, SweepMode};
use crate::io::{Actuator, RangeSensor};
use crate::mapper::to_true_bearing;
use crate::table::BearingTable;
use crate::DistanceSample;

/// Position and direction of the sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScanState {
    /// Body-relative angle, always within `[0, 2·range]`
    pub angle: u16,
    /// +1 sweeping up, -1 sweeping down
    pub direction: i8,
    /// Step size in degrees
    pub interval: u16,
    /// Half-width of the arc in degrees
    pub range: u16,
}

impl ScanState {
    fn new(interval: u16, range: u16) -> Self {
        ScanState {
            angle: 0,
            direction: 1,
            interval,
            range,
        }
    }

    pub fn max_angle(&self) -> u16 {
        2 * self.range
    }
}

/// What one step did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepReport {
    /// Angle the head was moved to and sampled at
    pub angle: u16,
    /// True bearing the sample was stored under
    pub bearing: u16,
    /// Stored distance, the sentinel if the read failed
    pub distance: DistanceSample,
    /// Whether the sensor answered
    pub measured: bool,
    /// Whether this step started at a sweep bound
    pub turned: bool,
}

pub struct ScanController {
    state: ScanState,
    sweep_mode: SweepMode,
    config: ScanConfig,
}

impl ScanController {
    pub fn new(config: &ScanConfig) -> Self {
        ScanController {
            state: ScanState::new(config.interval, config.range),
            sweep_mode: config.sweep_mode,
            config: config.clone(),
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// True when the next step starts at one of the sweep bounds
    pub fn at_sweep_end(&self) -> bool {
        self.state.angle == 0 || self.state.angle >= self.state.max_angle()
    }

    /// Return to the starboard bound, sweeping up
    ///
    /// The actuator follows on the next step, which always starts by driving
    /// the head to the current angle.
    pub fn reset(&mut self) {
        self.state.angle = 0;
        self.state.direction = 1;
    }

    /// Perform one scan step and store the sample in `table`
    pub fn step<S: RangeSensor, A: Actuator>(
        &mut self,
        sensor: &mut S,
        actuator: &mut A,
        heading: u16,
        table: &mut BearingTable,
    ) -> StepReport {
        let turned = self.apply_bounds();

        actuator.set_angle(self.state.angle);

        let reading = sensor.measure();
        let distance = match reading {
            Some(raw) => self.config.normalize(raw),
            None => self.config.max_distance,
        };

        let bearing = to_true_bearing(self.state.angle, heading, self.state.range);
        table.write(bearing, distance);

        let report = StepReport {
            angle: self.state.angle,
            bearing,
            distance,
            measured: reading.is_some(),
            turned,
        };
        log::trace!("scan step {:?}", report);

        self.advance();
        report
    }

    fn apply_bounds(&mut self) -> bool {
        let max = self.state.max_angle();
        let mut turned = false;

        if self.state.angle >= max {
            match self.sweep_mode {
                SweepMode::Bounce => {
                    self.state.angle = max;
                    self.state.direction = -1;
                }
                SweepMode::OneWay => {
                    self.state.angle = 0;
                    self.state.direction = 1;
                }
            }
            turned = true;
        }

        if self.state.angle == 0 {
            self.state.direction = 1;
            turned = true;
        }

        turned
    }

    fn advance(&mut self) {
        let next = self.state.angle as i32 + self.state.direction as i32 * self.state.interval as i32;
        self.state.angle = next.clamp(0, self.state.max_angle() as i32) as u16;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSensor(Option<DistanceSample>);

    impl RangeSensor for FixedSensor {
        fn measure(&mut self) -> Option<DistanceSample> {
            self.0
        }
    }

    #[derive(Default)]
    struct RecordingServo(Vec<u16>);

    impl Actuator for RecordingServo {
        fn set_angle(&mut self, angle: u16) {
            self.0.push(angle);
        }
    }

    fn setup(config: &ScanConfig) -> (ScanController, BearingTable) {
        (ScanController::new(config), BearingTable::new(config.interval))
    }

    #[test]
    fn test_angle_stays_in_bounds_and_flips_at_ends() {
        let config = ScanConfig::default();
        let (mut scan, mut table) = setup(&config);
        let mut sensor = FixedSensor(Some(300));
        let mut servo = RecordingServo::default();

        let mut previous = scan.state();
        for _ in 0..1000 {
            let before = scan.state();
            scan.step(&mut sensor, &mut servo, 0, &mut table);
            let after = scan.state();
            assert!(after.angle <= 180);

            if after.direction != previous.direction {
                // Direction may only change at a bound
                assert!(before.angle == 0 || before.angle >= 180);
            }
            previous = after;
        }
        assert!(servo.0.iter().all(|&a| a <= 180));
        assert!(servo.0.contains(&0));
        assert!(servo.0.contains(&180));
    }

    #[test]
    fn test_bounce_sequence() {
        let config = ScanConfig {
            interval: 30,
            range: 45,
            ..Default::default()
        };
        let (mut scan, mut table) = setup(&config);
        let mut sensor = FixedSensor(Some(100));
        let mut servo = RecordingServo::default();

        for _ in 0..9 {
            scan.step(&mut sensor, &mut servo, 0, &mut table);
        }
        // 2·range = 90, reached by a clamped advance
        assert_eq!(servo.0, vec![0, 30, 60, 90, 60, 30, 0, 30, 60]);
    }

    #[test]
    fn test_odd_interval_clamps_to_bound() {
        let config = ScanConfig {
            interval: 40,
            range: 50,
            ..Default::default()
        };
        let (mut scan, mut table) = setup(&config);
        let mut sensor = FixedSensor(Some(100));
        let mut servo = RecordingServo::default();

        for _ in 0..8 {
            scan.step(&mut sensor, &mut servo, 0, &mut table);
        }
        assert_eq!(servo.0, vec![0, 40, 80, 100, 60, 20, 0, 40]);
    }

    #[test]
    fn test_one_way_sweep_restarts_at_zero() {
        let config = ScanConfig {
            interval: 30,
            range: 45,
            sweep_mode: SweepMode::OneWay,
            ..Default::default()
        };
        let (mut scan, mut table) = setup(&config);
        let mut sensor = FixedSensor(Some(100));
        let mut servo = RecordingServo::default();

        for _ in 0..8 {
            scan.step(&mut sensor, &mut servo, 0, &mut table);
            assert_eq!(scan.state().direction, 1);
        }
        assert_eq!(servo.0, vec![0, 30, 60, 0, 30, 60, 0, 30]);
    }

    #[test]
    fn test_failed_read_stores_sentinel() {
        let config = ScanConfig::default();
        let (mut scan, mut table) = setup(&config);
        let mut sensor = FixedSensor(None);
        let mut servo = RecordingServo::default();

        let report = scan.step(&mut sensor, &mut servo, 0, &mut table);
        assert!(!report.measured);
        assert_eq!(report.distance, config.max_distance);
        assert_eq!(report.bearing, 90);
        assert_eq!(table.get(45), Some(config.max_distance));
    }

    #[test]
    fn test_sample_lands_at_true_bearing() {
        let config = ScanConfig::default();
        let (mut scan, mut table) = setup(&config);
        let mut sensor = FixedSensor(Some(250));
        let mut servo = RecordingServo::default();

        // Heading 100: starboard bound looks at 190
        let report = scan.step(&mut sensor, &mut servo, 100, &mut table);
        assert_eq!(report.bearing, 190);
        assert!(report.turned);
        assert_eq!(table.get(95), Some(250));

        let report = scan.step(&mut sensor, &mut servo, 100, &mut table);
        assert_eq!(report.bearing, 188);
        assert!(!report.turned);
    }

    #[test]
    fn test_heading_change_overwrites_bucket() {
        let config = ScanConfig::default();
        let (mut scan, mut table) = setup(&config);
        let mut servo = RecordingServo::default();

        // angle 0 at heading 0 -> 90
        scan.step(&mut FixedSensor(Some(100)), &mut servo, 0, &mut table);
        // angle 2 at heading 2 -> 90 again, last write wins
        scan.step(&mut FixedSensor(Some(200)), &mut servo, 2, &mut table);
        assert_eq!(table.get(45), Some(200));
    }

    #[test]
    fn test_reset() {
        let config = ScanConfig::default();
        let (mut scan, mut table) = setup(&config);
        let mut sensor = FixedSensor(Some(100));
        let mut servo = RecordingServo::default();

        for _ in 0..120 {
            scan.step(&mut sensor, &mut servo, 0, &mut table);
        }
        assert_eq!(scan.state().direction, -1);

        scan.reset();
        assert_eq!(scan.state().angle, 0);
        assert_eq!(scan.state().direction, 1);
        assert!(scan.at_sweep_end());

        scan.step(&mut sensor, &mut servo, 0, &mut table);
        assert_eq!(servo.0.last(), Some(&0));
    }
}
