use approx::assert_relative_eq;
use embassy_futures::block_on;
use embassy_time::Duration;
use imu_orientation::{
    clock::ManualClock, config::EstimatorConfig, ImuSource, Orientation, OrientationEstimator,
    SensorSample,
};
use nalgebra::Vector3;
use rstest::{fixture, rstest};

const TICK: Duration = Duration::from_millis(10);
const TICK_SECS: f32 = 0.01;

const LEVEL: Vector3<f32> = Vector3::new(0.0, 0.0, 1.0);
const STILL: Vector3<f32> = Vector3::new(0.0, 0.0, 0.0);

#[fixture]
fn clock() -> ManualClock {
    ManualClock::new(0)
}

fn estimator(clock: &ManualClock) -> OrientationEstimator<&ManualClock> {
    OrientationEstimator::new(clock, EstimatorConfig::default())
}

fn run(
    estimator: &mut OrientationEstimator<&ManualClock>,
    clock: &ManualClock,
    ticks: usize,
    sample: SensorSample,
) -> Orientation {
    for _ in 0..ticks {
        clock.advance(TICK);
        estimator.update(&sample);
    }
    estimator.orientation()
}

fn both(accel: Vector3<f32>, gyro: Vector3<f32>) -> SensorSample {
    SensorSample::new(Some(accel), Some(gyro))
}

fn gyro_only(gyro: Vector3<f32>) -> SensorSample {
    SensorSample::new(None, Some(gyro))
}

/// Sum of the low-pass output over `n` ticks of a constant `rate`, times dt
fn filtered_integral(rate: f32, n: i32) -> f32 {
    let alpha = 0.1f32;
    let kept = 1.0 - alpha;
    let sum = n as f32 - kept * (1.0 - kept.powi(n)) / alpha;
    rate * sum * TICK_SECS
}

#[rstest]
fn stationary_level_sensor_settles_at_zero(clock: ManualClock) {
    let mut estimator = estimator(&clock);

    // Tip forward, then hold still and level
    run(&mut estimator, &clock, 50, both(LEVEL, Vector3::new(40.0, -25.0, 0.0)));
    let tipped = estimator.orientation();
    assert!(tipped.pitch > 1.0);
    assert!(tipped.roll < -1.0);

    let settled = run(&mut estimator, &clock, 2_000, both(LEVEL, STILL));
    assert_relative_eq!(settled.pitch, 0.0, epsilon = 1e-3);
    assert_relative_eq!(settled.roll, 0.0, epsilon = 1e-3);
    assert_eq!(settled.yaw, 0.0);

    let later = run(&mut estimator, &clock, 500, both(LEVEL, STILL));
    assert_relative_eq!(later.pitch, 0.0, epsilon = 1e-3);
    assert_relative_eq!(later.roll, 0.0, epsilon = 1e-3);
    assert_eq!(later.yaw, 0.0);
}

#[rstest]
fn calibrate_zeroes_orientation(clock: ManualClock) {
    let mut estimator = estimator(&clock);
    let moving = both(Vector3::new(0.3, 0.4, 0.8), Vector3::new(5.0, 12.0, -30.0));
    run(&mut estimator, &clock, 300, moving);
    assert_ne!(estimator.orientation(), Orientation::ZERO);

    estimator.calibrate();

    assert_eq!(estimator.orientation(), Orientation::new(0.0, 0.0, 0.0));
    assert_eq!(estimator.filtered_gyro(), Vector3::zeros());
}

#[rstest]
fn calibrate_folds_last_sample_into_bias(clock: ManualClock) {
    let mut estimator = estimator(&clock);
    let gyro_bias = Vector3::new(0.5, -0.25, 1.0);
    run(&mut estimator, &clock, 10, both(LEVEL, gyro_bias));

    estimator.calibrate();
    assert_eq!(estimator.bias().gyro_offset(), gyro_bias);
    assert_eq!(estimator.bias().accel_offset(), LEVEL);

    // Same reading again: fully cancelled, nothing moves
    let after = run(&mut estimator, &clock, 100, both(LEVEL, gyro_bias));
    assert_eq!(estimator.last_sample().gyro, Vector3::zeros());
    assert_eq!(after, Orientation::ZERO);

    // Stationary repeat keeps the offsets where they are
    estimator.calibrate();
    assert_eq!(estimator.bias().gyro_offset(), gyro_bias);
}

#[rstest]
fn first_tick_after_calibrate_integrates_from_calibration(clock: ManualClock) {
    let mut estimator = estimator(&clock);
    clock.advance(Duration::from_secs(5));
    estimator.calibrate();

    clock.advance(Duration::from_millis(100));
    estimator.update(&gyro_only(Vector3::new(0.0, 0.0, 100.0)));

    // 0.1 * 100 deg/s filtered rate over 0.1 s
    assert_relative_eq!(estimator.orientation().yaw, 1.0, epsilon = 1e-5);
}

#[rstest]
#[case(Vector3::new(10.0, 0.0, 0.0), 100)]
#[case(Vector3::new(-3.0, 7.5, 45.0), 250)]
fn gyro_only_matches_filtered_integral(
    clock: ManualClock,
    #[case] rate: Vector3<f32>,
    #[case] ticks: i32,
) {
    let mut estimator = estimator(&clock);
    let out = run(&mut estimator, &clock, ticks as usize, gyro_only(rate));

    assert_relative_eq!(out.pitch, filtered_integral(rate.x, ticks), max_relative = 1e-4);
    assert_relative_eq!(out.roll, filtered_integral(rate.y, ticks), max_relative = 1e-4);
    assert_relative_eq!(out.yaw, filtered_integral(rate.z, ticks), max_relative = 1e-4);
}

#[rstest]
fn failed_accel_read_holds_pitch_and_roll(clock: ManualClock) {
    let mut estimator = estimator(&clock);
    let tilted = Vector3::new(-0.5, 0.5, 0.707);
    let spin = Vector3::new(0.0, 0.0, 20.0);

    let before = run(&mut estimator, &clock, 100, both(tilted, spin));
    assert!(before.pitch > 1.0);
    assert!(before.roll > 1.0);

    let after = run(&mut estimator, &clock, 1, gyro_only(spin));

    assert_eq!(after.pitch, before.pitch);
    assert_eq!(after.roll, before.roll);
    assert!(after.yaw > before.yaw);
    assert!(!estimator.last_sample().accel_ok);
    assert_eq!(estimator.last_sample().accel, Vector3::zeros());
}

#[rstest]
fn failed_gyro_read_skips_the_whole_tick(clock: ManualClock) {
    let mut estimator = estimator(&clock);
    let rate = Vector3::new(0.0, 0.0, 50.0);
    let before = run(&mut estimator, &clock, 20, both(LEVEL, rate));
    let filtered = estimator.filtered_gyro();

    // Accel reads tilted, but without gyro nothing is blended either
    let accel_only = SensorSample::new(Some(Vector3::new(0.0, 1.0, 0.0)), None);
    let held = run(&mut estimator, &clock, 10, accel_only);
    assert_eq!(held, before);
    assert_eq!(estimator.filtered_gyro(), filtered);

    // Next good read integrates across the gap
    clock.advance(TICK);
    let resumed = estimator.update(&gyro_only(rate));
    let rate_now = estimator.filtered_gyro().z;
    assert_relative_eq!(resumed.yaw, before.yaw + rate_now * 11.0 * TICK_SECS, epsilon = 1e-3);
}

#[rstest]
fn yaw_drifts_under_constant_gyro_bias(clock: ManualClock) {
    let mut estimator = estimator(&clock);
    let bias = Vector3::new(0.0, 0.0, 0.5);

    let mut previous = estimator.orientation().yaw;
    for _ in 0..1_000 {
        clock.advance(TICK);
        let out = estimator.update(&both(LEVEL, bias));
        assert!(out.yaw > previous);
        assert_relative_eq!(out.pitch, 0.0);
        assert_relative_eq!(out.roll, 0.0);
        previous = out.yaw;
    }

    // Roughly 0.5 deg/s for 10 s, minus the filter's ramp up
    assert!(previous > 4.5 && previous < 5.0, "yaw: {previous}");
}

#[rstest]
fn large_angles_are_not_wrapped(clock: ManualClock) {
    let mut estimator = estimator(&clock);
    let out = run(&mut estimator, &clock, 500, gyro_only(Vector3::new(0.0, 0.0, 360.0)));
    assert!(out.yaw > 360.0);
}

struct Scripted {
    samples: Vec<(Option<Vector3<f32>>, Option<Vector3<f32>>)>,
}

impl ImuSource for Scripted {
    type Error = &'static str;

    async fn read_accel(&mut self) -> Result<Vector3<f32>, Self::Error> {
        self.samples[0].0.ok_or("accel nack")
    }

    async fn read_gyro(&mut self) -> Result<Vector3<f32>, Self::Error> {
        let (_, gyro) = self.samples.remove(0);
        gyro.ok_or("gyro nack")
    }
}

#[rstest]
fn tick_pulls_from_source(clock: ManualClock) {
    let mut estimator = estimator(&clock);
    let mut source = Scripted {
        samples: vec![
            (Some(LEVEL), Some(Vector3::new(0.0, 0.0, 10.0))),
            (None, None),
            (None, Some(Vector3::new(0.0, 0.0, 10.0))),
        ],
    };

    clock.advance(TICK);
    let first = block_on(estimator.tick(&mut source));
    assert!(estimator.last_sample().accel_ok && estimator.last_sample().gyro_ok);
    assert_relative_eq!(first.yaw, 0.01, epsilon = 1e-6);

    clock.advance(TICK);
    let second = block_on(estimator.tick(&mut source));
    assert_eq!(second, first);
    assert!(!estimator.last_sample().gyro_ok);

    clock.advance(TICK);
    block_on(estimator.tick(&mut source));
    assert!(!estimator.last_sample().accel_ok);
    assert!(estimator.orientation().yaw > first.yaw);
}
