use skein::freeze::Axis;
use skein::{FreezeDetector, FreezeOptions, Phase, SimulationHost};
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct RecordingHost {
    disable_calls: usize,
    enable_calls: usize,
}

impl SimulationHost for RecordingHost {
    fn set_layout_enabled(&mut self, enabled: bool) {
        if enabled {
            self.enable_calls += 1;
        } else {
            self.disable_calls += 1;
        }
    }
}

const NODES: usize = 5;

fn sweep(detector: &mut FreezeDetector, positions: &mut [(f64, f64)], deltas: &[(f64, f64)]) {
    for (slot, (pos, delta)) in positions.iter_mut().zip(deltas).enumerate() {
        let nx = pos.0 + delta.0;
        let ny = pos.1 + delta.1;
        pos.0 = detector.propose(slot, Axis::X, pos.0, nx);
        pos.1 = detector.propose(slot, Axis::Y, pos.1, ny);
    }
}

fn spread_positions() -> Vec<(f64, f64)> {
    (0..NODES).map(|i| (i as f64 * 50.0, i as f64 * 25.0)).collect()
}

#[test]
fn stationary_simulation_freezes_exactly_once_after_the_grace_period() {
    let mut detector = FreezeDetector::new(FreezeOptions {
        grace: Duration::from_millis(2000),
        ..Default::default()
    });
    let mut host = RecordingHost::default();
    let mut positions = spread_positions();
    let still = vec![(0.0, 0.0); NODES];
    let t0 = Instant::now();

    assert_eq!(detector.phase(), Phase::Tracking);

    sweep(&mut detector, &mut positions, &still);
    detector.sweep_complete(t0, &mut host);
    assert_eq!(detector.phase(), Phase::ConvergedWaiting);
    assert_eq!(host.disable_calls, 0);

    sweep(&mut detector, &mut positions, &still);
    detector.sweep_complete(t0 + Duration::from_millis(1000), &mut host);
    assert_eq!(detector.phase(), Phase::ConvergedWaiting, "grace still running");
    assert_eq!(host.disable_calls, 0);

    sweep(&mut detector, &mut positions, &still);
    detector.sweep_complete(t0 + Duration::from_millis(2500), &mut host);
    assert_eq!(detector.phase(), Phase::Frozen);
    assert_eq!(host.disable_calls, 1);

    // The host paused its loop, so boundaries with no updates change nothing.
    detector.sweep_complete(t0 + Duration::from_millis(3000), &mut host);
    detector.sweep_complete(t0 + Duration::from_millis(9000), &mut host);
    assert_eq!(host.disable_calls, 1, "stop signal must fire exactly once");
}

#[test]
fn a_drag_during_the_grace_period_prevents_freezing() {
    let mut detector = FreezeDetector::new(FreezeOptions {
        grace: Duration::from_millis(2000),
        ..Default::default()
    });
    let mut host = RecordingHost::default();
    let mut positions = spread_positions();
    let still = vec![(0.0, 0.0); NODES];
    let t0 = Instant::now();

    sweep(&mut detector, &mut positions, &still);
    detector.sweep_complete(t0, &mut host);
    assert_eq!(detector.phase(), Phase::ConvergedWaiting);

    // User drags node 0 a long way before the grace deadline.
    let mut dragged = vec![(0.0, 0.0); NODES];
    dragged[0] = (300.0, 140.0);
    sweep(&mut detector, &mut positions, &dragged);
    detector.sweep_complete(t0 + Duration::from_millis(500), &mut host);
    assert_eq!(detector.phase(), Phase::Tracking, "drag resets tracking");

    // Even long after the original deadline, quiet sweeps restart the grace period
    // instead of freezing immediately.
    sweep(&mut detector, &mut positions, &still);
    detector.sweep_complete(t0 + Duration::from_millis(4000), &mut host);
    assert_eq!(detector.phase(), Phase::ConvergedWaiting);
    assert_eq!(host.disable_calls, 0);
}

#[test]
fn updates_are_always_forwarded_verbatim() {
    let mut detector = FreezeDetector::new(FreezeOptions::default());
    assert_eq!(detector.propose(0, Axis::X, 1.0, 17.5), 17.5);
    assert_eq!(detector.propose(0, Axis::Y, -2.0, -9.25), -9.25);
}

#[test]
fn disabled_freeze_policy_never_leaves_tracking() {
    let mut detector = FreezeDetector::new(FreezeOptions {
        freeze_stationary: false,
        ..Default::default()
    });
    let mut host = RecordingHost::default();
    let mut positions = spread_positions();
    let still = vec![(0.0, 0.0); NODES];
    let t0 = Instant::now();

    for i in 0..20 {
        sweep(&mut detector, &mut positions, &still);
        detector.sweep_complete(t0 + Duration::from_millis(500 * i), &mut host);
        assert_eq!(detector.phase(), Phase::Tracking);
    }
    assert_eq!(host.disable_calls, 0);
}

#[test]
fn toggling_the_policy_resets_tracking() {
    let mut detector = FreezeDetector::new(FreezeOptions::default());
    let mut host = RecordingHost::default();
    let mut positions = spread_positions();
    let still = vec![(0.0, 0.0); NODES];

    sweep(&mut detector, &mut positions, &still);
    detector.sweep_complete(Instant::now(), &mut host);
    assert_eq!(detector.phase(), Phase::ConvergedWaiting);

    detector.set_freeze_stationary(false);
    assert_eq!(detector.phase(), Phase::Tracking);
}

#[test]
fn convergence_scales_with_the_layout_diameter() {
    // One unit of motion is negligible for a kilometer-wide layout but huge for a
    // centimeter-wide one.
    let opts = FreezeOptions {
        epsilon: 0.001,
        ..Default::default()
    };
    let mut host = RecordingHost::default();
    let t0 = Instant::now();

    let mut wide = FreezeDetector::new(opts.clone());
    let mut positions: Vec<(f64, f64)> = vec![(0.0, 0.0), (2_000_000.0, 0.0)];
    let drift = vec![(1.0, 0.0); 2];
    for (slot, (pos, delta)) in positions.iter_mut().zip(&drift).enumerate() {
        let nx = pos.0 + delta.0;
        wide.propose(slot, Axis::X, pos.0, nx);
        wide.propose(slot, Axis::Y, pos.1, pos.1);
        pos.0 = nx;
    }
    wide.sweep_complete(t0, &mut host);
    assert_eq!(wide.phase(), Phase::ConvergedWaiting);

    let mut narrow = FreezeDetector::new(opts);
    let mut positions: Vec<(f64, f64)> = vec![(0.0, 0.0), (10.0, 0.0)];
    for (slot, (pos, delta)) in positions.iter_mut().zip(&drift).enumerate() {
        let nx = pos.0 + delta.0;
        narrow.propose(slot, Axis::X, pos.0, nx);
        narrow.propose(slot, Axis::Y, pos.1, pos.1);
        pos.0 = nx;
    }
    narrow.sweep_complete(t0, &mut host);
    assert_eq!(narrow.phase(), Phase::Tracking, "1-unit drift is not converged here");
}
