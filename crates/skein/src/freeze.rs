//! Online convergence detection for an externally driven force simulation.
//!
//! The detector sits between the simulation and the position store: every per-axis
//! coordinate proposal is forwarded unchanged while folding into running statistics
//! (axis bounds and the largest per-axis delta). At each sweep boundary the detector
//! compares the largest delta against `epsilon · layout diameter`; once the layout has
//! stayed converged for a grace period it tells the host to stop driving the
//! simulation.
//!
//! The host signals sweep boundaries explicitly via [`FreezeDetector::sweep_complete`].
//! Time is injected by the host as well, so single-threaded hosts need no timer: the
//! armed grace deadline is checked inline at each boundary. Hosts that do schedule a
//! real one-shot timer use [`FreezeDetector::grace_token`] /
//! [`FreezeDetector::grace_fire`]; a firing whose token is stale (tracking was reset in
//! the meantime) is ignored, so a late callback can never force a freeze.

use std::time::{Duration, Instant};

pub const MIN_EPSILON: f64 = 0.0;
pub const DEFAULT_EPSILON: f64 = 0.0001;
pub const MAX_EPSILON: f64 = 0.001;

pub const DEFAULT_GRACE: Duration = Duration::from_millis(2000);

/// Lifecycle hook the simulation host must honor: disabling layout pauses the host's
/// own tick loop, enabling resumes it.
pub trait SimulationHost {
    fn set_layout_enabled(&mut self, enabled: bool);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Accumulating statistics over sweeps.
    Tracking,
    /// Convergence threshold met; grace timer running.
    ConvergedWaiting,
    /// Host was told to stop the simulation.
    Frozen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

#[derive(Debug, Clone)]
pub struct FreezeOptions {
    /// Convergence threshold relative to the layout diameter, clamped to
    /// [`MIN_EPSILON`, `MAX_EPSILON`].
    pub epsilon: f64,
    /// Delay between first observing convergence and committing to freeze.
    pub grace: Duration,
    /// Whether convergence should freeze the simulation at all.
    pub freeze_stationary: bool,
}

impl Default for FreezeOptions {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            grace: DEFAULT_GRACE,
            freeze_stationary: true,
        }
    }
}

/// Descriptor for one tunable parameter, mirroring the simulation's own parameter
/// tables so epsilon can be exposed through the same host mechanism.
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub min: f64,
    pub max: f64,
}

const PARAM_EPSILON: usize = 0;
const PARAMS: [ParamSpec; 1] = [ParamSpec {
    name: "Epsilon",
    min: MIN_EPSILON,
    max: MAX_EPSILON,
}];

// One-shot grace deadline guarded by a generation counter. Cancelling bumps the
// generation, which invalidates any timer callback armed before the cancel.
#[derive(Debug, Clone, Copy)]
struct GraceTimer {
    generation: u64,
    deadline: Option<Instant>,
    fired: bool,
}

impl GraceTimer {
    fn new() -> Self {
        Self {
            generation: 0,
            deadline: None,
            fired: false,
        }
    }

    fn arm(&mut self, now: Instant, grace: Duration) {
        if self.deadline.is_none() {
            self.deadline = Some(now + grace);
            self.fired = false;
        }
    }

    fn cancel(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.deadline = None;
        self.fired = false;
    }

    fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    fn fire(&mut self, token: u64) -> bool {
        if token == self.generation && self.deadline.is_some() {
            self.fired = true;
            return true;
        }
        false
    }

    fn is_over(&self, now: Instant) -> bool {
        self.fired || self.deadline.is_some_and(|d| now >= d)
    }
}

#[derive(Debug, Clone)]
pub struct FreezeDetector {
    epsilon: f64,
    grace_period: Duration,
    freeze_stationary: bool,

    phase: Phase,
    min_x: f64,
    max_x: f64,
    min_y: f64,
    max_y: f64,
    max_delta: f64,
    updates: usize,
    grace: GraceTimer,
}

impl FreezeDetector {
    pub fn new(opts: FreezeOptions) -> Self {
        let mut detector = Self {
            epsilon: opts.epsilon.clamp(MIN_EPSILON, MAX_EPSILON),
            grace_period: opts.grace,
            freeze_stationary: opts.freeze_stationary,
            phase: Phase::Tracking,
            min_x: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            min_y: f64::INFINITY,
            max_y: f64::NEG_INFINITY,
            max_delta: -1.0,
            updates: 0,
            grace: GraceTimer::new(),
        };
        detector.reset_tracking();
        detector
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Clamps into the legal range and restarts tracking, the same way changing any
    /// other simulation parameter restarts the affected force.
    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.epsilon = epsilon.clamp(MIN_EPSILON, MAX_EPSILON);
        self.reset_tracking();
    }

    pub fn freeze_stationary(&self) -> bool {
        self.freeze_stationary
    }

    /// Toggling the freeze policy resets tracking unconditionally.
    pub fn set_freeze_stationary(&mut self, freeze_stationary: bool) {
        self.freeze_stationary = freeze_stationary;
        self.reset_tracking();
    }

    pub fn param_count(&self) -> usize {
        PARAMS.len()
    }

    pub fn param_spec(&self, index: usize) -> ParamSpec {
        PARAMS[index]
    }

    pub fn param(&self, index: usize) -> f64 {
        match index {
            PARAM_EPSILON => self.epsilon,
            _ => panic!("unknown parameter index {index}"),
        }
    }

    pub fn set_param(&mut self, index: usize, value: f64) {
        match index {
            PARAM_EPSILON => self.set_epsilon(value),
            _ => panic!("unknown parameter index {index}"),
        }
    }

    /// Intercepts one per-axis coordinate update. The proposed value is always
    /// returned for the host to store; updates are never dropped.
    ///
    /// `slot` is the node's opaque index in the host's iteration; it only matters for
    /// bookkeeping, not identity.
    pub fn propose(&mut self, _slot: usize, axis: Axis, old: f64, new: f64) -> f64 {
        if self.phase == Phase::Frozen {
            // Updates are flowing again, so the host re-enabled the simulation.
            self.reset_tracking();
        }

        match axis {
            Axis::X => {
                self.min_x = self.min_x.min(new);
                self.max_x = self.max_x.max(new);
            }
            Axis::Y => {
                self.min_y = self.min_y.min(new);
                self.max_y = self.max_y.max(new);
            }
        }
        self.max_delta = self.max_delta.max((old - new).abs());
        self.updates += 1;

        new
    }

    /// Sweep boundary: the host calls this after each full pass of per-node updates.
    ///
    /// Statistics accumulate across sweeps while convergence holds; a non-converged
    /// sweep resets them so a fresh pass begins with the next update.
    pub fn sweep_complete<H: SimulationHost>(&mut self, now: Instant, host: &mut H) {
        if self.updates == 0 {
            return;
        }

        let dx = self.max_x - self.min_x;
        let dy = self.max_y - self.min_y;
        let diameter = (dx * dx + dy * dy).sqrt();
        let converged = self.max_delta <= self.epsilon * diameter;

        if converged && self.freeze_stationary {
            if self.grace.is_over(now) {
                host.set_layout_enabled(false);
                self.reset_tracking();
                self.phase = Phase::Frozen;
            } else {
                self.grace.arm(now, self.grace_period);
                self.phase = Phase::ConvergedWaiting;
            }
        } else {
            self.reset_tracking();
        }
    }

    /// Token identifying the current tracking generation; schedule an external grace
    /// timer with this and hand it back to [`FreezeDetector::grace_fire`].
    pub fn grace_token(&self) -> u64 {
        self.grace.generation
    }

    /// External one-shot timer callback. Returns whether the firing was accepted; a
    /// stale token (tracking reset since the timer was scheduled) is a no-op.
    pub fn grace_fire(&mut self, token: u64) -> bool {
        self.grace.fire(token)
    }

    fn reset_tracking(&mut self) {
        self.phase = Phase::Tracking;
        self.min_x = f64::INFINITY;
        self.max_x = f64::NEG_INFINITY;
        self.min_y = f64::INFINITY;
        self.max_y = f64::NEG_INFINITY;
        self.max_delta = -1.0;
        self.updates = 0;
        self.grace.cancel();
    }
}
