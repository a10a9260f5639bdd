/// Slack for clocks built by summing float deltas, so a check due at `1.0`
/// still fires after ten `0.1` steps.
const EPSILON: f64 = 1e-9;

/// Cached, periodically re-evaluated eligibility check of a node.
///
/// The predicate is evaluated on the first update and then whenever at least
/// one interval of simulation time passed since the last evaluation. In
/// between, the cached answer is returned without calling the predicate, so a
/// node may keep running for up to one interval after its predicate turned
/// false. Time is read from the host clock, so an answer never outlives its
/// interval even if the node was not ticked for a while.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConditionGate {
    interval: f64,
    last_check: Option<f64>,
    cached: bool,
}

impl ConditionGate {
    /// A gate that evaluates on the first update, then every `interval`
    /// seconds. Non-positive intervals evaluate on every update.
    pub fn new(interval: f64) -> Self {
        Self {
            interval: interval.max(0.),
            last_check: None,
            cached: true,
        }
    }

    pub fn interval(&self) -> f64 {
        self.interval
    }

    pub fn set_interval(&mut self, interval: f64) {
        self.interval = interval.max(0.);
    }

    /// The last evaluated answer.
    pub fn cached(&self) -> bool {
        self.cached
    }

    /// Simulation time the next update evaluates the predicate at, `None` if
    /// it was never evaluated.
    pub fn next_check_time(&self) -> Option<f64> {
        self.last_check.map(|last| last + self.interval)
    }

    /// Forces the next update to evaluate the predicate.
    pub fn invalidate(&mut self) {
        self.last_check = None;
    }

    pub fn update(&mut self, time: f64, predicate: impl FnOnce() -> bool) -> bool {
        let due = match self.last_check {
            None => true,
            // A clock running backwards means the host restarted it
            Some(last) => time < last || last + self.interval <= time + EPSILON,
        };
        if due {
            self.cached = predicate();
            self.last_check = Some(time);
        }
        self.cached
    }
}

impl Default for ConditionGate {
    fn default() -> Self {
        Self::new(0.)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    /// Feeds `answers` to the gate, one per tick of length `dt`, and returns
    /// what the gate reported along with how often it asked.
    fn run(gate: &mut ConditionGate, dt: f64, answers: &[bool]) -> (Vec<bool>, usize) {
        let mut calls = 0;
        let reported = answers
            .iter()
            .enumerate()
            .map(|(tick, &answer)| {
                gate.update(tick as f64 * dt, || {
                    calls += 1;
                    answer
                })
            })
            .collect();
        (reported, calls)
    }

    #[test]
    fn test_every_tick() {
        let mut gate = ConditionGate::default();
        let (reported, calls) = run(&mut gate, 0.1, &[true, false, true, false]);
        assert_eq!(reported, vec![true, false, true, false]);
        assert_eq!(calls, 4);
    }

    #[test]
    fn test_cached_between_checks() {
        let mut gate = ConditionGate::new(1.);
        let (reported, calls) = run(&mut gate, 0.25, &[true, false, false, false, false, false]);
        // Evaluated on the first tick and again once a full second elapsed.
        assert_eq!(reported, vec![true, true, true, true, false, false]);
        assert_eq!(calls, 2);
        assert_eq!(gate.next_check_time(), Some(2.));
    }

    /// Index of the first tick reporting false when the predicate turns
    /// false right after the first tick.
    fn first_false(dt: f64, ticks: usize) -> Option<usize> {
        let mut gate = ConditionGate::new(1.);
        let mut answers = vec![false; ticks];
        answers[0] = true;
        let (reported, _) = run(&mut gate, dt, &answers);
        reported.iter().position(|answer| !answer)
    }

    #[test]
    fn test_inexact_dt() {
        assert_eq!(first_false(0.1, 20), Some(10));
        assert_eq!(first_false(1. / 60., 120), Some(60));
    }

    #[test]
    fn test_summed_clock() {
        let mut gate = ConditionGate::new(1.);
        let mut time = 0.;
        assert!(gate.update(time, || true));
        for _ in 0..9 {
            time += 0.1;
            assert!(gate.update(time, || false));
        }
        // Ten summed deltas fall just short of 1.0
        time += 0.1;
        assert!(time < 1.);
        assert!(!gate.update(time, || false));
    }

    #[test]
    fn test_long_gap() {
        let mut gate = ConditionGate::new(1.);
        assert!(!gate.update(0., || false));
        assert!(gate.update(10., || true));
    }

    #[test]
    fn test_clock_restart() {
        let mut gate = ConditionGate::new(1.);
        assert!(gate.update(5., || true));
        assert!(!gate.update(0., || false));
    }

    #[test]
    fn test_invalidate() {
        let mut gate = ConditionGate::new(10.);
        assert!(gate.update(0., || true));
        assert!(gate.update(0.1, || false));
        gate.invalidate();
        assert_eq!(gate.next_check_time(), None);
        assert!(!gate.update(0.2, || false));
    }
}
