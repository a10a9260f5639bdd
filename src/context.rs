use std::fmt::{self, Debug, Formatter};

/// Per-tick data handed to every hook invoked during one outer
/// [`crate::Node::tick`] call.
///
/// `time` and `dt` come from the host clock and are opaque to the engine,
/// except that the condition gate compares `time` against its next check.
pub struct Context<'e, E: 'e = ()> {
    time: f64,
    dt: f64,
    env: &'e mut E,
}

impl<'e, E> Context<'e, E> {
    pub fn new(time: f64, dt: f64, env: &'e mut E) -> Self {
        Self { time, dt, env }
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn env(&self) -> &E {
        self.env
    }

    pub fn env_mut(&mut self) -> &mut E {
        self.env
    }
}

impl<'e, E> Debug for Context<'e, E> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("Context")
            .field("time", &self.time)
            .field("dt", &self.dt)
            .finish_non_exhaustive()
    }
}
