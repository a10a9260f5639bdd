use crate::{Behavior, BehaviorResult, Body, ConditionGate, Context, FrameStack};
use tracing::{debug, trace};

/// A behavior plus the engine-side state that drives its lifecycle.
///
/// A node is idle until its first eligible tick, which runs `on_enter`.
/// It stays active while it reports `Running` and exits (running `on_exit`
/// exactly once) as soon as a tick produces `Success` or `Fail`, or when it
/// is aborted. It can be entered again afterwards.
pub struct Node<E = ()> {
    /// Only used to label log records.
    name: String,
    behavior: Box<dyn Behavior<E>>,
    gate: ConditionGate,
    frames: FrameStack<E>,
    active: bool,
    last_result: Option<BehaviorResult>,
}

impl<E> Node<E> {
    /// Wraps a behavior, named after its type until [`Node::named`] is called.
    pub fn new<B: Behavior<E> + 'static>(behavior: B) -> Self {
        Self::from_boxed(Box::new(behavior)).named(type_label::<B>())
    }

    /// Wraps an already boxed behavior. The type is erased at this point, so
    /// the node is labeled `"node"` until [`Node::named`] is called.
    pub fn from_boxed(behavior: Box<dyn Behavior<E>>) -> Self {
        let gate = ConditionGate::new(behavior.check_interval());
        Self {
            name: "node".to_owned(),
            behavior,
            gate,
            frames: FrameStack::default(),
            active: false,
            last_result: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Overrides [`Behavior::check_interval`] of the wrapped behavior.
    pub fn with_check_interval(mut self, interval: f64) -> Self {
        self.gate.set_interval(interval);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn check_interval(&self) -> f64 {
        self.gate.interval()
    }

    /// True between an enter and its matching exit.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// True while a generator body is suspended.
    pub fn is_suspended(&self) -> bool {
        !self.frames.is_empty()
    }

    pub fn frame_depth(&self) -> usize {
        self.frames.depth()
    }

    /// The result of the most recent tick or abort, `None` if never ticked.
    pub fn last_result(&self) -> Option<BehaviorResult> {
        self.last_result
    }

    /// Runs one outer tick of this node and every active descendant.
    pub fn tick(&mut self, time: f64, dt: f64, env: &mut E) -> BehaviorResult {
        self.tick_with(&mut Context::new(time, dt, env))
    }

    /// Ticks within an ongoing outer tick. Composite nodes use this to drive
    /// their children.
    pub fn tick_with(&mut self, ctx: &mut Context<'_, E>) -> BehaviorResult {
        let behavior = &self.behavior;
        let eligible = self.gate.update(ctx.time(), || behavior.condition(ctx));
        if !eligible {
            if self.active {
                debug!(node = %self.name, "condition turned false, aborting");
            }
            self.abort(ctx.env_mut());
            self.last_result = Some(BehaviorResult::Fail);
            return BehaviorResult::Fail;
        }

        if !self.active {
            self.enter(ctx);
        }

        self.behavior.on_tick(ctx);

        let result = if self.frames.is_empty() {
            match self.behavior.run(ctx) {
                Body::Poll(result) => result,
                Body::Steps(generator) => {
                    self.frames.push(generator);
                    self.frames.drive(ctx)
                }
            }
        } else {
            self.frames.drive(ctx)
        };

        if result.is_terminal() {
            self.exit(result, ctx.env_mut());
        }
        self.last_result = Some(result);
        result
    }

    /// Cancels the node immediately.
    ///
    /// Drops any suspended generator and, if the node is active, runs
    /// `on_exit` with `Fail`. Composite and decorator behaviors abort their
    /// active children from their own `on_exit`. Calling it on an idle node
    /// does nothing, so it is safe to call repeatedly.
    pub fn abort(&mut self, env: &mut E) {
        self.frames.clear();
        if self.active {
            debug!(node = %self.name, "abort");
            self.exit(BehaviorResult::Fail, env);
            self.last_result = Some(BehaviorResult::Fail);
        }
    }

    fn enter(&mut self, ctx: &mut Context<'_, E>) {
        assert!(!self.active, "node {:?} entered while active", self.name);
        trace!(node = %self.name, "enter");
        self.active = true;
        self.behavior.on_enter(ctx);
    }

    fn exit(&mut self, result: BehaviorResult, env: &mut E) {
        assert!(self.active, "node {:?} exited while inactive", self.name);
        trace!(node = %self.name, ?result, "exit");
        self.active = false;
        self.frames.clear();
        self.behavior.on_exit(result, env);
    }
}

/// `resumable_bt::nodes::SequenceNode<()>` becomes `SequenceNode`.
fn type_label<T: ?Sized>() -> &'static str {
    let name = std::any::type_name::<T>();
    let name = name.split('<').next().unwrap_or(name);
    name.rsplit("::").next().unwrap_or(name)
}
