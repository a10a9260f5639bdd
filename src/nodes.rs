use crate::{Behavior, BehaviorResult, Body, Context, Node};

fn abort_active<E>(children: &mut [Node<E>], env: &mut E) {
    for child in children.iter_mut().filter(|child| child.is_active()) {
        child.abort(env);
    }
}

fn assert_idle<E>(owner: &str, children: &[Node<E>]) {
    assert!(
        children.iter().all(|child| !child.is_active()),
        "{} entered with an active child",
        owner
    );
}

/// Ticks its children in order until one fails or all have succeeded.
///
/// A child that succeeds hands over to the next one within the same tick.
/// A `Running` child is resumed first on the next tick, without ticking the
/// children before it again.
pub struct SequenceNode<E = ()> {
    children: Vec<Node<E>>,
    current_child: usize,
}

impl<E> SequenceNode<E> {
    pub fn new(children: Vec<Node<E>>) -> Self {
        Self {
            children,
            current_child: 0,
        }
    }

    pub fn children(&self) -> &[Node<E>] {
        &self.children
    }

    pub fn current_child(&self) -> usize {
        self.current_child
    }
}

impl<E> Default for SequenceNode<E> {
    fn default() -> Self {
        Self::new(vec![])
    }
}

impl<E> Behavior<E> for SequenceNode<E> {
    fn on_enter(&mut self, _ctx: &mut Context<'_, E>) {
        assert_eq!(self.current_child, 0, "Sequence entered mid-run");
        assert_idle("Sequence", &self.children);
    }

    fn run(&mut self, ctx: &mut Context<'_, E>) -> Body<E> {
        while let Some(child) = self.children.get_mut(self.current_child) {
            match child.tick_with(ctx) {
                BehaviorResult::Success => self.current_child += 1,
                BehaviorResult::Fail => {
                    self.current_child = 0;
                    return BehaviorResult::Fail.into();
                }
                BehaviorResult::Running => return BehaviorResult::Running.into(),
            }
        }
        self.current_child = 0;
        BehaviorResult::Success.into()
    }

    fn on_exit(&mut self, _result: BehaviorResult, env: &mut E) {
        abort_active(&mut self.children, env);
        self.current_child = 0;
    }
}

/// Ticks its children in order until one succeeds. Fails when every child
/// has failed.
pub struct SelectorNode<E = ()> {
    children: Vec<Node<E>>,
    current_child: usize,
}

impl<E> SelectorNode<E> {
    pub fn new(children: Vec<Node<E>>) -> Self {
        Self {
            children,
            current_child: 0,
        }
    }

    pub fn children(&self) -> &[Node<E>] {
        &self.children
    }

    pub fn current_child(&self) -> usize {
        self.current_child
    }
}

impl<E> Default for SelectorNode<E> {
    fn default() -> Self {
        Self::new(vec![])
    }
}

impl<E> Behavior<E> for SelectorNode<E> {
    fn on_enter(&mut self, _ctx: &mut Context<'_, E>) {
        assert_eq!(self.current_child, 0, "Selector entered mid-run");
        assert_idle("Selector", &self.children);
    }

    fn run(&mut self, ctx: &mut Context<'_, E>) -> Body<E> {
        while let Some(child) = self.children.get_mut(self.current_child) {
            match child.tick_with(ctx) {
                BehaviorResult::Fail => self.current_child += 1,
                BehaviorResult::Success => {
                    self.current_child = 0;
                    return BehaviorResult::Success.into();
                }
                BehaviorResult::Running => return BehaviorResult::Running.into(),
            }
        }
        // Ran out of children
        self.current_child = 0;
        BehaviorResult::Fail.into()
    }

    fn on_exit(&mut self, _result: BehaviorResult, env: &mut E) {
        abort_active(&mut self.children, env);
        self.current_child = 0;
    }
}

/// Ticks every child on every tick and never completes by itself.
///
/// Children that finish are entered again on the next tick. The node only
/// stops when its parent or the host aborts it, which aborts every child that
/// is still active.
pub struct ParallelNode<E = ()> {
    children: Vec<Node<E>>,
}

impl<E> ParallelNode<E> {
    pub fn new(children: Vec<Node<E>>) -> Self {
        Self { children }
    }

    pub fn children(&self) -> &[Node<E>] {
        &self.children
    }
}

impl<E> Default for ParallelNode<E> {
    fn default() -> Self {
        Self::new(vec![])
    }
}

impl<E> Behavior<E> for ParallelNode<E> {
    fn on_enter(&mut self, _ctx: &mut Context<'_, E>) {
        assert_idle("Parallel", &self.children);
    }

    fn run(&mut self, ctx: &mut Context<'_, E>) -> Body<E> {
        for child in &mut self.children {
            child.tick_with(ctx);
        }
        BehaviorResult::Running.into()
    }

    fn on_exit(&mut self, _result: BehaviorResult, env: &mut E) {
        abort_active(&mut self.children, env);
    }
}

type Transform = Box<dyn Fn(BehaviorResult) -> BehaviorResult>;

/// Wraps one inner node and maps its terminal result.
///
/// `Running` always passes through untouched.
pub struct DecoratorNode<E = ()> {
    inner: Node<E>,
    transform: Transform,
}

impl<E> DecoratorNode<E> {
    /// A decorator that passes the inner result through.
    pub fn new(inner: Node<E>) -> Self {
        Self::with_transform(inner, |result| result)
    }

    pub fn with_transform(
        inner: Node<E>,
        transform: impl Fn(BehaviorResult) -> BehaviorResult + 'static,
    ) -> Self {
        Self {
            inner,
            transform: Box::new(transform),
        }
    }

    pub fn inverter(inner: Node<E>) -> Self {
        Self::with_transform(inner, BehaviorResult::invert)
    }

    pub fn force_success(inner: Node<E>) -> Self {
        Self::with_transform(inner, |_| BehaviorResult::Success)
    }

    pub fn force_failure(inner: Node<E>) -> Self {
        Self::with_transform(inner, |_| BehaviorResult::Fail)
    }

    pub fn inner(&self) -> &Node<E> {
        &self.inner
    }
}

impl<E> Behavior<E> for DecoratorNode<E> {
    fn on_enter(&mut self, _ctx: &mut Context<'_, E>) {
        assert!(
            !self.inner.is_active(),
            "Decorator entered with an active inner node"
        );
    }

    fn run(&mut self, ctx: &mut Context<'_, E>) -> Body<E> {
        match self.inner.tick_with(ctx) {
            BehaviorResult::Running => BehaviorResult::Running.into(),
            result => (self.transform)(result).into(),
        }
    }

    fn on_exit(&mut self, _result: BehaviorResult, env: &mut E) {
        if self.inner.is_active() {
            self.inner.abort(env);
        }
    }
}

/// Runs its child until it has succeeded `n` times. A failure of the child
/// fails the whole node.
pub struct RepeatNode<E = ()> {
    child: Node<E>,
    n: usize,
    count: usize,
}

impl<E> RepeatNode<E> {
    pub fn new(child: Node<E>, n: usize) -> Self {
        Self { child, n, count: 0 }
    }
}

impl<E> Behavior<E> for RepeatNode<E> {
    fn run(&mut self, ctx: &mut Context<'_, E>) -> Body<E> {
        if self.n <= self.count {
            self.count = 0;
            return BehaviorResult::Success.into();
        }
        let result = match self.child.tick_with(ctx) {
            BehaviorResult::Running => BehaviorResult::Running,
            BehaviorResult::Fail => {
                self.count = 0;
                BehaviorResult::Fail
            }
            BehaviorResult::Success => {
                self.count += 1;
                if self.count < self.n {
                    BehaviorResult::Running
                } else {
                    self.count = 0;
                    BehaviorResult::Success
                }
            }
        };
        result.into()
    }

    fn on_exit(&mut self, _result: BehaviorResult, env: &mut E) {
        self.child.abort(env);
        self.count = 0;
    }
}

/// Runs its child until it succeeds, giving up after `n` failures.
pub struct RetryNode<E = ()> {
    child: Node<E>,
    n: usize,
    failures: usize,
}

impl<E> RetryNode<E> {
    pub fn new(child: Node<E>, n: usize) -> Self {
        Self {
            child,
            n,
            failures: 0,
        }
    }
}

impl<E> Behavior<E> for RetryNode<E> {
    fn run(&mut self, ctx: &mut Context<'_, E>) -> Body<E> {
        if self.n <= self.failures {
            self.failures = 0;
            return BehaviorResult::Fail.into();
        }
        let result = match self.child.tick_with(ctx) {
            BehaviorResult::Running => BehaviorResult::Running,
            BehaviorResult::Success => {
                self.failures = 0;
                BehaviorResult::Success
            }
            BehaviorResult::Fail => {
                self.failures += 1;
                if self.failures < self.n {
                    BehaviorResult::Running
                } else {
                    self.failures = 0;
                    BehaviorResult::Fail
                }
            }
        };
        result.into()
    }

    fn on_exit(&mut self, _result: BehaviorResult, env: &mut E) {
        self.child.abort(env);
        self.failures = 0;
    }
}
