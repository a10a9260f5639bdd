//! # resumable-bt (Rust crate)
//!
//! A tick-driven behavior tree engine for driving per-agent decision logic
//! inside a real-time simulation.
//!
//!
//! ## Overview
//!
//! A host simulation owns one tree per agent and calls [`Node::tick`] on the
//! root once per frame with the current simulation time and the frame delta.
//! The root recursively ticks whichever descendants are currently active and
//! the results flow back up within that same call.
//!
//! Every node reports a [`BehaviorResult`]: `Success`, `Fail` or `Running`.
//! `Running` means "still working, call me again next frame".
//!
//! The interesting part is that a node body can span many frames without
//! hand-rolling a phase enum. A body either produces a result right away
//! ([`Body::Poll`]) or hands the engine a [`Generator`] ([`Body::Steps`]),
//! which is resumed one step per frame and may itself descend into nested
//! generators. The engine keeps the suspended generators on an explicit
//! [`FrameStack`] owned by the node.
//!
//!
//! ## How it looks like
//!
//! A leaf behavior implements the [`Behavior`] trait.
//! Only `run` is required, every other hook has a default.
//!
//! ```rust
//! use resumable_bt::{Behavior, BehaviorResult, Body, Context, Node, SequenceNode};
//!
//! struct Greet;
//!
//! impl Behavior for Greet {
//!     fn run(&mut self, _ctx: &mut Context) -> Body {
//!         println!("Hello");
//!         Body::Poll(BehaviorResult::Success)
//!     }
//! }
//!
//! let mut root = Node::new(SequenceNode::new(vec![Node::new(Greet), Node::new(Greet)]));
//! assert_eq!(root.tick(0.0, 1. / 60., &mut ()), BehaviorResult::Success);
//! ```
//!
//! The third argument of `tick` is the host environment. Leaf behaviors get
//! it through [`Context::env`] and [`Context::env_mut`], so they can read and
//! modify the world of the agent they drive. Use `()` if you don't need one.
//!
//!
//! ## Multi-tick bodies
//!
//! A body that needs more than one frame returns a generator.
//! [`Procedure`] is the simplest way to write one: an ordered list of steps,
//! each of which runs exactly once.
//!
//! ```rust
//! use resumable_bt::{wait, Action, BehaviorResult, Body, Node, Procedure, Step};
//!
//! let mut node = Node::new(Action::new("door", |name, _ctx| {
//!     let name = *name;
//!     Body::steps(
//!         Procedure::new()
//!             .step(move |_, _| {
//!                 println!("opening {}", name);
//!                 Step::Descend(wait(0.5))
//!             })
//!             .step(move |_, _| {
//!                 println!("{} is open", name);
//!                 Step::Done(BehaviorResult::Success)
//!             }),
//!     )
//! }));
//!
//! let mut env = ();
//! let mut time = 0.;
//! let result = loop {
//!     time += 0.25;
//!     match node.tick(time, 0.25, &mut env) {
//!         BehaviorResult::Running => continue,
//!         result => break result,
//!     }
//! };
//! assert_eq!(result, BehaviorResult::Success);
//! ```
//!
//! Composite nodes ([`SequenceNode`], [`SelectorNode`], [`ParallelNode`]) and
//! decorators ([`DecoratorNode`], [`RepeatNode`], [`RetryNode`]) don't use
//! generators. Their state is the index of the active child, so they simply
//! return `Body::Poll` every frame.
//!
//!
//! ## Condition gate
//!
//! Every node has a predicate ([`Behavior::condition`]) deciding whether the
//! node may run at all. It is re-evaluated at most once per
//! [`Behavior::check_interval`] seconds and cached in between. When it turns
//! false, an active node is aborted and the tick returns `Fail`.
//!
//!
//! ## Loading the tree structure from a file
//!
//! Trees can also be described in a small text format and instantiated through
//! a [`Registry`] of node types.
//!
//! ```raw
//! # Patrol unless an enemy is in sight.
//! tree main = Selector {
//!     Sequence {
//!         EnemyInSight @ 0.5
//!         Attack (damage = 12)
//!     }
//!     Patrol
//! }
//! ```
//!
//! `@ 0.5` sets the condition re-check interval of the node and the
//! parenthesized list is its typed argument payload (see [`FromArgs`]).
//! A node name prefixed with `!` is wrapped in an `Inverter`.
//! Node types that are not in the registry are looked up as trees of the same
//! file, so you can split a large tree into subtrees.
//!
//! The same structure can be written in YAML and loaded with
//! [`parser::load_yaml`].
//!
//! ```yaml
//! trees:
//!   main:
//!     type: Selector
//!     children:
//!     - type: Sequence
//!       children:
//!       - type: EnemyInSight
//!         check_interval: 0.5
//!       - type: Attack
//!         args:
//!           damage: 12
//!     - type: Patrol
//! ```

mod args;
mod container;
mod context;
pub mod error;
mod frame;
mod gate;
mod nodes;
pub mod parser;
mod procedure;
mod registry;

pub use crate::args::{Action, FromArgs};
pub use crate::container::Node;
pub use crate::context::Context;
pub use crate::frame::{FrameStack, Generator, Step};
pub use crate::gate::ConditionGate;
pub use crate::nodes::{
    DecoratorNode, ParallelNode, RepeatNode, RetryNode, SelectorNode, SequenceNode,
};
pub use crate::procedure::{from_fn, wait, wait_until, Procedure};
pub use crate::{
    parser::{load, load_str, load_tree, load_yaml, parse_file, NodeDef, TreeDef, TreeSource},
    registry::{boxify, constructor, Constructor, Registry},
};

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum BehaviorResult {
    Success,
    Fail,
    /// The node should keep running in the next tick
    Running,
}

impl BehaviorResult {
    /// Returns `true` for `Success` and `Fail`.
    pub fn is_terminal(self) -> bool {
        !matches!(self, BehaviorResult::Running)
    }

    /// Swaps `Success` and `Fail`, leaving `Running` untouched.
    pub fn invert(self) -> Self {
        match self {
            BehaviorResult::Success => BehaviorResult::Fail,
            BehaviorResult::Fail => BehaviorResult::Success,
            BehaviorResult::Running => BehaviorResult::Running,
        }
    }
}

/// What a node body produced when the engine invoked [`Behavior::run`].
pub enum Body<E = ()> {
    /// The body decided the result of this tick by itself.
    ///
    /// Returning `Running` here means the body keeps its multi-tick state in
    /// its own fields and wants `run` to be called again next tick.
    /// Composite and decorator nodes work this way.
    Poll(BehaviorResult),
    /// The body is a generator. The engine pushes it on the node's frame stack
    /// and resumes it every tick until it completes; `run` is not called again
    /// until then.
    Steps(Box<dyn Generator<E>>),
}

impl<E> Body<E> {
    pub fn steps(generator: impl Generator<E> + 'static) -> Self {
        Self::Steps(Box::new(generator))
    }
}

impl<E> From<BehaviorResult> for Body<E> {
    fn from(result: BehaviorResult) -> Self {
        Self::Poll(result)
    }
}

/// The extension point for node authors.
///
/// The engine calls the hooks in this order on every eligible tick:
/// `on_enter` (only when the node was idle), `on_tick`, then `run` (or the
/// suspended generator), and `on_exit` once the tick produced a terminal
/// result or the node got aborted.
pub trait Behavior<E = ()> {
    fn on_enter(&mut self, _ctx: &mut Context<'_, E>) {}

    fn on_tick(&mut self, _ctx: &mut Context<'_, E>) {}

    /// Called exactly once per enter, with `Fail` if the node was aborted.
    fn on_exit(&mut self, _result: BehaviorResult, _env: &mut E) {}

    /// Whether the node is eligible to run. The result is cached for
    /// [`Behavior::check_interval`] seconds.
    fn condition(&self, _ctx: &Context<'_, E>) -> bool {
        true
    }

    /// Re-check interval of [`Behavior::condition`] in seconds. Zero or less
    /// re-checks every tick.
    fn check_interval(&self) -> f64 {
        0.
    }

    fn run(&mut self, ctx: &mut Context<'_, E>) -> Body<E>;
}

impl<E> Behavior<E> for Box<dyn Behavior<E>> {
    fn on_enter(&mut self, ctx: &mut Context<'_, E>) {
        (**self).on_enter(ctx)
    }

    fn on_tick(&mut self, ctx: &mut Context<'_, E>) {
        (**self).on_tick(ctx)
    }

    fn on_exit(&mut self, result: BehaviorResult, env: &mut E) {
        (**self).on_exit(result, env)
    }

    fn condition(&self, ctx: &Context<'_, E>) -> bool {
        (**self).condition(ctx)
    }

    fn check_interval(&self) -> f64 {
        (**self).check_interval()
    }

    fn run(&mut self, ctx: &mut Context<'_, E>) -> Body<E> {
        (**self).run(ctx)
    }
}
