//! Typed argument payloads.
//!
//! A node's configuration is an ordinary Rust value owned by the node and
//! fixed at construction. The engine never reads or mutates it.

use serde::de::DeserializeOwned;

use crate::{Behavior, Body, Context};

/// A behavior constructed from a typed argument payload.
///
/// Implementing this lets a [`crate::Registry`] build the behavior from the
/// `args` of a tree definition, see [`crate::Registry::register_from_args`].
///
/// ```rust
/// use resumable_bt::{Behavior, BehaviorResult, Body, Context, FromArgs};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct AttackArgs {
///     damage: u32,
/// }
///
/// struct Attack(AttackArgs);
///
/// impl FromArgs for Attack {
///     type Args = AttackArgs;
///
///     fn from_args(args: AttackArgs) -> Self {
///         Attack(args)
///     }
/// }
///
/// impl Behavior<u32> for Attack {
///     fn run(&mut self, ctx: &mut Context<u32>) -> Body<u32> {
///         *ctx.env_mut() += self.0.damage;
///         BehaviorResult::Success.into()
///     }
/// }
/// ```
pub trait FromArgs: Sized {
    type Args: DeserializeOwned;

    fn from_args(args: Self::Args) -> Self;
}

type RunFn<A, E> = Box<dyn FnMut(&A, &mut Context<'_, E>) -> Body<E>>;
type ConditionFn<A, E> = Box<dyn Fn(&A, &Context<'_, E>) -> bool>;

/// A leaf built from closures, carrying an immutable payload of type `A`.
///
/// The payload is handed by reference to the body and the condition, so one
/// closure can drive many differently configured nodes.
pub struct Action<A, E = ()> {
    args: A,
    run: RunFn<A, E>,
    condition: Option<ConditionFn<A, E>>,
    check_interval: f64,
}

impl<A, E> Action<A, E> {
    pub fn new<F>(args: A, run: F) -> Self
    where
        F: FnMut(&A, &mut Context<'_, E>) -> Body<E> + 'static,
    {
        Self {
            args,
            run: Box::new(run),
            condition: None,
            check_interval: 0.,
        }
    }

    pub fn with_condition<F>(mut self, condition: F) -> Self
    where
        F: Fn(&A, &Context<'_, E>) -> bool + 'static,
    {
        self.condition = Some(Box::new(condition));
        self
    }

    pub fn with_check_interval(mut self, interval: f64) -> Self {
        self.check_interval = interval;
        self
    }

    pub fn args(&self) -> &A {
        &self.args
    }
}

impl<A, E> Behavior<E> for Action<A, E> {
    fn condition(&self, ctx: &Context<'_, E>) -> bool {
        self.condition
            .as_ref()
            .map_or(true, |condition| condition(&self.args, ctx))
    }

    fn check_interval(&self) -> f64 {
        self.check_interval
    }

    fn run(&mut self, ctx: &mut Context<'_, E>) -> Body<E> {
        (self.run)(&self.args, ctx)
    }
}
