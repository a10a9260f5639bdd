use std::collections::VecDeque;

use crate::{BehaviorResult, Context, Generator, Step};

type StepFn<E> = Box<dyn FnMut(&mut Context<'_, E>, Option<BehaviorResult>) -> Step<E>>;

/// Boxes a closure as a generator. The closure keeps whatever state it needs
/// in its captures and is called once per resume.
pub fn from_fn<E, F>(f: F) -> Box<dyn Generator<E>>
where
    F: FnMut(&mut Context<'_, E>, Option<BehaviorResult>) -> Step<E> + 'static,
{
    Box::new(f)
}

/// A generator written as an ordered list of steps.
///
/// Each step closure runs at most once, so whatever side effect it has is
/// never repeated after the node is resumed. A step ends by yielding,
/// descending into a nested generator or completing the whole procedure
/// with `Done`. The next step receives the result of the nested generator
/// the previous step descended into.
///
/// Running out of steps completes the procedure with the last nested result,
/// or `Success` if the last step didn't descend.
pub struct Procedure<E = ()> {
    steps: VecDeque<StepFn<E>>,
}

impl<E> Default for Procedure<E> {
    fn default() -> Self {
        Self {
            steps: VecDeque::new(),
        }
    }
}

impl<E> Procedure<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step<F>(mut self, f: F) -> Self
    where
        F: FnMut(&mut Context<'_, E>, Option<BehaviorResult>) -> Step<E> + 'static,
    {
        self.steps.push_back(Box::new(f));
        self
    }

    pub fn remaining(&self) -> usize {
        self.steps.len()
    }
}

impl<E> Generator<E> for Procedure<E> {
    fn resume(&mut self, ctx: &mut Context<'_, E>, nested: Option<BehaviorResult>) -> Step<E> {
        let Some(mut step) = self.steps.pop_front() else {
            return Step::Done(nested.unwrap_or(BehaviorResult::Success));
        };
        match step(ctx, nested) {
            Step::Done(result) => {
                self.steps.clear();
                Step::Done(result)
            }
            suspended => suspended,
        }
    }
}

/// Suspends for `seconds` of accumulated `dt`, then succeeds.
pub fn wait<E>(seconds: f64) -> Box<dyn Generator<E>> {
    let mut elapsed = 0.;
    from_fn(move |ctx: &mut Context<'_, E>, _| {
        elapsed += ctx.dt();
        if elapsed < seconds {
            Step::Yield
        } else {
            Step::Done(BehaviorResult::Success)
        }
    })
}

/// Suspends until `predicate` holds, then succeeds. The predicate is checked
/// on the first resume already.
pub fn wait_until<E, F>(mut predicate: F) -> Box<dyn Generator<E>>
where
    F: FnMut(&Context<'_, E>) -> bool + 'static,
{
    from_fn(move |ctx: &mut Context<'_, E>, _| {
        if predicate(ctx) {
            Step::Done(BehaviorResult::Success)
        } else {
            Step::Yield
        }
    })
}
