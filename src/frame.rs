//! The resumable-body machinery.
//!
//! A generator is a finite, non-restartable sequence of steps. The engine
//! advances it one step per resume. A step may descend into a nested
//! generator, which is driven to completion before the outer one resumes.
//! Suspended generators live on a [`FrameStack`] owned by the node, so the
//! simulated call stack is an ordinary data structure rather than native
//! coroutine state.

use crate::{BehaviorResult, Context};
use tracing::trace;

/// The outcome of advancing a generator by one step.
pub enum Step<E = ()> {
    /// Suspend. The same generator is resumed next tick.
    ///
    /// A [`crate::Procedure`] resumes with its next step, never the one that
    /// yielded. Poll in a loop with [`crate::wait_until`] or a
    /// [`crate::from_fn`] closure instead.
    Yield,
    /// Suspend and run the nested generator from the next tick on. When it
    /// completes, this generator is resumed with its result.
    Descend(Box<dyn Generator<E>>),
    /// This generator has no more steps. The result must be terminal.
    Done(BehaviorResult),
}

impl<E> Step<E> {
    pub fn descend(generator: impl Generator<E> + 'static) -> Self {
        Self::Descend(Box::new(generator))
    }
}

pub trait Generator<E = ()> {
    /// Advances by one step.
    ///
    /// `nested` is the result of a generator this one descended into, if it
    /// completed since the last resume.
    fn resume(&mut self, ctx: &mut Context<'_, E>, nested: Option<BehaviorResult>) -> Step<E>;
}

impl<E, F> Generator<E> for F
where
    F: FnMut(&mut Context<'_, E>, Option<BehaviorResult>) -> Step<E>,
{
    fn resume(&mut self, ctx: &mut Context<'_, E>, nested: Option<BehaviorResult>) -> Step<E> {
        self(ctx, nested)
    }
}

/// Stack of suspended generators of one node. The top is the innermost,
/// currently running one.
pub struct FrameStack<E = ()> {
    frames: Vec<Box<dyn Generator<E>>>,
}

impl<E> Default for FrameStack<E> {
    fn default() -> Self {
        Self { frames: vec![] }
    }
}

impl<E> FrameStack<E> {
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn push(&mut self, generator: Box<dyn Generator<E>>) {
        self.frames.push(generator);
        trace!(depth = self.frames.len(), "frame pushed");
    }

    /// Drops every suspended generator without resuming it.
    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Resumes the top generator and unwinds completed frames.
    ///
    /// Returns `Running` while anything remains suspended, otherwise the
    /// result the outermost generator completed with. Completed frames hand
    /// their result to the caller frame within the same call, so a chain of
    /// completions unwinds in one tick.
    ///
    /// # Panics
    ///
    /// Panics if called on an empty stack or if a generator completes with
    /// `Running`.
    pub fn drive(&mut self, ctx: &mut Context<'_, E>) -> BehaviorResult {
        assert!(!self.frames.is_empty(), "drive called on an empty frame stack");
        let mut nested = None;
        while let Some(top) = self.frames.last_mut() {
            match top.resume(ctx, nested.take()) {
                Step::Yield => return BehaviorResult::Running,
                Step::Descend(generator) => {
                    self.push(generator);
                    return BehaviorResult::Running;
                }
                Step::Done(result) => {
                    assert!(
                        result.is_terminal(),
                        "a generator must complete with Success or Fail"
                    );
                    self.frames.pop();
                    trace!(depth = self.frames.len(), ?result, "frame popped");
                    nested = Some(result);
                }
            }
        }
        // The loop only exits through a popped frame.
        nested.unwrap_or(BehaviorResult::Fail)
    }
}
