//! Push-driven processing stages: the [`Stage`] trait, pipeline composition, and a handful of primitive stages.
//!
//! A stage is a suspended computation that is advanced by its driver via [`Stage::resume`]. Each resumption runs the stage until it next suspends, reporting why as a [`Step`]:
//!
//! - [`Step::Await`]: the stage needs its next input. The driver must answer with exactly one call to [`Stage::supply`], passing `Some(input)`, or `None` once there is no more input.
//! - [`Step::Emit`]: the stage hands an output downstream, and continues when resumed again.
//! - [`Step::Done`]: the stage has terminated with a final value.
//!
//! Stages without input use [`Infallible`](core::convert::Infallible) as their [`Input`](Stage::Input) type, their drivers answer every await with `None`.
//!
//! ## Composition
//!
//! The [`Fuse`] stage (obtained via [`StageExt::fuse`] or [`fuse`]) feeds the outputs of one stage as the inputs of another, forming a pipeline.
//!
//! ## Primitive Stages
//!
//! - [`Map`] (see [`map`]) awaits inputs and emits each of them after passing it through a function.
//! - [`Unfold`] (see [`unfold`]) repeatedly runs an async step function on a state, emitting an output per step. It awaits no input at all.
//!
//! ## Adaptors
//!
//! - [`MapFinal`] (see [`StageExt::map_final`]) maps the final value of a stage.
//!
//! ## Development Helpers
//!
//! The [Invariant] adaptor wraps any stage and makes it panic during tests when some driver violates the resume/supply protocol. In production builds, the wrapper does nothing and compiles away without any overhead. Every stage driven by this crate is driven through this wrapper.

mod fuse;
pub use fuse::Fuse;

mod map;
pub use map::Map;

mod map_final;
pub use map_final::MapFinal;

mod unfold;
pub use unfold::Unfold;

#[cfg(test)]
mod invariant;
#[cfg(not(test))]
mod invariant_noop;
#[cfg(test)]
pub use invariant::Invariant;
#[cfg(not(test))]
pub use invariant_noop::Invariant;

use core::future::Future;

/// The reason why a [`Stage`] suspended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Step<O, F> {
    /// The stage awaits its next input, see [`Stage::supply`].
    Await,
    /// The stage emits an output.
    Emit(O),
    /// The stage has terminated with a final value.
    Done(F),
}

/// A processing stage that alternates freely between awaiting inputs and emitting outputs before terminating with a final value.
///
/// A stage may signal an error of type [`Self::Error`] instead of suspending.
#[must_use = "stages are lazy and do nothing unless resumed"]
pub trait Stage {
    /// The type of inputs the stage awaits.
    type Input;
    /// The type of outputs the stage emits.
    type Output;
    /// The type of the value the stage terminates with.
    type Final;
    /// The type of errors the stage can emit instead of suspending.
    type Error;

    /// Runs the stage until it next suspends, and reports why it did.
    ///
    /// After this function returns [`Step::Done`], or after it returns an error, no further
    /// functions of this trait may be invoked.
    ///
    /// #### Invariants
    ///
    /// Must not be called after any function of this trait has returned a final value or an error,
    /// nor after returning [`Step::Await`] without a subsequent call to [`supply`](Stage::supply).
    async fn resume(&mut self) -> Result<Step<Self::Output, Self::Final>, Self::Error>;

    /// Answers the most recent [`Step::Await`]: `Some(input)` supplies the next input, `None` signals that no further input exists.
    ///
    /// #### Invariants
    ///
    /// Must be called exactly once after each [`Step::Await`], and at no other time.
    fn supply(&mut self, input: Option<Self::Input>);
}

impl<S: Stage> Stage for &mut S {
    type Input = S::Input;
    type Output = S::Output;
    type Final = S::Final;
    type Error = S::Error;

    async fn resume(&mut self) -> Result<Step<Self::Output, Self::Final>, Self::Error> {
        (*self).resume().await
    }

    fn supply(&mut self, input: Option<Self::Input>) {
        (*self).supply(input)
    }
}

#[cfg(feature = "alloc")]
impl<S: Stage> Stage for alloc::boxed::Box<S> {
    type Input = S::Input;
    type Output = S::Output;
    type Final = S::Final;
    type Error = S::Error;

    async fn resume(&mut self) -> Result<Step<Self::Output, Self::Final>, Self::Error> {
        self.as_mut().resume().await
    }

    fn supply(&mut self, input: Option<Self::Input>) {
        self.as_mut().supply(input)
    }
}

impl<S> StageExt for S where S: Stage {}

/// An extension trait for [`Stage`] that provides combinator functions.
/// You never need to implement this trait yourself, it merely adds methods with default implementation to existing stages.
pub trait StageExt: Stage {
    /// Places `self` upstream of `downstream`: every output of `self` becomes an input of `downstream`.
    ///
    /// The resulting stage awaits whatever `self` awaits, emits whatever `downstream` emits, and terminates with the final value of `downstream`. The final value of `self` is dropped.
    ///
    /// ```
    /// use ufotofu::producer::FromBoxedSlice;
    /// use ufotofu_conduit::prelude::*;
    /// use ufotofu_conduit::stage::map;
    /// # pollster::block_on(async {
    ///
    /// let mut s = from_stream_source(FromBoxedSlice::from_vec(vec![1, 2]))
    ///     .fuse(map(|x: i32| x + 1))
    ///     .fuse(map(|x: i32| x * 10));
    /// assert_eq!(s.resume().await?, Step::Emit(20));
    /// assert_eq!(s.resume().await?, Step::Emit(30));
    /// assert_eq!(s.resume().await?, Step::Done(()));
    /// # Result::<(), Infallible>::Ok(())
    /// # });
    /// ```
    fn fuse<D>(self, downstream: D) -> Fuse<Self, D>
    where
        Self: Sized,
        D: Stage<Input = Self::Output, Error = Self::Error>,
    {
        Fuse::new(self, downstream)
    }

    /// Returns a stage that passes its final value through a function.
    fn map_final<B, F>(self, fun: F) -> MapFinal<Self, F>
    where
        Self: Sized,
        F: FnMut(Self::Final) -> B,
    {
        MapFinal::new(self, fun)
    }
}

/// Places `upstream` in front of `downstream`, see [`StageExt::fuse`].
pub fn fuse<U, D>(upstream: U, downstream: D) -> Fuse<U, D>
where
    U: Stage,
    D: Stage<Input = U::Output, Error = U::Error>,
{
    Fuse::new(upstream, downstream)
}

/// Creates a stage that awaits inputs until there are none left, emitting each input after passing it through `fun`. Terminates with `()`.
///
/// The error type `E` is arbitrary (the stage never errs), so that the stage fits into any pipeline.
///
/// ```
/// use ufotofu_conduit::prelude::*;
/// use ufotofu_conduit::stage::map;
/// # pollster::block_on(async {
///
/// let mut s = map::<_, _, _, Infallible>(|x: u8| x * 2);
/// assert_eq!(s.resume().await?, Step::Await);
/// s.supply(Some(21));
/// assert_eq!(s.resume().await?, Step::Emit(42));
/// assert_eq!(s.resume().await?, Step::Await);
/// s.supply(None);
/// assert_eq!(s.resume().await?, Step::Done(()));
/// # Result::<(), Infallible>::Ok(())
/// # });
/// ```
pub fn map<F, I, O, E>(fun: F) -> Map<F, I, E>
where
    F: FnMut(I) -> O,
{
    Map::new(fun)
}

/// Creates a stage without input that runs `step` on a state until `step` returns `Ok(None)`.
///
/// Every `Ok(Some((output, next_state)))` is emitted as `output`, the stage then continues with `next_state`. Errors of `step` are emitted unchanged.
///
/// ```
/// use ufotofu_conduit::prelude::*;
/// use ufotofu_conduit::stage::unfold;
/// # pollster::block_on(async {
///
/// let mut s = unfold(0u8, |n| async move {
///     Ok::<_, Infallible>(if n < 2 { Some((n, n + 1)) } else { None })
/// });
/// assert_eq!(s.resume().await?, Step::Emit(0));
/// assert_eq!(s.resume().await?, Step::Emit(1));
/// assert_eq!(s.resume().await?, Step::Done(()));
/// # Result::<(), Infallible>::Ok(())
/// # });
/// ```
pub fn unfold<S, F, Fut, O, E>(state: S, step: F) -> Unfold<S, F>
where
    F: FnMut(S) -> Fut,
    Fut: Future<Output = Result<Option<(O, S)>, E>>,
{
    Unfold::new(state, step)
}
