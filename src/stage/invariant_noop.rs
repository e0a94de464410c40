use wrapper::Wrapper;

use crate::stage::{Stage, Step};

/// A `Stage` wrapper that panics when drivers violate the resume/supply protocol.
///
/// This wrapper only performs the checks while testing (more specifically,
/// when `#[cfg(test)]` applies). In production builds, the wrapper does
/// nothing at all and compiles away without any overhead.
///
/// All converters in this crate wrap the stages they drive in this type.
///
/// #### Invariants
///
/// The wrapper enforces the following invariants:
///
/// - Must not call [`resume`](Stage::resume) after it returned [`Step::Done`] or an error.
/// - Must not call [`resume`](Stage::resume) after it returned [`Step::Await`], until the await has been answered via [`supply`](Stage::supply).
/// - Must not call [`supply`](Stage::supply) unless the stage awaits input.
#[derive(Copy, Clone, Hash, Ord, Eq, PartialEq, PartialOrd)]
pub struct Invariant<S> {
    inner: S,
}

impl<S: core::fmt::Debug> core::fmt::Debug for Invariant<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.inner.fmt(f)
    }
}

impl<S> Invariant<S> {
    /// Returns a stage that behaves exactly like the wrapped stage
    /// `inner`, except that - when running tests - it performs runtime
    /// validation of the driving protocol and panics if it is violated.
    pub fn new(inner: S) -> Self {
        Invariant { inner }
    }
}

impl<S> AsRef<S> for Invariant<S> {
    fn as_ref(&self) -> &S {
        &self.inner
    }
}

impl<S> AsMut<S> for Invariant<S> {
    fn as_mut(&mut self) -> &mut S {
        &mut self.inner
    }
}

impl<S> Wrapper<S> for Invariant<S> {
    fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: Stage> Stage for Invariant<S> {
    type Input = S::Input;
    type Output = S::Output;
    type Final = S::Final;
    type Error = S::Error;

    async fn resume(&mut self) -> Result<Step<Self::Output, Self::Final>, Self::Error> {
        self.inner.resume().await
    }

    fn supply(&mut self, input: Option<Self::Input>) {
        self.inner.supply(input)
    }
}
