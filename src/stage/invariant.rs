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
    /// Whether the stage may still be resumed or supplied, `false` once it terminated or erred.
    active: bool,
    /// Whether the stage awaits a call to `supply`.
    awaiting: bool,
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
        Invariant {
            inner,
            active: true,
            awaiting: false,
        }
    }

    fn check_inactive(&self) {
        if !self.active {
            panic!("may not call `Stage` methods after the stage has finished");
        }
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
        self.check_inactive();

        if self.awaiting {
            panic!("may not resume a `Stage` before supplying the input it awaits");
        }

        self.inner
            .resume()
            .await
            .inspect(|step| match step {
                Step::Await => self.awaiting = true,
                Step::Done(_) => self.active = false,
                Step::Emit(_) => {}
            })
            .inspect_err(|_| {
                self.active = false;
            })
    }

    fn supply(&mut self, input: Option<Self::Input>) {
        self.check_inactive();

        if !self.awaiting {
            panic!("may not supply input to a `Stage` that does not await input");
        }
        self.awaiting = false;

        self.inner.supply(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use core::convert::Infallible;

    use crate::stage::map;

    #[test]
    fn accepts_valid_driving() {
        pollster::block_on(async {
            let mut s = Invariant::new(map::<_, _, _, Infallible>(|x: u8| x + 1));

            assert_eq!(s.resume().await, Ok(Step::Await));
            s.supply(Some(1));
            assert_eq!(s.resume().await, Ok(Step::Emit(2)));
            assert_eq!(s.resume().await, Ok(Step::Await));
            s.supply(None);
            assert_eq!(s.resume().await, Ok(Step::Done(())));
        })
    }

    #[test]
    #[should_panic(expected = "may not resume a `Stage` before supplying the input it awaits")]
    fn panics_on_resume_while_awaiting() {
        pollster::block_on(async {
            let mut s = Invariant::new(map::<_, _, _, Infallible>(|x: u8| x));

            assert_eq!(s.resume().await, Ok(Step::Await));
            let _ = s.resume().await;
        })
    }

    #[test]
    #[should_panic(expected = "may not supply input to a `Stage` that does not await input")]
    fn panics_on_unrequested_supply() {
        let mut s = Invariant::new(map::<_, _, _, Infallible>(|x: u8| x));
        s.supply(Some(3));
    }

    #[test]
    #[should_panic(expected = "may not call `Stage` methods after the stage has finished")]
    fn panics_on_resume_after_done() {
        pollster::block_on(async {
            let mut s = Invariant::new(map::<_, _, _, Infallible>(|x: u8| x));

            assert_eq!(s.resume().await, Ok(Step::Await));
            s.supply(None);
            assert_eq!(s.resume().await, Ok(Step::Done(())));
            let _ = s.resume().await;
        })
    }
}
