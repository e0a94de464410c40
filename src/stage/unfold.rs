use core::convert::Infallible;
use core::fmt::Debug;
use core::future::Future;

use crate::stage::{Stage, Step};

/// A stage without input that repeatedly runs an async step function on a state, emitting one output per step. Terminates with `()` when the step function returns `Ok(None)`.
///
/// Obtain via [`unfold`](crate::stage::unfold).
pub struct Unfold<S, F> {
    /// `None` once the step function signalled the end, or returned an error.
    state: Option<S>,
    step: F,
}

impl<S, F> Unfold<S, F> {
    pub(crate) fn new(state: S, step: F) -> Self {
        Unfold {
            state: Some(state),
            step,
        }
    }

    /// Returns the current state, unless the stage has terminated.
    pub fn state(&self) -> Option<&S> {
        self.state.as_ref()
    }
}

impl<S: Debug, F> Debug for Unfold<S, F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Unfold")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<S, F, Fut, O, E> Stage for Unfold<S, F>
where
    F: FnMut(S) -> Fut,
    Fut: Future<Output = Result<Option<(O, S)>, E>>,
{
    type Input = Infallible;
    type Output = O;
    type Final = ();
    type Error = E;

    async fn resume(&mut self) -> Result<Step<Self::Output, Self::Final>, Self::Error> {
        let state = match self.state.take() {
            Some(state) => state,
            None => return Ok(Step::Done(())),
        };

        match (self.step)(state).await? {
            Some((output, next)) => {
                self.state = Some(next);
                Ok(Step::Emit(output))
            }
            None => Ok(Step::Done(())),
        }
    }

    fn supply(&mut self, _input: Option<Self::Input>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::stage::unfold;

    #[test]
    fn unfolds_until_none() {
        pollster::block_on(async {
            let mut s = unfold(1u32, |n| async move {
                Ok::<_, Infallible>(if n <= 100 { Some((n, n * 10)) } else { None })
            });

            assert_eq!(s.resume().await, Ok(Step::Emit(1)));
            assert_eq!(s.state(), Some(&10));
            assert_eq!(s.resume().await, Ok(Step::Emit(10)));
            assert_eq!(s.resume().await, Ok(Step::Emit(100)));
            assert_eq!(s.resume().await, Ok(Step::Done(())));
            assert_eq!(s.state(), None);
        })
    }

    #[test]
    fn emits_step_errors() {
        pollster::block_on(async {
            let mut s = unfold((), |()| async { Err::<Option<(u8, ())>, _>(-3i8) });

            assert_eq!(s.resume().await, Err(-3));
            assert_eq!(s.state(), None);
        })
    }
}
