use core::fmt::Debug;
use core::marker::PhantomData;

use crate::stage::{Stage, Step};

/// A stage that awaits inputs and emits each of them after passing it through a function. Terminates with `()` once there is no more input.
///
/// Obtain via [`map`](crate::stage::map).
pub struct Map<F, I, E> {
    fun: F,
    /// The answer to the most recent await, if it has not been processed yet.
    supplied: Option<Option<I>>,
    phantom: PhantomData<fn() -> E>,
}

impl<F, I, E> Map<F, I, E> {
    pub(crate) fn new(fun: F) -> Self {
        Map {
            fun,
            supplied: None,
            phantom: PhantomData,
        }
    }
}

impl<F, I: Debug, E> Debug for Map<F, I, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Map")
            .field("supplied", &self.supplied)
            .finish_non_exhaustive()
    }
}

impl<F, I, O, E> Stage for Map<F, I, E>
where
    F: FnMut(I) -> O,
{
    type Input = I;
    type Output = O;
    type Final = ();
    type Error = E;

    async fn resume(&mut self) -> Result<Step<Self::Output, Self::Final>, Self::Error> {
        match self.supplied.take() {
            None => Ok(Step::Await),
            Some(Some(input)) => Ok(Step::Emit((self.fun)(input))),
            Some(None) => Ok(Step::Done(())),
        }
    }

    fn supply(&mut self, input: Option<Self::Input>) {
        self.supplied = Some(input);
    }
}
