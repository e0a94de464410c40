use wrapper::Wrapper;

use crate::stage::{Stage, Step};

/// A stage wrapper that maps the final value of the wrapped stage with a function. Awaits and emissions pass through unchanged.
///
/// Obtain via [`StageExt::map_final`](crate::StageExt::map_final).
#[derive(Debug)]
pub struct MapFinal<S, F> {
    inner: S,
    fun: F,
}

impl<S, F> MapFinal<S, F> {
    pub(crate) fn new(inner: S, fun: F) -> Self {
        MapFinal { inner, fun }
    }
}

impl<S, F> AsRef<S> for MapFinal<S, F> {
    fn as_ref(&self) -> &S {
        &self.inner
    }
}

impl<S, F> AsMut<S> for MapFinal<S, F> {
    fn as_mut(&mut self) -> &mut S {
        &mut self.inner
    }
}

impl<S, F> Wrapper<S> for MapFinal<S, F> {
    fn into_inner(self) -> S {
        self.inner
    }
}

impl<B, S, F> Stage for MapFinal<S, F>
where
    S: Stage,
    F: FnMut(S::Final) -> B,
{
    type Input = S::Input;
    type Output = S::Output;
    type Final = B;
    type Error = S::Error;

    async fn resume(&mut self) -> Result<Step<Self::Output, Self::Final>, Self::Error> {
        Ok(match self.inner.resume().await? {
            Step::Await => Step::Await,
            Step::Emit(output) => Step::Emit(output),
            Step::Done(fin) => Step::Done((self.fun)(fin)),
        })
    }

    fn supply(&mut self, input: Option<Self::Input>) {
        self.inner.supply(input)
    }
}
