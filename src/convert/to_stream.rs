use core::convert::Infallible;

use either::Either::{self, Left, Right};
use ufotofu::Producer;
use wrapper::Wrapper;

use crate::stage::Invariant;
use crate::{Stage, Step};

/// A producer that runs a stage without input, producing its outputs as items and its final value as the final value.
///
/// Each [`produce`](Producer::produce) resumes the stage until it emits or terminates. Every await of the stage is answered with `None`. Errors of the stage are emitted unchanged.
///
/// Obtain via [`to_stream`].
#[derive(Debug)]
pub struct ToStream<S> {
    stage: Invariant<S>,
}

impl<S> ToStream<S> {
    pub(crate) fn new(stage: S) -> Self {
        ToStream {
            stage: Invariant::new(stage),
        }
    }
}

impl<S> AsRef<S> for ToStream<S> {
    fn as_ref(&self) -> &S {
        self.stage.as_ref()
    }
}

impl<S> Wrapper<S> for ToStream<S> {
    fn into_inner(self) -> S {
        self.stage.into_inner()
    }
}

impl<S: Stage<Input = Infallible>> Producer for ToStream<S> {
    type Item = S::Output;
    type Final = S::Final;
    type Error = S::Error;

    async fn produce(&mut self) -> Result<Either<Self::Item, Self::Final>, Self::Error> {
        loop {
            match self.stage.resume().await? {
                Step::Emit(output) => return Ok(Left(output)),
                Step::Done(fin) => return Ok(Right(fin)),
                Step::Await => self.stage.supply(None),
            }
        }
    }
}

/// Converts a stage without input into a producer of its outputs, ending with its final value.
///
/// Stages that need input are rejected by the `Input = Infallible` bound; feed them with [`as_stream`](crate::convert::as_stream) instead.
///
/// ```
/// use ufotofu::consumer::IntoVec;
/// use ufotofu_conduit::prelude::*;
/// use ufotofu_conduit::stage::unfold;
/// # pollster::block_on(async {
///
/// let mut p = to_stream(unfold(3u8, |n| async move {
///     Ok::<_, Infallible>(n.checked_sub(1).map(|m| (n, m)))
/// }));
/// let mut into_vec = IntoVec::new();
/// pipe(&mut p, &mut into_vec).await?;
/// assert_eq!(into_vec.into_vec(), vec![3, 2, 1]);
/// # Result::<(), PipeError<Infallible, Infallible>>::Ok(())
/// # });
/// ```
pub fn to_stream<S: Stage<Input = Infallible>>(stage: S) -> ToStream<S> {
    ToStream::new(stage)
}
