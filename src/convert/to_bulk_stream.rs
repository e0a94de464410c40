use core::convert::Infallible;

use alloc::boxed::Box;
use alloc::vec::{IntoIter, Vec};

use either::Either::{self, Left, Right};
use ufotofu::{BufferedProducer, BulkProducer, Producer};
use wrapper::Wrapper;

use crate::stage::Invariant;
use crate::{Stage, Step};

/// A bulk producer that runs a chunk-emitting stage without input, exposing each chunk directly via [`expose_items`](BulkProducer::expose_items).
///
/// The stage is resumed only once the current chunk has been produced entirely. Empty chunks are skipped. Every await of the stage is answered with `None`, errors of the stage are emitted unchanged.
///
/// Obtain via [`to_bstream`].
#[derive(Debug)]
pub struct ToBulkStream<S, T> {
    stage: Invariant<S>,
    /// The not-yet-produced items of the most recently emitted chunk.
    chunk: IntoIter<T>,
}

impl<S, T> ToBulkStream<S, T> {
    pub(crate) fn new(stage: S) -> Self {
        ToBulkStream {
            stage: Invariant::new(stage),
            chunk: Vec::new().into_iter(),
        }
    }

    /// Returns the items of the current chunk that have not been produced yet.
    pub fn buffered(&self) -> &[T] {
        self.chunk.as_slice()
    }
}

impl<S, T> Wrapper<S> for ToBulkStream<S, T> {
    /// Returns the stage. Any buffered items are dropped.
    fn into_inner(self) -> S {
        self.stage.into_inner()
    }
}

impl<S, T> ToBulkStream<S, T>
where
    S: Stage<Input = Infallible, Output = Box<[T]>>,
{
    /// Resumes the stage until it emits a non-empty chunk (returning `None`), or terminates (returning its final value).
    async fn refill(&mut self) -> Result<Option<S::Final>, S::Error> {
        while self.chunk.as_slice().is_empty() {
            match self.stage.resume().await? {
                Step::Emit(chunk) => self.chunk = chunk.into_vec().into_iter(),
                Step::Await => self.stage.supply(None),
                Step::Done(fin) => return Ok(Some(fin)),
            }
        }

        Ok(None)
    }
}

impl<S, T> Producer for ToBulkStream<S, T>
where
    S: Stage<Input = Infallible, Output = Box<[T]>>,
{
    type Item = T;
    type Final = S::Final;
    type Error = S::Error;

    async fn produce(&mut self) -> Result<Either<Self::Item, Self::Final>, Self::Error> {
        if let Some(fin) = self.refill().await? {
            return Ok(Right(fin));
        }

        match self.chunk.next() {
            Some(item) => Ok(Left(item)),
            None => unreachable!("refill leaves a non-empty chunk"),
        }
    }
}

impl<S, T> BufferedProducer for ToBulkStream<S, T>
where
    S: Stage<Input = Infallible, Output = Box<[T]>>,
{
    /// Does nothing: the stage is resumed only once the current chunk has been produced.
    async fn slurp(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl<S, T> BulkProducer for ToBulkStream<S, T>
where
    S: Stage<Input = Infallible, Output = Box<[T]>>,
{
    async fn expose_items<'a>(
        &'a mut self,
    ) -> Result<Either<&'a [Self::Item], Self::Final>, Self::Error>
    where
        Self::Item: 'a,
    {
        match self.refill().await? {
            Some(fin) => Ok(Right(fin)),
            None => Ok(Left(self.chunk.as_slice())),
        }
    }

    async fn consider_produced(&mut self, amount: usize) -> Result<(), Self::Error> {
        self.chunk.by_ref().take(amount).for_each(drop);

        Ok(())
    }
}

/// Converts a stage without input that emits chunks into a bulk producer of the chunks' items, ending with the final value of the stage.
///
/// ```
/// use ufotofu_conduit::prelude::*;
/// use ufotofu::producer::FromBoxedSlice;
/// # pollster::block_on(async {
///
/// let mut p = to_bstream(from_bstream(FromBoxedSlice::from_vec(b"tofu".to_vec())));
/// assert_eq!(p.expose_items().await?, Left(&b"tofu"[..]));
/// p.consider_produced(3).await?;
/// assert_eq!(p.produce().await?, Left(b'u'));
/// assert_eq!(p.produce().await?, Right(()));
/// # Result::<(), Infallible>::Ok(())
/// # });
/// ```
pub fn to_bstream<S, T>(stage: S) -> ToBulkStream<S, T>
where
    S: Stage<Input = Infallible, Output = Box<[T]>>,
{
    ToBulkStream::new(stage)
}
