use core::convert::Infallible;

use alloc::boxed::Box;

use either::Either::{Left, Right};
use ufotofu::BulkProducer;
use wrapper::Wrapper;

use crate::stage::unfold;
use crate::{Stage, Step};

/// A stage without input that emits the items of a bulk producer in chunks, and terminates with `()`.
///
/// Each [`resume`](Stage::resume) copies the whole slice exposed by the producer into an owned chunk, marks it as produced, and emits it. Since bulk producers never expose empty slices, no chunk is empty. The final value of the producer is discarded, its errors are emitted unchanged.
///
/// Obtain via [`from_bstream`].
#[derive(Debug)]
pub struct FromBulkStream<P> {
    producer: P,
}

impl<P> FromBulkStream<P> {
    pub(crate) fn new(producer: P) -> Self {
        FromBulkStream { producer }
    }
}

impl<P> AsRef<P> for FromBulkStream<P> {
    fn as_ref(&self) -> &P {
        &self.producer
    }
}

impl<P> Wrapper<P> for FromBulkStream<P> {
    fn into_inner(self) -> P {
        self.producer
    }
}

impl<P> Stage for FromBulkStream<P>
where
    P: BulkProducer,
    P::Item: Clone,
{
    type Input = Infallible;
    type Output = Box<[P::Item]>;
    type Final = ();
    type Error = P::Error;

    async fn resume(&mut self) -> Result<Step<Self::Output, Self::Final>, Self::Error> {
        let chunk: Box<[P::Item]> = match self.producer.expose_items().await? {
            Left(items) => items.into(),
            Right(_) => return Ok(Step::Done(())),
        };

        self.producer.consider_produced(chunk.len()).await?;
        Ok(Step::Emit(chunk))
    }

    fn supply(&mut self, _input: Option<Self::Input>) {}
}

/// Converts a bulk producer into a stage without input that emits its items as owned chunks, one chunk per exposed slice.
///
/// The concatenation of all emitted chunks equals the sequence of items of the producer. Chunk boundaries follow whatever slices the producer exposes.
///
/// ```
/// use ufotofu_conduit::prelude::*;
/// use ufotofu::producer::FromBoxedSlice;
/// # pollster::block_on(async {
///
/// let mut s = from_bstream(FromBoxedSlice::from_vec(b"tofu".to_vec()));
/// assert_eq!(s.resume().await?, Step::Emit(b"tofu".to_vec().into_boxed_slice()));
/// assert_eq!(s.resume().await?, Step::Done(()));
/// # Result::<(), Infallible>::Ok(())
/// # });
/// ```
pub fn from_bstream<P>(producer: P) -> FromBulkStream<P>
where
    P: BulkProducer,
    P::Item: Clone,
{
    FromBulkStream::new(producer)
}

/// Converts a bulk producer into a chunk-emitting stage by unfolding it, see [`from_stream_producer`](crate::convert::from_stream_producer).
///
/// Behaves exactly like [`from_bstream`].
pub fn from_bstream_producer<P>(
    producer: P,
) -> impl Stage<Input = Infallible, Output = Box<[P::Item]>, Final = (), Error = P::Error>
where
    P: BulkProducer,
    P::Item: Clone,
{
    unfold(producer, |mut producer: P| async move {
        let chunk: Box<[P::Item]> = match producer.expose_items().await {
            Ok(Left(items)) => items.into(),
            Ok(Right(_)) => return Ok(None),
            Err(err) => return Err(err),
        };

        match producer.consider_produced(chunk.len()).await {
            Ok(()) => Ok(Some((chunk, producer))),
            Err(err) => Err(err),
        }
    })
}
