use core::convert::Infallible;

use either::Either::{Left, Right};
use ufotofu::Producer;
use wrapper::Wrapper;

use crate::stage::{unfold, MapFinal};
use crate::{Stage, StageExt, Step};

/// A stage without input that emits the items of a producer and terminates with its final value.
///
/// Each [`resume`](Stage::resume) calls [`produce`](Producer::produce) exactly once, so all effects of the producer happen inside the resumption that emits the corresponding item. Errors of the producer are emitted unchanged.
///
/// Obtain via [`from_stream`].
#[derive(Debug)]
pub struct FromStream<P> {
    producer: P,
}

impl<P> FromStream<P> {
    pub(crate) fn new(producer: P) -> Self {
        FromStream { producer }
    }
}

impl<P> AsRef<P> for FromStream<P> {
    fn as_ref(&self) -> &P {
        &self.producer
    }
}

impl<P> Wrapper<P> for FromStream<P> {
    fn into_inner(self) -> P {
        self.producer
    }
}

impl<P: Producer> Stage for FromStream<P> {
    type Input = Infallible;
    type Output = P::Item;
    type Final = P::Final;
    type Error = P::Error;

    async fn resume(&mut self) -> Result<Step<Self::Output, Self::Final>, Self::Error> {
        Ok(match self.producer.produce().await? {
            Left(item) => Step::Emit(item),
            Right(fin) => Step::Done(fin),
        })
    }

    fn supply(&mut self, _input: Option<Self::Input>) {}
}

/// A [`FromStream`] that discards the final value of its producer, terminating with `()` instead.
///
/// Obtain via [`from_stream_source`].
pub type FromStreamSource<P> = MapFinal<FromStream<P>, fn(<P as Producer>::Final)>;

/// Converts a producer into a stage without input that emits every item of the producer, in order, and terminates with the final value of the producer.
///
/// ```
/// use ufotofu_conduit::prelude::*;
/// use ufotofu::producer::FromBoxedSlice;
/// # pollster::block_on(async {
///
/// let mut s = from_stream(FromBoxedSlice::from_vec(vec![1, 2]));
/// assert_eq!(s.resume().await?, Step::Emit(1));
/// assert_eq!(s.resume().await?, Step::Emit(2));
/// assert_eq!(s.resume().await?, Step::Done(()));
/// # Result::<(), Infallible>::Ok(())
/// # });
/// ```
pub fn from_stream<P: Producer>(producer: P) -> FromStream<P> {
    FromStream::new(producer)
}

/// Converts a producer into a stage without input that emits every item of the producer, in order, and terminates with `()`. The final value of the producer is discarded.
pub fn from_stream_source<P: Producer>(producer: P) -> FromStreamSource<P> {
    from_stream(producer).map_final(drop as fn(P::Final))
}

/// Converts a producer into a stage without input by unfolding it: the state of the unfold is the producer itself, each step produces one item or ends the stage.
///
/// Behaves exactly like [`from_stream_source`]. This is the form that [`as_stream`](crate::convert::as_stream) places upstream of a stage.
pub fn from_stream_producer<P: Producer>(
    producer: P,
) -> impl Stage<Input = Infallible, Output = P::Item, Final = (), Error = P::Error> {
    unfold(producer, |mut producer: P| async move {
        match producer.produce().await {
            Ok(Left(item)) => Ok(Some((item, producer))),
            Ok(Right(_)) => Ok(None),
            Err(err) => Err(err),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use alloc::vec;

    use ufotofu::producer::TestProducerBuilder;

    #[test]
    fn emits_items_then_final() {
        pollster::block_on(async {
            let p = TestProducerBuilder::<u8, char, ()>::new(vec![4, 5].into(), Ok('z'))
                .yield_pattern(vec![true, false, true].into())
                .build();
            let mut s = from_stream(p);

            assert_eq!(s.resume().await, Ok(Step::Emit(4)));
            assert_eq!(s.resume().await, Ok(Step::Emit(5)));
            assert_eq!(s.resume().await, Ok(Step::Done('z')));
        })
    }

    #[test]
    fn source_discards_final() {
        pollster::block_on(async {
            let p = TestProducerBuilder::<u8, char, ()>::new(vec![4].into(), Ok('z')).build();
            let mut s = from_stream_source(p);

            assert_eq!(s.resume().await, Ok(Step::Emit(4)));
            assert_eq!(s.resume().await, Ok(Step::Done(())));
        })
    }

    #[test]
    fn unfolded_producer_matches_source() {
        pollster::block_on(async {
            let p = TestProducerBuilder::<u8, char, ()>::new(vec![4, 6].into(), Ok('z')).build();
            let mut s = from_stream_producer(p);

            assert_eq!(s.resume().await, Ok(Step::Emit(4)));
            assert_eq!(s.resume().await, Ok(Step::Emit(6)));
            assert_eq!(s.resume().await, Ok(Step::Done(())));
        })
    }

    #[test]
    fn forwards_errors_unchanged() {
        pollster::block_on(async {
            let p = TestProducerBuilder::<u8, (), i32>::new(vec![1].into(), Err(-7)).build();
            let mut s = from_stream_producer(p);

            assert_eq!(s.resume().await, Ok(Step::Emit(1)));
            assert_eq!(s.resume().await, Err(-7));
        })
    }

    #[test]
    fn recovers_producer() {
        let p = TestProducerBuilder::<u8, (), ()>::new(vec![1, 2].into(), Ok(())).build();
        let s = from_stream(p);

        assert_eq!(s.as_ref().remaining(), &[1, 2]);
        assert!(!s.into_inner().did_already_emit_last());
    }
}
