#![no_std]
#![allow(clippy::type_complexity)]
#![allow(async_fn_in_trait)]

//! Conversions between lazily pulled sequences ([`Producer`](ufotofu::Producer)s) and push-driven processing stages ([`Stage`]s).
//!
//! A [`Producer`](ufotofu::Producer) is driven by its consumer: every call to [`produce`](ufotofu::Producer::produce) performs whatever effects are needed to obtain the next item, or the final value. A [`Stage`] is driven from the outside by a runner: it suspends whenever it needs its next input ([`Step::Await`]) or has an output to hand downstream ([`Step::Emit`]), and ends with a final value ([`Step::Done`]). Stages compose into pipelines via [`StageExt::fuse`].
//!
//! The [`convert`] module bridges the two shapes:
//!
//! - [`from_stream`](convert::from_stream) and friends turn a producer into a stage without input,
//! - [`from_bstream`](convert::from_bstream) does the same for a [`BulkProducer`](ufotofu::BulkProducer), one chunk per emission,
//! - [`to_stream`](convert::to_stream) and [`to_bstream`](convert::to_bstream) turn a stage without input back into a (bulk) producer,
//! - [`as_stream`](convert::as_stream) applies a stage to a producer, yielding a producer,
//! - [`as_conduit`](convert::as_conduit) turns a function between producers into a stage.
//!
//! ## Fundamental Design Choices
//!
//! - Async trait methods, no poll-based interfaces.
//! - `nostd` by default.
//! - Fatal errors, no resumption of processing after an error was signalled.
//! - Conversions are transparent: they neither buffer more than one item (or chunk) ahead, nor introduce errors of their own.
//!
//! ## Caveats
//!
//! - The futures returned by async methods are `!Send`, they cannot be run on multi-threaded executors.
//! - Dropping any method-returned future before polling it to completion will leave the original object in an undefined state; subsequent method calls may display arbitrary (but always safe) behaviour.
//! - Unwinding any panic may leave values of this crate in an undefined state.

#[cfg(feature = "std")]
extern crate std;

#[cfg(any(feature = "alloc", test))]
extern crate alloc;

use core::convert::Infallible;

use ufotofu::{Consumer, PipeError};

pub mod stage;
pub use stage::{Stage, StageExt, Step};

pub mod convert;

/// A “prelude” for crates using the `ufotofu_conduit` crate.
///
/// Import its entire contents:
///
/// use ufotofu_conduit::prelude::*;
pub mod prelude {
    pub use crate::convert::*;
    pub use crate::{drain, Stage, StageExt, Step};
    pub use either::Either::{self, Left, Right};
    pub use ufotofu::{pipe, BufferedProducer, BulkProducer, Consumer, PipeError, Producer};

    pub use core::convert::Infallible;
}

/// Runs a [`Stage`] that takes no input to completion, handing every output to a [`Consumer`], and finally closing the consumer with the final value of the stage.
///
/// Every [`Await`](Step::Await) of the stage is answered with `None`. This is the stage counterpart of [`ufotofu::pipe`]: errors of the stage are reported as [`PipeError::Producer`].
///
/// ```
/// use ufotofu::consumer::IntoVec;
/// use ufotofu::producer::FromBoxedSlice;
/// use ufotofu_conduit::prelude::*;
/// # pollster::block_on(async {
///
/// let mut into_vec = IntoVec::new();
/// drain(from_stream(FromBoxedSlice::from_vec(vec![1, 2, 4])), &mut into_vec).await?;
/// assert_eq!(into_vec.into_vec(), vec![1, 2, 4]);
/// # Result::<(), PipeError<Infallible, Infallible>>::Ok(())
/// # });
/// ```
pub async fn drain<S, C>(stage: S, consumer: &mut C) -> Result<(), PipeError<S::Error, C::Error>>
where
    S: Stage<Input = Infallible>,
    C: Consumer<Item = S::Output, Final = S::Final>,
{
    let mut stage = stage::Invariant::new(stage);

    loop {
        match stage.resume().await.map_err(PipeError::Producer)? {
            Step::Emit(item) => consumer.consume(item).await.map_err(PipeError::Consumer)?,
            Step::Await => stage.supply(None),
            Step::Done(fin) => {
                tracing::trace!("drained stage finished, closing consumer");
                return consumer.close(fin).await.map_err(PipeError::Consumer);
            }
        }
    }
}

/// Produces all remaining items of a producer, returning them together with the final value.
#[cfg(test)]
pub(crate) async fn collect_items<P: ufotofu::Producer>(
    producer: &mut P,
) -> Result<(alloc::vec::Vec<P::Item>, P::Final), P::Error> {
    use either::Either::{Left, Right};

    let mut items = alloc::vec::Vec::new();
    loop {
        match producer.produce().await? {
            Left(item) => items.push(item),
            Right(fin) => return Ok((items, fin)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use alloc::vec;

    use ufotofu::consumer::IntoVec;
    use ufotofu::pipe;
    use ufotofu::producer::{FromBoxedSlice, TestProducerBuilder};

    use crate::convert::{as_stream, from_stream};
    use crate::stage::{map, unfold};

    #[test]
    fn drains_stage_into_consumer() {
        pollster::block_on(async {
            let mut c = IntoVec::new();
            let stage = from_stream(FromBoxedSlice::from_vec(vec![3, 2, 1]));

            assert_eq!(drain(stage, &mut c).await, Ok(()));
            assert_eq!(c.into_vec(), vec![3, 2, 1]);
        })
    }

    #[test]
    fn drain_reports_stage_errors() {
        pollster::block_on(async {
            let mut c = IntoVec::new();
            let p = TestProducerBuilder::<u8, (), u16>::new(vec![9].into(), Err(404)).build();

            assert_eq!(drain(from_stream(p), &mut c).await, Err(PipeError::Producer(404)));
            assert_eq!(c.into_vec(), vec![9]);
        })
    }

    #[test]
    fn drains_pipeline_of_stages() {
        pollster::block_on(async {
            let mut c = IntoVec::new();
            let source = unfold(0u8, |n| async move {
                Ok::<_, Infallible>(if n < 2 { Some((n, n + 1)) } else { None })
            });
            let stage = stage::fuse(source, map(|x: u8| x * 5));

            assert_eq!(drain(stage, &mut c).await, Ok(()));
            assert_eq!(c.into_vec(), vec![0, 5]);
        })
    }

    #[test]
    fn pipes_stage_applied_to_producer() {
        pollster::block_on(async {
            let input = FromBoxedSlice::from_vec(vec![1, 2, 3]);
            let mut doubled = as_stream(map(|x: i32| x * 2), input);
            let mut c = IntoVec::new();

            assert_eq!(pipe(&mut doubled, &mut c).await, Ok(()));
            assert_eq!(c.into_vec(), vec![2, 4, 6]);
        })
    }
}
