use core::cell::RefCell;
use core::fmt::Debug;
use core::future::{poll_fn, Future};
use core::marker::PhantomData;
use core::mem;
use core::pin::Pin;
use core::task::Poll;

use alloc::boxed::Box;
use alloc::rc::Rc;

use either::Either::{self, Left, Right};
use ufotofu::Producer;

use crate::{Stage, Step};

/// The rendezvous between an [`AsConduit`] stage and the [`Awaited`] producer of its inputs.
#[derive(Debug)]
enum Slot<I> {
    /// Nobody waits for input.
    Idle,
    /// The producer waits for input, the stage must await it from its driver.
    Requested,
    /// The driver answered the await, the producer has not picked up the answer yet.
    Supplied(Option<I>),
}

/// The inputs of an [`AsConduit`] stage, as a producer.
///
/// Every call to [`produce`](Producer::produce) makes the stage [await](Step::Await) an input from its driver. An input of `Some(item)` is produced as `item`, an input of `None` ends the sequence with `()`. Once the sequence has ended, every further call returns `()` again without awaiting anything.
///
/// An `Awaited` only makes progress while the stage that created it is being resumed; it never errs, its error type only exists to match the producer built on top of it.
pub struct Awaited<I, E> {
    slot: Rc<RefCell<Slot<I>>>,
    exhausted: bool,
    phantom: PhantomData<fn() -> E>,
}

impl<I, E> Debug for Awaited<I, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Awaited")
            .field("exhausted", &self.exhausted)
            .finish_non_exhaustive()
    }
}

impl<I, E> Producer for Awaited<I, E> {
    type Item = I;
    type Final = ();
    type Error = E;

    async fn produce(&mut self) -> Result<Either<Self::Item, Self::Final>, Self::Error> {
        if self.exhausted {
            return Ok(Right(()));
        }

        *self.slot.borrow_mut() = Slot::Requested;

        // Resolved by `AsConduit::resume` polling again after `supply`, so no waker is stored.
        let input = poll_fn(|_cx| {
            let mut slot = self.slot.borrow_mut();
            match mem::replace(&mut *slot, Slot::Idle) {
                Slot::Supplied(input) => Poll::Ready(input),
                pending => {
                    *slot = pending;
                    Poll::Pending
                }
            }
        })
        .await;

        match input {
            Some(item) => Ok(Left(item)),
            None => {
                tracing::trace!("conduit input exhausted");
                self.exhausted = true;
                Ok(Right(()))
            }
        }
    }
}

type ProduceFuture<Q> = Pin<
    Box<
        dyn Future<
            Output = (
                Result<
                    Either<<Q as Producer>::Item, <Q as Producer>::Final>,
                    <Q as Producer>::Error,
                >,
                Q,
            ),
        >,
    >,
>;

/// A stage that runs a producer built from its own inputs, emitting the items of that producer and terminating with its final value.
///
/// The producer is obtained by applying a function to an [`Awaited`], the producer of the stage's inputs. Whenever the producer asks its `Awaited` for an item, the stage [awaits](Step::Await) an input from its driver. Any other reason for the producer to suspend (a genuine effect returning `Poll::Pending`) suspends the [`resume`](Stage::resume) future itself, and the waker of that effect is honoured.
///
/// The stage is exactly as incremental as the producer: mapping each item yields one emission per await, while a producer that consumes its whole input before producing anything makes the stage await every input before emitting anything.
///
/// The stage owns the producer together with its in-flight `produce` future, so the producer must be `'static`: it cannot borrow from its environment. Move any state it needs into it, or share it through an `Rc`.
///
/// Obtain via [`as_conduit`].
pub struct AsConduit<I, Q: Producer> {
    slot: Rc<RefCell<Slot<I>>>,
    /// The pending `produce` call of the producer, `None` once it has emitted its final value or an error.
    produce_future: Option<ProduceFuture<Q>>,
}

impl<I: Debug, Q: Producer> Debug for AsConduit<I, Q> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AsConduit")
            .field("slot", &self.slot)
            .field("finished", &self.produce_future.is_none())
            .finish()
    }
}

impl<I, Q> AsConduit<I, Q>
where
    Q: Producer + 'static,
{
    pub(crate) fn new<F>(fun: F) -> Self
    where
        F: FnOnce(Awaited<I, Q::Error>) -> Q,
    {
        let slot = Rc::new(RefCell::new(Slot::Idle));
        let producer = fun(Awaited {
            slot: slot.clone(),
            exhausted: false,
            phantom: PhantomData,
        });

        AsConduit {
            slot,
            produce_future: Some(Self::produce_next(producer)),
        }
    }

    fn produce_next(mut producer: Q) -> ProduceFuture<Q> {
        Box::pin(async move { (producer.produce().await, producer) })
    }
}

impl<I, Q> Stage for AsConduit<I, Q>
where
    Q: Producer + 'static,
{
    type Input = I;
    type Output = Q::Item;
    type Final = Q::Final;
    type Error = Q::Error;

    async fn resume(&mut self) -> Result<Step<Self::Output, Self::Final>, Self::Error> {
        let mut produce_future = match self.produce_future.take() {
            Some(fut) => fut,
            None => panic!("may not resume an `AsConduit` after it has finished"),
        };

        let slot = &self.slot;
        let outcome = poll_fn(|cx| match produce_future.as_mut().poll(cx) {
            Poll::Ready(produced) => Poll::Ready(Some(produced)),
            Poll::Pending => match *slot.borrow() {
                Slot::Requested => Poll::Ready(None),
                _ => Poll::Pending,
            },
        })
        .await;

        match outcome {
            None => {
                self.produce_future = Some(produce_future);
                Ok(Step::Await)
            }
            Some((produced, producer)) => match produced? {
                Left(item) => {
                    self.produce_future = Some(Self::produce_next(producer));
                    Ok(Step::Emit(item))
                }
                Right(fin) => Ok(Step::Done(fin)),
            },
        }
    }

    fn supply(&mut self, input: Option<Self::Input>) {
        *self.slot.borrow_mut() = Slot::Supplied(input);
    }
}

/// Turns a function from the producer of inputs to a producer of outputs into a stage.
///
/// The function is applied once, when the stage is created. The resulting producer is driven lazily: the stage only pulls an item from it when resumed, and the producer only makes the stage await an input when it asks for one.
///
/// The producer returned by `fun` must be `'static`, so it cannot borrow from the environment of the call. It may capture owned or reference-counted values instead.
///
/// ```
/// use ufotofu::producer::MapItem;
/// use ufotofu_conduit::prelude::*;
/// # pollster::block_on(async {
///
/// let mut s = as_conduit(|input: Awaited<u8, Infallible>| MapItem::new(input, |x: u8| x + 1));
/// assert_eq!(s.resume().await?, Step::Await);
/// s.supply(Some(1));
/// assert_eq!(s.resume().await?, Step::Emit(2));
/// assert_eq!(s.resume().await?, Step::Await);
/// s.supply(None);
/// assert_eq!(s.resume().await?, Step::Done(()));
/// # Result::<(), Infallible>::Ok(())
/// # });
/// ```
pub fn as_conduit<I, Q, F>(fun: F) -> AsConduit<I, Q>
where
    Q: Producer + 'static,
    F: FnOnce(Awaited<I, Q::Error>) -> Q,
{
    AsConduit::new(fun)
}
