use ufotofu::Producer;

use crate::convert::{from_stream_producer, to_stream};
use crate::{Stage, StageExt};

/// Applies a stage to a producer of its inputs, yielding a producer of its outputs that ends with the final value of the stage.
///
/// The stage pulls from `input` only when it awaits, and every item of the returned producer is computed on demand. Once `input` is exhausted, its final value is dropped and the stage is told that no further input exists. Errors of `input` and of the stage are emitted unchanged, in the order they occur.
///
/// Applying two stages in sequence is the same as applying their composition: `as_stream(a, as_stream(b, input))` produces the same sequence as `as_stream(b.fuse(a), input)`.
///
/// ```
/// use ufotofu::consumer::IntoVec;
/// use ufotofu::producer::FromBoxedSlice;
/// use ufotofu_conduit::prelude::*;
/// use ufotofu_conduit::stage::map;
/// # pollster::block_on(async {
///
/// let input = FromBoxedSlice::from_vec(vec!["ufo", "tofu"]);
/// let mut lengths = as_stream(map(|s: &str| s.len()), input);
/// let mut into_vec = IntoVec::new();
/// pipe(&mut lengths, &mut into_vec).await?;
/// assert_eq!(into_vec.into_vec(), vec![3, 4]);
/// # Result::<(), PipeError<Infallible, Infallible>>::Ok(())
/// # });
/// ```
pub fn as_stream<S, P>(
    stage: S,
    input: P,
) -> impl Producer<Item = S::Output, Final = S::Final, Error = S::Error>
where
    S: Stage,
    P: Producer<Item = S::Input, Error = S::Error>,
{
    to_stream(from_stream_producer(input).fuse(stage))
}
