//! Conversions between [`Producer`](ufotofu::Producer)s and [`Stage`](crate::Stage)s.
//!
//! ## Producers to Stages
//!
//! - [`from_stream`] emits the items of a producer and terminates with its final value.
//! - [`from_stream_source`] and [`from_stream_producer`] do the same, but terminate with `()`.
//! - [`from_bstream`] and [`from_bstream_producer`] emit the items of a [`BulkProducer`](ufotofu::BulkProducer) as owned chunks.
//!
//! All of these produce stages without input: their [`Input`](crate::Stage::Input) type is [`Infallible`](core::convert::Infallible).
//!
//! ## Stages to Producers
//!
//! - [`to_stream`] produces the outputs of a stage without input.
//! - [`to_bstream`] does the same for a chunk-emitting stage, yielding a [`BulkProducer`](ufotofu::BulkProducer) that exposes the chunks directly.
//!
//! ## Adapters
//!
//! - [`as_stream`] applies a stage to a producer of its inputs.
//! - [`as_conduit`] turns a function between producers into a stage.
//!
//! No conversion buffers more than a single item or chunk, and none introduces errors of its own: every error is the unchanged error of the wrapped producer or stage, surfacing at the point where the wrapped value emitted it.

mod from_stream;
pub use from_stream::{from_stream, from_stream_producer, from_stream_source, FromStream, FromStreamSource};

mod to_stream;
pub use to_stream::{to_stream, ToStream};

mod as_stream;
pub use as_stream::as_stream;

#[cfg(feature = "alloc")]
mod from_bulk_stream;
#[cfg(feature = "alloc")]
pub use from_bulk_stream::{from_bstream, from_bstream_producer, FromBulkStream};

#[cfg(feature = "alloc")]
mod to_bulk_stream;
#[cfg(feature = "alloc")]
pub use to_bulk_stream::{to_bstream, ToBulkStream};

#[cfg(feature = "alloc")]
mod as_conduit;
#[cfg(feature = "alloc")]
pub use as_conduit::{as_conduit, AsConduit, Awaited};
