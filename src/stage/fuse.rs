use wrapper::Wrapper;

use crate::stage::{Invariant, Stage, Step};

/// A pipeline of two stages: every output of the upstream stage becomes an input of the downstream stage.
///
/// The pipeline awaits whatever the upstream stage awaits, emits whatever the downstream stage emits, and terminates with the final value of the downstream stage. Once the upstream stage terminates, its final value is dropped and the downstream stage is told that no further input exists.
///
/// The downstream stage always runs first: the upstream stage is only resumed when the downstream stage awaits an input, so the pipeline never computes an upstream output that is not needed.
///
/// Obtain via [`StageExt::fuse`](crate::StageExt::fuse) or [`fuse`](crate::stage::fuse).
#[derive(Debug)]
pub struct Fuse<U, D> {
    /// `None` once the upstream stage has terminated.
    upstream: Option<Invariant<U>>,
    downstream: Invariant<D>,
    /// Whether the downstream stage awaits an input that has not been supplied yet.
    downstream_awaits: bool,
}

impl<U, D> Fuse<U, D> {
    pub(crate) fn new(upstream: U, downstream: D) -> Self {
        Fuse {
            upstream: Some(Invariant::new(upstream)),
            downstream: Invariant::new(downstream),
            downstream_awaits: false,
        }
    }

    fn feed_downstream(&mut self, input: Option<D::Input>)
    where
        D: Stage,
    {
        self.downstream_awaits = false;
        self.downstream.supply(input);
    }
}

impl<U, D> Wrapper<(Option<U>, D)> for Fuse<U, D> {
    /// Returns the upstream stage (unless it has terminated already) and the downstream stage.
    fn into_inner(self) -> (Option<U>, D) {
        (
            self.upstream.map(|up| up.into_inner()),
            self.downstream.into_inner(),
        )
    }
}

impl<U, D> Stage for Fuse<U, D>
where
    U: Stage,
    D: Stage<Input = U::Output, Error = U::Error>,
{
    type Input = U::Input;
    type Output = D::Output;
    type Final = D::Final;
    type Error = D::Error;

    async fn resume(&mut self) -> Result<Step<Self::Output, Self::Final>, Self::Error> {
        loop {
            if !self.downstream_awaits {
                match self.downstream.resume().await? {
                    Step::Await => self.downstream_awaits = true,
                    step => return Ok(step),
                }
            }

            let upstream_step = match self.upstream.as_mut() {
                Some(upstream) => Some(upstream.resume().await?),
                None => None,
            };

            match upstream_step {
                Some(Step::Emit(item)) => self.feed_downstream(Some(item)),
                Some(Step::Await) => return Ok(Step::Await),
                Some(Step::Done(_)) => {
                    tracing::trace!("upstream stage finished, closing downstream input");
                    self.upstream = None;
                    self.feed_downstream(None);
                }
                None => self.feed_downstream(None),
            }
        }
    }

    fn supply(&mut self, input: Option<Self::Input>) {
        if let Some(upstream) = self.upstream.as_mut() {
            upstream.supply(input);
        }
    }
}
