//! Sequential step runner with compensating actions.
//! Steps run strictly in order against a shared context. When one fails,
//! every step that started (the failing one included) is compensated in
//! reverse order, then the original error is returned.

use crate::error::Result;
use log::{debug, info, warn};

/// A single unit of work in a pipeline.
pub trait Step<C> {
    /// Stage name reported in logs
    fn name(&self) -> &'static str;

    fn run(&self, ctx: &mut C) -> Result<()>;

    /// Undoes whatever `run` managed to do. Must tolerate a partial run.
    fn compensate(&self, _ctx: &mut C) -> Result<()> {
        Ok(())
    }
}

/// Outcome of a failed pipeline run.
#[derive(Debug)]
pub struct PipelineFailure {
    /// Name of the step that failed
    pub step: &'static str,
    pub error: crate::error::Error,
    /// Steps whose compensation itself failed
    pub uncompensated: Vec<&'static str>,
}

/// Ordered list of steps.
pub struct Pipeline<'a, C> {
    steps: Vec<Box<dyn Step<C> + 'a>>,
}

impl<'a, C> Default for Pipeline<'a, C> {
    fn default() -> Self {
        Self { steps: Vec::new() }
    }
}

impl<'a, C> Pipeline<'a, C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a step.
    pub fn step<S: Step<C> + 'a>(mut self, step: S) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Runs every step in order.
    ///
    /// # Returns
    /// * `Ok(())` - All steps completed
    /// * `Err(PipelineFailure)` - A step failed and the started steps were
    ///   compensated
    pub fn run(&self, ctx: &mut C) -> std::result::Result<(), PipelineFailure> {
        for (index, step) in self.steps.iter().enumerate() {
            debug!("Stage: {}", step.name());
            if let Err(error) = step.run(ctx) {
                warn!("Stage '{}' failed: {}", step.name(), error);
                info!("Rolling back...");
                let uncompensated = self.compensate(ctx, index);
                return Err(PipelineFailure { step: step.name(), error, uncompensated });
            }
        }
        Ok(())
    }

    fn compensate(&self, ctx: &mut C, failed_index: usize) -> Vec<&'static str> {
        let mut uncompensated = Vec::new();
        for step in self.steps[..=failed_index].iter().rev() {
            debug!("Compensating stage: {}", step.name());
            if let Err(e) = step.compensate(ctx) {
                warn!("Could not undo stage '{}': {}", step.name(), e);
                uncompensated.push(step.name());
            }
        }
        uncompensated
    }
}
