// desi_store/src/routine/step.rs

//! A single declared step and the closures attached to it.

use crate::error::StoreResult;
use crate::routine::control::StepControl;
use std::sync::Arc;

/// One unit of work on a step. Handlers of the same step run in registration
/// order and share the mutable context.
pub type StepHandler<Ctx> = Box<dyn Fn(&mut Ctx) -> StoreResult<StepControl> + Send + Sync>;

/// Evaluated before a step runs; `true` skips the step.
pub type SkipCondition<Ctx> = Arc<dyn Fn(&Ctx) -> bool + Send + Sync + 'static>;

/// Declaration of a step: its name, whether it may run without handlers, and
/// an optional skip condition.
pub struct StepDef<Ctx: 'static> {
  pub name: String,
  // An optional step with no handlers is passed over instead of failing the run.
  pub optional: bool,
  // Checked against the context right before the step; handlers never see a skipped step.
  pub skip_if: Option<SkipCondition<Ctx>>,
}

// Closures have no Debug, so only the presence of a skip condition is shown.
impl<Ctx: 'static> std::fmt::Debug for StepDef<Ctx> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("StepDef")
      .field("name", &self.name)
      .field("optional", &self.optional)
      .field("skip_if_present", &self.skip_if.is_some())
      .finish()
  }
}
