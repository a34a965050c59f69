// desi_store/src/routine/execution.rs

use crate::error::{StoreError, StoreResult};
use crate::routine::control::{RoutineOutcome, StepControl};
use crate::routine::definition::Routine;
use tracing::{event, span, Level};

impl<Ctx: 'static> Routine<Ctx> {
  /// Runs every step in order against `ctx`.
  ///
  /// A handler error aborts the routine and is returned as-is. A non-optional
  /// step with no handlers is reported as `StoreError::HandlerMissing`.
  pub fn run(&self, ctx: &mut Ctx) -> StoreResult<RoutineOutcome> {
    let routine_span = span!(Level::DEBUG, "routine", routine = self.name, num_steps = self.steps.len());
    let _routine_guard = routine_span.enter();
    event!(Level::DEBUG, "Routine starting.");

    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_span = span!(
        Level::DEBUG,
        "routine_step",
        step_name = step_def.name.as_str(),
        step_index = step_idx,
        optional = step_def.optional
      );
      let _step_guard = step_span.enter();

      // Skip conditions see the context as earlier steps left it.
      if let Some(skip_if) = &step_def.skip_if {
        if skip_if(ctx) {
          event!(Level::DEBUG, "Step skipped by its skip condition.");
          continue;
        }
      }

      let handlers = match self.handlers.get(&step_def.name) {
        Some(handlers) if !handlers.is_empty() => handlers,
        _ if step_def.optional => {
          event!(Level::DEBUG, "Optional step has no handlers, skipping.");
          continue;
        }
        _ => {
          event!(Level::ERROR, "Non-optional step has no handlers.");
          return Err(StoreError::HandlerMissing {
            step_name: step_def.name.clone(),
          });
        }
      };

      // Stop ends the whole routine, not just the current step.
      for (handler_idx, handler) in handlers.iter().enumerate() {
        match handler(ctx) {
          Ok(StepControl::Continue) => {}
          Ok(StepControl::Stop) => {
            event!(Level::DEBUG, handler_index = handler_idx, "Routine stopped by handler.");
            return Ok(RoutineOutcome::Stopped);
          }
          Err(e) => {
            // No rollback: effects of earlier handlers stay on the context.
            event!(Level::ERROR, handler_index = handler_idx, error = %e, "Step handler failed.");
            return Err(e);
          }
        }
      }
    }

    event!(Level::DEBUG, "Routine completed.");
    Ok(RoutineOutcome::Completed)
  }
}
