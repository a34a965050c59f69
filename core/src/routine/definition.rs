// desi_store/src/routine/definition.rs

//! Building a routine: declare the steps up front, then attach handlers by name.

use crate::error::StoreResult;
use crate::routine::control::StepControl;
use crate::routine::step::{SkipCondition, StepDef, StepHandler};
use std::collections::HashMap;

/// A named, ordered sequence of steps run against a context of type `Ctx`.
pub struct Routine<Ctx: 'static> {
  // Used as the span field and in error reports.
  pub(crate) name: &'static str,
  // Declaration order is execution order.
  pub(crate) steps: Vec<StepDef<Ctx>>,
  // Keyed by step name; a declared step may have no entry at all.
  pub(crate) handlers: HashMap<String, Vec<StepHandler<Ctx>>>,
}

impl<Ctx: 'static> Routine<Ctx> {
  /// Creates a routine from `(step name, optional, skip condition)` triples.
  pub fn new(name: &'static str, step_defs: &[(&str, bool, Option<SkipCondition<Ctx>>)]) -> Self {
    let steps = step_defs
      .iter()
      .map(|(step_name, optional, skip_if)| StepDef {
        name: (*step_name).to_string(),
        optional: *optional,
        skip_if: skip_if.clone(),
      })
      .collect();

    Self {
      name,
      steps,
      handlers: HashMap::new(),
    }
  }

  pub fn name(&self) -> &'static str {
    self.name
  }

  pub fn step_names(&self) -> Vec<&str> {
    self.steps.iter().map(|s| s.name.as_str()).collect()
  }

  /// Registers a handler for `step_name`. Handlers of a step run in registration order.
  ///
  /// Panics if the step was not declared: a misspelled step name is a setup bug.
  pub fn on(&mut self, step_name: &str, handler: impl Fn(&mut Ctx) -> StoreResult<StepControl> + Send + Sync + 'static) {
    if !self.steps.iter().any(|s| s.name == step_name) {
      panic!("Routine '{}' setup error: step '{}' is not declared.", self.name, step_name);
    }
    self
      .handlers
      .entry(step_name.to_string())
      .or_default()
      .push(Box::new(handler));
  }
}
