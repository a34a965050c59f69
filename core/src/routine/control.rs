// desi_store/src/routine/control.rs

/// Signal from a step handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepControl {
  Continue,
  /// Halt the routine; no further handlers or steps run.
  Stop,
}

/// Outcome of a full routine run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutineOutcome {
  Completed,
  /// A handler returned `StepControl::Stop`.
  Stopped,
}
