//! [`Tracer`] — the engine's entry point for the command layer.

use contrace_core::{PersonId, PersonRef, PlaceId, Records, ViewFilter};

use crate::{
  HighRisk, Result, RiskPolicy, TraceWindow, contacts, exposure, risk,
};

/// Binds a [`Records`] snapshot to a window and a risk policy.
///
/// Every query is idempotent: the same snapshot and window always give the
/// same answer.
#[derive(Debug, Clone, Copy)]
pub struct Tracer<'a> {
  records: &'a Records,
  window:  TraceWindow,
  policy:  RiskPolicy,
}

impl<'a> Tracer<'a> {
  /// A tracer with the default 14-day window ending today.
  pub fn new(records: &'a Records) -> Self {
    Self {
      records,
      window: TraceWindow::default(),
      policy: RiskPolicy::default(),
    }
  }

  pub fn with_window(mut self, window: TraceWindow) -> Self {
    self.window = window;
    self
  }

  pub fn with_policy(mut self, policy: RiskPolicy) -> Self {
    self.policy = policy;
    self
  }

  pub fn window(&self) -> &TraceWindow { &self.window }

  pub fn records(&self) -> &'a Records { self.records }

  /// "Which places did this infected person expose?"
  pub fn exposed_places(&self, person: &PersonRef) -> Result<ViewFilter<PlaceId>> {
    exposure::exposed_places(self.records, person, &self.window)
  }

  /// "Who else did this infected person expose?"
  pub fn contacts(&self, person: &PersonRef) -> Result<ViewFilter<PersonId>> {
    contacts::contacts(self.records, person, &self.window)
  }

  /// "Which places are high-risk?" over the full, unwindowed visit history.
  pub fn high_risk(&self, count: Option<usize>) -> HighRisk {
    risk::classify_high_risk(
      self.records,
      self.records.visits(),
      count,
      &self.policy,
    )
  }
}
