//! Trailing date windows over visit history.

use chrono::{Days, Local, NaiveDate};
use contrace_core::Visit;
use serde::{Deserialize, Serialize};

/// How far back "recent" reaches when no window is configured.
pub const DEFAULT_WINDOW_DAYS: u32 = 14;

/// The inclusive date range `[anchor - days, anchor]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceWindow {
  pub anchor: NaiveDate,
  pub days:   u32,
}

impl TraceWindow {
  pub fn new(anchor: NaiveDate, days: u32) -> Self { Self { anchor, days } }

  /// A window of `days` ending on today's local calendar date.
  pub fn ending_today(days: u32) -> Self {
    Self::new(Local::now().date_naive(), days)
  }

  /// First date inside the window. Clamps at the earliest representable
  /// date instead of overflowing.
  pub fn start(&self) -> NaiveDate {
    self
      .anchor
      .checked_sub_days(Days::new(u64::from(self.days)))
      .unwrap_or(NaiveDate::MIN)
  }

  /// Whether `date` falls inside the window. Dates after the anchor never do.
  pub fn contains(&self, date: NaiveDate) -> bool {
    self.start() <= date && date <= self.anchor
  }
}

impl Default for TraceWindow {
  fn default() -> Self { Self::ending_today(DEFAULT_WINDOW_DAYS) }
}

/// Keep the visits dated within `days` of `anchor`, inclusive on both ends.
pub fn windowed<'a, I>(visits: I, anchor: NaiveDate, days: u32) -> Vec<&'a Visit>
where
  I: IntoIterator<Item = &'a Visit>,
{
  let window = TraceWindow::new(anchor, days);
  visits.into_iter().filter(|v| window.contains(v.date)).collect()
}
