//! Risk classification: rank places by how often infected people visit them
//! and cut the ranking down to an actionable shortlist.

use std::collections::HashMap;

use contrace_core::{PlaceId, Records, ViewFilter, Visit};
use serde::{Deserialize, Serialize};
use tracing::debug;

// ─── Policy ──────────────────────────────────────────────────────────────────

/// The thresholds of the shortlist rule, in whole percent.
///
/// When more than `crowded_above_percent` of all places have seen an infected
/// visitor, only the top `shortlist_percent` of all places are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskPolicy {
  pub crowded_above_percent: u32,
  pub shortlist_percent:     u32,
}

impl Default for RiskPolicy {
  fn default() -> Self {
    Self { crowded_above_percent: 60, shortlist_percent: 40 }
  }
}

impl RiskPolicy {
  /// How many ranked places to keep when the caller gave no explicit count.
  ///
  /// `infected` is the number of distinct places with an infected visit and
  /// `total` the number of places on record. The result is never zero while
  /// `infected` is non-zero.
  pub fn shortlist_len(&self, infected: usize, total: usize) -> usize {
    let crowded = infected.saturating_mul(100)
      > total.saturating_mul(self.crowded_above_percent as usize);

    if !crowded {
      return infected;
    }

    let cut = total.saturating_mul(self.shortlist_percent as usize) / 100;
    cut.clamp(1, infected)
  }
}

// ─── Ranking ─────────────────────────────────────────────────────────────────

/// A place and the number of visits infected people made to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceRank {
  pub place_id:        PlaceId,
  pub infected_visits: usize,
}

/// Count visits by currently-infected people per place, most-visited first.
///
/// Ties are broken by place identifier so the order never depends on hash
/// iteration.
pub fn rank_infected_places<'a, I>(records: &Records, visits: I) -> Vec<PlaceRank>
where
  I: IntoIterator<Item = &'a Visit>,
{
  let mut counts: HashMap<&PlaceId, usize> = HashMap::new();
  for visit in visits {
    let infected = records
      .person(&visit.person_id)
      .is_ok_and(|person| person.is_infected());
    if infected {
      *counts.entry(&visit.place_id).or_default() += 1;
    }
  }

  let mut ranked: Vec<PlaceRank> = counts
    .into_iter()
    .map(|(place_id, infected_visits)| PlaceRank {
      place_id: place_id.clone(),
      infected_visits,
    })
    .collect();

  ranked.sort_by(|a, b| {
    b.infected_visits
      .cmp(&a.infected_visits)
      .then_with(|| a.place_id.cmp(&b.place_id))
  });
  ranked
}

// ─── Classification ──────────────────────────────────────────────────────────

/// The outcome of [`classify_high_risk`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighRisk {
  /// The kept places, most infected visits first.
  pub ranked:          Vec<PlaceRank>,
  /// Distinct places with at least one infected visit.
  pub infected_places: usize,
  /// All places on record.
  pub total_places:    usize,
}

impl HighRisk {
  pub fn filter(&self) -> ViewFilter<PlaceId> {
    self.ranked.iter().map(|r| r.place_id.clone()).collect()
  }

  pub fn len(&self) -> usize { self.ranked.len() }

  pub fn is_empty(&self) -> bool { self.ranked.is_empty() }
}

/// Pick the high-risk places from `visits`.
///
/// With `count` the top `count` ranked places are kept (or all of them, if
/// fewer exist). Without it, `policy` decides the size.
pub fn classify_high_risk<'a, I>(
  records: &Records,
  visits: I,
  count: Option<usize>,
  policy: &RiskPolicy,
) -> HighRisk
where
  I: IntoIterator<Item = &'a Visit>,
{
  let mut ranked = rank_infected_places(records, visits);
  let infected_places = ranked.len();
  let total_places = records.places().len();

  let keep = match count {
    Some(n) => n,
    None => policy.shortlist_len(infected_places, total_places),
  };
  ranked.truncate(keep);

  debug!(
    infected_places,
    total_places,
    kept = ranked.len(),
    explicit = count.is_some(),
    "classified high-risk places"
  );

  HighRisk { ranked, infected_places, total_places }
}
