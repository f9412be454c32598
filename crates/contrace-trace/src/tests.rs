//! Engine tests over hand-built snapshots anchored on a fixed date.

use chrono::{Days, NaiveDate};
use contrace_core::{
  Flag, NewPerson, NewPlace, Person, PersonId, PersonRef, Place, PlaceId,
  Records, Visit,
};

use crate::{
  Error, RiskPolicy, TraceWindow, Tracer, risk::classify_high_risk, windowed,
};

// ─── Fixtures ────────────────────────────────────────────────────────────────

fn anchor() -> NaiveDate { NaiveDate::from_ymd_opt(2026, 10, 19).unwrap() }

/// `anchor()` shifted by `offset` days (negative is the past).
fn day(offset: i64) -> NaiveDate {
  let shift = Days::new(offset.unsigned_abs());
  if offset < 0 {
    anchor().checked_sub_days(shift).unwrap()
  } else {
    anchor().checked_add_days(shift).unwrap()
  }
}

fn pid(s: &str) -> PersonId { PersonId::new(s).unwrap() }

fn lid(s: &str) -> PlaceId { PlaceId::new(s).unwrap() }

fn by_id(s: &str) -> PersonRef { PersonRef::Id(pid(s)) }

fn person(id: &str, infected: bool) -> Person {
  NewPerson {
    id: Some(pid(id)),
    infected: Flag::from(infected),
    ..NewPerson::new(format!("Person {id}"))
  }
  .into_person()
}

fn place(id: &str) -> Place {
  NewPlace { id: Some(lid(id)), ..NewPlace::new(format!("Place {id}")) }
    .into_place()
}

fn visit(p: &str, l: &str, offset: i64) -> Visit { Visit::new(pid(p), lid(l), day(offset)) }

fn records(people: Vec<Person>, places: Vec<Place>, visits: Vec<Visit>) -> Records {
  Records::new(people, places, visits).expect("valid fixture")
}

fn tracer(records: &Records) -> Tracer<'_> {
  Tracer::new(records).with_window(TraceWindow::new(anchor(), 14))
}

fn ids<K: ToString>(items: impl IntoIterator<Item = K>) -> Vec<String> {
  items.into_iter().map(|k| k.to_string()).collect()
}

// ─── Temporal window ─────────────────────────────────────────────────────────

#[test]
fn window_is_inclusive_on_both_ends() {
  let visits = vec![
    visit("P1", "L1", -15),
    visit("P1", "L1", -14),
    visit("P1", "L1", -3),
    visit("P1", "L1", 0),
    visit("P1", "L1", 1),
  ];

  let kept: Vec<NaiveDate> = windowed(&visits, anchor(), 14)
    .into_iter()
    .map(|v| v.date)
    .collect();
  assert_eq!(kept, [day(-14), day(-3), day(0)]);
}

#[test]
fn future_visits_are_never_in_the_window() {
  let tomorrow = visit("P1", "L1", 1);
  for days in [0, 14, 365, u32::MAX] {
    assert!(windowed([&tomorrow], anchor(), days).is_empty());
  }
}

#[test]
fn zero_day_window_is_the_anchor_date_only() {
  let window = TraceWindow::new(anchor(), 0);
  assert!(window.contains(day(0)));
  assert!(!window.contains(day(-1)));
  assert_eq!(window.start(), anchor());
}

#[test]
fn default_window_is_fourteen_days_ending_today() {
  let window = TraceWindow::default();
  assert_eq!(window.days, 14);
  assert_eq!(window.anchor, chrono::Local::now().date_naive());
}

// ─── Exposure resolver ───────────────────────────────────────────────────────

#[test]
fn exposed_places_are_the_recent_distinct_places() {
  let r = records(
    vec![person("PD", true)],
    vec![place("L7"), place("L8")],
    vec![visit("PD", "L7", 0), visit("PD", "L7", -7), visit("PD", "L8", -20)],
  );

  let places = tracer(&r).exposed_places(&by_id("PD")).unwrap();
  assert_eq!(ids(places.ids()), ["L7"]);

  let shown = r.filtered_places(&places);
  assert_eq!(shown.len(), 1);
  assert_eq!(shown[0].id, lid("L7"));
}

#[test]
fn only_stale_visits_means_no_recent_visits() {
  let r = records(
    vec![person("PD", true)],
    vec![place("L7")],
    vec![visit("PD", "L7", -15)],
  );

  let err = tracer(&r).exposed_places(&by_id("PD")).unwrap_err();
  assert!(matches!(err, Error::NoRecentVisits { ref person, days: 14 } if *person == pid("PD")));
}

#[test]
fn healthy_person_is_not_traced() {
  let r = records(
    vec![person("PE", false)],
    vec![place("L7")],
    vec![visit("PE", "L7", 0)],
  );

  let err = tracer(&r).exposed_places(&by_id("PE")).unwrap_err();
  assert!(matches!(err, Error::NotInfected(ref p) if *p == pid("PE")));

  let err = tracer(&r).contacts(&by_id("PE")).unwrap_err();
  assert!(matches!(err, Error::NotInfected(_)));
}

#[test]
fn dated_infection_counts_as_infected() {
  let mut d = person("PD", false);
  d.infected = Flag::Since(day(-2));
  let r = records(vec![d], vec![place("L7")], vec![visit("PD", "L7", -1)]);

  assert!(tracer(&r).exposed_places(&by_id("PD")).is_ok());
}

#[test]
fn unknown_reference_is_passed_through() {
  let r = records(vec![person("PD", true)], vec![], vec![]);

  let err = tracer(&r).exposed_places(&by_id("PZ")).unwrap_err();
  assert!(matches!(
    err,
    Error::UnresolvedReference(contrace_core::Error::PersonNotFound(_))
  ));

  let err = tracer(&r).contacts(&PersonRef::Position(2)).unwrap_err();
  assert!(matches!(
    err,
    Error::UnresolvedReference(contrace_core::Error::PositionOutOfRange { .. })
  ));
}

#[test]
fn positional_reference_resolves_against_the_listing() {
  let r = records(
    vec![person("PB", false), person("PA", true)],
    vec![place("L1")],
    vec![visit("PA", "L1", 0)],
  );

  // Listing is sorted by identifier, so PA is first.
  let places = tracer(&r).exposed_places(&PersonRef::Position(1)).unwrap();
  assert_eq!(ids(places.ids()), ["L1"]);
}

#[test]
fn exposed_places_grow_with_the_window() {
  let r = records(
    vec![person("PD", true)],
    vec![place("L1"), place("L2"), place("L3"), place("L4")],
    vec![
      visit("PD", "L1", 0),
      visit("PD", "L2", -5),
      visit("PD", "L3", -12),
      visit("PD", "L4", -25),
    ],
  );

  let mut previous = 0;
  for days in 0..40 {
    let t = Tracer::new(&r).with_window(TraceWindow::new(anchor(), days));
    let found = t.exposed_places(&by_id("PD")).map(|f| f.len()).unwrap_or(0);
    assert!(found >= previous, "window {days} shrank the result");
    previous = found;
  }
  assert_eq!(previous, 4);
}

// ─── Contact resolver ────────────────────────────────────────────────────────

#[test]
fn same_place_same_day_is_a_contact() {
  let r = records(
    vec![person("PD", true), person("PE", false)],
    vec![place("L7")],
    vec![visit("PD", "L7", 0), visit("PE", "L7", 0)],
  );

  let found = tracer(&r).contacts(&by_id("PD")).unwrap();
  assert_eq!(ids(found.ids()), ["PE"]);
}

#[test]
fn same_place_different_day_is_not_a_contact() {
  let r = records(
    vec![person("PD", true), person("PE", false)],
    vec![place("L7")],
    vec![visit("PD", "L7", 0), visit("PE", "L7", -1)],
  );

  let err = tracer(&r).contacts(&by_id("PD")).unwrap_err();
  assert!(matches!(err, Error::NoContactsFound(ref p) if *p == pid("PD")));
}

#[test]
fn dates_match_per_visit_not_across_the_window() {
  // PD was at L1 on day -3 and L2 on day -1. PE was at L1 on day -1 only.
  let r = records(
    vec![person("PD", true), person("PE", false), person("PF", false)],
    vec![place("L1"), place("L2")],
    vec![
      visit("PD", "L1", -3),
      visit("PD", "L2", -1),
      visit("PE", "L1", -1),
      visit("PF", "L2", -1),
    ],
  );

  let found = tracer(&r).contacts(&by_id("PD")).unwrap();
  assert_eq!(ids(found.ids()), ["PF"]);
}

#[test]
fn contacts_are_distinct_and_exclude_the_infected_person() {
  let r = records(
    vec![
      person("PD", true),
      person("PE", false),
      person("PF", true),
      person("PG", false),
    ],
    vec![place("L1"), place("L2"), place("L3")],
    vec![
      visit("PD", "L1", 0),
      visit("PD", "L2", -2),
      visit("PE", "L1", 0),
      visit("PE", "L2", -2),
      visit("PF", "L2", -2),
      visit("PG", "L3", 0),
    ],
  );

  let found = tracer(&r).contacts(&by_id("PD")).unwrap();
  assert_eq!(ids(found.ids()), ["PE", "PF"]);
  assert!(!found.matches(&pid("PD")));
}

#[test]
fn contact_relation_is_symmetric() {
  let visits = vec![
    visit("PD", "L7", -4),
    visit("PE", "L7", -4),
    visit("PE", "L8", 0),
  ];
  let places = vec![place("L7"), place("L8")];

  let d_infected = records(
    vec![person("PD", true), person("PE", false)],
    places.clone(),
    visits.clone(),
  );
  let e_infected = records(
    vec![person("PD", false), person("PE", true)],
    places,
    visits,
  );

  let from_d = tracer(&d_infected).contacts(&by_id("PD")).unwrap();
  let from_e = tracer(&e_infected).contacts(&by_id("PE")).unwrap();
  assert!(from_d.matches(&pid("PE")));
  assert!(from_e.matches(&pid("PD")));
}

#[test]
fn contacts_outside_the_window_are_ignored() {
  let r = records(
    vec![person("PD", true), person("PE", false)],
    vec![place("L1"), place("L2")],
    vec![
      visit("PD", "L1", -20),
      visit("PE", "L1", -20),
      visit("PD", "L2", 0),
    ],
  );

  let err = tracer(&r).contacts(&by_id("PD")).unwrap_err();
  assert!(matches!(err, Error::NoContactsFound(_)));
}

#[test]
fn staying_home_is_not_exposing() {
  let mut d = person("PD", true);
  d.quarantined = Flag::Yes;
  d.address = Some("1 Harbour Rd".into());
  let mut home = place("L1");
  home.address = Some("1 harbour rd ".into());

  let r = records(
    vec![d, person("PE", false)],
    vec![home],
    vec![visit("PD", "L1", 0), visit("PE", "L1", 0)],
  );

  // The place itself still shows as visited...
  let places = tracer(&r).exposed_places(&by_id("PD")).unwrap();
  assert_eq!(ids(places.ids()), ["L1"]);

  // ...but it produces no contacts, and never the person themself.
  let err = tracer(&r).contacts(&by_id("PD")).unwrap_err();
  assert!(matches!(err, Error::NoContactsFound(_)));
}

#[test]
fn quarantined_visit_elsewhere_is_still_exposing() {
  let mut d = person("PD", true);
  d.quarantined = Flag::Yes;
  d.address = Some("1 Harbour Rd".into());
  let mut clinic = place("L2");
  clinic.address = Some("9 Hill St".into());

  let r = records(
    vec![d, person("PE", false)],
    vec![clinic],
    vec![visit("PD", "L2", -1), visit("PE", "L2", -1)],
  );

  let found = tracer(&r).contacts(&by_id("PD")).unwrap();
  assert_eq!(ids(found.ids()), ["PE"]);
}

// ─── Risk classifier ─────────────────────────────────────────────────────────

/// Seven places, five with infected visits (counts 4, 3, 1, 1, 1).
fn crowded_fixture() -> Records {
  let places = (1..=7).map(|i| place(&format!("L{i}"))).collect();
  let mut visits = Vec::new();
  for (l, n) in [("L1", 4), ("L2", 3), ("L3", 1), ("L4", 1), ("L5", 1)] {
    for offset in 0..n {
      visits.push(visit("PD", l, -offset));
    }
  }
  visits.push(visit("PH", "L6", 0));
  visits.push(visit("PH", "L1", -30));

  records(vec![person("PD", true), person("PH", false)], places, visits)
}

#[test]
fn crowded_infection_is_cut_to_the_shortlist() {
  let r = crowded_fixture();
  let result = tracer(&r).high_risk(None);

  assert_eq!(result.infected_places, 5);
  assert_eq!(result.total_places, 7);
  // 5 > 0.6 * 7, so keep floor(0.4 * 7) = 2.
  assert_eq!(result.len(), 2);
  assert_eq!(ids(result.filter().ids()), ["L1", "L2"]);
  assert_eq!(result.ranked[0].infected_visits, 4);
  assert_eq!(result.ranked[1].infected_visits, 3);
}

#[test]
fn sparse_infection_keeps_every_infected_place() {
  let places = (1..=8).map(|i| place(&format!("L{i}"))).collect();
  let r = records(
    vec![person("PD", true), person("PE", false)],
    places,
    vec![
      visit("PD", "L2", 0),
      visit("PD", "L4", -1),
      visit("PD", "L4", -2),
      visit("PD", "L6", -40),
      visit("PE", "L8", 0),
    ],
  );

  // 3 <= 0.6 * 8, so all three infected places are kept.
  let result = tracer(&r).high_risk(None);
  assert_eq!(ids(result.filter().ids()), ["L2", "L4", "L6"]);
  assert_eq!(result.ranked[0].place_id, lid("L4"));
}

#[test]
fn equal_counts_rank_by_place_identifier() {
  let r = records(
    vec![person("PD", true), person("PF", true)],
    vec![place("L3"), place("L1"), place("L2")],
    vec![
      visit("PD", "L3", 0),
      visit("PF", "L3", 0),
      visit("PD", "L1", -1),
      visit("PF", "L1", -1),
      visit("PD", "L2", -2),
    ],
  );

  let ranked = tracer(&r).high_risk(Some(3)).ranked;
  let order: Vec<_> = ranked.iter().map(|r| r.place_id.as_str()).collect();
  assert_eq!(order, ["L1", "L3", "L2"]);
}

#[test]
fn explicit_count_overrides_the_rule() {
  let r = crowded_fixture();
  let t = tracer(&r);

  assert_eq!(ids(t.high_risk(Some(1)).filter().ids()), ["L1"]);
  assert_eq!(t.high_risk(Some(4)).len(), 4);
  assert_eq!(t.high_risk(Some(50)).len(), 5);
  assert!(t.high_risk(Some(0)).is_empty());
}

#[test]
fn no_infected_visits_means_no_high_risk_places() {
  let r = records(
    vec![person("PD", false)],
    vec![place("L1")],
    vec![visit("PD", "L1", 0)],
  );

  let result = tracer(&r).high_risk(None);
  assert!(result.is_empty());
  assert_eq!(result.infected_places, 0);
}

#[test]
fn high_risk_is_a_bounded_subset_of_infected_places() {
  let r = crowded_fixture();
  let result = tracer(&r).high_risk(None);
  let infected: Vec<_> = classify_high_risk(
    &r,
    r.visits(),
    Some(usize::MAX),
    &RiskPolicy::default(),
  )
  .ranked
  .into_iter()
  .map(|rank| rank.place_id)
  .collect();

  for rank in &result.ranked {
    assert!(infected.contains(&rank.place_id));
  }
  let ceil_40 = (r.places().len() * 40).div_ceil(100);
  assert!(result.len() <= infected.len().max(ceil_40));
  // PH is healthy, so L6 never ranks.
  assert!(!infected.contains(&lid("L6")));
}

#[test]
fn shortlist_never_empties_a_non_empty_ranking() {
  let policy = RiskPolicy::default();
  // One place, infected: 1 > 0.6, floor(0.4) = 0, but something must remain.
  assert_eq!(policy.shortlist_len(1, 1), 1);
  assert_eq!(policy.shortlist_len(2, 2), 1);
  assert_eq!(policy.shortlist_len(0, 10), 0);
  assert_eq!(policy.shortlist_len(6, 10), 6);
  assert_eq!(policy.shortlist_len(7, 10), 4);
}

#[test]
fn custom_policy_moves_the_thresholds() {
  let r = crowded_fixture();
  let strict = RiskPolicy { crowded_above_percent: 50, shortlist_percent: 20 };

  // 5 > 0.5 * 7, keep floor(0.2 * 7) = 1.
  let result = tracer(&r).with_policy(strict).high_risk(None);
  assert_eq!(ids(result.filter().ids()), ["L1"]);
}

#[test]
fn high_risk_uses_the_full_history() {
  // Visits older than the window still count towards risk.
  let r = records(
    vec![person("PD", true)],
    vec![place("L1"), place("L2"), place("L3"), place("L4")],
    vec![visit("PD", "L1", -100)],
  );

  let result = tracer(&r).high_risk(None);
  assert_eq!(ids(result.filter().ids()), ["L1"]);
}
