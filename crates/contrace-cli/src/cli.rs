//! Command-line surface.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use contrace_core::{
  Flag, NewPerson, PersonId, PersonPatch, PersonRef, PlaceId, PlacePatch,
  PlaceRef,
};
use contrace_trace::TraceWindow;

#[derive(Parser, Debug)]
#[command(
  name = "contrace",
  author,
  version,
  about = "Record people, places and visits, and trace exposure from infected people"
)]
pub struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, global = true, default_value = "contrace.toml")]
  pub config: PathBuf,

  /// SQLite database to use instead of the configured `store_path`.
  #[arg(long, global = true, value_name = "FILE")]
  pub store: Option<PathBuf>,

  /// Print JSON instead of tables.
  #[arg(long, global = true)]
  pub json: bool,

  #[command(subcommand)]
  pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Manage people.
  #[command(subcommand)]
  Person(PersonCommand),
  /// Manage places.
  #[command(subcommand)]
  Place(PlaceCommand),
  /// Manage visits.
  #[command(subcommand)]
  Visit(VisitCommand),
  /// Exposure queries.
  #[command(subcommand)]
  Trace(TraceCommand),
  /// Serve the JSON API under `/api`.
  Serve {
    #[arg(long)]
    host: Option<String>,
    #[arg(long)]
    port: Option<u16>,
  },
}

// ─── People ──────────────────────────────────────────────────────────────────

#[derive(Subcommand, Debug)]
pub enum PersonCommand {
  Add(NewPersonArgs),
  /// Edit a person. Pass an empty string to clear an optional field.
  Edit {
    /// Position in `person list`, or identifier.
    person: PersonRef,
    #[command(flatten)]
    changes: PersonChanges,
  },
  /// Delete a person and all of their visits.
  Delete { person: PersonRef },
  List,
}

#[derive(Args, Debug)]
pub struct NewPersonArgs {
  pub name: String,
  /// Identifier to use; generated when omitted.
  #[arg(long)]
  pub id: Option<PersonId>,
  #[arg(long)]
  pub phone: Option<String>,
  #[arg(long)]
  pub email: Option<String>,
  /// Home address.
  #[arg(long)]
  pub address: Option<String>,
  /// `yes`, `no`, or the date quarantine started.
  #[arg(long, default_value = "no")]
  pub quarantined: Flag,
  /// `yes`, `no`, or the date of infection.
  #[arg(long, default_value = "no")]
  pub infected: Flag,
}

impl From<NewPersonArgs> for NewPerson {
  fn from(args: NewPersonArgs) -> Self {
    NewPerson {
      id:          args.id,
      name:        args.name,
      phone:       args.phone,
      email:       args.email,
      address:     args.address,
      quarantined: args.quarantined,
      infected:    args.infected,
    }
  }
}

#[derive(Args, Debug)]
pub struct PersonChanges {
  #[arg(long)]
  pub name: Option<String>,
  #[arg(long)]
  pub phone: Option<String>,
  #[arg(long)]
  pub email: Option<String>,
  #[arg(long)]
  pub address: Option<String>,
  #[arg(long)]
  pub quarantined: Option<Flag>,
  #[arg(long)]
  pub infected: Option<Flag>,
}

/// `None` leaves a field alone, an empty value clears it.
fn clearable(value: Option<String>) -> Option<Option<String>> {
  value.map(|v| (!v.trim().is_empty()).then_some(v))
}

impl From<PersonChanges> for PersonPatch {
  fn from(changes: PersonChanges) -> Self {
    PersonPatch {
      name:        changes.name,
      phone:       clearable(changes.phone),
      email:       clearable(changes.email),
      address:     clearable(changes.address),
      quarantined: changes.quarantined,
      infected:    changes.infected,
    }
  }
}

// ─── Places ──────────────────────────────────────────────────────────────────

#[derive(Subcommand, Debug)]
pub enum PlaceCommand {
  Add {
    name: String,
    #[arg(long)]
    id: Option<PlaceId>,
    #[arg(long)]
    address: Option<String>,
  },
  /// Edit a place. Pass an empty address to clear it.
  Edit {
    /// Position in `place list`, or identifier.
    place: PlaceRef,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    address: Option<String>,
  },
  /// Delete a place and every visit made to it.
  Delete { place: PlaceRef },
  List,
}

pub fn place_patch(name: Option<String>, address: Option<String>) -> PlacePatch {
  PlacePatch { name, address: clearable(address) }
}

// ─── Visits ──────────────────────────────────────────────────────────────────

#[derive(Subcommand, Debug)]
pub enum VisitCommand {
  /// Record that a person was at a place on a date.
  Add(VisitArgs),
  Delete(VisitArgs),
  List,
}

#[derive(Args, Debug)]
pub struct VisitArgs {
  pub person: PersonRef,
  pub place:  PlaceRef,
  /// `YYYY-MM-DD`
  pub date:   NaiveDate,
}

// ─── Tracing ─────────────────────────────────────────────────────────────────

#[derive(Subcommand, Debug)]
pub enum TraceCommand {
  /// Places an infected person visited within the window.
  Places {
    /// Position in `person list`, or identifier.
    person: PersonRef,
    #[command(flatten)]
    window: WindowArgs,
  },
  /// People who shared a place and a day with an infected person.
  Contacts {
    person: PersonRef,
    #[command(flatten)]
    window: WindowArgs,
  },
  /// Places ranked by visits from infected people.
  HighRisk {
    /// Keep exactly this many places instead of applying the shortlist rule.
    #[arg(long)]
    count: Option<usize>,
  },
}

#[derive(Args, Debug, Clone, Copy)]
pub struct WindowArgs {
  /// Days to look back; defaults to the configured `window_days`.
  #[arg(long)]
  pub window_days: Option<u32>,
  /// Last day of the window; defaults to today.
  #[arg(long, value_name = "YYYY-MM-DD")]
  pub as_of: Option<NaiveDate>,
}

impl WindowArgs {
  pub fn window(self, default_days: u32) -> TraceWindow {
    let days = self.window_days.unwrap_or(default_days);
    match self.as_of {
      Some(anchor) => TraceWindow::new(anchor, days),
      None => TraceWindow::ending_today(days),
    }
  }
}

#[cfg(test)]
mod tests {
  use clap::CommandFactory as _;

  use super::*;

  fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("contrace").chain(args.iter().copied()))
      .unwrap()
  }

  #[test]
  fn command_definition_is_consistent() { Cli::command().debug_assert(); }

  #[test]
  fn trace_accepts_position_or_identifier() {
    let cli = parse(&["trace", "places", "3", "--as-of", "2026-10-19"]);
    let Command::Trace(TraceCommand::Places { person, window }) = cli.command else {
      panic!("wrong command");
    };
    assert_eq!(person, PersonRef::Position(3));
    let window = window.window(14);
    assert_eq!(window.anchor, NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
    assert_eq!(window.days, 14);

    let cli = parse(&["trace", "contacts", "P7", "--window-days", "5"]);
    let Command::Trace(TraceCommand::Contacts { person, window }) = cli.command else {
      panic!("wrong command");
    };
    assert_eq!(person, PersonRef::Id(PersonId::new("P7").unwrap()));
    assert_eq!(window.window_days, Some(5));
  }

  #[test]
  fn malformed_reference_is_rejected() {
    let result = Cli::try_parse_from(["contrace", "trace", "places", "Q1"]);
    assert!(result.is_err());
  }

  #[test]
  fn person_flags_parse() {
    let cli = parse(&["person", "add", "Ana", "--infected", "2026-10-01", "--json"]);
    assert!(cli.json);
    let Command::Person(PersonCommand::Add(args)) = cli.command else {
      panic!("wrong command");
    };
    let person = NewPerson::from(args);
    assert_eq!(
      person.infected,
      Flag::Since(NaiveDate::from_ymd_opt(2026, 10, 1).unwrap())
    );
    assert_eq!(person.quarantined, Flag::No);
  }

  #[test]
  fn empty_edit_value_clears_field() {
    let cli = parse(&["person", "edit", "1", "--phone", "", "--name", "Bo"]);
    let Command::Person(PersonCommand::Edit { changes, .. }) = cli.command else {
      panic!("wrong command");
    };
    let patch = PersonPatch::from(changes);
    assert_eq!(patch.phone, Some(None));
    assert_eq!(patch.name.as_deref(), Some("Bo"));
    assert_eq!(patch.email, None);
  }
}
