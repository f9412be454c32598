//! Subcommand dispatch against the SQLite store.

use std::sync::Arc;

use anyhow::Context as _;
use axum::Router;
use contrace_api::trace::{Contacts, ExposedPlaces, HighRiskPlaces};
use contrace_core::{
  NewPerson, NewPlace, PersonId, PersonPatch, PersonRef, PlaceId, PlaceRef, Visit,
  store::RecordStore,
};
use contrace_store_sqlite::SqliteStore;
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{
  cli::{
    Command, PersonCommand, PlaceCommand, TraceCommand, VisitArgs, VisitCommand,
    place_patch,
  },
  output,
  settings::Settings,
};

/// Print `value` as pretty JSON, or the text produced by `text`.
fn emit<T: Serialize>(
  json: bool,
  value: &T,
  text: impl FnOnce() -> String,
) -> anyhow::Result<()> {
  if json {
    println!("{}", serde_json::to_string_pretty(value)?);
  } else {
    print!("{}", text());
  }
  Ok(())
}

/// Turn a position into an identifier using a fresh snapshot.
async fn person_id(store: &SqliteStore, reference: &PersonRef) -> anyhow::Result<PersonId> {
  match reference {
    PersonRef::Id(id) => Ok(id.clone()),
    PersonRef::Position(_) => {
      let records = store.snapshot().await?;
      Ok(records.resolve_person(reference)?.id.clone())
    }
  }
}

async fn place_id(store: &SqliteStore, reference: &PlaceRef) -> anyhow::Result<PlaceId> {
  match reference {
    PlaceRef::Id(id) => Ok(id.clone()),
    PlaceRef::Position(_) => {
      let records = store.snapshot().await?;
      Ok(records.resolve_place(reference)?.id.clone())
    }
  }
}

async fn resolve_visit(store: &SqliteStore, args: VisitArgs) -> anyhow::Result<Visit> {
  Ok(Visit::new(
    person_id(store, &args.person).await?,
    place_id(store, &args.place).await?,
    args.date,
  ))
}

pub async fn run(
  command: Command,
  store: SqliteStore,
  settings: &Settings,
  json: bool,
) -> anyhow::Result<()> {
  match command {
    Command::Person(cmd) => person(cmd, &store, json).await,
    Command::Place(cmd) => place(cmd, &store, json).await,
    Command::Visit(cmd) => visits(cmd, &store, json).await,
    Command::Trace(cmd) => trace(cmd, &store, settings, json).await,
    Command::Serve { host, port } => {
      let host = host.unwrap_or_else(|| settings.host.clone());
      let port = port.unwrap_or(settings.port);
      serve(store, settings, &host, port).await
    }
  }
}

async fn person(cmd: PersonCommand, store: &SqliteStore, json: bool) -> anyhow::Result<()> {
  match cmd {
    PersonCommand::Add(args) => {
      let person = store.add_person(NewPerson::from(args)).await?;
      emit(json, &person, || format!("Added {}", output::person(&person)))
    }
    PersonCommand::Edit { person, changes } => {
      let patch = PersonPatch::from(changes);
      anyhow::ensure!(!patch.is_empty(), "nothing to change");
      let id = person_id(store, &person).await?;
      let person = store.edit_person(id, patch).await?;
      emit(json, &person, || format!("Updated {}", output::person(&person)))
    }
    PersonCommand::Delete { person } => {
      let id = person_id(store, &person).await?;
      let person = store.delete_person(id).await?;
      emit(json, &person, || format!("Deleted {}", output::person(&person)))
    }
    PersonCommand::List => {
      let records = store.snapshot().await?;
      emit(json, &records.people(), || output::people(&records, None))
    }
  }
}

async fn place(cmd: PlaceCommand, store: &SqliteStore, json: bool) -> anyhow::Result<()> {
  match cmd {
    PlaceCommand::Add { name, id, address } => {
      let place = store.add_place(NewPlace { id, name, address }).await?;
      emit(json, &place, || format!("Added {}", output::place(&place)))
    }
    PlaceCommand::Edit { place, name, address } => {
      let patch = place_patch(name, address);
      anyhow::ensure!(!patch.is_empty(), "nothing to change");
      let id = place_id(store, &place).await?;
      let place = store.edit_place(id, patch).await?;
      emit(json, &place, || format!("Updated {}", output::place(&place)))
    }
    PlaceCommand::Delete { place } => {
      let id = place_id(store, &place).await?;
      let place = store.delete_place(id).await?;
      emit(json, &place, || format!("Deleted {}", output::place(&place)))
    }
    PlaceCommand::List => {
      let records = store.snapshot().await?;
      emit(json, &records.places(), || output::places(&records, None))
    }
  }
}

async fn visits(cmd: VisitCommand, store: &SqliteStore, json: bool) -> anyhow::Result<()> {
  match cmd {
    VisitCommand::Add(args) => {
      let visit = store.add_visit(resolve_visit(store, args).await?).await?;
      emit(json, &visit, || format!("Recorded {visit}\n"))
    }
    VisitCommand::Delete(args) => {
      let visit = resolve_visit(store, args).await?;
      store.delete_visit(visit.clone()).await?;
      emit(json, &visit, || format!("Deleted {visit}\n"))
    }
    VisitCommand::List => {
      let records = store.snapshot().await?;
      emit(json, &records.visits(), || output::visits(&records))
    }
  }
}

async fn trace(
  cmd: TraceCommand,
  store: &SqliteStore,
  settings: &Settings,
  json: bool,
) -> anyhow::Result<()> {
  let records = store.snapshot().await?;
  match cmd {
    TraceCommand::Places { person, window } => {
      let window = window.window(settings.window_days);
      let report = ExposedPlaces::build(&records, &person, window)?;
      emit(json, &report, || output::exposed_places(&records, &report))
    }
    TraceCommand::Contacts { person, window } => {
      let window = window.window(settings.window_days);
      let report = Contacts::build(&records, &person, window)?;
      emit(json, &report, || output::contacts(&records, &report))
    }
    TraceCommand::HighRisk { count } => {
      let report = HighRiskPlaces::build(&records, count, settings.policy())?;
      emit(json, &report, || output::high_risk(&report))
    }
  }
}

async fn serve(
  store: SqliteStore,
  settings: &Settings,
  host: &str,
  port: u16,
) -> anyhow::Result<()> {
  let api = contrace_api::api_router(Arc::new(store), settings.trace_defaults());
  let app = Router::new()
    .nest("/api", api)
    .layer(TraceLayer::new_for_http());

  let address = format!("{host}:{port}");
  info!("Listening on http://{address}/api");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;
  Ok(())
}
