//! Error type for `contrace-trace`.
//!
//! Every variant is recoverable: the caller reports it and nothing has been
//! changed.

use contrace_core::PersonId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("{0} is not infected")]
  NotInfected(PersonId),

  #[error("{person} has no visits in the last {days} days")]
  NoRecentVisits { person: PersonId, days: u32 },

  #[error("no one else shared a place and date with {0}")]
  NoContactsFound(PersonId),

  /// A person or place reference did not resolve; passed through unchanged.
  #[error(transparent)]
  UnresolvedReference(#[from] contrace_core::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
