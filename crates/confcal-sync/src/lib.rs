//! The extraction-normalization-synchronization pipeline.
//!
//! [`SyncOrchestrator`] drives one run: pull the schedule and proceedings
//! documents through the cache, parse cards and links, make sure a
//! calendar exists per event category, then walk the cards in document
//! order and submit each one at most once, gated by the
//! [`ProcessedLedger`].
//!
//! Execution is strictly sequential and blocking; no collaborator call is
//! retried and any failure aborts the run. The write-as-you-go cache and
//! ledger make an aborted run resumable without redoing completed work.

pub mod error;
pub mod ledger;
pub mod normalize;
pub mod orchestrator;

pub use error::{SyncError, SyncResult};
pub use ledger::ProcessedLedger;
pub use normalize::normalize_event;
pub use orchestrator::{SourceUrls, SyncOptions, SyncOrchestrator, SyncReport};
