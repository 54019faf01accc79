//! Core types: cards, time ranges, proceedings links, schedule resolution

pub mod card;
pub mod error;
pub mod event;
pub mod links;
pub mod schedule;
pub mod trace;

pub use card::RawCard;
pub use error::{CoreError, CoreResult};
pub use event::{NormalizedEvent, TimeRange};
pub use links::ProceedingsLinks;
pub use schedule::{DateTimeResolver, parse_timezone};
pub use trace::{TraceConfig, TraceError, TraceFormat, init_tracing};
