//! Calendar service abstraction and implementations.
//!
//! The pipeline talks to the external calendar through the
//! [`CalendarService`] trait: list calendars, create a calendar, create an
//! event. [`GoogleCalendarService`] is the production implementation over
//! the Google Calendar v3 REST API. Authentication is out of band - the
//! service is constructed with an already-authorized access token.

pub mod error;
pub mod google;
pub mod service;

pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
pub use google::GoogleCalendarService;
pub use service::{CalendarEntry, CalendarService, CalendarSpec, EventPayload};
