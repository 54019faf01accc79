//! Google Calendar API implementation of [`CalendarService`].
//!
//! A thin blocking HTTP client over the Calendar v3 REST API. The access
//! token is obtained out of band and supplied pre-authorized; token
//! acquisition and refresh are not this crate's concern.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ProviderError, ProviderResult};
use crate::service::{CalendarEntry, CalendarService, CalendarSpec, EventPayload};

/// Base URL for Google Calendar API v3.
const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Default request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Google Calendar service client.
#[derive(Debug)]
pub struct GoogleCalendarService {
    http_client: reqwest::blocking::Client,
    access_token: String,
    base_url: String,
}

impl GoogleCalendarService {
    /// Creates a client with the given pre-authorized access token.
    pub fn new(access_token: impl Into<String>) -> ProviderResult<Self> {
        let http_client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                ProviderError::network("failed to create HTTP client").with_source(e)
            })?;

        Ok(Self {
            http_client,
            access_token: access_token.into(),
            base_url: CALENDAR_API_BASE.to_string(),
        })
    }

    /// Builder method to point the client at a different API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sends a request and reads the body of a successful response.
    fn execute(&self, request: reqwest::blocking::RequestBuilder) -> ProviderResult<String> {
        let response = request.bearer_auth(&self.access_token).send().map_err(|e| {
            if e.is_timeout() {
                ProviderError::network("request timeout").with_source(e)
            } else if e.is_connect() {
                ProviderError::network("connection failed").with_source(e)
            } else {
                ProviderError::network("request failed").with_source(e)
            }
        })?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ProviderError::authentication(
                "access token expired or invalid",
            ));
        }
        if status == reqwest::StatusCode::FORBIDDEN {
            return Err(ProviderError::authorization("access denied"));
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::rate_limited("rate limit exceeded"));
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ProviderError::not_found("resource not found"));
        }
        if status == reqwest::StatusCode::BAD_REQUEST {
            let body = response.text().unwrap_or_default();
            return Err(ProviderError::bad_request(format!("API error: {body}")));
        }
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ProviderError::server(format!(
                "API error ({status}): {body}"
            )));
        }

        response
            .text()
            .map_err(|e| ProviderError::network("failed to read response").with_source(e))
    }
}

impl CalendarService for GoogleCalendarService {
    fn list_calendars(&self) -> ProviderResult<Vec<CalendarEntry>> {
        let url = format!("{}/users/me/calendarList", self.base_url);
        let body = self.execute(self.http_client.get(&url))?;

        let list: CalendarListResponse = serde_json::from_str(&body).map_err(|e| {
            ProviderError::invalid_response(format!("failed to parse calendar list: {e}"))
        })?;

        debug!("listed {} calendars", list.items.len());
        Ok(list
            .items
            .into_iter()
            .map(|item| CalendarEntry::new(item.id, item.summary))
            .collect())
    }

    fn create_calendar(&self, spec: &CalendarSpec) -> ProviderResult<CalendarEntry> {
        let url = format!("{}/calendars", self.base_url);
        let request = self
            .http_client
            .post(&url)
            .json(&ApiCalendar::from_spec(spec));
        let body = self.execute(request)?;

        let created: ApiCalendarEntry = serde_json::from_str(&body).map_err(|e| {
            ProviderError::invalid_response(format!("failed to parse created calendar: {e}"))
        })?;

        info!("created calendar {:?} ({})", spec.display_name, created.id);
        Ok(CalendarEntry::new(created.id, created.summary))
    }

    fn create_event(&self, calendar_id: &str, payload: &EventPayload) -> ProviderResult<()> {
        let url = format!(
            "{}/calendars/{}/events",
            self.base_url,
            urlencoding::encode(calendar_id)
        );
        let request = self.http_client.post(&url).json(&ApiEvent::from_payload(payload));
        self.execute(request)?;

        debug!("created event {:?} in calendar {calendar_id}", payload.summary);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CalendarListResponse {
    #[serde(default)]
    items: Vec<ApiCalendarEntry>,
}

#[derive(Debug, Deserialize)]
struct ApiCalendarEntry {
    id: String,
    #[serde(default)]
    summary: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiCalendar<'a> {
    summary: &'a str,
    time_zone: &'a str,
    location: &'a str,
}

impl<'a> ApiCalendar<'a> {
    fn from_spec(spec: &'a CalendarSpec) -> Self {
        Self {
            summary: &spec.display_name,
            time_zone: &spec.timezone,
            location: &spec.location,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiEvent<'a> {
    summary: &'a str,
    location: &'a str,
    description: &'a str,
    start: ApiEventTime<'a>,
    end: ApiEventTime<'a>,
    source: ApiSource<'a>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<ApiAttachment<'a>>,
}

impl<'a> ApiEvent<'a> {
    fn from_payload(payload: &'a EventPayload) -> Self {
        Self {
            summary: &payload.summary,
            location: &payload.location,
            description: &payload.description,
            start: ApiEventTime {
                date_time: payload.start.to_rfc3339(),
                time_zone: &payload.timezone,
            },
            end: ApiEventTime {
                date_time: payload.end.to_rfc3339(),
                time_zone: &payload.timezone,
            },
            source: ApiSource {
                url: &payload.source_url,
            },
            attachments: payload
                .attachment_url
                .iter()
                .map(|url| ApiAttachment { file_url: url })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiEventTime<'a> {
    date_time: String,
    time_zone: &'a str,
}

#[derive(Debug, Serialize)]
struct ApiSource<'a> {
    url: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiAttachment<'a> {
    file_url: &'a str,
}
