//! Calendar event client for Microsoft Graph.
//!
//! Consumes a bearer token (for example one produced by `meetings-auth`) and
//! exposes create/read/update/delete on the signed-in user's events.
//!
//! ```ignore
//! use meetings_graph::{Event, GraphClient};
//!
//! let client = GraphClient::new(access_token, Duration::from_secs(30))?;
//! let created = client
//!     .create_event(&Event::new("Standup", "2024-03-15T09:00:00", "2024-03-15T09:15:00", "UTC"))
//!     .await?;
//! ```

pub mod client;
pub mod error;
pub mod event;

pub use client::{GRAPH_API_BASE, GraphClient};
pub use error::{GraphError, GraphErrorCode, GraphResult};
pub use event::{Attendee, AttendeeType, DateTimeTimeZone, EmailAddress, Event, Location};
