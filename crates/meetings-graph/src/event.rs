//! Calendar event resource as exchanged with `/me/events`.
//!
//! Only the fields this tool manages are modeled. Absent optional fields are
//! left out of request bodies so a PATCH touches nothing else.

use serde::{Deserialize, Serialize};

/// A calendar event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Server-assigned identifier; never sent on create.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTimeTimeZone>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTimeTimeZone>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attendees: Vec<Attendee>,

    /// Free/busy status, e.g. `busy`, `free`, `tentative`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_as: Option<String>,
}

impl Event {
    /// Creates an event with a subject and a start/end in one time zone.
    pub fn new(
        subject: impl Into<String>,
        start: impl Into<String>,
        end: impl Into<String>,
        time_zone: impl Into<String>,
    ) -> Self {
        let time_zone = time_zone.into();
        Self {
            subject: Some(subject.into()),
            start: Some(DateTimeTimeZone::new(start, time_zone.clone())),
            end: Some(DateTimeTimeZone::new(end, time_zone)),
            ..Default::default()
        }
    }

    /// Builder method to set the location display name.
    pub fn with_location(mut self, display_name: impl Into<String>) -> Self {
        self.location = Some(Location {
            display_name: display_name.into(),
        });
        self
    }

    /// Builder method to add an attendee.
    pub fn with_attendee(mut self, attendee: Attendee) -> Self {
        self.attendees.push(attendee);
        self
    }

    /// Builder method to set the free/busy status.
    pub fn with_show_as(mut self, show_as: impl Into<String>) -> Self {
        self.show_as = Some(show_as.into());
        self
    }
}

/// A local date-time paired with an IANA or Windows time zone name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateTimeTimeZone {
    /// ISO 8601 local date-time, e.g. `2024-03-15T10:00:00`.
    pub date_time: String,
    pub time_zone: String,
}

impl DateTimeTimeZone {
    pub fn new(date_time: impl Into<String>, time_zone: impl Into<String>) -> Self {
        Self {
            date_time: date_time.into(),
            time_zone: time_zone.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(default)]
    pub display_name: String,
}

/// How an attendee is invited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendeeType {
    #[default]
    Required,
    Optional,
    Resource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    #[serde(rename = "type", default)]
    pub attendee_type: AttendeeType,
    pub email_address: EmailAddress,
}

impl Attendee {
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        attendee_type: AttendeeType,
    ) -> Self {
        Self {
            attendee_type,
            email_address: EmailAddress {
                name: name.into(),
                address: address.into(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddress {
    #[serde(default)]
    pub name: String,
    pub address: String,
}

/// Collection wrapper returned by list endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct EventList {
    #[serde(default)]
    pub value: Vec<Event>,
    #[serde(rename = "@odata.nextLink", default)]
    pub next_link: Option<String>,
}
