//! Calendar event commands.

use std::time::Duration;

use meetings_graph::{Attendee, AttendeeType, DateTimeTimeZone, Event, GraphClient};
use serde::Serialize;

use crate::cli::{EventFields, EventsAction};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Runs an event action against the calendar API.
pub async fn run(token: String, action: EventsAction, config: &ClientConfig) -> ClientResult<()> {
    let client = GraphClient::new(token, Duration::from_secs(config.graph.timeout))?
        .with_base_url(&config.graph.base_url)?;

    match action {
        EventsAction::List => print_json(&client.list_events().await?),
        EventsAction::Get { id } => print_json(&client.get_event(&id).await?),
        EventsAction::Create { fields } => {
            let event = new_event(&fields)?;
            print_json(&client.create_event(&event).await?)
        }
        EventsAction::Update { id, fields } => {
            let patch = event_patch(&fields)?;
            print_json(&client.update_event(&id, &patch).await?)
        }
        EventsAction::Delete { id } => {
            client.delete_event(&id).await?;
            eprintln!("Deleted event {}", id);
            Ok(())
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> ClientResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| ClientError::Config(format!("failed to render JSON: {}", e)))?;
    println!("{}", text);
    Ok(())
}

/// Builds a new event; subject, start and end are required.
pub fn new_event(fields: &EventFields) -> ClientResult<Event> {
    let required = |value: &Option<String>, flag: &str| {
        value
            .clone()
            .ok_or_else(|| ClientError::Usage(format!("--{} is required to create an event", flag)))
    };
    let subject = required(&fields.subject, "subject")?;
    let start = required(&fields.start, "start")?;
    let end = required(&fields.end, "end")?;

    let mut event = Event::new(subject, start, end, &fields.time_zone);
    apply_optional(&mut event, fields)?;
    Ok(event)
}

/// Builds a partial event carrying only the fields that were given.
pub fn event_patch(fields: &EventFields) -> ClientResult<Event> {
    let mut event = Event {
        subject: fields.subject.clone(),
        start: fields
            .start
            .as_ref()
            .map(|s| DateTimeTimeZone::new(s, &fields.time_zone)),
        end: fields
            .end
            .as_ref()
            .map(|s| DateTimeTimeZone::new(s, &fields.time_zone)),
        ..Default::default()
    };
    apply_optional(&mut event, fields)?;

    if event == Event::default() {
        return Err(ClientError::Usage("nothing to update".to_string()));
    }
    Ok(event)
}

fn apply_optional(event: &mut Event, fields: &EventFields) -> ClientResult<()> {
    if let Some(ref location) = fields.location {
        *event = std::mem::take(event).with_location(location);
    }
    if let Some(ref show_as) = fields.show_as {
        event.show_as = Some(show_as.clone());
    }
    for raw in &fields.attendee {
        event.attendees.push(parse_attendee(raw, AttendeeType::Required)?);
    }
    for raw in &fields.optional_attendee {
        event.attendees.push(parse_attendee(raw, AttendeeType::Optional)?);
    }
    Ok(())
}

/// Parses `Name <address>` or a bare `address`.
pub fn parse_attendee(raw: &str, attendee_type: AttendeeType) -> ClientResult<Attendee> {
    let raw = raw.trim();
    let (name, address) = match raw.split_once('<') {
        Some((name, rest)) => {
            let address = rest.strip_suffix('>').ok_or_else(|| {
                ClientError::Usage(format!("attendee {:?} is missing a closing '>'", raw))
            })?;
            (name.trim(), address.trim())
        }
        None => ("", raw),
    };

    if !address.contains('@') {
        return Err(ClientError::Usage(format!(
            "attendee {:?} has no email address",
            raw
        )));
    }

    let name = if name.is_empty() { address } else { name };
    Ok(Attendee::new(name, address, attendee_type))
}
