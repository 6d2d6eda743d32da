//! Inbound envelope parsing.

use serde_json::Value;
use std::str::FromStr;
use thiserror::Error;

/// Event types a scanner can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Pokemon,
    Pokestop,
    Gym,
}

impl FromStr for EventKind {
    type Err = EnvelopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pokemon" => Ok(EventKind::Pokemon),
            "pokestop" => Ok(EventKind::Pokestop),
            "gym" => Ok(EventKind::Gym),
            other => Err(EnvelopeError::UnknownType(other.to_string())),
        }
    }
}

/// Why an inbound value is not a usable envelope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    #[error("payload is not an object")]
    NotAnObject,

    #[error("missing `type` field")]
    MissingType,

    #[error("unknown payload type '{0}'")]
    UnknownType(String),

    #[error("missing `message` field")]
    MissingMessage,
}

/// `{ "type": ..., "message": {...} }`, borrowed from the parsed body.
#[derive(Debug, Clone, Copy)]
pub struct InboundEnvelope<'a> {
    pub kind: EventKind,
    pub message: &'a Value,
}

impl<'a> InboundEnvelope<'a> {
    /// Read the envelope fields out of a parsed body.
    pub fn from_json(value: &'a Value) -> Result<Self, EnvelopeError> {
        let object = value.as_object().ok_or(EnvelopeError::NotAnObject)?;

        let kind = object
            .get("type")
            .and_then(Value::as_str)
            .ok_or(EnvelopeError::MissingType)?
            .parse::<EventKind>()?;

        let message = object
            .get("message")
            .filter(|m| !m.is_null())
            .ok_or(EnvelopeError::MissingMessage)?;

        Ok(Self { kind, message })
    }
}
