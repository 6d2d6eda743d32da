//! Payload transformation subsystem.
//!
//! # Data Flow
//! ```text
//! inbound JSON
//!     → envelope.rs (read `type` + `message`)
//!     → dispatch on EventKind
//!         pokemon  → TransformedPokemon  (decode.rs for ids)
//!         pokestop → TransformedPokestop (decode.rs for ids)
//!         gym      → absent
//!     → payload.rs (wrap into the four-slot OutboundPayload)
//! ```
//!
//! # Design Decisions
//! - Pure functions, no I/O beyond diagnostic logging
//! - Malformed input degrades to an absent result, never an error
//! - An absent result is still forwarded upstream as JSON `null`

pub mod decode;
pub mod envelope;
pub mod payload;

use serde_json::Value;

pub use envelope::{EventKind, InboundEnvelope};
pub use payload::{OutboundPayload, TransformedPokemon, TransformedPokestop, VALIDATION_TOKEN};

use crate::transform::decode::{decode_id, parse_int_prefix};

/// Map an inbound envelope to the aggregator's wrapper payload.
///
/// Returns `None` for malformed envelopes, unknown event types and gyms.
pub fn transform(inbound: &Value) -> Option<OutboundPayload> {
    let envelope = match InboundEnvelope::from_json(inbound) {
        Ok(envelope) => envelope,
        Err(reason) => {
            tracing::warn!(reason = %reason, payload = %inbound, "Unknown payload received");
            return None;
        }
    };

    match envelope.kind {
        EventKind::Pokemon => Some(OutboundPayload::with_pokemon(transform_pokemon(
            envelope.message,
        ))),
        EventKind::Pokestop => Some(OutboundPayload::with_pokestop(transform_pokestop(
            envelope.message,
        ))),
        EventKind::Gym => transform_gym(envelope.message),
    }
}

/// Sighting fields as sent by the scanner:
/// `encounter_id` (base64), `latitude`, `longitude`, `pokemon_id`,
/// `time_until_hidden_ms`.
pub fn transform_pokemon(message: &Value) -> TransformedPokemon {
    let spawn_id = message.get("encounter_id").and_then(decode_id);
    let id = spawn_id.as_deref().and_then(parse_int_prefix);

    TransformedPokemon {
        spawn_id,
        id,
        lat: field(message, "latitude"),
        kind: field(message, "pokemon_id"),
        lon: field(message, "longitude"),
        despawn_time: field(message, "time_until_hidden_ms"),
    }
}

/// Pokestop fields as sent by the scanner:
/// `pokestop_id` (base64), `enabled`, `latitude`, `longitude`,
/// `lure_expiration`, `last_modified_time`.
pub fn transform_pokestop(message: &Value) -> TransformedPokestop {
    TransformedPokestop {
        enabled: field(message, "enabled"),
        longitude: field(message, "longitude"),
        // Scanners send `last_modified_time`; the aggregator field is fed from
        // `last_modified`, which is never present, so this stays null.
        last_modified: field(message, "last_modified"),
        lure_expiration: field(message, "lure_expiration"),
        latitude: field(message, "latitude"),
        active_pokemon_id: 0,
        pokestop_id: message.get("pokestop_id").and_then(decode_id),
    }
}

fn field(message: &Value, name: &str) -> Option<Value> {
    message.get(name).cloned()
}

/// Gym submissions are not supported; the aggregator's gym shape is unknown.
pub fn transform_gym(_message: &Value) -> Option<OutboundPayload> {
    tracing::debug!("Gym events are not forwarded");
    None
}
