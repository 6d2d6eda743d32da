//! Outbound wrapper payload sent to the aggregator.

use serde::Serialize;
use serde_json::{Number, Value};

/// Opaque token the aggregator expects in every submission.
pub const VALIDATION_TOKEN: &str =
    "Tc\u{a1}\u{12}\u{9c}z8Y\u{c5}\u{9f}\u{e8}\u{15}{L;\u{f4}\u{8a}TC\u{90}";

/// Four-slot wrapper. Exactly one list holds an entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundPayload {
    pub pokemon: Vec<TransformedPokemon>,
    pub validation1: &'static str,
    pub pokestops: Vec<TransformedPokestop>,
    pub gyms: Vec<Value>,
}

impl OutboundPayload {
    pub fn with_pokemon(pokemon: TransformedPokemon) -> Self {
        Self {
            pokemon: vec![pokemon],
            validation1: VALIDATION_TOKEN,
            pokestops: Vec::new(),
            gyms: Vec::new(),
        }
    }

    pub fn with_pokestop(pokestop: TransformedPokestop) -> Self {
        Self {
            pokemon: Vec::new(),
            validation1: VALIDATION_TOKEN,
            pokestops: vec![pokestop],
            gyms: Vec::new(),
        }
    }
}

/// A sighting in aggregator form.
///
/// Fields other than the decoded ids carry the scanner's values verbatim.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransformedPokemon {
    pub spawn_id: Option<String>,
    pub id: Option<Number>,
    pub lat: Option<Value>,
    /// Species number.
    #[serde(rename = "type")]
    pub kind: Option<Value>,
    pub lon: Option<Value>,
    pub despawn_time: Option<Value>,
}

/// A pokestop in aggregator form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransformedPokestop {
    pub enabled: Option<Value>,
    pub longitude: Option<Value>,
    pub last_modified: Option<Value>,
    pub lure_expiration: Option<Value>,
    pub latitude: Option<Value>,
    /// Lured pokemon is not reported by scanners; always 0.
    pub active_pokemon_id: i64,
    pub pokestop_id: Option<String>,
}
