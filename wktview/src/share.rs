//! Sharing inputs through links and stored records.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::pipeline::SpatialInput;

/// Longest query string that is still put into a link.
pub const MAX_QUERY_LENGTH: usize = 4000;

impl SpatialInput {
    /// Encodes the input as a `wkt=...&epsg=...` query string, `None` if the result would be
    /// [too long](MAX_QUERY_LENGTH) for a link.
    pub fn to_query(&self) -> Option<String> {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("wkt", self.wkt())
            .append_pair("epsg", self.epsg().unwrap_or_default())
            .finish();

        (query.len() < MAX_QUERY_LENGTH).then_some(query)
    }

    /// Reads an input from a query string, with or without the leading `?`. Returns `None` if the query has neither
    /// `wkt` nor `epsg`.
    pub fn from_query(query: &str) -> Option<Self> {
        let mut wkt = None;
        let mut epsg = None;
        for (key, value) in url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
            match key.as_ref() {
                "wkt" => wkt = Some(value.into_owned()),
                "epsg" => epsg = Some(value.into_owned()),
                _ => {}
            }
        }

        if wkt.is_none() && epsg.is_none() {
            return None;
        }

        let input = Self::new(wkt.unwrap_or_default());
        Some(match epsg {
            Some(epsg) => input.with_epsg(epsg),
            None => input,
        })
    }
}

/// Stored, addressable copy of an input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareRecord {
    /// Short content hash of the input.
    pub id: String,
    /// Input text.
    pub wkt: String,
    /// CRS reference, empty if none was given.
    pub epsg: String,
}

impl ShareRecord {
    /// Creates a record of the input. Equal inputs get equal ids.
    pub fn new(input: &SpatialInput) -> Self {
        let wkt = input.wkt().to_string();
        let epsg = input.epsg().unwrap_or_default().to_string();

        let mut hasher = Sha256::new();
        hasher.update(wkt.as_bytes());
        hasher.update(epsg.as_bytes());
        let id = hasher.finalize()[..4]
            .iter()
            .map(|byte| format!("{byte:02x}"))
            .collect();

        Self { id, wkt, epsg }
    }

    /// Input stored in the record.
    pub fn input(&self) -> SpatialInput {
        let input = SpatialInput::new(self.wkt.clone());
        if self.epsg.is_empty() {
            input
        } else {
            input.with_epsg(&self.epsg)
        }
    }
}
