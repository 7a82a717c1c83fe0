use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{CrsIdError, ProjError};
use crate::geo::impls::projection::ProjDefinition;
use crate::geo::Projection;

/// EPSG authority code of a coordinate reference system.
///
/// Only codes in the `1024..=32767` range can be constructed, anything else is rejected before any lookup is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u16")]
pub struct CrsId(u16);

impl CrsId {
    /// Smallest accepted code.
    pub const MIN: u16 = 1024;
    /// Largest accepted code.
    pub const MAX: u16 = 32767;

    /// WGS 84 geographic coordinates, the canonical output system.
    pub const WGS84: CrsId = CrsId(4326);
    /// WGS 84 / Pseudo-Mercator.
    pub const EPSG3857: CrsId = CrsId(3857);

    /// Creates a new identifier, checking the range.
    pub fn new(code: i64) -> Result<Self, CrsIdError> {
        if (Self::MIN as i64..=Self::MAX as i64).contains(&code) {
            Ok(Self(code as u16))
        } else {
            Err(CrsIdError::OutOfRange(code))
        }
    }

    /// Numeric code.
    pub fn code(&self) -> u16 {
        self.0
    }
}

impl Display for CrsId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CrsId {
    type Err = CrsIdError;

    /// Accepts `4326`, `EPSG:4326` and `epsg:4326`, surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = match trimmed.get(..5) {
            Some(prefix) if prefix.eq_ignore_ascii_case("epsg:") => trimmed[5..].trim_start(),
            _ => trimmed,
        };

        let code = digits
            .parse::<i64>()
            .map_err(|_| CrsIdError::NotANumber(s.to_string()))?;
        Self::new(code)
    }
}

impl TryFrom<i64> for CrsId {
    type Error = CrsIdError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CrsId> for u16 {
    fn from(value: CrsId) -> Self {
        value.0
    }
}

impl From<CrsId> for i32 {
    fn from(value: CrsId) -> Self {
        value.0 as i32
    }
}

/// Textual definition of a coordinate reference system (a PROJ string such as
/// `+proj=utm +zone=31 +datum=WGS84 +units=m +no_defs`), bound to the identifier it was resolved for.
///
/// Cheap to clone, the text is shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionDefinition {
    id: CrsId,
    text: Arc<str>,
}

impl ProjectionDefinition {
    /// Creates a new definition.
    pub fn new(id: CrsId, text: impl Into<Arc<str>>) -> Self {
        Self {
            id,
            text: text.into(),
        }
    }

    /// Identifier the definition was resolved for.
    pub fn id(&self) -> CrsId {
        self.id
    }

    /// Definition text as returned by the authority.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Parses the definition into its parameters.
    pub fn parse(&self) -> Result<ProjDefinition, ProjError> {
        self.text.parse()
    }

    /// Builds a projection that converts geographic coordinates (lon/lat degrees) into coordinates of this system
    /// and back.
    pub fn get_projection(&self) -> Result<Box<dyn Projection>, ProjError> {
        self.parse()?.get_projection()
    }
}

impl Display for ProjectionDefinition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}
