use std::str::FromStr;

use crate::error::ProjError;
use crate::geo::impls::projection::WebMercator;
use crate::geo::projection::Projection;

const GEOGRAPHIC: [&str; 4] = ["longlat", "latlong", "lonlat", "latlon"];

/// Parameters of a PROJ string, e.g. `+proj=utm +zone=31 +datum=WGS84 +units=m +no_defs`.
///
/// Parameter values may contain spaces (`+title=WGS 84 (long/lat)`): words that do not start with `+` are appended to
/// the value of the preceding parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjDefinition {
    params: Vec<(String, Option<String>)>,
}

impl FromStr for ProjDefinition {
    type Err = ProjError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut params: Vec<(String, Option<String>)> = vec![];
        for word in s.split_whitespace() {
            if let Some(param) = word.strip_prefix('+') {
                match param.split_once('=') {
                    Some((key, value)) => params.push((key.to_string(), Some(value.to_string()))),
                    None => params.push((param.to_string(), None)),
                }
            } else if let Some((_, Some(value))) = params.last_mut() {
                value.push(' ');
                value.push_str(word);
            }
        }

        let definition = Self { params };
        if definition.proj().is_none() {
            return Err(ProjError::MissingProj);
        }

        Ok(definition)
    }
}

impl ProjDefinition {
    /// Value of the parameter, `None` if it is absent or is a flag.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_deref())
    }

    /// Returns true if the parameter is present, with or without a value.
    pub fn has(&self, key: &str) -> bool {
        self.params.iter().any(|(k, _)| k == key)
    }

    /// Projection method name (`+proj`).
    pub fn proj(&self) -> Option<&str> {
        self.get("proj")
    }

    /// Returns true for longitude/latitude systems.
    pub fn is_geographic(&self) -> bool {
        self.proj().is_some_and(|p| GEOGRAPHIC.contains(&p))
    }

    /// Spherical mercator on the WGS 84 semi-major axis (`+proj=merc +a=6378137 +b=6378137`), as used by EPSG:3857.
    pub fn is_web_mercator(&self) -> bool {
        let radius = |key| {
            self.get(key)
                .and_then(|v| v.parse::<f64>().ok())
                .is_some_and(|v| v == WebMercator::WGS84_RADIUS)
        };
        self.proj() == Some("merc") && radius("a") && radius("b")
    }

    /// Builds a projection from WGS 84 geographic coordinates into the coordinates of this system.
    ///
    /// Spherical mercator is computed in closed form, any other method is handed to the transformation engine.
    pub fn get_projection(&self) -> Result<Box<dyn Projection>, ProjError> {
        if self.is_web_mercator() {
            return Ok(Box::new(WebMercator::default()));
        }

        self.engine_projection()
    }

    /// Definition text without descriptive parameters (`+title`), whose values may contain spaces.
    pub fn engine_definition(&self) -> String {
        self.params
            .iter()
            .filter(|(key, _)| key != "title")
            .map(|(key, value)| match value {
                Some(value) => format!("+{key}={value}"),
                None => format!("+{key}"),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[cfg(feature = "proj4rs")]
    fn engine_projection(&self) -> Result<Box<dyn Projection>, ProjError> {
        let projection =
            super::Proj4Projection::new(&self.engine_definition(), self.is_geographic())?;
        Ok(Box::new(projection))
    }

    #[cfg(not(feature = "proj4rs"))]
    fn engine_projection(&self) -> Result<Box<dyn Projection>, ProjError> {
        Err(ProjError::Unsupported(format!(
            "+proj={}",
            self.proj().unwrap_or_default()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Coord;
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;

    fn def(s: &str) -> ProjDefinition {
        s.parse().expect("invalid definition")
    }

    #[test]
    fn parse_params() {
        let d = def("+title=WGS 84 (long/lat) +proj=longlat +ellps=WGS84 +datum=WGS84 +units=degrees");
        assert_eq!(d.get("title"), Some("WGS 84 (long/lat)"));
        assert_eq!(d.proj(), Some("longlat"));
        assert!(d.is_geographic());

        let d = def("+proj=utm +zone=33 +south +datum=WGS84 +units=m +no_defs");
        assert!(d.has("south"));
        assert!(d.has("no_defs"));
        assert_eq!(d.get("south"), None);
        assert!(!d.is_geographic());
    }

    #[test]
    fn engine_definition_drops_title() {
        let d = def("+title=WGS 84 (long/lat) +proj=longlat +datum=WGS84 +no_defs");
        assert_eq!(d.engine_definition(), "+proj=longlat +datum=WGS84 +no_defs");
    }

    #[test]
    fn missing_proj() {
        assert_matches!("".parse::<ProjDefinition>(), Err(ProjError::MissingProj));
        assert_matches!(
            "+datum=WGS84 +units=m".parse::<ProjDefinition>(),
            Err(ProjError::MissingProj)
        );
    }

    #[test]
    fn web_mercator_definition() {
        let d = def("+proj=merc +a=6378137 +b=6378137 +lat_ts=0 +lon_0=0 +x_0=0 +y_0=0 +k=1 +units=m +nadgrids=@null +wktext +no_defs");
        assert!(d.is_web_mercator());
        assert!(!def("+proj=merc +lon_0=0 +ellps=WGS84").is_web_mercator());

        let unprojected = d
            .get_projection()
            .expect("no projection")
            .unproject(&Coord::new(-20_037_508.342789244, 0.0))
            .expect("unprojection failed");
        assert_abs_diff_eq!(unprojected.x, -180.0, epsilon = 1e-9);
        assert_abs_diff_eq!(unprojected.y, 0.0, epsilon = 1e-9);
    }

    #[cfg(feature = "proj4rs")]
    #[test]
    fn utm_definition() {
        let projection = def("+proj=utm +zone=31 +datum=WGS84 +units=m +no_defs")
            .get_projection()
            .expect("no projection");
        let unprojected = projection
            .unproject(&Coord::new(500_000.0, 0.0))
            .expect("unprojection failed");
        assert_abs_diff_eq!(unprojected.x, 3.0, epsilon = 1e-7);
        assert_abs_diff_eq!(unprojected.y, 0.0, epsilon = 1e-7);
    }

    #[cfg(feature = "proj4rs")]
    #[test]
    fn unknown_method() {
        assert_matches!(
            def("+proj=no_such_method +ellps=WGS84").get_projection().err(),
            Some(ProjError::Engine(_))
        );
    }
}
