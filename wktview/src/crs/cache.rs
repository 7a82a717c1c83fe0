use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use ahash::RandomState;
use parking_lot::RwLock;
use wktview_types::{CrsId, ProjectionDefinition};

/// Definitions available without any remote lookup.
const SEED: [(u16, &str); 11] = [
    (4326, "+proj=longlat +datum=WGS84 +no_defs +type=crs"),
    (3857, "+proj=merc +a=6378137 +b=6378137 +lat_ts=0 +lon_0=0 +x_0=0 +y_0=0 +k=1 +units=m +nadgrids=@null +wktext +no_defs +type=crs"),
    (4258, "+proj=longlat +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +no_defs +type=crs"),
    (4269, "+proj=longlat +datum=NAD83 +no_defs +type=crs"),
    (4267, "+proj=longlat +ellps=clrk66 +towgs84=-8,160,176,0,0,0,0 +no_defs +type=crs"),
    (32631, "+proj=utm +zone=31 +datum=WGS84 +units=m +no_defs +type=crs"),
    (32633, "+proj=utm +zone=33 +datum=WGS84 +units=m +no_defs +type=crs"),
    (2154, "+proj=lcc +lat_0=46.5 +lon_0=3 +lat_1=49 +lat_2=44 +x_0=700000 +y_0=6600000 +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs +type=crs"),
    (27700, "+proj=tmerc +lat_0=49 +lon_0=-2 +k=0.9996012717 +x_0=400000 +y_0=-100000 +ellps=airy +towgs84=446.448,-125.157,542.06,0.15,0.247,0.842,-20.489 +units=m +no_defs +type=crs"),
    (3035, "+proj=laea +lat_0=52 +lon_0=10 +x_0=4321000 +y_0=3210000 +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs +type=crs"),
    (31370, "+proj=lcc +lat_0=90 +lon_0=4.36748666666667 +lat_1=51.1666672333333 +lat_2=49.8333339 +x_0=150000.013 +y_0=5400088.438 +ellps=intl +towgs84=-106.8686,52.2978,-103.7239,0.3366,-0.457,1.8422,-1.2747 +units=m +no_defs +type=crs"),
];

static GLOBAL: LazyLock<Arc<CrsCache>> = LazyLock::new(|| Arc::new(CrsCache::seeded()));

/// In-memory map of CRS identifiers to their definition text.
///
/// The cache is shared between concurrent pipeline runs and only grows. When two runs insert a definition for the same
/// identifier, the first insert wins and both runs see its text.
#[derive(Debug, Default)]
pub struct CrsCache {
    entries: RwLock<HashMap<CrsId, Arc<str>, RandomState>>,
}

impl CrsCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cache with definitions of commonly used systems, including WGS 84 (4326) and Web Mercator (3857).
    pub fn seeded() -> Self {
        let cache = Self::new();
        {
            let mut entries = cache.entries.write();
            for (code, text) in SEED {
                if let Ok(id) = CrsId::new(i64::from(code)) {
                    entries.insert(id, Arc::from(text));
                }
            }
        }

        cache
    }

    /// Process-wide seeded cache.
    pub fn global() -> Arc<Self> {
        GLOBAL.clone()
    }

    /// Cached definition of the system.
    pub fn get(&self, id: CrsId) -> Option<ProjectionDefinition> {
        self.entries
            .read()
            .get(&id)
            .map(|text| ProjectionDefinition::new(id, text.clone()))
    }

    /// Stores the definition unless one is already present, and returns the stored one.
    pub fn insert(&self, id: CrsId, text: impl Into<Arc<str>>) -> ProjectionDefinition {
        let mut entries = self.entries.write();
        let text = entries.entry(id).or_insert_with(|| text.into());
        ProjectionDefinition::new(id, text.clone())
    }

    /// Returns true if the system is cached.
    pub fn contains(&self, id: CrsId) -> bool {
        self.entries.read().contains_key(&id)
    }

    /// Number of cached definitions.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(code: i64) -> CrsId {
        CrsId::new(code).expect("invalid id")
    }

    #[test]
    fn seeded_definitions() {
        let cache = CrsCache::seeded();
        assert_eq!(cache.len(), SEED.len());
        assert_eq!(
            cache.get(CrsId::WGS84).map(|d| d.text().to_string()),
            Some("+proj=longlat +datum=WGS84 +no_defs +type=crs".to_string())
        );
        assert!(cache.contains(CrsId::EPSG3857));
        assert!(!cache.contains(id(3400)));
    }

    #[test]
    fn seeded_definitions_are_usable() {
        let cache = CrsCache::seeded();
        for (code, _) in SEED {
            let definition = cache.get(id(code.into())).expect("not seeded");
            assert!(
                definition.get_projection().is_ok(),
                "no projection for EPSG:{code}"
            );
        }
    }

    #[test]
    fn first_insert_wins() {
        let cache = CrsCache::new();
        assert!(cache.is_empty());

        let first = cache.insert(id(3400), "+proj=first");
        let second = cache.insert(id(3400), "+proj=second");
        assert_eq!(first.text(), "+proj=first");
        assert_eq!(second.text(), "+proj=first");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn global_cache_is_shared() {
        assert!(Arc::ptr_eq(&CrsCache::global(), &CrsCache::global()));
        assert!(CrsCache::global().contains(CrsId::WGS84));
    }
}
