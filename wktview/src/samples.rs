//! Built-in sample inputs, one of each supported format.

use crate::pipeline::SpatialInput;

const SAMPLES: [(&str, &str); 9] = [
    ("POLYGON ((30 10, 40 40, 20 40, 10 20, 30 10))", "4326"),
    ("SRID=2154;LINESTRING (652000 6862000, 700000 6600000, 843000 6519000)", ""),
    ("<http://www.opengis.net/def/crs/EPSG/0/32631> MULTIPOINT ((500000 5000000), (520000 5100000))", ""),
    ("POINT (530000 180000)", "27700"),
    ("GEOMETRYCOLLECTION (POINT (4.35 50.85), LINESTRING (2.35 48.85, 4.35 50.85))", "4326"),
    ("8928308280fffff", ""),
    ("120210233", ""),
    ("-10.5,52.3,1.9,49.8", ""),
    ("u4pruydqqvj", ""),
];

/// Number of samples.
pub fn sample_count() -> usize {
    SAMPLES.len()
}

/// Sample at the given position, wrapping around after the last one.
pub fn sample(index: usize) -> SpatialInput {
    let (wkt, epsg) = SAMPLES[index % SAMPLES.len()];
    let input = SpatialInput::new(wkt);
    if epsg.is_empty() {
        input
    } else {
        input.with_epsg(epsg)
    }
}

/// Index and input of the sample following `index`.
pub fn next_sample(index: usize) -> (usize, SpatialInput) {
    let next = (index + 1) % SAMPLES.len();
    (next, sample(next))
}
