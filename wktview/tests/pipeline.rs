use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use approx::assert_abs_diff_eq;
use assert_matches::assert_matches;
use async_trait::async_trait;
use wktview::crs::{CrsCache, CrsResolver, CrsSource};
use wktview::encode::{decode_ewkb, decode_wkb};
use wktview::error::SourceError;
use wktview::wktview_types::{Coord, CrsId, Geometry};
use wktview::detect::InputFormat;
use wktview::{NormalizedResult, Pipeline, PipelineError, SpatialInput, WktError};

/// Authority stub knowing NAD83 / Alberta 10-TM (Forest) and Amersfoort / RD New.
struct StubAuthority {
    requests: Arc<AtomicUsize>,
}

#[async_trait]
impl CrsSource for StubAuthority {
    async fn load_definition(&self, id: CrsId) -> Result<String, SourceError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        match id.code() {
            3400 => Ok("+proj=tmerc +lat_0=0 +lon_0=-115 +k=0.9992 +x_0=500000 +y_0=0 +datum=NAD83 +units=m +no_defs +type=crs".to_string()),
            28992 => Ok("+proj=sterea +lat_0=52.1561605555556 +lon_0=5.38763888888889 +k=0.9999079 +x_0=155000 +y_0=463000 +ellps=bessel +towgs84=565.4171,50.3319,465.5524,1.9342,-1.6677,9.1019,4.0725 +units=m +no_defs +type=crs".to_string()),
            _ => Err(SourceError::Status(404)),
        }
    }
}

/// Pipeline over a seeded cache and the stub authority, with the authority request counter.
fn pipeline() -> (Pipeline, Arc<AtomicUsize>) {
    let requests = Arc::new(AtomicUsize::new(0));
    let resolver = CrsResolver::new(Arc::new(CrsCache::seeded())).with_source(StubAuthority {
        requests: requests.clone(),
    });
    (Pipeline::new(resolver), requests)
}

fn run(pipeline: &Pipeline, input: SpatialInput) -> Result<Option<NormalizedResult>, PipelineError> {
    tokio_test::block_on(pipeline.run(&input))
}

#[test]
fn point_in_wgs84() {
    let (pipeline, requests) = pipeline();
    let result = run(&pipeline, SpatialInput::new("POINT (30 10)").with_epsg(4326))
        .expect("run failed")
        .expect("no result");

    let json: serde_json::Value =
        serde_json::from_str(&result.geojson_string().expect("encoding failed")).expect("invalid json");
    assert_eq!(
        json,
        serde_json::json!({
            "type": "Feature",
            "geometry": {"type": "Point", "coordinates": [30.0, 10.0]},
            "properties": null
        })
    );
    assert_eq!(result.wkt(), "POINT (30 10)");
    assert_eq!(requests.load(Ordering::SeqCst), 0);
}

#[test]
fn binary_outputs_read_back() {
    let (pipeline, _) = pipeline();
    let result = run(
        &pipeline,
        SpatialInput::new("SRID=2154;POLYGON ((650000 6860000, 660000 6860000, 660000 6870000, 650000 6860000))"),
    )
    .expect("run failed")
    .expect("no result");

    assert_eq!(decode_wkb(result.wkb()), Ok(result.geometry().clone()));
    assert_eq!(
        decode_ewkb(result.ewkb()),
        Ok((result.geometry().clone(), Some(result.crs())))
    );
    assert_eq!(result.crs().code(), 2154);

    let bounds = result.bounds().expect("empty geometry");
    assert!(bounds.contains(2.4, 48.85), "Paris is not in {bounds:?}");
}

#[test]
fn remote_definition_is_loaded_once() {
    let (pipeline, requests) = pipeline();
    for _ in 0..3 {
        let result = run(&pipeline, SpatialInput::new("SRID=3400;POINT (500000 6000000)"))
            .expect("run failed")
            .expect("no result");
        assert_matches!(result.projected(), Geometry::Point(Some(coord)) => {
            assert_abs_diff_eq!(coord.x, -115.0, epsilon = 1e-7);
            assert_abs_diff_eq!(coord.y, 54.17, epsilon = 0.05);
        });
    }
    assert_eq!(requests.load(Ordering::SeqCst), 1);
}

#[test]
fn remote_oblique_stereographic_system() {
    let (pipeline, requests) = pipeline();
    let result = run(&pipeline, SpatialInput::new("SRID=28992;POINT (155000 463000)"))
        .expect("run failed")
        .expect("no result");
    assert_matches!(result.projected(), Geometry::Point(Some(coord)) => {
        assert_abs_diff_eq!(coord.x, 5.3872, epsilon = 1e-3);
        assert_abs_diff_eq!(coord.y, 52.1552, epsilon = 1e-3);
    });
    assert_eq!(requests.load(Ordering::SeqCst), 1);
}

#[test]
fn seeded_system_on_other_datum() {
    let (pipeline, _) = pipeline();
    let result = run(&pipeline, SpatialInput::new("SRID=27700;POINT (651409.903 313177.270)"))
        .expect("run failed")
        .expect("no result");
    assert_matches!(result.projected(), Geometry::Point(Some(coord)) => {
        assert_abs_diff_eq!(coord.x, 1.716074, epsilon = 1e-4);
        assert_abs_diff_eq!(coord.y, 52.657975, epsilon = 1e-4);
    });
}

#[test]
fn unknown_system() {
    let (pipeline, requests) = pipeline();
    assert_eq!(
        run(&pipeline, SpatialInput::new("POINT (1 2)").with_epsg("EPSG:3401")),
        Err(PipelineError::CrsNotFound(CrsId::new(3401).expect("invalid id")))
    );
    assert_eq!(requests.load(Ordering::SeqCst), 1);
}

#[test]
fn out_of_range_system_is_not_requested() {
    let (pipeline, requests) = pipeline();
    assert_matches!(
        run(&pipeline, SpatialInput::new("SRID=99999;POINT (1 2)")),
        Err(PipelineError::InvalidCrsRange(_))
    );
    assert_eq!(requests.load(Ordering::SeqCst), 0);
}

#[test]
fn syntax_error_is_reported() {
    let (pipeline, _) = pipeline();
    let err = run(&pipeline, SpatialInput::new("POINT (30 10")).expect_err("parsed");
    assert_eq!(
        err,
        PipelineError::WktParseFailed(WktError::UnexpectedEnd { position: 12 })
    );
    assert_eq!(
        err.to_string(),
        "WKT parsing failed: Unexpected end of input at position 12"
    );
}

#[test]
fn h3_cell_is_a_polygon() {
    let (pipeline, _) = pipeline();
    let result = run(&pipeline, SpatialInput::new("8928308280fffff"))
        .expect("run failed")
        .expect("no result");

    assert_eq!(result.format(), InputFormat::H3);
    assert_eq!(result.crs(), CrsId::WGS84);
    assert_matches!(result.geometry(), Geometry::Polygon(rings) => {
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].first(), rings[0].last());
    });
}

#[test]
fn uri_prefixed_wkt() {
    let (pipeline, _) = pipeline();
    let result = run(
        &pipeline,
        SpatialInput::new("<http://www.opengis.net/def/crs/EPSG/0/3857> POINT (0 0)").with_epsg(2154),
    )
    .expect("run failed")
    .expect("no result");

    assert_eq!(result.crs(), CrsId::EPSG3857);
    assert_eq!(result.projected(), &Geometry::Point(Some(Coord::new(0.0, 0.0))));
}

#[test]
fn concurrent_runs_share_the_cache() {
    let (pipeline, requests) = pipeline();
    let pipeline = Arc::new(pipeline);

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let pipeline = pipeline.clone();
            std::thread::spawn(move || {
                let input = SpatialInput::new(format!("POINT ({} 6000000)", 500000 + i * 1000)).with_epsg(3400);
                tokio_test::block_on(pipeline.run(&input))
            })
        })
        .collect();

    for handle in handles {
        assert_matches!(handle.join().expect("thread panicked"), Ok(Some(_)));
    }
    assert!(pipeline.resolver().cache().contains(CrsId::new(3400).expect("invalid id")));
    assert!(requests.load(Ordering::SeqCst) >= 1);
}

/// Authority answering with OGC WKT instead of PROJ strings.
struct WktAuthority;

#[async_trait]
impl CrsSource for WktAuthority {
    async fn load_definition(&self, _id: CrsId) -> Result<String, SourceError> {
        Ok(r#"PROJCS["NAD83 / Alberta 10-TM (Forest)",GEOGCS["NAD83",DATUM["North_American_Datum_1983",SPHEROID["GRS 1980",6378137,298.257222101]]],PROJECTION["Transverse_Mercator"],UNIT["metre",1]]"#.to_string())
    }
}

#[test]
fn wkt_definition_is_not_cached() {
    let pipeline = Pipeline::new(CrsResolver::new(Arc::new(CrsCache::seeded())).with_source(WktAuthority));
    let id = CrsId::new(3400).expect("invalid id");

    assert_eq!(
        run(&pipeline, SpatialInput::new("POINT (500000 6000000)").with_epsg(3400)),
        Err(PipelineError::CrsNotFound(id))
    );
    assert!(!pipeline.resolver().cache().contains(id));
}

#[cfg(feature = "native")]
#[test]
fn remote_resolver_rejects_wkt_definitions() {
    let config = wktview::config::ResolverConfig {
        format: wktview::config::DefinitionFormat::Wkt,
        ..Default::default()
    };
    assert_matches!(
        CrsResolver::remote(config),
        Err(SourceError::UnsupportedFormat(_))
    );
}
