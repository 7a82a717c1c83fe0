//! Normalizes inputs given on the command line (or the built-in samples) and prints the results.
//!
//! ```text
//! cargo run --example normalize -- "SRID=2154;POINT (652469 6862035)" 8928308280fffff
//! ```
//!
//! Definitions of systems that are not cached are loaded from epsg.io.

use anyhow::Result;
use wktview::crs::CrsResolver;
use wktview::samples::{sample, sample_count};
use wktview::{LogMessenger, Pipeline, ResolverConfig, ShareRecord, SpatialInput};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let resolver = CrsResolver::remote(ResolverConfig::default())?;
    let pipeline = Pipeline::new(resolver).with_messenger(LogMessenger);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let inputs: Vec<SpatialInput> = if args.is_empty() {
        (0..sample_count()).map(sample).collect()
    } else {
        args.into_iter().map(SpatialInput::new).collect()
    };

    for input in inputs {
        println!("> {}", input.wkt());
        match pipeline.run(&input).await {
            Ok(Some(result)) => {
                println!("  format:  {}", result.format());
                println!("  ewkt:    {}", result.ewkt());
                println!("  geojson: {}", result.geojson_string()?);
                println!("  wkb:     {} bytes", result.wkb().len());
                if let Some(bounds) = result.bounds() {
                    println!(
                        "  bounds:  {}, {}, {}, {}",
                        bounds.x_min(),
                        bounds.y_max(),
                        bounds.x_max(),
                        bounds.y_min()
                    );
                }
                println!("  share:   {}", ShareRecord::new(&input).id);
            }
            Ok(None) => println!("  nothing to show"),
            Err(err) => println!("  error:   {err}"),
        }
    }

    Ok(())
}
