//! Records request durations for a few routes over two collection cycles and prints
//! both the delta and cumulative views to the console.

use bucketeer::{Aggregator, CumulativeHistogram, DeltaHistogram, HistogramConfig};

const ROUTES: &[&str] = &["/login", "/search", "/checkout"];

fn main() {
    let config = HistogramConfig::builder()
        .boundaries(&[5.0, 10.0, 25.0, 50.0, 100.0, 250.0])
        .build()
        .expect("boundaries are finite and strictly increasing");

    let delta = DeltaHistogram::<u32, &str>::new(&config);
    let cumulative = CumulativeHistogram::<u32, &str>::new(&config);

    let aggregators: [&dyn Aggregator<u32, &str>; 2] = [&delta, &cumulative];

    for cycle in 1..=2_u32 {
        for (route_index, route) in (1_u32..).zip(ROUTES) {
            for i in 0..100_u32 {
                let duration_ms = i.wrapping_mul(route_index).wrapping_mul(cycle) % 300;

                for aggregator in aggregators {
                    aggregator.aggregate(duration_ms, route);
                }
            }
        }

        println!("=== Cycle {cycle} ===");
        println!("{}", delta.collect());
        println!("{}", cumulative.collect());
    }
}
