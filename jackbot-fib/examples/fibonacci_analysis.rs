use jackbot_fib::{
    FibonacciAnalyser, bar::Bar, config::AnalysisConfig, logging::init_logging,
    time_cycle::TimeAnalysis,
};
use serde::de::DeserializeOwned;
use std::{fs::File, io::BufReader};
use tracing::info;

const CONFIG_PATH: &str = "jackbot-fib/examples/config/analysis_config.json";
const FILE_PATH_BARS: &str = "jackbot-fib/examples/data/btcusdt_1h_bars.json";

fn main() {
    // Initialise Tracing
    init_logging().expect("failed to initialise logging");

    // Load AnalysisConfig & historic bars
    let config: AnalysisConfig = load_json(CONFIG_PATH);
    let bars: Vec<Bar> = load_json(FILE_PATH_BARS);
    info!(bars = bars.len(), "loaded historic bars");

    // Reference time is the close of the final bar, so the output is reproducible
    let now = bars.last().map(|bar| bar.timestamp);

    let analyser = FibonacciAnalyser::new(config).expect("invalid AnalysisConfig");
    let result = match analyser.analyse(&bars, now) {
        Ok(result) => result,
        Err(error) => {
            eprintln!("analysis failed: {error}");
            return;
        }
    };

    println!(
        "Major swing: high {} @ {}, low {} @ {}",
        result.major_swing.high,
        result.major_swing.high_time,
        result.major_swing.low,
        result.major_swing.low_time
    );
    println!(
        "Current price {} sits at {:.2}% of the swing range ({})",
        result.current_price, result.price_analysis.swing_range_pct, result.price_analysis.trend_bias
    );

    println!("Retracements:");
    for level in &result.fibonacci_levels.retracement {
        println!("  {:>6} => {:.2}", level.ratio, level.price);
    }

    println!("Key levels by proximity:");
    for level in &result.key_levels {
        println!(
            "  {:.2} ({}, {}) {:.2}% away",
            level.price, level.category, level.strength, level.distance_pct
        );
    }

    match result.time_analysis {
        TimeAnalysis::Estimate(estimate) => println!(
            "Average cycle {:.1}h, next turning point {} ({:.1}h away)",
            estimate.average_cycle_hours, estimate.next_turning_point, estimate.time_until_next_hours
        ),
        TimeAnalysis::InsufficientData { swing_points } => {
            println!("Too few swing points ({swing_points}) to estimate a time cycle")
        }
    }

    println!("Confidence: {:.1}", result.confidence);

    println!(
        "{}",
        serde_json::to_string_pretty(&result).expect("failed to serialise AnalysisResult")
    );
}

fn load_json<T>(path: &str) -> T
where
    T: DeserializeOwned,
{
    let file = File::open(path).expect("failed to open file");
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).expect("failed to parse file")
}
