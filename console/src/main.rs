use clap::Parser;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use visioncore::telemetry::{TelemetryValue, CARGO_TABLE, TARGETS_TABLE};

type TablesView = BTreeMap<String, BTreeMap<String, TelemetryValue>>;

#[derive(Parser)]
#[command(author, version, about = "Terminal console for the vision telemetry bridge")]
struct Args {
    /// Bridge base URL
    #[arg(long, default_value = "http://127.0.0.1:9000")]
    url: String,
    /// Poll period in seconds
    #[arg(long, default_value_t = 1)]
    period: u64,
    /// Render one snapshot and exit
    #[arg(long, default_value_t = false)]
    once: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct StatusView {
    #[serde(default)]
    running: bool,
    #[serde(default)]
    source: usize,
    #[serde(default)]
    camera: usize,
    #[serde(default)]
    frames: usize,
    #[serde(default)]
    candidates: usize,
    #[serde(default)]
    last_seq: Option<u64>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    if !args.once {
        println!("Vision console polling {} (Ctrl+C to stop)", args.url);
    }
    let mut ticker = tokio::time::interval(Duration::from_secs(args.period.max(1)));
    loop {
        ticker.tick().await;
        match fetch_status(&args.url).await {
            Ok(status) => print_status(&status),
            Err(err) => println!("status error: {err}"),
        }
        match fetch_tables(&args.url).await {
            Ok(tables) => print_tables(&tables),
            Err(err) => println!("tables error: {err}"),
        }
        if args.once {
            break;
        }
    }
}

async fn fetch_tables(base: &str) -> Result<TablesView, String> {
    let response = reqwest::get(format!("{}/tables", base))
        .await
        .map_err(|e| e.to_string())?;
    response.json::<TablesView>().await.map_err(|e| e.to_string())
}

async fn fetch_status(base: &str) -> Result<StatusView, String> {
    let response = reqwest::get(format!("{}/status", base))
        .await
        .map_err(|e| e.to_string())?;
    let body = response.text().await.map_err(|e| e.to_string())?;
    serde_json::from_str(&body).map_err(|err| format!("{}: {}", err, body))
}

fn print_status(status: &StatusView) {
    let last = status
        .last_seq
        .map(|seq| seq.to_string())
        .unwrap_or_else(|| "n/a".into());
    println!(
        "status: running={} camera={} (source {}) frames={} candidates={} last_seq={}",
        status.running, status.camera, status.source, status.frames, status.candidates, last
    );
}

fn print_tables(tables: &TablesView) {
    match tables.get(TARGETS_TABLE) {
        Some(targets) => println!(
            "  targets: left {} | right {}",
            format_side(targets.get("contour_left")),
            format_side(targets.get("contour_right"))
        ),
        None => println!("  targets: no data yet"),
    }
    match tables.get(CARGO_TABLE) {
        Some(cargo) => println!("  cargo: {}", format_cargo(cargo.get("r"))),
        None => println!("  cargo: no data yet"),
    }
}

fn format_side(value: Option<&TelemetryValue>) -> String {
    match value {
        Some(TelemetryValue::NumberArray(values)) if values.len() == 6 => {
            if values.iter().all(|v| *v == 0.0) {
                "no match".to_string()
            } else {
                format!(
                    "({:.1}, {:.1}) {:.1}x{:.1} at {:.1} deg, {:.1} in",
                    values[0], values[1], values[2], values[3], values[4], values[5]
                )
            }
        }
        _ => "n/a".to_string(),
    }
}

fn format_cargo(value: Option<&TelemetryValue>) -> String {
    match value {
        Some(TelemetryValue::NumberArray(radii)) => {
            if radii.is_empty() {
                "none".to_string()
            } else {
                let formatted: Vec<String> = radii.iter().map(|r| format!("{:.1}", r)).collect();
                format!("{} piece(s), radii [{}]", radii.len(), formatted.join(", "))
            }
        }
        _ => "n/a".to_string(),
    }
}
