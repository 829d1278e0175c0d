use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use lazy_static::lazy_static;
use parking_lot::RwLock;
use tracing::Level;
use tracing_subscriber::{prelude::*, EnvFilter};

// Categories for the operation timing report
#[derive(Hash, Eq, PartialEq, Clone, Debug)]
pub enum OperationCategory {
    GridBuild,
    Ranking,
    FileIO { subcategory: FileIOType },
    Other,
}

#[derive(Hash, Eq, PartialEq, Clone, Debug)]
pub enum FileIOType {
    DataLoad,
    ResultsSave,
    Other,
}

impl OperationCategory {
    pub fn as_str(&self) -> String {
        match self {
            OperationCategory::GridBuild => "Grid Build".to_string(),
            OperationCategory::Ranking => "Ranking".to_string(),
            OperationCategory::FileIO { subcategory } => {
                format!(
                    "File I/O - {}",
                    match subcategory {
                        FileIOType::DataLoad => "Data Load",
                        FileIOType::ResultsSave => "Results Save",
                        FileIOType::Other => "Other",
                    }
                )
            }
            OperationCategory::Other => "Other Operations".to_string(),
        }
    }
}

lazy_static! {
    static ref TIMING_ENABLED: AtomicBool = AtomicBool::new(false);
    static ref OPERATION_TIMINGS: RwLock<HashMap<String, (Duration, usize)>> =
        RwLock::new(HashMap::new());
}

pub struct TimingGuard {
    key: String,
    start: Instant,
}

impl Drop for TimingGuard {
    fn drop(&mut self) {
        if !is_timing_enabled() {
            return;
        }
        let elapsed = self.start.elapsed();
        let mut timings = OPERATION_TIMINGS.write();
        let entry = timings
            .entry(std::mem::take(&mut self.key))
            .or_insert((Duration::ZERO, 0));
        entry.0 += elapsed;
        entry.1 += 1;
    }
}

pub fn start_timing(operation: &str, category: OperationCategory) -> TimingGuard {
    TimingGuard {
        key: format!("{} [{}]", operation, category.as_str()),
        start: Instant::now(),
    }
}

pub fn init_logging(enable_timing: bool) {
    TIMING_ENABLED.store(enable_timing, Ordering::SeqCst);

    let env_filter = EnvFilter::from_default_env()
        .add_directive(Level::INFO.into())
        .add_directive("windsite=debug".parse().expect("static directive parses"));

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().pretty());

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set up tracing subscriber");
}

pub fn is_timing_enabled() -> bool {
    TIMING_ENABLED.load(Ordering::SeqCst)
}

pub fn print_timing_report() {
    if !is_timing_enabled() {
        return;
    }

    println!("\nOperation Timing Report");
    println!("=======================");

    let timings = OPERATION_TIMINGS.read();
    let mut entries: Vec<_> = timings.iter().collect();
    entries.sort_by(|a, b| b.1 .0.cmp(&a.1 .0));

    for (key, (total, count)) in entries {
        let avg = total.div_f64(*count as f64);
        println!(
            "{}: total={:.2}s, count={}, avg={:.2}ms",
            key,
            total.as_secs_f64(),
            count,
            avg.as_secs_f64() * 1000.0
        );
    }
    println!("=======================\n");
}
