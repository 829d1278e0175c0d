use clap::Parser;

use crate::config::constants::{ANALYSIS_YEARS, DEFAULT_TOP_K};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[arg(short, long, default_value = "data", help = "Directory holding per-year grid and demand files")]
    data_dir: String,

    #[arg(short, long, default_value = "output")]
    output_dir: String,

    #[arg(short, long, value_delimiter = ',', default_values_t = ANALYSIS_YEARS)]
    years: Vec<u32>,

    #[arg(short = 'k', long, default_value_t = DEFAULT_TOP_K, help = "Candidate sites kept per ranking")]
    top_k: usize,

    #[arg(long, default_value_t = false, help = "Disable the rayon pool and rank cities one at a time")]
    sequential: bool,

    #[arg(long, default_value_t = false)]
    enable_timing: bool,

    #[arg(short, long, default_value_t = false)]
    verbose_logging: bool,
}

// Add getter methods for all fields
impl Args {
    pub fn data_dir(&self) -> &str {
        &self.data_dir
    }

    pub fn output_dir(&self) -> &str {
        &self.output_dir
    }

    pub fn years(&self) -> &[u32] {
        &self.years
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn sequential(&self) -> bool {
        self.sequential
    }

    pub fn enable_timing(&self) -> bool {
        self.enable_timing
    }

    pub fn verbose_logging(&self) -> bool {
        self.verbose_logging
    }
}
