use anyhow::Result;
use clap::{Parser, Subcommand};
use schoolsearch_core::loader::load_schools;
use schoolsearch_core::stats::SchoolCounts;
use schoolsearch_core::{DocId, SchoolIndex, SearchConfig};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "schoolsearch")]
#[command(about = "Search and summarize school records", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index and run one or more queries against it
    Search {
        /// School data CSV
        #[arg(long, default_value = "school_data.csv")]
        data: PathBuf,
        /// JSON search configuration; defaults are used for missing fields
        #[arg(long)]
        config: Option<PathBuf>,
        /// Number of results per query, overrides the configuration
        #[arg(long)]
        top_n: Option<usize>,
        /// Queries to run
        #[arg(required = true)]
        queries: Vec<String>,
    },
    /// Print school counts by state, locale and city
    Counts {
        /// School data CSV
        #[arg(long, default_value = "school_data.csv")]
        data: PathBuf,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(io::stderr).init();
    let cli = Cli::parse();
    let mut out = io::stdout().lock();

    match cli.command {
        Commands::Search { data, config, top_n, queries } => {
            let mut config = match config {
                Some(path) => SearchConfig::from_json_file(path)?,
                None => SearchConfig::default(),
            };
            if let Some(n) = top_n {
                config.top_n = n;
            }
            let index = SchoolIndex::build(load_schools(&data)?, config)?;
            for query in &queries {
                run_query(&index, query, &mut out)?;
            }
        }
        Commands::Counts { data } => {
            let records = load_schools(&data)?;
            writeln!(out, "{}", SchoolCounts::from_records(&records))?;
        }
    }
    Ok(())
}

fn run_query<W: Write>(index: &SchoolIndex, query: &str, out: &mut W) -> Result<()> {
    let start = Instant::now();
    let results = index.search(query);
    let elapsed = start.elapsed();
    write_results(index, query, elapsed.as_secs_f64(), &results, out)
}

fn write_results<W: Write>(index: &SchoolIndex, query: &str, took_s: f64, results: &[DocId], out: &mut W) -> Result<()> {
    writeln!(out, "Results for \"{query}\" (search took: {took_s:.4}s)")?;
    for (rank, doc_id) in results.iter().enumerate() {
        if let Some(school) = index.school(*doc_id) {
            writeln!(out, "{}. {}", rank + 1, school.name)?;
            writeln!(out, "{}, {}", school.city, school.state)?;
        }
    }
    Ok(())
}
