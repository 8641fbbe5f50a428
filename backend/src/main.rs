//! Channelstats CLI - summarize channel analytics exports
//!
//! # Main Commands
//!
//! ```bash
//! channelstats analyze export.csv          # Full JSON report
//! channelstats summary export.csv          # Category table for the year
//! channelstats rank export.csv -c video -m ctr
//! channelstats brief export.csv            # Strategy digest
//! channelstats serve                       # Start HTTP server (port 3000)
//! ```
//!
//! # Debug Commands
//!
//! ```bash
//! channelstats parse export.csv            # Raw table as JSON
//! channelstats columns export.csv          # Column resolution
//! ```

use clap::{Args, Parser, Subcommand};
use channelstats::analysis::brief::format_count;
use channelstats::{
    analyze_bytes, parse_report_file, resolve_columns, AnalysisConfig, Category, Metric,
    RankingOutcome, RankingRequest, SemanticField,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "channelstats")]
#[command(about = "Categorized performance summaries from channel analytics exports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ConfigArgs {
    /// Reporting year for the summary (default: current year)
    #[arg(short, long)]
    year: Option<i32>,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,
}

impl ConfigArgs {
    fn load(&self) -> Result<AnalysisConfig, Box<dyn std::error::Error>> {
        let mut config = AnalysisConfig::load(self.config.as_deref())?;
        if let Some(year) = self.year {
            config.reporting_year = year;
        }
        Ok(config)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Full analysis as JSON
    Analyze {
        /// Input export file
        input: PathBuf,

        #[command(flatten)]
        config: ConfigArgs,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the category summary table
    Summary {
        input: PathBuf,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Print top/bottom rankings for one category and metric
    Rank {
        input: PathBuf,

        /// video, short or live
        #[arg(short, long, default_value = "video")]
        category: String,

        /// views, subscribers, watch-time, impressions, ctr, duration
        #[arg(short, long, default_value = "views")]
        metric: String,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Print the strategy brief
    Brief {
        input: PathBuf,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Parse an export and output the raw table as JSON
    Parse {
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show how export columns map to logical fields
    Columns { input: PathBuf },

    /// Start HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        #[command(flatten)]
        config: ConfigArgs,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Analyze { input, config, output } => cmd_analyze(&input, &config, output.as_deref()),
        Commands::Summary { input, config } => cmd_summary(&input, &config),
        Commands::Rank { input, category, metric, config } => cmd_rank(&input, &category, &metric, &config),
        Commands::Brief { input, config } => cmd_brief(&input, &config),
        Commands::Parse { input, output } => cmd_parse(&input, output.as_deref()),
        Commands::Columns { input } => cmd_columns(&input),
        Commands::Serve { port, config } => cmd_serve(port, &config).await,
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn run(input: &Path, config: &AnalysisConfig) -> Result<channelstats::AnalysisReport, Box<dyn std::error::Error>> {
    let bytes = fs::read(input)?;
    eprintln!("📄 Processing: {}", input.display());
    Ok(analyze_bytes(&bytes, config)?)
}

fn cmd_analyze(input: &Path, args: &ConfigArgs, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let report = run(input, &args.load()?)?;
    let json = serde_json::to_string_pretty(&report)?;
    write_output(&json, output)
}

fn cmd_summary(input: &Path, args: &ConfigArgs) -> Result<(), Box<dyn std::error::Error>> {
    let report = run(input, &args.load()?)?;
    let s = &report.summary;

    println!();
    println!("Total Published ({}): {}", s.reporting_year, s.total_published);
    println!("Total Subs Gained:     {}", format_count(s.total_subscribers));
    println!("Other Subscribers:     {}", format_count(s.other_subscribers));
    println!();

    println!("{:<18}{:>16}{:>16}{:>16}", "Metric", "Videos", "Shorts", "Live Streams");
    let row = |label: &str, f: &dyn Fn(Category) -> String| {
        println!(
            "{:<18}{:>16}{:>16}{:>16}",
            label,
            f(Category::Video),
            f(Category::Short),
            f(Category::LiveStream)
        );
    };
    row("Published Count", &|c| s.metrics(c).published_count.to_string());
    row("Subscribers", &|c| format_count(s.metrics(c).subscribers_gained));
    row("Views", &|c| format_count(s.metrics(c).views));
    row("Watch Time (Hrs)", &|c| format!("{:.1}", s.metrics(c).watch_time_hours));
    row("Impressions", &|c| format_count(s.metrics(c).impressions));
    row("CTR", &|c| format!("{:.2}%", s.metrics(c).weighted_ctr));

    if s.undated_records > 0 {
        println!();
        println!("({} rows without a publish date are not in this table)", s.undated_records);
    }
    Ok(())
}

fn cmd_rank(
    input: &Path,
    category: &str,
    metric: &str,
    args: &ConfigArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let category = Category::from_name(category).ok_or_else(|| format!("Unknown category: {}", category))?;
    let metric = Metric::from_name(metric).ok_or_else(|| format!("Unknown metric: {}", metric))?;

    let config = args.load()?;
    let report = run(input, &config)?;
    let request = RankingRequest::new(category, metric, &config);

    match channelstats::rank_records(&report.records, &request, config.ranking_size) {
        RankingOutcome::Ranked(ranking) => {
            let fmt = |v: f64| {
                if metric.is_percentage() {
                    format!("{:.2}%", v)
                } else {
                    format_count(v)
                }
            };
            println!("\nTop {}: {} by {}", config.ranking_size, category.label(), metric.label());
            for (i, e) in ranking.top.iter().enumerate() {
                println!("  {:>2}. {:<60} {:>12}", i + 1, e.title, fmt(e.value));
            }
            println!("\nBottom {}: {} by {}", config.ranking_size, category.label(), metric.label());
            for (i, e) in ranking.bottom.iter().enumerate() {
                println!("  {:>2}. {:<60} {:>12}", i + 1, e.title, fmt(e.value));
            }
        }
        RankingOutcome::NoQualifyingRecords { min_views, .. } => {
            println!(
                "\nNo {} qualify for a {} ranking (minimum {} views).",
                category.label(),
                metric.label(),
                format_count(min_views)
            );
        }
    }
    Ok(())
}

fn cmd_brief(input: &Path, args: &ConfigArgs) -> Result<(), Box<dyn std::error::Error>> {
    let report = run(input, &args.load()?)?;
    println!("{}", report.brief.render());
    Ok(())
}

fn cmd_parse(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Parsing export: {}", input.display());

    let parsed = parse_report_file(input, &channelstats::DEFAULT_HEADER_MARKERS)?;
    eprintln!("   Encoding: {}", parsed.encoding);
    eprintln!("   Delimiter: '{}'", format_delimiter(parsed.delimiter));
    eprintln!("   Header line: {}", parsed.header_row + 1);
    eprintln!("   Columns: {}", parsed.table.headers.join(", "));
    eprintln!("   Total row: {}", if parsed.total.is_some() { "yes" } else { "no" });
    eprintln!("✅ Parsed {} rows", parsed.table.len());

    let json = serde_json::to_string_pretty(&parsed.table.to_json_rows())?;
    write_output(&json, output)
}

fn cmd_columns(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let parsed = parse_report_file(input, &channelstats::DEFAULT_HEADER_MARKERS)?;
    let columns = resolve_columns(&parsed.table.headers);

    for field in SemanticField::ALL {
        let resolved = columns
            .get(field)
            .map(|c| format!("[{:2}] {}", c.index + 1, c.name))
            .unwrap_or_else(|| "-".to_string());
        let flag = if field.is_mandatory() { "*" } else { " " };
        println!("{}{:<16} {}", flag, field.label(), resolved);
    }

    columns.require_mandatory()?;
    Ok(())
}

async fn cmd_serve(port: u16, args: &ConfigArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.load()?;
    channelstats::server::start_server(port, config).await?;
    Ok(())
}

fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
