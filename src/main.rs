use anyhow::Context;
use business_geocoder::enrich::{self, Enricher};
use business_geocoder::geocoding::{self, NominatimGeocoder};
use business_geocoder::hints::HintTable;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

/// Geocode a list of businesses with OpenStreetMap Nominatim.
///
/// Every record is looked up by its bare `business_name`; records still
/// without coordinates are retried once as "<name>, <hint>".
///
/// Examples:
///   geocode-businesses
///   geocode-businesses --input data/shops.json --output data/shops_geo.json
///   geocode-businesses --hints hints.json --delay-ms 1000
#[derive(Parser)]
#[command(name = "geocode-businesses", version, about, long_about = None)]
struct Cli {
    /// JSON array of business records to enrich.
    #[arg(long, short = 'i', default_value = "data/black_owned_enriched.json")]
    input: PathBuf,

    /// Where to write the enriched records.
    #[arg(long, short = 'o', default_value = "data/black_owned_geocoded.json")]
    output: PathBuf,

    /// JSON object of business name -> location hint, with a "_default" entry.
    /// The built-in table is used when omitted.
    #[arg(long)]
    hints: Option<PathBuf>,

    /// Replace the fallback hint (e.g. "Georgia, USA").
    #[arg(long)]
    default_hint: Option<String>,

    /// Pause after each geocoding request, in milliseconds.
    #[arg(long, default_value_t = enrich::DEFAULT_DELAY.as_millis() as u64)]
    delay_ms: u64,

    /// Nominatim base URL.
    #[arg(long, default_value = geocoding::DEFAULT_ENDPOINT)]
    endpoint: String,

    /// User-Agent sent to Nominatim (required by its usage policy).
    #[arg(long, default_value = geocoding::DEFAULT_USER_AGENT)]
    user_agent: String,

    /// Per-request timeout, in seconds.
    #[arg(long, default_value_t = geocoding::DEFAULT_TIMEOUT.as_secs())]
    timeout_secs: u64,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    // ── Configuration ───────────────────────────────────────────

    let mut hints = match &cli.hints {
        Some(path) => HintTable::load(path)?,
        None => HintTable::builtin(),
    };
    if let Some(default) = &cli.default_hint {
        hints.set_default(default.clone());
    }
    log::debug!("{} hint overrides, default \"{}\"", hints.len(), hints.default_hint());

    let geocoder = NominatimGeocoder::with_options(
        &cli.endpoint,
        &cli.user_agent,
        Duration::from_secs(cli.timeout_secs),
    );
    log::debug!("geocoding via {}", geocoder.search_url());

    let enricher = Enricher::new(geocoder, hints).with_delay(Duration::from_millis(cli.delay_ms));

    // ── Enrich ──────────────────────────────────────────────────

    let report = {
        let mut progress = std::io::stdout().lock();
        enrich::enrich_file(&enricher, &cli.input, &cli.output, &mut progress)
            .with_context(|| format!("enriching {}", cli.input.display()))?
    };

    println!();
    println!(
        "\u{2705} Done! Wrote enriched data to {} ({} of {} geocoded, {} unresolved)",
        cli.output.display(),
        report.resolved(),
        report.total,
        report.unresolved()
    );
    Ok(())
}
