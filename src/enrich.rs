//! Two-pass enrichment driver.
//!
//! Pass 1: every record, bare `business_name`.
//! Pass 2: only records still without a latitude, `"<name>, <hint>"`.
//!
//! Collaborator failures never abort the run; they leave the record
//! unresolved. Only loading the input or writing the output is fatal.

use crate::geocoding::{GeocodeError, Geocoded, Geocoder};
use crate::hints::HintTable;
use crate::records::{self, BusinessRecord};
use anyhow::Context;
use std::io::{self, Write};
use std::path::Path;
use std::thread;
use std::time::Duration;

/// Pause after each geocoding call, to stay polite with public services.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(200);

/// Which sweep a query belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    BareName,
    Hinted,
}

impl Pass {
    fn number(self) -> u8 {
        match self {
            Self::BareName => 1,
            Self::Hinted => 2,
        }
    }
}

/// What happened during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichReport {
    pub total: usize,
    pub first_pass_resolved: usize,
    pub second_pass_attempted: usize,
    pub second_pass_resolved: usize,
    /// Calls that failed for reasons other than "no match".
    pub faults: usize,
}

impl EnrichReport {
    pub fn resolved(&self) -> usize {
        self.first_pass_resolved + self.second_pass_resolved
    }

    pub fn unresolved(&self) -> usize {
        self.total.saturating_sub(self.resolved())
    }
}

/// The enrichment driver: an injected geocoder plus the hint table.
pub struct Enricher<G> {
    geocoder: G,
    hints: HintTable,
    delay: Duration,
}

impl<G: Geocoder> Enricher<G> {
    pub fn new(geocoder: G, hints: HintTable) -> Self {
        Self {
            geocoder,
            hints,
            delay: DEFAULT_DELAY,
        }
    }

    /// Set the pause after each call. Zero disables it.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Run both passes over `records` in place, writing progress lines to
    /// `progress`. Only a failing `progress` writer makes this return `Err`.
    pub fn run<W: Write>(
        &self,
        records: &mut [BusinessRecord],
        progress: &mut W,
    ) -> io::Result<EnrichReport> {
        let mut report = EnrichReport {
            total: records.len(),
            ..EnrichReport::default()
        };

        // ── Pass 1: bare names ──────────────────────────────────
        for (idx, record) in records.iter_mut().enumerate() {
            let query = record.name().to_string();
            writeln!(progress, "{}", progress_line(Pass::BareName, idx + 1, report.total, &query))?;
            progress.flush()?;

            let result = self.lookup(&query, &mut report);
            if result.is_some() {
                report.first_pass_resolved += 1;
            }
            record.apply(result.as_ref());
        }

        // ── Partition ───────────────────────────────────────────
        let missing: Vec<usize> = records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_missing_coordinates())
            .map(|(i, _)| i)
            .collect();

        if missing.is_empty() {
            return Ok(report);
        }

        report.second_pass_attempted = missing.len();
        writeln!(progress)?;
        writeln!(progress, "\u{26A0}\u{FE0F} {} still missing, retrying with hints\u{2026}", missing.len())?;
        writeln!(progress)?;

        // ── Pass 2: name + hint ─────────────────────────────────
        for (idx, &i) in missing.iter().enumerate() {
            let record = &mut records[i];
            let query = self.hints.query_for(record.name());
            writeln!(progress, "{}", progress_line(Pass::Hinted, idx + 1, missing.len(), &query))?;
            progress.flush()?;

            // A failed retry keeps the pass-1 values.
            if let Some(found) = self.lookup(&query, &mut report) {
                report.second_pass_resolved += 1;
                record.apply(Some(&found));
            }
        }

        Ok(report)
    }

    /// One collaborator call, normalized to "result or nothing", then the pause.
    fn lookup(&self, query: &str, report: &mut EnrichReport) -> Option<Geocoded> {
        let result = match self.geocoder.geocode(query).and_then(|found| checked(query, found)) {
            Ok(found) => Some(found),
            Err(e) => {
                note_failure(query, &e);
                if !e.is_miss() {
                    report.faults += 1;
                }
                None
            }
        };
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        result
    }
}

/// Coordinates that cannot be stored as JSON numbers count as a bad answer.
fn checked(query: &str, found: Geocoded) -> Result<Geocoded, GeocodeError> {
    if found.latitude.is_finite() && found.longitude.is_finite() {
        Ok(found)
    } else {
        Err(GeocodeError::InvalidResponse(format!(
            "non-finite coordinates for '{}': {}, {}",
            query, found.latitude, found.longitude
        )))
    }
}

fn note_failure(query: &str, err: &GeocodeError) {
    if err.is_miss() {
        log::debug!("{}", err);
    } else if err.is_transient() {
        log::warn!("geocoding \"{}\" failed (transient): {}", query, err);
    } else {
        log::warn!("geocoding \"{}\" failed: {}", query, err);
    }
}

/// `[pass N i/total] Geocoding “query”…`
pub fn progress_line(pass: Pass, idx: usize, total: usize, query: &str) -> String {
    format!(
        "[pass {} {}/{}] Geocoding \u{201C}{}\u{201D}\u{2026}",
        pass.number(),
        idx,
        total,
        query
    )
}

/// Load `input`, run both passes, write everything to `output`.
///
/// Nothing is written unless both passes complete.
pub fn enrich_file<G: Geocoder, W: Write>(
    enricher: &Enricher<G>,
    input: &Path,
    output: &Path,
    progress: &mut W,
) -> anyhow::Result<EnrichReport> {
    let mut records = records::load_records(input)?;
    log::info!("loaded {} records from {}", records.len(), input.display());

    let report = enricher
        .run(&mut records, progress)
        .context("cannot write progress")?;

    records::write_records(output, &records)?;
    log::info!(
        "wrote {} records to {} ({} resolved, {} unresolved, {} faults)",
        report.total,
        output.display(),
        report.resolved(),
        report.unresolved(),
        report.faults
    );
    Ok(report)
}
