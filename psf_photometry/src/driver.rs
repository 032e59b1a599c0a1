//! Measure many sources on one exposure.

use std::collections::HashMap;

use glam::DVec2;
use rayon::prelude::*;

use crate::config::Config;
use crate::error::ErrorKind;
use crate::flux::FluxRecord;
use crate::image::{Exposure, Pixel};
use crate::registry::MeasureFn;

/// A source to measure: caller id and centroid in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Source {
    pub id: u64,
    pub center: DVec2,
}

impl Source {
    pub fn new(id: u64, center: DVec2) -> Self {
        Self { id, center }
    }
}

/// Failed measurements by error kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FailureCounts {
    pub configuration: usize,
    pub computation: usize,
    pub bounds: usize,
    pub lookup: usize,
}

impl FailureCounts {
    pub fn add(&mut self, kind: ErrorKind, count: usize) {
        match kind {
            ErrorKind::Configuration => self.configuration += count,
            ErrorKind::Computation => self.computation += count,
            ErrorKind::Bounds => self.bounds += count,
            ErrorKind::Lookup => self.lookup += count,
        }
    }

    pub fn total(&self) -> usize {
        self.configuration + self.computation + self.bounds + self.lookup
    }
}

/// Per-source records in input order plus failure tallies.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub records: Vec<(u64, FluxRecord)>,
    pub failures: FailureCounts,
}

impl Catalog {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record of source `id`. Scans the records; use [`Catalog::by_id`] for
    /// many lookups.
    pub fn record(&self, id: u64) -> Option<&FluxRecord> {
        self.records
            .iter()
            .find(|(record_id, _)| *record_id == id)
            .map(|(_, record)| record)
    }

    /// Records indexed by source id. A repeated id keeps its last record.
    pub fn by_id(&self) -> HashMap<u64, &FluxRecord> {
        self.records
            .iter()
            .map(|(id, record)| (*id, record))
            .collect()
    }

    pub fn succeeded(&self) -> usize {
        self.records.len() - self.failures.total()
    }
}

/// Run `algorithm` on every source in parallel.
///
/// Each source gets its own record; a failing source is logged and counted
/// without affecting the others. An invalid configuration fails every record
/// without reading the image.
pub fn measure_sources<T: Pixel>(
    exposure: &Exposure<T>,
    sources: &[Source],
    algorithm: MeasureFn<T>,
    config: &Config,
) -> Catalog {
    if let Err(e) = config.validate() {
        tracing::warn!(
            sources = sources.len(),
            error = %e,
            "Invalid configuration, every source fails"
        );
        let mut failures = FailureCounts::default();
        failures.add(e.kind(), sources.len());
        return Catalog {
            records: sources
                .iter()
                .map(|s| (s.id, FluxRecord::default()))
                .collect(),
            failures,
        };
    }

    let results: Vec<(u64, FluxRecord, Option<ErrorKind>)> = sources
        .par_iter()
        .map(|source| {
            let mut record = FluxRecord::default();
            match algorithm(exposure, source.center, config) {
                Ok(measurement) => {
                    record.set(&measurement);
                    (source.id, record, None)
                }
                Err(e) => {
                    tracing::warn!(
                        id = source.id,
                        x = source.center.x,
                        y = source.center.y,
                        error = %e,
                        "Flux measurement failed"
                    );
                    (source.id, record, Some(e.kind()))
                }
            }
        })
        .collect();

    let mut failures = FailureCounts::default();
    let records = results
        .into_iter()
        .map(|(id, record, failure)| {
            if let Some(kind) = failure {
                failures.add(kind, 1);
            }
            (id, record)
        })
        .collect();

    let catalog = Catalog { records, failures };
    tracing::info!(
        sources = catalog.len(),
        succeeded = catalog.succeeded(),
        bounds_failures = failures.bounds,
        computation_failures = failures.computation,
        "Measured sources"
    );
    catalog
}
