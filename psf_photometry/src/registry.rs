//! Caller-owned table of flux measurement algorithms.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use glam::DVec2;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::flux::{FILTERED_FLUX, FluxMeasurement, measure_filtered_flux};
use crate::image::{Exposure, Pixel};

/// Signature shared by every registered measurement.
pub type MeasureFn<T> = fn(&Exposure<T>, DVec2, &Config) -> Result<FluxMeasurement>;

/// Algorithms by name.
#[derive(Debug, Clone)]
pub struct AlgorithmRegistry<T: Pixel> {
    algorithms: HashMap<String, MeasureFn<T>>,
}

impl<T: Pixel> Default for AlgorithmRegistry<T> {
    fn default() -> Self {
        Self {
            algorithms: HashMap::new(),
        }
    }
}

impl<T: Pixel> AlgorithmRegistry<T> {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every algorithm this crate provides.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(FILTERED_FLUX, measure_filtered_flux::<T>);
        registry
    }

    /// Add `algorithm` under `name`.
    ///
    /// Panics if `name` is already taken.
    pub fn register(&mut self, name: &str, algorithm: MeasureFn<T>) {
        match self.algorithms.entry(name.to_string()) {
            Entry::Occupied(_) => {
                panic!("Algorithm '{}' already registered", name);
            }
            Entry::Vacant(entry) => {
                entry.insert(algorithm);
            }
        }
    }

    pub fn get(&self, name: &str) -> Result<MeasureFn<T>> {
        self.algorithms
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownAlgorithm {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.algorithms.contains_key(name)
    }

    /// Registered names in lexicographic order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.algorithms.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.algorithms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.algorithms.is_empty()
    }
}
