//! Unit tests for the aggregation engine
//!
//! Shared fixtures live here: small literal inputs, a deterministic
//! measurement generator and a naive reference aggregation to compare against.

pub mod pipeline_tests;

use crate::engine::accumulator::Accumulator;
use crate::models::StationSummary;
use std::collections::BTreeMap;

/// Station names used by the generator, including multi-byte UTF-8 names
pub const STATIONS: &[&str] = &[
    "Abha",
    "Accra",
    "Addis Ababa",
    "Adelaide",
    "Alexandria",
    "Anchorage",
    "Arkhangelsk",
    "Baghdad",
    "Bangkok",
    "Berlin",
    "Bergen",
    "Chișinău",
    "Dodoma",
    "Hamburg",
    "İzmir",
    "Kraków",
    "Lima",
    "Oslo",
    "Petropavlovsk-Kamchatsky",
    "São Paulo",
    "St. John's",
    "Wellington",
    "Yellowknife",
    "Zürich",
];

/// Join lines into an input with a trailing newline
pub fn measurements(lines: &[&str]) -> Vec<u8> {
    let mut input = lines.join("\n");
    input.push('\n');
    input.into_bytes()
}

/// Render tenths the way the data source writes them
pub fn render(value: i16) -> String {
    let sign = if value < 0 { "-" } else { "" };
    let magnitude = value.unsigned_abs();
    format!("{}{}.{}", sign, magnitude / 10, magnitude % 10)
}

/// Small deterministic pseudo-random generator for fixtures
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.0 >> 33
    }
}

/// Generate `records` measurements with values in -99.9..=99.9
pub fn generate_input(records: usize, seed: u64) -> Vec<u8> {
    let mut rng = Lcg::new(seed);
    let mut input = String::new();
    for _ in 0..records {
        let station = STATIONS[rng.next() as usize % STATIONS.len()];
        let value = (rng.next() % 1999) as i16 - 999;
        input.push_str(station);
        input.push(';');
        input.push_str(&render(value));
        input.push('\n');
    }
    input.into_bytes()
}

/// Aggregate with a plain ordered map, parsing values with `str::parse`
pub fn reference_summary(input: &[u8]) -> Vec<StationSummary> {
    let mut stations: BTreeMap<Vec<u8>, Accumulator> = BTreeMap::new();
    for line in input.split(|&b| b == b'\n') {
        let Some(split) = line.iter().position(|&b| b == b';') else {
            continue;
        };
        let value: f64 = std::str::from_utf8(&line[split + 1..])
            .unwrap()
            .parse()
            .unwrap();
        let value = (value * 10.0).round() as i16;
        stations
            .entry(line[..split].to_vec())
            .and_modify(|stats| stats.record(value))
            .or_insert_with(|| Accumulator::new(value));
    }
    stations
        .iter()
        .map(|(key, stats)| StationSummary::new(key, *stats))
        .collect()
}
