//! End-to-end tests for the parallel aggregation pipeline

use super::{STATIONS, generate_input, measurements, reference_summary};
use crate::config::AggregatorConfig;
use crate::engine::formatter::format_summary;
use crate::engine::pipeline::Aggregator;
use crate::error::AggregatorError;
use std::io::Cursor;

fn aggregator(workers: usize, chunk_size: usize) -> Aggregator {
    let config = AggregatorConfig::default()
        .with_workers(workers)
        .with_chunk_size(chunk_size);
    Aggregator::new(config).unwrap()
}

#[test]
fn test_reference_example() {
    let input = measurements(&["Hamburg;12.0", "Hamburg;8.5", "Berlin;-3.2"]);
    let result = aggregator(2, 0).aggregate(&input).unwrap();

    assert_eq!(
        format_summary(&result.stations),
        "{Berlin=-3.2/-3.2/-3.2, Hamburg=8.5/10.3/12.0}\n"
    );
    assert_eq!(result.stats.records, 3);
    assert_eq!(result.stats.stations, 2);
    assert_eq!(result.stats.input_bytes, input.len() as u64);
}

#[test]
fn test_matches_reference_aggregation() {
    let input = generate_input(20_000, 42);
    let expected = reference_summary(&input);

    let result = aggregator(4, 4096).aggregate(&input).unwrap();

    assert_eq!(result.stations, expected);
    assert_eq!(result.stations.len(), STATIONS.len());
}

#[test]
fn test_deterministic_across_worker_counts_and_chunk_sizes() {
    let input = generate_input(10_000, 7);
    let expected = format_summary(&reference_summary(&input));

    for workers in [1, 2, 3, 8] {
        for chunk_size in [0, 64, 1_000, 1 << 20] {
            let result = aggregator(workers, chunk_size).aggregate(&input).unwrap();
            assert_eq!(
                format_summary(&result.stations),
                expected,
                "workers={} chunk_size={}",
                workers,
                chunk_size
            );
        }
    }
}

#[test]
fn test_single_and_multi_chunk_agree() {
    let input = generate_input(5_000, 3);

    let single = aggregator(1, input.len()).aggregate(&input).unwrap();
    let multi = aggregator(4, 97).aggregate(&input).unwrap();

    assert_eq!(single.stats.chunks, 1);
    assert!(multi.stats.chunks > 4);
    assert_eq!(single.stations, multi.stations);
}

#[test]
fn test_counts_are_conserved() {
    let records = 12_345;
    let input = generate_input(records, 99);

    let result = aggregator(5, 512).aggregate(&input).unwrap();
    let total: u64 = result.stations.iter().map(|station| station.count()).sum();

    assert_eq!(total, records as u64);
    assert_eq!(result.stats.records, records as u64);
}

#[test]
fn test_min_mean_max_ordering() {
    let input = generate_input(8_000, 5);
    let result = aggregator(3, 256).aggregate(&input).unwrap();

    for station in &result.stations {
        assert!(station.min_tenths() <= station.mean_tenths(), "{}", station.name);
        assert!(station.mean_tenths() <= station.max_tenths(), "{}", station.name);
    }
}

#[test]
fn test_output_is_sorted_by_bytes() {
    let input = generate_input(3_000, 13);
    let result = aggregator(2, 300).aggregate(&input).unwrap();

    let keys: Vec<&[u8]> = result.stations.iter().map(|s| s.key.as_slice()).collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
    assert_eq!(result.stations.last().unwrap().name, "İzmir");
}

#[test]
fn test_small_table_resolves_collisions() {
    // 24 stations in 32 slots forces long probe sequences
    let input = generate_input(6_000, 21);
    let config = AggregatorConfig::default()
        .with_workers(3)
        .with_chunk_size(500)
        .with_table_capacity(32);

    let result = Aggregator::new(config).unwrap().aggregate(&input).unwrap();

    assert_eq!(result.stations, reference_summary(&input));
}

#[test]
fn test_table_overflow_is_reported() {
    let input = measurements(&["A;1.0", "B;2.0", "C;3.0"]);
    let config = AggregatorConfig::default()
        .with_workers(1)
        .with_table_capacity(2);

    let result = Aggregator::new(config).unwrap().aggregate(&input);

    assert!(matches!(
        result,
        Err(AggregatorError::TableFull { capacity: 2 })
    ));
}

#[test]
fn test_empty_input() {
    let result = aggregator(4, 0).aggregate(&Vec::<u8>::new()).unwrap();

    assert!(result.stations.is_empty());
    assert_eq!(result.stats.chunks, 0);
    assert_eq!(format_summary(&result.stations), "{}\n");
}

#[test]
fn test_blank_and_trailing_lines_are_skipped() {
    let input = b"Oslo;1.0\n\nOslo;3.0\n\n".to_vec();
    let result = aggregator(2, 0).aggregate(&input).unwrap();

    assert_eq!(format_summary(&result.stations), "{Oslo=1.0/2.0/3.0}\n");
    assert_eq!(result.stats.skipped_lines, 2);
}

#[test]
fn test_parse_error_aborts_run() {
    let input = measurements(&["A;1.0", "B;2.0", "C;bad"]);
    let result = aggregator(2, 6).aggregate(&input);

    match result {
        Err(AggregatorError::Parse { offset, raw }) => {
            assert_eq!(offset, 14);
            assert_eq!(raw, "bad");
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn test_invalid_config_rejected() {
    let config = AggregatorConfig::default().with_workers(0);
    assert!(matches!(
        Aggregator::new(config),
        Err(AggregatorError::Configuration { .. })
    ));
}

#[test]
fn test_workers_bounded_by_chunks() {
    let input = measurements(&["A;1.0", "B;2.0"]);
    let result = aggregator(16, 0).aggregate(&input).unwrap();

    assert_eq!(result.stats.chunks, 1);
    assert_eq!(result.stats.workers, 1);
}

#[test]
fn test_reader_matches_mapped() {
    let input = generate_input(4_000, 17);
    let mapped = aggregator(3, 1_000).aggregate(&input).unwrap();

    for block_size in [7, 100, 4096, 1 << 20] {
        let config = AggregatorConfig::default()
            .with_workers(3)
            .with_read_block_size(block_size);
        let streamed = Aggregator::new(config)
            .unwrap()
            .aggregate_reader(Cursor::new(&input))
            .unwrap();

        assert_eq!(streamed.stations, mapped.stations, "block_size={}", block_size);
        assert_eq!(streamed.stats.records, 4_000);
        assert_eq!(streamed.stats.input_bytes, input.len() as u64);
    }
}

#[test]
fn test_reader_parse_error_offset() {
    let input = measurements(&["A;1.0", "B;2.0", "C;bad"]);
    let config = AggregatorConfig::default()
        .with_workers(2)
        .with_read_block_size(6);

    let result = Aggregator::new(config)
        .unwrap()
        .aggregate_reader(Cursor::new(input));

    assert!(matches!(
        result,
        Err(AggregatorError::Parse { offset: 14, .. })
    ));
}
