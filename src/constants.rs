//! Application constants for the aggregator
//!
//! Record grammar bytes, hashing parameters and sizing defaults used
//! throughout the engine and CLI.

// =============================================================================
// Record Format
// =============================================================================

/// Separates the station name from its measurement
pub const DELIMITER: u8 = b';';

/// Terminates a record
pub const NEWLINE: u8 = b'\n';

/// Optional terminator byte before the newline on files written on Windows
pub const CARRIAGE_RETURN: u8 = b'\r';

/// Decimal point inside a measurement
pub const DECIMAL_POINT: u8 = b'.';

/// Leading sign of a negative measurement
pub const MINUS: u8 = b'-';

// =============================================================================
// Key Hashing
// =============================================================================

/// FNV-1a 32-bit offset basis
pub const HASH_OFFSET_BASIS: u32 = 0x811c_9dc5;

/// FNV-1a 32-bit prime, odd so the multiply is a bijection on u32
pub const HASH_PRIME: u32 = 0x0100_0193;

// =============================================================================
// Sizing Defaults
// =============================================================================

/// Default partition table capacity (power of two, >= 4x the 10k expected stations)
pub const DEFAULT_TABLE_CAPACITY: usize = 1 << 16;

/// Chunks never get smaller than this unless the input itself is smaller
pub const MIN_CHUNK_SIZE: usize = 64 * 1024;

/// Block size for the streaming reader path
pub const DEFAULT_READ_BLOCK_SIZE: usize = 8 * 1024 * 1024;

// =============================================================================
// CLI Defaults
// =============================================================================

/// Input file used when none is given on the command line
pub const DEFAULT_INPUT_FILE: &str = "measurements.txt";

/// Output file used when none is given on the command line
pub const DEFAULT_OUTPUT_FILE: &str = "output.txt";
