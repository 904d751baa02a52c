//! Fixed-point parsing of measurement fields
//!
//! Measurements follow a fixed grammar: an optional `-`, one or two integer
//! digits, a `.` and exactly one fractional digit. Values are returned in
//! tenths (`-12.3` -> `-123`) so aggregation never touches floating point.
//!
//! The parser is deliberately narrow. It does not accept `+`, exponents,
//! more fractional digits or surrounding whitespace; the data source
//! guarantees the format and anything else aborts the run. Generalising it
//! would cost throughput on every record for inputs that never occur.

use crate::constants::{DECIMAL_POINT, MINUS};
use std::fmt;

/// Why a measurement field was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecimalError {
    /// The field ended before the grammar was complete
    Truncated,
    /// A byte did not fit the grammar at this position
    Unexpected { position: usize, byte: u8 },
    /// Bytes remained after the fractional digit
    TrailingBytes { position: usize },
}

impl fmt::Display for DecimalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecimalError::Truncated => write!(f, "measurement ended early"),
            DecimalError::Unexpected { position, byte } => {
                write!(f, "unexpected byte {:#04x} at position {}", byte, position)
            }
            DecimalError::TrailingBytes { position } => {
                write!(f, "trailing bytes from position {}", position)
            }
        }
    }
}

impl std::error::Error for DecimalError {}

#[derive(Clone, Copy)]
enum State {
    Start,
    Sign,
    FirstDigit,
    SecondDigit,
    Point,
    Done,
}

/// Parse a measurement into tenths of a degree
pub fn parse_tenths(bytes: &[u8]) -> Result<i16, DecimalError> {
    let mut state = State::Start;
    let mut negative = false;
    let mut value: i16 = 0;

    for (position, &byte) in bytes.iter().enumerate() {
        state = match (state, byte) {
            (State::Start, MINUS) => {
                negative = true;
                State::Sign
            }
            (State::Start | State::Sign, b'0'..=b'9') => {
                value = digit(byte);
                State::FirstDigit
            }
            (State::FirstDigit, b'0'..=b'9') => {
                value = value * 10 + digit(byte);
                State::SecondDigit
            }
            (State::FirstDigit | State::SecondDigit, DECIMAL_POINT) => State::Point,
            (State::Point, b'0'..=b'9') => {
                value = value * 10 + digit(byte);
                State::Done
            }
            (State::Done, _) => return Err(DecimalError::TrailingBytes { position }),
            (_, byte) => return Err(DecimalError::Unexpected { position, byte }),
        };
    }

    match state {
        State::Done if negative => Ok(-value),
        State::Done => Ok(value),
        _ => Err(DecimalError::Truncated),
    }
}

#[inline(always)]
fn digit(byte: u8) -> i16 {
    (byte - b'0') as i16
}
