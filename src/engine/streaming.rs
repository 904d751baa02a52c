//! Block reader for inputs that are not memory-mapped
//!
//! Reads the input in fixed-size blocks. Everything after the last newline of
//! a block is held in an explicit carry buffer and prepended to the next
//! block, so every emitted block ends on a record boundary. The final block
//! holds whatever remains at end of input, terminated or not.

use crate::constants::NEWLINE;
use crate::error::{AggregatorError, Result};
use std::io::{ErrorKind, Read};
use tracing::trace;

/// A newline-aligned block of input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Offset of the first byte within the whole input
    pub offset: usize,
    pub bytes: Vec<u8>,
}

pub struct BlockReader<R> {
    reader: R,
    block_size: usize,
    /// Partial record left over from the previous read
    carry: Vec<u8>,
    /// Input offset of the first byte in `carry`
    offset: usize,
    exhausted: bool,
}

impl<R: Read> BlockReader<R> {
    pub fn new(reader: R, block_size: usize) -> Self {
        Self {
            reader,
            block_size: block_size.max(1),
            carry: Vec::new(),
            offset: 0,
            exhausted: false,
        }
    }

    /// Read the next newline-aligned block, or `None` at end of input
    pub fn next_block(&mut self) -> Result<Option<Block>> {
        loop {
            if self.exhausted && self.carry.is_empty() {
                return Ok(None);
            }

            let mut buffer = std::mem::take(&mut self.carry);
            if !self.exhausted {
                self.fill(&mut buffer)?;
            }
            if buffer.is_empty() {
                return Ok(None);
            }

            let split_at = if self.exhausted {
                buffer.len()
            } else {
                match memchr::memrchr(NEWLINE, &buffer) {
                    Some(position) => position + 1,
                    None => {
                        // A single record longer than the block; keep reading
                        trace!("No newline in {} buffered bytes, extending", buffer.len());
                        self.carry = buffer;
                        continue;
                    }
                }
            };

            self.carry = buffer.split_off(split_at);
            let block = Block {
                offset: self.offset,
                bytes: buffer,
            };
            self.offset += block.bytes.len();
            return Ok(Some(block));
        }
    }

    /// Append up to one block of fresh input to `buffer`
    fn fill(&mut self, buffer: &mut Vec<u8>) -> Result<()> {
        let mut filled = buffer.len();
        buffer.resize(filled + self.block_size, 0);

        while filled < buffer.len() {
            match self.reader.read(&mut buffer[filled..]) {
                Ok(0) => {
                    self.exhausted = true;
                    break;
                }
                Ok(read) => filled += read,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(AggregatorError::io("failed to read input", e)),
            }
        }

        buffer.truncate(filled);
        Ok(())
    }
}

impl<R: Read> Iterator for BlockReader<R> {
    type Item = Result<Block>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_block().transpose()
    }
}
