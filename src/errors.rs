use thiserror::Error;

use crate::bytecode::{Address, Field, Operation, Shape};
use crate::image::IMAGE_WORDS;

/// An operand does not fit its field. The caller has to supply a corrected operation.
#[derive(Error, Clone, Copy, Debug, Eq, PartialEq)]
#[error("{field} operand {value} is out of range {}", .field.range())]
pub struct EncodingRangeError {
  pub field: Field,
  pub value: i32,
}

impl EncodingRangeError {
  pub fn new(field: Field, value: i32) -> EncodingRangeError {
    EncodingRangeError { field, value }
  }
}

/// An opcode was given operands of another instruction shape.
#[derive(Error, Clone, Copy, Debug, Eq, PartialEq)]
#[error("{opcode} is a {} instruction, not {expected}", .opcode.shape())]
pub struct ShapeMismatchError {
  pub opcode: Operation,
  pub expected: Shape,
}

/// Errors from building an `Instruction` with a caller supplied opcode.
#[derive(Error, Clone, Copy, Debug, Eq, PartialEq)]
pub enum EncodingError {
  #[error(transparent)]
  Range(#[from] EncodingRangeError),

  #[error(transparent)]
  Shape(#[from] ShapeMismatchError),
}

/// The instruction stream does not fit in the memory image.
#[derive(Error, Clone, Copy, Debug, Eq, PartialEq)]
#[error(
  "program is {length} words but the memory image holds {}; the word at address {} does not fit",
  IMAGE_WORDS, IMAGE_WORDS
)]
pub struct CapacityExceededError {
  pub length: usize,
}

/// Errors that abort a program generation run.
#[derive(Error, Debug)]
pub enum GenerationError {
  /// An operation could not be encoded. `position` is the address it would have occupied.
  #[error("instruction {position}: {source}")]
  Encoding {
    position: Address,
    source: EncodingRangeError,
  },

  #[error(transparent)]
  Capacity(#[from] CapacityExceededError),

  /// Writing the harness file failed.
  #[error("could not write harness: {0}")]
  Io(#[from] std::io::Error),
}
