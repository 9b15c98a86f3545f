/*!
  This module is responsible for the encoding of binary instructions. Decoding exists only
  for tests, to check that every field survives encoding.

*/
#[cfg(test)]
use std::convert::TryFrom;

use super::{Instruction, Operands, Operation, Word, WORD_BITS, OPCODE_BITS, REGISTER_BITS, IMMEDIATE_BITS};
#[cfg(test)]
use super::{Field, Immediate, Shape};
use crate::errors::EncodingRangeError;
#[cfg(test)]
use crate::register::Register;

/// Concatenates `(value, width)` fields, first field in the most significant position.
/// Each value must already fit its width.
fn pack(fields: &[(u16, u32)]) -> Word {
  debug_assert_eq!(fields.iter().map(|(_, width)| width).sum::<u32>(), WORD_BITS);
  fields.iter().fold(0, |word, &(value, width)| {
    debug_assert!(value < (1 << width));
    (word << width) | value
  })
}

/**
  Encodes the instruction into its 16 bit word. An `Instruction` always carries operands of
  its opcode's shape, so every reserved bit comes out zero.
*/
pub fn encode_instruction(instruction: &Instruction) -> Word {
  let opcode = instruction.opcode();
  match *instruction.operands() {

    Operands::Register { destination, left, right } => {
      // [OpCode:5][Left:3][Right:3][Destination:3][Reserved:2]
      pack(&[
        (opcode.code() as u16, OPCODE_BITS),
        (left.bits(),          REGISTER_BITS),
        (right.bits(),         REGISTER_BITS),
        (destination.bits(),   REGISTER_BITS),
        (0,                    2),
      ])
    },

    Operands::Immediate { destination, source, immediate } => {
      // [OpCode:5][Source:3][Destination:3][Immediate:5]
      pack(&[
        (opcode.code() as u16, OPCODE_BITS),
        (source.bits(),        REGISTER_BITS),
        (destination.bits(),   REGISTER_BITS),
        (immediate.bits(),     IMMEDIATE_BITS),
      ])
    },

    Operands::Unary(register) => {
      // [OpCode:5][Register:3][Reserved:8]
      pack(&[
        (opcode.code() as u16, OPCODE_BITS),
        (register.bits(),      REGISTER_BITS),
        (0,                    8),
      ])
    },

    Operands::Nullary => {
      // [OpCode:5][Reserved:11]
      pack(&[
        (opcode.code() as u16, OPCODE_BITS),
        (0,                    11),
      ])
    },

  }
}

/// The word as a 16 character string of `0` and `1`, most significant bit first.
pub fn to_binary_literal(word: Word) -> String {
  format!("{:016b}", word)
}

// region Encoder operations

pub fn encode_exit() -> Word {
  encode_instruction(&Instruction::exit())
}

pub fn encode_print(register: i32) -> Result<Word, EncodingRangeError> {
  Ok(encode_instruction(&Instruction::print(register)?))
}

fn encode_register(opcode: Operation, destination: i32, left: i32, right: i32)
  -> Result<Word, EncodingRangeError>
{
  Ok(encode_instruction(&Instruction::register_operands(opcode, destination, left, right)?))
}

fn encode_immediate(opcode: Operation, destination: i32, source: i32, immediate: i32)
  -> Result<Word, EncodingRangeError>
{
  Ok(encode_instruction(&Instruction::immediate_operands(opcode, destination, source, immediate)?))
}

pub fn encode_add(destination: i32, left: i32, right: i32) -> Result<Word, EncodingRangeError> {
  encode_register(Operation::Add, destination, left, right)
}

pub fn encode_sub(destination: i32, left: i32, right: i32) -> Result<Word, EncodingRangeError> {
  encode_register(Operation::Sub, destination, left, right)
}

pub fn encode_mul(destination: i32, left: i32, right: i32) -> Result<Word, EncodingRangeError> {
  encode_register(Operation::Mul, destination, left, right)
}

pub fn encode_div(destination: i32, left: i32, right: i32) -> Result<Word, EncodingRangeError> {
  encode_register(Operation::Div, destination, left, right)
}

pub fn encode_eq(destination: i32, left: i32, right: i32) -> Result<Word, EncodingRangeError> {
  encode_register(Operation::Eq, destination, left, right)
}

pub fn encode_ne(destination: i32, left: i32, right: i32) -> Result<Word, EncodingRangeError> {
  encode_register(Operation::Ne, destination, left, right)
}

/// Immediates are 5 bit two's complement, so `immediate` must be in -16..=15.
pub fn encode_add_immediate(destination: i32, source: i32, immediate: i32)
  -> Result<Word, EncodingRangeError>
{
  encode_immediate(Operation::AddImmediate, destination, source, immediate)
}

pub fn encode_sub_immediate(destination: i32, source: i32, immediate: i32)
  -> Result<Word, EncodingRangeError>
{
  encode_immediate(Operation::SubImmediate, destination, source, immediate)
}

// endregion

// region Decoding

#[cfg(test)]
fn field(word: Word, offset: u32, width: u32) -> u16 {
  (word >> offset) & ((1 << width) - 1)
}

/// Inverse of `encode_instruction`. Returns `None` for unknown opcodes and for words with
/// nonzero reserved bits.
#[cfg(test)]
pub(crate) fn try_decode_instruction(word: Word) -> Option<Instruction> {
  let opcode = Operation::try_from(field(word, WORD_BITS - OPCODE_BITS, OPCODE_BITS) as u8).ok()?;
  let register = |offset: u32| {
    Register::new(Field::Register, field(word, offset, REGISTER_BITS) as i32).ok()
  };

  let operands =
    match opcode.shape() {

      Shape::Register => {
        if field(word, 0, 2) != 0 {
          return None;
        }
        Operands::Register {
          left        : register(8)?,
          right       : register(5)?,
          destination : register(2)?,
        }
      }

      Shape::Immediate => {
        let raw = field(word, 0, IMMEDIATE_BITS) as i32;
        // Sign extend from 5 bits.
        let value = if raw >= 1 << (IMMEDIATE_BITS - 1) { raw - (1 << IMMEDIATE_BITS) } else { raw };
        Operands::Immediate {
          source      : register(8)?,
          destination : register(5)?,
          immediate   : Immediate::new(value).ok()?,
        }
      }

      Shape::Unary => {
        if field(word, 0, 8) != 0 {
          return None;
        }
        Operands::Unary(register(8)?)
      }

      Shape::Nullary => {
        if field(word, 0, 11) != 0 {
          return None;
        }
        Operands::Nullary
      }

    };

  Some(Instruction::from_parts(opcode, operands))
}

// endregion
