/*!
  The instruction stream is the program as it is emitted: an append-only sequence of encoded
  words in program order. The stream is owned by whoever is generating the program and is
  handed by value to `MemoryImage::build` once complete, after which it can no longer grow.

  Each emitting method encodes its operands first and only appends on success, so a failed
  emit leaves the stream unchanged and the error names the address the instruction would
  have had.
*/

use std::fmt::{Display, Formatter};

use prettytable::Table;

use super::{encode_instruction, to_binary_literal, Address, Instruction, Operation, Word};
use crate::errors::{EncodingRangeError, GenerationError};
use crate::table::TABLE_DISPLAY_FORMAT;

/// An emitted instruction alongside its encoding. The instruction is kept for display only.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Emitted {
  instruction : Instruction,
  word        : Word,
}

#[derive(Clone, Debug, Default)]
pub struct InstructionStream {
  emitted: Vec<Emitted>,
}

impl InstructionStream {

  pub fn new() -> InstructionStream {
    InstructionStream { emitted: vec![] }
  }

  pub fn len(&self) -> usize {
    self.emitted.len()
  }

  pub fn is_empty(&self) -> bool {
    self.emitted.is_empty()
  }

  /// The word at `address`, if one has been emitted there.
  pub fn get(&self, address: Address) -> Option<Word> {
    self.emitted.get(address).map(|e| e.word)
  }

  /// The encoded words in program order.
  pub fn words(&self) -> impl Iterator<Item = Word> + '_ {
    self.emitted.iter().map(|e| e.word)
  }

  /// The instructions in program order.
  pub fn instructions(&self) -> impl Iterator<Item = &Instruction> + '_ {
    self.emitted.iter().map(|e| &e.instruction)
  }

  /// Appends an instruction, returning its address. An `Instruction` always has operands of
  /// its opcode's shape, so nothing malformed can reach the image through here.
  pub fn emit(&mut self, instruction: Instruction) -> Address {
    let address = self.emitted.len();
    let word    = encode_instruction(&instruction);

    log::debug!("{:>4}: {}  {}", address, to_binary_literal(word), instruction);
    self.emitted.push(Emitted { instruction, word });
    address
  }

  /// Validates with `build` and emits, attaching the would-be address to any range error.
  fn try_emit<F>(&mut self, build: F) -> Result<Address, GenerationError>
    where F: FnOnce() -> Result<Instruction, EncodingRangeError>
  {
    let position = self.emitted.len();
    let instruction = build().map_err(|source| GenerationError::Encoding { position, source })?;
    Ok(self.emit(instruction))
  }

  // region Emitters, one per opcode

  pub fn exit(&mut self) -> Address {
    self.emit(Instruction::exit())
  }

  pub fn print(&mut self, register: i32) -> Result<Address, GenerationError> {
    self.try_emit(|| Instruction::print(register))
  }

  pub fn add(&mut self, destination: i32, left: i32, right: i32) -> Result<Address, GenerationError> {
    self.try_emit(|| Instruction::register_operands(Operation::Add, destination, left, right))
  }

  pub fn sub(&mut self, destination: i32, left: i32, right: i32) -> Result<Address, GenerationError> {
    self.try_emit(|| Instruction::register_operands(Operation::Sub, destination, left, right))
  }

  pub fn mul(&mut self, destination: i32, left: i32, right: i32) -> Result<Address, GenerationError> {
    self.try_emit(|| Instruction::register_operands(Operation::Mul, destination, left, right))
  }

  pub fn div(&mut self, destination: i32, left: i32, right: i32) -> Result<Address, GenerationError> {
    self.try_emit(|| Instruction::register_operands(Operation::Div, destination, left, right))
  }

  pub fn eq(&mut self, destination: i32, left: i32, right: i32) -> Result<Address, GenerationError> {
    self.try_emit(|| Instruction::register_operands(Operation::Eq, destination, left, right))
  }

  pub fn ne(&mut self, destination: i32, left: i32, right: i32) -> Result<Address, GenerationError> {
    self.try_emit(|| Instruction::register_operands(Operation::Ne, destination, left, right))
  }

  pub fn add_immediate(&mut self, destination: i32, source: i32, immediate: i32)
    -> Result<Address, GenerationError>
  {
    self.try_emit(|| Instruction::immediate_operands(Operation::AddImmediate, destination, source, immediate))
  }

  pub fn sub_immediate(&mut self, destination: i32, source: i32, immediate: i32)
    -> Result<Address, GenerationError>
  {
    self.try_emit(|| Instruction::immediate_operands(Operation::SubImmediate, destination, source, immediate))
  }

  // endregion

}

impl Display for InstructionStream {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let mut table = Table::new();

    table.set_format(*TABLE_DISPLAY_FORMAT);
    table.set_titles(row![ubr->"Address", ubl->"Word", ubl->"Instruction"]);

    for (address, e) in self.emitted.iter().enumerate() {
      table.add_row(
        row![r->address, to_binary_literal(e.word), format!("{}", e.instruction)]
      );
    }

    write!(f, "{}", table)
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use crate::bytecode::{try_decode_instruction, Field};

  #[test]
  fn emits_in_program_order(){
    let mut stream = InstructionStream::new();
    assert!(stream.is_empty());

    assert_eq!(stream.add_immediate(1, 0, 1).unwrap(), 0);
    assert_eq!(stream.print(1).unwrap(), 1);
    assert_eq!(stream.exit(), 2);

    let words: Vec<Word> = stream.words().collect();
    assert_eq!(words, vec![0b0100000000100001, 0b0000100100000000, 0]);
    assert_eq!(stream.get(1), Some(0b0000100100000000));
    assert_eq!(stream.get(3), None);
  }

  #[test]
  fn every_emitter_uses_its_opcode(){
    let mut stream = InstructionStream::new();
    stream.exit();
    stream.print(0).unwrap();
    stream.add(1, 2, 3).unwrap();
    stream.sub(1, 2, 3).unwrap();
    stream.mul(1, 2, 3).unwrap();
    stream.div(1, 2, 3).unwrap();
    stream.eq(1, 2, 3).unwrap();
    stream.ne(1, 2, 3).unwrap();
    stream.add_immediate(1, 2, 3).unwrap();
    stream.sub_immediate(1, 2, -3).unwrap();

    let opcodes: Vec<u8> = stream
      .words()
      .map(|w| try_decode_instruction(w).unwrap().opcode().code())
      .collect();
    assert_eq!(opcodes, (0..10).collect::<Vec<u8>>());
  }

  #[test]
  fn failed_emit_reports_position_and_appends_nothing(){
    let mut stream = InstructionStream::new();
    stream.add_immediate(1, 0, 1).unwrap();
    stream.print(1).unwrap();

    match stream.mul(0, 3, 8) {
      Err(GenerationError::Encoding { position, source }) => {
        assert_eq!(position, 2);
        assert_eq!(source, EncodingRangeError::new(Field::Right, 8));
      }
      other => panic!("expected an encoding error, got {:?}", other),
    }
    assert_eq!(stream.len(), 2);

    let message = format!("{}", stream.sub_immediate(0, 0, -17).unwrap_err());
    assert_eq!(message, "instruction 2: immediate operand -17 is out of range [-16, 15]");
  }

  #[test]
  fn emitted_instructions_keep_their_shape(){
    let mut stream = InstructionStream::new();
    assert!(Instruction::register(Operation::Exit, 1, 2, 3).is_err());
    stream.emit(Instruction::register(Operation::Ne, 1, 2, 3).unwrap());
    stream.emit(Instruction::immediate(Operation::SubImmediate, 4, 5, -6).unwrap());
    stream.emit(Instruction::exit());

    let decoded: Vec<Instruction> = stream.words().map(|w| try_decode_instruction(w).unwrap()).collect();
    let emitted: Vec<Instruction> = stream.instructions().cloned().collect();
    assert_eq!(decoded, emitted);
    assert_eq!(stream.get(2), Some(0));
  }

  #[test]
  fn display_lists_instructions(){
    let mut stream = InstructionStream::new();
    stream.add_immediate(1, 0, 1).unwrap();
    stream.exit();

    let text = format!("{}", stream);
    assert!(text.contains("0100000000100001"));
    assert!(text.contains("addi(R1, R0, 1)"));
    assert!(text.contains("exit"));
  }

}
