use std::fmt::{Display, Formatter};

use strum_macros::{Display as StrumDisplay, EnumIter, EnumString, IntoStaticStr};
use num_enum::{TryFromPrimitive, IntoPrimitive};

use crate::bytecode::{IMMEDIATE_MAX, IMMEDIATE_MIN, IMMEDIATE_BITS};
use crate::errors::{EncodingError, EncodingRangeError, ShapeMismatchError};
use crate::register::{Register, REGISTER_COUNT};

/**
  Opcodes of the CPU.

  The discriminant of each variant is its 5 bit opcode, so the order the opcodes are listed
  below is significant. Opcodes of the same shape are grouped together so that the shape can
  be determined with a trivial comparison.
  Order-dependencies:
      ```
      Operation::shape()
      binary::try_decode_instruction()
      ```
*/
#[derive(
StrumDisplay, IntoStaticStr, EnumString, EnumIter, TryFromPrimitive, IntoPrimitive,
Clone,        Copy,          Eq, PartialEq,  Debug,            Hash
)]
#[repr(u8)]
pub enum Operation {
  // Nullary //
  #[strum(serialize = "exit")]
  Exit         = 0b00000, // exit

  // Unary //
  #[strum(serialize = "print")]
  Print        = 0b00001, // print( register )

  // Register-register //
  #[strum(serialize = "add")]
  Add          = 0b00010, // add( destination, left, right )
  #[strum(serialize = "sub")]
  Sub          = 0b00011, // sub( destination, left, right )
  #[strum(serialize = "mul")]
  Mul          = 0b00100, // mul( destination, left, right )
  #[strum(serialize = "div")]
  Div          = 0b00101, // div( destination, left, right )
  #[strum(serialize = "eq")]
  Eq           = 0b00110, // eq( destination, left, right )
  #[strum(serialize = "ne")]
  Ne           = 0b00111, // ne( destination, left, right )

  // Register-immediate //
  #[strum(serialize = "addi")]
  AddImmediate = 0b01000, // addi( destination, source, immediate )
  #[strum(serialize = "subi")]
  SubImmediate = 0b01001, // subi( destination, source, immediate )
}

pub const MIN_UNARY_OPCODE     : u8 = 1u8;
pub const MIN_REGISTER_OPCODE  : u8 = 2u8;
pub const MIN_IMMEDIATE_OPCODE : u8 = 8u8;

/// The field layout an opcode uses.
#[derive(StrumDisplay, Clone, Copy, Eq, PartialEq, Debug, Hash)]
pub enum Shape {
  Nullary,
  Unary,
  Register,
  Immediate,
}

impl Operation {
  pub fn code(&self) -> u8 {
    Into::<u8>::into(*self)
  }

  pub fn shape(&self) -> Shape {
    match self.code() {
      value if value < MIN_UNARY_OPCODE     => Shape::Nullary,
      value if value < MIN_REGISTER_OPCODE  => Shape::Unary,
      value if value < MIN_IMMEDIATE_OPCODE => Shape::Register,
      _value => Shape::Immediate
    }
  }

  pub fn mnemonic(&self) -> &'static str {
    self.into()
  }
}

/// The operand roles, used to report which operand of an operation was out of range.
#[derive(StrumDisplay, Clone, Copy, Eq, PartialEq, Debug, Hash)]
pub enum Field {
  #[strum(serialize = "destination")]
  Destination,
  #[strum(serialize = "left")]
  Left,
  #[strum(serialize = "right")]
  Right,
  #[strum(serialize = "source")]
  Source,
  #[strum(serialize = "register")]
  Register,
  #[strum(serialize = "immediate")]
  Immediate,
}

impl Field {
  /// The legal values of the field, for error messages.
  pub fn range(&self) -> String {
    match self {
      Field::Immediate => format!("[{}, {}]", IMMEDIATE_MIN, IMMEDIATE_MAX),
      _ => format!("[0, {}]", REGISTER_COUNT - 1)
    }
  }
}

/// A validated 5 bit signed immediate.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub struct Immediate(i8);

impl Immediate {
  pub fn new(value: i32) -> Result<Immediate, EncodingRangeError> {
    match value {
      IMMEDIATE_MIN..=IMMEDIATE_MAX => Ok(Immediate(value as i8)),
      _ => Err(EncodingRangeError::new(Field::Immediate, value))
    }
  }

  pub fn value(&self) -> i32 {
    self.0 as i32
  }

  /// The two's complement field value: negative values have the field modulus added.
  pub fn bits(&self) -> u16 {
    let modulus = 1i32 << IMMEDIATE_BITS;
    ((self.value() + modulus) % modulus) as u16
  }
}

impl Display for Immediate {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// The operands of an instruction, one variant per `Shape`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub(crate) enum Operands {
  /// [OpCode:5][Left:3][Right:3][Destination:3][Reserved:2]
  Register {
    destination : Register,
    left        : Register,
    right       : Register,
  },
  /// [OpCode:5][Source:3][Destination:3][Immediate:5]
  Immediate {
    destination : Register,
    source      : Register,
    immediate   : Immediate,
  },
  /// [OpCode:5][Register:3][Reserved:8]
  Unary(Register),
  /// [OpCode:5][Reserved:11]
  Nullary,
}

impl Operands {
  pub(crate) fn shape(&self) -> Shape {
    match self {
      Operands::Register { .. }  => Shape::Register,
      Operands::Immediate { .. } => Shape::Immediate,
      Operands::Unary(_)         => Shape::Unary,
      Operands::Nullary          => Shape::Nullary,
    }
  }
}

/// Holds the unencoded components of an instruction. The operands always match the shape of
/// the opcode: the constructors are the only way to build one outside this crate, and they
/// reject an opcode of the wrong shape.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Instruction {
  opcode   : Operation,
  operands : Operands,
}

impl Instruction {

  /// Pairs an opcode with operands of its own shape. Callers inside the crate pass fixed
  /// opcodes, so a mismatch here is a bug in this crate.
  pub(crate) fn from_parts(opcode: Operation, operands: Operands) -> Instruction {
    assert_eq!(opcode.shape(), operands.shape(), "{} given {} operands", opcode, operands.shape());
    Instruction { opcode, operands }
  }

  fn check_shape(opcode: Operation, expected: Shape) -> Result<(), ShapeMismatchError> {
    match opcode.shape() == expected {
      true  => Ok(()),
      false => Err(ShapeMismatchError { opcode, expected })
    }
  }

  pub fn exit() -> Instruction {
    Instruction::from_parts(Operation::Exit, Operands::Nullary)
  }

  pub fn print(register: i32) -> Result<Instruction, EncodingRangeError> {
    let register = Register::new(Field::Register, register)?;
    Ok(Instruction::from_parts(Operation::Print, Operands::Unary(register)))
  }

  /// A register-register instruction. Fails if `opcode` does not have `Shape::Register`.
  pub fn register(opcode: Operation, destination: i32, left: i32, right: i32)
    -> Result<Instruction, EncodingError>
  {
    Instruction::check_shape(opcode, Shape::Register)?;
    Ok(Instruction::register_operands(opcode, destination, left, right)?)
  }

  /// A register-immediate instruction. Fails if `opcode` does not have `Shape::Immediate`.
  pub fn immediate(opcode: Operation, destination: i32, source: i32, immediate: i32)
    -> Result<Instruction, EncodingError>
  {
    Instruction::check_shape(opcode, Shape::Immediate)?;
    Ok(Instruction::immediate_operands(opcode, destination, source, immediate)?)
  }

  /// Validates the operands of a register-register opcode known to have that shape.
  pub(crate) fn register_operands(opcode: Operation, destination: i32, left: i32, right: i32)
    -> Result<Instruction, EncodingRangeError>
  {
    let operands = Operands::Register {
      destination : Register::new(Field::Destination, destination)?,
      left        : Register::new(Field::Left, left)?,
      right       : Register::new(Field::Right, right)?,
    };
    Ok(Instruction::from_parts(opcode, operands))
  }

  /// Validates the operands of a register-immediate opcode known to have that shape.
  pub(crate) fn immediate_operands(opcode: Operation, destination: i32, source: i32, immediate: i32)
    -> Result<Instruction, EncodingRangeError>
  {
    let operands = Operands::Immediate {
      destination : Register::new(Field::Destination, destination)?,
      source      : Register::new(Field::Source, source)?,
      immediate   : Immediate::new(immediate)?,
    };
    Ok(Instruction::from_parts(opcode, operands))
  }

  pub fn opcode(&self) -> Operation {
    self.opcode
  }

  pub fn shape(&self) -> Shape {
    self.operands.shape()
  }

  pub(crate) fn operands(&self) -> &Operands {
    &self.operands
  }
}

impl Display for Instruction {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let opcode = self.opcode;
    match &self.operands {

      Operands::Register { destination, left, right } => {
        write!(f, "{}({}, {}, {})", opcode, destination, left, right)
      }

      Operands::Immediate { destination, source, immediate } => {
        write!(f, "{}({}, {}, {})", opcode, destination, source, immediate)
      }

      Operands::Unary(register) => {
        write!(f, "{}({})", opcode, register)
      }

      Operands::Nullary => {
        write!(f, "{}", opcode)
      }

    }
  }
}


#[cfg(test)]
mod tests {
  use std::str::FromStr;

  use strum::IntoEnumIterator;

  use super::*;

  #[test]
  fn opcode_table(){
    let codes: Vec<(Operation, u8)> = Operation::iter().map(|op| (op, op.code())).collect();
    assert_eq!(
      codes,
      vec![
        (Operation::Exit,         0b00000),
        (Operation::Print,        0b00001),
        (Operation::Add,          0b00010),
        (Operation::Sub,          0b00011),
        (Operation::Mul,          0b00100),
        (Operation::Div,          0b00101),
        (Operation::Eq,           0b00110),
        (Operation::Ne,           0b00111),
        (Operation::AddImmediate, 0b01000),
        (Operation::SubImmediate, 0b01001),
      ]
    );
  }

  #[test]
  fn shapes(){
    assert_eq!(Operation::Exit.shape(), Shape::Nullary);
    assert_eq!(Operation::Print.shape(), Shape::Unary);
    for op in &[Operation::Add, Operation::Sub, Operation::Mul,
                Operation::Div, Operation::Eq, Operation::Ne] {
      assert_eq!(op.shape(), Shape::Register);
    }
    assert_eq!(Operation::AddImmediate.shape(), Shape::Immediate);
    assert_eq!(Operation::SubImmediate.shape(), Shape::Immediate);
  }

  #[test]
  fn mnemonics(){
    assert_eq!(Operation::AddImmediate.mnemonic(), "addi");
    assert_eq!(Operation::from_str("subi"), Ok(Operation::SubImmediate));
    assert!(Operation::from_str("jmp").is_err());
  }

  #[test]
  fn immediate_bounds(){
    assert_eq!(Immediate::new(-16).unwrap().bits(), 0b10000);
    assert_eq!(Immediate::new(-1).unwrap().bits(),  0b11111);
    assert_eq!(Immediate::new(15).unwrap().bits(),  0b01111);
    assert_eq!(Immediate::new(16),  Err(EncodingRangeError::new(Field::Immediate, 16)));
    assert_eq!(Immediate::new(-17), Err(EncodingRangeError::new(Field::Immediate, -17)));
  }

  #[test]
  fn reports_first_bad_field(){
    assert_eq!(
      Instruction::register(Operation::Mul, 1, 9, 2),
      Err(EncodingError::Range(EncodingRangeError::new(Field::Left, 9)))
    );
    assert_eq!(
      Instruction::immediate(Operation::SubImmediate, 3, 2, 40),
      Err(EncodingError::Range(EncodingRangeError::new(Field::Immediate, 40)))
    );
    assert_eq!(Instruction::print(-2), Err(EncodingRangeError::new(Field::Register, -2)));
  }

  #[test]
  fn rejects_opcode_of_wrong_shape(){
    assert_eq!(
      Instruction::register(Operation::Exit, 1, 2, 3),
      Err(EncodingError::Shape(ShapeMismatchError { opcode: Operation::Exit, expected: Shape::Register }))
    );
    assert_eq!(
      Instruction::register(Operation::AddImmediate, 1, 2, 3),
      Err(EncodingError::Shape(ShapeMismatchError { opcode: Operation::AddImmediate, expected: Shape::Register }))
    );
    assert_eq!(
      Instruction::immediate(Operation::Add, 1, 2, 3),
      Err(EncodingError::Shape(ShapeMismatchError { opcode: Operation::Add, expected: Shape::Immediate }))
    );
    // The opcode is checked before the operands.
    assert_eq!(
      Instruction::immediate(Operation::Print, 9, 9, 99),
      Err(EncodingError::Shape(ShapeMismatchError { opcode: Operation::Print, expected: Shape::Immediate }))
    );

    let message = format!("{}", Instruction::register(Operation::Exit, 1, 2, 3).unwrap_err());
    assert_eq!(message, "exit is a Nullary instruction, not Register");
  }

  #[test]
  fn every_instruction_matches_its_opcode_shape(){
    for op in Operation::iter() {
      let instruction = match op.shape() {
        Shape::Nullary   => Instruction::exit(),
        Shape::Unary     => Instruction::print(3).unwrap(),
        Shape::Register  => Instruction::register(op, 1, 2, 3).unwrap(),
        Shape::Immediate => Instruction::immediate(op, 1, 2, -3).unwrap(),
      };
      assert_eq!(instruction.opcode(), op);
      assert_eq!(instruction.shape(), op.shape());
    }
  }

  #[test]
  fn range_text(){
    assert_eq!(Field::Immediate.range(), "[-16, 15]");
    assert_eq!(Field::Destination.range(), "[0, 7]");
    assert_eq!(Field::Register.range(), "[0, 7]");
  }

  #[test]
  fn display(){
    let addi = Instruction::immediate(Operation::AddImmediate, 1, 0, -3).unwrap();
    assert_eq!(format!("{}", addi), "addi(R1, R0, -3)");
    let eq = Instruction::register(Operation::Eq, 4, 5, 6).unwrap();
    assert_eq!(format!("{}", eq), "eq(R4, R5, R6)");
    assert_eq!(format!("{}", Instruction::print(7).unwrap()), "print(R7)");
    assert_eq!(format!("{}", Instruction::exit()), "exit");
  }

}
