//! A register operand. Registers are numbered `R0` through `R7` and occupy a 3 bit field.

use std::convert::TryFrom;
use std::fmt::{Display, Formatter};

use crate::bytecode::{Field, REGISTER_BITS};
use crate::errors::EncodingRangeError;

pub type RegisterNumberType = u8;

pub const REGISTER_COUNT: usize = 1 << REGISTER_BITS;

/// A validated register index. Construction is the only place the range is checked, so a
/// `Register` in hand always fits its field.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub struct Register(RegisterNumberType);

impl Register {

  /// Checks that `index` names one of the eight registers. The `field` is only used to
  /// report which operand was out of range.
  pub fn new(field: Field, index: i32) -> Result<Register, EncodingRangeError> {
    match usize::try_from(index) {
      Ok(i) if i < REGISTER_COUNT => Ok(Register(i as RegisterNumberType)),
      _ => Err(EncodingRangeError::new(field, index))
    }
  }

  /// Converts the register to an index into a register file.
  pub fn idx(&self) -> usize {
    self.0 as usize
  }

  /// The unsigned field value of the register.
  pub fn bits(&self) -> u16 {
    self.0 as u16
  }

}

impl Display for Register {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "R{}", self.0)
  }
}
