/*!

  The target CPU uses a 16 bit word, and every instruction is exactly one word. Memory
  addresses index words, not bytes. The sizes of instruction components are as follows:

    Opcode:     5 bits
    Register:   3 bits (eight registers, `R0` through `R7`)
    Immediate:  5 bits, two's complement (-16 through 15)

  Fields are packed most significant bit first in the order given by the instruction's
  shape, with reserved trailing bits filling the word out to 16 bits:

    Register-register   [OpCode:5][Left:3][Right:3][Destination:3][Reserved:2]
    Register-immediate  [OpCode:5][Source:3][Destination:3][Immediate:5]
    Print               [OpCode:5][Register:3][Reserved:8]
    Exit                [OpCode:5][Reserved:11]

  Reserved bits are always zero.

  As with opcodes in a byte oriented VM, the opcode alone determines the shape of the
  instruction, so the opcode is an enum while the operands live in the `Instruction`
  variants. An `Instruction` is the unencoded, validated form; a `Word` is what ends up in
  the memory image.

*/

mod binary;
mod instruction;
mod stream;

pub use binary::{
  encode_instruction, to_binary_literal,
  encode_exit, encode_print,
  encode_add, encode_sub, encode_mul, encode_div, encode_eq, encode_ne,
  encode_add_immediate, encode_sub_immediate,
};
#[cfg(test)]
pub(crate) use binary::try_decode_instruction;
pub use instruction::{Field, Immediate, Instruction, Operation, Shape};
pub(crate) use instruction::Operands;
pub use stream::InstructionStream;

// If you change this you must also change `binary::pack` and `binary::to_binary_literal`.
pub type Word = u16;
/// The position of a word in the instruction stream, which is also its address in memory.
pub type Address = usize;

pub const WORD_BITS      : u32 = 16;
pub const OPCODE_BITS    : u32 = 5;
pub const REGISTER_BITS  : u32 = 3;
pub const IMMEDIATE_BITS : u32 = 5;

pub const IMMEDIATE_MIN : i32 = -(1 << (IMMEDIATE_BITS - 1));
pub const IMMEDIATE_MAX : i32 = (1 << (IMMEDIATE_BITS - 1)) - 1;
