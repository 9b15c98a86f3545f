/*!
  An instruction encoder for a 16 bit teaching CPU and a generator for the memory image and
  Verilog testbench that load a program into the CPU's hardware model.

  A program is emitted into an `InstructionStream`, laid out into a `MemoryImage`, and
  wrapped in a testbench with `render_harness`:

  ```
  use progimage::{InstructionStream, MemoryImage, HarnessConfig, render_harness};

  let mut stream = InstructionStream::new();
  stream.add_immediate(1, 0, 1)?;
  stream.print(1)?;
  stream.exit();

  let image = MemoryImage::build(stream)?;
  let text  = render_harness(&image, &HarnessConfig::default());
  assert!(text.contains("assign program[0]= 16'b0100000000100001;"));
  # Ok::<(), progimage::GenerationError>(())
  ```
*/

#[macro_use] extern crate prettytable;
#[macro_use] extern crate lazy_static;

mod table;
pub mod register;
pub mod bytecode;
pub mod errors;
pub mod image;
pub mod harness;

pub use bytecode::{Instruction, InstructionStream, Operation, Word};
pub use errors::{
  CapacityExceededError, EncodingError, EncodingRangeError, GenerationError, ShapeMismatchError,
};
pub use harness::{render_harness, HarnessConfig};
pub use image::MemoryImage;
