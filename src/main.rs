use std::env;
use std::fs;
use std::process;

use progimage::{render_harness, GenerationError, HarnessConfig, InstructionStream, MemoryImage};

const DEFAULT_OUTPUT: &str = "program.v";

/// The program loaded into the testbench: load 1 into R1, print it, stop.
fn emit_program(stream: &mut InstructionStream) -> Result<(), GenerationError> {
  stream.add_immediate(1, 0, 1)?;
  stream.print(1)?;
  stream.exit();
  Ok(())
}

fn run(output: &str) -> Result<(), GenerationError> {
  let mut stream = InstructionStream::new();
  emit_program(&mut stream)?;

  #[cfg(feature = "trace_emission")]
  println!("Instruction Stream:\n{}", stream);

  let image = MemoryImage::build(stream)?;

  #[cfg(feature = "trace_emission")]
  println!("Memory Image:\n{}", image);

  fs::write(output, render_harness(&image, &HarnessConfig::default()))?;
  log::info!("Wrote {} program words to {}", image.program_length(), output);
  Ok(())
}

fn main() {
  #[cfg(feature = "trace_emission")]
  println!("Emission Tracing ENABLED");

  let output = env::args().nth(1).unwrap_or_else(|| DEFAULT_OUTPUT.to_string());

  if let Err(e) = run(&output) {
    eprintln!("Error: {}", e);
    process::exit(1);
  }
}
