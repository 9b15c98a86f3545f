//! Renders the Verilog testbench that loads a memory image into the CPU model, runs it from
//! reset, prints every displayed value and stops when the model raises `finish`.

use crate::image::MemoryImage;

/// The parts of the testbench that vary between simulation setups.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HarnessConfig {
  /// Name of the generated testbench module.
  pub module_name       : String,
  /// File `` `include ``d for the CPU model.
  pub model_include     : String,
  /// Module name of the CPU model.
  pub model_name        : String,
  /// The clock toggles every `clock_half_period` time units.
  pub clock_half_period : u32,
  /// How long reset is held high at the start of simulation.
  pub reset_duration    : u32,
}

impl Default for HarnessConfig {
  fn default() -> HarnessConfig {
    HarnessConfig {
      module_name       : "Test".to_string(),
      model_include     : "computer.v".to_string(),
      model_name        : "Computer".to_string(),
      clock_half_period : 5,
      reset_duration    : 10,
    }
  }
}

/// Produces the testbench text. Every word of the image gets its own assignment, in
/// ascending address order, so the model always sees exactly 4096 words.
pub fn render_harness(image: &MemoryImage, config: &HarnessConfig) -> String {
  let mut text = String::new();

  text.push_str(format!("`include \"{}\"\n", config.model_include).as_str());
  text.push_str(format!("module {}();\n\n", config.module_name).as_str());
  text.push_str("    reg clk, rst;\n\n");
  text.push_str(format!("    always #{} clk=~clk;\n\n", config.clock_half_period).as_str());
  text.push_str(format!("    wire[{}:0][15:0] program;\n\n", image.len() - 1).as_str());

  for (address, literal) in image.literals() {
    text.push_str(format!("\tassign program[{}]= 16'b{};\n", address, literal).as_str());
  }

  text.push_str("\n");
  text.push_str("    wire finish, toDisplay;\n");
  text.push_str("    wire[15:0] display;\n");
  text.push_str(
    format!(
      "    {} computer(clk, rst, program, finish, toDisplay, display);\n\n",
      config.model_name
    ).as_str()
  );
  text.push_str("    initial begin\n");
  text.push_str("        clk=0; rst=1;\n");
  text.push_str(format!("        #{}; rst=0;\n", config.reset_duration).as_str());
  text.push_str("    end\n\n");
  text.push_str("    always @(negedge clk) begin\n");
  text.push_str("        if(~rst & toDisplay)\n");
  text.push_str("            $display(\"%d\", $signed(display));\n");
  text.push_str("        if(~rst & finish)\n");
  text.push_str("            $finish;\n\n");
  text.push_str("    end\n");
  text.push_str("endmodule\n");
  text
}
