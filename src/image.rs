/*!
  The memory image is the program as the hardware model loads it: a fixed 65536 bit store of
  4096 sixteen bit words. The instruction stream occupies addresses `0..N` in program order
  and every remaining word is zero.

  Building an image is the single step from "unbuilt" to "built". It either produces a full
  image or fails with `CapacityExceededError`; programs are never truncated to fit.
*/

use std::fmt::{Display, Formatter};

use prettytable::Table;

use crate::bytecode::{to_binary_literal, Address, InstructionStream, Word, WORD_BITS};
use crate::errors::CapacityExceededError;
use crate::table::TABLE_DISPLAY_FORMAT;

pub const IMAGE_BITS  : usize = 1 << 16;
pub const IMAGE_WORDS : usize = IMAGE_BITS / WORD_BITS as usize;

#[derive(Clone, Eq, PartialEq)]
pub struct MemoryImage {
  words          : Vec<Word>,
  program_length : usize,
}

impl MemoryImage {

  /// Consumes the finished stream and lays it out from address zero.
  pub fn build(stream: InstructionStream) -> Result<MemoryImage, CapacityExceededError> {
    let words: Vec<Word> = stream.words().collect();
    MemoryImage::from_words(&words)
  }

  /// Lays out `program` from address zero and zero fills the rest of the image.
  pub fn from_words(program: &[Word]) -> Result<MemoryImage, CapacityExceededError> {
    if program.len() > IMAGE_WORDS {
      return Err(CapacityExceededError { length: program.len() });
    }

    let mut words = Vec::with_capacity(IMAGE_WORDS);
    words.extend_from_slice(program);
    words.resize(IMAGE_WORDS, 0);

    log::info!(
      "Built memory image: {} program words, {} padding words",
      program.len(),
      IMAGE_WORDS - program.len()
    );

    Ok(MemoryImage { words, program_length: program.len() })
  }

  /// The number of words taken from the instruction stream.
  pub fn program_length(&self) -> usize {
    self.program_length
  }

  /// Total width of the image in bits. Always 65536.
  pub fn bit_width(&self) -> usize {
    self.words.len() * WORD_BITS as usize
  }

  /// Total number of words in the image. Always 4096.
  pub fn len(&self) -> usize {
    self.words.len()
  }

  pub fn is_empty(&self) -> bool {
    self.words.is_empty()
  }

  /// The word at `address`, or `None` past the end of memory.
  pub fn word(&self, address: Address) -> Option<Word> {
    self.words.get(address).copied()
  }

  pub fn words(&self) -> &[Word] {
    &self.words
  }

  /// Every word as a 16 bit binary literal, in ascending address order.
  pub fn literals(&self) -> impl Iterator<Item = (Address, String)> + '_ {
    self.words.iter().enumerate().map(|(address, word)| (address, to_binary_literal(*word)))
  }
}

impl Display for MemoryImage {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let mut table = Table::new();

    table.set_format(*TABLE_DISPLAY_FORMAT);
    table.set_titles(row![ubr->"Address", ubl->"Contents"]);

    for (address, literal) in self.literals().take(self.program_length) {
      table.add_row(row![r->format!("M[{}] =", address), literal]);
    }

    write!(
      f,
      "{}\n{} of {} words used, {} zero words follow\n",
      table,
      self.program_length,
      self.len(),
      self.len() - self.program_length
    )
  }
}

// The derived `Debug` would print all 4096 words.
impl std::fmt::Debug for MemoryImage {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("MemoryImage")
      .field("program", &&self.words[..self.program_length])
      .field("bit_width", &self.bit_width())
      .finish()
  }
}


#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_program_is_all_zero(){
    let image = MemoryImage::build(InstructionStream::new()).unwrap();
    assert_eq!(image.len(), 4096);
    assert_eq!(image.bit_width(), 65536);
    assert_eq!(image.program_length(), 0);
    assert!(image.words().iter().all(|w| *w == 0));
  }

  #[test]
  fn program_then_padding(){
    let mut stream = InstructionStream::new();
    stream.add_immediate(1, 0, 1).unwrap();
    stream.add_immediate(2, 0, -4).unwrap();
    stream.mul(3, 1, 2).unwrap();
    stream.print(3).unwrap();
    stream.exit();
    let expected: Vec<Word> = stream.words().collect();

    let image = MemoryImage::build(stream).unwrap();
    assert_eq!(image.program_length(), 5);
    assert_eq!(&image.words()[..5], &expected[..]);
    assert!(image.words()[5..].iter().all(|w| *w == 0));
    assert_eq!(image.word(4095), Some(0));
    assert_eq!(image.word(4096), None);
  }

  #[test]
  fn exactly_full(){
    let program = vec![0b0000100100000000; IMAGE_WORDS];
    let image = MemoryImage::from_words(&program).unwrap();
    assert_eq!(image.program_length(), IMAGE_WORDS);
    assert_eq!(image.words(), &program[..]);
    assert_eq!(image.bit_width(), IMAGE_BITS);
  }

  #[test]
  fn one_word_too_many(){
    let mut stream = InstructionStream::new();
    for _ in 0..=IMAGE_WORDS {
      stream.print(2).unwrap();
    }
    assert_eq!(stream.len(), 4097);
    assert_eq!(MemoryImage::build(stream), Err(CapacityExceededError { length: 4097 }));
  }

  #[test]
  fn literals_ascend_from_zero(){
    let image = MemoryImage::from_words(&[0b0100000000100001, 0b0000100100000000]).unwrap();
    let literals: Vec<(Address, String)> = image.literals().collect();
    assert_eq!(literals.len(), 4096);
    assert_eq!(literals[0], (0, "0100000000100001".to_string()));
    assert_eq!(literals[1], (1, "0000100100000000".to_string()));
    assert_eq!(literals[2], (2, "0000000000000000".to_string()));
    assert!(literals.iter().enumerate().all(|(i, (address, _))| i == *address));
  }

  #[test]
  fn display_summarises_padding(){
    let image = MemoryImage::from_words(&[0b0100000000100001]).unwrap();
    let text = format!("{}", image);
    assert!(text.contains("M[0] ="));
    assert!(!text.contains("M[1] ="));
    assert!(text.contains("1 of 4096 words used, 4095 zero words follow"));
  }

}
