/*!
  Buffers for the interactive front ends. A session collects input until the user asks for it to
  be processed, then hands the whole batch to the codec in order. Nothing here knows about
  prompts or terminals.
*/

use nom::{
  bytes::complete::tag_no_case,
  character::complete::{hex_digit1, space0},
  combinator::{all_consuming, opt},
  sequence::{delimited, preceded},
  IResult
};
use thiserror::Error;
use tracing::info;

use crate::bytecode::{assemble_program, decode_instruction, AssembledLine, DecodedLine, Word};

/// Hex digits in one word.
const WORD_DIGITS: usize = 8;

#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum HexWordError {
  #[error("{text:?} is not a hexadecimal word")]
  NotHex { text: String },

  #[error("{text} has more than {} hex digits", WORD_DIGITS)]
  TooWide { text: String },
}

fn hex_word(text: &str) -> IResult<&str, &str> {
  delimited(space0, preceded(opt(tag_no_case("0x")), hex_digit1), space0)(text)
}

/// Parses one word written in hexadecimal, with or without a `0x` prefix. Zero padding is allowed.
pub fn parse_hex_word(text: &str) -> Result<Word, HexWordError> {
  let digits = match all_consuming(hex_word)(text) {
    Ok((_rest, digits)) => digits,
    Err(_) => return Err(HexWordError::NotHex { text: text.to_string() })
  };
  // Leading zeros do not count against the width.
  let significant = digits.trim_start_matches('0');
  if significant.len() > WORD_DIGITS {
    return Err(HexWordError::TooWide { text: text.trim().to_string() });
  }
  match significant.is_empty() {
    true  => Ok(0),
    false => Word::from_str_radix(significant, 16)
               .map_err(|_| HexWordError::NotHex { text: text.to_string() })
  }
}


/// An append-only buffer of source lines.
#[derive(Clone, Debug, Default)]
pub struct AssemblerSession {
  program: Vec<String>,
}

impl AssemblerSession {
  pub fn new() -> AssemblerSession {
    AssemblerSession::default()
  }

  pub fn push_line(&mut self, line: &str) {
    self.program.push(line.to_string());
  }

  pub fn lines(&self) -> &[String] {
    &self.program
  }

  pub fn is_empty(&self) -> bool {
    self.program.is_empty()
  }

  /// Assembles the buffered program. The buffer is left as is.
  pub fn compile(&self) -> Vec<AssembledLine> {
    info!(lines = self.program.len(), "compiling program");
    assemble_program(&self.program)
  }

  pub fn clear(&mut self) {
    self.program.clear();
  }
}


/// An append-only buffer of words.
#[derive(Clone, Debug, Default)]
pub struct DisassemblerSession {
  words: Vec<Word>,
}

impl DisassemblerSession {
  pub fn new() -> DisassemblerSession {
    DisassemblerSession::default()
  }

  pub fn push_word(&mut self, word: Word) {
    self.words.push(word);
  }

  pub fn words(&self) -> &[Word] {
    &self.words
  }

  pub fn is_empty(&self) -> bool {
    self.words.is_empty()
  }

  /// Decodes the buffered words, pairing each with its decoding. The buffer is left as is.
  pub fn decompile(&self) -> Vec<(Word, DecodedLine)> {
    info!(words = self.words.len(), "decompiling words");
    self.words
        .iter()
        .map(|word| (*word, decode_instruction(*word)))
        .collect()
  }

  pub fn clear(&mut self) {
    self.words.clear();
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use crate::bytecode::EncodeError;

  #[test]
  fn hex_words(){
    assert_eq!(parse_hex_word("14040000"), Ok(0x1404_0000));
    assert_eq!(parse_hex_word("0x1404abcd"), Ok(0x1404_ABCD));
    assert_eq!(parse_hex_word("0X0"), Ok(0));
    assert_eq!(parse_hex_word("  ff \t"), Ok(0xFF));
    assert_eq!(parse_hex_word("FFFFFFFF"), Ok(Word::max_value()));
  }

  #[test]
  fn bad_hex_words(){
    assert!(matches!(parse_hex_word(""), Err(HexWordError::NotHex { .. })));
    assert!(matches!(parse_hex_word("0x"), Err(HexWordError::NotHex { .. })));
    assert!(matches!(parse_hex_word("xyz"), Err(HexWordError::NotHex { .. })));
    assert!(matches!(parse_hex_word("12 34"), Err(HexWordError::NotHex { .. })));
    assert_eq!(
      parse_hex_word("123456789"),
      Err(HexWordError::TooWide { text: "123456789".to_string() })
    );
  }

  #[test]
  fn zero_padded_hex_words(){
    assert_eq!(parse_hex_word("000000001"), Ok(1));
    assert_eq!(parse_hex_word("0x0000000000ff"), Ok(0xFF));
    assert_eq!(parse_hex_word("00000000"), Ok(0));
    assert_eq!(parse_hex_word("0000000000000000"), Ok(0));
    assert_eq!(parse_hex_word("0000FFFFFFFF"), Ok(Word::max_value()));
    assert_eq!(
      parse_hex_word("0100000000"),
      Err(HexWordError::TooWide { text: "0100000000".to_string() })
    );
  }

  #[test]
  fn assembler_session(){
    let mut session = AssemblerSession::new();
    assert!(session.is_empty());
    session.push_line("LDI A 0x10");
    session.push_line("");
    session.push_line("BAD A B");
    session.push_line("JMPR AL 4");
    assert_eq!(session.lines().len(), 4);

    let assembled = session.compile();
    assert_eq!(assembled.len(), 3);
    assert_eq!(assembled[0].source, "LDI A 0x10");
    assert_eq!(
      assembled[1].result,
      Err(EncodeError::UnknownMnemonic { mnemonic: "BAD".to_string() })
    );
    assert_eq!(assembled[2].source, "JMPR AL 4");

    // Compiling does not consume the program.
    assert_eq!(session.compile(), assembled);
    session.clear();
    assert!(session.is_empty());
    assert!(session.compile().is_empty());
  }

  #[test]
  fn disassembler_session(){
    let mut session = DisassemblerSession::new();
    session.push_word(0x1404_0000);
    session.push_word(0xFFFF_FFFF);
    session.push_word(0);
    let decoded = session.decompile();
    assert_eq!(decoded.len(), 3);
    assert_eq!(decoded[0].0, 0x1404_0000);
    assert_eq!(decoded[0].1.to_string(), "ADD A B");
    assert!(decoded[1].1.is_unknown());
    assert_eq!(decoded[2].1.to_string(), "NOP");
    session.clear();
    assert!(session.words().is_empty());
  }
}
