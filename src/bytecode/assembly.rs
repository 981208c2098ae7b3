/*!
  The human readable textual form of an instruction is called assembly. One line of assembly is
  a mnemonic followed by whitespace separated operands:

  ```text
  ADD A B        RegisterAlu, flag defaults to 0
  ADD A B 1      RegisterAlu with the flag set
  IN C D         PortIo
  LDI P 0xFF     LoadImmediate
  JMP Z A        jump to the address in A if zero
  JMPM Z A       jump to the address stored at the address in A if zero
  JMPA AL 100    jump to address 100
  JMPR C 10      jump 10 ahead if carry
  NOP
  ```

  Every operand is resolved through its table and range checked before anything is packed. A
  lookup that fails is reported; it never falls back to code zero.
*/

use nom::{
  branch::alt,
  bytes::complete::tag,
  character::complete::{digit1, hex_digit1},
  combinator::{all_consuming, map},
  sequence::preceded,
  IResult
};
use tracing::{debug, warn};

use super::{Arity, EncodeError, Immediate, Instruction, JumpForm, Operation, Word};
use super::binary::encode_instruction;
use crate::catalog::{Family, FLAG, IMMEDIATE_BITS};
use crate::operand::{Condition, Register};

/// One source line together with what became of it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AssembledLine {
  pub source : String,
  pub result : Result<Word, EncodeError>,
}

/// The register ALU flag is optional.
const ALU_ARITY: Arity = Arity{ min: 2, max: 3 };

/// What the first token of a line names.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Mnemonic {
  /// One of the four spellings of `JMP`.
  Jump(JumpForm),
  /// Any other opcode, spelled by its own name.
  Plain(Operation),
}

/**
  Resolves the mnemonic. Plain `JMP` is itself a jump spelling, so the jump table is consulted
  first and `Operation::Jmp` never comes back as `Mnemonic::Plain`.
*/
fn resolve_mnemonic(mnemonic: &str) -> Result<Mnemonic, EncodeError> {
  if let Some(form) = JumpForm::from_name(mnemonic) {
    return Ok(Mnemonic::Jump(form));
  }
  match Operation::from_name(mnemonic) {
    Some(operation) => Ok(Mnemonic::Plain(operation)),
    None => Err(EncodeError::UnknownMnemonic { mnemonic: mnemonic.to_string() })
  }
}

fn check_arity(mnemonic: &str, operands: &[&str], expected: Arity) -> Result<(), EncodeError> {
  match expected.accepts(operands.len()) {
    true  => Ok(()),
    false => Err(EncodeError::OperandCountMismatch {
      mnemonic: mnemonic.to_string(),
      expected,
      found: operands.len()
    })
  }
}

fn parse_register(name: &str) -> Result<Register, EncodeError> {
  Register::from_name(name)
    .ok_or_else(|| EncodeError::UnknownRegister { name: name.to_string() })
}

fn parse_condition(name: &str) -> Result<Condition, EncodeError> {
  Condition::from_name(name)
    .ok_or_else(|| EncodeError::UnknownCondition { name: name.to_string() })
}

/// Splits a numeric literal into its radix and digits: `0x`/`0X` hexadecimal, else decimal.
fn numeral(text: &str) -> IResult<&str, (u32, &str)> {
  alt((
    map(preceded(alt((tag("0x"), tag("0X"))), hex_digit1), |digits| (16, digits)),
    map(digit1, |digits| (10, digits)),
  ))(text)
}

/**
  Parses an unsigned literal that must fit in `bits` bits. A well formed literal that is too big
  for any integer is out of range rather than invalid.
*/
fn parse_unsigned(literal: &str, bits: u32) -> Result<u32, EncodeError> {
  let (radix, digits) = match all_consuming(numeral)(literal) {
    Ok((_rest, parsed)) => parsed,
    Err(_) => return Err(EncodeError::InvalidImmediate { literal: literal.to_string() })
  };
  let max: u64 = (1 << bits) - 1;
  match u64::from_str_radix(digits, radix) {
    Ok(value) if value <= max => Ok(value as u32),
    _ => Err(EncodeError::ImmediateOutOfRange { literal: literal.to_string(), bits })
  }
}

fn parse_immediate(literal: &str) -> Result<Immediate, EncodeError> {
  let value = parse_unsigned(literal, IMMEDIATE_BITS)?;
  Immediate::new(value)
    .ok_or_else(|| EncodeError::ImmediateOutOfRange { literal: literal.to_string(), bits: IMMEDIATE_BITS })
}

fn parse_flag(literal: &str) -> Result<bool, EncodeError> {
  Ok(parse_unsigned(literal, FLAG.width)? == 1)
}

/**
  Validates one tokenized line and builds the instruction it names. Operands are checked left to
  right, so the first bad operand decides the error.
*/
pub fn assemble_tokens<S: AsRef<str>>(tokens: &[S]) -> Result<Instruction, EncodeError> {
  let (mnemonic, operands) = match tokens.split_first() {
    Some((mnemonic, operands)) => (mnemonic.as_ref(), operands),
    None => return Err(EncodeError::EmptyLine)
  };
  let operands: Vec<&str> = operands.iter().map(|token| token.as_ref()).collect();
  let operation = match resolve_mnemonic(mnemonic)? {
    Mnemonic::Jump(form) => return assemble_jump(mnemonic, form, &operands),
    Mnemonic::Plain(operation) => operation,
  };

  let instruction = match operation.family() {

    Family::NoOperand => {
      check_arity(mnemonic, &operands, Arity::exactly(0))?;
      Instruction::NoOperand(operation)
    }

    Family::RegisterAlu => {
      check_arity(mnemonic, &operands, ALU_ARITY)?;
      let src  = parse_register(operands[0])?;
      let dst  = parse_register(operands[1])?;
      let flag = match operands.get(2) {
        Some(literal) => parse_flag(literal)?,
        None          => false
      };
      Instruction::RegisterAlu { opcode: operation, src, dst, flag }
    }

    Family::PortIo => {
      check_arity(mnemonic, &operands, Arity::exactly(2))?;
      let src = parse_register(operands[0])?;
      let dst = parse_register(operands[1])?;
      Instruction::PortIo { opcode: operation, src, dst }
    }

    Family::LoadImmediate => {
      check_arity(mnemonic, &operands, Arity::exactly(2))?;
      let dst       = parse_register(operands[0])?;
      let immediate = parse_immediate(operands[1])?;
      Instruction::LoadImmediate { dst, immediate }
    }

    // Every spelling of `JMP` resolves to `Mnemonic::Jump` above.
    Family::Jump => unreachable!("JMP resolved as a plain mnemonic"),

  };

  Ok(instruction)
}

/// The jump layouts: a condition, then a register (`JMP`, `JMPM`) or an immediate (`JMPA`, `JMPR`).
fn assemble_jump(mnemonic: &str, form: JumpForm, operands: &[&str]) -> Result<Instruction, EncodeError> {
  check_arity(mnemonic, operands, Arity::exactly(2))?;
  let condition = parse_condition(operands[0])?;
  let instruction = match form {
    JumpForm::Register => Instruction::JumpIndirect {
      condition, register: parse_register(operands[1])?, memory: false
    },
    JumpForm::Memory => Instruction::JumpIndirect {
      condition, register: parse_register(operands[1])?, memory: true
    },
    JumpForm::Absolute => Instruction::JumpDirect {
      condition, target: parse_immediate(operands[1])?, relative: false
    },
    JumpForm::Relative => Instruction::JumpDirect {
      condition, target: parse_immediate(operands[1])?, relative: true
    },
  };
  Ok(instruction)
}

/// Validates and packs one tokenized line.
pub fn encode<S: AsRef<str>>(tokens: &[S]) -> Result<Word, EncodeError> {
  assemble_tokens(tokens).map(|instruction| encode_instruction(&instruction))
}

/// Splits a line on whitespace and encodes it.
pub fn assemble_line(line: &str) -> Result<Word, EncodeError> {
  let tokens: Vec<&str> = line.split_whitespace().collect();
  encode(&tokens)
}

/**
  Assembles every non-blank line, in order. A line that fails is reported in its slot and does
  not stop the lines after it.
*/
pub fn assemble_program<I, S>(lines: I) -> Vec<AssembledLine>
  where I: IntoIterator<Item = S>,
        S: AsRef<str>
{
  lines
    .into_iter()
    .filter(|line| !line.as_ref().trim().is_empty())
    .map(|line| {
      let source = line.as_ref().to_string();
      let result = assemble_line(&source);
      match &result {
        Ok(word) => debug!(line = %source, word = %format_args!("{:#010x}", word), "assembled"),
        Err(e)   => warn!(line = %source, error = %e, "rejected line"),
      }
      AssembledLine { source, result }
    })
    .collect()
}
