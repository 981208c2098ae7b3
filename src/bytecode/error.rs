use std::fmt::{Display, Formatter};

use thiserror::Error;

/// The number of operands a mnemonic accepts.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct Arity {
  pub min: usize,
  pub max: usize,
}

impl Arity {
  pub const fn exactly(count: usize) -> Arity {
    Arity{ min: count, max: count }
  }

  pub fn accepts(&self, count: usize) -> bool {
    self.min <= count && count <= self.max
  }
}

impl Display for Arity {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self.min == self.max {
      true  => write!(f, "{}", self.min),
      false => write!(f, "{} or {}", self.min, self.max)
    }
  }
}

/**
  Why a single line of assembly could not be encoded. Every variant names the offending token so
  the message is useful on its own. None of these abort a batch; the line is reported and the
  next one is assembled.
*/
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum EncodeError {
  #[error("empty line")]
  EmptyLine,

  #[error("{mnemonic} is not an operation")]
  UnknownMnemonic { mnemonic: String },

  #[error("{mnemonic} requires {expected} operands but was given {found}")]
  OperandCountMismatch { mnemonic: String, expected: Arity, found: usize },

  #[error("{name} is not a register")]
  UnknownRegister { name: String },

  #[error("{name} is not a condition")]
  UnknownCondition { name: String },

  #[error("{literal} is not an unsigned decimal or 0x-prefixed hexadecimal number")]
  InvalidImmediate { literal: String },

  #[error("{literal} does not fit in {bits} bits")]
  ImmediateOutOfRange { literal: String, bits: u32 },
}
