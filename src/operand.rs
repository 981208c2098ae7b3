/*!
  Register and condition operands. Both are fixed tables that are bijections between a name and
  a small code. The derives generate both directions at compile time: `strum` maps names to
  variants and back, `num_enum` maps codes to variants and back.

  Decoding never needs the fallible direction. A field extracted from a word is already masked
  to its width, and every value of that width names a variant, so `from_field` is total.
*/

use std::convert::TryFrom;
use std::str::FromStr;

use strum_macros::{Display as StrumDisplay, EnumIter, EnumString, IntoStaticStr};
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// General purpose registers `A` through `P`, encoded in 4 bits.
#[derive(
StrumDisplay, IntoStaticStr, EnumString, EnumIter, TryFromPrimitive, IntoPrimitive,
Clone,        Copy,          Eq, PartialEq,  Debug,    Hash
)]
#[repr(u8)]
pub enum Register {
  A, B, C, D,
  E, F, G, H,
  I, J, K, L,
  M, N, O, P,
}

/// Indexed by code. Must list the variants in declaration order.
const REGISTERS: [Register; 16] = [
  Register::A, Register::B, Register::C, Register::D,
  Register::E, Register::F, Register::G, Register::H,
  Register::I, Register::J, Register::K, Register::L,
  Register::M, Register::N, Register::O, Register::P,
];

pub const REGISTER_BITS: u32 = 4;

impl Register {
  pub fn code(&self) -> u8 {
    Into::<u8>::into(*self)
  }

  pub fn name(&self) -> &'static str {
    Into::<&'static str>::into(*self)
  }

  pub fn from_name(name: &str) -> Option<Register> {
    Register::from_str(name).ok()
  }

  pub fn from_code(code: u8) -> Option<Register> {
    Register::try_from(code).ok()
  }

  /// Bits above the field width are ignored.
  pub fn from_field(bits: u32) -> Register {
    REGISTERS[(bits & 0x0F) as usize]
  }
}

/**
  Condition codes gating a jump: always, zero, negative, carry. Encoded in 2 bits.
*/
#[derive(
StrumDisplay, IntoStaticStr, EnumString, EnumIter, TryFromPrimitive, IntoPrimitive,
Clone,        Copy,          Eq, PartialEq,  Debug,    Hash
)]
#[repr(u8)]
pub enum Condition {
  #[strum(serialize = "AL")]
  Always,
  #[strum(serialize = "Z")]
  Zero,
  #[strum(serialize = "N")]
  Negative,
  #[strum(serialize = "C")]
  Carry,
}

const CONDITIONS: [Condition; 4] = [
  Condition::Always, Condition::Zero, Condition::Negative, Condition::Carry
];

pub const CONDITION_BITS: u32 = 2;

impl Condition {
  pub fn code(&self) -> u8 {
    Into::<u8>::into(*self)
  }

  pub fn name(&self) -> &'static str {
    Into::<&'static str>::into(*self)
  }

  pub fn from_name(name: &str) -> Option<Condition> {
    Condition::from_str(name).ok()
  }

  pub fn from_code(code: u8) -> Option<Condition> {
    Condition::try_from(code).ok()
  }

  /// Bits above the field width are ignored.
  pub fn from_field(bits: u32) -> Condition {
    CONDITIONS[(bits & 0x03) as usize]
  }
}
