use std::convert::TryFrom;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use strum_macros::{Display as StrumDisplay, EnumIter, EnumString, IntoStaticStr};
use num_enum::{TryFromPrimitive, IntoPrimitive};

use crate::bytecode::Word;
use crate::catalog::{self, Family, IMMEDIATE_BITS, JUMP_MODE};
use crate::operand::{Condition, Register};

/**
  Opcodes of the instruction set. The discriminant of each variant is its 6 bit opcode, so the
  order the opcodes are listed below is significant.
*/
#[derive(
StrumDisplay, IntoStaticStr, EnumString, EnumIter, TryFromPrimitive, IntoPrimitive,
Clone,        Copy,          Eq, PartialEq,  Debug,    Hash
)]
#[repr(u8)]
pub enum Operation {
  #[strum(serialize = "NOP")]   Nop,    // 0b000000
  #[strum(serialize = "LOAD")]  Load,   // 0b000001
  #[strum(serialize = "STORE")] Store,  // 0b000010
  #[strum(serialize = "LDI")]   Ldi,    // 0b000011
  #[strum(serialize = "MOV")]   Mov,    // 0b000100
  #[strum(serialize = "ADD")]   Add,    // 0b000101
  #[strum(serialize = "SUB")]   Sub,    // 0b000110
  #[strum(serialize = "CMP")]   Cmp,    // 0b000111
  #[strum(serialize = "AND")]   And,    // 0b001000
  #[strum(serialize = "OR")]    Or,     // 0b001001
  #[strum(serialize = "XOR")]   Xor,    // 0b001010
  #[strum(serialize = "NOT")]   Not,    // 0b001011
  #[strum(serialize = "INC")]   Inc,    // 0b001100
  #[strum(serialize = "DEC")]   Dec,    // 0b001101
  #[strum(serialize = "JMP")]   Jmp,    // 0b001110
  #[strum(serialize = "IN")]    In,     // 0b001111
  #[strum(serialize = "OUT")]   Out,    // 0b010000
}

impl Operation {
  pub fn code(&self) -> u8 {
    Into::<u8>::into(*self)
  }

  pub fn name(&self) -> &'static str {
    Into::<&'static str>::into(*self)
  }

  pub fn from_name(name: &str) -> Option<Operation> {
    Operation::from_str(name).ok()
  }

  pub fn from_code(code: u8) -> Option<Operation> {
    Operation::try_from(code).ok()
  }

  pub fn family(&self) -> Family {
    catalog::family_of(*self)
  }
}

/**
  The four spellings of the `JMP` opcode. The discriminant of each variant is the value of the
  mode bits, so this enum doubles as the mnemonic table for jumps.
*/
#[derive(
StrumDisplay, IntoStaticStr, EnumString, EnumIter, TryFromPrimitive, IntoPrimitive,
Clone,        Copy,          Eq, PartialEq,  Debug,    Hash
)]
#[repr(u8)]
pub enum JumpForm {
  /// Jump to the address held in a register.
  #[strum(serialize = "JMP")]  Register,
  /// Jump to the address stored in memory at the address held in a register.
  #[strum(serialize = "JMPM")] Memory,
  /// Jump to an absolute address.
  #[strum(serialize = "JMPA")] Absolute,
  /// Jump by an offset from the current address.
  #[strum(serialize = "JMPR")] Relative,
}

const JUMP_FORMS: [JumpForm; 4] = [
  JumpForm::Register, JumpForm::Memory, JumpForm::Absolute, JumpForm::Relative
];

impl JumpForm {
  pub fn mode(&self) -> u8 {
    Into::<u8>::into(*self)
  }

  pub fn name(&self) -> &'static str {
    Into::<&'static str>::into(*self)
  }

  pub fn from_name(name: &str) -> Option<JumpForm> {
    JumpForm::from_str(name).ok()
  }

  /// Reads the mode bits of a `JMP` word. Total, since all four modes are assigned.
  pub fn from_word(word: Word) -> JumpForm {
    JUMP_FORMS[JUMP_MODE.extract(word) as usize]
  }

  /// Whether the target comes from a register (`JMP`, `JMPM`) rather than the word itself.
  pub fn is_indirect(&self) -> bool {
    self.mode() & 0b10 == 0
  }
}

/// An unsigned immediate operand, guaranteed to fit in 22 bits.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub struct Immediate(u32);

impl Immediate {
  pub const MAX: u32 = (1 << IMMEDIATE_BITS) - 1;

  pub fn new(value: u32) -> Option<Immediate> {
    match value <= Immediate::MAX {
      true  => Some(Immediate(value)),
      false => None
    }
  }

  /// Bits above the field width are ignored.
  pub fn from_field(bits: u32) -> Immediate {
    Immediate(bits & Immediate::MAX)
  }

  pub fn value(&self) -> u32 {
    self.0
  }
}

impl Display for Immediate {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

/**
  Holds the unencoded components of an instruction, one variant per operand layout. It is the
  caller's responsibility to pair an opcode with the variant of its family; instructions built
  by the assembler or the decoder always are.
*/
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Instruction {
  /// [OpCode:6][Reserved:26]
  NoOperand(Operation),

  /// [OpCode:6][Src:4][Dst:4][Flag:1][Reserved:17]
  RegisterAlu {
    opcode : Operation,
    src    : Register,
    dst    : Register,
    flag   : bool
  },

  /// [OpCode:6][Src:4][Dst:4][Reserved:18]
  PortIo {
    opcode : Operation,
    src    : Register,
    dst    : Register
  },

  /// [LDI:6][Dst:4][Imm:22]
  LoadImmediate {
    dst       : Register,
    immediate : Immediate
  },

  /// [JMP:6][Reg:4][Cond:2][Reserved:18][Mode:2], `JMP` (mode 00) or `JMPM` (mode 01)
  JumpIndirect {
    condition : Condition,
    register  : Register,
    memory    : bool
  },

  /// [JMP:6][Cond:2][Imm:22][Mode:2], `JMPA` (mode 10) or `JMPR` (mode 11)
  JumpDirect {
    condition : Condition,
    target    : Immediate,
    relative  : bool
  },
}

impl Instruction {
  pub fn opcode(&self) -> Operation {
    match self {
      Instruction::NoOperand(opcode)         => *opcode,
      Instruction::RegisterAlu { opcode, .. } => *opcode,
      Instruction::PortIo { opcode, .. }      => *opcode,
      Instruction::LoadImmediate { .. }       => Operation::Ldi,
      Instruction::JumpIndirect { .. }
      | Instruction::JumpDirect { .. }        => Operation::Jmp,
    }
  }

  /// `None` unless this is a jump.
  pub fn jump_form(&self) -> Option<JumpForm> {
    match self {
      Instruction::JumpIndirect { memory: false, .. }  => Some(JumpForm::Register),
      Instruction::JumpIndirect { memory: true, .. }   => Some(JumpForm::Memory),
      Instruction::JumpDirect { relative: false, .. }  => Some(JumpForm::Absolute),
      Instruction::JumpDirect { relative: true, .. }   => Some(JumpForm::Relative),
      _ => None
    }
  }

  /// The mnemonic as written in assembly, which for jumps depends on the form.
  pub fn mnemonic(&self) -> &'static str {
    match self.jump_form() {
      Some(form) => form.name(),
      None       => self.opcode().name()
    }
  }
}

impl Display for Instruction {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let mnemonic = self.mnemonic();
    match self {

      Instruction::NoOperand(_) => {
        write!(f, "{}", mnemonic)
      }

      // A zero flag is the default and is left out.
      Instruction::RegisterAlu { src, dst, flag, .. } => {
        write!(f, "{} {} {}", mnemonic, src, dst)?;
        if *flag {
          write!(f, " 1")?;
        }
        Ok(())
      }

      Instruction::PortIo { src, dst, .. } => {
        write!(f, "{} {} {}", mnemonic, src, dst)
      }

      Instruction::LoadImmediate { dst, immediate } => {
        write!(f, "{} {} {}", mnemonic, dst, immediate)
      }

      Instruction::JumpIndirect { condition, register, .. } => {
        write!(f, "{} {} {}", mnemonic, condition, register)
      }

      Instruction::JumpDirect { condition, target, .. } => {
        write!(f, "{} {} {}", mnemonic, condition, target)
      }

    }
  }
}

/**
  The result of decoding one word. An unassigned opcode is a value, not a failure: the word is
  kept so that it can be shown as-is.
*/
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum DecodedLine {
  Instruction(Instruction),
  Unknown {
    raw_opcode : u8,
    word       : Word
  },
}

impl DecodedLine {
  pub fn instruction(&self) -> Option<&Instruction> {
    match self {
      DecodedLine::Instruction(instruction) => Some(instruction),
      DecodedLine::Unknown { .. }           => None
    }
  }

  pub fn is_unknown(&self) -> bool {
    self.instruction().is_none()
  }
}

impl Display for DecodedLine {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      DecodedLine::Instruction(instruction) => write!(f, "{}", instruction),
      DecodedLine::Unknown { word, .. }     => write!(f, "??? 0x{:08x}", word)
    }
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use strum::IntoEnumIterator;

  #[test]
  fn opcode_table_is_bijective(){
    for (expected_code, operation) in Operation::iter().enumerate() {
      assert_eq!(operation.code() as usize, expected_code);
      assert_eq!(Operation::from_code(operation.code()), Some(operation));
      assert_eq!(Operation::from_name(operation.name()), Some(operation));
    }
    assert_eq!(Operation::from_code(17), None);
    assert_eq!(Operation::from_name("JMPM"), None);
    assert_eq!(Operation::from_name("add"), None);
  }

  #[test]
  fn opcode_values(){
    assert_eq!(Operation::Add.code(), 0b000101);
    assert_eq!(Operation::Jmp.code(), 0b001110);
    assert_eq!(Operation::Out.code(), 0b010000);
    assert_eq!(Operation::Ldi.name(), "LDI");
  }

  #[test]
  fn jump_forms_are_modes(){
    for form in JumpForm::iter() {
      assert_eq!(JumpForm::from_name(form.name()), Some(form));
      assert_eq!(JumpForm::from_word(form.mode() as Word), form);
      assert_eq!(JumpForm::try_from(form.mode()).ok(), Some(form));
    }
    assert_eq!(JumpForm::from_name("JMP").map(|f| f.mode()), Some(0b00));
    assert_eq!(JumpForm::from_name("JMPM").map(|f| f.mode()), Some(0b01));
    assert_eq!(JumpForm::from_name("JMPA").map(|f| f.mode()), Some(0b10));
    assert_eq!(JumpForm::from_name("JMPR").map(|f| f.mode()), Some(0b11));
    assert!(JumpForm::Memory.is_indirect());
    assert!(!JumpForm::Absolute.is_indirect());
  }

  #[test]
  fn immediate_bounds(){
    assert_eq!(Immediate::MAX, 4_194_303);
    assert_eq!(Immediate::new(4_194_303).map(|i| i.value()), Some(4_194_303));
    assert_eq!(Immediate::new(4_194_304), None);
    assert_eq!(Immediate::from_field(0xFFFF_FFFF).value(), Immediate::MAX);
  }

  #[test]
  fn canonical_text(){
    let add = Instruction::RegisterAlu {
      opcode: Operation::Add, src: Register::A, dst: Register::B, flag: false
    };
    assert_eq!(add.to_string(), "ADD A B");

    let add = Instruction::RegisterAlu {
      opcode: Operation::Add, src: Register::A, dst: Register::B, flag: true
    };
    assert_eq!(add.to_string(), "ADD A B 1");

    let jump = Instruction::JumpIndirect {
      condition: Condition::Zero, register: Register::A, memory: true
    };
    assert_eq!(jump.to_string(), "JMPM Z A");
    assert_eq!(jump.opcode(), Operation::Jmp);

    let jump = Instruction::JumpDirect {
      condition: Condition::Carry, target: Immediate::from_field(10), relative: true
    };
    assert_eq!(jump.to_string(), "JMPR C 10");

    let ldi = Instruction::LoadImmediate { dst: Register::P, immediate: Immediate::from_field(255) };
    assert_eq!(ldi.to_string(), "LDI P 255");
    assert_eq!(ldi.jump_form(), None);

    assert_eq!(Instruction::NoOperand(Operation::Nop).to_string(), "NOP");
  }

  #[test]
  fn unknown_text(){
    let unknown = DecodedLine::Unknown { raw_opcode: 0b111111, word: 0xFC00_0001 };
    assert_eq!(unknown.to_string(), "??? 0xfc000001");
    assert!(unknown.is_unknown());
  }
}
