/*!
  The instruction format catalog: which operand layout an opcode uses, and where each field of
  that layout lives in a word. This module holds no behavior beyond lookups. Both the assembler
  and the decoder consult it, so the two can never disagree about a field position.

  ```text
  RegisterAlu    [OpCode:6][Src:4][Dst:4][Flag:1][Reserved:17]
  PortIo         [OpCode:6][Src:4][Dst:4][Reserved:18]
  LoadImmediate  [OpCode:6][Dst:4][Imm:22]
  JumpIndirect   [OpCode:6][Reg:4][Cond:2][Reserved:18][Mode:2]    Mode ∈ {00, 01}
  JumpDirect     [OpCode:6][Cond:2][Imm:22][Mode:2]                 Mode ∈ {10, 11}
  NoOperand      [OpCode:6][Reserved:26]
  ```
*/

use crate::bytecode::{Operation, Word};
use crate::operand::{CONDITION_BITS, REGISTER_BITS};

/**
  The operand layout family of an opcode. `Jump` is the only family that is not a single layout:
  the mode bits of the word choose between the indirect and the direct jump layouts.
*/
#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash)]
pub enum Family {
  NoOperand,
  RegisterAlu,
  PortIo,
  LoadImmediate,
  Jump,
}

pub fn family_of(operation: Operation) -> Family {
  match operation {
    Operation::Nop   => Family::NoOperand,

    Operation::Load
    | Operation::Store
    | Operation::Mov
    | Operation::Add
    | Operation::Sub
    | Operation::Cmp
    | Operation::And
    | Operation::Or
    | Operation::Xor
    | Operation::Not
    | Operation::Inc
    | Operation::Dec => Family::RegisterAlu,

    Operation::In
    | Operation::Out => Family::PortIo,

    Operation::Ldi   => Family::LoadImmediate,
    Operation::Jmp   => Family::Jump,
  }
}

/// `None` for the unassigned part of the 6 bit opcode space.
pub fn family_of_code(code: u8) -> Option<Family> {
  Operation::from_code(code).map(family_of)
}


/// A contiguous run of `width` bits starting at bit `low` (bit 0 is the LSB).
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct BitField {
  pub low   : u32,
  pub width : u32,
}

impl BitField {
  pub const fn new(low: u32, width: u32) -> BitField {
    BitField{ low, width }
  }

  /// The largest value the field can hold.
  pub const fn max(&self) -> Word {
    (1 << self.width) - 1
  }

  pub fn extract(&self, word: Word) -> Word {
    (word >> self.low) & self.max()
  }

  /// Positions `value` in the field. Callers validate the width first; high bits are dropped.
  pub fn place(&self, value: Word) -> Word {
    (value & self.max()) << self.low
  }
}

/// Width of every immediate operand.
pub const IMMEDIATE_BITS: u32 = 22;

pub const OPCODE                  : BitField = BitField::new(26, 6);

pub const SOURCE                  : BitField = BitField::new(22, REGISTER_BITS);
pub const DESTINATION             : BitField = BitField::new(18, REGISTER_BITS);
pub const FLAG                    : BitField = BitField::new(17, 1);

pub const LOAD_DESTINATION        : BitField = BitField::new(22, REGISTER_BITS);
pub const LOAD_IMMEDIATE          : BitField = BitField::new(0, IMMEDIATE_BITS);

pub const JUMP_REGISTER           : BitField = BitField::new(22, REGISTER_BITS);
pub const JUMP_INDIRECT_CONDITION : BitField = BitField::new(20, CONDITION_BITS);
pub const JUMP_DIRECT_CONDITION   : BitField = BitField::new(24, CONDITION_BITS);
pub const JUMP_TARGET             : BitField = BitField::new(2, IMMEDIATE_BITS);
pub const JUMP_MODE               : BitField = BitField::new(0, 2);


#[cfg(test)]
mod tests {
  use super::*;
  use strum::IntoEnumIterator;

  #[test]
  fn every_operation_has_a_family(){
    let alu = Operation::iter().filter(|op| family_of(*op) == Family::RegisterAlu).count();
    let io  = Operation::iter().filter(|op| family_of(*op) == Family::PortIo).count();
    assert_eq!(Operation::iter().count(), 17);
    assert_eq!(alu, 12);
    assert_eq!(io, 2);
    assert_eq!(family_of(Operation::Nop), Family::NoOperand);
    assert_eq!(family_of(Operation::Ldi), Family::LoadImmediate);
    assert_eq!(family_of(Operation::Jmp), Family::Jump);
  }

  #[test]
  fn opcode_space_partition(){
    let assigned = (0u8..64).filter(|code| family_of_code(*code).is_some()).count();
    assert_eq!(assigned, 17);
    assert_eq!(family_of_code(0), Some(Family::NoOperand));
    assert_eq!(family_of_code(16), Some(Family::PortIo));
    assert_eq!(family_of_code(17), None);
    assert_eq!(family_of_code(63), None);
  }

  #[test]
  fn immediate_fields_agree(){
    assert_eq!(LOAD_IMMEDIATE.width, IMMEDIATE_BITS);
    assert_eq!(JUMP_TARGET.width, IMMEDIATE_BITS);
    assert_eq!(LOAD_IMMEDIATE.max(), 4_194_303);
  }

  #[test]
  fn fields_do_not_overlap_the_opcode(){
    let layouts: [&[BitField]; 5] = [
      &[SOURCE, DESTINATION, FLAG],
      &[SOURCE, DESTINATION],
      &[LOAD_DESTINATION, LOAD_IMMEDIATE],
      &[JUMP_REGISTER, JUMP_INDIRECT_CONDITION, JUMP_MODE],
      &[JUMP_DIRECT_CONDITION, JUMP_TARGET, JUMP_MODE],
    ];
    for layout in layouts.iter() {
      let mut used = OPCODE.place(OPCODE.max());
      for field in layout.iter() {
        let bits = field.place(field.max());
        assert_eq!(used & bits, 0, "{:?} overlaps another field", field);
        used |= bits;
      }
    }
  }

  #[test]
  fn extract_and_place(){
    assert_eq!(OPCODE.place(0b000101), 0x1400_0000);
    assert_eq!(OPCODE.extract(0x1400_0000), 0b000101);
    assert_eq!(JUMP_MODE.extract(0xFFFF_FFFE), 0b10);
    assert_eq!(FLAG.place(1), 1 << 17);
  }
}
