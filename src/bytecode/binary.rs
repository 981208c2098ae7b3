/*!
  This module is responsible for the encoding and decoding of binary instructions. Both
  directions take their field positions from `crate::catalog`.
*/

use tracing::trace;

use super::{DecodedLine, Immediate, Instruction, JumpForm, Operation};
use crate::catalog::{
  Family,
  DESTINATION,
  FLAG,
  JUMP_DIRECT_CONDITION,
  JUMP_INDIRECT_CONDITION,
  JUMP_MODE,
  JUMP_REGISTER,
  JUMP_TARGET,
  LOAD_DESTINATION,
  LOAD_IMMEDIATE,
  OPCODE,
  SOURCE
};
use crate::operand::{Condition, Register};

// If you change this you must also change the field widths in `crate::catalog`.
pub type Word = u32;

/**
  Packs the instruction into a word. Every operand type already fits its field, so this cannot
  fail. Reserved bits are zero.
*/
pub fn encode_instruction(instruction: &Instruction) -> Word {
  let opcode = OPCODE.place(instruction.opcode().code() as Word);

  match *instruction {

    Instruction::NoOperand(_) => opcode,

    Instruction::RegisterAlu { src, dst, flag, .. } => {
      opcode
        | SOURCE.place(src.code() as Word)
        | DESTINATION.place(dst.code() as Word)
        | FLAG.place(flag as Word)
    }

    Instruction::PortIo { src, dst, .. } => {
      opcode
        | SOURCE.place(src.code() as Word)
        | DESTINATION.place(dst.code() as Word)
    }

    Instruction::LoadImmediate { dst, immediate } => {
      opcode
        | LOAD_DESTINATION.place(dst.code() as Word)
        | LOAD_IMMEDIATE.place(immediate.value())
    }

    Instruction::JumpIndirect { condition, register, memory } => {
      let form = match memory {
        true  => JumpForm::Memory,
        false => JumpForm::Register
      };
      opcode
        | JUMP_REGISTER.place(register.code() as Word)
        | JUMP_INDIRECT_CONDITION.place(condition.code() as Word)
        | JUMP_MODE.place(form.mode() as Word)
    }

    Instruction::JumpDirect { condition, target, relative } => {
      let form = match relative {
        true  => JumpForm::Relative,
        false => JumpForm::Absolute
      };
      opcode
        | JUMP_DIRECT_CONDITION.place(condition.code() as Word)
        | JUMP_TARGET.place(target.value())
        | JUMP_MODE.place(form.mode() as Word)
    }

  }
}

/**
  Unpacks a word. Dispatch is on the opcode first and, for `JMP`, on the mode bits second.
  Reserved bits are ignored. An unassigned opcode yields `DecodedLine::Unknown`.
*/
pub fn decode_instruction(word: Word) -> DecodedLine {
  let raw_opcode = OPCODE.extract(word) as u8;
  let opcode = match Operation::from_code(raw_opcode) {
    Some(opcode) => opcode,
    None => {
      trace!(word, raw_opcode, "unassigned opcode");
      return DecodedLine::Unknown { raw_opcode, word };
    }
  };

  let instruction = match opcode.family() {

    Family::NoOperand => Instruction::NoOperand(opcode),

    Family::RegisterAlu => Instruction::RegisterAlu {
      opcode,
      src  : Register::from_field(SOURCE.extract(word)),
      dst  : Register::from_field(DESTINATION.extract(word)),
      flag : FLAG.extract(word) == 1
    },

    Family::PortIo => Instruction::PortIo {
      opcode,
      src : Register::from_field(SOURCE.extract(word)),
      dst : Register::from_field(DESTINATION.extract(word))
    },

    Family::LoadImmediate => Instruction::LoadImmediate {
      dst       : Register::from_field(LOAD_DESTINATION.extract(word)),
      immediate : Immediate::from_field(LOAD_IMMEDIATE.extract(word))
    },

    Family::Jump => {
      let form = JumpForm::from_word(word);
      match form.is_indirect() {
        true => Instruction::JumpIndirect {
          condition : Condition::from_field(JUMP_INDIRECT_CONDITION.extract(word)),
          register  : Register::from_field(JUMP_REGISTER.extract(word)),
          memory    : form == JumpForm::Memory
        },
        false => Instruction::JumpDirect {
          condition : Condition::from_field(JUMP_DIRECT_CONDITION.extract(word)),
          target    : Immediate::from_field(JUMP_TARGET.extract(word)),
          relative  : form == JumpForm::Relative
        }
      }
    }

  };

  DecodedLine::Instruction(instruction)
}

/// Decodes a batch of words, preserving their order.
pub fn decode_program(words: &[Word]) -> Vec<DecodedLine> {
  words.iter().map(|word| decode_instruction(*word)).collect()
}
