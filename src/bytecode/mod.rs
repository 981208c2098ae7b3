/*!

  Every instruction is exactly one 32 bit word. The top 6 bits are always the opcode, and the
  opcode alone decides which operand layout the remaining 26 bits follow, with one exception:
  `JMP` uses its two lowest bits as a mode selecting between four concrete jump mnemonics
  (`JMP`, `JMPM`, `JMPA`, `JMPR`), and the mode in turn decides the layout of the other bits.
  Decoding therefore dispatches on the opcode first and on the mode second. See
  `crate::catalog` for the field positions.

  Only 17 of the 64 possible opcodes are assigned. An unassigned opcode is not an error on the
  decoding side. It decodes to `DecodedLine::Unknown`, which carries the raw bits along so that
  nothing is lost. On the encoding side every token is validated before any bits are packed,
  and packing itself cannot fail.

  The instruction arguments are stored as data members of `Instruction` variants, one variant
  per layout. `Instruction` is the working representation and `Word` is the storage
  representation.

*/

mod assembly;
mod binary;
mod error;
mod instruction;

pub use assembly::{assemble_line, assemble_program, assemble_tokens, encode, AssembledLine};
pub use binary::{decode_instruction, decode_program, encode_instruction, Word};
pub use error::{Arity, EncodeError};
pub use instruction::{DecodedLine, Immediate, Instruction, JumpForm, Operation};
