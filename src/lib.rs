//! Assembler and disassembler for a 32 bit fixed-width instruction set.
//!
//! `bytecode` is the codec proper. `catalog` and `operand` are the tables it shares between its
//! two directions. `session` and `listing` are conveniences for front ends.

#[macro_use] extern crate lazy_static;

pub mod bytecode;
pub mod catalog;
pub mod listing;
pub mod operand;
pub mod session;
