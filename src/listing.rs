/*!
  Text renderings of codec results: the assembled listing, the memory dump, and the
  disassembly listing. The codec itself only returns values; these turn them into `String`s and
  leave it to the caller to decide where they go.
*/

use std::fmt::Write;

use prettytable::{format as TableFormat, Cell, Row, Table};

use crate::bytecode::{AssembledLine, DecodedLine, Word};

/// Words per row of a memory dump.
pub const DUMP_ROW_WORDS: usize = 8;

/// Bytes per word, for memory dump addresses.
const WORD_BYTES: usize = 4;

lazy_static! {
  static ref DUMP_FORMAT: TableFormat::TableFormat =
    TableFormat::FormatBuilder::new()
      .column_separator(' ')
      .padding(0, 0)
      .build();
}

/**
  For each successfully assembled line: the source, then the word in binary and in hex. Lines
  that failed show the source and the reason instead.
*/
pub fn assembled_listing(lines: &[AssembledLine]) -> String {
  let mut out = String::new();
  for line in lines {
    // Writing to a `String` cannot fail.
    let _ = match &line.result {
      Ok(word) => writeln!(
        out,
        "{}\n  Binary: {:032b}\n  Hex:    0x{:08x}\n",
        line.source, word, word
      ),
      Err(e) => writeln!(
        out,
        "Error parsing line: {}\n  Reason: {}\n",
        line.source, e
      )
    };
  }
  out
}

/// The words that made it through assembly, in order.
pub fn machine_code(lines: &[AssembledLine]) -> Vec<Word> {
  lines.iter().filter_map(|line| line.result.as_ref().ok().copied()).collect()
}

/**
  Eight words per row, each row labeled with the byte address of its first word. The last row
  is padded so the columns line up.
*/
pub fn memory_dump(words: &[Word]) -> String {
  let mut table = Table::new();
  table.set_format(*DUMP_FORMAT);

  for (row_index, chunk) in words.chunks(DUMP_ROW_WORDS).enumerate() {
    let address = row_index * DUMP_ROW_WORDS * WORD_BYTES;
    let mut cells = vec![Cell::new(&format!("{:03x}:", address))];
    for column in 0..DUMP_ROW_WORDS {
      match chunk.get(column) {
        Some(word) => cells.push(Cell::new(&format!("{:08x}", word))),
        None       => cells.push(Cell::new(&" ".repeat(8)))
      }
    }
    table.add_row(Row::new(cells));
  }

  table.to_string()
}

/// One line per word: `<word in hex>  |  <what it decodes to>`.
pub fn disassembly_listing(decoded: &[(Word, DecodedLine)]) -> String {
  let mut out = String::new();
  for (word, line) in decoded {
    // Writing to a `String` cannot fail.
    let _ = writeln!(out, "{:08x}  |  {}", word, line);
  }
  out
}
