use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use isa32::listing::{assembled_listing, disassembly_listing, machine_code, memory_dump};
use isa32::session::{parse_hex_word, AssemblerSession, DisassemblerSession};

const PROMPT: &str = "> ";

#[derive(Parser)]
#[command(name = "isa32")]
#[command(about = "Assemble and disassemble 32 bit instruction words", long_about = None)]
#[command(version)]
struct Cli {
  /// Log every encoded and decoded word
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Assemble source lines into machine words
  Asm {
    /// Source file, or `-` for stdin. Starts an interactive session when omitted.
    file: Option<PathBuf>,
    /// Do not print the memory dump after the listing
    #[arg(long)]
    no_dump: bool,
  },

  /// Disassemble hexadecimal words, one per line
  Disasm {
    /// File of hex words, or `-` for stdin. Starts an interactive session when omitted.
    file: Option<PathBuf>,
  },
}

fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();
  init_logging(cli.verbose);

  match cli.command {
    Commands::Asm { file: Some(path), no_dump } => assemble_file(&path, no_dump),
    Commands::Asm { file: None, no_dump }       => assemble_interactive(no_dump),
    Commands::Disasm { file: Some(path) }       => disassemble_file(&path),
    Commands::Disasm { file: None }             => disassemble_interactive(),
  }
}

/// Logs go to stderr so listings on stdout stay clean.
fn init_logging(verbose: bool) {
  let filter = match verbose {
    true  => EnvFilter::new("debug"),
    false => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
  };
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(io::stderr)
    .init();
}

fn read_input(path: &Path) -> anyhow::Result<String> {
  let mut text = String::new();
  match path == Path::new("-") {
    true  => { io::stdin().read_to_string(&mut text)?; }
    false => { text = fs::read_to_string(path)?; }
  }
  Ok(text)
}

fn print_compiled(session: &AssemblerSession, no_dump: bool) {
  let assembled = session.compile();
  println!("\n--- Assembled Output ---\n");
  print!("{}", assembled_listing(&assembled));
  if !no_dump {
    println!("--- Memory Dump ---\n");
    print!("{}", memory_dump(&machine_code(&assembled)));
  }
}

fn print_decompiled(session: &DisassemblerSession) {
  println!("\n--- Decompiled Output ---\n");
  print!("{}", disassembly_listing(&session.decompile()));
}

// region Batch drivers

fn assemble_file(path: &Path, no_dump: bool) -> anyhow::Result<()> {
  let text = read_input(path)?;
  let mut session = AssemblerSession::new();
  for line in text.lines() {
    session.push_line(line);
  }
  print_compiled(&session, no_dump);
  Ok(())
}

fn disassemble_file(path: &Path) -> anyhow::Result<()> {
  let text = read_input(path)?;
  let mut session = DisassemblerSession::new();
  for (number, line) in text.lines().enumerate() {
    if line.trim().is_empty() {
      continue;
    }
    match parse_hex_word(line) {
      Ok(word) => session.push_word(word),
      Err(e)   => {
        warn!(line = number + 1, error = %e, "skipping line");
        eprintln!("Line {}: {}", number + 1, e);
      }
    }
  }
  print_decompiled(&session);
  Ok(())
}

// endregion

// region Interactive drivers

fn assemble_interactive(no_dump: bool) -> anyhow::Result<()> {
  let mut editor = DefaultEditor::new()?;
  let mut session = AssemblerSession::new();

  println!("Enter your program line-by-line.");
  println!("Type /compile to generate machine code, /exit to quit.\n");

  loop {
    match editor.readline(PROMPT) {
      Ok(line) => {
        match line.trim() {
          "/exit" => break,
          "/compile" => {
            print_compiled(&session, no_dump);
            session.clear();
            info!("program cleared");
            println!("\nReady for new input.\n");
          }
          _ => {
            let _ = editor.add_history_entry(line.as_str());
            session.push_line(&line);
          }
        }
      }
      Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
      Err(e) => return Err(e.into()),
    }
  }

  Ok(())
}

fn disassemble_interactive() -> anyhow::Result<()> {
  let mut editor = DefaultEditor::new()?;
  let mut session = DisassemblerSession::new();

  println!("Enter hex instructions (one per line), type /done to finish:");

  loop {
    match editor.readline(PROMPT) {
      Ok(line) => {
        let trimmed = line.trim();
        if trimmed == "/done" {
          break;
        }
        if trimmed.is_empty() {
          continue;
        }
        match parse_hex_word(trimmed) {
          Ok(word) => {
            let _ = editor.add_history_entry(trimmed);
            session.push_word(word);
          }
          Err(e) => println!("{}", e),
        }
      }
      // End of input finishes the batch just like `/done`.
      Err(ReadlineError::Eof) => break,
      Err(ReadlineError::Interrupted) => return Ok(()),
      Err(e) => return Err(e.into()),
    }
  }

  print_decompiled(&session);
  Ok(())
}

// endregion
