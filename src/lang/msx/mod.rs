//! # MSX-BASIC
//!
//! Tokenizer, detokenizer, character sets and program image handling for
//! MSX-BASIC (MSX2 token set).  The detokenizer and tokenizer are exact
//! inverses over well-formed programs: detokenizing an image and
//! tokenizing the resulting text reproduces the image byte for byte.
//!
//! The usual entry points are the convenience functions here; the
//! `Detokenizer` and `Retokenizer` types are available for finer control
//! (raw byte output, buffer reuse across lines).

use super::charset::Charset;
use crate::lang::Error;

pub mod tokens;
pub mod charsets;
pub mod detokenizer;
pub mod retokenizer;
pub mod program;
#[cfg(test)]
mod tokenize_test;

pub use detokenizer::{Detokenizer,MAX_LINENO};
pub use retokenizer::{Retokenizer,tokenize_program};
pub use program::Program;

/// Detokenize one line of tokenized data (no line number field, no
/// trailing 0x00) to Unicode text.
pub fn detokenize_line(charset: &Charset, tline: &[u8], lineno: Option<u16>, expand: bool) -> Result<String,Error> {
    let mut dt = Detokenizer::new(charset,tline,lineno,expand);
    dt.detokenized()
}

/// Detokenize one line without charset conversion, leaving string
/// contents as native bytes.
pub fn detokenize_line_raw(tline: &[u8], lineno: Option<u16>) -> Result<Vec<u8>,Error> {
    let mut dt = Detokenizer::raw(tline,lineno);
    dt.detokenized()
}

/// Tokenize one line of source, which must start with a line number.
pub fn tokenize_line(charset: &Charset, line: &str) -> Result<(u16,Vec<u8>),Error> {
    Retokenizer::new(charset).tokenize_line(line)
}

/// Detokenize a whole program to source lines in line number order.
pub fn detokenize_program(charset: &Charset, prog: &Program, expand: bool) -> Result<Vec<String>,Error> {
    let mut out = Vec::new();
    for (n,data) in prog.lines() {
        out.push(detokenize_line(charset,data,Some(n),expand)?);
    }
    Ok(out)
}

/// Detokenize a whole program without charset conversion.
pub fn detokenize_program_raw(prog: &Program) -> Result<Vec<Vec<u8>>,Error> {
    let mut out = Vec::new();
    for (n,data) in prog.lines() {
        out.push(detokenize_line_raw(data,Some(n))?);
    }
    Ok(out)
}
