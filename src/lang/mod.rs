//! # Language Modules
//!
//! This module contains the language engine: the transactional parser
//! primitive, the character set layer, and the MSX-BASIC tokenizer,
//! detokenizer and program image handling.
//!
//! Errors out of this module are `lang::Error`; the variants carry a
//! description that includes the parser state (position, surrounding
//! input, output tail) where one was available.

use thiserror::Error;

pub mod parser;
pub mod charset;
pub mod msx;

#[derive(Error,Debug)]
pub enum Error {
    #[error("syntax error: {0}")]
    Syntax(String),
    #[error("tokenization error: {0}")]
    Tokenization(String),
    #[error("detokenization error: {0}")]
    Detokenization(String),
    #[error("line number error: {0}")]
    LineNumber(String),
    #[error("encoding error: {0}")]
    Encoding(String),
    #[error("charset error: {0}")]
    Charset(String),
    #[error("bad program image: {0}")]
    Image(String),
}

/// Join the "physical" lines of an expanded BASIC listing back into BASIC
/// lines: a line starts at a physical line beginning with a line number
/// and ends at the next one.  Comments from `commentchar` to end of line
/// are removed along with the spaces ahead of them, and blank physical
/// lines do not insert a space.  Anything ahead of the first line number
/// is dropped.
pub fn logical_lines(text: &str, commentchar: char) -> Vec<String> {
    let mut joined: Vec<String> = Vec::new();
    let mut parts: Vec<&str> = Vec::new();
    for pline in text.lines() {
        let mut pline = pline.trim();
        if pline.chars().next().map_or(false,|c| c.is_ascii_digit()) {
            joined.push(parts.join(" "));
            parts.clear();
        }
        if let Some(cpos) = pline.find(commentchar) {
            pline = pline[..cpos].trim_end_matches(' ');
        }
        if pline.is_empty() {
            continue;
        }
        parts.push(pline);
    }
    joined.push(parts.join(" "));
    joined.remove(0);
    joined
}

/// comment character conventionally used in expanded listings
pub const EXPANDED_COMMENT: char = '‖';

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn continuation_lines_join() {
        let text = "10 PRINT 1\n    :PRINT 2\n20 END\n";
        assert_eq!(logical_lines(text,EXPANDED_COMMENT),
            vec!["10 PRINT 1 :PRINT 2".to_string(),"20 END".to_string()]);
    }

    #[test]
    fn comments_and_blanks_stripped() {
        let text = "‖ header comment\n10 PRINT 1  ‖ say one\n\n    :END\n";
        assert_eq!(logical_lines(text,EXPANDED_COMMENT),
            vec!["10 PRINT 1 :END".to_string()]);
    }

    #[test]
    fn empty_input() {
        assert_eq!(logical_lines("",EXPANDED_COMMENT),Vec::<String>::new());
    }
}
