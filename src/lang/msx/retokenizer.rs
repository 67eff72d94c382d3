//! # MSX-BASIC Tokenizer
//!
//! Turns a line of BASIC source text into the tokenized form the
//! interpreter stores.  At each position the alternatives are tried in
//! priority order: keyword, string literal, `&H`/`&O`/`&B` literal,
//! identifier, numeric constant, and finally a single passed-through
//! character for anything else (the interpreter will complain at RUN time
//! if it is an error, just as the real tokenizer leaves it alone).
//!
//! Identifier characters pass through until the next keyword, so a digit
//! touching a variable name is never mistaken for a numeric constant but a
//! keyword buried in a name still crunches.

use std::sync::LazyLock;
use regex::Regex;
use super::tokens::*;
use super::detokenizer::MAX_LINENO;
use super::program::Program;
use super::super::charset::Charset;
use super::super::parser::Parser;
use crate::lang::Error;

/// Numbers are an optional `-`, an integer part, an optional fraction, and
/// an optional type character (`%`, `!`, `#`) or `E`/`D` exponent, never
/// both.  At least one digit somewhere is checked after the match.
static NUMBER_RE: LazyLock<Regex> = LazyLock::new(||
    Regex::new(r"^(-)?([0-9]*)(\.[0-9]*)?([%!#]|[dDeE][+-]?[0-9]*)?").expect("regex parsing error"));

enum Suffix {
    Int,
    Single,
    Double,
    /// explicit exponent; `D` forces double precision, `E` lets the digit
    /// count decide
    Exponent { value: i32, double: bool },
}

/// Tokenize a sequence of source lines into a `Program` starting at
/// address `txttab`.  A line number appearing twice replaces the earlier
/// line, as it would when typed into the interpreter.
pub fn tokenize_program<'b>(charset: &Charset, lines: impl IntoIterator<Item=&'b str>, txttab: u16) -> Result<Program,Error> {
    let mut prog = Program::new(txttab);
    let mut rt = Retokenizer::new(charset);
    for l in lines {
        let (ln,tokens) = rt.tokenize_line(l)?;
        prog.set_line(ln,tokens)?;
    }
    Ok(prog)
}

/// Tokenizer for lines of MSX-BASIC source.  One instance can process any
/// number of lines in sequence, reusing its buffers.
pub struct Retokenizer<'a> {
    charset: &'a Charset,
    p: Parser<char,Vec<u8>>,
}

impl <'a> Retokenizer<'a> {
    pub fn new(charset: &'a Charset) -> Self {
        Self {
            charset,
            p: Parser::new(Vec::new())
        }
    }

    /// Tokenize one line, which must start with a line number.  Returns
    /// the line number and the tokenized data (no line number field, no
    /// trailing 0x00).
    pub fn tokenize_line(&mut self, line: &str) -> Result<(u16,Vec<u8>),Error> {
        self.p.reset(line.chars().collect());
        let ln = match self.linenum(false)? {
            Some((false,n)) => n,
            Some((true,_)) => return Err(Error::LineNumber(self.p.describe("negative line number"))),
            None => return Err(self.p.syntax_error("expected line number"))
        };
        // one space after the line number is a separator, not program text
        self.space(false)?;
        self.p.commit();

        while { self.p.commit(); !self.p.finished()} {
            if let Some(tok) = self.token() {
                // new start point for any argument parsing
                self.p.commit();
                match tok.text {
                    "REM" | "'" | "DATA" => self.chars()?,
                    _ => if tok.takes_lineno() {
                        self.spaces(true)?;
                        self.linenum(true)?;
                    }
                }
                continue;
            }
            if self.string_literal()? {
                continue;
            }
            if self.ampersand_literal()? {
                continue;
            }
            if self.ident()? {
                continue;
            }
            if self.number()? {
                continue;
            }
            // Not in a string, REM or DATA statement, so this is not
            // charset-converted; we simply don't know what it is.
            let c = self.p.consume(1)?[0];
            if (c as u32) < 0x100 {
                self.p.pending_out().push(c as u8);
            } else {
                return Err(self.p.syntax_error("character has no program text encoding"));
            }
        }
        self.p.commit();
        Ok((ln,self.p.take_output()))
    }

    /// Longest keyword match at the current position.  Any text matching a
    /// keyword takes priority over everything else, even mid-identifier,
    /// just as with the interpreter's own line cruncher.
    fn token(&mut self) -> Option<&'static Token> {
        for t in RETOKENS.iter() {
            if self.p.string(t.text) {
                self.p.pending_out().extend_from_slice(t.bytes);
                return Some(t);
            }
        }
        None
    }

    /// Consume the ASCII representation of a line number.  Like the MS
    /// tokenizer this accepts a negative line number (the interpreter
    /// throws Syntax error when it executes one).  Soft failure returns
    /// `None` with nothing consumed; a parsed number out of range is
    /// always a hard error.  With `gen`, generates 0x0E plus the
    /// little-endian word (and a `-` token first if negative).
    fn linenum(&mut self, gen: bool) -> Result<Option<(bool,u16)>,Error> {
        self.p.start();
        let neg = self.p.string("-");
        let ds = match self.p.digits(10) {
            Some(ds) => ds,
            None => {
                self.p.start();
                return Ok(None);
            }
        };
        let n = ds.parse::<u64>().unwrap_or(u64::MAX);
        if n > MAX_LINENO as u64 {
            return Err(Error::LineNumber(self.p.describe(&format!("{} outside line number range",ds))));
        }
        if gen {
            if neg {
                self.p.pending_out().push(NEGATIVE);
            }
            self.p.pending_out().push(0x0E);
            self.p.pending_out().extend_from_slice(&(n as u16).to_le_bytes());
        }
        self.p.commit();
        Ok(Some((neg,n as u16)))
    }

    /// Consume a string literal through the closing `"` or end of line.
    /// The quotes stay ASCII; the contents are charset-encoded.
    fn string_literal(&mut self) -> Result<bool,Error> {
        if !self.p.string("\"") {
            return Ok(false);
        }
        self.p.pending_out().push(DQUOTE);
        loop {
            if self.p.finished() {
                return Ok(true);
            }
            if self.p.string("\"") {
                self.p.pending_out().push(DQUOTE);
                return Ok(true);
            }
            self.char_out()?;
        }
    }

    /// `&H`/`&O` tokenize as 0x0C/0x0B plus a 16-bit word; values past
    /// 0xFFFF are an overflow error and a bare prefix means 0.  `&B` has
    /// no tokenized version, it stays ASCII.
    fn ampersand_literal(&mut self) -> Result<bool,Error> {
        let base: u32;
        if self.p.string_in(&["&H","&h"]).is_some() {
            base = 16;
            self.p.pending_out().push(0x0C);
        } else if self.p.string_in(&["&O","&o"]).is_some() {
            base = 8;
            self.p.pending_out().push(0x0B);
        } else if self.p.string_in(&["&B","&b"]).is_some() {
            base = 2;
        } else {
            return Ok(false);
        }
        let digits = self.p.digits(base);
        if base == 2 {
            self.p.gen_str("&B");
            if let Some(ds) = digits.as_deref() {
                self.p.gen_str(ds);
            }
        } else {
            let ds = digits.unwrap_or_else(|| "0".to_string());
            let n = match u64::from_str_radix(&ds,base) {
                Ok(n) if n <= 0xFFFF => n as u16,
                _ => return Err(self.p.syntax_error("Overflow"))
            };
            self.p.pending_out().extend_from_slice(&n.to_le_bytes());
        }
        self.p.commit();
        Ok(true)
    }

    /// True if a keyword begins at the pending parse point.  Keyword text
    /// is always ASCII.
    fn keyword_ahead(&self) -> bool {
        let rem = self.p.remain();
        RETOKENS.iter().any(|t| t.text.len() <= rem.len()
            && t.text.bytes().zip(rem.iter()).all(|(b,&c)| b as char == c))
    }

    /// A letter followed by letters and digits passes through as ASCII
    /// until a keyword begins, so a digit stuck to a variable name is
    /// never parsed as a numeric constant while `TO` still crunches out of
    /// the middle of `ATOM`.
    fn ident(&mut self) -> Result<bool,Error> {
        match self.p.peek() {
            Some(c) if c.is_ascii_alphabetic() => {},
            _ => return Ok(false)
        }
        while let Some(c) = self.p.peek() {
            if !c.is_ascii_alphanumeric() {
                break;
            }
            self.p.consume(1)?;
            self.p.pending_out().push(c as u8);
            if self.keyword_ahead() {
                break;
            }
        }
        Ok(true)
    }

    /// Convert a numeric constant to its internal representation.  This is
    /// more subtle than it looks because the type cannot be determined
    /// syntactically: the size of the number and the presence of an
    /// exponent may change the type, sometimes overriding the trailing
    /// type character.
    fn number(&mut self) -> Result<bool,Error> {
        let (count,groups) = match self.p.scan(&NUMBER_RE) {
            Some(m) => m,
            None => return Ok(false)
        };
        let neg = groups[1].is_some();
        let int_part = groups[2].clone().unwrap_or_default();
        // drop the `.` from the fraction group
        let frac = groups[3].as_ref().map(|f| f[1..].to_string());
        if int_part.is_empty() && frac.is_none() {
            return Ok(false);
        }
        let suffix = match groups[4].as_deref() {
            None => None,
            Some("%") => Some(Suffix::Int),
            Some("!") => Some(Suffix::Single),
            Some("#") => Some(Suffix::Double),
            Some(s) => {
                let double = s.starts_with('d') || s.starts_with('D');
                let rest = &s[1..];
                let (sign,digits) = match rest.strip_prefix('-') {
                    Some(d) => (-1,d),
                    None => (1,rest.strip_prefix('+').unwrap_or(rest))
                };
                let mag = match digits.is_empty() {
                    true => 0,
                    false => match digits.parse::<i32>() {
                        Ok(n) => n,
                        Err(_) => return Err(self.p.syntax_error("Overflow"))
                    }
                };
                Some(Suffix::Exponent{value: sign*mag,double})
            }
        };

        // Representations are always positive; a negative constant is a
        // `-` token ahead of the positive version.
        if neg {
            self.p.pending_out().push(NEGATIVE);
        }

        let ival = match int_part.is_empty() {
            true => 0,
            false => int_part.parse::<u64>().unwrap_or(u64::MAX)
        };
        // `%` forces an int, truncating any fraction; otherwise a number
        // with no fraction, no type and no exponent is an int if it fits
        if matches!(suffix,Some(Suffix::Int)) || (frac.is_none() && suffix.is_none() && ival < 32768) {
            if ival > 32767 {
                return Err(self.p.syntax_error("int Overflow"));
            }
            let i = ival as u16;
            if i < 10 {
                self.p.pending_out().push(0x11 + i as u8);
            } else if i < 256 {
                self.p.pending_out().extend_from_slice(&[0x0F,i as u8]);
            } else {
                self.p.pending_out().push(0x1C);
                self.p.pending_out().extend_from_slice(&i.to_le_bytes());
            }
        } else {
            self.float(&int_part,frac.as_deref().unwrap_or(""),&suffix)?;
        }

        self.p.consume(count)?;
        Ok(true)
    }

    /// Packed-BCD float encoding.  Single precision (4 bytes) if forced
    /// with `!` or the significant digits fit in 6 and neither `#` nor a
    /// `D` exponent forced double; otherwise double (8 bytes).
    fn float(&mut self, int_part: &str, frac: &str, suffix: &Option<Suffix>) -> Result<(),Error> {
        let i = int_part.trim_start_matches('0');
        let sigdigs = match i.is_empty() {
            false => i.len() + frac.len(),
            true => frac.trim_start_matches('0').len()
        };
        let d_forced = matches!(suffix,Some(Suffix::Double))
            || matches!(suffix,Some(Suffix::Exponent{double:true,..}));
        let single = matches!(suffix,Some(Suffix::Single)) || (sigdigs <= 6 && !d_forced);
        let sig_bytes: usize = if single { 3 } else { 7 };
        self.p.pending_out().push(if single { 0x1D } else { 0x1F });

        // biased exponent counts the digits ahead of the decimal point
        let mut exponent: i32 = 0x40 + i.len() as i32;
        let mut f = frac;
        if i.is_empty() {
            let stripped = frac.trim_start_matches('0');
            exponent -= (frac.len() - stripped.len()) as i32;
            f = stripped;
        }
        if let Some(Suffix::Exponent{value,..}) = suffix {
            exponent += value;
        }

        if i.is_empty() && f.is_empty() {
            // an all-zero significand encodes as a literal zero
            for _ in 0..=sig_bytes {
                self.p.pending_out().push(0x00);
            }
            return Ok(());
        }
        if exponent < 0x01 || exponent > 0x7F {
            return Err(self.p.syntax_error("Overflow"));
        }
        self.p.pending_out().push(exponent as u8);

        let all: Vec<u8> = i.bytes().chain(f.bytes()).map(|b| b - b'0').collect();
        let cap = sig_bytes * 2;
        let mut ds: Vec<u8> = all.iter().take(cap).copied().collect();
        while ds.len() < cap {
            ds.push(0);
        }
        // Round half up on the first dropped digit.  On a carry out of the
        // top the interpreter shifts the digits right and drops the lowest
        // without touching the exponent (0.9999999! gives .1) and we stay
        // bit-compatible with that.
        if all.get(cap).copied().unwrap_or(0) >= 5 {
            let mut idx = cap;
            loop {
                if idx == 0 {
                    ds.pop();
                    ds.insert(0,1);
                    break;
                }
                idx -= 1;
                if ds[idx] == 9 {
                    ds[idx] = 0;
                } else {
                    ds[idx] += 1;
                    break;
                }
            }
        }
        for pair in ds.chunks(2) {
            self.p.pending_out().push((pair[0] << 4) | pair[1]);
        }
        Ok(())
    }

    /// consume a single separator space, if present
    fn space(&mut self, generate: bool) -> Result<(),Error> {
        if self.p.peek() == Some(' ') {
            match generate {
                true => self.char_out()?,
                false => {
                    self.p.consume(1)?;
                }
            }
        }
        Ok(())
    }

    /// consume zero or more spaces, generating their native encoding
    fn spaces(&mut self, generate: bool) -> Result<(),Error> {
        while self.p.string(" ") {
            if generate {
                self.push_native(' ')?;
            }
            self.p.commit();
        }
        Ok(())
    }

    /// consume the rest of the line as charset-encoded text
    fn chars(&mut self) -> Result<(),Error> {
        while !self.p.finished() {
            self.char_out()?;
        }
        Ok(())
    }

    fn char_out(&mut self) -> Result<(),Error> {
        let c = self.p.consume(1)?[0];
        self.push_native(c)
    }

    /// Generate the MSX encoding of one character: code points 0x20-0x7E
    /// and 0x80-0xFF are one byte, 0x00-0x1F are 0x01 followed by the code
    /// plus 0x40, and 0x7F cannot be encoded.
    fn push_native(&mut self, c: char) -> Result<(),Error> {
        let n = match self.charset.native(c) {
            Some(n) => n,
            None => return Err(Error::Encoding(format!("no native encoding for {:?} in charset {}",c,self.charset.description())))
        };
        if n == 0x7F {
            return Err(Error::Encoding("cannot encode char 0x7F".to_string()));
        }
        if n < 0x20 {
            self.p.pending_out().push(0x01);
            self.p.pending_out().push(n + 0x40);
        } else {
            self.p.pending_out().push(n);
        }
        Ok(())
    }
}
