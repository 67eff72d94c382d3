//! # MSX-BASIC Detokenizer
//!
//! Turns the tokenized body of a BASIC line back into source text.  The
//! tokenized form interleaves token bytes, ASCII program text, binary
//! numeric encodings and native-charset string contents, so this is a
//! byte-at-a-time dispatch rather than a simple table substitution.
//!
//! Numeric constants are decoded with decimal digit-string arithmetic,
//! never through binary floating point, which would occasionally round
//! differently than the BCD representation the interpreter stores.

use super::tokens::*;
use super::super::charset::Charset;
use super::super::parser::{Parser,OutBuf};
use crate::lang::Error;

pub const MAX_LINENO: u16 = 65529;

/// Tokens that get a space ahead of them in expand mode.
const PRESPACE_KEYWORDS: &[&str] = &["THEN","TO","STEP","AND","OR","XOR"];

/// Output sink for detokenized text.  `String` translates native string
/// characters through a charset; `Vec<u8>` passes them through unchecked,
/// for inspecting data that a charset would reject.
pub trait NativeSink: OutBuf {
    const TRANSLATES: bool;
    fn put_native(&mut self, code: u8, charset: Option<&Charset>) -> Result<(),Error>;
}

impl NativeSink for String {
    const TRANSLATES: bool = true;
    fn put_native(&mut self, code: u8, charset: Option<&Charset>) -> Result<(),Error> {
        match charset {
            Some(cs) => {
                self.push(cs.trans(code));
                Ok(())
            },
            None => Err(Error::Detokenization("internal: translating sink without charset".to_string()))
        }
    }
}

impl NativeSink for Vec<u8> {
    const TRANSLATES: bool = false;
    fn put_native(&mut self, code: u8, _charset: Option<&Charset>) -> Result<(),Error> {
        self.push(code);
        Ok(())
    }
}

/// A detokenizer for one line.  Instantiate with the tokenized line data
/// (no line number field, no trailing 0x00) and call `detokenized()`.
pub struct Detokenizer<'a,O: NativeSink> {
    p: Parser<u8,O>,
    charset: Option<&'a Charset>,
    lineno: Option<u16>,
    expand: bool,
}

impl <'a> Detokenizer<'a,String> {
    /// Detokenize to Unicode text using `charset` for string contents.
    /// `lineno`, if given, prefixes the output (width 5 in expand mode)
    /// and is named in errors.  `expand` adds spacing around keywords and
    /// a newline-plus-indent ahead of each statement-separating colon.
    pub fn new(charset: &'a Charset, tline: &[u8], lineno: Option<u16>, expand: bool) -> Self {
        Self {
            p: Parser::new(tline.to_vec()),
            charset: Some(charset),
            lineno,
            expand
        }
    }
}

impl <'a> Detokenizer<'a,Vec<u8>> {
    /// Detokenize without charset conversion, leaving string contents as
    /// the native bytes found in the line, with no validity checks.
    pub fn raw(tline: &[u8], lineno: Option<u16>) -> Self {
        Self {
            p: Parser::new(tline.to_vec()),
            charset: None,
            lineno,
            expand: false
        }
    }
}

impl <'a,O: NativeSink> Detokenizer<'a,O> {
    pub fn detokenized(&mut self) -> Result<O,Error> {
        if let Some(n) = self.lineno {
            let width = if self.expand { 5 } else { 0 };
            self.p.gen_str(&format!("{:width$} ",n));
        }
        while let Some(b) = self.p.peek() {
            match b {
                0x00..=0x0A => return Err(self.terror("illegal byte")),
                0x0B => {
                    self.p.consume(1)?;
                    let i = self.int16()?;
                    self.p.gen_str(&format!("&O{:o}",i));
                },
                0x0C => {
                    self.p.consume(1)?;
                    let i = self.int16()?;
                    self.p.gen_str(&format!("&H{:X}",i));
                },
                0x0D => return Err(self.terror("line address code 0x0D is not supported (present only after RUN)")),
                0x0E => {
                    self.p.consume(1)?;
                    let i = self.int16()?;
                    if i > MAX_LINENO {
                        return Err(self.terror("line number out of range"));
                    }
                    self.p.gen_str(&i.to_string());
                },
                0x0F => {
                    self.p.consume(1)?;
                    let i = self.next_byte()?;
                    if i < 10 {
                        return Err(self.terror("one-byte int must be 10 or more"));
                    }
                    self.p.gen_str(&i.to_string());
                },
                0x11..=0x1A => {
                    self.p.consume(1)?;
                    self.p.gen_ascii(b'0' + (b - 0x11));
                },
                0x1C => {
                    self.p.consume(1)?;
                    let i = self.int16()?;
                    if i < 256 || i > 32767 {
                        return Err(self.terror("two-byte int out of range"));
                    }
                    self.p.gen_str(&i.to_string());
                },
                0x1D => {
                    self.p.consume(1)?;
                    self.real(4)?;
                },
                0x1F => {
                    self.p.consume(1)?;
                    self.real(8)?;
                },
                0x10 | 0x1B | 0x1E => return Err(self.terror("illegal byte")),
                DQUOTE => {
                    self.p.consume(1)?;
                    self.p.gen_ascii(DQUOTE);
                    self.quoted()?;
                },
                COLON => self.colon()?,
                // binary numbers are plain ASCII `&B` followed by digits
                0x20..=0x7F => {
                    self.p.consume(1)?;
                    self.p.gen_ascii(b);
                },
                T_DATA => {
                    self.p.consume(1)?;
                    self.p.gen_str("DATA");
                    self.expandsp();
                    self.data()?;
                },
                T_REM => {
                    self.p.consume(1)?;
                    self.p.gen_str("REM");
                    // no expandsp, to support tricks like `10 REMARKABLE PROGRAM`
                    self.remcontents()?;
                },
                _ => {
                    if !self.token()? {
                        return Err(self.terror("unrecognized token"));
                    }
                }
            }
            self.p.commit();
        }
        self.p.commit();
        Ok(self.p.take_output())
    }

    fn terror(&self, msg: &str) -> Error {
        let state = self.p.describe(msg);
        match self.lineno {
            Some(n) => Error::Detokenization(format!("line {}: {}",n,state)),
            None => Error::Detokenization(state)
        }
    }

    fn next_byte(&mut self) -> Result<u8,Error> {
        Ok(self.p.consume(1)?[0])
    }

    /// consume two bytes as a little-endian unsigned int
    fn int16(&mut self) -> Result<u16,Error> {
        let bs = self.p.consume(2)?;
        Ok(u16::from_le_bytes([bs[0],bs[1]]))
    }

    /// In expand mode generate a space, unless the output already ends
    /// with one or the next input byte will print one.
    fn expandsp(&mut self) {
        if !self.expand {
            return;
        }
        if let Some(b' ') | None = self.p.last_out_byte() {
            return;
        }
        if self.p.peek() == Some(SPACE) {
            return;
        }
        self.p.gen_ascii(SPACE);
    }

    /// In expand mode generate a (Unix) newline and continuation indent.
    /// Multi-line output stays in Unix format regardless of platform since
    /// it is expected to live in revision control.
    fn expandnl(&mut self) {
        if self.expand {
            self.p.gen_str("\n    ");
        }
    }

    /// Consume one native-encoded string character and generate it.  With
    /// a translating sink this takes one byte, or two when the first is
    /// the 0x01 extension prefix encoding native 0x00-0x1F, and rejects
    /// control bytes and bad extension sequences.  A raw sink passes every
    /// byte through singly with no checks.
    fn char_out(&mut self) -> Result<(),Error> {
        let c = self.next_byte()?;
        if O::TRANSLATES {
            if c == 0x01 {
                let ext = match self.p.consume(1) {
                    Ok(bs) => bs[0],
                    Err(_) => return Err(self.terror("truncated extended character"))
                };
                if ext < 0x40 || ext > 0x5F {
                    return Err(self.terror("bad extended character code"));
                }
                self.p.pending_out().put_native(ext - 0x40,self.charset)?;
            } else if c < 0x20 || c == 0x7F {
                return Err(self.terror("control character in string"));
            } else {
                self.p.pending_out().put_native(c,self.charset)?;
            }
        } else {
            self.p.pending_out().put_native(c,self.charset)?;
        }
        Ok(())
    }

    /// consume the rest of the line as charset-converted contents
    fn remcontents(&mut self) -> Result<(),Error> {
        while self.p.peek().is_some() {
            self.char_out()?;
        }
        Ok(())
    }

    /// Consume and generate a quoted string, including the trailing quote
    /// if present (EOL also ends the string).  The leading quote is
    /// assumed already consumed and generated.  Quotes themselves are
    /// ASCII, never charset-decoded.
    fn quoted(&mut self) -> Result<(),Error> {
        loop {
            match self.p.peek() {
                None => return Ok(()),
                Some(DQUOTE) => {
                    self.p.consume(1)?;
                    self.p.gen_ascii(DQUOTE);
                    return Ok(());
                },
                Some(_) => self.char_out()?
            }
        }
    }

    /// Colon has special cases: `ELSE` is always encoded as colon followed
    /// by the ELSE token, and colon + REM token + 0xE6 is the single-quote
    /// comment form.
    fn colon(&mut self) -> Result<(),Error> {
        self.p.consume(1)?;
        if self.p.peek() == Some(T_ELSE1) {
            self.p.consume(1)?;
            self.expandsp();
            self.p.gen_str("ELSE");
            self.expandsp();
        } else if self.p.peek() == Some(T_QREM1) {
            self.p.consume(1)?;
            if self.p.peek() == Some(T_QREM2) {
                self.p.consume(1)?;
                self.p.gen_ascii(b'\'');
            } else {
                self.expandnl();
                self.p.gen_ascii(COLON);
                self.expandsp();
                self.p.gen_str("REM");
                // no expandsp, same REMARKABLE trick as above
            }
            self.remcontents()?;
        } else {
            self.expandnl();
            self.p.gen_ascii(COLON);
            self.expandsp();
        }
        Ok(())
    }

    /// Consume and generate bytes as a `DATA` statement argument, up to
    /// and including a terminating unquoted colon, if any.  Unquoted
    /// spaces leading an argument, quotes, and commas are ASCII; the rest
    /// is charset-translated.  Colons inside a pair of quotes do not
    /// terminate the statement.
    fn data(&mut self) -> Result<(),Error> {
        let mut leading = true;
        loop {
            match self.p.peek() {
                None => return Ok(()),
                Some(SPACE) if leading => {
                    self.p.consume(1)?;
                    self.p.gen_ascii(SPACE);
                },
                Some(DQUOTE) => {
                    leading = false;
                    self.p.consume(1)?;
                    self.p.gen_ascii(DQUOTE);
                    self.quoted()?;
                },
                Some(COMMA) => {
                    leading = true;
                    self.p.consume(1)?;
                    self.p.gen_ascii(COMMA);
                    self.expandsp();
                },
                Some(COLON) => {
                    self.colon()?;
                    return Ok(());
                },
                Some(_) => {
                    leading = false;
                    self.char_out()?;
                }
            }
        }
    }

    /// If the next input is a token, consume it and generate its keyword,
    /// with spacing if we are expanding.  Longest encodings match first.
    fn token(&mut self) -> Result<bool,Error> {
        for t in DETOKENS.iter() {
            if !self.p.literal(t.bytes) {
                continue;
            }
            if PRESPACE_KEYWORDS.contains(&t.text) {
                self.expandsp();
            }
            self.p.gen_str(t.text);
            let next = self.p.peek();
            if t.text.len() > 1 && !matches!(next,None|Some(COLON)|Some(b'(')|Some(T_EQ)) {
                self.expandsp();
            }
            return Ok(true);
        }
        Ok(false)
    }

    /// Consume `blen` bytes (4 single / 8 double precision) and generate
    /// the real number they encode.  Byte 0 is sign (bit 7, always clear
    /// here since negative constants store a `-` token ahead of a positive
    /// constant) and 0x40-biased exponent; the rest are BCD digit pairs.
    ///
    /// Following MSX-BASIC we print a bare significand with a `!` or `#`
    /// suffix when the user-visible exponent is between -2 and +13,
    /// otherwise exponent form with no suffix (the interpreter does not
    /// accept a type character after an exponent).  An encoded double in
    /// exponent form is always printed as nDm so that it re-tokenizes to
    /// double precision; the interpreter itself would print nEm for a
    /// significand of 6 digits or fewer and lose the precision.
    fn real(&mut self, blen: usize) -> Result<(),Error> {
        let bs: Vec<u8> = self.p.consume(blen)?.to_vec();
        if bs[0] & 0x80 != 0 {
            return Err(self.terror("tokenized real may not have its sign bit set"));
        }
        let (precchar,expchar) = match blen {
            4 => ('!','E'),
            _ => ('#','D')
        };
        if bs.iter().all(|b| *b==0) {
            self.p.gen_str(&format!("0{}",precchar));
            return Ok(());
        }
        if bs[0] == 0x00 {
            // this form wedges the interpreter when loading the file
            return Err(self.terror("zero exponent with non-zero significand"));
        }
        // Exponent 0x40 means 0.nnnnnn x 10^0, i.e. the decimal point sits
        // ahead of all significand digits.  Printed exponent form puts one
        // digit before the point, which lowers the exponent by 1.
        let exponent = ((bs[0] & 0x7F) as i32) - 0x40;
        let mut significand = String::new();
        for b in &bs[1..] {
            let hi = (b & 0xF0) >> 4;
            let lo = b & 0x0F;
            if hi > 9 || lo > 9 {
                return Err(self.terror("bad BCD digit"));
            }
            significand.push((b'0'+hi) as char);
            significand.push((b'0'+lo) as char);
        }
        let sigdigs = significand.len() as i32;
        let text = if exponent > 14 || exponent <= -2 {
            // decimal point shifted one right for a "human-normalized" significand
            let fraction = significand[1..].trim_end_matches('0');
            match fraction.is_empty() {
                true => format!("{}{}{:+}",&significand[0..1],expchar,exponent-1),
                false => format!("{}.{}{}{:+}",&significand[0..1],fraction,expchar,exponent-1)
            }
        } else if exponent == -1 {
            format!(".0{}{}",significand.trim_end_matches('0'),precchar)
        } else if exponent == 0 {
            format!(".{}{}",significand.trim_end_matches('0'),precchar)
        } else if exponent <= sigdigs {
            // may have a decimal fractional part
            let e = exponent as usize;
            let v = format!("{}.{}",&significand[0..e],&significand[e..]);
            format!("{}{}",v.trim_end_matches('0').trim_end_matches('.'),precchar)
        } else {
            // integer form: append zeros to cover the rest of the exponent,
            // in exact digit-string arithmetic
            let stripped = significand.trim_start_matches('0');
            match stripped.is_empty() {
                true => format!("0{}",precchar),
                false => format!("{}{}{}",stripped,"0".repeat((exponent - sigdigs) as usize),precchar)
            }
        };
        self.p.gen_str(&text);
        Ok(())
    }
}
