//! # Parser Primitive
//!
//! A transactional cursor over a sequence of input elements, used by both the
//! tokenizer (`char` input, byte output) and the detokenizer (byte input,
//! text or byte output).  The parser keeps two parse points and two output
//! buffers, "committed" and "pending."  Matching routines advance the pending
//! point and generate pending output; `commit` promotes pending to committed,
//! while `start` discards anything pending.  A sub-parse that fails part way
//! through therefore leaves no observable trace once the caller calls
//! `start` again (or simply never commits).
//!
//! Matching routines never commit on their own, they are meant to be
//! components within a larger parser that owns the transaction.

use std::fmt;
use regex;
use crate::lang::Error;

/// Output accumulator used by `Parser`.  The element kind (text or bytes) is
/// fixed at compile time by the choice of buffer type, there is no runtime
/// branching on "is this a str or bytes."
pub trait OutBuf: Default {
    /// append one ASCII code, caller must keep it in 0x00-0x7F
    fn put_ascii(&mut self, code: u8);
    /// append a string of ASCII characters
    fn put_str(&mut self, s: &str);
    /// move the contents of `other` onto the end of self
    fn take(&mut self, other: &mut Self);
    fn clear(&mut self);
    fn is_empty(&self) -> bool;
    /// last byte of the buffer, used for spacing decisions
    fn last_byte(&self) -> Option<u8>;
    /// short human-readable tail of the buffer for error reports
    fn context(&self) -> String;
}

impl OutBuf for Vec<u8> {
    fn put_ascii(&mut self, code: u8) {
        self.push(code);
    }
    fn put_str(&mut self, s: &str) {
        self.extend_from_slice(s.as_bytes());
    }
    fn take(&mut self, other: &mut Self) {
        self.append(other);
    }
    fn clear(&mut self) {
        Vec::clear(self);
    }
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn last_byte(&self) -> Option<u8> {
        self.last().copied()
    }
    fn context(&self) -> String {
        let start = self.len().saturating_sub(8);
        hex::encode_upper(&self[start..])
    }
}

impl OutBuf for String {
    fn put_ascii(&mut self, code: u8) {
        self.push(code as char);
    }
    fn put_str(&mut self, s: &str) {
        self.push_str(s);
    }
    fn take(&mut self, other: &mut Self) {
        self.push_str(other);
        other.clear();
    }
    fn clear(&mut self) {
        String::clear(self);
    }
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn last_byte(&self) -> Option<u8> {
        self.as_bytes().last().copied()
    }
    fn context(&self) -> String {
        let tail: String = self.chars().rev().take(8).collect();
        tail.chars().rev().collect()
    }
}

/// Transactional parser state.  `I` is the input element type and `O` the
/// output buffer type.  The instance can be `reset` with new input to reuse
/// allocations when processing many lines in sequence.  Not thread safe,
/// meant for single-owner, single-pass use per line.
pub struct Parser<I,O> {
    input: Vec<I>,
    pos_committed: usize,
    pos_pending: usize,
    committed: O,
    pending: O,
}

impl <I: Copy + PartialEq + fmt::Debug, O: OutBuf> Parser<I,O> {
    pub fn new(input: Vec<I>) -> Self {
        Self {
            input,
            pos_committed: 0,
            pos_pending: 0,
            committed: O::default(),
            pending: O::default()
        }
    }
    /// Reset to the initial state with new input, reusing the instance.
    pub fn reset(&mut self, input: Vec<I>) {
        self.input = input;
        self.pos_committed = 0;
        self.pos_pending = 0;
        self.committed.clear();
        self.pending.clear();
    }
    /// Next unread element at the pending parse point, without consuming.
    pub fn peek(&self) -> Option<I> {
        self.input.get(self.pos_pending).copied()
    }
    /// True if the pending parse point is at the end of the input.
    pub fn finished(&self) -> bool {
        self.pos_pending >= self.input.len()
    }
    /// Everything after the pending parse point.
    pub fn remain(&self) -> &[I] {
        &self.input[self.pos_pending.min(self.input.len())..]
    }
    /// Everything after the committed parse point, mainly for diagnostics.
    pub fn uncommitted(&self) -> &[I] {
        &self.input[self.pos_committed.min(self.input.len())..]
    }
    /// True if there is any uncommitted consumption or output.
    pub fn pending(&self) -> bool {
        self.pos_pending != self.pos_committed || !self.pending.is_empty()
    }
    /// Consume and return the next `count` elements.  Consuming past the end
    /// of the input is a hard error.
    pub fn consume(&mut self, count: usize) -> Result<&[I],Error> {
        if self.pos_pending + count > self.input.len() {
            return Err(Error::Syntax(self.describe("unexpected end of input")));
        }
        let start = self.pos_pending;
        self.pos_pending += count;
        Ok(&self.input[start..start+count])
    }
    /// Consume `seq` if the input continues with it, otherwise consume
    /// nothing and return false.
    pub fn literal(&mut self, seq: &[I]) -> bool {
        if self.remain().starts_with(seq) {
            self.pos_pending += seq.len();
            return true;
        }
        false
    }
    /// Discard any pending consumption and output, i.e. roll back to the
    /// committed state.
    pub fn start(&mut self) {
        self.pos_pending = self.pos_committed;
        self.pending.clear();
    }
    /// Promote the pending parse point and output to committed.
    pub fn commit(&mut self) {
        self.pos_committed = self.pos_pending;
        self.committed.take(&mut self.pending);
    }
    /// Append one ASCII code to the pending output.
    pub fn gen_ascii(&mut self, code: u8) {
        self.pending.put_ascii(code);
    }
    /// Append ASCII text to the pending output.
    pub fn gen_str(&mut self, s: &str) {
        self.pending.put_str(s);
    }
    /// Direct access to the pending output buffer for type-specific
    /// generation (raw bytes, translated characters).
    pub fn pending_out(&mut self) -> &mut O {
        &mut self.pending
    }
    /// Last byte of the output so far, pending included.
    pub fn last_out_byte(&self) -> Option<u8> {
        match self.pending.last_byte() {
            Some(b) => Some(b),
            None => self.committed.last_byte()
        }
    }
    /// Take the committed output, leaving the buffer empty.  Pending output
    /// that was never committed is dropped.
    pub fn take_output(&mut self) -> O {
        self.pending.clear();
        std::mem::take(&mut self.committed)
    }
    /// Describe the parser state around the pending parse point, for error
    /// reports.
    pub fn describe(&self, msg: &str) -> String {
        let p = self.pos_pending;
        let lo = p.saturating_sub(8);
        let hi = (p+8).min(self.input.len());
        let out = match self.pending.is_empty() {
            true => self.committed.context(),
            false => self.pending.context()
        };
        format!("{} at {}: next {:?} after {:?} (pending {}, output ..{})",
            msg, p, &self.input[p.min(self.input.len())..hi], &self.input[lo..p.min(self.input.len())],
            p - self.pos_committed, out)
    }
    /// Convenience for a hard syntax error at the current position.
    pub fn syntax_error(&self, msg: &str) -> Error {
        Error::Syntax(self.describe(msg))
    }
}

/// Matchers that only make sense for text input.  Anything to match is given
/// as `str`, there is no charset translation at this level.
impl <O: OutBuf> Parser<char,O> {
    /// Consume the constant string `s` if the input continues with it.
    pub fn string(&mut self, s: &str) -> bool {
        let seq: Vec<char> = s.chars().collect();
        self.literal(&seq)
    }
    /// Try each alternative in order, consuming and returning the first that
    /// matches.
    pub fn string_in<'b>(&mut self, alts: &[&'b str]) -> Option<&'b str> {
        for s in alts {
            if self.string(s) {
                return Some(s);
            }
        }
        None
    }
    /// Consume and return the next element if it is a digit in `base`.
    /// Bases up to 16 are supported, letter digits may be upper or lower
    /// case.
    pub fn digit(&mut self, base: u32) -> Option<char> {
        match self.peek() {
            Some(c) if c.is_digit(base) => {
                self.pos_pending += 1;
                Some(c)
            },
            _ => None
        }
    }
    /// Consume and return a run of one or more digits in `base`.
    pub fn digits(&mut self, base: u32) -> Option<String> {
        let mut ds = String::new();
        while let Some(d) = self.digit(base) {
            ds.push(d);
        }
        match ds.len() {
            0 => None,
            _ => Some(ds)
        }
    }
    /// Match `re` against the remaining input without consuming anything.
    /// Returns the match length in elements and the captured groups; the
    /// caller should `consume` the length if it accepts the match.
    pub fn scan(&self, re: &regex::Regex) -> Option<(usize,Vec<Option<String>>)> {
        let s: String = self.remain().iter().collect();
        let caps = re.captures(&s)?;
        let whole = caps.get(0)?;
        if whole.start() != 0 {
            return None;
        }
        let count = s[..whole.end()].chars().count();
        Some((count, caps.iter().map(|m| m.map(|x| x.as_str().to_string())).collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rollback_leaves_no_trace() {
        let mut p: Parser<char,Vec<u8>> = Parser::new("abc".chars().collect());
        p.start();
        p.consume(2).expect("consume error");
        p.gen_ascii(0x41);
        assert!(p.pending());
        p.start();
        assert!(!p.pending());
        assert_eq!(p.peek(),Some('a'));
        assert_eq!(p.take_output(),Vec::<u8>::new());
    }

    #[test]
    fn commit_promotes_output() {
        let mut p: Parser<char,Vec<u8>> = Parser::new("abc".chars().collect());
        assert!(p.string("ab"));
        p.gen_str("AB");
        p.commit();
        p.gen_ascii(0x43);
        // never committed, so dropped
        assert_eq!(p.take_output(),vec![0x41,0x42]);
    }

    #[test]
    fn consume_past_end() {
        let mut p: Parser<u8,Vec<u8>> = Parser::new(vec![1,2]);
        assert!(p.consume(3).is_err());
        // failed consume did not advance
        assert_eq!(p.peek(),Some(1));
    }

    #[test]
    fn digit_bases() {
        let mut p: Parser<char,Vec<u8>> = Parser::new("1fB2".chars().collect());
        assert_eq!(p.digits(16),Some("1fB2".to_string()));
        p.reset("0107".chars().collect());
        assert_eq!(p.digits(8),Some("0107".to_string()));
        p.reset("0102".chars().collect());
        assert_eq!(p.digits(2),Some("010".to_string()));
        assert_eq!(p.peek(),Some('2'));
    }

    #[test]
    fn literal_match() {
        let mut p: Parser<u8,Vec<u8>> = Parser::new(vec![0x3A,0xA1,0x91]);
        assert!(!p.literal(&[0x3A,0x8F]));
        assert!(p.literal(&[0x3A,0xA1]));
        assert_eq!(p.peek(),Some(0x91));
    }
}
