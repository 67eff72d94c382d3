//! # MSX-BASIC Token Table
//!
//! Token values mostly from MSX2 Technical Handbook, table 2.20.
//! <https://github.com/Konamiman/MSX2-Technical-Handbook/blob/master/md/Chapter2.md>
//!
//! A few keywords are stored as a sequence rather than a single token:
//! `ELSE` is always a colon followed by the ELSE token, the single-quote
//! comment is colon, REM token, 0xE6, and `INTERVAL` is tokenized as
//! INT, the ASCII letters `ER`, and VAL.  These get their own entries so
//! they always match in full and are never split by spacing logic.

use std::sync::LazyLock;
use crate::lang::Error;

/// keyword is followed by a line number tokenized with 0x0E
pub const LINENO: u8 = 1;

pub struct Token {
    pub bytes: &'static [u8],
    pub text: &'static str,
    pub flags: u8,
}

impl Token {
    pub fn takes_lineno(&self) -> bool {
        self.flags & LINENO != 0
    }
}

const fn tk(bytes: &'static [u8], text: &'static str, flags: u8) -> Token {
    Token { bytes, text, flags }
}

pub const TOKENS: &[Token] = &[
    tk(b":\xA1",     "ELSE",     LINENO),
    tk(b":\x8F\xE6", "'",        0), // alternative form of REM
    tk(b"\x81",      "END",      0),
    tk(b"\x82",      "FOR",      0),
    tk(b"\x83",      "NEXT",     0),
    tk(b"\x84",      "DATA",     0),
    tk(b"\x85",      "INPUT",    0),
    tk(b"\x86",      "DIM",      0),
    tk(b"\x87",      "READ",     0),
    tk(b"\x88",      "LET",      0),
    tk(b"\x89",      "GOTO",     LINENO),
    tk(b"\x8A",      "RUN",      LINENO),
    tk(b"\x8B",      "IF",       0),
    tk(b"\x8C",      "RESTORE",  LINENO),
    tk(b"\x8D",      "GOSUB",    LINENO),
    tk(b"\x8E",      "RETURN",   LINENO),
    tk(b"\x8F",      "REM",      0),
    tk(b"\x90",      "STOP",     0),
    tk(b"\x91",      "PRINT",    0),
    tk(b"\x92",      "CLEAR",    0),
    tk(b"\x93",      "LIST",     LINENO),
    tk(b"\x94",      "NEW",      0),
    tk(b"\x95",      "ON",       0),
    tk(b"\x96",      "WAIT",     0),
    tk(b"\x97",      "DEF",      0),
    tk(b"\x98",      "POKE",     0),
    tk(b"\x99",      "CONT",     0),
    tk(b"\x9A",      "CSAVE",    0),
    tk(b"\x9B",      "CLOAD",    0),
    tk(b"\x9C",      "OUT",      0),
    tk(b"\x9D",      "LPRINT",   0),
    tk(b"\x9E",      "LLIST",    LINENO),
    tk(b"\x9F",      "CLS",      0),
    tk(b"\xA0",      "WIDTH",    0),
    tk(b"\xA2",      "TRON",     0),
    tk(b"\xA3",      "TROFF",    0),
    tk(b"\xA4",      "SWAP",     0),
    tk(b"\xA5",      "ERASE",    0),
    tk(b"\xA6",      "ERROR",    0),
    tk(b"\xA7",      "RESUME",   LINENO),
    tk(b"\xA8",      "DELETE",   LINENO),
    tk(b"\xA9",      "AUTO",     LINENO),
    tk(b"\xAA",      "RENUM",    LINENO),
    tk(b"\xAB",      "DEFSTR",   0),
    tk(b"\xAC",      "DEFINT",   0),
    tk(b"\xAD",      "DEFSNG",   0),
    tk(b"\xAE",      "DEFDBL",   0),
    tk(b"\xAF",      "LINE",     0),
    tk(b"\xB0",      "OPEN",     0),
    tk(b"\xB1",      "FIELD",    0),
    tk(b"\xB2",      "GET",      0),
    tk(b"\xB3",      "PUT",      0),
    tk(b"\xB4",      "CLOSE",    0),
    tk(b"\xB5",      "LOAD",     0),
    tk(b"\xB6",      "MERGE",    0),
    tk(b"\xB7",      "FILES",    0),
    tk(b"\xB8",      "LSET",     0),
    tk(b"\xB9",      "RSET",     0),
    tk(b"\xBA",      "SAVE",     0),
    tk(b"\xBB",      "LFILES",   0),
    tk(b"\xBC",      "CIRCLE",   0),
    tk(b"\xBD",      "COLOR",    0),
    tk(b"\xBE",      "DRAW",     0),
    tk(b"\xBF",      "PAINT",    0),
    tk(b"\xC0",      "BEEP",     0),
    tk(b"\xC1",      "PLAY",     0),
    tk(b"\xC2",      "PSET",     0),
    tk(b"\xC3",      "PRESET",   0),
    tk(b"\xC4",      "SOUND",    0),
    tk(b"\xC5",      "SCREEN",   0),
    tk(b"\xC6",      "VPOKE",    0),
    tk(b"\xC7",      "SPRITE",   0),
    tk(b"\xC8",      "VDP",      0),
    tk(b"\xC9",      "BASE",     0),
    tk(b"\xCA",      "CALL",     0),
    tk(b"\xCB",      "TIME",     0),
    tk(b"\xCC",      "KEY",      0),
    tk(b"\xCD",      "MAX",      0),
    tk(b"\xCE",      "MOTOR",    0),
    tk(b"\xCF",      "BLOAD",    0),
    tk(b"\xD0",      "BSAVE",    0),
    tk(b"\xD1",      "DSKO$",    0),
    tk(b"\xD2",      "SET",      0),
    tk(b"\xD3",      "NAME",     0),
    tk(b"\xD4",      "KILL",     0),
    tk(b"\xD5",      "IPL",      0),
    tk(b"\xD6",      "COPY",     0),
    tk(b"\xD7",      "CMD",      0),
    tk(b"\xD8",      "LOCATE",   0),
    tk(b"\xD9",      "TO",       0),
    tk(b"\xDA",      "THEN",     LINENO),
    tk(b"\xDB",      "TAB(",     0),
    tk(b"\xDC",      "STEP",     0),
    tk(b"\xDD",      "USR",      0),
    tk(b"\xDE",      "FN",       0),
    tk(b"\xDF",      "SPC(",     0),
    tk(b"\xE0",      "NOT",      0),
    tk(b"\xE1",      "ERL",      LINENO),
    tk(b"\xE2",      "ERR",      0),
    tk(b"\xE3",      "STRING$",  0),
    tk(b"\xE4",      "USING",    0),
    tk(b"\xE5",      "INSTR",    0),
    tk(b"\xE7",      "VARPTR",   0),
    tk(b"\xE8",      "CSRLIN",   0),
    tk(b"\xE9",      "ATTR$",    0),
    tk(b"\xEA",      "DSKI$",    0),
    tk(b"\xEB",      "OFF",      0),
    tk(b"\xEC",      "INKEY$",   0),
    tk(b"\xED",      "POINT",    0),
    tk(b"\xEE",      ">",        0),
    tk(b"\xEF",      "=",        0),
    tk(b"\xF0",      "<",        0),
    tk(b"\xF1",      "+",        0),
    tk(b"\xF2",      "-",        0),
    tk(b"\xF3",      "*",        0),
    tk(b"\xF4",      "/",        0),
    tk(b"\xF5",      "^",        0),
    tk(b"\xF6",      "AND",      0),
    tk(b"\xF7",      "OR",       0),
    tk(b"\xF8",      "XOR",      0),
    tk(b"\xF9",      "EQV",      0),
    tk(b"\xFA",      "IMP",      0),
    tk(b"\xFB",      "MOD",      0),
    tk(b"\xFC",      "\\",       0),
    tk(b"\xFF\x81",  "LEFT$",    0),
    tk(b"\xFF\x82",  "RIGHT$",   0),
    tk(b"\xFF\x83",  "MID$",     0),
    tk(b"\xFF\x84",  "SGN",      0),
    tk(b"\xFF\x85",  "INT",      0),
    tk(b"\xFF\x86",  "ABS",      0),
    tk(b"\xFF\x87",  "SQR",      0),
    tk(b"\xFF\x88",  "RND",      0),
    tk(b"\xFF\x89",  "SIN",      0),
    tk(b"\xFF\x8A",  "LOG",      0),
    tk(b"\xFF\x8B",  "EXP",      0),
    tk(b"\xFF\x8C",  "COS",      0),
    tk(b"\xFF\x8D",  "TAN",      0),
    tk(b"\xFF\x8E",  "ATN",      0),
    tk(b"\xFF\x8F",  "FRE",      0),
    tk(b"\xFF\x90",  "INP",      0),
    tk(b"\xFF\x91",  "POS",      0),
    tk(b"\xFF\x92",  "LEN",      0),
    tk(b"\xFF\x93",  "STR$",     0),
    tk(b"\xFF\x94",  "VAL",      0),
    tk(b"\xFF\x95",  "ASC",      0),
    tk(b"\xFF\x96",  "CHR$",     0),
    tk(b"\xFF\x97",  "PEEK",     0),
    tk(b"\xFF\x98",  "VPEEK",    0),
    tk(b"\xFF\x99",  "SPACE$",   0),
    tk(b"\xFF\x9A",  "OCT$",     0),
    tk(b"\xFF\x9B",  "HEX$",     0),
    tk(b"\xFF\x9C",  "LPOS",     0),
    tk(b"\xFF\x9D",  "BIN$",     0),
    tk(b"\xFF\x9E",  "CINT",     0),
    tk(b"\xFF\x9F",  "CSNG",     0),
    tk(b"\xFF\xA0",  "CDBL",     0),
    tk(b"\xFF\xA1",  "FIX",      0),
    tk(b"\xFF\xA2",  "STICK",    0),
    tk(b"\xFF\xA3",  "STRIG",    0),
    tk(b"\xFF\xA4",  "PDL",      0),
    tk(b"\xFF\xA5",  "PAD",      0),
    tk(b"\xFF\xA6",  "DSKF",     0),
    tk(b"\xFF\xA7",  "FPOS",     0),
    tk(b"\xFF\xA8",  "CVI",      0),
    tk(b"\xFF\xA9",  "CVS",      0),
    tk(b"\xFF\xAA",  "CVD",      0),
    tk(b"\xFF\xAB",  "EOF",      0),
    tk(b"\xFF\xAC",  "LOC",      0),
    tk(b"\xFF\xAD",  "LOF",      0),
    tk(b"\xFF\xAE",  "MKI$",     0),
    tk(b"\xFF\xAF",  "MKS$",     0),
    tk(b"\xFF\xB0",  "MKD$",     0),
    tk(b"\xFF\x85ER\xFF\x94", "INTERVAL", 0),
];

/// Tokens in decreasing encoded length, so a byte sequence always matches
/// before its own prefix when detokenizing.
pub static DETOKENS: LazyLock<Vec<&'static Token>> = LazyLock::new(|| {
    let mut v: Vec<&Token> = TOKENS.iter().collect();
    v.sort_by(|a,b| b.bytes.len().cmp(&a.bytes.len()));
    v
});

/// Tokens in decreasing keyword length, so a keyword always matches before
/// its own prefix when tokenizing.
pub static RETOKENS: LazyLock<Vec<&'static Token>> = LazyLock::new(|| {
    let mut v: Vec<&Token> = TOKENS.iter().collect();
    v.sort_by(|a,b| b.text.len().cmp(&a.text.len()));
    v
});

/// Get the encoding (1 or more bytes) of the token for keyword `text`.
/// The table must have exactly one entry for it.
pub fn token_bytes(text: &str) -> Result<&'static [u8],Error> {
    let mut found = TOKENS.iter().filter(|t| t.text==text);
    match (found.next(),found.next()) {
        (Some(t),None) => Ok(t.bytes),
        _ => Err(Error::Tokenization(format!("token table error: bad entry count for `{}`",text)))
    }
}

pub const SPACE: u8 = b' ';
pub const DQUOTE: u8 = b'"';
pub const COMMA: u8 = b',';
pub const COLON: u8 = b':';
pub const T_DATA: u8 = 0x84;
pub const T_REM: u8 = 0x8F;
/// tokens for the single-quote alternative form of REM, without leading `:`
pub const T_QREM1: u8 = 0x8F;
pub const T_QREM2: u8 = 0xE6;
/// ELSE token without the leading `:`
pub const T_ELSE1: u8 = 0xA1;
pub const T_EQ: u8 = 0xEF;
/// unary minus, put ahead of negative numeric constants
pub const NEGATIVE: u8 = 0xF2;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_agree_with_table() {
        assert_eq!(token_bytes("DATA").expect("lookup"),&[T_DATA]);
        assert_eq!(token_bytes("REM").expect("lookup"),&[T_REM]);
        assert_eq!(token_bytes("'").expect("lookup"),&[COLON,T_QREM1,T_QREM2]);
        assert_eq!(token_bytes("ELSE").expect("lookup"),&[COLON,T_ELSE1]);
        assert_eq!(token_bytes("=").expect("lookup"),&[T_EQ]);
        assert_eq!(token_bytes("-").expect("lookup"),&[NEGATIVE]);
    }

    #[test]
    fn longest_first_orders() {
        assert_eq!(DETOKENS[0].text,"INTERVAL");
        assert_eq!(RETOKENS[0].text,"INTERVAL");
        // every 2-byte encoding sorts ahead of every 1-byte encoding
        let pos_else = DETOKENS.iter().position(|t| t.text=="ELSE").expect("ELSE");
        let pos_end = DETOKENS.iter().position(|t| t.text=="END").expect("END");
        assert!(pos_else < pos_end);
        // INSTR must match before INT when tokenizing
        let pos_instr = RETOKENS.iter().position(|t| t.text=="INSTR").expect("INSTR");
        let pos_int = RETOKENS.iter().position(|t| t.text=="INT").expect("INT");
        assert!(pos_instr < pos_int);
    }

    #[test]
    fn lineno_flags() {
        for text in ["GOTO","GOSUB","THEN","ELSE","RUN","RESTORE","RETURN","LIST",
                     "LLIST","RESUME","DELETE","AUTO","RENUM","ERL"] {
            let t = TOKENS.iter().find(|t| t.text==text).expect("keyword");
            assert!(t.takes_lineno(),"{} should take a line number",text);
        }
        for text in ["PRINT","FOR","TO","REM","'"] {
            let t = TOKENS.iter().find(|t| t.text==text).expect("keyword");
            assert!(!t.takes_lineno(),"{} should not take a line number",text);
        }
    }
}
