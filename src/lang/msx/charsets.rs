//! # MSX Character Sets
//!
//! Concrete `Charset` tables for the MSX machines.  Only the Japanese MSX2
//! set is complete; the other regional sets are registered by name so the
//! user gets a useful message rather than a mistranslated program.
//!
//! Every MSX charset has a blank glyph at 0x00 (and some have more blank
//! glyphs elsewhere).  To round-trip these each differently-coded blank
//! gets a distinct Unicode character: `∅` EMPTY SET for 0x00, braille
//! patterns for the others.  Japanese has a blank at 0x7F where other sets
//! have a white triangle; since the set has no white triangle elsewhere we
//! use `△` as its placeholder.

use std::sync::LazyLock;
use crate::lang::Error;
use crate::lang::charset::{Charset,substitute};

const C7F: char = '\u{25B3}'; // △ WHITE UP-POINTING TRIANGLE

// 0x00 is ∅ EMPTY SET, the blanks at 0x90/0xA0/0xFE are braille patterns
// 1234/1235/1236
const LO_JA: &str = "\u{2205}月火水木金土日年円時分秒百千万π┴┬┤├┼│─┌┐└┘╳大中小";
const HI_JA: &str = concat!(
    "♠♡♣♢○●をぁぃぅぇぉゃゅょっ",
    "\u{280F}あいうえおかきくけこさしすせそ",
    "\u{2817}。「」、・ヲァィゥェォャュョッ",
    "ーアイウエオカキクケコサシスセソ",
    "タチツテトナニヌネノハヒフヘホマ",
    "ミムメモヤユヨラリルレロワン゛゜",
    "たちつてとなにぬねのはひふへほま",
    "みむめもやゆよらりるれろわん\u{2827}█",
);

/// ASCII printables 0x20-0x7E, common to all MSX charsets.  Control codes
/// and 0x7F (a glyph that varies by region) are not included here.
fn ascii_core() -> Vec<(u8,char)> {
    (0x20..0x7Fu8).map(|c| (c, c as char)).collect()
}

fn zip_range(start: u8, chars: &str) -> Vec<(u8,char)> {
    chars.chars().enumerate().map(|(i,c)| (start + i as u8, c)).collect()
}

/// Japanese MSX2 charset.  Same as the international set in the ASCII
/// range except `¥` replaces the backslash at 0x5C.
static JA: LazyLock<Charset> = LazyLock::new(|| {
    let lo = zip_range(0x00,LO_JA);
    let ascii = substitute(&ascii_core(),&[(0x5C,'¥')]).expect("charset table error");
    let hi = zip_range(0x80,HI_JA);
    Charset::new("Japanese (MSX2)",&[&lo,&ascii,&[(0x7F,C7F)],&hi])
        .expect("charset table error")
});

const UNIMPLEMENTED: &[(&str,&str)] = &[
    ("int","International (North America/Europe)"),
    ("ja1","Japanese (MSX1, different hiragana)"),
    ("ar","Arabic"),
    ("pt","Portuguese (Brazil)"),
    ("BR","alias for 'pt'"),
    ("ru","Russian"),
];

/// Look up a charset by its region name.  Known but unimplemented regions
/// produce a distinct message from unknown names.
pub fn charset_named(name: &str) -> Result<&'static Charset,Error> {
    if name=="ja" {
        return Ok(&JA);
    }
    if let Some((_,descr)) = UNIMPLEMENTED.iter().find(|(n,_)| *n==name) {
        return Err(Error::Charset(format!("charset '{}' ({}) is not yet implemented",name,descr)));
    }
    Err(Error::Charset(format!("unknown charset '{}': available are ja",name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const C00: char = '\u{2205}';
    const C90: char = '\u{280F}';
    const CA0: char = '\u{2817}';
    const CFE: char = '\u{2827}';

    #[test]
    fn ja_is_total() {
        let cs = charset_named("ja").expect("charset error");
        for n in 0..=255u8 {
            let u = cs.trans(n);
            assert_eq!(cs.native(u),Some(n),"code 0x{:02X} ({})",n,u);
        }
    }

    #[test]
    fn ja_spot_checks() {
        let cs = charset_named("ja").expect("charset error");
        assert_eq!(cs.trans(0x00),C00);
        assert_eq!(cs.trans(0x01),'月');
        assert_eq!(cs.trans(0x41),'A');
        assert_eq!(cs.trans(0x5C),'¥');
        assert_eq!(cs.trans(0x7F),C7F);
        assert_eq!(cs.trans(0x80),'♠');
        assert_eq!(cs.trans(0x90),C90);
        assert_eq!(cs.trans(0xA0),CA0);
        assert_eq!(cs.trans(0xA6),'ヲ');
        assert_eq!(cs.trans(0xFE),CFE);
        assert_eq!(cs.trans(0xFF),'█');
        assert_eq!(cs.native('¥'),Some(0x5C));
        assert_eq!(cs.native('\\'),None);
    }

    #[test]
    fn named_lookup_errors() {
        assert!(matches!(charset_named("int"),Err(Error::Charset(_))));
        assert!(matches!(charset_named("xyzzy"),Err(Error::Charset(_))));
    }
}
