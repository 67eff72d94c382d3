use super::charsets::charset_named;
use super::retokenizer::Retokenizer;
use super::detokenizer::Detokenizer;

fn test_tokenizer(test_code: &str, expected_lineno: u16, expected_hex: &str) {
    let cs = charset_named("ja").expect("charset error");
    let (ln,bytes) = Retokenizer::new(cs).tokenize_line(test_code).expect("tokenizer failed");
    assert_eq!(ln,expected_lineno);
    assert_eq!(hex::encode_upper(bytes),expected_hex);
}

fn test_error(test_code: &str) {
    let cs = charset_named("ja").expect("charset error");
    assert!(Retokenizer::new(cs).tokenize_line(test_code).is_err(),
        "expected error for {}",test_code);
}

/// tokenize, detokenize the result, and check we got the input back
fn test_round_trip(test_code: &str) {
    let cs = charset_named("ja").expect("charset error");
    let (ln,bytes) = Retokenizer::new(cs).tokenize_line(test_code).expect("tokenizer failed");
    let text = Detokenizer::new(cs,&bytes,Some(ln),false).detokenized().expect("detokenization error");
    assert_eq!(text,test_code);
}

mod statements {
    #[test]
    fn print_string() {
        super::test_tokenizer("10 PRINT\"HI\"",10,"9122484922");
    }
    #[test]
    fn goto_packed() {
        super::test_tokenizer("10 GOTO20",10,"890E1400");
    }
    #[test]
    fn goto_spaced() {
        super::test_tokenizer("10 GOTO 20",10,"89200E1400");
    }
    #[test]
    fn negative_line_ref() {
        // accepted like the MS tokenizer; the interpreter errors at RUN
        super::test_tokenizer("10 GOTO-20",10,"89F20E1400");
    }
    #[test]
    fn then_else() {
        super::test_tokenizer("10 IF1THEN20ELSE30",10,"8B12DA0E14003AA10E1E00");
    }
    #[test]
    fn list_takes_line_ref() {
        super::test_tokenizer("10 LIST 20",10,"93200E1400");
    }
    #[test]
    fn interval_keyword() {
        super::test_tokenizer("10 INTERVAL ON",10,"FF854552FF942095");
    }
    #[test]
    fn no_leading_lineno() {
        super::test_error("PRINT 1");
    }
    #[test]
    fn lineno_out_of_range() {
        super::test_error("65530 PRINT");
        super::test_error("10 GOTO70000");
    }
}

mod integers {
    #[test]
    fn inline_digits() {
        super::test_tokenizer("10 A=0",10,"41EF11");
        super::test_tokenizer("10 A=9",10,"41EF1A");
    }
    #[test]
    fn one_byte() {
        super::test_tokenizer("10 A=10",10,"41EF0F0A");
        super::test_tokenizer("10 A=255",10,"41EF0FFF");
    }
    #[test]
    fn two_byte() {
        super::test_tokenizer("10 A=256",10,"41EF1C0001");
        super::test_tokenizer("10 A=32767",10,"41EF1CFF7F");
    }
    #[test]
    fn negative() {
        super::test_tokenizer("10 A=-1",10,"41EFF212");
    }
    #[test]
    fn percent_truncates() {
        super::test_tokenizer("10 A=3.9%",10,"41EF14");
    }
    #[test]
    fn percent_overflow() {
        super::test_error("10 A=32768%");
    }
    #[test]
    fn too_big_for_int_becomes_float() {
        super::test_tokenizer("10 A=32768",10,"41EF1D45327680");
    }
}

mod ampersand_literals {
    #[test]
    fn hex() {
        super::test_tokenizer("10 A=&HFF",10,"41EF0CFF00");
        super::test_tokenizer("10 A=&h1abe",10,"41EF0CBE1A");
    }
    #[test]
    fn octal() {
        super::test_tokenizer("10 A=&O17",10,"41EF0B0F00");
    }
    #[test]
    fn binary_stays_ascii() {
        super::test_tokenizer("10 A=&B101",10,"41EF2642313031");
    }
    #[test]
    fn bare_prefix_is_zero() {
        super::test_tokenizer("10 A=&H",10,"41EF0C0000");
    }
    #[test]
    fn overflow() {
        super::test_error("10 A=&H10000");
    }
}

mod reals {
    #[test]
    fn single_plain() {
        super::test_tokenizer("10 A=3.14",10,"41EF1D41314000");
    }
    #[test]
    fn single_fractions() {
        super::test_tokenizer("10 A=.5",10,"41EF1D40500000");
        super::test_tokenizer("10 A=.05",10,"41EF1D3F500000");
    }
    #[test]
    fn exponent_folds_into_byte() {
        super::test_tokenizer("10 A=1E-3",10,"41EF1D3E100000");
        super::test_tokenizer("10 A=1.23E+16",10,"41EF1D51123000");
    }
    #[test]
    fn d_forces_double() {
        super::test_tokenizer("10 A=1.234567890123D+15",10,"41EF1F5012345678901230");
    }
    #[test]
    fn seven_digits_promote_to_double() {
        super::test_tokenizer("10 A=1234567",10,"41EF1F4712345670000000");
    }
    #[test]
    fn fifteen_digit_int_rounds_into_double() {
        super::test_tokenizer("10 A=123456789012345",10,"41EF1F4F12345678901235");
    }
    #[test]
    fn bang_forces_single() {
        super::test_tokenizer("10 A=1234567!",10,"41EF1D47123457");
    }
    #[test]
    fn rounding_carry_quirk() {
        // carry out the front shifts right without fixing the exponent
        super::test_tokenizer("10 A=.9999999!",10,"41EF1D40100000");
    }
    #[test]
    fn zero_with_type() {
        super::test_tokenizer("10 A=0!",10,"41EF1D00000000");
        super::test_tokenizer("10 A=0#",10,"41EF1F0000000000000000");
    }
}

mod identifiers {
    #[test]
    fn digit_after_letter_is_name() {
        super::test_tokenizer("10 A1=5",10,"4131EF16");
    }
    #[test]
    fn type_sigil_passes_through() {
        super::test_tokenizer("10 A$=\"X\"",10,"4124EF225822");
    }
    #[test]
    fn keyword_takes_priority() {
        // TO matches inside what looks like a name, as the interpreter's
        // own cruncher does
        super::test_tokenizer("10 TOTAL=1",10,"D954414CEF12");
    }
    #[test]
    fn keyword_inside_name() {
        // the cruncher resumes keyword scanning inside a name, so ATOM is
        // A TO M
        super::test_tokenizer("10 ATOM=1",10,"41D94DEF12");
        super::test_round_trip("10 ATOM=1");
    }
}

mod comments_and_data {
    #[test]
    fn rem() {
        super::test_tokenizer("10 REM HELLO",10,"8F2048454C4C4F");
    }
    #[test]
    fn quote_rem() {
        super::test_tokenizer("10 'X",10,"3A8FE658");
    }
    #[test]
    fn rem_swallows_keywords() {
        super::test_tokenizer("10 REMGOTO",10,"8F474F544F");
    }
    #[test]
    fn data() {
        super::test_tokenizer("10 DATAA,B",10,"84412C42");
    }
}

mod strings {
    #[test]
    fn charset_encoding() {
        super::test_tokenizer("10 PRINT\"ヲ\"",10,"9122A622");
    }
    #[test]
    fn extended_encoding() {
        super::test_tokenizer("10 PRINT\"月\"",10,"9122014122");
    }
    #[test]
    fn yen_encodes_to_5c() {
        super::test_tokenizer("10 PRINT\"¥\"",10,"91225C22");
    }
    #[test]
    fn unencodable_char() {
        super::test_error("10 PRINT\"\u{25B3}\""); // native 0x7F cannot be encoded
        super::test_error("10 PRINT\"Ω\"");
    }
    #[test]
    fn unterminated() {
        super::test_tokenizer("10 PRINT\"HI",10,"91224849");
    }
}

mod round_trips {
    #[test]
    fn plain_statements() {
        super::test_round_trip("10 PRINT\"HI\"");
        super::test_round_trip("10 GOTO20");
        super::test_round_trip("10 FORI=1TO10:PRINTI:NEXT");
    }
    #[test]
    fn numeric_forms() {
        super::test_round_trip("10 A=3.14!");
        super::test_round_trip("10 A=1E-3");
        super::test_round_trip("10 A=1.2345678901234D+15");
        super::test_round_trip("10 A=&HFF");
        super::test_round_trip("10 A=0!");
    }
    #[test]
    fn comments() {
        super::test_round_trip("10 REM HELLO");
        super::test_round_trip("10 'X");
    }
}

mod programs {
    use super::super::program::DEFAULT_TXTTAB;
    use super::super::{tokenize_program,detokenize_program};
    use super::charset_named;

    #[test]
    fn two_lines() {
        let cs = charset_named("ja").expect("charset error");
        let prog = tokenize_program(cs,["10 PRINT","20 END"],DEFAULT_TXTTAB).expect("tokenizer failed");
        assert_eq!(hex::encode_upper(prog.to_bytes()),"07800A0091000D80140081000000");
    }
    #[test]
    fn duplicate_line_replaced() {
        let cs = charset_named("ja").expect("charset error");
        let prog = tokenize_program(cs,["10 PRINT","10 END"],DEFAULT_TXTTAB).expect("tokenizer failed");
        assert_eq!(prog.len(),1);
        let texts = detokenize_program(cs,&prog,false).expect("detokenization error");
        assert_eq!(texts,vec!["10 END".to_string()]);
    }
}
