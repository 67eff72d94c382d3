//! # `msxtok` main library
//!
//! This library converts MSX-BASIC programs between the tokenized form
//! stored in `.BAS` disk files and Unicode text.
//!
//! ## Architecture
//!
//! The conversion pipeline is built from a few pieces:
//! * `lang::parser` is a transactional scanner that both directions share
//! * `lang::charset` maps the 256 native codes of an MSX machine to Unicode
//! * `lang::msx` holds the token table, the tokenizer and the detokenizer
//! * `lang::msx::program` packs lines into a memory image and back
//!
//! The detokenizer and tokenizer are exact inverses over well formed
//! programs, so a tokenize node and a detokenize node can be composed
//! in a pipeline without loss.
//!
//! ## Character Sets
//!
//! MSX machines shipped with several national character sets.  Each one
//! is a total mapping between the 256 native codes and Unicode, selected
//! by name (at present only `ja` is wired up).  Codes 0x00-0x1F are
//! reached in strings through the 0x01 extension prefix.

pub mod lang;
pub mod commands;

type DYNERR = Box<dyn std::error::Error>;
type STDRESULT = Result<(),Box<dyn std::error::Error>>;

/// Display a tokenized program as a hex dump with the rows labeled by
/// memory address.  The right column shows the printable ASCII subset.
pub fn display_block(start_addr: u16,block: &Vec<u8>) {
    let mut slice_start = 0;
    loop {
        let row_label = start_addr as usize + slice_start;
        let mut slice_end = slice_start + 16;
        if slice_end > block.len() {
            slice_end = block.len();
        }
        let slice = block[slice_start..slice_end].to_vec();
        let txt: Vec<u8> = slice.iter().map(|c| match *c {
            x if x<32 => '.' as u8,
            x if x<127 => x,
            _ => '.' as u8
        }).collect();
        print!("{:04X} : ",row_label);
        for byte in slice {
            print!("{:02X} ",byte);
        }
        for _blank in slice_end..slice_start+16 {
            print!("   ");
        }
        println!("|+| {}",String::from_utf8_lossy(&txt));
        slice_start += 16;
        if slice_end==block.len() {
            break;
        }
    }
}
