//! # Tokenized Program Image
//!
//! A sequence of tokenized BASIC lines keyed by line number, with the
//! memory address (`txttab`) used when parsing or generating a "program
//! image": the binary format of a `.BAS` save file and of program memory
//! starting at TXTTAB.  Each line record is the address of the next line,
//! the line number (both little-endian words), the tokenized data, and a
//! 0x00 terminator; a next-address word of 0x0000 ends the image.
//!
//! The line data is opaque at this level, it may be any bytes including
//! 0x00.

use std::collections::BTreeMap;
use crate::lang::Error;

/// highest usable line number in MSX-BASIC and GW-BASIC
pub const NEW_MAXLIN: u16 = 65529;
/// highest usable line number in early 6502 BASIC
pub const OLD_MAXLIN: u16 = 63999;

/// default start-of-text address for a disk MSX-BASIC program
pub const DEFAULT_TXTTAB: u16 = 0x8001;

/// disk file type byte ahead of a tokenized program image
pub const FILE_TYPE_TOKENIZED: u8 = 0xFF;

/// Tokenized lines in line number order plus the image start address.
pub struct Program {
    lines: BTreeMap<u16,Vec<u8>>,
    txttab: u16,
    maxlin: u16,
}

impl Program {
    pub fn new(txttab: u16) -> Self {
        Self {
            lines: BTreeMap::new(),
            txttab,
            maxlin: NEW_MAXLIN
        }
    }
    /// for images from systems with the lower line number ceiling
    pub fn with_maxlin(txttab: u16, maxlin: u16) -> Self {
        Self {
            lines: BTreeMap::new(),
            txttab,
            maxlin
        }
    }
    /// Parse a program image (no leading file type byte) into a new
    /// `Program`.  `txttab` must be the start address the image was saved
    /// for, since the next-line addresses are absolute.
    pub fn from_image(txttab: u16, image: &[u8]) -> Result<Self,Error> {
        let mut prog = Self::new(txttab);
        prog.parse_image(image)?;
        Ok(prog)
    }
    pub fn txttab(&self) -> u16 {
        self.txttab
    }
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
    pub fn len(&self) -> usize {
        self.lines.len()
    }
    /// Set line `lineno` to the tokenized data `bs`, replacing any
    /// existing line with that number.
    pub fn set_line(&mut self, lineno: u16, bs: Vec<u8>) -> Result<(),Error> {
        if lineno > self.maxlin {
            return Err(Error::LineNumber(format!("line number {} out of range 0-{}",lineno,self.maxlin)));
        }
        self.lines.insert(lineno,bs);
        Ok(())
    }
    /// Line numbers and tokenized data in ascending line number order.
    pub fn lines(&self) -> impl Iterator<Item=(u16,&[u8])> {
        self.lines.iter().map(|(n,bs)| (*n,bs.as_slice()))
    }
    /// Parse the program image `image` into lines, adding them to the
    /// lines already held (a repeated line number overwrites).  The image
    /// must not include the leading file type byte.  The next-line
    /// address chain is authoritative for record bounds; each record must
    /// end with a 0x00 terminator or the data is bad (or not saved for
    /// this `txttab`).
    pub fn parse_image(&mut self, image: &[u8]) -> Result<(),Error> {
        let txttab = self.txttab as usize;
        let mut curaddr = txttab;
        loop {
            let offset = curaddr - txttab;
            let naddr = Self::word_at(image,offset,curaddr)? as usize;
            if naddr == 0 {
                return Ok(());
            }
            if naddr < txttab {
                return Err(Error::Image(format!(
                    "next-line address ${:04X} at ${:04X} is below the start of text ${:04X}",
                    naddr,curaddr,txttab)));
            }
            let noffset = naddr - txttab;
            if noffset > image.len() || noffset < offset + 5 {
                return Err(Error::Image(format!(
                    "next-line address ${:04X} at ${:04X} is outside the image",naddr,curaddr)));
            }
            let lineno = Self::word_at(image,offset+2,curaddr)?;
            log::debug!("line {} at ${:04X}, {} bytes",lineno,curaddr,noffset-offset);
            let termbyte = image[noffset-1];
            if termbyte != 0 {
                return Err(Error::Image(format!(
                    "line {} at addr ${:04X}: unexpected termination byte ${:02X} at ${:04X} (offset ${:04X})",
                    lineno,curaddr,termbyte,naddr-1,noffset-1)));
            }
            self.set_line(lineno,image[offset+4..noffset-1].to_vec())?;
            curaddr = naddr;
        }
    }
    fn word_at(image: &[u8], offset: usize, curaddr: usize) -> Result<u16,Error> {
        match image.get(offset..offset+2) {
            Some(bs) => Ok(u16::from_le_bytes([bs[0],bs[1]])),
            None => Err(Error::Image(format!("image truncated at addr ${:04X}",curaddr)))
        }
    }
    /// Generate the program image, recomputing every next-line address
    /// from `txttab`, with the 0x0000 sentinel at the end.  No leading
    /// file type byte.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut data: Vec<u8> = Vec::new();
        let mut nextaddr = self.txttab as u32;
        for (lineno,linedata) in self.lines() {
            nextaddr += 2 + 2 + linedata.len() as u32 + 1;
            data.extend_from_slice(&(nextaddr as u16).to_le_bytes());
            data.extend_from_slice(&lineno.to_le_bytes());
            data.extend_from_slice(linedata);
            data.push(0x00);
        }
        data.extend_from_slice(&[0x00,0x00]);
        data
    }
    /// Parse a `.BAS` disk file: the 0xFF type byte followed by the image.
    pub fn from_file_bytes(txttab: u16, dat: &[u8]) -> Result<Self,Error> {
        match dat.first() {
            Some(&FILE_TYPE_TOKENIZED) => Self::from_image(txttab,&dat[1..]),
            Some(b) => Err(Error::Image(format!("bad file type byte ${:02X}, expected ${:02X}",b,FILE_TYPE_TOKENIZED))),
            None => Err(Error::Image("empty file".to_string()))
        }
    }
    /// Generate a `.BAS` disk file: 0xFF type byte plus the image.
    pub fn to_file_bytes(&self) -> Vec<u8> {
        let mut dat = vec![FILE_TYPE_TOKENIZED];
        dat.append(&mut self.to_bytes());
        dat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_number_range() {
        let mut prog = Program::new(DEFAULT_TXTTAB);
        prog.set_line(0,vec![0x91]).expect("set_line error");
        prog.set_line(NEW_MAXLIN,vec![0x91]).expect("set_line error");
        assert!(prog.set_line(NEW_MAXLIN+1,vec![0x91]).is_err());
        let mut old = Program::with_maxlin(DEFAULT_TXTTAB,OLD_MAXLIN);
        assert!(old.set_line(OLD_MAXLIN+1,vec![0x91]).is_err());
    }

    #[test]
    fn duplicate_line_replaces() {
        let mut prog = Program::new(DEFAULT_TXTTAB);
        prog.set_line(10,vec![0x81]).expect("set_line error");
        prog.set_line(10,vec![0x91]).expect("set_line error");
        let lines: Vec<(u16,&[u8])> = prog.lines().collect();
        assert_eq!(lines,vec![(10u16,&[0x91u8][..])]);
    }

    #[test]
    fn serialize_two_lines() {
        // 10 PRINT / 20 END at 0x8001
        let mut prog = Program::new(0x8001);
        prog.set_line(10,vec![0x91]).expect("set_line error");
        prog.set_line(20,vec![0x81]).expect("set_line error");
        let img = prog.to_bytes();
        let expected = hex::decode("07800a009100_0d8014008100_0000".replace('_',"")).expect("hex error");
        assert_eq!(img,expected);
    }

    #[test]
    fn parse_round_trip() {
        let img = hex::decode("07800a0091000d80140081000000").expect("hex error");
        let prog = Program::from_image(0x8001,&img).expect("parse error");
        assert_eq!(prog.len(),2);
        assert_eq!(prog.to_bytes(),img);
    }

    #[test]
    fn lines_ascending_regardless_of_insert_order() {
        let mut prog = Program::new(DEFAULT_TXTTAB);
        prog.set_line(30,vec![3]).expect("set_line error");
        prog.set_line(10,vec![1]).expect("set_line error");
        prog.set_line(20,vec![2]).expect("set_line error");
        let nums: Vec<u16> = prog.lines().map(|(n,_)| n).collect();
        assert_eq!(nums,vec![10,20,30]);
    }

    #[test]
    fn bad_terminator() {
        // next addr points past a record that does not end in 0x00
        let img = hex::decode("07800a0091010000").expect("hex error");
        assert!(matches!(Program::from_image(0x8001,&img),Err(Error::Image(_))));
    }

    #[test]
    fn file_type_byte() {
        let mut prog = Program::new(0x8001);
        prog.set_line(10,vec![0x91]).expect("set_line error");
        let dat = prog.to_file_bytes();
        assert_eq!(dat[0],0xFF);
        let back = Program::from_file_bytes(0x8001,&dat).expect("parse error");
        assert_eq!(back.to_bytes(),prog.to_bytes());
        assert!(Program::from_file_bytes(0x8001,&[0xFE,0,0]).is_err());
    }

    #[test]
    fn truncated_image() {
        assert!(matches!(Program::from_image(0x8001,&[0x07]),Err(Error::Image(_))));
    }
}
