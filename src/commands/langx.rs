//! ## Tokenization Commands
//!
//! Handlers for the `tokenize`, `detokenize` and `dump` subcommands.
//! These read stdin and write stdout so they can be composed in a
//! pipeline; `tokenize` switches to a hex dump when stdout is a console.

use std::io::{Read,Write};
use colored::Colorize;
use super::CommandError;
use crate::lang;
use crate::lang::msx;
use crate::lang::msx::charsets::charset_named;
use crate::lang::msx::program::{Program,FILE_TYPE_TOKENIZED,NEW_MAXLIN,OLD_MAXLIN};
use crate::{DYNERR,STDRESULT};

const RCH: &str = "unreachable was reached";

fn get_addr(cmd: &clap::ArgMatches) -> Result<u16,DYNERR> {
    match u16::from_str_radix(cmd.get_one::<String>("addr").expect(RCH),10) {
        Ok(addr) => Ok(addr),
        Err(_) => {
            log::error!("address did not parse as decimal unsigned 16 bit integer");
            Err(Box::new(CommandError::OutOfRange))
        }
    }
}

fn read_tokenized_stdin(verb: &str) -> Result<Vec<u8>,DYNERR> {
    if atty::is(atty::Stream::Stdin) {
        log::error!("line entry is not supported for `{}`, please pipe something in",verb);
        return Err(Box::new(CommandError::InvalidCommand));
    }
    let mut tok: Vec<u8> = Vec::new();
    std::io::stdin().read_to_end(&mut tok)?;
    if tok.len()==0 {
        log::error!("{} did not receive any data from previous node",verb);
        return Err(Box::new(CommandError::InvalidCommand));
    }
    Ok(tok)
}

/// Accept either a `.BAS` disk file (0xFF type byte) or a bare memory
/// image, as both occur in pipelines.
fn program_from_bytes(addr: u16, tok: &[u8]) -> Result<Program,lang::Error> {
    match tok.first() {
        Some(&FILE_TYPE_TOKENIZED) => Program::from_file_bytes(addr,tok),
        _ => Program::from_image(addr,tok)
    }
}

pub fn tokenize(cmd: &clap::ArgMatches) -> STDRESULT {
    if atty::is(atty::Stream::Stdin) {
        log::error!("line entry is not supported for `tokenize`, please pipe something in");
        return Err(Box::new(CommandError::InvalidCommand));
    }
    let addr = get_addr(cmd)?;
    let charset = charset_named(cmd.get_one::<String>("charset").expect(RCH))?;
    let maxlin = match cmd.get_flag("old") {
        true => OLD_MAXLIN,
        false => NEW_MAXLIN
    };
    let mut program = String::new();
    match std::io::stdin().read_to_string(&mut program) {
        Ok(_) => {},
        Err(e) => {
            log::error!("the file to tokenize could not be interpreted as a string");
            return Err(Box::new(e));
        }
    }
    if program.len()==0 {
        log::error!("tokenize did not receive any data from previous node");
        return Err(Box::new(CommandError::InvalidCommand));
    }
    let mut prog = Program::with_maxlin(addr,maxlin);
    let mut tokenizer = msx::Retokenizer::new(charset);
    for line in lang::logical_lines(&program,lang::EXPANDED_COMMENT) {
        match tokenizer.tokenize_line(&line) {
            Ok((ln,tokens)) => prog.set_line(ln,tokens)?,
            Err(e) => {
                eprintln!("\u{2717} {}",e.to_string().red());
                return Err(Box::new(e));
            }
        }
    }
    if prog.is_empty() {
        log::error!("no numbered lines were found in the input");
        return Err(Box::new(CommandError::UnknownFormat));
    }
    if atty::is(atty::Stream::Stdout) || cmd.get_flag("console") {
        crate::display_block(addr,&prog.to_bytes());
    } else {
        std::io::stdout().write_all(&prog.to_file_bytes()).expect("could not write output stream");
    }
    Ok(())
}

pub fn detokenize(cmd: &clap::ArgMatches) -> STDRESULT {
    let addr = get_addr(cmd)?;
    let charset = charset_named(cmd.get_one::<String>("charset").expect(RCH))?;
    let expand = cmd.get_flag("expand");
    let binary = cmd.get_flag("binary");
    if expand && binary {
        log::error!("expanded listings are text, `--expand` excludes `--binary`");
        return Err(Box::new(CommandError::InvalidCommand));
    }
    let tok = read_tokenized_stdin("detokenize")?;
    let prog = match program_from_bytes(addr,&tok) {
        Ok(prog) => prog,
        Err(e) => {
            eprintln!("\u{2717} {}",e.to_string().red());
            return Err(Box::new(e));
        }
    };
    if binary {
        let lines = match msx::detokenize_program_raw(&prog) {
            Ok(lines) => lines,
            Err(e) => {
                eprintln!("\u{2717} {}",e.to_string().red());
                return Err(Box::new(e));
            }
        };
        let mut out = std::io::stdout();
        for line in lines {
            out.write_all(&line).expect("could not write output stream");
            out.write_all(b"\n").expect("could not write output stream");
        }
        return Ok(());
    }
    match msx::detokenize_program(charset,&prog,expand) {
        Ok(lines) => {
            for line in lines {
                println!("{}",line);
            }
            Ok(())
        },
        Err(e) => {
            eprintln!("\u{2717} {}",e.to_string().red());
            Err(Box::new(e))
        }
    }
}

pub fn dump(cmd: &clap::ArgMatches) -> STDRESULT {
    let addr = get_addr(cmd)?;
    let tok = read_tokenized_stdin("dump")?;
    let img = match tok.first() {
        Some(&FILE_TYPE_TOKENIZED) => tok[1..].to_vec(),
        _ => tok
    };
    match Program::from_image(addr,&img) {
        Ok(prog) => {
            // one block per line record, so the rows realign at each line
            let mut curaddr = addr as u32;
            for (lineno,linedata) in prog.lines() {
                let nextaddr = curaddr + 5 + linedata.len() as u32;
                let mut record: Vec<u8> = Vec::new();
                record.extend_from_slice(&(nextaddr as u16).to_le_bytes());
                record.extend_from_slice(&lineno.to_le_bytes());
                record.extend_from_slice(linedata);
                record.push(0x00);
                crate::display_block(curaddr as u16,&record);
                curaddr = nextaddr;
            }
            crate::display_block(curaddr as u16,&vec![0x00,0x00]);
        },
        Err(e) => {
            // not a clean image, show the bytes anyway
            log::warn!("{}",e);
            crate::display_block(addr,&img);
        }
    }
    Ok(())
}
