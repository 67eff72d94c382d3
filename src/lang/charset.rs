//! # Character Set Mapping
//!
//! A `Charset` is a total bijection between the 256 native character codes of
//! a target machine and single Unicode characters.  Totality is checked
//! eagerly at construction, so users of a built `Charset` can translate in
//! either direction without worrying about holes in the table.
//!
//! Concrete machine tables live with the language modules, e.g.
//! `msx::charsets` for the MSX2 sets.

use std::collections::HashMap;
use crate::lang::Error;

/// Total two-way mapping between native codes 0x00-0xFF and Unicode
/// characters.
pub struct Charset {
    description: String,
    forward: [char; 256],
    reverse: HashMap<char,u8>,
}

impl Charset {
    /// Build a charset from mapping slices applied in order.  A later pair
    /// overrides an earlier one for the same native code.  After all maps
    /// are applied every native code must be covered and every Unicode
    /// character must be unique, otherwise `Error::Charset`.
    pub fn new(description: &str, maps: &[&[(u8,char)]]) -> Result<Self,Error> {
        let mut forward: [Option<char>; 256] = [None; 256];
        let mut reverse: HashMap<char,u8> = HashMap::new();
        for map in maps {
            for &(n,u) in map.iter() {
                if let Some(old) = forward[n as usize] {
                    reverse.remove(&old);
                }
                forward[n as usize] = Some(u);
                reverse.insert(u,n);
            }
        }
        let missing = forward.iter().filter(|x| x.is_none()).count();
        if missing > 0 || reverse.len() != 256 {
            return Err(Error::Charset(format!(
                "incomplete charset `{}`: {} native codes unmapped, {} distinct unicode",
                description, missing, reverse.len())));
        }
        let mut built = [' '; 256];
        for (n,u) in forward.iter().enumerate() {
            match u {
                Some(c) => built[n] = *c,
                None => return Err(Error::Charset("charset table corrupt".to_string()))
            }
        }
        Ok(Self {
            description: description.to_string(),
            forward: built,
            reverse
        })
    }
    pub fn description(&self) -> &str {
        &self.description
    }
    /// native code to Unicode, total by construction
    pub fn trans(&self, native: u8) -> char {
        self.forward[native as usize]
    }
    /// Unicode to native code, `None` if this character has no native
    /// encoding in this set.
    pub fn native(&self, u: char) -> Option<u8> {
        self.reverse.get(&u).copied()
    }
}

/// Replace pairs in a mapping slice before construction, one code point at a
/// time.  Used to derive platform variants from a shared base table.  It is
/// an error to replace a code that is not in the list.
pub fn substitute(map: &[(u8,char)], replacements: &[(u8,char)]) -> Result<Vec<(u8,char)>,Error> {
    let mut out = map.to_vec();
    for &(n,u) in replacements {
        match out.iter_mut().find(|(code,_)| *code==n) {
            Some(pair) => pair.1 = u,
            None => return Err(Error::Charset(format!(
                "substitution for code 0x{:02X} but base table does not map it", n)))
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// toy total charset: everything maps into a private use block
    fn private_use() -> Vec<(u8,char)> {
        (0..=255u8).map(|n| {
            let c = char::from_u32(0xE000 + n as u32).expect("private use char");
            (n,c)
        }).collect()
    }

    #[test]
    fn total_round_trip() {
        let map = private_use();
        let cs = Charset::new("test",&[&map]).expect("charset error");
        for n in 0..=255u8 {
            assert_eq!(cs.native(cs.trans(n)),Some(n));
        }
    }

    #[test]
    fn incomplete_rejected() {
        let map: Vec<(u8,char)> = private_use().into_iter().take(255).collect();
        assert!(Charset::new("test",&[&map]).is_err());
    }

    #[test]
    fn duplicate_unicode_rejected() {
        let mut map = private_use();
        map[0x41].1 = map[0x42].1;
        assert!(Charset::new("test",&[&map]).is_err());
    }

    #[test]
    fn later_map_overrides() {
        let map = private_use();
        let over = [(0x5Cu8,'¥')];
        let cs = Charset::new("test",&[&map,&over]).expect("charset error");
        assert_eq!(cs.trans(0x5C),'¥');
        assert_eq!(cs.native('¥'),Some(0x5C));
        // the shadowed unicode char is gone from the reverse map
        assert_eq!(cs.native(char::from_u32(0xE05C).expect("char")),None);
    }

    #[test]
    fn substitution() {
        let map = private_use();
        let subbed = substitute(&map,&[(0x5C,'¥')]).expect("substitute error");
        assert_eq!(subbed[0x5C],(0x5C,'¥'));
        assert!(substitute(&map[..10],&[(0x5C,'¥')]).is_err());
    }
}
