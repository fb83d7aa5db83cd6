//! Dictionary lookup and lexical analysis.
//!
//! A dictionary begins with its separator characters, followed by the entry
//! size, a signed entry count, and the entries themselves.  A negative count
//! marks an unsorted dictionary which must be scanned linearly; sorted
//! dictionaries are binary searched.  Entries are compared on their packed
//! encoded words.
use std::cmp::Ordering;

use crate::{error::RuntimeError, zmachine::ZMachine};

/// Get the set of word separators from a dictionary
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `dictionary` - Address of the dictionary
///
/// # Returns
/// [Result] containing a vector of word separator characters or a [RuntimeError]
pub fn separators(zmachine: &ZMachine, dictionary: usize) -> Result<Vec<u8>, RuntimeError> {
    let separator_count = zmachine.read_byte(dictionary)?;
    let mut sep = Vec::new();
    for i in 1..=separator_count as usize {
        sep.push(zmachine.read_byte(dictionary + i)?);
    }

    Ok(sep)
}

/// Compare a dictionary entry against an encoded word.
///
/// The leading two encoded words are compared as a packed 32-bit integer;
/// V4+ entries continue with the third word.
fn compare_entry(
    zmachine: &ZMachine,
    address: usize,
    words: &[u16],
) -> Result<Ordering, RuntimeError> {
    let entry = zmachine.read_dword(address)?;
    let target = ((words[0] as u32) << 16) | words[1] as u32;
    match entry.cmp(&target) {
        Ordering::Equal if words.len() > 2 => {
            Ok(zmachine.read_word(address + 4)?.cmp(&words[2]))
        }
        ordering => Ok(ordering),
    }
}

/// Perform a binary search for a word in a sorted dictionary
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `address` - Address of the first entry in the dictionary
/// * `entry_count` - Number of entries in the dictionary
/// * `entry_size` - Dictionary entry size
/// * `words` - Encoded ztext for the word to find
///
/// # Returns
/// [Result] containing the address of the matching dictionary entry or 0 if
/// not found or a [RuntimeError]
fn search_entry(
    zmachine: &ZMachine,
    address: usize,
    entry_count: usize,
    entry_size: usize,
    words: &[u16],
) -> Result<usize, RuntimeError> {
    let mut min = 0_i32;
    let mut max = entry_count as i32 - 1;
    while min <= max {
        let pivot = min + ((max - min) / 2);
        let entry_address = address + (pivot as usize * entry_size);
        match compare_entry(zmachine, entry_address, words)? {
            Ordering::Greater => max = pivot - 1,
            Ordering::Less => min = pivot + 1,
            Ordering::Equal => return Ok(entry_address),
        }
    }

    Ok(0)
}

/// Perform a scan for a word in an unsorted dictionary
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `address` - Address of the first entry in the dictionary
/// * `entry_count` - Number of entries in the dictionary
/// * `entry_size` - Dictionary entry size
/// * `words` - Encoded ztext for the word to find
///
/// # Returns
/// [Result] containing the address of the matching dictionary entry or 0 if
/// not found or a [RuntimeError]
fn scan_entry(
    zmachine: &ZMachine,
    address: usize,
    entry_count: usize,
    entry_size: usize,
    words: &[u16],
) -> Result<usize, RuntimeError> {
    for i in 0..entry_count {
        let entry_address = address + (i * entry_size);
        if compare_entry(zmachine, entry_address, words)? == Ordering::Equal {
            return Ok(entry_address);
        }
    }

    Ok(0)
}

/// Find the address of the dictionary entry for a word, if any.
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `dictionary` - Address of the dictionary
/// * `word` - ZSCII characters of the word to find
///
/// # Returns
/// [Result] containing the address of the matching dictionary entry or 0 if
/// not found or a [RuntimeError]
pub fn lookup(zmachine: &ZMachine, dictionary: usize, word: &[u8]) -> Result<usize, RuntimeError> {
    let separator_count = zmachine.read_byte(dictionary)? as usize;
    let entry_size = zmachine.read_byte(dictionary + separator_count + 1)? as usize;
    let entry_count = zmachine.read_word(dictionary + separator_count + 2)? as i16;
    let word_count = if zmachine.version() < 4 { 2 } else { 3 };
    debug!(target: "app::text", "Lookup: dictionary @ {:04x}, {} entries of size {}", dictionary, entry_count, entry_size);

    let text: Vec<u16> = word.iter().map(|b| *b as u16).collect();
    let words = zmachine.codec().encode(&text, word_count);
    let address = dictionary + separator_count + 4;

    if entry_count > 0 {
        search_entry(zmachine, address, entry_count as usize, entry_size, &words)
    } else {
        scan_entry(
            zmachine,
            address,
            i16::unsigned_abs(entry_count) as usize,
            entry_size,
            &words,
        )
    }
}

/// Parse a text buffer into a parse buffer.
///
/// The input is split at spaces and at the dictionary's separators;
/// separators are themselves single-character tokens.  Each token produces a
/// 4-byte parse entry: the dictionary entry address, the token length, and
/// the token's offset in the text buffer.  Tokens missing from the
/// dictionary produce four zero bytes unless `skip_unknown` is set, in which
/// case their slots are left untouched.
///
/// # Arguments
/// * `zmachine` - Mutable reference to the zmachine
/// * `text_buffer` - Input text buffer address
/// * `parse_buffer` - Parse buffer address
/// * `dictionary` - Dictionary address
/// * `skip_unknown` - Leave parse entries alone for unrecognised words
///
/// # Returns
/// Empty [Result] or a [RuntimeError]
pub fn parse_text(
    zmachine: &mut ZMachine,
    text_buffer: usize,
    parse_buffer: usize,
    dictionary: usize,
    skip_unknown: bool,
) -> Result<(), RuntimeError> {
    let version = zmachine.version();
    let seps = separators(zmachine, dictionary)?;
    debug!(target: "app::text", "Parse: text @ {:04x}, parse @ {:04x}, dictionary @ {:04x}, skip {}", text_buffer, parse_buffer, dictionary, skip_unknown);

    let mut data = Vec::new();
    if version < 5 {
        // Buffer is 0 terminated
        let mut i = 1;
        loop {
            let b = zmachine.read_byte(text_buffer + i)?;
            if b == 0 {
                break;
            }
            data.push(b);
            i += 1;
        }
    } else {
        // Character count is stored in the second byte
        let n = zmachine.read_byte(text_buffer + 1)? as usize;
        for i in 0..n {
            data.push(zmachine.read_byte(text_buffer + 2 + i)?);
        }
    }
    let offset = if version < 5 { 1 } else { 2 };

    let mut tokens: Vec<(usize, Vec<u8>)> = Vec::new();
    let mut word = Vec::new();
    let mut start = 0;
    for (i, b) in data.iter().enumerate() {
        if *b == b' ' {
            if !word.is_empty() {
                tokens.push((start, word.clone()));
                word.clear();
            }
        } else if seps.contains(b) {
            if !word.is_empty() {
                tokens.push((start, word.clone()));
                word.clear();
            }
            tokens.push((i, vec![*b]));
        } else {
            if word.is_empty() {
                start = i;
            }
            word.push(*b);
        }
    }
    if !word.is_empty() {
        tokens.push((start, word));
    }

    let max_words = zmachine.read_byte(parse_buffer)? as usize;
    let count = usize::min(tokens.len(), max_words);
    for (k, (start, word)) in tokens.iter().take(max_words).enumerate() {
        let entry = lookup(zmachine, dictionary, word)?;
        let entry_address = parse_buffer + 2 + (4 * k);
        debug!(target: "app::text", "Parse: {:?} => {:04x}", word, entry);
        if entry > 0 {
            zmachine.write_word(entry_address, entry as u16)?;
            zmachine.write_byte(entry_address + 2, word.len() as u8)?;
            zmachine.write_byte(entry_address + 3, (start + offset) as u8)?;
        } else if !skip_unknown {
            zmachine.write_word(entry_address, 0)?;
            zmachine.write_byte(entry_address + 2, 0)?;
            zmachine.write_byte(entry_address + 3, 0)?;
        }
    }

    if !skip_unknown {
        zmachine.write_byte(parse_buffer + 1, count as u8)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::{
        assert_ok_eq,
        test_util::{mock_dictionary_v3, mock_dictionary_v4, mock_zmachine, test_map},
    };

    use super::*;

    #[test]
    fn test_separators() {
        let mut map = test_map(3);
        mock_dictionary_v3(&mut map, true);
        let zmachine = mock_zmachine(map);
        assert_ok_eq!(separators(&zmachine, 0x300), vec![b'.', b',', b'"']);
    }

    #[test]
    fn test_lookup_sorted() {
        let mut map = test_map(3);
        mock_dictionary_v3(&mut map, true);
        let zmachine = mock_zmachine(map);
        assert_ok_eq!(lookup(&zmachine, 0x300, b"and"), 0x307);
        assert_ok_eq!(lookup(&zmachine, 0x300, b"go"), 0x30E);
        assert_ok_eq!(lookup(&zmachine, 0x300, b"look"), 0x315);
        assert_ok_eq!(lookup(&zmachine, 0x300, b"north"), 0x31C);
        assert_ok_eq!(lookup(&zmachine, 0x300, b"sailor"), 0x323);
        assert_ok_eq!(lookup(&zmachine, 0x300, b"xyzzy"), 0x32A);
        assert_ok_eq!(lookup(&zmachine, 0x300, b"nope"), 0);
    }

    #[test]
    fn test_lookup_folds_case() {
        let mut map = test_map(3);
        mock_dictionary_v3(&mut map, true);
        let zmachine = mock_zmachine(map);
        assert_ok_eq!(lookup(&zmachine, 0x300, b"LOOK"), 0x315);
    }

    #[test]
    fn test_lookup_unsorted() {
        let mut map = test_map(3);
        mock_dictionary_v3(&mut map, false);
        let zmachine = mock_zmachine(map);
        assert_ok_eq!(lookup(&zmachine, 0x300, b"and"), 0x32A);
        assert_ok_eq!(lookup(&zmachine, 0x300, b"go"), 0x323);
        assert_ok_eq!(lookup(&zmachine, 0x300, b"look"), 0x31C);
        assert_ok_eq!(lookup(&zmachine, 0x300, b"north"), 0x315);
        assert_ok_eq!(lookup(&zmachine, 0x300, b"sailor"), 0x30E);
        assert_ok_eq!(lookup(&zmachine, 0x300, b"xyzzy"), 0x307);
        assert_ok_eq!(lookup(&zmachine, 0x300, b"nope"), 0);
    }

    #[test]
    fn test_lookup_v4() {
        let mut map = test_map(4);
        mock_dictionary_v4(&mut map, true);
        let zmachine = mock_zmachine(map);
        assert_ok_eq!(lookup(&zmachine, 0x300, b"hello"), 0x307);
        assert_ok_eq!(lookup(&zmachine, 0x300, b"inventory"), 0x310);
        assert_ok_eq!(lookup(&zmachine, 0x300, b"look"), 0x319);
        assert_ok_eq!(lookup(&zmachine, 0x300, b"sailor"), 0x322);
        assert_ok_eq!(lookup(&zmachine, 0x300, b"nope"), 0);
    }

    #[test]
    fn test_parse_text_v3() {
        let mut map = test_map(3);
        mock_dictionary_v3(&mut map, true);

        // Text buffer at 0x380: "go north", 0 terminated
        map[0x380] = 16;
        for (i, b) in b"go north".iter().enumerate() {
            map[0x381 + i] = *b;
        }

        // Parse buffer at 0x3A0 with room for 4 entries
        map[0x3A0] = 4;

        let mut zmachine = mock_zmachine(map);
        assert!(parse_text(&mut zmachine, 0x380, 0x3A0, 0x300, false).is_ok());
        assert_ok_eq!(zmachine.read_byte(0x3A1), 2);
        // go: length 2, offset 1
        assert_ok_eq!(zmachine.read_word(0x3A2), 0x30E);
        assert_ok_eq!(zmachine.read_byte(0x3A4), 2);
        assert_ok_eq!(zmachine.read_byte(0x3A5), 1);
        // north: length 5, offset 4
        assert_ok_eq!(zmachine.read_word(0x3A6), 0x31C);
        assert_ok_eq!(zmachine.read_byte(0x3A8), 5);
        assert_ok_eq!(zmachine.read_byte(0x3A9), 4);
    }

    #[test]
    fn test_parse_text_separator_token() {
        let mut map = test_map(3);
        mock_dictionary_v3(&mut map, true);

        // "look, sailor": the comma is a token of its own
        map[0x380] = 16;
        for (i, b) in b"look, sailor".iter().enumerate() {
            map[0x381 + i] = *b;
        }
        map[0x3A0] = 4;

        let mut zmachine = mock_zmachine(map);
        assert!(parse_text(&mut zmachine, 0x380, 0x3A0, 0x300, false).is_ok());
        assert_ok_eq!(zmachine.read_byte(0x3A1), 3);
        // look
        assert_ok_eq!(zmachine.read_word(0x3A2), 0x315);
        assert_ok_eq!(zmachine.read_byte(0x3A4), 4);
        assert_ok_eq!(zmachine.read_byte(0x3A5), 1);
        // The comma is not in the dictionary: four zero bytes
        assert_ok_eq!(zmachine.read_word(0x3A6), 0);
        assert_ok_eq!(zmachine.read_byte(0x3A8), 0);
        assert_ok_eq!(zmachine.read_byte(0x3A9), 0);
        // sailor
        assert_ok_eq!(zmachine.read_word(0x3AA), 0x323);
        assert_ok_eq!(zmachine.read_byte(0x3AC), 6);
        assert_ok_eq!(zmachine.read_byte(0x3AD), 7);
    }

    #[test]
    fn test_parse_text_max_tokens() {
        let mut map = test_map(3);
        mock_dictionary_v3(&mut map, true);

        map[0x380] = 24;
        for (i, b) in b"go north and look".iter().enumerate() {
            map[0x381 + i] = *b;
        }
        // Room for 2 entries only
        map[0x3A0] = 2;

        let mut zmachine = mock_zmachine(map);
        assert!(parse_text(&mut zmachine, 0x380, 0x3A0, 0x300, false).is_ok());
        assert_ok_eq!(zmachine.read_byte(0x3A1), 2);
        assert_ok_eq!(zmachine.read_word(0x3A2), 0x30E);
        assert_ok_eq!(zmachine.read_word(0x3A6), 0x31C);
        // The third slot was never written
        assert_ok_eq!(zmachine.read_word(0x3AA), 0);
        assert_ok_eq!(zmachine.read_byte(0x3AC), 0);
    }

    #[test]
    fn test_parse_text_v5_skip_unknown() {
        let mut map = test_map(5);
        mock_dictionary_v4(&mut map, true);

        // "adios, sailor" with character count in byte 1
        map[0x380] = 16;
        map[0x381] = 13;
        for (i, b) in b"adios, sailor".iter().enumerate() {
            map[0x382 + i] = *b;
        }

        // Parse buffer with results from a previous pass
        map[0x3A0] = 4;
        map[0x3A1] = 3;
        map[0x3A2] = 0x11;
        map[0x3A3] = 0x22;
        map[0x3A4] = 5;
        map[0x3A5] = 2;
        map[0x3A6] = 0x11;
        map[0x3A7] = 0x33;
        map[0x3A8] = 1;
        map[0x3A9] = 7;

        let mut zmachine = mock_zmachine(map);
        assert!(parse_text(&mut zmachine, 0x380, 0x3A0, 0x300, true).is_ok());
        assert_ok_eq!(zmachine.read_byte(0x3A1), 3);
        // Unknown "adios" and "," slots are untouched
        assert_ok_eq!(zmachine.read_word(0x3A2), 0x1122);
        assert_ok_eq!(zmachine.read_byte(0x3A4), 5);
        assert_ok_eq!(zmachine.read_byte(0x3A5), 2);
        assert_ok_eq!(zmachine.read_word(0x3A6), 0x1133);
        // sailor was found and stored with a V5 offset
        assert_ok_eq!(zmachine.read_word(0x3AA), 0x322);
        assert_ok_eq!(zmachine.read_byte(0x3AC), 6);
        assert_ok_eq!(zmachine.read_byte(0x3AD), 9);
    }
}
