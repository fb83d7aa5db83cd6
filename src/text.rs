//! ZSCII text encoding.
//!
//! Z-characters are 5-bit symbols packed three to a word, interpreted
//! through one of three alphabets.  The [Codec] caches everything the
//! header configures - alphabet tables, abbreviations, and the ZSCII to
//! Unicode translation - and decodes or encodes against those caches.
use std::collections::HashMap;

use crate::{
    error::*,
    fatal_error,
    header::{self, HeaderField},
    memory::Memory,
};

/// Version 1 alphabet rows
const ALPHABET_V1: [[char; 26]; 3] = [
    [
        'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r',
        's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
    ],
    [
        'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R',
        'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
    ],
    [
        ' ', '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', '.', ',', '!', '?', '_', '#', '\'',
        '"', '/', '\\', '<', '-', ':', '(', ')',
    ],
];

/// Version 2+ alphabet rows.  Z-char 7 in A2 is newline.
const ALPHABET_V2: [[char; 26]; 3] = [
    [
        'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r',
        's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
    ],
    [
        'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R',
        'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
    ],
    [
        ' ', '\n', '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', '.', ',', '!', '?', '_', '#',
        '\'', '"', '/', '\\', '-', ':', '(', ')',
    ],
];

/// Default Unicode translations for ZSCII 155..=223
const UNICODE_DEFAULT: [char; 69] = [
    'ä', 'ö', 'ü', 'Ä', 'Ö', 'Ü', 'ß', '»', '«', 'ë', 'ï', 'ÿ', 'Ë', 'Ï', 'á', 'é', 'í', 'ó',
    'ú', 'ý', 'Á', 'É', 'Í', 'Ó', 'Ú', 'Ý', 'à', 'è', 'ì', 'ò', 'ù', 'À', 'È', 'Ì', 'Ò', 'Ù',
    'â', 'ê', 'î', 'ô', 'û', 'Â', 'Ê', 'Î', 'Ô', 'Û', 'å', 'Å', 'ø', 'Ø', 'ã', 'ñ', 'õ', 'Ã',
    'Ñ', 'Õ', 'æ', 'Æ', 'ç', 'Ç', 'þ', 'ð', 'Þ', 'Ð', '£', 'œ', 'Œ', '¡', '¿',
];

/// Encode 3 5-bit z-characters into a word
///
/// # Arguments
/// * `z1` - first character
/// * `z2` - second character
/// * `z3` - third character
///
/// # Returns
/// Word encoding of the sequence: 0zzzzzyy yyyxxxxx
fn as_word(z1: u16, z2: u16, z3: u16) -> u16 {
    ((z1 & 0x1F) << 10) | ((z2 & 0x1F) << 5) | z3 & 0x1F
}

/// Text codec.
///
/// Built once per loaded story; caches the alphabet rows, the decoded
/// abbreviation strings, and both directions of the ZSCII/Unicode mapping.
pub struct Codec {
    /// ZCode version
    version: u8,
    /// Alphabet rows A0/A1/A2
    alphabet: [[char; 26]; 3],
    /// Decoded abbreviations
    abbreviations: Vec<String>,
    /// ZSCII to Unicode
    unicode: [char; 256],
    /// Unicode to ZSCII, ASCII winning over extended duplicates
    zscii: HashMap<char, u8>,
}

impl Codec {
    /// Constructor.
    ///
    /// Reads the version, alphabet, abbreviation, and Unicode translation
    /// tables from the header and builds all caches.
    ///
    /// # Arguments
    /// * `memory` - Reference to the memory map
    ///
    /// # Returns
    /// [Result] with the codec or a [RuntimeError]
    pub fn new(memory: &Memory) -> Result<Codec, RuntimeError> {
        let version = header::field_byte(memory, HeaderField::Version)?;
        let unicode = unicode_table(memory, version)?;
        let alphabet = alphabet_table(memory, version, &unicode)?;

        let mut zscii = HashMap::new();
        for i in (0..256).rev() {
            if unicode[i] != char::REPLACEMENT_CHARACTER && unicode[i] != '\0' {
                zscii.insert(unicode[i], i as u8);
            }
        }

        let mut codec = Codec {
            version,
            alphabet,
            abbreviations: Vec::new(),
            unicode,
            zscii,
        };

        let count = match version {
            1 => 0,
            2 => 32,
            _ => 96,
        };
        let table = header::field_word(memory, HeaderField::AbbreviationsTable)? as usize;
        if table > 0 {
            for i in 0..count {
                let word_addr = memory.read_word(table + (i * 2))? as usize;
                let (text, _) = codec.decode_text(memory, word_addr * 2, false)?;
                codec.abbreviations.push(text);
            }
        }

        debug!(target: "app::text", "Codec: version {}, {} abbreviations", version, codec.abbreviations.len());
        Ok(codec)
    }

    /// Decode z-text at an address to a string.
    ///
    /// # Arguments
    /// * `memory` - Reference to the memory map
    /// * `address` - Address of the text
    ///
    /// # Returns
    /// [Result] with (decoded text, address of the byte after the terminating
    /// word) or a [RuntimeError]
    pub fn decode(&self, memory: &Memory, address: usize) -> Result<(String, usize), RuntimeError> {
        self.decode_text(memory, address, true)
    }

    /// Decode z-text, optionally forbidding abbreviations.
    ///
    /// Abbreviations may not contain abbreviations.
    fn decode_text(
        &self,
        memory: &Memory,
        address: usize,
        allow_abbreviations: bool,
    ) -> Result<(String, usize), RuntimeError> {
        let mut s = String::new();
        // Alphabet selected for the next character only
        let mut alphabet: usize = 0;
        // Alphabet locked by V1/V2 shift-lock characters
        let mut alphabet_lock: usize = 0;
        // 1-3: abbreviation row, 4-5: 10-bit ZSCII assembly
        let mut special = 0;
        let mut zscii_high = 0;
        let mut addr = address;

        loop {
            let w = memory.read_word(addr)?;
            addr += 2;
            for z in [(w >> 10) as u8 & 0x1F, (w >> 5) as u8 & 0x1F, w as u8 & 0x1F] {
                // Shift characters hold the selected alphabet for one more
                // z-character; everything else releases it
                let shift = if self.version < 3 {
                    matches!(z, 2..=5) && special == 0
                } else {
                    matches!(z, 4 | 5) && special == 0
                };

                match special {
                    1..=3 => {
                        if !allow_abbreviations {
                            return fatal_error!(
                                ErrorCode::InvalidAbbreviation,
                                "Abbreviations can't nest"
                            );
                        }
                        let index = ((special - 1) * 32) + z as usize;
                        match self.abbreviations.get(index) {
                            Some(a) => s.push_str(a),
                            None => {
                                return fatal_error!(
                                    ErrorCode::InvalidAbbreviation,
                                    "Abbreviation {} not in table of {}",
                                    index,
                                    self.abbreviations.len()
                                )
                            }
                        }
                        special = 0;
                    }
                    4 => {
                        zscii_high = z;
                        special = 5;
                    }
                    5 => {
                        let c = ((zscii_high as u16) << 5) | z as u16;
                        if c >= 256 {
                            s.push(char::REPLACEMENT_CHARACTER);
                        } else {
                            s.push(self.unicode[c as usize]);
                        }
                        special = 0;
                    }
                    _ => match z {
                        0 => s.push(' '),
                        1 => {
                            if self.version == 1 {
                                s.push('\n');
                            } else {
                                special = 1;
                            }
                        }
                        2 | 3 => {
                            if self.version < 3 {
                                alphabet = (alphabet_lock + z as usize - 1) % 3;
                            } else {
                                special = z as usize;
                            }
                        }
                        4 | 5 => {
                            if self.version < 3 {
                                alphabet_lock = (alphabet_lock + z as usize - 3) % 3;
                                alphabet = alphabet_lock;
                            } else {
                                alphabet = z as usize - 3;
                            }
                        }
                        6 if alphabet == 2 => special = 4,
                        _ => s.push(self.alphabet[alphabet][z as usize - 6]),
                    },
                }

                if !shift {
                    alphabet = alphabet_lock;
                }
            }

            if w & 0x8000 == 0x8000 {
                return Ok((s, addr));
            }
        }
    }

    /// Find the z-character sequence for a ZSCII character.
    ///
    /// # Arguments
    /// * `zscii` - ZSCII character
    ///
    /// # Returns
    /// Z-characters, including any required alphabet shift.  A character
    /// outside the alphabet rows becomes a 4 z-character A2 escape.
    fn find_zchars(&self, zscii: u16) -> Vec<u16> {
        // Upper case folds to lower before the alphabet lookup
        let zscii = if (b'A' as u16..=b'Z' as u16).contains(&zscii) {
            zscii + 32
        } else {
            zscii
        };
        let c = if zscii < 256 {
            self.unicode[zscii as usize]
        } else {
            char::REPLACEMENT_CHARACTER
        };
        if c == ' ' {
            return vec![0];
        }

        let (shift_1, shift_2) = if self.version < 3 { (2, 3) } else { (4, 5) };
        for i in 0..26 {
            if self.alphabet[0][i] == c {
                return vec![i as u16 + 6];
            }
        }

        for i in 0..26 {
            if self.alphabet[1][i] == c {
                return vec![shift_1, i as u16 + 6];
            }
        }

        for i in 0..26 {
            if self.alphabet[2][i] == c {
                return vec![shift_2, i as u16 + 6];
            }
        }

        vec![shift_2, 6, (zscii >> 5) & 0x1F, zscii & 0x1F]
    }

    /// Encode a word for dictionary lookup.
    ///
    /// # Arguments
    /// * `text` - ZSCII characters of the word
    /// * `words` - number of encoded words to produce: 2 (6 z-characters)
    ///   for V1-3, 3 (9 z-characters) for V4+
    ///
    /// # Returns
    /// Packed words, padded with z-character 5 and silently truncated on
    /// overflow, with the terminator bit set on the last word
    pub fn encode(&self, text: &[u16], words: usize) -> Vec<u16> {
        let mut zchars = Vec::new();
        for c in text.iter().take(words * 3) {
            zchars.append(&mut self.find_zchars(*c));
        }

        zchars.resize(words * 3, 5);
        debug!(target: "app::text", "Encode: zchars {:?}", zchars);

        let mut zwords = Vec::new();
        for i in 0..words {
            let index = i * 3;
            let mut w = as_word(zchars[index], zchars[index + 1], zchars[index + 2]);
            if i == words - 1 {
                w |= 0x8000;
            }
            zwords.push(w);
        }

        zwords
    }

    /// Translate a ZSCII character to Unicode.
    ///
    /// # Arguments
    /// * `zscii` - ZSCII character
    ///
    /// # Returns
    /// Unicode character, or U+FFFD for undefined codes
    pub fn to_unicode(&self, zscii: u16) -> char {
        if zscii < 256 {
            self.unicode[zscii as usize]
        } else {
            char::REPLACEMENT_CHARACTER
        }
    }

    /// Translate an input character to ZSCII.
    ///
    /// Plain ASCII and ZSCII function keys pass through; anything else is
    /// resolved through the reverse Unicode table, falling back to `?`.
    ///
    /// # Arguments
    /// * `c` - Input character: a ZSCII byte or a Unicode scalar value
    ///
    /// # Returns
    /// ZSCII character
    pub fn to_zscii(&self, c: u16) -> u8 {
        if c < 128 {
            c as u8
        } else if c < 155 {
            // Keypad and function key codes
            c as u8
        } else {
            match char::from_u32(c as u32) {
                Some(ch) => match self.zscii.get(&ch) {
                    Some(z) => *z,
                    None => b'?',
                },
                None => b'?',
            }
        }
    }
}

/// Build the ZSCII to Unicode translation table.
///
/// The default extended range may be replaced by a custom table referenced
/// from the V5+ extension header.
fn unicode_table(memory: &Memory, version: u8) -> Result<[char; 256], RuntimeError> {
    let mut table = [char::REPLACEMENT_CHARACTER; 256];
    table[0] = '\0';
    table[9] = '\t';
    table[11] = ' ';
    table[13] = '\n';
    for (i, slot) in table.iter_mut().enumerate().take(127).skip(32) {
        *slot = i as u8 as char;
    }

    let custom = if version >= 5 {
        let extension = header::field_word(memory, HeaderField::ExtensionTable)? as usize;
        if extension > 0 && memory.read_word(extension)? >= 3 {
            memory.read_word(extension + 6)? as usize
        } else {
            0
        }
    } else {
        0
    };

    if custom > 0 {
        let count = memory.read_byte(custom)? as usize;
        for i in 0..usize::min(count, 97) {
            let w = memory.read_word(custom + 1 + (i * 2))?;
            table[155 + i] = char::from_u32(w as u32).unwrap_or(char::REPLACEMENT_CHARACTER);
        }
    } else {
        for (i, c) in UNICODE_DEFAULT.iter().enumerate() {
            table[155 + i] = *c;
        }
    }

    Ok(table)
}

/// Build the alphabet rows.
///
/// V5+ stories may carry a custom 78-byte table of ZSCII characters; z-char
/// 7 of A2 remains newline regardless.
fn alphabet_table(
    memory: &Memory,
    version: u8,
    unicode: &[char; 256],
) -> Result<[[char; 26]; 3], RuntimeError> {
    let custom = if version >= 5 {
        header::field_word(memory, HeaderField::AlphabetTable)? as usize
    } else {
        0
    };

    if custom > 0 {
        let mut table = [[' '; 26]; 3];
        for (row, table_row) in table.iter_mut().enumerate() {
            for (i, slot) in table_row.iter_mut().enumerate() {
                let z = memory.read_byte(custom + (row * 26) + i)? as usize;
                *slot = unicode[z];
            }
        }
        table[2][1] = '\n';
        Ok(table)
    } else if version == 1 {
        Ok(ALPHABET_V1)
    } else {
        Ok(ALPHABET_V2)
    }
}

#[cfg(test)]
mod tests {
    use crate::{assert_ok, test_util::test_map};

    use super::*;

    fn codec(map: Vec<u8>) -> Codec {
        let memory = assert_ok!(Memory::new(map));
        assert_ok!(Codec::new(&memory))
    }

    fn decode(map: Vec<u8>, address: usize) -> (String, usize) {
        let memory = assert_ok!(Memory::new(map));
        let codec = assert_ok!(Codec::new(&memory));
        assert_ok!(codec.decode(&memory, address))
    }

    #[test]
    fn test_decode_a0() {
        let mut map = test_map(3);
        // hello
        //   13    10    17       17    20    5
        // 0 01101 01010 10001  1 10001 10100 00101
        map[0x300] = 0x35;
        map[0x301] = 0x51;
        map[0x302] = 0xC6;
        map[0x303] = 0x85;
        let (text, next) = decode(map, 0x300);
        assert_eq!(text, "hello");
        assert_eq!(next, 0x304);
    }

    #[test]
    fn test_decode_shifts() {
        let mut map = test_map(3);
        // Hi!
        //   4     13    14       5     20    5
        // 0 00100 01101 01110  1 00101 10100 00101
        map[0x300] = 0x11;
        map[0x301] = 0xAE;
        map[0x302] = 0x96;
        map[0x303] = 0x85;
        let (text, _) = decode(map, 0x300);
        assert_eq!(text, "Hi!");
    }

    #[test]
    fn test_decode_newline_v3() {
        let mut map = test_map(3);
        // a<newline>b: newline is z-char 7 in A2
        //   6     5     7        7     5     5
        // 0 00110 00101 00111  1 00111 00101 00101
        map[0x300] = 0x18;
        map[0x301] = 0xA7;
        map[0x302] = 0x9C;
        map[0x303] = 0xA5;
        let (text, _) = decode(map, 0x300);
        assert_eq!(text, "a\nb");
    }

    #[test]
    fn test_decode_zscii_escape() {
        let mut map = test_map(3);
        // @ is ZSCII 64: escape 5 6, then 2, 0
        //   5     6     2        0     5     5
        // 0 00101 00110 00010  1 00000 00101 00101
        map[0x300] = 0x14;
        map[0x301] = 0xC2;
        map[0x302] = 0x80;
        map[0x303] = 0xA5;
        let (text, _) = decode(map, 0x300);
        assert_eq!(text, "@");
    }

    #[test]
    fn test_decode_zscii_escape_out_of_range() {
        let mut map = test_map(3);
        // Escape assembling (31 << 5) | 31 = 1023
        //   5     6     31       31    5     5
        // 0 00101 00110 11111  1 11111 00101 00101
        map[0x300] = 0x14;
        map[0x301] = 0xDF;
        map[0x302] = 0xFC;
        map[0x303] = 0xA5;
        let (text, _) = decode(map, 0x300);
        assert_eq!(text, "\u{FFFD}");
    }

    #[test]
    fn test_decode_abbreviation() {
        let mut map = test_map(3);
        // Abbreviations table at 0x200; entry 0.0 points at 0x400
        map[0x18] = 0x02;
        map[0x200] = 0x02;
        map[0x201] = 0x00;
        // "The "
        //   4     25    13       10    0     5
        // 0 00100 11001 01101  1 01010 00000 00101
        map[0x400] = 0x13;
        map[0x401] = 0x2D;
        map[0x402] = 0xA8;
        map[0x403] = 0x05;
        // Abbreviation 1.0 then "end"
        //   1     0     10       19    9     5
        // 0 00001 00000 01010  1 10011 01001 00101
        map[0x300] = 0x04;
        map[0x301] = 0x0A;
        map[0x302] = 0xCD;
        map[0x303] = 0x25;
        let (text, _) = decode(map, 0x300);
        assert_eq!(text, "The end");
    }

    #[test]
    fn test_decode_abbreviation_nested() {
        let mut map = test_map(3);
        map[0x18] = 0x02;
        map[0x200] = 0x02;
        map[0x201] = 0x00;
        // The abbreviation itself starts an abbreviation
        // 1 00001 00000 00101
        map[0x400] = 0x84;
        map[0x401] = 0x05;
        let memory = assert_ok!(Memory::new(map));
        assert!(Codec::new(&memory).is_err());
    }

    #[test]
    fn test_decode_abbreviation_disabled() {
        // No abbreviations table: using one is an error
        let mut map = test_map(3);
        // 1 00001 00000 00101
        map[0x300] = 0x84;
        map[0x301] = 0x05;
        let memory = assert_ok!(Memory::new(map));
        let codec = assert_ok!(Codec::new(&memory));
        assert!(codec.decode(&memory, 0x300).is_err());
    }

    #[test]
    fn test_decode_v1_newline() {
        let mut map = test_map(1);
        // a<newline>b: z-char 1 is newline in V1
        //   6     1     7
        // 1 00110 00001 00111
        map[0x300] = 0x98;
        map[0x301] = 0x27;
        let (text, _) = decode(map, 0x300);
        assert_eq!(text, "a\nb");
    }

    #[test]
    fn test_decode_v1_shift_lock() {
        let mut map = test_map(1);
        // Shift lock to A1, then two characters stay upper case
        //   4     7     7
        // 1 00100 00111 00111
        map[0x300] = 0x90;
        map[0x301] = 0xE7;
        let (text, _) = decode(map, 0x300);
        assert_eq!(text, "BB");
    }

    #[test]
    fn test_decode_v1_temporary_shift() {
        let mut map = test_map(1);
        // Temporary shift to A1 holds for a single character
        //   2     7     7
        // 1 00010 00111 00111
        map[0x300] = 0x88;
        map[0x301] = 0xE7;
        let (text, _) = decode(map, 0x300);
        assert_eq!(text, "Bb");
    }

    #[test]
    fn test_decode_v1_a2() {
        let mut map = test_map(1);
        // V1 A2 has digits from z-char 7: shift 5 (lock A2), 7, 8
        //   5     7     8
        // 1 00101 00111 01000
        map[0x300] = 0x94;
        map[0x301] = 0xE8;
        let (text, _) = decode(map, 0x300);
        assert_eq!(text, "01");
    }

    #[test]
    fn test_decode_custom_alphabet() {
        let mut map = test_map(5);
        // Custom alphabet table at 0x500 with a reversed A0
        map[0x34] = 0x05;
        map[0x35] = 0x00;
        for i in 0..26 {
            map[0x500 + i] = b'z' - i as u8;
            map[0x51A + i] = b'A' + i as u8;
            map[0x534 + i] = b' ';
        }
        //   6     7     5
        // 1 00110 00111 00101
        map[0x300] = 0x98;
        map[0x301] = 0xE5;
        let (text, _) = decode(map, 0x300);
        assert_eq!(text, "zy");
    }

    #[test]
    fn test_decode_custom_unicode() {
        let mut map = test_map(5);
        // Extension table with 3 words; word 3 points at the unicode table
        map[0x36] = 0x05;
        map[0x37] = 0x00;
        map[0x500] = 0x00;
        map[0x501] = 0x03;
        map[0x506] = 0x05;
        map[0x507] = 0x20;
        // One entry: ZSCII 155 = U+263A
        map[0x520] = 0x01;
        map[0x521] = 0x26;
        map[0x522] = 0x3A;
        let codec = codec(map);
        assert_eq!(codec.to_unicode(155), '☺');
        assert_eq!(codec.to_unicode(156), char::REPLACEMENT_CHARACTER);
        assert_eq!(codec.to_zscii('☺' as u16), 155);
    }

    #[test]
    fn test_to_unicode() {
        let codec = codec(test_map(3));
        assert_eq!(codec.to_unicode(b'a' as u16), 'a');
        assert_eq!(codec.to_unicode(13), '\n');
        assert_eq!(codec.to_unicode(155), 'ä');
        assert_eq!(codec.to_unicode(251), char::REPLACEMENT_CHARACTER);
        assert_eq!(codec.to_unicode(0x1234), char::REPLACEMENT_CHARACTER);
    }

    #[test]
    fn test_to_zscii() {
        let codec = codec(test_map(3));
        assert_eq!(codec.to_zscii(b'a' as u16), b'a');
        assert_eq!(codec.to_zscii(13), 13);
        // Function key codes pass through
        assert_eq!(codec.to_zscii(129), 129);
        // Accented input resolves through the reverse table
        assert_eq!(codec.to_zscii('ä' as u16), 155);
        // Unmappable input becomes a question mark
        assert_eq!(codec.to_zscii('∀' as u16), b'?');
    }

    #[test]
    fn test_encode_v3() {
        let codec = codec(test_map(3));
        let text: Vec<u16> = "hello".bytes().map(|b| b as u16).collect();
        assert_eq!(codec.encode(&text, 2), vec![0x3551, 0xC685]);
    }

    #[test]
    fn test_encode_v5() {
        let codec = codec(test_map(5));
        let text: Vec<u16> = "hello".bytes().map(|b| b as u16).collect();
        assert_eq!(codec.encode(&text, 3), vec![0x3551, 0x4685, 0x94A5]);
    }

    #[test]
    fn test_encode_folds_case() {
        let codec = codec(test_map(3));
        let upper: Vec<u16> = "HELLO".bytes().map(|b| b as u16).collect();
        let lower: Vec<u16> = "hello".bytes().map(|b| b as u16).collect();
        assert_eq!(codec.encode(&upper, 2), codec.encode(&lower, 2));
    }

    #[test]
    fn test_encode_truncates() {
        let codec = codec(test_map(3));
        let text: Vec<u16> = "abbreviated".bytes().map(|b| b as u16).collect();
        let truncated: Vec<u16> = "abbrev".bytes().map(|b| b as u16).collect();
        assert_eq!(codec.encode(&text, 2), codec.encode(&truncated, 2));
    }

    #[test]
    fn test_encode_a2_escape() {
        let codec = codec(test_map(3));
        // $ is not in any alphabet: shift, escape, then 1, 4
        let text: Vec<u16> = vec![b'$' as u16];
        assert_eq!(codec.encode(&text, 2), vec![0x14C1, 0x90A5]);
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let mut map = test_map(3);
        let memory = assert_ok!(Memory::new(map.clone()));
        let codec = assert_ok!(Codec::new(&memory));
        let text: Vec<u16> = "xyzzy".bytes().map(|b| b as u16).collect();
        let words = codec.encode(&text, 2);
        map[0x300] = (words[0] >> 8) as u8;
        map[0x301] = words[0] as u8;
        map[0x302] = (words[1] >> 8) as u8;
        map[0x303] = words[1] as u8;
        let (decoded, _) = decode(map, 0x300);
        assert_eq!(decoded, "xyzzy");
    }
}
