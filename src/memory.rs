//! Story file memory map
use std::{fmt, fs::File, io::Read};

use crate::{error::*, fatal_error};

/// Memory map.
///
/// A big-endian byte buffer holding the story file.  The `dynamic_limit`
/// partitions the image: positions below it are writable, everything at or
/// above it is read-only for the lifetime of the map.  A pristine copy of
/// the writable prefix is captured when the limit is set, backing restart
/// and checksum calculations.
pub struct Memory {
    /// Memory map bytes
    map: Vec<u8>,
    /// Writable prefix boundary
    dynamic_limit: usize,
    /// Pristine copy of the dynamic region
    dynamic: Vec<u8>,
    /// File length from the header, scaled by version
    file_length: usize,
}

impl fmt::Debug for Memory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Memory: {} bytes, dynamic limit {:04x}",
            self.map.len(),
            self.dynamic_limit
        )
    }
}

/// Assemble a word from high- and low-byte values
///
/// # Arguments
/// * `hb` - high byte value
/// * `lb` - low byte value
///
/// # Returns
/// Word value
pub fn word_value(hb: u8, lb: u8) -> u16 {
    (((hb as u16) << 8) & 0xFF00) + ((lb as u16) & 0xFF)
}

/// Break a word value down into high- and low-byte values
///
/// # Arguments
/// * `w` - Word value
///
/// # Returns
/// Tuple containing (high-byte, low-byte)
fn byte_values(w: u16) -> (u8, u8) {
    let hb = (w >> 8) as u8;
    let lb = w as u8;
    (hb, lb)
}

impl TryFrom<&mut File> for Memory {
    type Error = RuntimeError;

    fn try_from(value: &mut File) -> Result<Self, Self::Error> {
        let mut d = Vec::new();
        match value.read_to_end(&mut d) {
            Ok(_) => Memory::new(d),
            Err(e) => fatal_error!(ErrorCode::InvalidAddress, "Error reading file: {}", e),
        }
    }
}

impl Memory {
    /// Constructor.
    ///
    /// The map must hold at least a 64-byte header.  The dynamic limit is
    /// initially the full length of the map; callers are expected to fence
    /// it off with [set_dynamic_limit](#method.set_dynamic_limit) once the
    /// static memory mark is known.
    ///
    /// # Arguments
    /// * `map` - Vector of memory bytes
    pub fn new(map: Vec<u8>) -> Result<Memory, RuntimeError> {
        if map.len() < 0x40 {
            return fatal_error!(
                ErrorCode::HeaderViolation,
                "Memory map too small for a header: {} bytes",
                map.len()
            );
        }

        let version = map[0];
        let file_length = word_value(map[0x1a], map[0x1b]) as usize
            * match version {
                1..=3 => 2,
                4 | 5 => 4,
                _ => 8,
            };

        let dynamic_limit = map.len();
        let dynamic = map.clone();
        Ok(Memory {
            map,
            dynamic_limit,
            dynamic,
            file_length,
        })
    }

    /// Get the length of the memory map
    ///
    /// # Returns
    /// Length of the memory map in bytes
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Get the writable prefix boundary
    ///
    /// # Returns
    /// Address of the first read-only byte
    pub fn dynamic_limit(&self) -> usize {
        self.dynamic_limit
    }

    /// Set the writable prefix boundary.
    ///
    /// The pristine copy of the dynamic region is re-captured from the
    /// current map contents.
    ///
    /// # Arguments
    /// * `limit` - Address of the first read-only byte
    ///
    /// # Returns
    /// Empty [Result] or a [RuntimeError] when the limit falls outside the map
    pub fn set_dynamic_limit(&mut self, limit: usize) -> Result<(), RuntimeError> {
        if limit > self.map.len() {
            fatal_error!(
                ErrorCode::HeaderViolation,
                "Dynamic limit {:04x} beyond end of memory ({:04x})",
                limit,
                self.map.len()
            )
        } else {
            self.dynamic_limit = limit;
            self.dynamic = self.map[0..limit].to_vec();
            Ok(())
        }
    }

    /// Get the current contents of the dynamic region
    ///
    /// # Returns
    /// Byte slice of the writable prefix
    pub fn dynamic(&self) -> &[u8] {
        &self.map[0..self.dynamic_limit]
    }

    /// Copy a slice of the memory map
    ///
    /// # Arguments
    /// * `start` - address of the start of the slice
    /// * `length` - length of the slice
    ///
    /// # Returns
    /// Vector containing a copy of the requested slice of memory
    pub fn slice(&self, start: usize, length: usize) -> Vec<u8> {
        let end = usize::min(start + length, self.map.len());
        self.map[start..end].to_vec()
    }

    /// Calculate the checksum of the memory map.
    ///
    /// The pristine copy of dynamic memory is used for this calculation.
    ///
    /// # Returns
    /// [Result] with the checksum value or a [RuntimeError]
    pub fn checksum(&self) -> Result<u16, RuntimeError> {
        let mut checksum = 0;
        for i in 0x40..self.dynamic.len() {
            checksum = u16::overflowing_add(checksum, self.dynamic[i] as u16).0;
        }

        for i in self.dynamic.len()..usize::min(self.file_length, self.map.len()) {
            checksum = u16::overflowing_add(checksum, self.map[i] as u16).0;
        }
        Ok(checksum)
    }

    /// Read a byte from the memory map.
    ///
    /// # Arguments
    /// * `address` - Address to read from
    ///
    /// # Returns
    /// [Result] with the byte value at the requested `address` or a [RuntimeError]
    pub fn read_byte(&self, address: usize) -> Result<u8, RuntimeError> {
        if address < self.map.len() {
            Ok(self.map[address])
        } else {
            fatal_error!(
                ErrorCode::InvalidAddress,
                "Byte address {:#06x} beyond end of memory ({:#06x})",
                address,
                self.map.len() - 1
            )
        }
    }

    /// Read a word from the memory map.
    ///
    /// # Arguments
    /// * `address` - Address to read from
    ///
    /// # Returns
    /// [Result] with the word value at the requested `address` or a [RuntimeError]
    pub fn read_word(&self, address: usize) -> Result<u16, RuntimeError> {
        if address < self.map.len() - 1 {
            Ok(word_value(self.map[address], self.map[address + 1]))
        } else {
            fatal_error!(
                ErrorCode::InvalidAddress,
                "Word address {:#06x} beyond end of memory ({:#06x})",
                address,
                self.map.len() - 1
            )
        }
    }

    /// Read a double word from the memory map.
    ///
    /// # Arguments
    /// * `address` - Address to read from
    ///
    /// # Returns
    /// [Result] with the 32-bit value at the requested `address` or a [RuntimeError]
    pub fn read_dword(&self, address: usize) -> Result<u32, RuntimeError> {
        if address < self.map.len() - 3 {
            Ok(((self.read_word(address)? as u32) << 16) | self.read_word(address + 2)? as u32)
        } else {
            fatal_error!(
                ErrorCode::InvalidAddress,
                "Double word address {:#06x} beyond end of memory ({:#06x})",
                address,
                self.map.len() - 1
            )
        }
    }

    /// Write a byte to the memory map.
    ///
    /// Writes at or above the dynamic limit fail.
    ///
    /// # Arguments
    /// * `address` - Address to write to
    /// * `value` - Byte value to write
    ///
    /// # Returns
    /// Empty [Result] or a [RuntimeError]
    pub fn write_byte(&mut self, address: usize, value: u8) -> Result<(), RuntimeError> {
        if address < self.dynamic_limit {
            debug!(target: "app::memory", "Write {:#02x} to ${:04x}", value, address);
            self.map[address] = value;
            Ok(())
        } else {
            fatal_error!(
                ErrorCode::IllegalMemoryAccess,
                "Write to byte address {:#06x} above dynamic memory ({:#06x})",
                address,
                self.dynamic_limit
            )
        }
    }

    /// Write a word to the memory map.
    ///
    /// Writes where any touched byte lies at or above the dynamic limit fail.
    ///
    /// # Arguments
    /// * `address` - Address to write to
    /// * `value` - Word value to write
    ///
    /// # Returns
    /// Empty [Result] or a [RuntimeError]
    pub fn write_word(&mut self, address: usize, value: u16) -> Result<(), RuntimeError> {
        if address + 1 < self.dynamic_limit {
            debug!(target: "app::memory", "Write {:#04x} to ${:04x}", value, address);
            let (hb, lb) = byte_values(value);
            self.map[address] = hb;
            self.map[address + 1] = lb;
            Ok(())
        } else {
            fatal_error!(
                ErrorCode::IllegalMemoryAccess,
                "Write to word address {:#06x} above dynamic memory ({:#06x})",
                address,
                self.dynamic_limit
            )
        }
    }

    /// Reset dynamic memory back to the initial state
    pub fn reset(&mut self) {
        self.map[..self.dynamic.len()].copy_from_slice(&self.dynamic)
    }

    /// Replace the dynamic region, presumably from a snapshot
    ///
    /// # Arguments
    /// * `data` - Dynamic memory region to restore
    ///
    /// # Returns
    /// Empty [Result] or a [RuntimeError]
    pub fn restore(&mut self, data: &[u8]) -> Result<(), RuntimeError> {
        if data.len() != self.dynamic_limit {
            fatal_error!(
                ErrorCode::SnapshotMismatch,
                "Restored dynamic memory size doesn't match: {:04x} != {:04x}",
                data.len(),
                self.dynamic_limit
            )
        } else {
            self.map[..data.len()].copy_from_slice(data);
            Ok(())
        }
    }
}
