//! Object attributes.
//!
//! Attributes are a big-endian bitfield at the start of the object record:
//! 32 bits in V1-3, 48 bits in V4+.
use crate::{error::*, fatal_error, zmachine::ZMachine};

use super::object_address;

/// Resolve an attribute to its byte address and bit mask
fn address_and_mask(
    zmachine: &ZMachine,
    object: usize,
    attribute: u8,
) -> Result<(usize, u8), RuntimeError> {
    let max = if zmachine.version() < 4 { 32 } else { 48 };
    if attribute >= max {
        return fatal_error!(
            ErrorCode::InvalidObjectAttribute,
            "Invalid attribute {} on object {}",
            attribute,
            object
        );
    }

    let object_address = object_address(zmachine, object)?;
    let address = object_address + (attribute as usize / 8);
    let mask = 0x80 >> (attribute % 8);
    Ok((address, mask))
}

/// Gets the value of an attribute for an object
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `object` - Object number
/// * `attribute` - Attribute number
///
/// # Returns
/// [Result] with the attribute value - `true` when set, `false` when clear -
/// or a [RuntimeError]
pub fn value(zmachine: &ZMachine, object: usize, attribute: u8) -> Result<bool, RuntimeError> {
    let (address, mask) = address_and_mask(zmachine, object, attribute)?;
    let value = zmachine.read_byte(address)?;
    Ok(value & mask == mask)
}

/// Set an attribute for an object
///
/// # Arguments
/// * `zmachine` - Mutable reference to the zmachine
/// * `object` - Object number
/// * `attribute` - Attribute number
///
/// # Returns
/// Empty [Result] or a [RuntimeError]
pub fn set(zmachine: &mut ZMachine, object: usize, attribute: u8) -> Result<(), RuntimeError> {
    let (address, mask) = address_and_mask(zmachine, object, attribute)?;
    let attribute_byte = zmachine.read_byte(address)?;
    zmachine.write_byte(address, attribute_byte | mask)
}

/// Clear an attribute for an object
///
/// # Arguments
/// * `zmachine` - Mutable reference to the zmachine
/// * `object` - Object number
/// * `attribute` - Attribute number
///
/// # Returns
/// Empty [Result] or a [RuntimeError]
pub fn clear(zmachine: &mut ZMachine, object: usize, attribute: u8) -> Result<(), RuntimeError> {
    let (address, mask) = address_and_mask(zmachine, object, attribute)?;
    let attribute_byte = zmachine.read_byte(address)?;
    zmachine.write_byte(address, attribute_byte & !mask)
}
