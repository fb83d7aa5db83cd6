//! Object properties.
//!
//! An object's property table starts with its short name, followed by
//! properties in descending number order.  V1-3 properties carry a single
//! size byte (number in the low 5 bits, length - 1 in the high 3); V4+
//! properties use one or two size bytes as described by the top bits.
use std::cmp::Ordering;

use crate::{error::*, fatal_error, zmachine::ZMachine};

use super::{default_property, object_address};

/// Gets the property table byte address for an object
fn property_table_address(zmachine: &ZMachine, object: usize) -> Result<usize, RuntimeError> {
    let object_address = object_address(zmachine, object)?;
    let offset = if zmachine.version() < 4 { 7 } else { 12 };
    Ok(zmachine.read_word(object_address + offset)? as usize)
}

/// Gets the byte address of a property's size byte.
///
/// If the property does not exist for the object, 0 is returned.
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `object` - Object number
/// * `property` - Property number
///
/// # Returns
/// [Result] with the byte address of the property, 0, or a [RuntimeError]
fn address(zmachine: &ZMachine, object: usize, property: u8) -> Result<usize, RuntimeError> {
    let property_table_address = property_table_address(zmachine, object)?;
    let header_size = zmachine.read_byte(property_table_address)? as usize;
    let mut property_address = property_table_address + 1 + (header_size * 2);
    let mut size_byte = zmachine.read_byte(property_address)?;
    while size_byte != 0 {
        if zmachine.version() < 4 {
            let prop_num = size_byte & 0x1F;
            let prop_size = (size_byte as usize / 32) + 1;
            match prop_num.cmp(&property) {
                Ordering::Equal => return Ok(property_address),
                Ordering::Less => return Ok(0),
                _ => {
                    property_address = property_address + 1 + prop_size;
                    size_byte = zmachine.read_byte(property_address)?;
                }
            }
        } else {
            let prop_num = size_byte & 0x3F;
            let mut prop_data = 1;
            let prop_size = if size_byte & 0x80 == 0x80 {
                prop_data = 2;
                let size = zmachine.read_byte(property_address + 1)? as usize & 0x3F;
                if size == 0 {
                    64
                } else {
                    size
                }
            } else if size_byte & 0x40 == 0x40 {
                2
            } else {
                1
            };

            match prop_num.cmp(&property) {
                Ordering::Equal => return Ok(property_address),
                Ordering::Less => return Ok(0),
                _ => {
                    property_address = property_address + prop_data + prop_size;
                    size_byte = zmachine.read_byte(property_address)?;
                }
            }
        }
    }

    Ok(0)
}

/// Gets the size of the property whose size byte starts at an address
fn size(zmachine: &ZMachine, property_address: usize) -> Result<usize, RuntimeError> {
    let size_byte = zmachine.read_byte(property_address)?;
    if zmachine.version() < 4 {
        Ok((size_byte as usize / 32) + 1)
    } else {
        match size_byte & 0xC0 {
            0x40 => Ok(2),
            0x00 => Ok(1),
            _ => {
                let size = zmachine.read_byte(property_address + 1)? as usize & 0x3F;
                if size == 0 {
                    Ok(64)
                } else {
                    Ok(size)
                }
            }
        }
    }
}

/// Gets the byte address of a property's data
fn data_address(zmachine: &ZMachine, property_address: usize) -> Result<usize, RuntimeError> {
    if zmachine.version() < 4 {
        Ok(property_address + 1)
    } else {
        let b = zmachine.read_byte(property_address)?;
        if b & 0x80 == 0x80 {
            Ok(property_address + 2)
        } else {
            Ok(property_address + 1)
        }
    }
}

/// Gets the byte address of an object's property data.
///
/// If the property does not exist for the object, 0 is returned.
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `object` - Object number
/// * `property` - Property number
///
/// # Returns
/// [Result] with the byte address of the property data, 0, or a [RuntimeError]
pub fn property_data_address(
    zmachine: &ZMachine,
    object: usize,
    property: u8,
) -> Result<usize, RuntimeError> {
    let property_address = address(zmachine, object, property)?;
    if property_address == 0 {
        Ok(0)
    } else {
        data_address(zmachine, property_address)
    }
}

/// Gets the length of a property's data.
///
/// If the `property_data_address` is 0, 0 is returned.
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `property_data_address` - Byte address of the property's data
///
/// # Returns
/// [Result] with the length of the property's data, 0, or a [RuntimeError]
pub fn property_length(
    zmachine: &ZMachine,
    property_data_address: usize,
) -> Result<usize, RuntimeError> {
    if property_data_address == 0 {
        Ok(0)
    } else {
        let size_byte = zmachine.read_byte(property_data_address - 1)?;
        if zmachine.version() < 4 || size_byte & 0x80 == 0 {
            size(zmachine, property_data_address - 1)
        } else {
            size(zmachine, property_data_address - 2)
        }
    }
}

/// Gets the value of an object's property.
///
/// The property default is returned when the object does not have the
/// property.  Reading a property longer than 2 bytes is an error.
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `object` - Object number
/// * `property` - Property number
///
/// # Returns
/// [Result] with the property (or default) value or a [RuntimeError]
pub fn value(zmachine: &ZMachine, object: usize, property: u8) -> Result<u16, RuntimeError> {
    let property_address = address(zmachine, object, property)?;
    if property_address == 0 {
        default_property(zmachine, property)
    } else {
        match size(zmachine, property_address)? {
            1 => Ok(zmachine.read_byte(data_address(zmachine, property_address)?)? as u16),
            2 => zmachine.read_word(data_address(zmachine, property_address)?),
            n => fatal_error!(
                ErrorCode::PropertySize,
                "Read of property {} on object {} with length {}",
                property,
                object,
                n
            ),
        }
    }
}

/// Sets the value of an object's property.
///
/// The object must have the property, with data 1 or 2 bytes long; a 1-byte
/// property stores the low byte of `value`.
///
/// # Arguments
/// * `zmachine` - Mutable reference to the zmachine
/// * `object` - Object number
/// * `property` - Property number
/// * `value` - Value to store
///
/// # Returns
/// Empty [Result] or a [RuntimeError]
pub fn set_value(
    zmachine: &mut ZMachine,
    object: usize,
    property: u8,
    value: u16,
) -> Result<(), RuntimeError> {
    let property_address = address(zmachine, object, property)?;
    if property_address == 0 {
        fatal_error!(
            ErrorCode::InvalidObjectProperty,
            "Object {} has no property {}",
            object,
            property
        )
    } else {
        let data = data_address(zmachine, property_address)?;
        match size(zmachine, property_address)? {
            1 => zmachine.write_byte(data, value as u8),
            2 => zmachine.write_word(data, value),
            n => fatal_error!(
                ErrorCode::PropertySize,
                "Write of property {} on object {} with length {}",
                property,
                object,
                n
            ),
        }
    }
}

/// Gets the number of the property following a property.
///
/// Property 0 requests the object's first property number; the last
/// property is followed by property 0.
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `object` - Object number
/// * `property` - Property number, or 0 for the first property
///
/// # Returns
/// [Result] with the next property number or a [RuntimeError]
pub fn next_property(
    zmachine: &ZMachine,
    object: usize,
    property: u8,
) -> Result<u8, RuntimeError> {
    let mask = if zmachine.version() < 4 { 0x1F } else { 0x3F };
    if property == 0 {
        let table = property_table_address(zmachine, object)?;
        let header_size = zmachine.read_byte(table)? as usize;
        let size_byte = zmachine.read_byte(table + 1 + (header_size * 2))?;
        Ok(size_byte & mask)
    } else {
        let data = property_data_address(zmachine, object, property)?;
        if data == 0 {
            fatal_error!(
                ErrorCode::InvalidObjectProperty,
                "Object {} has no property {}",
                object,
                property
            )
        } else {
            let next = data + property_length(zmachine, data)?;
            Ok(zmachine.read_byte(next)? & mask)
        }
    }
}

/// Gets the short name of an object
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `object` - Object number
///
/// # Returns
/// [Result] with the decoded short name or a [RuntimeError]
pub fn short_name(zmachine: &ZMachine, object: usize) -> Result<String, RuntimeError> {
    let table = property_table_address(zmachine, object)?;
    let header_size = zmachine.read_byte(table)? as usize;
    if header_size == 0 {
        Ok(String::new())
    } else {
        let (name, _) = zmachine.text(table + 1)?;
        Ok(name)
    }
}
