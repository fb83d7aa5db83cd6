//! Object tree.
//!
//! Objects are records in a table following the property defaults.  V1-3
//! records are 9 bytes with byte-sized relatives and 32 attributes; V4+
//! records are 14 bytes with word-sized relatives and 48 attributes.

use crate::{error::*, fatal_error, header::HeaderField, zmachine::ZMachine};

pub mod attribute;
pub mod property;

/// Gets the byte address of an object's table entry
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `object` - Object number
///
/// # Returns
/// [Result] with the byte address of the object table entry or a [RuntimeError]
fn object_address(zmachine: &ZMachine, object: usize) -> Result<usize, RuntimeError> {
    let max = if zmachine.version() < 4 { 255 } else { 65535 };
    if object == 0 || object > max {
        return fatal_error!(ErrorCode::InvalidObject, "Invalid object {}", object);
    }

    let table = zmachine.header_word(HeaderField::ObjectTable)? as usize;
    let (offset, size) = if zmachine.version() < 4 {
        (62, 9)
    } else {
        (126, 14)
    };

    Ok(table + offset + (size * (object - 1)))
}

/// Gets an object's relative (parent, sibling, or child)
///
/// If `object` is 0, 0 is returned.
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `object` - Object number
/// * `offset` - Byte offset of the relative in the object's table entry
///
/// # Returns
/// [Result] with the relative object number, 0, or a [RuntimeError]
fn relative(zmachine: &ZMachine, object: usize, offset: usize) -> Result<usize, RuntimeError> {
    if object == 0 {
        Ok(0)
    } else {
        let object_address = object_address(zmachine, object)?;

        if zmachine.version() < 4 {
            Ok(zmachine.read_byte(object_address + offset)? as usize)
        } else {
            Ok(zmachine.read_word(object_address + offset)? as usize)
        }
    }
}

/// Gets the object number of an object's parent
///
/// If `object` is 0, 0 is returned
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `object` - Object number
///
/// # Returns
/// [Result] with the parent object number, 0, or a [RuntimeError]
pub fn parent(zmachine: &ZMachine, object: usize) -> Result<usize, RuntimeError> {
    let offset = if zmachine.version() < 4 { 4 } else { 6 };
    relative(zmachine, object, offset)
}

/// Gets the object number of an object's first sibling
///
/// If `object` is 0, 0 is returned
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `object` - Object number
///
/// # Returns
/// [Result] with the sibling object number, 0, or a [RuntimeError]
pub fn sibling(zmachine: &ZMachine, object: usize) -> Result<usize, RuntimeError> {
    let offset = if zmachine.version() < 4 { 5 } else { 8 };
    relative(zmachine, object, offset)
}

/// Gets the object number of an object's first child
///
/// If `object` is 0, 0 is returned
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `object` - Object number
///
/// # Returns
/// [Result] with the child object number, 0, or a [RuntimeError]
pub fn child(zmachine: &ZMachine, object: usize) -> Result<usize, RuntimeError> {
    let offset = if zmachine.version() < 4 { 6 } else { 10 };
    relative(zmachine, object, offset)
}

/// Sets a relative (parent, sibling, or child) of an object
fn set_relative(
    zmachine: &mut ZMachine,
    offset: usize,
    object: usize,
    relative: usize,
) -> Result<(), RuntimeError> {
    let object_address = object_address(zmachine, object)?;

    if zmachine.version() < 4 {
        zmachine.write_byte(object_address + offset, relative as u8)
    } else {
        zmachine.write_word(object_address + offset, relative as u16)
    }
}

/// Sets the parent field of an object's table entry.
///
/// This only updates the `object` entry and does *not* detach the object
/// from its previous parent; see [attach] for the full tree operation.
pub fn set_parent(
    zmachine: &mut ZMachine,
    object: usize,
    parent: usize,
) -> Result<(), RuntimeError> {
    let offset = if zmachine.version() < 4 { 4 } else { 6 };
    set_relative(zmachine, offset, object, parent)
}

/// Sets the sibling field of an object's table entry.
pub fn set_sibling(
    zmachine: &mut ZMachine,
    object: usize,
    sibling: usize,
) -> Result<(), RuntimeError> {
    let offset = if zmachine.version() < 4 { 5 } else { 8 };
    set_relative(zmachine, offset, object, sibling)
}

/// Sets the child field of an object's table entry.
pub fn set_child(zmachine: &mut ZMachine, object: usize, child: usize) -> Result<(), RuntimeError> {
    let offset = if zmachine.version() < 4 { 6 } else { 10 };
    set_relative(zmachine, offset, object, child)
}

/// Detach an object from its parent.
///
/// The object is unlinked from the parent's child chain and left with no
/// parent and no sibling.  A child chain that ends without reaching the
/// object is an error.
///
/// # Arguments
/// * `zmachine` - Mutable reference to the zmachine
/// * `object` - Object number
///
/// # Returns
/// Empty [Result] or a [RuntimeError]
pub fn detach(zmachine: &mut ZMachine, object: usize) -> Result<(), RuntimeError> {
    let old_parent = parent(zmachine, object)?;
    if old_parent == 0 {
        set_sibling(zmachine, object, 0)?;
        return Ok(());
    }

    debug!(target: "app::object", "Detach {} from {}", object, old_parent);
    let next = sibling(zmachine, object)?;
    let mut c = child(zmachine, old_parent)?;
    if c == object {
        set_child(zmachine, old_parent, next)?;
    } else {
        loop {
            if c == 0 {
                return fatal_error!(
                    ErrorCode::InvalidObjectTree,
                    "Object {} is not among the children of {}",
                    object,
                    old_parent
                );
            }
            let s = sibling(zmachine, c)?;
            if s == object {
                set_sibling(zmachine, c, next)?;
                break;
            }
            c = s;
        }
    }

    set_parent(zmachine, object, 0)?;
    set_sibling(zmachine, object, 0)?;
    Ok(())
}

/// Move an object to a new parent.
///
/// The object is detached from its old parent and prepended to the new
/// parent's children.  Moving to parent 0 just detaches.  Moving an object
/// to the parent it already has is a no-op.
///
/// # Arguments
/// * `zmachine` - Mutable reference to the zmachine
/// * `object` - Object number
/// * `new_parent` - New parent object number, or 0
///
/// # Returns
/// Empty [Result] or a [RuntimeError]
pub fn attach(
    zmachine: &mut ZMachine,
    object: usize,
    new_parent: usize,
) -> Result<(), RuntimeError> {
    if parent(zmachine, object)? == new_parent {
        return Ok(());
    }

    detach(zmachine, object)?;
    if new_parent != 0 {
        debug!(target: "app::object", "Attach {} to {}", object, new_parent);
        let first = child(zmachine, new_parent)?;
        set_sibling(zmachine, object, first)?;
        set_child(zmachine, new_parent, object)?;
        set_parent(zmachine, object, new_parent)?;
    }

    Ok(())
}

/// Gets a property default
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `property` - Property number
///
/// # Returns
/// [Result] with the default property value or a [RuntimeError]
pub fn default_property(zmachine: &ZMachine, property: u8) -> Result<u16, RuntimeError> {
    let max = if zmachine.version() < 4 { 31 } else { 63 };
    if property == 0 || property > max {
        return fatal_error!(
            ErrorCode::InvalidObjectProperty,
            "Invalid property {} default",
            property
        );
    }

    let table = zmachine.header_word(HeaderField::ObjectTable)? as usize;
    zmachine.read_word(table + ((property as usize - 1) * 2))
}
