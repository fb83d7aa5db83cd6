//! Instruction decoding.
//!
//! The operand form is a pure function of the opcode byte: long 2OP
//! (0x00-0x7F), short 1OP/0OP (0x80-0xBF), extended (0xBE in V5+), and
//! variable (0xC0-0xFF), with 0xEC and 0xFA carrying a second operand type
//! byte.  Store and branch post-arguments follow version-aware tables.
use crate::error::*;
use crate::fatal_error;
use crate::memory::word_value;
use crate::zmachine::ZMachine;

use super::*;

/// Read a byte from the instruction slice
fn byte(bytes: &[u8], offset: usize) -> Result<u8, RuntimeError> {
    match bytes.get(offset) {
        Some(b) => Ok(*b),
        None => fatal_error!(
            ErrorCode::InvalidAddress,
            "Instruction truncated at end of memory"
        ),
    }
}

/// Extract an operand type from a type byte.
///
/// Types are packed two bits per operand, high to low; 3 means omitted.
fn operand_type(type_byte: u8, index: u8) -> Option<OperandType> {
    match (type_byte >> (6 - (index * 2))) & 3 {
        0 => Some(OperandType::LargeConstant),
        1 => Some(OperandType::SmallConstant),
        2 => Some(OperandType::Variable),
        _ => None,
    }
}

/// Operand type from a long-form opcode bit: set means variable
fn long_operand_type(opcode: u8, index: u8) -> OperandType {
    if opcode >> (6 - index) & 1 == 1 {
        OperandType::Variable
    } else {
        OperandType::SmallConstant
    }
}

/// Scan the operand types for an instruction
fn operand_types(
    bytes: &[u8],
    opcode: &Opcode,
    mut offset: usize,
) -> Result<(usize, Vec<OperandType>), RuntimeError> {
    let mut types = Vec::new();
    match opcode.form() {
        OpcodeForm::Short => {
            if let Some(t) = operand_type(opcode.opcode(), 1) {
                types.push(t);
            }
        }
        OpcodeForm::Long => {
            types.push(long_operand_type(opcode.opcode(), 0));
            types.push(long_operand_type(opcode.opcode(), 1));
        }
        OpcodeForm::Var | OpcodeForm::Ext => {
            let b = byte(bytes, offset)?;
            offset += 1;
            for i in 0..4 {
                match operand_type(b, i) {
                    Some(t) => types.push(t),
                    None => break,
                }
            }
            // CALL_VS2 and CALL_VN2 carry a second type byte, used only when
            // the first four operands are all present
            if opcode.opcode() == 0xEC || opcode.opcode() == 0xFA {
                let b = byte(bytes, offset)?;
                offset += 1;
                if types.len() == 4 {
                    for i in 0..4 {
                        match operand_type(b, i) {
                            Some(t) => types.push(t),
                            None => break,
                        }
                    }
                }
            }
        }
    }

    Ok((offset, types))
}

/// Read the operands following the type information
fn operands(
    bytes: &[u8],
    operand_types: &[OperandType],
    mut offset: usize,
) -> Result<(usize, Vec<Operand>), RuntimeError> {
    let mut operands = Vec::new();

    for optype in operand_types {
        match optype {
            OperandType::LargeConstant => {
                operands.push(Operand::new(
                    *optype,
                    word_value(byte(bytes, offset)?, byte(bytes, offset + 1)?),
                ));
                offset += 2;
            }
            OperandType::SmallConstant | OperandType::Variable => {
                operands.push(Operand::new(*optype, byte(bytes, offset)? as u16));
                offset += 1;
            }
        }
    }

    Ok((offset, operands))
}

/// Does the opcode store a result?
fn stores_result(opcode: &Opcode, version: u8) -> bool {
    match opcode.form() {
        OpcodeForm::Ext => matches!(
            opcode.instruction(),
            0x00 | 0x01 | 0x02 | 0x03 | 0x04 | 0x09 | 0x0A
        ),
        _ => match opcode.operand_count() {
            OperandCount::_0OP => {
                // SAVE and RESTORE become store instructions in V4; CATCH
                // replaces POP in V5
                (version == 4 && matches!(opcode.instruction(), 0x05 | 0x06))
                    || (version >= 5 && opcode.instruction() == 0x09)
            }
            OperandCount::_1OP => {
                matches!(opcode.instruction(), 0x01..=0x04 | 0x08 | 0x0E)
                    || (version < 5 && opcode.instruction() == 0x0F)
            }
            OperandCount::_2OP => matches!(opcode.instruction(), 0x08 | 0x09 | 0x0F..=0x19),
            OperandCount::_VAR => {
                matches!(opcode.instruction(), 0x00 | 0x07 | 0x0C)
                    || (version >= 4 && matches!(opcode.instruction(), 0x16 | 0x17))
                    || (version >= 5 && matches!(opcode.instruction(), 0x04 | 0x18))
            }
        },
    }
}

/// Does the opcode branch?
fn branches(opcode: &Opcode, version: u8) -> bool {
    match opcode.form() {
        OpcodeForm::Ext => false,
        _ => match opcode.operand_count() {
            OperandCount::_0OP => {
                matches!(opcode.instruction(), 0x0D | 0x0F)
                    || (version < 4 && matches!(opcode.instruction(), 0x05 | 0x06))
            }
            OperandCount::_1OP => matches!(opcode.instruction(), 0x00 | 0x01 | 0x02),
            OperandCount::_2OP => matches!(opcode.instruction(), 0x01..=0x07 | 0x0A),
            OperandCount::_VAR => matches!(opcode.instruction(), 0x17 | 0x1F),
        },
    }
}

/// Read the store variable byte when the opcode stores a result
fn result_variable(
    address: usize,
    bytes: &[u8],
    opcode: &Opcode,
    version: u8,
    offset: usize,
) -> Result<(usize, Option<StoreResult>), RuntimeError> {
    if stores_result(opcode, version) {
        Ok((
            offset + 1,
            Some(StoreResult::new(address + offset, byte(bytes, offset)?)),
        ))
    } else {
        Ok((offset, None))
    }
}

/// Decode the branch descriptor.
///
/// A set bit 6 selects a 1-byte unsigned offset of 0-63; otherwise the
/// offset is 14 bits, sign extended.  Offsets 0 and 1 are return-false and
/// return-true rather than branch destinations.
fn branch_condition(
    address: usize,
    bytes: &[u8],
    offset: usize,
) -> Result<(usize, Option<Branch>), RuntimeError> {
    let b = byte(bytes, offset)?;
    let condition = b & 0x80 == 0x80;
    let (next_offset, branch_offset) = if b & 0x40 == 0x40 {
        (offset + 1, (b & 0x3F) as i16)
    } else {
        let mut o = ((b as u16 & 0x3F) << 8) | byte(bytes, offset + 1)? as u16;
        if o & 0x2000 == 0x2000 {
            o |= 0xC000;
        }
        (offset + 2, o as i16)
    };

    let branch_address = match branch_offset {
        0 => 0,
        1 => 1,
        _ => (address as isize + next_offset as isize + branch_offset as isize - 2) as usize,
    };

    Ok((
        next_offset,
        Some(Branch::new(address + offset, condition, branch_address)),
    ))
}

/// Read the branch descriptor when the opcode branches
fn branch(
    address: usize,
    bytes: &[u8],
    version: u8,
    opcode: &Opcode,
    offset: usize,
) -> Result<(usize, Option<Branch>), RuntimeError> {
    if branches(opcode, version) {
        branch_condition(address, bytes, offset)
    } else {
        Ok((offset, None))
    }
}

/// Decode the opcode byte(s) and classify the instruction form
fn opcode(bytes: &[u8], version: u8, mut offset: usize) -> Result<(usize, Opcode), RuntimeError> {
    let mut opcode = byte(bytes, offset)?;
    let extended = opcode == 0xBE && version >= 5;
    offset += 1;
    if extended {
        opcode = byte(bytes, offset)?;
        offset += 1;
    }

    let form = if extended {
        OpcodeForm::Ext
    } else {
        match (opcode >> 6) & 0x3 {
            3 => OpcodeForm::Var,
            2 => OpcodeForm::Short,
            _ => OpcodeForm::Long,
        }
    };

    let instruction = match form {
        OpcodeForm::Var | OpcodeForm::Long => opcode & 0x1F,
        OpcodeForm::Short => opcode & 0xF,
        OpcodeForm::Ext => opcode,
    };

    let operand_count = match form {
        OpcodeForm::Short => {
            if opcode & 0x30 == 0x30 {
                OperandCount::_0OP
            } else {
                OperandCount::_1OP
            }
        }
        OpcodeForm::Long => OperandCount::_2OP,
        OpcodeForm::Var => {
            if opcode & 0x20 == 0x20 {
                OperandCount::_VAR
            } else {
                OperandCount::_2OP
            }
        }
        OpcodeForm::Ext => OperandCount::_VAR,
    };

    Ok((
        offset,
        Opcode::new(version, opcode, instruction, form, operand_count),
    ))
}

/// Decode the instruction at an address.
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `address` - Address of the instruction
///
/// # Returns
/// [Result] with the decoded [Instruction] or a [RuntimeError]
pub fn decode_instruction(
    zmachine: &ZMachine,
    address: usize,
) -> Result<Instruction, RuntimeError> {
    let version = zmachine.version();
    let bytes = zmachine.instruction(address);
    let (offset, opcode) = opcode(&bytes, version, 0)?;
    let (offset, operand_types) = operand_types(&bytes, &opcode, offset)?;
    let (offset, operands) = operands(&bytes, &operand_types, offset)?;
    let (offset, store) = result_variable(address, &bytes, &opcode, version, offset)?;
    let (offset, branch) = branch(address, &bytes, version, &opcode, offset)?;

    let instruction = Instruction::new(
        &bytes[0..offset],
        address,
        opcode,
        operands,
        store,
        branch,
        address + offset,
    );
    debug!(target: "app::instruction", "{}", instruction);
    Ok(instruction)
}
