//! 2OP instructions
use super::*;
use crate::error::RuntimeError;
use crate::object::{self, attribute, property};
use crate::zmachine::ZMachine;

pub fn je(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    for value in operands[1..].iter() {
        if operands[0] as i16 == *value as i16 {
            return branch(zmachine, instruction, true);
        }
    }

    branch(zmachine, instruction, false)
}

pub fn jl(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    branch(
        zmachine,
        instruction,
        (operands[0] as i16) < (operands[1] as i16),
    )
}

pub fn jg(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    branch(
        zmachine,
        instruction,
        (operands[0] as i16) > (operands[1] as i16),
    )
}

pub fn dec_chk(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let value = zmachine.peek_variable(operands[0] as u8)? as i16;
    let new_value = i16::overflowing_sub(value, 1).0;
    zmachine.set_variable_indirect(operands[0] as u8, new_value as u16)?;
    branch(zmachine, instruction, new_value < operands[1] as i16)
}

pub fn inc_chk(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let value = zmachine.peek_variable(operands[0] as u8)? as i16;
    let new_value = i16::overflowing_add(value, 1).0;
    zmachine.set_variable_indirect(operands[0] as u8, new_value as u16)?;
    branch(zmachine, instruction, new_value > operands[1] as i16)
}

pub fn jin(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    branch(
        zmachine,
        instruction,
        object::parent(zmachine, operands[0] as usize)? == operands[1] as usize,
    )
}

pub fn test(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    branch(
        zmachine,
        instruction,
        operands[0] & operands[1] == operands[1],
    )
}

pub fn or(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let mut result = operands[0];
    for value in operands[1..].iter() {
        result |= *value;
    }

    store_result(zmachine, instruction, result)?;
    Ok(NextAddress::Address(instruction.next_address()))
}

pub fn and(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let mut result = operands[0];
    for value in operands[1..].iter() {
        result &= *value;
    }

    store_result(zmachine, instruction, result)?;
    Ok(NextAddress::Address(instruction.next_address()))
}

pub fn test_attr(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let condition = attribute::value(zmachine, operands[0] as usize, operands[1] as u8)?;
    branch(zmachine, instruction, condition)
}

pub fn set_attr(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    if operands[0] > 0 {
        attribute::set(zmachine, operands[0] as usize, operands[1] as u8)?;
    }

    Ok(NextAddress::Address(instruction.next_address()))
}

pub fn clear_attr(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    if operands[0] > 0 {
        attribute::clear(zmachine, operands[0] as usize, operands[1] as u8)?;
    }

    Ok(NextAddress::Address(instruction.next_address()))
}

pub fn store(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    zmachine.set_variable_indirect(operands[0] as u8, operands[1])?;
    Ok(NextAddress::Address(instruction.next_address()))
}

pub fn insert_obj(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let object = operands[0] as usize;
    if object != 0 {
        object::attach(zmachine, object, operands[1] as usize)?;
    }

    Ok(NextAddress::Address(instruction.next_address()))
}

pub fn loadw(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let address = operands[0] as usize + (operands[1] as usize * 2);
    let value = zmachine.read_word(address)?;
    store_result(zmachine, instruction, value)?;
    Ok(NextAddress::Address(instruction.next_address()))
}

pub fn loadb(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let address = operands[0] as usize + operands[1] as usize;
    let value = zmachine.read_byte(address)?;
    store_result(zmachine, instruction, value as u16)?;
    Ok(NextAddress::Address(instruction.next_address()))
}

pub fn get_prop(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let value = property::value(zmachine, operands[0] as usize, operands[1] as u8)?;
    store_result(zmachine, instruction, value)?;
    Ok(NextAddress::Address(instruction.next_address()))
}

pub fn get_prop_addr(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let address = property::property_data_address(zmachine, operands[0] as usize, operands[1] as u8)?;
    store_result(zmachine, instruction, address as u16)?;
    Ok(NextAddress::Address(instruction.next_address()))
}

pub fn get_next_prop(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let next = property::next_property(zmachine, operands[0] as usize, operands[1] as u8)?;
    store_result(zmachine, instruction, next as u16)?;
    Ok(NextAddress::Address(instruction.next_address()))
}

pub fn add(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let value = i16::overflowing_add(operands[0] as i16, operands[1] as i16).0;
    store_result(zmachine, instruction, value as u16)?;
    Ok(NextAddress::Address(instruction.next_address()))
}

pub fn sub(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let value = i16::overflowing_sub(operands[0] as i16, operands[1] as i16).0;
    store_result(zmachine, instruction, value as u16)?;
    Ok(NextAddress::Address(instruction.next_address()))
}

pub fn mul(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let value = i16::overflowing_mul(operands[0] as i16, operands[1] as i16).0;
    store_result(zmachine, instruction, value as u16)?;
    Ok(NextAddress::Address(instruction.next_address()))
}

pub fn div(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    if operands[1] == 0 {
        return fatal_error!(ErrorCode::DivideByZero, "Divide by zero");
    }

    // Truncates toward zero
    let value = i16::overflowing_div(operands[0] as i16, operands[1] as i16).0;
    store_result(zmachine, instruction, value as u16)?;
    Ok(NextAddress::Address(instruction.next_address()))
}

pub fn modulus(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    if operands[1] == 0 {
        return fatal_error!(ErrorCode::DivideByZero, "Modulo by zero");
    }

    let value = i16::overflowing_rem(operands[0] as i16, operands[1] as i16).0;
    store_result(zmachine, instruction, value as u16)?;
    Ok(NextAddress::Address(instruction.next_address()))
}

pub fn call_2s(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let address = zmachine.packed_routine_address(operands[0])?;
    call_fn(
        zmachine,
        address,
        instruction.next_address(),
        &operands[1..],
        instruction.store().copied(),
    )
}

pub fn call_2n(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let address = zmachine.packed_routine_address(operands[0])?;
    call_fn(
        zmachine,
        address,
        instruction.next_address(),
        &operands[1..],
        None,
    )
}

pub fn throw(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    zmachine.throw(operands[1], operands[0])
}
