//! Extended instructions (V5+)
use super::*;
use crate::error::RuntimeError;
use crate::zmachine::ZMachine;

pub fn save(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    // The table/bytes/name operands for partial saves are not supported;
    // the whole machine state is captured
    operand_values(zmachine, instruction)?;
    let pc = match instruction.store() {
        Some(s) => s.address(),
        None => {
            return fatal_error!(ErrorCode::Interpreter, "SAVE store data missing");
        }
    };
    let saved = zmachine.save(pc)?;
    store_result(zmachine, instruction, saved as u16)?;
    Ok(NextAddress::Address(instruction.next_address()))
}

pub fn restore(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    operand_values(zmachine, instruction)?;
    match zmachine.restore()? {
        Some(next) => Ok(next),
        None => {
            store_result(zmachine, instruction, 0)?;
            Ok(NextAddress::Address(instruction.next_address()))
        }
    }
}

pub fn log_shift(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let places = (operands[1] as i16).clamp(-15, 15);
    let value = if places < 0 {
        operands[0] >> places.unsigned_abs()
    } else {
        operands[0] << places.unsigned_abs()
    };
    store_result(zmachine, instruction, value)?;
    Ok(NextAddress::Address(instruction.next_address()))
}

pub fn art_shift(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let places = (operands[1] as i16).clamp(-15, 15);
    let value = if places < 0 {
        (operands[0] as i16) >> places.unsigned_abs()
    } else {
        (operands[0] as i16) << places.unsigned_abs()
    };
    store_result(zmachine, instruction, value as u16)?;
    Ok(NextAddress::Address(instruction.next_address()))
}

pub fn save_undo(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    let pc = match instruction.store() {
        Some(s) => s.address(),
        None => {
            return fatal_error!(ErrorCode::Interpreter, "SAVE_UNDO store data missing");
        }
    };
    zmachine.save_undo(pc);
    store_result(zmachine, instruction, 1)?;
    Ok(NextAddress::Address(instruction.next_address()))
}

pub fn restore_undo(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    match zmachine.restore_undo()? {
        Some(next) => Ok(next),
        None => {
            store_result(zmachine, instruction, 0)?;
            Ok(NextAddress::Address(instruction.next_address()))
        }
    }
}
