//! Opcode dispatch.
//!
//! Handlers are grouped by operand count, one function per opcode.  The
//! dispatch match is keyed on (version, instruction number); anything
//! without a handler for the running version is an illegal instruction.
use crate::zmachine::ZMachine;
use crate::{error::*, fatal_error};

use super::*;

pub mod processor_0op;
mod processor_1op;
mod processor_2op;
pub mod processor_ext;
pub mod processor_var;

/// Evaluate an operand.
///
/// Constants evaluate to themselves; a variable reference reads the
/// variable, popping the evaluation stack for variable 0.
fn operand_value(zmachine: &mut ZMachine, operand: &Operand) -> Result<u16, RuntimeError> {
    match operand.operand_type() {
        OperandType::SmallConstant | OperandType::LargeConstant => Ok(operand.value()),
        OperandType::Variable => zmachine.variable(operand.value() as u8),
    }
}

/// Evaluate an instruction's operands, left to right
pub fn operand_values(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<Vec<u16>, RuntimeError> {
    let mut values = Vec::new();
    for operand in instruction.operands() {
        values.push(operand_value(zmachine, operand)?);
    }
    if !values.is_empty() {
        debug!(target: "app::instruction", "Operand values: {:?}", values);
    }
    Ok(values)
}

/// Apply an instruction's branch.
///
/// Branch destinations 0 and 1 return false and true from the current
/// routine instead of adjusting the program counter.
pub fn branch(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
    condition: bool,
) -> Result<NextAddress, RuntimeError> {
    match instruction.branch() {
        Some(b) => {
            if condition == b.condition() {
                match b.branch_address() {
                    0 => zmachine.return_routine(0),
                    1 => zmachine.return_routine(1),
                    _ => Ok(NextAddress::Address(b.branch_address())),
                }
            } else {
                Ok(NextAddress::Address(instruction.next_address()))
            }
        }
        None => Ok(NextAddress::Address(instruction.next_address())),
    }
}

/// Store an instruction's result, if it has a store location
fn store_result(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
    value: u16,
) -> Result<(), RuntimeError> {
    match instruction.store() {
        Some(s) => zmachine.set_variable(s.variable(), value),
        None => Ok(()),
    }
}

/// Common call semantics for the call opcode family
fn call_fn(
    zmachine: &mut ZMachine,
    address: usize,
    return_addr: usize,
    arguments: &[u16],
    result: Option<StoreResult>,
) -> Result<NextAddress, RuntimeError> {
    zmachine.call_routine(address, arguments, result, return_addr)
}

/// Dispatch a decoded instruction to its handler
pub fn dispatch(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    let version = zmachine.version();
    match instruction.opcode().form() {
        OpcodeForm::Ext => match (version, instruction.opcode().instruction()) {
            (5..=8, 0x00) => processor_ext::save(zmachine, instruction),
            (5..=8, 0x01) => processor_ext::restore(zmachine, instruction),
            (5..=8, 0x02) => processor_ext::log_shift(zmachine, instruction),
            (5..=8, 0x03) => processor_ext::art_shift(zmachine, instruction),
            (5..=8, 0x09) => processor_ext::save_undo(zmachine, instruction),
            (5..=8, 0x0a) => processor_ext::restore_undo(zmachine, instruction),
            (_, _) => fatal_error!(
                ErrorCode::UnimplementedInstruction,
                "Unimplemented EXT instruction: {}",
                instruction.opcode()
            ),
        },
        _ => match instruction.opcode().operand_count() {
            OperandCount::_0OP => match (version, instruction.opcode().instruction()) {
                (_, 0x0) => processor_0op::rtrue(zmachine, instruction),
                (_, 0x1) => processor_0op::rfalse(zmachine, instruction),
                (_, 0x2) => processor_0op::print(zmachine, instruction),
                (_, 0x3) => processor_0op::print_ret(zmachine, instruction),
                (_, 0x4) => processor_0op::nop(zmachine, instruction),
                (1..=4, 0x5) => processor_0op::save(zmachine, instruction),
                (1..=4, 0x6) => processor_0op::restore(zmachine, instruction),
                (_, 0x7) => processor_0op::restart(zmachine, instruction),
                (_, 0x8) => processor_0op::ret_popped(zmachine, instruction),
                (1..=4, 0x9) => processor_0op::pop(zmachine, instruction),
                (_, 0x9) => processor_0op::catch(zmachine, instruction),
                (_, 0xa) => processor_0op::quit(zmachine, instruction),
                (_, 0xb) => processor_0op::new_line(zmachine, instruction),
                (3, 0xc) => processor_0op::show_status(zmachine, instruction),
                (3..=8, 0xd) => processor_0op::verify(zmachine, instruction),
                (5..=8, 0xf) => processor_0op::piracy(zmachine, instruction),
                (_, _) => fatal_error!(
                    ErrorCode::UnimplementedInstruction,
                    "Unimplemented instruction: {}",
                    instruction.opcode()
                ),
            },
            OperandCount::_1OP => match (version, instruction.opcode().instruction()) {
                (_, 0x0) => processor_1op::jz(zmachine, instruction),
                (_, 0x1) => processor_1op::get_sibling(zmachine, instruction),
                (_, 0x2) => processor_1op::get_child(zmachine, instruction),
                (_, 0x3) => processor_1op::get_parent(zmachine, instruction),
                (_, 0x4) => processor_1op::get_prop_len(zmachine, instruction),
                (_, 0x5) => processor_1op::inc(zmachine, instruction),
                (_, 0x6) => processor_1op::dec(zmachine, instruction),
                (_, 0x7) => processor_1op::print_addr(zmachine, instruction),
                (4..=8, 0x8) => processor_1op::call_1s(zmachine, instruction),
                (_, 0x9) => processor_1op::remove_obj(zmachine, instruction),
                (_, 0xa) => processor_1op::print_obj(zmachine, instruction),
                (_, 0xb) => processor_1op::ret(zmachine, instruction),
                (_, 0xc) => processor_1op::jump(zmachine, instruction),
                (_, 0xd) => processor_1op::print_paddr(zmachine, instruction),
                (_, 0xe) => processor_1op::load(zmachine, instruction),
                (1..=4, 0xf) => processor_1op::not(zmachine, instruction),
                (_, 0xf) => processor_1op::call_1n(zmachine, instruction),
                (_, _) => fatal_error!(
                    ErrorCode::UnimplementedInstruction,
                    "Unimplemented instruction: {}",
                    instruction.opcode()
                ),
            },
            OperandCount::_2OP => match (version, instruction.opcode().instruction()) {
                (_, 0x01) => processor_2op::je(zmachine, instruction),
                (_, 0x02) => processor_2op::jl(zmachine, instruction),
                (_, 0x03) => processor_2op::jg(zmachine, instruction),
                (_, 0x04) => processor_2op::dec_chk(zmachine, instruction),
                (_, 0x05) => processor_2op::inc_chk(zmachine, instruction),
                (_, 0x06) => processor_2op::jin(zmachine, instruction),
                (_, 0x07) => processor_2op::test(zmachine, instruction),
                (_, 0x08) => processor_2op::or(zmachine, instruction),
                (_, 0x09) => processor_2op::and(zmachine, instruction),
                (_, 0x0a) => processor_2op::test_attr(zmachine, instruction),
                (_, 0x0b) => processor_2op::set_attr(zmachine, instruction),
                (_, 0x0c) => processor_2op::clear_attr(zmachine, instruction),
                (_, 0x0d) => processor_2op::store(zmachine, instruction),
                (_, 0x0e) => processor_2op::insert_obj(zmachine, instruction),
                (_, 0x0f) => processor_2op::loadw(zmachine, instruction),
                (_, 0x10) => processor_2op::loadb(zmachine, instruction),
                (_, 0x11) => processor_2op::get_prop(zmachine, instruction),
                (_, 0x12) => processor_2op::get_prop_addr(zmachine, instruction),
                (_, 0x13) => processor_2op::get_next_prop(zmachine, instruction),
                (_, 0x14) => processor_2op::add(zmachine, instruction),
                (_, 0x15) => processor_2op::sub(zmachine, instruction),
                (_, 0x16) => processor_2op::mul(zmachine, instruction),
                (_, 0x17) => processor_2op::div(zmachine, instruction),
                (_, 0x18) => processor_2op::modulus(zmachine, instruction),
                (4..=8, 0x19) => processor_2op::call_2s(zmachine, instruction),
                (5..=8, 0x1a) => processor_2op::call_2n(zmachine, instruction),
                (5..=8, 0x1c) => processor_2op::throw(zmachine, instruction),
                (_, _) => fatal_error!(
                    ErrorCode::UnimplementedInstruction,
                    "Unimplemented instruction: {}",
                    instruction.opcode()
                ),
            },
            OperandCount::_VAR => match (version, instruction.opcode().instruction()) {
                (_, 0x00) => processor_var::call_vs(zmachine, instruction),
                (_, 0x01) => processor_var::storew(zmachine, instruction),
                (_, 0x02) => processor_var::storeb(zmachine, instruction),
                (_, 0x03) => processor_var::put_prop(zmachine, instruction),
                (_, 0x04) => processor_var::read(zmachine, instruction),
                (_, 0x05) => processor_var::print_char(zmachine, instruction),
                (_, 0x06) => processor_var::print_num(zmachine, instruction),
                (_, 0x07) => processor_var::random(zmachine, instruction),
                (_, 0x08) => processor_var::push(zmachine, instruction),
                (_, 0x09) => processor_var::pull(zmachine, instruction),
                (3..=8, 0x0b) => processor_var::set_window(zmachine, instruction),
                (4..=8, 0x0c) => processor_var::call_vs2(zmachine, instruction),
                (4..=8, 0x0d) => processor_var::erase_window(zmachine, instruction),
                (4..=8, 0x0f) => processor_var::set_cursor(zmachine, instruction),
                (4..=8, 0x16) => processor_var::read_char(zmachine, instruction),
                (4..=8, 0x17) => processor_var::scan_table(zmachine, instruction),
                (5..=8, 0x18) => processor_var::not(zmachine, instruction),
                (5..=8, 0x19) => processor_var::call_vn(zmachine, instruction),
                (5..=8, 0x1a) => processor_var::call_vn2(zmachine, instruction),
                (5..=8, 0x1b) => processor_var::tokenise(zmachine, instruction),
                (5..=8, 0x1c) => processor_var::encode_text(zmachine, instruction),
                (5..=8, 0x1d) => processor_var::copy_table(zmachine, instruction),
                (5..=8, 0x1e) => processor_var::print_table(zmachine, instruction),
                (5..=8, 0x1f) => processor_var::check_arg_count(zmachine, instruction),
                (_, _) => fatal_error!(
                    ErrorCode::UnimplementedInstruction,
                    "Unimplemented instruction: {}",
                    instruction.opcode()
                ),
            },
        },
    }
}
