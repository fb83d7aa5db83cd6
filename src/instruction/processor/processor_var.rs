//! VAR instructions
use super::*;
use crate::dictionary;
use crate::error::RuntimeError;
use crate::header::HeaderField;
use crate::object::property;
use crate::zmachine::ZMachine;

pub fn call_vs(
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

pub fn storew(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let address = operands[0] as usize + (operands[1] as usize * 2);
    zmachine.write_word(address, operands[2])?;
    Ok(NextAddress::Address(instruction.next_address()))
}

pub fn storeb(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let address = operands[0] as usize + operands[1] as usize;
    zmachine.write_byte(address, operands[2] as u8)?;
    Ok(NextAddress::Address(instruction.next_address()))
}

pub fn put_prop(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    property::set_value(
        zmachine,
        operands[0] as usize,
        operands[1] as u8,
        operands[2],
    )?;
    Ok(NextAddress::Address(instruction.next_address()))
}

/// SREAD (V1-4) / AREAD (V5+).
///
/// V1-3 redraw the status line first.  The typed line is reduced to lower
/// case ZSCII and written to the text buffer, then parsed against the
/// default dictionary unless the parse buffer is 0 (V5+).  V5+ stores the
/// terminating character.  End of input from the interface quits.
pub fn read(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let text_buffer = operands[0] as usize;

    if zmachine.version() < 4 {
        let (left, right) = zmachine.status_line()?;
        zmachine.show_status(&left, &right)?;
    }

    let max_len = zmachine.read_byte(text_buffer)? as usize;
    let max_len = if zmachine.version() < 5 {
        max_len.saturating_sub(1)
    } else {
        max_len
    };

    let mut terminators = vec![13];
    if zmachine.version() >= 5 {
        let table = zmachine.header_word(HeaderField::TerminatorTable)? as usize;
        if table > 0 {
            let mut i = 0;
            loop {
                let t = zmachine.read_byte(table + i)?;
                if t == 0 {
                    break;
                }
                terminators.push(t as u16);
                i += 1;
            }
        }
    }

    let input = zmachine.read_line(max_len, &terminators)?;
    let terminator = match input.terminator() {
        Some(t) => t,
        None => return Ok(NextAddress::Quit),
    };

    let mut chars = Vec::new();
    for c in input.input().iter().take(max_len) {
        let z = zmachine.codec().to_zscii(*c);
        chars.push(z.to_ascii_lowercase());
    }

    if zmachine.version() < 5 {
        for (i, z) in chars.iter().enumerate() {
            zmachine.write_byte(text_buffer + 1 + i, *z)?;
        }
        zmachine.write_byte(text_buffer + 1 + chars.len(), 0)?;
    } else {
        zmachine.write_byte(text_buffer + 1, chars.len() as u8)?;
        for (i, z) in chars.iter().enumerate() {
            zmachine.write_byte(text_buffer + 2 + i, *z)?;
        }
    }

    let parse_buffer = if operands.len() > 1 {
        operands[1] as usize
    } else {
        0
    };
    if parse_buffer > 0 {
        let dictionary = zmachine.header_word(HeaderField::Dictionary)? as usize;
        dictionary::parse_text(zmachine, text_buffer, parse_buffer, dictionary, false)?;
    }

    if zmachine.version() >= 5 {
        store_result(zmachine, instruction, terminator)?;
    }

    Ok(NextAddress::Address(instruction.next_address()))
}

pub fn print_char(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    // ZSCII 0 prints nothing
    if operands[0] != 0 {
        let c = zmachine.codec().to_unicode(operands[0]);
        zmachine.print_char(c)?;
    }
    Ok(NextAddress::Address(instruction.next_address()))
}

pub fn print_num(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let text = format!("{}", operands[0] as i16);
    zmachine.print(&text)?;
    Ok(NextAddress::Address(instruction.next_address()))
}

/// RANDOM.
///
/// A positive range stores a random value between 1 and the range.  A range
/// of 0 reseeds the generator from entropy; a negative range reseeds it
/// deterministically with the absolute value.  Both reseeds store 0.
pub fn random(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let range = operands[0] as i16;
    if range < 1 {
        zmachine.seed(range.unsigned_abs());
        store_result(zmachine, instruction, 0)?;
    } else {
        let value = zmachine.random(range as u16);
        store_result(zmachine, instruction, value)?;
    }

    Ok(NextAddress::Address(instruction.next_address()))
}

pub fn push(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    zmachine.push(operands[0])?;
    Ok(NextAddress::Address(instruction.next_address()))
}

pub fn pull(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let value = zmachine.variable(0)?;
    zmachine.set_variable_indirect(operands[0] as u8, value)?;
    Ok(NextAddress::Address(instruction.next_address()))
}

pub fn set_window(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    zmachine.set_window(operands[0])?;
    Ok(NextAddress::Address(instruction.next_address()))
}

pub fn call_vs2(
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

pub fn erase_window(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    zmachine.erase_window(operands[0] as i16)?;
    Ok(NextAddress::Address(instruction.next_address()))
}

pub fn set_cursor(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    zmachine.set_cursor(operands[0], operands[1])?;
    Ok(NextAddress::Address(instruction.next_address()))
}

pub fn read_char(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    operand_values(zmachine, instruction)?;
    match zmachine.read_key()? {
        Some(key) => {
            store_result(zmachine, instruction, key)?;
            Ok(NextAddress::Address(instruction.next_address()))
        }
        None => Ok(NextAddress::Quit),
    }
}

pub fn scan_table(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let value = operands[0];
    let table = operands[1] as usize;
    let length = operands[2] as usize;
    // Form defaults to word entries of size 2
    let form = if operands.len() > 3 { operands[3] } else { 0x82 };
    let words = form & 0x80 == 0x80;
    let field = (form & 0x7F) as usize;

    let mut address = 0;
    for i in 0..length {
        let entry_address = table + (i * field);
        let entry = if words {
            zmachine.read_word(entry_address)?
        } else {
            zmachine.read_byte(entry_address)? as u16
        };
        if entry == value {
            address = entry_address;
            break;
        }
    }

    store_result(zmachine, instruction, address as u16)?;
    branch(zmachine, instruction, address > 0)
}

pub fn not(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    store_result(zmachine, instruction, !operands[0])?;
    Ok(NextAddress::Address(instruction.next_address()))
}

pub fn call_vn(
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

pub fn call_vn2(
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

pub fn tokenise(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let text_buffer = operands[0] as usize;
    let parse_buffer = operands[1] as usize;
    let dictionary = if operands.len() > 2 && operands[2] > 0 {
        operands[2] as usize
    } else {
        zmachine.header_word(HeaderField::Dictionary)? as usize
    };
    let skip_unknown = operands.len() > 3 && operands[3] > 0;
    dictionary::parse_text(zmachine, text_buffer, parse_buffer, dictionary, skip_unknown)?;
    Ok(NextAddress::Address(instruction.next_address()))
}

pub fn encode_text(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let text = operands[0] as usize;
    let length = operands[1] as usize;
    let from = operands[2] as usize;
    let destination = operands[3] as usize;

    let mut chars = Vec::new();
    for i in 0..length {
        chars.push(zmachine.read_byte(text + from + i)? as u16);
    }

    let words = zmachine.codec().encode(&chars, 3);
    for (i, w) in words.iter().enumerate() {
        zmachine.write_word(destination + (i * 2), *w)?;
    }

    Ok(NextAddress::Address(instruction.next_address()))
}

/// COPY_TABLE.
///
/// A zero second table zeroes the first. A negative size forces a forward
/// copy; a positive size copies backwards when the ranges overlap so the
/// source is not clobbered mid-copy.
pub fn copy_table(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let first = operands[0] as usize;
    let second = operands[1] as usize;
    let size = operands[2] as i16;
    let length = size.unsigned_abs() as usize;

    if second == 0 {
        for i in 0..length {
            zmachine.write_byte(first + i, 0)?;
        }
    } else if size > 0 && second > first && second < first + length {
        for i in (0..length).rev() {
            let b = zmachine.read_byte(first + i)?;
            zmachine.write_byte(second + i, b)?;
        }
    } else {
        for i in 0..length {
            let b = zmachine.read_byte(first + i)?;
            zmachine.write_byte(second + i, b)?;
        }
    }

    Ok(NextAddress::Address(instruction.next_address()))
}

pub fn print_table(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let table = operands[0] as usize;
    let width = operands[1] as usize;
    let height = if operands.len() > 2 {
        operands[2] as usize
    } else {
        1
    };
    let skip = if operands.len() > 3 {
        operands[3] as usize
    } else {
        0
    };

    let mut address = table;
    for row in 0..height {
        let mut text = String::new();
        for i in 0..width {
            let z = zmachine.read_byte(address + i)? as u16;
            text.push(zmachine.codec().to_unicode(z));
        }
        zmachine.print(&text)?;
        if row + 1 < height {
            zmachine.new_line()?;
        }
        address += width + skip;
    }

    Ok(NextAddress::Address(instruction.next_address()))
}

pub fn check_arg_count(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let count = zmachine.argument_count();
    branch(zmachine, instruction, operands[0] <= count as u16)
}
