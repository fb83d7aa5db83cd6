//! 0OP instructions
use super::*;
use crate::error::RuntimeError;
use crate::header::HeaderField;
use crate::zmachine::ZMachine;

pub fn rtrue(
    zmachine: &mut ZMachine,
    _instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    zmachine.return_routine(1)
}

pub fn rfalse(
    zmachine: &mut ZMachine,
    _instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    zmachine.return_routine(0)
}

pub fn print(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    let (text, next) = zmachine.text(instruction.next_address())?;
    zmachine.print(&text)?;
    Ok(NextAddress::Address(next))
}

pub fn print_ret(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    let (text, _) = zmachine.text(instruction.next_address())?;
    zmachine.print(&text)?;
    zmachine.new_line()?;
    zmachine.return_routine(1)
}

pub fn nop(
    _zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    Ok(NextAddress::Address(instruction.next_address()))
}

pub fn save(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    if zmachine.version() < 4 {
        let pc = match instruction.branch() {
            Some(b) => b.address(),
            None => {
                return fatal_error!(ErrorCode::Interpreter, "SAVE branch data missing");
            }
        };
        let saved = zmachine.save(pc)?;
        branch(zmachine, instruction, saved)
    } else {
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
}

pub fn restore(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    match zmachine.restore()? {
        Some(next) => Ok(next),
        None => {
            if zmachine.version() < 4 {
                branch(zmachine, instruction, false)
            } else {
                store_result(zmachine, instruction, 0)?;
                Ok(NextAddress::Address(instruction.next_address()))
            }
        }
    }
}

pub fn restart(
    zmachine: &mut ZMachine,
    _instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    Ok(NextAddress::Address(zmachine.restart()?))
}

pub fn ret_popped(
    zmachine: &mut ZMachine,
    _instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    let value = zmachine.variable(0)?;
    zmachine.return_routine(value)
}

pub fn pop(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    zmachine.variable(0)?;
    Ok(NextAddress::Address(instruction.next_address()))
}

pub fn catch(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    store_result(zmachine, instruction, zmachine.frame_count() as u16)?;
    Ok(NextAddress::Address(instruction.next_address()))
}

pub fn quit(
    _zmachine: &mut ZMachine,
    _instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    Ok(NextAddress::Quit)
}

pub fn new_line(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    zmachine.new_line()?;
    Ok(NextAddress::Address(instruction.next_address()))
}

pub fn show_status(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    let (left, right) = zmachine.status_line()?;
    zmachine.show_status(&left, &right)?;
    Ok(NextAddress::Address(instruction.next_address()))
}

pub fn verify(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    let checksum = zmachine.checksum()?;
    let expected = zmachine.header_word(HeaderField::Checksum)?;
    branch(zmachine, instruction, checksum == expected)
}

pub fn piracy(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<NextAddress, RuntimeError> {
    branch(zmachine, instruction, true)
}

#[cfg(test)]
mod tests {
    use crate::{
        assert_ok, assert_ok_eq,
        instruction::decoder::decode_instruction,
        test_util::{
            interface_print, interface_saved, interface_status, mock_zmachine,
            set_interface_restore, set_interface_save_result, test_map,
        },
    };

    use super::*;

    fn poke(map: &mut [u8], address: usize, bytes: &[u8]) {
        map[address..address + bytes.len()].copy_from_slice(bytes);
    }

    fn call_frame(zmachine: &mut ZMachine, store: Option<StoreResult>) {
        assert!(zmachine.call_routine(0x500, &[], store, 0x481).is_ok());
    }

    #[test]
    fn test_rtrue_rfalse() {
        let mut map = test_map(3);
        map[0x500] = 0;
        map[0x480] = 0x00;
        poke(&mut map, 0x400, &[0xB0]);
        let mut zmachine = mock_zmachine(map);
        call_frame(&mut zmachine, Some(StoreResult::new(0x480, 0)));
        let i = assert_ok!(decode_instruction(&zmachine, 0x400));
        assert_ok_eq!(rtrue(&mut zmachine, &i), NextAddress::Address(0x481));
        assert_ok_eq!(zmachine.variable(0), 1);

        call_frame(&mut zmachine, Some(StoreResult::new(0x480, 0)));
        assert_ok_eq!(rfalse(&mut zmachine, &i), NextAddress::Address(0x481));
        assert_ok_eq!(zmachine.variable(0), 0);
    }

    #[test]
    fn test_print() {
        let mut map = test_map(3);
        // print "hello"
        poke(&mut map, 0x400, &[0xB2, 0x35, 0x51, 0xC6, 0x85]);
        let mut zmachine = mock_zmachine(map);
        let i = assert_ok!(decode_instruction(&zmachine, 0x400));
        assert_ok_eq!(print(&mut zmachine, &i), NextAddress::Address(0x405));
        assert_eq!(interface_print(), "hello");
    }

    #[test]
    fn test_print_ret() {
        let mut map = test_map(3);
        map[0x500] = 0;
        poke(&mut map, 0x400, &[0xB3, 0x35, 0x51, 0xC6, 0x85]);
        let mut zmachine = mock_zmachine(map);
        call_frame(&mut zmachine, Some(StoreResult::new(0x480, 0)));
        let i = assert_ok!(decode_instruction(&zmachine, 0x400));
        assert_ok_eq!(print_ret(&mut zmachine, &i), NextAddress::Address(0x481));
        assert_eq!(interface_print(), "hello\n");
        assert_ok_eq!(zmachine.variable(0), 1);
    }

    #[test]
    fn test_nop() {
        let mut map = test_map(3);
        poke(&mut map, 0x400, &[0xB4]);
        let mut zmachine = mock_zmachine(map);
        let i = assert_ok!(decode_instruction(&zmachine, 0x400));
        assert_ok_eq!(nop(&mut zmachine, &i), NextAddress::Address(0x401));
    }

    #[test]
    fn test_save_v3_branches() {
        let mut map = test_map(3);
        // save [true] +5
        poke(&mut map, 0x400, &[0xB5, 0xC5]);
        set_interface_save_result(true);
        let mut zmachine = mock_zmachine(map);
        let i = assert_ok!(decode_instruction(&zmachine, 0x400));
        assert_ok_eq!(save(&mut zmachine, &i), NextAddress::Address(0x405));
        // The snapshot records the branch byte for the eventual restore
        let snapshot = interface_saved().unwrap();
        assert_eq!(snapshot.pc(), 0x401);
    }

    #[test]
    fn test_save_v3_failed() {
        let mut map = test_map(3);
        poke(&mut map, 0x400, &[0xB5, 0xC5]);
        set_interface_save_result(false);
        let mut zmachine = mock_zmachine(map);
        let i = assert_ok!(decode_instruction(&zmachine, 0x400));
        assert_ok_eq!(save(&mut zmachine, &i), NextAddress::Address(0x402));
    }

    #[test]
    fn test_save_v4_stores() {
        let mut map = test_map(4);
        // save -> G00
        poke(&mut map, 0x400, &[0xB5, 0x10]);
        set_interface_save_result(true);
        let mut zmachine = mock_zmachine(map);
        let i = assert_ok!(decode_instruction(&zmachine, 0x400));
        assert_ok_eq!(save(&mut zmachine, &i), NextAddress::Address(0x402));
        assert_ok_eq!(zmachine.variable(0x10), 1);
        let snapshot = interface_saved().unwrap();
        assert_eq!(snapshot.pc(), 0x401);
    }

    #[test]
    fn test_restore_v3() {
        let mut map = test_map(3);
        poke(&mut map, 0x400, &[0xB6, 0xC5]);
        // A save branch byte the restored state resumes through
        map[0x480] = 0xC5;
        let mut zmachine = mock_zmachine(map);
        set_interface_restore(Some(zmachine.snapshot(0x480)));
        let i = assert_ok!(decode_instruction(&zmachine, 0x400));
        // Resumes at the save branch taken as true: 0x481 + 5 - 2
        assert_ok_eq!(restore(&mut zmachine, &i), NextAddress::Address(0x484));
    }

    #[test]
    fn test_restore_v3_nothing_to_restore() {
        let mut map = test_map(3);
        poke(&mut map, 0x400, &[0xB6, 0xC5]);
        set_interface_restore(None);
        let mut zmachine = mock_zmachine(map);
        let i = assert_ok!(decode_instruction(&zmachine, 0x400));
        assert_ok_eq!(restore(&mut zmachine, &i), NextAddress::Address(0x402));
    }

    #[test]
    fn test_restore_v4_nothing_to_restore() {
        let mut map = test_map(4);
        poke(&mut map, 0x400, &[0xB6, 0x10]);
        set_interface_restore(None);
        let mut zmachine = mock_zmachine(map);
        let i = assert_ok!(decode_instruction(&zmachine, 0x400));
        assert_ok_eq!(restore(&mut zmachine, &i), NextAddress::Address(0x402));
        assert_ok_eq!(zmachine.variable(0x10), 0);
    }

    #[test]
    fn test_restart() {
        let mut map = test_map(3);
        poke(&mut map, 0x400, &[0xB7]);
        let mut zmachine = mock_zmachine(map);
        assert!(zmachine.write_byte(0x200, 0x42).is_ok());
        let i = assert_ok!(decode_instruction(&zmachine, 0x400));
        assert_ok_eq!(restart(&mut zmachine, &i), NextAddress::Address(0x400));
        assert_ok_eq!(zmachine.read_byte(0x200), 0);
    }

    #[test]
    fn test_ret_popped() {
        let mut map = test_map(3);
        map[0x500] = 0;
        poke(&mut map, 0x400, &[0xB8]);
        let mut zmachine = mock_zmachine(map);
        call_frame(&mut zmachine, Some(StoreResult::new(0x480, 0)));
        assert!(zmachine.push(0x42).is_ok());
        let i = assert_ok!(decode_instruction(&zmachine, 0x400));
        assert_ok_eq!(ret_popped(&mut zmachine, &i), NextAddress::Address(0x481));
        assert_ok_eq!(zmachine.variable(0), 0x42);
    }

    #[test]
    fn test_pop() {
        let mut map = test_map(3);
        poke(&mut map, 0x400, &[0xB9]);
        let mut zmachine = mock_zmachine(map);
        assert!(zmachine.push(0x11).is_ok());
        assert!(zmachine.push(0x22).is_ok());
        let i = assert_ok!(decode_instruction(&zmachine, 0x400));
        assert_ok_eq!(pop(&mut zmachine, &i), NextAddress::Address(0x401));
        assert_ok_eq!(zmachine.variable(0), 0x11);
    }

    #[test]
    fn test_catch() {
        let mut map = test_map(5);
        map[0x500] = 0;
        poke(&mut map, 0x400, &[0xB9, 0x00]);
        let mut zmachine = mock_zmachine(map);
        call_frame(&mut zmachine, None);
        let i = assert_ok!(decode_instruction(&zmachine, 0x400));
        assert_ok_eq!(catch(&mut zmachine, &i), NextAddress::Address(0x402));
        assert_ok_eq!(zmachine.variable(0), 2);
    }

    #[test]
    fn test_quit() {
        let mut map = test_map(3);
        poke(&mut map, 0x400, &[0xBA]);
        let mut zmachine = mock_zmachine(map);
        let i = assert_ok!(decode_instruction(&zmachine, 0x400));
        assert_ok_eq!(quit(&mut zmachine, &i), NextAddress::Quit);
    }

    #[test]
    fn test_new_line() {
        let mut map = test_map(3);
        poke(&mut map, 0x400, &[0xBB]);
        let mut zmachine = mock_zmachine(map);
        let i = assert_ok!(decode_instruction(&zmachine, 0x400));
        assert_ok_eq!(new_line(&mut zmachine, &i), NextAddress::Address(0x401));
        assert_eq!(interface_print(), "\n");
    }

    #[test]
    fn test_show_status() {
        use crate::test_util::{mock_object_v3, mock_property_table_v3, set_global};

        let mut map = test_map(3);
        poke(&mut map, 0x400, &[0xBC]);
        set_global(&mut map, 0, 1);
        set_global(&mut map, 1, 42);
        set_global(&mut map, 2, 7);
        mock_object_v3(&mut map, 1, 0, 0, 0, 0x600);
        mock_property_table_v3(&mut map, 0x600, &[0x3551, 0xC685], &[]);
        let mut zmachine = mock_zmachine(map);
        let i = assert_ok!(decode_instruction(&zmachine, 0x400));
        assert_ok_eq!(show_status(&mut zmachine, &i), NextAddress::Address(0x401));
        assert_eq!(interface_status(), ("hello".to_string(), "42/7    ".to_string()));
    }

    #[test]
    fn test_verify() {
        let mut map = test_map(3);
        poke(&mut map, 0x400, &[0xBD, 0xC5]);
        let mut zmachine = mock_zmachine(map);
        let checksum = assert_ok!(zmachine.checksum());
        assert!(zmachine.write_word(0x1C, checksum).is_ok());
        let i = assert_ok!(decode_instruction(&zmachine, 0x400));
        assert_ok_eq!(verify(&mut zmachine, &i), NextAddress::Address(0x405));
        // A corrupted checksum fails verification
        assert!(zmachine.write_word(0x1C, checksum.wrapping_add(1)).is_ok());
        assert_ok_eq!(verify(&mut zmachine, &i), NextAddress::Address(0x402));
    }

    #[test]
    fn test_piracy() {
        let mut map = test_map(5);
        poke(&mut map, 0x400, &[0xBF, 0xC5]);
        let mut zmachine = mock_zmachine(map);
        let i = assert_ok!(decode_instruction(&zmachine, 0x400));
        assert_ok_eq!(piracy(&mut zmachine, &i), NextAddress::Address(0x405));
    }
}
