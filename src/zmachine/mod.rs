//! The machine: memory, stack, text codec, RNG, and interface, plus the
//! fetch/decode/dispatch loop.
use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::{
    config::Config,
    error::*,
    fatal_error,
    header::{self, Flags1v3, Flags1v4, Flags2, HeaderField},
    instruction::{decoder, processor, NextAddress, StoreResult},
    interface::{InputLine, Interface},
    memory::Memory,
    object::property,
    stack::Stack,
    text::Codec,
};

use self::rng::{chacha_rng::ChaChaRng, ZRng};
use self::snapshot::Snapshot;

pub mod rng;
pub mod snapshot;

/// Maximum number of undo snapshots retained
const UNDO_STACK_SIZE: usize = 10;

/// Maximum story file size by version
fn max_story_size(version: u8) -> usize {
    match version {
        1..=3 => 128 * 1024,
        4 | 5 => 256 * 1024,
        7 => 576 * 1024,
        _ => 512 * 1024,
    }
}

/// The Z-Machine.
pub struct ZMachine {
    /// ZCode version
    version: u8,
    /// Memory map
    memory: Memory,
    /// Value stack
    stack: Stack,
    /// Text codec
    codec: Codec,
    /// Random number generator
    rng: Box<dyn ZRng>,
    /// Interpreter interface
    interface: Box<dyn Interface>,
    /// Undo snapshots, oldest first
    undo_stack: VecDeque<Snapshot>,
    /// Interpreter number for the header
    interpreter_number: u8,
    /// Interpreter version letter for the header
    interpreter_version: u8,
    /// Execution guard
    executing: AtomicBool,
    /// Program counter
    pc: usize,
}

impl fmt::Debug for ZMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ZMachine: version {}, pc ${:06x}, {} frames",
            self.version,
            self.pc,
            self.stack.frame_count()
        )
    }
}

impl ZMachine {
    /// Constructor.
    ///
    /// Validates the story against its version's limits, fences dynamic
    /// memory at the static mark, builds the text codec, and patches the
    /// header.
    ///
    /// # Arguments
    /// * `zcode` - ZCode program to execute
    /// * `config` - Runtime configuration
    /// * `interface` - Interpreter interface
    ///
    /// # Returns
    /// [Result] with the machine or a [RuntimeError]
    pub fn new(
        zcode: Vec<u8>,
        config: &Config,
        interface: Box<dyn Interface>,
    ) -> Result<ZMachine, RuntimeError> {
        let mut memory = Memory::new(zcode)?;
        let version = header::field_byte(&memory, HeaderField::Version)?;
        if !matches!(version, 1..=5 | 7 | 8) {
            return fatal_error!(ErrorCode::UnsupportedVersion, "Version {} is not supported", version);
        }
        if memory.len() > max_story_size(version) {
            return fatal_error!(
                ErrorCode::HeaderViolation,
                "Story is {} bytes, over the version {} limit of {}",
                memory.len(),
                version,
                max_story_size(version)
            );
        }

        let static_mark = header::field_word(&memory, HeaderField::StaticMark)? as usize;
        if static_mark < 0x40 {
            return fatal_error!(
                ErrorCode::HeaderViolation,
                "Static memory begins inside the header: {:04x}",
                static_mark
            );
        }
        memory.set_dynamic_limit(static_mark)?;

        if (header::field_word(&memory, HeaderField::ObjectTable)? as usize) < 0x40 {
            return fatal_error!(ErrorCode::HeaderViolation, "Object table inside the header");
        }

        let codec = Codec::new(&memory)?;
        let pc = header::field_word(&memory, HeaderField::InitialPC)? as usize;
        let mut zmachine = ZMachine {
            version,
            memory,
            stack: Stack::new(),
            codec,
            rng: Box::new(ChaChaRng::new()),
            interface,
            undo_stack: VecDeque::new(),
            interpreter_number: config.interpreter_number(),
            interpreter_version: config.interpreter_version(),
            executing: AtomicBool::new(false),
            pc,
        };

        zmachine.initialize()?;
        Ok(zmachine)
    }

    /// Get the ZCode version
    ///
    /// # Returns
    /// ZCode version
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Get the program counter
    ///
    /// # Returns
    /// Address of the next instruction to execute
    pub fn pc(&self) -> usize {
        self.pc
    }

    /// Get the text codec
    ///
    /// # Returns
    /// Reference to the codec
    pub fn codec(&self) -> &Codec {
        &self.codec
    }

    /// Patch the header with the interpreter's capabilities.
    ///
    /// Run at construction, at the start of every [execute](#method.execute),
    /// and again after a restart.
    fn initialize(&mut self) -> Result<(), RuntimeError> {
        if self.version < 4 {
            header::clear_flag1(&mut self.memory, Flags1v3::StatusLineNotAvailable as u8)?;
            header::set_flag1(&mut self.memory, Flags1v3::ScreenSplitAvailable as u8)?;
            header::clear_flag1(&mut self.memory, Flags1v3::VariablePitchDefault as u8)?;
        }

        if self.version > 3 {
            let rows = self.interface.rows();
            let columns = self.interface.columns();
            header::set_byte(&mut self.memory, HeaderField::ScreenLines, rows)?;
            header::set_byte(&mut self.memory, HeaderField::ScreenColumns, columns)?;

            if self.version > 4 {
                header::clear_flag1(&mut self.memory, Flags1v4::PicturesAvailable as u8)?;
                header::set_flag1(&mut self.memory, Flags1v4::ColoursAvailable as u8)?;
                header::set_flag1(&mut self.memory, Flags1v4::BoldfaceAvailable as u8)?;
                header::set_flag1(&mut self.memory, Flags1v4::ItalicAvailable as u8)?;
                header::set_flag1(&mut self.memory, Flags1v4::FixedSpaceAvailable as u8)?;
                header::set_flag1(&mut self.memory, Flags1v4::TimedInputAvailable as u8)?;
                header::clear_flag2(&mut self.memory, Flags2::RequestPictures)?;
                header::clear_flag2(&mut self.memory, Flags2::RequestSoundEffects)?;
                header::set_word(&mut self.memory, HeaderField::ScreenHeight, rows as u16)?;
                header::set_word(&mut self.memory, HeaderField::ScreenWidth, columns as u16)?;
                header::set_byte(&mut self.memory, HeaderField::FontWidth, 1)?;
                header::set_byte(&mut self.memory, HeaderField::FontHeight, 1)?;
            }
        }

        header::set_byte(
            &mut self.memory,
            HeaderField::InterpreterNumber,
            self.interpreter_number,
        )?;
        header::set_byte(
            &mut self.memory,
            HeaderField::InterpreterVersion,
            self.interpreter_version,
        )?;
        header::set_word(&mut self.memory, HeaderField::Revision, 0x0100)?;

        Ok(())
    }

    // Memory access.  Reads are unrestricted; writes are fenced at the
    // dynamic limit by the memory map itself.

    pub fn read_byte(&self, address: usize) -> Result<u8, RuntimeError> {
        self.memory.read_byte(address)
    }

    pub fn read_word(&self, address: usize) -> Result<u16, RuntimeError> {
        self.memory.read_word(address)
    }

    pub fn read_dword(&self, address: usize) -> Result<u32, RuntimeError> {
        self.memory.read_dword(address)
    }

    pub fn write_byte(&mut self, address: usize, value: u8) -> Result<(), RuntimeError> {
        self.memory.write_byte(address, value)
    }

    pub fn write_word(&mut self, address: usize, value: u16) -> Result<(), RuntimeError> {
        self.memory.write_word(address, value)
    }

    /// Reads a byte field from the header
    pub fn header_byte(&self, field: HeaderField) -> Result<u8, RuntimeError> {
        header::field_byte(&self.memory, field)
    }

    /// Reads a word field from the header
    pub fn header_word(&self, field: HeaderField) -> Result<u16, RuntimeError> {
        header::field_word(&self.memory, field)
    }

    /// Calculate the checksum of the story file
    pub fn checksum(&self) -> Result<u16, RuntimeError> {
        self.memory.checksum()
    }

    /// Get instruction bytes at an address.
    ///
    /// # Arguments
    /// * `address` - Address of the instruction
    ///
    /// # Returns
    /// Up to 23 bytes from `address`, the longest possible instruction:
    /// 2 opcode bytes, 2 type bytes, 16 operand bytes, a store variable,
    /// and 2 branch bytes.
    pub fn instruction(&self, address: usize) -> Vec<u8> {
        self.memory.slice(address, 23)
    }

    /// Decode z-text at an address
    ///
    /// # Arguments
    /// * `address` - Address of the text
    ///
    /// # Returns
    /// [Result] with (decoded text, address of the byte after the text) or a
    /// [RuntimeError]
    pub fn text(&self, address: usize) -> Result<(String, usize), RuntimeError> {
        self.codec.decode(&self.memory, address)
    }

    // Packed addresses

    /// Unpack a routine address
    ///
    /// # Arguments
    /// * `address` - Packed address
    ///
    /// # Returns
    /// [Result] with the byte address of the routine header or a [RuntimeError]
    pub fn packed_routine_address(&self, address: u16) -> Result<usize, RuntimeError> {
        match self.version {
            1..=3 => Ok(address as usize * 2),
            4 | 5 => Ok(address as usize * 4),
            7 => Ok((address as usize * 4)
                + (self.header_word(HeaderField::RoutinesOffset)? as usize * 8)),
            _ => Ok(address as usize * 8),
        }
    }

    /// Unpack a string address
    ///
    /// # Arguments
    /// * `address` - Packed address
    ///
    /// # Returns
    /// [Result] with the byte address of the string or a [RuntimeError]
    pub fn packed_string_address(&self, address: u16) -> Result<usize, RuntimeError> {
        match self.version {
            1..=3 => Ok(address as usize * 2),
            4 | 5 => Ok(address as usize * 4),
            7 => Ok((address as usize * 4)
                + (self.header_word(HeaderField::StringsOffset)? as usize * 8)),
            _ => Ok(address as usize * 8),
        }
    }

    // Frames and variables

    /// Get the number of live frames
    pub fn frame_count(&self) -> usize {
        self.stack.frame_count()
    }

    /// Get the count of arguments passed to the executing routine
    pub fn argument_count(&self) -> u8 {
        self.stack.argument_count()
    }

    /// Get the address of a global variable
    fn global_variable_address(&self, variable: u8) -> Result<usize, RuntimeError> {
        let table = self.header_word(HeaderField::GlobalTable)? as usize;
        Ok(table + ((variable as usize - 16) * 2))
    }

    /// Get the value of a variable.
    ///
    /// Variable 0 pops the evaluation stack.
    ///
    /// # Arguments
    /// * `variable` - Variable number
    ///
    /// # Returns
    /// [Result] with the variable value or a [RuntimeError]
    pub fn variable(&mut self, variable: u8) -> Result<u16, RuntimeError> {
        if variable == 0 {
            self.stack.pop()
        } else if variable < 16 {
            self.stack.local_variable(variable)
        } else {
            let address = self.global_variable_address(variable)?;
            self.read_word(address)
        }
    }

    /// Peek at the value of a variable.
    ///
    /// Variable 0 reads the top of the evaluation stack without popping it.
    ///
    /// # Arguments
    /// * `variable` - Variable number
    ///
    /// # Returns
    /// [Result] with the variable value or a [RuntimeError]
    pub fn peek_variable(&mut self, variable: u8) -> Result<u16, RuntimeError> {
        if variable == 0 {
            self.stack.peek()
        } else if variable < 16 {
            self.stack.local_variable(variable)
        } else {
            let address = self.global_variable_address(variable)?;
            self.read_word(address)
        }
    }

    /// Set the value of a variable.
    ///
    /// Variable 0 pushes onto the evaluation stack.
    ///
    /// # Arguments
    /// * `variable` - Variable number
    /// * `value` - Value to set
    ///
    /// # Returns
    /// Empty [Result] or a [RuntimeError]
    pub fn set_variable(&mut self, variable: u8, value: u16) -> Result<(), RuntimeError> {
        debug!(target: "app::machine", "Set variable {:02x} to {:04x}", variable, value);
        if variable == 0 {
            self.stack.push(value)
        } else if variable < 16 {
            self.stack.set_local_variable(variable, value)
        } else {
            let address = self.global_variable_address(variable)?;
            self.write_word(address, value)
        }
    }

    /// Set the value of a variable addressed indirectly.
    ///
    /// Variable 0 replaces the top of the evaluation stack instead of
    /// pushing.
    ///
    /// # Arguments
    /// * `variable` - Variable number
    /// * `value` - Value to set
    ///
    /// # Returns
    /// Empty [Result] or a [RuntimeError]
    pub fn set_variable_indirect(&mut self, variable: u8, value: u16) -> Result<(), RuntimeError> {
        if variable == 0 {
            self.stack.pop()?;
            self.stack.push(value)
        } else {
            self.set_variable(variable, value)
        }
    }

    /// Push a value onto the evaluation stack
    pub fn push(&mut self, value: u16) -> Result<(), RuntimeError> {
        self.stack.push(value)
    }

    // Routines

    /// Decode a routine header.
    ///
    /// # Arguments
    /// * `address` - Address of the routine header
    ///
    /// # Returns
    /// [Result] with (first instruction address, initial local variables) or
    /// a [RuntimeError]
    fn routine_header(&self, address: usize) -> Result<(usize, Vec<u16>), RuntimeError> {
        let variable_count = self.memory.read_byte(address)? as usize;
        if variable_count > 15 {
            return fatal_error!(
                ErrorCode::InvalidRoutine,
                "Routines can have at most 15 local variables: {}",
                variable_count
            );
        }

        if self.version < 5 {
            let mut local_variables = Vec::new();
            for i in 0..variable_count {
                local_variables.push(self.memory.read_word(address + 1 + (i * 2))?);
            }
            Ok((address + 1 + (variable_count * 2), local_variables))
        } else {
            Ok((address + 1, vec![0; variable_count]))
        }
    }

    /// Call a routine.
    ///
    /// Calling address 0 stores false and continues without a frame.  When
    /// the call stores a result, the new frame's return PC is the address of
    /// the calling instruction's store byte.
    ///
    /// # Arguments
    /// * `address` - Byte address of the routine header
    /// * `arguments` - Arguments to the routine
    /// * `result` - [StoreResult] location, or [None]
    /// * `return_address` - Address of the instruction after the call
    ///
    /// # Returns
    /// [Result] with the address of the routine's first instruction or a
    /// [RuntimeError]
    pub fn call_routine(
        &mut self,
        address: usize,
        arguments: &[u16],
        result: Option<StoreResult>,
        return_address: usize,
    ) -> Result<NextAddress, RuntimeError> {
        if address == 0 {
            if let Some(r) = result {
                self.set_variable(r.variable(), 0)?;
            }
            return Ok(NextAddress::Address(return_address));
        }

        let (initial_pc, local_variables) = self.routine_header(address)?;
        let (return_pc, stores_result) = match result {
            Some(r) => (r.address(), true),
            None => (return_address, false),
        };
        debug!(target: "app::machine", "Call ${:06x} with {} arguments", address, arguments.len());
        self.stack
            .push_frame(return_pc, &local_variables, arguments, stores_result)?;
        Ok(NextAddress::Address(initial_pc))
    }

    /// Return from the current routine.
    ///
    /// When the frame stores a result, its return PC addresses the calling
    /// instruction's store byte; the variable read there receives `value`
    /// and execution resumes at the following byte.
    ///
    /// # Arguments
    /// * `value` - Return value
    ///
    /// # Returns
    /// [Result] with the address to resume execution at or a [RuntimeError]
    pub fn return_routine(&mut self, value: u16) -> Result<NextAddress, RuntimeError> {
        let (return_pc, stores_result) = self.stack.pop_frame()?;
        debug!(target: "app::machine", "Return {:04x} to ${:06x}", value, return_pc);
        if stores_result {
            let variable = self.read_byte(return_pc)?;
            self.set_variable(variable, value)?;
            Ok(NextAddress::Address(return_pc + 1))
        } else {
            Ok(NextAddress::Address(return_pc))
        }
    }

    /// Unwind to a caught frame and return from it.
    ///
    /// # Arguments
    /// * `depth` - Frame count recorded by CATCH
    /// * `value` - Return value
    ///
    /// # Returns
    /// [Result] with the address to resume execution at or a [RuntimeError]
    pub fn throw(&mut self, depth: u16, value: u16) -> Result<NextAddress, RuntimeError> {
        if depth == 0 || depth as usize > self.stack.frame_count() {
            return fatal_error!(
                ErrorCode::ReturnNoCaller,
                "THROW to invalid frame {} of {}",
                depth,
                self.stack.frame_count()
            );
        }

        while self.stack.frame_count() > depth as usize {
            self.stack.pop_frame()?;
        }
        self.return_routine(value)
    }

    // RNG

    /// Get a random number between 1 and `range`
    pub fn random(&mut self, range: u16) -> u16 {
        self.rng.random(range)
    }

    /// Reseed the RNG; 0 seeds from entropy
    pub fn seed(&mut self, seed: u16) {
        self.rng.seed(seed)
    }

    // Status line

    /// Build the status line.
    ///
    /// The left side is the short name of the object in global 0; the right
    /// side is score/turns or a time, per the header's status line type.
    ///
    /// # Returns
    /// [Result] with (left, right) strings or a [RuntimeError]
    pub fn status_line(&mut self) -> Result<(String, String), RuntimeError> {
        let status_type = header::flag1(&self.memory, Flags1v3::StatusLineType as u8)?;
        let object = self.variable(16)? as usize;
        let left = property::short_name(self, object)?;
        let right = if status_type == 0 {
            let score = i16::min(999, i16::max(-99, self.variable(17)? as i16));
            let turns = u16::min(9999, self.variable(18)?);
            format!("{:<8}", format!("{}/{}", score, turns))
        } else {
            let hour = u16::min(23, self.variable(17)?);
            let minute = u16::min(59, self.variable(18)?);
            let suffix = if hour > 11 { "PM" } else { "AM" };
            let h = if hour == 0 {
                12
            } else if hour > 12 {
                hour - 12
            } else {
                hour
            };
            format!("{:2}:{:02}{}", h, minute, suffix)
        };

        Ok((left, right))
    }

    // Interface

    pub fn rows(&self) -> u8 {
        self.interface.rows()
    }

    pub fn columns(&self) -> u8 {
        self.interface.columns()
    }

    /// Print text through the interface
    pub fn print(&mut self, text: &str) -> Result<(), RuntimeError> {
        self.interface.print(text)
    }

    /// Print a character through the interface
    pub fn print_char(&mut self, c: char) -> Result<(), RuntimeError> {
        self.interface.print_char(c)
    }

    /// Print a line break through the interface
    pub fn new_line(&mut self) -> Result<(), RuntimeError> {
        self.interface.new_line()
    }

    /// Read a line of input from the interface
    pub fn read_line(
        &mut self,
        max_len: usize,
        terminators: &[u16],
    ) -> Result<InputLine, RuntimeError> {
        self.interface.read_line(max_len, terminators)
    }

    /// Read a keypress from the interface
    pub fn read_key(&mut self) -> Result<Option<u16>, RuntimeError> {
        self.interface.read_key()
    }

    pub fn set_cursor(&mut self, row: u16, column: u16) -> Result<(), RuntimeError> {
        self.interface.set_cursor(row, column)
    }

    pub fn set_window(&mut self, window: u16) -> Result<(), RuntimeError> {
        self.interface.set_window(window)
    }

    pub fn erase_window(&mut self, window: i16) -> Result<(), RuntimeError> {
        self.interface.erase_window(window)
    }

    pub fn show_status(&mut self, left: &str, right: &str) -> Result<(), RuntimeError> {
        self.interface.show_status(left, right)
    }

    // Snapshots

    /// Capture the mutable machine state.
    ///
    /// # Arguments
    /// * `pc` - Address of the suspended instruction's store or branch byte
    ///
    /// # Returns
    /// The snapshot
    pub fn snapshot(&self, pc: usize) -> Snapshot {
        Snapshot::new(
            self.memory.dynamic(),
            self.stack.cells(),
            self.stack.frame_ptr(),
            self.stack.frame_count(),
            pc,
        )
    }

    /// Replace the mutable machine state from a snapshot and work out where
    /// execution resumes.
    ///
    /// In V1-3 the suspended SAVE's branch is taken as true; in V4+ the
    /// variable addressed by the suspended instruction's store byte
    /// receives 2.
    fn apply_snapshot(&mut self, snapshot: Snapshot) -> Result<NextAddress, RuntimeError> {
        self.memory.restore(snapshot.dynamic())?;
        self.stack.restore(
            snapshot.cells(),
            snapshot.frame_ptr(),
            snapshot.frame_count(),
        )?;
        self.initialize()?;

        let pc = snapshot.pc();
        if self.version < 4 {
            let b = self.read_byte(pc)?;
            let on_true = b & 0x80 == 0x80;
            let (next, offset) = if b & 0x40 == 0x40 {
                (pc + 1, (b & 0x3F) as i16)
            } else {
                let mut o = ((b as u16 & 0x3F) << 8) | self.read_byte(pc + 1)? as u16;
                if o & 0x2000 == 0x2000 {
                    o |= 0xC000;
                }
                (pc + 2, o as i16)
            };

            if on_true {
                match offset {
                    0 => self.return_routine(0),
                    1 => self.return_routine(1),
                    _ => Ok(NextAddress::Address(
                        (next as isize + offset as isize - 2) as usize,
                    )),
                }
            } else {
                Ok(NextAddress::Address(next))
            }
        } else {
            let variable = self.read_byte(pc)?;
            self.set_variable(variable, 2)?;
            Ok(NextAddress::Address(pc + 1))
        }
    }

    /// Save the machine state through the interface
    ///
    /// # Arguments
    /// * `pc` - Address of the save instruction's store or branch byte
    ///
    /// # Returns
    /// [Result] with `true` when the interface stored the snapshot or a
    /// [RuntimeError]
    pub fn save(&mut self, pc: usize) -> Result<bool, RuntimeError> {
        let snapshot = self.snapshot(pc);
        self.interface.save(&snapshot)
    }

    /// Restore the machine state through the interface
    ///
    /// # Returns
    /// [Result] with the address to resume execution at, [None] when the
    /// interface has nothing to restore, or a [RuntimeError]
    pub fn restore(&mut self) -> Result<Option<NextAddress>, RuntimeError> {
        match self.interface.restore()? {
            Some(snapshot) => Ok(Some(self.apply_snapshot(snapshot)?)),
            None => Ok(None),
        }
    }

    /// Push the machine state onto the undo stack
    ///
    /// # Arguments
    /// * `pc` - Address of the save_undo instruction's store byte
    pub fn save_undo(&mut self, pc: usize) {
        debug!(target: "app::machine", "Storing undo state");
        self.undo_stack.push_back(self.snapshot(pc));
        while self.undo_stack.len() > UNDO_STACK_SIZE {
            self.undo_stack.pop_front();
        }
    }

    /// Restore the most recent undo snapshot
    ///
    /// # Returns
    /// [Result] with the address to resume execution at, [None] when there is
    /// no undo state, or a [RuntimeError]
    pub fn restore_undo(&mut self) -> Result<Option<NextAddress>, RuntimeError> {
        match self.undo_stack.pop_back() {
            Some(snapshot) => Ok(Some(self.apply_snapshot(snapshot)?)),
            None => Ok(None),
        }
    }

    /// Reset the machine to its initial state
    ///
    /// # Returns
    /// [Result] with the initial program counter or a [RuntimeError]
    pub fn restart(&mut self) -> Result<usize, RuntimeError> {
        debug!(target: "app::machine", "Restart");
        self.memory.reset();
        self.stack.reset();
        self.initialize()?;
        self.pc = self.header_word(HeaderField::InitialPC)? as usize;
        Ok(self.pc)
    }

    // Execution

    /// Run the machine until it quits.
    ///
    /// Not reentrant: a second call while one is in progress fails without
    /// corrupting state.  Any error ends the run, leaving state as it was
    /// when the error was raised.
    ///
    /// # Returns
    /// Empty [Result] or a [RuntimeError]
    pub fn execute(&mut self) -> Result<(), RuntimeError> {
        if self.executing.swap(true, Ordering::Acquire) {
            return fatal_error!(ErrorCode::Interpreter, "Execution is already in progress");
        }

        let result = self.initialize().and_then(|_| self.run());
        self.executing.store(false, Ordering::Release);
        result
    }

    fn run(&mut self) -> Result<(), RuntimeError> {
        loop {
            let instruction = decoder::decode_instruction(self, self.pc)?;
            match processor::dispatch(self, &instruction)? {
                NextAddress::Address(address) => self.pc = address,
                NextAddress::Quit => return Ok(()),
            }
        }
    }
}
