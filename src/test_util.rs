//! Shared test fixtures: a minimal story map, mock objects, dictionaries,
//! routines, and an interface that captures output in thread-local cells.
use std::cell::RefCell;

use crate::{
    config::Config,
    error::RuntimeError,
    instruction::{
        decoder, Branch, Instruction, Opcode, OpcodeForm, OperandCount, StoreResult,
    },
    interface::{InputLine, Interface},
    zmachine::{snapshot::Snapshot, ZMachine},
};

#[macro_export]
macro_rules! assert_ok {
    ($e:expr) => {{
        let r = $e;
        assert!(r.is_ok(), "{:?}", r.err());
        r.unwrap()
    }};
}

#[macro_export]
macro_rules! assert_ok_eq {
    ($e:expr, $v:expr) => {{
        let r = $e;
        assert!(r.is_ok(), "{:?}", r.err());
        assert_eq!(r.unwrap(), $v);
    }};
    ($e:expr, $v:expr, $($arg:tt)*) => {{
        let r = $e;
        assert!(r.is_ok(), $($arg)*);
        assert_eq!(r.unwrap(), $v, $($arg)*);
    }};
}

#[macro_export]
macro_rules! assert_some_eq {
    ($e:expr, $v:expr) => {{
        let o = $e;
        assert!(o.is_some());
        assert_eq!(o.unwrap(), $v);
    }};
}

thread_local! {
    static PRINT: RefCell<String> = RefCell::new(String::new());
    static INPUT: RefCell<(Vec<u16>, Option<u16>)> = RefCell::new((Vec::new(), Some(13)));
    static KEY: RefCell<Option<u16>> = RefCell::new(Some(13));
    static SAVE_RESULT: RefCell<bool> = RefCell::new(true);
    static SAVED: RefCell<Option<Snapshot>> = RefCell::new(None);
    static RESTORE: RefCell<Option<Snapshot>> = RefCell::new(None);
    static STATUS: RefCell<(String, String)> = RefCell::new((String::new(), String::new()));
    static WINDOW: RefCell<u16> = RefCell::new(0);
    static ERASED: RefCell<Vec<i16>> = RefCell::new(Vec::new());
    static CURSOR: RefCell<(u16, u16)> = RefCell::new((0, 0));
}

pub fn interface_print() -> String {
    PRINT.with(|x| x.borrow().clone())
}

pub fn set_interface_input(input: &[u16], terminator: Option<u16>) {
    INPUT.with(|x| *x.borrow_mut() = (input.to_vec(), terminator));
}

pub fn set_interface_key(key: Option<u16>) {
    KEY.with(|x| *x.borrow_mut() = key);
}

pub fn set_interface_save_result(result: bool) {
    SAVE_RESULT.with(|x| *x.borrow_mut() = result);
}

pub fn interface_saved() -> Option<Snapshot> {
    SAVED.with(|x| x.borrow().clone())
}

pub fn set_interface_restore(snapshot: Option<Snapshot>) {
    RESTORE.with(|x| *x.borrow_mut() = snapshot);
}

pub fn interface_status() -> (String, String) {
    STATUS.with(|x| x.borrow().clone())
}

pub fn interface_window() -> u16 {
    WINDOW.with(|x| *x.borrow())
}

pub fn interface_erased() -> Vec<i16> {
    ERASED.with(|x| x.borrow().clone())
}

pub fn interface_cursor() -> (u16, u16) {
    CURSOR.with(|x| *x.borrow())
}

/// An interface that records everything in thread-local cells.
pub struct MockInterface;

impl MockInterface {
    pub fn new() -> MockInterface {
        MockInterface {}
    }
}

impl Interface for MockInterface {
    fn rows(&self) -> u8 {
        24
    }

    fn columns(&self) -> u8 {
        80
    }

    fn print(&mut self, text: &str) -> Result<(), RuntimeError> {
        PRINT.with(|x| x.borrow_mut().push_str(text));
        Ok(())
    }

    fn print_char(&mut self, c: char) -> Result<(), RuntimeError> {
        PRINT.with(|x| x.borrow_mut().push(c));
        Ok(())
    }

    fn new_line(&mut self) -> Result<(), RuntimeError> {
        PRINT.with(|x| x.borrow_mut().push('\n'));
        Ok(())
    }

    fn read_line(
        &mut self,
        max_len: usize,
        _terminators: &[u16],
    ) -> Result<InputLine, RuntimeError> {
        let (input, terminator) = INPUT.with(|x| x.borrow().clone());
        let n = usize::min(input.len(), max_len);
        Ok(InputLine::new(&input[0..n], terminator))
    }

    fn read_key(&mut self) -> Result<Option<u16>, RuntimeError> {
        Ok(KEY.with(|x| *x.borrow()))
    }

    fn set_cursor(&mut self, row: u16, column: u16) -> Result<(), RuntimeError> {
        CURSOR.with(|x| *x.borrow_mut() = (row, column));
        Ok(())
    }

    fn set_window(&mut self, window: u16) -> Result<(), RuntimeError> {
        WINDOW.with(|x| *x.borrow_mut() = window);
        Ok(())
    }

    fn erase_window(&mut self, window: i16) -> Result<(), RuntimeError> {
        ERASED.with(|x| x.borrow_mut().push(window));
        Ok(())
    }

    fn scroll_region(
        &mut self,
        _row: u16,
        _column: u16,
        _width: u16,
        _height: u16,
    ) -> Result<(), RuntimeError> {
        Ok(())
    }

    fn string_width(&self, text: &str) -> Result<u16, RuntimeError> {
        Ok(text.chars().count() as u16)
    }

    fn show_status(&mut self, left: &str, right: &str) -> Result<(), RuntimeError> {
        STATUS.with(|x| *x.borrow_mut() = (left.to_string(), right.to_string()));
        Ok(())
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<bool, RuntimeError> {
        SAVED.with(|x| *x.borrow_mut() = Some(snapshot.clone()));
        Ok(SAVE_RESULT.with(|x| *x.borrow()))
    }

    fn restore(&mut self) -> Result<Option<Snapshot>, RuntimeError> {
        Ok(RESTORE.with(|x| x.borrow_mut().take()))
    }
}

impl Default for MockInterface {
    fn default() -> Self {
        MockInterface::new()
    }
}

/// A minimal story map: initial PC $0400, dictionary $0300, object table
/// $0200, globals $0100, static memory from $0700.
pub fn test_map(version: u8) -> Vec<u8> {
    let mut v = vec![0; 0x800];
    v[0] = version;
    // Initial PC at $0400
    v[0x06] = 0x04;
    // Dictionary at $0300
    v[0x08] = 0x03;
    // Object table at $0200
    v[0x0A] = 0x02;
    // Globals at $0100
    v[0x0C] = 0x01;
    // Static memory from $0700
    v[0x0E] = 0x07;
    v
}

/// Poke a global variable value into the map
pub fn set_global(map: &mut [u8], global: usize, value: u16) {
    let address = 0x100 + (global * 2);
    map[address] = (value >> 8) as u8;
    map[address + 1] = value as u8;
}

pub fn test_zmachine(map: Vec<u8>) -> Result<ZMachine, RuntimeError> {
    ZMachine::new(map, &Config::default(), Box::new(MockInterface::new()))
}

pub fn mock_zmachine(map: Vec<u8>) -> ZMachine {
    let z = test_zmachine(map);
    assert!(z.is_ok(), "{:?}", z.err());
    z.unwrap()
}

pub fn decode_at(zmachine: &ZMachine, address: usize) -> Instruction {
    let i = decoder::decode_instruction(zmachine, address);
    assert!(i.is_ok(), "{:?}", i.err());
    i.unwrap()
}

pub fn mock_branch(condition: bool, branch_address: usize, next_address: usize) -> Instruction {
    Instruction::new(
        &[],
        0,
        Opcode::new(5, 1, 1, OpcodeForm::Var, OperandCount::_VAR),
        vec![],
        None,
        Some(Branch::new(0, condition, branch_address)),
        next_address,
    )
}

pub fn mock_store(variable: u8, next_address: usize) -> Instruction {
    Instruction::new(
        &[],
        0,
        Opcode::new(5, 1, 1, OpcodeForm::Var, OperandCount::_VAR),
        vec![],
        Some(StoreResult::new(0, variable)),
        None,
        next_address,
    )
}

/// Poke a routine header: local count, with initial values before V5
pub fn mock_routine(map: &mut [u8], address: usize, local_variables: &[u16]) {
    map[address] = local_variables.len() as u8;
    if map[0] < 5 {
        for (i, w) in local_variables.iter().enumerate() {
            map[address + 1 + (i * 2)] = (*w >> 8) as u8;
            map[address + 2 + (i * 2)] = *w as u8;
        }
    }
}

/// Poke a V1-3 object table entry
pub fn mock_object_v3(
    map: &mut [u8],
    object: usize,
    parent: u8,
    sibling: u8,
    child: u8,
    property_table: u16,
) {
    let address = 0x200 + 62 + (9 * (object - 1));
    map[address + 4] = parent;
    map[address + 5] = sibling;
    map[address + 6] = child;
    map[address + 7] = (property_table >> 8) as u8;
    map[address + 8] = property_table as u8;
}

/// Poke a V4+ object table entry
pub fn mock_object_v4(
    map: &mut [u8],
    object: usize,
    parent: u16,
    sibling: u16,
    child: u16,
    property_table: u16,
) {
    let address = 0x200 + 126 + (14 * (object - 1));
    map[address + 6] = (parent >> 8) as u8;
    map[address + 7] = parent as u8;
    map[address + 8] = (sibling >> 8) as u8;
    map[address + 9] = sibling as u8;
    map[address + 10] = (child >> 8) as u8;
    map[address + 11] = child as u8;
    map[address + 12] = (property_table >> 8) as u8;
    map[address + 13] = property_table as u8;
}

/// Poke a V1-3 property table: short name words, then properties in
/// descending number order
pub fn mock_property_table_v3(
    map: &mut [u8],
    address: usize,
    name: &[u16],
    properties: &[(u8, &[u8])],
) {
    map[address] = name.len() as u8;
    for (i, w) in name.iter().enumerate() {
        map[address + 1 + (i * 2)] = (*w >> 8) as u8;
        map[address + 2 + (i * 2)] = *w as u8;
    }

    let mut p = address + 1 + (name.len() * 2);
    for (number, data) in properties.iter().copied() {
        map[p] = (((data.len() - 1) as u8) << 5) | number;
        map[p + 1..p + 1 + data.len()].copy_from_slice(data);
        p += 1 + data.len();
    }
    map[p] = 0;
}

/// Poke a V4+ property table, using the two-byte size form for properties
/// longer than 2 bytes
pub fn mock_property_table_v4(
    map: &mut [u8],
    address: usize,
    name: &[u16],
    properties: &[(u8, &[u8])],
) {
    map[address] = name.len() as u8;
    for (i, w) in name.iter().enumerate() {
        map[address + 1 + (i * 2)] = (*w >> 8) as u8;
        map[address + 2 + (i * 2)] = *w as u8;
    }

    let mut p = address + 1 + (name.len() * 2);
    for (number, data) in properties.iter().copied() {
        if data.len() > 2 {
            map[p] = 0x80 | number;
            map[p + 1] = 0x80 | data.len() as u8;
            p += 2;
        } else {
            map[p] = if data.len() == 2 { 0x40 } else { 0 } | number;
            p += 1;
        }
        map[p..p + data.len()].copy_from_slice(data);
        p += data.len();
    }
    map[p] = 0;
}

/// Poke a V1-3 dictionary at $0300: separators . , ", entry size 7, with
/// the words and, go, look, north, sailor, xyzzy
pub fn mock_dictionary_v3(map: &mut [u8], sorted: bool) {
    map[0x300] = 3;
    map[0x301] = b'.';
    map[0x302] = b',';
    map[0x303] = b'"';
    map[0x304] = 7;
    let count: i16 = if sorted { 6 } else { -6 };
    map[0x305] = (count >> 8) as u8;
    map[0x306] = count as u8;

    let mut words: Vec<[u16; 2]> = vec![
        [0x1A69, 0x94A5], // and
        [0x3285, 0x94A5], // go
        [0x4694, 0xC0A5], // look
        [0x4E97, 0xE5A5], // north
        [0x60CE, 0xC697], // sailor
        [0x77DF, 0xFFC5], // xyzzy
    ];
    if !sorted {
        words.reverse();
    }

    for (i, word) in words.iter().enumerate() {
        let address = 0x307 + (i * 7);
        map[address] = (word[0] >> 8) as u8;
        map[address + 1] = word[0] as u8;
        map[address + 2] = (word[1] >> 8) as u8;
        map[address + 3] = word[1] as u8;
    }
}

/// Poke a V4+ dictionary at $0300: separators . , ", entry size 9, with
/// the words hello, inventory, look, sailor
pub fn mock_dictionary_v4(map: &mut [u8], sorted: bool) {
    map[0x300] = 3;
    map[0x301] = b'.';
    map[0x302] = b',';
    map[0x303] = b'"';
    map[0x304] = 9;
    let count: i16 = if sorted { 4 } else { -4 };
    map[0x305] = (count >> 8) as u8;
    map[0x306] = count as u8;

    let mut words: Vec<[u16; 3]> = vec![
        [0x3551, 0x4685, 0x94A5], // hello
        [0x3A7B, 0x2A79, 0xD2FE], // inventory
        [0x4694, 0x40A5, 0x94A5], // look
        [0x60CE, 0x4697, 0x94A5], // sailor
    ];
    if !sorted {
        words.reverse();
    }

    for (i, word) in words.iter().enumerate() {
        let address = 0x307 + (i * 9);
        for (j, w) in word.iter().enumerate() {
            map[address + (j * 2)] = (*w >> 8) as u8;
            map[address + (j * 2) + 1] = *w as u8;
        }
    }
}
