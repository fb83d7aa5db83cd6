//! The core of a Z-Machine interpreter: memory map, processor, text
//! subsystem, object tree, and snapshots.  Screen handling, sound, and
//! file storage belong to the embedder, which plugs in through the
//! [interface::Interface] trait.
#![crate_name = "zvm"]

#[macro_use]
extern crate log;

pub mod config;
pub mod dictionary;
pub mod error;
pub mod header;
pub mod instruction;
pub mod interface;
pub mod memory;
pub mod object;
pub mod stack;
pub mod text;
pub mod zmachine;

#[cfg(test)]
pub mod test_util;
