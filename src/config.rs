//! Runtime configuration
use serde_yaml::{self, Value};
use std::fs::File;

use crate::{
    error::{ErrorCode, RuntimeError},
    fatal_error,
};

#[derive(Debug)]
/// Runtime configuration data
pub struct Config {
    /// Is logging enabled?
    logging: bool,
    /// Interpreter number written to the header during reset
    interpreter_number: u8,
    /// Interpreter version letter written to the header during reset
    interpreter_version: u8,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            logging: false,
            interpreter_number: 6,
            interpreter_version: b'Z',
        }
    }
}

impl TryFrom<File> for Config {
    type Error = RuntimeError;

    fn try_from(value: File) -> Result<Self, Self::Error> {
        match serde_yaml::from_reader::<File, Value>(value) {
            Ok(data) => {
                let logging = match data["logging"].as_str() {
                    Some(t) => t == "enabled",
                    None => false,
                };
                let interpreter_number = match data["interpreter_number"].as_u64() {
                    Some(v) => v as u8,
                    None => 6,
                };
                let interpreter_version = match data["interpreter_version"].as_str() {
                    Some(v) => v.bytes().next().unwrap_or(b'Z'),
                    None => b'Z',
                };
                Ok(Config::new(logging, interpreter_number, interpreter_version))
            }
            Err(e) => fatal_error!(ErrorCode::ConfigError, "{}", e),
        }
    }
}

impl Config {
    /// Constructor
    ///
    /// # Arguments
    /// * `logging` - Logging enabled flag
    /// * `interpreter_number` - Interpreter number
    /// * `interpreter_version` - Interpreter version letter
    pub fn new(logging: bool, interpreter_number: u8, interpreter_version: u8) -> Self {
        Config {
            logging,
            interpreter_number,
            interpreter_version,
        }
    }

    pub fn logging(&self) -> bool {
        self.logging
    }

    pub fn interpreter_number(&self) -> u8 {
        self.interpreter_number
    }

    pub fn interpreter_version(&self) -> u8 {
        self.interpreter_version
    }
}
