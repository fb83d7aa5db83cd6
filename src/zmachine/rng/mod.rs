//! Random number generation
use core::fmt;

pub mod chacha_rng;

pub trait ZRng {
    /// RNG type name
    ///
    /// # Returns
    /// RNG type name string
    fn type_name(&self) -> &str;

    /// Reseed the RNG
    ///
    /// # Arguments
    /// * `seed` - seed value, or 0 to seed from entropy
    fn seed(&mut self, seed: u16);

    /// Get the next random number
    ///
    /// # Arguments
    /// * `range` - the upper limit of the result
    ///
    /// # Returns
    /// Random value in the range 1..=`range`
    fn random(&mut self, range: u16) -> u16;
}

impl fmt::Debug for dyn ZRng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}
