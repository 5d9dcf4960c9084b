//! Reflector (Umkehrwalze): a fixed-point-free involution.

use super::{Permutation, ReflectorModel, Wiring};
use crate::error::{EnigmaError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reflector {
    /// `None` for a field-rewired reflector (UKW-D style).
    model: Option<ReflectorModel>,
    wiring: Permutation,
}

impl Reflector {
    pub fn new(model: ReflectorModel) -> Result<Self> {
        let wiring = Permutation::from_letters(model.wiring())?;
        Self::checked(Some(model), wiring)
    }

    /// Custom wiring; must pair every letter with a different letter.
    pub fn custom(wiring: Permutation) -> Result<Self> {
        Self::checked(None, wiring)
    }

    fn checked(model: Option<ReflectorModel>, wiring: Permutation) -> Result<Self> {
        if !wiring.is_involution() {
            return Err(EnigmaError::permutation(format!(
                "reflector wiring {} is not an involution",
                wiring.as_letters()
            )));
        }
        if let Some(fixed) = wiring.fixed_points().next() {
            return Err(EnigmaError::permutation(format!(
                "reflector maps {} to itself",
                (b'A' + fixed) as char
            )));
        }
        Ok(Self { model, wiring })
    }

    pub fn model(&self) -> Option<ReflectorModel> {
        self.model
    }

    pub fn name(&self) -> &'static str {
        self.model.map_or("custom", ReflectorModel::name)
    }

    pub fn wiring(&self) -> &Permutation {
        &self.wiring
    }
}

impl Wiring for Reflector {
    #[inline]
    fn forward(&self, index: u8) -> u8 {
        self.wiring.forward(index)
    }
    #[inline]
    fn backward(&self, index: u8) -> u8 {
        self.wiring.forward(index)
    }
}
