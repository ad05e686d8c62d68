use crate::curve::{resolve, CurveId};
use crate::error::MimcError;
use num_bigint::BigUint;

/// External deterministic derivation of round constants. Implementations
/// must return the same sequence for the same `(curve, seed)` pair, since
/// prover and verifier setups derive independently.
pub trait RoundConstantSource {
    fn derive(&self, curve: CurveId, seed: &str) -> Result<Vec<BigUint>, MimcError>;
}

/// Immutable per-curve table of round constants, each reduced into canonical
/// form modulo the curve's scalar-field order.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CurveParameterSet {
    curve: CurveId,
    round_constants: Vec<BigUint>,
}

impl CurveParameterSet {
    /// Derives the table for `curve` from `seed` through `source`. Emits no
    /// circuit operations.
    pub fn build<S: RoundConstantSource>(
        curve: CurveId,
        seed: &str,
        source: &S,
    ) -> Result<Self, MimcError> {
        let spec = resolve(curve)?;
        let constants = source.derive(curve, seed)?;
        log::debug!("derived {} round constants for {}", constants.len(), curve);
        Ok(Self::reduced(curve, constants, spec.modulus()))
    }

    /// Wraps an externally-derived table directly.
    pub fn from_constants(curve: CurveId, constants: Vec<BigUint>) -> Result<Self, MimcError> {
        let spec = resolve(curve)?;
        Ok(Self::reduced(curve, constants, spec.modulus()))
    }

    fn reduced(curve: CurveId, constants: Vec<BigUint>, modulus: &BigUint) -> Self {
        Self {
            curve,
            round_constants: constants.into_iter().map(|c| c % modulus).collect(),
        }
    }

    pub fn curve(&self) -> CurveId {
        self.curve
    }

    pub fn round_constants(&self) -> &[BigUint] {
        &self.round_constants
    }

    pub fn rounds(&self) -> usize {
        self.round_constants.len()
    }
}
