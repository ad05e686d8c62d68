use crate::backend::ArithmeticBackend;
use crate::error::MimcError;
use crate::params::{CurveParameterSet, RoundConstantSource};
use num_bigint::BigUint;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Closed set of scalar fields the permutation is registered over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum CurveId {
    Bn254,
    Bls12_381,
    Bls12_377,
    Bw6_761,
    Bls24_315,
}

/// The nonlinear round step. Each curve is statically bound to one variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonlinearStep {
    /// x^5, emitted as two squarings and a final multiply.
    PowerMap,
    /// x^-1 in the scalar field. Behavior at zero is the backend's
    /// convention, see [`crate::ArithmeticBackend::inverse`].
    ModularInverse,
}

/// Registry entry: scalar-field order, round count and S-box of one curve.
pub struct CurveSpec {
    id: CurveId,
    modulus: BigUint,
    rounds: usize,
    sbox: NonlinearStep,
}

const MIMC_ROUNDS: usize = 91;

lazy_static! {
    static ref REGISTRY: HashMap<CurveId, CurveSpec> = {
        let entries = [
            (
                CurveId::Bn254,
                "30644e72e131a029b85045b68181585d2833e84879b9709143e1f593f0000001",
                NonlinearStep::PowerMap,
            ),
            (
                CurveId::Bls12_381,
                "73eda753299d7d483339d80809a1d80553bda402fffe5bfeffffffff00000001",
                NonlinearStep::PowerMap,
            ),
            (
                CurveId::Bls12_377,
                "12ab655e9a2ca55660b44d1e5c37b00159aa76fed00000010a11800000000001",
                NonlinearStep::ModularInverse,
            ),
            (
                CurveId::Bw6_761,
                "01ae3a4617c510eac63b05c06ca1493b1a22d9f300f5138f1ef3622fba094800170b5d44300000008508c00000000001",
                NonlinearStep::PowerMap,
            ),
            (
                CurveId::Bls24_315,
                "196deac24a9da12b25fc7ec9cf927a98c8c480ece644e36419d0c5fd00c00001",
                NonlinearStep::PowerMap,
            ),
        ];
        let mut m = HashMap::new();
        for (id, modulus, sbox) in entries {
            m.insert(
                id,
                CurveSpec {
                    id,
                    modulus: BigUint::parse_bytes(modulus.as_bytes(), 16).unwrap(),
                    rounds: MIMC_ROUNDS,
                    sbox,
                },
            );
        }
        m
    };
}

/// Looks up the registered [`CurveSpec`] of a curve.
pub fn resolve(curve: CurveId) -> Result<&'static CurveSpec, MimcError> {
    REGISTRY
        .get(&curve)
        .ok_or_else(|| MimcError::UnsupportedCurve(curve.to_string()))
}

impl CurveSpec {
    pub fn id(&self) -> CurveId {
        self.id
    }
    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }
    pub fn rounds(&self) -> usize {
        self.rounds
    }
    pub fn nonlinear_step(&self) -> NonlinearStep {
        self.sbox
    }
    /// Forwards to [`CurveParameterSet::build`] for this curve.
    pub fn construct<S: RoundConstantSource>(
        &self,
        seed: &str,
        source: &S,
    ) -> Result<CurveParameterSet, MimcError> {
        CurveParameterSet::build(self.id, seed, source)
    }
    /// Forwards to [`crate::permute`] with this curve's S-box.
    pub fn permute<B: ArithmeticBackend>(
        &self,
        backend: &mut B,
        params: &CurveParameterSet,
        message: B::Value,
        key: B::Value,
    ) -> Result<B::Value, MimcError> {
        crate::engine::permute(backend, self.sbox, params, message, key)
    }
}

impl fmt::Display for CurveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CurveId::Bn254 => "bn254",
            CurveId::Bls12_381 => "bls12-381",
            CurveId::Bls12_377 => "bls12-377",
            CurveId::Bw6_761 => "bw6-761",
            CurveId::Bls24_315 => "bls24-315",
        })
    }
}

impl FromStr for CurveId {
    type Err = MimcError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "bn254" => CurveId::Bn254,
            "bls12-381" => CurveId::Bls12_381,
            "bls12-377" => CurveId::Bls12_377,
            "bw6-761" => CurveId::Bw6_761,
            "bls24-315" => CurveId::Bls24_315,
            _ => return Err(MimcError::UnsupportedCurve(s.into())),
        })
    }
}

pub const ALL_CURVES: [CurveId; 5] = [
    CurveId::Bn254,
    CurveId::Bls12_381,
    CurveId::Bls12_377,
    CurveId::Bw6_761,
    CurveId::Bls24_315,
];
