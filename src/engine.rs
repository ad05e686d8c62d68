use crate::backend::ArithmeticBackend;
use crate::curve::{resolve, CurveId, NonlinearStep};
use crate::error::MimcError;
use crate::params::{CurveParameterSet, RoundConstantSource};

/// A permutation engine bound to one curve's round constants and S-box.
/// Immutable after construction, so it can be shared across invocations.
pub struct MimcEngine {
    curve: CurveId,
    sbox: NonlinearStep,
    params: CurveParameterSet,
}

impl MimcEngine {
    pub fn new<S: RoundConstantSource>(
        curve: CurveId,
        seed: &str,
        source: &S,
    ) -> Result<Self, MimcError> {
        let spec = resolve(curve)?;
        let params = CurveParameterSet::build(curve, seed, source)?;
        Ok(Self {
            curve,
            sbox: spec.nonlinear_step(),
            params,
        })
    }

    pub fn from_params(params: CurveParameterSet) -> Result<Self, MimcError> {
        let spec = resolve(params.curve())?;
        Ok(Self {
            curve: params.curve(),
            sbox: spec.nonlinear_step(),
            params,
        })
    }

    pub fn curve(&self) -> CurveId {
        self.curve
    }

    pub fn params(&self) -> &CurveParameterSet {
        &self.params
    }

    pub fn permute<B: ArithmeticBackend>(
        &self,
        backend: &mut B,
        message: B::Value,
        key: B::Value,
    ) -> Result<B::Value, MimcError> {
        permute(backend, self.sbox, &self.params, message, key)
    }
}

fn backend_err<E: std::error::Error + Send + Sync + 'static>(e: E) -> MimcError {
    MimcError::Backend(Box::new(e))
}

/// Runs one MiMC round per constant and a final key addition. The operation
/// sequence depends only on the table length and the S-box kind, never on
/// message or key values, so the emitted circuit shape is fixed.
pub fn permute<B: ArithmeticBackend>(
    backend: &mut B,
    sbox: NonlinearStep,
    params: &CurveParameterSet,
    message: B::Value,
    key: B::Value,
) -> Result<B::Value, MimcError> {
    if params.round_constants().is_empty() {
        return Err(MimcError::UninitializedParameters(params.curve()));
    }
    log::debug!("permuting with {} rounds over {}", params.rounds(), params.curve());
    let mut acc = message;
    for c in params.round_constants() {
        let c = backend.constant(c).map_err(backend_err)?;
        let t = backend.add(&[acc, key.clone(), c]).map_err(backend_err)?;
        acc = match sbox {
            NonlinearStep::PowerMap => {
                // acc = (acc+key+c)^5
                let t2 = backend.mul(&t, &t).map_err(backend_err)?;
                let t4 = backend.mul(&t2, &t2).map_err(backend_err)?;
                backend.mul(&t4, &t).map_err(backend_err)?
            }
            // acc = (acc+key+c)^-1
            NonlinearStep::ModularInverse => backend.inverse(&t).map_err(backend_err)?,
        };
    }
    backend.add(&[acc, key]).map_err(backend_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{FieldBackend, Op, RecordingBackend, SeedSource};
    use num_bigint::BigUint;

    // Straight-line big-integer evaluation of the same schedule, kept
    // independent of the backend plumbing (modpow instead of chained muls).
    fn reference_permute(
        params: &CurveParameterSet,
        message: &BigUint,
        key: &BigUint,
    ) -> BigUint {
        let spec = resolve(params.curve()).unwrap();
        let modulus = spec.modulus();
        let zero = BigUint::from(0u32);
        let mut acc = message.clone();
        for c in params.round_constants() {
            let t = (&acc + key + c) % modulus;
            acc = match spec.nonlinear_step() {
                NonlinearStep::PowerMap => t.modpow(&BigUint::from(5u32), modulus),
                NonlinearStep::ModularInverse => {
                    if t == zero {
                        zero.clone()
                    } else {
                        t.modpow(&(modulus - 2u32), modulus)
                    }
                }
            };
        }
        (acc + key) % modulus
    }

    #[test]
    fn test_matches_reference_evaluation_bn254() {
        let _ = env_logger::builder().is_test(true).try_init();
        let engine = MimcEngine::new(CurveId::Bn254, "mimc seed", &SeedSource).unwrap();
        let mut backend = FieldBackend::for_curve(CurveId::Bn254);
        let out = engine
            .permute(&mut backend, BigUint::from(1u32), BigUint::from(0u32))
            .unwrap();
        let expected =
            reference_permute(engine.params(), &BigUint::from(1u32), &BigUint::from(0u32));
        assert_eq!(out, expected);
    }

    #[test]
    fn test_matches_reference_evaluation_inverse_curve() {
        let engine = MimcEngine::new(CurveId::Bls12_377, "mimc seed", &SeedSource).unwrap();
        let mut backend = FieldBackend::for_curve(CurveId::Bls12_377);
        let message = BigUint::from(123456789u64);
        let key = BigUint::from(987654321u64);
        let out = engine
            .permute(&mut backend, message.clone(), key.clone())
            .unwrap();
        assert_eq!(out, reference_permute(engine.params(), &message, &key));
    }

    #[test]
    fn test_same_inputs_same_output() {
        let engine = MimcEngine::new(CurveId::Bls12_381, "mimc seed", &SeedSource).unwrap();
        let mut backend = FieldBackend::for_curve(CurveId::Bls12_381);
        let a = engine
            .permute(&mut backend, BigUint::from(42u32), BigUint::from(7u32))
            .unwrap();
        let b = engine
            .permute(&mut backend, BigUint::from(42u32), BigUint::from(7u32))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_operation_sequence_is_witness_independent() {
        let engine = MimcEngine::new(CurveId::Bn254, "mimc seed", &SeedSource).unwrap();
        let mut first = RecordingBackend::for_curve(CurveId::Bn254);
        engine
            .permute(&mut first, BigUint::from(0u32), BigUint::from(0u32))
            .unwrap();
        let mut second = RecordingBackend::for_curve(CurveId::Bn254);
        engine
            .permute(
                &mut second,
                BigUint::from(31337u32),
                BigUint::from(65537u32),
            )
            .unwrap();
        assert_eq!(first.ops, second.ops);
    }

    #[test]
    fn test_power_map_emits_three_muls_per_round() {
        let engine = MimcEngine::new(CurveId::Bn254, "mimc seed", &SeedSource).unwrap();
        let rounds = engine.params().rounds();
        let mut backend = RecordingBackend::for_curve(CurveId::Bn254);
        engine
            .permute(&mut backend, BigUint::from(1u32), BigUint::from(2u32))
            .unwrap();
        assert_eq!(backend.count(Op::Mul), 3 * rounds);
        assert_eq!(backend.count(Op::Inverse), 0);
        // one key/constant addition per round plus the final key absorption
        assert_eq!(backend.count(Op::Add), rounds + 1);
    }

    #[test]
    fn test_inverse_sbox_emits_one_inverse_per_round() {
        let engine = MimcEngine::new(CurveId::Bls12_377, "mimc seed", &SeedSource).unwrap();
        let rounds = engine.params().rounds();
        let mut backend = RecordingBackend::for_curve(CurveId::Bls12_377);
        engine
            .permute(&mut backend, BigUint::from(1u32), BigUint::from(2u32))
            .unwrap();
        assert_eq!(backend.count(Op::Inverse), rounds);
        assert_eq!(backend.count(Op::Mul), 0);
    }

    #[test]
    fn test_single_round_key_absorption() {
        // one power-map round with constant zero: ((m+k)^5) + k
        let params =
            CurveParameterSet::from_constants(CurveId::Bn254, vec![BigUint::from(0u32)]).unwrap();
        let engine = MimcEngine::from_params(params).unwrap();
        let mut backend = FieldBackend::for_curve(CurveId::Bn254);
        let out = engine
            .permute(&mut backend, BigUint::from(3u32), BigUint::from(5u32))
            .unwrap();
        // (3+5)^5 + 5 = 32773, far below the modulus
        assert_eq!(out, BigUint::from(32773u32));
    }

    #[test]
    fn test_single_round_inverse_sbox() {
        let params =
            CurveParameterSet::from_constants(CurveId::Bls12_377, vec![BigUint::from(0u32)])
                .unwrap();
        let engine = MimcEngine::from_params(params).unwrap();
        let modulus = resolve(CurveId::Bls12_377).unwrap().modulus().clone();
        let mut backend = FieldBackend::for_curve(CurveId::Bls12_377);
        let out = engine
            .permute(&mut backend, BigUint::from(2u32), BigUint::from(1u32))
            .unwrap();
        let expected =
            (BigUint::from(3u32).modpow(&(&modulus - 2u32), &modulus) + 1u32) % &modulus;
        assert_eq!(out, expected);
    }

    #[test]
    fn test_dispatch_permute_matches_engine() {
        let engine = MimcEngine::new(CurveId::Bls24_315, "mimc seed", &SeedSource).unwrap();
        let spec = resolve(CurveId::Bls24_315).unwrap();
        let mut a = FieldBackend::for_curve(CurveId::Bls24_315);
        let mut b = FieldBackend::for_curve(CurveId::Bls24_315);
        let x = engine
            .permute(&mut a, BigUint::from(9u32), BigUint::from(4u32))
            .unwrap();
        let y = spec
            .permute(&mut b, engine.params(), BigUint::from(9u32), BigUint::from(4u32))
            .unwrap();
        assert_eq!(x, y);
    }

    #[test]
    fn test_empty_table_is_uninitialized() {
        let params = CurveParameterSet::from_constants(CurveId::Bn254, vec![]).unwrap();
        let engine = MimcEngine::from_params(params).unwrap();
        let mut backend = FieldBackend::for_curve(CurveId::Bn254);
        let err = engine
            .permute(&mut backend, BigUint::from(1u32), BigUint::from(2u32))
            .unwrap_err();
        assert!(matches!(err, MimcError::UninitializedParameters(_)));
    }
}
