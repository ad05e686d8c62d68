//! R1CS realization of the arithmetic backend over a bellman
//! [`ConstraintSystem`]. Values are carried as linear combinations, so
//! additions and constants are free; each `mul` and `inverse` allocates one
//! witness variable and emits one constraint.

use crate::backend::ArithmeticBackend;
use bellman::gadgets::num::AllocatedNum;
use bellman::{ConstraintSystem, LinearCombination, SynthesisError};
use ff::{Field, PrimeField};
use num_bigint::BigUint;
use std::marker::PhantomData;

/// A circuit value: a linear combination over allocated variables together
/// with its assignment (absent during setup).
#[derive(Clone)]
pub struct Number<S: PrimeField> {
    lc: LinearCombination<S>,
    value: Option<S>,
}

impl<S: PrimeField> Number<S> {
    pub fn zero() -> Self {
        Self {
            lc: LinearCombination::zero(),
            value: Some(S::ZERO),
        }
    }

    pub fn lc(&self) -> &LinearCombination<S> {
        &self.lc
    }

    pub fn value(&self) -> Option<S> {
        self.value
    }
}

impl<S: PrimeField> From<AllocatedNum<S>> for Number<S> {
    fn from(num: AllocatedNum<S>) -> Self {
        Self {
            lc: LinearCombination::zero() + num.get_variable(),
            value: num.get_value(),
        }
    }
}

pub struct CircuitBackend<'a, S: PrimeField, CS: ConstraintSystem<S>> {
    cs: &'a mut CS,
    _scalar: PhantomData<S>,
}

impl<'a, S: PrimeField, CS: ConstraintSystem<S>> CircuitBackend<'a, S, CS> {
    pub fn new(cs: &'a mut CS) -> Self {
        Self {
            cs,
            _scalar: PhantomData,
        }
    }
}

// Constants arrive pre-reduced from the parameter set, so a failed decimal
// decode means the value does not fit the field at all.
fn field_element<S: PrimeField>(value: &BigUint) -> Result<S, SynthesisError> {
    S::from_str_vartime(&value.to_str_radix(10)).ok_or(SynthesisError::Unsatisfiable)
}

impl<'a, S: PrimeField, CS: ConstraintSystem<S>> ArithmeticBackend for CircuitBackend<'a, S, CS> {
    type Value = Number<S>;
    type Error = SynthesisError;

    fn constant(&mut self, value: &BigUint) -> Result<Number<S>, SynthesisError> {
        let c = field_element::<S>(value)?;
        Ok(Number {
            lc: LinearCombination::zero() + (c, CS::one()),
            value: Some(c),
        })
    }

    fn add(&mut self, terms: &[Number<S>]) -> Result<Number<S>, SynthesisError> {
        let mut out = Number::zero();
        for term in terms {
            out.lc = out.lc + &term.lc;
            out.value = out.value.zip(term.value).map(|(a, b)| a + b);
        }
        Ok(out)
    }

    fn mul(&mut self, a: &Number<S>, b: &Number<S>) -> Result<Number<S>, SynthesisError> {
        let out = AllocatedNum::alloc(&mut *self.cs, || {
            a.value
                .zip(b.value)
                .map(|(a, b)| a * b)
                .ok_or(SynthesisError::AssignmentMissing)
        })?;
        self.cs.enforce(
            || "mul",
            |_| a.lc.clone(),
            |_| b.lc.clone(),
            |lc| lc + out.get_variable(),
        );
        Ok(out.into())
    }

    /// Enforces `a * a^-1 = 1`. A zero input therefore has no satisfying
    /// witness: the non-zero precondition is circuit-enforced.
    fn inverse(&mut self, a: &Number<S>) -> Result<Number<S>, SynthesisError> {
        let inv = AllocatedNum::alloc(&mut *self.cs, || {
            let v = a.value.ok_or(SynthesisError::AssignmentMissing)?;
            Option::<S>::from(v.invert()).ok_or(SynthesisError::DivisionByZero)
        })?;
        self.cs.enforce(
            || "inverse",
            |_| a.lc.clone(),
            |lc| lc + inv.get_variable(),
            |lc| lc + CS::one(),
        );
        Ok(inv.into())
    }
}
