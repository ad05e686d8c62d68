use num_bigint::BigUint;

/// Constraint-emitting arithmetic interface the permutation is evaluated
/// against. Values are opaque handles; the engine only ever feeds them back
/// into further operations, never inspects them as integers.
pub trait ArithmeticBackend {
    type Value: Clone;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Lifts a canonical field constant into the backend.
    fn constant(&mut self, value: &BigUint) -> Result<Self::Value, Self::Error>;

    /// Sum of all terms.
    fn add(&mut self, terms: &[Self::Value]) -> Result<Self::Value, Self::Error>;

    fn mul(&mut self, a: &Self::Value, b: &Self::Value) -> Result<Self::Value, Self::Error>;

    /// Multiplicative inverse. The convention at zero input (map to zero, or
    /// reject the witness) is the backend's to define and document.
    fn inverse(&mut self, a: &Self::Value) -> Result<Self::Value, Self::Error>;
}
