//! MiMC block-permutation gadget, parametrized over elliptic-curve scalar
//! fields and expressed entirely against an abstract arithmetic backend, so
//! the permutation can be embedded in a zero-knowledge circuit.

#[macro_use]
extern crate lazy_static;

mod backend;
mod curve;
mod engine;
mod error;
pub mod gadget;
mod params;


pub use backend::ArithmeticBackend;
pub use curve::{resolve, CurveId, CurveSpec, NonlinearStep, ALL_CURVES};
pub use engine::{permute, MimcEngine};
pub use error::MimcError;
pub use params::{CurveParameterSet, RoundConstantSource};
