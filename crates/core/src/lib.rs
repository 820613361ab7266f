#![deny(unsafe_code)]
//! Core types for the flowtex line-integral-convolution renderer.
//!
//! Provides the `ScalarField` and `VectorField` grid types, the `Xorshift64`
//! PRNG used to seed noise textures, and the shared `LicError` type.

pub mod error;
pub mod prng;
pub mod scalar_field;
pub mod vector_field;

pub use error::LicError;
pub use prng::Xorshift64;
pub use scalar_field::ScalarField;
pub use vector_field::VectorField;
