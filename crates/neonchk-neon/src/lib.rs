#![deny(missing_docs)]

//! # neonchk-neon — NEON Codec
//!
//! Decodes and encodes NEON, the indentation-based configuration format used
//! by `*.neon` files. The rest of the workspace treats this crate as a black
//! box with three entry points:
//!
//! - [`decode`] turns source text into a [`Value`] tree or a [`DecodeError`]
//!   whose message ends with `on line L, column C.`
//! - [`encode`] renders a [`Value`] back to inline NEON for display.
//! - [`parse_literal`] applies the unquoted-literal grammar (`yes` → `true`,
//!   `42` → integer, `2024-01-01` → date/time, ...) to a single token.
//!
//! ## Value Model
//!
//! [`Value`] is a tagged union with three structural cases (scalar, sequence,
//! mapping) and one opaque leaf case, [`Object`], for entities and date/time
//! values. Consumers match on the tag explicitly; nothing relies on runtime
//! type inspection.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `neonchk-*` crates.
//! - Decoding never panics; every malformed input is a [`DecodeError`].

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod lexer;
pub mod literal;
pub mod value;

pub use decoder::decode;
pub use encoder::encode;
pub use error::DecodeError;
pub use literal::parse_literal;
pub use value::{DateTime, Entity, Mapping, Object, Scalar, Value};
