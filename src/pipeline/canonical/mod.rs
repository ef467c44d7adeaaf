//! Canonicalizer: reduces any `RawPayload` to one `CanonicalDocument`.
//!
//! Tabular payloads keep their rows (labels cleaned, values coerced) and gain a
//! single-row digest. Everything else collapses to one capped text string.

pub mod types;
pub mod normalize;
pub mod profile;

pub use types::*;
pub use normalize::*;
pub use profile::*;
