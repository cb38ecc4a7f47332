pub mod error;
pub mod function;
pub mod literal;
pub mod scalar;
pub mod ultra;

pub use error::{CalcError, CalcResult};
pub use function::Elementary;
pub use literal::{format_real, parse_real};
pub use scalar::{Kind, Scalar, DEFAULT_TOLERANCE};
pub use ultra::{Component, Dim, Ultra, MAX_ROOT_DEGREE};
