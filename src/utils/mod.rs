pub mod errors;
pub mod tracking;
pub mod validation;
