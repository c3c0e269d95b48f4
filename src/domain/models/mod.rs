pub mod standing;
pub mod types;
