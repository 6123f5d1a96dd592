// Core pet profile logic
pub mod fields;
pub mod pets;

pub use pets::{IndexPolicy, PetService};
