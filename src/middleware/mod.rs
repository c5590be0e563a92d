pub mod extract;
pub mod layers;

pub use extract::{AppJson, AppPath, AppQuery};
