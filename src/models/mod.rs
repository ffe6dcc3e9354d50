pub mod record;
pub mod input;

pub use record::*;
pub use input::*;
