pub mod brochure;
pub mod enums;
pub mod profile;
pub mod symptom;

pub use brochure::*;
pub use profile::*;
pub use symptom::*;
