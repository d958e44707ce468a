pub mod convert;
pub mod coverage;
pub mod fill;
pub mod quiz;
pub mod stats;
