pub mod generator;
pub mod lifecycle;
pub mod slots;
pub mod timecalc;
