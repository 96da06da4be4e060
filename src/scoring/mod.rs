pub mod breakdown;
pub mod result;
pub mod scorer;
pub mod similarity;
