pub mod bank;
pub mod word;

pub use bank::WordBank;
pub use word::ReferenceWord;
