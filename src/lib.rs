pub mod anki;
pub mod core;
pub mod export;
pub mod wizard;
