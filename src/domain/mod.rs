pub mod currency;
pub mod fields;
pub mod order;
pub mod settings;

