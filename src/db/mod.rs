pub mod categories;
pub mod connection;
pub mod deliveries;
pub mod settings;

