pub mod category;
pub mod ports;
pub mod user;
