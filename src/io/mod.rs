pub mod dummy;
pub mod profiles;
pub mod status;
pub mod transport;
