//! Interface synthesis

pub mod interface;

pub use interface::InterfaceSynthesizer;
