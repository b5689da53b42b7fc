//! Backend implementations for model hosts.

pub mod replicate;
