pub mod bootstrap;
pub mod client;
