pub mod connection;
pub mod step;

pub use connection::*;
pub use step::*;
