mod balance;
mod client;
mod cycle;
mod money;
mod payment;

pub use balance::*;
pub use client::*;
pub use cycle::*;
pub use money::*;
pub use payment::*;
