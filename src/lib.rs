mod client;
mod environment;
mod event;
mod identity;
mod tracker;

pub use client::*;
pub use environment::*;
pub use event::*;
pub use identity::*;
pub use tracker::*;
