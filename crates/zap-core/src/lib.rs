mod contact;
mod health;
mod message;

pub use contact::*;
pub use health::*;
pub use message::*;
