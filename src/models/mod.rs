mod message;
mod resource;

pub use message::*;
pub use resource::*;
