pub mod errors;
pub mod guess;
pub mod messages;
pub mod post;
pub mod user;

// Re-export all types
pub use errors::*;
pub use guess::*;
pub use messages::*;
pub use post::*;
pub use user::*;

pub type PostId = String;
pub type Username = String;
