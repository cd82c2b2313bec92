pub mod de;
pub mod message;
pub mod profile;
pub mod thread;

pub use message::{Message, MessageList};
pub use profile::Profile;
pub use thread::Thread;
