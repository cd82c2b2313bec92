pub mod contacts;
pub mod thread_store;

pub use contacts::{Contact, ContactCache};
pub use thread_store::{build_threads, ThreadStore};
