//! Durable session storage and the session store

mod file;
mod in_memory;
mod store;

pub use file::FileSessionStorage;
pub use in_memory::InMemorySessionStorage;
pub use store::SessionStore;
