//! Product sources: the remote REST collection, the offline substitute and an
//! in-process store

pub mod fallback;
pub mod in_memory;
pub mod remote;

pub use fallback::FallbackGenerator;
pub use in_memory::InMemoryProductStore;
pub use remote::RemoteProductSource;
