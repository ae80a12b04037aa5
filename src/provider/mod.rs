pub mod lazy;
pub mod listeners;

pub use lazy::{DEFAULT_PAGE_SIZE, LazyFilteredProvider, ProviderConfig, ScanStats};
pub use listeners::{ListenerRegistry, Subscription};
