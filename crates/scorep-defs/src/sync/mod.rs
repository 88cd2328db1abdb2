pub mod rwlock;
pub mod spin_mutex;

pub use rwlock::RwLock;
pub use spin_mutex::SpinMutex;
