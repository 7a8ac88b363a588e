use parking_lot::{const_mutex, Mutex, MutexGuard};

/// Serialises tests that read or write process environment variables.
static ENV_LOCK: Mutex<()> = const_mutex(());

pub fn env_lock() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock()
}
