use std::cell::Cell;

use lazy_static::lazy_static;
use parking_lot::ReentrantMutex;

lazy_static! {
    /// Opens the library once per process; must not touch `LOCK`.
    pub(crate) static ref LIBRARY_INIT: () = unsafe {
        // handles may outlive the atexit hooks on other threads
        hdf5_sys::h5::H5dont_atexit();
        hdf5_sys::h5::H5open();
        crate::error::silence_errors_no_sync(true);
    };

    static ref LOCK: ReentrantMutex<()> = {
        lazy_static::initialize(&LIBRARY_INIT);
        ReentrantMutex::new(())
    };
}

thread_local! {
    // automatic error printing is per-thread in threadsafe builds
    static SILENCED: Cell<bool> = Cell::new(false);
}

/// Runs `func` while holding the global reentrant lock.
///
/// Every call into the C library made by this crate goes through here, so that a
/// non-threadsafe build of the library is never entered from two threads at once.
pub fn sync<T, F>(func: F) -> T
where
    F: FnOnce() -> T,
{
    let _guard = LOCK.lock();
    if !SILENCED.with(|silenced| silenced.replace(true)) {
        unsafe { crate::error::silence_errors_no_sync(true) };
    }
    func()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use lazy_static::lazy_static;
    use parking_lot::ReentrantMutex;

    #[test]
    pub fn test_reentrant_mutex() {
        lazy_static! {
            static ref LOCK: ReentrantMutex<()> = ReentrantMutex::new(());
        }
        let g1 = LOCK.try_lock();
        assert!(g1.is_some());
        let g2 = LOCK.lock();
        assert_eq!(*g2, ());
        let g3 = LOCK.try_lock();
        assert!(g3.is_some());
    }

    #[test]
    pub fn test_nested_sync() {
        let value = super::sync(|| super::sync(|| super::sync(|| 42)));
        assert_eq!(value, 42);
    }

    #[test]
    pub fn test_sync_from_threads() {
        let counter = Arc::new(parking_lot::Mutex::new(0_usize));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let counter = Arc::clone(&counter);
                thread::spawn(move || {
                    for _ in 0..100 {
                        super::sync(|| *counter.lock() += 1);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(*counter.lock(), 800);
    }

    #[test]
    pub fn test_lock_on_first_constant_access() {
        let _ = h5call!(*crate::globals::H5P_CLS_ROOT);
    }
}
