
use std::sync::{Mutex, MutexGuard, TryLockError};
use std::thread;
use std::time::{Duration, Instant};

use crate::GnssSimErr;

pub const DEFAULT_LOCK_TIMEOUT:Duration = Duration::from_secs(10);

const FIRST_BACKOFF:Duration = Duration::from_micros(50);
const MAX_BACKOFF:Duration = Duration::from_millis(5);

/// Acquire `mutex` within `timeout` or fail with `LockTimeout(name)`.
/// A poisoned lock is recovered, since every protected structure here stays consistent
/// between statements. While the lock is busy the caller sleeps with a doubling backoff,
/// never past the deadline.
pub fn lock_named<'a, T>(mutex:&'a Mutex<T>, name:&'static str, timeout:Duration) -> Result<MutexGuard<'a, T>, GnssSimErr> {
	let deadline = Instant::now() + timeout;
	let mut backoff = FIRST_BACKOFF;
	loop {
		match mutex.try_lock() {
			Ok(guard) => return Ok(guard),
			Err(TryLockError::Poisoned(p)) => return Ok(p.into_inner()),
			Err(TryLockError::WouldBlock) => {
				let now = Instant::now();
				if now >= deadline { return Err(GnssSimErr::LockTimeout(name)); }
				thread::sleep(backoff.min(deadline - now));
				backoff = (backoff * 2).min(MAX_BACKOFF);
			}
		}
	}
}
