
use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::sync::{Condvar, Mutex};
use std::time::Duration;

use crate::Result;
use crate::utils::sync::lock_named;

const WAIT_WARNING_INTERVAL:Duration = Duration::from_secs(5);

#[derive(Debug)]
enum Slot<V> {
	Pending,
	Ready(V),
}

#[derive(Debug)]
struct Shelves<K, V> {
	entries: HashMap<K, Slot<V>>,
	order: VecDeque<K>,
	generation_count: usize,
}

// Removes an uncommitted `Pending` claim when the generating call unwinds or bails out early
struct Claim<'a, K:Eq + Hash + Clone, V:Clone> {
	library:&'a Library<K, V>,
	key:Option<K>,
}

impl<'a, K:Eq + Hash + Clone, V:Clone> Claim<'a, K, V> {

	fn commit(mut self) { self.key = None; }

}

impl<'a, K:Eq + Hash + Clone, V:Clone> Drop for Claim<'a, K, V> {

	fn drop(&mut self) {
		if let Some(key) = self.key.take() {
			let mut shelves = match self.library.shelves.lock() {
				Ok(guard) => guard,
				Err(poisoned) => poisoned.into_inner(),
			};
			if let Some(Slot::Pending) = shelves.entries.get(&key) {
				log::warn!("{}: releasing an unfinished claim", self.library.name);
				shelves.entries.remove(&key);
			}
			drop(shelves);
			self.library.published.notify_all();
		}
	}

}

/// First-writer-wins cache. The first caller for a key generates the value outside the
/// lock; concurrent callers for the same key wait for it instead of generating again.
#[derive(Debug)]
pub struct Library<K, V> {
	name:&'static str,
	capacity:usize,
	lock_timeout:Duration,
	shelves:Mutex<Shelves<K, V>>,
	published:Condvar,
}

impl<K:Eq + Hash + Clone, V:Clone> Library<K, V> {

	pub fn new(name:&'static str, capacity:usize, lock_timeout:Duration) -> Self {
		Self {
			name,
			capacity: capacity.max(1),
			lock_timeout,
			shelves: Mutex::new(Shelves{ entries: HashMap::new(), order: VecDeque::new(), generation_count: 0 }),
			published: Condvar::new(),
		}
	}

	/// Number of times a generator has been started.
	pub fn generation_count(&self) -> Result<usize> {
		Ok(lock_named(&self.shelves, self.name, self.lock_timeout)?.generation_count)
	}

	pub fn get(&self, key:&K) -> Result<Option<V>> {
		let shelves = lock_named(&self.shelves, self.name, self.lock_timeout)?;
		Ok(match shelves.entries.get(key) {
			Some(Slot::Ready(v)) => Some(v.clone()),
			_ => None,
		})
	}

	pub fn get_or_create<F>(&self, key:K, generate:F) -> Result<V>
		where F: FnOnce() -> Result<V>
	{
		{
			let mut shelves = lock_named(&self.shelves, self.name, self.lock_timeout)?;
			loop {
				match shelves.entries.get(&key) {
					Some(Slot::Ready(v)) => return Ok(v.clone()),
					Some(Slot::Pending) => {
						let (guard, wait) = match self.published.wait_timeout(shelves, WAIT_WARNING_INTERVAL) {
							Ok(r) => r,
							Err(poisoned) => poisoned.into_inner(),
						};
						shelves = guard;
						if wait.timed_out() { log::warn!("{}: still waiting on another generator", self.name); }
					},
					None => {
						shelves.entries.insert(key.clone(), Slot::Pending);
						shelves.generation_count += 1;
						break;
					},
				}
			}
		}

		let claim = Claim{ library: self, key: Some(key.clone()) };
		let result = generate();

		match &result {
			Ok(value) => {
				let mut shelves = lock_named(&self.shelves, self.name, self.lock_timeout)?;
				shelves.entries.insert(key.clone(), Slot::Ready(value.clone()));
				shelves.order.push_back(key);
				while shelves.order.len() > self.capacity {
					if let Some(oldest) = shelves.order.pop_front() { shelves.entries.remove(&oldest); }
				}
				drop(shelves);
				claim.commit();
				self.published.notify_all();
			},
			Err(e) => {
				// Dropping the claim lets a later caller try again
				log::error!("{}: generation failed: {}", self.name, e);
			},
		}
		result
	}

}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::Arc;
	use std::sync::atomic::{AtomicUsize, Ordering};
	use std::thread;
	use crate::GnssSimErr;

	#[test]
	fn concurrent_requests_generate_once() {
		let lib:Arc<Library<u32, Arc<Vec<u8>>>> = Arc::new(Library::new("test", 4, Duration::from_secs(1)));
		let calls = Arc::new(AtomicUsize::new(0));

		let handles:Vec<_> = (0..4).map(|_| {
			let lib = lib.clone();
			let calls = calls.clone();
			thread::spawn(move || lib.get_or_create(7, || {
				calls.fetch_add(1, Ordering::SeqCst);
				thread::sleep(Duration::from_millis(30));
				Ok(Arc::new(vec![1, 0, 1]))
			}).unwrap())
		}).collect();

		let results:Vec<Arc<Vec<u8>>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
		assert_eq!(calls.load(Ordering::SeqCst), 1);
		assert_eq!(lib.generation_count().unwrap(), 1);
		assert!(results.iter().all(|r| **r == vec![1, 0, 1]));
	}

	#[test]
	fn failure_releases_the_claim() {
		let lib:Library<u32, u32> = Library::new("test", 4, Duration::from_secs(1));
		assert!(lib.get_or_create(1, || Err(GnssSimErr::Generation("boom".to_string()))).is_err());
		assert_eq!(lib.get(&1).unwrap(), None);
		assert_eq!(lib.get_or_create(1, || Ok(5)).unwrap(), 5);
		assert_eq!(lib.generation_count().unwrap(), 2);
	}

	#[test]
	fn panicking_generator_releases_the_claim() {
		let lib:Arc<Library<u32, u32>> = Arc::new(Library::new("test", 4, Duration::from_secs(1)));
		let crashed = {
			let lib = lib.clone();
			thread::spawn(move || lib.get_or_create(3, || -> Result<u32> { panic!("generator crashed") }))
		};
		assert!(crashed.join().is_err());

		let retry = {
			let lib = lib.clone();
			thread::spawn(move || lib.get_or_create(3, || Ok(30)).unwrap())
		};
		assert_eq!(retry.join().unwrap(), 30);
		assert_eq!(lib.generation_count().unwrap(), 2);
	}

	#[test]
	fn oldest_entries_are_evicted() {
		let lib:Library<u32, u32> = Library::new("test", 2, Duration::from_secs(1));
		for k in 0..3 { lib.get_or_create(k, || Ok(k * 10)).unwrap(); }
		assert_eq!(lib.get(&0).unwrap(), None);
		assert_eq!(lib.get(&2).unwrap(), Some(20));
	}
}
