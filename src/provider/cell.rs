//! Write-once cell with single-flight asynchronous initialization.

// self
use crate::_prelude::*;

/// Publishes a value exactly once while letting failed initializations be retried.
///
/// Readers take a short `RwLock` read of an `Option<Arc<T>>`; they never wait on an in-flight
/// initialization. Initializers serialize on an async guard and re-check the slot after
/// acquiring it, so concurrent callers share one attempt instead of each starting their own.
/// Once published the value is never replaced.
pub struct AcquisitionCell<T> {
	slot: RwLock<Option<Arc<T>>>,
	guard: AsyncMutex<()>,
}
impl<T> AcquisitionCell<T> {
	/// Creates an empty cell.
	pub fn new() -> Self {
		Self { slot: RwLock::new(None), guard: AsyncMutex::new(()) }
	}

	/// Returns the published value, if any.
	pub fn get(&self) -> Option<Arc<T>> {
		self.slot.read().clone()
	}

	/// Returns the published value or runs `init` under the guard to produce it.
	///
	/// An `Err` from `init` leaves the cell empty and is returned to this caller only; callers
	/// queued behind it run their own attempt.
	pub async fn get_or_try_init<F, Fut, E>(&self, init: F) -> Result<Arc<T>, E>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<T, E>>,
	{
		if let Some(value) = self.get() {
			return Ok(value);
		}

		let _acquisition = self.guard.lock().await;

		if let Some(value) = self.get() {
			return Ok(value);
		}

		let value = Arc::new(init().await?);
		let mut slot = self.slot.write();

		Ok(slot.get_or_insert(value).clone())
	}
}
impl<T> Default for AcquisitionCell<T> {
	fn default() -> Self {
		Self::new()
	}
}
impl<T> Debug for AcquisitionCell<T> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AcquisitionCell").field("populated", &self.slot.read().is_some()).finish()
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::atomic::{AtomicUsize, Ordering};
	// self
	use super::*;

	#[tokio::test]
	async fn failed_init_leaves_cell_empty() {
		let cell = AcquisitionCell::<u32>::new();
		let err = cell
			.get_or_try_init(|| async { Err::<u32, _>("idp down") })
			.await
			.expect_err("Initializer error should surface.");

		assert_eq!(err, "idp down");
		assert!(cell.get().is_none());

		let value = cell
			.get_or_try_init(|| async { Ok::<_, &str>(7) })
			.await
			.expect("Retry should populate the cell.");

		assert_eq!(*value, 7);
		assert_eq!(cell.get().as_deref(), Some(&7));
	}

	#[tokio::test]
	async fn published_value_is_never_replaced() {
		let cell = AcquisitionCell::<&str>::new();
		let calls = AtomicUsize::new(0);
		let counter = &calls;

		for candidate in ["first", "second"] {
			let value = cell
				.get_or_try_init(move || async move {
					counter.fetch_add(1, Ordering::SeqCst);

					Ok::<_, ()>(candidate)
				})
				.await
				.expect("Initialization should succeed.");

			assert_eq!(*value, "first");
		}

		assert_eq!(calls.load(Ordering::SeqCst), 1);
	}

	#[tokio::test]
	async fn concurrent_callers_share_one_attempt() {
		let cell = AcquisitionCell::<usize>::new();
		let calls = AtomicUsize::new(0);
		let counter = &calls;
		let init = move || async move {
			let n = counter.fetch_add(1, Ordering::SeqCst);

			tokio::time::sleep(std::time::Duration::from_millis(20)).await;

			Ok::<_, ()>(n)
		};
		let (a, b, c) = tokio::join!(
			cell.get_or_try_init(init),
			cell.get_or_try_init(init),
			cell.get_or_try_init(init),
		);

		assert_eq!(calls.load(Ordering::SeqCst), 1);
		assert_eq!(a, b);
		assert_eq!(b, c);
	}
}
