//! Aggregation of several promises into one.

use std::mem;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{Error, MonadError};

use super::{Completion, Outcome, Promise};

struct Gathered<T> {
    values: Vec<Option<T>>,
    remaining: usize,
}

impl<T> Promise<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Resolves with every value, in input order, once all constituents resolve.
    ///
    /// The first constituent observed to fail (or to be cancelled) fails the
    /// aggregate. The remaining constituents keep running; their results are
    /// discarded.
    ///
    /// ```rust
    /// use monadic::effect::Promise;
    ///
    /// let all = Promise::of_all(vec![
    ///     Promise::spawn(|| Ok::<_, std::io::Error>(1)),
    ///     Promise::of(2),
    ///     Promise::spawn(|| Ok::<_, std::io::Error>(3)),
    /// ]);
    /// assert_eq!(all.or_fail().ok(), Some(vec![1, 2, 3]));
    /// ```
    pub fn of_all<I>(promises: I) -> Promise<Vec<T>>
    where
        I: IntoIterator<Item = Self>,
    {
        let promises: Vec<Self> = promises.into_iter().collect();
        if promises.is_empty() {
            return Promise::of(Vec::new());
        }

        let completion = Arc::new(Completion::new());
        let gathered = Arc::new(Mutex::new(Gathered {
            values: vec![None; promises.len()],
            remaining: promises.len(),
        }));

        for (index, promise) in promises.iter().enumerate() {
            let sink = Arc::clone(&completion);
            let gathered = Arc::clone(&gathered);
            promise.observe(Box::new(move |outcome: &Outcome<T>| match outcome {
                Outcome::Resolved(value) => {
                    let mut gathered = gathered.lock();
                    if let Some(slot) = gathered.values.get_mut(index) {
                        *slot = Some(value.clone());
                    }
                    gathered.remaining -= 1;
                    if gathered.remaining == 0 {
                        let values =
                            mem::take(&mut gathered.values).into_iter().flatten().collect();
                        drop(gathered);
                        sink.settle(Outcome::Resolved(values));
                    }
                }
                Outcome::Failed(error) => {
                    sink.settle(Outcome::Failed(error.clone()));
                }
                Outcome::Cancelled => {
                    sink.settle(Outcome::Failed(Error::cancelled()));
                }
            }));
        }
        Promise::pending(completion)
    }

    /// Settles like whichever constituent settles first.
    ///
    /// The winner's outcome is forwarded unchanged, cancellation included.
    ///
    /// # Errors
    ///
    /// Returns [`MonadError::NoPromises`] when `promises` is empty.
    ///
    /// ```rust
    /// use monadic::effect::Promise;
    /// use std::time::Duration;
    ///
    /// let slow = Promise::spawn(|| {
    ///     std::thread::sleep(Duration::from_millis(200));
    ///     Ok::<_, std::io::Error>("slow")
    /// });
    /// let first = Promise::of_any(vec![slow, Promise::of("fast")]).unwrap();
    /// assert_eq!(first.or_fail().ok(), Some("fast"));
    ///
    /// assert!(Promise::<i32>::of_any(Vec::new()).is_err());
    /// ```
    pub fn of_any<I>(promises: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = Self>,
    {
        let promises: Vec<Self> = promises.into_iter().collect();
        if promises.is_empty() {
            return Err(Error::from(MonadError::NoPromises));
        }

        let completion = Arc::new(Completion::new());
        for promise in &promises {
            let sink = Arc::clone(&completion);
            promise.observe(Box::new(move |outcome: &Outcome<T>| {
                sink.settle(outcome.clone());
            }));
        }
        Ok(Self::pending(completion))
    }
}
