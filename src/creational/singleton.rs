// Singleton with double-checked lazy initialization
// `LazySingleton` is a reusable one-time slot; `Singleton` is the process-wide
// value holder built on top of it.

use std::convert::Infallible;
use std::sync::{Mutex, OnceLock, PoisonError};
use std::thread;
use std::time::Duration;

use crossbeam::channel;
use log::{debug, trace};

use crate::error::{PatternError, Result};

// ============================================================================
// Lazy one-time slot
// ============================================================================

/// A slot that is filled at most once, on first access, from any thread.
///
/// The fast path is a lock-free `OnceLock::get`. Construction runs under a
/// mutex and re-checks the slot before building, so exactly one constructor
/// ever succeeds and readers only see fully-built values.
///
/// A failed or panicking constructor leaves the slot empty; the next caller
/// tries again.
pub struct LazySingleton<T> {
    cell: OnceLock<T>,
    init_lock: Mutex<()>,
}

impl<T> Default for LazySingleton<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LazySingleton<T> {
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
            init_lock: Mutex::new(()),
        }
    }

    /// Returns the stored value, constructing it from `init_value` if the slot
    /// is still empty. Once filled, later arguments are dropped unused.
    pub fn instance(&self, init_value: T) -> &T {
        if let Some(value) = self.cell.get() {
            trace!("singleton already initialized, discarding argument");
            return value;
        }
        match self.init_locked(move || Ok::<T, Infallible>(init_value)) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    pub fn get_or_init<F>(&self, init: F) -> &T
    where
        F: FnOnce() -> T,
    {
        match self.get_or_try_init(|| Ok::<T, Infallible>(init())) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Fallible construction. An `Err` is returned to this caller only; the
    /// slot stays empty so a later call can retry.
    pub fn get_or_try_init<F, E>(&self, init: F) -> std::result::Result<&T, E>
    where
        F: FnOnce() -> std::result::Result<T, E>,
    {
        if let Some(value) = self.cell.get() {
            return Ok(value);
        }
        self.init_locked(init)
    }

    // Slow path: serialize constructors and re-check under the lock.
    fn init_locked<F, E>(&self, init: F) -> std::result::Result<&T, E>
    where
        F: FnOnce() -> std::result::Result<T, E>,
    {
        // A constructor that panicked poisons the guard but never filled the
        // slot, so the unit payload is safe to reuse.
        let _guard = self
            .init_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(value) = self.cell.get() {
            return Ok(value);
        }

        let value = init()?;
        debug!("singleton constructed");
        Ok(self.cell.get_or_init(|| value))
    }

    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

// ============================================================================
// Process-wide value holder
// ============================================================================

/// The one `Singleton` of this process. There is no public constructor and no
/// `Clone`; the only way in is [`Singleton::instance`].
///
/// Copying the instance out is rejected at compile time:
///
/// ```compile_fail
/// use design_patterns::creational::singleton::Singleton;
///
/// let copy: Singleton = *Singleton::instance("FOO");
/// ```
///
/// ```compile_fail
/// use design_patterns::creational::singleton::Singleton;
///
/// let copy: Singleton = Singleton::instance("FOO").clone();
/// ```
#[derive(Debug)]
pub struct Singleton {
    value: String,
}

static INSTANCE: LazySingleton<Singleton> = LazySingleton::new();

impl Singleton {
    fn new(value: String) -> Self {
        Self { value }
    }

    /// The first caller's `value` wins; every later argument is ignored.
    ///
    /// ```
    /// use design_patterns::creational::singleton::Singleton;
    ///
    /// let first = Singleton::instance("FOO");
    /// let second = Singleton::instance("BAR");
    /// assert!(std::ptr::eq(first, second));
    /// assert_eq!(second.value(), first.value());
    /// ```
    pub fn instance(value: impl Into<String>) -> &'static Singleton {
        Self::instance_in(&INSTANCE, value.into())
    }

    /// Like [`Singleton::instance`], but the value comes from a fallible
    /// constructor that only runs while the instance does not exist yet.
    pub fn try_instance<F, E>(init: F) -> std::result::Result<&'static Singleton, E>
    where
        F: FnOnce() -> std::result::Result<String, E>,
    {
        INSTANCE.get_or_try_init(|| init().map(Singleton::new))
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    fn instance_in(slot: &LazySingleton<Singleton>, value: String) -> &Singleton {
        slot.instance(Singleton::new(value))
    }
}

// ============================================================================
// Example: two threads racing for first access
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaceOutcome {
    pub seed: String,
    pub observed: String,
}

/// Spawns one thread per seed; each sleeps for `delay`, then asks for the
/// process-wide instance with its own seed. Outcomes come back in seed order.
pub fn race<S: AsRef<str>>(seeds: &[S], delay: Duration) -> Result<Vec<RaceOutcome>> {
    race_in(&INSTANCE, seeds, delay)
}

fn race_in<S: AsRef<str>>(
    slot: &LazySingleton<Singleton>,
    seeds: &[S],
    delay: Duration,
) -> Result<Vec<RaceOutcome>> {
    let (tx, rx) = channel::unbounded();

    thread::scope(|s| {
        let handles: Vec<_> = seeds
            .iter()
            .enumerate()
            .map(|(i, seed)| {
                let tx = tx.clone();
                let seed = seed.as_ref().to_string();
                s.spawn(move || {
                    thread::sleep(delay);
                    let observed = Singleton::instance_in(slot, seed.clone()).value().to_string();
                    // The receiver outlives the scope, so this cannot fail.
                    let _ = tx.send((i, RaceOutcome { seed, observed }));
                })
            })
            .collect();

        handles.into_iter().try_for_each(|handle| {
            handle.join().map_err(|payload| {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|msg| msg.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                PatternError::ThreadPanicked(message)
            })
        })
    })?;
    drop(tx);

    let mut outcomes: Vec<_> = rx.iter().collect();
    outcomes.sort_by_key(|(i, _)| *i);
    Ok(outcomes.into_iter().map(|(_, outcome)| outcome).collect())
}

/// The lines the singleton demo prints.
pub fn client_code<S: AsRef<str>>(seeds: &[S], delay: Duration) -> Result<Vec<String>> {
    let mut lines = vec![
        "If you see the same value, then singleton was reused (yay!".to_string(),
        "If you see different values, then 2 singletons were created (booo!!)".to_string(),
        String::new(),
        "RESULT:".to_string(),
    ];
    lines.extend(race(seeds, delay)?.into_iter().map(|outcome| outcome.observed));
    Ok(lines)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;

    #[test]
    fn test_first_value_wins() {
        let slot = LazySingleton::new();
        assert!(!slot.is_initialized());

        let first = slot.instance("FOO".to_string());
        let second = slot.instance("BAR".to_string());

        assert!(std::ptr::eq(first, second));
        assert_eq!(second, "FOO");
        assert_eq!(slot.get().map(String::as_str), Some("FOO"));
    }

    #[test]
    fn test_later_arguments_are_dropped_unused() {
        struct Tracked<'a>(&'a AtomicUsize);

        impl Drop for Tracked<'_> {
            fn drop(&mut self) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        let drops = AtomicUsize::new(0);
        let slot = LazySingleton::new();
        let first = slot.instance(Tracked(&drops));
        assert_eq!(drops.load(Ordering::SeqCst), 0);

        let second = slot.instance(Tracked(&drops));
        assert!(std::ptr::eq(first, second));
        assert_eq!(drops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_singleton_ignores_value_once_filled() {
        let slot = LazySingleton::new();
        let first = Singleton::instance_in(&slot, "FOO".to_string());
        let second = Singleton::instance_in(&slot, "BAR".to_string());
        assert!(std::ptr::eq(first, second));
        assert_eq!(second.value(), "FOO");
    }

    #[test]
    fn test_failed_init_is_retried() {
        let slot: LazySingleton<u32> = LazySingleton::new();

        let err = slot.get_or_try_init(|| Err::<u32, _>("boom")).unwrap_err();
        assert_eq!(err, "boom");
        assert!(!slot.is_initialized());

        let value = slot.get_or_try_init(|| Ok::<_, &str>(7)).unwrap();
        assert_eq!(*value, 7);
        // Filled now, so the failing constructor is never run.
        assert_eq!(slot.get_or_try_init(|| Err::<u32, _>("late")), Ok(&7));
    }

    #[test]
    fn test_panicking_init_does_not_poison() {
        let slot: LazySingleton<u32> = LazySingleton::new();

        let result = std::panic::catch_unwind(|| {
            slot.get_or_init(|| panic!("constructor failed"));
        });
        assert!(result.is_err());
        assert!(!slot.is_initialized());

        assert_eq!(*slot.get_or_init(|| 42), 42);
    }

    #[test]
    fn test_constructor_runs_once_under_contention() {
        let slot: LazySingleton<usize> = LazySingleton::new();
        let calls = AtomicUsize::new(0);
        let barrier = Barrier::new(8);

        thread::scope(|s| {
            for i in 0..8 {
                let (slot, calls, barrier) = (&slot, &calls, &barrier);
                s.spawn(move || {
                    barrier.wait();
                    slot.get_or_init(|| {
                        calls.fetch_add(1, Ordering::SeqCst);
                        thread::sleep(Duration::from_millis(5));
                        i
                    });
                });
            }
        });

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_race_on_fresh_slot() {
        let slot = LazySingleton::new();
        let outcomes = race_in(&slot, &["FOO", "BAR"], Duration::from_millis(20)).unwrap();

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].seed, "FOO");
        assert_eq!(outcomes[1].seed, "BAR");
        assert_eq!(outcomes[0].observed, outcomes[1].observed);
        assert!(["FOO", "BAR"].contains(&outcomes[0].observed.as_str()));
        assert_eq!(slot.get().map(Singleton::value), Some(outcomes[0].observed.as_str()));
    }

    #[test]
    fn test_race_after_initialization_keeps_value() {
        let slot = LazySingleton::new();
        Singleton::instance_in(&slot, "FIRST".to_string());

        let outcomes = race_in(&slot, &["FOO", "BAR", "BAZ"], Duration::ZERO).unwrap();
        assert!(outcomes.iter().all(|o| o.observed == "FIRST"));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn test_concurrent_first_access_agrees(
            seeds in prop::collection::hash_set("[A-Z]{3}", 2..6),
        ) {
            let seeds: Vec<String> = seeds.into_iter().collect();
            let slot = LazySingleton::new();
            let barrier = Barrier::new(seeds.len());

            let observed: Vec<&String> = thread::scope(|s| {
                let handles: Vec<_> = seeds
                    .iter()
                    .map(|seed| {
                        let (slot, barrier) = (&slot, &barrier);
                        s.spawn(move || {
                            barrier.wait();
                            slot.instance(seed.clone())
                        })
                    })
                    .collect();
                handles.into_iter().map(|h| h.join().unwrap()).collect()
            });

            let first = observed[0];
            prop_assert!(observed.iter().all(|v| std::ptr::eq(*v, first)));
            prop_assert!(seeds.contains(first));
        }

        #[test]
        fn test_repeated_access_is_idempotent(
            first in "[a-z]{1,8}",
            later in prop::collection::vec("[a-z]{1,8}", 1..10),
        ) {
            let slot = LazySingleton::new();
            let original = slot.instance(first.clone());
            for value in later {
                let again = slot.instance(value);
                prop_assert!(std::ptr::eq(original, again));
                prop_assert_eq!(again, &first);
            }
        }
    }
}
