//! Wrapping functions so they only run while a path lock is held
//!
//! A [`Guarded`] value owns a function plus the settings for locking around
//! it. Arguments are passed as a tuple, which lets a single wrapper cover
//! functions of any arity up to six:
//!
//! ```no_run
//! use pathlock::guard::{guard, guard_by_first_arg};
//! use std::path::PathBuf;
//!
//! let report = guard("/var/lib/app/report.csv", || "result").max_retries(0);
//! assert_eq!(report.call(()), Some("result"));
//!
//! let append = guard_by_first_arg(|path: PathBuf, line: &str| {
//!     std::fs::write(path, line).is_ok()
//! })
//! .marker(false);
//! let written: bool = append.call((PathBuf::from("/tmp/out.txt"), "hello"));
//! # let _ = written;
//! ```

use crate::config::LockOptions;
use crate::lock::with_lock;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// A function callable with its arguments packed in a tuple.
pub trait Invoke<Args> {
    type Output;

    fn invoke(&self, args: Args) -> Self::Output;
}

/// Argument tuples whose first element names the protected resource.
pub trait LeadingPath {
    fn leading_path(&self) -> &Path;
}

macro_rules! impl_call_traits {
    () => {
        impl<Func, Out> Invoke<()> for Func
        where
            Func: Fn() -> Out,
        {
            type Output = Out;

            fn invoke(&self, _args: ()) -> Out {
                self()
            }
        }
    };
    ($first:ident $first_val:ident $(, $ty:ident $val:ident)*) => {
        impl<Func, Out, $first, $($ty),*> Invoke<($first, $($ty,)*)> for Func
        where
            Func: Fn($first, $($ty),*) -> Out,
        {
            type Output = Out;

            fn invoke(&self, ($first_val, $($val,)*): ($first, $($ty,)*)) -> Out {
                self($first_val, $($val),*)
            }
        }

        impl<$first, $($ty),*> LeadingPath for ($first, $($ty,)*)
        where
            $first: AsRef<Path>,
        {
            fn leading_path(&self) -> &Path {
                self.0.as_ref()
            }
        }
    };
}

impl_call_traits!();
impl_call_traits!(A1 a1);
impl_call_traits!(A1 a1, A2 a2);
impl_call_traits!(A1 a1, A2 a2, A3 a3);
impl_call_traits!(A1 a1, A2 a2, A3 a3, A4 a4);
impl_call_traits!(A1 a1, A2 a2, A3 a3, A4 a4, A5 a5);
impl_call_traits!(A1 a1, A2 a2, A3 a3, A4 a4, A5 a5, A6 a6);

/// Resolves which resource to lock for a given call.
pub trait Locate<Args> {
    fn locate<'a>(&'a self, args: &'a Args) -> &'a Path;
}

impl<Args> Locate<Args> for PathBuf {
    fn locate<'a>(&'a self, _args: &'a Args) -> &'a Path {
        self.as_path()
    }
}

/// Locks whatever path is passed as the call's first argument.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstArg;

impl<Args: LeadingPath> Locate<Args> for FirstArg {
    fn locate<'a>(&'a self, args: &'a Args) -> &'a Path {
        args.leading_path()
    }
}

/// What a guarded call returns, with and without the lock.
pub trait Fallback<T> {
    type Output;

    fn held(&self, value: T) -> Self::Output;

    fn unavailable(&self) -> Self::Output;
}

/// Returns `None` when the lock could not be obtained.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoResult;

impl<T> Fallback<T> for NoResult {
    type Output = Option<T>;

    fn held(&self, value: T) -> Option<T> {
        Some(value)
    }

    fn unavailable(&self) -> Option<T> {
        None
    }
}

/// Returns a copy of the marker value when the lock could not be obtained.
#[derive(Debug, Clone)]
pub struct Marker<T>(pub T);

impl<T: Clone> Fallback<T> for Marker<T> {
    type Output = T;

    fn held(&self, value: T) -> T {
        value
    }

    fn unavailable(&self) -> T {
        self.0.clone()
    }
}

/// Fails with a copy of the error when the lock could not be obtained.
#[derive(Debug, Clone)]
pub struct Raise<E>(pub E);

impl<T, E: Clone> Fallback<T> for Raise<E> {
    type Output = Result<T, E>;

    fn held(&self, value: T) -> Result<T, E> {
        Ok(value)
    }

    fn unavailable(&self) -> Result<T, E> {
        Err(self.0.clone())
    }
}

/// A function that only runs while holding the lock for its resource.
#[derive(Debug, Clone)]
pub struct Guarded<F, L = PathBuf, K = NoResult> {
    func: F,
    locator: L,
    options: LockOptions,
    fallback: K,
}

/// Guards `func` with the lock for a fixed `resource`.
///
/// Defaults to [`LockOptions::default`] and returns `None` from
/// [`Guarded::call`] when the lock is unavailable.
///
/// # Arguments
///
/// * `resource` - The protected path; the lock is taken on `resource.lock`
/// * `func` - Function to run while the lock is held
///
/// # Returns
///
/// A [`Guarded`] wrapper; configure it with the builder methods.
///
/// # Examples
///
/// ```no_run
/// use pathlock::guard;
/// use std::time::Duration;
///
/// let rotate = guard("/var/log/app.log", |keep: usize| keep)
///     .max_retries(2)
///     .retry_delay(Duration::from_millis(100))
///     .marker(0);
/// let kept: usize = rotate.call((5,));
/// # let _ = kept;
/// ```
pub fn guard<F>(resource: impl Into<PathBuf>, func: F) -> Guarded<F> {
    Guarded {
        func,
        locator: resource.into(),
        options: LockOptions::default(),
        fallback: NoResult,
    }
}

/// Guards `func` with the lock for the path passed as its first argument.
///
/// Calls whose first argument is not path-like do not compile.
pub fn guard_by_first_arg<F>(func: F) -> Guarded<F, FirstArg> {
    Guarded {
        func,
        locator: FirstArg,
        options: LockOptions::default(),
        fallback: NoResult,
    }
}

impl<F, L, K> Guarded<F, L, K> {
    /// Replaces all lock settings at once.
    pub fn options(mut self, options: LockOptions) -> Self {
        self.options = options;
        self
    }

    /// Retries after a failed first attempt.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.options = self.options.with_max_retries(max_retries);
        self
    }

    /// Pause between attempts.
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.options = self.options.with_retry_delay(delay);
        self
    }

    /// Takes a shared lock instead of an exclusive one.
    pub fn shared(mut self, shared: bool) -> Self {
        self.options = self.options.with_shared(shared);
        self
    }

    /// Returns `marker` instead of `None` when the lock is unavailable.
    pub fn marker<T>(self, marker: T) -> Guarded<F, L, Marker<T>> {
        self.with_fallback(Marker(marker))
    }

    /// Fails with `error` when the lock is unavailable.
    pub fn raise<E>(self, error: E) -> Guarded<F, L, Raise<E>> {
        self.with_fallback(Raise(error))
    }

    /// Uses a custom [`Fallback`] for the unavailable case.
    pub fn with_fallback<K2>(self, fallback: K2) -> Guarded<F, L, K2> {
        Guarded {
            func: self.func,
            locator: self.locator,
            options: self.options,
            fallback,
        }
    }

    /// Current lock settings.
    pub fn lock_options(&self) -> &LockOptions {
        &self.options
    }

    /// The wrapped function, callable without any locking.
    pub fn inner(&self) -> &F {
        &self.func
    }

    /// Unwraps the function, dropping the lock settings.
    pub fn into_inner(self) -> F {
        self.func
    }

    /// Calls the wrapped function while holding the lock.
    ///
    /// When the retry budget runs out the function is not called and the
    /// configured fallback decides the result.
    pub fn call<Args>(&self, args: Args) -> K::Output
    where
        F: Invoke<Args>,
        L: Locate<Args>,
        K: Fallback<F::Output>,
    {
        let resource = self.locator.locate(&args).to_path_buf();
        with_lock(&resource, &self.options, |lock| match lock {
            Some(_) => self.fallback.held(self.func.invoke(args)),
            None => {
                tracing::debug!("Skipping call, {} is locked", resource.display());
                self.fallback.unavailable()
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoke_spreads_tuple_arguments() {
        let add = |a: i32, b: i32, c: i32| a + b + c;
        assert_eq!(add.invoke((1, 2, 3)), 6);

        let unit = || "called";
        assert_eq!(unit.invoke(()), "called");
    }

    #[test]
    fn test_leading_path_uses_first_element() {
        let args = (PathBuf::from("/tmp/a"), 5u8);
        assert_eq!(args.leading_path(), Path::new("/tmp/a"));

        let single = ("relative/b",);
        assert_eq!(single.leading_path(), Path::new("relative/b"));
    }

    #[test]
    fn test_fixed_locator_ignores_arguments() {
        let locator = PathBuf::from("/srv/fixed");
        assert_eq!(
            Locate::<(i32,)>::locate(&locator, &(7,)),
            Path::new("/srv/fixed")
        );
    }

    #[test]
    fn test_fallbacks() {
        assert_eq!(Fallback::<i32>::unavailable(&NoResult), None);
        assert_eq!(NoResult.held(3), Some(3));
        assert_eq!(Marker(-1).unavailable(), -1);
        assert_eq!(Marker(-1).held(4), 4);
        assert_eq!(Fallback::<i32>::unavailable(&Raise("busy")), Err("busy"));
    }

    #[test]
    fn test_builder_updates_options() {
        let guarded = guard("/tmp/x", || ())
            .max_retries(2)
            .retry_delay(Duration::from_millis(7))
            .shared(true);

        let options = guarded.lock_options();
        assert_eq!(options.max_retries, 2);
        assert_eq!(options.retry_delay, Duration::from_millis(7));
        assert!(options.shared);
    }

    #[test]
    fn test_sub_millisecond_retry_delay_is_kept() {
        let guarded = guard("/tmp/x", || ()).retry_delay(Duration::from_micros(900));
        assert_eq!(
            guarded.lock_options().retry_policy().retry_delay,
            Duration::from_micros(900)
        );
    }

    #[test]
    fn test_inner_bypasses_lock() {
        let guarded = guard("/nonexistent/dir/resource", |x: u32| x * 2);
        assert_eq!((guarded.inner())(21), 42);
        assert_eq!((guarded.into_inner())(4), 8);
    }
}
