//! Deterministic cache-key generation.
//!
//! A key is the caller identity, the operation name and the string form of
//! every argument, concatenated in order with no separator. Argument lists
//! whose string forms concatenate to the same text produce the same key:
//! `["1", "23"]` and `["12", "3"]` collide. Existing keys depend on this
//! layout, so it must not change.

use std::borrow::Cow;
use std::fmt::{Display, Write};

/// Build a key from identity, operation and arguments.
pub fn build_key<I>(identity: &str, operation: &str, args: I) -> String
where
    I: IntoIterator,
    I::Item: Display,
{
    let mut key = String::with_capacity(identity.len() + operation.len());
    key.push_str(identity);
    key.push_str(operation);
    for arg in args {
        // Writing to a String cannot fail.
        let _ = write!(key, "{}", arg);
    }
    key
}

/// Key builder bound to one caller identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyGenerator {
    identity: Cow<'static, str>,
}

impl KeyGenerator {
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: Cow::Owned(identity.into()),
        }
    }

    /// Use the fully-qualified name of `T` as identity.
    pub fn for_type<T: ?Sized>() -> Self {
        Self {
            identity: Cow::Borrowed(std::any::type_name::<T>()),
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn key<I>(&self, operation: &str, args: I) -> String
    where
        I: IntoIterator,
        I::Item: Display,
    {
        build_key(&self.identity, operation, args)
    }
}

/// Build a key from arguments of mixed types.
///
/// ```
/// use cache_connector::cache_key;
///
/// let key = cache_key!("StaffService", "list", 2, "active", true);
/// assert_eq!(key, "StaffServicelist2activetrue");
/// ```
#[macro_export]
macro_rules! cache_key {
    ($identity:expr, $operation:expr $(, $arg:expr)* $(,)?) => {{
        let args: &[&dyn ::std::fmt::Display] = &[$(&$arg),*];
        $crate::keys::build_key($identity, $operation, args)
    }};
}
