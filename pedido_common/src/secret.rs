use std::{
    fmt,
    fmt::{Debug, Display},
};

/// Wraps a credential so it cannot leak through log output. Both `Debug` and `Display` print a
/// redaction marker; reading the value requires an explicit [`Secret::reveal`] at the call site,
/// which makes every use of the raw credential grep-able.
#[derive(Clone, Default)]
pub struct Secret<T>
where T: Clone + Default
{
    value: T,
}

impl<T: Clone + Default> Secret<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }

    pub fn reveal(&self) -> &T {
        &self.value
    }

    /// Consumes the wrapper, for handing the credential to an API that wants ownership.
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T: Clone + Default> Debug for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("****")
    }
}

impl<T: Clone + Default> Display for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("****")
    }
}
