use std::io::{self, Read};

use crate::Bar;

/// A wrapper around [`Read`] that increments a [`Bar`] by the number of bytes read.
///
/// Created with [`Bar::proxy_reader`]. Each read blocks on the bar's actor,
/// so this is meant for synchronous IO.
pub struct ProxyReader<R> {
    inner: R,
    bar: Bar,
}

impl<R> ProxyReader<R> {
    pub(crate) fn new(inner: R, bar: Bar) -> Self {
        Self { inner, bar }
    }

    /// Get the wrapped reader back
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for ProxyReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.bar.increment(n as i64);
        Ok(n)
    }
}
