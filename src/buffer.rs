//! Growable byte accumulator shared by both parsers.

/// Growable, compacting byte buffer.
///
/// Bytes are appended at the logical end and consumed from the front.
/// Capacity grows by doubling to the next power of two and never shrinks;
/// contents past `size` are garbage.
#[derive(Debug)]
pub struct ByteStream {
    data: Vec<u8>,
    size: usize,
}

impl ByteStream {
    /// Constructor, with an initial capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: vec![0; capacity],
            size: 0,
        }
    }

    /// Number of buffered bytes.
    #[inline]
    pub fn len(&self) -> usize { self.size }

    #[inline]
    pub fn is_empty(&self) -> bool { self.size == 0 }

    /// View the buffered bytes without consuming them.
    #[inline]
    pub fn as_slice(&self) -> &[u8] { &self.data[..self.size] }

    /// Append a chunk, growing the backing storage if needed.
    pub fn append(&mut self, chunk: &[u8]) {
        let required = self.size + chunk.len();
        if required > self.data.len() {
            self.data.resize(required.next_power_of_two(), 0);
        }
        self.data[self.size..required].copy_from_slice(chunk);
        self.size = required;
    }

    /// Take the first `count` bytes and shift the remainder to the front.
    ///
    /// # Panics
    ///
    /// Panics if `count > len()`. Callers are expected to have checked
    /// availability; violating that is a bookkeeping defect, not a
    /// recoverable protocol condition.
    pub fn read(&mut self, count: usize) -> Vec<u8> {
        assert!(count <= self.size, "read past end of buffered data");

        let ret = self.data[..count].to_vec();
        self.consume(count);
        ret
    }

    /// Discard the first `count` bytes, clamped to the buffered size.
    pub fn consume(&mut self, count: usize) {
        if count >= self.size {
            self.size = 0;
            return;
        }

        self.data.copy_within(count..self.size, 0);
        self.size -= count;
    }

    /// Drop all buffered bytes, keeping capacity.
    #[inline]
    pub fn reset(&mut self) { self.size = 0; }
}

impl Default for ByteStream {
    fn default() -> Self { Self::with_capacity(1024) }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn append_read() {
        let mut buf = ByteStream::with_capacity(4);
        buf.append(b"Hello, ");
        buf.append(b"World!!");
        assert_eq!(buf.len(), 14);
        assert_eq!(buf.as_slice(), b"Hello, World!!");

        assert_eq!(buf.read(7), b"Hello, ");
        assert_eq!(buf.as_slice(), b"World!!");
        assert_eq!(buf.read(7), b"World!!");
        assert!(buf.is_empty());
    }

    #[test]
    fn growth_power_of_two() {
        let mut buf = ByteStream::with_capacity(1);
        for _ in 0..100 {
            buf.append(&[0xAB; 33]);
        }
        assert_eq!(buf.len(), 3300);
        assert!(buf.as_slice().iter().all(|b| *b == 0xAB));
    }

    #[test]
    fn consume_clamps() {
        let mut buf = ByteStream::default();
        buf.append(b"abcdef");
        buf.consume(2);
        assert_eq!(buf.as_slice(), b"cdef");
        buf.consume(100);
        assert!(buf.is_empty());

        buf.append(b"xyz");
        buf.reset();
        assert!(buf.is_empty());
    }

    #[test]
    #[should_panic]
    fn read_past_end() {
        let mut buf = ByteStream::default();
        buf.append(b"ab");
        buf.read(3);
    }
}
