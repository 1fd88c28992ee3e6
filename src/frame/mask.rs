//! Mask flag and key.

/// Payload mask with a 32-bit key.
///
/// The key is kept in wire order: `key[0]` carries bits 31-24.
/// Clients mask every outbound frame, servers never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mask {
    Key([u8; 4]),
    None,
}

impl Mask {
    /// Get the flag bit for the second header byte.
    #[inline]
    pub const fn to_flag(&self) -> u8 {
        match self {
            Mask::Key(_) => 0x80,
            Mask::None => 0x00,
        }
    }
}

/// Generate a new random key.
#[inline]
pub fn new_mask_key() -> [u8; 4] { rand::random::<[u8; 4]>() }

/// Mask the buffer, byte by byte.
#[inline]
pub fn apply_mask(key: [u8; 4], buf: &mut [u8]) {
    for (i, b) in buf.iter_mut().enumerate() {
        *b ^= key[i & 0x03];
    }
}

/// Mask the buffer, 4 bytes at a time with a truncated tail.
#[inline]
pub fn apply_mask4(key: [u8; 4], buf: &mut [u8]) {
    let mut chunks = buf.chunks_exact_mut(4);
    for chunk in &mut chunks {
        for (b, k) in chunk.iter_mut().zip(key) {
            *b ^= k;
        }
    }
    for (b, k) in chunks.into_remainder().iter_mut().zip(key) {
        *b ^= k;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn mask_flag() {
        assert_eq!(Mask::Key([1, 2, 3, 4]).to_flag(), 0x80);
        assert_eq!(Mask::None.to_flag(), 0x00);
    }

    #[test]
    fn mask_byte() {
        let key: [u8; 4] = rand::random();
        let buf: Vec<u8> = (0..1024).map(|_| rand::random::<u8>()).collect();

        let mut buf2 = buf.clone();
        apply_mask(key, &mut buf2);
        apply_mask(key, &mut buf2);

        assert_eq!(buf, buf2);
    }

    #[test]
    fn mask_byte4() {
        for i in 0..512 {
            let key: [u8; 4] = rand::random();
            let buf: Vec<u8> = (0..i).map(|_| rand::random::<u8>()).collect();

            let mut buf2 = buf.clone();
            apply_mask4(key, &mut buf2);
            apply_mask(key, &mut buf2);

            assert_eq!(buf, buf2);
        }
    }
}
