//! Fin flag and opcode.

/// Fin flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fin {
    /// a byte with its leading bit set
    Y = 0x80,

    /// a byte with its leading bit clear
    N = 0x00,
}

impl Fin {
    /// Read the fin bit of the first header byte.
    #[inline]
    pub const fn from_flag(b: u8) -> Self {
        if b & 0x80 != 0 {
            Fin::Y
        } else {
            Fin::N
        }
    }

    #[inline]
    pub const fn is_set(self) -> bool { matches!(self, Fin::Y) }
}

/// Frame opcode, after defragmentation.
///
/// Reserved opcodes (0x3-0x7, 0xb-0xf) decode as [`OpCode::Unknown`];
/// control-frame rules are applied to the raw wire value, so reserved
/// control opcodes are still length-checked and fin-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCode {
    /// denotes a continuation frame, 0x00
    Continue = 0x00,
    /// denotes a text frame, 0x01
    Text = 0x01,
    /// denotes a binary frame, 0x02
    Binary = 0x02,

    /// denotes a connection close, 0x08
    Close = 0x08,
    /// denotes a ping, 0x09
    Ping = 0x09,
    /// denotes a pong, 0x0a
    Pong = 0x0a,

    /// any reserved opcode
    Unknown = 0x0f,
}

impl OpCode {
    /// Parse from the low 4 bits of the first header byte.
    #[inline]
    pub const fn from_wire(b: u8) -> Self {
        use OpCode::*;
        match b & 0x0f {
            0x00 => Continue,
            0x01 => Text,
            0x02 => Binary,
            0x08 => Close,
            0x09 => Ping,
            0x0a => Pong,
            _ => Unknown,
        }
    }

    /// Wire value, fits in the low 4 bits.
    #[inline]
    pub const fn to_wire(self) -> u8 { self as u8 & 0x0f }

    /// Close, ping, pong and the reserved control range.
    #[inline]
    pub const fn is_control_wire(b: u8) -> bool { b & 0x0f >= 0x08 }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn fin() {
        assert_eq!(Fin::from_flag(0x81), Fin::Y);
        assert_eq!(Fin::from_flag(0x01), Fin::N);
        assert_eq!(Fin::Y as u8, 0x80);
        assert_eq!(Fin::N as u8, 0x00);
    }

    #[test]
    fn opcode() {
        for v in [0x00, 0x01, 0x02, 0x08, 0x09, 0x0a] {
            assert_eq!(OpCode::from_wire(v).to_wire(), v);
        }
        for v in (0x03..=0x07).chain(0x0b..=0x0e) {
            assert_eq!(OpCode::from_wire(v), OpCode::Unknown);
        }
    }

    #[test]
    fn control_range() {
        for v in 0x00..=0x07_u8 {
            assert!(!OpCode::is_control_wire(v));
        }
        for v in 0x08..=0x0f_u8 {
            assert!(OpCode::is_control_wire(v));
        }
    }
}
