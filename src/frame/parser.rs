//! Incremental websocket frame parser.
//!
//! Consumes raw bytes in chunks of any size and produces complete,
//! defragmented [`Frame`]s. Continuation frames are reassembled
//! internally and never surface.

use super::{Frame, OpCode, PayloadLen, apply_mask};
use crate::buffer::ByteStream;
use crate::error::FrameError;

/// Wire frame header, alive between head parse and payload parse.
#[derive(Debug, Clone, Copy)]
struct FrameHead {
    fin: bool,
    opcode: u8,
    mask: Option<[u8; 4]>,
    payload_len: usize,
}

/// Incremental frame parser with fragment reassembly.
#[derive(Debug, Default)]
pub struct FrameParser {
    buffer: ByteStream,
    head: Option<FrameHead>,

    fragments: Vec<Vec<u8>>,
    fragmented_opcode: Option<OpCode>,
    fragmented_size: usize,
}

impl FrameParser {
    /// Constructor.
    pub fn new() -> Self { Self::default() }

    /// Feed a chunk and try to produce the next complete frame.
    ///
    /// An empty chunk still pumps already-buffered bytes, call again with
    /// an empty chunk until `Ok(None)` to drain every buffered frame.
    pub fn parse_chunk(&mut self, chunk: &[u8]) -> Result<Option<Frame>, FrameError> {
        if !chunk.is_empty() {
            self.buffer.append(chunk);
        }

        loop {
            if self.head.is_none() {
                self.parse_head()?;
            }

            let Some(head) = self.head else {
                // not enough buffered bytes for a header
                return Ok(None);
            };

            if self.buffer.len() < head.payload_len {
                return Ok(None);
            }

            if let Some(frame) = self.finish_frame(head)? {
                return Ok(Some(frame));
            }
            // fragment swallowed, try the next wire frame
        }
    }

    /// Parse a frame header once enough bytes are buffered.
    fn parse_head(&mut self) -> Result<(), FrameError> {
        if self.buffer.len() < 2 {
            return Ok(());
        }

        let data = self.buffer.as_slice();
        let b1 = data[0];
        let b2 = data[1];

        if b1 & 0x70 != 0 {
            return Err(FrameError::ReservedBits);
        }

        let fin = b1 & 0x80 != 0;
        let opcode = b1 & 0x0f;
        let masked = b2 & 0x80 != 0;
        let length = PayloadLen::from_flag(b2);

        let head_len = 2 + length.extended_len() + if masked { 4 } else { 0 };
        if self.buffer.len() < head_len {
            return Ok(());
        }

        let payload_len = match length {
            PayloadLen::Standard(v) => v as u64,
            PayloadLen::Extended1(_) => {
                PayloadLen::from_byte2([data[2], data[3]]).to_num()
            }
            PayloadLen::Extended2(_) => {
                PayloadLen::from_byte8([
                    data[2], data[3], data[4], data[5], data[6], data[7], data[8], data[9],
                ])
                .to_num()
            }
        };
        let payload_len =
            usize::try_from(payload_len).map_err(|_| FrameError::MessageTooLarge)?;

        let mask = if masked {
            let k = head_len - 4;
            Some([data[k], data[k + 1], data[k + 2], data[k + 3]])
        } else {
            None
        };

        self.buffer.consume(head_len);
        self.head = Some(FrameHead {
            fin,
            opcode,
            mask,
            payload_len,
        });
        Ok(())
    }

    /// Consume a buffered payload; emits a frame, or swallows a fragment.
    fn finish_frame(&mut self, head: FrameHead) -> Result<Option<Frame>, FrameError> {
        let mut data = self.buffer.read(head.payload_len);
        self.head = None;

        // control frames must be final and short
        if OpCode::is_control_wire(head.opcode) {
            if !head.fin {
                return Err(FrameError::FragmentedControl);
            }
            if data.len() > 125 {
                return Err(FrameError::ControlTooLarge);
            }
        }

        if let Some(key) = head.mask {
            apply_mask(key, &mut data);
        }

        let opcode = OpCode::from_wire(head.opcode);

        if opcode != OpCode::Continue && head.fin {
            return Ok(Some(Frame::new(opcode, data)));
        }

        // fragmented segment
        self.fragmented_size = self
            .fragmented_size
            .checked_add(data.len())
            .ok_or(FrameError::MessageTooLarge)?;
        self.fragments.push(data);

        // first fragmented segment
        if opcode != OpCode::Continue {
            self.fragmented_opcode = Some(opcode);
            return Ok(None);
        }

        // last fragmented segment
        if head.fin {
            let mut payload = Vec::with_capacity(self.fragmented_size);
            for fragment in self.fragments.drain(..) {
                payload.extend_from_slice(&fragment);
            }
            // a bare final continuation has no recorded first opcode
            let opcode = self.fragmented_opcode.take().unwrap_or(OpCode::Unknown);
            self.fragmented_size = 0;

            return Ok(Some(Frame::new(opcode, payload)));
        }

        Ok(None)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::frame::{Mask, new_mask_key};

    fn drain(parser: &mut FrameParser, chunk: &[u8]) -> Result<Vec<Frame>, FrameError> {
        let mut out = Vec::new();
        let mut chunk = chunk;
        while let Some(frame) = parser.parse_chunk(chunk)? {
            out.push(frame);
            chunk = &[];
        }
        Ok(out)
    }

    #[test]
    fn single_frame() {
        let mut parser = FrameParser::new();
        let frames = drain(&mut parser, &[0x81, 0x02, b'h', b'i']).unwrap();
        assert_eq!(frames, [Frame::text("hi")]);
    }

    #[test]
    fn masked_frame() {
        let key = new_mask_key();
        let wire = Frame::binary(vec![1, 2, 3, 4, 5]).encode(Mask::Key(key));

        let mut parser = FrameParser::new();
        let frames = drain(&mut parser, &wire).unwrap();
        assert_eq!(frames, [Frame::binary(vec![1, 2, 3, 4, 5])]);
    }

    #[test]
    fn byte_at_a_time() {
        let frame = Frame::binary((0..70000).map(|i| i as u8).collect());
        let wire = frame.encode(Mask::Key([0x01, 0x02, 0x03, 0x04]));

        let mut parser = FrameParser::new();
        let mut frames = Vec::new();
        for b in wire {
            frames.extend(drain(&mut parser, &[b]).unwrap());
        }
        assert_eq!(frames, [frame]);
    }

    #[test]
    fn several_frames_in_one_chunk() {
        let mut wire = Frame::text("one").encode(Mask::None);
        wire.extend(Frame::ping(vec![0xaa]).encode(Mask::None));
        wire.extend(Frame::text("two").encode(Mask::None));

        let mut parser = FrameParser::new();
        let frames = drain(&mut parser, &wire).unwrap();
        assert_eq!(
            frames,
            [
                Frame::text("one"),
                Frame::ping(vec![0xaa]),
                Frame::text("two")
            ]
        );
    }

    #[test]
    fn interleaved_control_frame() {
        // ping arriving between two fragments of a text message
        let mut wire = vec![0x01, 0x03, b'a', b'b', b'c'];
        wire.extend(Frame::ping(vec![1]).encode(Mask::None));
        wire.extend([0x80, 0x03, b'd', b'e', b'f']);

        let mut parser = FrameParser::new();
        let frames = drain(&mut parser, &wire).unwrap();
        assert_eq!(frames, [Frame::ping(vec![1]), Frame::text("abcdef")]);
    }

    #[test]
    fn reserved_bits() {
        let mut parser = FrameParser::new();
        assert_eq!(
            parser.parse_chunk(&[0xc1, 0x00]),
            Err(FrameError::ReservedBits)
        );
    }

    #[test]
    fn fragmented_control() {
        for opcode in 0x08..=0x0a {
            let mut parser = FrameParser::new();
            assert_eq!(
                parser.parse_chunk(&[opcode, 0x01, 0xff]),
                Err(FrameError::FragmentedControl)
            );
        }
    }

    #[test]
    fn oversized_control() {
        for opcode in 0x08..=0x0a {
            let mut wire = vec![0x80 | opcode, 126, 0x00, 126];
            wire.extend(vec![0; 126]);

            let mut parser = FrameParser::new();
            assert_eq!(
                parser.parse_chunk(&wire),
                Err(FrameError::ControlTooLarge)
            );
        }
    }

    #[test]
    fn reserved_opcode_is_unknown() {
        let mut parser = FrameParser::new();
        let frames = drain(&mut parser, &[0x83, 0x01, 0x42]).unwrap();
        assert_eq!(frames, [Frame::new(OpCode::Unknown, vec![0x42])]);
    }
}
