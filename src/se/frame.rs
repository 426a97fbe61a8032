use crate::file_error;
use crate::prelude::*;
use crate::se::primitive::Primitive;

use bytes::{Buf, BufMut, BytesMut};
use nom_derive::{Nom, Parse};
use tokio_util::codec::{Decoder, Encoder};

pub const MAGIC: [u8; 4] = [0x12, 0x34, 0x56, 0x79];
/// Magic plus the fixed header.
pub const HEADER_LEN: usize = 20;
pub const CHECKSUM_LEN: usize = 2;

// {{{ SeCrc
/// CRC-16/ARC (reflected 0x8005) seeded with 0x5a5a instead of zero.
///
/// The crc16 crate runs an augmented register, so the seed is carried into
/// that form the same way the crate does it for its own reflected types.
pub enum SeCrc {}

impl SeCrc {
    const SEED: u16 = 0x5a5a;
    const POLY: u16 = 0x8005;
}

impl crc16::CrcType for SeCrc {
    fn init() -> u16 {
        let mut crc = Self::SEED;
        for _ in 0..16 {
            let bit = crc & 1 == 1;
            if bit {
                crc ^= Self::POLY;
            }
            crc >>= 1;
            if bit {
                crc |= 0x8000;
            }
        }
        // register is held bit-reversed per byte, bytes swapped
        ((crc as u8).reverse_bits() as u16) << 8 | ((crc >> 8) as u8).reverse_bits() as u16
    }

    fn update(crc: u16, msg: &[u8]) -> u16 {
        <crc16::ARC as crc16::CrcType>::update(crc, msg)
    }

    fn get(crc: u16) -> u16 {
        <crc16::ARC as crc16::CrcType>::get(crc)
    }
}
// }}}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Nom)]
#[nom(LittleEndian)]
struct FrameHeader {
    length: u16,
    length_inv: u16,
    seq: u16,
    from: u32,
    to: u32,
    function: u16,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub seq: u16,
    pub from: u32,
    pub to: u32,
    pub message: Message,
}

impl Frame {
    /// Build an outbound command from one of the payload encoders.
    pub fn command<P: Primitive>(
        seq: u16,
        from: u32,
        to: u32,
        function: FunctionCode,
        payload: &P,
    ) -> Self {
        Self {
            seq,
            from,
            to,
            message: Message::new(function, payload.bytes()),
        }
    }

    /// A command with no arguments, e.g. an ack or a version request.
    pub fn request(seq: u16, from: u32, to: u32, function: FunctionCode) -> Self {
        Self {
            seq,
            from,
            to,
            message: Message::new(function, Vec::new()),
        }
    }

    pub fn checksum(&self) -> u16 {
        Self::calculate_checksum(
            self.seq,
            self.from,
            self.to,
            self.message.function,
            &self.message.payload,
        )
    }

    fn calculate_checksum(seq: u16, from: u32, to: u32, function: u16, payload: &[u8]) -> u16 {
        let mut state = crc16::State::<SeCrc>::new();
        state.update(&seq.to_be_bytes());
        state.update(&from.to_be_bytes());
        state.update(&to.to_be_bytes());
        state.update(&function.to_be_bytes());
        state.update(payload);
        state.get()
    }

    pub fn bytes(&self) -> Result<Vec<u8>> {
        let payload = &self.message.payload;
        let length = match u16::try_from(payload.len()) {
            Ok(l) => l,
            Err(_) => bail!("payload of {} bytes does not fit a frame", payload.len()),
        };

        let mut r = Vec::with_capacity(HEADER_LEN + payload.len() + CHECKSUM_LEN);
        r.extend_from_slice(&MAGIC);
        r.extend_from_slice(&length.to_le_bytes());
        r.extend_from_slice(&(!length).to_le_bytes());
        r.extend_from_slice(&self.seq.to_le_bytes());
        r.extend_from_slice(&self.from.to_le_bytes());
        r.extend_from_slice(&self.to.to_le_bytes());
        r.extend_from_slice(&self.message.function.to_le_bytes());
        r.extend_from_slice(payload);
        r.extend_from_slice(&self.checksum().to_le_bytes());

        Ok(r)
    }
}

/// Splits a captured byte stream into frames.
///
/// Garbage before a magic is skipped, a header whose length fails its
/// inverted copy is treated as a false magic, and frames with a bad checksum
/// are dropped. None of these stop the stream.
#[derive(Debug, Default)]
pub struct FrameCodec {
    dropped: usize,
}

impl FrameCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames discarded so far for a bad length or checksum.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    fn find_magic(src: &[u8]) -> Option<usize> {
        src.windows(MAGIC.len()).position(|w| w == MAGIC)
    }
}

impl Decoder for FrameCodec {
    type Item = Frame;
    type Error = anyhow::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Frame>> {
        loop {
            match Self::find_magic(&src[..]) {
                Some(0) => {}
                Some(pos) => {
                    warn!("skipping {} bytes before frame", pos);
                    src.advance(pos);
                }
                None => {
                    // keep a tail that may be the start of the next magic
                    let keep = MAGIC.len() - 1;
                    if src.len() > keep {
                        let skip = src.len() - keep;
                        warn!("skipping {} bytes, no frame found", skip);
                        src.advance(skip);
                    }
                    return Ok(None);
                }
            }

            if src.len() < HEADER_LEN {
                src.reserve(HEADER_LEN - src.len());
                return Ok(None);
            }

            let header = match FrameHeader::parse(&src[MAGIC.len()..HEADER_LEN]) {
                Ok((_, header)) => header,
                Err(_) => return Err(file_error!("failed to parse frame header")),
            };

            if header.length != !header.length_inv {
                warn!(
                    "bad frame length {:04x}/{:04x}, resyncing",
                    header.length, header.length_inv
                );
                self.dropped += 1;
                src.advance(MAGIC.len());
                continue;
            }

            let total = HEADER_LEN + usize::from(header.length) + CHECKSUM_LEN;
            if src.len() < total {
                src.reserve(total - src.len());
                return Ok(None);
            }

            let raw = src.split_to(total);
            let payload = raw[HEADER_LEN..total - CHECKSUM_LEN].to_vec();
            let checksum = Utils::u16ify(&raw, total - CHECKSUM_LEN);
            let expected = Frame::calculate_checksum(
                header.seq,
                header.from,
                header.to,
                header.function,
                &payload,
            );
            if checksum != expected {
                warn!(
                    "checksum mismatch seq {} ({:04x} != {:04x}), frame dropped",
                    header.seq, checksum, expected
                );
                self.dropped += 1;
                continue;
            }

            debug!(
                "--> seq {} from {:08x} to {:08x} function {:04x} len {}",
                header.seq, header.from, header.to, header.function, header.length
            );

            return Ok(Some(Frame {
                seq: header.seq,
                from: header.from,
                to: header.to,
                message: Message {
                    function: header.function,
                    payload,
                },
            }));
        }
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Frame>> {
        match self.decode(buf)? {
            Some(frame) => Ok(Some(frame)),
            None => {
                if !buf.is_empty() {
                    warn!("discarding {} trailing bytes", buf.len());
                    buf.clear();
                }
                Ok(None)
            }
        }
    }
}

impl Encoder<Frame> for FrameCodec {
    type Error = anyhow::Error;

    fn encode(&mut self, frame: Frame, dst: &mut BytesMut) -> Result<()> {
        let bytes = frame.bytes()?;
        debug!(
            "<-- seq {} from {:08x} to {:08x} function {:04x} len {}",
            frame.seq,
            frame.from,
            frame.to,
            frame.message.function,
            frame.message.payload.len()
        );
        dst.reserve(bytes.len());
        dst.put_slice(&bytes);
        Ok(())
    }
}
