//! 8-byte acceleration frame streamed over the debug link.
//!
//! ```text
//! byte  0     1     2     3     4     5     6     7
//!      0xA0  X.lo  X.hi  Y.lo  Y.hi  Z.lo  Z.hi  0xC0
//! ```
//!
//! Each axis carries `|raw| >> 4`, the 12 most significant bits of the
//! magnitude. The sign is not transmitted.

use bytemuck::{Pod, Zeroable};

use crate::drivers::lis3dh::BURST_LEN;

pub const FRAME_HEADER: u8 = 0xA0;
pub const FRAME_FOOTER: u8 = 0xC0;
pub const FRAME_LEN: usize = 8;

/// Right shift that keeps the sensor's 12 significant bits.
const RESOLUTION_SHIFT: u32 = 4;

/// One raw X/Y/Z reading, as left-justified two's complement counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "firmware", derive(defmt::Format))]
pub struct Sample {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

impl Sample {
    /// Rebuilds the three axes from one OUT_X_L..OUT_Z_H burst.
    pub fn from_burst(raw: &[u8; BURST_LEN]) -> Self {
        Self {
            x: i16::from_le_bytes([raw[0], raw[1]]),
            y: i16::from_le_bytes([raw[2], raw[3]]),
            z: i16::from_le_bytes([raw[4], raw[5]]),
        }
    }
}

/// Absolute value first, then the shift. `v` and `-v` give the same result,
/// and `i16::MIN` maps to 2048.
#[inline]
pub fn magnitude(raw: i16) -> u16 {
    (i32::from(raw).unsigned_abs() >> RESOLUTION_SHIFT) as u16
}

/// Wire-format packet, laid out exactly as it goes out on the UART.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Zeroable, Pod)]
pub struct WireFrame {
    header: u8,
    x: [u8; 2],
    y: [u8; 2],
    z: [u8; 2],
    footer: u8,
}

const _: () = assert!(core::mem::size_of::<WireFrame>() == FRAME_LEN);

impl WireFrame {
    pub fn encode(sample: &Sample) -> Self {
        Self {
            header: FRAME_HEADER,
            x: magnitude(sample.x).to_le_bytes(),
            y: magnitude(sample.y).to_le_bytes(),
            z: magnitude(sample.z).to_le_bytes(),
            footer: FRAME_FOOTER,
        }
    }

    /// Accepts `bytes` only if header and footer are in place.
    pub fn decode(bytes: &[u8; FRAME_LEN]) -> Option<Self> {
        let frame: Self = bytemuck::cast(*bytes);
        (frame.header == FRAME_HEADER && frame.footer == FRAME_FOOTER).then_some(frame)
    }

    pub fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        bytemuck::cast_ref(self)
    }

    /// Per-axis magnitudes in X, Y, Z order.
    pub fn magnitudes(&self) -> [u16; 3] {
        [
            u16::from_le_bytes(self.x),
            u16::from_le_bytes(self.y),
            u16::from_le_bytes(self.z),
        ]
    }
}

#[cfg(feature = "firmware")]
impl defmt::Format for WireFrame {
    fn format(&self, f: defmt::Formatter) {
        let [x, y, z] = self.magnitudes();
        defmt::write!(f, "WireFrame x={} y={} z={}", x, y, z)
    }
}

/// Finds frames in a byte stream that may also carry diagnostic text.
///
/// A candidate is accepted when a header byte is followed, seven bytes
/// later, by a footer byte. On a match the scanner skips the whole frame.
/// Otherwise it moves forward by one byte.
pub struct FrameScanner<'a> {
    stream: &'a [u8],
    pos: usize,
}

impl<'a> FrameScanner<'a> {
    pub fn new(stream: &'a [u8]) -> Self {
        Self { stream, pos: 0 }
    }

    /// Bytes not yet examined; a truncated frame at the tail stays here.
    pub fn remainder(&self) -> &'a [u8] {
        &self.stream[self.pos..]
    }
}

impl Iterator for FrameScanner<'_> {
    type Item = WireFrame;

    fn next(&mut self) -> Option<WireFrame> {
        while self.pos + FRAME_LEN <= self.stream.len() {
            let window: &[u8; FRAME_LEN] = self.stream[self.pos..self.pos + FRAME_LEN]
                .try_into()
                .ok()?;
            if let Some(frame) = WireFrame::decode(window) {
                self.pos += FRAME_LEN;
                return Some(frame);
            }
            self.pos += 1;
        }
        None
    }
}
