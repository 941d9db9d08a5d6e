//! Events delivered by the upstream two-wire bus decoder.

/// One bit of a byte on the bus, with its position on the sample timeline.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BitSample {
    pub value: bool,
    pub ss: u64,
    pub es: u64,
}

impl BitSample {
    pub fn new(value: bool, ss: u64, es: u64) -> BitSample {
        BitSample { value, ss, es }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Bus start condition.
    Start,
    /// Bit breakdown of the byte about to be classified, LSB first.
    Bits(Vec<BitSample>),
    /// First byte of a transmission.
    Command(u8),
    /// Any byte following the command byte.
    Data(u8),
    /// Bus stop condition.
    Stop,
}

/// An event together with the sample range it covers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimedEvent {
    pub ss: u64,
    pub es: u64,
    pub event: Event,
}

impl TimedEvent {
    pub fn new(ss: u64, es: u64, event: Event) -> TimedEvent {
        TimedEvent { ss, es, event }
    }
}

/// Builds the LSB-first bit array for `byte`, giving every bit
/// `width` samples starting at `ss`.
///
/// Upstream decoders hand over real timing; this is for feeding
/// synthetic captures.
pub fn bits_of(byte: u8, ss: u64, width: u64) -> Vec<BitSample> {
    (0..8u64)
        .map(|i| {
            let start = ss + i * width;
            BitSample::new(byte >> i & 1 == 1, start, start + width)
        })
        .collect()
}
