use log::{debug, trace, warn};

use crate::annotation::{Annotation, AnnotationSink, Category};
use crate::bitfield::BitRange;
use crate::command::{
    bits, Addressing, AddressCommand, Command, CommandClass, DataCommand, Direction,
    DisplayCommand, Mode, Switch,
};
use crate::config::Options;
use crate::event::{BitSample, Event, TimedEvent};
use crate::font::{self, Segment};
use crate::helper_methods::next_address;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum State {
    /// Waiting for a start condition.
    Idle,
    /// Inside a transmission, before its command byte.
    AwaitingCommand,
    /// After the command byte, until the stop condition.
    AwaitingData,
}

/// Bookkeeping for the open transmission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transmission {
    pub auto_addressing: bool,
    pub write_direction: bool,
    /// Digit the next data byte lands on, 1-based.
    pub current_address: u8,
    /// Glyphs in arrival order.
    pub display: Vec<String>,
    pub start_sample: u64,
}

impl Default for Transmission {
    fn default() -> Transmission {
        Transmission {
            auto_addressing: true,
            write_direction: true,
            current_address: 1,
            display: Vec::new(),
            start_sample: 0,
        }
    }
}

pub struct Decoder {
    options: Options,
    state: State,
    transmission: Transmission,
    /// Bits of the byte most recently announced by the bus decoder.
    bits: Vec<BitSample>,
}

impl Default for Decoder {
    fn default() -> Decoder {
        Decoder::new(Options::default())
    }
}

impl Decoder {
    pub fn new(options: Options) -> Decoder {
        Decoder {
            options,
            state: State::Idle,
            transmission: Transmission::default(),
            bits: Vec::new(),
        }
    }

    pub fn reset(&mut self) {
        self.state = State::Idle;
        self.transmission = Transmission::default();
        self.bits.clear();
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn transmission(&self) -> &Transmission {
        &self.transmission
    }

    /// Feeds a finite capture and collects everything it produces.
    pub fn decode_all<I>(&mut self, events: I) -> Vec<Annotation>
    where I: IntoIterator<Item = TimedEvent>
    {
        let mut out = Vec::new();
        for TimedEvent { ss, es, event } in events {
            self.decode(ss, es, event, &mut out);
        }
        out
    }

    /// Processes one event covering samples `ss..es`.
    pub fn decode(&mut self, ss: u64, es: u64, event: Event, out: &mut impl AnnotationSink) {
        trace!("{}..{} {:?} in {:?}", ss, es, event, self.state);

        if let Event::Bits(bits) = event {
            self.bits = bits;
            return;
        }

        match (self.state, event) {
            (State::Idle, Event::Start) => {
                self.transmission = Transmission {
                    start_sample: ss,
                    ..Transmission::default()
                };
                self.transition(State::AwaitingCommand);
            }
            (State::AwaitingCommand, Event::Command(byte)) => {
                let bits = std::mem::take(&mut self.bits);
                let mut byte_out = ByteOutput::new(&bits, ss, es, out);
                self.handle_command(byte, &mut byte_out);
                self.bits = bits;
                self.transition(State::AwaitingData);
            }
            (State::AwaitingCommand, Event::Stop) => {
                self.transition(State::Idle);
            }
            (State::AwaitingData, Event::Data(byte)) => {
                let bits = std::mem::take(&mut self.bits);
                let mut byte_out = ByteOutput::new(&bits, ss, es, out);
                self.handle_data(byte, &mut byte_out);
                self.bits = bits;
            }
            (State::AwaitingData, Event::Stop) => {
                self.handle_summary(es, out);
                self.transition(State::Idle);
            }
            (state, event) => {
                trace!("ignoring {:?} in {:?}", event, state);
            }
        }
    }

    fn transition(&mut self, state: State) {
        debug!("{:?} -> {:?}", self.state, state);
        self.state = state;
    }

    fn handle_command(&mut self, byte: u8, out: &mut ByteOutput<'_, impl AnnotationSink>) {
        let command = match Command::parse(byte) {
            Some(command) => command,
            None => {
                debug!("command {:#04x} has reserved class, not dispatched", byte);
                return;
            }
        };
        debug!("command {:#04x}: {:?}", byte, command);

        let category = match command.class() {
            CommandClass::Data => Category::DataCommand,
            CommandClass::Display => Category::DisplayCommand,
            CommandClass::Address => Category::AddressCommand,
        };
        out.put_span(bits::CLASS, Annotation::new(0, 0, category));

        match command {
            Command::Data(command) => self.handle_data_command(command, out),
            Command::Display(command) => self.handle_display_command(command, out),
            Command::Address(command) => self.handle_address_command(command, out),
        }
        out.finish();
    }

    fn handle_data_command(&mut self, command: DataCommand, out: &mut ByteOutput<'_, impl AnnotationSink>) {
        out.put_reserved(bits::DATA_RESERVED_HIGH);

        let mode = match command.mode {
            Mode::Normal => Category::NormalMode,
            Mode::Test => Category::TestMode,
        };
        out.put_span(bits::DATA_MODE, Annotation::new(0, 0, mode));

        let addressing = match command.addressing {
            Addressing::Auto => Category::AutoAddressing,
            Addressing::Fixed => Category::FixedAddressing,
        };
        self.transmission.auto_addressing = command.auto_increments();
        out.put_span(bits::DATA_ADDRESSING, Annotation::new(0, 0, addressing));

        let direction = match command.direction {
            Direction::Write => Category::Write,
            Direction::Read => Category::Read,
        };
        self.transmission.write_direction = command.is_display_write();
        out.put_span(bits::DATA_DIRECTION, Annotation::new(0, 0, direction));

        out.put_reserved(bits::DATA_RESERVED_LOW);
    }

    fn handle_display_command(&mut self, command: DisplayCommand, out: &mut ByteOutput<'_, impl AnnotationSink>) {
        out.put_reserved(bits::DISPLAY_RESERVED);

        let switch = match command.switch {
            Switch::Off => Category::DisplayOff,
            Switch::On => Category::DisplayOn,
        };
        out.put_span(bits::DISPLAY_SWITCH, Annotation::new(0, 0, switch));

        out.put_span(
            bits::DISPLAY_CONTRAST,
            Annotation::with_value(0, 0, Category::ContrastLevel, command.contrast.label()),
        );
    }

    fn handle_address_command(&mut self, command: AddressCommand, out: &mut ByteOutput<'_, impl AnnotationSink>) {
        out.put_reserved(bits::ADDRESS_RESERVED);

        let digit = command.digit();
        self.transmission.current_address = digit;
        out.put_span(
            bits::ADDRESS_DIGIT,
            Annotation::with_value(0, 0, Category::DigitValue, digit.to_string()),
        );
    }

    fn handle_data(&mut self, byte: u8, out: &mut ByteOutput<'_, impl AnnotationSink>) {
        for segment in Segment::lit(byte) {
            let pos = segment as u8;
            out.put_span(
                BitRange::bit(pos),
                Annotation::labelled(0, 0, Category::ActiveSegment, segment.name()),
            );
        }
        out.finish();

        let glyph = font::glyph(byte, self.options.decimal_point);
        debug!("digit {} <- {:#04x} {:?}", self.transmission.current_address, byte, glyph);
        self.transmission.display.push(glyph);
        if self.transmission.auto_addressing {
            self.transmission.current_address = next_address(self.transmission.current_address);
        }
    }

    fn handle_summary(&mut self, es: u64, out: &mut impl AnnotationSink) {
        let transmission = std::mem::take(&mut self.transmission);
        if transmission.display.is_empty() {
            return;
        }
        let text = transmission.display.concat();
        debug!("display {:?}", text);
        out.put(Annotation::with_value(
            transmission.start_sample,
            es,
            Category::DisplaySummary,
            text,
        ));
    }
}

/// Places records for one byte on the timeline of its bits.
struct ByteOutput<'a, S: AnnotationSink> {
    bits: &'a [BitSample],
    ss: u64,
    es: u64,
    out: &'a mut S,
    missing_bits: bool,
}

impl<'a, S: AnnotationSink> ByteOutput<'a, S> {
    fn new(bits: &'a [BitSample], ss: u64, es: u64, out: &'a mut S) -> ByteOutput<'a, S> {
        ByteOutput { bits, ss, es, out, missing_bits: false }
    }

    /// Emits `annotation` spanning the bits in `range`.
    fn put_span(&mut self, range: BitRange, annotation: Annotation) {
        match (self.bits.get(range.lo as usize), self.bits.get(range.hi as usize)) {
            (Some(first), Some(last)) => {
                self.out.put(Annotation { ss: first.ss, es: last.es, ..annotation });
            }
            _ => {
                warn!("no timing for bits {}..={}, dropping {:?}", range.lo, range.hi, annotation.label);
                self.missing_bits = true;
            }
        }
    }

    /// Emits one reserved record per bit in `range`.
    fn put_reserved(&mut self, range: BitRange) {
        for pos in range.lo..=range.hi {
            self.put_span(BitRange::bit(pos), Annotation::new(0, 0, Category::Reserved));
        }
    }

    /// Reports a byte whose bit timing was incomplete.
    fn finish(&mut self) {
        if self.missing_bits {
            self.out.put(Annotation::with_value(
                self.ss,
                self.es,
                Category::Warning,
                "missing bit timing",
            ));
            self.missing_bits = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DecimalPointStyle;
    use crate::event::bits_of;

    const BIT: u64 = 10;

    /// Feeds `byte` as a command or data event the way the bus decoder does:
    /// the bit array first, then the byte.
    fn feed_byte(decoder: &mut Decoder, ss: u64, byte: u8, event: Event, out: &mut Vec<Annotation>) {
        decoder.decode(ss, ss + 8 * BIT, Event::Bits(bits_of(byte, ss, BIT)), out);
        decoder.decode(ss, ss + 8 * BIT, event, out);
    }

    fn categories(annotations: &[Annotation]) -> Vec<Category> {
        annotations.iter().map(|a| a.category).collect()
    }

    #[test]
    fn start_opens_transmission() {
        let mut decoder = Decoder::default();
        let mut out = Vec::new();
        decoder.decode(5, 6, Event::Start, &mut out);
        assert_eq!(decoder.state(), State::AwaitingCommand);
        assert_eq!(decoder.transmission().start_sample, 5);
        assert!(out.is_empty());
    }

    #[test]
    fn idle_ignores_noise() {
        let mut decoder = Decoder::default();
        let mut out = Vec::new();
        decoder.decode(0, 1, Event::Stop, &mut out);
        decoder.decode(1, 2, Event::Data(0x3F), &mut out);
        decoder.decode(2, 3, Event::Command(0x40), &mut out);
        assert_eq!(decoder.state(), State::Idle);
        assert!(out.is_empty());
    }

    #[test]
    fn data_command_records() {
        let mut decoder = Decoder::default();
        let mut out = Vec::new();
        decoder.decode(0, 1, Event::Start, &mut out);
        feed_byte(&mut decoder, 10, 0x44, Event::Command(0x44), &mut out);

        assert_eq!(decoder.state(), State::AwaitingData);
        assert_eq!(
            categories(&out),
            [
                Category::DataCommand,
                Category::Reserved,
                Category::Reserved,
                Category::NormalMode,
                Category::FixedAddressing,
                Category::Write,
                Category::Reserved,
            ]
        );
        // command class over bits 6..=7
        assert_eq!((out[0].ss, out[0].es), (70, 90));
        // reserved bit 4
        assert_eq!((out[1].ss, out[1].es), (50, 60));
        // addressing bit 2
        assert_eq!((out[4].ss, out[4].es), (30, 40));
        assert!(!decoder.transmission().auto_addressing);
        assert!(decoder.transmission().write_direction);
    }

    #[test]
    fn read_test_mode_command() {
        let mut decoder = Decoder::default();
        let mut out = Vec::new();
        decoder.decode(0, 1, Event::Start, &mut out);
        feed_byte(&mut decoder, 10, 0x4A, Event::Command(0x4A), &mut out);
        assert!(categories(&out).contains(&Category::TestMode));
        assert!(categories(&out).contains(&Category::Read));
        assert!(categories(&out).contains(&Category::AutoAddressing));
        assert!(!decoder.transmission().write_direction);
    }

    #[test]
    fn display_command_records() {
        let mut decoder = Decoder::default();
        let mut out = Vec::new();
        decoder.decode(0, 1, Event::Start, &mut out);
        feed_byte(&mut decoder, 10, 0x8B, Event::Command(0x8B), &mut out);

        assert_eq!(
            categories(&out),
            [
                Category::DisplayCommand,
                Category::Reserved,
                Category::Reserved,
                Category::DisplayOn,
                Category::ContrastLevel,
            ]
        );
        let contrast = &out[4];
        assert_eq!(contrast.label, "Contrast: 10/16");
        assert_eq!((contrast.ss, contrast.es), (10, 40));
    }

    #[test]
    fn address_command_records() {
        let mut decoder = Decoder::default();
        let mut out = Vec::new();
        decoder.decode(0, 1, Event::Start, &mut out);
        feed_byte(&mut decoder, 10, 0xC5, Event::Command(0xC5), &mut out);

        assert_eq!(
            categories(&out),
            [
                Category::AddressCommand,
                Category::Reserved,
                Category::Reserved,
                Category::Reserved,
                Category::DigitValue,
            ]
        );
        assert_eq!(out[4].label, "Digit: 6");
        assert_eq!(decoder.transmission().current_address, 6);
    }

    #[test]
    fn reserved_class_is_not_dispatched() {
        let mut decoder = Decoder::default();
        let mut out = Vec::new();
        decoder.decode(0, 1, Event::Start, &mut out);
        feed_byte(&mut decoder, 10, 0x3F, Event::Command(0x3F), &mut out);
        assert!(out.is_empty());
        assert_eq!(decoder.state(), State::AwaitingData);
    }

    #[test]
    fn data_byte_segments() {
        let mut decoder = Decoder::default();
        let mut out = Vec::new();
        decoder.decode(0, 1, Event::Start, &mut out);
        feed_byte(&mut decoder, 10, 0x40, Event::Command(0x40), &mut out);
        out.clear();
        feed_byte(&mut decoder, 100, 0x86, Event::Data(0x86), &mut out);

        let labels: Vec<_> = out.iter().map(|a| a.label.as_str()).collect();
        assert_eq!(labels, ["b", "c", "dp"]);
        assert!(out.iter().all(|a| a.category == Category::ActiveSegment));
        assert_eq!((out[2].ss, out[2].es), (170, 180));
        assert_eq!(decoder.transmission().display, ["1."]);
    }

    #[test]
    fn auto_addressing_increments() {
        let mut decoder = Decoder::default();
        let mut out = Vec::new();
        decoder.decode(0, 1, Event::Start, &mut out);
        feed_byte(&mut decoder, 10, 0xC3, Event::Command(0xC3), &mut out);
        feed_byte(&mut decoder, 100, 0x06, Event::Data(0x06), &mut out);
        assert_eq!(decoder.transmission().current_address, 5);
        feed_byte(&mut decoder, 200, 0x5B, Event::Data(0x5B), &mut out);
        assert_eq!(decoder.transmission().current_address, 6);
        feed_byte(&mut decoder, 300, 0x4F, Event::Data(0x4F), &mut out);
        assert_eq!(decoder.transmission().current_address, 1);
        assert_eq!(decoder.transmission().display, ["1", "2", "3"]);
    }

    #[test]
    fn fixed_addressing_holds_address() {
        let mut decoder = Decoder::default();
        let mut out = Vec::new();
        decoder.decode(0, 1, Event::Start, &mut out);
        feed_byte(&mut decoder, 10, 0x44, Event::Command(0x44), &mut out);
        feed_byte(&mut decoder, 100, 0x06, Event::Data(0x06), &mut out);
        feed_byte(&mut decoder, 200, 0x06, Event::Data(0x06), &mut out);
        assert_eq!(decoder.transmission().current_address, 1);
        assert_eq!(decoder.transmission().display.len(), 2);
    }

    #[test]
    fn stop_emits_summary() {
        let mut decoder = Decoder::new(Options { decimal_point: DecimalPointStyle::Colon });
        let mut out = Vec::new();
        decoder.decode(3, 4, Event::Start, &mut out);
        feed_byte(&mut decoder, 10, 0xC0, Event::Command(0xC0), &mut out);
        feed_byte(&mut decoder, 100, 0xBF, Event::Data(0xBF), &mut out);
        feed_byte(&mut decoder, 200, 0x06, Event::Data(0x06), &mut out);
        out.clear();
        decoder.decode(290, 295, Event::Stop, &mut out);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].category, Category::DisplaySummary);
        assert_eq!(out[0].label, "Tubes: 0:1");
        assert_eq!((out[0].ss, out[0].es), (3, 295));
        assert_eq!(decoder.state(), State::Idle);
        assert_eq!(decoder.transmission(), &Transmission::default());
    }

    #[test]
    fn stop_without_data_emits_nothing() {
        let mut decoder = Decoder::default();
        let mut out = Vec::new();
        decoder.decode(0, 1, Event::Start, &mut out);
        feed_byte(&mut decoder, 10, 0x8F, Event::Command(0x8F), &mut out);
        out.clear();
        decoder.decode(100, 101, Event::Stop, &mut out);
        assert!(out.is_empty());
        assert_eq!(decoder.state(), State::Idle);
    }

    #[test]
    fn out_of_sequence_events_are_ignored() {
        let mut decoder = Decoder::default();
        let mut out = Vec::new();
        decoder.decode(0, 1, Event::Start, &mut out);
        decoder.decode(1, 2, Event::Data(0x3F), &mut out);
        decoder.decode(2, 3, Event::Start, &mut out);
        assert_eq!(decoder.state(), State::AwaitingCommand);
        assert_eq!(decoder.transmission().start_sample, 0);

        feed_byte(&mut decoder, 10, 0x40, Event::Command(0x40), &mut out);
        out.clear();
        decoder.decode(100, 101, Event::Command(0x8F), &mut out);
        assert!(out.is_empty());
        assert_eq!(decoder.state(), State::AwaitingData);
    }

    #[test]
    fn missing_bits_warns() {
        let mut decoder = Decoder::default();
        let mut out = Vec::new();
        decoder.decode(0, 1, Event::Start, &mut out);
        decoder.decode(10, 90, Event::Bits(bits_of(0x8B, 10, BIT)[..4].to_vec()), &mut out);
        decoder.decode(10, 90, Event::Command(0x8B), &mut out);

        assert_eq!(
            categories(&out),
            [Category::DisplayOn, Category::ContrastLevel, Category::Warning]
        );
        let warning = out.last().unwrap();
        assert_eq!((warning.ss, warning.es), (10, 90));
        assert_eq!(warning.label, "Warnings: missing bit timing");
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut decoder = Decoder::default();
        let mut out = Vec::new();
        decoder.decode(0, 1, Event::Start, &mut out);
        feed_byte(&mut decoder, 10, 0x40, Event::Command(0x40), &mut out);
        feed_byte(&mut decoder, 100, 0x3F, Event::Data(0x3F), &mut out);
        decoder.reset();
        assert_eq!(decoder.state(), State::Idle);
        assert!(decoder.transmission().display.is_empty());
    }
}
