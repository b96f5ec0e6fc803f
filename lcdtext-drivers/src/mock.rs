//! Recording bus, lines and delay for driver tests

use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use lcdtext_hal::{OutputPin, SpiBus};

/// What the controller would have seen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Byte written with D/C low
    Command(u8),
    /// Transfer written with D/C high
    Data(Vec<u8>),
    /// Reset line level
    Reset(bool),
    /// Delay in milliseconds
    DelayMs(u32),
}

#[derive(Default)]
struct WireState {
    events: Vec<Event>,
    dc_high: bool,
    fail_bus: bool,
}

/// Shared recording of everything sent to the panel
#[derive(Clone, Default)]
pub struct Wire(Rc<RefCell<WireState>>);

impl Wire {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bus(&self) -> MockBus {
        MockBus(self.clone())
    }

    pub fn dc(&self) -> MockDc {
        MockDc(self.clone())
    }

    pub fn rst(&self) -> MockRst {
        MockRst(self.clone())
    }

    pub fn delay(&self) -> MockDelay {
        MockDelay(self.clone())
    }

    /// Make every following bus transfer fail
    pub fn break_bus(&self) {
        self.0.borrow_mut().fail_bus = true;
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().events.clone()
    }

    /// Drain the recording
    pub fn take(&self) -> Vec<Event> {
        std::mem::take(&mut self.0.borrow_mut().events)
    }

    /// Command bytes only, in order
    pub fn commands(&self) -> Vec<u8> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Command(c) => Some(c),
                _ => None,
            })
            .collect()
    }

    /// All data transfers concatenated
    pub fn data_bytes(&self) -> Vec<u8> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Data(d) => Some(d),
                _ => None,
            })
            .flatten()
            .collect()
    }

    fn push(&self, event: Event) {
        self.0.borrow_mut().events.push(event);
    }
}

pub struct MockBus(Wire);

impl SpiBus for MockBus {
    type Error = &'static str;

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        let mut state = self.0 .0.borrow_mut();
        if state.fail_bus {
            return Err("bus down");
        }
        if state.dc_high {
            state.events.push(Event::Data(data.to_vec()));
        } else {
            state.events.extend(data.iter().map(|&b| Event::Command(b)));
        }
        Ok(())
    }
}

pub struct MockDc(Wire);

impl OutputPin for MockDc {
    type Error = &'static str;

    fn set(&mut self, high: bool) -> Result<(), Self::Error> {
        self.0 .0.borrow_mut().dc_high = high;
        Ok(())
    }
}

pub struct MockRst(Wire);

impl OutputPin for MockRst {
    type Error = &'static str;

    fn set(&mut self, high: bool) -> Result<(), Self::Error> {
        self.0.push(Event::Reset(high));
        Ok(())
    }
}

pub struct MockDelay(Wire);

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.push(Event::DelayMs(ns / 1_000_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.0.push(Event::DelayMs(ms));
    }
}
