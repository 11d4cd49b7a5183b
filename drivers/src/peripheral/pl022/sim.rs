//! Cycle-stepped model of a PL022 for host tests.
//!
//! Time advances by one tick on every register access. A frame spends
//! `shift_ticks` ticks in the shift register; when it completes, the
//! peer's reply is pushed into the RX FIFO, or dropped with the sticky
//! overrun flag set if the FIFO is full.

use super::Registers;
use crate::hw::pl022::{FIFO_DEPTH, Interrupt, Status};
use std::cell::RefCell;
use std::collections::VecDeque;

/// One observed register access.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Access {
    Status,
    RawInterrupts,
    Read(u8),
    Write(u8),
    Clear(u32),
}

/// What the device on the other end of the bus sends back.
pub enum Peer {
    /// MOSI wired to MISO.
    Loopback,
    /// Always answers the same byte.
    Fixed(u8),
    /// Answers from a script, then 0xFF.
    Script(VecDeque<u8>),
}

struct State {
    tx: VecDeque<u8>,
    rx: VecDeque<u8>,
    shifting: Option<(u8, u32)>,
    overrun: bool,
    peer: Peer,
    shift_ticks: u32,
    preemption_ticks: u32,
    accesses: Vec<Access>,
    shifted_out: Vec<u8>,
    pushed: usize,
    popped: usize,
    max_in_flight: usize,
    tx_dropped: usize,
    overrun_events: usize,
}

impl State {
    fn tick(&mut self) {
        match self.shifting.take() {
            Some((word, n)) if n > 1 => {
                self.shifting = Some((word, n - 1));
                return;
            }
            Some((word, _)) => self.complete(word),
            None => {}
        }
        if let Some(word) = self.tx.pop_front() {
            self.shifting = Some((word, self.shift_ticks));
        }
    }

    fn complete(&mut self, word: u8) {
        self.shifted_out.push(word);
        let reply = match &mut self.peer {
            Peer::Loopback => word,
            Peer::Fixed(byte) => *byte,
            Peer::Script(script) => script.pop_front().unwrap_or(0xFF),
        };
        if self.rx.len() >= FIFO_DEPTH {
            self.overrun = true;
            self.overrun_events += 1;
        } else {
            self.rx.push_back(reply);
        }
    }

    fn status(&self) -> Status {
        let mut status = Status::empty();
        status.set(Status::TFE, self.tx.is_empty());
        status.set(Status::TNF, self.tx.len() < FIFO_DEPTH);
        status.set(Status::RNE, !self.rx.is_empty());
        status.set(Status::RFF, self.rx.len() >= FIFO_DEPTH);
        status.set(Status::BSY, self.shifting.is_some() || !self.tx.is_empty());
        status
    }
}

pub struct SimPl022 {
    state: RefCell<State>,
}

impl SimPl022 {
    pub fn new() -> Self {
        Self {
            state: RefCell::new(State {
                tx: VecDeque::new(),
                rx: VecDeque::new(),
                shifting: None,
                overrun: false,
                peer: Peer::Loopback,
                shift_ticks: 2,
                preemption_ticks: 0,
                accesses: Vec::new(),
                shifted_out: Vec::new(),
                pushed: 0,
                popped: 0,
                max_in_flight: 0,
                tx_dropped: 0,
                overrun_events: 0,
            }),
        }
    }

    pub fn with_peer(self, peer: Peer) -> Self {
        self.state.borrow_mut().peer = peer;
        self
    }

    /// Ticks a frame spends in the shift register (at least 1).
    pub fn with_shift_ticks(self, ticks: u32) -> Self {
        self.state.borrow_mut().shift_ticks = ticks.max(1);
        self
    }

    /// Let the hardware run `ticks` extra ticks after every TX push, as if
    /// the CPU was taken away right after the write.
    pub fn with_preemption(self, ticks: u32) -> Self {
        self.state.borrow_mut().preemption_ticks = ticks;
        self
    }

    /// Leave stale frames in the RX FIFO, as a previous user might have.
    pub fn with_stale_rx(self, frames: &[u8]) -> Self {
        self.state.borrow_mut().rx.extend(frames);
        self
    }

    pub fn with_overrun(self) -> Self {
        self.state.borrow_mut().overrun = true;
        self
    }

    pub fn accesses(&self) -> Vec<Access> {
        self.state.borrow().accesses.clone()
    }

    pub fn clear_accesses(&self) {
        self.state.borrow_mut().accesses.clear();
    }

    /// Every frame that completed on MOSI, in order.
    pub fn shifted_out(&self) -> Vec<u8> {
        self.state.borrow().shifted_out.clone()
    }

    pub fn pushes(&self) -> usize {
        self.state.borrow().pushed
    }

    /// Largest pushed-minus-popped count seen right after a push.
    pub fn max_in_flight(&self) -> usize {
        self.state.borrow().max_in_flight
    }

    /// Pushes that hit a full TX FIFO.
    pub fn tx_dropped(&self) -> usize {
        self.state.borrow().tx_dropped
    }

    /// Frames dropped on a full RX FIFO.
    pub fn overrun_events(&self) -> usize {
        self.state.borrow().overrun_events
    }

    pub fn overrun_flag(&self) -> bool {
        self.state.borrow().overrun
    }

    pub fn rx_pending(&self) -> usize {
        self.state.borrow().rx.len()
    }

    /// Nothing queued, nothing shifting.
    pub fn is_idle(&self) -> bool {
        let state = self.state.borrow();
        state.tx.is_empty() && state.shifting.is_none()
    }
}

impl Registers for SimPl022 {
    fn status(&self) -> Status {
        let mut state = self.state.borrow_mut();
        state.tick();
        state.accesses.push(Access::Status);
        state.status()
    }

    fn raw_interrupts(&self) -> Interrupt {
        let mut state = self.state.borrow_mut();
        state.tick();
        state.accesses.push(Access::RawInterrupts);
        if state.overrun {
            Interrupt::ROR
        } else {
            Interrupt::empty()
        }
    }

    fn read_data(&mut self) -> u32 {
        let state = self.state.get_mut();
        state.tick();
        let word = match state.rx.pop_front() {
            Some(word) => {
                state.popped += 1;
                word
            }
            None => 0,
        };
        state.accesses.push(Access::Read(word));
        u32::from(word)
    }

    fn write_data(&mut self, value: u32) {
        let state = self.state.get_mut();
        state.tick();
        let word = value as u8;
        state.accesses.push(Access::Write(word));
        if state.tx.len() >= FIFO_DEPTH {
            state.tx_dropped += 1;
            return;
        }
        state.tx.push_back(word);
        state.pushed += 1;
        let in_flight = state.pushed.saturating_sub(state.popped);
        state.max_in_flight = state.max_in_flight.max(in_flight);
        for _ in 0..state.preemption_ticks {
            state.tick();
        }
    }

    fn clear_interrupts(&mut self, bits: Interrupt) {
        let state = self.state.get_mut();
        state.tick();
        state.accesses.push(Access::Clear(bits.bits()));
        if bits.contains(Interrupt::ROR) {
            state.overrun = false;
        }
    }
}
