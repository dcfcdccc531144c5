//! In-memory stand-ins for the host primitives.
//!
//! Used by the unit tests and, behind the `mock` feature, by hosts that
//! want to exercise the driver without hardware.
//!
//! - [`MockWindow`]: register window with a scripted flag register and
//!   receive queue that records every access
//! - [`MockMapper`] / [`MockRegistry`]: mapping and publication primitives
//!   that log into a shared [`EventLog`] and can be told to fail
//! - [`FaultingUser`]: caller buffer whose every copy faults

use crate::hal::endpoint::{EndpointRegistry, FileOperations, Mode, PublishError};
use crate::hal::mmio::{AddressMapper, MapError, PAGE_SIZE, RegisterWindow};
use crate::hal::user::{CopyError, UserSink, UserSource};
use crate::hw::pl011::Register;
use alloc::collections::{BTreeMap, VecDeque};
use alloc::sync::Arc;
use alloc::vec::Vec;
use spin::Mutex;

/// A single register access seen by a [`MockWindow`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Access {
    Read(usize),
    Write(usize, u32),
}

#[derive(Default)]
struct WindowState {
    accesses: Vec<Access>,
    flags: VecDeque<u32>,
    idle_flags: u32,
    rx: VecDeque<u32>,
    unmapped: bool,
}

/// Scripted PL011 register window.
///
/// Flag register reads pop values pushed with [`push_flags`](Self::push_flags)
/// and fall back to the idle value (transmitter ready, data available) once
/// the script is exhausted. Data register reads pop the receive queue.
/// Clones share the same state.
#[derive(Clone)]
pub struct MockWindow {
    state: Arc<Mutex<WindowState>>,
    len: usize,
}

impl MockWindow {
    /// One-page window.
    pub fn new() -> Self {
        Self::with_len(PAGE_SIZE)
    }

    pub fn with_len(len: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(WindowState::default())),
            len,
        }
    }

    /// Queue a value for the next unscripted flag register read.
    pub fn push_flags(&self, flags: u32) {
        self.state.lock().flags.push_back(flags);
    }

    /// Flag value returned once the script runs out.
    pub fn set_idle_flags(&self, flags: u32) {
        self.state.lock().idle_flags = flags;
    }

    /// Queue a value for the data register.
    pub fn push_rx(&self, value: u32) {
        self.state.lock().rx.push_back(value);
    }

    /// Every access in the order it happened.
    pub fn accesses(&self) -> Vec<Access> {
        self.state.lock().accesses.clone()
    }

    /// Bytes written to the data register, in order.
    pub fn transmitted(&self) -> Vec<u8> {
        self.state
            .lock()
            .accesses
            .iter()
            .filter_map(|access| match *access {
                Access::Write(offset, value) if offset == Register::Dr.offset() => {
                    Some(value as u8)
                }
                _ => None,
            })
            .collect()
    }

    /// Number of reads of the given register.
    pub fn reads_of(&self, reg: Register) -> usize {
        self.state
            .lock()
            .accesses
            .iter()
            .filter(|access| **access == Access::Read(reg.offset()))
            .count()
    }

    /// Number of writes to any register.
    pub fn write_count(&self) -> usize {
        self.state
            .lock()
            .accesses
            .iter()
            .filter(|access| matches!(access, Access::Write(..)))
            .count()
    }

    pub fn clear_accesses(&self) {
        self.state.lock().accesses.clear();
    }

    pub fn is_unmapped(&self) -> bool {
        self.state.lock().unmapped
    }

    fn set_unmapped(&self, unmapped: bool) {
        self.state.lock().unmapped = unmapped;
    }
}

impl Default for MockWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterWindow for MockWindow {
    fn len(&self) -> usize {
        self.len
    }

    fn read32(&self, offset: usize) -> u32 {
        let mut state = self.state.lock();
        assert!(!state.unmapped, "register read after unmap");
        state.accesses.push(Access::Read(offset));

        if offset == Register::Fr.offset() {
            let idle = state.idle_flags;
            state.flags.pop_front().unwrap_or(idle)
        } else if offset == Register::Dr.offset() {
            state.rx.pop_front().unwrap_or(0)
        } else {
            0
        }
    }

    fn write32(&mut self, offset: usize, value: u32) {
        let mut state = self.state.lock();
        assert!(!state.unmapped, "register write after unmap");
        state.accesses.push(Access::Write(offset, value));
    }
}

/// Lifecycle event observed by the mock collaborators.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Event {
    Mapped { paddr: usize, len: usize },
    Unmapped,
    Published { name: &'static str, mode: Mode },
    Unpublished { name: &'static str },
}

/// Ordered log shared by a [`MockMapper`] and a [`MockRegistry`].
#[derive(Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<Event>>>);

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.lock().clone()
    }

    fn push(&self, event: Event) {
        self.0.lock().push(event);
    }
}

/// Address mapper that hands out a [`MockWindow`].
pub struct MockMapper {
    events: EventLog,
    window: MockWindow,
    fail: bool,
    live: usize,
}

impl MockMapper {
    pub fn new(events: &EventLog) -> Self {
        Self::with_window(events, MockWindow::new())
    }

    pub fn with_window(events: &EventLog, window: MockWindow) -> Self {
        Self {
            events: events.clone(),
            window,
            fail: false,
            live: 0,
        }
    }

    /// Make subsequent `map` calls fail.
    pub fn set_fail(&mut self, fail: bool) {
        self.fail = fail;
    }

    /// Handle onto the window this mapper hands out.
    pub fn window(&self) -> MockWindow {
        self.window.clone()
    }

    /// Mappings not yet released.
    pub fn live_mappings(&self) -> usize {
        self.live
    }
}

impl AddressMapper for MockMapper {
    type Window = MockWindow;

    fn map(&mut self, paddr: usize, len: usize) -> Result<MockWindow, MapError> {
        if self.fail {
            return Err(MapError);
        }
        self.window.set_unmapped(false);
        self.live += 1;
        self.events.push(Event::Mapped { paddr, len });
        Ok(self.window.clone())
    }

    fn unmap(&mut self, window: MockWindow) {
        window.set_unmapped(true);
        self.live -= 1;
        self.events.push(Event::Unmapped);
    }
}

/// Handle of a node published in a [`MockRegistry`].
#[derive(Debug, PartialEq, Eq)]
pub struct MockEndpoint(&'static str);

struct Node {
    mode: Mode,
    ops: Arc<dyn FileOperations>,
}

/// Flat namespace of published nodes.
pub struct MockRegistry {
    events: EventLog,
    nodes: BTreeMap<&'static str, Node>,
    fail: bool,
}

impl MockRegistry {
    pub fn new(events: &EventLog) -> Self {
        Self {
            events: events.clone(),
            nodes: BTreeMap::new(),
            fail: false,
        }
    }

    /// Make subsequent `publish` calls fail.
    pub fn set_fail(&mut self, fail: bool) {
        self.fail = fail;
    }

    /// Handler of a published node, as a caller opening it would get.
    pub fn open(&self, name: &str) -> Option<Arc<dyn FileOperations>> {
        self.nodes.get(name).map(|node| node.ops.clone())
    }

    pub fn mode(&self, name: &str) -> Option<Mode> {
        self.nodes.get(name).map(|node| node.mode)
    }

    pub fn is_published(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }
}

impl EndpointRegistry for MockRegistry {
    type Endpoint = MockEndpoint;

    fn publish(
        &mut self,
        name: &'static str,
        mode: Mode,
        ops: Arc<dyn FileOperations>,
    ) -> Result<MockEndpoint, PublishError> {
        if self.fail || self.nodes.contains_key(name) {
            return Err(PublishError);
        }
        self.nodes.insert(name, Node { mode, ops });
        self.events.push(Event::Published { name, mode });
        Ok(MockEndpoint(name))
    }

    fn unpublish(&mut self, endpoint: MockEndpoint) {
        self.nodes.remove(endpoint.0);
        self.events.push(Event::Unpublished { name: endpoint.0 });
    }
}

/// Caller buffer that is never accessible.
pub struct FaultingUser;

impl UserSource for FaultingUser {
    fn copy_in(&self, _dst: &mut [u8]) -> Result<(), CopyError> {
        Err(CopyError)
    }
}

impl UserSink for FaultingUser {
    fn copy_out(&mut self, _src: &[u8]) -> Result<(), CopyError> {
        Err(CopyError)
    }
}
