#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use stackup::error::{DeployError, DeployResult};
use stackup::{Confirm, Invocation, Runner};

type Responder = dyn Fn(&Invocation) -> DeployResult<String>;

/// Records every invocation instead of running it. Clones share
/// the same log, so a test can keep one handle and give the
/// other to the sequencer.
#[derive(Clone)]
pub struct RecordingRunner {
    calls: Rc<RefCell<Vec<Invocation>>>,
    responder: Rc<Responder>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::responding(|_| Ok(String::new()))
    }

    pub fn responding(f: impl Fn(&Invocation) -> DeployResult<String> + 'static) -> Self {
        Self {
            calls: Rc::new(RefCell::new(Vec::new())),
            responder: Rc::new(f),
        }
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    /// Each call rendered as `program arg arg ...`.
    pub fn commands(&self) -> Vec<String> {
        self.calls.borrow().iter().map(ToString::to_string).collect()
    }

    fn record(&self, invocation: &Invocation) -> DeployResult<String> {
        self.calls.borrow_mut().push(invocation.clone());
        (self.responder)(invocation)
    }
}

impl Runner for RecordingRunner {
    fn output(&self, invocation: &Invocation) -> DeployResult<String> {
        self.record(invocation)
    }

    fn status(&self, invocation: &Invocation) -> DeployResult<()> {
        self.record(invocation).map(|_| ())
    }
}

/// Always gives the same answer and counts how often it was
/// asked.
#[derive(Clone)]
pub struct CannedConfirm {
    answer: String,
    asked: Rc<Cell<u32>>,
}

impl CannedConfirm {
    pub fn new(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            asked: Rc::new(Cell::new(0)),
        }
    }

    pub fn times_asked(&self) -> u32 {
        self.asked.get()
    }
}

impl Confirm for CannedConfirm {
    fn ask(&self, _prompt: &str) -> DeployResult<String> {
        self.asked.set(self.asked.get() + 1);
        Ok(self.answer.clone())
    }
}

pub fn failure(invocation: &Invocation) -> DeployError {
    DeployError::CommandFailed {
        command: invocation.to_string(),
        code: Some(1),
    }
}

pub const HEX_KEY: &str = "00112233445566778899aabbccddeeff00112233445566778899aabbccddeeff";
