//! Sinks for decision tuples.
//!
//! The orchestrator calls [`Recorder::record`] synchronously, once per
//! successful decision that asks to be recorded, before returning to the
//! caller. Recorders take `&self`: implementations that accumulate shared
//! state guard it themselves (both provided buffers use a mutex).

use std::fmt::{self, Display, Write as _};
use std::sync::{Mutex, PoisonError};

use crate::ActionIndex;

/// Receives `(context, actions, probability, key)` for each recorded decision.
///
/// Single-action decisions pass a one-element `actions` slice; ranked
/// decisions pass the full ranking. Must not mutate the context.
pub trait Recorder<C: ?Sized> {
    fn record(&self, context: &C, actions: &[ActionIndex], probability: f32, key: &str);
}

impl<C: ?Sized, F> Recorder<C> for F
where
    F: Fn(&C, &[ActionIndex], f32, &str),
{
    fn record(&self, context: &C, actions: &[ActionIndex], probability: f32, key: &str) {
        self(context, actions, probability, key)
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRecorder;

impl<C: ?Sized> Recorder<C> for NoopRecorder {
    fn record(&self, _context: &C, _actions: &[ActionIndex], _probability: f32, _key: &str) {}
}

/// Write one decision line: `<actions> <key> <probability:.5> | <context>\n`.
///
/// Ranked decisions list their actions comma-separated (`3,1,2`).
pub fn write_decision_line<W: fmt::Write, C: Display + ?Sized>(
    out: &mut W,
    context: &C,
    actions: &[ActionIndex],
    probability: f32,
    key: &str,
) -> fmt::Result {
    for (i, a) in actions.iter().enumerate() {
        if i > 0 {
            out.write_char(',')?;
        }
        write!(out, "{a}")?;
    }
    writeln!(out, " {key} {probability:.5} | {context}")
}

/// Append-only text buffer of decision lines, ready for batch upload.
#[derive(Debug, Default)]
pub struct StringRecorder {
    buf: Mutex<String>,
}

impl StringRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far.
    pub fn contents(&self) -> String {
        self.buf
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drain the buffer.
    pub fn take(&self) -> String {
        std::mem::take(&mut *self.buf.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl<C: Display + ?Sized> Recorder<C> for StringRecorder {
    fn record(&self, context: &C, actions: &[ActionIndex], probability: f32, key: &str) {
        let mut line = String::new();
        // Writing into a String cannot fail.
        let _ = write_decision_line(&mut line, context, actions, probability, key);
        self.buf
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_str(&line);
    }
}

/// One recorded interaction with an owned copy of its context.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interaction<C> {
    pub context: C,
    pub actions: Vec<ActionIndex>,
    pub probability: f32,
    pub key: String,
}

/// Keeps every interaction in memory, in recording order.
#[derive(Debug)]
pub struct VecRecorder<C> {
    items: Mutex<Vec<Interaction<C>>>,
}

impl<C> Default for VecRecorder<C> {
    fn default() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
        }
    }
}

impl<C: Clone> VecRecorder<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interactions(&self) -> Vec<Interaction<C>> {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.items.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<C: Clone> Recorder<C> for VecRecorder<C> {
    fn record(&self, context: &C, actions: &[ActionIndex], probability: f32, key: &str) {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Interaction {
                context: context.clone(),
                actions: actions.to_vec(),
                probability,
                key: key.to_string(),
            });
    }
}
