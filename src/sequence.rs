use crate::types::State;
use heapless::Vec;

/// An ordered list of states, replayed `repeat` times.
///
/// Sequences are compiled-in configuration, so the state list is a `'static`
/// slice. A sequence flagged `remove_when_done` is dropped from the live list
/// once its repeats are exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sequence {
    states: &'static [State],
    repeat: u32,
    remove_when_done: bool,
}

impl Sequence {
    /// Creates a sequence. Validation happens when the configuration is built.
    pub const fn new(states: &'static [State], repeat: u32, remove_when_done: bool) -> Self {
        Self {
            states,
            repeat,
            remove_when_done,
        }
    }

    /// Returns the states in playback order.
    pub const fn states(&self) -> &'static [State] {
        self.states
    }

    /// Returns the number of states in one pass.
    pub const fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns true if the sequence has no states.
    pub const fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Returns the configured repeat count.
    pub const fn repeat(&self) -> u32 {
        self.repeat
    }

    /// Returns the number of passes actually played. A repeat of 0 plays once.
    pub const fn passes(&self) -> u32 {
        if self.repeat == 0 { 1 } else { self.repeat }
    }

    /// Returns true if the sequence leaves the live list after its last pass.
    pub const fn remove_when_done(&self) -> bool {
        self.remove_when_done
    }

    /// Returns the state at `index`.
    pub fn get(&self, index: usize) -> Option<State> {
        self.states.get(index).copied()
    }
}

/// The engine's position within the live sequence list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cursor {
    /// Index into the live sequence list.
    pub sequence: usize,
    /// Index into the current sequence's states.
    pub state: usize,
    /// Completed passes of the current sequence.
    pub repeat: u32,
    /// Number of sequences still in the live list.
    pub live: usize,
}

impl Cursor {
    /// Returns true at the very start of the sequence list.
    pub fn is_origin(&self) -> bool {
        self.sequence == 0 && self.state == 0 && self.repeat == 0
    }
}

/// What a call to [`SequenceEngine::advance`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Advance {
    /// Moved to the next state in the same pass.
    State,
    /// Started another pass of the same sequence.
    Repeat,
    /// Moved to the next sequence in the list.
    Sequence,
    /// Dropped the finished sequence; the one after it now holds its slot.
    Removed,
    /// The cursor was inconsistent and went back to the origin.
    Reset,
}

/// Steps through a list of sequences one state at a time.
///
/// # Type Parameters
/// * `S` - Maximum number of sequences in the list
#[derive(Debug, Clone)]
pub struct SequenceEngine<const S: usize> {
    configured: Vec<Sequence, S>,
    live: Vec<Sequence, S>,
    cursor: Cursor,
}

impl<const S: usize> SequenceEngine<S> {
    /// Creates an engine positioned at the first state of the first sequence.
    ///
    /// The list is expected to come from a validated configuration. An engine
    /// over an empty list reports no current state.
    pub fn new(sequences: Vec<Sequence, S>) -> Self {
        let live = sequences.clone();
        let cursor = Cursor {
            live: live.len(),
            ..Cursor::default()
        };
        Self {
            configured: sequences,
            live,
            cursor,
        }
    }

    /// Returns a snapshot of the cursor.
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Returns the number of sequences still in the live list.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Returns the live sequences in playback order.
    pub fn sequences(&self) -> &[Sequence] {
        &self.live
    }

    /// Returns the sequence under the cursor.
    pub fn current_sequence(&self) -> Option<&Sequence> {
        self.live.get(self.cursor.sequence)
    }

    /// Returns the state under the cursor, or `None` if the cursor is inconsistent.
    pub fn current_state(&self) -> Option<State> {
        if !self.is_consistent() {
            return None;
        }
        self.current_sequence()?.get(self.cursor.state)
    }

    /// Checks every cursor invariant against the live list.
    pub fn is_consistent(&self) -> bool {
        let Some(sequence) = self.live.get(self.cursor.sequence) else {
            return false;
        };
        self.cursor.live == self.live.len()
            && self.cursor.state < sequence.len()
            && self.cursor.repeat < sequence.passes()
    }

    /// Moves the cursor forward by exactly one state.
    ///
    /// Finishing the last pass of a `remove_when_done` sequence removes it
    /// from the live list. Later entries shift down one slot and the cursor
    /// stays on the vacated index, so the following sequence plays next.
    pub fn advance(&mut self) -> Advance {
        if !self.is_consistent() {
            error!("cursor inconsistent, resetting to origin");
            self.reset();
            return Advance::Reset;
        }
        let sequence = self.live[self.cursor.sequence];

        self.cursor.state += 1;
        if self.cursor.state < sequence.len() {
            return Advance::State;
        }

        self.cursor.state = 0;
        self.cursor.repeat += 1;
        if self.cursor.repeat < sequence.passes() {
            return Advance::Repeat;
        }

        self.cursor.repeat = 0;
        if sequence.remove_when_done() && self.live.len() > 1 {
            self.live.remove(self.cursor.sequence);
            self.cursor.live = self.live.len();
            if self.cursor.sequence >= self.live.len() {
                self.cursor.sequence = 0;
            }
            debug!(
                "sequence removed, {} live, now at {}",
                self.cursor.live,
                self.cursor.sequence
            );
            return Advance::Removed;
        }

        self.cursor.sequence += 1;
        if self.cursor.sequence >= self.live.len() {
            self.cursor.sequence = 0;
        }
        Advance::Sequence
    }

    /// Restores the full configured list and moves the cursor to the origin.
    pub fn reset(&mut self) {
        self.live = self.configured.clone();
        self.cursor = Cursor {
            live: self.live.len(),
            ..Cursor::default()
        };
    }
}
