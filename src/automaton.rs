use std::borrow::Cow;

use fst::Automaton;

pub enum PrefixAutomatonState {
    Sink,
    State(usize),
}

/// An automaton that matches every prefix of a marked candidate that
/// extends beyond the marker. For example, the automaton for the
/// marker *"##"* and the candidate *"tie"* will match: *"##t"*,
/// *"##ti"*, *"##tie"*, but not *""*, *"#"*, or *"##"*.
///
/// Only prefixes consisting of complete code points are
/// recognized. For example, for the string *"ë"*, *[0xc3, 0xab]*
/// is accepted, whereas *[0xc3]* is not.
pub struct PrefixAutomaton<'a> {
    text: Cow<'a, str>,
    marker_len: usize,
}

impl<'a> PrefixAutomaton<'a> {
    /// Construct the automaton for `marker + rest`.
    pub fn new(marker: &str, rest: &'a str) -> Self {
        let text = if marker.is_empty() {
            Cow::Borrowed(rest)
        } else {
            let mut text = String::with_capacity(marker.len() + rest.len());
            text.push_str(marker);
            text.push_str(rest);
            Cow::Owned(text)
        };

        PrefixAutomaton {
            text,
            marker_len: marker.len(),
        }
    }

    /// Length of the marker in bytes.
    pub fn marker_len(&self) -> usize {
        self.marker_len
    }
}

impl<'a> Automaton for PrefixAutomaton<'a> {
    type State = PrefixAutomatonState;

    fn start(&self) -> Self::State {
        PrefixAutomatonState::State(0)
    }

    fn is_match(&self, state: &Self::State) -> bool {
        match *state {
            PrefixAutomatonState::Sink => false,
            PrefixAutomatonState::State(idx) => {
                idx > self.marker_len && self.text.is_char_boundary(idx)
            }
        }
    }

    fn can_match(&self, state: &Self::State) -> bool {
        match *state {
            PrefixAutomatonState::Sink => false,
            PrefixAutomatonState::State(_) => true,
        }
    }

    fn accept(&self, state: &Self::State, byte: u8) -> Self::State {
        match *state {
            PrefixAutomatonState::Sink => PrefixAutomatonState::Sink,
            PrefixAutomatonState::State(idx) => {
                if idx == self.text.len() {
                    // Recognizing characters beyond the end of the
                    // candidate leads to the sink state.
                    PrefixAutomatonState::Sink
                } else if self.text.as_bytes()[idx] == byte {
                    PrefixAutomatonState::State(idx + 1)
                } else {
                    PrefixAutomatonState::Sink
                }
            }
        }
    }
}

impl<'a> From<&'a str> for PrefixAutomaton<'a> {
    fn from(s: &'a str) -> Self {
        PrefixAutomaton::new("", s)
    }
}
