use super::buffer::DEFAULT_CAPACITY;

/// What may directly follow a numeric literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberTerminators {
    /// Only whitespace, a line break, or end of input. `5+3` is an illegal number.
    #[default]
    Strict,
    /// Anything except a letter, digit, `_` or quote. `5+3` lexes as `5`, `+`, `3`.
    Relaxed,
}

/// How unterminated strings and block comments are treated at end of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EndOfInputPolicy {
    /// The construct silently ends where the input does.
    #[default]
    Lenient,
    /// The construct is reported as an error.
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexerConfig {
    pub buffer_capacity: usize,
    pub number_terminators: NumberTerminators,
    pub end_of_input: EndOfInputPolicy,
}

impl Default for LexerConfig {
    fn default() -> Self {
        LexerConfig {
            buffer_capacity: DEFAULT_CAPACITY,
            number_terminators: NumberTerminators::default(),
            end_of_input: EndOfInputPolicy::default(),
        }
    }
}

impl LexerConfig {
    /// Block size used by the double buffer. Clamped to at least one byte.
    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity.max(1);
        self
    }

    pub fn with_number_terminators(mut self, terminators: NumberTerminators) -> Self {
        self.number_terminators = terminators;
        self
    }

    pub fn with_end_of_input(mut self, policy: EndOfInputPolicy) -> Self {
        self.end_of_input = policy;
        self
    }
}
