use thiserror::Error;

/// The result type for the `seqscan` crate.
pub type Result<T> = std::result::Result<T, SeqscanError>;

/// The error type for the `seqscan` crate.
#[derive(Error, Debug)]
pub struct SeqscanError {
    /// The source of the error.
    pub source: Box<SeqscanErrorKind>,
}

impl SeqscanError {
    /// Create a new `SeqscanError`.
    pub fn new(kind: SeqscanErrorKind) -> Self {
        SeqscanError {
            source: Box::new(kind),
        }
    }

    /// Get the kind of the error.
    pub fn kind(&self) -> &SeqscanErrorKind {
        &self.source
    }
}

impl std::fmt::Display for SeqscanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.source)
    }
}

/// The error kind type.
#[derive(Error, Debug)]
pub enum SeqscanErrorKind {
    /// The matching distance does not fit the 16 bit distance field of the match descriptors.
    #[error("illegal matching distance {0}, the supported maximum is 65534")]
    InvalidDistance(usize),

    /// The pattern expression could not be compiled.
    #[error("incorrect pattern ({0})")]
    InvalidPattern(PatternErrorKind),

    /// The pattern has fewer matching positions than the requested distance allows.
    #[error("pattern length {len} must be larger than the matching distance {distance}")]
    PatternTooShort {
        /// The number of matching positions of the compiled pattern.
        len: usize,
        /// The requested matching distance.
        distance: usize,
    },

    /// An allocation was refused by the configured memory limit.
    #[error("memory limit reached while growing the DFA")]
    MemoryExhausted,

    /// A value outside the ternary alphabet reached the deduplication trie.
    /// This cannot be produced by any input and indicates an implementation bug.
    #[error("illegal path value passed to the row trie")]
    InternalTrieFault,

    /// The file scanner has no underlying input source.
    #[error("no input source available")]
    IoUnavailable,

    /// The end of the input has been reached. Informational, not a failure.
    #[error("end of input reached")]
    EndOfInput,

    /// A std::io error occurred.
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

impl From<SeqscanErrorKind> for SeqscanError {
    fn from(kind: SeqscanErrorKind) -> Self {
        SeqscanError::new(kind)
    }
}

impl From<std::io::Error> for SeqscanError {
    fn from(error: std::io::Error) -> Self {
        SeqscanError::new(SeqscanErrorKind::IoError(error))
    }
}

/// The ways a pattern expression can be malformed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternErrorKind {
    /// An opening bracket inside a bracket group.
    #[error("double opening bracket")]
    DoubleOpen,

    /// A closing bracket without a matching opening bracket.
    #[error("double closing bracket")]
    DoubleClose,

    /// A character outside of `ACGTUN[]`.
    #[error("illegal character '{0}'")]
    IllegalChar(char),

    /// The expression ended inside a bracket group.
    #[error("missing closing bracket")]
    UnclosedBracket,
}
