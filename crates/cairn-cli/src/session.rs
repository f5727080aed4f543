//! Interactive allocation loop.
//!
//! A [`Session`] reads allocation sizes line by line, allocates each from
//! the arena at a fixed alignment, and reports the outcome. After
//! `reset_after` consecutive out-of-memory failures (or when the arena is
//! completely full) it offers to reset the arena. Declining ends the
//! session. Everything is an explicit loop over any `BufRead`/`Write`
//! pair, so the session runs the same against a terminal or a test script.

use std::io::{self, BufRead, Write};

use cairn::arena::align::is_valid_alignment;
use cairn::prelude::*;
use tracing::{debug, info};

/// Policy knobs for a [`Session`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Alignment passed to every allocation. Default: 8.
    pub alignment: usize,
    /// Consecutive out-of-memory failures before a reset is offered.
    /// Default: 1. Must be at least 1.
    pub reset_after: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            alignment: ArenaConfig::DEFAULT_ALIGN,
            reset_after: 1,
        }
    }
}

/// Why a session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitReason {
    /// Input reached end-of-file.
    InputClosed,
    /// The user typed `q` or `quit`.
    UserQuit,
    /// The user declined to reset a full arena.
    Declined,
}

/// Outcome of [`Session::run`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSummary {
    /// Successful allocations.
    pub allocations: u64,
    /// Allocations refused with out-of-memory.
    pub failures: u64,
    /// Resets accepted by the user.
    pub resets: u64,
    /// Spans granted since the most recent reset.
    pub live_spans: Vec<Span>,
    /// How the session ended.
    pub exit: ExitReason,
}

enum Request {
    Size(usize),
    Quit,
    Invalid(String),
    Eof,
}

/// Prompt loop bound to an input and an output stream.
pub struct Session<R, W> {
    input: R,
    output: W,
    config: SessionConfig,
    line: Vec<u8>,
}

impl<R: BufRead, W: Write> Session<R, W> {
    /// Create a session.
    ///
    /// Returns `InvalidArgument` if the alignment is not a power of two or
    /// `reset_after` is zero.
    pub fn new(input: R, output: W, config: SessionConfig) -> Result<Self, ArenaError> {
        if !is_valid_alignment(config.alignment) {
            return Err(ArenaError::InvalidArgument {
                reason: format!(
                    "alignment must be a non-zero power of two (got {})",
                    config.alignment
                ),
            });
        }
        if config.reset_after == 0 {
            return Err(ArenaError::InvalidArgument {
                reason: "reset_after must be at least 1".to_string(),
            });
        }
        Ok(Self {
            input,
            output,
            config,
            line: Vec::new(),
        })
    }

    /// Run until the input closes, the user quits, or a reset is declined.
    pub fn run(&mut self, arena: &mut Arena) -> io::Result<SessionSummary> {
        let mut allocations = 0u64;
        let mut failures = 0u64;
        let mut resets = 0u64;
        let mut live_spans = Vec::new();
        let mut consecutive_failures = 0u32;

        let exit = loop {
            // A zero-capacity arena is always "full"; resetting cannot help.
            let full = arena.capacity() > 0 && arena.remaining() == 0;
            if full || consecutive_failures >= self.config.reset_after {
                if full {
                    writeln!(self.output, "Arena is full.")?;
                }
                if let Some(exit) = self.offer_reset(arena)? {
                    break exit;
                }
                resets += 1;
                consecutive_failures = 0;
                live_spans.clear();
            }

            write!(self.output, "Enter size of memory to allocate: ")?;
            self.output.flush()?;

            let size = match self.read_request()? {
                Request::Eof => break ExitReason::InputClosed,
                Request::Quit => break ExitReason::UserQuit,
                Request::Invalid(text) => {
                    writeln!(
                        self.output,
                        "Invalid input '{text}'. Please enter an integer value."
                    )?;
                    continue;
                }
                Request::Size(0) => {
                    writeln!(
                        self.output,
                        "Allocation size cannot be 0. Please enter a valid size."
                    )?;
                    continue;
                }
                Request::Size(size) if size > arena.capacity() => {
                    writeln!(
                        self.output,
                        "Requested size ({size} bytes) exceeds the arena capacity ({} bytes). Please try again.",
                        arena.capacity()
                    )?;
                    continue;
                }
                Request::Size(size) => size,
            };

            match arena.alloc_aligned(size, self.config.alignment) {
                Ok(region) => {
                    allocations += 1;
                    consecutive_failures = 0;
                    live_spans.push(region.span());
                    writeln!(
                        self.output,
                        "Allocated {size} bytes at offset {} ({} bytes remaining).",
                        region.offset(),
                        arena.remaining()
                    )?;
                }
                Err(ArenaError::OutOfMemory {
                    requested,
                    available,
                }) => {
                    failures += 1;
                    consecutive_failures += 1;
                    writeln!(
                        self.output,
                        "Failed to allocate {requested} bytes from the arena ({available} bytes free)."
                    )?;
                }
                Err(err) => return Err(io::Error::other(err)),
            }
        };

        debug!(?exit, allocations, failures, resets, "session finished");
        Ok(SessionSummary {
            allocations,
            failures,
            resets,
            live_spans,
            exit,
        })
    }

    /// Ask whether to reset. `None` means the arena was reset.
    fn offer_reset(&mut self, arena: &mut Arena) -> io::Result<Option<ExitReason>> {
        write!(
            self.output,
            "Do you want to reset the arena to allocate more memory? (y/n): "
        )?;
        self.output.flush()?;

        let Some(answer) = self.read_line()? else {
            return Ok(Some(ExitReason::InputClosed));
        };
        match answer.as_str() {
            "y" | "Y" | "yes" => {
                arena.reset();
                info!("arena reset at user request");
                writeln!(self.output, "Arena reset. You can now allocate more memory.")?;
                Ok(None)
            }
            _ => {
                writeln!(self.output, "Exiting the program.")?;
                Ok(Some(ExitReason::Declined))
            }
        }
    }

    fn read_request(&mut self) -> io::Result<Request> {
        let Some(text) = self.read_line()? else {
            return Ok(Request::Eof);
        };
        if text == "q" || text == "quit" {
            return Ok(Request::Quit);
        }
        Ok(match text.parse::<usize>() {
            Ok(size) => Request::Size(size),
            Err(_) => Request::Invalid(text),
        })
    }

    /// Next input line, trimmed. `None` at end of input.
    ///
    /// Bytes that are not UTF-8 are replaced rather than treated as an I/O
    /// error, so garbage input is reported as invalid instead of ending the
    /// session.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        self.line.clear();
        if self.input.read_until(b'\n', &mut self.line)? == 0 {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&self.line).trim().to_string()))
    }
}
