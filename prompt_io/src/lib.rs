//! Line-oriented console input shared by the learner programs.
//!
//! Interactive programs read one line per prompt through a [`LineSource`]. The
//! binaries use [`EditorInput`] when attached to a terminal and [`PipedInput`]
//! otherwise; tests drive the same code with [`ScriptedInput`].
//!
//! Closing the stream (Ctrl+D) or interrupting it (Ctrl+C) is not a failure.
//! Both surface as the [`InputClosed`] error so callers can finish gracefully
//! while still propagating real I/O errors with `?`.

mod input;
pub mod logging;

pub use input::{EditorInput, InputClosed, LineSource, PipedInput, ScriptedInput, is_input_closed};
