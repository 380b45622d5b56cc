//! Cache Module
//!
//! Random-key storage with call counting, call-history recording and replay.

mod instrumented;
mod recorder;
mod replay;
mod value;


// Re-export public types
pub use instrumented::{InstrumentedCache, STORE_OPERATION};
pub use recorder::{read_counter, CallRecorder, OperationKeys};
pub use replay::{load_history, replay, replay_to, Replay, ReplayEntry};
pub use value::StoredValue;
