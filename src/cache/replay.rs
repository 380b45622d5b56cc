//! Replay Module
//!
//! Reads the recorded call history of an operation and renders it as a trace.

use std::fmt;
use std::io::Write;

use serde::Serialize;
use tracing::warn;

use crate::cache::OperationKeys;
use crate::error::{CacheError, Result};
use crate::store::KeyValueStore;

// == Replay Entry ==
/// One recorded call: the argument representation and its result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayEntry {
    pub input: String,
    pub output: String,
}

// == Replay ==
/// Recorded history of one operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Replay {
    /// Operation identity
    pub operation: String,
    /// Number of recorded inputs
    pub calls: usize,
    /// Input/output pairs in call order
    pub entries: Vec<ReplayEntry>,
}

impl fmt::Display for Replay {
    /// Header line with the call count, then one line per recorded call.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} was called {} times:", self.operation, self.calls)?;
        for entry in &self.entries {
            writeln!(f, "{}(*{}) -> {}", self.operation, entry.input, entry.output)?;
        }
        Ok(())
    }
}

// == Load History ==
/// Loads the full input and output history of `operation`.
///
/// The call count is the number of recorded inputs. Entries pair inputs with
/// outputs by index and stop at the shorter list; a call interrupted between
/// its input and output records leaves the lists unequal, which is logged.
pub async fn load_history<S: KeyValueStore + ?Sized>(store: &S, operation: &str) -> Result<Replay> {
    let keys = OperationKeys::new(operation);
    let inputs = store.lrange(&keys.inputs, 0, -1).await?;
    let outputs = store.lrange(&keys.outputs, 0, -1).await?;

    if inputs.len() != outputs.len() {
        warn!(
            "{} history is uneven: {} inputs, {} outputs; replaying the first {}",
            operation,
            inputs.len(),
            outputs.len(),
            inputs.len().min(outputs.len())
        );
    }

    let calls = inputs.len();
    let entries = inputs
        .into_iter()
        .zip(outputs)
        .map(|(input, output)| ReplayEntry {
            input: String::from_utf8_lossy(&input).into_owned(),
            output: String::from_utf8_lossy(&output).into_owned(),
        })
        .collect();

    Ok(Replay {
        operation: operation.to_string(),
        calls,
        entries,
    })
}

// == Replay To ==
/// Renders the history of `operation` to `out`.
pub async fn replay_to<S, W>(store: &S, operation: &str, out: &mut W) -> Result<()>
where
    S: KeyValueStore + ?Sized,
    W: Write,
{
    let history = load_history(store, operation).await?;
    write!(out, "{}", history).map_err(|e| CacheError::Internal(e.to_string()))
}

// == Replay ==
/// Prints the history of `operation` to standard output.
pub async fn replay<S: KeyValueStore + ?Sized>(store: &S, operation: &str) -> Result<()> {
    let history = load_history(store, operation).await?;
    print!("{}", history);
    Ok(())
}
