//! Call Recorder Module
//!
//! Pre- and post-call steps that count invocations and record call history
//! for a named operation.

use tracing::debug;

use crate::error::{CacheError, Result};
use crate::store::KeyValueStore;

// == Operation Keys ==
/// Store keys holding the metadata of one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationKeys {
    /// `"{operation}:calls"`
    pub calls: String,
    /// `"{operation}:inputs"`
    pub inputs: String,
    /// `"{operation}:outputs"`
    pub outputs: String,
}

impl OperationKeys {
    pub fn new(operation: &str) -> Self {
        Self {
            calls: format!("{}:calls", operation),
            inputs: format!("{}:inputs", operation),
            outputs: format!("{}:outputs", operation),
        }
    }
}

// == Call Recorder ==
/// Counts calls and records inputs and outputs of one operation.
///
/// A wrapped call runs `count_call`, then `record_input`, then the operation
/// body, then `record_output`, so counting wraps history recording.
#[derive(Debug, Clone)]
pub struct CallRecorder {
    operation: String,
    keys: OperationKeys,
}

impl CallRecorder {
    pub fn new(operation: impl Into<String>) -> Self {
        let operation = operation.into();
        let keys = OperationKeys::new(&operation);
        Self { operation, keys }
    }

    /// Operation identity the metadata keys are derived from.
    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn keys(&self) -> &OperationKeys {
        &self.keys
    }

    /// Increments the call counter and returns the new count.
    pub async fn count_call<S: KeyValueStore + ?Sized>(&self, store: &S) -> Result<i64> {
        let calls = store.incr(&self.keys.calls).await?;
        debug!("{} call #{}", self.operation, calls);
        Ok(calls)
    }

    /// Appends the argument representation to the input history.
    pub async fn record_input<S: KeyValueStore + ?Sized>(
        &self,
        store: &S,
        args: &str,
    ) -> Result<()> {
        store.rpush(&self.keys.inputs, args.as_bytes()).await?;
        Ok(())
    }

    /// Appends the result representation to the output history.
    pub async fn record_output<S: KeyValueStore + ?Sized>(
        &self,
        store: &S,
        output: &str,
    ) -> Result<()> {
        store.rpush(&self.keys.outputs, output.as_bytes()).await?;
        Ok(())
    }
}

/// Reads a decimal counter, 0 when it was never incremented.
pub async fn read_counter<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> Result<u64> {
    let Some(raw) = store.get(key).await? else {
        return Ok(0);
    };
    std::str::from_utf8(&raw)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .ok_or_else(|| {
            CacheError::Conversion(format!("counter {} is not an integer", key))
        })
}
