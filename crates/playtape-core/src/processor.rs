//! Batch processor
//!
//! Applies a list of raw command records to a store, one pass, in order.
//! A failed command never stops the run: its error is recorded and the next
//! command is attempted. A command that depends on an earlier failed one will
//! usually fail too, since it runs against whatever state the store is in.
//!
//! ```ignore
//! let mut processor = BatchProcessor::new(records, &mut store);
//! if let Err(e) = processor.process_all() {
//!     for failure in processor.errors() {
//!         eprintln!("{}", failure);
//!     }
//! }
//! ```

use std::fmt;

use tracing::{debug, info, warn};

use crate::changes::Record;
use crate::command::dispatch;
use crate::error::{BatchError, CommandError};
use crate::store::Store;

/// A command that failed during a batch run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFailure {
    /// Position of the command in the batch (0-based)
    pub index: usize,
    pub error: CommandError,
}

impl fmt::Display for CommandFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "command #{}: {}", self.index + 1, self.error)
    }
}

/// Runs a batch of commands against one store
pub struct BatchProcessor<'a> {
    commands: Vec<Record>,
    store: &'a mut Store,
    errors: Vec<CommandFailure>,
    succeeded: usize,
}

impl<'a> BatchProcessor<'a> {
    pub fn new(commands: Vec<Record>, store: &'a mut Store) -> Self {
        Self {
            commands,
            store,
            errors: Vec::new(),
            succeeded: 0,
        }
    }

    /// Apply every command, collecting failures
    ///
    /// Errors from a previous run are discarded first. Running again replays
    /// the same commands against the store as it is now.
    pub fn process_all(&mut self) -> Result<(), BatchError> {
        self.errors.clear();
        self.succeeded = 0;

        for (index, record) in self.commands.iter().enumerate() {
            match dispatch(self.store, record.as_slice()) {
                Ok(applied) => {
                    debug!("Applied command #{} {:?}: {:?}", index + 1, record, applied);
                    self.succeeded += 1;
                }
                Err(error) => {
                    warn!("Command #{} failed: {}", index + 1, error);
                    self.errors.push(CommandFailure { index, error });
                }
            }
        }

        info!(
            "Batch complete: {} applied, {} failed",
            self.succeeded,
            self.errors.len()
        );

        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(BatchError {
                failed: self.errors.len(),
                total: self.commands.len(),
            })
        }
    }

    /// Failures from the last run, in command order
    pub fn errors(&self) -> &[CommandFailure] {
        &self.errors
    }

    /// Number of commands applied in the last run
    pub fn succeeded(&self) -> usize {
        self.succeeded
    }

    pub fn commands(&self) -> &[Record] {
        &self.commands
    }
}
