//! Replays a JSON-lines session of calculations and cap updates.
//!
//! Each non-blank line that does not start with `#` is one operation:
//!
//! ```text
//! {"op": "compute", "request": {"totalIncome": 500000, "wht": 0, "allowances": []}}
//! {"op": "update-personal", "request": {"amount": 100000}}
//! {"op": "update-k-receipt", "request": {"amount": 20000}}
//! ```
//!
//! All operations share one registry, so an update changes the result of
//! every later calculation. Each operation produces exactly one output
//! line: the response, or `{"error": "<message>"}` when it was rejected.

use std::io::{self, BufRead, Write};

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tax_core::{ComputeRequest, TaxError, TaxService, UpdateCapRequest};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("cannot encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

/// One line of a replay script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "request", rename_all = "kebab-case")]
pub enum Operation {
    Compute(ComputeRequest),
    UpdatePersonal(UpdateCapRequest),
    UpdateKReceipt(UpdateCapRequest),
}

/// Counts of operations handled by [`Session::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub applied: usize,
    pub rejected: usize,
}

pub struct Session {
    service: TaxService,
}

impl Session {
    pub fn new(service: TaxService) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &TaxService {
        &self.service
    }

    /// Applies one operation and returns its response as JSON.
    pub fn apply(
        &self,
        operation: &Operation,
    ) -> Result<Value, TaxError> {
        let value = match operation {
            Operation::Compute(request) => serde_json::to_value(self.service.calculate(request)?),
            Operation::UpdatePersonal(request) => {
                serde_json::to_value(self.service.update_personal_deduction(request)?)
            }
            Operation::UpdateKReceipt(request) => {
                serde_json::to_value(self.service.update_k_receipt_deduction(request)?)
            }
        };
        Ok(value?)
    }

    /// Parses and applies one script line.
    ///
    /// Returns `None` for blank and comment lines. Rejections are returned
    /// as `Err` holding the `{"error": ...}` object.
    pub fn apply_line(
        &self,
        line: &str,
    ) -> Option<Result<Value, Value>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }

        let result = serde_json::from_str::<Operation>(line)
            .map_err(TaxError::from)
            .and_then(|operation| self.apply(&operation));

        Some(result.map_err(|error| {
            debug!(%error, "operation rejected");
            json!({ "error": error.to_string() })
        }))
    }

    /// Runs every line from `reader`, writing one JSON line per operation.
    pub fn run<R: BufRead, W: Write>(
        &self,
        reader: R,
        mut writer: W,
    ) -> Result<ReplaySummary, ReplayError> {
        let mut summary = ReplaySummary::default();

        for line in reader.lines() {
            let line = line?;
            let Some(outcome) = self.apply_line(&line) else {
                continue;
            };

            let value = match outcome {
                Ok(value) => {
                    summary.applied += 1;
                    value
                }
                Err(error) => {
                    summary.rejected += 1;
                    error
                }
            };
            serde_json::to_writer(&mut writer, &value)?;
            writeln!(writer)?;
        }

        writer.flush()?;
        info!(
            applied = summary.applied,
            rejected = summary.rejected,
            "replay finished"
        );
        Ok(summary)
    }
}
