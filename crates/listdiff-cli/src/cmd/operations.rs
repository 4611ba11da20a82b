//! `listdiff operations`: print the operation registry.

use anyhow::Result;
use listdiff_core::{LIST_OPERATIONS, Operation, ReturnShape};
use serde::Serialize;

use crate::output::{OutputMode, pretty_section, render_mode};

#[derive(Debug, Serialize)]
struct OperationRow {
    name: &'static str,
    signature: String,
    params: Vec<&'static str>,
    shape: ReturnShape,
}

impl From<&Operation> for OperationRow {
    fn from(op: &Operation) -> Self {
        Self {
            name: op.name,
            signature: op.id().to_string(),
            params: op.params.iter().map(|kind| kind.name()).collect(),
            shape: op.shape,
        }
    }
}

/// Execute `listdiff operations`.
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn run_operations(output: OutputMode) -> Result<()> {
    let rows: Vec<OperationRow> = LIST_OPERATIONS.iter().map(OperationRow::from).collect();

    render_mode(
        output,
        &rows,
        |rows, w| {
            for row in rows {
                writeln!(w, "{}\t{:?}", row.signature, row.shape)?;
            }
            Ok(())
        },
        |rows, w| {
            pretty_section(w, "Operations")?;
            for (index, row) in rows.iter().enumerate() {
                writeln!(w, "{:>3}  {:<40} {:?}", index + 1, row.signature, row.shape)?;
            }
            Ok(())
        },
    )
}
