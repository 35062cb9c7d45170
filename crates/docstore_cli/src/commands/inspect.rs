//! Inspect command implementation.

use super::{open_existing, CommandResult};
use docstore_core::{Format, Value, ValueKind};
use serde::Serialize;
use std::path::Path;

/// Document inspection result.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// Document path.
    pub path: String,
    /// Snapshot encoding.
    pub format: String,
    /// Persisted size in bytes.
    pub size: u64,
    /// Maximum container nesting.
    pub depth: usize,
    /// Node counts by kind.
    pub nodes: NodeCounts,
    /// Top-level keys, in document order.
    pub keys: Vec<String>,
}

/// Number of nodes of each kind.
#[derive(Debug, Default, Serialize)]
pub struct NodeCounts {
    /// Objects, including the root.
    pub objects: usize,
    /// Arrays.
    pub arrays: usize,
    /// Booleans, integers, floats and strings.
    pub scalars: usize,
}

impl NodeCounts {
    fn tally(&mut self, value: &Value) {
        match value.kind() {
            ValueKind::Object => self.objects += 1,
            ValueKind::Array => self.arrays += 1,
            _ => self.scalars += 1,
        }
        match value {
            Value::Object(entries) => entries.iter().for_each(|(_, v)| self.tally(v)),
            Value::Array(items) => items.iter().for_each(|v| self.tally(v)),
            _ => {}
        }
    }
}

/// Runs the inspect command.
pub fn run(file: &Path, format: Format, output: &str) -> CommandResult {
    let store = open_existing(file, format)?;
    let document = store.document();

    let mut nodes = NodeCounts::default();
    nodes.tally(&document);

    let result = InspectResult {
        path: file.display().to_string(),
        format: format.to_string(),
        size: store.persisted_size()?,
        depth: document.depth(),
        nodes,
        keys: document
            .as_object()
            .map(|entries| entries.iter().map(|(k, _)| k.clone()).collect())
            .unwrap_or_default(),
    };

    match output {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => {
            print_text_output(&result);
        }
    }

    Ok(())
}

fn print_text_output(result: &InspectResult) {
    println!("Document: {}", result.path);
    println!("  Format:  {}", result.format);
    println!("  Size:    {} bytes", result.size);
    println!("  Depth:   {}", result.depth);
    println!(
        "  Nodes:   {} objects, {} arrays, {} scalars",
        result.nodes.objects, result.nodes.arrays, result.nodes.scalars
    );
    println!("  Keys:    {}", result.keys.join(", "));
}
