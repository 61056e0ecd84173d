//! NDJSON event stream
//!
//! One JSON object per line per event, for CI and tooling consumers.
//! Lines go out through a mutex so parallel workers never interleave.

use std::io::{self, Write};
use std::sync::Mutex;

use serde_json::{json, Value};

use crate::domain::ports::{CompileEvent, CompileEventSink};

pub struct JsonEventSink {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonEventSink {
    pub fn stdout() -> Self {
        Self::sink_into(Box::new(io::stdout()))
    }

    /// Stream into any writer; tests capture output this way.
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self::sink_into(Box::new(writer))
    }

    fn sink_into(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }
}

impl CompileEventSink for JsonEventSink {
    fn on_event(&self, event: CompileEvent) {
        let mut line = payload(event);
        line["command"] = Value::from("compile");
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{line}");
            let _ = writer.flush();
        }
    }

    // machine consumers want the full stream
    fn wants_detailed_events(&self) -> bool {
        true
    }
}

/// Event-specific fields; the shared `command` tag is stamped afterwards.
fn payload(event: CompileEvent) -> Value {
    use CompileEvent::*;

    match event {
        ScanStarted { root } => json!({
            "event": "scan_start",
            "root": root.display().to_string(),
        }),
        ScanCompleted {
            entry_point_count,
            excluded_count,
        } => json!({
            "event": "scan_complete",
            "entry_points": entry_point_count,
            "excluded": excluded_count,
        }),
        EntryPointExcluded { path, reason } => json!({
            "event": "excluded",
            "path": path.display().to_string(),
            "reason": reason,
        }),
        CompileStarted { entry_point_count } => json!({
            "event": "start",
            "entry_points": entry_point_count,
        }),
        EntryPointStarted { index, name } => json!({
            "event": "item_start",
            "index": index,
            "name": name,
        }),
        PropertyCompiled {
            index,
            name,
            property,
            format,
        } => json!({
            "event": "item_property",
            "index": index,
            "name": name,
            "property": property,
            "format": format,
        }),
        EntryPointCompiled {
            index,
            name,
            properties,
        } => json!({
            "event": "item_compiled",
            "index": index,
            "name": name,
            "properties": properties,
        }),
        EntryPointUpToDate { index, name } => json!({
            "event": "item_up_to_date",
            "index": index,
            "name": name,
        }),
        EntryPointFailed { index, name, error } => json!({
            "event": "item_error",
            "index": index,
            "name": name,
            "error": error,
        }),
        EntryPointSkipped {
            index,
            name,
            dependency,
        } => json!({
            "event": "item_skipped",
            "index": index,
            "name": name,
            "dependency": dependency,
        }),
        Interrupted => json!({ "event": "interrupted" }),
        Completed {
            compiled_count,
            up_to_date_count,
            failed_count,
            skipped_count,
        } => {
            let status = if failed_count == 0 && skipped_count == 0 {
                "success"
            } else {
                "partial"
            };
            json!({
                "event": "complete",
                "status": status,
                "compiled": compiled_count,
                "up_to_date": up_to_date_count,
                "failed": failed_count,
                "skipped": skipped_count,
            })
        }
    }
}
