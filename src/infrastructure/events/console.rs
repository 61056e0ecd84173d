//! Console Event Sink
//!
//! Human-readable progress lines for interactive runs.

use crate::domain::ports::{CompileEvent, CompileEventSink};

/// Event sink that prints progress to stdout
pub struct ConsoleEventSink {
    verbose: bool,
}

impl ConsoleEventSink {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl CompileEventSink for ConsoleEventSink {
    fn on_event(&self, event: CompileEvent) {
        match event {
            CompileEvent::ScanStarted { root } => {
                if self.verbose {
                    println!("🔍 Scanning {}", root.display());
                }
            }

            CompileEvent::ScanCompleted {
                entry_point_count,
                excluded_count,
            } => {
                if excluded_count > 0 {
                    println!(
                        "✓ Found {} entry points ({} excluded)",
                        entry_point_count, excluded_count
                    );
                } else {
                    println!("✓ Found {} entry points", entry_point_count);
                }
            }

            CompileEvent::EntryPointExcluded { path, reason } => {
                println!("  ⚠ Excluded {}: {}", path.display(), reason);
            }

            CompileEvent::CompileStarted { entry_point_count } => {
                println!("✓ Processing {} entry points in dependency order", entry_point_count);
            }

            CompileEvent::EntryPointStarted { index, name } => {
                if self.verbose {
                    println!("  [{}] {} ...", index, name);
                }
            }

            CompileEvent::PropertyCompiled {
                name,
                property,
                format,
                ..
            } => {
                if self.verbose {
                    println!("    - {} {}: {}", name, property, format);
                }
            }

            CompileEvent::EntryPointCompiled {
                name, properties, ..
            } => {
                println!("  ✓ {} [{}]", name, properties.join(", "));
            }

            CompileEvent::EntryPointUpToDate { name, .. } => {
                if self.verbose {
                    println!("  = {} up to date", name);
                }
            }

            CompileEvent::EntryPointFailed { name, error, .. } => {
                println!("  ✗ {}: {}", name, error);
            }

            CompileEvent::EntryPointSkipped {
                name, dependency, ..
            } => {
                println!("  ⚠ {} skipped (dependency {} failed)", name, dependency);
            }

            CompileEvent::Interrupted => {
                println!("⚠ Interrupted: finishing in-flight entry points");
            }

            CompileEvent::Completed {
                compiled_count,
                up_to_date_count,
                failed_count,
                skipped_count,
            } => {
                println!("\n📊 Results:");
                println!("  ✓ Compiled: {}", compiled_count);
                println!("  = Up to date: {}", up_to_date_count);
                if failed_count > 0 {
                    println!("  ✗ Failed: {}", failed_count);
                }
                if skipped_count > 0 {
                    println!("  ⚠ Skipped: {}", skipped_count);
                }
            }
        }
    }

    fn wants_detailed_events(&self) -> bool {
        self.verbose
    }
}
