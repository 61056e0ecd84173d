//! Compile Use Case
//!
//! Orchestrates a compilation run:
//! 1. Discover entry points under the package root
//! 2. Build the dependency graph and compute a compilation order
//! 3. Select the pending format properties of each entry point
//! 4. Transform pending formats, dependencies before dependents
//! 5. Commit one processed marker per finished entry point
//!
//! This use case is pure orchestration - format selection and ordering
//! live in domain services, I/O behind ports.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex, PoisonError};
use std::thread;

use crate::domain::entities::DependencyGraph;
use crate::domain::ports::{
    CompileEvent, CompileEventSink, EntryPointRepository, FileSystem, MarkerRepository,
    NoopEventSink, Transformer,
};
use crate::domain::services::{CompilationTask, Planner};
use crate::domain::value_objects::FormatProperty;
use crate::error::{RefitError, RefitResult};

use super::options::CompileOptions;
use super::result::CompileReport;

/// One entry point's pending work, handed to a worker thread
struct WorkItem {
    index: usize,
    name: String,
    manifest_dir: PathBuf,
    tasks: Vec<CompilationTask>,
}

/// Worker verdict reported back to the coordinator
struct WorkDone {
    index: usize,
    outcome: WorkOutcome,
}

enum WorkOutcome {
    Compiled { properties: Vec<FormatProperty> },
    Failed { error: String },
}

/// Compile use case - orchestrates the compilation flow
///
/// Parameterized by its ports, so tests can run it entirely against an
/// in-memory filesystem.
pub struct CompileUseCase<'fs, ER, MR, F, T>
where
    ER: EntryPointRepository,
    MR: MarkerRepository,
    F: FileSystem,
    T: Transformer,
{
    entry_points: ER,
    markers: MR,
    file_system: &'fs F,
    transformer: T,
}

impl<'fs, ER, MR, F, T> CompileUseCase<'fs, ER, MR, F, T>
where
    ER: EntryPointRepository + Sync,
    MR: MarkerRepository + Sync,
    F: FileSystem + Sync,
    T: Transformer + Sync,
{
    pub fn new(entry_points: ER, markers: MR, file_system: &'fs F, transformer: T) -> Self {
        Self {
            entry_points,
            markers,
            file_system,
            transformer,
        }
    }

    /// Execute the compile use case
    pub fn execute(&self, options: &CompileOptions) -> RefitResult<CompileReport> {
        self.execute_full(options, Arc::new(NoopEventSink), &AtomicBool::new(true))
    }

    /// Execute the compile use case with event reporting
    ///
    /// This method emits events during execution, enabling:
    /// - Progress reporting
    /// - JSON event streaming
    /// - Debugging and observability
    pub fn execute_with_events(
        &self,
        options: &CompileOptions,
        event_sink: Arc<dyn CompileEventSink>,
    ) -> RefitResult<CompileReport> {
        self.execute_full(options, event_sink, &AtomicBool::new(true))
    }

    /// Execute with a shared shutdown flag
    ///
    /// Clearing `running` stops dispatch of further entry points;
    /// entry points already in flight finish and commit their markers.
    pub fn execute_interruptible(
        &self,
        options: &CompileOptions,
        event_sink: Arc<dyn CompileEventSink>,
        running: Arc<AtomicBool>,
    ) -> RefitResult<CompileReport> {
        self.execute_full(options, event_sink, &running)
    }

    /// Full execute with all customization options
    fn execute_full(
        &self,
        options: &CompileOptions,
        event_sink: Arc<dyn CompileEventSink>,
        running: &AtomicBool,
    ) -> RefitResult<CompileReport> {
        let mut report = CompileReport::new();

        // Step 1: Discover entry points
        event_sink.on_event(CompileEvent::ScanStarted {
            root: options.source.clone(),
        });

        let outcome = self.entry_points.discover(&options.source)?;
        for exclusion in &outcome.exclusions {
            let reason = exclusion.error.to_string();
            event_sink.on_event(CompileEvent::EntryPointExcluded {
                path: exclusion.path.clone(),
                reason: reason.clone(),
            });
            report.add_excluded(exclusion.path.clone(), reason);
        }

        event_sink.on_event(CompileEvent::ScanCompleted {
            entry_point_count: outcome.entry_points.len(),
            excluded_count: outcome.exclusions.len(),
        });

        // Step 2: Build the graph, restrict to the target if one is set
        let mut graph = DependencyGraph::from_entry_points(outcome.entry_points);

        if let Some(target) = &options.target {
            let name = graph
                .find_by_path(target)
                .map(|ep| ep.name().to_string())
                .ok_or_else(|| RefitError::TargetNotFound {
                    path: target.clone(),
                })?;
            graph = graph
                .restricted_to(&name)
                .unwrap_or_else(DependencyGraph::new);
        }

        // Step 3: Order it. A cycle aborts the whole run.
        let order: Vec<String> = graph
            .compilation_order()?
            .into_iter()
            .map(|ep| ep.name().to_string())
            .collect();

        report.entry_point_count = order.len();
        event_sink.on_event(CompileEvent::CompileStarted {
            entry_point_count: order.len(),
        });

        // Step 4: Compile (or just report, on a dry run)
        if options.dry_run {
            self.plan_only(&graph, &order, options, &mut report);
        } else {
            self.run_pipeline(&graph, &order, options, &event_sink, running, &mut report);
        }

        if !running.load(Ordering::SeqCst) {
            report.interrupted = true;
            event_sink.on_event(CompileEvent::Interrupted);
        }

        event_sink.on_event(CompileEvent::Completed {
            compiled_count: report.compiled.len(),
            up_to_date_count: report.up_to_date.len(),
            failed_count: report.failed.len(),
            skipped_count: report.skipped.len(),
        });

        Ok(report)
    }

    /// Dry run: record what a real run would compile, write nothing
    fn plan_only(
        &self,
        graph: &DependencyGraph,
        order: &[String],
        options: &CompileOptions,
        report: &mut CompileReport,
    ) {
        for name in order {
            let Some(ep) = graph.get(name) else { continue };
            let pending =
                Planner::pending_properties(ep, &options.properties, &options.compiler_version);
            if pending.is_empty() {
                report.add_up_to_date(name.clone());
            } else {
                report.add_compiled(name.clone(), pending);
            }
        }
    }

    /// Drive the worker pool over the ordered entry points.
    ///
    /// The coordinator owns the schedule: an entry point becomes ready
    /// once every graph dependency reached a terminal state, and ready
    /// entry points dispatch in compilation-order position, so runs are
    /// deterministic at any worker count. A failure marks all transitive
    /// dependents skipped without stopping independent subtrees.
    fn run_pipeline(
        &self,
        graph: &DependencyGraph,
        order: &[String],
        options: &CompileOptions,
        event_sink: &Arc<dyn CompileEventSink>,
        running: &AtomicBool,
        report: &mut CompileReport,
    ) {
        let index_of: BTreeMap<&str, usize> = order
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i))
            .collect();

        // remaining[i] counts unfinished dependencies of order[i];
        // dependents[i] lists the indices waiting on order[i]
        let mut remaining = vec![0usize; order.len()];
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); order.len()];
        for (i, name) in order.iter().enumerate() {
            let Some(ep) = graph.get(name) else { continue };
            for dep in graph.internal_deps(ep) {
                if let Some(&dep_index) = index_of.get(dep) {
                    remaining[i] += 1;
                    dependents[dep_index].push(i);
                }
            }
        }

        let jobs = options.jobs.max(1);
        let (task_tx, task_rx) = mpsc::channel::<WorkItem>();
        let task_rx = Arc::new(Mutex::new(task_rx));
        let (done_tx, done_rx) = mpsc::channel::<WorkDone>();

        thread::scope(|scope| {
            for _ in 0..jobs {
                let task_rx = Arc::clone(&task_rx);
                let done_tx = done_tx.clone();
                let event_sink = Arc::clone(event_sink);
                scope.spawn(move || loop {
                    let received = {
                        let guard = task_rx.lock().unwrap_or_else(PoisonError::into_inner);
                        guard.recv()
                    };
                    let Ok(item) = received else { break };
                    let index = item.index;
                    let outcome = self.compile_entry_point(item, options, &event_sink);
                    if done_tx.send(WorkDone { index, outcome }).is_err() {
                        break;
                    }
                });
            }
            // Workers hold their own clones; the coordinator must not.
            drop(done_tx);

            let mut ready: BTreeSet<usize> = remaining
                .iter()
                .enumerate()
                .filter(|(_, count)| **count == 0)
                .map(|(i, _)| i)
                .collect();
            let mut done = vec![false; order.len()];
            let mut in_flight = 0usize;

            loop {
                while in_flight < jobs && running.load(Ordering::SeqCst) {
                    let Some(&index) = ready.iter().next() else { break };
                    ready.remove(&index);

                    let name = &order[index];
                    let Some(ep) = graph.get(name) else {
                        done[index] = true;
                        continue;
                    };
                    let tasks =
                        Planner::plan(ep, &options.properties, &options.compiler_version);
                    if tasks.is_empty() {
                        event_sink.on_event(CompileEvent::EntryPointUpToDate {
                            index,
                            name: name.clone(),
                        });
                        report.add_up_to_date(name.clone());
                        done[index] = true;
                        release_dependents(index, &dependents, &mut remaining, &done, &mut ready);
                        continue;
                    }

                    let item = WorkItem {
                        index,
                        name: name.clone(),
                        manifest_dir: ep.path().to_path_buf(),
                        tasks,
                    };
                    if task_tx.send(item).is_err() {
                        break;
                    }
                    in_flight += 1;
                }

                if in_flight == 0 {
                    break;
                }

                let Ok(finished) = done_rx.recv() else { break };
                in_flight -= 1;
                let index = finished.index;
                done[index] = true;
                let name = &order[index];

                match finished.outcome {
                    WorkOutcome::Compiled { properties } => {
                        report.add_compiled(name.clone(), properties);
                        release_dependents(index, &dependents, &mut remaining, &done, &mut ready);
                    }
                    WorkOutcome::Failed { error } => {
                        report.add_failed(name.clone(), error);
                        skip_dependents(
                            index,
                            order,
                            &dependents,
                            &mut done,
                            &mut ready,
                            event_sink,
                            report,
                        );
                    }
                }
            }

            // Closing the task channel lets idle workers exit recv()
            drop(task_tx);
        });
    }

    /// Compile every pending format of one entry point, then commit its
    /// marker. Runs on a worker thread.
    fn compile_entry_point(
        &self,
        item: WorkItem,
        options: &CompileOptions,
        event_sink: &Arc<dyn CompileEventSink>,
    ) -> WorkOutcome {
        let WorkItem {
            index,
            name,
            manifest_dir,
            tasks,
        } = item;

        event_sink.on_event(CompileEvent::EntryPointStarted {
            index,
            name: name.clone(),
        });

        let mut compiled = Vec::with_capacity(tasks.len());
        for task in tasks {
            let output = match self
                .transformer
                .transform(&task.source, task.format, self.file_system)
            {
                Ok(output) => output,
                Err(e) => {
                    let error = RefitError::Transformation {
                        entry_point: name.clone(),
                        property: task.property.as_str().to_string(),
                        message: e.to_string(),
                    };
                    return fail_entry_point(event_sink, index, &name, error.to_string());
                }
            };

            // A no-op transform writes nothing; the marker still advances.
            let unchanged = self
                .file_system
                .read(&task.source)
                .map(|current| current == output)
                .unwrap_or(false);
            if !unchanged {
                if let Err(e) = self.file_system.write(&task.source, &output) {
                    return fail_entry_point(
                        event_sink,
                        index,
                        &name,
                        RefitError::from(e).to_string(),
                    );
                }
            }

            if event_sink.wants_detailed_events() {
                event_sink.on_event(CompileEvent::PropertyCompiled {
                    index,
                    name: name.clone(),
                    property: task.property.as_str().to_string(),
                    format: task.format.to_string(),
                });
            }
            compiled.push(task.property);
        }

        if let Err(e) = self
            .markers
            .commit(&manifest_dir, &compiled, &options.compiler_version)
        {
            return fail_entry_point(event_sink, index, &name, e.to_string());
        }

        event_sink.on_event(CompileEvent::EntryPointCompiled {
            index,
            name,
            properties: compiled.iter().map(|p| p.as_str().to_string()).collect(),
        });

        WorkOutcome::Compiled {
            properties: compiled,
        }
    }
}

fn fail_entry_point(
    event_sink: &Arc<dyn CompileEventSink>,
    index: usize,
    name: &str,
    error: String,
) -> WorkOutcome {
    event_sink.on_event(CompileEvent::EntryPointFailed {
        index,
        name: name.to_string(),
        error: error.clone(),
    });
    WorkOutcome::Failed { error }
}

fn release_dependents(
    index: usize,
    dependents: &[Vec<usize>],
    remaining: &mut [usize],
    done: &[bool],
    ready: &mut BTreeSet<usize>,
) {
    for &dependent in &dependents[index] {
        if done[dependent] {
            continue;
        }
        remaining[dependent] = remaining[dependent].saturating_sub(1);
        if remaining[dependent] == 0 {
            ready.insert(dependent);
        }
    }
}

/// Mark every transitive dependent of a failed entry point skipped.
/// Each skip names the direct dependency that took it down.
fn skip_dependents(
    failed: usize,
    order: &[String],
    dependents: &[Vec<usize>],
    done: &mut [bool],
    ready: &mut BTreeSet<usize>,
    event_sink: &Arc<dyn CompileEventSink>,
    report: &mut CompileReport,
) {
    let mut queue = VecDeque::from([failed]);
    while let Some(current) = queue.pop_front() {
        for &dependent in &dependents[current] {
            if done[dependent] {
                continue;
            }
            done[dependent] = true;
            ready.remove(&dependent);
            event_sink.on_event(CompileEvent::EntryPointSkipped {
                index: dependent,
                name: order[dependent].clone(),
                dependency: order[current].clone(),
            });
            report.add_skipped(order[dependent].clone(), order[current].clone());
            queue.push_back(dependent);
        }
    }
}
