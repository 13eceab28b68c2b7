//! Completion tracking for a batch of independent asynchronous loads.
//!
//! Loads are registered up front with [`LoadCoordinator::register`]. Running the
//! coordinator consumes it, so nothing can be registered once the gate is being
//! evaluated. The completion callback fires exactly once, after every
//! registered load has settled, whether it succeeded or not.

use std::{cell::RefCell, fmt::Display, future::Future, rc::Rc};

use futures::{
    FutureExt, StreamExt,
    future::LocalBoxFuture,
    stream::FuturesUnordered,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Succeeded,
    Failed,
}

/// Bookkeeping of a single registered load.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadTask {
    pub label: String,
    pub loaded: u64,
    /// Unknown until the source announces a length.
    pub total: Option<u64>,
    pub state: TaskState,
}

impl LoadTask {
    fn new(label: String) -> Self {
        Self {
            label,
            loaded: 0,
            total: None,
            state: TaskState::Pending,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.state != TaskState::Pending
    }
}

type TaskList = Rc<RefCell<Vec<LoadTask>>>;

/// Byte progress reporter handed to each registered load.
///
/// Progress is advisory: it is logged but has no influence on completion.
#[derive(Clone, Default)]
pub struct Progress {
    slot: Option<(TaskList, usize)>,
}

impl Progress {
    /// A reporter that is not attached to any coordinator.
    pub fn detached() -> Self {
        Self::default()
    }

    pub fn report(&self, loaded: u64, total: Option<u64>) {
        let Some((tasks, index)) = &self.slot else {
            return;
        };
        let mut tasks = tasks.borrow_mut();
        if let Some(task) = tasks.get_mut(*index) {
            task.loaded = loaded;
            task.total = total.or(task.total);
            log::debug!("{}: {} {:?}", task.label, task.loaded, task.total);
        }
        let (loaded, total) = tasks.iter().fold((0, 0), |(loaded, total), task| {
            (loaded + task.loaded, total + task.total.unwrap_or(task.loaded))
        });
        log::debug!("overall: {loaded}/{total} bytes");
    }
}

/// Result of one load, in registration order.
#[derive(Debug)]
pub struct TaskOutcome<T, E> {
    pub label: String,
    pub result: Result<T, E>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadSummary {
    pub registered: usize,
    pub succeeded: usize,
    pub failed: usize,
}

type CompletionCallback<T, E> = Box<dyn FnOnce(Vec<TaskOutcome<T, E>>)>;

pub struct LoadCoordinator<T, E> {
    tasks: TaskList,
    pending: FuturesUnordered<LocalBoxFuture<'static, (usize, Result<T, E>)>>,
    on_all_complete: Option<CompletionCallback<T, E>>,
}

impl<T: 'static, E: Display + 'static> Default for LoadCoordinator<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static, E: Display + 'static> LoadCoordinator<T, E> {
    pub fn new() -> Self {
        Self {
            tasks: Rc::new(RefCell::new(Vec::new())),
            pending: FuturesUnordered::new(),
            on_all_complete: None,
        }
    }

    /// Registers a load and returns its index.
    ///
    /// `start` receives the task's progress reporter. The future it returns is
    /// not polled before [`LoadCoordinator::run`].
    pub fn register<F, Fut>(&mut self, label: impl Into<String>, start: F) -> usize
    where
        F: FnOnce(Progress) -> Fut,
        Fut: Future<Output = Result<T, E>> + 'static,
    {
        let index = {
            let mut tasks = self.tasks.borrow_mut();
            tasks.push(LoadTask::new(label.into()));
            tasks.len() - 1
        };
        let progress = Progress {
            slot: Some((Rc::clone(&self.tasks), index)),
        };
        let future = start(progress);
        self.pending
            .push(async move { (index, future.await) }.boxed_local());
        index
    }

    /// Sets the callback invoked once every registered load has settled.
    pub fn on_all_complete(&mut self, callback: impl FnOnce(Vec<TaskOutcome<T, E>>) + 'static) {
        self.on_all_complete = Some(Box::new(callback));
    }

    pub fn len(&self) -> usize {
        self.tasks.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn tasks(&self) -> Vec<LoadTask> {
        self.tasks.borrow().clone()
    }

    /// Drives every registered load to completion and fires the callback.
    ///
    /// Returns `None` without firing anything when nothing was registered.
    pub async fn run(mut self) -> Option<LoadSummary> {
        let registered = self.len();
        if registered == 0 {
            log::warn!("no loads registered, completion will never fire");
            return None;
        }

        let mut outcomes: Vec<Option<Result<T, E>>> = (0..registered).map(|_| None).collect();
        let mut summary = LoadSummary {
            registered,
            succeeded: 0,
            failed: 0,
        };
        while let Some((index, result)) = self.pending.next().await {
            let mut tasks = self.tasks.borrow_mut();
            let task = &mut tasks[index];
            debug_assert!(!task.is_terminal(), "load `{}` settled twice", task.label);
            match &result {
                Ok(_) => {
                    task.state = TaskState::Succeeded;
                    summary.succeeded += 1;
                    log::info!("{} loaded", task.label);
                }
                Err(err) => {
                    task.state = TaskState::Failed;
                    summary.failed += 1;
                    log::error!("{err}");
                }
            }
            outcomes[index] = Some(result);
        }

        let labels: Vec<String> = self
            .tasks
            .borrow()
            .iter()
            .map(|task| task.label.clone())
            .collect();
        let outcomes = labels
            .into_iter()
            .zip(outcomes)
            .filter_map(|(label, result)| result.map(|result| TaskOutcome { label, result }))
            .collect();

        log::info!(
            "all {} loads settled ({} failed)",
            summary.registered,
            summary.failed
        );
        if let Some(callback) = self.on_all_complete.take() {
            callback(outcomes);
        }
        Some(summary)
    }
}
