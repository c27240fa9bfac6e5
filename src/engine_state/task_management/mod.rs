//! # Task Management System
//!
//! A fixed-size pool of worker threads for building chunks in parallel, with an
//! explicit barrier that waits for every published task.
//!
//! ## Architecture Overview
//!
//! - `TaskManager`: owns the workers, the queue of pending tasks and the result channel
//! - `Task`: a unit of work executed on a worker thread
//! - `TaskResult`: the output of a task, applied on the orchestrating thread
//! - `TaskChannel`: the dispatch channel to one worker plus what it is working on
//!
//! ## Scheduling
//!
//! Each worker has its own task channel and holds at most one task at a time.
//! Published tasks go to the next free worker in round-robin order; when every
//! worker is busy they wait in a FIFO queue. Workers report on a single shared
//! result channel.
//!
//! ## Task Lifecycle
//! 1. Tasks are published via `TaskManager::publish_task()`
//! 2. `TaskManager::run_to_completion()` keeps feeding queued tasks to free workers
//!    and collects results until nothing is queued or in flight
//! 3. The caller applies the returned results on its own thread
//!
//! ## Failures
//!
//! A panic inside `Task::process` is caught on the worker and reported as
//! `ChunkBuildFailed`. A task running longer than the barrier's timeout is reported
//! as `ChunkBuildTimedOut`; its worker cannot be interrupted, so a manager that
//! returned an error must be replaced before it is used again.

pub mod task;

use std::any::Any;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, error, info};
use task::{Task, TaskResult};
use web_time::Instant;

use crate::engine_state::voxels::chunk::ChunkCoord;
use crate::error::EngineError;

/// What a worker sends back after running one task.
struct WorkerMessage {
    worker: usize,
    coord: ChunkCoord,
    outcome: Result<Box<dyn TaskResult>, EngineError>,
}

/// The task a worker is currently running.
#[derive(Debug, Clone, Copy)]
struct InFlight {
    coord: ChunkCoord,
    dispatched_at: Instant,
}

/// A dispatch channel to one worker thread.
struct TaskChannel {
    task_sender: Sender<Box<dyn Task>>,
    in_flight: Option<InFlight>,
    _worker: JoinHandle<()>,
}

/// Manages a pool of worker threads and coordinates task execution.
pub struct TaskManager {
    channels: Vec<TaskChannel>,
    result_receiver: Receiver<WorkerMessage>,
    queued_tasks: VecDeque<Box<dyn Task>>,
    current_channel: usize,
}

impl TaskManager {
    /// Creates a new `TaskManager` with `num_workers` worker threads.
    ///
    /// # Errors
    /// [`EngineError::InvalidWorkerCount`] for zero workers, [`EngineError::Io`] if a
    /// thread cannot be spawned.
    pub fn new(num_workers: usize) -> Result<Self, EngineError> {
        if num_workers == 0 {
            return Err(EngineError::InvalidWorkerCount(num_workers));
        }

        info!("Available parallelism: {:?}", thread::available_parallelism());

        let (result_tx, result_rx) = channel::<WorkerMessage>();
        let mut channels = Vec::with_capacity(num_workers);

        for index in 0..num_workers {
            let (task_tx, task_rx) = channel::<Box<dyn Task>>();
            let result_tx = result_tx.clone();

            let task_closure = move || {
                while let Ok(task) = task_rx.recv() {
                    let coord = task.chunk_coord();
                    let started = Instant::now();
                    let outcome = panic::catch_unwind(AssertUnwindSafe(|| task.process()))
                        .unwrap_or_else(|payload| {
                            Err(EngineError::ChunkBuildFailed {
                                coord,
                                reason: panic_message(payload.as_ref()),
                            })
                        });
                    debug!("Worker {index} finished chunk {coord} in {:?}", started.elapsed());

                    let message = WorkerMessage { worker: index, coord, outcome };
                    if result_tx.send(message).is_err() {
                        break;
                    }
                }
            };

            let worker = thread::Builder::new()
                .name(format!("chunk-worker-{index}"))
                .spawn(task_closure)?;

            channels.push(TaskChannel {
                task_sender: task_tx,
                in_flight: None,
                _worker: worker,
            });
        }

        info!("Started {num_workers} chunk build workers");

        Ok(TaskManager {
            channels,
            result_receiver: result_rx,
            queued_tasks: VecDeque::new(),
            current_channel: 0,
        })
    }

    /// Number of worker threads.
    pub fn worker_count(&self) -> usize {
        self.channels.len()
    }

    /// Number of tasks waiting for a free worker.
    pub fn queued_count(&self) -> usize {
        self.queued_tasks.len()
    }

    /// Number of tasks currently running on a worker.
    pub fn in_flight_count(&self) -> usize {
        self.channels.iter().filter(|channel| channel.in_flight.is_some()).count()
    }

    /// Attempts to send a task to a specific worker channel.
    ///
    /// Returns the task if the worker has hung up.
    fn try_send_task(&mut self, task: Box<dyn Task>, channel_idx: usize) -> Result<(), Box<dyn Task>> {
        let coord = task.chunk_coord();
        match self.channels[channel_idx].task_sender.send(task) {
            Ok(_) => {
                self.channels[channel_idx].in_flight = Some(InFlight { coord, dispatched_at: Instant::now() });
                Ok(())
            }
            Err(task) => Err(task.0),
        }
    }

    /// Finds the next idle worker, round-robin from the last one used.
    fn find_available_channel(&self) -> Option<usize> {
        let count = self.channels.len();
        (0..count)
            .map(|offset| (self.current_channel + offset) % count)
            .find(|&idx| self.channels[idx].in_flight.is_none())
    }

    /// Publishes a new task for execution.
    ///
    /// # Returns
    /// - `true` if the task was immediately handed to an idle worker
    /// - `false` if the task was queued because all workers are busy
    pub fn publish_task(&mut self, task: Box<dyn Task>) -> bool {
        // Keep FIFO order: nothing jumps ahead of already queued work.
        if !self.queued_tasks.is_empty() {
            self.queued_tasks.push_back(task);
            return false;
        }

        match self.find_available_channel() {
            Some(channel_idx) => match self.try_send_task(task, channel_idx) {
                Ok(_) => {
                    self.current_channel = (channel_idx + 1) % self.channels.len();
                    true
                }
                Err(task) => {
                    self.queued_tasks.push_back(task);
                    false
                }
            },
            None => {
                self.queued_tasks.push_back(task);
                false
            }
        }
    }

    /// Hands queued tasks, oldest first, to idle workers until either runs out.
    pub fn process_queued_tasks(&mut self) {
        while let Some(channel_idx) = self.find_available_channel() {
            let Some(task) = self.queued_tasks.pop_front() else {
                break;
            };
            match self.try_send_task(task, channel_idx) {
                Ok(_) => self.current_channel = (channel_idx + 1) % self.channels.len(),
                Err(task) => {
                    // Worker is gone, put the task back and stop.
                    self.queued_tasks.push_front(task);
                    break;
                }
            }
        }
    }

    /// Blocks until every published task has finished and returns their results.
    ///
    /// Results arrive in completion order. `timeout` bounds each task's run time,
    /// measured from when it was handed to a worker.
    ///
    /// # Errors
    /// Returns the first failure. Results collected so far are dropped, and tasks
    /// still queued or in flight are abandoned.
    pub fn run_to_completion(&mut self, timeout: Option<Duration>) -> Result<Vec<Box<dyn TaskResult>>, EngineError> {
        let mut results = Vec::with_capacity(self.queued_tasks.len() + self.in_flight_count());

        loop {
            self.process_queued_tasks();

            if self.in_flight_count() == 0 {
                if self.queued_tasks.is_empty() {
                    return Ok(results);
                }
                error!("{} tasks queued but no worker accepts work", self.queued_tasks.len());
                return Err(EngineError::WorkerDisconnected);
            }

            let message = self.receive_next(timeout)?;
            self.channels[message.worker].in_flight = None;

            match message.outcome {
                Ok(result) => results.push(result),
                Err(err) => {
                    error!("Task for chunk {} failed: {err}", message.coord);
                    return Err(err);
                }
            }
        }
    }

    /// Waits for the next worker message, up to the earliest in-flight deadline.
    fn receive_next(&self, timeout: Option<Duration>) -> Result<WorkerMessage, EngineError> {
        let Some(timeout) = timeout else {
            return self.result_receiver.recv().map_err(|_| EngineError::WorkerDisconnected);
        };

        let oldest = self
            .channels
            .iter()
            .filter_map(|channel| channel.in_flight)
            .min_by_key(|in_flight| in_flight.dispatched_at);
        let Some(oldest) = oldest else {
            return Err(EngineError::WorkerDisconnected);
        };

        let timed_out = || {
            error!("Chunk {} exceeded the build timeout of {timeout:?}", oldest.coord);
            EngineError::ChunkBuildTimedOut { coord: oldest.coord, timeout }
        };

        // The oldest deadline is checked before every receive, not only while idle.
        let elapsed = oldest.dispatched_at.elapsed();
        if elapsed >= timeout {
            return Err(timed_out());
        }

        match self.result_receiver.recv_timeout(timeout - elapsed) {
            Ok(message) => Ok(message),
            Err(RecvTimeoutError::Timeout) => Err(timed_out()),
            Err(RecvTimeoutError::Disconnected) => Err(EngineError::WorkerDisconnected),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "task panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::chunk::Chunk;
    use crate::engine_state::voxels::world::World;

    struct SleepTask {
        coord: ChunkCoord,
        delay: Duration,
    }

    struct PanicTask(ChunkCoord);

    struct CoordResult(ChunkCoord);

    impl Task for SleepTask {
        fn chunk_coord(&self) -> ChunkCoord {
            self.coord
        }

        fn process(&self) -> Result<Box<dyn TaskResult>, EngineError> {
            thread::sleep(self.delay);
            Ok(Box::new(CoordResult(self.coord)))
        }
    }

    impl Task for PanicTask {
        fn chunk_coord(&self) -> ChunkCoord {
            self.0
        }

        fn process(&self) -> Result<Box<dyn TaskResult>, EngineError> {
            panic!("boom at {}", self.0)
        }
    }

    impl TaskResult for CoordResult {
        fn chunk_coord(&self) -> ChunkCoord {
            self.0
        }

        fn handle_result(self: Box<Self>, world: &mut World) -> Result<(), EngineError> {
            world.insert_chunk(Chunk::empty(self.0, 1)?)
        }
    }

    fn sleep_task(x: i32, millis: u64) -> Box<dyn Task> {
        Box::new(SleepTask { coord: ChunkCoord::new(x, 0), delay: Duration::from_millis(millis) })
    }

    #[test]
    fn zero_workers_is_rejected() {
        assert!(matches!(TaskManager::new(0), Err(EngineError::InvalidWorkerCount(0))));
    }

    #[test]
    fn single_worker_drains_queue_in_order() {
        let mut manager = TaskManager::new(1).unwrap();
        assert!(manager.publish_task(sleep_task(0, 0)));
        for x in 1..5 {
            assert!(!manager.publish_task(sleep_task(x, 0)));
        }
        assert_eq!(manager.queued_count(), 4);

        let results = manager.run_to_completion(Some(Duration::from_secs(10))).unwrap();
        assert_eq!(results.len(), 5);
        assert_eq!(manager.queued_count(), 0);
        assert_eq!(manager.in_flight_count(), 0);

        let mut world = World::new();
        for result in results {
            result.handle_result(&mut world).unwrap();
        }
        assert_eq!(world.len(), 5);
    }

    #[test]
    fn many_workers_share_the_load() {
        let mut manager = TaskManager::new(4).unwrap();
        for x in 0..4 {
            assert!(manager.publish_task(sleep_task(x, 20)));
        }
        assert_eq!(manager.in_flight_count(), 4);
        assert!(!manager.publish_task(sleep_task(4, 0)));

        let results = manager.run_to_completion(None).unwrap();
        assert_eq!(results.len(), 5);
    }

    #[test]
    fn empty_barrier_returns_immediately() {
        let mut manager = TaskManager::new(2).unwrap();
        assert!(manager.run_to_completion(None).unwrap().is_empty());
    }

    #[test]
    fn panicking_task_is_reported_with_its_coordinate() {
        let mut manager = TaskManager::new(2).unwrap();
        manager.publish_task(sleep_task(0, 0));
        manager.publish_task(Box::new(PanicTask(ChunkCoord::new(3, -3))));

        let err = manager.run_to_completion(Some(Duration::from_secs(10))).err().unwrap();
        match err {
            EngineError::ChunkBuildFailed { coord, reason } => {
                assert_eq!(coord, ChunkCoord::new(3, -3));
                assert!(reason.contains("boom"), "{reason}");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn stalled_task_times_out_while_other_workers_keep_reporting() {
        let mut manager = TaskManager::new(2).unwrap();
        manager.publish_task(sleep_task(-1, 2_000));
        for x in 0..300 {
            manager.publish_task(sleep_task(x, 1));
        }

        let started = Instant::now();
        let err = manager.run_to_completion(Some(Duration::from_millis(40))).err().unwrap();
        assert!(matches!(
            err,
            EngineError::ChunkBuildTimedOut { coord, .. } if coord == ChunkCoord::new(-1, 0)
        ));
        assert!(started.elapsed() < Duration::from_millis(1_000));
        assert!(manager.queued_count() > 0);
    }

    #[test]
    fn stalled_task_times_out() {
        let mut manager = TaskManager::new(1).unwrap();
        manager.publish_task(sleep_task(7, 2_000));

        let err = manager.run_to_completion(Some(Duration::from_millis(50))).err().unwrap();
        assert!(matches!(
            err,
            EngineError::ChunkBuildTimedOut { coord, .. } if coord == ChunkCoord::new(7, 0)
        ));
    }
}
