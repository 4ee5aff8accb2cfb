//! Bounded task execution.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::mpsc;
use std::thread;

/// Execute `work` over `tasks` with at most `parallelism` tasks in flight.
///
/// A fixed set of workers pulls from a shared queue in submission order;
/// completion order is unspecified. Each task's outcome is captured
/// individually, so a failing task never cancels its siblings, and the
/// return — the single batch-completion point — happens only once every task
/// has reached a terminal state. Outcomes are returned in `tasks` order.
///
/// # Panics
///
/// Panics if the internal queue lock is poisoned (a worker panicked).
pub fn run_bounded<T, R, F>(tasks: Vec<T>, parallelism: usize, work: F) -> Vec<R>
where
    T: Send,
    R: Send,
    F: Fn(T) -> R + Sync,
{
    let total = tasks.len();
    if total == 0 {
        return Vec::new();
    }

    let workers = parallelism.clamp(1, total);
    let queue: Mutex<VecDeque<(usize, T)>> = Mutex::new(tasks.into_iter().enumerate().collect());
    let (tx, rx) = mpsc::channel::<(usize, R)>();

    thread::scope(|scope| {
        let queue = &queue;
        let work = &work;
        for _ in 0..workers {
            let tx = tx.clone();
            scope.spawn(move || {
                loop {
                    let next = queue.lock().unwrap().pop_front();
                    let Some((index, task)) = next else { break };
                    // The receiver outlives the scope; send cannot fail
                    let _ = tx.send((index, work(task)));
                }
            });
        }
    });
    drop(tx);

    let mut outcomes: Vec<(usize, R)> = rx.iter().collect();
    outcomes.sort_by_key(|(index, _)| *index);
    outcomes.into_iter().map(|(_, outcome)| outcome).collect()
}
