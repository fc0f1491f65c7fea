//! Per-method call scripts.
//!
//! A [`Script`] records every call made to one `WalletApi` method. A call is
//! answered from the reply queue if one is queued, else from the fallback
//! reply, else it parks until the test answers it with
//! [`respond`](Script::respond). Parked calls can be answered in any order,
//! which is how tests deliver responses out of order.

use parking_lot::Mutex;
use std::collections::VecDeque;
use tokio::sync::{oneshot, Notify};

use purse_app::ApiError;

/// Reply type of a scripted method.
pub type Reply<T> = Result<T, ApiError>;

struct ScriptState<A, T> {
    calls: Vec<A>,
    queued: VecDeque<Reply<T>>,
    fallback: Option<Reply<T>>,
    /// Parked calls by call index
    parked: Vec<(usize, oneshot::Sender<Reply<T>>)>,
}

enum Step<T> {
    Ready(Reply<T>),
    Parked(oneshot::Receiver<Reply<T>>),
}

/// Recorded calls and scripted replies of one method.
pub struct Script<A, T> {
    name: &'static str,
    state: Mutex<ScriptState<A, T>>,
    arrived: Notify,
}

impl<A: Clone, T: Clone> Script<A, T> {
    /// Create an empty script. Calls park until answered.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: Mutex::new(ScriptState {
                calls: Vec::new(),
                queued: VecDeque::new(),
                fallback: None,
                parked: Vec::new(),
            }),
            arrived: Notify::new(),
        }
    }

    /// Answer the next unanswered call immediately with `reply`.
    pub fn push(&self, reply: Reply<T>) -> &Self {
        self.state.lock().queued.push_back(reply);
        self
    }

    /// Answer every call with `reply` once the queue is empty.
    pub fn always(&self, reply: Reply<T>) -> &Self {
        self.state.lock().fallback = Some(reply);
        self
    }

    /// Answer the parked call with index `call`. Returns `false` if that call
    /// is not parked.
    pub fn respond(&self, call: usize, reply: Reply<T>) -> bool {
        let sender = {
            let mut state = self.state.lock();
            let position = state.parked.iter().position(|(index, _)| *index == call);
            let Some(position) = position else {
                return false;
            };
            state.parked.remove(position).1
        };
        sender.send(reply).is_ok()
    }

    /// Answer the oldest parked call.
    pub fn respond_next(&self, reply: Reply<T>) -> bool {
        let sender = {
            let mut state = self.state.lock();
            if state.parked.is_empty() {
                return false;
            }
            state.parked.remove(0).1
        };
        sender.send(reply).is_ok()
    }

    /// Number of calls made so far.
    pub fn call_count(&self) -> usize {
        self.state.lock().calls.len()
    }

    /// Number of calls waiting for an answer.
    pub fn parked_count(&self) -> usize {
        self.state.lock().parked.len()
    }

    /// Arguments of every call, in call order.
    pub fn calls(&self) -> Vec<A> {
        self.state.lock().calls.clone()
    }

    /// Wait until at least `count` calls have been made.
    pub async fn wait_for_calls(&self, count: usize) {
        loop {
            let arrived = self.arrived.notified();
            if self.call_count() >= count {
                return;
            }
            arrived.await;
        }
    }

    /// Record a call and produce its reply.
    pub async fn call(&self, args: A) -> Reply<T> {
        let step = {
            let mut state = self.state.lock();
            let index = state.calls.len();
            state.calls.push(args);
            tracing::trace!(method = self.name, index, "scripted call");

            let reply = match state.queued.pop_front() {
                Some(reply) => Some(reply),
                None => state.fallback.clone(),
            };
            match reply {
                Some(reply) => Step::Ready(reply),
                None => {
                    let (tx, rx) = oneshot::channel();
                    state.parked.push((index, tx));
                    Step::Parked(rx)
                }
            }
        };
        self.arrived.notify_waiters();

        match step {
            Step::Ready(reply) => reply,
            Step::Parked(rx) => rx.await.unwrap_or_else(|_| {
                Err(ApiError::transport(format!("{} script dropped", self.name)))
            }),
        }
    }
}
