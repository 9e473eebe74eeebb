use std::{
    fmt::Display,
    io,
    panic::{self, AssertUnwindSafe},
    sync::Arc,
    thread::{self, JoinHandle},
};

use crossbeam_channel::{bounded, unbounded, Receiver, SendError, Sender};
use parking_lot::Mutex;

use crate::error::Error;

pub enum Act {
    Continue,
    Shutdown,
}

pub trait Actor: Sized {
    type Message: Send + 'static;
    type Error: Display;

    fn handle(&mut self, msg: Self::Message) -> Result<Act, Self::Error>;

    fn process(mut self, recv: Receiver<Self::Message>) {
        for msg in recv.iter() {
            match self.handle(msg) {
                Ok(Act::Continue) => {}
                Ok(Act::Shutdown) => {
                    break;
                }
                Err(err) => {
                    log::error!("error: {}", err);
                    break;
                }
            }
        }
    }

    fn spawn<F>(cap: Capacity, name: &str, factory: F) -> io::Result<ActorHandle<Self::Message>>
    where
        F: FnOnce(Sender<Self::Message>) -> Self + Send + 'static,
    {
        let (send, recv) = cap.to_channel();
        let thread = thread::Builder::new().name(name.to_owned()).spawn({
            let send = send.clone();
            move || {
                factory(send).process(recv);
            }
        })?;
        Ok(ActorHandle {
            sender: send,
            thread,
        })
    }
}

pub struct ActorHandle<M> {
    thread: JoinHandle<()>,
    sender: Sender<M>,
}

impl<M> ActorHandle<M> {
    pub fn sender(&self) -> Sender<M> {
        self.sender.clone()
    }

    pub fn join(self) {
        let _ = self.thread.join();
    }

    pub fn send(&self, msg: M) -> Result<(), SendError<M>> {
        self.sender.send(msg)
    }
}

pub enum Capacity {
    Bounded(usize),
    Unbounded,
}

impl Capacity {
    pub fn to_channel<T>(&self) -> (Sender<T>, Receiver<T>) {
        match self {
            Capacity::Bounded(cap) => bounded(*cap),
            Capacity::Unbounded => unbounded(),
        }
    }
}

pub type Job = Box<dyn FnOnce() + Send + 'static>;

pub enum Task {
    Run(Job),
    Shutdown,
}

/// Runs queued jobs one at a time on its own thread.
struct Worker {
    name: String,
}

impl Actor for Worker {
    type Message = Task;
    type Error = Error;

    fn handle(&mut self, msg: Task) -> Result<Act, Error> {
        match msg {
            Task::Run(job) => {
                if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
                    log::error!("job panicked on executor {:?}", self.name);
                }
                Ok(Act::Continue)
            }
            Task::Shutdown => {
                log::debug!("executor {:?} shutting down", self.name);
                Ok(Act::Shutdown)
            }
        }
    }
}

/// Shared background queue.  Jobs run in submission order, each to completion, on a single
/// worker thread.  Clones share the same worker.
#[derive(Clone)]
pub struct Executor {
    sender: Sender<Task>,
    handle: Arc<Mutex<Option<ActorHandle<Task>>>>,
}

impl Executor {
    pub fn new(name: &str, cap: Capacity) -> Result<Self, Error> {
        let worker_name = name.to_owned();
        let handle = Worker::spawn(cap, name, move |_| Worker { name: worker_name })?;
        Ok(Self {
            sender: handle.sender(),
            handle: Arc::new(Mutex::new(Some(handle))),
        })
    }

    pub fn execute(&self, job: impl FnOnce() + Send + 'static) -> Result<(), Error> {
        self.sender
            .send(Task::Run(Box::new(job)))
            .map_err(|_| Error::ExecutorClosed)
    }

    /// Stops the worker after the already queued jobs and waits for it.
    pub fn shutdown(&self) {
        let handle = self.handle.lock().take();
        if let Some(handle) = handle {
            let _ = handle.send(Task::Shutdown);
            handle.join();
        }
    }
}
