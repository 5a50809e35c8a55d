//! Background analysis worker
//!
//! Moves heavy spectral work off the caller's thread. Requests are drained by
//! a single consumer thread in arrival order; every request produces exactly
//! one response carrying its request id.

use super::messages::{AnalysisRequest, AnalysisResponse};
use super::orchestrator::AnalysisEngine;
use std::sync::mpsc::{self, Receiver, RecvError, SendError, Sender, TryRecvError};
use std::thread::JoinHandle;
use tracing::debug;

/// Channel-fed worker thread owning an `AnalysisEngine`
pub struct AnalysisWorker {
    requests: Option<Sender<AnalysisRequest>>,
    responses: Receiver<AnalysisResponse>,
    thread: Option<JoinHandle<()>>,
}

impl AnalysisWorker {
    /// Start the worker; the engine is built on the worker thread
    pub fn spawn<F>(make_engine: F) -> Self
    where
        F: FnOnce() -> AnalysisEngine + Send + 'static,
    {
        let (request_tx, request_rx) = mpsc::channel::<AnalysisRequest>();
        let (response_tx, response_rx) = mpsc::channel();

        let handle = std::thread::spawn(move || {
            let mut engine = make_engine();

            // Ends when every request sender is dropped
            while let Ok(request) = request_rx.recv() {
                debug!(request_id = request.request_id(), "processing request");
                let response = engine.handle(&request);
                if response_tx.send(response).is_err() {
                    break;
                }
            }
        });

        Self {
            requests: Some(request_tx),
            responses: response_rx,
            thread: Some(handle),
        }
    }

    /// Queue a request
    pub fn submit(&self, request: AnalysisRequest) -> Result<(), SendError<AnalysisRequest>> {
        match &self.requests {
            Some(tx) => tx.send(request),
            None => Err(SendError(request)),
        }
    }

    /// Block until the next response
    pub fn recv(&self) -> Result<AnalysisResponse, RecvError> {
        self.responses.recv()
    }

    /// Next response if one is ready
    pub fn try_recv(&self) -> Result<AnalysisResponse, TryRecvError> {
        self.responses.try_recv()
    }

    /// Stop accepting requests, finish queued ones and join the thread
    pub fn shutdown(&mut self) {
        self.requests = None;
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for AnalysisWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
