//! Background orbit previews.
//!
//! The main thread captures a [`Snapshot`] and submits it; one worker thread
//! integrates it and sends the trails back. Only the newest request matters,
//! so submitting while another request is still queued replaces it.

use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};

use crate::error::SimError;
use crate::shadow::{OrbitPreview, PreviewResult, Snapshot};

/// A preview job. Owns everything it reads.
pub struct PreviewRequest {
    pub generation: u64,
    pub preview: OrbitPreview,
    pub snapshot: Snapshot,
}

/// A finished preview job.
#[derive(Debug)]
pub struct PreviewResponse {
    /// Generation of the request this answers.
    pub generation: u64,
    pub result: PreviewResult,
}

/// Single-thread preview worker.
pub struct PreviewWorker {
    request_sender: Option<Sender<PreviewRequest>>,
    /// Main-side handle on the request queue, used to discard stale requests.
    request_drain: Receiver<PreviewRequest>,
    response_receiver: Receiver<PreviewResponse>,
    handle: Option<JoinHandle<()>>,
    next_generation: u64,
}

impl PreviewWorker {
    pub fn spawn() -> Result<Self, SimError> {
        let (request_tx, request_rx) = crossbeam_channel::bounded::<PreviewRequest>(1);
        let (response_tx, response_rx) = crossbeam_channel::unbounded();
        let worker_rx = request_rx.clone();

        let handle = std::thread::Builder::new()
            .name("orbit-preview".to_string())
            .spawn(move || {
                while let Ok(request) = worker_rx.recv() {
                    let result = request.preview.run(&request.snapshot);
                    let response = PreviewResponse {
                        generation: request.generation,
                        result,
                    };
                    if response_tx.send(response).is_err() {
                        break;
                    }
                }
                tracing::debug!("orbit preview worker stopped");
            })
            .map_err(SimError::WorkerSpawn)?;

        Ok(Self {
            request_sender: Some(request_tx),
            request_drain: request_rx,
            response_receiver: response_rx,
            handle: Some(handle),
            next_generation: 0,
        })
    }

    /// Queue a preview, replacing any request the worker has not started.
    /// Returns the request's generation.
    pub fn submit(&mut self, preview: OrbitPreview, snapshot: Snapshot) -> Result<u64, SimError> {
        let sender = self
            .request_sender
            .as_ref()
            .ok_or(SimError::WorkerDisconnected)?;

        let mut replaced = 0;
        while self.request_drain.try_recv().is_ok() {
            replaced += 1;
        }
        if replaced > 0 {
            tracing::trace!(replaced, "stale orbit preview request dropped");
        }

        self.next_generation += 1;
        let generation = self.next_generation;
        sender
            .send(PreviewRequest {
                generation,
                preview,
                snapshot,
            })
            .map_err(|_| SimError::WorkerDisconnected)?;
        Ok(generation)
    }

    /// Newest finished preview, discarding older ones. `None` if nothing
    /// arrived since the last call.
    pub fn latest(&self) -> Option<PreviewResponse> {
        self.response_receiver.try_iter().last()
    }

    /// Block until a response at least as new as `generation` arrives.
    pub fn wait_for(&self, generation: u64, timeout: Duration) -> Option<PreviewResponse> {
        let deadline = std::time::Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(std::time::Instant::now());
            let response = self.response_receiver.recv_timeout(remaining).ok()?;
            if response.generation >= generation {
                return Some(response);
            }
        }
    }

    /// Stop the worker and wait for it to exit.
    pub fn shutdown(&mut self) {
        self.request_sender.take();
        while self.request_drain.try_recv().is_ok() {}
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for PreviewWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::Body;
    use crate::field::GravityField;
    use glam::DVec3;

    fn snapshot() -> Snapshot {
        let mut field = GravityField::new();
        field
            .spawn(Body::new("probe", DVec3::ZERO, DVec3::X, 1.0))
            .unwrap();
        Snapshot::capture(&field)
    }

    #[test]
    fn test_round_trip() {
        let mut worker = PreviewWorker::spawn().unwrap();
        let preview = OrbitPreview {
            steps: 4,
            closure_radius: 0.0,
            ..Default::default()
        };
        let generation = worker.submit(preview, snapshot()).unwrap();
        let response = worker
            .wait_for(generation, Duration::from_secs(10))
            .expect("preview timed out");
        assert_eq!(response.generation, generation);
        assert_eq!(response.result.steps_run, 4);
        assert_eq!(
            response.result.trails[0].samples.last().unwrap().position,
            DVec3::new(4.0, 0.0, 0.0)
        );
    }

    #[test]
    fn test_generations_increase() {
        let mut worker = PreviewWorker::spawn().unwrap();
        let a = worker.submit(OrbitPreview::default(), snapshot()).unwrap();
        let b = worker.submit(OrbitPreview::default(), snapshot()).unwrap();
        let c = worker.submit(OrbitPreview::default(), snapshot()).unwrap();
        assert!(a < b && b < c);

        let response = worker.wait_for(c, Duration::from_secs(10)).unwrap();
        assert_eq!(response.generation, c);
        assert!(worker.latest().is_none_or(|r| r.generation > c));
    }

    #[test]
    fn test_submit_after_shutdown_fails() {
        let mut worker = PreviewWorker::spawn().unwrap();
        worker.shutdown();
        assert!(matches!(
            worker.submit(OrbitPreview::default(), snapshot()),
            Err(SimError::WorkerDisconnected)
        ));
    }
}
