// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Process-wide channel for storage permission/write failures.
//!
//! Best-effort writes (heartbeats, click tracking, access logs) never fail
//! the request; they publish a [`PermissionError`] here instead and a
//! listener task logs it.

use serde::Serialize;
use tokio::sync::broadcast;

/// Buffered events per receiver before the oldest are dropped.
const CHANNEL_CAPACITY: usize = 256;

/// Kind of document access that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Get,
    List,
    Create,
    Update,
    Write,
}

/// A failed document operation with enough context to debug store rules.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionError {
    /// Document or collection path, e.g. `users/abc123`
    pub path: String,
    pub operation: Operation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_resource_data: Option<serde_json::Value>,
    /// Underlying store error
    pub message: String,
}

/// Cloneable publisher handle.
#[derive(Clone)]
pub struct ErrorEmitter {
    sender: broadcast::Sender<PermissionError>,
}

impl Default for ErrorEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorEmitter {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Publish an event. Never blocks; with no listeners the event is dropped.
    pub fn emit(&self, event: PermissionError) {
        if self.sender.send(event).is_err() {
            tracing::debug!("No error listeners subscribed; event dropped");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PermissionError> {
        self.sender.subscribe()
    }

    /// Spawn a task that logs every published event until the emitter is dropped.
    pub fn spawn_listener(&self) -> tokio::task::JoinHandle<()> {
        let mut receiver = self.subscribe();
        tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(event) => {
                        tracing::error!(
                            path = %event.path,
                            operation = ?event.operation,
                            request_data = ?event.request_resource_data,
                            error = %event.message,
                            "Document operation failed"
                        );
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Error listener lagged, events dropped");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}
