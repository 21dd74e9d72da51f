// ABOUTME: Process lifecycle management for graceful shutdown
// ABOUTME: Broadcasts a one-shot shutdown signal to the HTTP server and in-flight provider calls
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Wellness Insights Contributors

//! Shutdown signalling
//!
//! The [`ShutdownController`] is owned by the binary. Every component that
//! must stop early holds a cloned [`ShutdownSignal`]: axum's graceful shutdown
//! future and the LLM router, which abandons in-flight provider calls.

use tokio::sync::watch;
use tracing::{info, warn};

/// Owner side of the shutdown signal
#[derive(Debug)]
pub struct ShutdownController {
    sender: watch::Sender<bool>,
}

/// Cloneable listener side of the shutdown signal
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    receiver: Option<watch::Receiver<bool>>,
}

impl ShutdownController {
    /// Create a controller in the running state
    #[must_use]
    pub fn new() -> Self {
        let (sender, _receiver) = watch::channel(false);
        Self { sender }
    }

    /// Hand out a listener
    #[must_use]
    pub fn signal(&self) -> ShutdownSignal {
        ShutdownSignal {
            receiver: Some(self.sender.subscribe()),
        }
    }

    /// Flip the signal; idempotent
    pub fn trigger(&self) {
        if !self.sender.send_replace(true) {
            info!("Shutdown signal broadcast");
        }
    }

    /// Whether shutdown was triggered
    #[must_use]
    pub fn is_triggered(&self) -> bool {
        *self.sender.borrow()
    }
}

impl Default for ShutdownController {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownSignal {
    /// A signal that never fires, for components built outside a server
    #[must_use]
    pub const fn never() -> Self {
        Self { receiver: None }
    }

    /// Whether shutdown was already triggered
    #[must_use]
    pub fn is_triggered(&self) -> bool {
        self.receiver
            .as_ref()
            .is_some_and(|receiver| *receiver.borrow())
    }

    /// Resolve once shutdown is triggered
    ///
    /// Resolves immediately if the controller was dropped without triggering,
    /// since nobody is left to keep the process running.
    pub async fn triggered(self) {
        let Some(mut receiver) = self.receiver else {
            return std::future::pending().await;
        };
        if receiver.wait_for(|stopped| *stopped).await.is_err() {
            warn!("Shutdown controller dropped; treating as shutdown");
        }
    }
}

/// Wait for Ctrl-C or SIGTERM, then trigger the controller
pub async fn listen_for_os_signals(controller: &ShutdownController) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl-C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Ctrl-C received"),
        () = terminate => info!("SIGTERM received"),
    }

    controller.trigger();
}
