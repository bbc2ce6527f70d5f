use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::{InstallRequest, InstallWorkflow, InstallerEvent};

/// Runs detection on a worker thread and sends `DetectionFinished` when done.
pub fn spawn_detection(
    workflow: Arc<InstallWorkflow>,
    events: Sender<InstallerEvent>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let status = workflow.detect();
        let _ = events.send(InstallerEvent::DetectionFinished(status));
    })
}

/// Runs an installation on a worker thread.
///
/// Progress events arrive in the order they occur; `InstallationFinished` is
/// always the last event sent for the run. A dropped receiver does not stop
/// the installation.
pub fn spawn_installation(
    workflow: Arc<InstallWorkflow>,
    request: InstallRequest,
    events: Sender<InstallerEvent>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let result = workflow.install(&request, |event| {
            let _ = events.send(event);
        });
        let _ = events.send(InstallerEvent::InstallationFinished(result));
    })
}
