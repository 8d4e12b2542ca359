//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) {
    let cmd_name = match &cmd {
        BackendCommand::LoadImage { .. } => "load_image",
        BackendCommand::RunPipeline { .. } => "run_pipeline",
    };

    match cmd_tx.try_send(cmd) {
        Ok(()) => tracing::debug!(command = cmd_name, "queued ui->backend command"),
        Err(TrySendError::Full(_)) => {
            *status = "The studio is busy; please retry".to_string();
        }
        Err(TrySendError::Disconnected(_)) => {
            *status =
                "Background worker stopped (possible startup failure); restart the app".to_string();
        }
    }
}
