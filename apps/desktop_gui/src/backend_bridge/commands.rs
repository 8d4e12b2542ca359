//! Backend commands queued from UI to backend worker.

use std::path::PathBuf;

use shared::domain::ImageRole;

#[derive(Debug)]
pub enum BackendCommand {
    /// Read and decode a locally selected file into a displayable preview.
    LoadImage { role: ImageRole, path: PathBuf },
    /// Walk the fixed staged pipeline, emitting one event per advance.
    /// `run` tags the events so the UI can drop stragglers from a session
    /// that was torn down mid-flight.
    RunPipeline { run: u64 },
}
