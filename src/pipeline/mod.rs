//! The parallel resumable decode pipeline: one worker thread per corpus
//! byte range, a shared cancel flag, and worker-id-ordered output.

pub mod driver;
pub mod worker;

pub use driver::{run_pipeline, RunStats};
pub use worker::{ProgressUpdate, WorkerRange};
