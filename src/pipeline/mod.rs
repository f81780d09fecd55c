pub mod job_runner;
pub mod report;
pub mod router;
