pub mod capture_loop;
pub mod exit;
pub mod runner;
pub mod signal;
pub mod summary;
pub mod termination;
pub mod timer;
