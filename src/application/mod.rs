// Application layer - Session orchestration and use cases
pub mod dashboard_service;
pub mod ports;
pub mod session;
pub mod session_runner;
pub mod simulator;
pub mod streaming_service;
