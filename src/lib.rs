//! smconfig: training-job debugger configuration and JumpStart model metadata
//!
//! Builds the debugger rule, profiler rule, hook, collection and TensorBoard
//! request fragments a training job submission carries, and models the
//! JumpStart catalog records used to resolve pre-trained model artifact URIs.

pub mod cli;
pub mod config;
pub mod debugger;
pub mod error;
pub mod jumpstart;
pub mod logging;
