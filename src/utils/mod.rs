// Common utilities for authreset
pub mod console;
pub mod constants;
