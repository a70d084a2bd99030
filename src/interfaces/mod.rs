// Process bridge (stdin/stdout JSON)
pub mod json_bridge;
