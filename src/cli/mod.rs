pub mod config_cmd;
pub mod history_cmd;
pub mod output;
pub mod renderer;
pub mod run_cmd;
