#[path = "integration/run.rs"]
mod run;
#[path = "integration/cli.rs"]
mod cli;
