//! Host harness for `selectattrfirst`.
//!
//! Reads a JSON request from the file named by the first argument, or from
//! stdin when there is none:
//!
//! ```text
//! { "sequence": [...], "args": ["attr", "exp_test", ...], "kwargs": {} }
//! ```
//!
//! and prints `{"result": <first match or null>}`.

use std::io::Read;
use std::process::ExitCode;

use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use selectattrfirst::error::Result;
use selectattrfirst::filter::{Filter, SelectAttrFirstFilter};
use selectattrfirst::interpreter::Interpreter;
use selectattrfirst::settings::Settings;
use selectattrfirst::value::{Kwargs, Value};

#[derive(Deserialize)]
struct Request {
    sequence: Value,
    #[serde(default)]
    args: Vec<Value>,
    #[serde(default)]
    kwargs: Kwargs,
}

fn read_request() -> Result<Request> {
    let input = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut input = String::new();
            std::io::stdin().read_to_string(&mut input)?;
            input
        }
    };
    Ok(serde_json::from_str(&input)?)
}

fn run(settings: &Settings) -> Result<Value> {
    let request = read_request()?;
    let interpreter = Interpreter::from_settings(settings);
    let filter = SelectAttrFirstFilter;
    let result = filter.filter(&request.sequence, &interpreter, &request.args, &request.kwargs)?;
    info!(filter = filter.name(), matched = result.is_some(), "request complete");
    Ok(json!({ "result": result }))
}

fn main() -> ExitCode {
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(&settings) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "request failed");
            ExitCode::FAILURE
        }
    }
}
