//! ffmpeg-harness companion binary.
//!
//! `tokenize <command>` prints the argument vector for a command string
//! as a JSON array; `probe` reads engine output from stdin and prints
//! the decoded media information as JSON.

use ffmpeg_harness::{command, media};

use std::env;
use std::io::{self, Read};
use std::process::ExitCode;

fn main() -> ExitCode {
    let arguments: Vec<String> = env::args().skip(1).collect();

    match arguments.first().map(String::as_str) {
        Some("tokenize") => {
            let [command_string] = &arguments[1..] else {
                return usage();
            };
            let tokens = command::tokenize(command_string);
            match serde_json::to_string(&tokens) {
                Ok(json) => {
                    println!("{json}");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Failed to encode tokens: {e}");
                    ExitCode::FAILURE
                }
            }
        }
        Some("probe") => {
            let mut output = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut output) {
                eprintln!("Failed to read stdin: {e}");
                return ExitCode::FAILURE;
            }
            let information = media::parse(&output);
            match serde_json::to_string_pretty(&information) {
                Ok(json) => {
                    println!("{json}");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Failed to encode media information: {e}");
                    ExitCode::FAILURE
                }
            }
        }
        _ => usage(),
    }
}

fn usage() -> ExitCode {
    eprintln!("usage: ffmpeg-harness tokenize <command>");
    eprintln!("       ffmpeg-harness probe < engine-output");
    ExitCode::from(2)
}
