// this_file: pathmin/src/bin/pathmin.rs

//! pathmin command-line interface.

use clap::{Arg, ArgAction, Command};
use pathmin::config::{load_config_from_directory, Config, DataUriFormat};
use pathmin::plugin::PluginConfig;
use pathmin::{optimize_with_config, VERSION};
use serde_json::json;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    let matches = Command::new("pathmin")
        .version(VERSION)
        .about("SVG path data optimizer")
        .arg(
            Arg::new("INPUT")
                .help("Input file, \"-\" for STDIN")
                .value_name("INPUT")
                .conflicts_with("string"),
        )
        .arg(
            Arg::new("string")
                .help("Input SVG data string")
                .short('s')
                .long("string")
                .value_name("STRING")
                .conflicts_with("INPUT"),
        )
        .arg(
            Arg::new("output")
                .help("Output file (defaults to STDOUT)")
                .short('o')
                .long("output")
                .value_name("OUTPUT"),
        )
        .arg(
            Arg::new("precision")
                .help("Number of digits in the fractional part, overrides plugin params")
                .short('p')
                .long("precision")
                .value_name("INTEGER")
                .value_parser(clap::value_parser!(u8)),
        )
        .arg(
            Arg::new("pretty")
                .help("Make SVG pretty printed")
                .long("pretty")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("indent")
                .help("Indent width when pretty printing")
                .long("indent")
                .value_name("INTEGER")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("multipass")
                .help("Repeat the passes until the output settles")
                .long("multipass")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("datauri")
                .help("Output as a data URI: base64, enc or unenc")
                .long("datauri")
                .value_name("FORMAT")
                .value_parser(["base64", "enc", "unenc"]),
        )
        .arg(
            Arg::new("config")
                .help("Custom config file (.json or .toml)")
                .long("config")
                .value_name("CONFIG"),
        )
        .arg(
            Arg::new("quiet")
                .help("Only output errors")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("pathmin: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(matches: &clap::ArgMatches) -> Result<(), String> {
    let input = read_input(matches)?;
    let mut config = load_config(matches)?;

    if matches.get_flag("pretty") {
        config.js2svg.pretty = true;
    }
    if let Some(indent) = matches.get_one::<usize>("indent") {
        config.js2svg.indent = *indent;
    }
    if matches.get_flag("multipass") {
        config.multipass = true;
    }
    if let Some(format) = matches.get_one::<String>("datauri") {
        config.datauri = Some(match format.as_str() {
            "base64" => DataUriFormat::Base64,
            "enc" => DataUriFormat::Enc,
            _ => DataUriFormat::Unenc,
        });
    }
    if let Some(precision) = matches.get_one::<u8>("precision") {
        override_precision(&mut config, *precision);
    }

    let result =
        optimize_with_config(&input, config).map_err(|error| error.to_string())?;

    match matches.get_one::<String>("output") {
        Some(path) if path != "-" => {
            fs::write(path, &result.data)
                .map_err(|error| format!("cannot write {path}: {error}"))?;
            if !matches.get_flag("quiet") {
                eprintln!(
                    "{} -> {} bytes ({:.1}%)",
                    result.info.original_size,
                    result.info.optimized_size,
                    result.info.compression_percentage()
                );
            }
        }
        _ => {
            let mut stdout = io::stdout();
            stdout
                .write_all(result.data.as_bytes())
                .and_then(|_| stdout.write_all(b"\n"))
                .map_err(|error| error.to_string())?;
        }
    }
    Ok(())
}

fn read_input(matches: &clap::ArgMatches) -> Result<String, String> {
    if let Some(data) = matches.get_one::<String>("string") {
        return Ok(data.clone());
    }
    match matches.get_one::<String>("INPUT") {
        Some(path) if path != "-" => {
            fs::read_to_string(path).map_err(|error| format!("cannot read {path}: {error}"))
        }
        _ => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|error| error.to_string())?;
            Ok(buffer)
        }
    }
}

fn load_config(matches: &clap::ArgMatches) -> Result<Config, String> {
    if let Some(path) = matches.get_one::<String>("config") {
        return Config::from_file(PathBuf::from(path)).map_err(|error| error.to_string());
    }
    let discovered =
        load_config_from_directory(".").map_err(|error| error.to_string())?;
    Ok(discovered.unwrap_or_else(Config::with_default_preset))
}

/// Forces the precision into every configured pass.
fn override_precision(config: &mut Config, precision: u8) {
    if config.plugins.is_empty() {
        config.add_plugin(PluginConfig::new("convertPathData".to_string()));
    }
    for plugin in &mut config.plugins {
        let params = plugin
            .params
            .get_or_insert_with(|| json!({}));
        if let Some(map) = params.as_object_mut() {
            map.insert("floatPrecision".to_string(), json!(precision));
        }
    }
}
