//! Command-line interface for tacoscript
//!
//! Usage:
//!   taco parse `<path>` [--format `<format>`] [--plugin `<name>`]...   - Tokenize or parse a file
//!   taco print `<path>` [--reformat] [--compact] [--source-map `<out>`] - Print a file back out
//!   taco list-formats                                              - List processing formats

use clap::{Arg, ArgAction, ArgMatches, Command};
use std::collections::HashMap;
use tacoscript::taco::processor::{available_formats, process_file_with_extras, ProcessingSpec};
use tacoscript::{parse, print, ParseOptions, PrintOptions};
use tracing::Level;

fn plugin_arg() -> Arg {
    Arg::new("plugin")
        .long("plugin")
        .short('p')
        .help("Enable a plugin (repeatable)")
        .action(ArgAction::Append)
}

fn main() {
    let matches = Command::new("taco")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for inspecting and printing tacoscript files")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log parse and print details to stderr")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("parse")
                .about("Tokenize or parse a file and serialize the result")
                .arg(
                    Arg::new("path")
                        .help("Path to the tacoscript file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format (e.g., 'ast-json', 'ast-treeviz', 'token-simple')")
                        .default_value("ast-treeviz"),
                )
                .arg(
                    Arg::new("script")
                        .long("script")
                        .help("Parse as a script instead of a module")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("show-linum")
                        .long("show-linum")
                        .help("Prefix treeviz lines with source line numbers")
                        .action(ArgAction::SetTrue),
                )
                .arg(plugin_arg()),
        )
        .subcommand(
            Command::new("print")
                .about("Parse a file and print it back out")
                .arg(
                    Arg::new("path")
                        .help("Path to the tacoscript file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("options")
                        .long("options")
                        .help("JSON file with print options"),
                )
                .arg(
                    Arg::new("reformat")
                        .long("reformat")
                        .help("Reformat instead of reproducing the source")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("compact")
                        .long("compact")
                        .help("Drop cosmetic spaces when reformatting")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("source-map")
                        .long("source-map")
                        .help("Write a source map to this path"),
                )
                .arg(plugin_arg()),
        )
        .subcommand(Command::new("list-formats").about("List available processing formats"))
        .get_matches();

    let level = if matches.get_flag("verbose") {
        Level::DEBUG
    } else {
        Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match matches.subcommand() {
        Some(("parse", parse_matches)) => handle_parse_command(parse_matches),
        Some(("print", print_matches)) => handle_print_command(print_matches),
        Some(("list-formats", _)) => handle_list_formats_command(),
        _ => unreachable!(),
    }
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

fn plugins(matches: &ArgMatches) -> Vec<String> {
    matches
        .get_many::<String>("plugin")
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> &'a str {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .unwrap_or_else(|| fail(format!("missing argument '{}'", name)))
}

/// Handle the parse command
fn handle_parse_command(matches: &ArgMatches) {
    let path = required(matches, "path");
    let spec = ProcessingSpec::from_string(required(matches, "format")).unwrap_or_else(|e| fail(e));

    let mut extras = HashMap::new();
    let plugins = plugins(matches);
    if !plugins.is_empty() {
        extras.insert("plugins".to_string(), plugins.join(","));
    }
    if matches.get_flag("script") {
        extras.insert("source-type".to_string(), "script".to_string());
    }
    if matches.get_flag("show-linum") {
        extras.insert("show-linum".to_string(), "true".to_string());
    }

    let output = process_file_with_extras(path, &spec, extras).unwrap_or_else(|e| fail(e));
    print!("{}", output);
}

/// Handle the print command
fn handle_print_command(matches: &ArgMatches) {
    let path = required(matches, "path");
    let source = std::fs::read_to_string(path)
        .unwrap_or_else(|e| fail(format!("reading {}: {}", path, e)));

    let mut options = match matches.get_one::<String>("options") {
        Some(options_path) => {
            let text = std::fs::read_to_string(options_path)
                .unwrap_or_else(|e| fail(format!("reading {}: {}", options_path, e)));
            serde_json::from_str::<PrintOptions>(&text)
                .unwrap_or_else(|e| fail(format!("invalid print options: {}", e)))
        }
        None => PrintOptions::default(),
    };
    if matches.get_flag("reformat") {
        options.format.preserve_source = false;
    }
    if matches.get_flag("compact") {
        options.format.compact = true;
    }
    let map_path = matches.get_one::<String>("source-map");
    if map_path.is_some() {
        options.source_maps = true;
        options.source_file_name.get_or_insert_with(|| path.to_string());
    }

    let plugins = plugins(matches);
    let mut parse_options = ParseOptions {
        source_file: Some(path.to_string()),
        ..ParseOptions::default()
    };
    for name in &plugins {
        parse_options = parse_options.with_plugin(name);
    }
    options.plugins.extend(plugins);

    let file = parse(&source, &parse_options)
        .unwrap_or_else(|e| fail(e.render_with_source(&source)));
    let output = print(&file, &source, &options).unwrap_or_else(|e| fail(e));

    for warning in file.warnings.iter().chain(&output.warnings) {
        eprintln!("{}", warning);
    }
    if let (Some(map_path), Some(map)) = (map_path, &output.map) {
        std::fs::write(map_path, map.to_json())
            .unwrap_or_else(|e| fail(format!("writing {}: {}", map_path, e)));
    }
    print!("{}", output.code);
}

/// Handle the list-formats command
fn handle_list_formats_command() {
    println!("Available processing formats:\n");
    for format in available_formats() {
        println!("  {}", format);
    }
}
