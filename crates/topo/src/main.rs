//! `topo` — Topo language command-line driver.
//!
//! Thin front end over [`topo_core`]: parses a file, an inline `-e`
//! snippet, or the built-in demo program and prints the resulting syntax
//! tree. With `--tokens` it prints the raw token stream instead.
//! Diagnostics go to stderr and a failed parse exits nonzero.

use std::env;
use std::fs;
use std::process::ExitCode;

use topo_core::ast;
use topo_core::error::ParseFailure;
use topo_core::parser;
use topo_core::scanner::Scanner;

/// Demo program covering declarations, control flow, and imports.
const DEMO_SOURCE: &str = "var x = 10
const y = 20

if (x > 5) {
    show(\"x is greater than 5\")
} else {
    show(\"x is 5 or less\")
}

for item in [1, 2, 3] {
    show(item)
}

from math using sin, cos
";

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("topo");

    if args.len() < 2 {
        print_usage(program);
        println!();
        return run_demo();
    }

    match args[1].as_str() {
        "test" => run_demo(),
        "-e" => match args.get(2) {
            Some(code) => {
                println!("=== Parsing code from command line ===\n");
                exit_code(parse_and_dump(code, "<command-line>"))
            }
            None => {
                eprintln!("Error: -e requires a code argument");
                ExitCode::FAILURE
            }
        },
        "--tokens" => match args.get(2).map(String::as_str) {
            Some("-e") => match args.get(3) {
                Some(code) => {
                    println!("=== Analyzing code from command line ===\n");
                    exit_code(dump_tokens(code))
                }
                None => {
                    eprintln!("Error: -e requires a code argument");
                    ExitCode::FAILURE
                }
            },
            Some(path) => {
                let Some(source) = read_source(path) else {
                    return ExitCode::FAILURE;
                };
                println!("=== Analyzing file: {path} ===\n");
                exit_code(dump_tokens(&source))
            }
            None => {
                eprintln!("Error: --tokens requires a file or -e \"code\"");
                ExitCode::FAILURE
            }
        },
        path => {
            let Some(source) = read_source(path) else {
                return ExitCode::FAILURE;
            };
            println!("=== Parsing file: {path} ===\n");
            exit_code(parse_and_dump(&source, path))
        }
    }
}

fn print_usage(program: &str) {
    println!("Topo Language Parser");
    println!();
    println!("Usage:");
    println!("  {program} test               # parse the built-in demo program");
    println!("  {program} file.topo          # parse a file");
    println!("  {program} -e \"code\"          # parse code from the command line");
    println!("  {program} --tokens file.topo # print the token stream of a file");
    println!("  {program} --tokens -e \"code\" # print the token stream of inline code");
}

/// Parse the built-in demo program and print its tree.
fn run_demo() -> ExitCode {
    println!("=== Topo Language Parser Demo ===\n");
    println!("Source code:");
    println!("------------\n{DEMO_SOURCE}------------\n");
    exit_code(parse_and_dump(DEMO_SOURCE, "test.topo"))
}

/// Parse `source` and print the tree, or the diagnostics on failure.
fn parse_and_dump(source: &str, label: &str) -> bool {
    match parser::parse(source, label) {
        Ok(tree) => {
            println!("Parsing successful!");
            println!();
            println!("AST Structure:");
            println!("--------------");
            print!("{}", ast::dump(&tree));
            true
        }
        Err(failure) => {
            report_failure(&failure);
            false
        }
    }
}

/// Print the raw token stream, one numbered token per line.
fn dump_tokens(source: &str) -> bool {
    let (tokens, diagnostics) = Scanner::tokenize_all(source);

    println!("Tokens:");
    println!("-------");
    for (i, token) in tokens.iter().enumerate() {
        println!("{:3}. {}", i + 1, token);
    }
    println!();
    println!("Total tokens: {}", tokens.len());

    for diagnostic in &diagnostics {
        eprintln!("{diagnostic}");
    }
    diagnostics.is_empty()
}

fn report_failure(failure: &ParseFailure) {
    for diagnostic in &failure.diagnostics {
        eprintln!("{diagnostic}");
    }
    eprintln!("{failure}");
}

/// Read a source file as bytes; invalid UTF-8 is replaced, not rejected.
fn read_source(path: &str) -> Option<String> {
    match fs::read(path) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(err) => {
            eprintln!("Error: cannot open file '{path}': {err}");
            None
        }
    }
}

fn exit_code(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
