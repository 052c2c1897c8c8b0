use clap::Parser;
use log::debug;
use offside_ast::pretty::print_bindings;
use offside_parser::{parse_reader, Program};
use offside_runtime::{eval_bindings, EvalError};
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::process;

/// Status for every failed run (the `-1` of a C-style driver, as the OS sees it).
const EXIT_FAILURE: i32 = 255;

#[derive(Parser, Debug)]
#[command(
    name = "offside",
    version,
    about = "Interpreter for Offside, a lazy language with layout-sensitive scoping"
)]
struct Opt {
    /// Program to evaluate; its `root` binding is printed
    source_file: PathBuf,

    /// Print the parsed bindings instead of evaluating
    #[arg(long = "dump-ast", default_value_t = false)]
    dump_ast: bool,

    /// Print the parsed bindings as JSON instead of evaluating
    #[arg(long = "dump-ast-json", default_value_t = false)]
    dump_ast_json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let opt = Opt::parse();

    let file = match File::open(&opt.source_file) {
        Ok(file) => file,
        Err(e) => fail(format_args!("{}: {}", opt.source_file.display(), e)),
    };
    let program: Program = match parse_reader(BufReader::new(file)) {
        Ok(program) => program,
        Err(e) => fail(format_args!("parse error: {e}")),
    };
    debug!("parsed {} top-level binding(s) from {}", program.bindings.len(), opt.source_file.display());

    // dump modes take precedence over evaluation
    if opt.dump_ast_json {
        println!("{}", serde_json::to_string_pretty(&program.bindings)?);
        return Ok(());
    }
    if opt.dump_ast {
        print!("{}", print_bindings(&program.bindings));
        return Ok(());
    }

    match eval_bindings(&program.bindings, program.end) {
        Ok(out) => {
            println!("{out}");
            Ok(())
        }
        Err(e) => fail(render_eval_error(&e)),
    }
}

fn render_eval_error(e: &EvalError) -> String {
    let mut out = format!("eval error: {e}");
    for span in e.trace() {
        out.push_str(&format!("\n    at {span}"));
    }
    out
}

fn fail(msg: impl fmt::Display) -> ! {
    eprintln!("{msg}");
    process::exit(EXIT_FAILURE)
}
