use std::{env, fs::read_to_string, path::Path, process, rc::Rc, time::Instant};

use ash_frontend::{
    format_error,
    lexer::lexer::tokenize,
    parser::parser::{parse_with_options, ParseOptions},
};

/// Picks the script path out of argv, or returns the usage line.
fn script_argument(args: &[String]) -> Result<&str, String> {
    match args {
        [_, script] => Ok(script.as_str()),
        _ => {
            let program = args.first().map_or("ash-frontend", String::as_str);
            Err(format!("Usage: {} <script.ash>", program))
        }
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let script = match script_argument(&args) {
        Ok(script) => script,
        Err(usage) => {
            eprintln!("{}", usage);
            process::exit(2);
        }
    };

    let file_path = Path::new(script);
    let file_name = file_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| script.to_string());

    let start = Instant::now();

    let file_contents = match read_to_string(file_path) {
        Ok(contents) => contents,
        Err(error) => {
            eprintln!("Failed to read {}: {}", file_path.display(), error);
            process::exit(1);
        }
    };

    let file = Rc::new(file_name);
    let tokens = tokenize(&file_contents, Rc::clone(&file));

    println!("Tokenized {} tokens in {:?}", tokens.len(), start.elapsed());

    let parse_start = Instant::now();
    let (_, result) = parse_with_options(
        tokens,
        ParseOptions {
            file,
            ..ParseOptions::default()
        },
    );

    println!("Parsed in {:?}", parse_start.elapsed());

    for error in &result.diagnostics {
        println!("{}", format_error(error, &file_contents));
    }

    println!(
        "{} statements, {} errors, total time: {:?}",
        result.tree.len(),
        result.diagnostics.len(),
        start.elapsed()
    );

    if !result.is_ok() {
        process::exit(1);
    }
}
