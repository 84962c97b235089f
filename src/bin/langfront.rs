//! Command-line driver: load -> lex -> parse -> lower -> build scope,
//! in that order, stopping at the first stage that fails.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser as ClapParser;
use log::{debug, info, LevelFilter};
use serde::Serialize;

use langfront::error::CompileError;
use langfront::token::Token;
use langfront::{ast, config::Config, lexer::Lexer, parse, scope::Scope};

/// Front-end pipeline: lex, parse, lower, and build scope for a single
/// source file.
#[derive(ClapParser, Debug)]
#[clap(name = "langfront")]
struct Cli {
    /// Source file to compile.
    file: PathBuf,

    /// Print every token with kind, lexeme, line, and column after lexing.
    #[clap(long)]
    tokens: bool,

    /// Pretty-print the AST after parsing.
    #[clap(long)]
    ast: bool,

    /// Print per-phase timings in milliseconds.
    #[clap(long)]
    time: bool,

    /// Print the populated global scope.
    #[clap(long = "sym-table")]
    sym_table: bool,

    /// Print the token stream as JSON instead of the human-readable dump.
    #[clap(long = "json-tokens")]
    json_tokens: bool,

    /// Disable ANSI escapes in diagnostic output.
    #[clap(long = "no-color")]
    no_color: bool,

    /// Raise logging verbosity: -v for info, -vv for debug.
    #[clap(short = 'v', parse(from_occurrences))]
    verbose: u8,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            eprint!("{e}");
            std::process::exit(1);
        }
        Err(e) => {
            print!("{e}");
            std::process::exit(0);
        }
    };

    match run(cli) {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<(), CompileError> {
    let config = Config::load(&std::env::current_dir().unwrap_or_default())?;

    let level = match cli.verbose {
        0 => config.verbosity.to_level_filter(),
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    let _ = simple_logger::SimpleLogger::new().with_level(level).init();

    let color = !cli.no_color && std::env::var_os("NO_COLOR").is_none() && config.color;

    let t_total = Instant::now();

    let t_load = Instant::now();
    let source = fs::read_to_string(&cli.file).map_err(|source| CompileError::Io {
        path: cli.file.clone(),
        source,
    })?;
    let load_elapsed = t_load.elapsed();
    info!("loaded '{}' ({} bytes)", cli.file.display(), source.len());

    let t_lex = Instant::now();
    let tokens = Lexer::new(&source).tokenize()?;
    let lex_elapsed = t_lex.elapsed();
    debug!("lexed {} tokens", tokens.len());

    if cli.json_tokens {
        println!("{}", tokens_to_json(&tokens));
    } else if cli.tokens {
        for tok in &tokens {
            println!("{}", format_token(tok, color));
        }
    }

    let t_parse = Instant::now();
    let parse_result = parse::Parser::new(tokens).parse_program();
    let parse_elapsed = t_parse.elapsed();

    // The diagnostic printer re-reads its snippet lines from disk by index,
    // so the loaded source buffer isn't needed past this point.
    drop(source);

    let program = match parse_result {
        Ok(program) => program,
        Err(CompileError::Parse(diag)) => {
            let filename = cli.file.display().to_string();
            let rendered = if color {
                diag.render_colored(&filename, &cli.file)
            } else {
                diag.render(&filename, &cli.file)
            };
            eprint!("{rendered}");
            return Err(CompileError::Parse(diag));
        }
        Err(other) => return Err(other),
    };
    debug!("parsed {} top-level declarations", program.decls.len());

    if cli.ast {
        print!("{}", ast::print_program(&program));
    }

    let t_scope = Instant::now();
    let scope = Scope::from_program(&program)?;
    let scope_elapsed = t_scope.elapsed();

    if cli.sym_table {
        print!("{}", scope.print());
    }

    if cli.time {
        eprintln!(
            "Timings (ms): load={:.3} lex={:.3} parse={:.3} scope={:.3} total={:.3}",
            load_elapsed.as_secs_f64() * 1000.0,
            lex_elapsed.as_secs_f64() * 1000.0,
            parse_elapsed.as_secs_f64() * 1000.0,
            scope_elapsed.as_secs_f64() * 1000.0,
            t_total.elapsed().as_secs_f64() * 1000.0,
        );
    }

    Ok(())
}

fn format_token(tok: &Token, color: bool) -> String {
    if color {
        format!(
            "\x1b[1;34m<{}>\x1b[0m \x1b[0;32m\"{}\"\x1b[0m \x1b[0;37m{}:{}\x1b[0m",
            tok.kind, tok.lexeme, tok.line, tok.column
        )
    } else {
        format!("<{}> \"{}\" {}:{}", tok.kind, tok.lexeme, tok.line, tok.column)
    }
}

#[derive(Serialize)]
struct TokenJson {
    #[serde(rename = "type")]
    kind: String,
    value: String,
    line: u32,
    col: u32,
}

impl From<&Token> for TokenJson {
    fn from(tok: &Token) -> Self {
        TokenJson {
            kind: tok.kind.to_string(),
            value: tok.lexeme.to_string(),
            line: tok.line,
            col: tok.column,
        }
    }
}

fn tokens_to_json(tokens: &[Token]) -> String {
    let dump: Vec<TokenJson> = tokens.iter().map(TokenJson::from).collect();
    serde_json::to_string(&dump).expect("token dump is always representable as JSON")
}
