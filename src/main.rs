//! rowdb shell
//!
//! Runs SQL interactively or from a script file.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use rowdb::ast::{CreateTable, Statement};
use rowdb::parser::Parser as SqlParser;
use rowdb::render::{OutputMode, render};
use rowdb::tokenizer::{Tokenizer, format_tokens, has_statement_end, parens_balanced};
use rowdb::{Database, Error, executor, persistence};

/// In-memory SQL database shell.
#[derive(Parser)]
#[command(name = "rowdb")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Run the statements of this SQL script, then exit.
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Import a JSON snapshot before running anything.
    #[arg(long)]
    load: Option<PathBuf>,

    /// Export a JSON snapshot on exit.
    #[arg(long)]
    save: Option<PathBuf>,

    /// Output format for query results (table or csv).
    #[arg(short, long, default_value = "table")]
    mode: OutputMode,

    /// Keep running a script after a statement fails.
    #[arg(long)]
    keep_going: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

const HELP: &str = "\
Statements end with ';' and may span several lines.

  CREATE TABLE t (id int, name str)
  INSERT INTO t [(col, ...)] VALUES (1, 'x')
  SELECT * | col, ... FROM t [INNER JOIN u ON cond]... [WHERE cond]
  UPDATE t SET col = value, ... [WHERE cond]
  DELETE FROM t [WHERE cond]

Meta-commands:
  .help                 show this text
  .tables               list tables
  .schema [table]       show table definitions
  .stats                table and row counts
  .drop <table>         drop a table
  .mode table|csv       choose the result format
  .tokens <sql>         show the tokens of a statement
  .ast <sql>            show the parsed statements
  .export <path>        write a JSON snapshot
  .import <path>        replace the database with a JSON snapshot
  .quit | .exit         leave the shell
";

enum Flow {
    Continue,
    Quit,
}

struct Shell {
    db: Database,
    mode: OutputMode,
    keep_going: bool,
}

impl Shell {
    /// Runs the statements in `sql` one at a time; returns `false` if any of
    /// them failed.
    fn run_sql(&mut self, sql: &str) -> bool {
        let mut tokenizer = Tokenizer::new(sql);
        let mut ok = true;
        while let Some(tokens) = tokenizer.next_statement() {
            let tokens = match tokens {
                Ok(tokens) => tokens,
                Err(err) => {
                    eprintln!("Error: {}", Error::from(err));
                    ok = false;
                    if !self.keep_going {
                        return false;
                    }
                    continue;
                }
            };

            for statement in SqlParser::new(tokens) {
                let outcome = statement
                    .map_err(Error::from)
                    .and_then(|s| executor::execute(&s, &mut self.db).map_err(Error::from));
                match outcome {
                    Ok(result) => print!("{}", render(&result, self.mode)),
                    Err(err) => {
                        eprintln!("Error: {err}");
                        ok = false;
                        if !self.keep_going {
                            return false;
                        }
                    }
                }
            }
        }
        ok
    }

    fn print_schema(&self, name: &str) -> Result<(), Error> {
        let table = self.db.get_table(name)?;
        let create = Statement::CreateTable(CreateTable {
            name: table.name.clone(),
            columns: table.schema.columns.clone(),
        });
        println!("{create};");
        Ok(())
    }

    fn meta(&mut self, line: &str) -> Result<Flow, Error> {
        let (command, arg) = match line.split_once(char::is_whitespace) {
            Some((command, arg)) => (command, arg.trim()),
            None => (line, ""),
        };

        match command {
            ".quit" | ".exit" => return Ok(Flow::Quit),
            ".help" => print!("{HELP}"),
            ".tables" => {
                for name in self.db.list_tables() {
                    println!("{name}");
                }
            }
            ".schema" if arg.is_empty() => {
                for name in self.db.list_tables() {
                    self.print_schema(name)?;
                }
            }
            ".schema" => self.print_schema(arg)?,
            ".stats" => {
                let stats = self.db.stats();
                println!("{} tables, {} rows", stats.table_count, stats.total_rows);
                for (name, rows) in stats.tables {
                    println!("  {name}: {rows}");
                }
            }
            ".drop" => self.db.drop_table(arg)?,
            ".mode" => match arg.parse() {
                Ok(mode) => self.mode = mode,
                Err(err) => eprintln!("{err}"),
            },
            ".tokens" => {
                let tokens = Tokenizer::new(arg).tokenize()?;
                print!("{}", format_tokens(&tokens));
                if !parens_balanced(&tokens) {
                    println!("warning: unbalanced parentheses");
                }
            }
            ".ast" => {
                let tokens = Tokenizer::new(arg).tokenize()?;
                for statement in SqlParser::new(tokens).parse_all()? {
                    println!("{statement}");
                    println!("{statement:#?}");
                }
            }
            ".export" => persistence::save(&self.db, Path::new(arg))?,
            ".import" => self.db = persistence::load(Path::new(arg))?,
            _ => eprintln!("unknown command '{command}', try .help"),
        }
        Ok(Flow::Continue)
    }

    fn repl(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        let mut buffer = String::new();

        loop {
            let prompt = if buffer.is_empty() { "rowdb> " } else { "   ...> " };
            write!(stdout, "{prompt}")?;
            stdout.flush()?;

            let mut line = String::new();
            if stdin.lock().read_line(&mut line)? == 0 {
                break;
            }
            let trimmed = line.trim();

            if buffer.is_empty() {
                if trimmed.is_empty() {
                    continue;
                }
                if trimmed.starts_with('.') {
                    match self.meta(trimmed) {
                        Ok(Flow::Quit) => return Ok(()),
                        Ok(Flow::Continue) => {}
                        Err(err) => eprintln!("Error: {err}"),
                    }
                    continue;
                }
            }

            buffer.push_str(&line);
            if has_statement_end(&buffer) {
                self.run_sql(&buffer);
                buffer.clear();
            }
        }

        if !buffer.trim().is_empty() {
            self.run_sql(&buffer);
        }
        Ok(())
    }
}

fn run(cli: Cli) -> anyhow::Result<bool> {
    let db = match &cli.load {
        Some(path) => persistence::load(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => Database::new(),
    };

    let mut shell = Shell {
        db,
        mode: cli.mode,
        keep_going: true,
    };

    let ok = match &cli.file {
        Some(path) => {
            let script = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            shell.keep_going = cli.keep_going;
            shell.run_sql(&script)
        }
        None => {
            println!("rowdb {} - type .help for help", env!("CARGO_PKG_VERSION"));
            shell.repl()?;
            true
        }
    };

    if let Some(path) = &cli.save {
        persistence::save(&shell.db, path)
            .with_context(|| format!("failed to save {}", path.display()))?;
    }
    Ok(ok)
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(if run(cli)? {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
