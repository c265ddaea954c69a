use clap::{Parser, ValueEnum};
use repl::{CommandResult, Repl};

mod repl;

const FILE_EXT: &str = ".sql";

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Print the syntax tree
    #[default]
    Debug,
    /// Print each statement back as SQL
    Sql,
}

/// Parse SQLite CREATE TABLE and SELECT statements into syntax trees.
#[derive(Parser, Debug)]
#[command(name = "sqliteparser", version)]
struct Args {
    /// A .sql file to parse, or SQL text. Starts a REPL when omitted.
    input: Option<String>,

    /// Treat the input as a file path regardless of its extension
    #[arg(short, long)]
    file: bool,

    /// How parsed statements are printed
    #[arg(long, value_enum, default_value_t = OutputFormat::Debug)]
    format: OutputFormat,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let repl = Repl::new(args.format);

    let Some(input) = args.input else {
        println!("sqliteparser");
        repl.run()?;
        return Ok(());
    };

    let looks_like_file = args.file || input.to_lowercase().ends_with(FILE_EXT);

    let result = if looks_like_file {
        repl.eval_file(&input)?
    } else {
        repl.eval_command(&input)
    };

    repl.print_result(&result);

    if let CommandResult::ParseError(_) = result {
        std::process::exit(1);
    }

    Ok(())
}
