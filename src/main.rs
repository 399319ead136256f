use clap::{Parser, Subcommand};
use polyfill_utils::demos::{self, DEMOS};
use polyfill_utils::{EvalError, Evaluator, Registry};
use tracing::{debug, Level};

/// Runs the built-in demonstrations or evaluates an expression.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one demo by name, or all of them
    Demo {
        /// apply, call, filter, map or reduce
        name: Option<String>,
        /// Print a JSON report per demo instead of the plain line
        #[arg(long)]
        json: bool,
    },
    /// Evaluate an expression such as `map([1,2,3], bind(times, null, 2))`
    Eval {
        expr: String,
    },
}

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(args.command) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<(), EvalError> {
    match command {
        Command::Demo { name, json } => {
            let selected: Vec<_> = match name {
                Some(name) => vec![demos::find(&name)
                    .ok_or_else(|| EvalError::Runtime(format!("no demo named `{name}`")))?],
                None => DEMOS.iter().collect(),
            };
            for demo in selected {
                debug!(demo = demo.name, "running");
                let report = demo.report()?;
                if json {
                    let out = serde_json::to_string(&report)
                        .map_err(|e| EvalError::Runtime(e.to_string()))?;
                    println!("{out}");
                } else {
                    println!("{}", report.output);
                }
            }
        }
        Command::Eval { expr } => {
            let ev = Evaluator::new(Registry::with_builtins());
            let out = ev.eval(&expr)?;
            let pretty = serde_json::to_string_pretty(&out)
                .map_err(|e| EvalError::Runtime(e.to_string()))?;
            println!("{pretty}");
        }
    }
    Ok(())
}
