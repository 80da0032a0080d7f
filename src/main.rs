//! Selection-menu binary for the workbench: run a circuit by number, run a
//! kernel benchmark suite, or drop into an interactive loop.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use ckks_workbench::circuits::{self, CircuitOutcome, RunOpts};
use ckks_workbench::kernels::{self, BenchConfig};
use ckks_workbench::params;

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

#[derive(Parser)]
#[command(
    name = "ckks-workbench",
    about = "CKKS kernel benchmarks and correctness circuits over Microsoft SEAL"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the circuit catalogue.
    List,
    /// Run one circuit by its catalogue id.
    Test {
        id: u32,
        /// Half-width of the random input range (entry defaults apply when
        /// omitted).
        #[arg(long)]
        range_limit: Option<f64>,
        /// Repetitions for accumulating circuits.
        #[arg(long, default_value_t = 10)]
        acc_runs: usize,
        #[arg(long, default_value_t = 0x0ddba11)]
        seed: u64,
        /// Suppress the step-by-step transcript.
        #[arg(long)]
        quiet: bool,
    },
    /// Run a timed kernel suite over the settings table.
    Bench {
        #[arg(value_enum)]
        suite: Suite,
        #[arg(long, default_value_t = 10)]
        runs: usize,
        #[arg(long, default_value_t = 0x5ca1ab1e)]
        seed: u64,
        /// Directory for CSV files.
        #[arg(long, default_value = "output")]
        out_dir: PathBuf,
        /// Skip CSV output.
        #[arg(long)]
        no_csv: bool,
    },
    /// Interactive numbered menu (the default).
    Menu,
}

#[derive(Copy, Clone, ValueEnum)]
enum Suite {
    /// −(A² + B·C + 3·D + c), kernels timed inside the expression.
    Expr,
    /// Each kernel on standalone operands.
    Elementary,
}

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    let cli = Cli::parse();
    match cli.command.unwrap_or(Command::Menu) {
        Command::List => print_catalogue(),
        Command::Test {
            id,
            range_limit,
            acc_runs,
            seed,
            quiet,
        } => {
            let mut opts = RunOpts {
                acc_runs,
                seed,
                quiet,
                ..RunOpts::default()
            };
            if let Some(limit) = range_limit {
                opts.range_limit = limit;
            }
            run_circuit(id, &opts);
        }
        Command::Bench {
            suite,
            runs,
            seed,
            out_dir,
            no_csv,
        } => {
            let cfg = BenchConfig {
                runs,
                seed,
                out_dir: (!no_csv).then_some(out_dir),
                ..BenchConfig::default()
            };
            run_bench(suite, &cfg);
        }
        Command::Menu => menu_loop(),
    }
}

fn print_catalogue() {
    println!("+----------------------------------------------------------------------+");
    println!("| ******** Circuits ********                                           |");
    for entry in circuits::catalogue() {
        println!("| {:>2}. {:<52} [{:<11}] |", entry.id, entry.title, entry.tag);
    }
    println!("| ******** Benchmarks ********                                         |");
    println!("| 31. Kernel suite based on -(A^2 + BC + 3D + coeff)                   |");
    println!("| 32. Kernel suite on standalone operands                              |");
    println!("+----------------------------------------------------------------------+");
}

fn run_circuit(id: u32, opts: &RunOpts) {
    let Some(entry) = circuits::find(id) else {
        eprintln!("no circuit with id {id}");
        return;
    };
    println!("── {} [{}]", entry.title, entry.tag);
    match (entry.run)(opts) {
        Ok(outcome) => print_outcome(&outcome),
        Err(err) => println!("Exception -----> {err}"),
    }
}

fn print_outcome(outcome: &CircuitOutcome) {
    let verdict = if outcome.passed { "PASS" } else { "FAIL" };
    println!(
        "── {} {} (worst error {:.4}%)",
        outcome.title, verdict, outcome.worst_error_pct
    );
    for note in &outcome.notes {
        println!("   note: {note}");
    }
}

fn run_bench(suite: Suite, cfg: &BenchConfig) {
    let settings = params::kernel_settings();
    let result = match suite {
        Suite::Expr => kernels::run_expression_suite(&settings, cfg),
        Suite::Elementary => kernels::run_elementary_suite(&settings, cfg),
    };
    if let Err(err) = result {
        println!("Exception -----> {err}");
    }
}

fn menu_loop() {
    println!("+----------------------------------------+");
    println!("| CKKS workbench over Microsoft SEAL     |");
    println!("+----------------------------------------+");
    let stdin = io::stdin();
    loop {
        print_catalogue();
        print!("\n> Run circuit/benchmark or exit (0): ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => {
                println!("bye!");
                return;
            }
            Ok(_) => {}
        }
        let selection: u32 = match line.trim().parse() {
            Ok(n) => n,
            Err(_) => {
                println!("  invalid selection");
                continue;
            }
        };
        match selection {
            0 => {
                println!("bye!");
                return;
            }
            31 => run_bench(Suite::Expr, &BenchConfig::default()),
            32 => run_bench(Suite::Elementary, &BenchConfig::default()),
            id => run_circuit(id, &RunOpts::default()),
        }
    }
}
