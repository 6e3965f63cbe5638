use clap::{Parser, Subcommand};
use pn_config::{ConfigError, NetworkConfig};
use pn_solver::{
    InitialGuess, JacobianMode, SolverError, SteadySolution, solve_network_steady,
    solve_pipe_steady,
};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

#[derive(Parser)]
#[command(name = "pn-cli")]
#[command(about = "Port-Hamiltonian gas network steady-state solver", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a parameter file and the network it describes
    Validate {
        /// Path to the JSON or YAML parameter file
        config_path: PathBuf,
    },
    /// Solve for the steady state
    Steady {
        /// Path to the JSON or YAML parameter file
        config_path: PathBuf,
        /// Start from the zero state instead of the uniform boundary guess
        #[arg(long)]
        zero_guess: bool,
        /// Use finite-difference Jacobians instead of dual numbers
        #[arg(long)]
        finite_difference: bool,
        /// Override the discretization resolution
        #[arg(long)]
        resolution: Option<usize>,
    },
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Solver(#[from] SolverError),
}

type CliResult<T> = Result<T, CliError>;

fn main() -> CliResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { config_path } => cmd_validate(&config_path),
        Commands::Steady {
            config_path,
            zero_guess,
            finite_difference,
            resolution,
        } => cmd_steady(&config_path, zero_guess, finite_difference, resolution),
    }
}

fn cmd_validate(config_path: &Path) -> CliResult<()> {
    println!("Validating parameters: {}", config_path.display());
    let config = pn_config::load(config_path)?;
    let network = config.to_network()?;
    config.gas_context()?;
    println!(
        "✓ Network is valid ({} pipes, {} compressors, resolution {})",
        network.pipes().len(),
        network.compressors().len(),
        config.discretization.resolution
    );
    Ok(())
}

fn cmd_steady(
    config_path: &Path,
    zero_guess: bool,
    finite_difference: bool,
    resolution: Option<usize>,
) -> CliResult<()> {
    let mut config: NetworkConfig = pn_config::load(config_path)?;
    if let Some(resolution) = resolution {
        config.discretization.resolution = resolution;
        pn_config::validate_config(&config).map_err(ConfigError::from)?;
    }

    let network = config.to_network()?;
    let gas = config.gas_context()?;
    let mut solver = config.solver_config();
    if zero_guess {
        solver.initial_guess = InitialGuess::Zero;
    }
    if finite_difference {
        solver.jacobian = JacobianMode::FiniteDifference;
    }

    println!(
        "Running steady-state solve: {} pipes, {} compressors, resolution {}",
        network.pipes().len(),
        network.compressors().len(),
        config.discretization.resolution
    );

    let started = Instant::now();
    let solution = if network.pipes().len() == 1 && network.compressors().is_empty() {
        solve_pipe_steady(
            &network.pipes()[0],
            config.discretization.resolution,
            &gas,
            config.boundary.inlet_pressure,
            config.boundary.outlet_momentum,
            &solver,
        )?
    } else {
        solve_network_steady(
            &network,
            &config.discretization_params(),
            &gas,
            &config.network_boundary(),
            &solver,
        )?
    };
    info!(elapsed_ms = started.elapsed().as_millis() as u64, "steady solve finished");

    print_solution(&solution);
    Ok(())
}

fn print_solution(solution: &SteadySolution) {
    println!(
        "✓ Converged in {} iterations (residual {:.3e})",
        solution.iterations, solution.residual_norm
    );
    println!(
        "  {:<16} {:>14} {:>14} {:>12} {:>12}",
        "pipe", "p_in [Pa]", "p_out [Pa]", "m_in", "m_out"
    );
    for pipe in &solution.pipes {
        println!(
            "  {:<16} {:>14.1} {:>14.1} {:>12.4} {:>12.4}",
            pipe.name,
            pipe.inlet_pressure(),
            pipe.outlet_pressure(),
            pipe.inlet_momentum(),
            pipe.outlet_momentum()
        );
    }
}
