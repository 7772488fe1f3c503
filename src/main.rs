//! Wirelogic - logic-level circuit propagation demo
//!
//! Builds one of the reference circuits, applies a few edits and prints the
//! node voltages after each one.
//!
//! # Usage
//!
//! ```bash
//! wirelogic --scenario switch -v
//! wirelogic --scenario clock --ticks 4 --interval 250
//! ```

use clap::{Parser, ValueEnum};
use tracing::Level;
use wirelogic_core::{
    components::{Clock, DcVoltage, Ground, Resistor, Switch, SwitchState, Wire},
    error::Result,
    Circuit, ComponentId, Point, DEFAULT_CLOCK_INTERVAL_MS,
};

/// Reference circuit to run
#[derive(Clone, Copy, Debug, ValueEnum)]
enum Scenario {
    /// 5 V source, wire and 1 kΩ load
    Series,
    /// Same circuit with an open switch in place of the wire
    Switch,
    /// Clock driving a load through a wire
    Clock,
}

/// Logic-level circuit propagation demo
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Circuit to build
    #[arg(short, long, value_enum, default_value_t = Scenario::Series)]
    scenario: Scenario,

    /// Clock ticks to simulate (clock scenario)
    #[arg(short, long, default_value_t = 4)]
    ticks: u64,

    /// Clock interval in milliseconds (clock scenario)
    #[arg(short, long, default_value_t = DEFAULT_CLOCK_INTERVAL_MS)]
    interval: u64,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match args.scenario {
        Scenario::Series => run_series(),
        Scenario::Switch => run_switch(),
        Scenario::Clock => run_clock(args.ticks, args.interval),
    }
}

fn p(x: i32, y: i32) -> Point {
    Point::new(x, y)
}

/// Ground plus a 5 V source between (0, 0) and (1, 1).
fn powered_circuit() -> Result<Circuit> {
    let mut circuit = Circuit::new();
    circuit.place(Ground::new(), &[p(0, 0)])?;
    circuit.place(DcVoltage::new(5.0), &[p(0, 0), p(1, 1)])?;
    Ok(circuit)
}

fn run_series() -> Result<()> {
    let mut circuit = powered_circuit()?;
    circuit.place(Wire::new(), &[p(1, 1), p(2, 2)])?;
    let load = circuit.place(Resistor::new(1000.0)?, &[p(2, 2), p(0, 0)])?;
    report(&circuit, "initial", load)?;

    let wire = circuit.id_at(2)?;
    circuit.reconnect(wire, p(2, 2), p(3, 3))?;
    report(&circuit, "wire end moved to (3, 3)", load)?;

    circuit.reconnect(wire, p(3, 3), p(2, 2))?;
    report(&circuit, "wire end moved back", load)
}

fn run_switch() -> Result<()> {
    let mut circuit = powered_circuit()?;
    let switch = circuit.place(Switch::new(SwitchState::Open), &[p(1, 1), p(2, 2)])?;
    let load = circuit.place(Resistor::new(1000.0)?, &[p(2, 2), p(0, 0)])?;
    report(&circuit, "switch open", load)?;

    circuit.close(switch)?;
    report(&circuit, "switch closed", load)?;

    circuit.open(switch)?;
    report(&circuit, "switch open again", load)
}

fn run_clock(ticks: u64, interval: u64) -> Result<()> {
    let mut circuit = Circuit::new();
    circuit.place(Ground::new(), &[p(0, 0)])?;
    circuit.place(Clock::new(5.0, interval)?, &[p(0, 0), p(1, 1)])?;
    circuit.place(Wire::new(), &[p(1, 1), p(2, 2)])?;
    let load = circuit.place(Resistor::new(1000.0)?, &[p(2, 2), p(0, 0)])?;
    report(&circuit, "t = 0 ms", load)?;

    for tick in 1..=ticks {
        circuit.advance_clocks(interval);
        report(&circuit, &format!("t = {} ms", tick.saturating_mul(interval)), load)?;
    }
    Ok(())
}

fn report(circuit: &Circuit, label: &str, load: ComponentId) -> Result<()> {
    println!("== {}", label);
    print!("{}", circuit);
    for node in circuit.nodes() {
        println!("    {}", node);
    }
    println!("    load current = {:.5} A", circuit.current(load)?);
    Ok(())
}
