//! Price command implementation
//!
//! Builds a uniform trinomial tree and a contract from the command line and
//! values it with the time-boxed driver.

use clap::{Args, ValueEnum};
use pricer_core::math::UniformProbabilities;
use pricer_core::traits::{GeometricLayer, LatticeFunction};
use pricer_models::instruments::{
    AmericanOption, AsianArithmeticOption, BarrierKnockOutOption, BarrierType, BermudanOption,
    EuropeanOption, OptionParams, PutCall, DEFAULT_AVERAGE_POINTS,
};
use pricer_pricing::{LatticeConfig, LatticeGreeks, TimeBoxedInduction, UniformTrinomialTree};
use tracing::info;

use crate::{CliError, Result};

/// Exercise style / contract variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Style {
    European,
    American,
    Bermudan,
    Barrier,
    Asian,
}

/// Payoff direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PutCallArg {
    Call,
    Put,
}

impl From<PutCallArg> for PutCall {
    fn from(arg: PutCallArg) -> Self {
        match arg {
            PutCallArg::Call => PutCall::Call,
            PutCallArg::Put => PutCall::Put,
        }
    }
}

/// Knock-out direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BarrierTypeArg {
    UpAndOut,
    DownAndOut,
}

impl From<BarrierTypeArg> for BarrierType {
    fn from(arg: BarrierTypeArg) -> Self {
        match arg {
            BarrierTypeArg::UpAndOut => BarrierType::UpAndOut,
            BarrierTypeArg::DownAndOut => BarrierType::DownAndOut,
        }
    }
}

/// Arguments of `lattice price`
#[derive(Debug, Clone, Args)]
pub struct PriceArgs {
    /// Contract variant
    #[arg(long, value_enum, default_value = "european")]
    pub style: Style,

    /// Payoff direction
    #[arg(long, value_enum, default_value = "call")]
    pub put_call: PutCallArg,

    /// Strike price
    #[arg(long)]
    pub strike: f64,

    /// Time to expiry in years
    #[arg(long, default_value = "1.0")]
    pub expiry: f64,

    /// Barrier level (barrier style)
    #[arg(long)]
    pub barrier: Option<f64>,

    /// Barrier direction (barrier style)
    #[arg(long, value_enum, default_value = "up-and-out")]
    pub barrier_type: BarrierTypeArg,

    /// Rebate paid on knock-out (barrier style)
    #[arg(long, default_value = "0.0")]
    pub rebate: f64,

    /// Comma-separated exercise times in years (bermudan style)
    #[arg(long, value_delimiter = ',')]
    pub exercise_times: Vec<f64>,

    /// Representative averages per node (asian style)
    #[arg(long, default_value_t = DEFAULT_AVERAGE_POINTS)]
    pub average_points: usize,

    /// Spot at the root node
    #[arg(long, default_value = "100.0")]
    pub spot: f64,

    /// Number of tree steps
    #[arg(long, default_value = "100")]
    pub steps: usize,

    /// Down factor of the tree
    #[arg(long, default_value = "0.98")]
    pub down_factor: f64,

    /// Middle factor of the tree
    #[arg(long, default_value = "1.0")]
    pub middle_factor: f64,

    /// Probability of a down move
    #[arg(long, default_value = "0.25")]
    pub p_down: f64,

    /// Probability of a middle move
    #[arg(long, default_value = "0.5")]
    pub p_middle: f64,

    /// Probability of an up move
    #[arg(long, default_value = "0.25")]
    pub p_up: f64,

    /// Discount factor per step
    #[arg(long, default_value = "0.9995")]
    pub discount_factor: f64,

    /// Also report delta, gamma and theta
    #[arg(long)]
    pub greeks: bool,
}

/// Price and optional Greeks of one run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Valuation {
    pub price: f64,
    pub greeks: Option<LatticeGreeks>,
}

/// Run the price command
pub fn run(args: &PriceArgs, config: &LatticeConfig) -> Result<()> {
    info!("Starting pricing...");
    info!("  Style: {:?} {:?}", args.style, args.put_call);
    info!("  Strike: {}, expiry: {}", args.strike, args.expiry);
    info!("  Tree: {} steps from spot {}", args.steps, args.spot);

    let valuation = value(args, config)?;
    print_table(args, &valuation);

    info!("Pricing complete");
    Ok(())
}

/// Builds tree and contract and values the contract.
pub fn value(args: &PriceArgs, config: &LatticeConfig) -> Result<Valuation> {
    let tree = build_tree(args, config)?;
    let boxed = TimeBoxedInduction::from_config(config);
    let params = OptionParams::new(args.strike, args.expiry)?;
    let put_call = PutCall::from(args.put_call);

    match args.style {
        Style::European => evaluate(&EuropeanOption::new(params, put_call), &tree, &boxed, args),
        Style::American => evaluate(&AmericanOption::new(params, put_call), &tree, &boxed, args),
        Style::Bermudan => {
            if args.exercise_times.is_empty() {
                return Err(CliError::InvalidArgument(
                    "--exercise-times is required for the bermudan style".to_string(),
                ));
            }
            let option = BermudanOption::from_exercise_times(
                params,
                put_call,
                &args.exercise_times,
                args.steps,
            )?;
            evaluate(&option, &tree, &boxed, args)
        }
        Style::Barrier => {
            let barrier = args.barrier.ok_or_else(|| {
                CliError::InvalidArgument("--barrier is required for the barrier style".to_string())
            })?;
            let option = BarrierKnockOutOption::new(
                params,
                put_call,
                barrier,
                args.barrier_type.into(),
                args.rebate,
            )?;
            evaluate(&option, &tree, &boxed, args)
        }
        Style::Asian => {
            if args.greeks {
                return Err(CliError::InvalidArgument(
                    "--greeks is not available for the asian style".to_string(),
                ));
            }
            let option = AsianArithmeticOption::new(params, put_call, args.average_points)?;
            Ok(Valuation {
                price: boxed.price(&option, &tree)?,
                greeks: None,
            })
        }
    }
}

fn build_tree(args: &PriceArgs, config: &LatticeConfig) -> Result<UniformTrinomialTree> {
    let tree = UniformTrinomialTree::with_tolerance(
        GeometricLayer::new(args.spot, args.down_factor, args.middle_factor),
        args.steps,
        UniformProbabilities::new(args.p_down, args.p_middle, args.p_up),
        args.discount_factor,
        config.probability_tolerance,
    )?;
    Ok(tree)
}

fn evaluate<F>(
    function: &F,
    tree: &UniformTrinomialTree,
    boxed: &TimeBoxedInduction,
    args: &PriceArgs,
) -> Result<Valuation>
where
    F: LatticeFunction<Node = f64>,
{
    if args.greeks {
        let greeks = boxed.greeks(function, tree)?;
        Ok(Valuation {
            price: greeks.price,
            greeks: Some(greeks),
        })
    } else {
        Ok(Valuation {
            price: boxed.price(function, tree)?,
            greeks: None,
        })
    }
}

fn print_table(args: &PriceArgs, valuation: &Valuation) {
    let label = format!("{:?} {:?}", args.style, args.put_call).to_lowercase();
    println!("\n┌────────────┬──────────────────────┐");
    println!("│ {:<10} │ {:>20} │", "Contract", label);
    println!("├────────────┼──────────────────────┤");
    println!("│ {:<10} │ {:>20.8} │", "Price", valuation.price);
    if let Some(greeks) = &valuation.greeks {
        println!("│ {:<10} │ {:>20.8} │", "Delta", greeks.delta);
        println!("│ {:<10} │ {:>20.8} │", "Gamma", greeks.gamma);
        println!("│ {:<10} │ {:>20.8} │", "Theta", greeks.theta);
    }
    println!("└────────────┴──────────────────────┘");
}
