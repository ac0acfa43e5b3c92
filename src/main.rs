use anyhow::{Context, Result};
use aqtsim::{loader, model, AqtDenseModel, Matrix};
use clap::Parser;
use log::{debug, info};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(author, version, about = "Run the simulated AQT dense network and print its signature", long_about = None)]
struct Args {
    /// Model file (JSON); defaults to the built-in two-layer example
    #[arg(long)]
    params: Option<PathBuf>,

    /// Input activation file (JSON nested rows); defaults to arange(30)/10.4 as 5x6
    #[arg(long)]
    input: Option<PathBuf>,

    /// Worker threads for the matmul
    #[arg(long, default_value_t = 1)]
    threads: usize,

    /// Emit a JSON document instead of text
    #[arg(long)]
    json: bool,

    /// Debug logging
    #[arg(long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    if verbose {
        env_logger::Builder::new().filter_level(log::LevelFilter::Debug).init();
    } else {
        env_logger::init();
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let net = match &args.params {
        Some(p) => loader::load_model(p)?,
        None => AqtDenseModel::example()?,
    };
    let activation: Matrix = match &args.input {
        Some(p) => loader::load_activation(p)?,
        None => model::example_activation(),
    };
    info!("model: {} layers, input {:?}", net.layers().len(), activation.shape());

    let sig = net.signature(activation.shape()).context("specialize model to input shape")?;

    let pool = rayon::ThreadPoolBuilder::new().num_threads(args.threads.max(1)).build()
        .context("build thread pool")?;
    let t0 = Instant::now();
    let out = pool.install(|| net.forward(&activation)).context("run model")?;
    debug!("forward took {:?}", t0.elapsed());

    if args.json {
        let doc = serde_json::json!({
            "signature": sig.to_string(),
            "input_shape": [sig.input.0, sig.input.1],
            "output_shape": [sig.output.0, sig.output.1],
            "output": out,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        println!("{}", sig);
        println!("{}", out);
    }
    Ok(())
}
