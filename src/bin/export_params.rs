use aqtsim::{loader, model, AqtDenseModel};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "aqtsim-export", about = "Write the built-in example model (and optionally its input) as JSON")]
struct Args {
    #[arg(long, default_value = "out/aqt_dense.json")]
    out: PathBuf,
    /// Also write the example activation here
    #[arg(long)]
    input_out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let a = Args::parse();
    if let Some(dir) = a.out.parent() {
        if !dir.as_os_str().is_empty() { std::fs::create_dir_all(dir)?; }
    }
    let m = AqtDenseModel::example()?;
    loader::save_model(&m, &a.out)?;
    eprintln!("Wrote {} layers to {}", m.layers().len(), a.out.display());
    if let Some(p) = a.input_out {
        std::fs::write(&p, serde_json::to_string_pretty(&model::example_activation())?)?;
        eprintln!("Wrote example activation to {}", p.display());
    }
    Ok(())
}
