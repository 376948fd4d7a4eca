use clap::Parser;

use estante_lib::{Args, init_tracing, run};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
  init_tracing();
  run(Args::parse()).await
}
