use std::process::ExitCode;

use clap::Parser;
use kubectl_lifecycle::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
  // kube builds its TLS config from the process-wide default provider
  if let Err(e) = rustls::crypto::aws_lc_rs::default_provider().install_default() {
    eprintln!("Error: failed to install the TLS crypto provider: {e:?}");
    return ExitCode::FAILURE;
  }

  let cli = match Cli::try_parse() {
    Ok(cli) => cli,
    Err(err) => {
      let _ = err.print();
      // `--help` and `--version` are reported through the same path
      return if err.use_stderr() {
        ExitCode::FAILURE
      } else {
        ExitCode::SUCCESS
      };
    }
  };

  let subscriber = tracing_subscriber::fmt()
    .with_max_level(cli.verbose.tracing_level_filter())
    .with_writer(std::io::stderr)
    .finish();
  if tracing::subscriber::set_global_default(subscriber).is_ok() {
    let _ = tracing_log::LogTracer::init_with_filter(cli.verbose.log_level_filter());
  }

  match kubectl_lifecycle::run(&cli).await {
    Ok(code) => code,
    Err(err) => {
      eprintln!("Error: {err:#}");
      ExitCode::FAILURE
    }
  }
}
