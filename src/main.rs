use clap::Parser;
use opshell::cli::{self, Cli, Command};
use opshell::config::SessionConfig;
use opshell::confirm::StdinConfirm;
use opshell::engine::Engine;
use opshell::error::EngineError;
use opshell::registry::OperationRegistry;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

// Exit codes: 2 for invocation errors caught before any remote call,
// 1 for captured service/transport faults.
const EXIT_PRE_CALL: u8 = 2;
const EXIT_FAULT: u8 = 1;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "opshell=debug" } else { "opshell=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::List => {
            list_operations();
            ExitCode::SUCCESS
        }
        Command::Invoke(tokens) => {
            run_invocation(cli.region.as_deref(), cli.endpoint_url, &tokens).await
        }
    }
}

fn list_operations() {
    let registry = OperationRegistry::builtin();
    for op in registry.iter() {
        println!("{:<24} {}.{}", op.command, op.service, op.operation);
        for param in op.params {
            let marker = if param.required { "*" } else { " " };
            println!("  {}--{:<48} {:?}", marker, param.name, param.kind);
        }
    }
}

async fn run_invocation(
    region: Option<&str>,
    endpoint_url: Option<String>,
    tokens: &[String],
) -> ExitCode {
    let registry = OperationRegistry::builtin();
    let Some(spec) = tokens.first().and_then(|name| registry.find(name)) else {
        eprintln!(
            "error: unknown command '{}' (try `opshell list`)",
            tokens.first().map(String::as_str).unwrap_or("")
        );
        return ExitCode::from(EXIT_PRE_CALL);
    };

    let invocation = match cli::parse_invocation(spec, &tokens[1..]) {
        Ok(inv) => inv,
        Err(err) => {
            eprintln!("error: {}", err);
            return ExitCode::from(EXIT_PRE_CALL);
        }
    };

    let session = SessionConfig::resolve(region, endpoint_url);
    let engine = Engine::new(session).with_confirm(Box::new(StdinConfirm));

    let output = match engine.run(invocation).await {
        Ok(output) => output,
        Err(err) => {
            eprintln!("error: {}", err);
            return ExitCode::from(EXIT_PRE_CALL);
        }
    };

    if output.skipped {
        eprintln!("operation not performed: declined at confirmation");
        return ExitCode::SUCCESS;
    }
    if let Some(err) = output.error {
        match &err {
            EngineError::Transport(e) | EngineError::Remote(e) => eprintln!("error: {}", e),
            other => eprintln!("error: {}", other),
        }
        return ExitCode::from(EXIT_FAULT);
    }

    let pipeline = output.pipeline_output.unwrap_or(serde_json::Value::Null);
    match serde_json::to_string_pretty(&pipeline) {
        Ok(rendered) => println!("{}", rendered),
        Err(_) => println!("{}", pipeline),
    }
    ExitCode::SUCCESS
}
