//! Feeds stdin through a chain of string-processing plugins.
mod cli;
mod config;
mod error;
mod input;
mod runtime;

use cli::Cli;
use config::PipelineConfiguration;
use libload::StandardResolver;
use runtime::Pipeline;
use std::io;
use std::process::exit;
use toml::toml;

fn main() {
    let cli = Cli::parse_or_exit();

    if let Some(info) = cli.info {
        if info.print_example_config {
            println!(
                "{}",
                toml! {
                    queue_size = 20
                    plugins = ["uppercaser", "rotator", "logger"]
                }
            );
        }
        return;
    }

    let configuration = if let Some(path) = cli.config {
        match PipelineConfiguration::from_file(&path) {
            Ok(configuration) => configuration,
            Err(e) => {
                eprintln!("error: {e}");
                exit(1);
            }
        }
    } else if let Some(args) = cli.args {
        PipelineConfiguration {
            queue_size: args.queue_size,
            plugins: args.plugins,
        }
    } else {
        cli::argument_failure("missing arguments");
    };

    if configuration.plugins.is_empty() {
        cli::argument_failure("missing arguments");
    }

    let resolver = StandardResolver::new();
    let pipeline = match Pipeline::load(&resolver, &configuration.plugins) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            eprintln!("error: {e}");
            cli::print_usage();
            exit(1);
        }
    };

    if let Err(e) = pipeline.init(configuration.queue_size) {
        eprintln!("error: {e}");
        exit(2);
    }

    if let Err(e) = pipeline.attach_chain() {
        eprintln!("error: {e}");
        exit(3);
    }

    pipeline.feed(io::stdin().lock());
    pipeline.drain();
    pipeline.teardown();

    println!("Pipeline shutdown complete");
}
