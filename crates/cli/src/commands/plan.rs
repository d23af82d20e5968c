// Resolution plan command

use anyhow::{Context, Result};
use authgen_core::{GenerationReport, HttpAuthSchemeProviderGenerator, SchemeRegistry};
use std::path::PathBuf;

use crate::loader::{load_config, load_model};
use crate::output::{print_field, OutputFormat};

pub struct PlanArgs {
    pub model: PathBuf,
    pub config: Option<PathBuf>,
    pub service_name: Option<String>,
}

pub fn run(args: PlanArgs, registry: &SchemeRegistry, output: OutputFormat) -> Result<()> {
    let model = load_model(&args.model)?;
    let config = load_config(
        args.config.as_deref(),
        args.service_name.as_deref(),
        &model,
    )?;

    let report = HttpAuthSchemeProviderGenerator::new(&config, &model, registry)
        .plan()
        .context("Failed to plan auth scheme provider")?;

    if output.is_text() {
        print_report(&report);
        Ok(())
    } else {
        output.print_value(&report)
    }
}

fn print_report(report: &GenerationReport) {
    print_field("Service", &report.service_name);
    print_field("Mode", &report.mode.to_string());
    print_field("Default", &report.default.to_string());

    let parameters = if report.parameters.is_empty() {
        "-".to_string()
    } else {
        report.parameters.join(", ")
    };
    print_field("Parameters", &parameters);

    println!();
    println!("Option factories:");
    for factory in &report.option_factories {
        let note = if factory.registered { "" } else { " (unregistered)" };
        println!("  {} -> {}{}", factory.scheme_id, factory.function_name, note);
    }

    println!();
    if report.branches.is_empty() {
        println!("No operation overrides the service default");
    } else {
        println!("Operation branches:");
        for branch in &report.branches {
            println!("  {} -> {}", branch.operation, branch.schemes);
        }
    }
}
