use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use serde_json::{Map, Value as Json};

use apimap_core::model::{Operation, Resource, Schema, Service, plan_request};
use apimap_core::registry::{Registry, split_selector_version};

#[derive(Parser)]
#[command(name = "apimap", about = "Browse API descriptors through one uniform model", version)]
struct Cli {
    /// Directory holding the service tree
    #[arg(long, global = true, default_value = "services")]
    services: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every service under the services directory
    Services,

    /// Describe a service, resource or operation
    Describe {
        /// `service[@version][.resource[.operation]]`
        selector: String,
    },

    /// Print the request an operation would issue
    Request {
        /// `service[@version].resource.operation`
        selector: String,

        /// Arguments as `key=value`; values that parse as JSON are kept typed
        args: Vec<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// A parsed `service[@version][.resource[.operation]]` selector.
struct Selector<'a> {
    service: &'a str,
    version: Option<&'a str>,
    resource: Option<&'a str>,
    operation: Option<&'a str>,
}

impl<'a> Selector<'a> {
    fn parse(input: &'a str) -> Self {
        let mut parts = input.splitn(3, '.');
        let head = parts.next().unwrap_or_default();
        let (service, version) = split_selector_version(head);
        Self {
            service,
            version,
            resource: parts.next().filter(|s| !s.is_empty()),
            operation: parts.next().filter(|s| !s.is_empty()),
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let registry = Registry::new(&cli.services);

    match cli.command {
        Commands::Services => cmd_services(&registry),

        Commands::Describe { selector } => cmd_describe(&registry, &selector),

        Commands::Request { selector, args } => cmd_request(&registry, &selector, &args),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "apimap", &mut std::io::stdout());
            Ok(())
        }
    }
}

fn cmd_services(registry: &Registry) -> Result<()> {
    let names = registry
        .available_services()
        .with_context(|| format!("failed to scan {}", registry.root().display()))?;
    for name in names {
        println!("{name}");
    }
    Ok(())
}

fn load(registry: &Registry, selector: &Selector) -> Result<Box<dyn Service>> {
    log::debug!(
        "loading {}@{} from {}",
        selector.service,
        selector.version.unwrap_or("latest"),
        registry.root().display()
    );
    registry
        .load_service(selector.service, selector.version)
        .with_context(|| format!("failed to load service '{}'", selector.service))
}

fn cmd_describe(registry: &Registry, input: &str) -> Result<()> {
    let selector = Selector::parse(input);
    let service = load(registry, &selector)?;

    let Some(resource_name) = selector.resource else {
        print_service(service.as_ref());
        return Ok(());
    };
    let resource = service.resource(resource_name)?;

    match selector.operation {
        None => print_resource(resource.as_ref()),
        Some(name) => print_operation(resource.operation(name)?.as_ref()),
    }
    Ok(())
}

fn cmd_request(registry: &Registry, input: &str, raw_args: &[String]) -> Result<()> {
    let selector = Selector::parse(input);
    let (Some(resource_name), Some(operation_name)) = (selector.resource, selector.operation)
    else {
        bail!("'{input}' does not name an operation (expected service.resource.operation)");
    };

    let service = load(registry, &selector)?;
    let resource = service.resource(resource_name)?;
    let operation = resource.operation(operation_name)?;

    let args = parse_args(raw_args)?;
    let plan = plan_request(operation.as_ref(), &args)
        .with_context(|| format!("cannot build request for '{input}'"))?;

    println!("{} {}", plan.method, plan.url);
    for (name, value) in &plan.headers {
        println!("{name}: {value}");
    }
    if let Some(body) = &plan.body {
        println!();
        println!("{}", serde_json::to_string_pretty(body)?);
    }
    Ok(())
}

fn parse_args(raw: &[String]) -> Result<Map<String, Json>> {
    let mut args = Map::new();
    for arg in raw {
        let Some((key, value)) = arg.split_once('=') else {
            bail!("argument '{arg}' is not of the form key=value");
        };
        let value = serde_json::from_str(value).unwrap_or_else(|_| Json::String(value.to_string()));
        args.insert(key.to_string(), value);
    }
    Ok(args)
}

fn print_service(service: &dyn Service) {
    println!("{} ({})", service.title(), service.name());
    println!("  version:     {}", service.version());
    println!("  provider:    {}", service.provider());
    println!("  base url:    {}", service.base_url());
    println!("  orientation: {}", service.orientation());
    if !service.docs_url().is_empty() {
        println!("  docs:        {}", service.docs_url());
    }
    if !service.categories().is_empty() {
        println!("  categories:  {}", service.categories().join(", "));
    }
    if !service.security().is_empty() {
        println!("  security:    {}", service.security().join(", "));
    }
    println!();
    println!("Resources:");
    for resource in service.resources() {
        match resource.parent() {
            Some(parent) => println!("  {} (in {})", resource.name(), parent.name()),
            None => println!("  {}", resource.name()),
        }
    }
}

fn print_resource(resource: &dyn Resource) {
    println!("{} ({})", resource.title(), resource.name());
    if !resource.description().is_empty() {
        println!("  {}", resource.description());
    }
    println!("  orientation: {}", resource.orientation());
    if let Some(parent) = resource.parent() {
        println!("  parent:      {}", parent.name());
    }
    for url in resource.collection_urls() {
        println!("  collection:  {url}");
    }
    for url in resource.item_urls() {
        println!("  item:        {url}");
    }
    if !resource.tags().is_empty() {
        println!("  tags:        {}", resource.tags().join(", "));
    }
    println!();
    println!("Operations:");
    for op in resource.operations() {
        println!("  {:<16} {:<7} {}", op.name(), op.method(), op.url());
    }
}

fn print_operation(op: &dyn Operation) {
    println!("{} {}", op.method(), op.url());
    println!("  name:        {} ({})", op.name(), op.abs_name());
    if !op.id().is_empty() {
        println!("  id:          {}", op.id());
    }
    if !op.description().is_empty() {
        println!("  {}", op.description());
    }
    println!("  orientation: {}", op.orientation());
    if !op.scopes().is_empty() {
        println!("  scopes:      {}", op.scopes().join(", "));
    }
    let parameters = op.parameters();
    if !parameters.is_empty() {
        println!();
        println!("Parameters:");
        for param in &parameters {
            let required = if param.required() { " (required)" } else { "" };
            println!(
                "  {:<16} {:<8} {}{required}",
                param.name(),
                param.location(),
                param.schema_type()
            );
        }
    }
    if let Some(input) = op.input() {
        println!();
        print_schema("Input", input.as_ref());
    }
    if let Some(output) = op.output() {
        println!();
        print_schema("Output", output.as_ref());
    }
}

fn print_schema(label: &str, schema: &dyn Schema) {
    println!("{label}: {}", schema.schema_type());
    for prop in schema.properties() {
        let required = if prop.required() { " (required)" } else { "" };
        println!("  {:<16} {}{required}", prop.name(), prop.schema_type());
    }
}
