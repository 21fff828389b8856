//! `tap` command line runner
//!
//! Runs one operation flow against files on disk and prints the response
//! view as JSON. Handlers are dry-run: every flow goes through resolution,
//! decoding and dispatch, but nothing is provisioned.

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tap_core::{
    AcceptAllValidator, AdapterConfig, ProvisionConfiguration, ProvisioningRequest,
    ProvisioningStatus, RequestValidationError, ReverseProvisioningRequest,
    ReverseProvisioningStatus, SystemError, TechAdapterService, UpdateAclRequest,
    ValidationConfiguration, ValidationResult,
};
use tap_model::{reader, ComponentKind, FailedOperation};

mod dry_run;

use dry_run::DryRunProvisioner;

/// Rendered response and whether the flow succeeded
#[derive(Debug)]
struct Outcome {
    success: bool,
    body: String,
}

impl Outcome {
    fn success(view: &impl Serialize) -> Result<Self> {
        Ok(Self {
            success: true,
            body: serde_json::to_string_pretty(view)?,
        })
    }

    fn failure(failed: &FailedOperation) -> Result<Self> {
        Ok(Self {
            success: false,
            body: serde_json::to_string_pretty(&RequestValidationError::from(failed))?,
        })
    }
}

fn descriptor_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("descriptor")
                .long("descriptor")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("Component descriptor file (YAML or JSON)"),
        )
        .arg(
            Arg::new("descriptor-kind")
                .long("descriptor-kind")
                .default_value("COMPONENT_DESCRIPTOR")
                .help("Descriptor kind of the request"),
        )
        .arg(
            Arg::new("enriched")
                .long("enriched")
                .value_parser(value_parser!(PathBuf))
                .help("Latest enriched descriptor file"),
        )
        .arg(
            Arg::new("remove-data")
                .long("remove-data")
                .action(ArgAction::SetTrue)
                .help("Also remove the component data"),
        )
}

fn cli() -> Command {
    Command::new("tap")
        .version(tap_core::VERSION)
        .about("Run tech adapter operation flows against descriptor files")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Adapter configuration file (YAML)"),
        )
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Write logs as JSON lines"),
        )
        .subcommand(descriptor_args(
            Command::new("validate").about("Validate a component descriptor"),
        ))
        .subcommand(descriptor_args(
            Command::new("provision").about("Provision the selected component"),
        ))
        .subcommand(descriptor_args(
            Command::new("unprovision").about("Unprovision the selected component"),
        ))
        .subcommand(
            Command::new("update-acl")
                .about("Grant access to the selected component")
                .arg(
                    Arg::new("descriptor")
                        .long("descriptor")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Descriptor file of the prior provisioning"),
                )
                .arg(
                    Arg::new("ref")
                        .long("ref")
                        .action(ArgAction::Append)
                        .help("Identity to grant access to"),
                ),
        )
        .subcommand(
            Command::new("reverse-provision")
                .about("Import an existing resource")
                .arg(Arg::new("template-id").long("template-id").required(true))
                .arg(Arg::new("environment").long("environment").required(true))
                .arg(
                    Arg::new("params")
                        .long("params")
                        .value_parser(value_parser!(PathBuf))
                        .help("Params file (YAML or JSON)"),
                )
                .arg(
                    Arg::new("catalog-info")
                        .long("catalog-info")
                        .value_parser(value_parser!(PathBuf))
                        .help("Catalog info file (YAML or JSON)"),
                ),
        )
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))
}

fn read_tree(path: &Path) -> Result<Value> {
    let text = read(path)?;
    reader::parse_tree(&text).with_context(|| format!("cannot parse {}", path.display()))
}

fn string_arg<'a>(args: &'a ArgMatches, name: &str) -> Result<&'a str> {
    args.get_one::<String>(name)
        .map(String::as_str)
        .with_context(|| format!("missing --{name}"))
}

fn path_arg<'a>(args: &'a ArgMatches, name: &str) -> Result<&'a Path> {
    args.get_one::<PathBuf>(name)
        .map(PathBuf::as_path)
        .with_context(|| format!("missing --{name}"))
}

fn build_service(args: &ArgMatches) -> Result<TechAdapterService> {
    let config = match args.get_one::<PathBuf>("config") {
        Some(path) => AdapterConfig::from_path(path)?,
        None => {
            tracing::warn!("No --config given, every template id will be rejected");
            AdapterConfig::new()
        }
    };
    let validation = ComponentKind::ALL
        .into_iter()
        .fold(ValidationConfiguration::new(), |config, kind| {
            config.with_shared_validator(kind, std::sync::Arc::new(AcceptAllValidator))
        });
    let provision = ComponentKind::ALL
        .into_iter()
        .fold(ProvisionConfiguration::new(), |config, kind| {
            config.with_shared_provisioner(kind, std::sync::Arc::new(DryRunProvisioner))
        });
    Ok(TechAdapterService::builder()
        .with_config(&config)
        .with_validation(validation)
        .with_provision(provision)
        .build())
}

fn provisioning_request(args: &ArgMatches) -> Result<ProvisioningRequest> {
    let descriptor = read(path_arg(args, "descriptor")?)?;
    let mut request = ProvisioningRequest::component(descriptor)
        .with_descriptor_kind(string_arg(args, "descriptor-kind")?)
        .with_remove_data(args.get_flag("remove-data"));
    if let Some(path) = args.get_one::<PathBuf>("enriched") {
        request = request.with_latest_enriched_descriptor(read_tree(path)?);
    }
    Ok(request)
}

fn run(matches: &ArgMatches) -> Result<Outcome> {
    let (name, args) = matches.subcommand().context("no subcommand given")?;
    let service = build_service(args)?;
    tracing::info!("Running {}", name);

    match name {
        "validate" => {
            let info = service.validate(&provisioning_request(args)?);
            let result = ValidationResult::from(info);
            Ok(Outcome {
                success: result.valid,
                body: serde_json::to_string_pretty(&result)?,
            })
        }
        "provision" => match service.provision(&provisioning_request(args)?) {
            Ok(status) => Outcome::success(&ProvisioningStatus::from(status)),
            Err(failed) => Outcome::failure(&failed),
        },
        "unprovision" => match service.unprovision(&provisioning_request(args)?) {
            Ok(status) => Outcome::success(&ProvisioningStatus::from(status)),
            Err(failed) => Outcome::failure(&failed),
        },
        "update-acl" => {
            let refs: Vec<String> = args
                .get_many::<String>("ref")
                .map(|refs| refs.cloned().collect())
                .unwrap_or_default();
            let request = UpdateAclRequest::new(refs, read(path_arg(args, "descriptor")?)?);
            match service.update_acl(&request) {
                Ok(status) => Outcome::success(&ProvisioningStatus::from(status)),
                Err(failed) => Outcome::failure(&failed),
            }
        }
        "reverse-provision" => {
            let mut request = ReverseProvisioningRequest::new(
                string_arg(args, "template-id")?,
                string_arg(args, "environment")?,
            );
            if let Some(path) = args.get_one::<PathBuf>("params") {
                request = request.with_params(read_tree(path)?);
            }
            if let Some(path) = args.get_one::<PathBuf>("catalog-info") {
                request = request.with_catalog_info(read_tree(path)?);
            }
            match service.reverse_provision(&request) {
                Ok(status) => Outcome::success(&ReverseProvisioningStatus::from(status)),
                Err(failed) => Outcome::failure(&failed),
            }
        }
        other => anyhow::bail!("unknown subcommand '{other}'"),
    }
}

fn main() {
    let matches = cli().get_matches();
    init_tracing(
        matches
            .subcommand()
            .is_some_and(|(_, args)| args.get_flag("json-logs")),
    );

    match run(&matches) {
        Ok(outcome) => {
            println!("{}", outcome.body);
            std::process::exit(if outcome.success { 0 } else { 1 });
        }
        Err(err) => {
            tracing::error!("{:#}", err);
            let view = SystemError::from_error(&*err);
            match serde_json::to_string_pretty(&view) {
                Ok(body) => println!("{body}"),
                Err(_) => eprintln!("{err:#}"),
            }
            std::process::exit(1);
        }
    }
}
