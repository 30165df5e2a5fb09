use clap::{Parser, Subcommand};
use pu_policy::{
    AuditLog, DryRunController, LabelSet, LifecycleEvent, LoadReport, ObserverChain, PolicyError,
    PolicyResolver, PolicyStore, PuRuntime, ResolveContext, ResolverConfig, TracingObserver,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "pu-policy", version = "0.1.0")]
struct Cli {
    /// TOML resolver configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Load a policy file and list the indices it provides
    Check {
        /// JSON policy file
        #[arg(long)]
        policy: Option<PathBuf>,

        /// Fail instead of falling back to the default policy
        #[arg(long)]
        strict: bool,
    },
    /// Resolve a workload event against a dry-run controller
    Resolve {
        /// JSON policy file
        #[arg(long)]
        policy: Option<PathBuf>,

        /// Processing unit ID
        #[arg(long)]
        id: String,

        /// Runtime name, defaults to the unit ID
        #[arg(long)]
        name: Option<String>,

        /// Runtime label as key=value (repeatable)
        #[arg(long = "label")]
        labels: Vec<String>,

        /// Lifecycle event (start, stop, pause, unpause, ...)
        #[arg(long)]
        event: LifecycleEvent,

        /// Target network CIDR (repeatable)
        #[arg(long = "target-network")]
        target_networks: Vec<String>,
    },
}

fn load_config(path: Option<&PathBuf>) -> ResolverConfig {
    match path {
        Some(path) => match ResolverConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: cannot load config {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => ResolverConfig::default(),
    }
}

fn init_logging(config: &ResolverConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run_check(config: &ResolverConfig, strict: bool) {
    let store = if strict {
        match PolicyStore::try_load(&config.policy_file).map_err(PolicyError::from) {
            Ok(store) => store,
            Err(e) => {
                error!("Policy check failed: {}", e);
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        let (store, report) = PolicyStore::load_with_report(&config.policy_file);
        match report {
            LoadReport::Loaded { entries, .. } => {
                println!("Loaded {} policy indices from {}", entries, config.policy_file.display())
            }
            LoadReport::Degraded(e) => println!("Using default policy only: {}", e),
        }
        store
    };

    println!("Policy indices:");
    for index in store.indices() {
        println!("  {}", index);
    }
}

async fn run_resolve(
    config: &ResolverConfig,
    pu_id: String,
    name: Option<String>,
    labels: Vec<String>,
    event: LifecycleEvent,
) {
    let controller = Arc::new(DryRunController::new());
    let audit = Arc::new(AuditLog::default());
    let observers = ObserverChain::new()
        .with(Arc::new(TracingObserver))
        .with(audit.clone());
    let resolver = match PolicyResolver::from_config(controller.clone(), config) {
        Ok(resolver) => resolver.with_observer(Arc::new(observers)),
        Err(e) => {
            error!("Invalid resolver configuration: {}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let runtime = PuRuntime::new(name.unwrap_or_else(|| pu_id.clone()), LabelSet::from(labels));
    let ctx = ResolveContext::background().correlated(Uuid::new_v4());

    if let Err(e) = resolver.handle_event(&ctx, &pu_id, event, &runtime).await {
        error!("Resolution failed for {}: {}", pu_id, e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    for record in audit.summary() {
        info!("{}", record);
    }

    let records = controller.records();
    if records.is_empty() {
        println!("Event '{}' does not change enforcement", event);
        return;
    }
    for record in records {
        match serde_json::to_string_pretty(&record) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: cannot render policy: {}", e);
                std::process::exit(1);
            }
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_ref());

    match cli.command {
        Commands::Check { policy, strict } => {
            if let Some(policy) = policy {
                config.policy_file = policy;
            }
            init_logging(&config);
            run_check(&config, strict);
        }
        Commands::Resolve {
            policy,
            id,
            name,
            labels,
            event,
            target_networks,
        } => {
            if let Some(policy) = policy {
                config.policy_file = policy;
            }
            if !target_networks.is_empty() {
                config.target_networks = target_networks;
            }
            init_logging(&config);
            run_resolve(&config, id, name, labels, event).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resolve_command() {
        let cli = Cli::try_parse_from([
            "pu-policy",
            "resolve",
            "--id",
            "pu-1",
            "--label",
            "app=web",
            "--label",
            "user-policy-index=teamA",
            "--event",
            "Unpause",
            "--target-network",
            "10.0.0.0/8",
        ])
        .unwrap();

        match cli.command {
            Commands::Resolve {
                id,
                labels,
                event,
                target_networks,
                ..
            } => {
                assert_eq!(id, "pu-1");
                assert_eq!(labels.len(), 2);
                assert_eq!(event, LifecycleEvent::Unpause);
                assert_eq!(target_networks, vec!["10.0.0.0/8".to_string()]);
            }
            other => panic!("Expected resolve command, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_event_is_rejected() {
        let result = Cli::try_parse_from(["pu-policy", "resolve", "--id", "x", "--event", "reboot"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from(["pu-policy", "check", "--config", "resolver.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("resolver.toml")));
        assert!(matches!(cli.command, Commands::Check { strict: false, .. }));
    }
}
