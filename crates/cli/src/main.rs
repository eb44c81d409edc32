use clap::{Parser, Subcommand};
use lares_core::constants::{ENV_FORM_CLEAR, ENV_REST_URL, ENV_TIMEOUT_SECS};
use lares_core::render::{form_listing, records_table};
use lares_core::{
    parse_input_value, EntityController, EntityKind, Field, FormError, Gateway, GatewayConfig,
    RestService,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "lares")]
#[command(about = "Healthcare sample ledger admin CLI")]
struct Cli {
    /// Gateway base URL (overrides LEDGER_REST_URL)
    #[arg(long, global = true)]
    url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the managed entities and their fields
    Entities,
    /// List every record of an entity
    List {
        /// Entity name, e.g. sample or create-sample
        entity: EntityKind,
    },
    /// Show one record as a form
    Get {
        entity: EntityKind,
        id: String,
    },
    /// Create a record
    Add {
        entity: EntityKind,
        /// Field assignment name=value; repeat on list fields to select several values
        #[arg(short, long = "field", value_parser = parse_assignment)]
        fields: Vec<(Field, String)>,
    },
    /// Update a record; the identifier field is never sent
    Update {
        entity: EntityKind,
        id: String,
        #[arg(short, long = "field", value_parser = parse_assignment)]
        fields: Vec<(Field, String)>,
    },
    /// Delete a record
    Delete {
        entity: EntityKind,
        id: String,
    },
}

fn parse_assignment(raw: &str) -> Result<(Field, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{raw}'"))?;
    let field = name.trim().parse::<Field>().map_err(|e| e.to_string())?;
    Ok((field, value.to_owned()))
}

/// Bind command-line assignments into the controller's form.
fn bind_fields(
    ctl: &mut EntityController<RestService>,
    fields: Vec<(Field, String)>,
) -> Result<(), FormError> {
    for (field, raw) in fields {
        let value = parse_input_value(&raw);
        if field.is_array() && !value.is_array() {
            ctl.change_array_value(field, value)?;
        } else {
            ctl.set_field(field, value)?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lares=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = GatewayConfig::from_env_values(
        std::env::var(ENV_REST_URL).ok(),
        std::env::var(ENV_TIMEOUT_SECS).ok(),
        std::env::var(ENV_FORM_CLEAR).ok(),
    )?;
    let config = match cli.url.as_deref() {
        Some(url) => config.with_base_url(url)?,
        None => config,
    };
    tracing::info!("++ Lares CLI using gateway {}", config.base_url());
    let gateway = Gateway::new(&config)?;
    let controller = |kind: EntityKind| {
        EntityController::new(kind, gateway.service(kind), config.clear_policy())
    };

    let ctl = match cli.command {
        Some(Commands::Entities) => {
            for kind in EntityKind::ALL {
                let fields: Vec<String> = kind
                    .fields()
                    .iter()
                    .map(|f| {
                        if f.is_array() {
                            format!("{f}[]")
                        } else {
                            f.to_string()
                        }
                    })
                    .collect();
                println!("{kind}: {}", fields.join(", "));
            }
            return Ok(());
        }
        Some(Commands::List { entity }) => {
            let mut ctl = controller(entity);
            ctl.load_all().await;
            if ctl.error_message().is_none() {
                print!("{}", records_table(entity, ctl.records()));
            }
            ctl
        }
        Some(Commands::Get { entity, id }) => {
            let mut ctl = controller(entity);
            ctl.get_form(&id).await;
            if ctl.error_message().is_none() {
                print!("{}", form_listing(ctl.form()));
            }
            ctl
        }
        Some(Commands::Add { entity, fields }) => {
            let mut ctl = controller(entity);
            bind_fields(&mut ctl, fields)?;
            ctl.add().await;
            if ctl.error_message().is_none() {
                println!("Created {entity}");
            }
            ctl
        }
        Some(Commands::Update { entity, id, fields }) => {
            let mut ctl = controller(entity);
            bind_fields(&mut ctl, fields)?;
            ctl.update(&id).await;
            if ctl.error_message().is_none() {
                println!("Updated {entity} {id}");
            }
            ctl
        }
        Some(Commands::Delete { entity, id }) => {
            let mut ctl = controller(entity);
            ctl.set_id(id.as_str());
            ctl.delete().await;
            if ctl.error_message().is_none() {
                println!("Deleted {entity} {id}");
            }
            ctl
        }
        None => {
            println!("Use 'lares --help' for commands");
            return Ok(());
        }
    };

    if let Some(message) = ctl.error_message() {
        anyhow::bail!("{message}");
    }
    Ok(())
}
