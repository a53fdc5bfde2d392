use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use uuid::Uuid;

use portal_gate::authz::{Identity, Role, SessionUser};
use portal_gate::config::AppConfig;
use portal_gate::docs;
use portal_gate::gate::{AccessGate, Decision};
use portal_gate::jwt::JwtConfig;

#[derive(Parser, Debug)]
#[command(author, version, about = "portal-gate developer tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Issue a session token for local testing
    MintToken {
        #[arg(long)]
        email: String,
        /// Role claim, stored verbatim (unknown values act as the default role)
        #[arg(long, default_value = "affiliate")]
        role: String,
        #[arg(long)]
        user_id: Option<Uuid>,
    },
    /// Print the access decision for a path
    Resolve {
        /// Request path, optionally with a query string
        path: String,
        /// Role claim of a signed-in caller; omit for an anonymous request
        #[arg(long)]
        role: Option<String>,
    },
    /// List dashboards, landing pages and legacy redirects
    Routes,
    /// Write the OpenAPI document
    Openapi {
        #[arg(long, default_value = "openapi.json")]
        out: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    // Try to load env from CWD, then the crate-local `.env`.
    if dotenv().is_err() {
        let crate_env = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
        let _ = dotenvy::from_path(crate_env);
    }

    let cli = Cli::parse();

    match cli.command {
        Commands::MintToken { email, role, user_id } => {
            let jwt = JwtConfig::from_env()?;
            let user_id = user_id.unwrap_or_else(Uuid::new_v4);
            let token = jwt.encode(user_id, &email, serde_json::Value::String(role))?;
            println!("{token}");
        }
        Commands::Resolve { path, role } => {
            let gate = AccessGate::standard()?;
            let identity = match role {
                Some(role) => Identity::from_claim(
                    Some(SessionUser {
                        id: Uuid::nil(),
                        email: "cli@localhost".to_string(),
                    }),
                    Some(&serde_json::Value::String(role)),
                ),
                None => Identity::anonymous(),
            };
            print_decision(&gate.decide(&path, &identity));
        }
        Commands::Routes => {
            let gate = AccessGate::standard()?;
            print_routes(&gate);
        }
        Commands::Openapi { out } => {
            let config = AppConfig::from_env().unwrap_or_default();
            let doc = docs::build_openapi(config.port, &config.session_cookie)?;
            std::fs::write(&out, serde_json::to_string_pretty(&doc)?)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("wrote {}", out.display());
        }
    }

    Ok(())
}

fn print_decision(decision: &Decision) {
    match decision {
        Decision::Continue(state) => println!("continue ({state:?})"),
        Decision::Redirect { state, location } => println!("redirect -> {location} ({state:?})"),
    }
}

fn print_routes(gate: &AccessGate) {
    println!("dashboards:");
    for dashboard in gate.registry().dashboards() {
        println!(
            "  {:<14} {:<22} requires {}",
            dashboard.base_path, dashboard.label, dashboard.requirement
        );
        for route in &dashboard.nav {
            println!("    {:<28} {}", route.href, route.label);
        }
    }

    println!("landing pages:");
    for role in Role::ALL {
        println!("  {:<10} {}", role.as_str(), gate.default_dashboard(role));
    }

    println!("legacy redirects:");
    for entry in gate.legacy().entries() {
        println!("  {:<26} -> {}", entry.from, entry.to);
    }
}
