use std::process::ExitCode;
use std::sync::Arc;

use axum::http::Method;
use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use rest_router::app::{self, OrderStore};
use rest_router::routing::{Operation, Router};

#[derive(Parser)]
#[command(name = "rest-router-cli")]
#[command(about = "Inspect the routes of the sample orders API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every operation key with its method and path template
    Routes,
    /// Match a method and path against the routes
    Match {
        method: String,
        path: String,
    },
    /// Generate the path for an operation key
    Path {
        key: String,
        /// Path parameters as name=value
        params: Vec<String>,
        /// Query parameters as name=value, in order
        #[arg(short, long = "query")]
        query: Vec<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let router = match app::orders_api(Arc::new(OrderStore::new())) {
        Ok(router) => router,
        Err(e) => return fail(&e),
    };

    let result = match cli.command {
        Commands::Routes => Ok(routes(&router)),
        Commands::Match { method, path } => match_path(&router, &method, &path),
        Commands::Path { key, params, query } => path(&router, &key, &params, &query),
    };

    match result {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(text) => {
                println!("{text}");
                ExitCode::SUCCESS
            }
            Err(e) => fail(&e),
        },
        Err(e) => fail(e.as_ref()),
    }
}

fn fail(err: &dyn std::error::Error) -> ExitCode {
    eprintln!("Error: {err}");
    ExitCode::FAILURE
}

fn routes<S: Clone + 'static>(router: &Router<S>) -> Value {
    let routes: Vec<Value> = router
        .templates()
        .map(|(key, template)| {
            let method = Operation::from_key(key).map(|op| op.method().to_string());
            json!({ "key": key, "method": method, "path": template.to_string() })
        })
        .collect();
    Value::Array(routes)
}

fn match_path<S: Clone + 'static>(
    router: &Router<S>,
    method: &str,
    path: &str,
) -> Result<Value, Box<dyn std::error::Error>> {
    let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())?;
    let bound = router.match_route(&method, path)?;
    Ok(json!({
        "key": &*bound.key,
        "operation": bound.operation.to_string(),
        "params": bound.params,
    }))
}

fn path<S: Clone + 'static>(
    router: &Router<S>,
    key: &str,
    params: &[String],
    query: &[String],
) -> Result<Value, Box<dyn std::error::Error>> {
    let params = parse_pairs(params)?;
    let query = parse_pairs(query)?;
    let path = router.path_for(key, &params, &query)?;
    Ok(json!({ "key": key, "path": path }))
}

fn parse_pairs(raw: &[String]) -> Result<Vec<(&str, &str)>, String> {
    raw.iter()
        .map(|pair| {
            pair.split_once('=')
                .ok_or_else(|| format!("expected name=value, got `{pair}`"))
        })
        .collect()
}
