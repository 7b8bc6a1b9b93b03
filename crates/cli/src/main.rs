//! yaru
//!
//! Fetches a Ya.ru resource and prints it as JSON.

use clap::Parser;
use serde_json::{Value, json};
use tracing::info;
use yaru_client::{AnyResource, Client, ClientConfig, ResourceObject, init_logging};

/// Fetch Ya.ru resources and print them as JSON.
#[derive(Debug, Parser)]
#[command(name = "yaru")]
#[command(about = "Fetch Ya.ru resources and print them as JSON")]
struct Cli {
    /// Resource identifier: full URL, `urn:ya.ru:` URN, or API path.
    #[arg(default_value = "/me/")]
    identifier: String,

    /// Follow `next` links and print every member of a collection.
    #[arg(long)]
    all: bool,

    /// Print only the named attribute.
    #[arg(long)]
    attribute: Option<String>,

    #[command(flatten)]
    client: ClientConfig,
}

/// JSON view of one object and, for collections, its members.
fn render(object: &AnyResource) -> Value {
    let resource = object.resource();
    let mut value = json!({
        "kind": object.kind().as_str(),
        "id": object.id(),
        "attributes": resource.attributes(),
        "links": resource.links(),
    });

    match object {
        AnyResource::Entry(entry) => {
            value["type"] = json!(entry.entry_type().as_str());
            value["access"] = json!(entry.access().as_str());
            value["comments_disabled"] = json!(entry.comments_disabled());
            value["categories"] = json!(entry.categories());
            value["updated"] = json!(entry.updated().map(|t| t.to_rfc3339()));
        }
        AnyResource::Collection(collection) => {
            value["members"] = collection.members().iter().map(render).collect();
        }
        AnyResource::Person(_) | AnyResource::Club(_) => {}
    }
    value
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.client.log_level);

    if let Err(errors) = cli.client.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    info!(
        api_server = %cli.client.api_server,
        identifier = %cli.identifier,
        "Fetching resource"
    );
    let client = Client::new(&cli.client)?;

    let Some(mut object) = client.get_object(&cli.identifier)? else {
        anyhow::bail!("No object kind matches the resource at {}", cli.identifier);
    };

    if cli.all {
        if let AnyResource::Collection(collection) = &mut object {
            let total = collection
                .iter_all(&client)
                .collect::<Result<Vec<_>, _>>()?
                .len();
            info!(total, "Collection walked");
        }
    }

    let output = match &cli.attribute {
        Some(name) => serde_json::to_value(object.fetch_attribute(&client, name)?)?,
        None => render(&object),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
