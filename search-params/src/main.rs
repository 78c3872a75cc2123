use clap::Parser;
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use search_params::search::{parse_facet, registry, CliParameters, CliSearch};
use search_params::{AppError, Dependencies};
use search_params_repository::opensearch::build_search_body;
use search_params_repository::{
    ConverterRegistry, FacetDefinition, PageLink, Parameters, SearchParamsConfig, SearchResults,
};

#[derive(Parser)]
#[command(name = "search-params")]
#[command(about = "Run a query-string search against an OpenSearch index", long_about = None)]
struct Cli {
    /// Index or alias to search
    index: String,

    /// Request parameters, e.g. "q=boots&filter=brand.key:acme&page=2&sortBy=price"
    #[arg(default_value = "")]
    query: String,

    /// Facet to aggregate, as name=field (repeatable)
    #[arg(long = "facet", value_parser = parse_facet)]
    facets: Vec<FacetDefinition>,

    /// Field searched by `q` (repeatable, default: all fields)
    #[arg(long = "search-field")]
    search_fields: Vec<String>,

    /// OpenSearch URL (default: $OPENSEARCH_URL or http://localhost:9200)
    #[arg(long)]
    opensearch_url: Option<String>,

    /// Print the request body without contacting the cluster
    #[arg(long)]
    dry_run: bool,
}

#[derive(Serialize)]
struct Output<'a> {
    results: &'a SearchResults<CliParameters, Value>,
    links: Vec<PageLink>,
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!(error = %e, "Search failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr so stdout only carries results. `LOG_FORMAT=json` switches
/// to structured output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match std::env::var("LOG_FORMAT") {
        Ok(format) if format.eq_ignore_ascii_case("json") => builder.json().init(),
        _ => builder.init(),
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    if ConverterRegistry::install(registry()).is_err() {
        warn!("Converter registry was already installed");
    }

    let definition = CliSearch::new(cli.index)
        .with_facets(cli.facets)
        .with_search_fields(cli.search_fields);
    let parameters = CliParameters::from_query_string(&cli.query)?;

    if cli.dry_run {
        let body = build_search_body(&definition, &parameters, &SearchParamsConfig::from_env());
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    let dependencies = Dependencies::new(cli.opensearch_url).await?;
    let repository = &dependencies.repository;

    let results = repository.search(&definition, &parameters).await?;
    info!(
        total = results.total,
        page = results.pagination.current_page(),
        pages = results.pagination.pages(),
        "Search completed"
    );

    let output = Output {
        links: repository.paging_links(&results),
        results: &results,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
