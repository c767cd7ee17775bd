use ontology::config::ToolConfig;
use ontology::store::{LoadError, Ontology};
use ontology::stream::{StreamError, TermReader};
use ontology::types::Term;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ontology=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match ToolConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Loaded configuration: ontology_file={}, validation='{}', query={:?}",
        config.ontology_file.display(),
        config.validation,
        config.query
    );

    let outcome = match &config.query {
        Some(query) => stream_terms(query).map_err(|e| e.to_string()),
        None => load_ontology(&config).map_err(|e| e.to_string()),
    };
    if let Err(e) = outcome {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

fn load_ontology(config: &ToolConfig) -> Result<(), LoadError> {
    let ontology = Ontology::load(&config.ontology_file, &config.validation)?;
    tracing::info!(
        terms = ontology.term_count(),
        names = ontology.name_keys().count(),
        diagnostics = ontology.diagnostics().len(),
        "ontology ready"
    );
    Ok(())
}

fn stream_terms(query: &str) -> Result<(), StreamError> {
    let mut reader = TermReader::open_files(query)?;
    let mut term = Term::new();
    let mut matched = 0_usize;
    while reader.read_next(&mut term)? {
        matched += 1;
        tracing::info!(
            id = %term.id,
            name = term.name.as_deref().unwrap_or(""),
            "matched term"
        );
    }
    tracing::info!(
        matched,
        read = reader.session().records(),
        diagnostics = reader.diagnostics().len(),
        "stream finished"
    );
    Ok(())
}
