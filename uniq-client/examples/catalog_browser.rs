// uniq-client/examples/catalog_browser.rs
// Login -> browse -> search flow against the live API

use std::sync::Arc;
use std::time::Duration;

use uniq_client::{
    CatalogEngine, ClientConfig, Credentials, FetchDriver, FileArea, HttpAuthGateway,
    HttpCatalogGateway, MemoryArea, SessionController, SessionState, TokenStore, UiStatePersist,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        println!("Usage: {} <username> <password> [search]", args[0]);
        println!("  Example: {} emilys emilyspass phone", args[0]);
        return Ok(());
    }

    let username = &args[1];
    let password = &args[2];
    let search = args.get(3).cloned();

    let config = ClientConfig::from_env();

    // Storage tiers: durable files next to the binary, session in memory
    let durable = Arc::new(FileArea::new("./.uniq-storage"));
    let session_area = Arc::new(MemoryArea::new());
    let tokens = TokenStore::new(durable, session_area.clone());

    let auth = Arc::new(HttpAuthGateway::new(&config)?);
    let session = SessionController::new(auth, tokens, config.token_expires_mins);

    session.initialize().await;
    if session.state() != SessionState::Authenticated {
        let credentials = Credentials {
            username: username.clone(),
            password: password.clone(),
        };
        match session.login(&credentials, true).await {
            Ok(user) => tracing::info!("Logged in as {} {}", user.first_name, user.last_name),
            Err(e) => {
                tracing::error!("Login failed: {}", e);
                return Err(e.into());
            }
        }
    } else {
        tracing::info!("Restored session from stored token");
    }

    // Catalog engine + fetch driver
    let catalog = Arc::new(HttpCatalogGateway::new(&config)?);
    let engine = CatalogEngine::new(catalog, UiStatePersist::new(session_area), &config);
    let driver = FetchDriver::spawn(engine.clone());

    tokio::time::sleep(Duration::from_secs(2)).await;
    print_page(&engine);

    if let Some(query) = search {
        tracing::info!("Searching for {:?}", query);
        engine.set_search_input(query);
        tokio::time::sleep(Duration::from_secs(2)).await;
        print_page(&engine);
    }

    driver.shutdown().await;
    session.logout();
    Ok(())
}

fn print_page(engine: &CatalogEngine) {
    if let Some(error) = engine.error() {
        tracing::error!("Load failed: {}", error);
        return;
    }
    let state = engine.snapshot();
    println!(
        "Page {} ({} of {} matching products):",
        state.page,
        state.items.len(),
        engine.display_total()
    );
    for product in engine.display_items() {
        println!(
            "  [{:>4}] {} - {} ({})",
            product.id,
            product.title,
            uniq_client::format::format_price(product.price),
            uniq_client::format::format_rating(product.rating)
        );
    }
}
