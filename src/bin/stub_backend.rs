use product_console::{
    logging,
    models::product_model::ProductDraft,
    settings::Settings,
    stub_backend::{self, product_store::ProductStore},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

async fn seed(store: &ProductStore) -> anyhow::Result<()> {
    let samples = [
        ("Pen", "Blue pen", 1.5),
        ("Notebook", "A5 ruled notebook", 4.25),
        ("Desk Lamp", "LED lamp with dimmer", 29.9),
    ];

    for (name, description, price) in samples {
        store
            .create_product(ProductDraft {
                name: name.to_string(),
                description: description.to_string(),
                price,
                ..Default::default()
            })
            .await?;
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load()?;
    logging::init(&settings.log.level);

    info!("Starting stub backend...");

    let store = Arc::new(ProductStore::new());
    seed(&store).await?;

    let listener = TcpListener::bind(settings.stub.bind_addr).await?;
    info!(
        "Point the console at http://{}{}",
        listener.local_addr()?,
        stub_backend::API_BASE_PATH
    );

    stub_backend::serve(listener, store).await?;

    Ok(())
}
