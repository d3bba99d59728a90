//! Seed data script - loads TAC codes, device configurations and pending
//! purchase orders so the intake screens have something to work with.
//!
//! Run with: cargo run --bin seed-data [-- --file seed.json]
//!
//! Without `--file` a small demo catalog is loaded. Re-running is safe:
//! TACs and configurations are upserted and existing order numbers skipped.

use clap::Parser;
use serde::Deserialize;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::mpsc;
use tracing::info;

use stateset_intake::{
    config::load_config,
    db::{establish_connection_from_app_config, run_migrations},
    events::{process_events, EventSender},
    services::{
        catalog::UpsertDeviceConfiguration, purchase_orders::CreatePurchaseOrder, CatalogService,
        PurchaseOrderService,
    },
};

#[derive(Parser)]
#[command(name = "seed-data", about = "Load intake reference data")]
struct Cli {
    /// JSON file with `tac_codes`, `configurations` and `purchase_orders`
    #[arg(long)]
    file: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct SeedFile {
    #[serde(default)]
    tac_codes: Vec<TacSeed>,
    #[serde(default)]
    configurations: Vec<UpsertDeviceConfiguration>,
    #[serde(default)]
    purchase_orders: Vec<CreatePurchaseOrder>,
}

#[derive(Debug, Deserialize)]
struct TacSeed {
    tac: String,
    manufacturer: String,
    model: String,
}

fn demo_seed() -> SeedFile {
    let tac = |tac: &str, manufacturer: &str, model: &str| TacSeed {
        tac: tac.into(),
        manufacturer: manufacturer.into(),
        model: model.into(),
    };
    let configuration = |manufacturer: &str, model: &str, colors: &[&str], storage: &[&str]| {
        UpsertDeviceConfiguration {
            manufacturer: manufacturer.into(),
            model: model.into(),
            colors: colors.iter().map(|c| c.to_string()).collect(),
            storage_options: storage.iter().map(|s| s.to_string()).collect(),
        }
    };
    let order = |number: &str, supplier: &str| CreatePurchaseOrder {
        order_number: number.into(),
        supplier_name: Some(supplier.into()),
    };

    SeedFile {
        tac_codes: vec![
            tac("35693803", "Apple", "iPhone 12"),
            tac("35328111", "Apple", "iPhone 13"),
            tac("35290611", "Samsung", "Galaxy S21"),
            tac("35467311", "Google", "Pixel 6"),
        ],
        configurations: vec![
            configuration(
                "Apple",
                "iPhone 12",
                &["Black", "White", "Blue", "Green", "Red", "Purple"],
                &["64GB", "128GB", "256GB"],
            ),
            configuration(
                "Apple",
                "iPhone 13",
                &["Midnight", "Starlight", "Blue", "Pink", "Red", "Green"],
                &["128GB", "256GB", "512GB"],
            ),
            configuration(
                "Samsung",
                "Galaxy S21",
                &["Phantom Gray", "Phantom White", "Phantom Violet", "Phantom Pink"],
                &["128GB", "256GB"],
            ),
            configuration(
                "Google",
                "Pixel 6",
                &["Stormy Black", "Sorta Seafoam", "Kinda Coral"],
                &["128GB", "256GB"],
            ),
        ],
        purchase_orders: vec![
            order("PO-1001", "Northwind Recyclers"),
            order("PO-1002", "Contoso Trade-In"),
            order("PO-1003", "Fabrikam Returns"),
        ],
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let cli = Cli::parse();
    let seed: SeedFile = match &cli.file {
        Some(path) => {
            info!("Loading seed file {}", path.display());
            serde_json::from_str(&std::fs::read_to_string(path)?)?
        }
        None => demo_seed(),
    };

    let cfg = load_config()?;
    info!("Connecting to database: {}", cfg.database_url);
    let db = establish_connection_from_app_config(&cfg).await?;
    run_migrations(&db).await?;
    let db = Arc::new(db);

    let (event_tx, event_rx) = mpsc::channel(cfg.event_channel_capacity);
    let events = tokio::spawn(process_events(event_rx));
    let event_sender = Arc::new(EventSender::new(event_tx));

    let catalog = CatalogService::new(db.clone(), event_sender.clone());
    let purchase_orders = PurchaseOrderService::new(db);

    for entry in &seed.tac_codes {
        catalog
            .register_tac(&entry.tac, &entry.manufacturer, &entry.model)
            .await?;
    }
    info!("  Loaded {} TAC codes", seed.tac_codes.len());

    let configurations = seed.configurations.len();
    for configuration in seed.configurations {
        catalog.upsert_configuration(configuration).await?;
    }
    info!("  Loaded {} device configurations", configurations);

    let mut created = 0;
    for order in seed.purchase_orders {
        if purchase_orders
            .find_by_number(&order.order_number)
            .await?
            .is_some()
        {
            continue;
        }
        purchase_orders.create(order).await?;
        created += 1;
    }
    info!("  Created {} pending purchase orders", created);

    // Let the event processor drain before exiting.
    drop(catalog);
    drop(event_sender);
    events.await?;

    info!("Seed data complete. Explore at http://localhost:8080/swagger-ui");
    Ok(())
}
