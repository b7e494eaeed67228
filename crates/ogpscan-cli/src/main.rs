use std::io::{self, BufRead, Write};

use clap::Parser;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use ogpscan_client::RegistryClient;
use ogpscan_core::{
    AppError, DepartmentsConfig, Inventory, ScanConfig, ScanStats, TracingReporter,
    complete_missing_fields, fill_org_defaults, load_departments_config,
};
use ogpscan_core::export::{
    LATEST_DATASETS_FILENAME, LATEST_RESOURCES_FILENAME, default_datasets_filename,
    default_resources_filename, export_datasets, export_resources,
};
use ogpscan_core::progress::{ProgressReporter, ScanEvent};

mod config;
use config::Config;

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let cli = Config::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }
}

async fn run(cli: Config) -> Result<(), AppError> {
    let presets = load_departments_config(cli.departments_config.clone())?;

    if cli.list_departments {
        print_departments(presets.as_ref());
        return Ok(());
    }

    let (department_title, owner_org) = match cli.department.clone() {
        Some(dept) => resolve_department(&dept, presets.as_ref()),
        None => prompt_for_department(presets.as_ref())?,
    };

    let scan = ScanConfig::new(department_title)
        .with_export_dir(cli.output.clone())
        .with_fail_on_empty_org(cli.fail_on_empty_org);

    info!("Scanning registry {} for '{}'", cli.registry_url, scan.department);
    let client = RegistryClient::new(&cli.registry_url)?;
    let reporter = TracingReporter;

    let ids = client.search_owner_org(&owner_org).await?;
    reporter.report(ScanEvent::DatasetsFound { count: ids.len() });

    if ids.is_empty() && scan.fail_on_empty_org {
        return Err(AppError::OrgNotFound(scan.department));
    }

    let mut inventory = Inventory::new();
    let stats = inventory
        .inventory_with_progress(&client, &cli.registry_url, &ids, &reporter)
        .await?;

    complete_missing_fields(&mut inventory);
    fill_org_defaults(&mut inventory, &scan.department);

    let today = chrono::Local::now().date_naive();
    let out = &scan.export_dir;
    export_datasets(&inventory, out, &default_datasets_filename(today))?;
    export_resources(&inventory, out, &default_resources_filename(today))?;
    export_datasets(&inventory, out, LATEST_DATASETS_FILENAME)?;
    export_resources(&inventory, out, LATEST_RESOURCES_FILENAME)?;

    print_summary(&scan, &inventory, &stats);
    Ok(())
}

/// Maps a department argument to `(display title, owner_org)`.
///
/// A preset title resolves to its configured slug; anything else is used
/// verbatim as the filter value, so power users can pass a slug directly.
fn resolve_department(input: &str, presets: Option<&DepartmentsConfig>) -> (String, String) {
    if let Some(entry) = presets.and_then(|p| p.find_by_title(input)) {
        return (entry.title.clone(), entry.owner_org.clone());
    }
    (input.to_string(), input.to_string())
}

/// Numbered interactive prompt over the preset list; free text accepted.
fn prompt_for_department(
    presets: Option<&DepartmentsConfig>,
) -> Result<(String, String), AppError> {
    let entries = presets.map(|p| p.departments.as_slice()).unwrap_or(&[]);

    println!("Department to inventory:");
    for (i, entry) in entries.iter().enumerate() {
        println!("  {}. {}", i + 1, entry.title);
    }
    if entries.is_empty() {
        println!("  (no presets configured; type a department or owner_org)");
    } else {
        println!("  ...or type any other department name");
    }
    print!("> ");
    io::stdout()
        .flush()
        .map_err(|e| AppError::Generic(e.to_string()))?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| AppError::Generic(e.to_string()))?;
    let input = line.trim();

    if input.is_empty() {
        return Err(AppError::Generic("No department selected".to_string()));
    }

    if let Ok(choice) = input.parse::<usize>() {
        if let Some(entry) = choice.checked_sub(1).and_then(|i| entries.get(i)) {
            return Ok((entry.title.clone(), entry.owner_org.clone()));
        }
        return Err(AppError::Generic(format!(
            "No preset numbered {} (1-{})",
            choice,
            entries.len()
        )));
    }

    Ok(resolve_department(input, presets))
}

fn print_departments(presets: Option<&DepartmentsConfig>) {
    match presets {
        Some(config) if !config.departments.is_empty() => {
            println!("Configured departments:");
            for entry in &config.departments {
                println!("  {:<42} (owner_org: {})", entry.title, entry.owner_org);
            }
        }
        _ => {
            println!("No department presets configured.");
            println!("Add entries to ~/.config/ogpscan/departments.toml or use --departments-config.");
        }
    }
}

fn print_summary(scan: &ScanConfig, inventory: &Inventory, stats: &ScanStats) {
    info!("");
    info!("Scan complete: {}", scan.department);
    info!("  Datasets inventoried:  {}", inventory.dataset_count());
    info!("  Resources inventoried: {}", inventory.resource_count());
    info!("  + Created:             {}", stats.created);
    info!("  = Updated:             {}", stats.updated);
    info!("  - Skipped (gone):      {}", stats.skipped);
    info!("  x Failed:              {}", stats.failed);
    info!("  Data-quality warnings: {}", inventory.warnings().len());

    if !inventory.skipped_ids().is_empty() {
        info!("Datasets gone between listing and fetch:");
        for id in inventory.skipped_ids() {
            info!("  - {}", id);
        }
    }

    info!("Inventories written to {}", scan.export_dir.display());
}
