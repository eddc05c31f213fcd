//! marketlist: build property marketing lists from radius searches.
//!
//! Works against a JSON property snapshot loaded into memory, so lists
//! created here live only for the duration of the command.

use anyhow::Result;
use clap::{Parser, Subcommand};
use marketlist_cli::output::{
    format_coordinate, format_count, format_dollars, format_miles, Status,
};
use marketlist_core::config::Config;
use marketlist_core::error::{exit_codes, Error, ErrorCode};
use marketlist_lists::model::ProfileId;
use marketlist_lists::{
    Evaluation, FilterParams, ListService, MemoryStore, NewList, Page, Property, PropertyId,
    PropertyQuery,
};
use marketlist_telemetry::TelemetryConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "marketlist")]
#[command(about = "Build property marketing lists from radius searches")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to .marketlist.toml if present)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Property snapshot JSON, overrides storage.properties_path
    #[arg(short, long, global = true, env = "MARKETLIST_PROPERTIES")]
    properties: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve an address to the coordinate of the first matching property
    Resolve {
        /// Full or partial street address
        address: String,
    },

    /// List properties within a radius of a coordinate
    #[command(allow_negative_numbers = true)]
    Radius {
        /// Center latitude in degrees
        #[arg(long)]
        lat: f64,
        /// Center longitude in degrees
        #[arg(long)]
        lon: f64,
        /// Radius in miles
        #[arg(short, long)]
        radius: f64,
    },

    /// Create a marketing list and show its members
    #[command(allow_negative_numbers = true)]
    Create {
        /// List name
        #[arg(long)]
        name: String,
        /// Center address (address mode)
        #[arg(long, conflicts_with_all = ["lat", "lon"], required_unless_present = "lat")]
        address: Option<String>,
        /// Center latitude (coordinate mode)
        #[arg(long, requires = "lon")]
        lat: Option<f64>,
        /// Center longitude (coordinate mode)
        #[arg(long, requires = "lat")]
        lon: Option<f64>,
        /// Radius in miles
        #[arg(short, long)]
        radius: Option<f64>,
        /// Free-form notes
        #[arg(long, default_value = "")]
        notes: String,
        /// Owning profile id
        #[arg(long, default_value_t = 1)]
        owner: u64,
    },

    /// Browse properties with optional filters
    Search {
        /// Address contains
        #[arg(long)]
        search: Option<String>,
        /// City contains
        #[arg(long)]
        city: Option<String>,
        /// Zip code contains
        #[arg(long)]
        zip: Option<String>,
        /// Minimum assessed value
        #[arg(long)]
        min_value: Option<i64>,
        /// Maximum assessed value
        #[arg(long)]
        max_value: Option<i64>,
        /// Page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    /// Show one property and its owner
    Property {
        /// Property id
        id: u64,
    },
}

fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    let code = match run(cli) {
        Ok(()) => exit_codes::SUCCESS,
        Err(e) => report(&e, json),
    };

    std::process::exit(code);
}

fn report(err: &anyhow::Error, json: bool) -> i32 {
    let Some(e) = err.downcast_ref::<Error>() else {
        Status::error(&format!("{:#}", err));
        return exit_codes::FAILURE;
    };

    match serde_json::to_string_pretty(&e.to_report()) {
        Ok(report) if json => eprintln!("{}", report),
        _ => Status::error(&e.to_string()),
    }

    if e.is_storage() {
        return exit_codes::STORAGE_ERROR;
    }
    match e.code.category() {
        "Configuration" => exit_codes::CONFIG_ERROR,
        "Validation" => exit_codes::VALIDATION_ERROR,
        _ => exit_codes::FAILURE,
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    let telemetry = &config.schema.telemetry;
    marketlist_telemetry::init_with_config(TelemetryConfig {
        json: telemetry.json,
        ..TelemetryConfig::with_level(if cli.verbose { "debug" } else { telemetry.log_level.as_str() })
    })?;

    let path = cli
        .properties
        .or_else(|| config.schema.storage.properties_path.clone().map(PathBuf::from))
        .ok_or_else(|| {
            Error::new(ErrorCode::ConfigError, "No property snapshot configured")
                .with_suggestion("Pass --properties or set storage.properties_path")
        })?;

    let store = MemoryStore::load_json(&path)?;
    let service = ListService::with_config(&store, &store, config.schema.search.clone());

    match cli.command {
        Commands::Resolve { address } => {
            match service.resolve(&address)? {
                Some(coord) if cli.json => println!("{}", serde_json::to_string_pretty(&coord)?),
                Some(coord) => Status::success(&format!("{} → {}", address, format_coordinate(&coord))),
                None => Status::warning(&format!("No property address contains \"{}\"", address)),
            }
        }

        Commands::Radius { lat, lon, radius } => {
            let evaluation = service.preview(&FilterParams::coordinate(lat, lon, radius))?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&evaluation)?);
            } else {
                print_evaluation(&evaluation);
            }
        }

        Commands::Create {
            name,
            address,
            lat,
            lon,
            radius,
            notes,
            owner,
        } => {
            let filter = match (address, lat, lon) {
                (Some(address), _, _) => FilterParams::AddressRadius {
                    center_address: address,
                    radius_miles: radius,
                },
                (None, Some(lat), Some(lon)) => FilterParams::CoordinateRadius {
                    center_lat: lat,
                    center_lon: lon,
                    radius_miles: radius,
                },
                _ => return Err(Error::invalid_input("Give --address or both --lat and --lon").into()),
            };

            let list = service.create_list(NewList::new(ProfileId(owner), name, filter).with_notes(notes))?;
            let members = service.list_members(list.id, 1)?;

            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "list": list,
                        "members": members,
                    }))?
                );
            } else {
                Status::header(&list.name);
                Status::field("Mode", &format!("{:?}", list.mode()));
                if let Some(address) = list.filter.center_address() {
                    Status::field("Address", address);
                }
                Status::field("Center", &format_coordinate(&list.center));
                Status::field(
                    "Radius",
                    &list.radius_miles().map_or_else(|| "-".to_string(), format_miles),
                );
                if !list.notes.is_empty() {
                    Status::field("Notes", &list.notes);
                }
                if list.members.is_empty() {
                    Status::warning("List has no members; check the address and radius");
                } else {
                    print_page(&members);
                }
            }
        }

        Commands::Search {
            search,
            city,
            zip,
            min_value,
            max_value,
            page,
        } => {
            let query = PropertyQuery {
                search,
                city,
                zip_code: zip,
                min_value,
                max_value,
            };
            let results = service.search_properties(&query, page)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                print_page(&results);
            }
        }

        Commands::Property { id } => match service.property_detail(PropertyId(id))? {
            Some(detail) if cli.json => println!("{}", serde_json::to_string_pretty(&detail)?),
            Some(detail) => {
                let p = &detail.property;
                Status::header(&p.to_string());
                Status::field("Assessed", &format_dollars(p.assessed_value));
                Status::field("Style", if p.style.is_empty() { "-" } else { &p.style });
                Status::field(
                    "Year built",
                    &p.year_built.map_or_else(|| "-".to_string(), |y| y.to_string()),
                );
                Status::field("Location", &format_coordinate(&marketlist_geo::Located::coordinate(p)));
                if let Some(owner) = detail.owner {
                    Status::field("Owner", &owner.to_string());
                    if !owner.address.is_empty() {
                        Status::field("Owner address", &owner.address);
                    }
                }
            }
            None => return Err(Error::property_not_found(id).into()),
        },
    }

    tracing::debug!(metrics = %marketlist_telemetry::metrics().export_json(), "Run complete");
    Ok(())
}

fn print_evaluation(evaluation: &Evaluation) {
    match evaluation {
        Evaluation::Matched {
            center,
            radius_miles,
            matches,
        } => {
            Status::header(&format!(
                "{} within {} of {}",
                format_count(matches.len(), "property", "properties"),
                format_miles(*radius_miles),
                format_coordinate(center)
            ));
            for m in matches {
                println!(
                    "  {:>8}  {:>9}  {:<40}  {:>12}",
                    m.property.id.0,
                    format_miles(m.distance_miles),
                    m.property.to_string(),
                    format_dollars(m.property.assessed_value)
                );
            }
        }
        Evaluation::Degraded { reason, .. } => Status::warning(&format!("No matches: {}", reason)),
    }
}

fn print_page(page: &Page<Property>) {
    Status::info(&format!(
        "Page {} of {} ({})",
        page.number,
        page.num_pages,
        format_count(page.total, "property", "properties")
    ));
    for p in &page.items {
        println!(
            "  {:>8}  {:<40}  {:>12}",
            p.id.0,
            p.to_string(),
            format_dollars(p.assessed_value)
        );
    }
}
