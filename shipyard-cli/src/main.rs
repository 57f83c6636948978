#![deny(missing_docs)]
//! Shipyard command-line interface.
//!
//! Browses and edits the ship registry of a running Shipyard server.

mod client;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use client::{DEFAULT_SERVER_URL, PageQuery, ShipClient};
use shipyard_core::{Ship, ShipCriteria, ShipOrder, ShipPayload, ShipType};
use std::fmt::Write;

pub(crate) type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser)]
#[command(name = "shipyard", version, about = "Shipyard CLI")]
struct Cli {
    /// Base URL of the Shipyard server.
    #[arg(long, global = true, env = "SHIPYARD_API_URL", default_value = DEFAULT_SERVER_URL)]
    server_url: String,
    /// Output format for ship data.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
enum TypeArg {
    Transport,
    Military,
    Merchant,
}

impl From<TypeArg> for ShipType {
    fn from(value: TypeArg) -> Self {
        match value {
            TypeArg::Transport => ShipType::Transport,
            TypeArg::Military => ShipType::Military,
            TypeArg::Merchant => ShipType::Merchant,
        }
    }
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
enum OrderArg {
    Id,
    Speed,
    Date,
    Rating,
}

impl From<OrderArg> for ShipOrder {
    fn from(value: OrderArg) -> Self {
        match value {
            OrderArg::Id => ShipOrder::Id,
            OrderArg::Speed => ShipOrder::Speed,
            OrderArg::Date => ShipOrder::Date,
            OrderArg::Rating => ShipOrder::Rating,
        }
    }
}

#[derive(Args, Clone, Debug, Default)]
struct FilterArgs {
    /// Substring of the ship name.
    #[arg(long)]
    name: Option<String>,
    /// Substring of the planet.
    #[arg(long)]
    planet: Option<String>,
    /// Exact ship type.
    #[arg(long = "type", value_enum)]
    ship_type: Option<TypeArg>,
    /// Produced in or after the year of this date (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date)]
    after: Option<DateTime<Utc>>,
    /// Produced in or before the year of this date (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date)]
    before: Option<DateTime<Utc>>,
    /// Exact used flag.
    #[arg(long)]
    used: Option<bool>,
    /// Inclusive lower speed bound.
    #[arg(long)]
    min_speed: Option<f64>,
    /// Inclusive upper speed bound.
    #[arg(long)]
    max_speed: Option<f64>,
    /// Inclusive lower crew size bound.
    #[arg(long)]
    min_crew_size: Option<i32>,
    /// Inclusive upper crew size bound.
    #[arg(long)]
    max_crew_size: Option<i32>,
    /// Inclusive lower rating bound.
    #[arg(long)]
    min_rating: Option<f64>,
    /// Inclusive upper rating bound.
    #[arg(long)]
    max_rating: Option<f64>,
}

impl FilterArgs {
    fn criteria(&self) -> ShipCriteria {
        ShipCriteria {
            name: self.name.clone(),
            planet: self.planet.clone(),
            ship_type: self.ship_type.map(ShipType::from),
            after: self.after.map(|date| date.timestamp_millis()),
            before: self.before.map(|date| date.timestamp_millis()),
            is_used: self.used,
            min_speed: self.min_speed,
            max_speed: self.max_speed,
            min_crew_size: self.min_crew_size,
            max_crew_size: self.max_crew_size,
            min_rating: self.min_rating,
            max_rating: self.max_rating,
        }
    }
}

#[derive(Args, Clone, Debug, Default)]
struct ShipArgs {
    /// Ship name.
    #[arg(long)]
    name: Option<String>,
    /// Home planet.
    #[arg(long)]
    planet: Option<String>,
    /// Ship type.
    #[arg(long = "type", value_enum)]
    ship_type: Option<TypeArg>,
    /// Production date (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date)]
    prod_date: Option<DateTime<Utc>>,
    /// Whether the ship is second-hand.
    #[arg(long)]
    used: Option<bool>,
    /// Speed between 0.01 and 0.99.
    #[arg(long)]
    speed: Option<f64>,
    /// Crew size between 1 and 9999.
    #[arg(long)]
    crew_size: Option<i32>,
}

impl ShipArgs {
    fn payload(self) -> ShipPayload {
        ShipPayload {
            name: self.name,
            planet: self.planet,
            ship_type: self.ship_type.map(ShipType::from),
            prod_date: self.prod_date,
            used: self.used,
            speed: self.speed,
            crew_size: self.crew_size,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List one page of ships matching the filters.
    List {
        #[command(flatten)]
        filter: FilterArgs,
        /// Sort key.
        #[arg(long, value_enum, default_value_t = OrderArg::Id)]
        order: OrderArg,
        /// Zero-based page index.
        #[arg(long, default_value_t = 0)]
        page_number: u32,
        /// Ships per page.
        #[arg(long, default_value_t = 3)]
        page_size: u32,
    },
    /// Count ships matching the filters.
    Count {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Show one ship.
    Get {
        /// Ship identifier.
        id: String,
    },
    /// Register a new ship.
    Create(ShipArgs),
    /// Change some fields of a ship.
    Update {
        /// Ship identifier.
        id: String,
        #[command(flatten)]
        ship: ShipArgs,
    },
    /// Remove a ship.
    Delete {
        /// Ship identifier.
        id: String,
    },
}

/// Parse a calendar date as midnight UTC.
fn parse_date(raw: &str) -> Result<DateTime<Utc>, String> {
    let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("expected YYYY-MM-DD, got '{raw}': {err}"))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| format!("invalid date '{raw}'"))?;
    Ok(Utc.from_utc_datetime(&midnight))
}

fn format_ship(ship: &Ship) -> String {
    format!(
        "#{} {} ({}) {} built {} speed {:.2} crew {} {} rating {:.2}",
        ship.id,
        ship.name,
        ship.planet,
        ship.ship_type,
        ship.prod_date.format("%Y-%m-%d"),
        ship.speed,
        ship.crew_size,
        if ship.used { "used" } else { "new" },
        ship.rating
    )
}

fn render_ships(ships: &[Ship], format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(ships)?),
        OutputFormat::Text => {
            if ships.is_empty() {
                return Ok("No ships found.".to_string());
            }
            let mut output = String::new();
            for ship in ships {
                writeln!(output, "{}", format_ship(ship))?;
            }
            Ok(output.trim_end().to_string())
        }
    }
}

fn render_ship(ship: &Ship, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(ship)?),
        OutputFormat::Text => Ok(format_ship(ship)),
    }
}

async fn run(cli: Cli) -> CliResult<String> {
    let client = ShipClient::new(&cli.server_url)?;
    let format = cli.format;
    match cli.command {
        Commands::List {
            filter,
            order,
            page_number,
            page_size,
        } => {
            let page = PageQuery {
                order: order.into(),
                page_number,
                page_size,
            };
            let ships = client.list(&filter.criteria(), page).await?;
            render_ships(&ships, format)
        }
        Commands::Count { filter } => Ok(client.count(&filter.criteria()).await?.to_string()),
        Commands::Get { id } => render_ship(&client.get(&id).await?, format),
        Commands::Create(ship) => render_ship(&client.create(&ship.payload()).await?, format),
        Commands::Update { id, ship } => {
            render_ship(&client.update(&id, &ship.payload()).await?, format)
        }
        Commands::Delete { id } => {
            client.delete(&id).await?;
            Ok(format!("Deleted ship {id}."))
        }
    }
}

#[cfg(not(test))]
#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();
    println!("{}", run(cli).await?);
    Ok(())
}

#[cfg(test)]
fn main() {}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::Method::GET;
    use httpmock::MockServer;
    use serde_json::json;

    fn sample_ship(id: i64, used: bool) -> Ship {
        Ship {
            id,
            name: "Voyager".to_string(),
            planet: "Neptune".to_string(),
            ship_type: ShipType::Merchant,
            prod_date: Utc.with_ymd_and_hms(3009, 6, 1, 0, 0, 0).unwrap(),
            used,
            speed: 0.5,
            crew_size: 12,
            rating: 3.64,
        }
    }

    #[test]
    fn cli_parses_list_filters() {
        let cli = Cli::try_parse_from([
            "shipyard",
            "list",
            "--type",
            "military",
            "--after",
            "3000-01-01",
            "--min-speed",
            "0.3",
            "--order",
            "rating",
            "--page-size",
            "10",
        ])
        .expect("parse");
        let Commands::List {
            filter,
            order,
            page_number,
            page_size,
        } = cli.command
        else {
            panic!("expected list command");
        };
        let criteria = filter.criteria();
        assert_eq!(criteria.ship_type, Some(ShipType::Military));
        assert_eq!(
            criteria.after,
            Some(Utc.with_ymd_and_hms(3000, 1, 1, 0, 0, 0).unwrap().timestamp_millis())
        );
        assert_eq!(criteria.min_speed, Some(0.3));
        assert_eq!(criteria.name, None);
        assert_eq!(ShipOrder::from(order), ShipOrder::Rating);
        assert_eq!(page_number, 0);
        assert_eq!(page_size, 10);
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn cli_builds_partial_update_payload() {
        let cli = Cli::try_parse_from(["shipyard", "update", "7", "--crew-size", "40"])
            .expect("parse");
        let Commands::Update { id, ship } = cli.command else {
            panic!("expected update command");
        };
        assert_eq!(id, "7");
        assert_eq!(
            ship.payload(),
            ShipPayload {
                crew_size: Some(40),
                ..ShipPayload::default()
            }
        );
    }

    #[test]
    fn parse_date_rejects_garbage() {
        assert!(parse_date("3010-02-30").is_err());
        assert!(parse_date("yesterday").is_err());
        assert_eq!(
            parse_date("3010-02-03").expect("date"),
            Utc.with_ymd_and_hms(3010, 2, 3, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn render_ships_text_lists_each_ship() {
        let output =
            render_ships(&[sample_ship(1, false), sample_ship(2, true)], OutputFormat::Text)
                .expect("render");
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("#1 Voyager (Neptune) MERCHANT built 3009-06-01"));
        assert!(lines[1].contains("used rating 3.64"));

        let empty = render_ships(&[], OutputFormat::Text).expect("render");
        assert_eq!(empty, "No ships found.");
    }

    #[test]
    fn render_ship_json_uses_wire_names() {
        let output = render_ship(&sample_ship(1, false), OutputFormat::Json).expect("render");
        let value: serde_json::Value = serde_json::from_str(&output).expect("json");
        assert_eq!(value["shipType"], "MERCHANT");
        assert_eq!(value["crewSize"], 12);
    }

    #[tokio::test]
    async fn run_count_prints_number() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/ships/count").query_param("name", "Voy");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!(5));
            })
            .await;

        let cli = Cli::try_parse_from([
            "shipyard",
            "--server-url",
            server.base_url().as_str(),
            "count",
            "--name",
            "Voy",
        ])
        .expect("parse");
        assert_eq!(run(cli).await.expect("run"), "5");
        mock.assert_async().await;
    }
}
