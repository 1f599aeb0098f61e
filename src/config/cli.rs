use crate::domain::model::PositionError;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Clone, Parser)]
#[command(name = "cattle-care")]
#[command(about = "Livestock care planning and vet finder")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Suggest when the next vaccination is due
    Vaccination(VaccinationArgs),
    /// Recommend a daily feed plan
    Nutrition(NutritionArgs),
    /// Vaccination and nutrition together
    CarePlan(CarePlanArgs),
    /// Resolve the current location and optionally find a vet
    Locate(LocateArgs),
}

#[derive(Debug, Clone, Args)]
pub struct VaccinationArgs {
    #[arg(long, default_value = "")]
    pub breed: String,

    /// Whole months; fractional ages are rejected
    #[arg(long)]
    pub age_months: Option<u32>,

    /// YYYY-MM-DD
    #[arg(long)]
    pub last_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Args)]
pub struct NutritionArgs {
    #[arg(long, default_value = "")]
    pub breed: String,

    #[arg(long)]
    pub age_months: Option<f64>,

    #[arg(long)]
    pub weight_kg: Option<f64>,

    #[arg(long)]
    pub milk_l_per_day: Option<f64>,
}

#[derive(Debug, Clone, Args)]
pub struct CarePlanArgs {
    #[arg(long, default_value = "")]
    pub breed: String,

    #[arg(long)]
    pub age_months: Option<u32>,

    #[arg(long)]
    pub last_date: Option<NaiveDate>,

    #[arg(long)]
    pub weight_kg: Option<f64>,

    #[arg(long)]
    pub milk_l_per_day: Option<f64>,
}

#[derive(Debug, Clone, Args)]
pub struct LocateArgs {
    /// Device fix to report when a precise location is requested, as LAT,LNG
    #[arg(long, value_parser = parse_lat_lng, allow_hyphen_values = true)]
    pub gps: Option<(f64, f64)>,

    /// Simulate a device that refuses the precise location request
    #[arg(long, value_enum, conflicts_with = "gps")]
    pub gps_error: Option<GpsErrorArg>,

    /// Request a precise location after the approximate lookup
    #[arg(long)]
    pub precise: bool,

    /// Free-text address to geocode
    #[arg(long)]
    pub address: Option<String>,

    /// Open a map search for nearby vets
    #[arg(long)]
    pub search_vets: bool,

    /// Dial the emergency vet line
    #[arg(long)]
    pub call: bool,

    /// Open links with the system handler instead of printing them
    #[arg(long)]
    pub open: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GpsErrorArg {
    Denied,
    Unavailable,
    Timeout,
    Unknown,
}

impl From<GpsErrorArg> for PositionError {
    fn from(arg: GpsErrorArg) -> Self {
        match arg {
            GpsErrorArg::Denied => PositionError::PermissionDenied,
            GpsErrorArg::Unavailable => PositionError::PositionUnavailable,
            GpsErrorArg::Timeout => PositionError::Timeout,
            GpsErrorArg::Unknown => PositionError::Unknown,
        }
    }
}

fn parse_lat_lng(value: &str) -> Result<(f64, f64), String> {
    let (lat, lng) = value
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LNG but got '{}'", value))?;
    let lat = lat
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid latitude '{}': {}", lat, e))?;
    let lng = lng
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid longitude '{}': {}", lng, e))?;
    Ok((lat, lng))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lat_lng() {
        assert_eq!(parse_lat_lng("12.9, 77.6"), Ok((12.9, 77.6)));
        assert_eq!(parse_lat_lng("-33.9,18.4"), Ok((-33.9, 18.4)));
        assert!(parse_lat_lng("12.9").is_err());
        assert!(parse_lat_lng("north,77.6").is_err());
    }

    #[test]
    fn test_parse_locate_command() {
        let cli = CliConfig::try_parse_from([
            "cattle-care",
            "locate",
            "--precise",
            "--gps-error",
            "denied",
            "--address",
            "Anand",
            "--search-vets",
        ])
        .unwrap();

        match cli.command {
            Command::Locate(args) => {
                assert!(args.precise);
                assert_eq!(args.gps_error, Some(GpsErrorArg::Denied));
                assert_eq!(args.address.as_deref(), Some("Anand"));
                assert!(args.search_vets);
                assert!(!args.open);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_vaccination_rejects_fractional_age() {
        let parsed = CliConfig::try_parse_from([
            "cattle-care",
            "vaccination",
            "--breed",
            "Gir",
            "--age-months",
            "6.5",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_vaccination_parses_date() {
        let cli = CliConfig::try_parse_from([
            "cattle-care",
            "-v",
            "vaccination",
            "--breed",
            "Gir",
            "--age-months",
            "6",
            "--last-date",
            "2024-02-29",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Command::Vaccination(args) => {
                assert_eq!(args.last_date, NaiveDate::from_ymd_opt(2024, 2, 29));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
