use clap::{Args, Parser, Subcommand, ValueEnum};
use soil_health_core::core_types::CoordinateError;
use soil_health_core::{
    derive_from_input, export_csv, export_json, Celsius, ConfigError, DashboardConfig,
    DashboardStats, ExportError, JsonFileRepository, LngLat, MarkerLayer, Municipality,
    NutrientFraction, Percent, Ph, RepositoryError, SampleDraft, SampleId, SampleRepository,
    SampleService, SampleUpdate, ServiceError, SessionContext, SoilSample, UnitError, UserId,
    UserSession,
};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod seed;

/// Soil health records for the municipalities of Abra
#[derive(Parser, Debug)]
#[command(name = "soil-cli")]
#[command(about = "Record, browse and export soil health samples", long_about = None)]
struct Cli {
    /// Sample store (JSON file); overrides the config
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Dashboard config file
    #[arg(long, global = true, default_value = "soil_dashboard.json")]
    config: PathBuf,

    /// Acting user id (required for add, edit, delete and seed)
    #[arg(short, long, global = true)]
    user: Option<String>,

    /// Display name of the acting user
    #[arg(long, global = true, default_value = "")]
    name: String,

    /// Log filter, e.g. "soil_health_core=debug" (overrides RUST_LOG and the config)
    #[arg(long, global = true)]
    log: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the soil parameters derived from a temperature
    Derive {
        /// Soil temperature in °C
        #[arg(allow_hyphen_values = true)]
        temperature: String,
    },
    /// Record a new sample
    Add(AddArgs),
    /// List all samples
    List,
    /// Change fields of a sample you own
    Edit(EditArgs),
    /// Delete a sample you own
    Delete {
        /// Sample id
        id: u64,
    },
    /// Dashboard statistics
    Stats {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Map markers as seen by the acting user
    Markers {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Export all samples
    Export {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Generate synthetic samples around the municipality centres
    Seed {
        /// Number of samples to create
        #[arg(short, long, default_value_t = 12)]
        count: usize,
    },
}

#[derive(Args, Debug)]
struct AddArgs {
    /// Municipality (sallapadan, bucay, lagangilang)
    #[arg(short, long)]
    municipality: Municipality,

    /// Place name
    #[arg(short, long, default_value = "")]
    location: String,

    /// Soil temperature in °C
    #[arg(short, long, allow_hyphen_values = true)]
    temperature: String,

    /// Longitude (defaults to the municipality centre)
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lng: Option<f64>,

    /// Latitude (defaults to the municipality centre)
    #[arg(long, requires = "lng", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// pH (replaces the derived value)
    #[arg(long)]
    ph: Option<String>,

    /// Fertility in % (replaces the derived value)
    #[arg(long)]
    fertility: Option<String>,

    /// Nitrogen fraction 0-1
    #[arg(short = 'N', long)]
    nitrogen: Option<String>,

    /// Phosphorus fraction 0-1
    #[arg(short = 'P', long)]
    phosphorus: Option<String>,

    /// Potassium fraction 0-1
    #[arg(short = 'K', long)]
    potassium: Option<String>,
}

#[derive(Args, Debug)]
struct EditArgs {
    /// Sample id
    id: u64,

    /// New place name
    #[arg(short, long)]
    location: Option<String>,

    /// New temperature in °C (recomputes the point scale)
    #[arg(short, long, allow_hyphen_values = true)]
    temperature: Option<String>,

    /// New pH
    #[arg(long)]
    ph: Option<String>,

    /// New fertility in %
    #[arg(long)]
    fertility: Option<String>,

    /// New nitrogen fraction
    #[arg(short = 'N', long)]
    nitrogen: Option<String>,

    /// New phosphorus fraction
    #[arg(short = 'P', long)]
    phosphorus: Option<String>,

    /// New potassium fraction
    #[arg(short = 'K', long)]
    potassium: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum ExportFormat {
    Csv,
    Json,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Unit(#[from] UnitError),
    #[error(transparent)]
    Coordinates(#[from] CoordinateError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

type Service = SampleService<JsonFileRepository>;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cli: &Cli, config: &DashboardConfig) {
    let filter = cli
        .log
        .as_deref()
        .and_then(|f| EnvFilter::try_new(f).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(&config.log_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let config = DashboardConfig::load_or_default(&cli.config)?;
    init_logging(cli, &config);

    let store = cli.store.clone().unwrap_or_else(|| config.store_path.clone());
    debug!("Using sample store {}", store.display());

    let session = match &cli.user {
        Some(user) => SessionContext::signed_in(UserSession::new(UserId::new(user), &cli.name)),
        None => SessionContext::new(),
    };

    // The store is only opened by commands that read or write samples
    let open = || -> Result<Service, CliError> {
        Ok(SampleService::new(
            JsonFileRepository::open(&store)?,
            session.clone(),
        ))
    };

    match &cli.command {
        Command::Derive { temperature } => derive(temperature),
        Command::Add(args) => add(&open()?, args),
        Command::List => {
            print_samples(&open()?.samples()?);
            Ok(())
        }
        Command::Edit(args) => edit(&open()?, args),
        Command::Delete { id } => {
            open()?.remove(SampleId(*id))?;
            println!("Deleted sample {id}");
            Ok(())
        }
        Command::Stats { json } => stats(&open()?, *json),
        Command::Markers { json } => markers(&open()?, *json),
        Command::Export { format, output } => export(&open()?, *format, output.as_ref()),
        Command::Seed { count } => {
            let ids = seed::seed(&open()?, *count)?;
            println!("Created {} samples", ids.len());
            Ok(())
        }
    }
}

fn derive(temperature: &str) -> Result<(), CliError> {
    let params = derive_from_input(temperature)?;
    println!("Band:        {}", params.band);
    println!("pH:          {:.1}", params.ph());
    println!("Fertility:   {:.0}%", params.fertility());
    println!("Point scale: {}", params.point_scale.value());
    Ok(())
}

fn add(service: &Service, args: &AddArgs) -> Result<(), CliError> {
    let coordinates = match (args.lng, args.lat) {
        (Some(lng), Some(lat)) => LngLat::try_new(lng, lat)?,
        _ => args.municipality.center(),
    };
    let location = if args.location.trim().is_empty() {
        args.municipality.display_name().to_string()
    } else {
        args.location.clone()
    };

    let mut draft = SampleDraft::new();
    draft
        .set_municipality(args.municipality)
        .set_location(location, coordinates);
    draft.set_temperature(args.temperature.as_str());
    if let Some(ph) = &args.ph {
        draft.set_ph(ph.as_str());
    }
    if let Some(fertility) = &args.fertility {
        draft.set_fertility(fertility.as_str());
    }
    if let Some(n) = &args.nitrogen {
        draft.set_nitrogen(n.as_str());
    }
    if let Some(p) = &args.phosphorus {
        draft.set_phosphorus(p.as_str());
    }
    if let Some(k) = &args.potassium {
        draft.set_potassium(k.as_str());
    }

    let id = service.submit(&draft)?;
    let sample = service.repository().get(id)?;
    println!(
        "Recorded sample {} at {} (pH {}, fertility {}, point scale {})",
        id,
        sample.coordinates.display_lat_lng(),
        sample.ph,
        sample.fertility,
        sample.point_scale.value()
    );
    Ok(())
}

fn edit(service: &Service, args: &EditArgs) -> Result<(), CliError> {
    let update = SampleUpdate {
        location: args.location.clone(),
        temperature: args.temperature.as_deref().map(Celsius::parse).transpose()?,
        ph: args.ph.as_deref().map(Ph::parse).transpose()?,
        fertility: args.fertility.as_deref().map(Percent::parse).transpose()?,
        nitrogen: args
            .nitrogen
            .as_deref()
            .map(NutrientFraction::parse)
            .transpose()?,
        phosphorus: args
            .phosphorus
            .as_deref()
            .map(NutrientFraction::parse)
            .transpose()?,
        potassium: args
            .potassium
            .as_deref()
            .map(NutrientFraction::parse)
            .transpose()?,
    };

    let sample = service.edit(SampleId(args.id), &update)?;
    print_samples(&[sample]);
    Ok(())
}

fn nutrient(value: Option<NutrientFraction>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.0}", v.as_display_percent()))
}

fn print_samples(samples: &[SoilSample]) {
    println!(
        "  ID  MUNICIPALITY LOCATION                    TEMP    PH  FERT PS   N%   P%   K%  OWNER"
    );
    for s in samples {
        let temperature = s.temperature.to_string();
        println!(
            "{:>4}  {:<12} {:<24} {:>7} {:>5.1} {:>5.0} {:>2} {:>4} {:>4} {:>4}  {}",
            s.id,
            s.municipality.display_name(),
            s.location,
            temperature,
            *s.ph,
            *s.fertility,
            s.point_scale.value(),
            nutrient(s.nitrogen),
            nutrient(s.phosphorus),
            nutrient(s.potassium),
            s.owner_id,
        );
    }
}

fn optional(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.decimals$}"))
}

fn stats(service: &Service, json: bool) -> Result<(), CliError> {
    let stats = DashboardStats::from_samples(&service.samples()?);
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{}", service.session().greeting_now());
    println!();
    println!("Samples:          {}", stats.sample_count);
    println!("Average pH:       {}", optional(stats.overall.ph, 2));
    println!("Average temp:     {} °C", optional(stats.overall.temperature, 1));
    println!("Average fertility {} %", optional(stats.overall.fertility, 1));
    println!();
    for m in &stats.municipalities {
        println!(
            "{:<12} {:>3} samples  pH {:>5}  temp {:>5}  fertility {:>5}",
            m.municipality.display_name(),
            m.count,
            optional(m.averages.ph, 2),
            optional(m.averages.temperature, 1),
            optional(m.averages.fertility, 1),
        );
    }
    println!();
    for (i, count) in stats.point_scale_histogram.iter().enumerate() {
        println!("Point scale {}: {}", i + 1, count);
    }
    if !stats.monthly.is_empty() {
        println!();
        for month in &stats.monthly {
            println!(
                "{} {}  {:>3} samples  pH {:>5}",
                month.label(),
                month.year,
                month.count,
                optional(month.averages.ph, 2)
            );
        }
    }
    Ok(())
}

fn markers(service: &Service, json: bool) -> Result<(), CliError> {
    let samples = service.samples()?;
    let viewer = service.session().current_user();
    let mut layer = MarkerLayer::new();
    layer.reconcile(&samples, viewer.as_ref());

    if json {
        println!("{}", serde_json::to_string_pretty(&layer.markers())?);
        return Ok(());
    }

    for m in layer.markers() {
        println!(
            "{:>4}  {}  {:<18} {:<24} pH {:<4} {:<18} {:<15} {:<18} {}",
            m.id,
            m.position.display_lat_lng(),
            m.color,
            m.popup.title,
            m.popup.ph,
            m.popup.ph_class,
            m.popup.temperature_range,
            m.popup.fertility_level,
            if m.editable { "editable" } else { "" }
        );
    }
    Ok(())
}

fn export(
    service: &Service,
    format: ExportFormat,
    output: Option<&PathBuf>,
) -> Result<(), CliError> {
    let samples = service.samples()?;
    let out: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    };
    match format {
        ExportFormat::Csv => export_csv(&samples, out)?,
        ExportFormat::Json => export_json(&samples, out)?,
    }
    if let Some(path) = output {
        eprintln!("Exported {} samples to {}", samples.len(), path.display());
    }
    Ok(())
}
