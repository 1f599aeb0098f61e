use anyhow::Context;
use cattle_care::adapters::{
    FixedDeviceGeolocation, IpApiProvider, NominatimGeocoder, PrintLauncher, SystemLauncher,
};
use cattle_care::config::cli::{CarePlanArgs, Command, LocateArgs, NutritionArgs, VaccinationArgs};
use cattle_care::core::{
    CarePlan, ExternalLauncher, LocationState, NutritionInput, NutritionPlan, VaccinationInput,
    VaccinationSchedule,
};
use cattle_care::utils::error::ErrorSeverity;
use cattle_care::utils::{logger, validation::Validate};
use cattle_care::{
    compute_nutrition_plan, compute_vaccination_schedule, AppConfig, Attempt, CareError,
    CliConfig, LocationResolver,
};
use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = run(cli).await {
        match e.downcast_ref::<CareError>() {
            Some(care) => {
                tracing::error!(
                    "❌ {:#} (Category: {:?}, Severity: {:?})",
                    e,
                    care.category(),
                    care.severity()
                );
                eprintln!("❌ {}", care.user_friendly_message());
                eprintln!("💡 Suggestion: {}", care.recovery_suggestion());

                let exit_code = match care.severity() {
                    ErrorSeverity::Low => 0,
                    ErrorSeverity::Medium => 2,
                    ErrorSeverity::High => 1,
                    ErrorSeverity::Critical => 3,
                };
                if exit_code > 0 {
                    std::process::exit(exit_code);
                }
            }
            None => {
                tracing::error!("❌ {:#}", e);
                eprintln!("❌ {:#}", e);
                std::process::exit(1);
            }
        }
    }
}

async fn run(cli: CliConfig) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            AppConfig::from_file(path).with_context(|| format!("loading config '{}'", path))?
        }
        None => AppConfig::default(),
    };
    config.validate()?;

    match cli.command {
        Command::Vaccination(args) => {
            print_vaccination(compute_vaccination_schedule(&vaccination_input(&args)).as_ref());
        }
        Command::Nutrition(args) => {
            print_nutrition(compute_nutrition_plan(&nutrition_input(&args)).as_ref());
        }
        Command::CarePlan(args) => {
            let (vaccination, nutrition) = care_plan_inputs(&args);
            let plan = CarePlan::compute(&vaccination, &nutrition);
            if plan.is_empty() {
                println!("No animal details given. Run `cattle-care care-plan --help` for the inputs.");
                println!();
            }
            print_vaccination(plan.vaccination.as_ref());
            println!();
            print_nutrition(plan.nutrition.as_ref());
        }
        Command::Locate(args) => locate(&config, &args).await?,
    }

    Ok(())
}

fn vaccination_input(args: &VaccinationArgs) -> VaccinationInput {
    VaccinationInput {
        breed: args.breed.clone(),
        age_months: args.age_months,
        last_vaccination_date: args.last_date,
    }
}

fn nutrition_input(args: &NutritionArgs) -> NutritionInput {
    NutritionInput {
        breed: args.breed.clone(),
        age_months: args.age_months,
        weight_kg: args.weight_kg,
        milk_yield_l_per_day: args.milk_l_per_day,
    }
}

fn care_plan_inputs(args: &CarePlanArgs) -> (VaccinationInput, NutritionInput) {
    (
        VaccinationInput {
            breed: args.breed.clone(),
            age_months: args.age_months,
            last_vaccination_date: args.last_date,
        },
        NutritionInput {
            breed: args.breed.clone(),
            age_months: args.age_months.map(f64::from),
            weight_kg: args.weight_kg,
            milk_yield_l_per_day: args.milk_l_per_day,
        },
    )
}

fn print_vaccination(schedule: Option<&VaccinationSchedule>) {
    println!("💉 Vaccination");
    match schedule {
        Some(schedule) => {
            println!("   Next due: {} days", schedule.next_due_in_days);
            println!("   Notes:    {}", schedule.notes);
        }
        None => println!("   Enter breed, age and last vaccination date to see a schedule."),
    }
}

fn print_nutrition(plan: Option<&NutritionPlan>) {
    println!("🥗 Nutrition");
    match plan {
        Some(plan) => {
            println!("   Fodder:      {} kg/day", plan.fodder_display());
            println!("   Concentrate: {} kg/day", plan.concentrate_display());
            println!("   Supplements: {}", plan.supplements);
            println!("   Notes:       {}", plan.notes);
        }
        None => println!("   Enter breed, age and weight to see a feed plan."),
    }
}

async fn locate(config: &AppConfig, args: &LocateArgs) -> anyhow::Result<()> {
    let device = match (args.gps, args.gps_error) {
        (Some((latitude, longitude)), _) => FixedDeviceGeolocation::at(latitude, longitude),
        (None, Some(error)) => FixedDeviceGeolocation::failing(error.into()),
        (None, None) => FixedDeviceGeolocation::unavailable(),
    };

    let resolver = LocationResolver::new(
        IpApiProvider::from_config(config)?,
        NominatimGeocoder::from_config(config)?,
        device,
    )
    .with_default_location(config.default_location()?)
    .with_links(config.vet_links()?);

    resolver.resolve_approximate().await;
    print_location(&resolver.state());

    if args.precise || args.gps.is_some() {
        report(resolver.request_gps_location().await, resolver.message());
        print_location(&resolver.state());
    }

    if let Some(address) = &args.address {
        report(resolver.submit_manual_location(address).await, resolver.message());
        print_location(&resolver.state());
    }

    let launcher: Box<dyn ExternalLauncher> = if args.open {
        Box::new(SystemLauncher)
    } else {
        Box::new(PrintLauncher)
    };

    if args.search_vets && resolver.search_nearby_vets(launcher.as_ref()).is_none() {
        println!("⚠️  Vet search needs a resolved location. Enter your address with --address.");
    }
    if args.call && resolver.call_emergency(launcher.as_ref()).is_none() {
        println!("⚠️  Emergency call needs a resolved location. Enter your address with --address.");
    }

    Ok(())
}

fn report(attempt: Attempt, message: Option<String>) {
    match attempt {
        Attempt::Failed(_) => {
            if let Some(message) = message {
                println!("⚠️  {}", message);
            }
        }
        Attempt::Ignored => println!("⏳ A location request is already in progress."),
        Attempt::Applied(_) | Attempt::Kept => {}
    }
}

fn print_location(state: &LocationState) {
    match state {
        LocationState::Resolved(location) => println!(
            "📍 {} ({}) [{}]",
            location.label, location.coordinate, location.precision
        ),
        LocationState::Failed { reason } => println!("📍 Location unavailable ({})", reason),
        LocationState::Resolving => println!("📍 Resolving location..."),
        LocationState::Unresolved => println!("📍 Location not set"),
    }
}
