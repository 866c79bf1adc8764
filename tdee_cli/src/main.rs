use clap::{Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use tdee_core::report::{render_stage, render_tables};
use tdee_core::tables::validate_default_tables;
use tdee_core::*;

mod input;
mod interactive;

use input::{parse_age, parse_gender, parse_height, parse_weight};

#[derive(Parser)]
#[command(name = "tdee")]
#[command(about = "BMR, TDEE and daily calorie target calculator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Use a specific config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk through the BMR, TDEE and goals stages (default)
    Interactive {
        /// Print the session results as JSON when finished
        #[arg(long)]
        json: bool,
    },

    /// Calculate from flags in one go
    Calc {
        /// Age in years (1-120)
        #[arg(long, value_parser = parse_age)]
        age: Option<u32>,

        /// Gender (male, female)
        #[arg(long, value_parser = parse_gender)]
        gender: Option<Gender>,

        /// Height in cm (100-250)
        #[arg(long, value_parser = parse_height)]
        height: Option<f64>,

        /// Weight in kg (30-250)
        #[arg(long, value_parser = parse_weight)]
        weight: Option<f64>,

        /// Activity level label or key; enables the TDEE stage
        #[arg(long)]
        activity: Option<String>,

        /// Goal label or key; enables the goals stage
        #[arg(long, requires = "activity")]
        goal: Option<String>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// List activity levels and fitness goals
    Tables,

    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the config file path
    Path,
    /// Print the effective configuration
    Show,
    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tdee_core::logging::init();

    let cli = Cli::parse();

    let errors = validate_default_tables();
    if !errors.is_empty() {
        eprintln!("Factor table validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::Config("Invalid factor tables".into()));
    }

    match cli.command {
        Some(Commands::Calc {
            age,
            gender,
            height,
            weight,
            activity,
            goal,
            json,
        }) => {
            let config = load_config(cli.config.as_deref())?;
            let d = &config.defaults;
            let profile = UserProfile::bounded(
                age.unwrap_or(d.age),
                gender.unwrap_or(d.gender),
                height.unwrap_or(d.height),
                weight.unwrap_or(d.weight),
            )?;
            let activity = activity.or_else(|| d.activity.clone());
            let goal = goal.or_else(|| d.goal.clone());
            cmd_calc(profile, activity, goal, json, &config)
        }
        Some(Commands::Interactive { json }) => {
            cmd_interactive(json, &load_config(cli.config.as_deref())?)
        }
        Some(Commands::Tables) => {
            print!("{}", render_tables());
            Ok(())
        }
        Some(Commands::Config { action }) => cmd_config(&action, cli.config.as_deref()),
        None => {
            // Default to the interactive form
            cmd_interactive(false, &load_config(cli.config.as_deref())?)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    tracing::debug!("Downstream policy: {:?}", config.session.downstream);
    Ok(config)
}

fn cmd_calc(
    profile: UserProfile,
    activity: Option<String>,
    goal: Option<String>,
    json: bool,
    config: &Config,
) -> Result<()> {
    let mut session = Session::new(config.session.downstream);

    let mut commands = vec![Command::SubmitBmr(profile)];
    commands.extend(activity.map(Command::SubmitTdee));
    commands.extend(goal.map(Command::SubmitGoals));

    for command in commands {
        let stage = command.stage();
        let note = session.apply(command)?;

        if note.is_error() {
            eprintln!("✗ {}", note.message);
            std::process::exit(2);
        }

        if !json {
            println!("✓ {}", note.message);
            for line in render_stage(&session, stage) {
                println!("  {}", line);
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&session.summary())?);
    }

    Ok(())
}

fn cmd_interactive(json: bool, config: &Config) -> Result<()> {
    let stdin = io::stdin();
    if !json {
        interactive::Form::new(stdin.lock(), io::stdout().lock()).run(config)?;
        return Ok(());
    }

    // Prompts go to stderr so stdout only carries the summary
    let session = interactive::Form::new(stdin.lock(), io::stderr().lock()).run(config)?;
    println!("{}", serde_json::to_string_pretty(&session.summary())?);
    Ok(())
}

fn cmd_config(action: &ConfigAction, path: Option<&Path>) -> Result<()> {
    let path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(Config::default_config_path);

    match action {
        ConfigAction::Path => println!("{}", path.display()),
        ConfigAction::Show => {
            let config = if path.exists() {
                Config::load_from(&path)?
            } else {
                Config::default()
            };
            print!("{}", config.to_toml()?);
        }
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                eprintln!(
                    "Config file {} already exists (use --force to overwrite)",
                    path.display()
                );
                return Err(Error::Config("Config file already exists".into()));
            }
            Config::default().save_to(&path)?;
            println!("✓ Wrote default config to {}", path.display());
        }
    }

    Ok(())
}
