//! oxidock — dock a ligand against a receptor from the command line.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use oxidock_common::DockSettings;
use oxidock_dock::install;
use oxidock_dock::pose::{DockingRequest, VinaPoseGenerator};

#[derive(Parser, Debug)]
#[command(name = "oxidock", version, about = "Protein-ligand docking via AutoDock Vina")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate docked poses for a receptor/ligand pair
    Dock {
        /// Receptor structure (.pdb)
        #[arg(long)]
        receptor: PathBuf,

        /// Ligand structure (.sdf)
        #[arg(long)]
        ligand: PathBuf,

        /// Search box center as x,y,z, overriding detection (requires --size)
        #[arg(long, value_delimiter = ',')]
        center: Option<Vec<f64>>,

        /// Search box dimensions as x,y,z, overriding detection (requires --center)
        #[arg(long, value_delimiter = ',')]
        size: Option<Vec<f64>>,

        /// Search effort passed to the engine
        #[arg(long)]
        exhaustiveness: Option<u32>,

        /// Search the whole receptor instead of detecting a pocket
        #[arg(long)]
        no_detect_pockets: bool,

        /// Prepare everything but skip the engine invocation
        #[arg(long)]
        dry_run: bool,

        /// Working directory for job artifacts (a fresh one is created when
        /// omitted)
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Directory the engine is installed under
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Settings file (YAML); flags override its values
        #[arg(long)]
        config: Option<PathBuf>,

        /// Hard limit on the engine invocation, in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
    },

    /// Download and install the docking engine ahead of time
    Setup {
        /// Directory to install the engine under
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("oxidock=info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Dock {
            receptor,
            ligand,
            center,
            size,
            exhaustiveness,
            no_detect_pockets,
            dry_run,
            out_dir,
            data_dir,
            config,
            timeout_secs,
        } => {
            let mut settings = match config {
                Some(path) => DockSettings::from_yaml(&path)
                    .with_context(|| format!("failed to load settings from {:?}", path))?,
                None => DockSettings::default(),
            };
            if let Some(dir) = data_dir {
                settings.data_dir = Some(dir);
            }
            if let Some(e) = exhaustiveness {
                settings.exhaustiveness = Some(e);
            }
            if let Some(t) = timeout_secs {
                settings.engine_timeout_secs = Some(t);
            }
            if no_detect_pockets {
                settings.detect_pockets = false;
            }

            let (centroid, box_dims) = match (center, size) {
                (Some(c), Some(s)) if c.len() == 3 && s.len() == 3 => {
                    (Some(to_triple(c)), Some(to_triple(s)))
                }
                (None, None) => (None, None),
                _ => anyhow::bail!("--center and --size must both be given as three values x,y,z"),
            };

            // Dry runs must work without the engine (or a network) present.
            let vina_path = if dry_run {
                install::download_target(std::env::consts::OS, cfg!(target_pointer_width = "64"))
                    .map(|t| settings.resolved_data_dir().join(t.dir_name).join("bin/vina"))
                    .unwrap_or_else(|_| PathBuf::from("vina"))
            } else {
                install::ensure_installed(&settings.resolved_data_dir()).await?
            };

            let generator = VinaPoseGenerator::new(&vina_path, &settings);
            let result = generator
                .generate(&DockingRequest {
                    protein: receptor,
                    ligand,
                    centroid,
                    box_dims,
                    dry_run,
                    out_dir,
                })
                .await?;

            println!("receptor: {}", result.hydrogenated_receptor.display());
            println!("docked:   {}", result.docked_ligand.display());
        }

        Commands::Setup { data_dir } => {
            let mut settings = DockSettings::default();
            settings.data_dir = data_dir;
            let path = install::ensure_installed(&settings.resolved_data_dir()).await?;
            info!("Engine ready at {:?}", path);
            println!("{}", path.display());
        }
    }
    Ok(())
}

fn to_triple(values: Vec<f64>) -> [f64; 3] {
    [values[0], values[1], values[2]]
}
