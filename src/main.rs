// main.rs
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueHint};

use handshape::distance::{contour_costs, letter_distance, similarity, Method};
use handshape::letters::{letter_to_arm, letter_to_pm, validate_all};
use handshape::pose::{base_arm, PoseDocument};
use handshape::prosodic::PmHandshape;
use handshape::render::Renderer;
use handshape::{logging, tables, NotationTables, Result};

#[derive(Parser)]
#[command(author, version, about = "Resolve, compare and render sign-language handshapes")]
struct Cli {
    /// Directory with replacement notation tables (overrides HANDSHAPE_TABLES)
    #[arg(long, global = true, value_hint = ValueHint::DirPath)]
    tables: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the joint configuration of a fingerspelled letter
    Letter { letter: String },

    /// Parse a prosodic-model string and print its articulatory handshape
    Parse { notation: String },

    /// Distance between two letters
    Distance {
        a: char,
        b: char,
        #[command(flatten)]
        method: MethodArg,
    },

    /// Summed letter-by-letter distance between two equally long strings
    Similarity {
        a: String,
        b: String,
        #[command(flatten)]
        method: MethodArg,
    },

    /// Cost of fingerspelling a string, pair by pair and wrapping around
    Contour {
        word: String,
        #[command(flatten)]
        method: MethodArg,
    },

    /// Check that both notations of every letter resolve to the same hand
    Check {
        /// Largest unweighted gap, in degrees, still counted as agreement
        #[arg(long, default_value_t = 0)]
        tolerance: i32,
    },

    /// Render a letter through the external image renderer
    Render(RenderArgs),
}

#[derive(Args)]
struct MethodArg {
    /// Reduction applied to each delta: unweighted or weighted
    #[arg(long, default_value = "unweighted")]
    method: Method,
}

#[derive(Args)]
struct RenderArgs {
    letter: String,

    /// Pose document depicting the rest hand (JSON)
    #[arg(long, value_hint = ValueHint::FilePath)]
    base_pose: PathBuf,

    /// Where to write the transformed pose document
    #[arg(long, value_hint = ValueHint::FilePath)]
    pose_out: PathBuf,

    /// Image the renderer should produce
    #[arg(long, value_hint = ValueHint::FilePath)]
    image_out: PathBuf,

    /// Renderer executable
    #[arg(long, value_hint = ValueHint::ExecutablePath)]
    renderer: PathBuf,

    /// Scene specification passed to the renderer
    #[arg(long, value_hint = ValueHint::FilePath)]
    scene: PathBuf,
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_tracing() {
        eprintln!("warning: {err}");
    }
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            ExitCode::FAILURE
        }
    }
}

fn load_tables(dir: Option<PathBuf>) -> Result<&'static NotationTables> {
    match dir {
        Some(dir) => {
            tracing::info!(dir = %dir.display(), "loading notation tables");
            tables::install(NotationTables::from_dir(dir)?)
        }
        None => tables::global(),
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let t = load_tables(cli.tables)?;

    match cli.command {
        Command::Letter { letter } => {
            let arm = letter_to_arm(t, &letter)?;
            println!("{}  [{}]", arm.handshape, arm.orientation);
            println!("{}", arm.resolve(t)?);
        }
        Command::Parse { notation } => {
            let pm = PmHandshape::parse(&notation, t)?;
            let am = pm.to_am_handshape(t)?;
            println!("{pm}");
            println!("{am}");
            println!("{}", am.resolve(t)?);
        }
        Command::Distance { a, b, method } => {
            println!("{}", letter_distance(t, a, b, method.method)?);
        }
        Command::Similarity { a, b, method } => {
            println!("{}", similarity(t, &a, &b, method.method)?);
        }
        Command::Contour { word, method } => {
            let costs = contour_costs(t, &word, method.method)?;
            let letters: Vec<char> = word.chars().collect();
            for (i, cost) in costs.iter().enumerate() {
                println!("{}{}\t{cost}", letters[i], letters[(i + 1) % letters.len()]);
            }
            println!("total\t{}", costs.iter().sum::<i32>());
        }
        Command::Check { tolerance } => {
            let checks = validate_all(t);
            let mut failed = 0;
            for check in &checks {
                match &check.outcome {
                    Ok(gap) if check.passed(tolerance) => println!("{}\tok\t{gap}", check.letter),
                    Ok(gap) => {
                        failed += 1;
                        let pm = letter_to_pm(t, &check.letter)?;
                        println!("{}\tMISMATCH\t{gap}\t{pm}", check.letter);
                    }
                    Err(err) => {
                        failed += 1;
                        println!("{}\tERROR\t{err}", check.letter);
                    }
                }
            }
            tracing::info!(letters = checks.len(), failed, tolerance, "cross-validated letter notations");
            if failed > 0 {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Render(args) => {
            let target = letter_to_arm(t, &args.letter)?.resolve(t)?;
            let base_pose = PoseDocument::from_path(&args.base_pose)?;
            Renderer::new(args.renderer, args.scene)
                .render_arm(&base_pose, &base_arm()?, &target, &args.pose_out, &args.image_out)?;
            println!("{}", args.image_out.display());
        }
    }
    Ok(ExitCode::SUCCESS)
}
