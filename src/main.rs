//! Partially instantiate a variable font.
//!
//! Instead of creating a full static instance, this creates a "partial"
//! variable font containing a subset of the variation space. For example,
//! to pin the width axis while keeping the rest of the axes:
//!
//! ```text
//! $ partial-instancer NotoSans-VF.ttf wdth=85
//! ```

use clap::{App, Arg, ArgMatches};
use partial_instancer::instancer::{instantiate_in_place, parse_limits};
use partial_instancer::{font, InstancerError};
use std::path::{Path, PathBuf};

fn parse_command_line() -> ArgMatches<'static> {
    App::new("partial-instancer")
        .about("Partially instantiate a variable font")
        .arg(
            Arg::with_name("INPUT")
                .help("Input variable TTF file")
                .required(true),
        )
        .arg(
            Arg::with_name("AXIS=LOC")
                .help(
                    "List of space separated locations. A location consists of \
                     the tag of a variation axis, followed by '=' and a number \
                     or number:number. E.g.: wdth=100 or wght=75.0:125.0",
                )
                .multiple(true)
                .required(false),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .takes_value(true)
                .help("Output instance TTF file (default: INPUT-instance.ttf)"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Run more verbosely"),
        )
        .arg(
            Arg::with_name("quiet")
                .short("q")
                .long("quiet")
                .conflicts_with("verbose")
                .help("Turn verbosity off"),
        )
        .get_matches()
}

fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "font".to_string());
    input.with_file_name(format!("{}-instance.ttf", stem))
}

fn run(matches: &ArgMatches) -> Result<(), InstancerError> {
    let input = PathBuf::from(matches.value_of("INPUT").unwrap());
    let output = matches
        .value_of("output")
        .map(PathBuf::from)
        .unwrap_or_else(|| default_output_path(&input));
    let locargs: Vec<&str> = matches
        .values_of("AXIS=LOC")
        .map(|values| values.collect())
        .unwrap_or_default();

    let axis_limits = parse_limits(&locargs)?;
    log::info!("Restricting axes: {:?}", axis_limits);

    log::info!("Loading variable font");
    let mut varfont = font::load(&input)?;

    instantiate_in_place(&mut varfont, &axis_limits)?;

    log::info!("Saving partial variable font {}", output.display());
    varfont.save(&output)
}

fn main() {
    let matches = parse_command_line();
    let level = if matches.is_present("verbose") {
        "debug"
    } else if matches.is_present("quiet") {
        "error"
    } else {
        "info"
    };
    env_logger::init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, level),
    );

    if let Err(error) = run(&matches) {
        log::error!("{}", error);
        std::process::exit(1);
    }
}
