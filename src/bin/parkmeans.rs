use log::{error, info, LevelFilter};
use parkmeans::data_format::{load_dataset, Dataset, DenseDataset, ResultFiles};
use parkmeans::distance_measures::ActiveDimensions;
use parkmeans::kmeans::{KMeans, KMeansConfig};
use parkmeans::utils::{gaussian_blobs, max_threads, validate_thread_count};
use parkmeans::{KMeansError, Result, RunConfig};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use std::time::Instant;

const SYNTHETIC_SEED: u64 = 42;
const SYNTHETIC_DIMS: usize = 2;
const SYNTHETIC_SPREAD: f32 = 1.0;

#[derive(Debug)]
struct Args {
    config: Option<PathBuf>,
    input: Option<PathBuf>,
    labels_out: Option<PathBuf>,
    centers_out: Option<PathBuf>,
    delimiter: Option<char>,
    clusters: Option<usize>,
    iterations: Option<usize>,
    threads: Option<usize>,
    seed: Option<u64>,
    active_dims: Option<ActiveDimensions>,
    synthetic: Option<usize>,
    report_json: bool,
    log_level: LevelFilter,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            config: None,
            input: None,
            labels_out: None,
            centers_out: None,
            delimiter: None,
            clusters: None,
            iterations: None,
            threads: None,
            seed: None,
            active_dims: None,
            synthetic: None,
            report_json: false,
            log_level: LevelFilter::Info,
        }
    }
}

#[derive(Debug, Serialize)]
struct RunReport {
    source: String,
    samples: usize,
    features: usize,
    active_dimensions: usize,
    clusters: usize,
    threads: usize,
    iterations: usize,
    inertia: f64,
    cluster_sizes: Vec<usize>,
    read_seconds: f64,
    kmeans_seconds: f64,
    write_labels_seconds: f64,
    write_centers_seconds: f64,
    total_seconds: f64,
}

fn main() -> ExitCode {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(Some(args)) => args,
        Ok(None) => {
            print_help();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Run with --help for usage.");
            return ExitCode::from(e.code().exit_code());
        }
    };

    env_logger::Builder::new()
        .filter_level(args.log_level)
        .format_target(false)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::from(e.code().exit_code())
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let total_start = Instant::now();
    let config = resolve_config(args)?;
    config.validate()?;

    let mut kmeans_config = config.kmeans.clone();
    let threads = match kmeans_config.num_threads {
        Some(n) => validate_thread_count(n, max_threads())?,
        None => {
            let stdin = io::stdin();
            read_thread_count(stdin.lock(), io::stdout().lock(), max_threads())?
        }
    };
    kmeans_config.num_threads = Some(threads);

    let read_start = Instant::now();
    let (dataset, source) = match args.synthetic {
        Some(n) => (
            synthetic_dataset(n, &kmeans_config)?,
            format!("synthetic_n{}_k{}", n, kmeans_config.num_clusters),
        ),
        None => (
            load_dataset::<f64>(&config.input, config.delimiter)?,
            config.input.display().to_string(),
        ),
    };
    let read_seconds = read_start.elapsed().as_secs_f64();
    info!("Time taken for reading data: {:.6} seconds", read_seconds);
    info!(
        "Loaded {} samples with {} features from {}",
        dataset.size(),
        dataset.dimensionality(),
        source
    );

    let kmeans_start = Instant::now();
    let result = KMeans::new(kmeans_config.clone()).fit(&dataset)?;
    let kmeans_seconds = kmeans_start.elapsed().as_secs_f64();
    info!("Time taken for kMeans: {:.6} seconds", kmeans_seconds);

    let mut outputs = ResultFiles::create(&config.labels_output, &config.centers_output)?;

    let write_start = Instant::now();
    if let Err(e) = outputs.write_labels(&result.labels) {
        outputs.discard();
        return Err(e);
    }
    let write_labels_seconds = write_start.elapsed().as_secs_f64();
    info!(
        "Time taken for writing assignments: {:.6} seconds",
        write_labels_seconds
    );

    let write_start = Instant::now();
    if let Err(e) = outputs.write_centroids(
        &result.centroids,
        result.active_dimensions,
        config.delimiter,
    ) {
        outputs.discard();
        return Err(e);
    }
    let write_centers_seconds = write_start.elapsed().as_secs_f64();
    info!(
        "Time taken for writing centers: {:.6} seconds",
        write_centers_seconds
    );

    let total_seconds = total_start.elapsed().as_secs_f64();
    info!("Total execution time: {:.6} seconds", total_seconds);

    if args.report_json {
        let report = RunReport {
            source,
            samples: dataset.size(),
            features: dataset.dimensionality(),
            active_dimensions: result.active_dimensions,
            clusters: kmeans_config.num_clusters,
            threads,
            iterations: result.num_iterations,
            inertia: result.inertia,
            cluster_sizes: result.cluster_sizes,
            read_seconds,
            kmeans_seconds,
            write_labels_seconds,
            write_centers_seconds,
            total_seconds,
        };
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| KMeansError::internal(format!("cannot serialize report: {e}")))?;
        println!("{json}");
    }

    Ok(())
}

/// Start from the config file (or defaults) and apply command-line overrides.
fn resolve_config(args: &Args) -> Result<RunConfig> {
    let mut config = match &args.config {
        Some(path) => RunConfig::from_json_file(path)?,
        None => RunConfig::default(),
    };

    if let Some(path) = &args.input {
        config.input = path.clone();
    }
    if let Some(path) = &args.labels_out {
        config.labels_output = path.clone();
    }
    if let Some(path) = &args.centers_out {
        config.centers_output = path.clone();
    }
    if let Some(delimiter) = args.delimiter {
        config.delimiter = delimiter;
    }
    if let Some(k) = args.clusters {
        config.kmeans.num_clusters = k;
    }
    if let Some(iterations) = args.iterations {
        config.kmeans.max_iterations = iterations;
    }
    if let Some(threads) = args.threads {
        config.kmeans.num_threads = Some(threads);
    }
    if let Some(seed) = args.seed {
        config.kmeans.seed = Some(seed);
    }
    if let Some(dims) = args.active_dims {
        config.kmeans.active_dimensions = dims;
    }
    Ok(config)
}

fn synthetic_dataset(n: usize, config: &KMeansConfig) -> Result<DenseDataset<f64>> {
    let blobs = gaussian_blobs(
        n,
        SYNTHETIC_DIMS,
        config.num_clusters,
        SYNTHETIC_SPREAD,
        config.seed.unwrap_or(SYNTHETIC_SEED),
    )?;
    DenseDataset::from_flat(
        blobs.raw_data().iter().map(|&v| f64::from(v)).collect(),
        SYNTHETIC_DIMS,
    )
}

/// Ask for the worker count on `input`, echoing the prompt to `output`.
fn read_thread_count<R: BufRead, W: Write>(mut input: R, mut output: W, max: usize) -> Result<usize> {
    let stdout_err = |e: io::Error| KMeansError::io("stdout", e);
    writeln!(output, "Maximum number of threads available: {max}").map_err(stdout_err)?;
    write!(output, "Enter the number of threads to use (1 to {max}): ").map_err(stdout_err)?;
    output.flush().map_err(stdout_err)?;

    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .map_err(|e| KMeansError::io("stdin", e))?;
    if read == 0 {
        return Err(KMeansError::invalid_argument("no thread count given on stdin"));
    }
    let answer = line.trim();
    let n = answer.parse::<usize>().map_err(|_| {
        KMeansError::invalid_argument(format!("invalid thread count '{answer}'"))
    })?;
    validate_thread_count(n, max)
}

/// Parse command-line flags. Returns `None` when help was requested.
fn parse_args<I>(argv: I) -> Result<Option<Args>>
where
    I: IntoIterator<Item = String>,
{
    let mut args = Args::default();
    let mut it = argv.into_iter();

    while let Some(flag) = it.next() {
        match flag.as_str() {
            "--config" => {
                args.config = Some(PathBuf::from(required_value(&flag, it.next())?));
            }
            "--input" => {
                args.input = Some(PathBuf::from(required_value(&flag, it.next())?));
            }
            "--labels-out" => {
                args.labels_out = Some(PathBuf::from(required_value(&flag, it.next())?));
            }
            "--centers-out" => {
                args.centers_out = Some(PathBuf::from(required_value(&flag, it.next())?));
            }
            "--delimiter" => {
                let v = required_value(&flag, it.next())?;
                args.delimiter = Some(parse_delimiter(&v)?);
            }
            "--clusters" | "-k" => {
                args.clusters = Some(parse_number(&flag, it.next())?);
            }
            "--iterations" => {
                args.iterations = Some(parse_number(&flag, it.next())?);
            }
            "--threads" => {
                args.threads = Some(parse_number(&flag, it.next())?);
            }
            "--seed" => {
                args.seed = Some(parse_number(&flag, it.next())?);
            }
            "--active-dims" => {
                let v = required_value(&flag, it.next())?;
                args.active_dims = Some(ActiveDimensions::from_str(&v)?);
            }
            "--synthetic" => {
                args.synthetic = Some(parse_number(&flag, it.next())?);
            }
            "--report-json" => args.report_json = true,
            "--verbose" | "-v" => {
                args.log_level = match args.log_level {
                    LevelFilter::Info => LevelFilter::Debug,
                    _ => LevelFilter::Trace,
                };
            }
            "--quiet" | "-q" => args.log_level = LevelFilter::Error,
            "--help" | "-h" => return Ok(None),
            _ => {
                return Err(KMeansError::invalid_argument(format!(
                    "unknown argument: {flag}"
                )));
            }
        }
    }

    Ok(Some(args))
}

fn required_value(flag: &str, value: Option<String>) -> Result<String> {
    value.ok_or_else(|| KMeansError::invalid_argument(format!("missing value for {flag}")))
}

fn parse_number<N: FromStr>(flag: &str, value: Option<String>) -> Result<N> {
    let v = required_value(flag, value)?;
    v.parse()
        .map_err(|_| KMeansError::invalid_argument(format!("invalid value for {flag}: '{v}'")))
}

fn parse_delimiter(value: &str) -> Result<char> {
    match value {
        "\\t" | "tab" => Ok('\t'),
        _ => {
            let mut chars = value.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(c),
                _ => Err(KMeansError::invalid_argument(format!(
                    "delimiter must be a single character, got '{value}'"
                ))),
            }
        }
    }
}

fn print_help() {
    println!(
        "parkmeans\n\
        Parallel Lloyd's k-means over a delimited sample file.\n\n\
        Usage:\n\
          cargo run --release --bin parkmeans -- [options]\n\n\
        Options:\n\
          --config <path>         JSON run configuration\n\
          --input <path>          sample file (default: data.csv)\n\
          --labels-out <path>     label output (default: cluster_assignments.csv)\n\
          --centers-out <path>    centroid output (default: cluster_centers.csv)\n\
          --delimiter <char>      field separator, 'tab' for tabs (default: ,)\n\
          --clusters, -k <int>    number of clusters (default: 10)\n\
          --iterations <int>      number of rounds (default: 100)\n\
          --threads <int>         worker threads; prompts on stdin if omitted\n\
          --seed <int>            seed for centroid initialization\n\
          --active-dims <all|n>   leading features used for distances (default: 2)\n\
          --synthetic <int>       cluster generated Gaussian blobs instead of --input\n\
          --report-json           print a JSON run report on stdout\n\
          --verbose, -v           more logging (repeat for trace)\n\
          --quiet, -q             errors only\n\
          --help                  print this help\n"
    );
}
