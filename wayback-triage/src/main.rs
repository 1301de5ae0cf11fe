//! Wayback Triage CLI Application
//!
//! A command-line interface for triaging domain sets: archived-URL counts
//! from the Wayback Machine, live HTTP status codes, and tallies of
//! security-interesting URL patterns. This CLI is a thin presentation layer
//! over the wayback-triage-lib engine.

mod ui;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::Parser;
use futures::StreamExt;
use std::path::Path;
use std::process;
use std::time::Instant;

use wayback_triage_lib::{
    load_env_config, parse_timeout_string, prepare_domains, ConfigManager, ReportCollector,
    TriageConfig, TriageError, TriageRunner,
};

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// CLI arguments for wayback-triage
#[derive(Parser, Debug)]
#[command(name = "wayback-triage")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Triage domains: Wayback URL counts, HTTP status codes, interesting-URL tallies")]
#[command(
    long_about = "Triage a domain set for reconnaissance: count archived URLs in the Wayback Machine, probe current HTTP status, and tally URLs matching security-interesting patterns.\n\nInput is a file of domains (one per line), a single domain, or a comma-separated list."
)]
#[command(styles = STYLES)]
pub struct Args {
    /// Input: a file with domains (one per line), a single domain, or a
    /// comma-separated domain list
    #[arg(value_name = "INPUT")]
    pub input: String,

    /// Verbose output (-v: archived URLs and probe detail, -vv: per-category
    /// matches and timing)
    #[arg(short = 'v', action = clap::ArgAction::Count, help_heading = "Output")]
    pub verbose: u8,

    /// Write the final report to a file in addition to stdout
    #[arg(short = 'o', long = "output", value_name = "FILE", help_heading = "Output")]
    pub output: Option<String>,

    /// Output the collected report as JSON instead of text
    #[arg(short = 'j', long = "json", help_heading = "Output")]
    pub json: bool,

    /// Proxy URL for HTTP status probes
    #[arg(long = "proxy", value_name = "URL", help_heading = "Probe")]
    pub proxy: Option<String>,

    /// Scheme used for probes: http or https (default: http)
    #[arg(long = "scheme", value_name = "SCHEME", help_heading = "Probe")]
    pub scheme: Option<String>,

    /// Follow HTTP redirects instead of reporting the first status code
    #[arg(short = 'l', long = "follow-redirects", help_heading = "Probe")]
    pub follow_redirects: bool,

    /// Per-probe timeout, e.g. "10s" (default: 10s)
    #[arg(long = "timeout", value_name = "DURATION", help_heading = "Performance")]
    pub timeout: Option<String>,

    /// Per-lookup timeout for the archive index, e.g. "30s" (default: 30s)
    #[arg(
        long = "lookup-timeout",
        value_name = "DURATION",
        help_heading = "Performance"
    )]
    pub lookup_timeout: Option<String>,

    /// Max concurrent per-domain pipelines (default: 10, max: 100)
    #[arg(
        short = 'c',
        long = "concurrency",
        value_name = "N",
        help_heading = "Performance"
    )]
    pub concurrency: Option<usize>,

    /// Exclude subdomains from archive lookups
    #[arg(long = "no-subs", help_heading = "Lookup")]
    pub no_subs: bool,

    /// Disable the waybackurls subprocess fallback
    #[arg(long = "no-waybackurls", help_heading = "Lookup")]
    pub no_waybackurls: bool,

    /// Use a specific config file instead of automatic discovery
    #[arg(long = "config", value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Validate arguments
    if let Err(e) = validate_args(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    // Run the triage. Per-domain failures are recorded results, not process
    // failures; a non-zero exit only signals an unrecoverable startup error.
    if let Err(e) = run_triage(args).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Validate command line arguments
fn validate_args(args: &Args) -> Result<(), String> {
    if let Some(concurrency) = args.concurrency {
        if concurrency == 0 || concurrency > 100 {
            return Err("Concurrency must be between 1 and 100".to_string());
        }
    }

    if args.json && args.verbose > 0 {
        return Err("Cannot combine --json with -v/-vv; JSON output is complete as-is".to_string());
    }

    for (label, value) in [("--timeout", &args.timeout), ("--lookup-timeout", &args.lookup_timeout)]
    {
        if let Some(timeout_str) = value {
            if parse_timeout_string(timeout_str).is_none() {
                return Err(format!(
                    "Invalid {} '{}'. Use format like '5s', '30s', '2m'",
                    label, timeout_str
                ));
            }
        }
    }

    Ok(())
}

/// Main triage logic
async fn run_triage(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    // Build configuration from config files, environment, and CLI args
    let config = build_config(&args)?;

    // Resolve the positional input into raw domain tokens (fatal on a
    // missing input file), then into the deduplicated scheduling set
    let raw_inputs = resolve_input(&args.input)?;
    let domains = prepare_domains(&raw_inputs);

    let runner = TriageRunner::with_config(config.clone())?;

    if args.verbose >= 1 {
        println!(
            "Triaging {} domain{} with concurrency {}",
            domains.len(),
            if domains.len() == 1 { "" } else { "s" },
            config.concurrency
        );
    }

    let start_time = Instant::now();

    let report = if args.json {
        // Collected mode: the report is printed once, complete
        let report = runner.run(&domains).await?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        report
    } else {
        // Streaming mode: print each domain as its pipeline completes
        let collector = ReportCollector::new();

        {
            let mut stream = runner.triage_stream(&domains);
            while let Some(entry) = stream.next().await {
                ui::print_result(&entry, args.verbose);
                collector.record(entry)?;
            }
        }

        let report = collector.into_report();

        if report.len() > 1 {
            println!();
            ui::print_summary(&report, start_time.elapsed());
        }

        report
    };

    // Write the report file, matching the stdout format
    if let Some(path) = &args.output {
        let contents = if args.json {
            serde_json::to_string_pretty(&report)?
        } else {
            ui::format_plain_report(&report)
        };
        std::fs::write(path, contents)
            .map_err(|e| TriageError::file_error(path, format!("Failed to write report: {}", e)))?;

        if args.verbose >= 1 {
            println!("Report written to {}", path);
        }
    }

    Ok(())
}

/// Build TriageConfig with proper precedence.
///
/// Precedence order (highest to lowest):
/// 1. CLI arguments (explicit user input)
/// 2. Environment variables (WT_*)
/// 3. Local config file (./wayback-triage.toml, ./.wayback-triage.toml)
/// 4. Home config file (~/.wayback-triage.toml)
/// 5. XDG config file (~/.config/wayback-triage/config.toml)
/// 6. Built-in defaults
fn build_config(args: &Args) -> Result<TriageConfig, Box<dyn std::error::Error>> {
    let mut config = TriageConfig::default();
    let verbose = args.verbose >= 1;

    let config_manager = ConfigManager::new(verbose);

    // Step 1: Determine config file path and load config files
    if let Some(explicit_config_path) = &args.config {
        let file_config = config_manager.load_file(explicit_config_path).map_err(|e| {
            format!(
                "Failed to load config file '{}': {}",
                explicit_config_path, e
            )
        })?;
        config = merge_file_config(config, file_config);
    } else if let Ok(env_config_path) = std::env::var("WT_CONFIG") {
        let file_config = config_manager
            .load_file(&env_config_path)
            .map_err(|e| format!("Failed to load config file '{}': {}", env_config_path, e))?;
        config = merge_file_config(config, file_config);
    } else if let Ok(file_config) = config_manager.discover_and_load() {
        config = merge_file_config(config, file_config);
    }

    // Step 2: Apply environment variables (WT_*)
    config = apply_environment_config(config, verbose);

    // Step 3: Apply CLI arguments (highest precedence)
    config = apply_cli_args_to_config(config, args)?;

    Ok(config)
}

/// Merge a validated FileConfig into TriageConfig.
fn merge_file_config(
    mut config: TriageConfig,
    file_config: wayback_triage_lib::FileConfig,
) -> TriageConfig {
    if let Some(defaults) = file_config.defaults {
        if let Some(concurrency) = defaults.concurrency {
            config.concurrency = concurrency;
        }
        // Timeout and scheme strings were validated at load time
        if let Some(secs) = defaults.timeout.as_deref().and_then(parse_timeout_string) {
            config.probe_timeout = std::time::Duration::from_secs(secs);
        }
        if let Some(secs) = defaults
            .lookup_timeout
            .as_deref()
            .and_then(parse_timeout_string)
        {
            config.lookup_timeout = std::time::Duration::from_secs(secs);
        }
        if let Some(proxy) = defaults.proxy {
            config.proxy = Some(proxy);
        }
        if let Some(scheme) = defaults.scheme.as_deref().and_then(|s| s.parse().ok()) {
            config.probe_scheme = scheme;
        }
        if let Some(follow) = defaults.follow_redirects {
            config.follow_redirects = follow;
        }
    }

    if let Some(patterns) = file_config.patterns {
        config.patterns = patterns;
    }

    config
}

/// Apply WT_* environment variables to the config.
fn apply_environment_config(mut config: TriageConfig, verbose: bool) -> TriageConfig {
    let env_config = load_env_config(verbose);

    if let Some(concurrency) = env_config.concurrency {
        config.concurrency = concurrency;
    }
    if let Some(secs) = env_config.timeout.as_deref().and_then(parse_timeout_string) {
        config.probe_timeout = std::time::Duration::from_secs(secs);
    }
    if let Some(secs) = env_config
        .lookup_timeout
        .as_deref()
        .and_then(parse_timeout_string)
    {
        config.lookup_timeout = std::time::Duration::from_secs(secs);
    }
    if let Some(proxy) = env_config.proxy {
        config.proxy = Some(proxy);
    }
    if let Some(scheme) = env_config.scheme.as_deref().and_then(|s| s.parse().ok()) {
        config.probe_scheme = scheme;
    }
    if let Some(follow) = env_config.follow_redirects {
        config.follow_redirects = follow;
    }

    config
}

/// Apply CLI arguments to config (highest precedence).
fn apply_cli_args_to_config(
    mut config: TriageConfig,
    args: &Args,
) -> Result<TriageConfig, Box<dyn std::error::Error>> {
    if let Some(concurrency) = args.concurrency {
        config.concurrency = concurrency;
    }
    if let Some(secs) = args.timeout.as_deref().and_then(parse_timeout_string) {
        config.probe_timeout = std::time::Duration::from_secs(secs);
    }
    if let Some(secs) = args
        .lookup_timeout
        .as_deref()
        .and_then(parse_timeout_string)
    {
        config.lookup_timeout = std::time::Duration::from_secs(secs);
    }
    if let Some(proxy) = &args.proxy {
        config.proxy = Some(proxy.clone());
    }
    if let Some(scheme) = &args.scheme {
        config.probe_scheme = scheme.parse()?;
    }

    // Boolean flags only switch away from the default when passed, so
    // config-file and env values survive otherwise
    if args.follow_redirects {
        config.follow_redirects = true;
    }
    if args.no_subs {
        config.include_subdomains = false;
    }
    if args.no_waybackurls {
        config.enable_cli_fallback = false;
    }

    Ok(config)
}

/// Resolve the positional input into raw domain tokens.
///
/// Dispatch order: a comma anywhere means an inline list; an existing file
/// is read line by line; a path-looking input that doesn't exist is a fatal
/// input error; anything else is a single domain. URLs pasted as input are
/// recognized by their scheme and treated as single domains.
fn resolve_input(input: &str) -> Result<Vec<String>, TriageError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    if trimmed.contains(',') {
        return Ok(trimmed.split(',').map(str::to_string).collect());
    }

    let path = Path::new(trimmed);
    if path.is_file() {
        return read_domains_from_file(trimmed);
    }

    if !trimmed.contains("://") && trimmed.contains('/') {
        return Err(TriageError::file_error(trimmed, "Input file not found"));
    }

    Ok(vec![trimmed.to_string()])
}

/// Read raw domain tokens from a file, one per line.
///
/// Blank lines and `#` comments (whole-line or inline) are skipped.
/// An empty file is an empty domain set, not an error.
fn read_domains_from_file(file_path: &str) -> Result<Vec<String>, TriageError> {
    let content = std::fs::read_to_string(file_path)
        .map_err(|e| TriageError::file_error(file_path, format!("Failed to read file: {}", e)))?;

    let mut domains = Vec::new();

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        // Handle inline comments
        let domain_part = trimmed.split('#').next().unwrap_or("").trim();
        if !domain_part.is_empty() {
            domains.push(domain_part.to_string());
        }
    }

    Ok(domains)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayback_triage_lib::ProbeScheme;

    fn create_test_args() -> Args {
        Args {
            input: "example.com".to_string(),
            verbose: 0,
            output: None,
            json: false,
            proxy: None,
            scheme: None,
            follow_redirects: false,
            timeout: None,
            lookup_timeout: None,
            concurrency: None,
            no_subs: false,
            no_waybackurls: false,
            config: None,
        }
    }

    #[test]
    fn test_validate_args_concurrency_bounds() {
        let mut args = create_test_args();
        args.concurrency = Some(0);
        assert!(validate_args(&args).is_err());

        args.concurrency = Some(101);
        assert!(validate_args(&args).is_err());

        args.concurrency = Some(50);
        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_validate_args_json_verbose_conflict() {
        let mut args = create_test_args();
        args.json = true;
        args.verbose = 1;
        assert!(validate_args(&args).is_err());

        args.verbose = 0;
        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_validate_args_bad_timeout() {
        let mut args = create_test_args();
        args.timeout = Some("soon".to_string());
        assert!(validate_args(&args).is_err());

        args.timeout = Some("15s".to_string());
        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_resolve_input_comma_list() {
        let tokens = resolve_input("google.com, google.org").unwrap();
        assert_eq!(tokens, vec!["google.com", " google.org"]);
    }

    #[test]
    fn test_resolve_input_single_domain() {
        assert_eq!(
            resolve_input("example.com").unwrap(),
            vec!["example.com".to_string()]
        );
        // URLs are recognized as single domains, not missing files
        assert_eq!(
            resolve_input("https://example.com/admin/").unwrap(),
            vec!["https://example.com/admin/".to_string()]
        );
    }

    #[test]
    fn test_resolve_input_empty() {
        assert!(resolve_input("").unwrap().is_empty());
        assert!(resolve_input("   ").unwrap().is_empty());
    }

    #[test]
    fn test_resolve_input_missing_file_is_fatal() {
        let result = resolve_input("./does/not/exist.txt");
        assert!(matches!(result, Err(TriageError::FileError { .. })));
    }

    #[test]
    fn test_resolve_input_reads_file() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# targets").unwrap();
        writeln!(file, "a.example.com").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "b.example.com  # staging").unwrap();
        file.flush().unwrap();

        let tokens = resolve_input(file.path().to_str().unwrap()).unwrap();
        assert_eq!(tokens, vec!["a.example.com", "b.example.com"]);
    }

    #[test]
    fn test_cli_args_override_config() {
        let mut args = create_test_args();
        args.concurrency = Some(42);
        args.scheme = Some("https".to_string());
        args.timeout = Some("3s".to_string());
        args.no_subs = true;

        let config = apply_cli_args_to_config(TriageConfig::default(), &args).unwrap();
        assert_eq!(config.concurrency, 42);
        assert_eq!(config.probe_scheme, ProbeScheme::Https);
        assert_eq!(config.probe_timeout, std::time::Duration::from_secs(3));
        assert!(!config.include_subdomains);
    }

    #[test]
    fn test_flags_only_switch_when_passed() {
        // Simulates follow_redirects=true coming from a config file; the
        // absent CLI flag must not reset it
        let args = create_test_args();
        let config = TriageConfig::default().with_follow_redirects(true);

        let result = apply_cli_args_to_config(config, &args).unwrap();
        assert!(result.follow_redirects);
    }
}
