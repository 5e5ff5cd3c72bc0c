use clap::{Args, Parser, Subcommand};
use colored::*;
use core::error::Error;
use memmap2::Mmap;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

use jumplink_lib::config as jumplink_config;
use jumplink_lib::exit_codes::exit;
use jumplink_lib::extract::TextWindow;
use jumplink_lib::lightspeed::CaptureStep;
use jumplink_lib::session::{Activation, Dispatch, JumpRequest, JumpSettings, Jumper};
use jumplink_lib::types::{CursorState, Hint, HintTarget, RenderedLink};
use jumplink_lib::{NavigationAction, parse_key_sequence, visible_lines};

use jumplink_config::ConfigSource;

/// Threshold for using memory-mapped I/O (1MB)
const MMAP_THRESHOLD: u64 = 1024 * 1024;

/// Efficiently read file content using memory mapping for large files
pub fn read_file_efficiently(path: &Path) -> Result<String, Box<dyn Error>> {
    let metadata = fs::metadata(path)?;
    let file_size = metadata.len();

    if file_size > MMAP_THRESHOLD {
        let file = fs::File::open(path)?;
        // SAFETY: the map is only read and is dropped before this function returns
        let mmap = unsafe { Mmap::map(&file)? };
        String::from_utf8(mmap.to_vec()).map_err(|e| format!("Invalid UTF-8 in file {}: {}", path.display(), e).into())
    } else {
        fs::read_to_string(path).map_err(|e| format!("Failed to read file {}: {}", path.display(), e).into())
    }
}

/// Read a file, or stdin when the path is "-"
fn read_input(path: &str) -> Result<String, Box<dyn Error>> {
    if path == "-" {
        let mut content = String::new();
        io::stdin().read_to_string(&mut content)?;
        Ok(content)
    } else {
        read_file_efficiently(Path::new(path))
    }
}

/// Load configuration with standard CLI error handling
fn load_config_with_cli_error_handling(config_path: Option<&str>, no_config: bool) -> jumplink_config::SourcedConfig {
    let sourced = match jumplink_config::SourcedConfig::load_with_discovery(config_path, no_config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {}", "Config error".red().bold(), e);
            exit::tool_error();
        }
    };
    if let Err(e) = sourced.config.validate() {
        eprintln!("{}: {}", "Config error".red().bold(), e);
        exit::tool_error();
    }
    sourced
}

#[derive(Parser)]
#[command(author, version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Control colored output: auto, always, never
    #[arg(long, global = true, default_value = "auto", value_parser = ["auto", "always", "never"], help = "Control colored output: auto, always, never")]
    color: String,

    /// Path to configuration file
    #[arg(long, global = true, help = "Path to configuration file")]
    config: Option<String>,

    /// Ignore all configuration files and use built-in defaults
    #[arg(
        long,
        global = true,
        help = "Ignore all configuration files and use built-in defaults"
    )]
    no_config: bool,

    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the labelled hints of one activation
    Hints(ScanArgs),
    /// Run an activation, type the given keys and print the resulting action
    Jump(JumpArgs),
    /// Create a default .jumplink.toml in the current directory
    Init,
    /// Show the effective configuration
    Config {
        /// Show only the default configuration values
        #[arg(long)]
        defaults: bool,
    },
    /// Print the JSON schema of the configuration file
    Schema,
}

#[derive(Args, Debug)]
struct ScanArgs {
    /// File to scan (use '-' for stdin). In preview mode, a JSON array of rendered links.
    file: String,

    /// What to hint
    #[arg(long, default_value = "link", value_parser = ["link", "anywhere", "lightspeed", "regex", "preview", "live-preview"])]
    mode: String,

    /// Pattern for regex mode; overrides the configured pattern in anywhere mode
    #[arg(long)]
    pattern: Option<String>,

    /// The two characters typed in lightspeed mode
    #[arg(long)]
    chars: Option<String>,

    /// Match regex mode patterns case-sensitively
    #[arg(long)]
    case_sensitive: bool,

    /// Only scan these lines, 1-based and inclusive (e.g. 10:40)
    #[arg(long, value_parser = parse_line_range)]
    lines: Option<(usize, usize)>,

    /// JSON array of rendered links, for live-preview mode
    #[arg(long)]
    rendered: Option<String>,

    /// Output format: text or json
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    output: String,
}

#[derive(Args, Debug)]
struct JumpArgs {
    #[command(flatten)]
    scan: ScanArgs,

    /// Keys to type once the hints are shown; uppercase means shift, <Esc> cancels
    #[arg(long)]
    keys: String,

    /// Treat the selection as made with shift held
    #[arg(long)]
    shift: bool,

    /// Selection anchor before the jump, for extending selections
    #[arg(long)]
    anchor: Option<usize>,

    /// Editor vim mode (e.g. normal, visual)
    #[arg(long)]
    vim_mode: Option<String>,
}

fn parse_line_range(value: &str) -> Result<(usize, usize), String> {
    let (first, last) = value
        .split_once(':')
        .ok_or_else(|| format!("expected FIRST:LAST, got '{value}'"))?;
    let first: usize = first.trim().parse().map_err(|e| format!("invalid first line: {e}"))?;
    let last: usize = last.trim().parse().map_err(|e| format!("invalid last line: {e}"))?;
    if first == 0 || last < first {
        return Err(format!("line range must satisfy 1 <= FIRST <= LAST, got '{value}'"));
    }
    Ok((first, last))
}

fn parse_rendered(json: &str) -> Result<Vec<RenderedLink>, Box<dyn Error>> {
    serde_json::from_str(json).map_err(|e| format!("Invalid rendered links: {e}").into())
}

/// Everything an activation borrows from
struct ScanInput {
    content: String,
    rendered: Vec<RenderedLink>,
}

impl ScanInput {
    fn load(args: &ScanArgs) -> Result<Self, Box<dyn Error>> {
        let content = read_input(&args.file)?;
        let rendered = match args.rendered.as_deref() {
            Some(path) => parse_rendered(&read_input(path)?)?,
            None => Vec::new(),
        };
        Ok(Self { content, rendered })
    }

    fn window(&self, args: &ScanArgs, settings: &JumpSettings) -> TextWindow<'_> {
        match args.lines {
            Some((first, last)) => visible_lines(&self.content, first - 1, last - 1, settings.encoding),
            None => TextWindow::document(&self.content).with_encoding(settings.encoding),
        }
    }

    fn request(&self, args: &ScanArgs, jumper: &Jumper) -> Result<JumpRequest<'_>, Box<dyn Error>> {
        let window = self.window(args, jumper.settings());
        let request = match args.mode.as_str() {
            "link" => JumpRequest::Links(window),
            "anywhere" => match &args.pattern {
                Some(pattern) => JumpRequest::Regex {
                    window,
                    pattern: pattern.clone(),
                    case_sensitive: true,
                },
                None => JumpRequest::Anywhere(window),
            },
            "lightspeed" => {
                let chars = args.chars.as_deref().ok_or("lightspeed mode needs --chars")?;
                JumpRequest::Lightspeed {
                    window,
                    pattern: capture_lightspeed(jumper, chars)?,
                }
            }
            "regex" => JumpRequest::Regex {
                window,
                pattern: args.pattern.clone().ok_or("regex mode needs --pattern")?,
                case_sensitive: args.case_sensitive,
            },
            "preview" => JumpRequest::Preview(parse_rendered(&self.content)?),
            "live-preview" => JumpRequest::LivePreview {
                rendered: self.rendered.clone(),
                window,
            },
            other => return Err(format!("Unknown mode '{other}'").into()),
        };
        Ok(request)
    }
}

/// Run the typed characters through the two-keystroke capture
fn capture_lightspeed(jumper: &Jumper, chars: &str) -> Result<String, Box<dyn Error>> {
    let mut capture = jumper.lightspeed_capture();
    capture.start();
    for press in parse_key_sequence(chars) {
        match capture.feed(press) {
            CaptureStep::Complete(pattern) => return Ok(pattern),
            CaptureStep::Cancelled => exit::no_selection(),
            CaptureStep::Pending | CaptureStep::Ignored => {}
        }
    }
    Err(format!("lightspeed mode needs exactly two characters, got '{chars}'").into())
}

fn print_hints(hints: &[Hint], output: &str) -> Result<(), Box<dyn Error>> {
    if output == "json" {
        println!("{}", serde_json::to_string_pretty(hints)?);
        return Ok(());
    }
    for hint in hints {
        let location = match &hint.target {
            HintTarget::Source(candidate) => candidate.position.to_string(),
            HintTarget::Rendered(link) => format!("{},{}", link.top, link.left),
        };
        println!(
            "{} {}  {:<8}  {}",
            format!("{:<3}", hint.label).yellow().bold(),
            format!("{location:>8}").cyan(),
            hint.target.kind().to_string(),
            hint.target.payload()
        );
    }
    Ok(())
}

fn print_action(action: &NavigationAction, output: &str) -> Result<(), Box<dyn Error>> {
    if output == "json" {
        println!("{}", serde_json::to_string_pretty(action)?);
        return Ok(());
    }
    match action {
        NavigationAction::OpenInternal { target, new_pane } => {
            let pane = if *new_pane { " (new pane)" } else { "" };
            println!("{} {target}{pane}", "open".green().bold());
        }
        NavigationAction::OpenExternal { url } => println!("{} {url}", "open-url".green().bold()),
        NavigationAction::MoveCursor { position } => println!("{} {position}", "move".green().bold()),
        NavigationAction::Select { anchor, head } => println!("{} {anchor}..{head}", "select".green().bold()),
    }
    Ok(())
}

fn activate(jumper: &mut Jumper, args: &ScanArgs, cursor: CursorState) -> Result<Activation, Box<dyn Error>> {
    let input = ScanInput::load(args)?;
    let request = input.request(args, jumper)?;
    Ok(jumper.activate(request, cursor))
}

fn run_hints(args: &ScanArgs, settings: JumpSettings) -> Result<(), Box<dyn Error>> {
    // Listing never auto-jumps; every target is shown
    let mut jumper = Jumper::new(JumpSettings {
        jump_if_single_target: false,
        ..settings
    });
    match activate(&mut jumper, args, CursorState::default())? {
        Activation::Opened(hints) => print_hints(&hints, &args.output),
        Activation::NoTargets => {
            eprintln!("No targets found");
            exit::no_selection();
        }
        Activation::Aborted(e) => Err(e.into()),
        Activation::Busy | Activation::Jumped(_) => Ok(()),
    }
}

fn run_jump(args: &JumpArgs, settings: JumpSettings) -> Result<(), Box<dyn Error>> {
    let mut jumper = Jumper::new(settings);
    let cursor = CursorState {
        anchor: args.anchor,
        vim_mode: args.vim_mode.clone(),
    };

    match activate(&mut jumper, &args.scan, cursor)? {
        Activation::Jumped(action) => return print_action(&action, &args.scan.output),
        Activation::Opened(hints) => log::debug!("[jumplink] {} hints open", hints.len()),
        Activation::NoTargets => {
            eprintln!("No targets found");
            exit::no_selection();
        }
        Activation::Aborted(e) => return Err(e.into()),
        Activation::Busy => exit::tool_error(),
    }

    for mut press in parse_key_sequence(&args.keys) {
        press.shift |= args.shift;
        match jumper.press(press) {
            Dispatch::Navigate(action) => return print_action(&action, &args.scan.output),
            Dispatch::Cancelled | Dispatch::NoSession => {
                eprintln!("Cancelled");
                exit::no_selection();
            }
            Dispatch::Pending => {}
        }
    }

    eprintln!("No hint selected");
    jumper.cancel();
    exit::no_selection();
}

fn handle_config_command(cli: &Cli, defaults: bool) -> Result<(), Box<dyn Error>> {
    if defaults {
        print!("{}", jumplink_config::Config::default().to_toml_string()?);
        return Ok(());
    }

    let sourced = load_config_with_cli_error_handling(cli.config.as_deref(), cli.no_config);
    if sourced.loaded_files.is_empty() {
        println!("{}", "# Using built-in defaults".dimmed());
    }
    for (source, path) in &sourced.loaded_files {
        let label = match source {
            ConfigSource::UserConfig => "user",
            ConfigSource::ProjectConfig => "project",
            ConfigSource::Default => "default",
        };
        println!("{}", format!("# Loaded {label} config: {}", path.display()).dimmed());
    }
    print!("{}", sourced.config.to_toml_string()?);
    Ok(())
}

fn handle_schema_command() -> Result<(), Box<dyn Error>> {
    let schema = schemars::schema_for!(jumplink_config::Config);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match cli.color.as_str() {
        "always" => colored::control::set_override(true),
        "never" => colored::control::set_override(false),
        _ => colored::control::unset_override(),
    }

    let result = match &cli.command {
        Commands::Init => match jumplink_config::create_default_config(".jumplink.toml") {
            Ok(()) => {
                println!("Created default configuration file: .jumplink.toml");
                Ok(())
            }
            Err(e) => {
                eprintln!("{}: Failed to create config file: {}", "Error".red().bold(), e);
                exit::tool_error();
            }
        },
        Commands::Config { defaults } => handle_config_command(&cli, *defaults),
        Commands::Schema => handle_schema_command(),
        Commands::Hints(args) => {
            let sourced = load_config_with_cli_error_handling(cli.config.as_deref(), cli.no_config);
            run_hints(args, JumpSettings::from(&sourced.config))
        }
        Commands::Jump(args) => {
            let sourced = load_config_with_cli_error_handling(cli.config.as_deref(), cli.no_config);
            run_jump(args, JumpSettings::from(&sourced.config))
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        exit::tool_error();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line_range() {
        assert_eq!(parse_line_range("3:7"), Ok((3, 7)));
        assert_eq!(parse_line_range(" 1 : 1 "), Ok((1, 1)));
        assert!(parse_line_range("0:4").is_err());
        assert!(parse_line_range("5:4").is_err());
        assert!(parse_line_range("5").is_err());
    }

    #[test]
    fn test_parse_rendered() {
        let links = parse_rendered(r#"[{"top": 10, "left": 4, "kind": "external", "payload": "https://x.io"}]"#).unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].top, 10);
        assert!(parse_rendered("{}").is_err());
    }

    #[test]
    fn test_read_file_efficiently() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.md");
        fs::write(&path, "[[A]]").unwrap();
        assert_eq!(read_file_efficiently(&path).unwrap(), "[[A]]");
        assert!(read_file_efficiently(&dir.path().join("missing.md")).is_err());
    }
}
