//! Main entry point for the Readable command-line reader

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use crossterm::{
    event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{info, warn};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    fs::OpenOptions,
    io::{self, BufReader, Read, Stdout, Write},
    panic,
    path::{Path, PathBuf},
    time::{Duration, Instant, SystemTime},
};

use readable::{
    capture::{CaptureSession, LineCaptureSource, ScanType},
    color_space::{format_bg_color, Rgb, ANSI_RESET},
    config::Config,
    documents::{DocumentStore, FileLibrary},
    input::handle_event,
    notes::NoteBook,
    palette::Palette,
    preferences::{
        self, keys, load_palettes, load_style, save_style, FilePreferenceStore, PrefValue,
        PreferenceStore,
    },
    render_engines::{ansi::render_ansi, html::html_page, StyleEngine},
    state::ReaderState,
    style::StyleConfig,
    terminal_capabilities::{detect_capabilities, ColorSupport},
    ui,
    unicode_handler::ellipsize,
    worker::RenderWorker,
};

/// Target frame time for 60 FPS
const FRAME_TIME_MS: u64 = 16;

const LIST_TITLE_WIDTH: usize = 60;

/// Restyle text for easier reading
#[derive(Parser, Debug)]
#[command(name = "readable", version)]
#[command(about = "Restyle text for easier reading: fonts, spacing, colors and bionic reading")]
struct Cli {
    /// Config file to use instead of the platform default
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a document with the saved style
    Render(RenderArgs),
    /// Open a document in the interactive reader
    Read {
        /// File path, library document name or note id
        source: String,
    },
    /// Manage the text file library
    #[command(subcommand)]
    Files(FilesCommand),
    /// Manage notes
    #[command(subcommand)]
    Notes(NotesCommand),
    /// Show or change display preferences
    #[command(subcommand)]
    Prefs(PrefsCommand),
    /// Collect recognized text lines from stdin and store them as a document
    Scan {
        /// Document name, `Scan-<unix seconds>` when omitted
        #[arg(long)]
        name: Option<String>,
        /// Store as a note instead of a library file
        #[arg(long)]
        note: bool,
        /// Stop after this many seconds without input
        #[arg(long, default_value_t = 60)]
        idle_secs: u64,
    },
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// File path, library document name, note id, or `-` for stdin
    source: String,

    /// Force bionic reading on
    #[arg(long, overrides_with = "no_bionic")]
    bionic: bool,

    /// Force bionic reading off
    #[arg(long)]
    no_bionic: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Ansi)]
    format: OutputFormat,

    /// Write to this file instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Also copy the transformed text to the clipboard
    #[arg(long)]
    copy: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Ansi,
    Html,
    Markup,
    Plain,
}

#[derive(Subcommand, Debug)]
enum FilesCommand {
    /// List documents, newest first
    List {
        #[arg(long)]
        search: Option<String>,
    },
    /// Print a document's raw text
    Show { name: String },
    Rename { old: String, new: String },
    Delete { name: String },
}

#[derive(Subcommand, Debug)]
enum NotesCommand {
    /// List notes, most recently updated first
    List {
        #[arg(long)]
        search: Option<String>,
    },
    New { title: String },
    Show { id: String },
    /// Replace a note's content with stdin
    Edit { id: String },
    Rename { id: String, title: String },
    Duplicate { id: String },
    Delete { id: String },
    /// Set a note's card color (`#RRGGBB`)
    Color { id: String, hex: String },
}

#[derive(Subcommand, Debug)]
enum PrefsCommand {
    /// Print every setting and a styled sample
    Show,
    /// Set one stored value
    Set { key: String, value: String },
    /// Cycle the font
    Font {
        #[arg(value_enum)]
        direction: Direction,
    },
    /// List one page of a palette
    Palette {
        #[arg(value_enum)]
        which: PaletteKind,
        #[arg(long, default_value_t = 0)]
        page: usize,
    },
    /// Forget every stored preference
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Direction {
    Next,
    Prev,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PaletteKind {
    Background,
    Text,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_default(),
    };

    let interactive = matches!(cli.command, Command::Read { .. });
    init_logging(&config, interactive)?;

    match cli.command {
        Command::Render(args) => run_render(args, &config),
        Command::Read { source } => {
            let (title, text) = load_source(&source, &config)?;
            run_reader(title, text, &config)
        }
        Command::Files(command) => run_files(command, &config),
        Command::Notes(command) => run_notes(command, &config),
        Command::Prefs(command) => run_prefs(command, &config),
        Command::Scan {
            name,
            note,
            idle_secs,
        } => run_scan(name.as_deref(), note, Duration::from_secs(idle_secs), &config),
    }
}

/// Logs go to stderr, or to the configured file
///
/// The interactive reader owns the terminal, so it stays quiet unless
/// `RUST_LOG` or a log file says otherwise.
fn init_logging(config: &Config, interactive: bool) -> Result<()> {
    let default_filter = if interactive && config.logging.file.is_none() {
        "off"
    } else {
        config.logging.level.as_str()
    };

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter));

    if let Some(path) = &config.logging.file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}

fn open_preferences(config: &Config) -> Result<FilePreferenceStore> {
    let path = config.preferences_path();
    FilePreferenceStore::open(&path).with_context(|| format!("loading {}", path.display()))
}

fn open_notes(config: &Config) -> Result<NoteBook> {
    let path = config.notes_path();
    NoteBook::open(&path).with_context(|| format!("loading {}", path.display()))
}

fn title_of(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Resolve `source` to (title, text)
///
/// Tried in order: stdin, a path on disk, a library document, a note.
fn load_source(source: &str, config: &Config) -> Result<(String, String)> {
    if source == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("reading stdin")?;
        return Ok(("stdin".to_string(), text));
    }

    let path = Path::new(source);
    if path.is_file() {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        return Ok((title_of(path), text));
    }

    let library = FileLibrary::new(config.documents_dir());
    if let Ok(id) = library.path_for(source) {
        if id.is_file() {
            let text = library.read_text(&id)?;
            return Ok((title_of(&id), text));
        }
    }

    let notes = open_notes(config)?;
    if let Ok(id) = notes.find_by_prefix(source) {
        if let Some(note) = notes.get(id) {
            return Ok((note.display_title().to_string(), note.content.clone()));
        }
    }

    bail!("no file, library document or note matches {:?}", source)
}

fn run_render(args: RenderArgs, config: &Config) -> Result<()> {
    let (title, text) = load_source(&args.source, config)?;
    let prefs = open_preferences(config)?;

    let mut style = load_style(&prefs);
    if args.bionic {
        style.set_bionic(true);
    } else if args.no_bionic {
        style.set_bionic(false);
    }

    let (backgrounds, text_colors) = load_palettes(&prefs);
    let engine = StyleEngine::new(backgrounds, text_colors);
    let doc = engine.render(&text, &style);
    info!("rendered {} ({} segments)", title, doc.segments.len());

    let mut output = match args.format {
        OutputFormat::Ansi => {
            let support = if args.output.is_some() {
                ColorSupport::TrueColor
            } else {
                detect_capabilities().color_support
            };
            render_ansi(&doc, support)
        }
        OutputFormat::Html => html_page(&title, &doc),
        OutputFormat::Markup => doc.to_markup(),
        OutputFormat::Plain => doc.plain_text(),
    };
    if !output.is_empty() && !output.ends_with('\n') {
        output.push('\n');
    }

    match &args.output {
        Some(path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("writing {}", path.display()))?;
            eprintln!("Saved {} to {}", title, path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(output.as_bytes())?;
            stdout.flush()?;
        }
    }

    if args.copy {
        let formatted = engine.formatted(&text, &style);
        let mut clipboard = arboard::Clipboard::new().context("clipboard unavailable")?;
        clipboard.set_text(formatted).context("copy failed")?;
        eprintln!("Copied to clipboard");
    }

    Ok(())
}

/// Short relative age such as `5m ago`
fn format_age(at: SystemTime) -> String {
    let secs = SystemTime::now()
        .duration_since(at)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    match secs {
        0..=59 => "just now".to_string(),
        60..=3599 => format!("{}m ago", secs / 60),
        3600..=86_399 => format!("{}h ago", secs / 3600),
        _ => format!("{}d ago", secs / 86_400),
    }
}

fn run_files(command: FilesCommand, config: &Config) -> Result<()> {
    let mut library = FileLibrary::new(config.documents_dir());

    match command {
        FilesCommand::List { search } => {
            let entries = library.search(search.as_deref().unwrap_or(""))?;
            if entries.is_empty() {
                eprintln!("No documents in {}", library.dir().display());
            }
            for entry in entries {
                println!(
                    "{:<10} {}",
                    format_age(entry.last_modified),
                    ellipsize(&entry.title, LIST_TITLE_WIDTH)
                );
            }
        }
        FilesCommand::Show { name } => {
            let id = library.path_for(&name)?;
            print!("{}", library.read_text(&id)?);
        }
        FilesCommand::Rename { old, new } => {
            let id = library.path_for(&old)?;
            let renamed = library.rename(&id, &new)?;
            println!("Renamed to {}", title_of(&renamed));
        }
        FilesCommand::Delete { name } => {
            let id = library.path_for(&name)?;
            library.delete(&id)?;
            println!("Deleted {}", title_of(&id));
        }
    }
    Ok(())
}

fn short_id(id: &uuid::Uuid) -> String {
    id.to_string().chars().take(8).collect()
}

fn run_notes(command: NotesCommand, config: &Config) -> Result<()> {
    let mut notes = open_notes(config)?;

    match command {
        NotesCommand::List { search } => {
            let found = notes.filtered(search.as_deref().unwrap_or(""));
            if found.is_empty() {
                eprintln!("No notes");
            }
            for note in found {
                println!(
                    "{}  {:<10} {}  {}",
                    short_id(&note.id),
                    format_age(note.updated_at),
                    note.color.to_hex(),
                    ellipsize(note.display_title(), LIST_TITLE_WIDTH)
                );
            }
        }
        NotesCommand::New { title } => {
            let id = notes.create(&title)?;
            println!("{}", id);
        }
        NotesCommand::Show { id } => {
            let id = notes.find_by_prefix(&id)?;
            let note = notes.get(id).ok_or_else(|| anyhow!("note {} vanished", id))?;
            println!("# {}", note.display_title());
            print!("{}", note.content);
        }
        NotesCommand::Edit { id } => {
            let id = notes.find_by_prefix(&id)?;
            let mut content = String::new();
            io::stdin()
                .read_to_string(&mut content)
                .context("reading stdin")?;
            notes.update_content(id, &content)?;
            println!("Updated {}", short_id(&id));
        }
        NotesCommand::Rename { id, title } => {
            let id = notes.find_by_prefix(&id)?;
            notes.rename(id, &title)?;
            println!("Renamed {}", short_id(&id));
        }
        NotesCommand::Duplicate { id } => {
            let id = notes.find_by_prefix(&id)?;
            let copy = notes.duplicate(id)?;
            println!("{}", copy);
        }
        NotesCommand::Delete { id } => {
            let id = notes.find_by_prefix(&id)?;
            let note = notes.delete(id)?;
            println!("Deleted {}", note.display_title());
        }
        NotesCommand::Color { id, hex } => {
            let id = notes.find_by_prefix(&id)?;
            let color = Rgb::from_hex(&hex).ok_or_else(|| anyhow!("not a color: {}", hex))?;
            notes.update_color(id, color)?;
            println!("Recolored {}", short_id(&id));
        }
    }
    Ok(())
}

fn run_prefs(command: PrefsCommand, config: &Config) -> Result<()> {
    let mut prefs = open_preferences(config)?;

    match command {
        PrefsCommand::Show => {
            let style = load_style(&prefs);
            print_settings(&style);
            let (backgrounds, text_colors) = load_palettes(&prefs);
            let engine = StyleEngine::new(backgrounds, text_colors);
            let sample = engine.render(&config.reader.sample_text, &style);
            println!();
            println!("{}", render_ansi(&sample, detect_capabilities().color_support));
        }
        PrefsCommand::Set { key, value } => {
            let mut style = load_style(&prefs);
            match key.as_str() {
                keys::CUSTOM_BACKGROUND_COLOR | keys::CUSTOM_TEXT_COLOR => {
                    let color =
                        Rgb::from_hex(&value).ok_or_else(|| anyhow!("not a color: {}", value))?;
                    if key == keys::CUSTOM_BACKGROUND_COLOR {
                        preferences::save_custom_background(&mut prefs, &mut style, color)?;
                    } else {
                        preferences::save_custom_text_color(&mut prefs, &mut style, color)?;
                    }
                }
                known if keys::ALL.contains(&known) => {
                    prefs.set(known, PrefValue::parse(&value));
                    // read back through the clamping setters
                    style = load_style(&prefs);
                    save_style(&mut prefs, &style)?;
                }
                other => bail!(
                    "unknown preference {:?}; expected one of {}",
                    other,
                    keys::ALL.join(", ")
                ),
            }
            print_settings(&style);
        }
        PrefsCommand::Font { direction } => {
            let mut style = load_style(&prefs);
            match direction {
                Direction::Next => style.next_font(),
                Direction::Prev => style.prev_font(),
            }
            save_style(&mut prefs, &style)?;
            println!("Font: {}", style.font().name());
        }
        PrefsCommand::Palette { which, page } => {
            let (backgrounds, text_colors) = load_palettes(&prefs);
            let style = load_style(&prefs);
            let (palette, selected): (&Palette, usize) = match which {
                PaletteKind::Background => (&backgrounds, style.background_color_index()),
                PaletteKind::Text => (&text_colors, style.text_color_index()),
            };
            let per_page = config.reader.colors_per_page.max(1);
            let indices = palette.page_indices(page, per_page);
            if indices.is_empty() {
                bail!(
                    "{} palette has {} page(s)",
                    palette.name(),
                    palette.page_count(per_page)
                );
            }
            let support = detect_capabilities().color_support;
            for index in indices {
                let color = palette.resolve(index);
                let marker = if index == selected { "*" } else { " " };
                let label = if index == palette.custom_index() { " (custom)" } else { "" };
                let swatch = format!("{}    {}", format_bg_color(color, support), ANSI_RESET);
                println!("{} {:>2} {} {}{}", marker, index, swatch, color.to_hex(), label);
            }
            if palette.has_next_page(page, per_page) {
                println!("  more: --page {}", page + 1);
            }
        }
        PrefsCommand::Reset => {
            preferences::reset(&mut prefs)?;
            println!("Preferences reset");
        }
    }
    Ok(())
}

fn print_settings(style: &StyleConfig) {
    for index in 0..StyleConfig::settings_count() {
        println!(
            "{:<16} {}",
            style.setting_name(index),
            style.setting_value(index)
        );
    }
}

fn run_scan(name: Option<&str>, as_note: bool, idle: Duration, config: &Config) -> Result<()> {
    let mut source = LineCaptureSource::new(BufReader::new(io::stdin()));
    let mut session = CaptureSession::new(ScanType::Text);
    session.attach(&mut source)?;
    eprintln!("{}", session.header_text());

    session.wait(idle);
    eprintln!("{}", session.header_text());

    if as_note {
        let mut notes = open_notes(config)?;
        let id = session.save_to(&mut notes, name)?;
        println!("Saved note {}", id);
    } else {
        let mut library = FileLibrary::new(config.documents_dir());
        let id = session.save_to(&mut library, name)?;
        println!("Saved {}", id.display());
    }
    Ok(())
}

fn run_reader(title: String, text: String, config: &Config) -> Result<()> {
    let mut prefs = open_preferences(config)?;
    let style = load_style(&prefs);
    let (backgrounds, text_colors) = load_palettes(&prefs);

    let mut worker = RenderWorker::spawn(StyleEngine::new(backgrounds.clone(), text_colors.clone()))
        .context("starting render worker")?;
    let mut state = ReaderState::new(
        title,
        text,
        style,
        (backgrounds, text_colors),
        detect_capabilities(),
    );

    // Set up panic hook to restore terminal on panic
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let mut terminal = setup_terminal()?;
    let result = run_event_loop(&mut terminal, &mut state, &mut worker, &mut prefs);
    cleanup_terminal(terminal)?;
    worker.shutdown();

    if let Err(e) = save_style(&mut prefs, &state.config) {
        warn!("failed to save preferences: {}", e);
    }

    result
}

/// Set up the terminal for TUI rendering
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state
fn cleanup_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Main event loop - submits renders, accepts results, handles input
fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    state: &mut ReaderState,
    worker: &mut RenderWorker,
    prefs: &mut FilePreferenceStore,
) -> Result<()> {
    let frame_duration = Duration::from_millis(FRAME_TIME_MS);

    loop {
        let frame_start = Instant::now();

        if state.take_render_request() {
            worker.submit(state.text.clone(), &state.config);
        }

        // Process worker responses (non-blocking)
        while let Some(response) = worker.try_recv() {
            state.handle_render_response(response);
        }

        if state.take_preferences_changed() {
            if let Err(e) = save_style(prefs, &state.config) {
                state.set_status(&format!("Could not save preferences: {}", e), true);
            }
        }

        terminal.draw(|frame| ui::render(frame, state))?;

        let timeout = frame_duration.saturating_sub(frame_start.elapsed());
        if event::poll(timeout)? {
            handle_event(event::read()?, state)?;
        }

        if state.should_quit {
            break;
        }
    }

    Ok(())
}
